#![allow(clippy::result_large_err)]

use crate::core::config::{
    parse_option_list, Properties, LISTENER_LOGFILE, SINK_CONF, SINK_IDENT, SINK_NAME, SINK_TYPE,
};
use crate::core::error::AppError;
use crate::core::types::{ErrorCategory, Priority, SinkSeverity};
use indexmap::IndexMap;
use std::io;
use thiserror::Error;

pub const DEFAULT_SINK_TYPE: &str = "file";
pub const DEFAULT_SINK_NAME: &str = "phing.log";
pub const DEFAULT_SINK_IDENT: &str = "phing";

/// Destination for formatted build log text.
pub trait Sink: Send {
    /// Write one record. Records less severe than the threshold are dropped.
    fn log(&mut self, message: &str, severity: SinkSeverity) -> Result<(), SinkError>;

    /// Write one record whatever the threshold, keeping its own severity label.
    fn log_unfiltered(&mut self, message: &str, severity: SinkSeverity) -> Result<(), SinkError> {
        let threshold = self.threshold();
        self.set_threshold(SinkSeverity::Debug);
        let result = self.log(message, severity);
        self.set_threshold(threshold);
        result
    }

    fn ident(&self) -> &str;

    fn set_ident(&mut self, ident: &str);

    fn threshold(&self) -> SinkSeverity;

    fn set_threshold(&mut self, threshold: SinkSeverity);
}

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("unsupported sink type '{0}'")]
    UnsupportedType(String),

    #[error("invalid option '{key}' for {sink_type} sink: {reason}")]
    InvalidOption {
        sink_type: String,
        key: String,
        reason: String,
    },

    #[error("failed to open sink '{name}': {source}")]
    Open {
        name: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to write log record: {0}")]
    Write(#[from] io::Error),
}

impl From<SinkError> for AppError {
    fn from(err: SinkError) -> Self {
        let category = match err {
            SinkError::Write(_) => ErrorCategory::IoError,
            _ => ErrorCategory::ConfigurationError,
        };
        let message = err.to_string();
        AppError::with_source(category, message, Box::new(err))
    }
}

/// Fully resolved sink parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkSettings {
    pub sink_type: String,
    pub name: String,
    pub ident: String,
    pub options: IndexMap<String, String>,
    pub threshold: SinkSeverity,
}

/// Builds sinks from resolved settings.
pub trait SinkFactory {
    fn create(&self, settings: &SinkSettings) -> Result<Box<dyn Sink>, SinkError>;
}

impl<F> SinkFactory for F
where
    F: Fn(&SinkSettings) -> Result<Box<dyn Sink>, SinkError>,
{
    fn create(&self, settings: &SinkSettings) -> Result<Box<dyn Sink>, SinkError> {
        self(settings)
    }
}

pub struct SinkConfigurator;

impl SinkConfigurator {
    /// Resolve sink settings from build properties, applying defaults.
    pub fn resolve(properties: &Properties, output_level: i32) -> SinkSettings {
        let sink_type = properties
            .get(SINK_TYPE)
            .unwrap_or(DEFAULT_SINK_TYPE)
            .to_string();
        let name = properties
            .get(SINK_NAME)
            .or_else(|| properties.get(LISTENER_LOGFILE))
            .unwrap_or(DEFAULT_SINK_NAME)
            .to_string();
        let ident = properties
            .get(SINK_IDENT)
            .unwrap_or(DEFAULT_SINK_IDENT)
            .to_string();
        let options = properties
            .get(SINK_CONF)
            .map(parse_option_list)
            .unwrap_or_default();

        SinkSettings {
            sink_type,
            name,
            ident,
            options,
            threshold: Priority::clamp_code(output_level).sink_severity(),
        }
    }

    /// Resolve settings and build the sink. Any failure is a fatal configuration error.
    pub fn configure(
        properties: &Properties,
        output_level: i32,
        factory: &dyn SinkFactory,
    ) -> Result<Box<dyn Sink>, AppError> {
        let settings = Self::resolve(properties, output_level);
        tracing::debug!(
            sink_type = %settings.sink_type,
            name = %settings.name,
            threshold = %settings.threshold,
            "configuring build log sink"
        );
        factory.create(&settings).map_err(|err| {
            let message = format!("Unable to configure build log sink: {}", err);
            AppError::with_source(ErrorCategory::ConfigurationError, message, Box::new(err))
                .with_context("sink.type", settings.sink_type.clone())
                .with_context("sink.name", settings.name.clone())
        })
    }
}
