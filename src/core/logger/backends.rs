use super::sink::{Sink, SinkError, SinkFactory, SinkSettings};
use crate::core::types::SinkSeverity;
use chrono::format::{Item, StrftimeItems};
use chrono::Local;
use std::fs::{create_dir_all, File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

const DEFAULT_TIME_FORMAT: &str = "%b %d %H:%M:%S";

/// Factory for the built-in `file`, `console` and `null` sinks.
#[derive(Debug, Default, Clone, Copy)]
pub struct BackendSinkFactory;

impl SinkFactory for BackendSinkFactory {
    fn create(&self, settings: &SinkSettings) -> Result<Box<dyn Sink>, SinkError> {
        match settings.sink_type.as_str() {
            "file" => Ok(Box::new(FileSink::open(settings)?)),
            "console" => Ok(Box::new(ConsoleSink::new(settings)?)),
            "null" => Ok(Box::new(NullSink::new(settings))),
            other => Err(SinkError::UnsupportedType(other.to_string())),
        }
    }
}

/// Line layout shared by the text backends: `time ident [severity] message`.
#[derive(Debug, Clone)]
struct LineFormat {
    time_format: Option<String>,
}

impl LineFormat {
    fn render(&self, ident: &str, severity: SinkSeverity, message: &str) -> String {
        match &self.time_format {
            Some(format) => format!(
                "{} {} [{}] {}\n",
                Local::now().format(format),
                ident,
                severity,
                message
            ),
            None => format!("{} [{}] {}\n", ident, severity, message),
        }
    }
}

fn bool_option(settings: &SinkSettings, key: &str, default: bool) -> Result<bool, SinkError> {
    match settings.options.get(key) {
        None => Ok(default),
        Some(raw) => raw.parse::<bool>().map_err(|_| SinkError::InvalidOption {
            sink_type: settings.sink_type.clone(),
            key: key.to_string(),
            reason: format!("expected true or false, got '{}'", raw),
        }),
    }
}

/// `timeFormat` option, checked up front so a bad pattern cannot fail a later write.
fn time_format_option(settings: &SinkSettings) -> Result<String, SinkError> {
    let format = settings
        .options
        .get("timeFormat")
        .cloned()
        .unwrap_or_else(|| DEFAULT_TIME_FORMAT.to_string());
    if StrftimeItems::new(&format).any(|item| matches!(item, Item::Error)) {
        return Err(SinkError::InvalidOption {
            sink_type: settings.sink_type.clone(),
            key: "timeFormat".to_string(),
            reason: format!("'{}' is not a valid strftime pattern", format),
        });
    }
    Ok(format)
}

/// Appends records to a file.
pub struct FileSink {
    file: File,
    ident: String,
    threshold: SinkSeverity,
    format: LineFormat,
}

impl FileSink {
    pub fn open(settings: &SinkSettings) -> Result<Self, SinkError> {
        let append = bool_option(settings, "append", true)?;
        let time_format = time_format_option(settings)?;
        let path = Path::new(&settings.name);
        let open_error = |source: io::Error| SinkError::Open {
            name: settings.name.clone(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            create_dir_all(parent).map_err(open_error)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .append(append)
            .truncate(!append)
            .open(path)
            .map_err(open_error)?;

        Ok(Self {
            file,
            ident: settings.ident.clone(),
            threshold: settings.threshold,
            format: LineFormat {
                time_format: Some(time_format),
            },
        })
    }
}

impl Sink for FileSink {
    fn log(&mut self, message: &str, severity: SinkSeverity) -> Result<(), SinkError> {
        if !severity.passes(self.threshold) {
            return Ok(());
        }
        let line = self.format.render(&self.ident, severity, message);
        self.file.write_all(line.as_bytes())?;
        Ok(())
    }

    fn ident(&self) -> &str {
        &self.ident
    }

    fn set_ident(&mut self, ident: &str) {
        self.ident = ident.to_string();
    }

    fn threshold(&self) -> SinkSeverity {
        self.threshold
    }

    fn set_threshold(&mut self, threshold: SinkSeverity) {
        self.threshold = threshold;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stream {
    Stdout,
    Stderr,
}

/// Writes records to stdout or stderr.
pub struct ConsoleSink {
    stream: Stream,
    ident: String,
    threshold: SinkSeverity,
    format: LineFormat,
}

impl ConsoleSink {
    pub fn new(settings: &SinkSettings) -> Result<Self, SinkError> {
        let stream = match settings.options.get("stream").map(String::as_str) {
            None | Some("stderr") => Stream::Stderr,
            Some("stdout") => Stream::Stdout,
            Some(other) => {
                return Err(SinkError::InvalidOption {
                    sink_type: settings.sink_type.clone(),
                    key: "stream".to_string(),
                    reason: format!("expected stdout or stderr, got '{}'", other),
                })
            }
        };
        let time_format = if bool_option(settings, "timestamp", true)? {
            Some(time_format_option(settings)?)
        } else {
            None
        };

        Ok(Self {
            stream,
            ident: settings.ident.clone(),
            threshold: settings.threshold,
            format: LineFormat { time_format },
        })
    }
}

impl Sink for ConsoleSink {
    fn log(&mut self, message: &str, severity: SinkSeverity) -> Result<(), SinkError> {
        if !severity.passes(self.threshold) {
            return Ok(());
        }
        let line = self.format.render(&self.ident, severity, message);
        match self.stream {
            Stream::Stdout => io::stdout().lock().write_all(line.as_bytes())?,
            Stream::Stderr => io::stderr().lock().write_all(line.as_bytes())?,
        }
        Ok(())
    }

    fn ident(&self) -> &str {
        &self.ident
    }

    fn set_ident(&mut self, ident: &str) {
        self.ident = ident.to_string();
    }

    fn threshold(&self) -> SinkSeverity {
        self.threshold
    }

    fn set_threshold(&mut self, threshold: SinkSeverity) {
        self.threshold = threshold;
    }
}

/// Discards every record.
pub struct NullSink {
    ident: String,
    threshold: SinkSeverity,
}

impl NullSink {
    pub fn new(settings: &SinkSettings) -> Self {
        Self {
            ident: settings.ident.clone(),
            threshold: settings.threshold,
        }
    }
}

impl Sink for NullSink {
    fn log(&mut self, _message: &str, _severity: SinkSeverity) -> Result<(), SinkError> {
        Ok(())
    }

    fn ident(&self) -> &str {
        &self.ident
    }

    fn set_ident(&mut self, ident: &str) {
        self.ident = ident.to_string();
    }

    fn threshold(&self) -> SinkSeverity {
        self.threshold
    }

    fn set_threshold(&mut self, threshold: SinkSeverity) {
        self.threshold = threshold;
    }
}
