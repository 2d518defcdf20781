#![allow(clippy::result_large_err)]

mod loader;

pub use loader::PropertyLoader;

use crate::core::error::AppError;
use crate::core::types::ErrorCategory;
use indexmap::IndexMap;
use serde::Serialize;

/// Path of the build file driving the current run.
pub const BUILD_FILE: &str = "build.file";
/// Sink backend selector.
pub const SINK_TYPE: &str = "sink.type";
/// Sink target: file path or resource name.
pub const SINK_NAME: &str = "sink.name";
/// Sink identity string.
pub const SINK_IDENT: &str = "sink.ident";
/// Backend options as `key=value` pairs separated by commas.
pub const SINK_CONF: &str = "sink.conf";
/// Fallback for `sink.name`.
pub const LISTENER_LOGFILE: &str = "listener.logfile";

/// Build-wide string property store. Insertion order is preserved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Properties {
    values: IndexMap<String, String>,
}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn set<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
        self.values.insert(key.into(), value.into());
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Apply a command-line definition of the form `key=value`.
    pub fn define(&mut self, definition: &str) -> Result<(), AppError> {
        let (key, value) = definition.split_once('=').ok_or_else(|| {
            AppError::new(
                ErrorCategory::ValidationError,
                format!("Invalid property definition '{}': expected key=value", definition),
            )
        })?;
        let key = key.trim();
        if key.is_empty() {
            return Err(AppError::new(
                ErrorCategory::ValidationError,
                format!("Invalid property definition '{}': empty key", definition),
            ));
        }
        self.set(key, value);
        Ok(())
    }

    /// Copy every property from `other`, overriding existing keys.
    pub fn merge(&mut self, other: &Properties) {
        for (key, value) in other.iter() {
            self.set(key, value);
        }
    }
}

impl FromIterator<(String, String)> for Properties {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Properties {
            values: iter.into_iter().collect(),
        }
    }
}

/// Parse a `key=value,key2=value2` option list. Entries without `=` map to `"true"`.
pub fn parse_option_list(raw: &str) -> IndexMap<String, String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| match entry.split_once('=') {
            Some((key, value)) => (key.trim().to_string(), value.trim().to_string()),
            None => (entry.to_string(), "true".to_string()),
        })
        .collect()
}
