#![allow(clippy::result_large_err)]

use super::Properties;
use crate::core::error::AppError;
use crate::core::types::ErrorCategory;
use std::path::Path;
use toml::Value;

pub struct PropertyLoader;

impl PropertyLoader {
    /// Load properties from a TOML file, flattening nested tables into dotted keys.
    pub fn load_from_file(path: &Path) -> Result<Properties, AppError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AppError::new(
                ErrorCategory::IoError,
                format!("Failed to read property file {}: {}", path.display(), e),
            )
        })?;

        Self::parse(&content).map_err(|e| e.with_context("file", path.display().to_string()))
    }

    pub fn parse(content: &str) -> Result<Properties, AppError> {
        let table: toml::Table = toml::from_str(content).map_err(|e| {
            AppError::new(
                ErrorCategory::ValidationError,
                format!("Failed to parse property file: {}", e),
            )
        })?;

        let mut properties = Properties::new();
        for (key, value) in &table {
            flatten(key, value, &mut properties)?;
        }
        Ok(properties)
    }
}

fn flatten(prefix: &str, value: &Value, out: &mut Properties) -> Result<(), AppError> {
    match value {
        Value::Table(table) => {
            for (key, nested) in table {
                flatten(&format!("{}.{}", prefix, key), nested, out)?;
            }
        }
        Value::Array(items) => {
            let mut parts = Vec::with_capacity(items.len());
            for item in items {
                parts.push(scalar(prefix, item)?);
            }
            out.set(prefix, parts.join(","));
        }
        other => out.set(prefix, scalar(prefix, other)?),
    }
    Ok(())
}

fn scalar(key: &str, value: &Value) -> Result<String, AppError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Integer(i) => Ok(i.to_string()),
        Value::Float(f) => Ok(f.to_string()),
        Value::Boolean(b) => Ok(b.to_string()),
        Value::Datetime(dt) => Ok(dt.to_string()),
        Value::Array(_) | Value::Table(_) => Err(AppError::new(
            ErrorCategory::ValidationError,
            format!("Property '{}' must hold scalar values", key),
        )),
    }
}
