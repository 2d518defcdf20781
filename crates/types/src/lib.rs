//! Severity vocabulary shared between the build engine and log sinks.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Build message priority. Lower codes are more severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Error,
    Warning,
    Info,
    Verbose,
    Debug,
}

impl Priority {
    pub const ALL: [Priority; 5] = [
        Priority::Error,
        Priority::Warning,
        Priority::Info,
        Priority::Verbose,
        Priority::Debug,
    ];

    /// Integer code used by output-level thresholds.
    pub fn code(self) -> i32 {
        match self {
            Priority::Error => 0,
            Priority::Warning => 1,
            Priority::Info => 2,
            Priority::Verbose => 3,
            Priority::Debug => 4,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Priority::Error),
            1 => Some(Priority::Warning),
            2 => Some(Priority::Info),
            3 => Some(Priority::Verbose),
            4 => Some(Priority::Debug),
            _ => None,
        }
    }

    /// Nearest priority for an arbitrary threshold code.
    pub fn clamp_code(code: i32) -> Self {
        Self::from_code(code.clamp(0, 4)).unwrap_or(Priority::Debug)
    }

    /// Sink severity this priority is written at.
    pub fn sink_severity(self) -> SinkSeverity {
        match self {
            Priority::Error => SinkSeverity::Err,
            Priority::Warning => SinkSeverity::Warning,
            Priority::Info => SinkSeverity::Info,
            Priority::Verbose => SinkSeverity::Notice,
            Priority::Debug => SinkSeverity::Debug,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Priority::Error => "error",
            Priority::Warning => "warning",
            Priority::Info => "info",
            Priority::Verbose => "verbose",
            Priority::Debug => "debug",
        };
        f.write_str(name)
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "error" | "err" => Ok(Priority::Error),
            "warning" | "warn" => Ok(Priority::Warning),
            "info" => Ok(Priority::Info),
            "verbose" => Ok(Priority::Verbose),
            "debug" => Ok(Priority::Debug),
            _ => Err(format!(
                "invalid priority '{}'; supported values are error, warning, info, verbose, debug",
                value
            )),
        }
    }
}

/// Syslog-style severity understood by log sinks. Lower is more severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkSeverity {
    Emerg,
    Alert,
    Crit,
    Err,
    Warning,
    Notice,
    Info,
    Debug,
}

impl SinkSeverity {
    /// True when a record at `self` passes a sink configured at `threshold`.
    pub fn passes(self, threshold: SinkSeverity) -> bool {
        self <= threshold
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SinkSeverity::Emerg => "emergency",
            SinkSeverity::Alert => "alert",
            SinkSeverity::Crit => "critical",
            SinkSeverity::Err => "error",
            SinkSeverity::Warning => "warning",
            SinkSeverity::Notice => "notice",
            SinkSeverity::Info => "info",
            SinkSeverity::Debug => "debug",
        }
    }
}

impl fmt::Display for SinkSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
