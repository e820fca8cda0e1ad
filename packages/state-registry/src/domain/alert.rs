//! Alert records and counters

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::AddAssign;

/// Alert severity.
///
/// Only [`Severity::Error`] and [`Severity::Warn`] are counted by the
/// bundle. Unknown severities are kept verbatim so they survive a snapshot
/// round trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Severity {
    Error,
    Warn,
    Info,
    Other(String),
}

impl Severity {
    pub fn as_str(&self) -> &str {
        match self {
            Severity::Error => "error",
            Severity::Warn => "warn",
            Severity::Info => "info",
            Severity::Other(value) => value,
        }
    }
}

impl From<String> for Severity {
    fn from(value: String) -> Self {
        match value.as_str() {
            "error" => Severity::Error,
            "warn" => Severity::Warn,
            "info" => Severity::Info,
            _ => Severity::Other(value),
        }
    }
}

impl From<&str> for Severity {
    fn from(value: &str) -> Self {
        Severity::from(value.to_string())
    }
}

impl From<Severity> for String {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Other(value) => value,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Producer of an alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSourceKind {
    #[serde(alias = "parser")]
    Validator,
    Rule,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertSource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<AlertSourceKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl AlertSource {
    pub fn validator(id: impl Into<String>) -> Self {
        Self {
            kind: Some(AlertSourceKind::Validator),
            id: Some(id.into()),
        }
    }

    pub fn rule(id: impl Into<String>) -> Self {
        Self {
            kind: Some(AlertSourceKind::Rule),
            id: Some(id.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub id: String,
    pub severity: Severity,
    pub msg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<AlertSource>,
}

impl Alert {
    pub fn new(id: impl Into<String>, severity: Severity, msg: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            severity,
            msg: msg.into(),
            source: None,
        }
    }

    pub fn with_source(mut self, source: AlertSource) -> Self {
        self.source = Some(source);
        self
    }
}

/// Error / warning tally
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertCounter {
    pub error: u32,
    pub warn: u32,
}

impl AlertCounter {
    pub fn new(error: u32, warn: u32) -> Self {
        Self { error, warn }
    }

    /// Count one alert of `severity`. Returns false for uncounted severities.
    pub fn record(&mut self, severity: &Severity) -> bool {
        match severity {
            Severity::Error => self.error += 1,
            Severity::Warn => self.warn += 1,
            _ => return false,
        }
        true
    }

    pub fn is_empty(&self) -> bool {
        self.error == 0 && self.warn == 0
    }
}

impl AddAssign for AlertCounter {
    fn add_assign(&mut self, other: Self) {
        self.error += other.error;
        self.warn += other.warn;
    }
}
