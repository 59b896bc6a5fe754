//! Log level definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Severity threshold of a cell, ordered from most to least verbose.
///
/// A cell at threshold `t` emits a message of level `l` when `t <= l`, so a
/// lower value is a looser gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[derive(Default)]
#[repr(i8)]
pub enum LogLevel {
    #[serde(rename = "v2")]
    V2 = -2,
    #[serde(rename = "v1")]
    V1 = -1,
    #[default]
    #[serde(rename = "info")]
    Info = 0,
    #[serde(rename = "err")]
    Error = 1,
}

impl LogLevel {
    pub fn to_str(&self) -> &'static str {
        match self {
            LogLevel::V2 => "v2",
            LogLevel::V1 => "v1",
            LogLevel::Info => "info",
            LogLevel::Error => "err",
        }
    }

    /// Level corresponding to verbose level `n` (1 = `V1`, 2 = `V2`).
    ///
    /// `n <= 0` maps onto the non-verbose levels; `None` when `n` is past the
    /// most verbose level.
    #[must_use]
    pub fn from_verbosity(n: i32) -> Option<Self> {
        n.checked_neg()
            .and_then(|v| i8::try_from(v).ok())
            .and_then(Self::from_i8)
    }

    #[must_use]
    pub fn from_i8(value: i8) -> Option<Self> {
        match value {
            -2 => Some(LogLevel::V2),
            -1 => Some(LogLevel::V1),
            0 => Some(LogLevel::Info),
            1 => Some(LogLevel::Error),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_i8(self) -> i8 {
        self as i8
    }

    /// True for `V1` and `V2`.
    #[must_use]
    pub fn is_verbose(self) -> bool {
        self < LogLevel::Info
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    /// Parse a level token as accepted in rule strings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "2" | "v2" => Ok(LogLevel::V2),
            "1" | "v1" => Ok(LogLevel::V1),
            "i" | "info" => Ok(LogLevel::Info),
            "e" | "err" => Ok(LogLevel::Error),
            _ => Err(format!("Invalid log level: '{}'", s)),
        }
    }
}
