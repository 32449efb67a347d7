//! `YYYY-MM-DD` date keys.
//!
//! A date key is always passed in explicitly; nothing in this crate reads the clock.

use crate::error::{EngineError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// Calendar day identifier formatted as `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateKey(NaiveDate);

impl DateKey {
    pub fn from_date(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Parse a `YYYY-MM-DD` string. Shorter forms such as `2024-1-1` are rejected.
    pub fn parse(s: &str) -> Result<Self> {
        if s.len() != 10 {
            return Err(EngineError::InvalidDateKey(s.to_string()));
        }
        NaiveDate::parse_from_str(s, DATE_KEY_FORMAT)
            .map(Self)
            .map_err(|_| EngineError::InvalidDateKey(s.to_string()))
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// The previous calendar day.
    pub fn pred(&self) -> Option<Self> {
        self.0.pred_opt().map(Self)
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_KEY_FORMAT))
    }
}

impl Serialize for DateKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DateKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
