use std::{fmt, str::FromStr};

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::{IntakeError, Result};

const CANONICAL_FORMAT: &str = "%Y-%m-%d";
const CANONICAL_LEN: usize = 10;

/// Calendar day used as the ledger key, canonically `YYYY-MM-DD`.
///
/// No time-of-day or timezone is attached; comparison and ordering follow the
/// calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateKey(NaiveDate);

impl DateKey {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or_else(|| IntakeError::InvalidDate(format!("{year:04}-{month:02}-{day:02}")))
    }

    /// Parses a canonical key. Unpadded or otherwise non-canonical forms are rejected.
    pub fn parse(raw: &str) -> Result<Self> {
        let invalid = || IntakeError::InvalidDate(format!("`{raw}` is not a YYYY-MM-DD date"));
        if raw.len() != CANONICAL_LEN {
            return Err(invalid());
        }
        let date = NaiveDate::parse_from_str(raw, CANONICAL_FORMAT).map_err(|_| invalid())?;
        let key = Self(date);
        if key.to_string() != raw {
            return Err(invalid());
        }
        Ok(key)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// Calendar-day arithmetic; DST and clock shifts never apply.
    pub fn minus_days(&self, days: u32) -> Option<Self> {
        self.0
            .checked_sub_signed(Duration::days(i64::from(days)))
            .map(Self)
    }

    pub fn plus_days(&self, days: u32) -> Option<Self> {
        self.0
            .checked_add_signed(Duration::days(i64::from(days)))
            .map(Self)
    }

    /// Canonical storage key.
    pub fn as_key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(CANONICAL_FORMAT))
    }
}

impl FromStr for DateKey {
    type Err = IntakeError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<NaiveDate> for DateKey {
    fn from(value: NaiveDate) -> Self {
        Self(value)
    }
}

impl Serialize for DateKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DateKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
