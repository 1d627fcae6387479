use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use std::fmt;

/// A fiscal quarter in canonical `YYYYQn` form.
///
/// Survey exports label their value columns `YYYY/Q`; cleaning rewrites those
/// into this structured token so downstream code never re-parses strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quarter {
    pub year: i32,
    pub quarter: u8,
}

impl Quarter {
    pub fn new(year: i32, quarter: u8) -> Option<Self> {
        if (0..=9999).contains(&year) && (1..=4).contains(&quarter) {
            Some(Self { year, quarter })
        } else {
            None
        }
    }

    /// Parse a raw export column name: either the agency's `YYYY/Q` form or
    /// an already-canonical `YYYYQn` token. Anything else is not a quarter
    /// column.
    pub fn parse_column(name: &str) -> Option<Self> {
        let name = name.trim();
        if let Some((year, quarter)) = name.split_once('/') {
            if year.len() == 4 && year.bytes().all(|b| b.is_ascii_digit()) {
                return Self::new(year.parse().ok()?, quarter.trim().parse().ok()?);
            }
            return None;
        }
        Self::parse_canonical(name)
    }

    /// Strict match for the canonical token: exactly four digits, `Q`, then
    /// a single digit 1–4.
    pub fn parse_canonical(token: &str) -> Option<Self> {
        let bytes = token.as_bytes();
        if bytes.len() != 6 || bytes[4] != b'Q' {
            return None;
        }
        if !bytes[..4].iter().all(|b| b.is_ascii_digit()) || !bytes[5].is_ascii_digit() {
            return None;
        }
        Self::new(token[..4].parse().ok()?, token[5..].parse().ok()?)
    }

    /// First calendar day of the quarter, e.g. `2020Q3` → 2020-07-01.
    pub fn start_date(&self) -> NaiveDate {
        let month = (self.quarter as u32 - 1) * 3 + 1;
        // year and quarter are range-checked in `new`
        NaiveDate::from_ymd_opt(self.year, month, 1).unwrap()
    }
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}Q{}", self.year, self.quarter)
    }
}

impl Serialize for Quarter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
