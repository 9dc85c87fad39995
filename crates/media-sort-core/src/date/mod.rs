pub mod container;
pub mod exif;
pub mod parse;

use std::path::PathBuf;

use chrono::{Datelike, FixedOffset, NaiveDate, NaiveDateTime};

/// A point in time read from media metadata.
///
/// The wall-clock value is kept exactly as written in the file. An offset,
/// when the source carried one, is remembered but never applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamp {
    local: NaiveDateTime,
    offset: Option<FixedOffset>,
}

impl Timestamp {
    pub fn new(local: NaiveDateTime, offset: Option<FixedOffset>) -> Self {
        Self { local, offset }
    }

    pub fn naive(&self) -> NaiveDateTime {
        self.local
    }

    pub fn date(&self) -> NaiveDate {
        self.local.date()
    }

    pub fn offset(&self) -> Option<FixedOffset> {
        self.offset
    }

    /// `YYYY/MM/DD`, zero padded
    pub fn date_subpath(&self) -> PathBuf {
        let date = self.date();
        PathBuf::from(format!("{:04}", date.year()))
            .join(format!("{:02}", date.month()))
            .join(format!("{:02}", date.day()))
    }

    /// `YYYY-MM-DD_HH-MM-SS`
    pub fn base_name(&self) -> String {
        self.local.format("%Y-%m-%d_%H-%M-%S").to_string()
    }
}
