mod locator;
mod reader;

pub use locator::LogLocator;
pub use reader::LogStream;

use chrono::NaiveDate;
use serde::Serialize;

/// Decompression applied when reading a log, derived from its file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    None,
    Gzip,
    Bzip2,
}

impl Compression {
    /// Resolve compression from the trailing extension of a file name
    pub fn from_name(name: &str) -> Self {
        if name.ends_with(".gz") {
            Compression::Gzip
        } else if name.ends_with(".bz2") {
            Compression::Bzip2
        } else {
            Compression::None
        }
    }
}

/// The rotated log chosen for a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogDescriptor {
    /// File name inside the log directory
    pub name: String,
    /// Calendar date embedded in the file name
    pub date: NaiveDate,
    pub compression: Compression,
}

impl LogDescriptor {
    /// The embedded date as it appears in the file name (`YYYYMMDD`)
    pub fn date_stamp(&self) -> String {
        self.date.format("%Y%m%d").to_string()
    }

    /// The embedded date with dot separators (`YYYY.MM.DD`)
    pub fn report_date(&self) -> String {
        self.date.format("%Y.%m.%d").to_string()
    }
}
