use super::{Compression, LogDescriptor};
use crate::{Error, Result};
use chrono::NaiveDate;
use regex::Regex;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Finds the newest rotated log in a directory.
///
/// Candidates are named `<prefix>.log-YYYYMMDD`, optionally followed by
/// `.gz` or `.bz2`. Anything else in the directory is ignored.
#[derive(Debug, Clone)]
pub struct LogLocator {
    pattern: Regex,
}

impl LogLocator {
    pub fn new(prefix: &str) -> Result<Self> {
        let pattern = Regex::new(&format!(
            r"^{}\.log-([0-9]{{8}})(?:\.gz|\.bz2)?$",
            regex::escape(prefix)
        ))
        .map_err(|e| Error::InvalidPattern(format!("Invalid log prefix '{}': {}", prefix, e)))?;
        Ok(Self { pattern })
    }

    /// Select the newest log in `dir`.
    ///
    /// Returns `Ok(None)` when the directory is empty or holds no candidate;
    /// a missing directory is an error.
    pub fn locate(&self, dir: &Path) -> Result<Option<LogDescriptor>> {
        tracing::debug!("Scanning log directory: {}", dir.display());

        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(Error::DirectoryNotFound(dir.to_path_buf()));
            }
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry?;
            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(raw) => tracing::debug!("Skipping non UTF-8 file name: {:?}", raw),
            }
        }

        if names.is_empty() {
            tracing::info!("Log directory {} is empty", dir.display());
            return Ok(None);
        }

        let selected = self.select(&names);
        match &selected {
            Some(log) => tracing::info!("Found log file {}", log.name),
            None => tracing::info!("No log file in {} matched the naming pattern", dir.display()),
        }

        Ok(selected)
    }

    /// Pick the candidate with the greatest valid embedded date.
    ///
    /// Names are considered in lexicographic order and a later name only
    /// wins with a strictly newer date, so equal dates resolve to the
    /// smallest name. A candidate whose digits are not a calendar date is
    /// skipped.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Option<LogDescriptor> {
        let mut sorted: Vec<&str> = names.iter().map(AsRef::as_ref).collect();
        sorted.sort_unstable();

        let mut best: Option<(NaiveDate, &str)> = None;
        for name in sorted {
            let Some(digits) = self.pattern.captures(name).and_then(|c| c.get(1)) else {
                continue;
            };
            let Some(date) = parse_stamp(digits.as_str()) else {
                tracing::warn!("Skipping {}: {} is not a calendar date", name, digits.as_str());
                continue;
            };
            if best.is_none_or(|(newest, _)| date > newest) {
                best = Some((date, name));
            }
        }

        best.map(|(date, name)| LogDescriptor {
            name: name.to_string(),
            date,
            compression: Compression::from_name(name),
        })
    }
}

/// Parse an eight digit `YYYYMMDD` stamp.
fn parse_stamp(digits: &str) -> Option<NaiveDate> {
    let year = digits.get(0..4)?.parse().ok()?;
    let month = digits.get(4..6)?.parse().ok()?;
    let day = digits.get(6..8)?.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn locator() -> LogLocator {
        LogLocator::new("nginx-access-ui").unwrap()
    }

    #[test]
    fn test_select_newest() {
        let locator = LogLocator::new("a").unwrap();
        let log = locator
            .select(&["a.log-20160320", "a.log-20170320.gz", "a.log-20150101"])
            .unwrap();
        assert_eq!(log.name, "a.log-20170320.gz");
        assert_eq!(log.date_stamp(), "20170320");
        assert_eq!(log.compression, Compression::Gzip);
    }

    #[test]
    fn test_select_nothing() {
        let locator = locator();
        let empty: [&str; 0] = [];
        assert!(locator.select(&empty).is_none());
        assert!(locator.select(&["unrelated.txt"]).is_none());
    }

    #[test]
    fn test_non_matching_names_are_ignored() {
        let log = locator()
            .select(&[
                "nginx-access-ui.log-20170630",
                "nginx-access-ui.log-20190101.zip",
                "nginx-access-ui.log-2019010",
                "other.log-20200101",
                "nginx-access-ui.log-20180101.gz.bak",
                "xnginx-access-ui.log-20200101",
            ])
            .unwrap();
        assert_eq!(log.name, "nginx-access-ui.log-20170630");
        assert_eq!(log.compression, Compression::None);
    }

    #[test]
    fn test_prefix_is_literal() {
        // A regex metacharacter in the prefix must not match arbitrary text
        let log = locator().select(&["nginx-access-uiXlog-20200101", "nginx-access-ui.log-20170101"]);
        assert_eq!(log.unwrap().name, "nginx-access-ui.log-20170101");
    }

    #[test]
    fn test_only_ascii_digits_form_a_date() {
        // Arabic-Indic digits for 20170630
        let locator = locator();
        let arabic = "nginx-access-ui.log-\u{0662}\u{0660}\u{0661}\u{0667}\u{0660}\u{0666}\u{0663}\u{0660}";
        assert!(locator.select(&[arabic]).is_none());

        let log = locator
            .select(&[
                "nginx-access-ui.log-\u{0662}\u{0660}\u{0662}\u{0660}\u{0660}\u{0661}\u{0660}\u{0661}",
                "nginx-access-ui.log-20170630",
            ])
            .unwrap();
        assert_eq!(log.name, "nginx-access-ui.log-20170630");
    }

    #[test]
    fn test_invalid_date_falls_back_to_next_candidate() {
        let log = locator()
            .select(&[
                "nginx-access-ui.log-20171340",
                "nginx-access-ui.log-20170630.bz2",
            ])
            .unwrap();
        assert_eq!(log.name, "nginx-access-ui.log-20170630.bz2");
        assert_eq!(log.compression, Compression::Bzip2);
    }

    #[test]
    fn test_equal_dates_pick_smallest_name() {
        let names = [
            "nginx-access-ui.log-20170630.gz",
            "nginx-access-ui.log-20170630",
            "nginx-access-ui.log-20170630.bz2",
        ];
        let log = locator().select(&names).unwrap();
        assert_eq!(log.name, "nginx-access-ui.log-20170630");

        let mut reversed = names;
        reversed.reverse();
        assert_eq!(locator().select(&reversed).unwrap().name, log.name);
    }

    #[test]
    fn test_locate_missing_directory() {
        let dir = TempDir::new().unwrap();
        let err = locator().locate(&dir.path().join("missing")).unwrap_err();
        assert!(matches!(err, Error::DirectoryNotFound(_)));
    }

    #[test]
    fn test_locate_empty_directory() {
        let dir = TempDir::new().unwrap();
        assert!(locator().locate(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_locate_reads_directory() {
        let dir = TempDir::new().unwrap();
        for name in [
            "nginx-access-ui.log-20170629",
            "nginx-access-ui.log-20170630.gz",
            "notes.txt",
        ] {
            fs::write(dir.path().join(name), b"").unwrap();
        }

        let log = locator().locate(dir.path()).unwrap().unwrap();
        assert_eq!(log.name, "nginx-access-ui.log-20170630.gz");
        assert_eq!(log.report_date(), "2017.06.30");
    }
}
