use crate::filter::StatusFilter;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Settings for a single report run.
///
/// Built once at startup and only ever borrowed by the pipeline stages.
/// Keys in the JSON file are upper-case; any key left out keeps its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Maximum number of URLs in the report.
    #[serde(rename = "REPORT_SIZE")]
    pub report_size: usize,
    #[serde(rename = "REPORT_DIR")]
    pub report_dir: PathBuf,
    #[serde(rename = "LOG_DIR")]
    pub log_dir: PathBuf,
    /// Percentage of failed lines at which the input is rejected.
    #[serde(rename = "TOTAL_FAILS")]
    pub total_fails: u8,
    /// File name prefix of rotated logs, before `.log-YYYYMMDD`.
    #[serde(rename = "LOG_PREFIX")]
    pub log_prefix: String,
    #[serde(rename = "REPORT_TEMPLATE")]
    pub report_template: PathBuf,
    #[serde(rename = "HTTP_CODE_SERIES", skip_serializing_if = "Option::is_none")]
    pub http_code_series: Option<String>,
    #[serde(rename = "LOG_FILE", skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
    #[serde(rename = "LOG_LEVEL")]
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            report_size: 1000,
            report_dir: PathBuf::from("./reports"),
            log_dir: PathBuf::from("./log"),
            total_fails: 51,
            log_prefix: "nginx-access-ui".to_string(),
            report_template: PathBuf::from("./report.html"),
            http_code_series: None,
            log_file: None,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load a configuration file and merge it over the defaults.
    ///
    /// An empty file is accepted and yields the defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        match Self::read(path)? {
            Some(config) => Ok(config),
            None => {
                tracing::warn!(
                    "Configuration file {} is empty, using defaults",
                    path.display()
                );
                Ok(Self::default())
            }
        }
    }

    /// Load a configuration file, returning `None` when the file is empty.
    ///
    /// Lets callers that set up logging from the configuration report the
    /// empty file once their subscriber is installed.
    pub fn read(path: &Path) -> Result<Option<Self>> {
        tracing::debug!("Reading configuration from: {}", path.display());

        let content = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!(
                "configuration file {} could not be read: {}",
                path.display(),
                e
            ))
        })?;

        if content.trim().is_empty() {
            return Ok(None);
        }

        Self::from_str(&content).map(Some)
    }

    /// Parse a configuration from a JSON string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(content).map_err(Error::ConfigParse)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.report_size == 0 {
            return Err(Error::Config("REPORT_SIZE must be positive".to_string()));
        }
        if self.total_fails > 100 {
            return Err(Error::Config(format!(
                "TOTAL_FAILS must be between 0 and 100, got {}",
                self.total_fails
            )));
        }
        if self.log_prefix.is_empty() {
            return Err(Error::Config("LOG_PREFIX must not be empty".to_string()));
        }
        self.status_filter()?;
        Ok(())
    }

    /// The status filter named by `HTTP_CODE_SERIES`, if any.
    pub fn status_filter(&self) -> Result<Option<StatusFilter>> {
        self.http_code_series
            .as_deref()
            .map(StatusFilter::parse)
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = Config::from_str(r#"{"REPORT_SIZE": 10, "LOG_DIR": "/var/log/nginx"}"#)
            .unwrap();
        assert_eq!(config.report_size, 10);
        assert_eq!(config.log_dir, PathBuf::from("/var/log/nginx"));
        assert_eq!(config.total_fails, 51);
        assert_eq!(config.report_dir, PathBuf::from("./reports"));
        assert_eq!(config.log_prefix, "nginx-access-ui");
        assert!(config.http_code_series.is_none());
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let config = Config::from_str(r#"{"SOMETHING_ELSE": true}"#).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_rejects_zero_report_size() {
        let err = Config::from_str(r#"{"REPORT_SIZE": 0}"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_rejects_threshold_over_100() {
        let err = Config::from_str(r#"{"TOTAL_FAILS": 101}"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_rejects_bad_status_series() {
        let err = Config::from_str(r#"{"HTTP_CODE_SERIES": "20"}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidPattern(_)));
    }

    #[test]
    fn test_malformed_json() {
        let err = Config::from_str("{not json").unwrap_err();
        assert!(matches!(err, Error::ConfigParse(_)));
    }

    #[test]
    fn test_empty_file_yields_defaults() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_read_reports_empty_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "  ").unwrap();
        assert_eq!(Config::read(file.path()).unwrap(), None);
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"HTTP_CODE_SERIES": "2", "TOTAL_FAILS": 20}}"#).unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.total_fails, 20);
        assert_eq!(
            config.status_filter().unwrap(),
            Some(StatusFilter::Range(200, 299))
        );
    }

    #[test]
    fn test_missing_file() {
        let err = Config::from_file(Path::new("/nonexistent/latscope.json")).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
