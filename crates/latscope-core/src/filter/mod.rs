/// Status filter for HTTP status codes
///
/// Restricts aggregation to one series of response codes. Lines whose status
/// falls outside the series are skipped entirely rather than counted as
/// parse failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusFilter {
    /// Exact status code (e.g., 404)
    Exact(u16),
    /// Status code range, inclusive (e.g., 200-299 for "2" or "2xx")
    Range(u16, u16),
}

impl StatusFilter {
    /// Parse a status filter pattern
    ///
    /// Supports:
    /// - Series digit: "2", "5"
    /// - Range shorthand: "2xx", "4xx", "5xx"
    /// - Explicit range: "200-299", "500-599"
    /// - Exact: "404", "200"
    pub fn parse(pattern: &str) -> crate::Result<Self> {
        let pattern = pattern.trim();

        // Handle "2", "4", etc.
        if pattern.len() == 1 {
            return series(pattern)
                .map(|start| StatusFilter::Range(start, start + 99))
                .ok_or_else(|| {
                    crate::Error::InvalidPattern(format!("Invalid status series: {}", pattern))
                });
        }

        // Handle "2xx", "4xx", etc.
        if pattern.len() == 3 && pattern.ends_with("xx") {
            if let Some(start) = series(&pattern[..1]) {
                return Ok(StatusFilter::Range(start, start + 99));
            }
        }

        // Handle explicit range "200-299"
        if let Some((start_str, end_str)) = pattern.split_once('-') {
            let start = status_code(start_str).ok_or_else(|| {
                crate::Error::InvalidPattern(format!("Invalid status range start: {}", start_str))
            })?;
            let end = status_code(end_str).ok_or_else(|| {
                crate::Error::InvalidPattern(format!("Invalid status range end: {}", end_str))
            })?;
            if start > end {
                return Err(crate::Error::InvalidPattern(format!(
                    "Empty status range: {}",
                    pattern
                )));
            }
            return Ok(StatusFilter::Range(start, end));
        }

        // Handle exact status code
        let code = status_code(pattern).ok_or_else(|| {
            crate::Error::InvalidPattern(format!("Invalid status code: {}", pattern))
        })?;
        Ok(StatusFilter::Exact(code))
    }

    /// Check if a status code matches this filter
    pub fn matches(&self, status: u16) -> bool {
        match self {
            StatusFilter::Exact(code) => status == *code,
            StatusFilter::Range(start, end) => status >= *start && status <= *end,
        }
    }
}

/// First code of the series named by a single digit 1-5.
fn series(digit: &str) -> Option<u16> {
    match digit.parse::<u16>() {
        Ok(d @ 1..=5) => Some(d * 100),
        _ => None,
    }
}

fn status_code(s: &str) -> Option<u16> {
    let s = s.trim();
    if s.len() != 3 {
        return None;
    }
    s.parse::<u16>().ok().filter(|code| (100..=599).contains(code))
}
