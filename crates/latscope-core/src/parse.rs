use thiserror::Error;

/// Marker of the protocol token that follows the request URL.
const PROTOCOL_MARKER: &str = "HTTP";

/// One request extracted from an access log line.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRecord {
    pub url: String,
    /// Request time in seconds, finite and non-negative
    pub latency: f64,
    /// Response status, when the token after the protocol reads as one
    pub status: Option<u16>,
}

/// Why a line could not be turned into a record.
///
/// These are expected noise in real logs and are counted, not surfaced.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseFailure {
    #[error("line is not valid UTF-8")]
    InvalidUtf8,
    #[error("no request URL before the protocol token")]
    MissingUrl,
    #[error("line has no latency field")]
    MissingLatency,
    #[error("latency field is not a non-negative number")]
    InvalidLatency,
}

/// Parse a raw access log line.
///
/// The URL is the whitespace-delimited token right before `HTTP`, and the
/// latency is the last whitespace-delimited field of the line.
pub fn parse_line(line: &[u8]) -> Result<ParsedRecord, ParseFailure> {
    let line = std::str::from_utf8(line).map_err(|_| ParseFailure::InvalidUtf8)?;

    let marker = line.find(PROTOCOL_MARKER).ok_or(ParseFailure::MissingUrl)?;
    let url = line[..marker]
        .split_whitespace()
        .next_back()
        .ok_or(ParseFailure::MissingUrl)?;

    let latency = line
        .split_whitespace()
        .next_back()
        .ok_or(ParseFailure::MissingLatency)?
        .parse::<f64>()
        .map_err(|_| ParseFailure::InvalidLatency)?;
    if !latency.is_finite() || latency < 0.0 {
        return Err(ParseFailure::InvalidLatency);
    }

    let status = status_after(&line[marker..]);

    Ok(ParsedRecord {
        url: url.to_string(),
        latency,
        status,
    })
}

/// Read only the response status of a raw line, the token after the
/// protocol token.
pub fn parse_status(line: &[u8]) -> Option<u16> {
    let line = std::str::from_utf8(line).ok()?;
    let marker = line.find(PROTOCOL_MARKER)?;
    status_after(&line[marker..])
}

fn status_after(protocol: &str) -> Option<u16> {
    protocol
        .split_whitespace()
        .nth(1)
        .and_then(|token| token.parse::<u16>().ok())
}
