use super::{Compression, LogDescriptor};
use crate::Result;
use bzip2::read::MultiBzDecoder;
use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader, Read, Split};
use std::path::Path;

/// Raw lines of a log file, decompressed and read lazily in file order.
///
/// The stream cannot be rewound; reading the log again means opening it
/// again.
pub struct LogStream {
    lines: Split<Box<dyn BufRead>>,
}

impl LogStream {
    /// Open the log described by `log` inside `dir`
    pub fn open(dir: &Path, log: &LogDescriptor) -> Result<Self> {
        let path = dir.join(&log.name);
        tracing::debug!(
            "Opening log file {} ({:?} compression)",
            path.display(),
            log.compression
        );

        let file = File::open(&path)?;
        Ok(Self::from_reader(file, log.compression))
    }

    /// Wrap any byte source, decompressing it as requested
    pub fn from_reader<R: Read + 'static>(reader: R, compression: Compression) -> Self {
        let source: Box<dyn BufRead> = match compression {
            Compression::None => Box::new(BufReader::new(reader)),
            Compression::Gzip => Box::new(BufReader::new(MultiGzDecoder::new(reader))),
            Compression::Bzip2 => Box::new(BufReader::new(MultiBzDecoder::new(reader))),
        };
        Self {
            lines: source.split(b'\n'),
        }
    }
}

impl Iterator for LogStream {
    type Item = Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.lines.next().map(|line| {
            line.map(|mut bytes| {
                if bytes.last() == Some(&b'\r') {
                    bytes.pop();
                }
                bytes
            })
            .map_err(Into::into)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};

    fn collect(stream: LogStream) -> Vec<Vec<u8>> {
        stream.map(|line| line.unwrap()).collect()
    }

    #[test]
    fn test_plain_lines() {
        let stream =
            LogStream::from_reader(Cursor::new(b"one\r\ntwo\nthree".to_vec()), Compression::None);
        assert_eq!(
            collect(stream),
            vec![b"one".to_vec(), b"two".to_vec(), b"three".to_vec()]
        );
    }

    #[test]
    fn test_gzip_lines() {
        let mut encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(b"first\nsecond\n").unwrap();
        let bytes = encoder.finish().unwrap();

        let stream = LogStream::from_reader(Cursor::new(bytes), Compression::Gzip);
        assert_eq!(collect(stream), vec![b"first".to_vec(), b"second".to_vec()]);
    }

    #[test]
    fn test_bzip2_lines() {
        let mut encoder = bzip2::write::BzEncoder::new(Vec::new(), bzip2::Compression::default());
        encoder.write_all(b"first\nsecond\n").unwrap();
        let bytes = encoder.finish().unwrap();

        let stream = LogStream::from_reader(Cursor::new(bytes), Compression::Bzip2);
        assert_eq!(collect(stream), vec![b"first".to_vec(), b"second".to_vec()]);
    }

    #[test]
    fn test_corrupt_gzip_is_an_error() {
        let mut stream =
            LogStream::from_reader(Cursor::new(b"not gzip at all".to_vec()), Compression::Gzip);
        assert!(matches!(stream.next(), Some(Err(_))));
    }
}
