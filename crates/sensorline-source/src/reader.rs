use std::io::{ErrorKind, Read};

use crate::error::{Result, SourceError};
use crate::traits::SampleSource;

/// Replays bytes from any `Read` stream (capture file, stdin, in-memory buffer).
///
/// Timeouts and `WouldBlock` are reported as "no data this tick"; a zero-length
/// read is end of stream.
pub struct ReaderSource<R> {
    inner: R,
    label: String,
}

impl<R: Read> ReaderSource<R> {
    /// Wrap a reader with a label used in diagnostics.
    pub fn new(inner: R, label: impl Into<String>) -> Self {
        Self {
            inner,
            label: label.into(),
        }
    }
}

impl<R: Read> SampleSource for ReaderSource<R> {
    fn poll(&mut self, buf: &mut [u8]) -> Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        loop {
            match self.inner.read(buf) {
                Ok(0) => return Err(SourceError::Closed),
                Ok(n) => return Ok(n),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if matches!(err.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {
                    return Ok(0)
                }
                Err(err) => return Err(SourceError::Io(err)),
            }
        }
    }

    fn describe(&self) -> String {
        self.label.clone()
    }
}

impl<R> std::fmt::Debug for ReaderSource<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReaderSource")
            .field("label", &self.label)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn reads_then_reports_closed() {
        let mut source = ReaderSource::new(Cursor::new(b"23.50 55.20;\n".to_vec()), "memory");
        let mut buf = [0u8; 64];

        let n = source.poll(&mut buf).unwrap();
        assert_eq!(&buf[..n], b"23.50 55.20;\n");

        let err = source.poll(&mut buf).unwrap_err();
        assert!(matches!(err, SourceError::Closed));
    }

    #[test]
    fn interrupted_read_retries() {
        let reader = ScriptedReader::new(vec![
            Err(ErrorKind::Interrupted),
            Ok(b"1 2;\n".to_vec()),
        ]);
        let mut source = ReaderSource::new(reader, "scripted");
        let mut buf = [0u8; 16];
        let n = source.poll(&mut buf).unwrap();
        assert_eq!(&buf[..n], b"1 2;\n");
    }

    #[test]
    fn timeout_is_no_data() {
        let reader = ScriptedReader::new(vec![
            Err(ErrorKind::TimedOut),
            Err(ErrorKind::WouldBlock),
            Ok(b"x".to_vec()),
        ]);
        let mut source = ReaderSource::new(reader, "scripted");
        let mut buf = [0u8; 16];
        assert_eq!(source.poll(&mut buf).unwrap(), 0);
        assert_eq!(source.poll(&mut buf).unwrap(), 0);
        assert_eq!(source.poll(&mut buf).unwrap(), 1);
    }

    #[test]
    fn other_errors_propagate() {
        let reader = ScriptedReader::new(vec![Err(ErrorKind::BrokenPipe)]);
        let mut source = ReaderSource::new(reader, "scripted");
        let mut buf = [0u8; 16];
        let err = source.poll(&mut buf).unwrap_err();
        assert!(matches!(err, SourceError::Io(e) if e.kind() == ErrorKind::BrokenPipe));
    }

    #[test]
    fn describe_uses_label() {
        let source = ReaderSource::new(Cursor::new(Vec::new()), "capture.log");
        assert_eq!(source.describe(), "capture.log");
    }

    struct ScriptedReader {
        steps: std::collections::VecDeque<std::result::Result<Vec<u8>, ErrorKind>>,
    }

    impl ScriptedReader {
        fn new(steps: Vec<std::result::Result<Vec<u8>, ErrorKind>>) -> Self {
            Self {
                steps: steps.into(),
            }
        }
    }

    impl Read for ScriptedReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            match self.steps.pop_front() {
                None => Ok(0),
                Some(Err(kind)) => Err(std::io::Error::from(kind)),
                Some(Ok(bytes)) => {
                    let n = bytes.len().min(buf.len());
                    buf[..n].copy_from_slice(&bytes[..n]);
                    Ok(n)
                }
            }
        }
    }
}
