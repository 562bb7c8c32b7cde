use bytes::{Buf, BytesMut};

use crate::codec::{decode_line, RawLine, LINE_TERMINATOR};
use crate::error::FramingError;

const INITIAL_BUFFER_CAPACITY: usize = 256;

/// Configuration for the line framer.
#[derive(Debug, Clone, Default)]
pub struct FramerConfig {
    /// Maximum line length in bytes, terminator excluded.
    ///
    /// `None` (the default) buffers without limit.
    pub max_line_length: Option<usize>,
}

/// Splits an arbitrary chunked byte stream into terminator-delimited lines.
///
/// Any trailing partial line is kept for the next [`feed`](Self::feed), so the
/// lines produced do not depend on how the stream was chunked.
#[derive(Debug)]
pub struct LineFramer {
    buf: BytesMut,
    config: FramerConfig,
    discarding: bool,
}

impl Default for LineFramer {
    fn default() -> Self {
        Self::new()
    }
}

impl LineFramer {
    /// Create a framer with default configuration.
    pub fn new() -> Self {
        Self::with_config(FramerConfig::default())
    }

    /// Create a framer with explicit configuration.
    pub fn with_config(config: FramerConfig) -> Self {
        Self {
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            config,
            discarding: false,
        }
    }

    /// Append `chunk` and iterate over every line completed so far.
    ///
    /// The iterator is lazy: lines not pulled before it is dropped stay
    /// buffered and come out of the next call.
    pub fn feed(&mut self, chunk: &[u8]) -> Lines<'_> {
        self.buf.extend_from_slice(chunk);
        Lines { framer: self }
    }

    /// Number of buffered bytes not yet returned as a line.
    pub fn pending(&self) -> usize {
        self.buf.len()
    }

    /// Take the unterminated tail, leaving the framer empty.
    pub fn take_remainder(&mut self) -> Option<RawLine> {
        if self.discarding {
            self.discarding = false;
            self.buf.clear();
            return None;
        }
        if self.buf.is_empty() {
            return None;
        }
        Some(RawLine::new(self.buf.split().freeze()))
    }

    fn next_line(&mut self) -> Option<Result<RawLine, FramingError>> {
        if self.discarding {
            // Skip the rest of an overlong line up to its terminator.
            match self.buf.iter().position(|&b| b == LINE_TERMINATOR) {
                Some(pos) => {
                    self.buf.advance(pos + 1);
                    self.discarding = false;
                }
                None => {
                    self.buf.clear();
                    return None;
                }
            }
        }

        if let Some(line) = decode_line(&mut self.buf) {
            if let Some(max) = self.config.max_line_length {
                if line.len() > max {
                    tracing::debug!(size = line.len(), max, "discarding overlong line");
                    return Some(Err(FramingError::LineTooLong {
                        size: line.len(),
                        max,
                    }));
                }
            }
            return Some(Ok(line));
        }

        if let Some(max) = self.config.max_line_length {
            if self.buf.len() > max {
                let size = self.buf.len();
                tracing::debug!(
                    size,
                    max,
                    "line exceeded limit before its terminator; skipping to next line"
                );
                self.buf.clear();
                self.discarding = true;
                return Some(Err(FramingError::LineTooLong { size, max }));
            }
        }

        None
    }
}

/// Lines completed by a [`LineFramer::feed`] call.
pub struct Lines<'a> {
    framer: &'a mut LineFramer,
}

impl Iterator for Lines<'_> {
    type Item = Result<RawLine, FramingError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.framer.next_line()
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn collect(framer: &mut LineFramer, chunk: &[u8]) -> Vec<Vec<u8>> {
        framer
            .feed(chunk)
            .map(|line| line.unwrap().as_bytes().to_vec())
            .collect()
    }

    // Lines as bytes, overlong lines as `None`. The reported size of an
    // overlong line depends on chunking and is left out.
    fn outcomes(framer: &mut LineFramer, chunk: &[u8]) -> Vec<Option<Vec<u8>>> {
        framer
            .feed(chunk)
            .map(|line| line.ok().map(|l| l.as_bytes().to_vec()))
            .collect()
    }

    #[test]
    fn overlong_size_is_bytes_seen_when_limit_tripped() {
        let config = FramerConfig {
            max_line_length: Some(8),
        };

        let mut whole = LineFramer::with_config(config.clone());
        let results: Vec<_> = whole.feed(b"0123456789\nab\n").collect();
        assert_eq!(results[0], Err(FramingError::LineTooLong { size: 10, max: 8 }));
        assert_eq!(results[1].as_ref().unwrap().as_bytes(), b"ab");

        let mut split = LineFramer::with_config(config);
        let mut results: Vec<_> = split.feed(b"012345678").collect();
        results.extend(split.feed(b"9\nab\n"));
        assert_eq!(results[0], Err(FramingError::LineTooLong { size: 9, max: 8 }));
        assert_eq!(results[1].as_ref().unwrap().as_bytes(), b"ab");
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn single_complete_line() {
        let mut framer = LineFramer::new();
        let lines = collect(&mut framer, b"23.50 55.20;\n");
        assert_eq!(lines, vec![b"23.50 55.20;".to_vec()]);
        assert_eq!(framer.pending(), 0);
    }

    #[test]
    fn partial_line_is_retained() {
        let mut framer = LineFramer::new();
        assert!(collect(&mut framer, b"23.5").is_empty());
        assert_eq!(framer.pending(), 4);

        let lines = collect(&mut framer, b"0 55.20;\n21");
        assert_eq!(lines, vec![b"23.50 55.20;".to_vec()]);
        assert_eq!(framer.pending(), 2);
    }

    #[test]
    fn byte_by_byte_feed() {
        let mut framer = LineFramer::new();
        let mut lines = Vec::new();
        for b in b"1 2;\n3 4;\n" {
            lines.extend(collect(&mut framer, std::slice::from_ref(b)));
        }
        assert_eq!(lines, vec![b"1 2;".to_vec(), b"3 4;".to_vec()]);
    }

    #[test]
    fn dropped_iterator_keeps_remaining_lines() {
        let mut framer = LineFramer::new();
        let first = framer.feed(b"a\nb\nc\n").next().unwrap().unwrap();
        assert_eq!(first.as_bytes(), b"a");

        let rest = collect(&mut framer, b"");
        assert_eq!(rest, vec![b"b".to_vec(), b"c".to_vec()]);
    }

    #[test]
    fn carriage_return_is_kept_for_the_parser() {
        let mut framer = LineFramer::new();
        let lines = collect(&mut framer, b"1 2;\r\n");
        assert_eq!(lines, vec![b"1 2;\r".to_vec()]);
    }

    #[test]
    fn take_remainder_returns_tail() {
        let mut framer = LineFramer::new();
        assert!(collect(&mut framer, b"1 2;\n3 4").len() == 1);
        let tail = framer.take_remainder().unwrap();
        assert_eq!(tail.as_bytes(), b"3 4");
        assert_eq!(framer.pending(), 0);
        assert!(framer.take_remainder().is_none());
    }

    #[test]
    fn unbounded_by_default() {
        let mut framer = LineFramer::new();
        let long = vec![b'9'; 64 * 1024];
        assert!(collect(&mut framer, &long).is_empty());
        assert_eq!(framer.pending(), long.len());
        let lines = collect(&mut framer, b"\n");
        assert_eq!(lines[0].len(), long.len());
    }

    #[test]
    fn overlong_partial_line_is_discarded() {
        let mut framer = LineFramer::with_config(FramerConfig {
            max_line_length: Some(8),
        });

        let results: Vec<_> = framer.feed(b"0123456789").collect();
        assert_eq!(
            results,
            vec![Err(FramingError::LineTooLong { size: 10, max: 8 })]
        );

        // The rest of the overlong line is skipped; the next line survives.
        let lines = collect(&mut framer, b"abc\n1 2;\n");
        assert_eq!(lines, vec![b"1 2;".to_vec()]);
    }

    #[test]
    fn overlong_complete_line_is_rejected() {
        let mut framer = LineFramer::with_config(FramerConfig {
            max_line_length: Some(4),
        });
        let results: Vec<_> = framer.feed(b"123456\n1 2;\n").collect();
        assert_eq!(results.len(), 2);
        assert_eq!(
            results[0],
            Err(FramingError::LineTooLong { size: 6, max: 4 })
        );
        assert_eq!(results[1].as_ref().unwrap().as_bytes(), b"1 2;");
    }

    proptest! {
        #[test]
        fn chunk_boundaries_do_not_change_lines(
            stream in proptest::collection::vec(
                prop_oneof![Just(b'\n'), Just(b';'), Just(b' '), b'0'..=b'9'],
                0..256,
            ),
            cuts in proptest::collection::vec(0usize..256, 0..16),
        ) {
            let mut whole = LineFramer::new();
            let expected = collect(&mut whole, &stream);

            let mut cuts: Vec<usize> = cuts.into_iter().map(|c| c.min(stream.len())).collect();
            cuts.sort_unstable();

            let mut chunked = LineFramer::new();
            let mut actual = Vec::new();
            let mut start = 0;
            for cut in cuts.into_iter().chain(std::iter::once(stream.len())) {
                actual.extend(collect(&mut chunked, &stream[start..cut]));
                start = cut;
            }

            prop_assert_eq!(expected, actual);
            prop_assert_eq!(whole.pending(), chunked.pending());
        }

        #[test]
        fn chunk_boundaries_do_not_change_limited_outcomes(
            stream in proptest::collection::vec(
                prop_oneof![Just(b'\n'), Just(b';'), Just(b' '), b'0'..=b'9'],
                0..256,
            ),
            cuts in proptest::collection::vec(0usize..256, 0..16),
            max in 1usize..16,
        ) {
            let config = FramerConfig { max_line_length: Some(max) };

            let mut whole = LineFramer::with_config(config.clone());
            let expected = outcomes(&mut whole, &stream);

            let mut cuts: Vec<usize> = cuts.into_iter().map(|c| c.min(stream.len())).collect();
            cuts.sort_unstable();

            let mut chunked = LineFramer::with_config(config);
            let mut actual = Vec::new();
            let mut start = 0;
            for cut in cuts.into_iter().chain(std::iter::once(stream.len())) {
                actual.extend(outcomes(&mut chunked, &stream[start..cut]));
                start = cut;
            }

            prop_assert_eq!(expected, actual);
        }
    }
}
