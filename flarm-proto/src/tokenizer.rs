//! Splits a raw byte stream into candidate sentence records.
//!
//! A record starts at `$` and ends at CR or LF. Bytes between records are
//! dropped. Because the tokenizer works one byte at a time, the records it
//! produces do not depend on how the stream was chunked.

use heapless::Vec;

use crate::error::DecodeError;

/// Maximum record length, from `$` to the last checksum digit.
pub const MAX_SENTENCE_LENGTH: usize = 128;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Waiting for `$`.
    Idle,
    /// Inside a record.
    Collecting,
    /// Skipping the rest of an oversized record.
    Discarding,
}

/// Incremental record splitter.
///
/// # Example
///
/// ```
/// use flarm_proto::SentenceTokenizer;
///
/// let mut tokenizer = SentenceTokenizer::new();
/// let mut records = 0;
/// tokenizer.feed(b"$PFLAE,A,0,0*33\r\n$PGRMZ,", |r| {
///     assert!(r.is_ok());
///     records += 1;
/// });
/// assert_eq!(records, 1);
/// ```
#[derive(Debug, Clone)]
pub struct SentenceTokenizer {
    buffer: Vec<u8, MAX_SENTENCE_LENGTH>,
    state: State,
}

impl Default for SentenceTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl SentenceTokenizer {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            buffer: Vec::new(),
            state: State::Idle,
        }
    }

    /// Push one byte.
    ///
    /// Returns a complete record (terminator excluded), a framing error, or
    /// `None` if more input is needed.
    pub fn push_byte(&mut self, byte: u8) -> Option<Result<&[u8], DecodeError>> {
        match byte {
            b'$' => {
                let previous = self.state;
                self.start_record();
                // The partial record was overrun by a new sentence start.
                (previous == State::Collecting).then_some(Err(DecodeError::Truncated))
            }
            b'\r' | b'\n' => match self.state {
                State::Collecting => {
                    self.state = State::Idle;
                    Some(Ok(self.buffer.as_slice()))
                }
                State::Discarding => {
                    self.state = State::Idle;
                    None
                }
                State::Idle => None,
            },
            _ => match self.state {
                State::Collecting => {
                    if self.buffer.push(byte).is_err() {
                        self.buffer.clear();
                        self.state = State::Discarding;
                        Some(Err(DecodeError::TooLong))
                    } else {
                        None
                    }
                }
                State::Idle | State::Discarding => None,
            },
        }
    }

    /// Push a chunk, calling `f` for every record or framing error.
    pub fn feed<F>(&mut self, chunk: &[u8], mut f: F)
    where
        F: FnMut(Result<&[u8], DecodeError>),
    {
        for &byte in chunk {
            if let Some(result) = self.push_byte(byte) {
                f(result);
            }
        }
    }

    /// Drop any partial record.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.state = State::Idle;
    }

    /// Whether a partial record is buffered.
    #[inline]
    #[must_use]
    pub fn is_collecting(&self) -> bool {
        self.state == State::Collecting
    }

    fn start_record(&mut self) {
        self.buffer.clear();
        // Capacity is never zero, so the first byte always fits.
        let _ = self.buffer.push(b'$');
        self.state = State::Collecting;
    }
}

#[cfg(test)]
mod tests {
    extern crate std;
    use std::string::String;
    use std::vec::Vec;

    use super::*;

    fn collect(tokenizer: &mut SentenceTokenizer, input: &[u8]) -> Vec<Result<String, DecodeError>> {
        let mut out = Vec::new();
        tokenizer.feed(input, |r| {
            out.push(r.map(|rec| String::from_utf8_lossy(rec).into_owned()));
        });
        out
    }

    #[test]
    fn test_splits_on_crlf() {
        let mut t = SentenceTokenizer::new();
        let out = collect(&mut t, b"$PFLAE,A,0,0*33\r\n$PGRMZ,2282,F,2*00\n");
        assert_eq!(
            out,
            [
                Ok(String::from("$PFLAE,A,0,0*33")),
                Ok(String::from("$PGRMZ,2282,F,2*00"))
            ]
        );
    }

    #[test]
    fn test_garbage_between_records_is_dropped() {
        let mut t = SentenceTokenizer::new();
        let out = collect(&mut t, b"xx\x00\xff junk\r\n$PFLAE,A,0,0*33\r\nmore");
        assert_eq!(out, [Ok(String::from("$PFLAE,A,0,0*33"))]);
    }

    #[test]
    fn test_dollar_inside_record_truncates() {
        let mut t = SentenceTokenizer::new();
        let out = collect(&mut t, b"$PFLAU,3,1$PFLAE,A,0,0*33\n");
        assert_eq!(
            out,
            [Err(DecodeError::Truncated), Ok(String::from("$PFLAE,A,0,0*33"))]
        );
    }

    #[test]
    fn test_partial_record_carried_across_chunks() {
        let mut t = SentenceTokenizer::new();
        assert!(collect(&mut t, b"$PFLAE,A").is_empty());
        assert!(t.is_collecting());
        let out = collect(&mut t, b",0,0*33\r\n");
        assert_eq!(out, [Ok(String::from("$PFLAE,A,0,0*33"))]);
    }

    #[test]
    fn test_too_long_record_is_discarded() {
        let mut t = SentenceTokenizer::new();
        let mut input = Vec::from(&b"$PFLAA,"[..]);
        input.extend(core::iter::repeat(b'1').take(MAX_SENTENCE_LENGTH * 2));
        input.extend_from_slice(b"\r\n$PFLAE,A,0,0*33\r\n");

        let out = collect(&mut t, &input);
        assert_eq!(
            out,
            [Err(DecodeError::TooLong), Ok(String::from("$PFLAE,A,0,0*33"))]
        );
    }

    #[test]
    fn test_record_at_max_length_is_kept() {
        let mut t = SentenceTokenizer::new();
        let mut input = Vec::from(&b"$"[..]);
        input.extend(core::iter::repeat(b'A').take(MAX_SENTENCE_LENGTH - 1));
        input.push(b'\n');
        let out = collect(&mut t, &input);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].as_ref().map(String::len), Ok(MAX_SENTENCE_LENGTH));
    }

    #[test]
    fn test_reset_drops_partial_record() {
        let mut t = SentenceTokenizer::new();
        assert!(collect(&mut t, b"$PFLAE,A,0").is_empty());
        t.reset();
        assert!(!t.is_collecting());
        // The tail of the old record is now garbage.
        let out = collect(&mut t, b",0*33\r\n$PFLAE,A,0,0*33\n");
        assert_eq!(out, [Ok(String::from("$PFLAE,A,0,0*33"))]);
    }

    #[test]
    fn test_empty_lines_produce_nothing() {
        let mut t = SentenceTokenizer::new();
        assert!(collect(&mut t, b"\r\n\r\n\n").is_empty());
    }
}
