//! Decode counters.

use core::fmt;

use flarm_proto::{DecodeError, Sentence};

/// Aggregated decode outcomes since the source was created.
///
/// Individual failures are only logged at debug level; these counters are
/// what gets reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeStats {
    /// Records seen by the decoder, including failures.
    pub records: u64,
    /// Records decoded into a known sentence.
    pub decoded: u64,
    /// Checksum-valid records with an unsupported tag.
    pub unknown: u64,
    /// Records that overflowed or were cut short.
    pub framing_errors: u64,
    pub checksum_errors: u64,
    /// Everything else: syntax and field errors.
    pub field_errors: u64,
}

impl DecodeStats {
    pub fn record(&mut self, outcome: &Result<Sentence, DecodeError>) {
        self.records += 1;
        match outcome {
            Ok(Sentence::Unknown(_)) => self.unknown += 1,
            Ok(_) => self.decoded += 1,
            Err(err) => self.record_error(err),
        }
    }

    pub fn record_error(&mut self, err: &DecodeError) {
        if err.is_framing() {
            self.framing_errors += 1;
        } else if err.is_checksum() {
            self.checksum_errors += 1;
        } else {
            self.field_errors += 1;
        }
    }

    #[must_use]
    pub fn errors(&self) -> u64 {
        self.framing_errors + self.checksum_errors + self.field_errors
    }

    /// Share of records that failed to decode, `0.0` when nothing was seen.
    #[must_use]
    pub fn garbled_ratio(&self) -> f64 {
        if self.records == 0 {
            return 0.0;
        }
        self.errors() as f64 / self.records as f64
    }
}

impl fmt::Display for DecodeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} records, {} decoded, {} unknown, {} framing, {} checksum, {} field errors",
            self.records,
            self.decoded,
            self.unknown,
            self.framing_errors,
            self.checksum_errors,
            self.field_errors
        )
    }
}
