//! Error types for decoding and encoding sentences.

use crate::tokenizer::MAX_SENTENCE_LENGTH;

/// Reason a candidate record was rejected.
///
/// Field indices count data fields after the sentence tag, starting at 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError {
    /// Record contains no bytes.
    #[error("empty record")]
    Empty,
    /// Record does not start with `$`.
    #[error("record does not start with '$'")]
    MissingStart,
    /// No `*` delimiter in front of the checksum.
    #[error("record has no checksum")]
    MissingChecksum,
    /// Checksum is not exactly two hex digits.
    #[error("malformed checksum")]
    MalformedChecksum,
    /// Checksum does not match the payload.
    #[error("checksum mismatch: computed {computed:02X}, received {received:02X}")]
    ChecksumMismatch { computed: u8, received: u8 },
    /// Payload contains bytes outside printable ASCII.
    #[error("record contains non-ASCII bytes")]
    NonAscii,
    /// Sentence tag is empty or too long.
    #[error("invalid sentence tag")]
    InvalidTag,
    /// A mandatory field is absent or empty.
    #[error("field {0} is missing")]
    MissingField(u8),
    /// A field could not be parsed.
    #[error("field {0} is malformed")]
    InvalidField(u8),
    /// A field parsed but holds a value outside its legal range.
    #[error("field {0} is out of range")]
    OutOfRange(u8),
    /// Record exceeded the maximum sentence length and was discarded.
    #[error("record exceeds {} bytes", MAX_SENTENCE_LENGTH)]
    TooLong,
    /// Record was cut short by the start of the next sentence.
    #[error("record truncated by the start of another sentence")]
    Truncated,
}

impl DecodeError {
    /// Whether the error was raised while framing the byte stream, before
    /// any validation of the record content.
    #[inline]
    #[must_use]
    pub const fn is_framing(&self) -> bool {
        matches!(self, Self::TooLong | Self::Truncated)
    }

    /// Whether the error was raised by checksum validation.
    #[inline]
    #[must_use]
    pub const fn is_checksum(&self) -> bool {
        matches!(
            self,
            Self::MissingChecksum | Self::MalformedChecksum | Self::ChecksumMismatch { .. }
        )
    }
}

/// Error type for encoding operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EncodeError {
    /// The sentence does not fit into the output buffer.
    #[error("sentence does not fit into the output buffer")]
    BufferTooSmall,
    /// A text field contains a reserved character (`,`, `*`, `$` or a line break).
    #[error("text field contains a reserved character")]
    ReservedCharacter,
    /// Unknown sentences carry no field data and cannot be re-encoded.
    #[error("unknown sentences cannot be encoded")]
    UnknownSentence,
}
