//! FLARM data port sentences: tokenizing, decoding and encoding.
//!
//! This crate turns the byte stream of a FLARM-class traffic receiver into
//! typed messages:
//!
//! - **Tokenizing**: [`SentenceTokenizer`] splits bytes into `$...` records,
//!   independent of how the stream was chunked.
//! - **Decoding**: [`decode()`] validates framing and checksum and parses
//!   the record into a wire-level [`Sentence`].
//! - **Messages**: [`Sentence::messages()`] converts a sentence into
//!   [`FlarmMessage`]s in canonical units (meters, meters per second,
//!   degrees).
//! - **Encoding**: [`Sentence::encode()`] writes a sentence back out,
//!   byte-identical to what was decoded.
//!
//! # Sentences
//!
//! ```text
//! $PFLAU,<RX>,<TX>,<GPS>,<Power>,<AlarmLevel>,<RelativeBearing>,<AlarmType>,<RelativeVertical>,<RelativeDistance>[,<ID>]*hh
//! $PFLAA,<AlarmLevel>,<RelativeNorth>,<RelativeEast>,<RelativeVertical>,<IDType>,<ID>,<Track>,<TurnRate>,<GroundSpeed>,<ClimbRate>,<AcftType>[,<NoTrack>]*hh
//! $xxRMC,<time>,<status>,<lat>,<N/S>,<lon>,<E/W>,<knots>,<course>,<date>,<magvar>,<E/W>[,<mode>]*hh
//! $xxGGA,<time>,<lat>,<N/S>,<lon>,<E/W>,<quality>,<sats>,<hdop>,<alt>,M,<geoid>,M,<age>,<station>*hh
//! $PGRMZ,<altitude>,<F/M>,<fix>*hh
//! $PFLAV,<A/R>,<HwVersion>,<SwVersion>[,<ObstVersion>]*hh
//! $PFLAE,<A/R>,<Severity>,<ErrorCode>[,<Message>]*hh
//! ```
//!
//! `hh` is the XOR of all bytes between `$` and `*` as two hex digits.
//! Any other tag with valid framing decodes to [`Sentence::Unknown`].
//!
//! # Example
//!
//! ```
//! use flarm_proto::{decode, FlarmMessage, SentenceTokenizer};
//!
//! let mut tokenizer = SentenceTokenizer::new();
//! let mut altitudes = 0;
//! tokenizer.feed(b"$PGRMZ,2282,F,2*00\r\n", |record| {
//!     let sentence = decode(record.unwrap()).unwrap();
//!     for message in sentence.messages() {
//!         if let FlarmMessage::BarometricAltitude(alt) = message {
//!             assert!(alt.meters() > 695.0);
//!             altitudes += 1;
//!         }
//!     }
//! });
//! assert_eq!(altitudes, 1);
//! ```
//!
//! # Features
//!
//! - **`std`**: Enable standard library support (for host testing)
//! - **`defmt`**: Enable defmt formatting (for embedded logging)

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

pub mod checksum;
pub mod decimal;
pub mod decoder;
pub mod encode;
pub mod error;
mod field;
pub mod message;
pub mod sentence;
pub mod tokenizer;
pub mod types;
pub mod units;

pub use checksum::calculate_checksum;
pub use decimal::{Decimal, DecimalError};
pub use decoder::decode;
pub use encode::{SentenceBuf, ENCODED_CAPACITY};
pub use error::{DecodeError, EncodeError};
pub use message::{
    FixAltitude, FlarmMessage, Heartbeat, Messages, Position, SelfTest, TrafficWithPosition,
    TrafficWithoutPosition,
};
pub use sentence::{AltitudeUnit, Gga, Pflaa, Pflae, Pflau, Pflav, Pgrmz, QueryType, Rmc, Sentence, Tag};
pub use tokenizer::{SentenceTokenizer, MAX_SENTENCE_LENGTH};
pub use types::{
    AircraftType, AlarmLevel, AlarmType, Date, GpsStatus, IdType, Latitude, Longitude, Severity,
    TargetId, Text, UtcTime,
};
pub use units::{Distance, Speed};

#[cfg(test)]
mod tests {
    extern crate std;
    use std::vec::Vec;

    use super::*;

    const STREAM: &[u8] = b"$PFLAU,3,1,2,1,0,,0,,*63\r\n\
        $GPRMC,123519,A,4807.038,N,01131.000,E,022.4,084.4,230394,003.1,W*6A\r\n\
        garbage\r\n\
        $PFLAA,0,-1234,1234,220,2,DD8F12,180,,30,-1.4,1*19\r\n\
        $INVALID*00\r\n\
        $PGRMZ,2282,F,2*00\r\n\
        $PFLAV,A,1.10,7.20,OBST-2024-03*04\r\n\
        $PFLAE,A,3,21*03\r\n";

    fn run(chunks: &[&[u8]]) -> Vec<Result<FlarmMessage, DecodeError>> {
        let mut tokenizer = SentenceTokenizer::new();
        let mut out = Vec::new();
        for chunk in chunks {
            tokenizer.feed(chunk, |record| match record.and_then(decode) {
                Ok(sentence) => out.extend(sentence.messages().into_iter().map(Ok)),
                Err(e) => out.push(Err(e)),
            });
        }
        out
    }

    #[test]
    fn test_chunk_boundary_invariance() {
        let whole = run(&[STREAM]);
        assert_eq!(whole.iter().filter(|r| r.is_err()).count(), 1);
        assert_eq!(whole.len(), 9);

        for split in 1..STREAM.len() {
            let (a, b) = STREAM.split_at(split);
            assert_eq!(run(&[a, b]), whole, "split at {split}");
        }

        let bytes: Vec<&[u8]> = STREAM.chunks(1).collect();
        assert_eq!(run(&bytes), whole);

        let sevens: Vec<&[u8]> = STREAM.chunks(7).collect();
        assert_eq!(run(&sevens), whole);
    }

    #[test]
    fn test_invalid_record_does_not_block_neighbours() {
        let input: &[u8] = b"$PGRMZ,2282,F,2*00\r\n$INVALID*00\r\n$PFLAE,A,0,0*33\r\n";
        let out = run(&[input]);
        assert!(matches!(out[0], Ok(FlarmMessage::BarometricAltitude(_))));
        assert!(matches!(out[1], Err(DecodeError::ChecksumMismatch { .. })));
        assert!(matches!(out[2], Ok(FlarmMessage::SelfTest(_))));
    }
}
