//! Record validation and dispatch by sentence tag.

use crate::checksum;
use crate::error::DecodeError;
use crate::field::FieldReader;
use crate::sentence::{Gga, Pflaa, Pflae, Pflau, Pflav, Pgrmz, Rmc, Sentence, Tag, TAG_LEN};

/// Decode one record (as produced by the tokenizer, terminator excluded).
///
/// Validates framing and checksum before any field is looked at. Records
/// with a valid checksum but an unhandled tag decode to
/// [`Sentence::Unknown`].
///
/// # Example
///
/// ```
/// use flarm_proto::{decode, Sentence};
///
/// let sentence = decode(b"$PGRMZ,2282,F,2*00").unwrap();
/// assert!(matches!(sentence, Sentence::Pgrmz(_)));
/// ```
pub fn decode(record: &[u8]) -> Result<Sentence, DecodeError> {
    let body = checksum::verify(record)?;

    if !body.iter().all(|&b| (0x20..0x7F).contains(&b)) {
        return Err(DecodeError::NonAscii);
    }

    let (tag, mut fields) = FieldReader::new(body);
    if tag.is_empty() || tag.len() > TAG_LEN || !tag.iter().all(u8::is_ascii_alphanumeric) {
        return Err(DecodeError::InvalidTag);
    }

    let sentence = match tag {
        b"PFLAU" => Sentence::Pflau(Pflau::read(&mut fields)?),
        b"PFLAA" => Sentence::Pflaa(Pflaa::read(&mut fields)?),
        b"PGRMZ" => Sentence::Pgrmz(Pgrmz::read(&mut fields)?),
        b"PFLAV" => Sentence::Pflav(Pflav::read(&mut fields)?),
        b"PFLAE" => Sentence::Pflae(Pflae::read(&mut fields)?),
        [a, b, b'R', b'M', b'C'] if is_talker(*a, *b) => {
            Sentence::Rmc(Rmc::read([*a, *b], &mut fields)?)
        }
        [a, b, b'G', b'G', b'A'] if is_talker(*a, *b) => {
            Sentence::Gga(Gga::read([*a, *b], &mut fields)?)
        }
        other => Sentence::Unknown(unknown_tag(other)),
    };

    Ok(sentence)
}

/// Standard talker IDs are two uppercase letters (GP, GN, GL, GA, ...).
#[inline]
fn is_talker(a: u8, b: u8) -> bool {
    a.is_ascii_uppercase() && b.is_ascii_uppercase()
}

fn unknown_tag(tag: &[u8]) -> Tag {
    let mut out = Tag::new();
    for &b in tag {
        // Length and character set were validated above.
        let _ = out.push(char::from(b));
    }
    out
}
