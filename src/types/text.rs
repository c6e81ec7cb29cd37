//! Repair of double-encoded text returned by the provider.
//!
//! Player and clan names come back as UTF-8 bytes that were re-read as
//! Latin-1, so `"Ñ"` arrives as `"\u{00c3}\u{0091}"`. Decoding recovers the
//! original text whenever every character fits in a byte and the bytes form
//! valid UTF-8.

use std::borrow::Cow;

/// Field names whose string values are double-encoded by the provider.
pub const DOUBLE_ENCODED_FIELDS: &[&str] = &["name", "clan_name", "teamname", "bio_name"];

/// Returns true if values of `field` need [`decode_double_encoded`].
pub fn is_double_encoded_field(field: &str) -> bool {
    DOUBLE_ENCODED_FIELDS.contains(&field)
}

/// Decodes a string whose UTF-8 bytes were mis-read as Latin-1.
///
/// Plain ASCII, text containing characters above U+00FF, and byte sequences
/// that are not valid UTF-8 are returned unchanged.
///
/// This is a heuristic. A name that genuinely is Latin-1 but whose bytes also
/// form valid UTF-8, such as `"\u{00c3}\u{00a9}"`, cannot be told apart from
/// a double-encoded one and is decoded (here to `"é"`).
pub fn decode_double_encoded(text: &str) -> Cow<'_, str> {
    if text.is_ascii() {
        return Cow::Borrowed(text);
    }

    let bytes: Option<Vec<u8>> = text
        .chars()
        .map(|c| u8::try_from(u32::from(c)).ok())
        .collect();

    match bytes.and_then(|bytes| String::from_utf8(bytes).ok()) {
        Some(decoded) => Cow::Owned(decoded),
        None => Cow::Borrowed(text),
    }
}
