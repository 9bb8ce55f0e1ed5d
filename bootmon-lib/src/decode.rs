use crate::error::DecodeError;
use std::borrow::Cow;

/// Decodes a received line as UTF-8, substituting U+FFFD for malformed
/// sequences. The error, if any, describes the first malformed sequence.
pub fn decode_line(bytes: &[u8]) -> (Cow<'_, str>, Option<DecodeError>) {
    match std::str::from_utf8(bytes) {
        Ok(text) => (Cow::Borrowed(text), None),
        Err(e) => (String::from_utf8_lossy(bytes), Some(DecodeError(e))),
    }
}
