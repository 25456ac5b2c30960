//! Text decoding for legacy-encoded input files.

use encoding_rs::Encoding;
use std::borrow::Cow;
use tracing::{debug, warn};

/// Decode raw file bytes to UTF-8.
///
/// A leading byte-order mark overrides `encoding` and is stripped.
/// Single-byte encodings such as ISO-8859-1 map every byte, so decoding
/// never fails; malformed sequences in multi-byte encodings become U+FFFD.
pub(crate) fn decode_bytes<'a>(bytes: &'a [u8], encoding: &'static Encoding) -> Cow<'a, str> {
    let (text, used, had_errors) = encoding.decode(bytes);
    if used != encoding {
        debug!("Byte-order mark found, decoding as {}", used.name());
    }
    if had_errors {
        warn!(
            "Input contained byte sequences invalid in {}; replaced with U+FFFD",
            used.name()
        );
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::{UTF_8, WINDOWS_1252};

    #[test]
    fn test_decode_latin1_bytes() {
        let bytes = b"name\ncaf\xe9\n";
        let text = decode_bytes(bytes, WINDOWS_1252);
        assert_eq!(text, "name\ncafé\n");
    }

    #[test]
    fn test_decode_strips_utf8_bom() {
        let bytes = b"\xef\xbb\xbfa,b\n1,2\n";
        let text = decode_bytes(bytes, WINDOWS_1252);
        assert_eq!(text, "a,b\n1,2\n");
    }

    #[test]
    fn test_decode_utf8_passthrough() {
        let text = decode_bytes("ville\nZürich\n".as_bytes(), UTF_8);
        assert_eq!(text, "ville\nZürich\n");
    }
}
