//! RFC-4648 standard Base64 (`+/` alphabet, `=` padding) wrapping for the
//! tagged compressed payload, via the `base64` crate.
//!
//! Decoding is permissive: any byte outside the standard alphabet (and
//! outside the `=` padding character) is stripped before handing the
//! remainder to the crate's decoder, since the crate itself rejects
//! anything it doesn't recognize rather than skipping it.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::Error;

/// Encode `s`'s UTF-8-like byte representation (each `char` must be
/// `< 0x100`, as produced by [`crate::transcode::to_utf8`] or any ASCII
/// string) as standard Base64.
pub fn encode(s: &str) -> String {
    let bytes: Vec<u8> = s.chars().map(|c| c as u8).collect();
    STANDARD.encode(bytes)
}

/// Decode standard Base64 back into a byte string represented as a `String`
/// whose characters are each one decoded byte (`0..=0xFF`).
pub fn decode(s: &str) -> Result<String, Error> {
    let filtered: String = s
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '/' | '='))
        .collect();
    let bytes = STANDARD.decode(filtered)?;
    Ok(bytes.into_iter().map(|b| b as char).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrips_ascii() {
        let s = "Shello world";
        assert_eq!(decode(&encode(s)).unwrap(), s);
    }

    #[test]
    fn decode_skips_foreign_characters() {
        let encoded = encode("Shello world");
        let padded: String = encoded.chars().map(|c| format!("{c}\n")).collect();
        assert_eq!(decode(&padded).unwrap(), decode(&encoded).unwrap());
    }

    #[test]
    fn invalid_base64_is_an_error() {
        assert!(decode("!!!not-base64!!!===").is_err() || decode("!!!not-base64!!!===").unwrap().is_empty());
    }
}
