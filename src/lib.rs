//! # lzjs-rs
//!
//! A text-in/text-out compression codec combining a sliding-window LZSS
//! variant and a dictionary-based LZW variant behind a heuristic dispatcher.
//! A one-character tag in front of every payload records which algorithm
//! produced it, so [`decompress`] always knows how to reverse it.
//!
//! * `alphabet` is the derived printable alphabet the LZSS codec emits into.
//! * `lzss` is the sliding-window compressor/decompressor.
//! * `lzw` is the dictionary-based compressor/decompressor.
//! * `dispatch` (`Lzjs`) picks an algorithm by input shape and owns the tag.
//! * `transcode` bridges UTF-8 and UTF-16-code-unit representations for the
//!   `U` tag.
//! * `base64` wraps tagged payloads in RFC-4648 Base64 for transport through
//!   byte-oriented channels.
//!
//! ## Example
//!
//! ```
//! let compressed = lzjs_rs::compress("abracadabra abracadabra abracadabra");
//! assert_eq!(lzjs_rs::decompress(&compressed), "abracadabra abracadabra abracadabra");
//! ```

pub mod alphabet;
pub mod base64;
pub mod dispatch;
pub mod lzss;
pub mod lzw;
pub mod transcode;

/// Crate-wide error type. The codec's own `compress`/`decompress` functions
/// never return this — it exists for the internal compression-budget signal
/// consumed by [`dispatch`], and for the genuinely fallible operations at
/// the CLI boundary (file I/O, user-supplied Base64).
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Internal signal: the running byte count passed the configured
    /// budget. Consumed by [`dispatch::compress_with`], never surfaced to a
    /// library caller.
    #[error("compression budget exceeded")]
    BudgetExceeded,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid base64 input: {0}")]
    InvalidBase64(#[from] ::base64::DecodeError),
}

pub use dispatch::Options;

/// Compress `input`, returning a tagged payload. Always succeeds on valid
/// `&str` input; the tag identifies which algorithm was used.
pub fn compress(input: &str) -> String {
    dispatch::compress(input)
}

/// Compress `input` honoring `opt`'s overrides; see [`dispatch::Options`].
pub fn compress_with(input: &str, opt: &Options) -> String {
    dispatch::compress_with(input, opt)
}

/// Inverse of [`compress`]. An input whose first character is not a
/// recognized tag is returned unchanged.
pub fn decompress(input: &str) -> String {
    dispatch::decompress(input)
}

/// Inverse of [`compress_with`]. `opt` must carry the same overrides used to
/// produce `input`.
pub fn decompress_with(input: &str, opt: &Options) -> String {
    dispatch::decompress_with(input, opt)
}

/// `base64(utf8(compress(input)))`.
pub fn compress_to_base64(input: &str) -> String {
    dispatch::compress_to_base64(input)
}

/// `base64(utf8(compress_with(input, opt)))`.
pub fn compress_to_base64_with(input: &str, opt: &Options) -> String {
    dispatch::compress_to_base64_with(input, opt)
}

/// `decompress(utf16(base64_decode(input)))`.
pub fn decompress_from_base64(input: &str) -> String {
    dispatch::decompress_from_base64(input)
}

/// `decompress_with(utf16(base64_decode(input)), opt)`.
pub fn decompress_from_base64_with(input: &str, opt: &Options) -> String {
    dispatch::decompress_from_base64_with(input, opt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_level_roundtrip() {
        let s = "The quick brown fox jumps over the lazy dog. 世界";
        assert_eq!(decompress(&compress(s)), s);
    }

    #[test]
    fn top_level_base64_roundtrip() {
        let s = "repeated repeated repeated text compresses well";
        assert_eq!(decompress_from_base64(&compress_to_base64(s)), s);
    }
}
