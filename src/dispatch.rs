//! Heuristic dispatcher choosing between the LZSS and LZW codecs (or no
//! compression at all) based on input shape, tagging the result so
//! [`decompress`] knows which path to reverse.
//!
//! The selection policy tries the preferred algorithm for the detected
//! input shape, falls back in a fixed order, and settles for a passthrough
//! tag if every compressor would grow the budget rather than shrink it.

use crate::{base64, lzss, lzw, transcode};

/// Tag prepended to every compressed payload identifying which algorithm
/// produced it.
const TAG_LZSS: char = 'S';
const TAG_LZW_ASCII: char = 'W';
const TAG_LZW_UTF8: char = 'U';
const TAG_NONE: char = 'N';

const LZW_ASCII_OPTIONS: lzw::Options = lzw::Options { code_start: 0x7F, code_max: 0x7FF };

/// Reserved for future wire-format extensions; only `Utf8` is legal today.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Encoding {
    #[default]
    Utf8,
}

/// Options controlling the dispatcher.
#[derive(Clone, Copy, Debug, Default)]
pub struct Options {
    pub encoding: Encoding,
    /// Overrides the byte budget the dispatcher would otherwise derive from
    /// the input's own UTF-8-like byte length.
    pub max_bytes: Option<usize>,
    /// Overrides `code_start` for whichever LZW variant the dispatcher
    /// selects (ascii or utf8). A custom value changes the wire format —
    /// [`decompress_with`] must be given the same value to read it back.
    pub lzw_code_start: Option<u32>,
    /// Overrides `code_max` analogous to `lzw_code_start`.
    pub lzw_code_max: Option<u32>,
}

pub const STD_OPTIONS: Options = Options {
    encoding: Encoding::Utf8,
    max_bytes: None,
    lzw_code_start: None,
    lzw_code_max: None,
};

fn ascii_lzw_options(opt: &Options) -> lzw::Options {
    lzw::Options {
        code_start: opt.lzw_code_start.unwrap_or(LZW_ASCII_OPTIONS.code_start),
        code_max: opt.lzw_code_max.unwrap_or(LZW_ASCII_OPTIONS.code_max),
    }
}

fn utf8_lzw_options(opt: &Options) -> lzw::Options {
    lzw::Options {
        code_start: opt.lzw_code_start.unwrap_or(lzw::STD_OPTIONS.code_start),
        code_max: opt.lzw_code_max.unwrap_or(lzw::STD_OPTIONS.code_max),
    }
}

/// Compress `input` with [`STD_OPTIONS`], always producing a tagged string.
pub fn compress(input: &str) -> String {
    compress_with(input, &STD_OPTIONS)
}

/// Compress `input`, choosing LZSS, LZW, or no compression by input shape.
pub fn compress_with(input: &str, opt: &Options) -> String {
    if input.is_empty() {
        return String::new();
    }
    let n = input.chars().count();
    let u = transcode::byte_length(input);
    let budget = opt.max_bytes.unwrap_or(u);
    let ascii_opts = ascii_lzw_options(opt);
    let utf8_opts = utf8_lzw_options(opt);
    log::debug!("dispatch compress: {n} code units, {u} utf8-like bytes, budget={budget}");

    let tagged = if u == n {
        lzw::compress_budgeted(input, &ascii_opts, Some(budget))
            .map(|payload| tag(TAG_LZW_ASCII, payload))
            .or_else(|_| lzss::compress_with(input, &lzss::Options { max_bytes: Some(budget) }).map(|p| tag(TAG_LZSS, p)))
            .unwrap_or_else(|_| tag(TAG_NONE, input.to_string()))
    } else if u > n && (u * 9 / 10) < n {
        let transcoded = transcode::to_utf8(input);
        lzw::compress_budgeted(&transcoded, &utf8_opts, Some(budget))
            .map(|payload| tag(TAG_LZW_UTF8, payload))
            .or_else(|_| lzss::compress_with(input, &lzss::Options { max_bytes: Some(budget) }).map(|p| tag(TAG_LZSS, p)))
            .unwrap_or_else(|_| tag(TAG_NONE, input.to_string()))
    } else {
        lzss::compress_with(input, &lzss::Options { max_bytes: Some(budget) })
            .map(|p| tag(TAG_LZSS, p))
            .unwrap_or_else(|_| fall_back_to_lzw_then_none(input, budget, &utf8_opts))
    };
    log::debug!("dispatch compress: tag={}", tagged.chars().next().unwrap_or('?'));
    tagged
}

fn fall_back_to_lzw_then_none(input: &str, max_bytes: usize, utf8_opts: &lzw::Options) -> String {
    let transcoded = transcode::to_utf8(input);
    match lzw::compress_budgeted(&transcoded, utf8_opts, Some(max_bytes)) {
        Ok(payload) if transcode::byte_length(&payload) <= max_bytes => tag(TAG_LZW_UTF8, payload),
        _ => tag(TAG_NONE, input.to_string()),
    }
}

fn tag(t: char, payload: String) -> String {
    let mut out = String::with_capacity(payload.len() + 1);
    out.push(t);
    out.push_str(&payload);
    out
}

/// Decompress a tagged payload produced by [`compress`]/[`compress_with`]
/// with [`STD_OPTIONS`]. An input whose first character is not a recognized
/// tag is returned unchanged.
pub fn decompress(input: &str) -> String {
    decompress_with(input, &STD_OPTIONS)
}

/// Decompress a tagged payload, the inverse of [`compress_with`] for the
/// same [`Options`] (the `lzw_code_start`/`lzw_code_max` overrides must
/// match whatever was used to produce `input`).
pub fn decompress_with(input: &str, opt: &Options) -> String {
    let mut chars = input.chars();
    let Some(t) = chars.next() else {
        return String::new();
    };
    let payload = chars.as_str();
    match t {
        TAG_LZSS => lzss::decompress(payload),
        TAG_LZW_ASCII => lzw::decompress_with(payload, &ascii_lzw_options(opt)),
        TAG_LZW_UTF8 => transcode::to_utf16(&lzw::decompress_with(payload, &utf8_lzw_options(opt))),
        TAG_NONE => payload.to_string(),
        _ => input.to_string(),
    }
}

/// `base64(utf8(compress(input)))`.
pub fn compress_to_base64(input: &str) -> String {
    compress_to_base64_with(input, &STD_OPTIONS)
}

/// `base64(utf8(compress_with(input, opt)))`.
pub fn compress_to_base64_with(input: &str, opt: &Options) -> String {
    base64::encode(&transcode::to_utf8(&compress_with(input, opt)))
}

/// `decompress(utf16(base64_decode(input)))`.
pub fn decompress_from_base64(input: &str) -> String {
    decompress_from_base64_with(input, &STD_OPTIONS)
}

/// `decompress_with(utf16(base64_decode(input)), opt)`.
pub fn decompress_from_base64_with(input: &str, opt: &Options) -> String {
    match base64::decode(input) {
        Ok(bytes) => decompress_with(&transcode::to_utf16(&bytes), opt),
        Err(_) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(s: &str) {
        let compressed = compress(s);
        assert_eq!(decompress(&compressed), s, "round trip failed for {s:?}");
    }

    #[test]
    fn empty_input() {
        assert_eq!(compress(""), "");
        assert_eq!(decompress(""), "");
    }

    #[test]
    fn single_char_tag_and_roundtrip() {
        let compressed = compress("a");
        assert!(compressed.len() <= 3);
        assert!("SWUN".contains(compressed.chars().next().unwrap()));
        roundtrip("a");
    }

    #[test]
    fn repeated_ascii_phrase_compresses_and_roundtrips() {
        let s = "abracadabra abracadabra abracadabra";
        let compressed = compress(s);
        assert!(compressed.chars().count() < s.chars().count());
        roundtrip(s);
    }

    #[test]
    fn unicode_heavy_input_prefers_lzss() {
        let s = "日本語テキスト".repeat(10);
        assert_eq!(compress(&s).chars().next(), Some(TAG_LZSS));
        roundtrip(&s);
    }

    #[test]
    fn pure_ascii_prefers_lzw() {
        let s = "Hello, world!";
        assert_eq!(compress(s).chars().next(), Some(TAG_LZW_ASCII));
        roundtrip(s);
    }

    #[test]
    fn unknown_tag_passes_through() {
        assert_eq!(decompress("Zhello"), "Zhello");
    }

    #[test]
    fn base64_roundtrip() {
        let s = "Hello, 世界! compress me please compress me please";
        let encoded = compress_to_base64(s);
        assert_eq!(decompress_from_base64(&encoded), s);
    }

    #[test]
    fn max_bytes_override_forces_passthrough() {
        let s = "abracadabra abracadabra abracadabra";
        let opt = Options { max_bytes: Some(1), ..STD_OPTIONS };
        let compressed = compress_with(s, &opt);
        assert_eq!(compressed, tag(TAG_NONE, s.to_string()));
    }

    #[test]
    fn custom_lzw_code_range_roundtrips() {
        let s = "Hello, world! Hello, world! Hello, world!";
        let opt = Options { lzw_code_start: Some(0x7F), lzw_code_max: Some(0x3FF), ..STD_OPTIONS };
        let compressed = compress_with(s, &opt);
        assert_eq!(decompress_with(&compressed, &opt), s);
    }
}
