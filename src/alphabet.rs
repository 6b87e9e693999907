//! The printable emission alphabet shared by the LZSS compressor and decompressor.
//!
//! Every constant in this module is *derived* from the alphabet's length rather
//! than hard-coded, so that two independent implementations built from the same
//! exclusion set agree bit-for-bit. See the `Constants` doc comments for what
//! each derived value gates.

use std::collections::HashMap;
use std::sync::OnceLock;

/// Code points excluded from the alphabet: backspace, LF, VT, FF, CR, backslash.
const EXCLUDED: [u32; 6] = [0x08, 0x0A, 0x0B, 0x0C, 0x0D, 0x5C];

/// Fixed window size prepended to every LZSS input as initial dictionary content.
pub const WINDOW_MAX: usize = 1024;
/// Portion of the window actually searched for matches.
pub const WINDOW_BUFFER_MAX: usize = 304;
const LATIN_BUFFER_MAX_BASE: usize = 11;
/// Boundary between the "Latin page" and "Unicode page" literal encodings.
pub const LATIN_BUFFER_MAX: usize = LATIN_BUFFER_MAX_BASE * 12;
/// Width of one Unicode literal page.
pub const UNICODE_CHAR_MAX: usize = 40;
/// Number of code points spanned by one Unicode literal page.
pub const UNICODE_BUFFER_MAX: usize = UNICODE_CHAR_MAX * (UNICODE_CHAR_MAX + 1);

/// Derived alphabet table plus the opcode-region boundaries computed from it.
pub struct Alphabet {
    chars: Vec<char>,
    index_of: HashMap<char, u16>,
    pub table_diff: usize,
    pub buffer_max: usize,
    pub latin_index: usize,
    pub latin_index_start: usize,
    pub unicode_index: usize,
    pub decode_max: usize,
    pub latin_decode_max: usize,
    pub char_start: usize,
    pub compress_start: usize,
    pub compress_fixed_start: usize,
    pub compress_index: usize,
}

impl Alphabet {
    fn build() -> Self {
        let chars: Vec<char> = (0..0x7Fu32)
            .filter(|c| !EXCLUDED.contains(c))
            .map(|c| char::from_u32(c).expect("alphabet code points are all valid scalar values"))
            .collect();
        let index_of = chars
            .iter()
            .enumerate()
            .map(|(i, &c)| (c, i as u16))
            .collect();
        let len = chars.len();
        let table_diff = len.max(62) - len.min(62);
        let buffer_max = len - 1;
        let latin_index = len + 1;
        let latin_index_start = table_diff + 20;
        let unicode_index = len + 5;
        let decode_max = len - table_diff - 19;
        let latin_decode_max = UNICODE_CHAR_MAX + 7;
        let char_start = latin_decode_max + 1;
        let compress_start = char_start + 1;
        let compress_fixed_start = compress_start + 5;
        let compress_index = compress_fixed_start + 5;
        Self {
            chars,
            index_of,
            table_diff,
            buffer_max,
            latin_index,
            latin_index_start,
            unicode_index,
            decode_max,
            latin_decode_max,
            char_start,
            compress_start,
            compress_fixed_start,
            compress_index,
        }
    }

    /// Number of symbols in the alphabet, `|A|`.
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// Symbol emitted for alphabet index `i`.
    pub fn char_at(&self, i: usize) -> char {
        self.chars[i]
    }

    /// Alphabet index of `c`, or `None` if `c` is outside the alphabet.
    pub fn index_of(&self, c: char) -> Option<u16> {
        self.index_of.get(&c).copied()
    }
}

/// Process-wide alphabet instance, computed once on first access.
pub fn alphabet() -> &'static Alphabet {
    static ALPHABET: OnceLock<Alphabet> = OnceLock::new();
    ALPHABET.get_or_init(Alphabet::build)
}

/// The deterministic 1024-character sliding-window prelude.
///
/// Built by walking the lowercase Latin alphabet `a..z`, and for each letter
/// pairing it with `z` down through `q` (letter index 16), until 1024
/// characters accumulate; the result is then left-padded with spaces to
/// exactly 1024 characters. Both the compressor and the decompressor start
/// from this same string, so it must never depend on anything but these
/// fixed bounds.
pub fn prelude() -> &'static str {
    static PRELUDE: OnceLock<String> = OnceLock::new();
    PRELUDE.get_or_init(build_prelude)
}

fn build_prelude() -> String {
    let mut buf = String::with_capacity(WINDOW_MAX);
    let mut len = 0usize;
    'outer: for c in b'a'..=b'z' {
        for c2 in (b'a' + 16..=b'z').rev() {
            if len >= WINDOW_MAX {
                break 'outer;
            }
            buf.push(c as char);
            buf.push(c2 as char);
            len += 2;
        }
    }
    if len < WINDOW_MAX {
        let mut out = String::with_capacity(WINDOW_MAX);
        out.extend(std::iter::repeat(' ').take(WINDOW_MAX - len));
        out.push_str(&buf);
        out
    } else {
        buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alphabet_excludes_control_characters() {
        let a = alphabet();
        for &c in EXCLUDED.iter() {
            assert!(a.index_of(char::from_u32(c).unwrap()).is_none());
        }
        assert_eq!(a.len(), 0x7F - EXCLUDED.len());
    }

    #[test]
    fn alphabet_round_trips_indices() {
        let a = alphabet();
        for i in 0..a.len() {
            let c = a.char_at(i);
            assert_eq!(a.index_of(c), Some(i as u16));
        }
    }

    #[test]
    fn derived_constants_match_spec_table() {
        let a = alphabet();
        assert_eq!(a.len(), 121);
        assert_eq!(a.table_diff, 59);
        assert_eq!(a.buffer_max, 120);
        assert_eq!(a.latin_index, 122);
        assert_eq!(a.latin_index_start, 79);
        assert_eq!(a.unicode_index, 126);
        assert_eq!(a.decode_max, 43);
        assert_eq!(a.latin_decode_max, 47);
        assert_eq!(a.char_start, 48);
        assert_eq!(a.compress_start, 49);
        assert_eq!(a.compress_fixed_start, 54);
        assert_eq!(a.compress_index, 59);
    }

    #[test]
    fn prelude_is_deterministic_and_padded() {
        let p1 = prelude();
        let p2 = prelude();
        assert_eq!(p1, p2);
        assert_eq!(p1.chars().count(), WINDOW_MAX);
        assert_eq!(&p1[0..16], "                ");
    }
}
