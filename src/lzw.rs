//! LZW compression over Unicode code points.
//!
//! Unlike a byte-oriented LZW, codes here are emitted as whole `char`s whose
//! numeric value *is* the code, which keeps the whole pipeline working in
//! terms of strings end to end. The dictionary is built as a chain of
//! `(base_code, symbol) -> code` links, the same shape as the `Link` type a
//! byte-oriented LZW would use, rather than a map keyed on full strings, so
//! lookups stay O(1) no matter how long a matched run gets.

use std::collections::HashMap;

use crate::Error;

/// Options controlling the LZW codec.
#[derive(Clone, Copy, Debug)]
pub struct Options {
    /// First code point past the literal alphabet; also the literal/code
    /// boundary used by both encoder and decoder.
    pub code_start: u32,
    /// Highest code the dictionary is allowed to grow to.
    pub code_max: u32,
}

pub const STD_OPTIONS: Options = Options {
    code_start: 0xFF,
    code_max: 0xFFFF,
};

/// `char` cannot hold a lone UTF-16 surrogate. Real LZW code streams have no
/// such restriction, so when the assigned-code counter would land in the
/// surrogate block we skip straight over it, the same technique a clear/stop
/// code reservation uses to keep reserved values out of the assignable
/// range. Encoder and decoder perform the identical skip, so the codes they
/// agree on never drift apart.
fn skip_reserved(code: u32) -> u32 {
    if (0xD800..=0xDFFF).contains(&code) {
        0xE000
    } else {
        code
    }
}

/// Compress `input` with [`STD_OPTIONS`].
pub fn compress(input: &str) -> Result<String, Error> {
    compress_with(input, &STD_OPTIONS)
}

/// Compress `input` with `opt`.
pub fn compress_with(input: &str, opt: &Options) -> Result<String, Error> {
    compress_budgeted(input, opt, None)
}

/// Compress `input`, failing with [`Error::BudgetExceeded`] once the running
/// byte count passes `max_bytes`.
pub fn compress_budgeted(input: &str, opt: &Options, max_bytes: Option<usize>) -> Result<String, Error> {
    log::debug!("lzw compress: code_start={} code_max={}", opt.code_start, opt.code_max);
    let mut chars = input.chars();
    let Some(first) = chars.next() else {
        return Ok(String::new());
    };
    let mut dict: HashMap<(u32, char), u32> = HashMap::new();
    let mut code_state = opt.code_start;
    let mut frozen = false;
    let mut out = String::new();
    let mut bytes = 0usize;
    let mut w_code = first as u32;

    macro_rules! charge {
        ($n:expr) => {
            bytes += $n;
            if let Some(max) = max_bytes {
                if bytes > max {
                    log::debug!("lzw compress: budget exceeded at {bytes} bytes");
                    return Err(Error::BudgetExceeded);
                }
            }
        };
    }

    for c in chars {
        if let Some(&code) = dict.get(&(w_code, c)) {
            w_code = code;
            continue;
        }
        charge!(token_cost(w_code, opt.code_start, code_state));
        out.push(char::from_u32(w_code).unwrap_or('\u{FFFD}'));
        log::trace!("lzw emit {w_code:#x}");
        if !frozen {
            let candidate = skip_reserved(code_state + 1);
            if candidate <= opt.code_max {
                dict.insert((w_code, c), candidate);
                code_state = candidate;
            } else {
                frozen = true;
            }
        }
        w_code = c as u32;
    }
    charge!(token_cost(w_code, opt.code_start, code_state));
    out.push(char::from_u32(w_code).unwrap_or('\u{FFFD}'));
    log::debug!("lzw compress: {} codes out", out.chars().count());
    Ok(out)
}

fn token_cost(code: u32, code_start: u32, code_state: u32) -> usize {
    if code <= code_start {
        1
    } else if code_state < 0x800 {
        2
    } else {
        3
    }
}

/// Decompress `input` with [`STD_OPTIONS`].
pub fn decompress(input: &str) -> String {
    decompress_with(input, &STD_OPTIONS)
}

/// Decompress `input`, the inverse of [`compress_with`] for the same
/// [`Options`].
pub fn decompress_with(input: &str, opt: &Options) -> String {
    log::debug!("lzw decompress: code_start={} code_max={}", opt.code_start, opt.code_max);
    let mut chars = input.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    let mut out = String::new();
    out.push(first);
    let mut dict: HashMap<u32, (u32, char)> = HashMap::new();
    let mut code_state = opt.code_start;
    let mut frozen = false;
    let mut prev_code = first as u32;
    let mut prev_str = first.to_string();

    for c in chars {
        let code = c as u32;
        let buffer = if code <= opt.code_start {
            c.to_string()
        } else if dict.contains_key(&code) {
            reconstruct(&dict, code, opt.code_start)
        } else {
            // KwKwK: the code being decoded is the one about to be assigned.
            let mut s = prev_str.clone();
            s.push(prev_str.chars().next().expect("prev_str is never empty"));
            s
        };
        out.push_str(&buffer);
        let first_of_buffer = buffer.chars().next().expect("buffer is never empty");
        if !frozen {
            let candidate = skip_reserved(code_state + 1);
            if candidate <= opt.code_max {
                dict.insert(candidate, (prev_code, first_of_buffer));
                code_state = candidate;
            } else {
                frozen = true;
            }
        }
        prev_code = code;
        prev_str = buffer;
    }
    log::debug!("lzw decompress: {} chars out", out.chars().count());
    out
}

fn reconstruct(dict: &HashMap<u32, (u32, char)>, mut code: u32, code_start: u32) -> String {
    let mut rev = Vec::new();
    loop {
        if code <= code_start {
            rev.push(char::from_u32(code).unwrap_or('\u{FFFD}'));
            break;
        }
        let Some(&(prefix, ch)) = dict.get(&code) else {
            break;
        };
        rev.push(ch);
        code = prefix;
    }
    rev.iter().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(s: &str, opt: &Options) {
        let compressed = compress_with(s, opt).expect("compression failed");
        let expanded = decompress_with(&compressed, opt);
        assert_eq!(expanded, s, "round trip failed for {s:?}");
    }

    #[test]
    fn empty_input() {
        assert_eq!(compress("").unwrap(), "");
        assert_eq!(decompress(""), "");
    }

    #[test]
    fn ascii_roundtrip() {
        let opt = Options { code_start: 0x7F, code_max: 0x7FF };
        roundtrip("TOBEORNOTTOBEORTOBEORNOT#\n", &opt);
        roundtrip("Hello, world!", &opt);
    }

    #[test]
    fn default_options_roundtrip_unicode() {
        roundtrip(&"mostly-ascii with a little 漢字 mixed in".repeat(5), &STD_OPTIONS);
    }

    #[test]
    fn low_entropy_input_compresses_well() {
        let s = "aaaa".repeat(1000);
        let opt = Options { code_start: 0x7F, code_max: 0x7FF };
        let compressed = compress_with(&s, &opt).unwrap();
        assert!(compressed.chars().count() < s.chars().count() / 100);
        assert_eq!(decompress_with(&compressed, &opt), s);
    }

    #[test]
    fn budget_exceeded_signal() {
        let opt = Options { code_start: 0x7F, code_max: 0x7FF };
        let s = "abababababababababab";
        assert!(matches!(
            compress_budgeted(s, &opt, Some(1)),
            Err(Error::BudgetExceeded)
        ));
    }

    #[test]
    fn large_dictionary_never_assigns_a_surrogate_code() {
        let mut s = String::new();
        for i in 0..0xE000u32 {
            s.push(char::from_u32(0x20 + (i % 90)).unwrap());
            s.push('\u{3042}');
        }
        let opt = Options { code_start: 0xFF, code_max: 0xFFFF };
        let compressed = compress_with(&s, &opt).unwrap();
        assert!(compressed.chars().all(|c| !(0xD800..=0xDFFF).contains(&(c as u32))));
        assert_eq!(decompress_with(&compressed, &opt), s);
    }
}
