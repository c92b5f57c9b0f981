//! Review text normalizer.
//!
//! Produces the canonical form the vectorizer was fit on:
//! - lowercase (Unicode-aware)
//! - ASCII digits removed
//! - ASCII punctuation removed
//! - whitespace runs collapsed to a single space
//! - no leading or trailing whitespace
//!
//! The whole transformation is one forward pass. Removed characters never
//! end a whitespace run, so `"a 1 b"` becomes `"a b"` exactly as if the
//! steps ran one after another.
//!
//! Whitespace is the Unicode set plus the ASCII separators `0x1C..=0x1F`,
//! which regex `\s` also matches. Capital sigma lowercases to `ς` at the
//! end of a word, as whole-string lowercasing does.

const DROP: u8 = 0;
const SPACE: u8 = 1;
const KEEP: u8 = 2;

const fn build_ascii_class() -> [u8; 128] {
    let mut table = [KEEP; 128];
    let mut b = 0usize;
    while b < 128 {
        let byte = b as u8;
        let is_space = matches!(byte, b' ' | b'\t' | b'\n' | 0x0B | 0x0C | b'\r' | 0x1C..=0x1F);
        table[b] = if is_space {
            SPACE
        } else if byte.is_ascii_digit() || byte.is_ascii_punctuation() {
            DROP
        } else {
            KEEP
        };
        b += 1;
    }
    table
}

static ASCII_CLASS: [u8; 128] = build_ascii_class();

const CAPITAL_SIGMA: char = '\u{3A3}';
const FINAL_SIGMA: char = '\u{3C2}';

/// Word-final position for capital sigma: a letter before it and none after.
fn is_final_sigma(input: &str, at: usize) -> bool {
    let before = input[..at].chars().next_back();
    let after = input[at + CAPITAL_SIGMA.len_utf8()..].chars().next();
    before.is_some_and(char::is_alphabetic) && !after.is_some_and(char::is_alphabetic)
}

#[inline(always)]
fn class_of(c: char) -> u8 {
    if c.is_ascii() {
        ASCII_CLASS[c as usize]
    } else if c.is_whitespace() {
        SPACE
    } else {
        KEEP
    }
}

/// Stateless review text normalizer.
///
/// # Examples
///
/// ```
/// use tonality_core::analyzer::TextNormalizer;
///
/// let normalizer = TextNormalizer::new();
/// assert_eq!(normalizer.normalize("This product is AMAZING!! 100%"), "this product is amazing");
/// assert_eq!(normalizer.normalize("123!!!"), "");
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct TextNormalizer;

impl TextNormalizer {
    /// Creates a new normalizer.
    #[inline]
    pub const fn new() -> Self {
        Self
    }

    /// Normalizes text into an existing String buffer.
    ///
    /// Clears the buffer before writing and reuses its capacity.
    pub fn normalize_into(&self, input: &str, out: &mut String) {
        out.clear();
        out.reserve(input.len());

        let mut pending_space = false;

        for (at, ch) in input.char_indices() {
            if ch.is_ascii() {
                match ASCII_CLASS[ch as usize] {
                    KEEP => push_kept(out, &mut pending_space, ch.to_ascii_lowercase()),
                    SPACE => pending_space = true,
                    _ => {}
                }
                continue;
            }

            if ch.is_whitespace() {
                pending_space = true;
                continue;
            }

            if ch == CAPITAL_SIGMA && is_final_sigma(input, at) {
                push_kept(out, &mut pending_space, FINAL_SIGMA);
                continue;
            }

            // Some lowercase mappings expand or land back in ASCII
            // ('İ' -> "i\u{307}", KELVIN SIGN -> 'k').
            for lowered in ch.to_lowercase() {
                match class_of(lowered) {
                    KEEP => push_kept(out, &mut pending_space, lowered),
                    SPACE => pending_space = true,
                    _ => {}
                }
            }
        }
    }

    /// Normalizes text and returns a new String.
    #[inline]
    pub fn normalize(&self, input: &str) -> String {
        let mut out = String::with_capacity(input.len());
        self.normalize_into(input, &mut out);
        out
    }
}

#[inline(always)]
fn push_kept(out: &mut String, pending_space: &mut bool, c: char) {
    if *pending_space && !out.is_empty() {
        out.push(' ');
    }
    *pending_space = false;
    out.push(c);
}

/// Normalizes `text` with a default [`TextNormalizer`].
#[inline]
pub fn normalize(text: &str) -> String {
    TextNormalizer::new().normalize(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn norm(input: &str) -> String {
        normalize(input)
    }

    fn assert_clean(out: &str) {
        assert!(!out.chars().any(|c| c.is_ascii_digit()), "digit in {out:?}");
        assert!(
            !out.chars().any(|c| c.is_ascii_punctuation()),
            "punctuation in {out:?}"
        );
        assert!(!out.chars().any(|c| c.is_uppercase()), "uppercase in {out:?}");
        assert!(!out.contains("  "), "double space in {out:?}");
        assert_eq!(out, out.trim(), "untrimmed {out:?}");
        assert!(
            !out.chars().any(|c| c.is_whitespace() && c != ' '),
            "non-space whitespace in {out:?}"
        );
    }

    const SAMPLES: &[&str] = &[
        "",
        "   ",
        "123!!!",
        "This product is AMAZING!! 100%",
        "  Great\tvalue,\n\nwould   buy again :) ",
        "a-b_c.d",
        "a 1 b",
        "a . b",
        "Ünïcödé ÇAFÉ, ΠΡΟΒΛΗΜΑ!",
        "İstanbul",
        "non\u{a0}breaking\u{2003}space",
        "emoji 🙂 stays 👍",
        "KELVIN \u{212A}",
        "ΟΔΟΣ ΚΑΙ ΣΑΣ",
        "a\u{1f}b\u{1c}",
        "\"quoted\" (parens) [brackets] {braces} <angle> @#$%^&*~`|\\/",
    ];

    #[test]
    fn cleans_mixed_case_digits_and_punctuation() {
        assert_eq!(norm("This product is AMAZING!! 100%"), "this product is amazing");
    }

    #[test]
    fn empty_and_symbol_only_inputs() {
        assert_eq!(norm(""), "");
        assert_eq!(norm("123!!!"), "");
        assert_eq!(norm("!!! ... 42 ???"), "");
    }

    #[test]
    fn ascii_basic_lowercase() {
        assert_eq!(norm("HELLO"), "hello");
        assert_eq!(norm("HeLlO"), "hello");
    }

    #[test]
    fn digits_removed_inside_words() {
        assert_eq!(norm("b4 and 2day"), "b and day");
        assert_eq!(norm("abc123def"), "abcdef");
    }

    #[test]
    fn punctuation_removed_without_splitting() {
        assert_eq!(norm("don't"), "dont");
        assert_eq!(norm("foo-bar_baz"), "foobarbaz");
        assert_eq!(norm("e-mail@example.com"), "emailexamplecom");
    }

    #[test]
    fn removed_tokens_do_not_leave_double_spaces() {
        assert_eq!(norm("a 1 b"), "a b");
        assert_eq!(norm("a . b"), "a b");
        assert_eq!(norm("great !!! 10/10 product"), "great product");
    }

    #[test]
    fn whitespace_collapse() {
        assert_eq!(norm("hello   world"), "hello world");
        assert_eq!(norm("hello\t\nworld"), "hello world");
        assert_eq!(norm("hello \r\n world"), "hello world");
    }

    #[test]
    fn leading_and_trailing_whitespace_removed() {
        assert_eq!(norm("   hello"), "hello");
        assert_eq!(norm("hello   "), "hello");
        assert_eq!(norm(" \t\n\r "), "");
    }

    #[test]
    fn leading_punctuation_then_space() {
        assert_eq!(norm("!! hello"), "hello");
        assert_eq!(norm("hello !!"), "hello");
    }

    #[test]
    fn unicode_whitespace_collapses() {
        assert_eq!(norm("non\u{a0}breaking\u{2003}space"), "non breaking space");
    }

    #[test]
    fn unicode_lowercase() {
        assert_eq!(norm("ПРИВЕТ"), "привет");
        assert_eq!(norm("ÜNITED"), "ünited");
        assert_eq!(norm("ΆΈΉ"), "άέή");
    }

    #[test]
    fn non_ascii_punctuation_is_kept() {
        assert_eq!(norm("it’s great"), "it’s great");
        assert_eq!(norm("«quoted»"), "«quoted»");
    }

    #[test]
    fn ascii_separator_controls_are_whitespace() {
        assert_eq!(norm("a\u{1f}b"), "a b");
        assert_eq!(norm("a\u{1c}\u{1d}\u{1e}b"), "a b");
        assert_eq!(norm("\u{1f}a\u{1c}"), "a");
    }

    #[test]
    fn word_final_sigma() {
        assert_eq!(norm("ΟΔΟΣ"), "οδος");
        assert_eq!(norm("ΟΔΟΣ ΚΑΙ ΣΑΣ."), "οδος και σας");
        assert_eq!(norm("ΣΟΦΙΑ"), "σοφια");
        assert_eq!(norm("Σ"), "σ");
    }

    #[test]
    fn expanding_lowercase_is_valid() {
        let out = norm("İstanbul");
        assert!(out.starts_with('i'));
        assert!(out.ends_with("stanbul"));
    }

    #[test]
    fn kelvin_sign_folds_to_ascii() {
        assert_eq!(norm("\u{212A}"), "k");
    }

    #[test]
    fn emoji_passthrough() {
        assert_eq!(norm("Hello 🌍 World"), "hello 🌍 world");
    }

    #[test]
    fn idempotent() {
        for s in SAMPLES {
            let once = norm(s);
            let twice = norm(&once);
            assert_eq!(once, twice, "not idempotent for {s:?}");
        }
    }

    #[test]
    fn invariants_hold_for_samples() {
        for s in SAMPLES {
            assert_clean(&norm(s));
        }
    }

    #[test]
    fn invariants_hold_for_every_ascii_pair() {
        let mut input = String::new();
        for a in 0u8..128 {
            for b in 0u8..128 {
                input.push(a as char);
                input.push(b as char);
            }
        }
        assert_clean(&norm(&input));
    }

    #[test]
    fn normalize_into_reuses_capacity() {
        let normalizer = TextNormalizer::new();
        let mut buf = String::with_capacity(64);
        let cap = buf.capacity();

        normalizer.normalize_into("HELLO!", &mut buf);
        assert_eq!(buf, "hello");
        assert_eq!(buf.capacity(), cap);

        normalizer.normalize_into("WORLD 42", &mut buf);
        assert_eq!(buf, "world");
        assert_eq!(buf.capacity(), cap);
    }

    #[test]
    fn output_not_longer_for_ascii() {
        let input = "HELLO,   WORLD!!!";
        assert!(norm(input).len() <= input.len());
    }

    #[test]
    fn very_long_ascii() {
        let input = "A1!".repeat(10_000);
        let out = norm(&input);
        assert_eq!(out.len(), 10_000);
        assert!(out.chars().all(|c| c == 'a'));
    }
}
