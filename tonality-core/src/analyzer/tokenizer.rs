//! Streaming word tokenizer.
//!
//! Splits cleaned review text into the terms the TF-IDF vocabulary was
//! built from. A term is a run of word characters (Unicode alphanumerics
//! and `_`) at least `min_chars` characters long, which mirrors the usual
//! `\b\w\w+\b` token pattern.
//!
//! ```ignore
//! "this product is a gem" -> "this" "product" "is" "gem"
//! ```
//!
//! Tokens are slices of the input and are emitted through a callback, so
//! tokenizing allocates nothing. The input is expected to come out of the
//! normalizer (single spaces, no leading or trailing whitespace); other
//! input still tokenizes correctly, just without the fast space scan
//! doing all the work.

use memchr::memchr_iter;

/// Default minimum token length in characters.
pub const DEFAULT_MIN_TOKEN_CHARS: usize = 2;

#[inline(always)]
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Word tokenizer with a minimum token length.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Tokenizer {
    min_chars: usize,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_TOKEN_CHARS)
    }
}

impl Tokenizer {
    /// Creates a tokenizer that drops tokens shorter than `min_chars`.
    ///
    /// A `min_chars` of zero behaves like one.
    #[inline]
    pub const fn new(min_chars: usize) -> Self {
        Self { min_chars }
    }

    /// Minimum token length in characters.
    #[inline(always)]
    pub const fn min_chars(&self) -> usize {
        self.min_chars
    }

    /// Tokenizes `text`, emitting tokens in order.
    pub fn tokenize<'t, F>(&self, text: &'t str, mut emit: F)
    where
        F: FnMut(&'t str),
    {
        let bytes = text.as_bytes();
        if bytes.is_empty() {
            return;
        }

        let mut start = 0usize;

        for i in memchr_iter(b' ', bytes) {
            if start < i {
                self.split_segment(&text[start..i], &mut emit);
            }
            start = i + 1;
        }

        if start < bytes.len() {
            self.split_segment(&text[start..], &mut emit);
        }
    }

    /// Collects tokens into a vector.
    pub fn tokens<'t>(&self, text: &'t str) -> Vec<&'t str> {
        let mut out = Vec::new();
        self.tokenize(text, |token| out.push(token));
        out
    }

    fn split_segment<'t, F>(&self, segment: &'t str, emit: &mut F)
    where
        F: FnMut(&'t str),
    {
        let mut run_start: Option<usize> = None;
        let mut run_chars = 0usize;

        for (idx, ch) in segment.char_indices() {
            if is_word_char(ch) {
                if run_start.is_none() {
                    run_start = Some(idx);
                    run_chars = 0;
                }
                run_chars += 1;
            } else if let Some(s) = run_start.take() {
                self.emit_run(&segment[s..idx], run_chars, emit);
            }
        }

        if let Some(s) = run_start {
            self.emit_run(&segment[s..], run_chars, emit);
        }
    }

    #[inline(always)]
    fn emit_run<'t, F>(&self, token: &'t str, chars: usize, emit: &mut F)
    where
        F: FnMut(&'t str),
    {
        if chars >= self.min_chars.max(1) {
            emit(token);
        }
    }
}
