//! Pattern matchers for buffer search and replace.
//!
//! The buffer walks lines; a [`Finder`] answers "where is the first (or
//! last) match inside this byte range of this line" and "what replaces this
//! match". Two matchers ship:
//!
//! - [`PlainFinder`]: literal text, optionally ASCII case-insensitive.
//! - [`RegexFinder`]: a `regex` pattern; the replacement may use `$1`
//!   style group references.
//!
//! Both support whole-word matching. Matches never span lines.

use bitflags::bitflags;
use regex::{Regex, RegexBuilder};
use thiserror::Error;

use crate::word::{CharClass, classify};

bitflags! {
    /// Search options.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct FindFlags: u8 {
        const IGNORE_CASE = 1 << 0;
        const WHOLE_WORD  = 1 << 1;
        const BACKWARD    = 1 << 2;
        /// Continue from the other end of the buffer.
        const WRAP        = 1 << 3;
    }
}

/// Errors from building a matcher.
#[derive(Debug, Error)]
pub enum FindError {
    #[error("empty search pattern")]
    EmptyPattern,
    #[error("invalid regular expression: {0}")]
    InvalidPattern(#[from] regex::Error),
}

/// A matcher over single lines.
pub trait Finder {
    /// The first match (last when `reverse`) lying entirely inside
    /// `line[from..to]`, as a byte range.
    fn find_in(&self, line: &str, from: usize, to: usize, reverse: bool) -> Option<(usize, usize)>;

    /// Text that replaces `matched`.
    fn replacement(&self, matched: &str) -> String;

    fn flags(&self) -> FindFlags;
}

fn is_word_at(line: &str, start: usize, end: usize) -> bool {
    let is_word = |ch: char| classify(ch.encode_utf8(&mut [0; 4])) == CharClass::Word;
    let before = line[..start].chars().next_back();
    let first = line[start..end].chars().next();
    let last = line[start..end].chars().next_back();
    let after = line[end..].chars().next();
    let left_ok = !(before.is_some_and(is_word) && first.is_some_and(is_word));
    let right_ok = !(after.is_some_and(is_word) && last.is_some_and(is_word));
    left_ok && right_ok
}

// ---------------------------------------------------------------------------
// PlainFinder
// ---------------------------------------------------------------------------

/// Literal text matcher.
#[derive(Debug, Clone)]
pub struct PlainFinder {
    needle: String,
    replacement: String,
    flags: FindFlags,
}

impl PlainFinder {
    /// # Errors
    ///
    /// [`FindError::EmptyPattern`] for an empty needle.
    pub fn new(needle: &str, replacement: &str, flags: FindFlags) -> Result<Self, FindError> {
        if needle.is_empty() {
            return Err(FindError::EmptyPattern);
        }
        Ok(Self {
            needle: needle.to_string(),
            replacement: replacement.to_string(),
            flags,
        })
    }

    fn matches_at(&self, line: &str, i: usize) -> bool {
        let end = i + self.needle.len();
        let Some(candidate) = line.get(i..end) else {
            return false;
        };
        let equal = if self.flags.contains(FindFlags::IGNORE_CASE) {
            candidate.eq_ignore_ascii_case(&self.needle)
        } else {
            candidate == self.needle
        };
        equal && (!self.flags.contains(FindFlags::WHOLE_WORD) || is_word_at(line, i, end))
    }
}

impl Finder for PlainFinder {
    fn find_in(&self, line: &str, from: usize, to: usize, reverse: bool) -> Option<(usize, usize)> {
        let to = to.min(line.len());
        if from > to || to - from < self.needle.len() {
            return None;
        }
        let last_start = to - self.needle.len();
        let hit = |i: &usize| line.is_char_boundary(*i) && self.matches_at(line, *i);
        let start = if reverse {
            (from..=last_start).rev().find(hit)
        } else {
            (from..=last_start).find(hit)
        }?;
        Some((start, start + self.needle.len()))
    }

    fn replacement(&self, _matched: &str) -> String {
        self.replacement.clone()
    }

    fn flags(&self) -> FindFlags {
        self.flags
    }
}

// ---------------------------------------------------------------------------
// RegexFinder
// ---------------------------------------------------------------------------

/// Regular-expression matcher.
#[derive(Debug, Clone)]
pub struct RegexFinder {
    regex: Regex,
    replacement: String,
    flags: FindFlags,
}

impl RegexFinder {
    /// # Errors
    ///
    /// [`FindError::InvalidPattern`] when `pattern` does not compile,
    /// [`FindError::EmptyPattern`] when it is empty.
    pub fn new(pattern: &str, replacement: &str, flags: FindFlags) -> Result<Self, FindError> {
        if pattern.is_empty() {
            return Err(FindError::EmptyPattern);
        }
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(flags.contains(FindFlags::IGNORE_CASE))
            .build()?;
        Ok(Self {
            regex,
            replacement: replacement.to_string(),
            flags,
        })
    }
}

impl Finder for RegexFinder {
    fn find_in(&self, line: &str, from: usize, to: usize, reverse: bool) -> Option<(usize, usize)> {
        let to = to.min(line.len());
        let haystack = line.get(..to)?;
        if from > to {
            return None;
        }
        let mut found = None;
        let mut at = from;
        while at <= to {
            let Some(m) = self.regex.find_at(haystack, at) else {
                break;
            };
            let accepted = !m.is_empty()
                && (!self.flags.contains(FindFlags::WHOLE_WORD)
                    || is_word_at(line, m.start(), m.end()));
            if accepted {
                found = Some((m.start(), m.end()));
                if !reverse {
                    break;
                }
            }
            // Step past this match start, staying on a char boundary.
            at = m.start() + haystack[m.start()..].chars().next().map_or(1, char::len_utf8);
        }
        found
    }

    fn replacement(&self, matched: &str) -> String {
        match self.regex.captures(matched) {
            Some(caps) => {
                let mut out = String::new();
                caps.expand(&self.replacement, &mut out);
                out
            }
            None => self.replacement.clone(),
        }
    }

    fn flags(&self) -> FindFlags {
        self.flags
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
