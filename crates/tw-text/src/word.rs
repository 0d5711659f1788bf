//! Word navigation within a single line.
//!
//! Text is split into grapheme clusters and each cluster is classified:
//!
//! | Class | Members |
//! |-------|---------|
//! | [`CharClass::Word`] | letters, digits, underscore |
//! | [`CharClass::Punctuation`] | every other non-blank cluster |
//! | [`CharClass::Blank`] | whitespace |
//!
//! A **run** is a maximal sequence of clusters with the same class; word
//! boundaries sit at class transitions. `hello.world` has three runs.
//!
//! | Function | Result |
//! |----------|--------|
//! | [`next_word`] | start of the next non-blank run |
//! | [`previous_word`] | start of the non-blank run before `pos` |
//! | [`next_word_boundary`] | end of the run at `pos` |
//! | [`previous_word_boundary`] | start of the run before `pos` |
//! | [`word_at`] | the run containing `pos` (double-click) |
//!
//! All positions are byte offsets on cluster boundaries. Classification is
//! pluggable through [`Classifier`] so line subtypes can treat, say, `-`
//! as part of a word.

use unicode_segmentation::UnicodeSegmentation;

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Cluster class for word boundary detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    Blank,
    Word,
    Punctuation,
}

/// Maps a grapheme cluster to its class.
pub type Classifier = fn(&str) -> CharClass;

/// The default classifier: looks at the cluster's base character.
#[must_use]
pub fn classify(cluster: &str) -> CharClass {
    match cluster.chars().next() {
        None => CharClass::Blank,
        Some(ch) if ch.is_whitespace() => CharClass::Blank,
        Some(ch) if ch.is_alphanumeric() || ch == '_' => CharClass::Word,
        Some(_) => CharClass::Punctuation,
    }
}

fn classes_from(text: &str, pos: usize, cls: Classifier) -> impl Iterator<Item = (usize, CharClass)> + '_ {
    text[pos..]
        .grapheme_indices(true)
        .map(move |(i, g)| (pos + i, cls(g)))
}

fn classes_before(text: &str, pos: usize, cls: Classifier) -> impl Iterator<Item = (usize, CharClass)> + '_ {
    text[..pos]
        .grapheme_indices(true)
        .rev()
        .map(move |(i, g)| (i, cls(g)))
}

// ---------------------------------------------------------------------------
// Motions
// ---------------------------------------------------------------------------

/// Start of the next non-blank run after `pos`, skipping the rest of the
/// run at `pos` and any blanks. `None` when no such run exists.
#[must_use]
pub fn next_word(text: &str, pos: usize, cls: Classifier) -> Option<usize> {
    let mut iter = classes_from(text, pos, cls);
    let (_, start_class) = iter.next()?;
    let mut in_run = start_class != CharClass::Blank;
    for (i, class) in iter {
        if in_run && class == start_class {
            continue;
        }
        in_run = false;
        if class != CharClass::Blank {
            return Some(i);
        }
    }
    None
}

/// Start of the non-blank run before `pos`, skipping blanks first.
/// `Some(0)` when only blanks precede `pos`, `None` at offset 0.
#[must_use]
pub fn previous_word(text: &str, pos: usize, cls: Classifier) -> Option<usize> {
    if pos == 0 {
        return None;
    }
    let mut run: Option<(usize, CharClass)> = None;
    for (i, class) in classes_before(text, pos, cls) {
        match run {
            None if class == CharClass::Blank => {}
            None => run = Some((i, class)),
            Some((_, k)) if k == class => run = Some((i, k)),
            Some(_) => break,
        }
    }
    Some(run.map_or(0, |(i, _)| i))
}

/// End of the run that starts at `pos`. `None` at the end of the text.
#[must_use]
pub fn next_word_boundary(text: &str, pos: usize, cls: Classifier) -> Option<usize> {
    let mut iter = classes_from(text, pos, cls);
    let (_, start_class) = iter.next()?;
    Some(
        iter.find(|&(_, class)| class != start_class)
            .map_or(text.len(), |(i, _)| i),
    )
}

/// Start of the run ending at `pos`. `None` at offset 0.
#[must_use]
pub fn previous_word_boundary(text: &str, pos: usize, cls: Classifier) -> Option<usize> {
    let mut iter = classes_before(text, pos, cls);
    let (mut start, class) = iter.next()?;
    for (i, k) in iter {
        if k != class {
            break;
        }
        start = i;
    }
    Some(start)
}

/// The run containing the cluster at `pos` as `(start, end)`. At the end of
/// the text the last run is used. Empty text yields `(0, 0)`.
#[must_use]
pub fn word_at(text: &str, pos: usize, cls: Classifier) -> (usize, usize) {
    if text.is_empty() {
        return (0, 0);
    }
    if pos >= text.len() {
        let start = previous_word_boundary(text, text.len(), cls).unwrap_or(0);
        return (start, text.len());
    }
    let end = next_word_boundary(text, pos, cls).unwrap_or(text.len());
    let class = classes_from(text, pos, cls).next().map(|(_, k)| k);
    let mut start = pos;
    for (i, k) in classes_before(text, pos, cls) {
        if Some(k) != class {
            break;
        }
        start = i;
    }
    (start, end)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
