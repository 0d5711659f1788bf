//! Candidate lists for autocompletion.
//!
//! The application owns the candidates and shares them as an
//! `Rc<dyn StringList>`; a [`FilteredList`] keeps an index view over them
//! and never copies the strings.

use std::rc::Rc;

/// A read-only list of strings.
pub trait StringList {
    fn len(&self) -> usize;
    fn get(&self, index: usize) -> Option<&str>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl StringList for Vec<String> {
    fn len(&self) -> usize {
        self.as_slice().len()
    }

    fn get(&self, index: usize) -> Option<&str> {
        self.as_slice().get(index).map(String::as_str)
    }
}

impl StringList for Vec<&'static str> {
    fn len(&self) -> usize {
        self.as_slice().len()
    }

    fn get(&self, index: usize) -> Option<&str> {
        self.as_slice().get(index).copied()
    }
}

/// A prefix-filtered view over a shared [`StringList`].
pub struct FilteredList {
    source: Rc<dyn StringList>,
    prefix: Option<String>,
    visible: Vec<usize>,
}

impl FilteredList {
    /// An unfiltered view.
    #[must_use]
    pub fn new(source: Rc<dyn StringList>) -> Self {
        let mut list = Self {
            source,
            prefix: None,
            visible: Vec::new(),
        };
        list.refresh();
        list
    }

    /// Keep only candidates starting with `prefix`, in source order.
    pub fn set_filter(&mut self, prefix: &str) {
        self.prefix = Some(prefix.to_string());
        self.refresh();
    }

    /// Show every candidate again.
    pub fn reset_filter(&mut self) {
        self.prefix = None;
        self.refresh();
    }

    /// Re-run the filter (after the source changed).
    pub fn refresh(&mut self) {
        let source = &self.source;
        let prefix = self.prefix.as_deref();
        self.visible = (0..source.len())
            .filter(|&i| {
                source
                    .get(i)
                    .is_some_and(|s| prefix.is_none_or(|p| s.starts_with(p)))
            })
            .collect();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.visible.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }

    /// The `index`-th visible candidate.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.visible.get(index).and_then(|&i| self.source.get(i))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.visible.iter().filter_map(|&i| self.source.get(i))
    }
}

impl std::fmt::Debug for FilteredList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn fruit() -> Rc<dyn StringList> {
        Rc::new(vec!["apple", "apricot", "banana"])
    }

    #[test]
    fn prefix_filter_keeps_order() {
        let mut list = FilteredList::new(fruit());
        list.set_filter("ap");
        assert_eq!(list.iter().collect::<Vec<_>>(), vec!["apple", "apricot"]);
        list.set_filter("apr");
        assert_eq!(list.get(0), Some("apricot"));
        assert_eq!(list.get(1), None);
    }

    #[test]
    fn reset_restores_everything() {
        let mut list = FilteredList::new(fruit());
        list.set_filter("b");
        assert_eq!(list.len(), 1);
        list.reset_filter();
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn no_match_is_empty() {
        let mut list = FilteredList::new(fruit());
        list.set_filter("cherry");
        assert!(list.is_empty());
    }

    #[test]
    fn owned_strings_work_too() {
        let source: Rc<dyn StringList> = Rc::new(vec!["x".to_string(), "xy".to_string()]);
        let mut list = FilteredList::new(source);
        list.set_filter("xy");
        assert_eq!(list.iter().collect::<Vec<_>>(), vec!["xy"]);
    }
}
