//! Matcher driver: scanning, iteration, replacement, and splitting.

use crate::graph::Pattern;
use crate::matching::{Group, Match};

/// Applies a [`Pattern`] to a sequence of items, scanning for successive
/// matches and deriving replaced and split views of the input.
///
/// A matcher carries the cursor state of one scan; create one matcher per
/// consumer. The pattern itself stays read-only and can be shared freely.
pub struct Matcher<'a, T> {
    pattern: &'a Pattern<T>,
    items: &'a [T],
    current: Option<Match>,
}

impl<'a, T> Matcher<'a, T> {
    pub(crate) fn new(pattern: &'a Pattern<T>, items: &'a [T]) -> Self {
        Self {
            pattern,
            items,
            current: None,
        }
    }

    /// Start position of the current match.
    pub fn start(&self) -> Option<usize> {
        self.current.as_ref().map(|m| m.start())
    }

    /// End position of the current match.
    pub fn end(&self) -> Option<usize> {
        self.current.as_ref().map(|m| m.end())
    }

    /// Length of the current match; 0 when there is none.
    pub fn size(&self) -> usize {
        self.current.as_ref().map(|m| m.size()).unwrap_or(0)
    }

    /// Capture groups of the current match, ordered by start position;
    /// group 0 is the whole match. Empty when there is no current match.
    pub fn groups(&self) -> &[Group] {
        self.current.as_ref().map(|m| m.groups()).unwrap_or(&[])
    }

    /// A capture group by index, or `None` when no such group exists.
    pub fn group(&self, index: usize) -> Option<Group> {
        self.groups().get(index).copied()
    }

    /// The matched slice of the input, or `None` when there is no current
    /// match.
    pub fn hits(&self) -> Option<&'a [T]> {
        self.current.as_ref().and_then(|m| m.hits(self.items))
    }

    /// Forgets the current match so the next [`Matcher::find`] scans from
    /// the beginning.
    pub fn reset(&mut self) {
        self.current = None;
    }

    /// Finds the next match. The scan continues at the end of the previous
    /// successful match, or starts at the beginning after a reset.
    pub fn find(&mut self) -> bool {
        let from = self.end().unwrap_or(0);
        self.find_at(from)
    }

    /// Scans for the first acceptable match at or after `position`.
    ///
    /// A complete match is adopted immediately. An incomplete one (ending
    /// in an optional tail that consumed nothing) is held as a challenger
    /// and promoted only if no complete match follows.
    pub(crate) fn find_at(&mut self, position: usize) -> bool {
        if self.items.is_empty() || (position > 0 && self.pattern.must_be_first()) {
            return false;
        }
        let mut challenger: Option<Match> = None;
        for start in position..self.items.len() {
            if start > 0 && self.pattern.must_be_first() {
                // An anchored pattern cannot match further in; any
                // challenger found at position 0 still stands.
                break;
            }
            let result = self.pattern.get_match(self.items, start);
            if result.is_success()
                && result.size() > 0
                && self.is_proper_closing(start, result.size())
            {
                if result.is_complete() {
                    self.current = Some(result);
                    return true;
                }
                if challenger.is_none() {
                    challenger = Some(result);
                }
            }
        }
        if challenger.is_some() {
            self.current = challenger;
            return true;
        }
        self.reset();
        false
    }

    fn is_proper_closing(&self, position: usize, length: usize) -> bool {
        !self.pattern.must_be_last() || position + length == self.items.len()
    }

    /// Returns the input with every match replaced by a single value.
    pub fn replace_with(&mut self, replacement: T) -> Vec<T>
    where
        T: Clone,
    {
        self.replace_with_list_fn(|_| vec![replacement.clone()])
    }

    /// Returns the input with every match replaced by a value derived from
    /// the match.
    pub fn replace_with_fn(&mut self, mut transform: impl FnMut(&Match) -> T) -> Vec<T>
    where
        T: Clone,
    {
        self.replace_with_list_fn(|m| vec![transform(m)])
    }

    /// Returns the input with every match replaced by the given items. An
    /// empty replacement deletes the matched spans.
    pub fn replace_with_list(&mut self, replacement: &[T]) -> Vec<T>
    where
        T: Clone,
    {
        self.replace_with_list_fn(|_| replacement.to_vec())
    }

    /// Returns the input with every match replaced by a list derived from
    /// the match.
    ///
    /// All matches are collected first, then spliced in from the rightmost
    /// one back, so earlier offsets stay valid while the sequence changes
    /// length.
    pub fn replace_with_list_fn(&mut self, mut replacement: impl FnMut(&Match) -> Vec<T>) -> Vec<T>
    where
        T: Clone,
    {
        if self.items.is_empty() {
            return Vec::new();
        }
        self.reset();
        let mut found = Vec::new();
        while self.find() {
            if let Some(current) = &self.current {
                found.push(current.clone());
            }
        }
        let mut result = self.items.to_vec();
        for m in found.iter().rev() {
            result.splice(m.start()..m.end(), replacement(m));
        }
        result
    }

    /// Splits the input into the chunks between matches, lazily.
    ///
    /// When the pattern does not occur at all, the whole input is the only
    /// chunk. A match ending exactly at the end of the input does not
    /// produce a trailing empty chunk.
    pub fn split(&mut self) -> Split<'a, '_, T> {
        Split {
            matcher: self,
            last_position: 0,
        }
    }
}

/// Lazy iterator over the chunks between matches.
///
/// Created by [`Matcher::split`].
pub struct Split<'a, 'm, T> {
    matcher: &'m mut Matcher<'a, T>,
    last_position: usize,
}

impl<'a, T> Iterator for Split<'a, '_, T> {
    type Item = &'a [T];

    fn next(&mut self) -> Option<&'a [T]> {
        let items = self.matcher.items;
        if items.is_empty() || self.last_position >= items.len() {
            return None;
        }
        let boundary = if self.matcher.find_at(self.last_position) {
            self.matcher.start().unwrap_or(items.len())
        } else {
            items.len()
        };
        let chunk = &items[self.last_position..boundary];
        self.last_position = boundary + self.matcher.size();
        Some(chunk)
    }
}
