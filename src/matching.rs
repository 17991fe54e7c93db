//! Matching results and capture bookkeeping.

use itertools::Itertools;

/// A captured span of the input sequence.
///
/// Group 0 always covers the whole match; further groups are reported in
/// order of their start positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Group {
    start: usize,
    end: usize,
}

impl Group {
    pub(crate) fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Start position of the captured span (inclusive).
    pub fn start(&self) -> usize {
        self.start
    }

    /// End position of the captured span (exclusive).
    pub fn end(&self) -> usize {
        self.end
    }

    /// Number of captured elements.
    pub fn size(&self) -> usize {
        self.end - self.start
    }

    /// The captured slice of `items`, or `None` when the span is empty or
    /// does not fit the provided sequence.
    pub fn hits<'a, T>(&self, items: &'a [T]) -> Option<&'a [T]> {
        if self.size() == 0 || self.end > items.len() {
            return None;
        }
        Some(&items[self.start..self.end])
    }
}

/// The result of a single matching attempt.
///
/// Failure is a value, not an error: an unsuccessful match propagates
/// through the pattern graph and never exposes positions. A successful
/// match that ends in an optional tail which consumed nothing is marked
/// not *complete*; the matcher holds such a match back while a stronger
/// candidate may still appear.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    success: bool,
    complete: bool,
    start: usize,
    end: usize,
    groups: Vec<Group>,
}

impl Match {
    /// The unsuccessful match.
    pub(crate) fn fail() -> Self {
        Self {
            success: false,
            complete: true,
            start: 0,
            end: 0,
            groups: Vec::new(),
        }
    }

    /// A successful match over `[start, end)`.
    pub(crate) fn success(start: usize, end: usize) -> Self {
        Self {
            success: true,
            complete: true,
            start,
            end,
            groups: Vec::new(),
        }
    }

    /// A zero-length successful match at `start`.
    pub(crate) fn empty(start: usize) -> Self {
        Self::success(start, start)
    }

    /// A zero-length success at `start` that marks the whole attempt as
    /// not complete.
    pub(crate) fn incomplete(start: usize) -> Self {
        Self {
            complete: false,
            ..Self::empty(start)
        }
    }

    pub(crate) fn is_success(&self) -> bool {
        self.success
    }

    pub(crate) fn is_complete(&self) -> bool {
        self.complete
    }

    /// Start position of the match (inclusive).
    pub fn start(&self) -> usize {
        self.start
    }

    /// End position of the match (exclusive).
    pub fn end(&self) -> usize {
        self.end
    }

    /// Number of matched elements.
    pub fn size(&self) -> usize {
        self.end - self.start
    }

    /// Capture groups of this match, ordered by start position.
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// A capture group by index; group 0 is the whole match.
    pub fn group(&self, index: usize) -> Option<Group> {
        self.groups.get(index).copied()
    }

    /// The matched slice of `items`, or `None` when the match is empty or
    /// does not fit the provided sequence.
    pub fn hits<'a, T>(&self, items: &'a [T]) -> Option<&'a [T]> {
        if !self.success || self.size() == 0 || self.end > items.len() {
            return None;
        }
        Some(&items[self.start..self.end])
    }

    /// Conjunction with the match of a following chain element. Succeeds
    /// only when both sides do, covering the united span and carrying the
    /// captures of both.
    pub(crate) fn and(self, other: Match) -> Match {
        if !self.success || !other.success {
            return Match::fail();
        }
        let mut groups = self.groups;
        groups.extend(other.groups);
        Match {
            success: true,
            complete: self.complete && other.complete,
            start: self.start.min(other.start),
            end: self.end.max(other.end),
            groups,
        }
    }

    /// Appends capture groups in a builder-like manner; no-op on a failed
    /// match or an empty list.
    pub(crate) fn with_groups(mut self, groups: Vec<Group>) -> Match {
        if !self.success || groups.is_empty() {
            return self;
        }
        self.groups.extend(groups);
        self
    }
}

/// Accumulates the capture spans produced by the iterations of one
/// quantified node.
///
/// A repeated group only keeps its last iteration, the way RegExp engines
/// treat `/(ab)+/`: each addition after the first evicts the span recorded
/// by the previous iteration before inserting the new one. Accumulators of
/// non-capturing nodes are disabled no-ops.
#[derive(Debug)]
pub(crate) struct GroupCollection {
    enabled: bool,
    groups: Vec<Group>,
    previous: Option<(usize, usize)>,
}

impl GroupCollection {
    pub(crate) fn new(enabled: bool) -> Self {
        Self {
            enabled,
            groups: Vec::new(),
            previous: None,
        }
    }

    /// Records the span of one iteration plus the nested captures of its
    /// inner match.
    pub(crate) fn add(&mut self, iteration: usize, start: usize, end: usize, nested: &Match) {
        if !self.enabled {
            return;
        }
        if iteration > 0
            && let Some((prev_start, prev_end)) = self.previous
            && let Some(found) = self
                .groups
                .iter()
                .position(|g| g.start() == prev_start && g.end() == prev_end)
        {
            self.groups.remove(found);
        }
        self.previous = Some((start, end));
        self.groups.push(Group::new(start, end));
        self.groups.extend_from_slice(nested.groups());
    }

    /// Drains the collected groups, ordered by start position.
    pub(crate) fn drain(&mut self) -> Vec<Group> {
        self.groups
            .drain(..)
            .sorted_by_key(Group::start)
            .collect()
    }
}
