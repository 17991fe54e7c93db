//! The quantified matching algorithm.
//!
//! Each pattern node is probed through [`Pattern::find_quantified`], which
//! consumes as many atomic matches as the node's quantifier allows.
//! Consumption is greedy, but a look-ahead keeps trailing chain elements
//! satisfiable: before taking one more element the algorithm checks whether
//! the rest of the pattern could still match afterwards, and stops early
//! when it could not.

use std::ops::ControlFlow;

use crate::graph::{NodeId, NodeKind, Pattern};
use crate::matching::{GroupCollection, Match};

impl<T> Pattern<T> {
    /// One atomic probe of `id` at `position`, ignoring the quantifier.
    pub(crate) fn find_one(&self, id: NodeId, items: &[T], position: usize) -> Match {
        match &self.node(id).kind {
            NodeKind::Single(predicate) => {
                if position < items.len() && predicate(&items[position]) {
                    Match::success(position, position + 1)
                } else {
                    Match::fail()
                }
            }
            NodeKind::Group { entry: Some(entry) } => {
                self.find_quantified(*entry, items, position)
            }
            NodeKind::Group { entry: None } => Match::fail(),
            NodeKind::Alternative { options } => {
                for &option in options {
                    let result = self.find_one(option, items, position);
                    if result.is_success() {
                        return result;
                    }
                }
                Match::fail()
            }
        }
    }

    /// Quantifier-aware search for `id` starting at `position`.
    pub(crate) fn find_quantified(&self, id: NodeId, items: &[T], position: usize) -> Match {
        Finder::new(self, id, items, position).find()
    }

    /// Initializes the capture accumulator for `id`: enabled for groups and
    /// for alternations that contain a group option.
    fn captures_for(&self, id: NodeId) -> GroupCollection {
        let enabled = match &self.node(id).kind {
            NodeKind::Single(_) => false,
            NodeKind::Group { .. } => true,
            NodeKind::Alternative { options } => options
                .iter()
                .any(|&option| matches!(self.node(option).kind, NodeKind::Group { .. })),
        };
        GroupCollection::new(enabled)
    }
}

/// Iterates the atomic matches of one node, honoring its quantifier bounds,
/// its sibling chain, and its upstream reentry point.
struct Finder<'a, T> {
    pattern: &'a Pattern<T>,
    node: NodeId,
    items: &'a [T],
    position: usize,
    captures: GroupCollection,
    count: usize,
    cursor: usize,
}

impl<'a, T> Finder<'a, T> {
    fn new(pattern: &'a Pattern<T>, node: NodeId, items: &'a [T], position: usize) -> Self {
        let captures = pattern.captures_for(node);
        Self {
            pattern,
            node,
            items,
            position,
            captures,
            count: 0,
            cursor: position,
        }
    }

    fn find(mut self) -> Match {
        let (min, max) = self.bounds();
        let mut current = self.probe();

        if !current.is_success() {
            if min > 0 {
                return Match::fail();
            }
            // The quantifier tolerates zero matches: matching may continue
            // above the enclosing group, or at the sibling. A zero-length
            // success is reported only when nothing can take over, and it
            // is not complete — a later scan position may still yield a
            // stronger match. No capture is recorded on this path.
            if self.upstream_match(self.cursor).is_success() {
                return Match::incomplete(self.cursor);
            }
            return self.sibling_match(self.cursor, Match::incomplete(self.cursor));
        }

        while current.is_success() {
            match self.advance(current) {
                ControlFlow::Break(result) => return result,
                ControlFlow::Continue(next) => current = next,
            }
        }

        // The scan ran dry. An exact quantifier landing here has not
        // reached its count; otherwise report the consumed span and hand
        // over to the sibling chain.
        if min == max || self.count < min {
            return Match::fail();
        }
        self.terminal()
    }

    /// Records the capture for `current`, advances the cursor, and decides
    /// whether the greedy scan stops here.
    fn advance(&mut self, current: Match) -> ControlFlow<Match, Match> {
        let (min, max) = self.bounds();

        self.captures
            .add(self.count, self.cursor, self.cursor + current.size(), &current);
        self.count += 1;
        self.cursor = current.end();

        if self.count == max {
            return ControlFlow::Break(self.terminal());
        }
        if min != max
            && self.count >= min
            && let Some(result) = self.early_exit()
        {
            return ControlFlow::Break(result);
        }

        let next = self.probe();
        // A zero-width result would repeat forever; stop the scan instead.
        if next.is_success() && next.size() == 0 {
            return ControlFlow::Continue(Match::fail());
        }
        ControlFlow::Continue(next)
    }

    /// Greedy consumption must not starve a trailing pattern. With the
    /// minimum satisfied, probe whether the rest of the pattern matches if
    /// the cursor stays put but not if it advances; in that case the scan
    /// ends now.
    fn early_exit(&mut self) -> Option<Match> {
        let cursor = self.cursor;
        let here = self.probe();
        let sibling = self.sibling_match(cursor, Match::fail());

        if !here.is_success() && sibling.is_success() {
            let groups = self.captures.drain();
            return Some(
                Match::success(self.position, cursor)
                    .and(sibling)
                    .with_groups(groups),
            );
        }

        let upstream = self.upstream_match(cursor);
        if here.is_success()
            && upstream.is_success()
            && !self.upstream_match(cursor + 1).is_success()
        {
            // The reentry above the group is satisfied now but would not be
            // after one more element.
            let groups = self.captures.drain();
            return Some(Match::success(self.position, cursor).with_groups(groups));
        }
        if !here.is_success() && upstream.is_success() {
            let groups = self.captures.drain();
            return Some(Match::success(self.position, cursor).with_groups(groups));
        }
        if here.is_success()
            && sibling.is_success()
            && !self
                .sibling_match(cursor + 1, Match::empty(cursor + 1))
                .is_success()
        {
            let groups = self.captures.drain();
            return Some(
                Match::success(self.position, cursor)
                    .and(sibling)
                    .with_groups(groups),
            );
        }
        None
    }

    /// The consumed span joined with the sibling chain's match.
    fn terminal(&mut self) -> Match {
        let groups = self.captures.drain();
        Match::success(self.position, self.cursor)
            .and(self.sibling_match(self.cursor, Match::empty(self.cursor)))
            .with_groups(groups)
    }

    fn bounds(&self) -> (usize, usize) {
        let node = self.pattern.node(self.node);
        (node.min, node.max)
    }

    fn probe(&self) -> Match {
        self.pattern.find_one(self.node, self.items, self.cursor)
    }

    /// The match of the next chain element at `position`, or `default` when
    /// the chain ends here.
    fn sibling_match(&self, position: usize, default: Match) -> Match {
        match self.pattern.node(self.node).next {
            Some(next) => self.pattern.find_quantified(next, self.items, position),
            None => default,
        }
    }

    /// The match at the reentry point above the enclosing group. Only a
    /// node that closes its chain may defer upstream.
    fn upstream_match(&self, position: usize) -> Match {
        let node = self.pattern.node(self.node);
        if node.next.is_some() {
            return Match::fail();
        }
        match node.upstream {
            Some(upstream) => self.pattern.find_quantified(upstream, self.items, position),
            None => Match::fail(),
        }
    }
}
