//! Fluent pattern construction.
//!
//! Building walks left to right: each token-adding call appends a node to
//! the chain and returns a [`TokenBuilder`] whose quantifier, alternation,
//! and tag methods apply to that pending token. `build` wraps the finished
//! chain in an outer group, so the complete match is always capture 0.

use std::fmt;

use crate::graph::{self, Node, NodeId, NodeKind, Pattern};

/// Errors raised by pattern construction.
///
/// Runtime matching never errors; failed matches surface as `false` from
/// `find` and as empty iterators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    /// A builder operation that cannot apply, such as a reversed
    /// quantifier range.
    InvalidBuilderOp(String),
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidBuilderOp(reason) => write!(f, "Invalid builder operation: {reason}"),
        }
    }
}

impl std::error::Error for PatternError {}

/// Builds a [`Pattern`] token by token.
pub struct PatternBuilder<T> {
    nodes: Vec<Node<T>>,
    head: Option<NodeId>,
    must_be_first: bool,
}

impl<T> PatternBuilder<T> {
    pub(crate) fn new() -> Self {
        Self {
            nodes: Vec::new(),
            head: None,
            must_be_first: false,
        }
    }

    /// Anchors the pattern to the start of the input: a match may only
    /// begin at position 0.
    pub fn beginning(mut self) -> Self {
        self.must_be_first = true;
        self
    }

    /// Adds a token matching any element.
    pub fn any(self) -> TokenBuilder<T> {
        self.token_fn(|_| true)
    }

    /// Adds a token matching elements equal to `sample`.
    pub fn token(self, sample: T) -> TokenBuilder<T>
    where
        T: PartialEq + Send + Sync + 'static,
    {
        self.token_fn(move |item| *item == sample)
    }

    /// Adds a token matching elements accepted by `predicate`.
    pub fn token_fn(
        mut self,
        predicate: impl Fn(&T) -> bool + Send + Sync + 'static,
    ) -> TokenBuilder<T> {
        let id = self.push(NodeKind::Single(Box::new(predicate)));
        self.store(id);
        TokenBuilder {
            builder: self,
            pending: id,
        }
    }

    /// Adds a nested capturing group. Accepts a built [`Pattern`] or any
    /// builder stage.
    pub fn group(mut self, sub: impl Into<Pattern<T>>) -> TokenBuilder<T> {
        let id = graph::absorb(&mut self.nodes, sub.into());
        self.store(id);
        TokenBuilder {
            builder: self,
            pending: id,
        }
    }

    /// Anchors the last token to the end of the input: a match must end at
    /// the final element.
    pub fn ending(mut self) -> PatternFinalizer<T> {
        if let Some(head) = self.head {
            let last = graph::last_of(&self.nodes, head);
            self.nodes[last.0].must_be_last = true;
        }
        PatternFinalizer { builder: self }
    }

    /// Completes the pattern, wrapping the chain as the outer group.
    pub fn build(mut self) -> Pattern<T> {
        let entry = self.head;
        let root = self.push(NodeKind::Group { entry });
        Pattern {
            nodes: self.nodes,
            root,
        }
    }

    fn push(&mut self, kind: NodeKind<T>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(kind));
        id
    }

    fn store(&mut self, id: NodeId) {
        match self.head {
            None => {
                self.nodes[id.0].must_be_first = self.must_be_first;
                self.head = Some(id);
            }
            Some(head) => graph::append_sibling(&mut self.nodes, head, id),
        }
    }

    /// Merges `id` into the chain tail as an alternative. The tail is
    /// replaced by an alternation node (or extended, when it already is
    /// one); returns the node the pending-token operations now target.
    fn store_alternative(&mut self, id: NodeId) -> NodeId {
        let Some(head) = self.head else {
            self.store(id);
            return id;
        };
        let last = graph::last_of(&self.nodes, head);
        if let NodeKind::Alternative { options } = &mut self.nodes[last.0].kind {
            options.push(id);
            return last;
        }
        let alternative = self.push(NodeKind::Alternative {
            options: vec![last, id],
        });
        match self.nodes[last.0].previous {
            Some(previous) => graph::replace_sibling(&mut self.nodes, previous, alternative),
            None => self.head = Some(alternative),
        }
        alternative
    }

    fn set_tag(&mut self, value: &str) {
        if let Some(head) = self.head {
            let last = graph::last_of(&self.nodes, head);
            self.nodes[last.0].tag = Some(value.to_owned());
        }
    }
}

/// Builder stage with a pending token that quantifier, alternation, and tag
/// operations apply to. Every chain-extending operation of
/// [`PatternBuilder`] is available as well.
pub struct TokenBuilder<T> {
    builder: PatternBuilder<T>,
    pending: NodeId,
}

impl<T> TokenBuilder<T> {
    /// `?` — the pending token may match zero or one time.
    pub fn zero_or_one(self) -> PatternBuilder<T> {
        self.bounds(0, 1)
    }

    /// `*` — the pending token may match any number of times, or not at
    /// all.
    pub fn zero_or_more(self) -> PatternBuilder<T> {
        self.bounds(0, usize::MAX)
    }

    /// `+` — the pending token must match at least once.
    pub fn one_or_more(self) -> PatternBuilder<T> {
        self.bounds(1, usize::MAX)
    }

    /// `{n}` — the pending token must match exactly `value` times.
    pub fn count(self, value: usize) -> PatternBuilder<T> {
        self.bounds(value, value)
    }

    /// `{min,max}` — the pending token must match between `min` and `max`
    /// times. Fails when the range is reversed.
    pub fn count_range(self, min: usize, max: usize) -> Result<PatternBuilder<T>, PatternError> {
        if min > max {
            return Err(PatternError::InvalidBuilderOp(format!(
                "quantifier range {min}..{max} is reversed"
            )));
        }
        Ok(self.bounds(min, max))
    }

    fn bounds(mut self, min: usize, max: usize) -> PatternBuilder<T> {
        self.builder.nodes[self.pending.0].min = min;
        self.builder.nodes[self.pending.0].max = max;
        self.builder
    }

    /// Merges the pending token with an equality alternative.
    pub fn or(self, sample: T) -> TokenBuilder<T>
    where
        T: PartialEq + Send + Sync + 'static,
    {
        self.or_fn(move |item| *item == sample)
    }

    /// Merges the pending token with a predicate alternative.
    pub fn or_fn(
        mut self,
        predicate: impl Fn(&T) -> bool + Send + Sync + 'static,
    ) -> TokenBuilder<T> {
        let id = self.builder.push(NodeKind::Single(Box::new(predicate)));
        self.pending = self.builder.store_alternative(id);
        self
    }

    /// Merges the pending token with a capturing-group alternative.
    pub fn or_group(mut self, sub: impl Into<Pattern<T>>) -> TokenBuilder<T> {
        let id = graph::absorb(&mut self.builder.nodes, sub.into());
        self.pending = self.builder.store_alternative(id);
        self
    }

    /// Attaches a debug label to the pending token.
    pub fn tag(mut self, value: &str) -> TokenBuilder<T> {
        self.builder.set_tag(value);
        self
    }

    /// Adds a token matching any element.
    pub fn any(self) -> TokenBuilder<T> {
        self.builder.any()
    }

    /// Adds a token matching elements equal to `sample`.
    pub fn token(self, sample: T) -> TokenBuilder<T>
    where
        T: PartialEq + Send + Sync + 'static,
    {
        self.builder.token(sample)
    }

    /// Adds a token matching elements accepted by `predicate`.
    pub fn token_fn(
        self,
        predicate: impl Fn(&T) -> bool + Send + Sync + 'static,
    ) -> TokenBuilder<T> {
        self.builder.token_fn(predicate)
    }

    /// Adds a nested capturing group.
    pub fn group(self, sub: impl Into<Pattern<T>>) -> TokenBuilder<T> {
        self.builder.group(sub)
    }

    /// Anchors the last token to the end of the input.
    pub fn ending(self) -> PatternFinalizer<T> {
        self.builder.ending()
    }

    /// Completes the pattern.
    pub fn build(self) -> Pattern<T> {
        self.builder.build()
    }
}

/// Terminal builder stage produced by `ending`; only `build` remains.
pub struct PatternFinalizer<T> {
    builder: PatternBuilder<T>,
}

impl<T> PatternFinalizer<T> {
    /// Completes the pattern.
    pub fn build(self) -> Pattern<T> {
        self.builder.build()
    }
}

impl<T> From<PatternBuilder<T>> for Pattern<T> {
    fn from(builder: PatternBuilder<T>) -> Self {
        builder.build()
    }
}

impl<T> From<TokenBuilder<T>> for Pattern<T> {
    fn from(builder: TokenBuilder<T>) -> Self {
        builder.build()
    }
}

impl<T> From<PatternFinalizer<T>> for Pattern<T> {
    fn from(builder: PatternFinalizer<T>) -> Self {
        builder.build()
    }
}
