//! Pattern graph: an arena of linked pattern nodes.
//!
//! A compiled [`Pattern`] owns a flat arena of nodes. Horizontal `next`
//! links form the token chain; `upstream` links are reentry points used to
//! continue matching "above" a group once its inner chain is exhausted.
//! `previous` and `downstream` are the inverse links, kept so a node can be
//! swapped out during construction without breaking the chain.

use std::fmt;

use crate::builder::PatternBuilder;
use crate::matcher::Matcher;
use crate::matching::Match;

/// Index of a node in a pattern arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct NodeId(pub(crate) usize);

/// Predicate applied to a single sequence element.
pub(crate) type Predicate<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;

/// The payload of a pattern node.
pub(crate) enum NodeKind<T> {
    /// Tests exactly one element.
    Single(Predicate<T>),
    /// Wraps a sub-chain as a capturing group. `entry` is the head of the
    /// inner chain; `None` for a pattern built without tokens.
    Group { entry: Option<NodeId> },
    /// Ordered alternatives, tried in declaration order.
    Alternative { options: Vec<NodeId> },
}

/// One vertex of the pattern graph.
pub(crate) struct Node<T> {
    pub(crate) kind: NodeKind<T>,
    pub(crate) next: Option<NodeId>,
    pub(crate) previous: Option<NodeId>,
    pub(crate) upstream: Option<NodeId>,
    pub(crate) downstream: Option<NodeId>,
    /// Minimal number of matches required by the quantifier.
    pub(crate) min: usize,
    /// Maximal number of matches allowed; `usize::MAX` means unbounded.
    pub(crate) max: usize,
    pub(crate) must_be_first: bool,
    pub(crate) must_be_last: bool,
    /// Arbitrary debug label.
    pub(crate) tag: Option<String>,
}

impl<T> Node<T> {
    pub(crate) fn new(kind: NodeKind<T>) -> Self {
        Self {
            kind,
            next: None,
            previous: None,
            upstream: None,
            downstream: None,
            min: 1,
            max: 1,
            must_be_first: false,
            must_be_last: false,
            tag: None,
        }
    }
}

/// Walk the `next` chain from `id` to its last node.
pub(crate) fn last_of<T>(nodes: &[Node<T>], id: NodeId) -> NodeId {
    let mut current = id;
    while let Some(next) = nodes[current.0].next {
        current = next;
    }
    current
}

/// Attach `value` at the tail of the chain starting at `id`, then give any
/// group that ends at the old tail a reentry point into `value`.
pub(crate) fn append_sibling<T>(nodes: &mut [Node<T>], id: NodeId, value: NodeId) {
    let tail = last_of(nodes, id);
    nodes[tail.0].next = Some(value);
    nodes[value.0].previous = Some(tail);
    wire_upstream(nodes, tail, value);
}

/// When the old chain tail is a group (or an alternation whose last option
/// is a group), the group's inner last node has no `next` of its own; its
/// `upstream` is pointed at the newly attached sibling so matching can
/// return above the group. An upstream that is already set is kept.
fn wire_upstream<T>(nodes: &mut [Node<T>], tail: NodeId, value: NodeId) {
    let inner_last = match &nodes[tail.0].kind {
        NodeKind::Group { entry: Some(entry) } => Some(last_of(nodes, *entry)),
        NodeKind::Alternative { options } => match options.last() {
            Some(&option) => match &nodes[option.0].kind {
                NodeKind::Group { entry: Some(entry) } => Some(last_of(nodes, *entry)),
                _ => None,
            },
            None => None,
        },
        _ => None,
    };
    if let Some(inner_last) = inner_last
        && nodes[inner_last.0].upstream.is_none()
    {
        nodes[inner_last.0].upstream = Some(value);
        nodes[value.0].downstream = Some(inner_last);
    }
}

/// Replace the `next` of `id` with `value`. Any upstream link that targeted
/// the old sibling is redirected to `value` so group reentry stays intact.
pub(crate) fn replace_sibling<T>(nodes: &mut [Node<T>], id: NodeId, value: NodeId) {
    if let Some(old) = nodes[id.0].next {
        if let Some(source) = nodes[old.0].downstream {
            nodes[source.0].upstream = Some(value);
            nodes[value.0].downstream = Some(source);
        }
        nodes[old.0].downstream = None;
        nodes[old.0].previous = None;
    }
    nodes[id.0].next = Some(value);
    nodes[value.0].previous = Some(id);
}

/// Merge the arena of `sub` into `nodes`, shifting its indices. Returns the
/// relocated root.
pub(crate) fn absorb<T>(nodes: &mut Vec<Node<T>>, sub: Pattern<T>) -> NodeId {
    let offset = nodes.len();
    let shift = |id: Option<NodeId>| id.map(|n| NodeId(n.0 + offset));
    for mut node in sub.nodes {
        node.next = shift(node.next);
        node.previous = shift(node.previous);
        node.upstream = shift(node.upstream);
        node.downstream = shift(node.downstream);
        match &mut node.kind {
            NodeKind::Group { entry } => *entry = shift(*entry),
            NodeKind::Alternative { options } => {
                for option in options.iter_mut() {
                    *option = NodeId(option.0 + offset);
                }
            }
            NodeKind::Single(_) => {}
        }
        nodes.push(node);
    }
    NodeId(sub.root.0 + offset)
}

/// A compiled pattern over elements of type `T`.
///
/// Built once with [`PatternBuilder`]; read-only afterwards, so one pattern
/// can back matchers on any number of threads.
pub struct Pattern<T> {
    pub(crate) nodes: Vec<Node<T>>,
    /// The outer group wrapping the whole chain; always capture index 0.
    pub(crate) root: NodeId,
}

impl<T> Pattern<T> {
    /// Starts a fluent builder for a new pattern.
    pub fn builder() -> PatternBuilder<T> {
        PatternBuilder::new()
    }

    /// Creates a [`Matcher`] applying this pattern to `items`.
    pub fn matcher<'a>(&'a self, items: &'a [T]) -> Matcher<'a, T> {
        Matcher::new(self, items)
    }

    pub(crate) fn node(&self, id: NodeId) -> &Node<T> {
        &self.nodes[id.0]
    }

    /// Match attempt entry point; guards the cursor against the input end.
    pub(crate) fn get_match(&self, items: &[T], position: usize) -> Match {
        if position >= items.len() {
            return Match::fail();
        }
        self.find_quantified(self.root, items, position)
    }

    /// Whether a match may only start at position 0.
    pub(crate) fn must_be_first(&self) -> bool {
        self.node_must_be_first(self.root)
    }

    /// Whether a match must end at the input end.
    pub(crate) fn must_be_last(&self) -> bool {
        self.node_must_be_last(self.root)
    }

    fn node_must_be_first(&self, id: NodeId) -> bool {
        let node = self.node(id);
        if node.must_be_first {
            return true;
        }
        match &node.kind {
            NodeKind::Group { entry: Some(entry) } => self.node_must_be_first(*entry),
            _ => false,
        }
    }

    fn node_must_be_last(&self, id: NodeId) -> bool {
        let node = self.node(id);
        if node.must_be_last {
            return true;
        }
        match &node.kind {
            NodeKind::Group { entry: Some(entry) } => {
                self.node_must_be_last(last_of(&self.nodes, *entry))
            }
            _ => false,
        }
    }
}

impl<T> fmt::Debug for NodeKind<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(_) => write!(f, "Single"),
            Self::Group { entry } => f.debug_struct("Group").field("entry", entry).finish(),
            Self::Alternative { options } => f
                .debug_struct("Alternative")
                .field("options", options)
                .finish(),
        }
    }
}

impl<T> fmt::Debug for Node<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("kind", &self.kind)
            .field("next", &self.next)
            .field("upstream", &self.upstream)
            .field("min", &self.min)
            .field("max", &self.max)
            .field("tag", &self.tag)
            .finish()
    }
}

impl<T> fmt::Debug for Pattern<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pattern")
            .field("root", &self.root)
            .field("nodes", &self.nodes)
            .finish()
    }
}
