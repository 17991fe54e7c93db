//! Regex-style matching over sequences of arbitrary-typed items.
//!
//! A [`Pattern`] is composed from element predicates with quantifiers,
//! grouping, and alternation, then applied through a [`Matcher`] to locate,
//! extract, replace, or split sub-sequences — find/replace/split in the
//! manner of a regular expression engine, with an arbitrary element type in
//! place of characters and arbitrary predicates in place of character
//! classes.
//!
//! # Example
//!
//! ```rust
//! use seqpat::Pattern;
//!
//! let items = [2, 15, 42, 42, 15];
//!
//! // 15 followed by one or more 42s
//! let pattern = Pattern::builder()
//!     .token(15)
//!     .token(42).one_or_more()
//!     .build();
//!
//! let mut matcher = pattern.matcher(&items);
//! assert!(matcher.find());
//! assert_eq!(matcher.start(), Some(1));
//! assert_eq!(matcher.size(), 3);
//! assert_eq!(matcher.hits(), Some(&[15, 42, 42][..]));
//! assert!(!matcher.find());
//! ```
//!
//! Quantifiers are greedy: they consume as many elements as possible while
//! the rest of the pattern can still match. Groups capture their spans;
//! group 0 is always the whole match, and a repeated group keeps the span
//! of its last iteration only, the way RegExp engines do.
//!
//! A built pattern is read-only. It can be shared across threads, each of
//! which drives its own [`Matcher`] over it.

mod builder;
mod finder;
mod graph;
mod matcher;
mod matching;


pub use builder::{PatternBuilder, PatternError, PatternFinalizer, TokenBuilder};
pub use graph::Pattern;
pub use matcher::{Matcher, Split};
pub use matching::{Group, Match};
