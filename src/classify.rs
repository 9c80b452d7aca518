//! Node classification and head resolution
//!
//! Splits a sentence into roots, leaves and internal nodes, then groups
//! every token under the parent it will be bracketed in. The grouping order
//! decides the order of siblings in the emitted tree.

use crate::index::HeadIndex;
use crate::tree::{Head, Placeholder, Sentence};
use rustc_hash::FxHashMap;

/// Disjoint partition of a sentence's tokens, as positions in document order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    /// Tokens with head `0`, whether or not they govern anything
    pub roots: Vec<usize>,
    /// Non-root tokens that govern nothing
    pub leaves: Vec<usize>,
    /// Non-root tokens with at least one dependent
    pub internal: Vec<usize>,
}

impl Classification {
    pub fn root_placeholders(&self, sentence: &Sentence) -> Vec<Placeholder> {
        placeholders(sentence, &self.roots)
    }

    pub fn leaf_placeholders(&self, sentence: &Sentence) -> Vec<Placeholder> {
        placeholders(sentence, &self.leaves)
    }

    pub fn internal_placeholders(&self, sentence: &Sentence) -> Vec<Placeholder> {
        placeholders(sentence, &self.internal)
    }
}

fn placeholders(sentence: &Sentence, positions: &[usize]) -> Vec<Placeholder> {
    positions
        .iter()
        .map(|&pos| sentence.tokens[pos].placeholder())
        .collect()
}

/// Classify every token of a sentence
///
/// Returns `None` when the sentence has no root: such sentences cannot be
/// bracketed and are skipped by the caller.
pub fn classify(sentence: &Sentence, index: &HeadIndex) -> Option<Classification> {
    let mut classes = Classification::default();

    for (pos, token) in sentence.tokens.iter().enumerate() {
        if token.head.is_root() {
            classes.roots.push(pos);
        } else if index.has_dependents(&token.id) {
            classes.internal.push(pos);
        } else {
            classes.leaves.push(pos);
        }
    }

    if classes.roots.is_empty() {
        None
    } else {
        Some(classes)
    }
}

/// Where a token hangs in the bracketed tree
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Parent {
    /// The outermost bracket pair
    Root,
    /// The token with this id
    Token(String),
    /// A head attribute that was never written. No token matches it.
    Missing,
}

impl Parent {
    fn of(head: &Head) -> Self {
        match head {
            Head::Root | Head::Empty => Parent::Root,
            Head::Token(id) => Parent::Token(id.clone()),
            Head::Missing => Parent::Missing,
        }
    }
}

/// Children grouped by parent, in insertion order
#[derive(Debug, Clone, Default)]
pub struct HeadMap {
    entries: Vec<(Parent, Vec<usize>)>,
    slots: FxHashMap<Parent, usize>,
}

impl HeadMap {
    fn push(&mut self, parent: Parent, child: usize) {
        let slot = match self.slots.get(&parent) {
            Some(&slot) => slot,
            None => {
                self.entries.push((parent.clone(), Vec::new()));
                self.slots.insert(parent, self.entries.len() - 1);
                self.entries.len() - 1
            }
        };
        self.entries[slot].1.push(child);
    }

    /// Children of `parent`, if it governs anything
    pub fn children(&self, parent: &Parent) -> Option<&[usize]> {
        self.slots
            .get(parent)
            .map(|&slot| self.entries[slot].1.as_slice())
    }

    /// Children bracketed directly under the sentence root
    pub fn root_children(&self) -> &[usize] {
        self.children(&Parent::Root).unwrap_or(&[])
    }

    /// All entries except the root's, in insertion order
    pub fn governed(&self) -> impl Iterator<Item = (&Parent, &[usize])> {
        self.entries
            .iter()
            .filter(|(parent, _)| *parent != Parent::Root)
            .map(|(parent, children)| (parent, children.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Group every token under its parent
///
/// Root children come first: the roots, then leaves and internal nodes with
/// an empty head. Every other parent lists its leaf children before its
/// internal ones. Within each group tokens keep document order.
pub fn resolve_heads(sentence: &Sentence, classes: &Classification) -> HeadMap {
    let mut map = HeadMap::default();
    let mut governed = Vec::new();

    for &pos in &classes.roots {
        map.push(Parent::Root, pos);
    }
    for &pos in classes.leaves.iter().chain(&classes.internal) {
        match Parent::of(&sentence.tokens[pos].head) {
            Parent::Root => map.push(Parent::Root, pos),
            parent => governed.push((parent, pos)),
        }
    }
    for (parent, pos) in governed {
        map.push(parent, pos);
    }

    map
}
