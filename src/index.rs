//! Inverted index from head ids to dependents
//!
//! Classification needs to know, for every token, whether any other token
//! names it as head. Building the index once per sentence keeps that lookup
//! constant time instead of rescanning the sentence for every token.

use crate::tree::{Head, Sentence};
use rustc_hash::FxHashMap;

/// Index of dependents by governor id
#[derive(Debug, Clone, Default)]
pub struct HeadIndex {
    /// Token positions grouped by the id of their head, in document order
    by_head: FxHashMap<String, Vec<usize>>,
}

impl HeadIndex {
    /// Create a new empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from a sentence
    pub fn build(sentence: &Sentence) -> Self {
        let mut index = Self::new();

        for (pos, token) in sentence.tokens.iter().enumerate() {
            if let Head::Token(head) = &token.head {
                index.by_head.entry(head.clone()).or_default().push(pos);
            }
        }

        index
    }

    /// Positions of the tokens governed by `id`
    pub fn dependents(&self, id: &str) -> &[usize] {
        self.by_head.get(id).map(|v| v.as_slice()).unwrap_or(&[])
    }

    #[inline]
    pub fn has_dependents(&self, id: &str) -> bool {
        !self.dependents(id).is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Token;

    #[test]
    fn test_index_building() {
        let mut sentence = Sentence::new(Some("1"));
        sentence.add_token(Token::new("1", Head::Root, "λέγω", "v1spia---"));
        sentence.add_token(Token::new("2", Head::Token("1".into()), "λόγος", "n-s---ma-"));
        sentence.add_token(Token::new("3", Head::Token("2".into()), "καλός", "a-s---ma-"));
        sentence.add_token(Token::new("4", Head::Token("1".into()), "νῦν", "d--------"));

        let index = HeadIndex::build(&sentence);

        assert_eq!(index.dependents("1"), &[1, 3]);
        assert_eq!(index.dependents("2"), &[2]);
        assert!(index.dependents("3").is_empty());
        assert!(!index.has_dependents("4"));
    }

    #[test]
    fn test_ids_are_not_prefix_matched() {
        let mut sentence = Sentence::new(None);
        sentence.add_token(Token::new("12", Head::Root, "λέγω", "v1spia---"));
        sentence.add_token(Token::new("123", Head::Token("12".into()), "λόγος", "n-s---ma-"));

        let index = HeadIndex::build(&sentence);

        assert_eq!(index.dependents("12"), &[1]);
        assert!(!index.has_dependents("1"));
        assert!(!index.has_dependents("123"));
    }
}
