//! Bracket assembly
//!
//! Attaches every group of a [`HeadMap`] under its parent token and renders
//! the result as nested brackets. Attachment runs as a fixed-point loop over
//! the groups that are still pending:
//!
//! - a group is attached once its parent token is already in the tree; its
//!   children are placed immediately, so later groups of the same pass can
//!   hang from them,
//! - the loop stops when nothing is pending, or when a full pass attaches
//!   nothing. Each pass that continues attaches at least one group, so there
//!   are at most as many passes as groups.
//!
//! Groups left over hang from a token that is never reached from a root:
//! a cycle (`A -> B -> A`), a dangling head id or a missing head attribute.

use crate::classify::{HeadMap, Parent};
use crate::tree::{Placeholder, Sentence};
use rustc_hash::FxHashMap;
use thiserror::Error;

/// Error when a sentence cannot be bracketed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssembleError {
    #[error("{} dependency group(s) never reached from a root", .unresolved.len())]
    Unresolved { unresolved: Vec<Parent> },
}

/// A sentence attached into a tree of token positions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assembly {
    roots: Vec<usize>,
    children: FxHashMap<usize, Vec<usize>>,
}

/// Attach every pending group of `map` under its parent
pub fn assemble(sentence: &Sentence, map: &HeadMap) -> Result<Assembly, AssembleError> {
    let roots = map.root_children().to_vec();
    let mut children: FxHashMap<usize, Vec<usize>> = FxHashMap::default();

    // token id -> position where it sits in the tree
    let mut placed: FxHashMap<&str, usize> = FxHashMap::default();
    for &pos in &roots {
        placed.entry(sentence.tokens[pos].id.as_str()).or_insert(pos);
    }

    let mut pending: Vec<(&Parent, &[usize])> = map.governed().collect();
    while !pending.is_empty() {
        let before = pending.len();
        let mut remaining = Vec::with_capacity(before);

        for (parent, group) in pending {
            let at = match parent {
                Parent::Token(id) => placed.get(id.as_str()).copied(),
                Parent::Root | Parent::Missing => None,
            };
            match at {
                Some(at) => {
                    for &child in group {
                        placed
                            .entry(sentence.tokens[child].id.as_str())
                            .or_insert(child);
                    }
                    children.insert(at, group.to_vec());
                }
                None => remaining.push((parent, group)),
            }
        }

        pending = remaining;
        if pending.len() == before {
            break;
        }
    }

    if !pending.is_empty() {
        return Err(AssembleError::Unresolved {
            unresolved: pending.into_iter().map(|(p, _)| p.clone()).collect(),
        });
    }

    Ok(Assembly { roots, children })
}

enum Step {
    Node(usize),
    Text(&'static str),
}

impl Assembly {
    /// Token positions bracketed directly under the sentence root
    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    /// Attached children of the token at `pos`
    pub fn children(&self, pos: usize) -> &[usize] {
        self.children.get(&pos).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Render as `(<root> <root>...)`, each node as `<text>(<child>) (<child>)`
    ///
    /// `write` emits the text of the token at a position. Rendering walks an
    /// explicit stack, so deep chains do not recurse.
    pub fn render_with<F>(&self, mut write: F) -> String
    where
        F: FnMut(&mut String, usize),
    {
        let mut out = String::from("(");
        let mut stack = Vec::new();
        push_group(&mut stack, &self.roots, false);

        while let Some(step) = stack.pop() {
            match step {
                Step::Text(text) => out.push_str(text),
                Step::Node(pos) => {
                    write(&mut out, pos);
                    push_group(&mut stack, self.children(pos), true);
                }
            }
        }

        out.push(')');
        out
    }

    /// Render with every token shown as its placeholder, e.g. `(id1id(id2id))`
    pub fn render_placeholders(&self, sentence: &Sentence) -> String {
        self.render_with(|out, pos| {
            out.push_str(&Placeholder::new(&sentence.tokens[pos].id).to_string());
        })
    }
}

/// Push a sibling group so that it pops in order, space separated
fn push_group(stack: &mut Vec<Step>, group: &[usize], bracketed: bool) {
    for (i, &pos) in group.iter().enumerate().rev() {
        if bracketed {
            stack.push(Step::Text(")"));
        }
        stack.push(Step::Node(pos));
        if bracketed {
            stack.push(Step::Text("("));
        }
        if i > 0 {
            stack.push(Step::Text(" "));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{classify, resolve_heads};
    use crate::index::HeadIndex;
    use crate::tree::{Head, Token};

    fn head(id: &str) -> Head {
        Head::Token(id.to_string())
    }

    fn build(sentence: &Sentence) -> Result<Assembly, AssembleError> {
        let classes = classify(sentence, &HeadIndex::build(sentence)).unwrap();
        assemble(sentence, &resolve_heads(sentence, &classes))
    }

    #[test]
    fn test_two_token_sentence() {
        let mut sentence = Sentence::new(Some("1"));
        sentence.add_token(Token::new("1", Head::Root, "λόγος", "n-s---mn-"));
        sentence.add_token(Token::new("2", head("1"), "καλός", "a-s---mn-"));

        let assembly = build(&sentence).unwrap();
        assert_eq!(assembly.render_placeholders(&sentence), "(id1id(id2id))");
    }

    #[test]
    fn test_siblings_and_depth() {
        let mut sentence = Sentence::new(Some("1"));
        sentence.add_token(Token::new("1", Head::Root, "λέγω", "v1spia---"));
        sentence.add_token(Token::new("2", head("1"), "ἀνήρ", "n-s---mn-"));
        sentence.add_token(Token::new("3", head("2"), "ἀγαθός", "a-s---mn-"));
        sentence.add_token(Token::new("4", head("1"), "λόγος", "n-s---ma-"));

        let assembly = build(&sentence).unwrap();
        assert_eq!(
            assembly.render_placeholders(&sentence),
            "(id1id(id4id) (id2id(id3id)))"
        );
    }

    #[test]
    fn test_multiple_roots() {
        let mut sentence = Sentence::new(None);
        sentence.add_token(Token::new("1", Head::Root, "ναί", "d--------"));
        sentence.add_token(Token::new("2", Head::Root, "λέγω", "v1spia---"));
        sentence.add_token(Token::new("3", head("2"), "λόγος", "n-s---ma-"));

        let assembly = build(&sentence).unwrap();
        assert_eq!(assembly.roots(), &[0, 1]);
        assert_eq!(
            assembly.render_placeholders(&sentence),
            "(id1id id2id(id3id))"
        );
    }

    #[test]
    fn test_child_listed_before_parent() {
        // the group under 3 is pending until 3 itself is attached
        let mut sentence = Sentence::new(None);
        sentence.add_token(Token::new("1", head("3"), "ἀγαθός", "a-s---mn-"));
        sentence.add_token(Token::new("2", Head::Root, "λέγω", "v1spia---"));
        sentence.add_token(Token::new("3", head("2"), "ἀνήρ", "n-s---mn-"));

        let assembly = build(&sentence).unwrap();
        assert_eq!(
            assembly.render_placeholders(&sentence),
            "(id2id(id3id(id1id)))"
        );
    }

    #[test]
    fn test_similar_ids_do_not_collide() {
        let mut sentence = Sentence::new(None);
        sentence.add_token(Token::new("123", Head::Root, "λέγω", "v1spia---"));
        sentence.add_token(Token::new("1234", head("123"), "ἀνήρ", "n-s---mn-"));
        sentence.add_token(Token::new("12", head("1234"), "ἀγαθός", "a-s---mn-"));

        let assembly = build(&sentence).unwrap();
        assert_eq!(
            assembly.render_placeholders(&sentence),
            "(id123id(id1234id(id12id)))"
        );
    }

    #[test]
    fn test_cycle_is_unresolved() {
        let mut sentence = Sentence::new(Some("7"));
        sentence.add_token(Token::new("1", Head::Root, "λέγω", "v1spia---"));
        sentence.add_token(Token::new("2", head("3"), "ἀνήρ", "n-s---mn-"));
        sentence.add_token(Token::new("3", head("2"), "ἀγαθός", "a-s---mn-"));

        let err = build(&sentence).unwrap_err();
        let AssembleError::Unresolved { unresolved } = err;
        assert_eq!(unresolved.len(), 2);
    }

    #[test]
    fn test_self_loop_is_unresolved() {
        let mut sentence = Sentence::new(None);
        sentence.add_token(Token::new("1", Head::Root, "λέγω", "v1spia---"));
        sentence.add_token(Token::new("2", head("2"), "ἀνήρ", "n-s---mn-"));

        assert!(build(&sentence).is_err());
    }

    #[test]
    fn test_dangling_and_missing_heads_are_unresolved() {
        let mut sentence = Sentence::new(None);
        sentence.add_token(Token::new("1", Head::Root, "λέγω", "v1spia---"));
        sentence.add_token(Token::new("2", head("99"), "ἀνήρ", "n-s---mn-"));
        assert!(build(&sentence).is_err());

        let mut sentence = Sentence::new(None);
        sentence.add_token(Token::new("1", Head::Root, "λέγω", "v1spia---"));
        sentence.add_token(Token::new("2", Head::Missing, "ἀνήρ", "n-s---mn-"));
        assert!(build(&sentence).is_err());
    }

    #[test]
    fn test_deep_chain_renders() {
        let mut sentence = Sentence::new(None);
        sentence.add_token(Token::new("0", Head::Root, "λέγω", "v1spia---"));
        for i in 1..5000 {
            let id = i.to_string();
            let parent = (i - 1).to_string();
            sentence.add_token(Token::new(&id, head(&parent), "λόγος", "n-s---ma-"));
        }

        let assembly = build(&sentence).unwrap();
        let rendered = assembly.render_placeholders(&sentence);
        assert_eq!(rendered.matches('(').count(), 5000);
        assert_eq!(rendered.matches(')').count(), 5000);
    }
}
