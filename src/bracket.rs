//! Bracketed tree reader
//!
//! Parses the lines written to `trees.txt` back into trees, using pest
//! grammar. Inside a bracket the first bare word is the label and any
//! further bare words are leaves, so `( λόγος ( καλός ) )` is a tree
//! labelled `λόγος` with one subtree labelled `καλός`.

use pest::Parser;
use pest::iterators::Pair;
use pest_derive::Parser;
use thiserror::Error;

#[derive(Parser)]
#[grammar = "bracket.pest"]
struct BracketParser;

#[derive(Debug, Error)]
pub enum TreeParseError {
    #[error("malformed bracketed tree: {0}")]
    Syntax(#[from] Box<pest::error::Error<Rule>>),
    #[error("no tree found")]
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BracketChild {
    Tree(BracketTree),
    Leaf(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BracketTree {
    pub label: Option<String>,
    pub children: Vec<BracketChild>,
}

impl BracketChild {
    /// Label of a subtree, or the word of a leaf
    pub fn name(&self) -> &str {
        match self {
            BracketChild::Tree(tree) => tree.label(),
            BracketChild::Leaf(word) => word,
        }
    }
}

impl BracketTree {
    /// Label, or the empty string for an unlabelled bracket
    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or("")
    }

    /// (parent, child) name pairs of every bracket, in pre-order
    ///
    /// Childless brackets contribute nothing.
    pub fn productions(&self) -> Vec<(&str, &str)> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(tree) = stack.pop() {
            for child in &tree.children {
                out.push((tree.label(), child.name()));
            }
            for child in tree.children.iter().rev() {
                if let BracketChild::Tree(subtree) = child {
                    stack.push(subtree);
                }
            }
        }
        out
    }

    /// Number of brackets in the tree
    pub fn size(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(tree) = stack.pop() {
            count += 1;
            stack.extend(tree.children.iter().filter_map(|child| match child {
                BracketChild::Tree(subtree) => Some(subtree),
                BracketChild::Leaf(_) => None,
            }));
        }
        count
    }
}

/// Parse one bracketed line
pub fn parse_bracketed(line: &str) -> Result<BracketTree, TreeParseError> {
    let mut pairs = BracketParser::parse(Rule::tree, line).map_err(Box::new)?;
    let node = pairs
        .next()
        .and_then(|tree| tree.into_inner().find(|pair| pair.as_rule() == Rule::node))
        .ok_or(TreeParseError::Empty)?;
    Ok(build_node(node))
}

fn build_node(pair: Pair<'_, Rule>) -> BracketTree {
    let mut tree = BracketTree::default();
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::label => tree.label = Some(inner.as_str().to_string()),
            Rule::word => tree.children.push(BracketChild::Leaf(inner.as_str().to_string())),
            Rule::node => tree.children.push(BracketChild::Tree(build_node(inner))),
            _ => {}
        }
    }
    tree
}
