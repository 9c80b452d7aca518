//! Treeparenth: dependency treebanks to bracketed trees
//!
//! Converts Ancient Greek dependency treebanks (AGDT and PROIEL XML) into
//! one parenthesized tree per sentence, with lemmas in place of token ids,
//! ready for tree-structured topic modelling.

// Sentence pipeline
pub mod assemble; // Explicit tree assembly with fixed-point attachment
pub mod classify; // Root/leaf/internal classification and head groups
pub mod cleanup; // Normalization and stopwords
pub mod convert; // End-to-end sentence conversion
pub mod index; // Dependents by head id
pub mod lemma; // Lemma substitution
pub mod tree; // Sentence and token structures

// Input and output
pub mod config; // Run settings and output layout
pub mod iterators; // Treebank collections over files and globs
pub mod merge; // trees.txt from per-run outputs
pub mod runner; // Batch conversion into output files
pub mod treebank; // AGDT/PROIEL XML reader

// Downstream
pub mod bracket; // Bracketed tree parser
pub mod graph; // Lemma supergraph and edge list export

// Re-exports for convenience
pub use assemble::{AssembleError, Assembly, assemble};
pub use bracket::{BracketChild, BracketTree, TreeParseError, parse_bracketed};
pub use classify::{Classification, HeadMap, Parent, classify, resolve_heads};
pub use cleanup::{Cleaner, StopList};
pub use config::ConvertConfig;
pub use convert::{Converted, Outcome, SkipReason, convert_sentence};
pub use graph::{GraphError, SuperGraph, build_from_file};
pub use iterators::{SourcedSentence, Treebank};
pub use merge::merge_trees;
pub use runner::{Converter, RunStats};
pub use tree::{Head, Placeholder, Sentence, Token};
pub use treebank::{Schema, TreebankError, TreebankReader};
