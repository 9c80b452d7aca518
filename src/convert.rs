//! End-to-end sentence conversion
//!
//! The conversion pipeline for one sentence:
//! 1. Index dependents by head id
//! 2. Classify tokens into roots, leaves and internal nodes
//! 3. Group tokens under their parents
//! 4. Attach the groups into a tree
//! 5. Substitute lemmas and normalize

use crate::assemble::{AssembleError, assemble};
use crate::classify::{classify, resolve_heads};
use crate::cleanup::{Cleaner, token_line};
use crate::index::HeadIndex;
use crate::lemma::substitute;
use crate::tree::Sentence;

/// Why a sentence produced no output without being an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No token has head `0`
    NoRoot,
    /// No dependency arc at all, e.g. a one-token sentence
    NoArcs,
    /// Every token was removed during cleanup
    Emptied,
}

/// One emitted sentence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Converted {
    /// Bracketed tree, e.g. `( λόγος ( καλός ) )`
    pub bracketed: String,
    /// The same tokens without brackets
    pub tokens: String,
}

/// Result of converting one sentence
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Converted(Converted),
    Skipped(SkipReason),
    /// The sentence could not be bracketed and goes to the left-behind report
    LeftBehind(AssembleError),
}

/// Convert one sentence into its bracketed and bracket-free lines
pub fn convert_sentence(sentence: &Sentence, cleaner: &Cleaner) -> Outcome {
    let index = HeadIndex::build(sentence);
    let Some(classes) = classify(sentence, &index) else {
        return Outcome::Skipped(SkipReason::NoRoot);
    };
    if sentence.arc_count() == 0 {
        return Outcome::Skipped(SkipReason::NoArcs);
    }

    let map = resolve_heads(sentence, &classes);
    let assembly = match assemble(sentence, &map) {
        Ok(assembly) => assembly,
        Err(e) => return Outcome::LeftBehind(e),
    };

    let bracketed = cleaner.clean(&substitute(sentence, &assembly));
    if bracketed.is_empty() {
        return Outcome::Skipped(SkipReason::Emptied);
    }
    let tokens = token_line(&bracketed);
    Outcome::Converted(Converted { bracketed, tokens })
}
