//! Lemma substitution
//!
//! Decides what text each token contributes to its bracket.

use crate::assemble::Assembly;
use crate::tree::{Sentence, Token};
use once_cell::sync::Lazy;
use regex::Regex;

/// Lemmas like `[0]` mark artificial (elided) tokens in AGDT
static ARTIFICIAL_LEMMA: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\[[0-9]+\]").unwrap());

/// Postag classes dropped from the output: numerals, untagged, punctuation
const EXCLUDED_POS: [char; 3] = ['m', 'x', 'u'];

/// Text a token contributes to its bracket
///
/// An empty lemma contributes nothing, leaving an empty `()` that keeps the
/// node's distance in the tree. Artificial lemmas are replaced by the
/// `artificial` attribute, excluded postag classes contribute nothing, and a
/// missing lemma or postag falls back to `artificial` too.
pub fn substitution(token: &Token) -> &str {
    let fallback = token.artificial.as_deref().unwrap_or("");

    let Some(lemma) = token.lemma.as_deref() else {
        return fallback;
    };
    if lemma.is_empty() {
        return "";
    }
    if ARTIFICIAL_LEMMA.is_match(lemma) {
        return fallback;
    }

    match token.postag.as_deref() {
        None => fallback,
        Some(postag) if postag.starts_with(EXCLUDED_POS) => "",
        Some(_) => lemma,
    }
}

/// Render an assembled sentence with every token replaced by its substitution
pub fn substitute(sentence: &Sentence, assembly: &Assembly) -> String {
    assembly.render_with(|out, pos| out.push_str(substitution(&sentence.tokens[pos])))
}
