//! Post-substitution normalization
//!
//! Turns the raw bracket string produced by lemma substitution into the
//! emitted form: punctuation, elliptic markers and digits removed, brackets
//! padded into standalone units, stopwords stripped and the empty bracket
//! pairs they leave behind dropped.

use once_cell::sync::Lazy;
use regex::Regex;
use rustc_hash::FxHashSet;
use std::io::{self, BufRead};

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Punctuation lemma used by the AGDT treebanks
const PUNCTUATION_SENTINEL: &str = "punc1";
const ELLIPTIC_MARKER: &str = "elliptic";

/// Ancient Greek stopwords
///
/// Perseus Hopper stoplist as compiled by Alessandro Vatri, with grave and
/// tonos/oxia variants of the accented forms, extended with a handful of
/// frequent verbs and numbered lemmas. Accent variants are distinct entries:
/// matching is exact.
const DEFAULT_STOPWORDS: &[&str] = &[
    "αὐτὸς", "αὐτός", "γε", "γὰρ", "γάρ", "δ'", "δαὶ", "δαὶς",
    "δαί", "δαίς", "διὰ", "διά", "δὲ", "δέ", "δὴ", "δή",
    "εἰ", "εἰμὶ", "εἰμί", "εἰς", "εἴμι", "κατὰ", "κατά", "καὶ",
    "καί", "μετὰ", "μετά", "μὲν", "μέν", "μὴ", "μή", "οἱ",
    "οὐ", "οὐδεὶς", "οὐδείς", "οὐδὲ", "οὐδέ", "οὐκ", "οὔτε", "οὕτως",
    "οὖν", "οὗτος", "παρὰ", "παρά", "περὶ", "περί", "πρὸς", "πρός",
    "σὸς", "σός", "σὺ", "σὺν", "σύ", "σύν", "τε", "τι",
    "τις", "τοιοῦτος", "τοὶ", "τοί", "τοὺς", "τούς", "τοῦ", "τὰ",
    "τά", "τὴν", "τήν", "τὶ", "τὶς", "τί", "τίς", "τὸ",
    "τὸν", "τό", "τόν", "τῆς", "τῇ", "τῶν", "τῷ", "ἀλλ'",
    "ἀλλὰ", "ἀλλά", "ἀπὸ", "ἀπό", "ἂν", "ἄλλος", "ἄν", "ἄρα",
    "ἐγὼ", "ἐγώ", "ἐκ", "ἐξ", "ἐμὸς", "ἐμός", "ἐν", "ἐπὶ",
    "ἐπί", "ἐὰν", "ἐάν", "ἑαυτοῦ", "ἔτι", "ἡ", "ἢ", "ἤ",
    "ὁ", "ὃδε", "ὃς", "ὅδε", "ὅς", "ὅστις", "ὅτι", "ὑμὸς",
    "ὑμός", "ὑπὲρ", "ὑπέρ", "ὑπὸ", "ὑπό", "ὡς", "ὥστε", "ὦ",
    "ξύν", "ξὺν", "σύν", "τοῖς", "τᾶς", "αὐτός", "γάρ", "δαί",
    "δαίς", "διά", "δέ", "δή", "εἰμί", "κατά", "καί", "μετά",
    "μέν", "μή", "οὐδείς", "οὐδέ", "παρά", "περί", "πρός", "σός",
    "σύ", "τοί", "τούς", "τά", "τήν", "τί", "τίς", "τό",
    "τόν", "ἀλλά", "ἀπό", "ἐγώ", "ἐμός", "ἐπί", "ἐάν", "ὑμός",
    "ὑπέρ", "ὑπό", "λέγω", "εἰμί#1", "καί#1", "οὕτω(ς)", "γίγνομαι", "ἔχω",
    "εἰ#1", "ὅτι#1", "νῦν#1", "νῦν", "None",
];

/// Ordered set of words removed from every emitted tree
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StopList {
    words: Vec<String>,
}

impl StopList {
    /// Build a list from words, keeping first occurrences in order
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut list = Self::default();
        list.extend(words);
        list
    }

    /// The built-in Ancient Greek list
    pub fn greek() -> Self {
        Self::new(DEFAULT_STOPWORDS.iter().copied())
    }

    /// Read one stopword per line; blank lines and `#` comments are skipped
    pub fn from_reader<R: BufRead>(reader: R) -> io::Result<Self> {
        let mut words = Vec::new();
        for line in reader.lines() {
            let line = line?;
            let word = line.trim();
            if word.is_empty() || word.starts_with('#') {
                continue;
            }
            words.push(word.to_string());
        }
        Ok(Self::new(words))
    }

    pub fn extend<I, S>(&mut self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen: FxHashSet<String> = self.words.iter().cloned().collect();
        for word in words {
            let word = word.into();
            // an empty stopword would match every double space
            if !word.is_empty() && seen.insert(word.clone()) {
                self.words.push(word);
            }
        }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.iter().any(|w| w == word)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Normalizes substituted bracket strings
#[derive(Debug, Clone)]
pub struct Cleaner {
    stops: StopList,
    /// `" <word> "` for every stopword, in list order
    needles: Vec<String>,
}

impl Default for Cleaner {
    fn default() -> Self {
        Self::new(StopList::greek())
    }
}

impl Cleaner {
    pub fn new(stops: StopList) -> Self {
        let needles = stops.iter().map(|w| format!(" {w} ")).collect();
        Self { stops, needles }
    }

    pub fn stops(&self) -> &StopList {
        &self.stops
    }

    /// Normalize one substituted sentence into its emitted bracketed form
    ///
    /// The result is trimmed and may be empty when every token was removed.
    pub fn clean(&self, raw: &str) -> String {
        let mut s = raw.replace(PUNCTUATION_SENTINEL, " ");
        s = s.replace(['.', ',', ';'], " ");
        s = collapse_whitespace(&s);
        s = s.replace('(', " ( ").replace(')', " ) ");
        s = s.replace(ELLIPTIC_MARKER, " ");
        s = s.replace(['[', ']'], "");
        s = s.replace(|c: char| c.is_ascii_digit(), " ");
        s = collapse_whitespace(&s);

        s = self.strip_stopwords(&s);
        drop_empty_brackets(&s).trim().to_string()
    }

    /// Remove every space-delimited stopword occurrence
    ///
    /// Each word is removed until no occurrence is left, so adjacent repeats
    /// go too and a second run finds nothing more to strip. Empty bracket
    /// pairs left by a removal are dropped before the next word is tried.
    pub fn strip_stopwords(&self, input: &str) -> String {
        let mut s = input.to_string();
        for needle in &self.needles {
            if !s.contains(needle.as_str()) {
                continue;
            }
            while s.contains(needle.as_str()) {
                s = s.replace(needle.as_str(), " ");
            }
            s = collapse_whitespace(&s);
            s = s.replace("( )", "").replace("()", "");
            s = collapse_whitespace(&s);
        }
        s
    }
}

/// Collapse every whitespace run into a single space
pub fn collapse_whitespace(s: &str) -> String {
    WHITESPACE.replace_all(s, " ").into_owned()
}

/// Drop `( )` and `()` pairs until none is left
pub fn drop_empty_brackets(input: &str) -> String {
    let mut s = collapse_whitespace(input);
    while s.contains("( )") || s.contains("()") {
        s = s.replace("( )", "").replace("()", "");
        s = collapse_whitespace(&s);
    }
    s
}

/// Bracket-free token stream for an emitted line
pub fn token_line(bracketed: &str) -> String {
    collapse_whitespace(&bracketed.replace(['(', ')'], " "))
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_list_has_accent_variants() {
        let stops = StopList::greek();
        assert!(stops.contains("δέ"));
        assert!(stops.contains("δὲ"));
        assert!(stops.contains("εἰς"));
        assert!(stops.contains("None"));
        assert!(!stops.contains("καλός"));
        assert!(!stops.contains("εἰςNone"));
    }

    #[test]
    fn test_stop_list_dedups_in_order() {
        let stops = StopList::new(["b", "a", "b", "", "c"]);
        assert_eq!(stops.iter().collect::<Vec<_>>(), vec!["b", "a", "c"]);
        assert_eq!(stops.len(), 3);
    }

    #[test]
    fn test_stop_list_from_reader() {
        let text = "# custom list\nγε\n\n  τε  \nγε\n";
        let stops = StopList::from_reader(text.as_bytes()).unwrap();
        assert_eq!(stops.iter().collect::<Vec<_>>(), vec!["γε", "τε"]);
    }

    #[test]
    fn test_clean_pads_brackets() {
        let cleaner = Cleaner::default();
        assert_eq!(cleaner.clean("(λόγος(καλός))"), "( λόγος ( καλός ) )");
    }

    #[test]
    fn test_clean_removes_stopword_and_empty_bracket() {
        let cleaner = Cleaner::default();
        assert_eq!(cleaner.clean("(λόγος(δέ))"), "( λόγος )");
    }

    #[test]
    fn test_clean_removes_empty_lemma_leaf() {
        let cleaner = Cleaner::default();
        assert_eq!(cleaner.clean("(λόγος())"), "( λόγος )");
    }

    #[test]
    fn test_clean_keeps_empty_internal_node() {
        // an empty node with a surviving child keeps its brackets
        let cleaner = Cleaner::default();
        assert_eq!(
            cleaner.clean("(ὁράω((ἀνήρ) (δέ)))"),
            "( ὁράω ( ( ἀνήρ ) ) )"
        );
    }

    #[test]
    fn test_clean_strips_punctuation_digits_and_markers() {
        let cleaner = Cleaner::new(StopList::default());
        assert_eq!(
            cleaner.clean("(λέγω(punc1) (ἀνήρ2,) (elliptic) ([ἀγαθός].))"),
            "( λέγω ( ἀνήρ ) ( ἀγαθός ) )"
        );
    }

    #[test]
    fn test_clean_numbered_stopword_loses_digits() {
        // digits go before stopwords are matched, so "εἰμί#1" never matches
        let cleaner = Cleaner::default();
        assert_eq!(cleaner.clean("(εἰμί#1(ἀνήρ))"), "( εἰμί# ( ἀνήρ ) )");
    }

    #[test]
    fn test_clean_can_empty_a_sentence() {
        let cleaner = Cleaner::default();
        assert_eq!(cleaner.clean("(δέ(καί))"), "");
    }

    #[test]
    fn test_adjacent_stopwords_removed() {
        let cleaner = Cleaner::new(StopList::new(["δέ"]));
        assert_eq!(cleaner.strip_stopwords(" ( δέ δέ λόγος ) "), " ( λόγος ) ");
    }

    #[test]
    fn test_strip_stopwords_idempotent() {
        let cleaner = Cleaner::default();
        let inputs = [
            " ( λέγω ( δέ ) ( καί ( ἀνήρ ) ) ( τε τε ) ) ",
            " ( ( μέν ) ( ( δέ ) ) ἀγαθός ) ",
            " ( ὁ ( ἡ ( τό ( λόγος ) ) ) ) ",
        ];
        for input in inputs {
            let once = cleaner.strip_stopwords(input);
            let twice = cleaner.strip_stopwords(&once);
            assert_eq!(once, twice, "input: {input}");
        }
    }

    #[test]
    fn test_custom_stop_list_is_used() {
        let cleaner = Cleaner::new(StopList::new(["καλός"]));
        assert_eq!(cleaner.stops().len(), 1);
        assert!(cleaner.stops().contains("καλός"));
        assert_eq!(cleaner.clean("(λόγος(καλός) (δέ))"), "( λόγος ( δέ ) )");
    }

    #[test]
    fn test_token_line() {
        assert_eq!(token_line("( λόγος ( καλός ) )"), "λόγος καλός");
        assert_eq!(token_line("( ( ἀνήρ ) )"), "ἀνήρ");
        assert_eq!(token_line(""), "");
    }

    #[test]
    fn test_drop_nested_empty_brackets() {
        assert_eq!(drop_empty_brackets(" ( λόγος ( ( ( ) ) ) ) "), " ( λόγος ) ");
    }
}
