//! Sentence data structures for dependency-to-bracket conversion
//!
//! A sentence is the flat list of tokens read from one `sentence` element of
//! a treebank. Tokens keep their XML attributes as strings: AGDT and PROIEL
//! ids are numeric in practice, but nothing downstream needs them as numbers.

use std::fmt;

/// The governor of a token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Head {
    /// `head="0"`: the token is a root
    Root,
    /// `head=""`: no governor annotated, attached under the sentence root
    Empty,
    /// No head attribute at all. Never resolves.
    Missing,
    /// Id of the governing token
    Token(String),
}

impl Head {
    /// Interpret a raw head attribute
    pub fn from_attr(value: Option<&str>) -> Self {
        match value {
            None => Head::Missing,
            Some("0") => Head::Root,
            Some("") => Head::Empty,
            Some(id) => Head::Token(id.to_string()),
        }
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        matches!(self, Head::Root)
    }

    /// Id of the governing token, if the head names one
    pub fn token_id(&self) -> Option<&str> {
        match self {
            Head::Token(id) => Some(id),
            _ => None,
        }
    }
}

/// A single annotated word
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub id: String,
    pub head: Head,
    pub lemma: Option<String>,
    pub postag: Option<String>,
    pub artificial: Option<String>,
    pub relation: Option<String>,
}

impl Token {
    /// Create a token with lemma and postag, as most tests need
    pub fn new(id: &str, head: Head, lemma: &str, postag: &str) -> Self {
        Self {
            id: id.to_string(),
            head,
            lemma: Some(lemma.to_string()),
            postag: Some(postag.to_string()),
            artificial: None,
            relation: None,
        }
    }

    pub fn with_artificial(mut self, artificial: &str) -> Self {
        self.artificial = Some(artificial.to_string());
        self
    }

    pub fn with_relation(mut self, relation: &str) -> Self {
        self.relation = Some(relation.to_string());
        self
    }

    pub fn placeholder(&self) -> Placeholder {
        Placeholder::new(&self.id)
    }
}

/// Anchor standing in for a token id while a sentence is being assembled
///
/// Displays as `id<N>id`. Placeholders are compared as whole values, so
/// `id12id` never matches inside `id123id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Placeholder(String);

impl Placeholder {
    pub fn new(token_id: &str) -> Self {
        Self(token_id.to_string())
    }

    pub fn token_id(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "id{}id", self.0)
    }
}

/// One treebank sentence
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sentence {
    pub id: Option<String>,
    pub tokens: Vec<Token>,
}

impl Sentence {
    pub fn new(id: Option<&str>) -> Self {
        Self {
            id: id.map(str::to_string),
            tokens: Vec::new(),
        }
    }

    pub fn add_token(&mut self, token: Token) -> usize {
        self.tokens.push(token);
        self.tokens.len() - 1
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Number of tokens whose head is anything but `0`
    ///
    /// Zero means the sentence carries no dependency arc at all.
    pub fn arc_count(&self) -> usize {
        self.tokens.iter().filter(|t| !t.head.is_root()).count()
    }

    /// Sentence id as written to the left-behind report
    pub fn display_id(&self) -> &str {
        self.id.as_deref().unwrap_or("None")
    }
}
