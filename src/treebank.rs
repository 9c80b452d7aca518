//! Treebank XML parsing
//!
//! Streams `sentence` elements out of AGDT and PROIEL treebank files.
//!
//! AGDT: `<sentence id=".."><word id head lemma postag [artificial] [relation]/>`
//! PROIEL: `<sentence id=".."><token id [head-id] lemma part-of-speech
//! [empty-token-sort] [relation]/>`
//!
//! Both are read into the same [`Sentence`] model. PROIEL tokens without a
//! `head-id` are roots, empty tokens (ellipsis) get an empty lemma, and
//! part-of-speech tags are lowercased so the AGDT postag classes apply.

use crate::tree::{Head, Sentence, Token};
use quick_xml::events::attributes::AttrError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use std::fmt;
use std::io::BufRead;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// Error while reading treebank files
#[derive(Debug, Error)]
pub enum TreebankError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("XML attribute error: {0}")]
    Attr(#[from] AttrError),

    #[error("Failed to open file {path}: {source}")]
    FileOpen {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("Failed to read glob entry: {0}")]
    Glob(#[from] glob::GlobError),
}

/// Treebank annotation schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Schema {
    Agdt,
    Proiel,
}

impl Schema {
    /// Suffix used in output file names
    pub fn label(self) -> &'static str {
        match self {
            Schema::Agdt => "agdt",
            Schema::Proiel => "proiel",
        }
    }

    /// Name of the per-token element
    pub fn token_element(self) -> &'static [u8] {
        match self {
            Schema::Agdt => b"word",
            Schema::Proiel => b"token",
        }
    }

    fn detect(element: &[u8]) -> Option<Self> {
        match element {
            b"word" => Some(Schema::Agdt),
            b"token" => Some(Schema::Proiel),
            _ => None,
        }
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Schema {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "agdt" => Ok(Schema::Agdt),
            "proiel" => Ok(Schema::Proiel),
            other => Err(format!("unknown treebank schema: {other}")),
        }
    }
}

/// Reader that iterates over the sentences of one treebank document
pub struct TreebankReader<R: BufRead> {
    reader: Reader<R>,
    buf: Vec<u8>,
    schema: Option<Schema>,
    current: Option<Sentence>,
    done: bool,
}

impl<R: BufRead> TreebankReader<R> {
    /// Create a reader; with `schema` unset it is detected from the first token
    pub fn new(inner: R, schema: Option<Schema>) -> Self {
        let mut reader = Reader::from_reader(inner);
        reader.config_mut().trim_text(true);
        Self {
            reader,
            buf: Vec::new(),
            schema,
            current: None,
            done: false,
        }
    }

    /// Schema in use, once known
    pub fn schema(&self) -> Option<Schema> {
        self.schema
    }

    fn next_sentence(&mut self) -> Result<Option<Sentence>, TreebankError> {
        loop {
            self.buf.clear();
            match self.reader.read_event_into(&mut self.buf)? {
                Event::Start(e) => {
                    if e.local_name().as_ref() == b"sentence" {
                        self.current = Some(start_sentence(&e)?);
                    } else {
                        on_token(&e, &mut self.schema, &mut self.current)?;
                    }
                }
                Event::Empty(e) => {
                    if e.local_name().as_ref() == b"sentence" {
                        // <sentence/> carries no tokens
                        return Ok(Some(start_sentence(&e)?));
                    }
                    on_token(&e, &mut self.schema, &mut self.current)?;
                }
                Event::End(e) => {
                    if e.local_name().as_ref() == b"sentence" {
                        if let Some(sentence) = self.current.take() {
                            return Ok(Some(sentence));
                        }
                    }
                }
                Event::Eof => return Ok(None),
                _ => {}
            }
        }
    }
}

impl<'a> TreebankReader<&'a [u8]> {
    /// Create a reader over in-memory XML
    pub fn from_str(text: &'a str, schema: Option<Schema>) -> Self {
        Self::new(text.as_bytes(), schema)
    }
}

impl<R: BufRead> Iterator for TreebankReader<R> {
    type Item = Result<Sentence, TreebankError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_sentence() {
            Ok(Some(sentence)) => Some(Ok(sentence)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                // a malformed document cannot be resynchronized
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

fn start_sentence(e: &BytesStart<'_>) -> Result<Sentence, TreebankError> {
    let mut id = None;
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.as_ref() == b"id" {
            id = Some(attr.unescape_value()?.into_owned());
        }
    }
    Ok(Sentence {
        id,
        tokens: Vec::new(),
    })
}

/// Add a token element to the open sentence, if it is one
fn on_token(
    e: &BytesStart<'_>,
    schema: &mut Option<Schema>,
    current: &mut Option<Sentence>,
) -> Result<(), TreebankError> {
    let Some(sentence) = current.as_mut() else {
        return Ok(());
    };
    let name = e.local_name();
    let schema = match *schema {
        Some(known) if known.token_element() == name.as_ref() => known,
        Some(_) => return Ok(()),
        None => match Schema::detect(name.as_ref()) {
            Some(detected) => *schema.insert(detected),
            None => return Ok(()),
        },
    };

    let token = match schema {
        Schema::Agdt => parse_agdt_word(e)?,
        Schema::Proiel => parse_proiel_token(e)?,
    };
    sentence.add_token(token);
    Ok(())
}

fn parse_agdt_word(e: &BytesStart<'_>) -> Result<Token, TreebankError> {
    let mut token = empty_token();
    let mut head = None;
    for attr in e.attributes() {
        let attr = attr?;
        let value = attr.unescape_value()?.into_owned();
        match attr.key.as_ref() {
            b"id" => token.id = value,
            b"head" => head = Some(value),
            b"lemma" => token.lemma = Some(value),
            b"postag" => token.postag = Some(value),
            b"artificial" => token.artificial = Some(value),
            b"relation" => token.relation = Some(value),
            _ => {}
        }
    }
    token.head = Head::from_attr(head.as_deref());
    Ok(token)
}

fn parse_proiel_token(e: &BytesStart<'_>) -> Result<Token, TreebankError> {
    let mut token = empty_token();
    let mut head = None;
    for attr in e.attributes() {
        let attr = attr?;
        let value = attr.unescape_value()?.into_owned();
        match attr.key.as_ref() {
            b"id" => token.id = value,
            b"head-id" => head = Some(value),
            b"lemma" => token.lemma = Some(value),
            b"part-of-speech" => token.postag = Some(value.to_lowercase()),
            b"empty-token-sort" => token.artificial = Some(value),
            b"relation" => token.relation = Some(value),
            _ => {}
        }
    }
    // PROIEL leaves the head out on roots
    token.head = match head.as_deref() {
        None => Head::Root,
        head => Head::from_attr(head),
    };
    if token.lemma.is_none() && token.artificial.is_some() {
        token.lemma = Some(String::new());
    }
    Ok(token)
}

fn empty_token() -> Token {
    Token {
        id: String::new(),
        head: Head::Missing,
        lemma: None,
        postag: None,
        artificial: None,
        relation: None,
    }
}
