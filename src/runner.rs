//! Batch conversion of treebanks into output files
//!
//! Runs sentence conversion over every document of a [`Treebank`] and
//! writes the bracketed stream, the bracket-free stream and the left-behind
//! report side by side. The two streams stay line-aligned.

use crate::cleanup::Cleaner;
use crate::config::{ConvertConfig, OutputPaths, create_output};
use crate::convert::{Outcome, SkipReason, convert_sentence};
use crate::iterators::Treebank;
use crate::tree::Sentence;
use crate::treebank::TreebankError;
use std::fs::File;
use std::io::{BufWriter, Write};
use tracing::{debug, info, warn};

/// Counters of one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    pub files: usize,
    pub sentences: usize,
    pub written: usize,
    pub skipped_no_root: usize,
    pub skipped_no_arcs: usize,
    pub emptied: usize,
    pub left_behind: usize,
}

/// The three output streams of one label
#[derive(Debug)]
pub struct Outputs<W: Write> {
    pub parenth: W,
    pub strings: W,
    pub leftbehind: W,
}

impl Outputs<BufWriter<File>> {
    /// Create the output files, truncating previous runs
    pub fn create(paths: &OutputPaths) -> Result<Self, TreebankError> {
        Ok(Self {
            parenth: BufWriter::new(create_output(&paths.parenth)?),
            strings: BufWriter::new(create_output(&paths.strings)?),
            leftbehind: BufWriter::new(create_output(&paths.leftbehind)?),
        })
    }
}

impl<W: Write> Outputs<W> {
    fn flush(&mut self) -> Result<(), TreebankError> {
        self.parenth.flush()?;
        self.strings.flush()?;
        self.leftbehind.flush()?;
        Ok(())
    }
}

/// Opens the outputs of a label the first time it is written to
pub type Opener<W> = Box<dyn FnMut(&str) -> Result<Outputs<W>, TreebankError>>;

/// Converts sentences and writes them out, one set of outputs per label
pub struct Converter<W: Write> {
    config: ConvertConfig,
    open: Opener<W>,
    outputs: Vec<(String, Outputs<W>)>,
    cleaner: Cleaner,
    stats: RunStats,
}

impl Converter<BufWriter<File>> {
    /// Converter writing the files laid out by `config`
    ///
    /// With a fixed label the outputs are created up front; otherwise each
    /// label's files are created when its first line is written.
    pub fn create(config: &ConvertConfig) -> Result<Self, TreebankError> {
        let layout = config.clone();
        let open: Opener<BufWriter<File>> = Box::new(move |label: &str| {
            let paths = layout.output_paths(label);
            info!(parenth = %paths.parenth.display(), label, "writing outputs");
            Outputs::create(&paths)
        });

        let mut converter = Self::new(config.clone(), open);
        if let Some(label) = config.fixed_label() {
            converter.outputs_for(label)?;
        }
        Ok(converter)
    }
}

impl<W: Write> Converter<W> {
    pub fn new(config: ConvertConfig, open: Opener<W>) -> Self {
        let cleaner = Cleaner::new(config.stops.clone());
        Self {
            config,
            open,
            outputs: Vec::new(),
            cleaner,
            stats: RunStats::default(),
        }
    }

    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    fn outputs_for(&mut self, label: &str) -> Result<&mut Outputs<W>, TreebankError> {
        let i = match self.outputs.iter().position(|(known, _)| known == label) {
            Some(i) => i,
            None => {
                let out = (self.open)(label)?;
                self.outputs.push((label.to_string(), out));
                self.outputs.len() - 1
            }
        };
        Ok(&mut self.outputs[i].1)
    }

    /// Convert one sentence of `source` and write whatever it produces to
    /// the outputs of `label`
    pub fn convert_sentence(
        &mut self,
        source: &str,
        label: &str,
        sentence: &Sentence,
    ) -> Result<(), TreebankError> {
        self.stats.sentences += 1;
        let id = sentence.display_id();

        match convert_sentence(sentence, &self.cleaner) {
            Outcome::Converted(converted) => {
                let out = self.outputs_for(label)?;
                writeln!(out.parenth, "{}", converted.bracketed)?;
                writeln!(out.strings, "{}", converted.tokens)?;
                self.stats.written += 1;
            }
            Outcome::Skipped(reason) => {
                debug!(sentence = id, source, ?reason, "skipped sentence");
                match reason {
                    SkipReason::NoRoot => self.stats.skipped_no_root += 1,
                    SkipReason::NoArcs => self.stats.skipped_no_arcs += 1,
                    SkipReason::Emptied => self.stats.emptied += 1,
                }
            }
            Outcome::LeftBehind(e) => {
                warn!(sentence = id, source, error = %e, "sentence left behind");
                let out = self.outputs_for(label)?;
                writeln!(out.leftbehind, "{} {}", id, source)?;
                self.stats.left_behind += 1;
            }
        }
        Ok(())
    }

    /// Convert every sentence of every document, stopping at the first file error
    pub fn convert_treebank(&mut self, treebank: &Treebank) -> Result<&RunStats, TreebankError> {
        for document in treebank.documents() {
            let (source, mut reader) = document?;
            info!(file = %source, "converting");
            self.stats.files += 1;

            let written_before = self.stats.written;
            while let Some(sentence) = reader.next() {
                let sentence = sentence?;
                // the schema is known once the first token has been read
                let label = self.config.label_for(reader.schema()).to_string();
                self.convert_sentence(&source, &label, &sentence)?;
            }
            debug!(
                file = %source,
                written = self.stats.written - written_before,
                "finished file"
            );
        }
        Ok(&self.stats)
    }

    /// Flush the outputs and hand them back, by label, with the final counters
    pub fn finish(mut self) -> Result<(RunStats, Vec<(String, Outputs<W>)>), TreebankError> {
        for (_, out) in &mut self.outputs {
            out.flush()?;
        }
        Ok((self.stats, self.outputs))
    }
}

/// Convert a treebank with the files and stopwords of `config`
pub fn run(config: &ConvertConfig, treebank: &Treebank) -> Result<RunStats, TreebankError> {
    let mut converter = Converter::create(config)?;
    converter.convert_treebank(treebank)?;
    let (stats, _) = converter.finish()?;
    info!(
        files = stats.files,
        sentences = stats.sentences,
        written = stats.written,
        left_behind = stats.left_behind,
        "conversion finished"
    );
    Ok(stats)
}
