//! Merging per-run outputs into one tree file

use crate::config::{create_output, open_input};
use crate::treebank::TreebankError;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Name of the merged tree file inside a model directory
pub const MERGED_TREES: &str = "trees.txt";

/// Bracketed outputs of a model directory, sorted by name
pub fn parenth_outputs(model_dir: &Path) -> Result<Vec<PathBuf>, TreebankError> {
    let dir = glob::Pattern::escape(&model_dir.display().to_string());
    let mut paths = glob::glob(&format!("{dir}/outparenth*.txt"))?
        .collect::<Result<Vec<PathBuf>, _>>()?;
    paths.sort();
    Ok(paths)
}

/// Concatenate every `outparenth*.txt` of `model_dir` into `trees.txt`
///
/// Returns the number of trees written. Each tree ends up on its own line
/// even when a source file lacks a trailing newline.
pub fn merge_trees(model_dir: &Path) -> Result<usize, TreebankError> {
    let inputs = parenth_outputs(model_dir)?;
    if inputs.is_empty() {
        warn!(dir = %model_dir.display(), "no bracketed outputs to merge");
    }

    let out_path = model_dir.join(MERGED_TREES);
    let mut out = BufWriter::new(create_output(&out_path)?);
    let mut count = 0;
    for path in &inputs {
        let reader = BufReader::new(open_input(path)?);
        for line in reader.lines() {
            writeln!(out, "{}", line?)?;
            count += 1;
        }
    }
    out.flush()?;

    info!(
        files = inputs.len(),
        trees = count,
        out = %out_path.display(),
        "merged trees"
    );
    Ok(count)
}
