//! Lemma co-occurrence supergraph
//!
//! Unions the parent/child productions of every merged tree into one
//! undirected graph over interned lemma strings, and exports it as an edge
//! list.

use crate::bracket::{BracketTree, TreeParseError, parse_bracketed};
use crate::config::open_input;
use crate::treebank::TreebankError;
use lasso::{Rodeo, Spur};
use petgraph::graphmap::UnGraphMap;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Vertex name of unlabelled brackets
pub const EMPTY_LABEL: &str = "_";

/// File name of the exported edge list
pub const EDGELIST: &str = "supergraph.edgelist";

#[derive(Debug, Error)]
pub enum GraphError {
    #[error(transparent)]
    Treebank(#[from] TreebankError),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: TreeParseError,
    },
}

/// Undirected graph of lemmas joined by parent/child productions
#[derive(Debug, Default)]
pub struct SuperGraph {
    names: Rodeo,
    graph: UnGraphMap<Spur, ()>,
}

impl SuperGraph {
    pub fn new() -> Self {
        Self::default()
    }

    fn intern(&mut self, name: &str) -> Spur {
        let name = if name.is_empty() { EMPTY_LABEL } else { name };
        self.names.get_or_intern(name)
    }

    /// Add one edge per production of `tree`
    pub fn add_tree(&mut self, tree: &BracketTree) {
        for (parent, child) in tree.productions() {
            let a = self.intern(parent);
            let b = self.intern(child);
            self.graph.add_edge(a, b, ());
        }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains_edge(&self, a: &str, b: &str) -> bool {
        match (self.names.get(a), self.names.get(b)) {
            (Some(a), Some(b)) => self.graph.contains_edge(a, b),
            _ => false,
        }
    }

    /// Neighbours of `name` in insertion order
    pub fn neighbors(&self, name: &str) -> Vec<&str> {
        let Some(node) = self.names.get(name) else {
            return Vec::new();
        };
        if !self.graph.contains_node(node) {
            return Vec::new();
        }
        self.graph
            .neighbors(node)
            .map(|n| self.names.resolve(&n))
            .collect()
    }

    /// One `a b` pair per line, in insertion order
    pub fn write_edgelist<W: Write>(&self, mut out: W) -> io::Result<()> {
        for (a, b, _) in self.graph.all_edges() {
            writeln!(out, "{} {}", self.names.resolve(&a), self.names.resolve(&b))?;
        }
        out.flush()
    }

    /// Union the trees of a bracketed tree stream, one tree per line
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, GraphError> {
        let mut graph = Self::new();
        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let tree = parse_bracketed(&line).map_err(|source| GraphError::Parse {
                line: i + 1,
                source,
            })?;
            graph.add_tree(&tree);
        }
        Ok(graph)
    }
}

/// Build the supergraph of a merged tree file
pub fn build_from_file(path: &Path) -> Result<SuperGraph, GraphError> {
    let reader = BufReader::new(open_input(path)?);
    let graph = SuperGraph::from_reader(reader)?;
    info!(
        file = %path.display(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "built supergraph"
    );
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const TREES: &str = "( λέγω ( ἀνήρ ( ἀγαθός ) ) ( λόγος ) )\n\n( ἀνήρ ( λέγω ) )\n( ( θεά ) )\n";

    #[test]
    fn test_union_of_trees() {
        let graph = SuperGraph::from_reader(TREES.as_bytes()).unwrap();

        // ἀνήρ-λέγω appears twice, once per direction
        assert_eq!(graph.edge_count(), 4);
        assert_eq!(graph.node_count(), 6);
        assert!(graph.contains_edge("λόγος", "λέγω"));
        assert!(graph.contains_edge(EMPTY_LABEL, "θεά"));
        assert!(!graph.contains_edge("λόγος", "ἀνήρ"));
        assert_eq!(graph.neighbors("ἀνήρ"), vec!["λέγω", "ἀγαθός"]);
    }

    #[test]
    fn test_childless_tree_adds_nothing() {
        let mut graph = SuperGraph::new();
        graph.add_tree(&parse_bracketed("( λόγος )").unwrap());
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.node_count(), 0);
        assert!(graph.neighbors("λόγος").is_empty());
    }

    #[test]
    fn test_write_edgelist() {
        let graph = SuperGraph::from_reader("( a ( b ) ( c ( d ) ) )\n".as_bytes()).unwrap();
        let mut out = Vec::new();
        graph.write_edgelist(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "a b\na c\nc d\n");
    }

    #[test]
    fn test_parse_error_names_line() {
        let err = SuperGraph::from_reader("( a ( b ) )\n( a ( b )\n".as_bytes()).unwrap_err();
        assert!(matches!(err, GraphError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_build_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trees.txt");
        fs::write(&path, TREES).unwrap();
        assert_eq!(build_from_file(&path).unwrap().edge_count(), 4);

        assert!(matches!(
            build_from_file(&dir.path().join("missing.txt")),
            Err(GraphError::Treebank(TreebankError::FileOpen { .. }))
        ));
    }
}
