//! This module provides utilities for loading graphs from edge-list files.
//!
//! The accepted format is a DIMACS-style text file:
//!
//! ```text
//! c optional comment lines
//! p <kind> <num_nodes> <num_edges>
//! a <u> <v> [<weight>]
//! ```
//!
//! Node indices are 1-based. A missing weight defaults to 1. Every `a` line
//! contributes the undirected edge `{u, v}`, so the resulting adjacency matrix
//! is symmetric; repeated edges have their weights summed.

use faer::sparse::{SparseColMat, Triplet};
use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
};
use thiserror::Error;

/// Represents all possible errors that can occur while loading a graph.
#[derive(Error, Debug)]
pub enum DataLoaderError {
    /// Wraps a standard I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// Occurs when a string cannot be parsed into an integer.
    #[error("Parse error: Failed to parse integer from '{0}'")]
    ParseInt(String),
    /// Occurs when a string cannot be parsed into a float.
    #[error("Parse error: Failed to parse float from '{0}'")]
    ParseFloat(String),
    /// Occurs if the problem line is missing, malformed, or appears after an edge.
    #[error("Format error: The 'p' problem line was not found or was malformed.")]
    ProblemLineMissing,
    /// Occurs when an edge line does not have at least two endpoints.
    #[error("Format error: Malformed edge line '{0}'.")]
    MalformedEdge(String),
    /// Occurs when an endpoint is outside `1..=num_nodes`.
    #[error("Format error: Node {node} is out of range for a graph of {num_nodes} nodes.")]
    NodeOutOfRange { node: usize, num_nodes: usize },
    /// Occurs when an edge weight is negative or not finite.
    #[error("Format error: Edge ({u}, {v}) has invalid weight {weight}.")]
    InvalidWeight { u: usize, v: usize, weight: f64 },
    /// Occurs if the sparse matrix construction fails internally.
    #[error("Internal error: Failed to construct the sparse matrix from triplets.")]
    SparseMatrixConstructionError,
}

/// A graph loaded from disk.
#[derive(Debug)]
pub struct LoadedGraph {
    /// The symmetric weighted adjacency matrix.
    pub weights: SparseColMat<usize, f64>,
    /// The number of nodes declared by the problem line.
    pub num_nodes: usize,
    /// The number of edge lines read.
    pub num_edges: usize,
}

fn parse_usize(token: &str) -> Result<usize, DataLoaderError> {
    token
        .parse::<usize>()
        .map_err(|_| DataLoaderError::ParseInt(token.to_string()))
}

/// Converts a 1-based endpoint to a 0-based vertex index.
fn vertex(token: &str, num_nodes: usize) -> Result<usize, DataLoaderError> {
    let node = parse_usize(token)?;
    if node == 0 || node > num_nodes {
        return Err(DataLoaderError::NodeOutOfRange { node, num_nodes });
    }
    Ok(node - 1)
}

/// Parses an edge list from any buffered reader.
pub fn parse_graph(reader: impl BufRead) -> Result<LoadedGraph, DataLoaderError> {
    let mut num_nodes: Option<usize> = None;
    let mut declared_edges = 0;
    let mut num_edges = 0;
    let mut triplets: Vec<Triplet<usize, usize, f64>> = Vec::new();

    for line in reader.lines() {
        let line = line?;
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some(&tag) = parts.first() else {
            continue;
        };

        match tag {
            "c" => continue,
            "p" => {
                if parts.len() < 4 || num_nodes.is_some() {
                    return Err(DataLoaderError::ProblemLineMissing);
                }
                num_nodes = Some(parse_usize(parts[2])?);
                declared_edges = parse_usize(parts[3])?;
                triplets.reserve(2 * declared_edges);
            }
            "a" | "e" => {
                let n = num_nodes.ok_or(DataLoaderError::ProblemLineMissing)?;
                if parts.len() < 3 {
                    return Err(DataLoaderError::MalformedEdge(line.clone()));
                }
                let u = vertex(parts[1], n)?;
                let v = vertex(parts[2], n)?;
                let weight = match parts.get(3) {
                    Some(token) => token
                        .parse::<f64>()
                        .map_err(|_| DataLoaderError::ParseFloat(token.to_string()))?,
                    None => 1.0,
                };
                if !weight.is_finite() || weight < 0.0 {
                    return Err(DataLoaderError::InvalidWeight {
                        u: u + 1,
                        v: v + 1,
                        weight,
                    });
                }

                triplets.push(Triplet { row: u, col: v, val: weight });
                if u != v {
                    triplets.push(Triplet { row: v, col: u, val: weight });
                }
                num_edges += 1;
            }
            _ => continue,
        }
    }

    let num_nodes = num_nodes.ok_or(DataLoaderError::ProblemLineMissing)?;
    if num_edges != declared_edges {
        log::warn!(
            "Problem line declares {declared_edges} edges but {num_edges} were read; using the edges read."
        );
    }

    let weights = SparseColMat::try_new_from_triplets(num_nodes, num_nodes, &triplets)
        .map_err(|_| DataLoaderError::SparseMatrixConstructionError)?;

    Ok(LoadedGraph {
        weights,
        num_nodes,
        num_edges,
    })
}

/// Loads the symmetric adjacency matrix of the graph stored at `path`.
///
/// This is the main entry point of the module.
pub fn load_graph_weights(path: impl AsRef<Path>) -> Result<LoadedGraph, DataLoaderError> {
    let file = File::open(path)?;
    parse_graph(BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parses_weighted_edges_symmetrically() {
        let text = "c triangle\np edge 3 3\na 1 2 0.5\na 2 3\na 3 1 2\n";
        let graph = parse_graph(Cursor::new(text)).unwrap();
        assert_eq!(graph.num_nodes, 3);
        assert_eq!(graph.num_edges, 3);

        let mut entries: Vec<(usize, usize, f64)> = graph
            .weights
            .triplet_iter()
            .map(|t| (t.row, t.col, *t.val))
            .collect();
        entries.sort_by_key(|&(i, j, _)| (i, j));
        assert_eq!(
            entries,
            vec![
                (0, 1, 0.5),
                (0, 2, 2.0),
                (1, 0, 0.5),
                (1, 2, 1.0),
                (2, 0, 2.0),
                (2, 1, 1.0)
            ]
        );
    }

    #[test]
    fn test_rejects_edge_before_problem_line() {
        let err = parse_graph(Cursor::new("a 1 2\np edge 2 1\n")).unwrap_err();
        assert!(matches!(err, DataLoaderError::ProblemLineMissing));
    }

    #[test]
    fn test_rejects_out_of_range_node() {
        let err = parse_graph(Cursor::new("p edge 2 1\na 1 3\n")).unwrap_err();
        assert!(matches!(
            err,
            DataLoaderError::NodeOutOfRange {
                node: 3,
                num_nodes: 2
            }
        ));
    }

    #[test]
    fn test_rejects_negative_weight() {
        let err = parse_graph(Cursor::new("p edge 2 1\na 1 2 -1\n")).unwrap_err();
        assert!(matches!(err, DataLoaderError::InvalidWeight { .. }));
    }

    #[test]
    fn test_loaded_graph_is_debug_printable() {
        let graph = parse_graph(Cursor::new("p edge 2 1\na 1 2\n")).unwrap();
        let printed = format!("{graph:?}");
        assert!(printed.contains("num_nodes: 2"));
        assert!(printed.contains("num_edges: 1"));
    }
}
