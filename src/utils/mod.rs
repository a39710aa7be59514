//! Utilities shared by the experiment binaries and the test suites.
//!
//! - **`data_loader`**: parses DIMACS-style edge lists into a symmetric
//!   weighted adjacency matrix.
//! - **`synthetic`**: adjacency matrices of small reference graphs (paths,
//!   rings) whose spectra are known in closed form.
//! - **`perf`**: peak memory measurement on Linux.

pub mod data_loader;
pub mod perf;
pub mod synthetic;
