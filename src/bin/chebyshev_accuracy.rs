//! Experiment Runner for the Chebyshev Accuracy Analysis.
//!
//! This executable measures how fast the Chebyshev approximation of a heat
//! kernel converges to exact spectral filtering as the polynomial order grows.
//! The graph is either loaded from a DIMACS-style edge file or generated as a
//! ring. The exact reference `U diag(h(e)) Uᵗ f` is computed once from the full
//! Fourier basis; then, for every order in the requested range, the Chebyshev
//! output is compared against it and one CSV row is written.

use anyhow::{Context, Result, anyhow, ensure};
use clap::{Parser, ValueEnum};
use faer::Mat;
use graph_spectral::{
    Graph, LaplacianType,
    filters::Heat,
    solvers::{filter_chebyshev, filter_exact},
    utils::{data_loader::load_graph_weights, perf::timed, synthetic::ring_weights},
};
use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::Serialize;
use std::path::PathBuf;

/// The Laplacian normalization, as accepted on the command line.
#[derive(ValueEnum, Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
enum LaplacianArg {
    Combinatorial,
    Normalized,
}

impl From<LaplacianArg> for LaplacianType {
    fn from(arg: LaplacianArg) -> Self {
        match arg {
            LaplacianArg::Combinatorial => LaplacianType::Combinatorial,
            LaplacianArg::Normalized => LaplacianType::Normalized,
        }
    }
}

/// Command-line arguments for the accuracy experiment.
#[derive(Parser, Debug)]
#[clap(
    name = "chebyshev-accuracy",
    about = "Measures the error of Chebyshev filtering against exact spectral filtering."
)]
struct AccuracyArgs {
    /// DIMACS-style edge file. When omitted, a ring graph is generated.
    #[clap(long, value_name = "PATH")]
    graph: Option<PathBuf>,
    /// Number of vertices of the generated ring.
    #[clap(long, default_value_t = 500)]
    ring_size: usize,
    #[clap(long, value_enum, default_value_t = LaplacianArg::Combinatorial)]
    laplacian: LaplacianArg,
    /// Diffusion time of the heat kernel.
    #[clap(long, default_value_t = 10.0)]
    tau: f64,
    #[clap(long, default_value_t = 2)]
    order_start: usize,
    #[clap(long, default_value_t = 60)]
    order_end: usize,
    #[clap(long, default_value_t = 2)]
    order_step: usize,
    /// Path to the output CSV file.
    #[clap(long, value_name = "PATH")]
    output: PathBuf,
}

/// A single row of the output CSV.
#[derive(Debug, Serialize)]
struct AccuracyResult {
    laplacian: LaplacianArg,
    n: usize,
    tau: f64,
    order: usize,
    rel_error: f64,
    time_s: f64,
}

fn main() -> Result<()> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .try_init()
        .map_err(|e| anyhow!("Failed to initialize logger: {}", e))?;

    let args = AccuracyArgs::parse();
    ensure!(args.order_start >= 1, "The Chebyshev order must start at 1 or above.");
    ensure!(args.order_step >= 1, "The order step must be positive.");

    let weights = match &args.graph {
        Some(path) => {
            let loaded = load_graph_weights(path)
                .with_context(|| format!("Failed to load graph from {path:?}"))?;
            log::info!(
                "Loaded graph with {} nodes and {} edges.",
                loaded.num_nodes,
                loaded.num_edges
            );
            loaded.weights
        }
        None => ring_weights(args.ring_size)?,
    };

    let graph = Graph::new(weights, args.laplacian.into())?;
    let n = graph.n_vertices();
    graph.compute_laplacian()?;

    log::info!("Computing the exact Fourier basis for {n} vertices...");
    let (basis, basis_time) = timed(|| graph.compute_fourier_basis());
    let lmax = basis?.lmax();
    log::info!("Fourier basis ready in {basis_time:.2}s (lmax = {lmax:.6}).");

    // A reproducible random signal excites every part of the spectrum.
    let mut rng = StdRng::seed_from_u64(42);
    let signal = Mat::from_fn(n, 1, |_, _| rng.random::<f64>() - 0.5);
    let heat = Heat::new(args.tau, lmax)?;
    let exact = filter_exact(&graph, heat, signal.as_ref())?;
    let reference_norm = exact.norm_l2();

    let mut writer = csv::Writer::from_path(&args.output)
        .with_context(|| format!("Failed to create CSV writer for {:?}", &args.output))?;

    for order in (args.order_start..=args.order_end).step_by(args.order_step) {
        let (approx, time_s) = timed(|| filter_chebyshev(&graph, heat, order, signal.as_ref()));
        let approx = approx?;
        let rel_error = (&approx - &exact).norm_l2() / reference_norm;
        log::info!("order={order}, rel_error={rel_error:.3e}, time={time_s:.4}s");

        writer.serialize(AccuracyResult {
            laplacian: args.laplacian,
            n,
            tau: args.tau,
            order,
            rel_error,
            time_s,
        })?;
        writer.flush()?;
    }

    log::info!("Accuracy experiment complete. Results saved to {:?}.", &args.output);
    Ok(())
}
