//! Experiment Runner for the Scalability Analysis.
//!
//! This executable compares the cost of exact spectral filtering (full
//! eigendecomposition of the Laplacian) with Chebyshev filtering (sparse
//! products only) as the number of vertices grows. The primary process, the
//! "orchestrator," iterates through a range of ring sizes and spawns one
//! isolated "worker" child process per filtering method and size.
//!
//! Running every measurement in its own process keeps the peak memory figures
//! (Peak RSS) of the two methods from contaminating each other. The
//! orchestrator captures the single-row CSV output of each worker and
//! aggregates all results into a final CSV file.

use anyhow::{Context, Result, anyhow};
use clap::{Parser, ValueEnum};
use faer::Mat;
use graph_spectral::{
    Graph, LaplacianType,
    filters::Heat,
    solvers::{filter_chebyshev, filter_exact},
    utils::{perf::get_peak_rss_kb, perf::timed, synthetic::ring_weights},
};
use serde::{Deserialize, Serialize};
use std::{
    path::PathBuf,
    process::{Command, Stdio},
};

/// Environment variable to differentiate between orchestrator and worker processes.
/// If this is set, the process runs in worker mode for the specified method.
const METHOD_ENV_VAR: &str = "GSP_SCALABILITY_METHOD";

/// Defines the filtering method to be run in a worker process.
#[derive(ValueEnum, Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Copy)]
#[serde(rename_all = "kebab-case")]
enum Method {
    Exact,
    Chebyshev,
}

/// Command-line arguments for the main orchestrator process.
#[derive(Parser, Debug)]
#[clap(
    name = "scalability-runner",
    about = "Compares exact and Chebyshev filtering as the graph grows."
)]
struct ScalabilityArgs {
    /// Polynomial order used by the Chebyshev worker.
    #[clap(long, default_value_t = 30)]
    order: usize,
    #[clap(long)]
    n_start: usize,
    #[clap(long)]
    n_end: usize,
    #[clap(long)]
    n_step: usize,
    /// Path to the output CSV file for storing aggregated results.
    #[clap(long, value_name = "PATH")]
    output: PathBuf,
}

/// Command-line arguments for the isolated worker processes.
#[derive(Parser, Debug)]
struct WorkerArgs {
    #[clap(long)]
    n: usize,
    #[clap(long)]
    order: usize,
}

/// A single row of data in the final output CSV.
#[derive(Debug, Serialize, Deserialize)]
struct ScalabilityResult {
    method: Method,
    n: usize,
    order: usize,
    time_s: f64,
    rss_kb: u64,
}

/// Main entry point.
///
/// Dispatches to either the orchestrator or a worker based on the presence of
/// the `GSP_SCALABILITY_METHOD` environment variable.
fn main() -> Result<()> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .try_init()
        .map_err(|e| anyhow!("Failed to initialize logger: {}", e))?;

    if let Ok(method_str) = std::env::var(METHOD_ENV_VAR) {
        let method = Method::from_str(&method_str, true)
            .map_err(|_| anyhow!("Invalid method string in env var: {}", method_str))?;
        run_worker(method)
    } else {
        run_orchestrator()
    }
}

/// Orchestrator logic.
///
/// Results are written to the output CSV incrementally so that data is kept
/// even if a run fails mid-way through the experiment.
fn run_orchestrator() -> Result<()> {
    let args = ScalabilityArgs::parse();
    log::info!("Orchestrator starting scalability experiment...");

    let mut writer = csv::Writer::from_path(&args.output)
        .with_context(|| format!("Failed to create CSV writer for {:?}", &args.output))?;
    let current_exe = std::env::current_exe()?;

    for n in (args.n_start..=args.n_end).step_by(args.n_step.max(1)) {
        log::info!("Processing graph size: {n} vertices");

        for method in [Method::Exact, Method::Chebyshev] {
            let method_name = method
                .to_possible_value()
                .ok_or_else(|| anyhow!("Method {method:?} has no command-line name"))?;
            let child = Command::new(&current_exe)
                .arg("--n")
                .arg(n.to_string())
                .arg("--order")
                .arg(args.order.to_string())
                .env(METHOD_ENV_VAR, method_name.get_name())
                .stdout(Stdio::piped())
                .stderr(Stdio::inherit())
                .spawn()
                .with_context(|| format!("Failed to spawn worker for method {method:?}"))?;

            let output = child.wait_with_output()?;
            if !output.status.success() {
                log::error!(
                    "Worker for method {method:?} on n={n} failed with status: {}. Skipping.",
                    output.status
                );
                continue;
            }

            let mut rdr = csv::ReaderBuilder::new()
                .has_headers(false)
                .from_reader(output.stdout.as_slice());
            match rdr.deserialize::<ScalabilityResult>().next() {
                Some(Ok(record)) => {
                    log::info!(
                        "Worker finished. Result: method={:?}, n={}, time={:.3}s, rss={}KB",
                        record.method,
                        record.n,
                        record.time_s,
                        record.rss_kb
                    );
                    writer.serialize(&record)?;
                    writer.flush()?;
                }
                Some(Err(e)) => {
                    log::error!("Failed to parse worker output as CSV: {}. Skipping record.", e);
                }
                None => {
                    log::warn!("Worker for {method:?} produced no output. Skipping record.");
                }
            }
        }
    }

    log::info!("Scalability experiment complete. Results saved to {:?}.", &args.output);
    Ok(())
}

/// Worker logic.
///
/// Builds a ring of `n` vertices, filters a smooth signal with a heat kernel
/// using a single method, and prints one `ScalabilityResult` to stdout.
fn run_worker(method: Method) -> Result<()> {
    let args = WorkerArgs::parse();
    log::info!("Worker for {method:?} started on {} vertices.", args.n);

    let graph = Graph::new(ring_weights(args.n)?, LaplacianType::Combinatorial)?;
    let signal = Mat::from_fn(args.n, 1, |i, _| (i as f64 / args.n as f64).sin());

    // The ring spectrum is known to lie in [0, 4].
    let heat = Heat::new(5.0, 4.0)?;
    let (result, time_s) = timed(|| -> Result<Mat<f64>> {
        graph.compute_laplacian()?;
        match method {
            Method::Exact => {
                graph.compute_fourier_basis()?;
                Ok(filter_exact(&graph, heat, signal.as_ref())?)
            }
            Method::Chebyshev => Ok(filter_chebyshev(&graph, heat, args.order, signal.as_ref())?),
        }
    });
    result?;
    let rss_kb = get_peak_rss_kb();

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(std::io::stdout());
    writer.serialize(ScalabilityResult {
        method,
        n: args.n,
        order: args.order,
        time_s,
        rss_kb,
    })?;
    writer.flush()?;

    log::info!("Worker for {method:?} finished.");
    Ok(())
}
