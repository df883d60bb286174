//! Batch attribution command line runner
//!
//! Reads a batch request (orders plus journey map) from a JSON file, attributes
//! every order and writes the per-order results as JSON.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use attribution::cli::{EngineArgs, render_response, run_batch_file};
use attribution::{AttributionOrchestrator, AttributionResult, BatchAttributionRunner};
use shared::{EngineConfig, ProcessId, logging, process_debug, process_info};

/// Shapley attribution over a batch of orders
#[derive(Parser, Debug)]
#[command(name = "attribution")]
#[command(about = "Attributes conversion value across marketing touchpoints")]
struct Args {
    /// Batch request JSON file
    #[arg(long)]
    input: PathBuf,

    /// Write the response here instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Pretty-print the JSON response
    #[arg(long)]
    pretty: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(flatten)]
    engine: EngineArgs,
}

fn main() -> AttributionResult<()> {
    let args = Args::parse();

    ProcessId::init_cli();
    logging::init_tracing_with_level(Some(&args.log_level));

    let config = args.engine.apply(EngineConfig::from_env()?)?;
    logging::log_startup(ProcessId::current(), "batch attribution");
    process_debug!(
        ProcessId::current(),
        "Engine: threshold={}, iterations={}, policy={}, seed={:?}",
        config.exact_threshold,
        config.monte_carlo_iterations,
        config.value_policy,
        config.seed
    );

    let orchestrator = Arc::new(AttributionOrchestrator::new(config)?);
    let runner = BatchAttributionRunner::new(orchestrator);

    let response = match run_batch_file(&args.input, &runner) {
        Ok(response) => response,
        Err(err) => {
            logging::log_error(ProcessId::current(), "Reading batch input", &err);
            return Err(err);
        }
    };
    let rendered = render_response(&response, args.pretty)?;

    match &args.output {
        Some(path) => {
            fs::write(path, rendered)?;
            process_info!(ProcessId::current(), "📄 Results written to {}", path.display());
        }
        None => println!("{rendered}"),
    }

    logging::log_success(
        ProcessId::current(),
        &format!(
            "Attributed {} orders ({} failed)",
            response.results.len(),
            response.error_count()
        ),
    );
    Ok(())
}
