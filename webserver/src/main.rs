//! WebServer process entry point
//!
//! Loads engine configuration from the environment, applies command line
//! overrides and serves the attribution API until Ctrl+C.

use std::net::SocketAddr;

use attribution::cli::EngineArgs;
use clap::Parser;
use shared::{EngineConfig, ProcessId, WebServerConfig, logging, process_info};

use webserver::{RealAttributionService, WebServer, WebServerError, WebServerResult};

#[derive(Parser, Debug)]
#[command(name = "webserver")]
#[command(about = "HTTP service for multi-touch Shapley attribution")]
struct Args {
    /// Port for HTTP server
    #[arg(long, default_value = "8080")]
    port: u16,

    /// Interface to bind
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(flatten)]
    engine: EngineArgs,
}

#[tokio::main]
async fn main() -> WebServerResult<()> {
    let args = Args::parse();

    // Initialize process ID singleton for webserver
    ProcessId::init_webserver();
    logging::init_tracing_with_level(Some(&args.log_level));

    let config = WebServerConfig {
        bind_host: args.host,
        bind_port: args.port,
        engine: args.engine.apply(EngineConfig::from_env()?)?,
    };
    logging::log_startup(ProcessId::current(), "attribution webserver");
    process_info!(
        ProcessId::current(),
        "Engine: threshold={}, iterations={}, policy={}",
        config.engine.exact_threshold,
        config.engine.monte_carlo_iterations,
        config.engine.value_policy
    );

    let http_addr: SocketAddr = format!("{}:{}", config.bind_host, config.bind_port)
        .parse()
        .map_err(|e| WebServerError::ServerStartup(format!("Invalid bind address: {e}")))?;

    let service = RealAttributionService::from_config(config.engine)?;
    let webserver = WebServer::new(http_addr, service);

    if let Err(err) = webserver.run().await {
        logging::log_error(ProcessId::current(), "WebServer", &err);
        return Err(err);
    }

    logging::log_success(ProcessId::current(), "WebServer stopped gracefully");
    Ok(())
}
