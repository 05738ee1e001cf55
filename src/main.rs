//! Bug Review - root-cause report builder for a defect id
//!
//! # Usage
//! ```bash
//! bug-review ABC-123                      # Report for ABC-123 as JSON on stdout
//! bug-review ABC-123 -o abc-123.json      # Write the report to a file
//! bug-review serve --repo ~/src/project   # Serve reports over HTTP
//! ```
//!
//! The report lists every non-merge commit mentioning the defect id, the
//! lines each one replaced, who last touched those lines, and a palette
//! class per commit for consistent rendering.

mod error;
mod git;
mod models;
mod report;
mod routes;

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::Router;
use clap::builder::TypedValueParser;
use clap::{Args, Parser, Subcommand};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use git::GitRepository;
use report::{FailurePolicy, ReportConfig, build_report};
use routes::AppState;

/// Bug Review - trace the commits behind a defect fix
#[derive(Parser)]
#[command(name = "bug-review")]
#[command(about = "Build a blame-attributed commit report for a defect id", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Defect id to report on, e.g. ABC-123
    #[arg(value_name = "BUG")]
    bug: Option<String>,

    /// Write the report to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Emit single-line JSON
    #[arg(long)]
    compact: bool,

    #[command(flatten)]
    engine: EngineArgs,
}

#[derive(Args, Clone)]
struct EngineArgs {
    /// Path inside the git repository to inspect
    #[arg(short, long, default_value = ".", global = true)]
    repo: PathBuf,

    /// Number of palette classes for replaced commits
    #[arg(long, default_value_t = report::palette::DEFAULT_PALETTE_SIZE, value_parser = clap::value_parser!(u8).range(8..=64).map(usize::from), global = true)]
    palette_size: usize,

    /// Abort the whole run when a git query for one commit fails
    #[arg(long, global = true)]
    fail_fast: bool,
}

impl EngineArgs {
    fn config(&self) -> ReportConfig {
        ReportConfig {
            palette_size: self.palette_size,
            failure_policy: if self.fail_fast {
                FailurePolicy::Abort
            } else {
                FailurePolicy::Skip
            },
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Serve reports over a local HTTP API
    Serve {
        /// Port to run the server on
        #[arg(short, long, default_value = "3001")]
        port: u16,
    },
}

fn open_repository(path: &Path) -> GitRepository {
    match GitRepository::open(path) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("✗ Failed to open repository: {}", e);
            eprintln!("  Path: {}", path.display());
            std::process::exit(1);
        }
    }
}

fn write_report(cli: &Cli, bug: &str) -> anyhow::Result<()> {
    let repo = open_repository(&cli.engine.repo);
    let report = build_report(&repo, bug, &cli.engine.config())?;

    let json = if cli.compact {
        serde_json::to_string(&report)?
    } else {
        serde_json::to_string_pretty(&report)?
    };

    match &cli.output {
        Some(path) => {
            fs::write(path, json)?;
            eprintln!("✓ Wrote report for {} to {}", bug, path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(json.as_bytes())?;
            stdout.write_all(b"\n")?;
        }
    }

    if !report.skipped.is_empty() {
        eprintln!("  {} commit(s) skipped, see `skipped` in the report", report.skipped.len());
    }

    Ok(())
}

async fn serve(engine: &EngineArgs, port: u16) -> anyhow::Result<()> {
    let repo = open_repository(&engine.repo);
    let canonical_path = repo.path.to_string_lossy().to_string();

    let state = AppState {
        repo: Arc::new(repo),
        config: engine.config(),
    };

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .merge(routes::create_router(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    // Bind to the port
    let addr = format!("127.0.0.1:{}", port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            eprintln!("✗ Failed to bind to port {}: {}", port, e);
            eprintln!("  Try a different port with --port <PORT>");
            std::process::exit(1);
        }
    };

    println!();
    println!("  Repository: {}", canonical_path);
    println!("  Reports:    http://{}/api/v1/report/<BUG>", addr);
    println!();
    println!("  Press Ctrl+C to stop");
    println!();

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
        println!("\n  Shutting down...");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Warnings go to stderr so the JSON on stdout stays clean
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Some(Commands::Serve { port }) = cli.command {
        return serve(&cli.engine, port).await;
    }

    let Some(bug) = cli.bug.clone() else {
        eprintln!("Usage: bug-review <BUG> [--repo PATH] [-o FILE]");
        eprintln!("       bug-review serve [--repo PATH] [--port PORT]");
        eprintln!();
        eprintln!("Examples:");
        eprintln!("  bug-review ABC-123                 # Report on stdout");
        eprintln!("  bug-review ABC-123 -o report.json  # Report to a file");
        std::process::exit(1);
    };

    // Every git query blocks; keep them off the async runtime
    tokio::task::spawn_blocking(move || write_report(&cli, &bug)).await?
}
