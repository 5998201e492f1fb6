//! Student Record Review Server
//!
//! Screens student record PDFs against the writing guidelines and offers
//! AI-suggested corrections for flagged records. One binary, three modes:
//!
//! - `serve` - REST API for a browser front end
//! - `check` - review PDF files on disk and print a report
//! - `correct` - print a suggested correction for one PDF
//!
//! ## REST endpoints
//!
//! - `GET /health`
//! - `GET /api/policy` - active allow-list and duplicate threshold
//! - `POST /api/review` - classify a batch of documents as clean or flagged
//! - `POST /api/correct` - request a corrected body for one document

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use clap::{Args, Parser, Subcommand};
use correction_client::{CorrectionConfig, GeminiClient, TextGenerator, DEFAULT_MODEL};
use review_engine::{ReviewEngine, ReviewPolicy};
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod api;
mod commands;
mod error;
mod report;
#[cfg(test)]
mod tests;

use api::{handle_correct, handle_health, handle_policy, handle_review};

/// Command-line arguments for the review server
#[derive(Parser, Debug)]
#[command(name = "review-server")]
#[command(about = "Student record review: guideline checks, duplicate detection, AI corrections")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// JSON file overriding the allow-list and duplicate threshold
    #[arg(long, global = true)]
    policy: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the REST API server
    Serve(ServeArgs),

    /// Review PDF files and print the results
    Check(commands::CheckArgs),

    /// Print a suggested correction for one PDF
    Correct(commands::CorrectArgs),
}

#[derive(Args, Debug)]
struct ServeArgs {
    /// Port to listen on
    #[arg(short, long, default_value = "3000")]
    port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Rate limit: requests per second per IP
    #[arg(long, default_value = "10")]
    rate_limit: u32,

    /// Maximum request body size in megabytes
    #[arg(long, default_value = "25")]
    max_body_mb: usize,

    #[command(flatten)]
    service: ServiceArgs,
}

/// Generative text service settings
#[derive(Args, Debug, Clone)]
pub struct ServiceArgs {
    /// API key for the generative text service
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Model used for corrections
    #[arg(long, env = "GEMINI_MODEL", default_value = DEFAULT_MODEL)]
    model: String,
}

impl ServiceArgs {
    pub fn correction_config(&self) -> CorrectionConfig {
        CorrectionConfig {
            api_key: self.api_key.clone(),
            model: self.model.clone(),
            ..CorrectionConfig::default()
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<ReviewEngine>,
    /// Server-side correction settings; a request may supply its own key
    pub correction: CorrectionConfig,
    pub generator: Arc<dyn TextGenerator + Send + Sync>,
}

/// Routes without the network-facing middleware
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handle_health))
        // API endpoints
        .route("/api/policy", get(handle_policy))
        .route("/api/review", post(handle_review))
        .route("/api/correct", post(handle_correct))
        .with_state(state)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let policy = load_policy(cli.policy.as_deref())?;
    let engine = ReviewEngine::with_policy(policy);

    match cli.command {
        Command::Serve(args) => {
            // The blocking client must outlive the runtime
            let generator = Arc::new(GeminiClient::new());
            let state = AppState {
                engine: Arc::new(engine),
                correction: args.service.correction_config(),
                generator: generator.clone(),
            };

            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(serve(args, state))
        }
        Command::Check(args) => commands::check(&engine, &args),
        Command::Correct(args) => commands::correct(&args),
    }
}

fn load_policy(path: Option<&std::path::Path>) -> anyhow::Result<ReviewPolicy> {
    let Some(path) = path else {
        return Ok(ReviewPolicy::default());
    };

    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read policy file {}", path.display()))?;
    let policy = ReviewPolicy::from_json(&json)
        .with_context(|| format!("Invalid policy file {}", path.display()))?;

    info!("Loaded review policy from {}", path.display());
    Ok(policy)
}

/// Request body limit in bytes, clamped instead of overflowing
fn body_limit_bytes(max_body_mb: usize) -> usize {
    max_body_mb.saturating_mul(1024 * 1024)
}

async fn serve(args: ServeArgs, state: AppState) -> anyhow::Result<()> {
    info!("Starting review server on {}:{}", args.host, args.port);

    if state.correction.credential().is_none() {
        info!("No GEMINI_API_KEY configured; corrections need a per-request api_key");
    }

    // Create rate limiter configuration
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(args.rate_limit.into())
            .burst_size(args.rate_limit * 2)
            .finish()
            .context("Failed to create rate limiter config")?,
    );

    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Apply middleware
    let app = build_router(state)
        .layer(DefaultBodyLimit::max(body_limit_bytes(args.max_body_mb)))
        .layer(GovernorLayer {
            config: governor_conf,
        })
        .layer(cors);

    // Start server
    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Server listening on http://{}", addr);
    info!("Rate limit: {} requests/second per IP", args.rate_limit);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
