//! HTTP server binary for schematic2brd.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ConversionConfig` / `ServerConfig` and serves the router.

use anyhow::{Context, Result};
use clap::Parser;
use schematic2brd::server::{self, ServerConfig};
use schematic2brd::ConversionConfig;
use std::io;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Serve on 0.0.0.0:5000 with a pdfium library from the system path
  brd-server

  # Point at a downloaded pdfium build
  PDFIUM_LIB_PATH=/opt/pdfium/lib brd-server --port 8080

  # Convert a schematic
  curl -F file=@schematic.pdf http://localhost:5000/convert

RESPONSES:
  200  {"success": true, "brd_content": "Version 1.0\n..."}
  400  {"error": "No file uploaded" | "No file selected" | "Only PDF files are supported"}
  500  {"error": "<reason>"}
"#;

/// Serve PDF-schematic to BRD conversion over HTTP.
#[derive(Parser, Debug)]
#[command(
    name = "brd-server",
    version,
    about = "Serve PDF-schematic to BRD conversion over HTTP",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Address to bind.
    #[arg(long, env = "BRD_HOST", default_value = "0.0.0.0")]
    host: IpAddr,

    /// Port to bind.
    #[arg(short, long, env = "BRD_PORT", default_value_t = 5000)]
    port: u16,

    /// Rendering DPI (36–600). 72 renders one pixel per PDF point.
    #[arg(long, env = "BRD_DPI", default_value_t = 72,
          value_parser = clap::value_parser!(u32).range(36..=600))]
    dpi: u32,

    /// Per-document conversion budget in seconds (0 disables).
    #[arg(long, env = "BRD_TIMEOUT_SECS", default_value_t = 120)]
    timeout: u64,

    /// Largest accepted upload in MiB.
    #[arg(long, env = "BRD_MAX_UPLOAD_MB", default_value_t = 64)]
    max_upload_mb: usize,

    /// Directory containing libpdfium (or the library file itself).
    #[arg(long, env = "PDFIUM_LIB_PATH")]
    pdfium_lib: Option<PathBuf>,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "BRD_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "BRD_QUIET", conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let conversion = build_config(&cli)?;
    let server_config = ServerConfig {
        addr: SocketAddr::new(cli.host, cli.port),
        max_upload_bytes: cli.max_upload_mb.saturating_mul(1024 * 1024),
    };
    tracing::debug!(?conversion, ?server_config, "configuration");

    // ── Serve ────────────────────────────────────────────────────────────
    let listener = tokio::net::TcpListener::bind(server_config.addr)
        .await
        .with_context(|| format!("Failed to bind {}", server_config.addr))?;

    let router = server::app(conversion, server_config.max_upload_bytes);
    server::serve(listener, router, shutdown_signal())
        .await
        .context("Server failed")?;

    Ok(())
}

/// Map CLI args to `ConversionConfig`.
fn build_config(cli: &Cli) -> Result<ConversionConfig> {
    let mut builder = ConversionConfig::builder()
        .dpi(cli.dpi)
        .timeout_secs(cli.timeout);

    if let Some(ref path) = cli.pdfium_lib {
        builder = builder.pdfium_lib_path(path.clone());
    }

    builder.build().context("Invalid configuration")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
