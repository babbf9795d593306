//! OCSP Responder
//!
//! Serves pre-signed OCSP responses over HTTP (RFC 6960 Appendix A).
//!
//! # Architecture Overview
//!
//! ```text
//!                          ┌──────────────────────────────────────────────────┐
//!                          │                  OCSP RESPONDER                   │
//!                          │                                                   │
//!     OCSP Request         │  ┌─────────┐    ┌──────────────┐    ┌──────────┐ │
//!     ─────────────────────┼─▶│  http   │───▶│ FilterSource │───▶│ InMemory │ │
//!                          │  │ server  │    │  (admission) │    │  Source  │ │
//!                          │  └─────────┘    └──────┬───────┘    └────┬─────┘ │
//!                          │                        │                 │       │
//!     OCSP Response        │  ┌─────────┐    ┌──────▼───────┐         │       │
//!     ◀────────────────────┼──│response │◀───│ FilterSource │◀────────┘       │
//!                          │  │ headers │    │ (issuer check)│                │
//!                          │  └─────────┘    └──────────────┘                 │
//!                          │                                                   │
//!                          │  config · issuance · observability · lifecycle   │
//!                          └──────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use ocsp_responder::config::load_config;
use ocsp_responder::lifecycle;
use ocsp_responder::observability::logging::init_logging;

#[derive(Parser, Debug)]
#[command(name = "ocsp-responder", version, about = "Serve pre-signed OCSP responses")]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "ocsp-responder.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let config = match load_config(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load {}: {}", args.config.display(), e);
            return ExitCode::FAILURE;
        }
    };

    init_logging(&config.observability.log_level);

    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        responses_file = %config.source.responses_file.display(),
        "ocsp-responder v{} starting",
        env!("CARGO_PKG_VERSION")
    );

    match lifecycle::run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Fatal startup error");
            ExitCode::FAILURE
        }
    }
}
