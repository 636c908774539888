//! Beadboard CLI binary.

use anyhow::Result;
use beadboard::cli::Cli;
use tracing_subscriber::EnvFilter;

/// Main entry point for the beadboard CLI.
///
/// The remote loader probes repositories concurrently on a single thread,
/// so the current-thread runtime is enough.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Logs go to stderr so `--json` output on stdout stays parseable.
    // Example: RUST_LOG=beadboard=debug,beadboard_jsonl=trace beadboard --root ~/code repos
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("beadboard=info,beadboard_jsonl=info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("Starting beadboard CLI");

    let cli = Cli::parse_args();
    cli.execute().await?;

    tracing::debug!("Beadboard CLI completed successfully");
    Ok(())
}
