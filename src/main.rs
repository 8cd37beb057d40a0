// Entrypoint for the shipper CLI.
// Logging goes to stderr, filtered by `SHIPPER_LOG` (default: warn).

use clap::Parser;
use tracing_subscriber::EnvFilter;

use shipper::cli::Cli;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("SHIPPER_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    cli.run()
}
