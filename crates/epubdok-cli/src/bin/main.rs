//! epubdok CLI binary entry point
//!
//! Sets up logging, then hands over to the library's `run_cli()` function.

use anyhow::Result;
use epubdok_cli::run_cli;

fn main() -> Result<()> {
    // Logs go to stderr so `--format json` output on stdout stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    run_cli()
}
