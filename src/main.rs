//! docmatch - manual document-pair match annotation tool.
//!
//! Reads a CSV of candidate target/reference document pairs, shows each
//! pair side by side in an external editor, and records the operator's
//! yes/no judgments in an output CSV that survives interrupted sessions.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    // Load .env file if present (before anything else)
    let _ = dotenvy::dotenv();

    // Initialize logging based on verbosity
    let default_filter = if docmatch::cli::is_verbose() {
        "docmatch=info"
    } else {
        "docmatch=warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    docmatch::cli::run()
}
