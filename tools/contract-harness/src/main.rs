//! Contract harness: replays `contracts/http` fixtures against a running deployment.
//!
//! ```bash
//! cargo run -p contract-harness -- --base-url http://localhost:3120 --service signup
//! ```
//!
//! Exits 1 when any fixture fails.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use contract_harness::fixture;
use contract_harness::reporter::Reporter;
use contract_harness::runner::Runner;

#[derive(Parser)]
#[command(about = "Run HTTP contract assertions against a running deployment")]
struct Args {
    /// Base URL of the service, e.g. http://localhost:3120
    #[arg(long)]
    base_url: String,

    /// Only run fixtures for this service.
    #[arg(long)]
    service: Option<String>,

    /// Fixture directory; defaults to `contracts/http` in the workspace.
    #[arg(long)]
    contracts_dir: Option<PathBuf>,

    /// Per-request timeout in seconds.
    #[arg(long, default_value_t = 10)]
    timeout_secs: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    let args = Args::parse();
    let contracts_dir = args
        .contracts_dir
        .unwrap_or_else(|| workspace_root().join("contracts/http"));
    let fixtures = fixture::load_all(&contracts_dir, args.service.as_deref())?;
    if fixtures.is_empty() {
        eprintln!("No fixtures found in {}.", contracts_dir.display());
        return Ok(());
    }

    println!(
        "Running {} fixture(s) against {}\n",
        fixtures.len(),
        args.base_url
    );

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(args.timeout_secs))
        .build()
        .context("build http client")?;
    let runner = Runner::new(client, &args.base_url);
    let mut reporter = Reporter::default();
    for f in &fixtures {
        let result = runner.run(f).await;
        tracing::debug!(id = %f.id, status = ?result.actual_status, "fixture replayed");
        reporter.record(f, &result);
    }
    reporter.print_summary();

    if reporter.all_passed() {
        Ok(())
    } else {
        std::process::exit(1);
    }
}

/// Nearest ancestor of this crate holding a `contracts/` directory.
fn workspace_root() -> PathBuf {
    let start = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    start
        .ancestors()
        .find(|p| p.join("contracts").is_dir())
        .unwrap_or(&start)
        .to_path_buf()
}
