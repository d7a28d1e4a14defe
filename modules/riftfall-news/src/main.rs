use anyhow::Result;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use riftfall_common::Config;
use riftfall_news::daemon::{NewsDaemon, RunStats};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    let filter = log_filter()?;
    let json_logs = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    if json_logs {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    info!("Riftfall news daemon starting...");

    match run().await {
        Ok(stats) => {
            info!(appended = stats.appended, total = stats.total, "News daemon complete. {stats}");
            Ok(())
        }
        Err(e) => {
            error!(error = ?e, "Daemon run failed");
            std::process::exit(1);
        }
    }
}

/// `RUST_LOG` plus info level for the daemon and the three client crates.
fn log_filter() -> Result<EnvFilter> {
    let mut filter = EnvFilter::from_default_env();
    for target in ["riftfall", "github_client", "postgrest_client", "ai_client"] {
        filter = filter.add_directive(format!("{target}=info").parse()?);
    }
    Ok(filter)
}

async fn run() -> Result<RunStats> {
    // Missing required config aborts before any I/O.
    let config = Config::from_env()?;
    config.log_redacted();

    let daemon = NewsDaemon::from_config(&config)?;
    daemon.run().await
}
