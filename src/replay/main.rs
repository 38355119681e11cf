/**
 * Thread Replay Entry Point
 *
 * Replays a JSON-lines file of actions through the thread store driver and
 * prints every inconsistency report as one JSON line on stdout.
 */

use std::io::{BufRead, Write};

use threadsync::client::{LocalDatabase, ThreadStoreDriver};
use threadsync::shared::{Action, AppConfig};

/// Environment variable naming an optional TOML configuration file
const CONFIG_PATH_ENV: &str = "THREADSYNC_CONFIG";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&env_filter))
        .with_writer(std::io::stderr)
        .init();

    let Some(actions_path) = std::env::args().nth(1) else {
        eprintln!("Usage: thread-replay <actions.jsonl>");
        std::process::exit(2);
    };

    let config = match std::env::var(CONFIG_PATH_ENV) {
        Ok(path) if !path.is_empty() => AppConfig::load(&path)?,
        _ => AppConfig::from_env()?,
    };

    let db = LocalDatabase::open_with_config(&config).await?;
    let mut driver = ThreadStoreDriver::new(&config).with_database(db);
    let restored = driver.restore().await?.len();
    tracing::info!("Starting replay of {} with {} cached threads", actions_path, restored);

    let file = std::fs::File::open(&actions_path)?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let mut dispatched = 0usize;
    let mut reports = 0usize;

    for (index, line) in std::io::BufReader::new(file).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let action = match Action::from_json(&line) {
            Ok(action) => action,
            Err(e) => {
                tracing::warn!("Skipping line {}: {}", index + 1, e);
                continue;
            }
        };

        let result = driver.dispatch(&action).await?;
        dispatched += 1;
        tracing::info!(
            "{} ({}): {} operations, {} threads",
            action.action_type(),
            action.summary(),
            result.thread_store_operations.len(),
            result.thread_store.len()
        );
        for report in &result.new_thread_inconsistencies {
            serde_json::to_writer(&mut out, report)?;
            writeln!(out)?;
            reports += 1;
        }
    }

    tracing::info!(
        "Replayed {} actions: {} threads, {} inconsistency reports",
        dispatched,
        driver.store().len(),
        reports
    );
    Ok(())
}
