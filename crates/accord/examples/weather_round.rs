//! Reconcile a simulated weather feed across five executor slots.
//!
//! Run with: `cargo run --example weather_round`

use std::sync::Arc;

use accord::prelude::*;
use async_trait::async_trait;

/// Stand-in for a scraped temperature feed: each slot sees a slightly
/// different reading, the way independent fetches of a live page would.
struct TemperatureFeed;

#[async_trait]
impl Producer for TemperatureFeed {
    async fn produce(&self, slot: usize) -> std::result::Result<Output, ProduceError> {
        let jitter = [0.0, 0.2, -0.1, 0.3, 0.1][slot % 5];
        Ok(Output::Number(21.4 + jitter))
    }
}

#[tokio::main]
async fn main() -> accord::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("accord=debug")),
        )
        .init();

    let engine = Engine::new(MemoryStore::new());
    let fingerprint = Fingerprint::new("weather:amsterdam")?;

    let result = engine
        .evaluate(
            &fingerprint,
            Arc::new(TemperatureFeed),
            ComparatorSpec::numeric_tolerance(0.05)?,
        )
        .await?;

    println!(
        "round status: {:?}, committed: {}",
        result.outcome.status, result.committed
    );

    let reading = engine
        .read_or(&fingerprint, Output::Text("no reading".to_string()))
        .await?;
    println!("stored reading: {reading}");

    Ok(())
}
