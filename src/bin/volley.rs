//! Runs the reference measurements and prints the results.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use volley::stream::{DEFAULT_DEGREE, StreamConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let per_unit = volley::measure_average(5, 3.0).await?;
    println!("average per unit for fan_out(5, 3.0): {per_unit:?}");

    let total = volley::measure_stream_runtime(DEFAULT_DEGREE, StreamConfig::default()).await?;
    println!("total runtime for {DEFAULT_DEGREE} concurrent bounded streams: {total:?}");

    Ok(())
}
