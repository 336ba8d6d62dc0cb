//! Wall-clock measurement around batch operations.
//!
//! Elapsed time is taken with the runtime's monotonic clock
//! (`tokio::time::Instant`), not wall-clock-of-day, so measurements are
//! immune to clock adjustments.

use std::time::Duration;

use tokio::time::Instant;

use crate::error::{Result, VolleyError};
use crate::fanout;
use crate::stream::{self, StreamConfig};

/// Run one delay fan-out batch and return the average wall-clock time
/// per unit.
///
/// # Errors
/// Returns `InvalidParameter` if `count` is zero (the average would
/// divide by zero) or `max_delay` is out of domain; batch failures
/// propagate unchanged.
pub async fn measure_average(count: usize, max_delay: f64) -> Result<Duration> {
    if count == 0 {
        return Err(VolleyError::InvalidParameter(
            "count must be positive to take a per-unit average".to_string(),
        ));
    }
    let start = Instant::now();
    fanout::fan_out(count, max_delay).await?;
    let elapsed = start.elapsed();
    tracing::debug!(count, max_delay, ?elapsed, "Measured delay fan-out batch");
    Ok(elapsed / count as u32)
}

/// Measure the total wall time of draining `degree` bounded streams
/// concurrently.
///
/// # Errors
/// Returns `InvalidParameter` if `degree` is zero or the config is out
/// of domain; batch failures propagate unchanged.
pub async fn measure_stream_runtime(degree: usize, config: StreamConfig) -> Result<Duration> {
    let start = Instant::now();
    stream::collect_streams(degree, config).await?;
    let elapsed = start.elapsed();
    tracing::debug!(degree, ?elapsed, "Measured stream fan-out batch");
    Ok(elapsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_measure_average_rejects_zero_count() {
        let err = measure_average(0, 1.0).await.unwrap_err();
        assert!(matches!(err, VolleyError::InvalidParameter(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_measure_average_is_nonnegative_and_bounded() {
        let average = measure_average(5, 3.0).await.unwrap();
        // The whole batch finishes within max_delay, so the per-unit
        // average cannot exceed max_delay / count.
        assert!(average <= Duration::from_secs_f64(3.0 / 5.0) + Duration::from_millis(5));
    }

    #[tokio::test]
    async fn test_measure_average_propagates_batch_failure() {
        let err = measure_average(3, -2.0).await.unwrap_err();
        assert!(matches!(err, VolleyError::InvalidParameter(_)));
    }
}
