//! The atomic suspension primitive all batching builds on.

use std::time::Duration;

use rand::Rng;

use crate::error::{Result, VolleyError};

/// Sample a delay uniformly from `[0, max_delay]` seconds, suspend for
/// that long, and return the sampled value.
///
/// The only side effect is time passage; the unit shares no state with
/// any other unit.
///
/// # Errors
/// Returns `InvalidParameter` if `max_delay` is negative or non-finite.
pub async fn wait_random(max_delay: f64) -> Result<f64> {
    let delay = sample_delay(max_delay)?;
    tokio::time::sleep(Duration::from_secs_f64(delay)).await;
    Ok(delay)
}

/// Draw a uniform sample from `[0, max_delay]` without suspending.
pub(crate) fn sample_delay(max_delay: f64) -> Result<f64> {
    if !max_delay.is_finite() || max_delay < 0.0 {
        return Err(VolleyError::InvalidParameter(format!(
            "max_delay must be a non-negative finite number, got {max_delay}"
        )));
    }
    let delay = rand::rng().random_range(0.0..=max_delay);
    tracing::trace!(max_delay, delay, "Sampled unit delay");
    Ok(delay)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_delay_stays_within_bounds() {
        for _ in 0..1000 {
            let delay = sample_delay(3.0).unwrap();
            assert!((0.0..=3.0).contains(&delay));
        }
    }

    #[test]
    fn test_sample_delay_zero_bound_is_zero() {
        assert_eq!(sample_delay(0.0).unwrap(), 0.0);
    }

    #[test]
    fn test_sample_delay_rejects_negative_bound() {
        let err = sample_delay(-1.0).unwrap_err();
        assert!(matches!(err, VolleyError::InvalidParameter(_)));
    }

    #[test]
    fn test_sample_delay_rejects_nan_bound() {
        let err = sample_delay(f64::NAN).unwrap_err();
        assert!(matches!(err, VolleyError::InvalidParameter(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_random_returns_the_slept_delay() {
        let start = tokio::time::Instant::now();
        let delay = wait_random(2.0).await.unwrap();
        let elapsed = start.elapsed().as_secs_f64();
        assert!((0.0..=2.0).contains(&delay));
        // Paused time advances by the sampled sleep, rounded up to the
        // timer's millisecond granularity.
        assert!(elapsed >= delay - 1e-6);
        assert!(elapsed - delay < 2e-3);
    }
}
