//! Delay fan-out batches.
//!
//! A delay batch spawns a fixed count of timed units concurrently, waits
//! for all of them, and returns the sampled delays sorted ascending. The
//! lifecycle is enforced at compile time via the typestate pattern: the
//! generic parameter of [`DelayBatch`] is the current state.

use serde::Serialize;
use tokio::task::JoinSet;

use crate::batch::{BatchId, BatchState, Idle};
use crate::delay;
use crate::error::{Result, VolleyError};

/// A delay fan-out batch, moving through `Idle -> Spawned -> Complete`.
///
/// The batch exclusively owns every unit it spawns; no unit outlives it.
///
/// # Example
/// ```ignore
/// let delays = DelayBatch::new(5, 3.0)?.spawn().drain().await?.into_results();
/// ```
#[derive(Debug)]
pub struct DelayBatch<S: BatchState> {
    /// The current state of the batch.
    pub state: S,
    /// The batch parameters.
    pub data: BatchData,
}

/// Immutable parameters of one delay batch.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct BatchData {
    /// Identifier used to correlate log events for this batch.
    pub id: BatchId,
    /// Number of units to spawn.
    pub count: usize,
    /// Upper bound, in seconds, on each unit's sampled delay.
    pub max_delay: f64,
}

/// All units are scheduled; none has been awaited yet.
#[derive(Debug)]
pub struct Spawned {
    tasks: JoinSet<Result<f64>>,
}

impl BatchState for Spawned {}

/// Every unit has completed and the results are assembled.
#[derive(Debug, Clone, Serialize)]
pub struct Complete {
    /// Sampled delays, sorted ascending.
    pub results: Vec<f64>,
}

impl BatchState for Complete {}

impl DelayBatch<Idle> {
    /// Create a batch of `count` units, each bounded by `max_delay` seconds.
    ///
    /// # Errors
    /// Returns `InvalidParameter` if `max_delay` is negative or non-finite.
    pub fn new(count: usize, max_delay: f64) -> Result<Self> {
        if !max_delay.is_finite() || max_delay < 0.0 {
            return Err(VolleyError::InvalidParameter(format!(
                "max_delay must be a non-negative finite number, got {max_delay}"
            )));
        }
        Ok(Self {
            state: Idle,
            data: BatchData {
                id: BatchId::new(),
                count,
                max_delay,
            },
        })
    }

    /// Schedule every unit on the runtime.
    ///
    /// All units are spawned before any is awaited. Spawning and awaiting
    /// sequentially would serialize the batch to `count * max_delay` wall
    /// time instead of roughly `max_delay`.
    pub fn spawn(self) -> DelayBatch<Spawned> {
        let mut tasks = JoinSet::new();
        for _ in 0..self.data.count {
            tasks.spawn(delay::wait_random(self.data.max_delay));
        }
        tracing::debug!(
            batch_id = %self.data.id,
            count = self.data.count,
            max_delay = self.data.max_delay,
            "Spawned delay batch"
        );
        DelayBatch {
            state: Spawned { tasks },
            data: self.data,
        }
    }
}

impl DelayBatch<Spawned> {
    /// Suspend until every unit has completed, then assemble the sorted
    /// results.
    ///
    /// Completion order is a race and deliberately unobservable here; the
    /// sort is the only mechanism imposing a deterministic output order.
    ///
    /// # Errors
    /// Fail-fast: the first unit error aborts the whole batch and no
    /// partial result is returned.
    pub async fn drain(self) -> Result<DelayBatch<Complete>> {
        let Spawned { mut tasks } = self.state;
        let mut results = Vec::with_capacity(self.data.count);
        while let Some(joined) = tasks.join_next().await {
            let sampled = joined.map_err(|e| {
                tracing::error!(batch_id = %self.data.id, error = %e, "Unit task panicked");
                VolleyError::Task(e.to_string())
            })??;
            results.push(sampled);
        }
        results.sort_by(f64::total_cmp);
        tracing::debug!(
            batch_id = %self.data.id,
            count = results.len(),
            "Delay batch complete"
        );
        Ok(DelayBatch {
            state: Complete { results },
            data: self.data,
        })
    }
}

impl DelayBatch<Complete> {
    /// Consume the batch, yielding the sorted delays.
    pub fn into_results(self) -> Vec<f64> {
        self.state.results
    }
}

/// Spawn `count` timed units bounded by `max_delay` seconds concurrently
/// and return their sampled delays sorted ascending.
///
/// `count == 0` returns an empty vec without suspending.
///
/// # Errors
/// Returns `InvalidParameter` for a negative or non-finite `max_delay`;
/// any unit failure aborts the batch with no partial result.
pub async fn fan_out(count: usize, max_delay: f64) -> Result<Vec<f64>> {
    let complete = DelayBatch::new(count, max_delay)?.spawn().drain().await?;
    Ok(complete.into_results())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_sorted_ascending(values: &[f64]) -> bool {
        values.windows(2).all(|w| w[0] <= w[1])
    }

    #[tokio::test(start_paused = true)]
    async fn test_fan_out_returns_count_sorted_delays_within_bounds() {
        let delays = fan_out(5, 3.0).await.unwrap();
        assert_eq!(delays.len(), 5);
        assert!(is_sorted_ascending(&delays));
        assert!(delays.iter().all(|d| (0.0..=3.0).contains(d)));
    }

    #[tokio::test]
    async fn test_fan_out_zero_count_returns_empty() {
        let delays = fan_out(0, 7.5).await.unwrap();
        assert!(delays.is_empty());
    }

    #[tokio::test]
    async fn test_fan_out_rejects_negative_max_delay() {
        let err = fan_out(3, -0.5).await.unwrap_err();
        assert!(matches!(err, VolleyError::InvalidParameter(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_fan_out_zero_max_delay_yields_zeros() {
        let delays = fan_out(4, 0.0).await.unwrap();
        assert_eq!(delays, vec![0.0; 4]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_batch_drain_sorts_and_preserves_count() {
        let batch = DelayBatch::new(8, 1.0).unwrap().spawn();
        let complete = batch.drain().await.unwrap();
        assert_eq!(complete.state.results.len(), complete.data.count);
        assert!(is_sorted_ascending(&complete.state.results));
    }
}
