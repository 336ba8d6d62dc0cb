//! Bounded value streams and the concurrent stream collector.
//!
//! A [`BoundedStream`] lazily produces a fixed number of random values,
//! waiting one quantum before each production. [`StreamBatch`] drains a
//! fixed number of independent streams concurrently, reusing the batch
//! lifecycle from [`crate::batch`].

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use futures::{Stream, StreamExt};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tokio::task::JoinSet;
use tokio::time::Sleep;

use crate::batch::{BatchId, BatchState, Idle};
use crate::error::{Result, VolleyError};

/// Fan-out degree used by the reference collector.
pub const DEFAULT_DEGREE: usize = 4;

/// Configuration for a bounded stream.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StreamConfig {
    /// Fixed wait between successive productions.
    pub quantum: Duration,
    /// Total number of values the stream produces before terminating.
    pub total_steps: usize,
    /// Values are drawn uniformly from `[0, upper_bound)`.
    pub upper_bound: f64,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            quantum: Duration::from_secs(1),
            total_steps: 10,
            upper_bound: 10.0,
        }
    }
}

impl StreamConfig {
    fn validate(&self) -> Result<()> {
        if self.quantum.is_zero() {
            return Err(VolleyError::InvalidParameter(
                "quantum must be a positive duration".to_string(),
            ));
        }
        if self.total_steps == 0 {
            return Err(VolleyError::InvalidParameter(
                "total_steps must be positive".to_string(),
            ));
        }
        if !self.upper_bound.is_finite() || self.upper_bound <= 0.0 {
            return Err(VolleyError::InvalidParameter(format!(
                "upper_bound must be a positive finite number, got {}",
                self.upper_bound
            )));
        }
        Ok(())
    }
}

/// A finite, forward-only, lazily produced sequence of random values.
///
/// Each production waits one quantum, then yields a value in
/// `[0, upper_bound)`. After `total_steps` productions the stream is
/// terminal: further polls yield `None` and it cannot be restarted; a
/// fresh instance must be constructed to repeat.
///
/// Consumption is pull-based. If the consumer never polls, no time
/// elapses and no values are produced.
#[derive(Debug)]
pub struct BoundedStream {
    quantum: Duration,
    upper_bound: f64,
    remaining: usize,
    delay: Option<Pin<Box<Sleep>>>,
}

impl BoundedStream {
    /// Create a stream from a validated configuration.
    ///
    /// # Errors
    /// Returns `InvalidParameter` for a zero quantum, zero step count, or
    /// non-positive upper bound.
    pub fn new(config: StreamConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_validated(config))
    }

    /// Infallible constructor for configs that have already been validated.
    fn from_validated(config: StreamConfig) -> Self {
        Self {
            quantum: config.quantum,
            upper_bound: config.upper_bound,
            remaining: config.total_steps,
            delay: None,
        }
    }

    /// Productions left before the stream terminates.
    pub fn remaining(&self) -> usize {
        self.remaining
    }
}

impl Stream for BoundedStream {
    type Item = f64;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<f64>> {
        let this = self.get_mut();
        if this.remaining == 0 {
            // Terminal state: exhausted streams stay exhausted.
            return Poll::Ready(None);
        }
        let quantum = this.quantum;
        let delay = this
            .delay
            .get_or_insert_with(|| Box::pin(tokio::time::sleep(quantum)));
        match delay.as_mut().poll(cx) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(()) => {
                this.delay = None;
                this.remaining -= 1;
                let value = rand::rng().random_range(0.0..this.upper_bound);
                tracing::trace!(value, remaining = this.remaining, "Stream produced value");
                Poll::Ready(Some(value))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

/// Construct a bounded stream with the reference upper bound of 10.
///
/// # Errors
/// Returns `InvalidParameter` for a zero quantum or zero step count.
pub fn bounded_stream(quantum: Duration, total_steps: usize) -> Result<BoundedStream> {
    BoundedStream::new(StreamConfig {
        quantum,
        total_steps,
        ..StreamConfig::default()
    })
}

/// A stream fan-out batch, moving through `Idle -> Spawned -> Complete`.
///
/// Owns `degree` independent bounded streams for the duration of one
/// collection; no stream is shared across batches or retained afterwards.
#[derive(Debug)]
pub struct StreamBatch<S: BatchState> {
    /// The current state of the batch.
    pub state: S,
    /// The batch parameters.
    pub data: StreamBatchData,
}

/// Immutable parameters of one stream batch.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct StreamBatchData {
    /// Identifier used to correlate log events for this batch.
    pub id: BatchId,
    /// Number of streams drained concurrently.
    pub degree: usize,
    /// Configuration applied to every stream in the batch.
    pub config: StreamConfig,
}

/// All streams are scheduled; none has been awaited yet.
#[derive(Debug)]
pub struct SpawnedStreams {
    tasks: JoinSet<(usize, Vec<f64>)>,
}

impl BatchState for SpawnedStreams {}

/// Every stream is exhausted and the per-stream results are assembled.
#[derive(Debug, Clone, Serialize)]
pub struct Collected {
    /// One inner vec per stream, each in production order, indexed by
    /// spawn order.
    pub per_stream: Vec<Vec<f64>>,
}

impl BatchState for Collected {}

impl StreamBatch<Idle> {
    /// Create a batch of `degree` streams sharing `config`.
    ///
    /// # Errors
    /// Returns `InvalidParameter` if `degree` is zero or the config is
    /// out of domain.
    pub fn new(degree: usize, config: StreamConfig) -> Result<Self> {
        if degree == 0 {
            return Err(VolleyError::InvalidParameter(
                "degree must be positive".to_string(),
            ));
        }
        config.validate()?;
        Ok(Self {
            state: Idle,
            data: StreamBatchData {
                id: BatchId::new(),
                degree,
                config,
            },
        })
    }

    /// Schedule every stream on the runtime, none awaited yet.
    ///
    /// While one stream is suspended on its quantum the others make
    /// progress, so draining the whole batch takes roughly
    /// `total_steps * quantum` of wall time rather than
    /// `degree * total_steps * quantum`.
    pub fn spawn(self) -> StreamBatch<SpawnedStreams> {
        let mut tasks = JoinSet::new();
        for index in 0..self.data.degree {
            let stream = BoundedStream::from_validated(self.data.config);
            tasks.spawn(async move { (index, stream.collect::<Vec<f64>>().await) });
        }
        tracing::debug!(
            batch_id = %self.data.id,
            degree = self.data.degree,
            total_steps = self.data.config.total_steps,
            "Spawned stream batch"
        );
        StreamBatch {
            state: SpawnedStreams { tasks },
            data: self.data,
        }
    }
}

impl StreamBatch<SpawnedStreams> {
    /// Suspend until every stream is exhausted, then assemble the
    /// per-stream results indexed by spawn order.
    ///
    /// # Errors
    /// Fail-fast: a panicked stream task aborts the whole batch and no
    /// partial result is returned.
    pub async fn drain(self) -> Result<StreamBatch<Collected>> {
        let SpawnedStreams { mut tasks } = self.state;
        let mut per_stream = vec![Vec::new(); self.data.degree];
        while let Some(joined) = tasks.join_next().await {
            let (index, values) = joined.map_err(|e| {
                tracing::error!(batch_id = %self.data.id, error = %e, "Stream task panicked");
                VolleyError::Task(e.to_string())
            })?;
            per_stream[index] = values;
        }
        tracing::debug!(
            batch_id = %self.data.id,
            degree = self.data.degree,
            "Stream batch complete"
        );
        Ok(StreamBatch {
            state: Collected { per_stream },
            data: self.data,
        })
    }
}

impl StreamBatch<Collected> {
    /// Consume the batch, yielding one vec of values per stream.
    pub fn into_results(self) -> Vec<Vec<f64>> {
        self.state.per_stream
    }
}

/// Drain `degree` independent bounded streams to exhaustion concurrently.
///
/// Returns one inner vec per stream, each in production order. The outer
/// vec is indexed by spawn order; completion order across streams is a
/// race and deliberately unobservable.
///
/// # Errors
/// Returns `InvalidParameter` if `degree` is zero or the config is out of
/// domain; any stream failure aborts the batch with no partial result.
pub async fn collect_streams(degree: usize, config: StreamConfig) -> Result<Vec<Vec<f64>>> {
    let collected = StreamBatch::new(degree, config)?.spawn().drain().await?;
    Ok(collected.into_results())
}
