//! Bounded concurrent delay fan-out and finite async stream fan-out.
//!
//! This crate coordinates many independently-suspending operations and
//! deterministically aggregates their results. A delay batch spawns a
//! fixed count of timed units, waits for all of them, and returns their
//! sampled delays sorted ascending; a stream batch drains a fixed number
//! of finite, lazily-produced value streams concurrently. Both batches
//! follow the same compile-time-enforced lifecycle
//! (`Idle -> Spawned -> Complete`) and are all-or-nothing: a failure in
//! any unit aborts the whole batch with no partial result.

pub mod batch;
pub mod delay;
pub mod error;
pub mod fanout;
pub mod fetch;
pub mod lookup;
pub mod measure;
pub mod stream;

// Re-export commonly used types
pub use batch::{BatchId, BatchState, Idle};
pub use delay::wait_random;
pub use error::{Result, VolleyError};
pub use fanout::{DelayBatch, fan_out};
pub use fetch::{Fetch, MockFetchClient, ReqwestFetchClient};
pub use lookup::{access_nested, repeat_elements, value_or_default};
pub use measure::{measure_average, measure_stream_runtime};
pub use stream::{BoundedStream, StreamBatch, StreamConfig, bounded_stream, collect_streams};
