//! Rate-limited narration
//!
//! Decisions and fills produce human-readable messages. They are appended to
//! an unbounded [`NarrationQueue`] and emitted to a [`NarrationSink`] by a
//! [`NarrationWorker`], at most `max_per_drain` messages per
//! `min_interval_ms` window.
//!
//! [`NarrationSink`]: crate::common::traits::NarrationSink

mod queue;
mod sink;
mod worker;

pub use queue::{DrainOutcome, NarrationMessage, NarrationQueue};
pub use sink::TracingSink;
pub use worker::NarrationWorker;
