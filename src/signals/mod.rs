//! Signal derivation from rolling per-instrument histories
//!
//! - [`RollingWindow`]: fixed-capacity, most-recent-first history
//! - [`MetricStore`]: oscillator, slope and volume windows per instrument
//! - [`slope`]: first difference and its EMA
//! - [`volume`]: trailing mean and the high-volume predicate

mod metric_store;
mod rolling_window;
pub mod slope;
pub mod volume;

pub use metric_store::{Channel, DerivedSignals, InstrumentMetrics, MetricStore};
pub use rolling_window::RollingWindow;
