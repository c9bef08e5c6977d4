//! Trait definitions for the external collaborators of the engine

use async_trait::async_trait;
use rust_decimal::Decimal;

use super::errors::Result;
use super::types::{FeedEvent, MarketSnapshot, OrderIntent};

/// Order placement collaborator
///
/// Submission is fire-and-forget: implementations must return promptly and
/// report settlement later through the fill handler.
#[cfg_attr(test, mockall::automock)]
pub trait OrderExecutor: Send + Sync {
    /// Submit an order intent
    fn submit(&self, intent: &OrderIntent) -> Result<()>;
}

/// Converts a target fraction of total portfolio value into an order quantity
#[cfg_attr(test, mockall::automock)]
pub trait OrderSizer: Send + Sync {
    /// Quantity to buy so that `target_fraction` of the portfolio is deployed
    ///
    /// # Arguments
    /// * `snapshot` - Current observation for the instrument
    /// * `target_fraction` - Cash to invest divided by total portfolio value
    fn order_quantity(&self, snapshot: &MarketSnapshot, target_fraction: Decimal) -> Decimal;
}

/// Downstream destination for narration messages
#[cfg_attr(test, mockall::automock)]
pub trait NarrationSink: Send + Sync {
    /// Emit a single message
    fn emit(&self, message: &str) -> Result<()>;
}

/// Source of market events (ticks and fills)
#[async_trait]
pub trait MarketFeed: Send {
    /// Next event, or `None` when the feed is exhausted
    async fn next_event(&mut self) -> Result<Option<FeedEvent>>;

    /// Human-readable name of the source
    fn source_name(&self) -> &str;
}
