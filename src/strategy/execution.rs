use tracing::info;

use crate::common::errors::Result;
use crate::common::traits::OrderExecutor;
use crate::common::types::OrderIntent;

/// Executor that only logs intents, for dry runs and replays
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingExecutor;

impl OrderExecutor for LoggingExecutor {
    fn submit(&self, intent: &OrderIntent) -> Result<()> {
        info!(symbol = intent.symbol(), "Order intent: {}", intent);
        Ok(())
    }
}

/// Boxed executor for dynamic dispatch
pub type BoxedExecutor = Box<dyn OrderExecutor>;

/// Boxed order sizer for dynamic dispatch
pub type BoxedSizer = Box<dyn crate::common::traits::OrderSizer>;
