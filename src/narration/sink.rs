use tracing::info;

use crate::common::errors::Result;
use crate::common::traits::NarrationSink;

/// Emits narration through `tracing` at info level
#[derive(Debug, Clone, Default)]
pub struct TracingSink;

impl NarrationSink for TracingSink {
    fn emit(&self, message: &str) -> Result<()> {
        info!(target: "narration", "{}", message);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test]
    fn test_tracing_sink_accepts_messages() {
        assert!(TracingSink.emit("Buying AAPL").is_ok());
    }
}
