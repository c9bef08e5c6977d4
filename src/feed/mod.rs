//! Market event sources
//!
//! The engine is indifferent to where snapshots come from; anything
//! implementing [`MarketFeed`] can drive it. [`spawn_feed`] pumps a feed into
//! a channel so the tick loop and the reader run as separate tasks.

mod jsonl;

pub use jsonl::JsonLinesFeed;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::common::errors::{EngineError, Result};
use crate::common::traits::MarketFeed;
use crate::common::types::FeedEvent;

/// Forward every event of `feed` to `sender` until the feed ends
///
/// Resolves to the number of events forwarded. The channel closes when the
/// task finishes.
pub fn spawn_feed<F>(mut feed: F, sender: mpsc::Sender<FeedEvent>) -> JoinHandle<Result<usize>>
where
    F: MarketFeed + 'static,
{
    tokio::spawn(async move {
        let mut forwarded = 0;
        loop {
            let event = match feed.next_event().await {
                Ok(Some(event)) => event,
                Ok(None) => break,
                Err(e) => {
                    error!(source = feed.source_name(), "Feed failed: {}", e);
                    return Err(e);
                }
            };
            sender
                .send(event)
                .await
                .map_err(|e| EngineError::ChannelSend(e.to_string()))?;
            forwarded += 1;
        }
        info!(source = feed.source_name(), forwarded, "Feed exhausted");
        Ok(forwarded)
    })
}
