//! Channel type definitions for inter-task communication

use tokio::sync::mpsc;

use super::types::FeedEvent;

/// Bounded feed channel; a zero size is raised to one
pub fn create_feed_channel(size: usize) -> (mpsc::Sender<FeedEvent>, mpsc::Receiver<FeedEvent>) {
    mpsc::channel(size.max(1))
}
