use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::common::traits::NarrationSink;
use crate::config::types::NarrationConfig;

/// Diagnostic text waiting to be emitted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NarrationMessage {
    /// Enqueue order, starting at 0
    pub sequence: u64,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// Outcome of a single drain step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DrainOutcome {
    /// Messages handed to the sink successfully
    pub emitted: usize,
    /// Messages still pending afterwards
    pub remaining: usize,
    /// True when the minimum interval had not elapsed
    pub throttled: bool,
}

#[derive(Debug)]
struct QueueState {
    pending: VecDeque<NarrationMessage>,
    next_sequence: u64,
    last_emission: Instant,
    alarm_raised: bool,
}

/// Unbounded FIFO of narration with a throttled drain
///
/// Cloning shares the same queue. Producers never block beyond a short
/// critical section and never see the queue depth unless they ask. The sink
/// is called with the queue unlocked; concurrent drains are serialized on a
/// separate lock that producers never take.
#[derive(Debug, Clone)]
pub struct NarrationQueue {
    state: Arc<Mutex<QueueState>>,
    drain_gate: Arc<Mutex<()>>,
    max_per_drain: usize,
    min_interval: Duration,
    backlog_alarm_threshold: usize,
}

impl NarrationQueue {
    pub fn new(config: &NarrationConfig) -> Self {
        Self {
            state: Arc::new(Mutex::new(QueueState {
                pending: VecDeque::new(),
                next_sequence: 0,
                last_emission: Instant::now(),
                alarm_raised: false,
            })),
            drain_gate: Arc::new(Mutex::new(())),
            max_per_drain: config.max_per_drain,
            min_interval: Duration::from_millis(config.min_interval_ms),
            backlog_alarm_threshold: config.backlog_alarm_threshold,
        }
    }

    fn lock(&self) -> MutexGuard<'_, QueueState> {
        // A panic while holding the lock leaves the deque itself consistent
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Append a message
    pub fn push(&self, text: impl Into<String>) {
        let mut state = self.lock();
        let sequence = state.next_sequence;
        state.next_sequence += 1;
        state.pending.push_back(NarrationMessage {
            sequence,
            text: text.into(),
            created_at: Utc::now(),
        });

        let depth = state.pending.len();
        if !state.alarm_raised && depth >= self.backlog_alarm_threshold {
            state.alarm_raised = true;
            warn!(depth, threshold = self.backlog_alarm_threshold, "Narration backlog alarm raised");
        }
    }

    /// Pending message count
    pub fn depth(&self) -> usize {
        self.lock().pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().pending.is_empty()
    }

    /// Copy of the pending texts in emission order
    pub fn pending_texts(&self) -> Vec<String> {
        self.lock().pending.iter().map(|m| m.text.clone()).collect()
    }

    /// Drop every pending message, returning how many were dropped
    pub fn discard_pending(&self) -> usize {
        let mut state = self.lock();
        let dropped = state.pending.len();
        state.pending.clear();
        state.alarm_raised = false;
        dropped
    }

    /// Drain against the current clock
    pub fn drain(&self, sink: &dyn NarrationSink) -> DrainOutcome {
        self.drain_at(sink, Instant::now())
    }

    /// Emit up to `max_per_drain` messages if the minimum interval has
    /// elapsed since the last successful emission
    ///
    /// A message the sink rejects goes back to the front of the queue, along
    /// with the rest of its batch, and the step ends there.
    pub fn drain_at(&self, sink: &dyn NarrationSink, now: Instant) -> DrainOutcome {
        let _gate = self
            .drain_gate
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let batch: Vec<NarrationMessage> = {
            let mut state = self.lock();
            if now.saturating_duration_since(state.last_emission) < self.min_interval {
                return DrainOutcome {
                    emitted: 0,
                    remaining: state.pending.len(),
                    throttled: true,
                };
            }
            let take = self.max_per_drain.min(state.pending.len());
            state.pending.drain(..take).collect()
        };

        let mut emitted = 0;
        let mut batch = batch.into_iter();
        let mut rejected = None;
        for message in batch.by_ref() {
            match sink.emit(&message.text) {
                Ok(()) => emitted += 1,
                Err(e) => {
                    warn!(sequence = message.sequence, "Narration sink failed: {}", e);
                    rejected = Some(message);
                    break;
                }
            }
        }

        let mut state = self.lock();
        for message in rejected.into_iter().chain(batch).rev() {
            state.pending.push_front(message);
        }

        if emitted > 0 {
            state.last_emission = now;
        }

        let remaining = state.pending.len();
        if state.alarm_raised && remaining < self.backlog_alarm_threshold {
            state.alarm_raised = false;
            debug!(remaining, "Narration backlog alarm cleared");
        }

        DrainOutcome {
            emitted,
            remaining,
            throttled: false,
        }
    }
}
