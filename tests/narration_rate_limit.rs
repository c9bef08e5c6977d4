//! Rate limiting of the narration queue under a running worker
//!
//! Uses paused tokio time, so the 500ms windows are exact and the tests run
//! instantly.

use momentum_signals::config::types::NarrationConfig;
use momentum_signals::{NarrationQueue, NarrationSink, NarrationWorker};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

const FLUSH_LIMIT: Duration = Duration::from_secs(30);

#[derive(Default)]
struct TimedSink {
    emitted: Mutex<Vec<(Instant, String)>>,
}

impl TimedSink {
    fn emitted(&self) -> Vec<(Instant, String)> {
        self.emitted.lock().unwrap().clone()
    }
}

impl NarrationSink for TimedSink {
    fn emit(&self, message: &str) -> momentum_signals::Result<()> {
        self.emitted
            .lock()
            .unwrap()
            .push((Instant::now(), message.to_string()));
        Ok(())
    }
}

/// Sink that rejects every other call
#[derive(Default)]
struct FlakySink {
    calls: Mutex<usize>,
    accepted: Mutex<Vec<String>>,
}

impl NarrationSink for FlakySink {
    fn emit(&self, message: &str) -> momentum_signals::Result<()> {
        let mut calls = self.calls.lock().unwrap();
        *calls += 1;
        if *calls % 2 == 1 {
            return Err(momentum_signals::EngineError::Sink("busy".to_string()));
        }
        self.accepted.lock().unwrap().push(message.to_string());
        Ok(())
    }
}

#[tokio::test(start_paused = true)]
async fn test_burst_is_spread_over_windows_in_order() {
    let queue = NarrationQueue::new(&NarrationConfig::default());
    let sink = Arc::new(TimedSink::default());
    let worker = NarrationWorker::spawn(
        queue.clone(),
        sink.clone(),
        Duration::from_millis(50),
        FLUSH_LIMIT,
    );

    for i in 0..20 {
        queue.push(format!("decision {}", i));
    }
    tokio::time::sleep(Duration::from_millis(1_800)).await;

    // Windows closed at 500, 1000 and 1500ms, two messages each
    let emitted = sink.emitted();
    assert_eq!(emitted.len(), 6);
    assert_eq!(queue.depth(), 14);

    worker.shutdown().await.unwrap();

    let emitted = sink.emitted();
    let texts: Vec<String> = emitted.iter().map(|(_, t)| t.clone()).collect();
    let expected: Vec<String> = (0..20).map(|i| format!("decision {}", i)).collect();
    assert_eq!(texts, expected);

    for triple in emitted.windows(3) {
        assert!(triple[2].0 - triple[0].0 >= Duration::from_millis(500));
    }
}

#[tokio::test(start_paused = true)]
async fn test_producers_never_block_on_backlog() {
    let config = NarrationConfig {
        backlog_alarm_threshold: 10,
        ..NarrationConfig::default()
    };
    let queue = NarrationQueue::new(&config);

    let start = Instant::now();
    for i in 0..10_000 {
        queue.push(format!("burst {}", i));
    }
    assert_eq!(Instant::now(), start);
    assert_eq!(queue.depth(), 10_000);
}

#[tokio::test(start_paused = true)]
async fn test_flaky_sink_loses_nothing() {
    let queue = NarrationQueue::new(&NarrationConfig::default());
    let sink = Arc::new(FlakySink::default());
    let worker = NarrationWorker::spawn(
        queue.clone(),
        sink.clone(),
        Duration::from_millis(100),
        FLUSH_LIMIT,
    );

    for i in 0..4 {
        queue.push(format!("m{}", i));
    }
    worker.shutdown().await.unwrap();

    assert_eq!(
        *sink.accepted.lock().unwrap(),
        vec!["m0", "m1", "m2", "m3"]
    );
}
