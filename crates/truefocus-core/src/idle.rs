//! Idle detection.
//!
//! A background thread watches pointer-activity timestamps and raises
//! advisory signals when the user has been still for too long. Signals are
//! one-way: the receiver re-dispatches them onto the thread that owns the
//! timer state. This module never mutates engine or tracker state.
//!
//! The host feeds pointer positions via [`IdleDetector::notify_activity`]
//! (safe from any thread). The poll thread is cancelled by a checked flag,
//! never preempted.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, Sender};
use std::sync::{mpsc, Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::storage::Config;

/// Advisory signals posted toward the state-owning thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdleSignal {
    /// No pointer movement for the idle timeout. The host should prompt,
    /// and may auto-switch to the Slack clock after `prompt_timeout`.
    IdleDetected { prompt_timeout: Duration },
    /// Movement seen again after an idle period.
    ActivityResumed,
}

struct Shared {
    last_position: Option<(i32, i32)>,
    last_movement: Instant,
    /// Latched once per idle period so only one prompt is raised.
    idle_flagged: bool,
}

/// Detects when the user is idle and signals the host to switch clocks.
pub struct IdleDetector {
    idle_timeout: Duration,
    prompt_timeout: Duration,
    poll_interval: Duration,
    shared: Arc<Mutex<Shared>>,
    running: Arc<AtomicBool>,
    tx: Sender<IdleSignal>,
    worker: Option<JoinHandle<()>>,
}

impl IdleDetector {
    /// Create a detector and the receiving end of its signal channel.
    pub fn new(idle_timeout: Duration, prompt_timeout: Duration) -> (Self, Receiver<IdleSignal>) {
        let (tx, rx) = mpsc::channel();
        let detector = Self {
            idle_timeout,
            prompt_timeout,
            poll_interval: Duration::from_secs(1),
            shared: Arc::new(Mutex::new(Shared {
                last_position: None,
                last_movement: Instant::now(),
                idle_flagged: false,
            })),
            running: Arc::new(AtomicBool::new(false)),
            tx,
            worker: None,
        };
        (detector, rx)
    }

    pub fn from_config(config: &Config) -> (Self, Receiver<IdleSignal>) {
        Self::new(
            Duration::from_secs(config.idle.idle_timeout_secs),
            Duration::from_secs(config.idle.prompt_timeout_secs),
        )
    }

    /// Override the poll cadence (tests use a short interval).
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Start the background poll thread. No-op if already running.
    pub fn start(&mut self) {
        if self.running.swap(true, Ordering::SeqCst) {
            return;
        }
        if let Ok(mut shared) = self.shared.lock() {
            shared.last_movement = Instant::now();
            shared.idle_flagged = false;
        }

        let shared = Arc::clone(&self.shared);
        let running = Arc::clone(&self.running);
        let tx = self.tx.clone();
        let idle_timeout = self.idle_timeout;
        let prompt_timeout = self.prompt_timeout;
        let poll_interval = self.poll_interval;

        self.worker = Some(std::thread::spawn(move || {
            while running.load(Ordering::SeqCst) {
                std::thread::park_timeout(poll_interval);
                if !running.load(Ordering::SeqCst) {
                    break;
                }
                let mut shared = match shared.lock() {
                    Ok(guard) => guard,
                    Err(_) => break,
                };
                if shared.idle_flagged {
                    continue;
                }
                if shared.last_movement.elapsed() >= idle_timeout {
                    shared.idle_flagged = true;
                    debug!(?idle_timeout, "idle threshold reached");
                    if tx.send(IdleSignal::IdleDetected { prompt_timeout }).is_err() {
                        break; // Receiver gone; nothing left to signal.
                    }
                }
            }
        }));
    }

    /// Record pointer activity. Safe to call from any thread.
    ///
    /// Only an actual position change counts as movement.
    pub fn notify_activity(&self, x: i32, y: i32) {
        let Ok(mut shared) = self.shared.lock() else {
            return;
        };
        if shared.last_position == Some((x, y)) {
            return;
        }
        shared.last_position = Some((x, y));
        shared.last_movement = Instant::now();
        if shared.idle_flagged {
            shared.idle_flagged = false;
            let _ = self.tx.send(IdleSignal::ActivityResumed);
        }
    }

    /// Restart the idle window, e.g. after the host handled a prompt.
    pub fn reset(&self) {
        if let Ok(mut shared) = self.shared.lock() {
            shared.last_movement = Instant::now();
            shared.idle_flagged = false;
        }
    }

    /// Stop the poll thread and wait for it to exit.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(worker) = self.worker.take() {
            worker.thread().unpark();
            let _ = worker.join();
        }
    }
}

impl Drop for IdleDetector {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_detector(idle_ms: u64) -> (IdleDetector, Receiver<IdleSignal>) {
        let (detector, rx) = IdleDetector::new(
            Duration::from_millis(idle_ms),
            Duration::from_millis(500),
        );
        (
            detector.with_poll_interval(Duration::from_millis(5)),
            rx,
        )
    }

    #[test]
    fn signals_idle_once_per_period() {
        let (mut detector, rx) = fast_detector(20);
        detector.start();

        let signal = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert!(matches!(signal, IdleSignal::IdleDetected { .. }));

        // Latched: no second prompt while still idle.
        assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
        detector.stop();
    }

    #[test]
    fn movement_resumes_and_rearms() {
        let (mut detector, rx) = fast_detector(20);
        detector.start();
        assert!(matches!(
            rx.recv_timeout(Duration::from_secs(2)).unwrap(),
            IdleSignal::IdleDetected { .. }
        ));

        detector.notify_activity(10, 20);
        assert_eq!(
            rx.recv_timeout(Duration::from_secs(2)).unwrap(),
            IdleSignal::ActivityResumed
        );

        // Re-armed: the next idle period prompts again.
        assert!(matches!(
            rx.recv_timeout(Duration::from_secs(2)).unwrap(),
            IdleSignal::IdleDetected { .. }
        ));
        detector.stop();
    }

    #[test]
    fn unchanged_position_does_not_count_as_movement() {
        let (detector, rx) = fast_detector(10_000);
        detector.notify_activity(10, 20);
        detector.notify_activity(10, 20);
        // No idle signal expected and no resume signal either.
        assert!(rx.recv_timeout(Duration::from_millis(50)).is_err());
    }

    #[test]
    fn stop_joins_the_worker() {
        let (mut detector, _rx) = fast_detector(10_000);
        detector.start();
        detector.stop();
        assert!(detector.worker.is_none());
    }
}
