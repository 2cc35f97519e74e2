// Multi-producer event queue paired with a level-triggered wake signal

use crossbeam_queue::SegQueue;
use parking_lot::{Condvar, Mutex};

use super::LogEvent;

#[derive(Debug, Default)]
struct WakeState {
    armed: bool,
    stop: bool,
}

/// Unbounded FIFO of [`LogEvent`]s with a wake signal for the single consumer.
///
/// Producers push lock-free and then arm the signal. The consumer blocks in
/// [`wait`](EventQueue::wait) until the signal is armed, drains, and calls
/// [`settle`](EventQueue::settle), which disarms only when the queue is empty
/// under the signal lock. A push racing with `settle` therefore either lands
/// before the emptiness check (signal stays armed) or re-arms it afterwards.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: SegQueue<LogEvent>,
    state: Mutex<WakeState>,
    wake: Condvar,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event and wake the consumer. Never blocks on the consumer.
    pub fn push(&self, event: LogEvent) {
        self.events.push(event);
        self.notify();
    }

    /// Pop the oldest event. Only the writer thread calls this.
    pub fn pop(&self) -> Option<LogEvent> {
        self.events.pop()
    }

    /// Number of queued events, filtered or not.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Arm the signal without enqueuing anything.
    pub fn notify(&self) {
        let mut state = self.state.lock();
        state.armed = true;
        self.wake.notify_one();
    }

    /// Arm the signal and mark the consumer for shutdown.
    pub fn request_stop(&self) {
        let mut state = self.state.lock();
        state.stop = true;
        state.armed = true;
        self.wake.notify_one();
    }

    /// Block until the signal is armed. Returns true once a stop was requested.
    pub fn wait(&self) -> bool {
        let mut state = self.state.lock();
        while !state.armed {
            self.wake.wait(&mut state);
        }
        state.stop
    }

    /// Disarm the signal if there is nothing left to drain.
    ///
    /// Returns false when the signal stays armed, either because events
    /// arrived since the last drain or because a stop is pending.
    pub fn settle(&self) -> bool {
        let mut state = self.state.lock();
        if state.stop || !self.events.is_empty() {
            return false;
        }
        state.armed = false;
        true
    }

    pub fn is_armed(&self) -> bool {
        self.state.lock().armed
    }
}
