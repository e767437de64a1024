//! Thread-safe FIFO event bus on top of `crossbeam-channel`.
//!
//! The bus provides a simple publish/subscribe mechanism where:
//! - Any thread can publish events via `EventPublisher::publish()`
//! - The UI thread polls for events via `EventBus::drain()`, optionally
//!   woken by a callback that posts to its native event loop
//!
//! Events from one publisher are received in the order they were
//! published, each exactly once.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TryRecvError};

/// Called after every successful publish, on the publishing thread.
pub type Waker = Arc<dyn Fn() + Send + Sync>;

/// Multi-producer, single-consumer event bus.
///
/// # Example
///
/// ```
/// use rofreeze::events::EventBus;
///
/// let bus = EventBus::new();
/// let publisher = bus.publisher();
///
/// publisher.publish(7u32);
///
/// let events = bus.drain();
/// assert_eq!(events, vec![7]);
/// ```
pub struct EventBus<T> {
    sender: Sender<T>,
    receiver: Receiver<T>,
    waker: Option<Waker>,
}

impl<T> EventBus<T> {
    /// Create a new event bus.
    pub fn new() -> Self {
        let (sender, receiver) = crossbeam_channel::unbounded();
        Self {
            sender,
            receiver,
            waker: None,
        }
    }

    /// Create a bus whose publishers call `waker` after each publish.
    ///
    /// The waker runs on the publishing thread and must not block; posting a
    /// message to the UI thread is the intended use.
    pub fn with_waker(waker: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            waker: Some(Arc::new(waker)),
            ..Self::new()
        }
    }

    /// Get a publisher handle that can be cloned and sent to other threads.
    pub fn publisher(&self) -> EventPublisher<T> {
        EventPublisher {
            sender: self.sender.clone(),
            waker: self.waker.clone(),
        }
    }

    /// Try to receive the next event without blocking.
    pub fn try_recv(&self) -> Option<T> {
        match self.receiver.try_recv() {
            Ok(event) => Some(event),
            // The bus owns a sender, so Disconnected cannot happen here.
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Block up to `timeout` for the next event.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<T> {
        match self.receiver.recv_timeout(timeout) {
            Ok(event) => Some(event),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Drain all pending events into a Vec, oldest first.
    pub fn drain(&self) -> Vec<T> {
        self.receiver.try_iter().collect()
    }

    /// Point-in-time check for queued events.
    pub fn has_pending(&self) -> bool {
        !self.receiver.is_empty()
    }
}

impl<T> Default for EventBus<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for EventBus<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("pending", &self.receiver.len())
            .field("waker", &self.waker.is_some())
            .finish()
    }
}

/// A cloneable, thread-safe event publisher.
pub struct EventPublisher<T> {
    sender: Sender<T>,
    waker: Option<Waker>,
}

impl<T> EventPublisher<T> {
    /// Publish an event to the bus.
    ///
    /// Non-blocking. Returns false if the bus has been dropped (app shutting
    /// down), in which case the event is discarded.
    pub fn publish(&self, event: T) -> bool {
        if self.sender.send(event).is_err() {
            return false;
        }
        if let Some(waker) = &self.waker {
            waker();
        }
        true
    }
}

impl<T> Clone for EventPublisher<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            waker: self.waker.clone(),
        }
    }
}

impl<T> fmt::Debug for EventPublisher<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventPublisher")
            .field("waker", &self.waker.is_some())
            .finish()
    }
}
