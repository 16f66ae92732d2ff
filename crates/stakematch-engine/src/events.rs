//! Notification delivery.

use parking_lot::Mutex;
use stakematch_types::GameEvent;

/// Receives every committed [`GameEvent`], in commit order.
///
/// Called after the operation's state and funds are final and outside the
/// engine's store lock. A sink must not call back into the engine.
pub trait EventSink {
    fn emit(&self, event: &GameEvent);
}

impl<S: EventSink + ?Sized> EventSink for &S {
    fn emit(&self, event: &GameEvent) {
        (**self).emit(event);
    }
}

impl<S: EventSink + ?Sized> EventSink for std::sync::Arc<S> {
    fn emit(&self, event: &GameEvent) {
        (**self).emit(event);
    }
}

/// Discards events.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl EventSink for NoopSink {
    fn emit(&self, _event: &GameEvent) {}
}

/// Keeps every event in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<GameEvent>>,
}

impl RecordingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything recorded so far.
    #[must_use]
    pub fn events(&self) -> Vec<GameEvent> {
        self.events.lock().clone()
    }

    /// Drain the recorded events.
    pub fn take(&self) -> Vec<GameEvent> {
        std::mem::take(&mut *self.events.lock())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: &GameEvent) {
        self.events.lock().push(event.clone());
    }
}
