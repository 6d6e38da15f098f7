use crate::constants::EVENT_DROPPED_EVENT_ID;
use crate::ProviderEventType;
use log::debug;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::{TryRecvError, TrySendError};

/// Notification emitted by a [`crate::InMemoryProvider`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderEvent {
    /// Type of the event.
    pub event_type: ProviderEventType,
    /// Name of the emitting provider.
    pub provider_name: String,
    /// Keys of the flags affected by the event, sorted.
    pub flags_changed: Vec<String>,
    /// Optional human readable description.
    pub message: Option<String>,
}

impl ProviderEvent {
    pub(crate) fn new(event_type: ProviderEventType, provider_name: &str) -> Self {
        Self {
            event_type,
            provider_name: provider_name.to_owned(),
            flags_changed: Vec::new(),
            message: None,
        }
    }

    pub(crate) fn flags_changed(mut self, flags_changed: Vec<String>) -> Self {
        self.flags_changed = flags_changed;
        self
    }

    pub(crate) fn message(mut self, message: &str) -> Self {
        self.message = Some(message.to_owned());
        self
    }
}

pub(crate) enum EventSender {
    Bounded(mpsc::Sender<ProviderEvent>),
    Unbounded(mpsc::UnboundedSender<ProviderEvent>),
}

impl EventSender {
    /// Enqueues `event`, waiting for capacity on a bounded queue.
    ///
    /// Events are dropped once the receiver is gone.
    pub(crate) async fn send(&self, event: ProviderEvent) {
        let event_type = event.event_type;
        let delivered = match self {
            EventSender::Bounded(tx) => tx.send(event).await.is_ok(),
            EventSender::Unbounded(tx) => tx.send(event).is_ok(),
        };
        if !delivered {
            debug!(event_id = EVENT_DROPPED_EVENT_ID; "Event receiver is closed, '{event_type}' event dropped.");
        }
    }

    /// Enqueues `event` without waiting. A full bounded queue drops it.
    pub(crate) fn try_send(&self, event: ProviderEvent) {
        let event_type = event.event_type;
        let result = match self {
            EventSender::Bounded(tx) => tx.try_send(event),
            EventSender::Unbounded(tx) => tx.send(event).map_err(|err| TrySendError::Closed(err.0)),
        };
        match result {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                debug!(event_id = EVENT_DROPPED_EVENT_ID; "Event queue is full, '{event_type}' event dropped.");
            }
            Err(TrySendError::Closed(_)) => {
                debug!(event_id = EVENT_DROPPED_EVENT_ID; "Event receiver is closed, '{event_type}' event dropped.");
            }
        }
    }
}

/// Receiving half of a provider's event queue.
///
/// Events arrive in the order the provider emitted them.
pub struct EventReceiver {
    inner: ReceiverInner,
}

enum ReceiverInner {
    Bounded(mpsc::Receiver<ProviderEvent>),
    Unbounded(mpsc::UnboundedReceiver<ProviderEvent>),
}

impl EventReceiver {
    /// Waits for the next event. Returns [`None`] once the provider is dropped
    /// and every queued event has been received.
    pub async fn recv(&mut self) -> Option<ProviderEvent> {
        match &mut self.inner {
            ReceiverInner::Bounded(rx) => rx.recv().await,
            ReceiverInner::Unbounded(rx) => rx.recv().await,
        }
    }

    /// Returns the next event if one is queued, without waiting.
    pub fn try_recv(&mut self) -> Option<ProviderEvent> {
        let result = match &mut self.inner {
            ReceiverInner::Bounded(rx) => rx.try_recv(),
            ReceiverInner::Unbounded(rx) => rx.try_recv(),
        };
        match result {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }
}

/// Creates an event queue. `capacity` bounds it, [`None`] leaves it unbounded.
pub(crate) fn channel(capacity: Option<usize>) -> (EventSender, EventReceiver) {
    match capacity {
        Some(size) => {
            let (tx, rx) = mpsc::channel(size.max(1));
            (
                EventSender::Bounded(tx),
                EventReceiver {
                    inner: ReceiverInner::Bounded(rx),
                },
            )
        }
        None => {
            let (tx, rx) = mpsc::unbounded_channel();
            (
                EventSender::Unbounded(tx),
                EventReceiver {
                    inner: ReceiverInner::Unbounded(rx),
                },
            )
        }
    }
}
