// Event queue - Fire-and-forget notifications towards the UI thread
//
// The UI drains the consumer side at its own pace. A full queue drops the
// event; nothing on the control thread ever waits for the UI.

use crate::arranger::selections::SelectionsKind;
use crate::messaging::channels::{EventConsumer, EventProducer, create_event_channel};
use crate::messaging::event::{ArrangerEvent, EventKind};
use ringbuf::traits::Producer;

/// Default number of pending events
pub const DEFAULT_EVENT_QUEUE_CAPACITY: usize = 4000;

pub struct EventQueue {
    producer: EventProducer,
    /// While rendering/exporting nobody is drawing, so events are skipped
    export_mode: bool,
    dropped: usize,
}

impl EventQueue {
    pub fn new(producer: EventProducer) -> Self {
        Self {
            producer,
            export_mode: false,
            dropped: 0,
        }
    }

    /// Creates a queue and returns the UI-side consumer with it
    pub fn with_capacity(capacity: usize) -> (Self, EventConsumer) {
        let (producer, consumer) = create_event_channel(capacity);
        (Self::new(producer), consumer)
    }

    pub fn set_export_mode(&mut self, export_mode: bool) {
        self.export_mode = export_mode;
    }

    pub fn is_export_mode(&self) -> bool {
        self.export_mode
    }

    /// Queues an event. Returns false if it was skipped or dropped.
    pub fn push(&mut self, kind: EventKind, selections: SelectionsKind) -> bool {
        if self.export_mode {
            return false;
        }
        match self.producer.try_push(ArrangerEvent::new(kind, selections)) {
            Ok(()) => true,
            Err(event) => {
                self.dropped += 1;
                log::warn!("event queue full, dropping {:?}", event.kind);
                false
            }
        }
    }

    /// Number of events dropped because the queue was full
    pub fn dropped(&self) -> usize {
        self.dropped
    }
}

impl std::fmt::Debug for EventQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventQueue")
            .field("export_mode", &self.export_mode)
            .field("dropped", &self.dropped)
            .finish()
    }
}
