// Messaging - Lock-free notifications from the control thread to the UI

pub mod channels;
pub mod event;
pub mod queue;

pub use channels::{EventConsumer, EventProducer, create_event_channel};
pub use event::{ArrangerEvent, EventKind};
pub use queue::{DEFAULT_EVENT_QUEUE_CAPACITY, EventQueue};
