// Communication channels lock-free

use crate::messaging::event::ArrangerEvent;
use ringbuf::{HeapRb, traits::Split};

pub type EventProducer = ringbuf::HeapProd<ArrangerEvent>;
pub type EventConsumer = ringbuf::HeapCons<ArrangerEvent>;

pub fn create_event_channel(capacity: usize) -> (EventProducer, EventConsumer) {
    let rb = HeapRb::<ArrangerEvent>::new(capacity);
    rb.split()
}
