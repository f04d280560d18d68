// Sequencer module
// Musical time, transport bookkeeping and grid quantization

pub mod quantize;
pub mod timeline;
pub mod transport;

pub use quantize::QuantizeOptions;
pub use timeline::{Position, TICKS_PER_QUARTER, Tempo, TimeSignature};
pub use transport::Transport;
