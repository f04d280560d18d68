// Module audio - Seams between the arranger and the real-time side
//
// gate:   pause the audio thread while the project graph is restructured
// router: processing-graph recalculation hook
// pool:   audio clips referenced by audio regions

pub mod gate;
pub mod pool;
pub mod router;

pub use gate::ProcessGate;
pub use pool::{AudioClip, AudioPool, ClipId};
pub use router::{GraphRecalc, Router};
