// Router - Hook into the signal routing graph
//
// The arranger never builds the processing graph itself. After structural
// edits it asks the router to recompute the processing order; a soft
// recalculation only refreshes cached automation/port state.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Something that can rebuild the real-time processing order
pub trait GraphRecalc: Send {
    /// Rebuild the graph. `soft` skips reallocating nodes and only refreshes
    /// cached values.
    fn recalc_graph(&mut self, soft: bool);
}

/// Router that records recalculation requests
///
/// Stands in for the processing graph when the engine runs without an audio
/// backend (offline rendering, tests). Clones share their counters, so a
/// clone kept outside the engine observes requests made through the engine.
#[derive(Debug, Default, Clone)]
pub struct Router {
    hard_recalcs: Arc<AtomicUsize>,
    soft_recalcs: Arc<AtomicUsize>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of full graph rebuilds requested
    pub fn hard_recalcs(&self) -> usize {
        self.hard_recalcs.load(Ordering::Relaxed)
    }

    /// Number of soft refreshes requested
    pub fn soft_recalcs(&self) -> usize {
        self.soft_recalcs.load(Ordering::Relaxed)
    }
}

impl GraphRecalc for Router {
    fn recalc_graph(&mut self, soft: bool) {
        if soft {
            self.soft_recalcs.fetch_add(1, Ordering::Relaxed);
        } else {
            self.hard_recalcs.fetch_add(1, Ordering::Relaxed);
        }
        log::trace!("graph recalculated (soft: {})", soft);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_router_counts_requests() {
        let mut router = Router::new();
        router.recalc_graph(false);
        router.recalc_graph(true);
        router.recalc_graph(true);
        assert_eq!(router.hard_recalcs(), 1);
        assert_eq!(router.soft_recalcs(), 2);
    }

    #[test]
    fn test_clones_share_counters() {
        let observer = Router::new();
        let mut boxed: Box<dyn GraphRecalc> = Box::new(observer.clone());
        boxed.recalc_graph(false);
        assert_eq!(observer.hard_recalcs(), 1);
    }
}
