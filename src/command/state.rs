// DawState - Everything an undoable command may touch
//
// The project graph plus the collaborators an edit has to notify: the
// processing-graph router, the UI event queue and the gate that keeps the
// audio thread out while the graph is restructured.

use crate::audio::gate::ProcessGate;
use crate::audio::router::{GraphRecalc, Router};
use crate::config::{ConfigError, EngineConfig, Settings};
use crate::messaging::channels::EventConsumer;
use crate::messaging::queue::EventQueue;
use crate::project::Project;
use crate::sequencer::transport::Transport;

/// Central state that commands modify
///
/// Owned by the control thread. The audio thread only ever shares the
/// `gate`; the UI only ever sees the consumer side of `events`.
pub struct DawState {
    pub project: Project,

    /// Processing-graph hook, notified after structural edits
    pub router: Box<dyn GraphRecalc>,

    /// Notifications for the UI thread
    pub events: EventQueue,

    /// Editor settings remembered between gestures
    pub settings: Settings,

    /// Held by the command manager while a command restructures the graph
    pub gate: ProcessGate,
}

impl DawState {
    pub fn new(project: Project, router: Box<dyn GraphRecalc>, events: EventQueue) -> Self {
        Self {
            project,
            router,
            events,
            settings: Settings::default(),
            gate: ProcessGate::new(),
        }
    }

    /// Builds an empty project from the engine configuration. Returns the UI
    /// side of the event queue along with the state.
    pub fn from_config(config: &EngineConfig) -> Result<(Self, EventConsumer), ConfigError> {
        config.validate()?;

        let mut transport = Transport::new(config.time_signature, config.tempo(), config.sample_rate);
        transport.update_total_bars(config.total_bars);

        let (mut events, consumer) = EventQueue::with_capacity(config.event_queue_capacity);
        events.set_export_mode(config.export_mode);

        let mut state = Self::new(Project::new(transport), Box::new(Router::new()), events);
        state.settings = config.settings;
        log::info!(
            "engine state ready ({} bars at {}, {})",
            state.project.transport.total_bars(),
            state.project.transport.tempo,
            state.project.transport.time_signature
        );
        Ok((state, consumer))
    }

    /// Ask the router to rebuild (or only refresh) the processing graph
    pub fn recalc_graph(&mut self, soft: bool) {
        self.router.recalc_graph(soft);
    }
}

impl std::fmt::Debug for DawState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DawState")
            .field("project", &self.project)
            .field("events", &self.events)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
