//! One interactive session: a graph, the last run and its playback.
//!
//! Position changes are projected onto the [`VisualState`] inside the
//! playback listener and broadcast as [`SessionEvent`]s, so every
//! subscriber sees the same picture in the same order.

use graphwalk_algorithms::{Algorithm, AlgorithmRequest, Outcome, Step};
use graphwalk_graph::{Graph, NodeId, Orientation};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::driver::Timed;
use crate::error::Result;
use crate::playback::{Playback, PlaybackListener, PlaybackStatus, ScheduledAdvance};
use crate::projector::VisualState;

/// Buffered events per subscriber before it starts lagging.
const EVENT_CAPACITY: usize = 256;

/// Pushed to every subscriber.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// Playback moved; `step` is `None` at index `-1`
    Step {
        step: Option<Step>,
        index: isize,
        total: usize,
        visual: VisualState,
    },
    /// Playback reached the last step
    Complete { algorithm: Option<Algorithm> },
    /// The graph was replaced and any run discarded
    GraphChanged { nodes: usize, edges: usize },
    /// A new run was loaded into playback
    RunLoaded { run: RunSummary },
}

/// What is kept about the loaded run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub algorithm: Algorithm,
    pub start: Option<NodeId>,
    pub end: Option<NodeId>,
    pub target: Option<NodeId>,
    pub steps: usize,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Forward,
    Backward,
}

/// Playback command, shared by the REST routes and the WebSocket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    Play,
    Pause,
    Stop,
    Step { direction: Direction },
    Jump { index: isize },
    Speed { ms: u64 },
}

/// Playback listener that keeps the visual state in sync and fans out events.
pub struct Projection {
    algorithm: Option<Algorithm>,
    visual: VisualState,
    events: broadcast::Sender<SessionEvent>,
}

impl Projection {
    fn publish(&self, event: SessionEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }
}

impl PlaybackListener for Projection {
    fn step_changed(&mut self, step: Option<&Step>, index: isize, total: usize) {
        match self.algorithm {
            Some(algorithm) => self.visual.update_from_step(step, algorithm),
            None => self.visual.reset(),
        }
        self.publish(SessionEvent::Step {
            step: step.cloned(),
            index,
            total,
            visual: self.visual.clone(),
        });
    }

    fn completed(&mut self) {
        self.publish(SessionEvent::Complete { algorithm: self.algorithm });
    }
}

pub struct Session {
    graph: Graph,
    orientation: Orientation,
    last_run: Option<RunSummary>,
    playback: Playback<Projection>,
}

impl Session {
    pub fn new(graph: Graph, orientation: Orientation, speed_ms: u64) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let projection = Projection {
            algorithm: None,
            visual: VisualState::for_graph(&graph),
            events,
        };
        Self {
            graph,
            orientation,
            last_run: None,
            playback: Playback::new(projection).with_speed(speed_ms),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.playback.listener().events.subscribe()
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn last_run(&self) -> Option<&RunSummary> {
        self.last_run.as_ref()
    }

    pub fn visual(&self) -> &VisualState {
        &self.playback.listener().visual
    }

    pub fn playback(&self) -> &Playback<Projection> {
        &self.playback
    }

    pub fn status(&self) -> PlaybackStatus {
        self.playback.state()
    }

    /// Replace the graph. Discards the run and clears the visual state.
    pub fn set_graph(&mut self, graph: Graph, orientation: Orientation) {
        let projection = self.playback.listener_mut();
        projection.algorithm = None;
        projection.visual.set_graph(&graph);

        self.graph = graph;
        self.orientation = orientation;
        self.last_run = None;
        self.playback.load_steps(Vec::new());

        tracing::info!(
            nodes = self.graph.node_count(),
            edges = self.graph.edge_count(),
            directed = orientation.is_directed(),
            "graph replaced"
        );
        self.playback.listener().publish(SessionEvent::GraphChanged {
            nodes: self.graph.node_count(),
            edges: self.graph.edge_count(),
        });
    }

    /// Validate and run `request` against the current graph, then load the
    /// steps into playback. The request's orientation is ignored in favour of
    /// the session's.
    pub fn start_run(&mut self, request: AlgorithmRequest) -> Result<&RunSummary> {
        let request = AlgorithmRequest {
            orientation: self.orientation,
            ..request
        };
        let run = request.execute(&self.graph)?;

        let summary = RunSummary {
            algorithm: run.algorithm,
            start: request.start,
            end: request.end,
            target: request.target,
            steps: run.steps.len(),
            outcome: run.outcome,
        };
        tracing::info!(algorithm = %summary.algorithm, steps = summary.steps, "run loaded");

        let projection = self.playback.listener_mut();
        projection.algorithm = Some(run.algorithm);
        projection.visual.reset();
        self.playback.load_steps(run.steps);
        self.playback
            .listener()
            .publish(SessionEvent::RunLoaded { run: summary.clone() });

        Ok(self.last_run.insert(summary))
    }

    pub fn apply(&mut self, command: Command) -> PlaybackStatus {
        tracing::debug!(?command, "playback command");
        match command {
            Command::Play => self.playback.play(),
            Command::Pause => self.playback.pause(),
            Command::Stop => self.playback.stop(),
            Command::Step { direction: Direction::Forward } => self.playback.step_forward(),
            Command::Step { direction: Direction::Backward } => self.playback.step_backward(),
            Command::Jump { index } => self.playback.jump_to_step(index),
            Command::Speed { ms } => self.playback.set_speed(ms),
        }
        self.playback.state()
    }

    /// Event describing the current position, for late subscribers.
    pub fn snapshot(&self) -> SessionEvent {
        SessionEvent::Step {
            step: self.playback.current_step().cloned(),
            index: self.playback.index(),
            total: self.playback.total_steps(),
            visual: self.visual().clone(),
        }
    }
}

impl Timed for Session {
    fn scheduled(&self) -> Option<ScheduledAdvance> {
        self.playback.scheduled()
    }

    fn fire(&mut self, generation: u64) {
        self.playback.fire(generation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use graphwalk_graph::{parse_edge_list, SAMPLE_EDGE_LIST};

    fn session() -> Session {
        Session::new(parse_edge_list(SAMPLE_EDGE_LIST), Orientation::Undirected, 1000)
    }

    fn dijkstra_request() -> AlgorithmRequest {
        AlgorithmRequest::new(Algorithm::Dijkstra, Orientation::Directed)
            .start(NodeId(1))
            .end(NodeId(5))
    }

    #[test]
    fn run_loads_steps_at_start() {
        let mut session = session();
        let summary = session.start_run(dijkstra_request()).unwrap().clone();

        assert_eq!(summary.algorithm, Algorithm::Dijkstra);
        assert_eq!(session.status().current_step, -1);
        assert_eq!(session.status().total_steps, summary.steps);
        assert_eq!(session.visual(), &VisualState::for_graph(session.graph()));
    }

    #[test]
    fn run_uses_session_orientation() {
        let mut session = Session::new(parse_edge_list("2 1"), Orientation::Undirected, 1000);
        let request = AlgorithmRequest::new(Algorithm::Bfs, Orientation::Directed).start(NodeId(1));
        let summary = session.start_run(request).unwrap();
        assert_eq!(
            summary.outcome,
            Outcome::Traversal { path: vec![NodeId(1), NodeId(2)], found: true, target: None }
        );
    }

    #[test]
    fn invalid_run_is_rejected_and_keeps_previous() {
        let mut session = session();
        session.start_run(dijkstra_request()).unwrap();

        let bad = AlgorithmRequest::new(Algorithm::Dfs, Orientation::Directed).start(NodeId(42));
        let err = session.start_run(bad).unwrap_err();
        assert!(matches!(err, Error::Request(_)));
        assert_eq!(session.last_run().map(|r| r.algorithm), Some(Algorithm::Dijkstra));
    }

    #[test]
    fn commands_move_playback_and_project() {
        let mut session = session();
        session.start_run(dijkstra_request()).unwrap();

        let status = session.apply(Command::Step { direction: Direction::Forward });
        assert_eq!(status.current_step, 0);
        assert_eq!(session.visual().global().algorithm, Some(Algorithm::Dijkstra));
        assert_eq!(session.visual().global().current_node, Some(NodeId(1)));

        let status = session.apply(Command::Stop);
        assert_eq!(status.current_step, -1);
        assert_eq!(session.visual().global().algorithm, None);
    }

    #[test]
    fn events_are_broadcast_in_order() {
        let mut session = session();
        let mut events = session.subscribe();

        session.start_run(dijkstra_request()).unwrap();
        session.apply(Command::Jump { index: 0 });

        assert!(matches!(events.try_recv(), Ok(SessionEvent::Step { index: -1, .. })));
        assert!(matches!(events.try_recv(), Ok(SessionEvent::RunLoaded { .. })));
        assert!(matches!(events.try_recv(), Ok(SessionEvent::Step { index: 0, .. })));
    }

    #[test]
    fn completion_is_broadcast() {
        let mut session = session();
        session.start_run(dijkstra_request()).unwrap();
        let last = session.status().total_steps as isize - 1;
        let mut events = session.subscribe();

        session.apply(Command::Jump { index: last });

        assert!(matches!(events.try_recv(), Ok(SessionEvent::Step { .. })));
        assert!(matches!(
            events.try_recv(),
            Ok(SessionEvent::Complete { algorithm: Some(Algorithm::Dijkstra) })
        ));
    }

    #[test]
    fn graph_change_discards_run() {
        let mut session = session();
        session.start_run(dijkstra_request()).unwrap();
        session.apply(Command::Play);

        session.set_graph(parse_edge_list("7 8"), Orientation::Directed);

        assert!(session.last_run().is_none());
        assert_eq!(session.status().total_steps, 0);
        assert!(session.scheduled().is_none());
        assert!(session.orientation().is_directed());
    }

    #[test]
    fn command_json_shape() {
        let command: Command = serde_json::from_str(r#"{"type":"step","direction":"backward"}"#).unwrap();
        assert_eq!(command, Command::Step { direction: Direction::Backward });
        let command: Command = serde_json::from_str(r#"{"type":"jump","index":-1}"#).unwrap();
        assert_eq!(command, Command::Jump { index: -1 });
    }
}
