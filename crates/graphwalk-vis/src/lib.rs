//! Graphwalk Visualization
//!
//! Step-by-step playback of recorded algorithm runs.
//!
//! # Architecture
//!
//! - **Playback**: Scrub through a step sequence, forwards or backwards
//! - **Projector**: Turn the selected step into node and edge styles
//! - **Driver**: Tokio task that fires the playback timer
//! - **Session**: Graph, last run and playback behind one lock
//! - **Server**: REST routes and a WebSocket streaming every step change
//!
//! # Usage
//!
//! ```ignore
//! let config = VisConfig::from_env()?;
//! let session = Session::new(config.load_graph()?, config.orientation(), config.speed_ms);
//!
//! let server = VisServer::new(session);
//! server.serve(config.addr).await?;
//! ```

mod config;
mod driver;
mod error;
mod playback;
mod projector;
mod server;
mod session;

pub use config::VisConfig;
pub use driver::{PlaybackDriver, Timed};
pub use error::{Error, Result};
pub use playback::{
    Callbacks, Playback, PlaybackListener, PlaybackState, PlaybackStatus, ScheduledAdvance,
    DEFAULT_SPEED_MS,
};
pub use projector::{
    EdgeStyle, GlobalState, NodeStyle, Palette, RenderState, Tier, VisualState, CYCLE, FOUND,
};
pub use server::VisServer;
pub use session::{Command, Direction, Projection, RunSummary, Session, SessionEvent};

#[cfg(test)]
mod tests {
    use super::*;
    use graphwalk_algorithms::{run, Algorithm, AlgorithmRequest};
    use graphwalk_graph::{parse_edge_list, NodeId, Orientation, SAMPLE_EDGE_LIST};

    /// Styles that differ from neutral, i.e. what is actually visible.
    fn visible(state: &VisualState) -> (Vec<(NodeId, NodeStyle)>, GlobalState) {
        let nodes = state
            .current_states()
            .nodes
            .iter()
            .filter(|(_, style)| **style != NodeStyle::NEUTRAL)
            .map(|(id, style)| (*id, *style))
            .collect();
        (nodes, state.global().clone())
    }

    #[test]
    fn replaying_backwards_matches_forwards() {
        let graph = parse_edge_list(SAMPLE_EDGE_LIST);
        let request = AlgorithmRequest::new(Algorithm::Bfs, Orientation::Undirected).start(NodeId(1));
        let steps = run(&graph, &request).steps;

        let mut visual = VisualState::for_graph(&graph);
        let mut frames = Vec::new();
        let mut playback = Playback::new(Callbacks::new(
            |step: Option<&graphwalk_algorithms::Step>, index, _| {
                visual.update_from_step(step, Algorithm::Bfs);
                frames.push((index, visible(&visual)));
            },
            || {},
        ));
        playback.load_steps(steps.clone());
        for _ in 0..steps.len() {
            playback.step_forward();
        }
        for _ in 0..steps.len() {
            playback.step_backward();
        }
        drop(playback);

        // -1, 0, .., n-1 going forwards, then n-2, .., -1 going back
        assert_eq!(frames.len(), 2 * steps.len() + 1);
        let (forward, backward) = frames.split_at(steps.len() + 1);
        for (index, picture) in backward {
            let (_, expected) = &forward[(*index + 1) as usize];
            assert_eq!(picture, expected, "index {}", index);
        }
    }

    #[test]
    fn session_drives_projection() {
        let mut session = Session::new(parse_edge_list("1 2\n2 3"), Orientation::Directed, 10);
        let request = AlgorithmRequest::new(Algorithm::Topological, Orientation::Directed);
        session.start_run(request).unwrap();

        let total = session.status().total_steps as isize;
        session.apply(Command::Jump { index: total - 1 });

        let global = session.visual().global();
        assert_eq!(global.highlighted_path, vec![NodeId(1), NodeId(2), NodeId(3)]);
        assert_eq!(session.visual().node_style(NodeId(2)).color, FOUND.fill);
    }
}
