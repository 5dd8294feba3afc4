//! Graphwalk Visualization Server
//!
//! Load a graph and serve step-by-step algorithm playback.
//!
//! Usage: `graphwalk-vis [edge-list-file] [port]`

use graphwalk_vis::{Session, VisConfig, VisServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "graphwalk_algorithms=info,graphwalk_vis=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = VisConfig::from_env()?.with_args(std::env::args().skip(1))?;

    let graph = config.load_graph()?;
    tracing::info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        directed = config.directed,
        source = config
            .graph_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "sample".to_string()),
        "graph loaded"
    );

    let session = Session::new(graph, config.orientation(), config.speed_ms);
    let server = VisServer::new(session);
    server.serve(config.addr).await?;

    Ok(())
}
