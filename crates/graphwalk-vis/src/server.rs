//! Axum web server with WebSocket streaming for a playback session.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use graphwalk_algorithms::{connected_components, is_acyclic, Algorithm, AlgorithmRequest};
use graphwalk_graph::{parse_edge_list, to_edge_list, Edge, Graph, Node, NodeId, Orientation};
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, Notify, RwLock};
use tower_http::cors::CorsLayer;
use tracing::{debug, info, warn};

use crate::driver::PlaybackDriver;
use crate::error::{Error, Result};
use crate::playback::PlaybackStatus;
use crate::projector::RenderState;
use crate::session::{Command, Direction, RunSummary, Session};

/// Shared application state.
pub struct AppState {
    session: Arc<RwLock<Session>>,
    wake: Arc<Notify>,
}

impl AppState {
    /// Apply a playback command and let the driver re-read its timer.
    async fn command(&self, command: Command) -> PlaybackStatus {
        let status = self.session.write().await.apply(command);
        self.wake.notify_one();
        status
    }
}

/// Visualization server.
pub struct VisServer {
    state: Arc<AppState>,
}

impl VisServer {
    pub fn new(session: Session) -> Self {
        Self {
            state: Arc::new(AppState {
                session: Arc::new(RwLock::new(session)),
                wake: Arc::new(Notify::new()),
            }),
        }
    }

    /// Build the router for the server.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/api/status", get(status_handler))
            .route("/api/graph", get(graph_handler).post(set_graph_handler))
            .route("/api/run", post(run_handler))
            .route("/api/visual", get(visual_handler))
            .route("/api/playback", get(playback_status_handler))
            .route("/api/playback/play", post(play_handler))
            .route("/api/playback/pause", post(pause_handler))
            .route("/api/playback/stop", post(stop_handler))
            .route("/api/playback/step", post(step_handler))
            .route("/api/playback/jump", post(jump_handler))
            .route("/api/playback/speed", post(speed_handler))
            // WebSocket for real-time updates
            .route("/ws", get(ws_handler))
            .layer(CorsLayer::permissive())
            .with_state(self.state.clone())
    }

    /// Run the server on the given address until it fails.
    pub async fn serve(self, addr: std::net::SocketAddr) -> Result<()> {
        let driver = PlaybackDriver::spawn(
            Arc::clone(&self.state.session),
            Arc::clone(&self.state.wake),
        );

        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!("Visualization server running on http://{}", addr);
        let result = axum::serve(listener, self.router()).await;

        driver.shutdown();
        result.map_err(Error::from)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::Request(_) | Error::Graph(_) | Error::Config(_) => StatusCode::BAD_REQUEST,
            Error::Serialization(_) | Error::Socket(_) | Error::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        warn!(%status, error = %self, "request rejected");
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

/// Server status response.
#[derive(Serialize)]
struct StatusResponse {
    status: &'static str,
    node_count: usize,
    edge_count: usize,
    directed: bool,
    algorithm: Option<Algorithm>,
    total_steps: usize,
}

async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let session = state.session.read().await;
    Json(StatusResponse {
        status: "ok",
        node_count: session.graph().node_count(),
        edge_count: session.graph().edge_count(),
        directed: session.orientation().is_directed(),
        algorithm: session.last_run().map(|run| run.algorithm),
        total_steps: session.playback().total_steps(),
    })
}

#[derive(Serialize)]
struct GraphResponse {
    text: String,
    directed: bool,
    graph: Graph,
    /// Node groups under the session orientation, for component coloring
    components: Vec<Vec<NodeId>>,
    /// Whether a topological sort would succeed
    acyclic: bool,
}

impl GraphResponse {
    fn from_session(session: &Session) -> Self {
        let graph = session.graph();
        Self {
            text: to_edge_list(graph),
            directed: session.orientation().is_directed(),
            graph: graph.clone(),
            components: connected_components(graph, session.orientation()),
            acyclic: is_acyclic(graph),
        }
    }
}

async fn graph_handler(State(state): State<Arc<AppState>>) -> Json<GraphResponse> {
    let session = state.session.read().await;
    Json(GraphResponse::from_session(&session))
}

/// Either an edge list or explicit nodes (with positions) and edges.
#[derive(Deserialize)]
struct GraphRequest {
    #[serde(default)]
    text: String,
    #[serde(default)]
    nodes: Option<Vec<Node>>,
    #[serde(default)]
    edges: Vec<Edge>,
    #[serde(default)]
    directed: bool,
}

impl GraphRequest {
    fn into_graph(self) -> Result<Graph> {
        match self.nodes {
            Some(nodes) => Ok(Graph::new(nodes, self.edges)?),
            None => Ok(parse_edge_list(&self.text)),
        }
    }
}

async fn set_graph_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GraphRequest>,
) -> Result<Json<GraphResponse>> {
    let orientation = Orientation::from_directed(req.directed);
    let graph = req.into_graph()?;
    let mut session = state.session.write().await;
    session.set_graph(graph, orientation);
    state.wake.notify_one();
    Ok(Json(GraphResponse::from_session(&session)))
}

#[derive(Deserialize)]
struct RunRequest {
    algorithm: Algorithm,
    #[serde(default)]
    start: Option<NodeId>,
    #[serde(default)]
    end: Option<NodeId>,
    #[serde(default)]
    target: Option<NodeId>,
}

async fn run_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RunRequest>,
) -> Result<Json<RunSummary>> {
    let mut session = state.session.write().await;
    let request = AlgorithmRequest {
        algorithm: req.algorithm,
        orientation: session.orientation(),
        start: req.start,
        end: req.end,
        target: req.target,
    };
    let summary = session.start_run(request)?.clone();
    state.wake.notify_one();
    Ok(Json(summary))
}

async fn visual_handler(State(state): State<Arc<AppState>>) -> Response {
    let session = state.session.read().await;
    let render: RenderState<'_> = session.visual().current_states();
    Json(render).into_response()
}

async fn playback_status_handler(State(state): State<Arc<AppState>>) -> Json<PlaybackStatus> {
    let session = state.session.read().await;
    Json(session.status())
}

async fn play_handler(State(state): State<Arc<AppState>>) -> Json<PlaybackStatus> {
    Json(state.command(Command::Play).await)
}

async fn pause_handler(State(state): State<Arc<AppState>>) -> Json<PlaybackStatus> {
    Json(state.command(Command::Pause).await)
}

async fn stop_handler(State(state): State<Arc<AppState>>) -> Json<PlaybackStatus> {
    Json(state.command(Command::Stop).await)
}

#[derive(Deserialize)]
struct StepRequest {
    direction: Direction,
}

async fn step_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<StepRequest>,
) -> Json<PlaybackStatus> {
    Json(state.command(Command::Step { direction: req.direction }).await)
}

#[derive(Deserialize)]
struct JumpRequest {
    index: isize,
}

async fn jump_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<JumpRequest>,
) -> Json<PlaybackStatus> {
    Json(state.command(Command::Jump { index: req.index }).await)
}

#[derive(Deserialize)]
struct SpeedRequest {
    ms: u64,
}

async fn speed_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SpeedRequest>,
) -> Json<PlaybackStatus> {
    Json(state.command(Command::Speed { ms: req.ms }).await)
}

async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws(socket, state))
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Query {
    GetStatus,
    GetSnapshot,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WsCommand {
    Query(Query),
    Playback(Command),
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WsResponse {
    Status(PlaybackStatus),
}

async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
    info!("WebSocket client connected");

    // Subscribe before the snapshot so no change slips in between
    let (mut events, snapshot) = {
        let session = state.session.read().await;
        (session.subscribe(), session.snapshot())
    };

    if let Err(e) = send_json(&mut socket, &snapshot).await {
        warn!("Failed to send initial snapshot: {}", e);
        return;
    }

    loop {
        tokio::select! {
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let Ok(cmd) = serde_json::from_str::<WsCommand>(text.as_str()) else {
                            debug!("Ignoring WebSocket message: {}", text.as_str());
                            continue;
                        };
                        let sent = match cmd {
                            WsCommand::Query(Query::GetStatus) => {
                                let status = state.session.read().await.status();
                                send_json(&mut socket, &WsResponse::Status(status)).await
                            }
                            WsCommand::Query(Query::GetSnapshot) => {
                                let snapshot = state.session.read().await.snapshot();
                                send_json(&mut socket, &snapshot).await
                            }
                            WsCommand::Playback(command) => {
                                let status = state.command(command).await;
                                send_json(&mut socket, &WsResponse::Status(status)).await
                            }
                        };
                        if let Err(e) = sent {
                            warn!("Failed to send response: {}", e);
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        info!("WebSocket client disconnected");
                        break;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if let Err(e) = socket.send(Message::Pong(data)).await {
                            warn!("Failed to send pong: {}", e);
                            break;
                        }
                    }
                    Some(Err(e)) => {
                        warn!("WebSocket error: {}", e);
                        break;
                    }
                    _ => {}
                }
            }
            event = events.recv() => {
                match event {
                    Ok(event) => {
                        if let Err(e) = send_json(&mut socket, &event).await {
                            warn!("Failed to send event: {}", e);
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "WebSocket client lagging, resending snapshot");
                        let snapshot = state.session.read().await.snapshot();
                        if let Err(e) = send_json(&mut socket, &snapshot).await {
                            warn!("Failed to send snapshot: {}", e);
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }
}

async fn send_json<T: Serialize>(socket: &mut WebSocket, value: &T) -> Result<()> {
    let json = serde_json::to_string(value)?;
    socket.send(Message::Text(json.into())).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request};
    use graphwalk_graph::SAMPLE_EDGE_LIST;
    use serde_json::Value;
    use tower::ServiceExt;

    fn server() -> VisServer {
        let session = Session::new(parse_edge_list(SAMPLE_EDGE_LIST), Orientation::Undirected, 1000);
        VisServer::new(session)
    }

    async fn call(router: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn status_reports_graph() {
        let server = server();
        let (status, body) = call(server.router(), "GET", "/api/status", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["node_count"], 5);
        assert_eq!(body["edge_count"], 6);
        assert_eq!(body["directed"], false);
    }

    #[tokio::test]
    async fn run_then_step() {
        let server = server();
        let (status, body) = call(
            server.router(),
            "POST",
            "/api/run",
            Some(serde_json::json!({ "algorithm": "dijkstra", "start": 1, "end": 5 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["outcome"]["path"], serde_json::json!([1, 2, 5]));
        assert_eq!(body["outcome"]["distance"], 2.0);

        let (_, body) = call(
            server.router(),
            "POST",
            "/api/playback/step",
            Some(serde_json::json!({ "direction": "forward" })),
        )
        .await;
        assert_eq!(body["current_step"], 0);

        let (_, body) = call(server.router(), "GET", "/api/visual", None).await;
        assert_eq!(body["global"]["current_node"], 1);
        assert_eq!(body["nodes"]["1"]["color"], "#2196f3");
    }

    #[tokio::test]
    async fn invalid_run_is_bad_request() {
        let server = server();
        let (status, body) = call(
            server.router(),
            "POST",
            "/api/run",
            Some(serde_json::json!({ "algorithm": "dijkstra", "start": 1 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("end node"));
    }

    #[tokio::test]
    async fn replacing_graph_resets_playback() {
        let server = server();
        call(
            server.router(),
            "POST",
            "/api/run",
            Some(serde_json::json!({ "algorithm": "bfs", "start": 1 })),
        )
        .await;

        let (status, body) = call(
            server.router(),
            "POST",
            "/api/graph",
            Some(serde_json::json!({ "text": "1 2\n2 3", "directed": true })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["directed"], true);
        assert_eq!(body["text"], "1 2\n2 3\n");

        let (_, body) = call(server.router(), "GET", "/api/playback", None).await;
        assert_eq!(body["total_steps"], 0);
        assert_eq!(body["current_step"], -1);
    }

    #[tokio::test]
    async fn graph_reports_components_and_cycles() {
        let server = server();
        let (_, body) = call(
            server.router(),
            "POST",
            "/api/graph",
            Some(serde_json::json!({ "text": "1 2\n2 1\n3 4", "directed": true })),
        )
        .await;
        assert_eq!(body["components"], serde_json::json!([[1, 2], [3, 4]]));
        assert_eq!(body["acyclic"], false);

        let (_, body) = call(server.router(), "GET", "/api/graph", None).await;
        assert_eq!(body["graph"]["nodes"].as_array().map(Vec::len), Some(4));
    }

    #[tokio::test]
    async fn structured_graph_keeps_positions() {
        let server = server();
        let (status, body) = call(
            server.router(),
            "POST",
            "/api/graph",
            Some(serde_json::json!({
                "nodes": [{ "id": 1, "x": 10.0, "y": 20.0 }, { "id": 2 }],
                "edges": [{ "source": 1, "target": 2, "weight": 3.5 }],
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["text"], "1 2 3.5\n");
        assert_eq!(body["graph"]["nodes"][0]["x"], 10.0);
        assert_eq!(body["acyclic"], true);
    }

    #[tokio::test]
    async fn dangling_edge_is_bad_request() {
        let server = server();
        let (status, body) = call(
            server.router(),
            "POST",
            "/api/graph",
            Some(serde_json::json!({
                "nodes": [{ "id": 1 }],
                "edges": [{ "source": 1, "target": 9 }],
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("unknown node 9"));

        // The previous graph is untouched
        let (_, body) = call(server.router(), "GET", "/api/status", None).await;
        assert_eq!(body["node_count"], 5);
    }

    #[tokio::test]
    async fn out_of_range_jump_is_ignored() {
        let server = server();
        call(
            server.router(),
            "POST",
            "/api/run",
            Some(serde_json::json!({ "algorithm": "dfs", "start": 1 })),
        )
        .await;

        let (_, body) = call(
            server.router(),
            "POST",
            "/api/playback/jump",
            Some(serde_json::json!({ "index": 999 })),
        )
        .await;
        assert_eq!(body["current_step"], -1);

        let (_, body) = call(
            server.router(),
            "POST",
            "/api/playback/speed",
            Some(serde_json::json!({ "ms": 200 })),
        )
        .await;
        assert_eq!(body["speed_ms"], 200);
    }

    #[test]
    fn ws_commands_parse() {
        let cmd: WsCommand = serde_json::from_str(r#"{"type":"get_status"}"#).unwrap();
        assert!(matches!(cmd, WsCommand::Query(Query::GetStatus)));
        let cmd: WsCommand = serde_json::from_str(r#"{"type":"jump","index":3}"#).unwrap();
        assert!(matches!(cmd, WsCommand::Playback(Command::Jump { index: 3 })));
    }
}
