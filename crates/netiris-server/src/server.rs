use anyhow::Result;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use netiris_core::{metrics, scenario, topology, FaultError, LayoutConfig, NodeId, Scenario, Topology};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tokio::sync::RwLock;

pub type SharedBackend = Arc<RwLock<Backend>>;

pub struct Backend {
    pub topo: Topology,
    pub last_update: DateTime<Utc>,
}

impl Backend {
    pub fn new(topo: Topology) -> Self {
        Self {
            topo,
            last_update: Utc::now(),
        }
    }

    pub fn touch(&mut self) {
        self.last_update = Utc::now();
    }

    /// Fault injection entry point shared by the HTTP handler and tests.
    /// `RESET` is handled by the caller (full regeneration); everything else
    /// goes through the scenario engine.
    pub fn inject(&mut self, scenario: Scenario, target: Option<&NodeId>) -> Result<(), FaultError> {
        let mut rng = StdRng::from_entropy();
        scenario::apply_targeted(&mut self.topo, scenario, target, &mut rng)?;
        self.touch();
        Ok(())
    }

    pub fn regenerate(&mut self) {
        let mut rng = StdRng::from_entropy();
        self.topo = topology::generate(
            self.topo.width,
            self.topo.height,
            &LayoutConfig::default(),
            &mut rng,
        );
        self.touch();
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaultRequest {
    #[serde(rename = "type")]
    pub fault_type: String,
    pub target_node_id: Option<String>,
}

pub async fn run(addr: &str, backend: SharedBackend) -> Result<()> {
    let app = router(backend);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "netiris-server listening");
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn router(backend: SharedBackend) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/api/network", get(get_network))
        .route("/api/metrics", get(get_metrics))
        .route("/api/alerts", get(get_alerts))
        .route("/api/node/:id", get(get_node))
        .route("/api/inject-fault", post(inject_fault))
        .with_state(backend)
}

fn ok(data: serde_json::Value) -> Json<serde_json::Value> {
    Json(json!({ "success": true, "data": data }))
}

fn err(status: StatusCode, message: &str) -> (StatusCode, Json<serde_json::Value>) {
    (
        status,
        Json(json!({ "success": false, "error": message })),
    )
}

async fn health() -> impl IntoResponse {
    Json(json!({
        "success": true,
        "message": "netiris backend",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": Utc::now(),
    }))
}

async fn get_network(State(backend): State<SharedBackend>) -> impl IntoResponse {
    let b = backend.read().await;
    let nodes: Vec<_> = b.topo.nodes.values().collect();
    let m = metrics::summarize(&b.topo);
    ok(json!({
        "nodes": nodes,
        "metrics": m,
        "lastUpdate": b.last_update,
    }))
}

async fn get_metrics(State(backend): State<SharedBackend>) -> impl IntoResponse {
    let b = backend.read().await;
    let m = metrics::summarize(&b.topo);
    ok(json!({ "metrics": m, "lastUpdate": b.last_update }))
}

async fn get_alerts(State(backend): State<SharedBackend>) -> impl IntoResponse {
    let b = backend.read().await;
    let m = metrics::summarize(&b.topo);
    ok(json!(m.alerts))
}

async fn get_node(
    State(backend): State<SharedBackend>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let b = backend.read().await;
    match b.topo.get(&NodeId(id)) {
        Some(node) => ok(json!(node)).into_response(),
        None => err(StatusCode::NOT_FOUND, "Node not found").into_response(),
    }
}

async fn inject_fault(
    State(backend): State<SharedBackend>,
    Json(req): Json<FaultRequest>,
) -> impl IntoResponse {
    if req.fault_type == "RESET" {
        backend.write().await.regenerate();
        tracing::info!("topology reset");
        return ok(json!({ "message": "Fault injection RESET completed" })).into_response();
    }

    let Some(scenario) = Scenario::parse(&req.fault_type) else {
        return err(StatusCode::BAD_REQUEST, "Invalid request format").into_response();
    };

    let target = req.target_node_id.map(NodeId);
    let mut b = backend.write().await;
    match b.inject(scenario, target.as_ref()) {
        Ok(()) => {
            tracing::info!(scenario = scenario.tag(), "fault injected");
            ok(json!({
                "message": format!("Fault injection {} completed", scenario.tag()),
                "timestamp": Utc::now(),
            }))
            .into_response()
        }
        Err(e @ FaultError::UnknownTarget(_)) => {
            err(StatusCode::NOT_FOUND, &e.to_string()).into_response()
        }
        Err(e) => err(StatusCode::BAD_REQUEST, &e.to_string()).into_response(),
    }
}
