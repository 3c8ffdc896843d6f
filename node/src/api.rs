//! # REST + WebSocket API
//!
//! Builds the axum router that exposes the simulator over HTTP. Every
//! endpoint maps onto one [`LedgerSimulator`] mutator or accessor; handlers
//! take the lock, do their work synchronously and release it before
//! responding.
//!
//! ## Endpoints
//!
//! | Method | Path                   | Description                              |
//! |--------|------------------------|------------------------------------------|
//! | GET    | `/health`              | Liveness probe                           |
//! | GET    | `/status`              | Simulation summary                       |
//! | GET    | `/chain`               | Active participant's chain               |
//! | GET    | `/participants`        | Participant list with statuses           |
//! | POST   | `/participants/active` | Switch the active participant            |
//! | POST   | `/transactions`        | Submit and broadcast a transaction       |
//! | POST   | `/chain/edit`          | Edit a transaction field on active chain |
//! | POST   | `/verify`              | Verify the active chain                  |
//! | POST   | `/consensus`           | Evaluate consensus across participants   |
//! | GET    | `/ws`                  | WebSocket for live simulation events     |

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use ledgerlab_protocol::config::PRIMARY_HASH_FUNCTION;
use ledgerlab_protocol::network::{ConsensusReport, ParticipantSummary};
use ledgerlab_protocol::storage::{Block, ChainVerification};
use ledgerlab_protocol::transaction::TxField;
use ledgerlab_protocol::{LedgerError, LedgerSimulator};

use crate::metrics::SharedMetrics;

// ---------------------------------------------------------------------------
// Application State
// ---------------------------------------------------------------------------

/// Simulator shared between handlers.
pub type SharedSimulator = Arc<RwLock<LedgerSimulator>>;

/// Shared application state available to all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Reported version string.
    pub version: String,
    /// The simulation itself.
    pub simulator: SharedSimulator,
    /// Broadcast channel for live event notifications.
    pub event_tx: broadcast::Sender<LedgerEvent>,
    /// Prometheus metrics for in-handler recording.
    pub metrics: SharedMetrics,
}

/// Events pushed to WebSocket subscribers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum LedgerEvent {
    /// A transaction was appended to every participant's chain.
    #[serde(rename = "transaction_broadcast")]
    TransactionBroadcast {
        block_index: u64,
        hash: String,
        participants: usize,
    },
    /// A field on the active chain was edited and the chain rehashed.
    #[serde(rename = "chain_edited")]
    ChainEdited {
        participant: String,
        block_index: usize,
        tx_index: usize,
        field: TxField,
    },
    /// The active participant changed.
    #[serde(rename = "active_switched")]
    ActiveSwitched { participant: String },
    /// A consensus check completed.
    #[serde(rename = "consensus_checked")]
    ConsensusChecked {
        unanimous: bool,
        dissenting_ids: Vec<String>,
    },
}

// ---------------------------------------------------------------------------
// Router Construction
// ---------------------------------------------------------------------------

/// Builds the full axum [`Router`] with all API routes, CORS, and tracing.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/status", get(status_handler))
        .route("/chain", get(chain_handler))
        .route("/chain/edit", post(edit_handler))
        .route("/participants", get(participants_handler))
        .route("/participants/active", post(switch_handler))
        .route("/transactions", post(submit_handler))
        .route("/verify", post(verify_handler))
        .route("/consensus", post(consensus_handler))
        .route("/ws", get(ws_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Request / Response Types
// ---------------------------------------------------------------------------

/// Body of `POST /transactions`. Missing fields count as empty.
#[derive(Debug, Default, Deserialize)]
pub struct SubmitRequest {
    #[serde(default)]
    pub sender: String,
    #[serde(default)]
    pub receiver: String,
    /// Accepted as a string or a JSON number.
    #[serde(default)]
    pub amount: serde_json::Value,
}

/// Body of `POST /chain/edit`.
#[derive(Debug, Deserialize)]
pub struct EditRequest {
    pub block_index: usize,
    pub tx_index: usize,
    /// One of `sender`, `receiver`, `amount`.
    pub field: String,
    pub value: String,
}

/// Body of `POST /participants/active`.
#[derive(Debug, Deserialize)]
pub struct SwitchRequest {
    pub id: String,
}

/// Response payload for `GET /status`.
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Software version.
    pub version: String,
    /// Digest used to seal blocks.
    pub hash_function: String,
    /// Number of simulated participants.
    pub participant_count: usize,
    /// Id of the participant on display.
    pub active_participant: String,
    /// Blocks on the active chain.
    pub active_chain_height: usize,
    /// Verdict of the last verification, if still current.
    pub last_verification_valid: Option<bool>,
    /// Outcome of the last consensus check, if any.
    pub last_consensus_unanimous: Option<bool>,
    /// ISO-8601 timestamp of the response.
    pub timestamp: String,
}

/// Response payload for `GET /chain`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ChainResponse {
    /// Owner of the chain.
    pub participant: String,
    /// Index the next block will receive.
    pub block_counter: u64,
    /// Blocks in chain order.
    pub blocks: Vec<Block>,
}

/// Generic error body returned by REST endpoints on failure.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Wraps [`LedgerError`] so handlers can use `?`.
pub struct ApiError(LedgerError);

impl From<LedgerError> for ApiError {
    fn from(e: LedgerError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.0.is_validation() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::NOT_FOUND
        };
        let body = ErrorResponse {
            error: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// `GET /health` — returns 200 while the process is alive.
async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({ "status": "ok" })))
}

/// `GET /status` — summarizes the simulation.
async fn status_handler(State(state): State<AppState>) -> Json<StatusResponse> {
    let sim = state.simulator.read();
    Json(StatusResponse {
        version: state.version.clone(),
        hash_function: PRIMARY_HASH_FUNCTION.to_string(),
        participant_count: sim.network().len(),
        active_participant: sim.active_participant().id.clone(),
        active_chain_height: sim.active_chain().len(),
        last_verification_valid: sim.last_verification().map(|v| v.overall_valid),
        last_consensus_unanimous: sim.last_consensus().map(|c| c.unanimous),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// `GET /chain` — the active participant's blocks.
async fn chain_handler(State(state): State<AppState>) -> Json<ChainResponse> {
    let sim = state.simulator.read();
    let chain = sim.active_chain();
    Json(ChainResponse {
        participant: sim.active_participant().id.clone(),
        block_counter: chain.block_counter(),
        blocks: chain.blocks().to_vec(),
    })
}

/// `GET /participants` — every participant in creation order.
async fn participants_handler(State(state): State<AppState>) -> Json<Vec<ParticipantSummary>> {
    Json(state.simulator.read().participants())
}

/// `POST /participants/active` — switches the chain on display.
async fn switch_handler(
    State(state): State<AppState>,
    Json(req): Json<SwitchRequest>,
) -> Result<Json<Vec<ParticipantSummary>>, ApiError> {
    let (summaries, height) = {
        let mut sim = state.simulator.write();
        sim.switch_active_participant(&req.id)?;
        (sim.participants(), sim.active_chain().len())
    };

    state.metrics.active_chain_height.set(height as i64);
    let _ = state.event_tx.send(LedgerEvent::ActiveSwitched {
        participant: req.id,
    });
    Ok(Json(summaries))
}

/// `POST /transactions` — validates and broadcasts a transaction.
///
/// Returns 201 with the block appended to the active chain, or 400 when a
/// field is empty.
async fn submit_handler(
    State(state): State<AppState>,
    Json(req): Json<SubmitRequest>,
) -> Result<(StatusCode, Json<Block>), ApiError> {
    let amount = match &req.amount {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    };

    let result = {
        let mut sim = state.simulator.write();
        let participants = sim.network().len();
        sim.submit_transaction(&req.sender, &req.receiver, &amount)
            .map(|block| (block.clone(), participants))
    };

    let (block, participants) = match result {
        Ok(ok) => ok,
        Err(e) => {
            state.metrics.submissions_rejected_total.inc();
            tracing::debug!(error = %e, "transaction rejected");
            return Err(e.into());
        }
    };

    state.metrics.transactions_broadcast_total.inc();
    state
        .metrics
        .active_chain_height
        .set(block.index as i64 + 1);
    let _ = state.event_tx.send(LedgerEvent::TransactionBroadcast {
        block_index: block.index,
        hash: block.hash.clone(),
        participants,
    });
    Ok((StatusCode::CREATED, Json(block)))
}

/// `POST /chain/edit` — edits one transaction field on the active chain.
async fn edit_handler(
    State(state): State<AppState>,
    Json(req): Json<EditRequest>,
) -> Result<Json<Block>, ApiError> {
    let field: TxField = req.field.parse()?;

    let (participant, block) = {
        let mut sim = state.simulator.write();
        sim.edit_field(req.block_index, req.tx_index, field, &req.value)?;
        let block = sim
            .active_chain()
            .get(req.block_index)
            .cloned()
            .ok_or(LedgerError::BlockOutOfRange {
                index: req.block_index,
                len: sim.active_chain().len(),
            })?;
        (sim.active_participant().id.clone(), block)
    };

    state.metrics.field_edits_total.inc();
    let _ = state.event_tx.send(LedgerEvent::ChainEdited {
        participant,
        block_index: req.block_index,
        tx_index: req.tx_index,
        field,
    });
    Ok(Json(block))
}

/// `POST /verify` — verifies the active chain.
async fn verify_handler(State(state): State<AppState>) -> Json<ChainVerification> {
    let report = state.simulator.write().request_verify().clone();

    state.metrics.verifications_total.inc();
    if !report.overall_valid {
        state.metrics.tampered_verifications_total.inc();
    }
    Json(report)
}

/// `POST /consensus` — evaluates consensus and updates statuses.
async fn consensus_handler(State(state): State<AppState>) -> Json<ConsensusReport> {
    let report = state.simulator.write().request_consensus_check().clone();

    state.metrics.consensus_checks_total.inc();
    state
        .metrics
        .dissenting_participants
        .set(report.dissenting_ids.len() as i64);
    let _ = state.event_tx.send(LedgerEvent::ConsensusChecked {
        unanimous: report.unanimous,
        dissenting_ids: report.dissenting_ids.clone(),
    });
    Json(report)
}

/// `GET /ws` — upgrades to a WebSocket that streams [`LedgerEvent`]s.
async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws_connection(socket, state))
}

/// Forwards broadcast events until the client disconnects or the channel
/// closes.
async fn handle_ws_connection(mut socket: WebSocket, state: AppState) {
    let mut rx = state.event_tx.subscribe();

    loop {
        tokio::select! {
            event = rx.recv() => {
                match event {
                    Ok(ev) => {
                        let payload = match serde_json::to_string(&ev) {
                            Ok(s) => s,
                            Err(e) => {
                                tracing::warn!("failed to serialize ws event: {}", e);
                                continue;
                            }
                        };
                        if socket.send(Message::Text(payload)).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!("ws subscriber lagged by {} events", n);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
            msg = socket.recv() => {
                match msg {
                    // Push-only channel.
                    Some(Ok(_)) => {}
                    _ => break,
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use ledgerlab_protocol::config::NetworkConfig;
    use tower::ServiceExt;

    fn test_app_state() -> AppState {
        let simulator = LedgerSimulator::new(&NetworkConfig::default()).unwrap();
        let (event_tx, _) = broadcast::channel(16);
        AppState {
            version: "0.1.0-test".into(),
            simulator: Arc::new(RwLock::new(simulator)),
            event_tx,
            metrics: Arc::new(crate::metrics::SimMetrics::new().unwrap()),
        }
    }

    async fn send(router: &Router, req: Request<Body>) -> (StatusCode, serde_json::Value) {
        let resp = router.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    async fn get(router: &Router, path: &str) -> (StatusCode, serde_json::Value) {
        let req = Request::builder().uri(path).body(Body::empty()).unwrap();
        send(router, req).await
    }

    async fn post_json(
        router: &Router,
        path: &str,
        body: serde_json::Value,
    ) -> (StatusCode, serde_json::Value) {
        let req = Request::builder()
            .method("POST")
            .uri(path)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap();
        send(router, req).await
    }

    async fn post_empty(router: &Router, path: &str) -> (StatusCode, serde_json::Value) {
        let req = Request::builder()
            .method("POST")
            .uri(path)
            .body(Body::empty())
            .unwrap();
        send(router, req).await
    }

    #[tokio::test]
    async fn health_endpoint_returns_ok() {
        let router = create_router(test_app_state());
        let (status, json) = get(&router, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn status_reports_fresh_network() {
        let router = create_router(test_app_state());
        let (status, json) = get(&router, "/status").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["participant_count"], 5);
        assert_eq!(json["hash_function"], "SHA-256");
        assert_eq!(json["active_participant"], "node-1");
        assert_eq!(json["active_chain_height"], 0);
        assert!(json["last_verification_valid"].is_null());
    }

    #[tokio::test]
    async fn submit_creates_block_on_every_participant() {
        let state = test_app_state();
        let router = create_router(state.clone());

        let (status, block) = post_json(
            &router,
            "/transactions",
            serde_json::json!({ "sender": "Alice", "receiver": "Bob", "amount": "$12.50" }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(block["index"], 0);
        assert_eq!(block["previous_hash"], "0");
        assert_eq!(block["transactions"][0]["amount"], 12.5);

        let (_, participants) = get(&router, "/participants").await;
        let participants = participants.as_array().unwrap();
        assert_eq!(participants.len(), 5);
        assert!(participants.iter().all(|p| p["block_count"] == 1));
        assert_eq!(state.metrics.transactions_broadcast_total.get(), 1);
    }

    #[tokio::test]
    async fn submit_with_missing_field_is_rejected() {
        let state = test_app_state();
        let router = create_router(state.clone());

        let (status, json) = post_json(
            &router,
            "/transactions",
            serde_json::json!({ "sender": "Alice", "receiver": "  ", "amount": 5 }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].as_str().unwrap().contains("receiver"));

        let (_, chain) = get(&router, "/chain").await;
        assert!(chain["blocks"].as_array().unwrap().is_empty());
        assert_eq!(state.metrics.submissions_rejected_total.get(), 1);
    }

    #[tokio::test]
    async fn tampering_is_detected_and_outvoted() {
        let state = test_app_state();
        let router = create_router(state.clone());

        for (s, r, a) in [("A", "B", "10"), ("B", "C", "5")] {
            let body = serde_json::json!({ "sender": s, "receiver": r, "amount": a });
            let (status, _) = post_json(&router, "/transactions", body).await;
            assert_eq!(status, StatusCode::CREATED);
        }

        let (status, _) = post_json(
            &router,
            "/participants/active",
            serde_json::json!({ "id": "node-3" }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, block) = post_json(
            &router,
            "/chain/edit",
            serde_json::json!({ "block_index": 0, "tx_index": 0, "field": "amount", "value": "1000" }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(block["transactions"][0]["amount"], 1000);

        // Block 0 is resealed but block 1 still links to its old hash.
        let (_, report) = post_empty(&router, "/verify").await;
        assert_eq!(report["overall_valid"], false);
        assert_eq!(report["blocks"][0]["hash_matches"], true);
        assert_eq!(report["blocks"][0]["chain_intact"], false);
        assert_eq!(report["blocks"][1]["valid"], true);
        assert_eq!(state.metrics.tampered_verifications_total.get(), 1);

        let (_, consensus) = post_empty(&router, "/consensus").await;
        assert_eq!(consensus["unanimous"], false);
        assert_eq!(consensus["dissenting_ids"], serde_json::json!(["node-3"]));
        assert_eq!(state.metrics.dissenting_participants.get(), 1);

        let (_, participants) = get(&router, "/participants").await;
        assert_eq!(participants[2]["status"], "Rejected");
        assert_eq!(participants[0]["status"], "InSync");
    }

    #[tokio::test]
    async fn unknown_participant_is_not_found() {
        let router = create_router(test_app_state());
        let (status, json) = post_json(
            &router,
            "/participants/active",
            serde_json::json!({ "id": "node-99" }),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(json["error"].as_str().unwrap().contains("node-99"));
    }

    #[tokio::test]
    async fn edit_rejects_unknown_field_and_missing_block() {
        let router = create_router(test_app_state());

        let (status, _) = post_json(
            &router,
            "/chain/edit",
            serde_json::json!({ "block_index": 0, "tx_index": 0, "field": "timestamp", "value": "x" }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = post_json(
            &router,
            "/chain/edit",
            serde_json::json!({ "block_index": 4, "tx_index": 0, "field": "sender", "value": "x" }),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
