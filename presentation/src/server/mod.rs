//! HTTP API for dashboards and other programmatic clients
//!
//! # Endpoints
//!
//! - POST /api/evaluate - Put a purchase request in front of the panel
//! - POST /api/simulate - Run one autonomous agent
//! - GET /api/results - Every decision so far
//! - GET /api/simulations - Every task outcome so far
//! - GET /api/health - Liveness check

mod error;

pub use error::ApiError;

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::routing::{get, post};
use axum::{Json, Router};
use quorum_application::{ActionPlanner, ConsensusEngine, LlmGateway, ResultLog};
use quorum_domain::{DEFAULT_TASK_BUDGET, PurchaseRequest, TaskRequest};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::info;

/// Shared state of every handler
pub struct ApiState<G: LlmGateway + 'static> {
    planner: Arc<ActionPlanner<G>>,
}

impl<G: LlmGateway + 'static> ApiState<G> {
    pub fn new(planner: Arc<ActionPlanner<G>>) -> Self {
        Self { planner }
    }

    fn engine(&self) -> &ConsensusEngine<G> {
        self.planner.engine()
    }

    fn results(&self) -> &Arc<dyn ResultLog> {
        self.engine().result_log()
    }
}

impl<G: LlmGateway + 'static> Clone for ApiState<G> {
    fn clone(&self) -> Self {
        Self {
            planner: Arc::clone(&self.planner),
        }
    }
}

/// Body of `POST /api/simulate`
#[derive(Debug, Deserialize)]
struct SimulateBody {
    agent_name: Option<String>,
    goal: Option<String>,
    budget: Option<f64>,
}

/// Build the API router
pub fn router<G: LlmGateway + 'static>(state: ApiState<G>) -> Router {
    Router::new()
        .route("/api/evaluate", post(evaluate_handler::<G>))
        .route("/api/simulate", post(simulate_handler::<G>))
        .route("/api/results", get(results_handler::<G>))
        .route("/api/simulations", get(simulations_handler::<G>))
        .route("/api/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serve `app` on `listener` until Ctrl-C
pub async fn serve(listener: TcpListener, app: Router) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!("API server listening on http://{}", addr);
    }
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            info!("API server shutting down gracefully");
        })
        .await
}

async fn evaluate_handler<G: LlmGateway + 'static>(
    State(state): State<ApiState<G>>,
    payload: Result<Json<PurchaseRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(request) = payload?;
    info!(
        "API evaluate: ${} for {}",
        request.amount, request.purpose
    );

    let decision = state.engine().evaluate(request).await?;

    Ok(Json(json!({
        "success": true,
        "result": decision,
    })))
}

async fn simulate_handler<G: LlmGateway + 'static>(
    State(state): State<ApiState<G>>,
    payload: Result<Json<SimulateBody>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(body) = payload?;
    let (Some(agent_name), Some(goal)) = (body.agent_name, body.goal) else {
        return Err(ApiError::BadRequest(
            "agent_name and goal are required".to_string(),
        ));
    };
    if agent_name.trim().is_empty() || goal.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "agent_name and goal are required".to_string(),
        ));
    }

    let task = TaskRequest::new(
        agent_name,
        goal,
        body.budget.unwrap_or(DEFAULT_TASK_BUDGET),
    );
    info!("API simulate: {}", task.agent_name);

    let outcome = state.planner.complete_task(task).await?;

    Ok(Json(json!({
        "success": true,
        "result": outcome,
    })))
}

async fn results_handler<G: LlmGateway + 'static>(
    State(state): State<ApiState<G>>,
) -> Json<Value> {
    Json(json!({
        "success": true,
        "results": state.results().decisions(),
    }))
}

async fn simulations_handler<G: LlmGateway + 'static>(
    State(state): State<ApiState<G>>,
) -> Json<Value> {
    Json(json!({
        "success": true,
        "simulations": state.results().tasks(),
    }))
}

async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "message": "Quorum API is running",
    }))
}
