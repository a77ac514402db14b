//! HTTP access to a [`Workspace`].
//!
//! Every handler takes the workspace lock for the whole operation, so each
//! request observes and produces a complete forest. Mutations hold the write
//! lock while the forest file is written; the file is small and requests
//! queue behind the save rather than race it.

use std::{net::SocketAddr, sync::Arc};

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{get, patch, post, put},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tokio::{net::TcpListener, signal, sync::RwLock};
use tracing::instrument;

use crate::{Error, FaqNode, FlatEntry, NewNode, NodePatch, QuestionId, TreeFilter, Workspace};

mod error;
pub use error::ApiError;

mod extract;
use extract::{Json, Path, Query};

/// Shared state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    workspace: Arc<RwLock<Workspace>>,
}

impl AppState {
    /// Wraps a workspace for sharing between handlers.
    #[must_use]
    pub fn new(workspace: Workspace) -> Self {
        Self {
            workspace: Arc::new(RwLock::new(workspace)),
        }
    }
}

/// Builds the router for the FAQ endpoints.
#[must_use]
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/faq", post(create_node))
        .route("/faq/tree", get(get_tree))
        .route("/faq/flat", get(flatten))
        .route(
            "/faq/:question_id",
            get(get_node).put(update_node).delete(delete_node),
        )
        .route("/faq/:question_id/toggle", patch(toggle_status))
        .route("/faq/:question_id/parent", put(move_node))
        .with_state(state)
}

/// Serves the workspace on `addr` until interrupted.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails.
pub async fn serve(addr: SocketAddr, workspace: Workspace) -> std::io::Result<()> {
    let app = router(AppState::new(workspace));
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Received Ctrl+C, shutting down");
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

#[instrument(skip(state))]
async fn get_tree(
    State(state): State<AppState>,
    Query(filter): Query<TreeFilter>,
) -> Json<Vec<FaqNode>> {
    let workspace = state.workspace.read().await;
    Json(workspace.store().get_tree(&filter))
}

#[derive(Debug, Deserialize)]
struct FlatQuery {
    exclude: Option<QuestionId>,
}

#[instrument(skip(state))]
async fn flatten(
    State(state): State<AppState>,
    Query(query): Query<FlatQuery>,
) -> Json<Vec<FlatEntry>> {
    let workspace = state.workspace.read().await;
    Json(workspace.store().flatten(query.exclude.as_ref()).collect())
}

#[instrument(skip(state))]
async fn get_node(
    State(state): State<AppState>,
    Path(question_id): Path<QuestionId>,
) -> Result<Json<FaqNode>, ApiError> {
    let workspace = state.workspace.read().await;
    workspace
        .store()
        .get(&question_id)
        .map(|node| Json(node.clone()))
        .ok_or_else(|| Error::NotFound(question_id).into())
}

#[instrument(skip(state, input))]
async fn create_node(
    State(state): State<AppState>,
    Json(input): Json<NewNode>,
) -> Result<(StatusCode, Json<FaqNode>), ApiError> {
    let mut workspace = state.workspace.write().await;
    let node = workspace.create_node(input)?;
    tracing::info!(question_id = %node.question_id, "Created question");
    Ok((StatusCode::CREATED, Json(node)))
}

#[instrument(skip(state, patch))]
async fn update_node(
    State(state): State<AppState>,
    Path(question_id): Path<QuestionId>,
    Json(patch): Json<NodePatch>,
) -> Result<Json<FaqNode>, ApiError> {
    let mut workspace = state.workspace.write().await;
    Ok(Json(workspace.update_node(&question_id, patch)?))
}

#[derive(Debug, Serialize)]
struct DeleteResponse {
    success: bool,
}

#[instrument(skip(state))]
async fn delete_node(
    State(state): State<AppState>,
    Path(question_id): Path<QuestionId>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let mut workspace = state.workspace.write().await;
    workspace.delete_node(&question_id)?;
    tracing::info!(%question_id, "Deleted question");
    Ok(Json(DeleteResponse { success: true }))
}

#[instrument(skip(state))]
async fn toggle_status(
    State(state): State<AppState>,
    Path(question_id): Path<QuestionId>,
) -> Result<Json<FaqNode>, ApiError> {
    let mut workspace = state.workspace.write().await;
    Ok(Json(workspace.toggle_status(&question_id)?))
}

#[derive(Debug, Deserialize)]
struct MoveRequest {
    parent_question_id: Option<QuestionId>,
}

#[instrument(skip(state))]
async fn move_node(
    State(state): State<AppState>,
    Path(question_id): Path<QuestionId>,
    Json(request): Json<MoveRequest>,
) -> Result<Json<FaqNode>, ApiError> {
    let mut workspace = state.workspace.write().await;
    let node = workspace.move_node(&question_id, request.parent_question_id.as_ref())?;
    Ok(Json(node))
}
