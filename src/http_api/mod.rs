use std::{net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::{
    AllocationError, BoardSnapshot, BoardSummary, BoardStore, Command, GroupField, GroupId,
    GroupKind, IncidentBoard, InterventionGroup, PersistenceError, ResourceCatalog, TrackedUnit,
    UnitDetailField,
};

pub type SharedBoardStore = Arc<dyn BoardStore + Send + Sync>;

/// Shared board behind a single writer lock. Every handler that mutates
/// takes the write guard for the whole command, including the save.
#[derive(Clone)]
pub struct AppState {
    board: Arc<RwLock<IncidentBoard>>,
    store: Option<SharedBoardStore>,
}

impl AppState {
    pub fn new(board: IncidentBoard) -> Self {
        Self {
            board: Arc::new(RwLock::new(board)),
            store: None,
        }
    }

    pub fn with_shared(board: Arc<RwLock<IncidentBoard>>) -> Self {
        Self { board, store: None }
    }

    /// Saves the group collection through `store` after every change.
    pub fn with_store(mut self, store: SharedBoardStore) -> Self {
        self.store = Some(store);
        self
    }

    fn board(&self) -> Arc<RwLock<IncidentBoard>> {
        self.board.clone()
    }

    fn persist(&self, board: &IncidentBoard) -> Result<(), ApiError> {
        if let Some(store) = &self.store {
            store.save_groups(board.groups())?;
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

#[derive(Debug)]
enum ApiError {
    NotFound(String),
    Conflict(String),
    Invalid(String),
    Internal(String),
}

impl ApiError {
    fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }
}

impl From<PersistenceError> for ApiError {
    fn from(value: PersistenceError) -> Self {
        ApiError::Internal(value.to_string())
    }
}

impl From<AllocationError> for ApiError {
    fn from(value: AllocationError) -> Self {
        match value {
            AllocationError::UnknownGroup(_)
            | AllocationError::UnknownUnit(_)
            | AllocationError::UnknownPersonnel(_)
            | AllocationError::UnitNotInGroup { .. }
            | AllocationError::PersonnelNotInGroup { .. } => ApiError::NotFound(value.to_string()),
            AllocationError::UnitAlreadyAssigned { .. }
            | AllocationError::PersonnelAlreadyAssigned { .. }
            | AllocationError::UnitNotEligible { .. } => ApiError::Conflict(value.to_string()),
            AllocationError::UnknownField(_) => ApiError::Invalid(value.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, "not_found", message),
            ApiError::Conflict(message) => (StatusCode::CONFLICT, "conflict", message),
            ApiError::Invalid(message) => (StatusCode::BAD_REQUEST, "invalid_request", message),
            ApiError::Internal(message) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", message)
            }
        };
        (status, Json(ErrorBody { error, message })).into_response()
    }
}

#[derive(Debug, Deserialize)]
struct CreateGroupPayload {
    kind: GroupKind,
}

#[derive(Debug, Deserialize)]
struct GroupEditPayload {
    field: GroupField,
    value: String,
}

#[derive(Debug, Deserialize)]
struct UnitDetailPayload {
    field: UnitDetailField,
    value: String,
}

#[derive(Debug, Deserialize)]
struct AssignUnitPayload {
    unit_id: String,
}

#[derive(Debug, Deserialize)]
struct AssignPersonnelPayload {
    personnel_id: String,
}

#[derive(Debug, Deserialize)]
struct OfficerQuery {
    #[serde(default)]
    q: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/snapshot", get(get_snapshot))
        .route("/summary", get(get_summary))
        .route("/catalog", put(replace_catalog))
        .route("/officers", get(suggest_officers))
        .route("/commands", post(apply_command))
        .route("/groups", get(list_groups).post(create_group))
        .route(
            "/groups/:id",
            get(get_group).put(edit_group).delete(delete_group),
        )
        .route("/groups/:id/units", post(assign_unit))
        .route(
            "/groups/:id/units/:unit_id",
            put(update_unit_detail).delete(unassign_unit),
        )
        .route("/groups/:id/personnel", post(assign_personnel))
        .route(
            "/groups/:id/personnel/:personnel_id",
            axum::routing::delete(unassign_personnel),
        )
        .with_state(state)
}

pub async fn serve(
    addr: SocketAddr,
    board: IncidentBoard,
    store: Option<SharedBoardStore>,
) -> std::io::Result<()> {
    let mut state = AppState::new(board);
    if let Some(store) = store {
        state = state.with_store(store);
    }
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "http api listening");
    axum::serve(listener, app).await
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn get_snapshot(State(state): State<AppState>) -> Json<BoardSnapshot> {
    let board = state.board();
    let snapshot = board.read().snapshot();
    Json(snapshot)
}

async fn get_summary(State(state): State<AppState>) -> Json<BoardSummary> {
    let board = state.board();
    let summary = board.read().summary();
    Json(summary)
}

async fn replace_catalog(
    State(state): State<AppState>,
    Json(catalog): Json<ResourceCatalog>,
) -> Json<BoardSummary> {
    let board = state.board();
    let summary = {
        let mut guard = board.write();
        // Posted catalogs go through the same roster merge as CSV reports.
        let catalog = ResourceCatalog::new(catalog.units().to_vec(), catalog.personnel().to_vec());
        guard.refresh_catalog(catalog);
        guard.summary()
    };
    Json(summary)
}

async fn suggest_officers(
    State(state): State<AppState>,
    Query(query): Query<OfficerQuery>,
) -> Json<Vec<String>> {
    let board = state.board();
    let names = board.read().suggest_officers(&query.q);
    Json(names)
}

async fn apply_command(
    State(state): State<AppState>,
    Json(command): Json<Command>,
) -> Result<Json<Vec<InterventionGroup>>, ApiError> {
    let board = state.board();
    let groups = {
        let mut guard = board.write();
        let groups = guard.apply(command)?;
        state.persist(&guard)?;
        groups
    };
    Ok(Json(groups.as_ref().clone()))
}

async fn list_groups(State(state): State<AppState>) -> Json<Vec<InterventionGroup>> {
    let board = state.board();
    let groups = board.read().groups().to_vec();
    Json(groups)
}

async fn get_group(
    State(state): State<AppState>,
    Path(group_id): Path<String>,
) -> Result<Json<InterventionGroup>, ApiError> {
    let board = state.board();
    let group_id = GroupId::from(group_id);
    let group = board.read().group(&group_id).cloned();
    group
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("group {group_id} not found")))
}

async fn create_group(
    State(state): State<AppState>,
    Json(payload): Json<CreateGroupPayload>,
) -> Result<(StatusCode, Json<InterventionGroup>), ApiError> {
    let board = state.board();
    let groups = {
        let mut guard = board.write();
        let groups = guard.create_group(payload.kind);
        state.persist(&guard)?;
        groups
    };
    let created = groups
        .last()
        .cloned()
        .ok_or_else(|| ApiError::not_found("group not found after creation"))?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn edit_group(
    State(state): State<AppState>,
    Path(group_id): Path<String>,
    Json(payload): Json<GroupEditPayload>,
) -> Result<Json<InterventionGroup>, ApiError> {
    let board = state.board();
    let group_id = GroupId::from(group_id);
    let mut guard = board.write();
    if guard.group(&group_id).is_none() {
        return Err(AllocationError::UnknownGroup(group_id).into());
    }
    let groups = guard.rename_group(&group_id, payload.field, payload.value);
    state.persist(&guard)?;
    groups
        .iter()
        .find(|group| group.id == group_id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("group {group_id} not found")))
}

async fn delete_group(
    State(state): State<AppState>,
    Path(group_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let board = state.board();
    let group_id = GroupId::from(group_id);
    let mut guard = board.write();
    if guard.group(&group_id).is_none() {
        return Err(AllocationError::UnknownGroup(group_id).into());
    }
    guard.delete_group(&group_id);
    state.persist(&guard)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn assign_unit(
    State(state): State<AppState>,
    Path(group_id): Path<String>,
    Json(payload): Json<AssignUnitPayload>,
) -> Result<(StatusCode, Json<TrackedUnit>), ApiError> {
    let board = state.board();
    let group_id = GroupId::from(group_id);
    let groups = {
        let mut guard = board.write();
        let groups = guard.assign_unit_by_id(&payload.unit_id, &group_id)?;
        state.persist(&guard)?;
        groups
    };
    let tracked = groups
        .iter()
        .find(|group| group.id == group_id)
        .and_then(|group| group.unit(&payload.unit_id))
        .cloned()
        .ok_or_else(|| ApiError::not_found("unit not found after assignment"))?;
    Ok((StatusCode::CREATED, Json(tracked)))
}

async fn unassign_unit(
    State(state): State<AppState>,
    Path((group_id, unit_id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    let board = state.board();
    let group_id = GroupId::from(group_id);
    let mut guard = board.write();
    let holds = guard
        .group(&group_id)
        .ok_or_else(|| AllocationError::UnknownGroup(group_id.clone()))?
        .holds_unit(&unit_id);
    if !holds {
        return Err(AllocationError::UnitNotInGroup { unit_id, group_id }.into());
    }
    guard.unassign_unit(&unit_id, &group_id);
    state.persist(&guard)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn update_unit_detail(
    State(state): State<AppState>,
    Path((group_id, unit_id)): Path<(String, String)>,
    Json(payload): Json<UnitDetailPayload>,
) -> Result<Json<TrackedUnit>, ApiError> {
    let board = state.board();
    let group_id = GroupId::from(group_id);
    let groups = {
        let mut guard = board.write();
        let groups = guard.update_unit_detail(&group_id, &unit_id, payload.field, payload.value);
        state.persist(&guard)?;
        groups
    };
    let group = groups
        .iter()
        .find(|group| group.id == group_id)
        .ok_or_else(|| AllocationError::UnknownGroup(group_id.clone()))?;
    group
        .unit(&unit_id)
        .cloned()
        .map(Json)
        .ok_or_else(|| {
            AllocationError::UnitNotInGroup {
                unit_id: unit_id.clone(),
                group_id: group_id.clone(),
            }
            .into()
        })
}

async fn assign_personnel(
    State(state): State<AppState>,
    Path(group_id): Path<String>,
    Json(payload): Json<AssignPersonnelPayload>,
) -> Result<(StatusCode, Json<InterventionGroup>), ApiError> {
    let board = state.board();
    let group_id = GroupId::from(group_id);
    let groups = {
        let mut guard = board.write();
        let groups = guard.assign_personnel_by_id(&payload.personnel_id, &group_id)?;
        state.persist(&guard)?;
        groups
    };
    let group = groups
        .iter()
        .find(|group| group.id == group_id)
        .cloned()
        .ok_or_else(|| ApiError::not_found(format!("group {group_id} not found")))?;
    Ok((StatusCode::CREATED, Json(group)))
}

async fn unassign_personnel(
    State(state): State<AppState>,
    Path((group_id, personnel_id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    let board = state.board();
    let group_id = GroupId::from(group_id);
    let mut guard = board.write();
    let holds = guard
        .group(&group_id)
        .ok_or_else(|| AllocationError::UnknownGroup(group_id.clone()))?
        .holds_personnel(&personnel_id);
    if !holds {
        return Err(AllocationError::PersonnelNotInGroup {
            personnel_id,
            group_id,
        }
        .into());
    }
    guard.unassign_personnel(&personnel_id, &group_id);
    state.persist(&guard)?;
    Ok(StatusCode::NO_CONTENT)
}
