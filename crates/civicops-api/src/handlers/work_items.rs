//! Work item API handlers

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{header, StatusCode},
    Json,
};
use civicops_domain::{UserId, WorkItem, WorkItemId, WorkItemStatus};
use tracing::info;

use crate::{
    auth::AuthUser,
    error::{ApiError, ApiResult},
    models::{CreateWorkItemRequest, ListWorkItemsQuery, UpdateWorkItemRequest, WorkItemResponse},
    state::AppState,
};

// Non-UUID ids can never match a stored item.
fn parse_id(raw: &str) -> ApiResult<WorkItemId> {
    WorkItemId::from_string(raw).map_err(|_| ApiError::work_item_not_found(raw))
}

/// Create a work item
#[utoipa::path(
    post,
    path = "/api/work-items",
    request_body = CreateWorkItemRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Work item created", body = WorkItemResponse),
        (status = 400, description = "Invalid title"),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn create_work_item(
    State(state): State<AppState>,
    AuthUser { identity, .. }: AuthUser,
    payload: Result<Json<CreateWorkItemRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, [(header::HeaderName, String); 1], Json<WorkItemResponse>)> {
    let Json(request) = payload?;
    let item = WorkItem::create(
        request.title.as_deref().unwrap_or_default(),
        request.description,
        identity.id,
        request.assigned_to_user_id.map(UserId::from),
    )?;
    let item = state.work_items.add(item);
    info!(id = %item.id(), user = %identity.id, "work item created");

    let location = format!("/api/work-items/{}", item.id());
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(WorkItemResponse::from(&item)),
    ))
}

/// List work items, most recently updated first
#[utoipa::path(
    get,
    path = "/api/work-items",
    params(ListWorkItemsQuery),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Work items", body = Vec<WorkItemResponse>),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn list_work_items(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<ListWorkItemsQuery>,
) -> ApiResult<Json<Vec<WorkItemResponse>>> {
    let filter = query
        .status
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .and_then(|s| s.parse::<WorkItemStatus>().ok());

    let items = match filter {
        Some(status) => state.work_items.list_by_status(status),
        None => state.work_items.list(),
    };

    Ok(Json(items.iter().map(WorkItemResponse::from).collect()))
}

/// Get a work item by ID
#[utoipa::path(
    get,
    path = "/api/work-items/{id}",
    params(("id" = String, Path, description = "Work item ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Work item", body = WorkItemResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Work item not found")
    )
)]
pub async fn get_work_item(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<WorkItemResponse>> {
    let id = parse_id(&raw_id)?;
    let item = state
        .work_items
        .get(&id)
        .ok_or_else(|| ApiError::work_item_not_found(id))?;
    Ok(Json(WorkItemResponse::from(&item)))
}

/// Partially update a work item
///
/// The update is all-or-nothing: an invalid title rejects the whole request
/// and leaves the stored item unchanged.
#[utoipa::path(
    patch,
    path = "/api/work-items/{id}",
    params(("id" = String, Path, description = "Work item ID")),
    request_body = UpdateWorkItemRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Updated work item", body = WorkItemResponse),
        (status = 400, description = "Invalid title"),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Work item not found")
    )
)]
pub async fn update_work_item(
    State(state): State<AppState>,
    AuthUser { identity, .. }: AuthUser,
    Path(raw_id): Path<String>,
    payload: Result<Json<UpdateWorkItemRequest>, JsonRejection>,
) -> ApiResult<Json<WorkItemResponse>> {
    let id = parse_id(&raw_id)?;
    let Json(request) = payload?;
    let changes = request.into_update();
    let actor = identity.id;

    // The mutator's working copy is exactly what gets stored.
    let mut updated = None;
    let found = state.work_items.try_update(&id, &mut |item: &mut WorkItem| {
        item.apply(&changes, actor)?;
        updated = Some(item.clone());
        Ok(())
    })?;

    match updated {
        Some(item) if found => {
            info!(id = %id, user = %actor, "work item updated");
            Ok(Json(WorkItemResponse::from(&item)))
        }
        _ => Err(ApiError::work_item_not_found(id)),
    }
}

/// Delete a work item
#[utoipa::path(
    delete,
    path = "/api/work-items/{id}",
    params(("id" = String, Path, description = "Work item ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Work item deleted"),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Work item not found")
    )
)]
pub async fn delete_work_item(
    State(state): State<AppState>,
    AuthUser { identity, .. }: AuthUser,
    Path(raw_id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_id(&raw_id)?;
    if state.work_items.delete(&id) {
        info!(id = %id, user = %identity.id, "work item deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::work_item_not_found(id))
    }
}
