//! Authentication API handlers

use axum::{extract::State, Json};

use crate::{
    auth::{AuthUser, Identity},
    error::{ApiError, ApiResult},
    models::{ClaimEntry, MeResponse, TokenResponse},
    state::AppState,
};

/// Issue a development token
///
/// Only routed when the server runs in the development environment.
#[utoipa::path(
    post,
    path = "/api/dev/token",
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 500, description = "Signing failed")
    )
)]
pub async fn issue_dev_token(State(state): State<AppState>) -> ApiResult<Json<TokenResponse>> {
    let identity = Identity::development();
    let issued = state.jwt.issue(&identity)?;
    tracing::info!(user = %identity.id, expires_at = %issued.expires_at, "issued development token");

    Ok(Json(TokenResponse {
        access_token: issued.token,
        expires_at: issued.expires_at,
    }))
}

/// List the verified claims of the caller
#[utoipa::path(
    get,
    path = "/api/dev/claims",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Verified claims", body = Vec<ClaimEntry>),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn dev_claims(user: AuthUser) -> ApiResult<Json<Vec<ClaimEntry>>> {
    let value = serde_json::to_value(&user.claims)
        .map_err(|e| ApiError::Internal(format!("Failed to encode claims: {}", e)))?;

    let entries = value
        .as_object()
        .map(|claims| {
            claims
                .iter()
                .map(|(claim_type, value)| ClaimEntry {
                    claim_type: claim_type.clone(),
                    value: match value {
                        serde_json::Value::String(s) => s.clone(),
                        other => other.to_string(),
                    },
                })
                .collect()
        })
        .unwrap_or_default();

    Ok(Json(entries))
}

/// Describe the authenticated caller
#[utoipa::path(
    get,
    path = "/api/me",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = MeResponse),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn me(user: AuthUser) -> Json<MeResponse> {
    Json(MeResponse::from(&user.identity))
}
