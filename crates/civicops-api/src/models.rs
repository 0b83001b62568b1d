//! API request and response models
//!
//! Field names are camelCase on the wire. Work item status travels as its
//! string name (`"Todo"`, `"InProgress"`, ...), using the domain enum directly.

use chrono::{DateTime, Utc};
use civicops_domain::{Role, UserId, WorkItem, WorkItemStatus, WorkItemUpdate};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::auth::Identity;

/// Work item creation request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkItemRequest {
    /// Title, 1 to 120 characters after trimming; a missing title is rejected
    #[serde(default)]
    pub title: Option<String>,
    /// Optional free-form description
    #[serde(default)]
    pub description: Option<String>,
    /// Optional assignee
    #[serde(default)]
    pub assigned_to_user_id: Option<Uuid>,
}

/// Partial work item update; omitted fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWorkItemRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "InProgress")]
    pub status: Option<WorkItemStatus>,
    #[serde(default)]
    pub assigned_to_user_id: Option<Uuid>,
}

impl UpdateWorkItemRequest {
    pub fn into_update(self) -> WorkItemUpdate {
        WorkItemUpdate {
            title: self.title,
            description: self.description,
            status: self.status,
            assigned_to: self.assigned_to_user_id.map(UserId::from),
        }
    }
}

/// Work item response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkItemResponse {
    pub id: Uuid,
    pub created_by_user_id: Uuid,
    pub assigned_to_user_id: Option<Uuid>,
    pub updated_by_user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    #[schema(value_type = String, example = "Todo")]
    pub status: WorkItemStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&WorkItem> for WorkItemResponse {
    fn from(item: &WorkItem) -> Self {
        Self {
            id: item.id().as_uuid(),
            created_by_user_id: item.created_by().as_uuid(),
            assigned_to_user_id: item.assigned_to().map(|u| u.as_uuid()),
            updated_by_user_id: item.updated_by().as_uuid(),
            title: item.title().to_string(),
            description: item.description().map(str::to_string),
            status: item.status(),
            created_at: item.created_at(),
            updated_at: item.updated_at(),
        }
    }
}

/// Query parameters for work item listing
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListWorkItemsQuery {
    /// Filter by status (Todo, InProgress, Blocked, Done); unknown values are ignored
    pub status: Option<String>,
}

/// Issued access token
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

/// Current caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    #[schema(value_type = String, example = "Staff")]
    pub role: Role,
    pub is_active: bool,
}

impl From<&Identity> for MeResponse {
    fn from(identity: &Identity) -> Self {
        Self {
            id: identity.id.as_uuid(),
            email: identity.email.clone(),
            display_name: identity.display_name.clone(),
            role: identity.role,
            is_active: identity.is_active,
        }
    }
}

/// One verified claim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ClaimEntry {
    #[serde(rename = "type")]
    pub claim_type: String,
    pub value: String,
}

/// API health response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Version
    pub version: String,
    /// Uptime in seconds
    pub uptime: u64,
    /// Number of stored work items
    pub work_items: usize,
}
