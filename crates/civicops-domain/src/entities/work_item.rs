//! Work item entity: a trackable civic task with a lifecycle status

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{DomainError, DomainResult};
use crate::value_objects::{UserId, WorkItemId};

/// Maximum title length, counted in characters after trimming
pub const MAX_TITLE_LENGTH: usize = 120;

/// Lifecycle status of a work item
///
/// Serialized by variant name; deserialization accepts any casing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(try_from = "String")]
pub enum WorkItemStatus {
    #[default]
    Todo,
    InProgress,
    Blocked,
    Done,
}

impl WorkItemStatus {
    /// All statuses in lifecycle order
    pub const ALL: [WorkItemStatus; 4] = [
        WorkItemStatus::Todo,
        WorkItemStatus::InProgress,
        WorkItemStatus::Blocked,
        WorkItemStatus::Done,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkItemStatus::Todo => "Todo",
            WorkItemStatus::InProgress => "InProgress",
            WorkItemStatus::Blocked => "Blocked",
            WorkItemStatus::Done => "Done",
        }
    }
}

impl FromStr for WorkItemStatus {
    type Err = DomainError;

    /// Case-insensitive parse of the wire name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| DomainError::validation("status", format!("Unknown status '{}'", s)))
    }
}

impl TryFrom<String> for WorkItemStatus {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for WorkItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Partial update of a work item; `None` leaves the field unchanged
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkItemUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<WorkItemStatus>,
    pub assigned_to: Option<UserId>,
}

impl WorkItemUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_status(mut self, status: WorkItemStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_assignee(mut self, assignee: UserId) -> Self {
        self.assigned_to = Some(assignee);
        self
    }

    /// True when no field would change
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.assigned_to.is_none()
    }
}

/// Work item entity
///
/// Fields are private so every mutation goes through [`WorkItem::apply`],
/// which keeps the title invariant and the `updated_at >= created_at`
/// invariant intact. Deserialization re-checks both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WorkItemRecord")]
pub struct WorkItem {
    id: WorkItemId,
    title: String,
    description: Option<String>,
    status: WorkItemStatus,
    created_by: UserId,
    assigned_to: Option<UserId>,
    updated_by: UserId,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

// Unchecked wire shape of a stored work item.
#[derive(Deserialize)]
struct WorkItemRecord {
    id: WorkItemId,
    title: String,
    description: Option<String>,
    status: WorkItemStatus,
    created_by: UserId,
    assigned_to: Option<UserId>,
    updated_by: UserId,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<WorkItemRecord> for WorkItem {
    type Error = DomainError;

    fn try_from(record: WorkItemRecord) -> Result<Self, Self::Error> {
        let title = normalize_title(&record.title)?;
        if record.updated_at < record.created_at {
            return Err(DomainError::validation(
                "updated_at",
                "Updated time cannot precede creation time.",
            ));
        }
        Ok(Self {
            id: record.id,
            title,
            description: record.description,
            status: record.status,
            created_by: record.created_by,
            assigned_to: record.assigned_to,
            updated_by: record.updated_by,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }
}

impl WorkItem {
    /// Create a work item without an author
    pub fn new(title: &str, description: Option<String>) -> DomainResult<Self> {
        Self::create(title, description, UserId::system(), None)
    }

    /// Create a work item on behalf of `author`
    pub fn create(
        title: &str,
        description: Option<String>,
        author: UserId,
        assignee: Option<UserId>,
    ) -> DomainResult<Self> {
        let title = normalize_title(title)?;
        let now = Utc::now();
        Ok(Self {
            id: WorkItemId::new(),
            title,
            description,
            status: WorkItemStatus::Todo,
            created_by: author,
            assigned_to: assignee,
            updated_by: author,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn id(&self) -> WorkItemId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn status(&self) -> WorkItemStatus {
        self.status
    }

    pub fn created_by(&self) -> UserId {
        self.created_by
    }

    pub fn assigned_to(&self) -> Option<UserId> {
        self.assigned_to
    }

    pub fn updated_by(&self) -> UserId {
        self.updated_by
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Update title, description and status, keeping the last editor
    pub fn update(
        &mut self,
        title: Option<String>,
        description: Option<String>,
        status: Option<WorkItemStatus>,
    ) -> DomainResult<()> {
        let changes = WorkItemUpdate {
            title,
            description,
            status,
            assigned_to: None,
        };
        let actor = self.updated_by;
        self.apply(&changes, actor)
    }

    /// Apply a partial update on behalf of `actor`.
    ///
    /// The new title is validated before anything is written, so a rejected
    /// update leaves the item exactly as it was. A successful call always
    /// touches `updated_at`, even when no value changed.
    pub fn apply(&mut self, changes: &WorkItemUpdate, actor: UserId) -> DomainResult<()> {
        let title = changes.title.as_deref().map(normalize_title).transpose()?;

        if let Some(title) = title {
            self.title = title;
        }
        if let Some(description) = &changes.description {
            self.description = Some(description.clone());
        }
        if let Some(status) = changes.status {
            self.status = status;
        }
        if let Some(assignee) = changes.assigned_to {
            self.assigned_to = Some(assignee);
        }
        self.updated_by = actor;
        self.touch();
        Ok(())
    }

    // Never moves backwards, even if the wall clock does.
    fn touch(&mut self) {
        self.updated_at = Utc::now().max(self.updated_at);
    }
}

/// Trim a title and enforce the 1..=120 character rule
pub fn normalize_title(title: &str) -> DomainResult<String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation("title", "Title is required."));
    }
    if trimmed.chars().count() > MAX_TITLE_LENGTH {
        return Err(DomainError::validation(
            "title",
            format!("Title must be {} characters or less.", MAX_TITLE_LENGTH),
        ));
    }
    Ok(trimmed.to_string())
}
