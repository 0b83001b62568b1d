//! Value objects representing immutable domain concepts

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Work item identifier - a UUID-based identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkItemId(uuid::Uuid);

impl WorkItemId {
    /// Generate a new random work item ID
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Create from string representation
    pub fn from_string(s: &str) -> Result<Self, DomainError> {
        uuid::Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| DomainError::InvalidIdentifier {
                reason: format!("'{}' is not a valid work item id: {}", s, e),
            })
    }

    /// Underlying UUID
    pub fn as_uuid(&self) -> uuid::Uuid {
        self.0
    }
}

impl From<uuid::Uuid> for WorkItemId {
    fn from(id: uuid::Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for WorkItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Default for WorkItemId {
    fn default() -> Self {
        Self::new()
    }
}

/// User identifier, taken from the token subject
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(uuid::Uuid);

impl UserId {
    /// The nil user, used when no caller identity is available
    pub fn system() -> Self {
        Self(uuid::Uuid::nil())
    }

    /// Parse a subject claim, falling back to the nil user
    pub fn from_subject(subject: Option<&str>) -> Self {
        subject
            .and_then(|s| uuid::Uuid::parse_str(s).ok())
            .map(Self)
            .unwrap_or_else(Self::system)
    }

    /// Whether this is the nil user
    pub fn is_system(&self) -> bool {
        self.0.is_nil()
    }

    /// Underlying UUID
    pub fn as_uuid(&self) -> uuid::Uuid {
        self.0
    }
}

impl From<uuid::Uuid> for UserId {
    fn from(id: uuid::Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// User roles carried in access tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Role {
    Admin,
    #[default]
    Staff,
}

impl Role {
    /// Parse a role claim; unknown or missing roles fall back to `Staff`
    pub fn from_claim(claim: Option<&str>) -> Self {
        claim.and_then(|c| c.parse().ok()).unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Staff => "Staff",
        }
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "staff" => Ok(Role::Staff),
            other => Err(DomainError::validation(
                "role",
                format!("Unknown role '{}'", other),
            )),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
