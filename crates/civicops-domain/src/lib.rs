//! CivicOps Domain Layer
//!
//! Work item entity, its status lifecycle, identity value objects and the
//! repository contract implemented by the persistence layer.

pub mod entities;
pub mod errors;
pub mod repositories;
pub mod value_objects;

pub use entities::{normalize_title, WorkItem, WorkItemStatus, WorkItemUpdate, MAX_TITLE_LENGTH};
pub use errors::{DomainError, DomainResult};
pub use repositories::{WorkItemMutator, WorkItemRepository};
pub use value_objects::{Role, UserId, WorkItemId};
