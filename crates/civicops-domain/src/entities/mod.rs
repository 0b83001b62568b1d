//! Core domain entities with business logic and validation
//!
//! - `work_item`: work item entity, status and partial updates

mod work_item;

pub use work_item::*;
