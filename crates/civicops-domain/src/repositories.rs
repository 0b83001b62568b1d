//! Repository interfaces for work item storage
//!
//! The domain layer defines only the contract; implementations live in
//! infrastructure crates such as `civicops-persistence`.

use crate::{
    entities::{WorkItem, WorkItemStatus},
    errors::DomainResult,
    value_objects::WorkItemId,
};

/// Mutation applied by [`WorkItemRepository::try_update`]
pub type WorkItemMutator<'a> = &'a mut dyn FnMut(&mut WorkItem) -> DomainResult<()>;

/// Authoritative store for work items
///
/// Implementations must be safe to share between threads. Operations on
/// different ids never interfere, and `try_update` runs its mutator as a
/// single atomic unit with respect to other updates of the same id.
pub trait WorkItemRepository: Send + Sync {
    /// Store an item under its id, replacing any previous entry
    fn add(&self, item: WorkItem) -> WorkItem;

    /// Find an item by id
    fn get(&self, id: &WorkItemId) -> Option<WorkItem>;

    /// All items, most recently updated first
    fn list(&self) -> Vec<WorkItem>;

    /// Apply `mutate` to the stored item.
    ///
    /// Returns `Ok(false)` when the id is unknown. If the mutator fails the
    /// stored item is left untouched and the error is returned.
    fn try_update(&self, id: &WorkItemId, mutate: WorkItemMutator<'_>) -> DomainResult<bool>;

    /// Remove an item, returning whether it existed
    fn delete(&self, id: &WorkItemId) -> bool;

    /// Number of stored items
    fn count(&self) -> usize;

    /// Items with the given status, most recently updated first
    fn list_by_status(&self, status: WorkItemStatus) -> Vec<WorkItem> {
        self.list()
            .into_iter()
            .filter(|item| item.status() == status)
            .collect()
    }
}

/// Sort items by `updated_at`, newest first
pub fn sort_by_recent(items: &mut [WorkItem]) {
    items.sort_by(|a, b| b.updated_at().cmp(&a.updated_at()));
}
