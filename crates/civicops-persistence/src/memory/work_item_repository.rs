//! In-Memory Work Item Repository Implementation

use dashmap::DashMap;
use tracing::debug;

use civicops_domain::{
    errors::DomainResult,
    repositories::{sort_by_recent, WorkItemMutator, WorkItemRepository},
    WorkItem, WorkItemId,
};

/// Thread-safe in-memory implementation of WorkItemRepository
///
/// Backed by a sharded map: operations on different ids only contend when
/// they hash to the same shard. `try_update` holds the entry's write guard
/// for the whole mutation, so updates of one item are serialized.
#[derive(Debug, Default)]
pub struct InMemoryWorkItemRepository {
    items: DashMap<WorkItemId, WorkItem>,
}

impl InMemoryWorkItemRepository {
    /// Create a new empty in-memory work item repository
    pub fn new() -> Self {
        Self {
            items: DashMap::new(),
        }
    }

    /// Create with initial items (useful for testing)
    pub fn with_items(items: Vec<WorkItem>) -> Self {
        let repo = Self::new();
        for item in items {
            repo.items.insert(item.id(), item);
        }
        repo
    }

    /// Clear all items (for testing)
    pub fn clear(&self) {
        self.items.clear();
    }
}

impl WorkItemRepository for InMemoryWorkItemRepository {
    fn add(&self, item: WorkItem) -> WorkItem {
        debug!(id = %item.id(), "storing work item");
        self.items.insert(item.id(), item.clone());
        item
    }

    fn get(&self, id: &WorkItemId) -> Option<WorkItem> {
        self.items.get(id).map(|entry| entry.value().clone())
    }

    fn list(&self) -> Vec<WorkItem> {
        let mut items: Vec<WorkItem> = self
            .items
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        sort_by_recent(&mut items);
        items
    }

    fn try_update(&self, id: &WorkItemId, mutate: WorkItemMutator<'_>) -> DomainResult<bool> {
        let Some(mut entry) = self.items.get_mut(id) else {
            debug!(id = %id, "update skipped, work item not found");
            return Ok(false);
        };

        // Mutate a copy so a failed mutator leaves the stored item intact.
        let mut working = entry.value().clone();
        mutate(&mut working)?;
        *entry = working;

        debug!(id = %id, "work item updated");
        Ok(true)
    }

    fn delete(&self, id: &WorkItemId) -> bool {
        let removed = self.items.remove(id).is_some();
        debug!(id = %id, removed, "delete work item");
        removed
    }

    fn count(&self) -> usize {
        self.items.len()
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;
    use civicops_domain::{DomainError, UserId, WorkItemStatus, WorkItemUpdate};

    fn create_test_item(title: &str) -> WorkItem {
        WorkItem::new(title, None).unwrap()
    }

    #[test]
    fn test_add_and_get() {
        let repo = InMemoryWorkItemRepository::new();
        let item = create_test_item("Fix pothole");
        let id = item.id();

        let stored = repo.add(item.clone());
        assert_eq!(stored, item);
        assert_eq!(repo.get(&id), Some(item));
    }

    #[test]
    fn test_get_not_found() {
        let repo = InMemoryWorkItemRepository::new();
        assert!(repo.get(&WorkItemId::new()).is_none());
    }

    #[test]
    fn test_add_overwrites_same_id() {
        let repo = InMemoryWorkItemRepository::new();
        let mut item = create_test_item("First");
        repo.add(item.clone());

        item.update(Some("Second".into()), None, None).unwrap();
        repo.add(item.clone());

        assert_eq!(repo.count(), 1);
        assert_eq!(repo.get(&item.id()).unwrap().title(), "Second");
    }

    #[test]
    fn test_try_update_missing_id() {
        let repo = InMemoryWorkItemRepository::new();
        let mut called = false;
        let updated = repo
            .try_update(&WorkItemId::new(), &mut |_| {
                called = true;
                Ok(())
            })
            .unwrap();

        assert!(!updated);
        assert!(!called);
        assert_eq!(repo.count(), 0);
    }

    #[test]
    fn test_try_update_applies_changes() {
        let repo = InMemoryWorkItemRepository::new();
        let item = repo.add(create_test_item("Fix pothole"));
        let changes = WorkItemUpdate::new().with_status(WorkItemStatus::InProgress);

        let updated = repo
            .try_update(&item.id(), &mut |wi| wi.apply(&changes, UserId::system()))
            .unwrap();
        assert!(updated);

        let stored = repo.get(&item.id()).unwrap();
        assert_eq!(stored.status(), WorkItemStatus::InProgress);
        assert_eq!(stored.title(), "Fix pothole");
        assert!(stored.updated_at() >= item.updated_at());
    }

    #[test]
    fn test_failed_mutator_leaves_item_untouched() {
        let repo = InMemoryWorkItemRepository::new();
        let item = repo.add(create_test_item("Fix pothole"));
        let changes = WorkItemUpdate::new()
            .with_status(WorkItemStatus::Done)
            .with_title("");

        let result = repo.try_update(&item.id(), &mut |wi| wi.apply(&changes, UserId::system()));
        assert!(matches!(result, Err(DomainError::ValidationError { .. })));
        assert_eq!(repo.get(&item.id()), Some(item));
    }

    #[test]
    fn test_delete() {
        let repo = InMemoryWorkItemRepository::new();
        let item = repo.add(create_test_item("Remove sign"));

        assert!(repo.delete(&item.id()));
        assert!(repo.get(&item.id()).is_none());
        assert!(!repo.delete(&item.id()));
    }

    #[test]
    fn test_list_orders_by_updated_at_desc() {
        let repo = InMemoryWorkItemRepository::new();
        let a = repo.add(create_test_item("A"));
        thread::sleep(std::time::Duration::from_millis(2));
        let b = repo.add(create_test_item("B"));

        let ids: Vec<_> = repo.list().iter().map(|wi| wi.id()).collect();
        assert_eq!(ids, vec![b.id(), a.id()]);

        // Touching A moves it to the front
        thread::sleep(std::time::Duration::from_millis(2));
        repo.try_update(&a.id(), &mut |wi| wi.update(None, None, None))
            .unwrap();
        let ids: Vec<_> = repo.list().iter().map(|wi| wi.id()).collect();
        assert_eq!(ids, vec![a.id(), b.id()]);
    }

    #[test]
    fn test_list_by_status() {
        let repo = InMemoryWorkItemRepository::with_items(vec![
            create_test_item("One"),
            create_test_item("Two"),
        ]);
        let first = repo.list()[0].id();
        repo.try_update(&first, &mut |wi| {
            wi.update(None, None, Some(WorkItemStatus::Blocked))
        })
        .unwrap();

        let blocked = repo.list_by_status(WorkItemStatus::Blocked);
        assert_eq!(blocked.len(), 1);
        assert_eq!(blocked[0].id(), first);
        assert_eq!(repo.list_by_status(WorkItemStatus::Todo).len(), 1);
        assert!(repo.list_by_status(WorkItemStatus::Done).is_empty());
    }

    #[test]
    fn test_concurrent_updates_are_serialized() {
        const THREADS: usize = 8;
        const UPDATES: usize = 50;

        let repo = InMemoryWorkItemRepository::new();
        let item = repo.add(WorkItem::new("Counter", Some("0".into())).unwrap());
        let id = item.id();

        thread::scope(|scope| {
            for _ in 0..THREADS {
                scope.spawn(|| {
                    for _ in 0..UPDATES {
                        repo.try_update(&id, &mut |wi| {
                            let next = wi
                                .description()
                                .and_then(|d| d.parse::<usize>().ok())
                                .unwrap_or(0)
                                + 1;
                            wi.update(None, Some(next.to_string()), None)
                        })
                        .unwrap();
                    }
                });
            }
        });

        let total = (THREADS * UPDATES).to_string();
        assert_eq!(repo.get(&id).unwrap().description(), Some(total.as_str()));
    }

    #[test]
    fn test_concurrent_adds_on_distinct_ids() {
        let repo = InMemoryWorkItemRepository::new();

        thread::scope(|scope| {
            for t in 0..4 {
                let repo = &repo;
                scope.spawn(move || {
                    for i in 0..25 {
                        repo.add(create_test_item(&format!("item {t}-{i}")));
                    }
                });
            }
        });

        assert_eq!(repo.count(), 100);
        repo.clear();
        assert_eq!(repo.count(), 0);
    }
}
