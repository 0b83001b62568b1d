//! In-Memory Repository Implementations
//!
//! Thread-safe in-memory implementations of domain repository interfaces.
//! State lives for the lifetime of the process only.

mod work_item_repository;

pub use work_item_repository::InMemoryWorkItemRepository;
