//! CivicOps Persistence Layer
//!
//! Infrastructure layer providing repository implementations for domain aggregates.
//! This crate implements the repository interfaces defined in `civicops-domain`.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │             Infrastructure Layer             │
//! │  memory/                                     │
//! │  InMemoryWorkItemRepository                  │
//! └──────────────────────────────────────────────┘
//!                       ▲
//!                       │ implements
//!                       ▼
//! ┌──────────────────────────────────────────────┐
//! │                 Domain Layer                 │
//! │  WorkItemRepository                          │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```
//! use civicops_domain::WorkItemRepository;
//! use civicops_persistence::memory::InMemoryWorkItemRepository;
//! use std::sync::Arc;
//!
//! let repo: Arc<dyn WorkItemRepository> = Arc::new(InMemoryWorkItemRepository::new());
//! assert_eq!(repo.count(), 0);
//! ```

#[cfg(feature = "memory")]
pub mod memory;

#[cfg(feature = "memory")]
pub use memory::InMemoryWorkItemRepository;
