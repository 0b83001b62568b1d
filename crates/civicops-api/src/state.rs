//! Application state for the API server

use std::sync::Arc;
use std::time::Instant;

use civicops_config::AppConfig;
use civicops_domain::WorkItemRepository;
use civicops_persistence::InMemoryWorkItemRepository;

use crate::auth::JwtService;

/// Application state shared across all API handlers
#[derive(Clone)]
pub struct AppState {
    /// Work item store
    pub work_items: Arc<dyn WorkItemRepository>,
    /// Token issuer and verifier
    pub jwt: Arc<JwtService>,
    /// Loaded configuration
    pub config: Arc<AppConfig>,
    /// Server start time for uptime calculation
    pub start_time: Instant,
}

impl AppState {
    /// Create state around an existing repository
    pub fn new(config: AppConfig, work_items: Arc<dyn WorkItemRepository>) -> Self {
        Self {
            work_items,
            jwt: Arc::new(JwtService::new(&config.jwt)),
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }

    /// Create state backed by a fresh in-memory repository
    pub fn in_memory(config: AppConfig) -> Self {
        Self::new(config, Arc::new(InMemoryWorkItemRepository::new()))
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
