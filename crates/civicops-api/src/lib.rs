#![warn(missing_docs)]

//! CivicOps RESTful API
//!
//! JWT-authenticated CRUD endpoints for civic work items, backed by the
//! in-memory repository from `civicops-persistence`.

#[allow(missing_docs)]
pub mod auth;
#[allow(missing_docs)]
pub mod error;
pub mod handlers;
pub mod middleware;
#[allow(missing_docs)]
pub mod models;
pub mod routes;
pub mod server;
pub mod state;

pub use server::ApiServer;
pub use state::AppState;
