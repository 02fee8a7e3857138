//! # DQ Console
//!
//! A terminal administration console for a data-quality REST service.
//!
//! ## Features
//! - List screens for teams, actions, datasources, datasets, expectations,
//!   validations and suggestions
//! - Create/update modal with fixed forms and forms generated from
//!   server-supplied JSON Schema
//! - Delete confirmation, suggestion enabling, dataset validation
//! - Cookie session with login redirect on 401
//! - Dashboard metrics and issues with JSON highlighting
//!
//! ## Architecture
//! Actor-based with channels:
//! - UI Layer (Ratatui) - synchronous
//! - App Layer (State machine)
//! - Network Layer (Tokio runtime)

pub mod api;
pub mod app;
pub mod config;
pub mod constants;
pub mod forms;
pub mod messages;
pub mod models;
pub mod network;
pub mod routes;
pub mod ui;

// Re-export commonly used types
pub use api::{ApiCall, ApiClient, ApiResponse, RequestFailure};
pub use config::Config;
pub use messages::{UiEvent, NetworkCommand, NetworkResponse, RenderState};
pub use app::{AppState, AppActor};
pub use network::NetworkActor;
