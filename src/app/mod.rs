//! App layer - central state management and command processing
//!
//! The App actor receives UI events, network responses and timer events,
//! updates state, and emits network commands and render state.

pub mod state;
pub mod actor;
pub mod commands;
pub mod modal;
pub mod screen;

pub use state::{AppState, Effect, TimerEvent};
pub use actor::AppActor;
