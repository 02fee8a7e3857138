//! Network layer - API call execution
//!
//! The Network actor receives call commands and sends back replies.

pub mod actor;

pub use actor::NetworkActor;
