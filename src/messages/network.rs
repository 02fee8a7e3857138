//! Network messages - communication between App and Network layers

use crate::api::{ApiCall, Reply, RequestFailure};

/// Commands sent from App layer to Network layer
#[derive(Debug, Clone, PartialEq)]
pub enum NetworkCommand {
    /// Execute an API call; the reply carries the same id
    Call { id: u64, call: ApiCall },

    /// Shutdown the network actor
    Shutdown,
}

/// Responses sent from Network layer to App layer
#[derive(Debug, Clone)]
pub enum NetworkResponse {
    Completed {
        id: u64,
        result: Result<Reply, RequestFailure>,
    },
}
