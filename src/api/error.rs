//! Response shape and the shared failure handler

use serde_json::Value;
use thiserror::Error;

use crate::routes::LOGIN_PATH;

/// Uniform response shape handed to screens.
///
/// `status` is `None` when no response was received at all.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ApiResponse {
    pub status: Option<u16>,
    pub data: Option<Value>,
}

impl ApiResponse {
    pub fn new(status: u16, data: Value) -> Self {
        ApiResponse {
            status: Some(status),
            data: Some(data),
        }
    }

    /// The degraded shape used when the server never answered
    pub fn unreachable() -> Self {
        ApiResponse::default()
    }

    pub fn is_ok(&self) -> bool {
        self.status == Some(200)
    }

    /// `detail` field of an error body, rendered as text
    pub fn detail(&self) -> Option<String> {
        let detail = self.data.as_ref()?.get("detail")?;
        match detail {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            // validation errors come back as a list of {loc, msg, type}
            Value::Array(items) => Some(
                items
                    .iter()
                    .map(|item| match item.get("msg").and_then(Value::as_str) {
                        Some(msg) => {
                            let field = item
                                .get("loc")
                                .and_then(Value::as_array)
                                .and_then(|loc| loc.last())
                                .and_then(Value::as_str);
                            match field {
                                Some(field) => format!("{}: {}", field, msg),
                                None => msg.to_string(),
                            }
                        }
                        None => item.to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join("\n"),
            ),
            other => Some(other.to_string()),
        }
    }
}

/// Why a call did not produce a 2xx response
#[derive(Clone, Debug, Error, PartialEq)]
pub enum RequestFailure {
    /// The server responded with a status outside 2xx
    #[error("server responded with status {status:?}", status = .0.status)]
    Server(ApiResponse),

    /// The request went out but no response came back
    #[error("no response: {0}")]
    NoResponse(String),

    /// The request could not be built
    #[error("request setup failed: {0}")]
    Setup(String),
}

impl From<reqwest::Error> for RequestFailure {
    fn from(e: reqwest::Error) -> Self {
        if e.is_builder() {
            RequestFailure::Setup(e.to_string())
        } else if e.is_timeout() {
            RequestFailure::NoResponse(format!("request timed out: {}", e))
        } else if e.is_connect() {
            RequestFailure::NoResponse(format!("connection failed: {}", e))
        } else {
            RequestFailure::NoResponse(e.to_string())
        }
    }
}

/// What the caller should do after a failure
#[derive(Clone, Debug, PartialEq)]
pub enum Handled {
    /// Continue with this response and inspect its status
    Response(ApiResponse),
    /// Not authenticated: navigate to the login route
    RedirectToLogin,
    /// Nothing to hand back; the failure was logged
    Nothing,
}

/// Classify a failure the same way for every endpoint.
///
/// `current_path` is the route visible when the reply arrived; a 401 on the
/// login route itself is returned to the caller instead of redirecting.
pub fn handle_failure(failure: RequestFailure, current_path: &str) -> Handled {
    match failure {
        RequestFailure::Server(response) => {
            tracing::warn!(
                status = ?response.status,
                data = ?response.data,
                "Server returned an error response"
            );
            if response.status == Some(401) {
                if current_path != LOGIN_PATH {
                    tracing::info!(from = current_path, "Unauthorized; redirecting to login");
                    return Handled::RedirectToLogin;
                }
                return Handled::Response(response);
            }
            Handled::Response(response)
        }
        RequestFailure::NoResponse(message) => {
            tracing::warn!(%message, "Request received no response");
            Handled::Response(ApiResponse::unreachable())
        }
        RequestFailure::Setup(message) => {
            tracing::error!(%message, "Request setup failed");
            Handled::Nothing
        }
    }
}
