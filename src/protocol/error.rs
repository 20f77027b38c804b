//! Error types for A2A protocol operations

use thiserror::Error;

/// JSON-RPC code: payload is not well-formed JSON
pub const PARSE_ERROR: i64 = -32700;
/// JSON-RPC code: well-formed but missing required fields
pub const INVALID_REQUEST: i64 = -32600;
/// JSON-RPC code: method outside the fixed set
pub const METHOD_NOT_FOUND: i64 = -32601;
/// JSON-RPC code: uncaught fault inside the dispatcher
pub const INTERNAL_ERROR: i64 = -32603;
/// A2A code: no task with the given id
pub const TASK_NOT_FOUND: i64 = -32001;

/// Client-side error type for A2A protocol operations
///
/// These are the fine-grained causes seen inside the client stack. They are
/// collapsed into [`CommunicationFailure`] before reaching callers.
#[derive(Debug, Error)]
pub enum A2AError {
    /// Transport-level error (network, connection, HTTP status)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Protocol-level error (malformed envelope, unexpected result shape)
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Validation error (invalid request or response)
    #[error("Validation error: {0}")]
    Validation(String),

    /// The remote agent answered with a JSON-RPC error envelope
    #[error("JSON-RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Request timeout error
    #[error("Request timeout")]
    Timeout,
}

impl From<reqwest::Error> for A2AError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            A2AError::Timeout
        } else if err.is_connect() {
            A2AError::Transport(format!("Connection error: {}", err))
        } else {
            A2AError::Transport(err.to_string())
        }
    }
}

/// The single failure outcome of an agent client call
///
/// Transport failures, bad HTTP statuses, unparsable bodies, error envelopes and
/// structurally invalid envelopes all end up here with a diagnostic string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct CommunicationFailure(pub String);

impl From<A2AError> for CommunicationFailure {
    fn from(err: A2AError) -> Self {
        CommunicationFailure(err.to_string())
    }
}

/// Protocol-level errors returned to callers as JSON-RPC error envelopes
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RpcError {
    /// Inbound payload is not well-formed JSON
    #[error("Parse error")]
    Parse,

    /// Well-formed payload missing a required field
    #[error("Invalid Request: {0}")]
    InvalidRequest(String),

    /// Method is not one of the protocol methods
    #[error("Method '{0}' not found")]
    MethodNotFound(String),

    /// No task with the requested id
    #[error("Task not found")]
    TaskNotFound,

    /// Uncaught fault inside the dispatcher
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RpcError {
    /// The JSON-RPC error code for this error
    pub fn code(&self) -> i64 {
        match self {
            RpcError::Parse => PARSE_ERROR,
            RpcError::InvalidRequest(_) => INVALID_REQUEST,
            RpcError::MethodNotFound(_) => METHOD_NOT_FOUND,
            RpcError::TaskNotFound => TASK_NOT_FOUND,
            RpcError::Internal(_) => INTERNAL_ERROR,
        }
    }
}

/// Failure raised by a skill handler
///
/// Never surfaces as a protocol error: the dispatcher records it on the task as
/// `failed` with this text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct HandlerError(pub String);

impl HandlerError {
    pub fn new(message: impl Into<String>) -> Self {
        HandlerError(message.into())
    }
}
