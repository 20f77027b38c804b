//! A2A service request types

use std::time::Duration;

use crate::{client::config::DEFAULT_TIMEOUT, protocol::operation::A2AOperation};

/// A request to the A2A service
///
/// This wraps an A2A operation with the context needed for execution
#[derive(Debug, Clone)]
pub struct A2ARequest {
    /// The A2A operation to execute
    pub operation: A2AOperation,

    /// Request context (target, timeout)
    pub context: RequestContext,
}

impl A2ARequest {
    /// Create a new A2A request
    pub fn new(operation: A2AOperation, context: RequestContext) -> Self {
        Self { operation, context }
    }
}

/// Request context
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Base URL of the target agent
    pub agent_url: String,

    /// Upper bound on the whole call; no retry follows
    pub timeout: Duration,
}

impl RequestContext {
    /// Create a new request context with the default timeout
    pub fn new(agent_url: impl Into<String>) -> Self {
        Self {
            agent_url: agent_url.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
