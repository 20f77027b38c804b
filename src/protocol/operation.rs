//! A2A protocol operations

use std::{fmt, str::FromStr};

use super::message::Message;

/// Path of the discovery document
pub const AGENT_CARD_PATH: &str = "/.well-known/agent.json";

/// Path of the JSON-RPC protocol endpoint
pub const RPC_PATH: &str = "/";

/// The fixed set of JSON-RPC methods every agent implements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// `tasks/get`
    GetTask,
    /// `tasks/send`
    SendTask,
    /// `tasks/cancel`
    CancelTask,
}

impl Method {
    /// Wire name of the method
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::GetTask => "tasks/get",
            Method::SendTask => "tasks/send",
            Method::CancelTask => "tasks/cancel",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a method name is not part of the protocol
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMethod(pub String);

impl FromStr for Method {
    type Err = UnknownMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tasks/get" => Ok(Method::GetTask),
            "tasks/send" => Ok(Method::SendTask),
            "tasks/cancel" => Ok(Method::CancelTask),
            other => Err(UnknownMethod(other.to_string())),
        }
    }
}

/// A2A protocol operations issued by a client
///
/// The three task methods travel as JSON-RPC envelopes; discovery is a plain
/// document read.
#[derive(Debug, Clone)]
pub enum A2AOperation {
    /// Send a message, creating the task or continuing an existing one
    SendTask {
        /// Optional task ID to continue
        task_id: Option<String>,

        /// The message to send
        message: Message,
    },

    /// Get a task by ID
    GetTask {
        /// The task ID to retrieve
        task_id: String,
    },

    /// Cancel a task
    CancelTask {
        /// The task ID to cancel
        task_id: String,
    },

    /// Discover agent capabilities (fetch Agent Card)
    DiscoverAgent,
}

impl A2AOperation {
    /// JSON-RPC method for this operation, `None` for discovery
    pub fn rpc_method(&self) -> Option<Method> {
        match self {
            A2AOperation::SendTask { .. } => Some(Method::SendTask),
            A2AOperation::GetTask { .. } => Some(Method::GetTask),
            A2AOperation::CancelTask { .. } => Some(Method::CancelTask),
            A2AOperation::DiscoverAgent => None,
        }
    }

    /// Get the HTTP endpoint path for this operation
    pub fn endpoint(&self) -> &'static str {
        match self {
            A2AOperation::DiscoverAgent => AGENT_CARD_PATH,
            _ => RPC_PATH,
        }
    }

    /// Get the HTTP method for this operation
    pub fn method(&self) -> &'static str {
        match self {
            A2AOperation::DiscoverAgent => "GET",
            _ => "POST",
        }
    }
}
