//! Core A2A protocol types and definitions

use serde::{Deserialize, Serialize};

pub mod agent;
pub mod error;
pub mod message;
pub mod operation;
pub mod task;

pub use agent::{AgentCapabilities, AgentCard, AgentProvider, AgentSkill};
pub use error::{A2AError, CommunicationFailure, HandlerError, RpcError};
pub use message::{Message, Part, Role, TextPart};
pub use operation::{A2AOperation, Method};
pub use task::{Task, TaskState};

/// Artifacts represent task outputs
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Artifact {
    /// Unique identifier of the Artifact
    pub id: String,

    /// MIME type of the artifact content
    #[serde(rename = "mimeType")]
    pub mime_type: String,

    /// Contents of the Artifact
    #[serde(default)]
    pub parts: Vec<Part>,
}
