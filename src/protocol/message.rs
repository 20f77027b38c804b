//! A2A message types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A message in the A2A protocol
///
/// Messages are the unit of conversation inside a task. Each message has a role
/// (user or agent) and an ordered list of parts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    /// Role of the message sender
    #[serde(default)]
    pub role: Role,

    /// Message content parts
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Message {
    /// Create a new message with a single text part
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            parts: vec![Part::text(text)],
        }
    }

    /// Create a user message with text content
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, text)
    }

    /// Create an agent message with text content
    pub fn agent(text: impl Into<String>) -> Self {
        Self::new(Role::Agent, text)
    }

    /// Add a message part
    pub fn with_part(mut self, part: Part) -> Self {
        self.parts.push(part);
        self
    }

    /// Concatenation of every text part, in order
    pub fn text(&self) -> String {
        self.parts.iter().filter_map(Part::as_text).collect()
    }

    /// The first text part, if any
    pub fn first_text(&self) -> Option<&str> {
        self.parts.iter().find_map(Part::as_text)
    }
}

/// Role of a message sender
#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Message from a user (or from an agent acting as a client)
    #[default]
    User,

    /// Message from the agent handling the task
    Agent,
}

/// Discriminator for text parts; only ever serializes as `"text"`
#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TextKind {
    #[default]
    #[serde(rename = "text")]
    Text,
}

/// A text part: `{"type": "text", "text": "..."}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TextPart {
    #[serde(rename = "type")]
    pub kind: TextKind,

    /// The text content
    pub text: String,

    /// Any other fields (e.g. `metadata`), kept as received
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A part of a message
///
/// Parts are keyed by their `type` field. Only text parts are interpreted;
/// anything else is carried as an opaque JSON value and written back unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Part {
    /// Text content
    Text(TextPart),

    /// Unrecognized part, preserved verbatim
    Opaque(Value),
}

impl Part {
    /// Create a text part
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(TextPart {
            kind: TextKind::Text,
            text: text.into(),
            extra: Map::new(),
        })
    }

    /// The text content if this is a text part
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Part::Text(part) => Some(&part.text),
            Part::Opaque(_) => None,
        }
    }
}
