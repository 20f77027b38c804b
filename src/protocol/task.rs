//! A2A task types and lifecycle state

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{message::Message, message::Role, Artifact};

/// A task in the A2A protocol
///
/// Tasks carry the whole conversation for one unit of work. The message history
/// is append-only: messages are never reordered or removed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    /// Unique identifier for the task
    pub id: String,

    /// Current lifecycle state
    pub state: TaskState,

    /// Conversation history, oldest first
    #[serde(default)]
    pub messages: Vec<Message>,

    /// Task outputs
    #[serde(default)]
    pub artifacts: Vec<Artifact>,

    /// Error text (present if the task failed)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Task {
    /// Create a new task in the `submitted` state
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            state: TaskState::Submitted,
            messages: Vec::new(),
            artifacts: Vec::new(),
            error: None,
        }
    }

    /// Append a message to the history
    pub fn with_message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }

    /// Update the task state
    pub fn with_state(mut self, state: TaskState) -> Self {
        self.state = state;
        self
    }

    /// Append the agent's reply and mark the task completed
    pub fn complete(mut self, reply: impl Into<String>) -> Self {
        self.messages.push(Message::agent(reply));
        self.state = TaskState::Completed;
        self
    }

    /// Mark the task failed with the given error text
    pub fn fail(mut self, error: impl Into<String>) -> Self {
        self.state = TaskState::Failed;
        self.error = Some(error.into());
        self
    }

    /// The most recent message, if any
    pub fn latest_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// The most recent message sent by the agent
    pub fn latest_agent_message(&self) -> Option<&Message> {
        self.messages.iter().rev().find(|m| m.role == Role::Agent)
    }

    /// Check if the task is in a terminal state
    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }
}

/// Task state in the A2A protocol lifecycle
///
/// submitted → working → completed / failed / canceled / input-required.
/// A new message on any task moves it back to working.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum TaskState {
    /// Task has been received and not yet processed
    Submitted,

    /// Task is being processed
    Working,

    /// Task requires additional input from the client
    InputRequired,

    /// Task completed successfully
    Completed,

    /// Task failed with an error
    Failed,

    /// Task was canceled by the client
    Canceled,
}

impl TaskState {
    /// Check if this is a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TaskState::Completed | TaskState::Failed | TaskState::Canceled
        )
    }

    /// Check if a skill handler has moved the task out of processing
    pub fn is_settled(&self) -> bool {
        !matches!(self, TaskState::Submitted | TaskState::Working)
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TaskState::Submitted => "submitted",
            TaskState::Working => "working",
            TaskState::InputRequired => "input-required",
            TaskState::Completed => "completed",
            TaskState::Failed => "failed",
            TaskState::Canceled => "canceled",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_creation() {
        let task = Task::new("task-123").with_message(Message::user("Test"));

        assert_eq!(task.id, "task-123");
        assert_eq!(task.state, TaskState::Submitted);
        assert_eq!(task.messages.len(), 1);
        assert!(!task.is_terminal());
    }

    #[test]
    fn test_task_complete_appends_agent_reply() {
        let task = Task::new("t")
            .with_message(Message::user("ping"))
            .complete("pong");

        assert_eq!(task.state, TaskState::Completed);
        assert_eq!(task.messages.len(), 2);
        assert_eq!(
            task.latest_agent_message().and_then(|m| m.first_text()),
            Some("pong")
        );
    }

    #[test]
    fn test_task_state() {
        assert!(TaskState::Completed.is_terminal());
        assert!(TaskState::Canceled.is_terminal());
        assert!(!TaskState::InputRequired.is_terminal());

        assert!(TaskState::InputRequired.is_settled());
        assert!(!TaskState::Working.is_settled());
        assert!(!TaskState::Submitted.is_settled());
    }

    #[test]
    fn test_task_serialization() {
        let task = Task::new("task-123").with_state(TaskState::InputRequired);

        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["id"], "task-123");
        assert_eq!(json["state"], "input-required");
        assert!(json["messages"].is_array());
        assert!(json["artifacts"].is_array());
        assert!(json.get("error").is_none());

        let deserialized: Task = serde_json::from_value(json).unwrap();
        assert_eq!(task, deserialized);
    }

    #[test]
    fn test_failed_task_carries_error() {
        let task = Task::new("t").fail("boom");
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["state"], "failed");
        assert_eq!(json["error"], "boom");
    }

    #[test]
    fn test_state_display_matches_wire() {
        for state in [
            TaskState::Submitted,
            TaskState::Working,
            TaskState::InputRequired,
            TaskState::Completed,
            TaskState::Failed,
            TaskState::Canceled,
        ] {
            let wire = serde_json::to_value(state).unwrap();
            assert_eq!(wire, state.to_string());
        }
    }
}
