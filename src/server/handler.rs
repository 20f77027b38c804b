//! Skill handler seam

use async_trait::async_trait;

use crate::protocol::{HandlerError, Message, Role, Task};

/// One agent's domain logic
///
/// A handler receives the task after the new message has been recorded and
/// returns it moved to `completed`, `failed` or `input-required`, normally
/// with one agent message appended. It may await its own I/O, such as calls
/// to other agents. Returning `Err` marks the task failed with the error text.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SkillHandler: Send + Sync {
    async fn handle(&self, task: Task) -> Result<Task, HandlerError>;
}

/// The latest message of a task, which must come from the user
pub fn latest_user_message(task: &Task) -> Result<&Message, HandlerError> {
    let message = task
        .latest_message()
        .ok_or_else(|| HandlerError::new("No messages provided"))?;

    if message.role != Role::User {
        return Err(HandlerError::new("Expected a user message"));
    }

    Ok(message)
}

/// The text a user asked for: every text part of the latest message, joined
pub fn read_query(task: &Task) -> Result<String, HandlerError> {
    latest_user_message(task).map(Message::text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_query() {
        let task = Task::new("t").with_message(Message::user("2 + 2"));
        assert_eq!(read_query(&task).unwrap(), "2 + 2");
    }

    #[test]
    fn test_read_query_without_messages() {
        let err = read_query(&Task::new("t")).unwrap_err();
        assert_eq!(err.to_string(), "No messages provided");
    }

    #[test]
    fn test_read_query_rejects_agent_message() {
        let task = Task::new("t").with_message(Message::agent("hello"));
        let err = read_query(&task).unwrap_err();
        assert_eq!(err.to_string(), "Expected a user message");
    }
}
