//! A2A service response types

use crate::protocol::{agent::AgentCard, task::Task};

/// Response from an A2A service operation
#[derive(Debug, Clone)]
pub enum A2AResponse {
    /// Task response (from SendTask, GetTask, CancelTask)
    Task(Box<Task>),

    /// Agent card response (from DiscoverAgent)
    AgentCard(Box<AgentCard>),
}

impl A2AResponse {
    /// Extract a task from the response, if present
    pub fn into_task(self) -> Option<Task> {
        match self {
            A2AResponse::Task(task) => Some(*task),
            _ => None,
        }
    }

    /// Extract an agent card from the response, if present
    pub fn into_agent_card(self) -> Option<AgentCard> {
        match self {
            A2AResponse::AgentCard(card) => Some(*card),
            _ => None,
        }
    }
}
