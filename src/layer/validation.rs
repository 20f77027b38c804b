//! Validation layer for A2A protocol requests and responses

use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use tower_layer::Layer;
use tower_service::Service;

use crate::{
    protocol::{error::A2AError, operation::A2AOperation, task::TaskState},
    service::{A2ARequest, A2AResponse},
};

/// Layer that validates A2A protocol requests and responses
#[derive(Clone, Debug, Default)]
pub struct A2AValidationLayer;

impl A2AValidationLayer {
    /// Create a new validation layer
    pub fn new() -> Self {
        Self
    }
}

impl<S> Layer<S> for A2AValidationLayer {
    type Service = A2AValidationService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        A2AValidationService { inner }
    }
}

/// Validation service that wraps an inner service
#[derive(Clone)]
pub struct A2AValidationService<S> {
    inner: S,
}

impl<S> A2AValidationService<S> {
    /// Validate an A2A request
    fn validate_request(req: &A2ARequest) -> Result<(), A2AError> {
        match &req.operation {
            A2AOperation::SendTask { task_id, message } => {
                if message.parts.is_empty() {
                    return Err(A2AError::Validation(
                        "Message must have at least one part".into(),
                    ));
                }
                if task_id.as_deref() == Some("") {
                    return Err(A2AError::Validation("Task ID cannot be empty".into()));
                }
            }
            A2AOperation::GetTask { task_id } | A2AOperation::CancelTask { task_id } => {
                if task_id.is_empty() {
                    return Err(A2AError::Validation("Task ID cannot be empty".into()));
                }
            }
            A2AOperation::DiscoverAgent => {}
        }

        if req.context.agent_url.is_empty() {
            return Err(A2AError::Validation("Agent URL cannot be empty".into()));
        }

        Ok(())
    }

    /// Validate an A2A response against the operation that produced it
    fn validate_response(operation: &A2AOperation, resp: &A2AResponse) -> Result<(), A2AError> {
        match (operation, resp) {
            (A2AOperation::DiscoverAgent, A2AResponse::AgentCard(card)) => {
                if card.name.is_empty() {
                    return Err(A2AError::Validation("Agent name cannot be empty".into()));
                }
            }
            (A2AOperation::DiscoverAgent, A2AResponse::Task(_)) => {
                return Err(A2AError::Validation(
                    "Expected an agent card from discovery".into(),
                ));
            }
            (_, A2AResponse::AgentCard(_)) => {
                return Err(A2AError::Validation("Expected a task result".into()));
            }
            (op, A2AResponse::Task(task)) => {
                if task.id.is_empty() {
                    return Err(A2AError::Validation("Task ID cannot be empty".into()));
                }

                let requested = match op {
                    A2AOperation::SendTask { task_id, .. } => task_id.as_deref(),
                    A2AOperation::GetTask { task_id } | A2AOperation::CancelTask { task_id } => {
                        Some(task_id.as_str())
                    }
                    A2AOperation::DiscoverAgent => None,
                };
                if let Some(requested) = requested {
                    if requested != task.id {
                        return Err(A2AError::Validation(format!(
                            "Response task '{}' does not match requested task '{}'",
                            task.id, requested
                        )));
                    }
                }

                if matches!(op, A2AOperation::CancelTask { .. })
                    && task.state != TaskState::Canceled
                {
                    return Err(A2AError::Validation(format!(
                        "Canceled task reported state '{}'",
                        task.state
                    )));
                }
            }
        }

        Ok(())
    }
}

impl<S> Service<A2ARequest> for A2AValidationService<S>
where
    S: Service<A2ARequest, Response = A2AResponse, Error = A2AError> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = A2AResponse;
    type Error = A2AError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: A2ARequest) -> Self::Future {
        if let Err(e) = Self::validate_request(&req) {
            return Box::pin(async move { Err(e) });
        }

        // Take the service that was driven to readiness, leave a fresh clone behind
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let operation = req.operation.clone();

        Box::pin(async move {
            let response = inner.call(req).await?;
            Self::validate_response(&operation, &response)?;
            Ok(response)
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        protocol::{agent::AgentCard, message::Message, task::Task},
        service::RequestContext,
    };

    use super::*;

    fn request(operation: A2AOperation) -> A2ARequest {
        A2ARequest::new(operation, RequestContext::new("http://localhost:8001"))
    }

    #[test]
    fn test_validate_send_task() {
        let req = request(A2AOperation::SendTask {
            task_id: None,
            message: Message::user("Hello"),
        });

        assert!(A2AValidationService::<()>::validate_request(&req).is_ok());
    }

    #[test]
    fn test_validate_empty_message() {
        let mut message = Message::user("Test");
        message.parts.clear();

        let req = request(A2AOperation::SendTask {
            task_id: None,
            message,
        });

        assert!(A2AValidationService::<()>::validate_request(&req).is_err());
    }

    #[test]
    fn test_validate_empty_agent_url() {
        let req = A2ARequest::new(A2AOperation::DiscoverAgent, RequestContext::new(""));
        assert!(A2AValidationService::<()>::validate_request(&req).is_err());
    }

    #[test]
    fn test_validate_task_response_id_mismatch() {
        let op = A2AOperation::GetTask {
            task_id: "task-1".into(),
        };
        let ok = A2AResponse::Task(Box::new(Task::new("task-1")));
        let wrong = A2AResponse::Task(Box::new(Task::new("task-2")));

        assert!(A2AValidationService::<()>::validate_response(&op, &ok).is_ok());
        assert!(A2AValidationService::<()>::validate_response(&op, &wrong).is_err());
    }

    #[test]
    fn test_validate_cancel_response_state() {
        let op = A2AOperation::CancelTask {
            task_id: "task-1".into(),
        };
        let canceled =
            A2AResponse::Task(Box::new(Task::new("task-1").with_state(TaskState::Canceled)));
        let working =
            A2AResponse::Task(Box::new(Task::new("task-1").with_state(TaskState::Working)));

        assert!(A2AValidationService::<()>::validate_response(&op, &canceled).is_ok());
        assert!(A2AValidationService::<()>::validate_response(&op, &working).is_err());
    }

    #[test]
    fn test_validate_discovery_response() {
        let card = AgentCard::new("", "http://x", "1");
        let resp = A2AResponse::AgentCard(Box::new(card));
        assert!(
            A2AValidationService::<()>::validate_response(&A2AOperation::DiscoverAgent, &resp)
                .is_err()
        );
    }

    #[test]
    fn test_new_task_may_take_any_id() {
        let op = A2AOperation::SendTask {
            task_id: None,
            message: Message::user("hi"),
        };
        let resp = A2AResponse::Task(Box::new(Task::new("generated")));
        assert!(A2AValidationService::<()>::validate_response(&op, &resp).is_ok());
    }
}
