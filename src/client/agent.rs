//! High-level A2A agent client

use tower::{util::BoxCloneService, ServiceExt};
use tower_service::Service;
use tracing::warn;

use crate::{
    client::config::ClientConfig,
    protocol::{
        error::{A2AError, CommunicationFailure},
        A2AOperation, AgentCard, Message, Task,
    },
    service::{A2ARequest, A2AResponse, RequestContext},
};

/// Client over the type-erased service stack produced by [`A2AClientBuilder`]
///
/// [`A2AClientBuilder`]: crate::client::A2AClientBuilder
pub type A2AClient = AgentClient<BoxCloneService<A2ARequest, A2AResponse, A2AError>>;

/// High-level A2A client for interacting with agents
///
/// This client wraps a Tower service and provides one method per protocol
/// operation. Every failure, whatever its cause, comes back as a
/// [`CommunicationFailure`].
///
/// # Example
///
/// ```rust,no_run
/// use a2a_mesh::prelude::*;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let url = "http://localhost:8001".parse()?;
/// let mut client = A2AClientBuilder::new_http(url).build()?;
///
/// let task = client.send_task(Message::user("2 + 2")).await?;
/// println!("Task {} is {}", task.id, task.state);
/// # Ok(())
/// # }
/// ```
pub struct AgentClient<S> {
    service: S,
    config: ClientConfig,
}

impl<S> AgentClient<S>
where
    S: Service<A2ARequest, Response = A2AResponse, Error = A2AError>,
{
    /// Create a new agent client
    ///
    /// # Arguments
    ///
    /// * `service` - The Tower service that handles requests
    /// * `config` - Client configuration
    pub fn new(service: S, config: ClientConfig) -> Self {
        Self { service, config }
    }

    /// Get the client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn build_context(&self) -> RequestContext {
        RequestContext::new(self.config.agent_url.clone()).with_timeout(self.config.timeout)
    }

    /// Drive the service to readiness and execute one operation
    async fn execute(&mut self, operation: A2AOperation) -> Result<A2AResponse, CommunicationFailure> {
        let request = A2ARequest::new(operation, self.build_context());

        let result = match self.service.ready().await {
            Ok(service) => service.call(request).await,
            Err(e) => Err(e),
        };

        result.map_err(|e| {
            warn!(agent = %self.config.agent_url, error = %e, "A2A call failed");
            CommunicationFailure::from(e)
        })
    }

    async fn execute_for_task(
        &mut self,
        operation: A2AOperation,
    ) -> Result<Task, CommunicationFailure> {
        self.execute(operation).await?.into_task().ok_or_else(|| {
            CommunicationFailure("Expected task response from agent".to_string())
        })
    }

    /// Send a message to the agent, creating a new task
    ///
    /// # Returns
    ///
    /// The task after the agent's skill handler has run
    pub async fn send_task(&mut self, message: Message) -> Result<Task, CommunicationFailure> {
        self.execute_for_task(A2AOperation::SendTask {
            task_id: None,
            message,
        })
        .await
    }

    /// Send a message continuing an existing task
    ///
    /// Unknown ids create a task with that id on the agent.
    pub async fn send_task_to(
        &mut self,
        task_id: impl Into<String>,
        message: Message,
    ) -> Result<Task, CommunicationFailure> {
        self.execute_for_task(A2AOperation::SendTask {
            task_id: Some(task_id.into()),
            message,
        })
        .await
    }

    /// Get a task by ID
    pub async fn get_task(
        &mut self,
        task_id: impl Into<String>,
    ) -> Result<Task, CommunicationFailure> {
        self.execute_for_task(A2AOperation::GetTask {
            task_id: task_id.into(),
        })
        .await
    }

    /// Cancel a task by ID
    ///
    /// Canceling an already canceled task succeeds.
    pub async fn cancel_task(
        &mut self,
        task_id: impl Into<String>,
    ) -> Result<Task, CommunicationFailure> {
        self.execute_for_task(A2AOperation::CancelTask {
            task_id: task_id.into(),
        })
        .await
    }

    /// Discover agent capabilities by fetching the Agent Card
    ///
    /// This retrieves the agent's metadata from `/.well-known/agent.json`
    pub async fn discover(&mut self) -> Result<AgentCard, CommunicationFailure> {
        self.execute(A2AOperation::DiscoverAgent)
            .await?
            .into_agent_card()
            .ok_or_else(|| CommunicationFailure("Expected agent card from discovery".to_string()))
    }
}
