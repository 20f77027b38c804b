//! Client builder for constructing A2A clients with composable layers

use std::{sync::Arc, time::Duration};

use tower::{util::BoxCloneService, ServiceBuilder};
use url::Url;

use crate::{
    client::{A2AClient, AgentClient, ClientConfig, DEFAULT_TIMEOUT},
    codec::{Codec, JsonRpcCodec},
    layer::A2AValidationLayer,
    protocol::error::A2AError,
    service::A2AProtocolService,
    transport::{HttpTransport, Transport},
};

/// Builder for constructing A2A clients
///
/// This builder provides a fluent API for configuring and building an A2A client
/// with a customizable transport, codec, timeout and validation.
///
/// # Example
///
/// ```rust,no_run
/// use a2a_mesh::prelude::*;
/// use std::time::Duration;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let url = "http://localhost:8002".parse()?;
/// let mut client = A2AClientBuilder::new_http(url)
///     .with_timeout(Duration::from_secs(10))
///     .build()?;
///
/// let agent_card = client.discover().await?;
/// println!("Connected to: {}", agent_card.name);
/// # Ok(())
/// # }
/// ```
pub struct A2AClientBuilder<T: Transport> {
    agent_url: Url,
    transport: Option<T>,
    codec: Option<Arc<dyn Codec>>,
    timeout: Duration,
    validate_responses: bool,
}

impl<T: Transport> A2AClientBuilder<T> {
    /// Create a builder without a transport; call [`with_transport`](Self::with_transport)
    pub fn new(agent_url: Url) -> Self {
        Self {
            agent_url,
            transport: None,
            codec: None,
            timeout: DEFAULT_TIMEOUT,
            validate_responses: true,
        }
    }

    /// Use a custom transport
    pub fn with_transport(mut self, transport: T) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Use a custom codec (default: JSON-RPC)
    pub fn with_codec(mut self, codec: Arc<dyn Codec>) -> Self {
        self.codec = Some(codec);
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Enable or disable request/response validation (default: true)
    pub fn with_validation(mut self, enabled: bool) -> Self {
        self.validate_responses = enabled;
        self
    }

    /// Build the A2A client
    ///
    /// # Errors
    ///
    /// Returns an error if no transport has been configured
    pub fn build(self) -> Result<A2AClient, A2AError> {
        let transport = self.transport.ok_or_else(|| {
            A2AError::Protocol("Transport not configured. Call with_transport()".into())
        })?;

        let codec = self
            .codec
            .unwrap_or_else(|| Arc::new(JsonRpcCodec::new()));

        let protocol = A2AProtocolService::new(transport, codec);

        let service = if self.validate_responses {
            BoxCloneService::new(
                ServiceBuilder::new()
                    .layer(A2AValidationLayer::new())
                    .service(protocol),
            )
        } else {
            BoxCloneService::new(protocol)
        };

        let config = ClientConfig::new(self.agent_url.as_str())
            .with_timeout(self.timeout)
            .with_validation(self.validate_responses);

        Ok(AgentClient::new(service, config))
    }
}

impl A2AClientBuilder<HttpTransport> {
    /// Create a new client builder with HTTP transport
    ///
    /// # Arguments
    ///
    /// * `agent_url` - The base URL of the agent (e.g., "<http://localhost:8001>")
    pub fn new_http(agent_url: Url) -> Self {
        let transport = HttpTransport::new(agent_url.clone());
        Self::new(agent_url).with_transport(transport)
    }

    /// Share an existing reqwest client (and its connection pool)
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.transport = Some(HttpTransport::with_client(self.agent_url.clone(), client));
        self
    }
}
