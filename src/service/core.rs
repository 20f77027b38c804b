//! Core A2A protocol service implementation

use std::{
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};

use tower_service::Service;
use tracing::debug;

use crate::{
    codec::{Codec, JsonRpcResponse, RequestId},
    protocol::{error::A2AError, operation::A2AOperation},
    service::{A2ARequest, A2AResponse},
    transport::{Transport, TransportRequest, TransportResponse},
};

/// Core A2A protocol service that wraps a transport
///
/// This service implements the Tower `Service` trait: it encodes an operation
/// with the codec, executes it over the transport within the request timeout,
/// and decodes the response.
pub struct A2AProtocolService<T> {
    transport: T,
    codec: Arc<dyn Codec>,
}

impl<T> A2AProtocolService<T>
where
    T: Transport,
{
    /// Create a new A2A protocol service
    ///
    /// # Arguments
    ///
    /// * `transport` - The underlying transport implementation
    /// * `codec` - The codec for serialization/deserialization
    pub fn new(transport: T, codec: Arc<dyn Codec>) -> Self {
        Self { transport, codec }
    }

    /// Build a transport request from an A2A operation
    fn build_transport_request(
        operation: &A2AOperation,
        request_id: &RequestId,
        codec: &dyn Codec,
    ) -> Result<TransportRequest, A2AError> {
        let method = operation.method();

        let mut transport_req = TransportRequest::new(operation.endpoint(), method)
            .header("Accept", codec.content_type());

        if method != "GET" {
            let body = codec.encode_request(operation, request_id)?;
            transport_req = transport_req
                .header("Content-Type", codec.content_type())
                .body(body);
        }

        Ok(transport_req)
    }

    /// Parse a transport response into an A2A response
    fn parse_transport_response(
        transport_resp: TransportResponse,
        codec: &dyn Codec,
        operation: &A2AOperation,
        request_id: &RequestId,
    ) -> Result<A2AResponse, A2AError> {
        if !transport_resp.is_success() {
            return Err(Self::handle_error_response(&transport_resp));
        }

        codec.decode_response(&transport_resp.body, operation, request_id)
    }

    /// Handle non-2xx responses from the transport
    fn handle_error_response(transport_resp: &TransportResponse) -> A2AError {
        // Agents answer protocol errors with an error envelope and a 4xx/5xx status
        if let Ok(envelope) = serde_json::from_slice::<JsonRpcResponse>(&transport_resp.body) {
            if let Some(error) = envelope.error {
                return A2AError::Rpc {
                    code: error.code,
                    message: error.message,
                };
            }
        }

        A2AError::Transport(format!("HTTP error: {}", transport_resp.status))
    }
}

impl<T> Service<A2ARequest> for A2AProtocolService<T>
where
    T: Transport + Clone,
{
    type Response = A2AResponse;
    type Error = A2AError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.transport.poll_ready(cx)
    }

    fn call(&mut self, req: A2ARequest) -> Self::Future {
        let transport = self.transport.clone();
        let codec = self.codec.clone();

        Box::pin(async move {
            let request_id = RequestId::generate();
            let transport_req =
                Self::build_transport_request(&req.operation, &request_id, codec.as_ref())?;

            debug!(
                agent = %req.context.agent_url,
                endpoint = %transport_req.endpoint,
                request_id = %request_id,
                "Executing A2A request"
            );

            let transport_resp =
                tokio::time::timeout(req.context.timeout, transport.execute(transport_req))
                    .await
                    .map_err(|_| A2AError::Timeout)??;

            Self::parse_transport_response(
                transport_resp,
                codec.as_ref(),
                &req.operation,
                &request_id,
            )
        })
    }
}

impl<T> Clone for A2AProtocolService<T>
where
    T: Clone,
{
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
            codec: self.codec.clone(),
        }
    }
}
