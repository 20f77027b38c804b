//! Serialization codecs for the protocol bindings

pub mod json;
pub mod jsonrpc;

pub use json::JsonCodec;
pub use jsonrpc::{JsonRpcCodec, JsonRpcError, JsonRpcRequest, JsonRpcResponse, RequestId};

use crate::{
    protocol::{error::A2AError, operation::A2AOperation},
    service::response::A2AResponse,
};
use bytes::Bytes;

/// Codec trait for encoding and decoding A2A protocol messages
pub trait Codec: Send + Sync {
    /// Serialize an A2A operation to bytes for transport
    ///
    /// # Arguments
    ///
    /// * `operation` - The A2A operation to encode
    /// * `request_id` - Correlation id for this call
    fn encode_request(
        &self,
        operation: &A2AOperation,
        request_id: &RequestId,
    ) -> Result<Bytes, A2AError>;

    /// Deserialize transport response bytes to an A2A response
    ///
    /// # Arguments
    ///
    /// * `body` - The response body bytes
    /// * `operation` - The original operation (for context)
    /// * `request_id` - Correlation id the response must echo
    fn decode_response(
        &self,
        body: &[u8],
        operation: &A2AOperation,
        request_id: &RequestId,
    ) -> Result<A2AResponse, A2AError>;

    /// Get the content type for this codec
    fn content_type(&self) -> &str;
}
