//! JSON-RPC 2.0 envelope and codec
//!
//! Task methods travel wrapped in JSON-RPC 2.0 envelopes. The envelope types
//! here are shared by the client codec and the server-side dispatcher.

use std::fmt;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::{
    codec::Codec,
    protocol::{
        error::{A2AError, RpcError},
        operation::A2AOperation,
    },
    service::response::A2AResponse,
};

use super::json::JsonCodec;

/// Protocol version tag carried by every envelope
pub const JSONRPC_VERSION: &str = "2.0";

/// JSON-RPC correlation id: a string or an integer
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    String(String),
    Integer(i64),
}

impl RequestId {
    /// A fresh, time-ordered string id
    pub fn generate() -> Self {
        RequestId::String(Uuid::now_v7().to_string())
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestId::String(s) => f.write_str(s),
            RequestId::Integer(n) => write!(f, "{}", n),
        }
    }
}

/// JSON-RPC 2.0 request envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RequestId>,
}

/// JSON-RPC 2.0 response envelope
///
/// Exactly one of `result` or `error` is present. `id` is always written,
/// as `null` when the request id could not be recovered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
    #[serde(default)]
    pub id: Option<RequestId>,
}

impl JsonRpcResponse {
    /// Create a successful response
    pub fn success(id: Option<RequestId>, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            result: Some(result),
            error: None,
            id,
        }
    }

    /// Create an error response
    pub fn error(id: Option<RequestId>, error: JsonRpcError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            result: None,
            error: Some(error),
            id,
        }
    }

    /// Check if this is an error response
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// JSON-RPC 2.0 error object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl From<&RpcError> for JsonRpcError {
    fn from(err: &RpcError) -> Self {
        Self {
            code: err.code(),
            message: err.to_string(),
            data: None,
        }
    }
}

/// JSON-RPC 2.0 codec that wraps A2A operations
///
/// Task methods are wrapped in request envelopes and unwrapped from response
/// envelopes after shape checks. Discovery bypasses the envelope.
#[derive(Debug, Clone, Default)]
pub struct JsonRpcCodec {
    /// Inner JSON codec for params and results
    inner: JsonCodec,
}

impl JsonRpcCodec {
    /// Create a new JSON-RPC codec
    pub fn new() -> Self {
        Self {
            inner: JsonCodec::new(),
        }
    }

    /// Check the envelope and pull out its result
    fn unwrap_envelope(body: &[u8], request_id: &RequestId) -> Result<Value, A2AError> {
        let response: JsonRpcResponse = serde_json::from_slice(body)
            .map_err(|e| A2AError::Protocol(format!("Failed to parse JSON-RPC response: {}", e)))?;

        if response.jsonrpc != JSONRPC_VERSION {
            return Err(A2AError::Protocol(format!(
                "Unsupported JSON-RPC version '{}'",
                response.jsonrpc
            )));
        }

        if response.id.as_ref() != Some(request_id) {
            return Err(A2AError::Protocol(format!(
                "JSON-RPC response id {:?} does not match request id {}",
                response.id, request_id
            )));
        }

        match (response.result, response.error) {
            (None, Some(error)) => Err(A2AError::Rpc {
                code: error.code,
                message: error.message,
            }),
            (Some(result), None) => Ok(result),
            (Some(_), Some(_)) => Err(A2AError::Protocol(
                "JSON-RPC response carries both 'result' and 'error'".to_string(),
            )),
            (None, None) => Err(A2AError::Protocol(
                "JSON-RPC response missing 'result' field".to_string(),
            )),
        }
    }
}

impl Codec for JsonRpcCodec {
    fn encode_request(
        &self,
        operation: &A2AOperation,
        request_id: &RequestId,
    ) -> Result<Bytes, A2AError> {
        let Some(method) = operation.rpc_method() else {
            return self.inner.encode_request(operation, request_id);
        };

        let params_bytes = self.inner.encode_request(operation, request_id)?;
        let params: Value = serde_json::from_slice(&params_bytes)?;

        let request = JsonRpcRequest {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: method.as_str().to_string(),
            params,
            id: Some(request_id.clone()),
        };

        let bytes = serde_json::to_vec(&request)?;
        Ok(Bytes::from(bytes))
    }

    fn decode_response(
        &self,
        body: &[u8],
        operation: &A2AOperation,
        request_id: &RequestId,
    ) -> Result<A2AResponse, A2AError> {
        if operation.rpc_method().is_none() {
            return self.inner.decode_response(body, operation, request_id);
        }

        let result = Self::unwrap_envelope(body, request_id)?;
        let result_bytes = serde_json::to_vec(&result)?;
        self.inner.decode_response(&result_bytes, operation, request_id)
    }

    fn content_type(&self) -> &str {
        "application/json"
    }
}
