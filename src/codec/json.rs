//! JSON codec for bare protocol documents
//!
//! Encodes method params and decodes `{"task": ...}` results and agent cards.
//! The JSON-RPC codec wraps this one.

use bytes::Bytes;
use serde::Deserialize;
use serde_json::json;

use crate::{
    codec::{Codec, RequestId},
    protocol::{
        agent::AgentCard, error::A2AError, operation::A2AOperation, task::Task,
    },
    service::response::A2AResponse,
};

/// Result payload shared by all three task methods
#[derive(Debug, Deserialize)]
struct TaskResult {
    task: Task,
}

/// JSON codec for protocol params, results and discovery documents
#[derive(Debug, Clone, Default)]
pub struct JsonCodec;

impl JsonCodec {
    /// Create a new JSON codec
    pub fn new() -> Self {
        Self
    }
}

impl Codec for JsonCodec {
    fn encode_request(
        &self,
        operation: &A2AOperation,
        _request_id: &RequestId,
    ) -> Result<Bytes, A2AError> {
        let json = match operation {
            A2AOperation::SendTask { task_id, message } => {
                let mut obj = json!({ "message": message });
                if let Some(t_id) = task_id {
                    obj["taskId"] = json!(t_id);
                }
                obj
            }
            A2AOperation::GetTask { task_id } | A2AOperation::CancelTask { task_id } => {
                json!({ "taskId": task_id })
            }
            // Discovery is a GET without a body
            A2AOperation::DiscoverAgent => json!({}),
        };

        let bytes = serde_json::to_vec(&json)?;
        Ok(Bytes::from(bytes))
    }

    fn decode_response(
        &self,
        body: &[u8],
        operation: &A2AOperation,
        _request_id: &RequestId,
    ) -> Result<A2AResponse, A2AError> {
        if body.is_empty() {
            return Err(A2AError::Protocol("Empty response body".into()));
        }

        match operation {
            A2AOperation::DiscoverAgent => {
                let card: AgentCard = serde_json::from_slice(body)?;
                Ok(A2AResponse::AgentCard(Box::new(card)))
            }
            A2AOperation::SendTask { .. }
            | A2AOperation::GetTask { .. }
            | A2AOperation::CancelTask { .. } => {
                let result: TaskResult = serde_json::from_slice(body)?;
                Ok(A2AResponse::Task(Box::new(result.task)))
            }
        }
    }

    fn content_type(&self) -> &str {
        "application/json"
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use super::*;
    use crate::protocol::message::Message;

    fn rid() -> RequestId {
        RequestId::String("req-1".into())
    }

    #[test]
    fn test_encode_send_task() {
        let codec = JsonCodec;
        let operation = A2AOperation::SendTask {
            task_id: Some("task-9".into()),
            message: Message::user("Hello"),
        };

        let bytes = codec.encode_request(&operation, &rid()).unwrap();
        let json: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["taskId"], "task-9");
        assert_eq!(json["message"]["role"], "user");
        assert_eq!(json["message"]["parts"][0]["type"], "text");
    }

    #[test]
    fn test_encode_send_task_without_id_omits_it() {
        let codec = JsonCodec;
        let operation = A2AOperation::SendTask {
            task_id: None,
            message: Message::user("Hello"),
        };

        let bytes = codec.encode_request(&operation, &rid()).unwrap();
        let json: Value = serde_json::from_slice(&bytes).unwrap();
        assert!(json.get("taskId").is_none());
    }

    #[test]
    fn test_decode_task_result() {
        let codec = JsonCodec;
        let json = r#"{
            "task": {
                "id": "task-123",
                "state": "completed",
                "messages": [{"role": "user", "parts": [{"type": "text", "text": "Hello"}]}],
                "artifacts": []
            }
        }"#;

        let operation = A2AOperation::GetTask {
            task_id: "task-123".to_string(),
        };

        match codec.decode_response(json.as_bytes(), &operation, &rid()).unwrap() {
            A2AResponse::Task(task) => assert_eq!(task.id, "task-123"),
            _ => panic!("Expected Task response"),
        }
    }

    #[test]
    fn test_decode_result_without_task_fails() {
        let codec = JsonCodec;
        let operation = A2AOperation::GetTask {
            task_id: "task-123".to_string(),
        };

        let result = codec.decode_response(br#"{"other": 1}"#, &operation, &rid());
        assert!(matches!(result, Err(A2AError::Serialization(_))));
    }
}
