//! Wire shapes of the protocol types and envelopes

use std::sync::Arc;

use a2a_mesh::{
    codec::{JsonRpcResponse, RequestId},
    protocol::{
        error::{INVALID_REQUEST, METHOD_NOT_FOUND, PARSE_ERROR, TASK_NOT_FOUND},
        AgentCapabilities, AgentCard, AgentSkill, Artifact, Message, Part, Role, Task, TaskState,
    },
    server::Dispatcher,
    skills::Calculator,
};
use serde_json::{json, Value};

#[test]
fn test_task_wire_shape() {
    let task = Task::new("t-1")
        .with_message(Message::user("2 + 2"))
        .complete("Result: 4");
    let json = serde_json::to_value(&task).unwrap();

    assert_eq!(
        json,
        json!({
            "id": "t-1",
            "state": "completed",
            "messages": [
                {"role": "user", "parts": [{"type": "text", "text": "2 + 2"}]},
                {"role": "agent", "parts": [{"type": "text", "text": "Result: 4"}]}
            ],
            "artifacts": []
        })
    );
}

#[test]
fn test_failed_task_carries_error() {
    let task = Task::new("t-2").fail("No messages provided");
    let json = serde_json::to_value(&task).unwrap();

    assert_eq!(json["state"], "failed");
    assert_eq!(json["error"], "No messages provided");
}

#[test]
fn test_task_state_names() {
    let names: Vec<Value> = [
        TaskState::Submitted,
        TaskState::Working,
        TaskState::InputRequired,
        TaskState::Completed,
        TaskState::Failed,
        TaskState::Canceled,
    ]
    .iter()
    .map(|s| serde_json::to_value(s).unwrap())
    .collect();

    assert_eq!(
        names,
        vec![
            json!("submitted"),
            json!("working"),
            json!("input-required"),
            json!("completed"),
            json!("failed"),
            json!("canceled")
        ]
    );
}

#[test]
fn test_task_decodes_with_defaults() {
    let task: Task = serde_json::from_value(json!({"id": "x", "state": "working"})).unwrap();
    assert!(task.messages.is_empty());
    assert!(task.artifacts.is_empty());
    assert!(task.error.is_none());
}

#[test]
fn test_message_roles_and_parts() {
    let msg: Message = serde_json::from_value(json!({
        "role": "agent",
        "parts": [
            {"type": "text", "text": "hello"},
            {"type": "image", "uri": "https://example.com/a.png"}
        ]
    }))
    .unwrap();

    assert_eq!(msg.role, Role::Agent);
    assert_eq!(msg.first_text(), Some("hello"));
    assert!(matches!(msg.parts[1], Part::Opaque(_)));
}

#[test]
fn test_artifact_shape() {
    let artifact = Artifact {
        id: "a-1".into(),
        mime_type: "text/plain".into(),
        parts: vec![Part::text("body")],
    };
    let json = serde_json::to_value(&artifact).unwrap();

    assert_eq!(json["mimeType"], "text/plain");
    assert!(json.get("mime_type").is_none());
    assert_eq!(json["parts"][0]["text"], "body");
}

#[test]
fn test_agent_card_shape() {
    let card = AgentCard::new("Calculator Agent", "http://localhost:8001", "1.0.0")
        .with_description("Arithmetic")
        .with_capabilities(AgentCapabilities {
            push_notifications: true,
            ..AgentCapabilities::default()
        })
        .with_skill(AgentSkill::new("add", "Addition"));
    let json = serde_json::to_value(&card).unwrap();

    assert_eq!(json["capabilities"]["pushNotifications"], true);
    assert_eq!(json["capabilities"]["stateTransitionHistory"], false);
    assert_eq!(json["defaultInputModes"], json!(["text"]));
    assert_eq!(json["skills"][0], json!({"id": "add", "name": "Addition"}));
    assert!(json.get("documentationUrl").is_none());
    assert!(json.get("provider").is_none());
}

#[test]
fn test_request_id_forms() {
    let ids: Vec<Option<RequestId>> = ["\"abc\"", "7", "null"]
        .iter()
        .map(|raw| serde_json::from_str(raw).unwrap())
        .collect();

    assert_eq!(ids[0], Some(RequestId::String("abc".into())));
    assert_eq!(ids[1], Some(RequestId::Integer(7)));
    assert_eq!(ids[2], None);
}

async fn dispatch(body: Value) -> (u16, Value) {
    let dispatcher = Dispatcher::new(Arc::new(Calculator));
    let reply = dispatcher
        .dispatch(&serde_json::to_vec(&body).unwrap())
        .await;
    (reply.status, serde_json::to_value(&reply.envelope).unwrap())
}

#[tokio::test]
async fn test_success_envelope() {
    let (status, json) = dispatch(json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "tasks/send",
        "params": {"taskId": "calc-1", "message": {"role": "user", "parts": [{"type": "text", "text": "6 * 7"}]}}
    }))
    .await;

    assert_eq!(status, 200);
    assert_eq!(json["jsonrpc"], "2.0");
    assert_eq!(json["id"], 1);
    assert!(json.get("error").is_none());
    assert_eq!(json["result"]["task"]["id"], "calc-1");
    assert_eq!(json["result"]["task"]["state"], "completed");
    assert_eq!(
        json["result"]["task"]["messages"][1]["parts"][0]["text"],
        "Result: 42"
    );
}

#[tokio::test]
async fn test_error_envelopes() {
    let (status, json) = dispatch(json!({
        "jsonrpc": "2.0", "id": "g", "method": "tasks/get", "params": {"taskId": "missing"}
    }))
    .await;
    assert_eq!(status, 200);
    assert_eq!(json["error"]["code"], TASK_NOT_FOUND);
    assert_eq!(json["id"], "g");
    assert!(json.get("result").is_none());

    let (status, json) = dispatch(json!({"jsonrpc": "2.0", "id": 2, "method": "tasks/resubscribe"})).await;
    assert_eq!(status, 400);
    assert_eq!(json["error"]["code"], METHOD_NOT_FOUND);

    let (status, json) = dispatch(json!({"jsonrpc": "2.0", "id": 3, "params": {}})).await;
    assert_eq!(status, 400);
    assert_eq!(json["error"]["code"], INVALID_REQUEST);
    assert_eq!(json["id"], 3);
}

#[tokio::test]
async fn test_parse_error_envelope() {
    let dispatcher = Dispatcher::new(Arc::new(Calculator));
    let reply = dispatcher.dispatch(b"{not json").await;
    let json = serde_json::to_value(&reply.envelope).unwrap();

    assert_eq!(reply.status, 400);
    assert_eq!(json["error"]["code"], PARSE_ERROR);
    assert_eq!(json["id"], Value::Null);

    let envelope: JsonRpcResponse = serde_json::from_value(json).unwrap();
    assert!(envelope.is_error());
}

async fn send_and_get(dispatcher: &Dispatcher, task_id: &str, parts: Value) -> (Value, Value) {
    let sent = dispatcher
        .dispatch(
            &serde_json::to_vec(&json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": "tasks/send",
                "params": {"taskId": task_id, "message": {"role": "user", "parts": parts}}
            }))
            .unwrap(),
        )
        .await;
    let fetched = dispatcher
        .dispatch(
            &serde_json::to_vec(&json!({
                "jsonrpc": "2.0", "id": 2, "method": "tasks/get", "params": {"taskId": task_id}
            }))
            .unwrap(),
        )
        .await;

    (
        serde_json::to_value(&sent.envelope).unwrap()["result"]["task"].clone(),
        serde_json::to_value(&fetched.envelope).unwrap()["result"]["task"].clone(),
    )
}

#[tokio::test]
async fn test_parts_stored_exactly_as_sent() {
    let dispatcher = Dispatcher::new(Arc::new(Calculator));
    let parts = json!([
        {"type": "text", "text": "6 * 7", "metadata": {"lang": "en"}},
        {"type": "image", "uri": "https://example.com/sum.png", "mimeType": "image/png"},
        {"kind": "data", "data": {"n": [1, 2]}}
    ]);

    let (sent, stored) = send_and_get(&dispatcher, "parts-1", parts.clone()).await;

    assert_eq!(stored, sent);
    assert_eq!(stored["messages"][0]["parts"], parts);
    assert_eq!(stored["messages"][1]["parts"][0]["text"], "Result: 42");
}

#[tokio::test]
async fn test_deeply_nested_expression_fails_gracefully() {
    let dispatcher = Dispatcher::new(Arc::new(Calculator));
    let nested = format!("{}1{}", "(".repeat(100_000), ")".repeat(100_000));

    let (_, stored) = send_and_get(&dispatcher, "deep-1", json!([{"type": "text", "text": nested}])).await;

    assert_eq!(stored["state"], "completed");
    assert_eq!(
        stored["messages"][1]["parts"][0]["text"],
        "Error calculating: expression nested too deeply"
    );

    let unary = format!("{}1", "-".repeat(100_000));
    let (_, stored) = send_and_get(&dispatcher, "deep-2", json!([{"type": "text", "text": unary}])).await;
    assert_eq!(
        stored["messages"][1]["parts"][0]["text"],
        "Error calculating: expression nested too deeply"
    );
}
