//! JSON-RPC protocol dispatcher
//!
//! Turns one raw request body into one response envelope. Protocol faults
//! become error envelopes; skill handler faults become failed tasks.

use std::{any::Any, panic::AssertUnwindSafe, str::FromStr, sync::Arc};

use futures::FutureExt;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    codec::{JsonRpcError, JsonRpcResponse, RequestId},
    protocol::{Message, Method, RpcError, Task},
    server::{
        handler::SkillHandler,
        store::{StoreError, TaskStore},
    },
};

/// `tasks/get` and `tasks/cancel` params
#[derive(Debug, Default, Deserialize)]
struct TaskIdParams {
    #[serde(rename = "taskId", default)]
    task_id: Option<String>,
}

/// `tasks/send` params
#[derive(Debug, Default, Deserialize)]
struct SendTaskParams {
    #[serde(rename = "taskId", default)]
    task_id: Option<String>,
    #[serde(default)]
    message: Option<Message>,
}

#[derive(Serialize)]
struct TaskResult<'a> {
    task: &'a Task,
}

impl From<StoreError> for RpcError {
    fn from(_: StoreError) -> Self {
        RpcError::TaskNotFound
    }
}

/// A response envelope with the HTTP status it travels under
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: u16,
    pub envelope: JsonRpcResponse,
}

impl Reply {
    fn success(id: Option<RequestId>, result: Value) -> Self {
        Self {
            status: 200,
            envelope: JsonRpcResponse::success(id, result),
        }
    }

    fn error(id: Option<RequestId>, error: &RpcError) -> Self {
        let status = match error {
            RpcError::Parse | RpcError::InvalidRequest(_) | RpcError::MethodNotFound(_) => 400,
            RpcError::Internal(_) => 500,
            RpcError::TaskNotFound => 200,
        };
        Self {
            status,
            envelope: JsonRpcResponse::error(id, JsonRpcError::from(error)),
        }
    }
}

/// Routes protocol calls to the task store and the agent's skill handler
pub struct Dispatcher {
    store: TaskStore,
    handler: Arc<dyn SkillHandler>,
}

impl Dispatcher {
    pub fn new(handler: Arc<dyn SkillHandler>) -> Self {
        Self {
            store: TaskStore::new(),
            handler,
        }
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    /// Handle one raw request body
    ///
    /// Never fails: every fault is folded into the returned envelope. The
    /// envelope id mirrors the request id, or is null when the body could not
    /// be read far enough to find one.
    pub async fn dispatch(&self, body: &[u8]) -> Reply {
        let request: Value = match serde_json::from_slice(body) {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, code = RpcError::Parse.code(), "Unparsable request body");
                return Reply::error(None, &RpcError::Parse);
            }
        };

        let id = request
            .get("id")
            .and_then(|id| RequestId::deserialize(id).ok());

        let outcome = AssertUnwindSafe(self.route(&request))
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| Err(RpcError::Internal(panic_message(&*panic))));

        match outcome {
            Ok(result) => Reply::success(id, result),
            Err(error) => {
                warn!(code = error.code(), error = %error, "Request failed");
                Reply::error(id, &error)
            }
        }
    }

    async fn route(&self, request: &Value) -> Result<Value, RpcError> {
        let Some(fields) = request.as_object() else {
            return Err(RpcError::InvalidRequest("expected a JSON object".into()));
        };

        let method = match fields.get("method") {
            Some(Value::String(method)) => method,
            Some(_) => return Err(RpcError::InvalidRequest("'method' must be a string".into())),
            None => return Err(RpcError::InvalidRequest("missing 'method'".into())),
        };
        let method =
            Method::from_str(method).map_err(|unknown| RpcError::MethodNotFound(unknown.0))?;

        let params = fields.get("params").cloned().unwrap_or(Value::Null);
        debug!(method = %method, "Dispatching request");

        let task = match method {
            Method::GetTask => {
                let params: TaskIdParams = decode_params(params)?;
                let task_id = params.task_id.ok_or(RpcError::TaskNotFound)?;
                self.store.get(&task_id).await?
            }
            Method::CancelTask => {
                let params: TaskIdParams = decode_params(params)?;
                let task_id = params.task_id.ok_or(RpcError::TaskNotFound)?;
                self.store.cancel(&task_id).await?
            }
            Method::SendTask => {
                let params: SendTaskParams = decode_params(params)?;
                self.send_task(params).await
            }
        };

        serde_json::to_value(TaskResult { task: &task })
            .map_err(|e| RpcError::Internal(e.to_string()))
    }

    /// Record the message, run the skill handler and store what it returns
    ///
    /// The task stays locked for the whole handler run.
    async fn send_task(&self, params: SendTaskParams) -> Task {
        let mut guard = self
            .store
            .create_or_append(params.task_id, params.message)
            .await;
        let before = (*guard).clone();

        let outcome = AssertUnwindSafe(async { self.handler.handle(before.clone()).await })
            .catch_unwind()
            .await;

        let mut task = match outcome {
            Ok(Ok(task)) => task,
            Ok(Err(e)) => {
                warn!(task_id = %before.id, error = %e, "Skill handler failed");
                before.clone().fail(e.0)
            }
            Err(panic) => {
                let message = panic_message(&*panic);
                warn!(task_id = %before.id, error = %message, "Skill handler panicked");
                before.clone().fail(message)
            }
        };

        task.id.clone_from(&before.id);
        if !task.messages.starts_with(&before.messages) {
            warn!(task_id = %before.id, "Skill handler rewrote message history");
            task = before.clone().fail("handler rewrote task history");
        }
        if !task.state.is_settled() {
            task = task.fail("handler left task unsettled");
        }

        debug!(task_id = %task.id, state = %task.state, "Task processed");
        *guard = task.clone();
        task
    }
}

fn decode_params<T>(params: Value) -> Result<T, RpcError>
where
    T: for<'de> Deserialize<'de> + Default,
{
    match params {
        Value::Null => Ok(T::default()),
        Value::Object(_) => serde_json::from_value(params)
            .map_err(|e| RpcError::InvalidRequest(format!("invalid params: {}", e))),
        _ => Err(RpcError::InvalidRequest("'params' must be an object".into())),
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "handler panicked".to_string()
    }
}
