//! Agent service: task store, protocol dispatcher and HTTP surface
//!
//! Every agent exposes the same two endpoints:
//!
//! - `GET /.well-known/agent.json` returns the agent card
//! - `POST /` takes a JSON-RPC envelope and answers with one

pub mod dispatcher;
pub mod handler;
pub mod store;

use std::{future::Future, sync::Arc};

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

pub use dispatcher::{Dispatcher, Reply};
pub use handler::{latest_user_message, read_query, SkillHandler};
pub use store::{StoreError, TaskGuard, TaskStore};

use crate::protocol::{
    operation::{AGENT_CARD_PATH, RPC_PATH},
    AgentCard,
};

/// One agent: its card plus a dispatcher bound to its skill handler
pub struct AgentServer {
    card: AgentCard,
    dispatcher: Dispatcher,
}

impl AgentServer {
    pub fn new(card: AgentCard, handler: Arc<dyn SkillHandler>) -> Self {
        Self {
            card,
            dispatcher: Dispatcher::new(handler),
        }
    }

    pub fn card(&self) -> &AgentCard {
        &self.card
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Build the axum router for this agent
    pub fn router(self: Arc<Self>) -> Router {
        Router::new()
            .route(AGENT_CARD_PATH, get(agent_card))
            .route(RPC_PATH, post(rpc))
            .layer(TraceLayer::new_for_http())
            .with_state(self)
    }

    /// Serve until the listener fails
    pub async fn serve(self, listener: TcpListener) -> std::io::Result<()> {
        self.serve_with_shutdown(listener, std::future::pending())
            .await
    }

    /// Serve until `shutdown` resolves, then drain in-flight requests
    pub async fn serve_with_shutdown<F>(self, listener: TcpListener, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        info!(agent = %self.card.name, %addr, "Agent listening");

        axum::serve(listener, Arc::new(self).router())
            .with_graceful_shutdown(shutdown)
            .await
    }
}

async fn agent_card(State(server): State<Arc<AgentServer>>) -> Json<AgentCard> {
    Json(server.card.clone())
}

async fn rpc(State(server): State<Arc<AgentServer>>, body: Bytes) -> Response {
    let reply = server.dispatcher.dispatch(&body).await;
    let status = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(reply.envelope)).into_response()
}
