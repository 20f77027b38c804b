//! # a2a-mesh
//!
//! Agents that speak the A2A task protocol over JSON-RPC 2.0, plus a
//! coordinator that routes free-form requests to specialist agents.
//!
//! - The client side is a Tower service stack: [`transport`] moves bytes,
//!   [`codec`] frames them as JSON-RPC, [`service`] executes operations and
//!   [`layer`] validates what comes back. [`client::AgentClient`] wraps it.
//! - The server side is a task store and a protocol dispatcher behind an axum
//!   router ([`server`]), driving a [`server::SkillHandler`].
//! - [`routing`] holds the coordinator's rules and forwarding logic and
//!   [`skills`] the reference agents.
//!
//! ## Example
//!
//! ```rust,no_run
//! use a2a_mesh::prelude::*;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let url = "http://localhost:8000".parse()?;
//!     let mut client = A2AClientBuilder::new_http(url)
//!         .with_timeout(Duration::from_secs(10))
//!         .build()?;
//!
//!     let card = client.discover().await?;
//!     println!("Connected to: {}", card.name);
//!
//!     let task = client.send_task(Message::user("calculate: 2 + 2")).await?;
//!     println!("{:?}", task.latest_agent_message().and_then(|m| m.first_text()));
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod codec;
pub mod config;
pub mod layer;
pub mod protocol;
pub mod routing;
pub mod server;
pub mod service;
pub mod skills;
pub mod telemetry;
pub mod transport;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        client::{A2AClient, A2AClientBuilder, AgentClient},
        protocol::{
            A2AError, AgentCard, AgentSkill, CommunicationFailure, HandlerError, Message, Part,
            Role, Task, TaskState,
        },
        server::{AgentServer, SkillHandler},
    };
}
