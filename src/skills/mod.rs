//! The reference agents
//!
//! Each module provides an agent card and a [`SkillHandler`]. The coordinator
//! forwards to the other four through a [`Router`].

pub mod calculator;
pub mod coordinator;
pub mod timer;
pub mod translator;
pub mod weather;

use std::{fmt, sync::Arc};

use url::Url;

use crate::{
    protocol::{AgentCapabilities, AgentCard, AgentProvider},
    routing::{AgentKind, Router},
    server::{AgentServer, SkillHandler},
};

pub use calculator::Calculator;
pub use coordinator::Coordinator;
pub use timer::Timer;
pub use translator::Translator;
pub use weather::Weather;

/// Every agent in the reference topology
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum AgentRole {
    Coordinator,
    Calculator,
    Translator,
    Weather,
    Timer,
}

impl AgentRole {
    pub const ALL: [AgentRole; 5] = [
        AgentRole::Coordinator,
        AgentRole::Calculator,
        AgentRole::Translator,
        AgentRole::Weather,
        AgentRole::Timer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentRole::Coordinator => "coordinator",
            AgentRole::Calculator => "calculator",
            AgentRole::Translator => "translator",
            AgentRole::Weather => "weather",
            AgentRole::Timer => "timer",
        }
    }

    /// The routing target this agent serves, `None` for the coordinator
    pub fn specialist(&self) -> Option<AgentKind> {
        match self {
            AgentRole::Coordinator => None,
            AgentRole::Calculator => Some(AgentKind::Calculator),
            AgentRole::Translator => Some(AgentKind::Translator),
            AgentRole::Weather => Some(AgentKind::Weather),
            AgentRole::Timer => Some(AgentKind::Timer),
        }
    }
}

impl fmt::Display for AgentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Card shared by the reference agents: demo provider, no optional capabilities
pub(crate) fn demo_card(name: &str, description: &str, url: &Url) -> AgentCard {
    AgentCard::new(name, url.as_str().trim_end_matches('/'), "1.0.0")
        .with_description(description)
        .with_provider(AgentProvider::new("A2A Demo").with_url("https://example.com"))
        .with_capabilities(AgentCapabilities::default())
}

/// Build the agent for `role` listening at `url`
///
/// `router` is only consulted for the coordinator.
pub fn agent_server(role: AgentRole, url: &Url, router: Router) -> AgentServer {
    let (card, handler): (AgentCard, Arc<dyn SkillHandler>) = match role {
        AgentRole::Coordinator => (coordinator::card(url), Arc::new(Coordinator::new(router))),
        AgentRole::Calculator => (calculator::card(url), Arc::new(Calculator)),
        AgentRole::Translator => (translator::card(url), Arc::new(Translator)),
        AgentRole::Weather => (weather::card(url), Arc::new(Weather)),
        AgentRole::Timer => (timer::card(url), Arc::new(Timer)),
    };
    AgentServer::new(card, handler)
}
