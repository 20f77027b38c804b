//! Coordinator routing engine
//!
//! [`classify`] maps free text to a specialist agent. [`Router`] forwards the
//! cleaned payload to that agent and aggregates discovery results for `help`.

pub mod router;
pub mod rules;

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

pub use router::{Router, FALLBACK_HINT};
pub use rules::classify;

/// The specialist agents the coordinator can route to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentKind {
    Calculator,
    Translator,
    Weather,
    Timer,
}

impl AgentKind {
    /// Every routable agent, in rule order
    pub const ALL: [AgentKind; 4] = [
        AgentKind::Calculator,
        AgentKind::Translator,
        AgentKind::Weather,
        AgentKind::Timer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentKind::Calculator => "calculator",
            AgentKind::Translator => "translator",
            AgentKind::Weather => "weather",
            AgentKind::Timer => "timer",
        }
    }

    /// Capitalized name, as used in headings
    pub fn title(&self) -> &'static str {
        match self {
            AgentKind::Calculator => "Calculator",
            AgentKind::Translator => "Translator",
            AgentKind::Weather => "Weather",
            AgentKind::Timer => "Timer",
        }
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AgentKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown agent '{}'", s))
    }
}

/// Outcome of classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// Agent to forward to; `None` when no rule matched
    pub target: Option<AgentKind>,

    /// Text to send to the target
    pub payload: String,
}

impl Route {
    pub fn to(target: AgentKind, payload: impl Into<String>) -> Self {
        Self {
            target: Some(target),
            payload: payload.into(),
        }
    }

    pub fn unmatched(payload: impl Into<String>) -> Self {
        Self {
            target: None,
            payload: payload.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_kind_names() {
        for kind in AgentKind::ALL {
            assert_eq!(kind.as_str().parse::<AgentKind>(), Ok(kind));
        }
        assert!("coordinator".parse::<AgentKind>().is_err());
        assert_eq!(AgentKind::Weather.title(), "Weather");
    }
}
