//! Forwarding and help aggregation for the coordinator

use std::{fmt::Write, time::Duration};

use tracing::{debug, warn};
use url::Url;

use crate::{
    client::{A2AClient, A2AClientBuilder, DEFAULT_TIMEOUT},
    protocol::{AgentCard, CommunicationFailure, Message, Task},
};

use super::{classify, AgentKind};

/// Reply when no rule matches
pub const FALLBACK_HINT: &str = "I'm not sure which agent can help with that. \
Please try one of these formats:\n\
- calculate: [expression]\n\
- translate en-es: [text]\n\
- weather [city]\n\
- timer [duration]\n\
Or type 'help' for more information.";

const USAGE_EXAMPLES: &str = "# Usage Examples\n\n\
- Calculator: `calculate: 2 + 2 * 3`\n\
- Translator: `translate en-es: hello`\n\
- Weather: `weather london` or `list-cities`\n\
- Timer: `time`, `timer 5m`, or `countdown 10`\n";

/// Routes coordinator requests to the specialist agents
#[derive(Debug, Clone)]
pub struct Router {
    agents: Vec<(AgentKind, Url)>,
    http: reqwest::Client,
    timeout: Duration,
}

impl Router {
    /// Create a router over the given agent addresses
    ///
    /// `help` lists agents in the order given here.
    pub fn new(agents: impl IntoIterator<Item = (AgentKind, Url)>) -> Self {
        Self {
            agents: agents.into_iter().collect(),
            http: reqwest::Client::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the per-call timeout for forwarded requests
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Registered address of an agent
    pub fn address(&self, kind: AgentKind) -> Option<&Url> {
        self.agents
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, url)| url)
    }

    /// Produce the user-visible answer to one coordinator query
    pub async fn respond(&self, query: &str) -> String {
        if query.trim().eq_ignore_ascii_case("help") {
            return self.help().await;
        }

        let route = classify(query);
        match route.target {
            Some(target) => self.forward(target, &route.payload).await,
            None => FALLBACK_HINT.to_string(),
        }
    }

    /// Send `payload` to `target` as a user message and return its answer text
    ///
    /// Never fails: communication problems and malformed replies are rendered
    /// as an error line naming the agent.
    pub async fn forward(&self, target: AgentKind, payload: &str) -> String {
        debug!(agent = %target, payload, "Forwarding request");

        let task = match self.send(target, payload).await {
            Ok(task) => task,
            Err(failure) => {
                warn!(agent = %target, error = %failure, "Forwarding failed");
                return format!("Error communicating with {} agent: {}", target, failure);
            }
        };

        match task.latest_agent_message().and_then(Message::first_text) {
            Some(text) => text.to_string(),
            None => format!("Error: Received malformed response from {} agent.", target),
        }
    }

    async fn send(
        &self,
        target: AgentKind,
        payload: &str,
    ) -> Result<Task, CommunicationFailure> {
        let mut client = self.client(target)?;
        client.send_task(Message::user(payload)).await
    }

    /// Describe every registered agent, followed by usage examples
    ///
    /// Agents are queried one at a time. An agent that cannot be reached gets
    /// an error entry; the rest of the listing is still produced.
    pub async fn help(&self) -> String {
        let mut text = String::from("# Available Agents\n\n");

        for (kind, _) in &self.agents {
            match self.discover(*kind).await {
                Ok(card) => write_agent_section(&mut text, &card),
                Err(failure) => {
                    warn!(agent = %kind, error = %failure, "Discovery failed");
                    let _ = write!(
                        text,
                        "## {} Agent\nError fetching agent information: {}\n\n",
                        kind.title(),
                        failure
                    );
                }
            }
        }

        text.push_str(USAGE_EXAMPLES);
        text
    }

    async fn discover(&self, kind: AgentKind) -> Result<AgentCard, CommunicationFailure> {
        self.client(kind)?.discover().await
    }

    fn client(&self, kind: AgentKind) -> Result<A2AClient, CommunicationFailure> {
        let url = self
            .address(kind)
            .ok_or_else(|| CommunicationFailure(format!("no address configured for {}", kind)))?;

        A2AClientBuilder::new_http(url.clone())
            .with_client(self.http.clone())
            .with_timeout(self.timeout)
            .build()
            .map_err(CommunicationFailure::from)
    }
}

fn write_agent_section(text: &mut String, card: &AgentCard) {
    let _ = writeln!(text, "## {}", card.name);
    if let Some(description) = &card.description {
        let _ = write!(text, "{}\n\n", description);
    }

    text.push_str("### Skills:\n");
    for skill in &card.skills {
        let _ = writeln!(
            text,
            "- **{}**: {}",
            skill.name,
            skill.description.as_deref().unwrap_or("No description")
        );
    }
    text.push('\n');
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use tokio::net::TcpListener;

    use crate::{
        protocol::{AgentSkill, HandlerError, TaskState},
        server::{read_query, AgentServer, SkillHandler},
    };

    use super::*;

    struct Upper;

    #[async_trait]
    impl SkillHandler for Upper {
        async fn handle(&self, task: Task) -> Result<Task, HandlerError> {
            let text = read_query(&task)?;
            Ok(task.complete(text.to_uppercase()))
        }
    }

    struct Silent;

    #[async_trait]
    impl SkillHandler for Silent {
        async fn handle(&self, task: Task) -> Result<Task, HandlerError> {
            Ok(task.with_state(TaskState::Completed))
        }
    }

    async fn spawn(handler: Arc<dyn SkillHandler>, card: AgentCard) -> Url {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url: Url = format!("http://{}", listener.local_addr().unwrap())
            .parse()
            .unwrap();
        tokio::spawn(AgentServer::new(card, handler).serve(listener));
        url
    }

    async fn unreachable() -> Url {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap())
            .parse()
            .unwrap();
        drop(listener);
        url
    }

    fn card(name: &str) -> AgentCard {
        AgentCard::new(name, "http://unused", "1.0.0")
            .with_description(format!("{} description", name))
            .with_skill(AgentSkill::new("one", "One").with_description("First skill"))
            .with_skill(AgentSkill::new("two", "Two"))
    }

    #[tokio::test]
    async fn test_forward_returns_agent_text() {
        let url = spawn(Arc::new(Upper), card("Upper")).await;
        let router = Router::new([(AgentKind::Weather, url)]);

        assert_eq!(router.respond("weather paris").await, "WEATHER PARIS");
    }

    #[tokio::test]
    async fn test_forward_malformed_response() {
        let url = spawn(Arc::new(Silent), card("Silent")).await;
        let router = Router::new([(AgentKind::Timer, url)]);

        assert_eq!(
            router.forward(AgentKind::Timer, "time").await,
            "Error: Received malformed response from timer agent."
        );
    }

    #[tokio::test]
    async fn test_forward_unreachable_agent() {
        let router = Router::new([(AgentKind::Calculator, unreachable().await)])
            .with_timeout(Duration::from_secs(5));

        let reply = router.respond("calculate: 1+1").await;
        assert!(
            reply.starts_with("Error communicating with calculator agent:"),
            "{}",
            reply
        );
    }

    #[tokio::test]
    async fn test_forward_unregistered_agent() {
        let router = Router::new(Vec::<(AgentKind, Url)>::new());
        let reply = router.forward(AgentKind::Translator, "translate en-es: hi").await;
        assert!(reply.contains("translator"), "{}", reply);
    }

    #[tokio::test]
    async fn test_no_route_gives_hint() {
        let router = Router::new(Vec::<(AgentKind, Url)>::new());
        assert_eq!(router.respond("xyz").await, FALLBACK_HINT);
    }

    #[tokio::test]
    async fn test_help_survives_unreachable_agent() {
        let up = spawn(Arc::new(Upper), card("Calculator Agent")).await;
        let down = unreachable().await;
        let router = Router::new([(AgentKind::Calculator, up), (AgentKind::Weather, down)]);

        let help = router.respond("  HELP ").await;

        assert!(help.starts_with("# Available Agents\n\n## Calculator Agent\n"));
        assert!(help.contains("Calculator Agent description\n\n### Skills:\n"));
        assert!(help.contains("- **One**: First skill\n"));
        assert!(help.contains("- **Two**: No description\n"));
        assert!(help.contains("## Weather Agent\nError fetching agent information:"));
        assert!(help.ends_with(USAGE_EXAMPLES));
    }
}
