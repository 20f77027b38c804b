//! Coordinator agent: routes free text to the specialist agents

use async_trait::async_trait;
use url::Url;

use crate::{
    protocol::{AgentCard, AgentSkill, HandlerError, Task},
    routing::Router,
    server::{read_query, SkillHandler},
};

use super::demo_card;

pub fn card(url: &Url) -> AgentCard {
    demo_card(
        "Coordinator Agent",
        "A coordinator agent that routes requests to specialized agents",
        url,
    )
    .with_skill(
        AgentSkill::new("route", "Route").with_description("Routes requests to the appropriate agent"),
    )
    .with_skill(
        AgentSkill::new("help", "Help")
            .with_description("Lists available agents and their capabilities"),
    )
}

pub struct Coordinator {
    router: Router,
}

impl Coordinator {
    pub fn new(router: Router) -> Self {
        Self { router }
    }
}

#[async_trait]
impl SkillHandler for Coordinator {
    async fn handle(&self, task: Task) -> Result<Task, HandlerError> {
        let query = read_query(&task)?;
        let reply = self.router.respond(&query).await;
        Ok(task.complete(reply))
    }
}
