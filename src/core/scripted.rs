//! In-process gateway double that records requests and replays scripted completions.

use super::llm::{Completion, CompletionRequest, ModelGateway};
use crate::agents::{AgentKind, AgentRegistry};
use crate::error::Result;
use async_trait::async_trait;
use serde_json::json;
use std::sync::Mutex;

type Responder = Box<dyn Fn(&CompletionRequest) -> Result<Completion> + Send + Sync>;

pub(crate) struct ScriptedGateway {
    responder: Responder,
    calls: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedGateway {
    pub fn new(
        responder: impl Fn(&CompletionRequest) -> Result<Completion> + Send + Sync + 'static,
    ) -> Self {
        Self {
            responder: Box::new(responder),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Routes every query to `agent`; agent calls answer `"<agent>: <query>"`.
    pub fn routing_to(agent: AgentKind) -> Self {
        Self::new(move |request| Ok(echo_reply(agent, request)))
    }

    pub fn calls(&self) -> Vec<CompletionRequest> {
        self.calls.lock().unwrap().clone()
    }
}

pub(crate) fn echo_reply(route_to: AgentKind, request: &CompletionRequest) -> Completion {
    if request.function.is_some() {
        return Completion::FunctionCall {
            name: "route_query".to_string(),
            arguments: json!({"agent": route_to, "reason": "scripted"}).to_string(),
        };
    }

    let agent = agent_for(request)
        .map(|kind| kind.as_str())
        .unwrap_or("unknown");
    Completion::Text(format!(
        "{}: {}",
        agent,
        request.user_content().unwrap_or_default()
    ))
}

/// Identifies which registered agent issued `request` by its system prompt.
pub(crate) fn agent_for(request: &CompletionRequest) -> Option<AgentKind> {
    let system = request.messages.iter().find(|m| m.role == "system")?;
    AgentRegistry::global()
        .definitions()
        .find(|d| d.system_prompt == system.content)
        .map(|d| d.kind)
}

#[async_trait]
impl ModelGateway for ScriptedGateway {
    async fn complete(&self, request: CompletionRequest) -> Result<Completion> {
        let reply = (self.responder)(&request);
        self.calls.lock().unwrap().push(request);
        reply
    }
}
