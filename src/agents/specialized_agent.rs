//! Specialized Agent - one model call under a fixed persona
//!
//! No conversation history is carried: every task is a fresh
//! system + user message pair.

use super::registry::{AgentDefinition, AgentKind};
use crate::core::llm::{ChatMessage, Completion, CompletionRequest, ModelGateway};
use crate::error::{AgentError, Result};
use std::sync::Arc;

pub struct SpecializedAgent {
    definition: &'static AgentDefinition,
    gateway: Arc<dyn ModelGateway>,
}

impl SpecializedAgent {
    pub fn new(definition: &'static AgentDefinition, gateway: Arc<dyn ModelGateway>) -> Self {
        Self {
            definition,
            gateway,
        }
    }

    pub fn kind(&self) -> AgentKind {
        self.definition.kind
    }

    pub fn description(&self) -> &str {
        self.definition.description
    }

    pub async fn execute_task(&self, task: &str) -> Result<String> {
        tracing::debug!("[{}] Executing task ({} chars)", self.kind(), task.len());

        let request = CompletionRequest::new(vec![
            ChatMessage::system(self.definition.system_prompt),
            ChatMessage::user(task),
        ])
        .temperature(self.definition.temperature);

        match self.gateway.complete(request).await {
            Ok(Completion::Text(content)) => Ok(content),
            Ok(Completion::FunctionCall { name, .. }) => Err(AgentError::upstream(format!(
                "agent '{}' received an unexpected function call '{}'",
                self.kind(),
                name
            ))),
            Err(e) => {
                tracing::error!("[{}] Task failed: {}", self.kind(), e);
                Err(e)
            }
        }
    }
}
