//! Router Agent - LLM-based query classification
//!
//! - Receives the user query
//! - Forces a `route_query` function call whose `agent` argument is an enum
//!   of the registered agent identifiers
//! - Returns the decision; dispatch is left to the caller
//!
//! Information Hiding:
//! - Hides the classification prompt and function schema
//! - Exposes a single `route` operation

use super::registry::{AgentKind, AgentRegistry};
use crate::core::llm::{ChatMessage, Completion, CompletionRequest, FunctionSpec, ModelGateway};
use crate::error::{AgentError, Result};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

const ROUTE_FUNCTION: &str = "route_query";

const ROUTER_SYSTEM_PROMPT: &str =
    "You are a router that categorizes queries and selects the best specialized agent to handle them.";

/// Routing decision returned by the LLM
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RouteDecision {
    pub agent: AgentKind,
    pub reason: String,
}

pub struct RouterAgent {
    registry: &'static AgentRegistry,
    gateway: Arc<dyn ModelGateway>,
}

impl RouterAgent {
    pub fn new(registry: &'static AgentRegistry, gateway: Arc<dyn ModelGateway>) -> Self {
        Self { registry, gateway }
    }

    /// Classify `query` into one registered agent. Single attempt, no retry.
    pub async fn route(&self, query: &str) -> Result<RouteDecision> {
        tracing::debug!("[RouterAgent] Classifying query: {}", query);

        let request = CompletionRequest::new(vec![
            ChatMessage::system(ROUTER_SYSTEM_PROMPT),
            ChatMessage::user(format!(
                "Classify this query and select ONE agent: \"{}\"",
                query
            )),
        ])
        .force_function(self.route_function());

        let completion = self.gateway.complete(request).await.map_err(|e| {
            tracing::error!("[RouterAgent] Failed to classify query: {}", e);
            e
        })?;

        let decision = parse_decision(completion)?;
        tracing::info!(
            "[RouterAgent] Routing to '{}' - Reason: {}",
            decision.agent,
            decision.reason
        );
        Ok(decision)
    }

    fn route_function(&self) -> FunctionSpec {
        FunctionSpec {
            name: ROUTE_FUNCTION.to_string(),
            description: "Route the query to the appropriate agent".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "agent": {
                        "type": "string",
                        "enum": self.registry.identifiers(),
                        "description": "The agent best suited to handle this query"
                    },
                    "reason": {
                        "type": "string",
                        "description": "Brief reason for this routing decision"
                    }
                },
                "required": ["agent", "reason"]
            }),
        }
    }
}

fn parse_decision(completion: Completion) -> Result<RouteDecision> {
    match completion {
        Completion::FunctionCall { name, arguments } if name == ROUTE_FUNCTION => {
            serde_json::from_str::<RouteDecision>(&arguments).map_err(|e| {
                tracing::warn!(
                    "[RouterAgent] Rejected routing arguments '{}': {}",
                    arguments,
                    e
                );
                AgentError::upstream(format!("invalid routing decision: {}", e))
            })
        }
        Completion::FunctionCall { name, .. } => Err(AgentError::upstream(format!(
            "router called unexpected function '{}'",
            name
        ))),
        Completion::Text(_) => Err(AgentError::upstream(
            "router returned text instead of a routing decision",
        )),
    }
}
