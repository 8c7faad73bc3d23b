//! Composer - combines router and specialized agents into one answer
//!
//! Patterns:
//! - branching (default): router picks one agent
//! - sequential: researcher, then summarizer over the research
//! - parallel: researcher and creative on the same query, joined
//!
//! A composition either fully succeeds or fails; no partial results.

use super::registry::{AgentKind, AgentRegistry};
use super::router_agent::RouterAgent;
use super::specialized_agent::SpecializedAgent;
use crate::core::llm::ModelGateway;
use crate::error::{AgentError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompositionPattern {
    #[default]
    Branching,
    Sequential,
    Parallel,
}

impl CompositionPattern {
    pub const ALL: [CompositionPattern; 3] = [
        CompositionPattern::Branching,
        CompositionPattern::Sequential,
        CompositionPattern::Parallel,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CompositionPattern::Branching => "branching",
            CompositionPattern::Sequential => "sequential",
            CompositionPattern::Parallel => "parallel",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            CompositionPattern::Branching => {
                "Routes the query to the single best-suited agent"
            }
            CompositionPattern::Sequential => {
                "Researches the query, then summarizes the research"
            }
            CompositionPattern::Parallel => {
                "Runs research and creative agents concurrently and merges their answers"
            }
        }
    }

    /// Parses an optional wire value; `None` means branching.
    pub fn parse_optional(value: Option<&str>) -> Result<Self> {
        value.map_or(Ok(Self::default()), |s| s.parse())
    }
}

impl fmt::Display for CompositionPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CompositionPattern {
    type Err = AgentError;

    fn from_str(s: &str) -> Result<Self> {
        CompositionPattern::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| {
                AgentError::bad_request(format!(
                    "unknown pattern '{}' (expected branching, sequential or parallel)",
                    s
                ))
            })
    }
}

/// Outcome of one composed request.
#[derive(Debug, Clone, PartialEq)]
pub struct Composition {
    pub content: String,
    pub pattern: CompositionPattern,
    /// Agents invoked, in the order their output appears.
    pub agents: Vec<AgentKind>,
    /// Router justification; only set for branching.
    pub reason: Option<String>,
}

pub struct Composer {
    registry: &'static AgentRegistry,
    gateway: Arc<dyn ModelGateway>,
    router: RouterAgent,
}

impl Composer {
    pub fn new(gateway: Arc<dyn ModelGateway>) -> Self {
        let registry = AgentRegistry::global();
        Self {
            registry,
            router: RouterAgent::new(registry, Arc::clone(&gateway)),
            gateway,
        }
    }

    fn agent(&self, kind: AgentKind) -> SpecializedAgent {
        SpecializedAgent::new(self.registry.lookup(kind), Arc::clone(&self.gateway))
    }

    pub async fn compose(&self, query: &str, pattern: CompositionPattern) -> Result<Composition> {
        tracing::info!("[Composer] Handling query with {} pattern", pattern);

        match pattern {
            CompositionPattern::Branching => self.branching(query).await,
            CompositionPattern::Sequential => self.sequential(query).await,
            CompositionPattern::Parallel => self.parallel(query).await,
        }
    }

    async fn branching(&self, query: &str) -> Result<Composition> {
        let decision = self.router.route(query).await?;
        let content = self.agent(decision.agent).execute_task(query).await?;

        Ok(Composition {
            content,
            pattern: CompositionPattern::Branching,
            agents: vec![decision.agent],
            reason: Some(decision.reason),
        })
    }

    async fn sequential(&self, query: &str) -> Result<Composition> {
        let research = self.agent(AgentKind::Researcher).execute_task(query).await?;
        tracing::debug!(
            "[Composer] Research produced {} chars, summarizing",
            research.len()
        );
        let summary = self
            .agent(AgentKind::Summarizer)
            .execute_task(&research)
            .await?;

        Ok(Composition {
            content: summary,
            pattern: CompositionPattern::Sequential,
            agents: vec![AgentKind::Researcher, AgentKind::Summarizer],
            reason: None,
        })
    }

    async fn parallel(&self, query: &str) -> Result<Composition> {
        let researcher = self.agent(AgentKind::Researcher);
        let creative = self.agent(AgentKind::Creative);

        // First failure wins; the other branch is dropped.
        let (research, idea) =
            futures::future::try_join(researcher.execute_task(query), creative.execute_task(query))
                .await?;

        Ok(Composition {
            content: merge_sections(&research, &idea),
            pattern: CompositionPattern::Parallel,
            agents: vec![AgentKind::Researcher, AgentKind::Creative],
            reason: None,
        })
    }
}

fn merge_sections(research: &str, creative: &str) -> String {
    format!("## Research\n{}\n\n## Creative\n{}", research, creative)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::llm::{Completion, CompletionRequest};
    use crate::core::scripted::{agent_for, echo_reply, ScriptedGateway};
    use std::time::Duration;

    fn composer_with(gateway: Arc<ScriptedGateway>) -> Composer {
        Composer::new(gateway)
    }

    #[test]
    fn test_pattern_parsing() {
        assert_eq!(
            CompositionPattern::parse_optional(None).unwrap(),
            CompositionPattern::Branching
        );
        assert_eq!(
            CompositionPattern::parse_optional(Some("parallel")).unwrap(),
            CompositionPattern::Parallel
        );
        assert!(matches!(
            CompositionPattern::parse_optional(Some("fanout")),
            Err(AgentError::BadRequest(_))
        ));
    }

    #[tokio::test]
    async fn test_branching_routes_then_invokes_once() {
        let gateway = Arc::new(ScriptedGateway::routing_to(AgentKind::Technical));
        let composition = composer_with(gateway.clone())
            .compose("explain lifetimes", CompositionPattern::Branching)
            .await
            .unwrap();

        assert_eq!(composition.content, "technical: explain lifetimes");
        assert_eq!(composition.agents, vec![AgentKind::Technical]);
        assert_eq!(composition.reason.as_deref(), Some("scripted"));

        let calls = gateway.calls();
        assert_eq!(calls.len(), 2);
        assert!(calls[0].function.is_some());
        assert_eq!(agent_for(&calls[1]), Some(AgentKind::Technical));
        assert_eq!(calls[1].user_content(), Some("explain lifetimes"));
    }

    #[tokio::test]
    async fn test_default_pattern_matches_branching() {
        let explicit = Arc::new(ScriptedGateway::routing_to(AgentKind::Creative));
        let implicit = Arc::new(ScriptedGateway::routing_to(AgentKind::Creative));

        let a = composer_with(explicit.clone())
            .compose("a dragon story", CompositionPattern::Branching)
            .await
            .unwrap();
        let b = composer_with(implicit.clone())
            .compose(
                "a dragon story",
                CompositionPattern::parse_optional(None).unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(a, b);
        assert_eq!(explicit.calls(), implicit.calls());
    }

    #[tokio::test]
    async fn test_sequential_feeds_research_into_summarizer() {
        let gateway = Arc::new(ScriptedGateway::routing_to(AgentKind::Researcher));
        let composition = composer_with(gateway.clone())
            .compose("black holes", CompositionPattern::Sequential)
            .await
            .unwrap();

        let calls = gateway.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(agent_for(&calls[0]), Some(AgentKind::Researcher));
        assert_eq!(calls[0].user_content(), Some("black holes"));
        assert_eq!(agent_for(&calls[1]), Some(AgentKind::Summarizer));
        assert_eq!(calls[1].user_content(), Some("researcher: black holes"));

        assert_eq!(composition.content, "summarizer: researcher: black holes");
        assert_eq!(
            composition.agents,
            vec![AgentKind::Researcher, AgentKind::Summarizer]
        );
        assert!(composition.reason.is_none());
    }

    #[tokio::test]
    async fn test_sequential_stops_when_research_fails() {
        let gateway = Arc::new(ScriptedGateway::new(|_| Err(AgentError::upstream("down"))));
        let err = composer_with(gateway.clone())
            .compose("black holes", CompositionPattern::Sequential)
            .await
            .unwrap_err();

        assert!(matches!(err, AgentError::Upstream(_)));
        assert_eq!(gateway.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_parallel_merges_research_before_creative() {
        let gateway = Arc::new(ScriptedGateway::routing_to(AgentKind::Researcher));
        let composition = composer_with(gateway.clone())
            .compose("the moon", CompositionPattern::Parallel)
            .await
            .unwrap();

        assert_eq!(
            composition.content,
            "## Research\nresearcher: the moon\n\n## Creative\ncreative: the moon"
        );

        let mut invoked: Vec<AgentKind> = gateway.calls().iter().filter_map(agent_for).collect();
        invoked.sort_by_key(|k| k.as_str());
        assert_eq!(invoked, vec![AgentKind::Creative, AgentKind::Researcher]);
        assert!(gateway
            .calls()
            .iter()
            .all(|c| c.user_content() == Some("the moon")));
    }

    #[tokio::test]
    async fn test_parallel_fails_if_either_branch_fails() {
        let gateway = Arc::new(ScriptedGateway::new(|request: &CompletionRequest| {
            match agent_for(request) {
                Some(AgentKind::Creative) => Err(AgentError::upstream("creative down")),
                _ => Ok(echo_reply(AgentKind::Researcher, request)),
            }
        }));

        let err = composer_with(gateway)
            .compose("the moon", CompositionPattern::Parallel)
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::Upstream(message) if message == "creative down"));
    }

    #[tokio::test]
    async fn test_parallel_branches_run_concurrently() {
        struct SlowGateway;

        #[async_trait::async_trait]
        impl ModelGateway for SlowGateway {
            async fn complete(&self, _request: CompletionRequest) -> Result<Completion> {
                tokio::time::sleep(Duration::from_millis(300)).await;
                Ok(Completion::Text("done".to_string()))
            }
        }

        let composer = Composer::new(Arc::new(SlowGateway));
        let started = tokio::time::Instant::now();
        composer
            .compose("q", CompositionPattern::Parallel)
            .await
            .unwrap();

        assert!(started.elapsed() < Duration::from_millis(550));
    }
}
