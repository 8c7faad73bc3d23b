//! Agent registry - the fixed set of specialized agents
//!
//! Information Hiding:
//! - Hides the prompt and temperature chosen for each agent
//! - Exposes lookup by kind (total) and by name (fallible)
//! - Built once per process, never mutated

use crate::error::{AgentError, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentKind {
    Researcher,
    Creative,
    Technical,
    Summarizer,
}

impl AgentKind {
    pub const ALL: [AgentKind; 4] = [
        AgentKind::Researcher,
        AgentKind::Creative,
        AgentKind::Technical,
        AgentKind::Summarizer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentKind::Researcher => "researcher",
            AgentKind::Creative => "creative",
            AgentKind::Technical => "technical",
            AgentKind::Summarizer => "summarizer",
        }
    }

    fn index(self) -> usize {
        match self {
            AgentKind::Researcher => 0,
            AgentKind::Creative => 1,
            AgentKind::Technical => 2,
            AgentKind::Summarizer => 3,
        }
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgentKind {
    type Err = AgentError;

    fn from_str(s: &str) -> Result<Self> {
        AgentKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| AgentError::UnknownAgent(s.to_string()))
    }
}

/// A system prompt and sampling temperature that together make one agent.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentDefinition {
    pub kind: AgentKind,
    pub description: &'static str,
    pub system_prompt: &'static str,
    pub temperature: f32,
}

/// Create the research agent
pub fn create_researcher() -> AgentDefinition {
    AgentDefinition {
        kind: AgentKind::Researcher,
        description: "Finds factual information",
        system_prompt: "You are a research agent providing factual information with sources.",
        temperature: 0.3,
    }
}

/// Create the creative writing agent
pub fn create_creative() -> AgentDefinition {
    AgentDefinition {
        kind: AgentKind::Creative,
        description: "Generates imaginative content",
        system_prompt: "You are a creative agent generating imaginative content.",
        temperature: 0.9,
    }
}

/// Create the technical explanation agent
pub fn create_technical() -> AgentDefinition {
    AgentDefinition {
        kind: AgentKind::Technical,
        description: "Provides technical explanations",
        system_prompt: "You are a technical agent providing precise, detailed explanations.",
        temperature: 0.2,
    }
}

/// Create the summarizer agent
pub fn create_summarizer() -> AgentDefinition {
    AgentDefinition {
        kind: AgentKind::Summarizer,
        description: "Condenses text into a concise summary",
        system_prompt: "You are a summarizer agent condensing the provided text into a clear, concise summary.",
        temperature: 0.3,
    }
}

static REGISTRY: Lazy<AgentRegistry> = Lazy::new(AgentRegistry::with_defaults);

#[derive(Debug)]
pub struct AgentRegistry {
    // indexed by AgentKind::index
    agents: [AgentDefinition; 4],
}

impl AgentRegistry {
    fn with_defaults() -> Self {
        Self {
            agents: [
                create_researcher(),
                create_creative(),
                create_technical(),
                create_summarizer(),
            ],
        }
    }

    pub fn global() -> &'static AgentRegistry {
        &REGISTRY
    }

    pub fn lookup(&self, kind: AgentKind) -> &AgentDefinition {
        &self.agents[kind.index()]
    }

    pub fn lookup_name(&self, name: &str) -> Result<&AgentDefinition> {
        let kind: AgentKind = name.parse()?;
        Ok(self.lookup(kind))
    }

    pub fn definitions(&self) -> impl Iterator<Item = &AgentDefinition> {
        self.agents.iter()
    }

    /// Identifiers the router is allowed to emit.
    pub fn identifiers(&self) -> Vec<&'static str> {
        self.agents.iter().map(|a| a.kind.as_str()).collect()
    }
}
