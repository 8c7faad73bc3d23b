//! Switchyard - router + specialized agent composition over a chat-completion API
//!
//! A router model call picks one of a fixed set of agents for each query;
//! the composer can also chain agents (sequential) or fan out (parallel).
//! Results are recorded in a pluggable session store and served over HTTP.

pub mod agents;
pub mod cli;
mod config;
pub mod core;
pub mod error;
pub mod http;
pub mod storage;
pub mod utils;

pub use agents::{AgentKind, AgentRegistry, Composer, Composition, CompositionPattern};
pub use config::{LLMConfig, ServerConfig, Settings, StorageBackend, StorageConfig};
pub use error::AgentError;
pub use http::{router, serve, AppState, ServeHandle};
