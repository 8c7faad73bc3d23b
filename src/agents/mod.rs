pub mod composer;
pub mod registry;
pub mod router_agent;
pub mod specialized_agent;

pub use composer::{Composer, Composition, CompositionPattern};
pub use registry::{AgentDefinition, AgentKind, AgentRegistry};
pub use router_agent::{RouteDecision, RouterAgent};
pub use specialized_agent::SpecializedAgent;
