pub mod llm;

#[cfg(test)]
pub(crate) mod scripted;

pub use llm::{ChatMessage, Completion, CompletionRequest, FunctionSpec, LLMClient, ModelGateway};
