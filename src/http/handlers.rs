use super::AppState;
use crate::agents::{AgentKind, AgentRegistry, Composition, CompositionPattern};
use crate::error::{AgentError, Result};
use crate::storage::{generate_key, unix_timestamp};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Number, Value};

#[derive(Debug, Deserialize)]
pub struct ChatBody {
    #[serde(default)]
    pub messages: Vec<IncomingMessage>,
    pub pattern: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct IncomingMessage {
    pub role: Option<String>,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct ChatReply {
    pub message: AssistantMessage,
}

#[derive(Debug, Serialize)]
pub struct AssistantMessage {
    pub role: &'static str,
    pub content: String,
    pub metadata: ChatMetadata,
}

/// Same shape for every pattern; `agent` and `reason` only appear for branching.
#[derive(Debug, Serialize)]
pub struct ChatMetadata {
    pub pattern: CompositionPattern,
    pub agents: Vec<AgentKind>,
    pub session_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent: Option<AgentKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ChatReply {
    fn new(composition: Composition, session_id: String) -> Self {
        let agent = match composition.pattern {
            CompositionPattern::Branching => composition.agents.first().copied(),
            _ => None,
        };

        Self {
            message: AssistantMessage {
                role: "assistant",
                content: composition.content,
                metadata: ChatMetadata {
                    pattern: composition.pattern,
                    agents: composition.agents,
                    session_id,
                    agent,
                    reason: composition.reason,
                },
            },
        }
    }
}

/// The query is the content of the first message.
fn select_query(messages: &[IncomingMessage]) -> Result<&str> {
    let message = messages
        .first()
        .ok_or_else(|| AgentError::bad_request("messages must contain at least one message"))?;

    if message.content.trim().is_empty() {
        return Err(AgentError::bad_request("message content must not be empty"));
    }
    Ok(&message.content)
}

pub async fn chat(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ChatBody>, JsonRejection>,
) -> Result<Json<ChatReply>> {
    let Json(body) = payload?;
    let query = select_query(&body.messages)?;
    let pattern = CompositionPattern::parse_optional(body.pattern.as_deref())?;

    let composition = state.composer.compose(query, pattern).await?;

    let session_id = generate_key("session");
    let mut record = json!({
        "query": query,
        "pattern": composition.pattern,
        "agents": composition.agents,
        "response": composition.content,
    });
    if let Some(reason) = &composition.reason {
        record["reason"] = json!(reason);
    }
    state.store.put(&session_id, record).await?;
    tracing::info!("[chat] Stored session '{}'", session_id);

    Ok(Json(ChatReply::new(composition, session_id)))
}

#[derive(Debug, Deserialize)]
pub struct MemoryBody {
    pub key: Option<String>,
    #[serde(default)]
    pub value: Value,
}

pub async fn store_memory(
    State(state): State<AppState>,
    payload: std::result::Result<Json<MemoryBody>, JsonRejection>,
) -> Result<Json<Value>> {
    let Json(body) = payload?;
    let key = body
        .key
        .filter(|k| !k.is_empty())
        .ok_or_else(|| AgentError::bad_request("key is required"))?;

    state.store.put(&key, body.value).await?;
    Ok(Json(json!({ "status": "stored" })))
}

pub async fn list_memory(State(state): State<AppState>) -> Result<Json<Value>> {
    let mut keys = state.store.keys().await?;
    keys.sort();
    Ok(Json(json!({ "keys": keys })))
}

pub async fn get_memory(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<Value>> {
    let value = state.store.get(&key).await?;
    Ok(Json(json!({ "value": value })))
}

pub async fn delete_memory(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<Value>> {
    let status = if state.store.delete(&key).await? {
        "deleted"
    } else {
        "missing"
    };
    Ok(Json(json!({ "status": status })))
}

pub async fn list_tools() -> Json<Value> {
    let tools: Vec<Value> = AgentRegistry::global()
        .definitions()
        .map(|d| json!({ "id": d.kind, "description": d.description }))
        .collect();

    let patterns: Vec<Value> = CompositionPattern::ALL
        .iter()
        .map(|p| json!({ "id": p, "description": p.description() }))
        .collect();

    Json(json!({ "tools": tools, "patterns": patterns }))
}

pub async fn list_resources() -> Json<Value> {
    let patterns: Map<String, Value> = CompositionPattern::ALL
        .iter()
        .map(|p| (p.as_str().to_string(), json!(p.description())))
        .collect();

    Json(json!({ "patterns": patterns }))
}

#[derive(Debug, Deserialize)]
pub struct PayBody {
    pub amount: Number,
}

/// Mock payment: every amount completes immediately.
pub async fn pay(
    State(state): State<AppState>,
    payload: std::result::Result<Json<PayBody>, JsonRejection>,
) -> Result<Json<Value>> {
    let Json(body) = payload?;

    let transaction_id = generate_key("tx");
    state
        .store
        .put(
            &transaction_id,
            json!({
                "amount": body.amount,
                "status": "completed",
                "created_at": unix_timestamp(),
            }),
        )
        .await?;
    tracing::info!("[pay] Completed mock transaction '{}'", transaction_id);

    Ok(Json(json!({
        "transaction_id": transaction_id,
        "status": "completed",
    })))
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(role: Option<&str>, content: &str) -> IncomingMessage {
        IncomingMessage {
            role: role.map(str::to_string),
            content: content.to_string(),
        }
    }

    #[test]
    fn test_select_query_uses_first_message() {
        let messages = vec![message(None, "first"), message(None, "second")];
        assert_eq!(select_query(&messages).unwrap(), "first");

        let messages = vec![
            message(Some("system"), "be brief"),
            message(Some("user"), "question"),
        ];
        assert_eq!(select_query(&messages).unwrap(), "be brief");
    }

    #[test]
    fn test_select_query_rejects_empty_input() {
        assert!(matches!(select_query(&[]), Err(AgentError::BadRequest(_))));
        assert!(matches!(
            select_query(&[message(None, "   ")]),
            Err(AgentError::BadRequest(_))
        ));
    }

    #[test]
    fn test_metadata_shape_per_pattern() {
        let branching = ChatReply::new(
            Composition {
                content: "answer".to_string(),
                pattern: CompositionPattern::Branching,
                agents: vec![AgentKind::Technical],
                reason: Some("code question".to_string()),
            },
            "session_1_0".to_string(),
        );
        let value = serde_json::to_value(&branching).unwrap();
        assert_eq!(value["message"]["role"], "assistant");
        assert_eq!(value["message"]["metadata"]["agent"], "technical");
        assert_eq!(value["message"]["metadata"]["reason"], "code question");
        assert_eq!(value["message"]["metadata"]["pattern"], "branching");

        let sequential = ChatReply::new(
            Composition {
                content: "summary".to_string(),
                pattern: CompositionPattern::Sequential,
                agents: vec![AgentKind::Researcher, AgentKind::Summarizer],
                reason: None,
            },
            "session_1_1".to_string(),
        );
        let value = serde_json::to_value(&sequential).unwrap();
        let metadata = value["message"]["metadata"].as_object().unwrap();
        assert!(!metadata.contains_key("agent"));
        assert!(!metadata.contains_key("reason"));
        assert_eq!(metadata["agents"], json!(["researcher", "summarizer"]));
        assert_eq!(metadata["session_id"], "session_1_1");
    }
}
