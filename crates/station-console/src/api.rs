//! This module contains the client for the optional Station backend
//! endpoints behind the Dashboard, Rooms and Loop panels.
//!
//! Every call makes a single request and resolves to a value: a backend that
//! is missing or failing shows up as [`ApiReply::Unavailable`] or a stub
//! message, never as an error.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, instrument, warn};

use crate::error::{Failure, RemoteError};
use crate::keys::KeysRecord;
use crate::models::*;
use crate::transport::Transport;

/// Shown in the chat log when `/chat` cannot be reached.
pub const CHAT_STUB: &str = "[stub] Backend /chat not available. Message stored locally.";

/// Default page size of the Rooms panel.
pub const DEFAULT_MESSAGE_LIMIT: u32 = 80;

/// A typed reply from an optional endpoint.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiReply<T> {
    Ok(T),
    Unavailable(String),
}

impl<T> ApiReply<T> {
    pub fn ok(self) -> Option<T> {
        match self {
            ApiReply::Ok(value) => Some(value),
            ApiReply::Unavailable(_) => None,
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, ApiReply::Ok(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiReply<U> {
        match self {
            ApiReply::Ok(value) => ApiReply::Ok(f(value)),
            ApiReply::Unavailable(detail) => ApiReply::Unavailable(detail),
        }
    }
}

impl Health {
    /// One-line summary for the Dashboard header.
    pub fn summary(&self) -> String {
        match self.features.as_deref() {
            Some(features) if !features.is_empty() => {
                format!("status: {} (features: {})", self.status, features.join(", "))
            }
            _ => format!("status: {}", self.status),
        }
    }
}

fn decode<D: DeserializeOwned>(path: &str, result: Result<Value, RemoteError>) -> ApiReply<D> {
    let decoded = result.and_then(|value| {
        serde_json::from_value(value).map_err(|source| RemoteError::Decode {
            path: path.to_string(),
            source,
        })
    });
    match decoded {
        Ok(value) => ApiReply::Ok(value),
        Err(e) => {
            warn!(error = %e, "Backend endpoint unavailable.");
            ApiReply::Unavailable(Failure::from(&e).to_string())
        }
    }
}

/// Picks the reply text out of a `/chat` response: `answer`, then `text`,
/// then the raw JSON.
fn chat_reply_text(response: &Value) -> String {
    ["answer", "text"]
        .iter()
        .filter_map(|field| response.get(*field))
        .find_map(|value| match value {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Null | Value::Bool(false) => None,
            Value::String(_) => None,
            other => Some(other.to_string()),
        })
        .unwrap_or_else(|| response.to_string())
}

/// Percent-encodes a value for use as a single path segment.
fn path_segment(raw: &str) -> String {
    // form encoding writes spaces as '+' and escapes literal '+', so every
    // '+' left in the output stands for a space.
    url::form_urlencoded::byte_serialize(raw.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

pub struct StationApi<T> {
    transport: T,
}

impl<T: Transport> StationApi<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    async fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<Value, RemoteError> {
        let body = serde_json::to_value(body).map_err(|source| RemoteError::Decode {
            path: path.to_string(),
            source,
        })?;
        self.transport.post_json(path, &body, None).await
    }

    #[instrument(skip(self))]
    pub async fn health(&self) -> ApiReply<Health> {
        decode("/health", self.transport.get_json("/health").await)
    }

    /// Sends a chat line with the stored OpenAI key. Blank text sends nothing
    /// and yields `None`.
    #[instrument(skip(self, text, record))]
    pub async fn chat(&self, text: &str, record: &KeysRecord) -> Option<String> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        let request = ChatRequest {
            text,
            key: &record.openai_key,
        };
        let reply = match self.post("/chat", &request).await {
            Ok(response) => chat_reply_text(&response),
            Err(e) => {
                warn!(error = %e, "Chat backend unavailable.");
                CHAT_STUB.to_string()
            }
        };
        Some(reply)
    }

    #[instrument(skip(self))]
    pub async fn rooms(&self) -> ApiReply<Vec<Room>> {
        decode::<RoomsEnvelope>("/rooms", self.transport.get_json("/rooms").await)
            .map(|envelope| envelope.rooms)
    }

    #[instrument(skip(self))]
    pub async fn ensure_room(&self, room_id: &str, title: &str) -> ApiReply<Value> {
        info!("Ensuring room.");
        let body = RoomTitle { room_id, title };
        decode("/rooms/ensure", self.post("/rooms/ensure", &body).await)
    }

    #[instrument(skip(self))]
    pub async fn rename_room(&self, room_id: &str, title: &str) -> ApiReply<Value> {
        info!("Renaming room.");
        let body = RoomTitle { room_id, title };
        decode("/rooms/rename", self.post("/rooms/rename", &body).await)
    }

    #[instrument(skip(self))]
    pub async fn room_messages(&self, room_id: &str, limit: u32) -> ApiReply<Vec<RoomMessage>> {
        let path = format!("/rooms/{}/messages?limit={limit}", path_segment(room_id));
        decode::<MessagesEnvelope>(&path, self.transport.get_json(&path).await)
            .map(|envelope| envelope.messages)
    }

    /// Appends a message to a room. Blank text sends nothing and yields
    /// `None`.
    #[instrument(skip(self, text))]
    pub async fn post_message(&self, room_id: &str, role: &str, text: &str) -> Option<ApiReply<Value>> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        let path = format!("/rooms/{}/messages", path_segment(room_id));
        let body = NewMessage { role, text };
        Some(decode(&path, self.post(&path, &body).await))
    }

    #[instrument(skip(self))]
    pub async fn loop_tasks(&self) -> ApiReply<Vec<LoopTask>> {
        decode::<TasksEnvelope>("/api/loop/tasks", self.transport.get_json("/api/loop/tasks").await)
            .map(|envelope| envelope.items)
    }

    /// Queues a loop task; a blank kind is sent as `ping`.
    #[instrument(skip(self, instruction))]
    pub async fn submit_task(&self, kind: &str, instruction: &str) -> ApiReply<Value> {
        let kind = match kind.trim() {
            "" => "ping",
            kind => kind,
        };
        let body = TaskSubmission {
            kind,
            payload: TaskPayload { instruction },
        };
        decode("/api/loop/submit", self.post("/api/loop/submit", &body).await)
    }
}
