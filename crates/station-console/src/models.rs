use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// ===================================================================
// == Health & Chat (Dashboard panel) ==
// ===================================================================

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Health {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<Vec<String>>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ChatRequest<'a> {
    pub text: &'a str,
    pub key: &'a str,
}

// ===================================================================
// == Rooms ==
// ===================================================================

/// Reads a missing or `null` string as `""`.
fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Room {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub created_at: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RoomMessage {
    pub id: i64,
    pub role: String,
    pub text: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub created_at: String,
}

#[derive(Deserialize, Debug, Default)]
pub(crate) struct RoomsEnvelope {
    #[serde(default)]
    pub rooms: Vec<Room>,
}

#[derive(Deserialize, Debug, Default)]
pub(crate) struct MessagesEnvelope {
    #[serde(default)]
    pub messages: Vec<RoomMessage>,
}

#[derive(Serialize, Debug)]
pub struct RoomTitle<'a> {
    pub room_id: &'a str,
    pub title: &'a str,
}

#[derive(Serialize, Debug)]
pub struct NewMessage<'a> {
    pub role: &'a str,
    pub text: &'a str,
}

// ===================================================================
// == Loop tasks ==
// ===================================================================

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LoopTask {
    pub id: Value,
    pub kind: String,
    pub status: String,
    #[serde(default)]
    pub payload: Value,
}

#[derive(Deserialize, Debug, Default)]
pub(crate) struct TasksEnvelope {
    #[serde(default)]
    pub items: Vec<LoopTask>,
}

#[derive(Serialize, Debug)]
pub struct TaskSubmission<'a> {
    pub kind: &'a str,
    pub payload: TaskPayload<'a>,
}

#[derive(Serialize, Debug)]
pub struct TaskPayload<'a> {
    pub instruction: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_room_fields_read_as_empty() {
        let room: Room =
            serde_json::from_str(r#"{"id": "9001", "title": null, "created_at": null}"#).unwrap();
        assert_eq!(room.title, "");
        assert_eq!(room.created_at, "");

        let bare: Room = serde_json::from_str(r#"{"id": "9001"}"#).unwrap();
        assert_eq!(bare.title, "");
    }
}
