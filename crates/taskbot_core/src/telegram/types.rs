//! Bot API payloads, only the fields the bot reads.

use crate::model::{ChatId, MessageId};
use crate::update::{Event, Update};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    #[serde(default)]
    pub description: Option<String>,
    pub result: Option<T>,
}

#[derive(Debug, Deserialize)]
pub struct RawUpdate {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<RawMessage>,
    #[serde(default)]
    pub callback_query: Option<RawCallbackQuery>,
}

#[derive(Debug, Deserialize)]
pub struct RawMessage {
    pub message_id: MessageId,
    pub chat: RawChat,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawChat {
    pub id: ChatId,
}

#[derive(Debug, Deserialize)]
pub struct RawUser {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
pub struct RawCallbackQuery {
    pub id: String,
    pub from: RawUser,
    #[serde(default)]
    pub message: Option<RawMessage>,
    #[serde(default)]
    pub data: Option<String>,
}

impl From<RawUpdate> for Update {
    fn from(raw: RawUpdate) -> Self {
        let event = if let Some(query) = raw.callback_query {
            // Private chats share their id with the user.
            let chat = query
                .message
                .as_ref()
                .map(|message| message.chat.id)
                .unwrap_or(query.from.id);
            Some(Event::Callback {
                id: query.id,
                chat,
                data: query.data.unwrap_or_default(),
            })
        } else {
            raw.message.map(|message| match message.text {
                Some(text) => Event::Text {
                    chat: message.chat.id,
                    text,
                },
                None => Event::NonText {
                    chat: message.chat.id,
                },
            })
        };

        Update {
            sequence: raw.update_id,
            event,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ApiResponse, RawUpdate};
    use crate::update::{Event, Update};

    fn parse(value: serde_json::Value) -> Update {
        serde_json::from_value::<RawUpdate>(value).unwrap().into()
    }

    #[test]
    fn text_message_becomes_text_event() {
        let update = parse(serde_json::json!({
            "update_id": 10,
            "message": {
                "message_id": 3,
                "chat": { "id": 77, "type": "private" },
                "text": "Add"
            }
        }));

        assert_eq!(update.sequence, 10);
        assert_eq!(
            update.event,
            Some(Event::Text {
                chat: 77,
                text: "Add".to_string()
            })
        );
    }

    #[test]
    fn photo_message_becomes_non_text_event() {
        let update = parse(serde_json::json!({
            "update_id": 11,
            "message": {
                "message_id": 4,
                "chat": { "id": 77 },
                "photo": [{ "file_id": "abc" }]
            }
        }));

        assert_eq!(update.event, Some(Event::NonText { chat: 77 }));
    }

    #[test]
    fn callback_uses_message_chat() {
        let update = parse(serde_json::json!({
            "update_id": 12,
            "callback_query": {
                "id": "cb-1",
                "from": { "id": 5 },
                "message": { "message_id": 9, "chat": { "id": -300 } },
                "data": "del_2"
            }
        }));

        assert_eq!(
            update.event,
            Some(Event::Callback {
                id: "cb-1".to_string(),
                chat: -300,
                data: "del_2".to_string()
            })
        );
    }

    #[test]
    fn callback_without_message_falls_back_to_sender() {
        let update = parse(serde_json::json!({
            "update_id": 13,
            "callback_query": { "id": "cb-2", "from": { "id": 5 } }
        }));

        assert_eq!(update.event.map(|event| event.chat()), Some(5));
    }

    #[test]
    fn unhandled_update_kinds_have_no_event() {
        let update = parse(serde_json::json!({
            "update_id": 14,
            "edited_message": { "message_id": 1, "chat": { "id": 1 }, "text": "x" }
        }));

        assert_eq!(update.sequence, 14);
        assert!(update.event.is_none());
    }

    #[test]
    fn api_error_response_parses_without_result() {
        let response: ApiResponse<bool> = serde_json::from_value(serde_json::json!({
            "ok": false,
            "error_code": 400,
            "description": "Bad Request: message to delete not found"
        }))
        .unwrap();

        assert!(!response.ok);
        assert!(response.result.is_none());
        assert_eq!(
            response.description.as_deref(),
            Some("Bad Request: message to delete not found")
        );
    }
}
