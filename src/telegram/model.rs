use serde::{Deserialize, Serialize};

/// One entry of a `getUpdates` result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub chat: Chat,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chat {
    pub id: i64,
}

impl Update {
    /// Text message from `chat_id`
    pub fn text_message(update_id: i64, chat_id: i64, text: impl Into<String>) -> Self {
        Self {
            update_id,
            message: Some(Message {
                chat: Chat { id: chat_id },
                text: Some(text.into()),
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct GetUpdatesResponse {
    #[serde(default)]
    pub result: Vec<Update>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SendMessageRequest<'a> {
    pub chat_id: i64,
    pub text: &'a str,
    pub parse_mode: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_updates() {
        let json = serde_json::json!({
            "ok": true,
            "result": [
                {
                    "update_id": 901,
                    "message": {
                        "message_id": 3,
                        "chat": { "id": 123456, "type": "private" },
                        "text": "/check"
                    }
                },
                { "update_id": 902, "edited_message": { "text": "x" } },
                { "update_id": 903, "message": { "chat": { "id": 123456 }, "sticker": {} } }
            ]
        });
        let resp: GetUpdatesResponse = serde_json::from_value(json).unwrap();
        assert_eq!(resp.result.len(), 3);
        assert_eq!(resp.result[0], Update::text_message(901, 123456, "/check"));
        assert!(resp.result[1].message.is_none());
        assert_eq!(resp.result[2].message.as_ref().unwrap().text, None);
    }

    #[test]
    fn test_serialize_send_request() {
        let req = SendMessageRequest {
            chat_id: 42,
            text: "*hi*",
            parse_mode: "Markdown",
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "chat_id": 42, "text": "*hi*", "parse_mode": "Markdown" })
        );
    }
}
