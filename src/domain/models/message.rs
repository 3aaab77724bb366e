#[cfg(test)]
#[path = "message_test.rs"]
mod tests;

use chrono::SecondsFormat;
use chrono::Utc;
use serde_derive::Deserialize;
use serde_derive::Serialize;
use uuid::Uuid;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn label(&self) -> &'static str {
        match self {
            Role::User => return "You",
            Role::Assistant => return "ThinkScript KB",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub content: String,
    pub timestamp: String,
}

impl Message {
    pub fn new(role: Role, content: &str) -> Message {
        return Message {
            id: Message::create_id(),
            role,
            content: content.to_string(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        };
    }

    pub fn create_id() -> String {
        return format!("msg-{}", Uuid::new_v4());
    }

    /// Content only grows while an answer is streaming in.
    pub fn append(&mut self, text: &str) {
        self.content += text;
    }
}
