//! WhatsApp Chat Model

use serde::{Deserialize, Serialize};

wire_enum! {
    pub enum MessageType {
        Text => "text",
        Audio => "audio",
        Image => "image",
        Document => "document",
        Video => "video",
    }
}

impl Default for MessageType {
    fn default() -> Self {
        MessageType::Text
    }
}

wire_enum! {
    pub enum Direction {
        Inbound => "inbound",
        Outbound => "outbound",
    }
}

impl Default for Direction {
    fn default() -> Self {
        Direction::Inbound
    }
}

/// Conversation with one customer, keyed by phone number
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Conversation {
    pub id: i64,
    pub customer_phone: String,
    pub customer_name: Option<String>,
    pub last_message: Option<String>,
    pub last_message_type: Option<MessageType>,
    pub last_message_direction: Option<Direction>,
    pub unread_count: u32,
    pub status: Option<String>,
    pub assigned_to: Option<i64>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl Conversation {
    /// Customer name, or the phone number when no name is known
    pub fn title(&self) -> &str {
        self.customer_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.customer_phone)
    }
}

/// One message of a conversation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatMessage {
    pub id: i64,
    pub conversation_id: i64,
    pub message_type: MessageType,
    pub message_content: Option<String>,
    pub audio_url: Option<String>,
    pub image_url: Option<String>,
    pub document_url: Option<String>,
    pub video_url: Option<String>,
    pub caption: Option<String>,
    pub direction: Direction,
    pub status: Option<String>,
    pub timestamp: Option<String>,
}

/// Text message (`POST /api/whatsapp/send-message`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutgoingText {
    pub conversation_id: i64,
    pub message: String,
}

/// Canned reply (`GET /api/whatsapp/templates`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplyTemplate {
    pub id: i64,
    pub name: String,
    pub content: String,
    pub template_type: Option<String>,
    pub category: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_falls_back_to_phone() {
        let mut c = Conversation {
            customer_phone: "+966500000000".into(),
            ..Default::default()
        };
        assert_eq!(c.title(), "+966500000000");
        c.customer_name = Some("Nora".into());
        assert_eq!(c.title(), "Nora");
    }

    #[test]
    fn test_message_shape() {
        let m: ChatMessage = serde_json::from_str(
            r#"{"id":1,"conversation_id":2,"message_type":"audio",
                "audio_url":"/media/a.mp3","direction":"outbound","timestamp":"2025-01-02T10:05:00"}"#,
        )
        .unwrap();
        assert_eq!(m.message_type, MessageType::Audio);
        assert_eq!(m.direction, Direction::Outbound);
    }
}
