use serde_json::Value;
use shared::Payload;
use shared::models::{ChatMessage, Conversation, OutgoingText, ReplyTemplate};

use super::{HrApi, acknowledge};
use crate::ClientResult;
use crate::client::{HttpClient, UploadForm};

/// Audio payload ready for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioClip {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl<C: HttpClient> HrApi<C> {
    /// `GET /api/whatsapp/conversations` (bare array)
    pub async fn conversations(&self) -> ClientResult<Vec<Conversation>> {
        self.fetch("/api/whatsapp/conversations", Payload::Whole).await
    }

    /// `GET /api/whatsapp/messages/{conversation_id}` (bare array, oldest first)
    pub async fn messages(&self, conversation_id: i64) -> ClientResult<Vec<ChatMessage>> {
        self.fetch(
            &format!("/api/whatsapp/messages/{conversation_id}"),
            Payload::Whole,
        )
        .await
    }

    /// `POST /api/whatsapp/send-message` → `{success, error}`
    pub async fn send_text(&self, conversation_id: i64, message: &str) -> ClientResult<Option<String>> {
        let body = OutgoingText {
            conversation_id,
            message: message.to_string(),
        };
        let response: Value = self.http.post("/api/whatsapp/send-message", &body).await?;
        acknowledge(response)
    }

    /// `POST /api/whatsapp/send-audio` (multipart `audio` + `conversation_id`)
    pub async fn send_audio(&self, conversation_id: i64, clip: AudioClip) -> ClientResult<Option<String>> {
        let form = UploadForm::new()
            .file("audio", clip.file_name, clip.mime, clip.bytes)
            .text("conversation_id", conversation_id.to_string());
        let response: Value = self
            .http
            .post_multipart("/api/whatsapp/send-audio", form)
            .await?;
        acknowledge(response)
    }

    /// `GET /api/whatsapp/templates` (bare array)
    pub async fn reply_templates(&self) -> ClientResult<Vec<ReplyTemplate>> {
        self.fetch("/api/whatsapp/templates", Payload::Whole).await
    }
}
