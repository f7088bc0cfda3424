//! Chat panel
//!
//! Modes: idle, a conversation open, or recording a voice note for the open
//! conversation. A poller refreshes the conversation list and the open
//! conversation; the server's latest answer is always what gets rendered.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use shared::Lang;
use shared::models::{ChatMessage, Conversation, Direction, MessageType, ReplyTemplate};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::Instant;

use super::capture::{AudioCapture, MediaError, Microphone};
use crate::api::{AudioClip, HrApi};
use crate::client::HttpClient;
use crate::notify::NoticeBoard;
use crate::page::{LoadOutcome, Refresh, generic_failure_text, load_into, text_matches};
use crate::render::format::{clock, elapsed_clock, time_ago, truncate};
use crate::render::{Html, HtmlBuilder, safe_url};
use crate::request::RequestSlot;
use crate::{ClientError, ClientResult};

/// File name and type of recorded voice notes
pub const RECORDING_NAME: &str = "recording.mp3";
pub const RECORDING_MIME: &str = "audio/mpeg";

/// Characters of the last message shown in the list
const PREVIEW_LEN: usize = 30;

/// Observable panel mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelState {
    Idle,
    Open(i64),
    Recording(i64),
}

enum Mode {
    Idle,
    Open {
        conversation_id: i64,
    },
    Recording {
        conversation_id: i64,
        started: Instant,
        capture: Box<dyn AudioCapture>,
    },
}

impl Mode {
    fn conversation_id(&self) -> Option<i64> {
        match self {
            Mode::Idle => None,
            Mode::Open { conversation_id } | Mode::Recording { conversation_id, .. } => {
                Some(*conversation_id)
            }
        }
    }

    fn state(&self) -> PanelState {
        match self {
            Mode::Idle => PanelState::Idle,
            Mode::Open { conversation_id } => PanelState::Open(*conversation_id),
            Mode::Recording {
                conversation_id, ..
            } => PanelState::Recording(*conversation_id),
        }
    }
}

struct Inner {
    mode: Mode,
    conversations: Vec<Conversation>,
    messages: Vec<ChatMessage>,
    templates: Vec<ReplyTemplate>,
    search: String,
    draft: String,
}

/// WhatsApp-style chat panel
pub struct ChatPanel<C> {
    api: HrApi<C>,
    microphone: Arc<dyn Microphone>,
    notices: NoticeBoard,
    lang: Lang,
    inner: Arc<Mutex<Inner>>,
    conversations_slot: RequestSlot,
    messages_slot: RequestSlot,
}

impl<C> Clone for ChatPanel<C> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            microphone: Arc::clone(&self.microphone),
            notices: self.notices.clone(),
            lang: self.lang,
            inner: Arc::clone(&self.inner),
            conversations_slot: self.conversations_slot.clone(),
            messages_slot: self.messages_slot.clone(),
        }
    }
}

impl<C: HttpClient + 'static> ChatPanel<C> {
    pub fn new(
        api: HrApi<C>,
        microphone: Arc<dyn Microphone>,
        notices: NoticeBoard,
        lang: Lang,
    ) -> Self {
        Self {
            api,
            microphone,
            notices,
            lang,
            inner: Arc::new(Mutex::new(Inner {
                mode: Mode::Idle,
                conversations: Vec::new(),
                messages: Vec::new(),
                templates: Vec::new(),
                search: String::new(),
                draft: String::new(),
            })),
            conversations_slot: RequestSlot::new("conversations"),
            messages_slot: RequestSlot::new("messages"),
        }
    }

    pub async fn state(&self) -> PanelState {
        self.inner.lock().await.mode.state()
    }

    pub async fn open_conversation_id(&self) -> Option<i64> {
        self.inner.lock().await.mode.conversation_id()
    }

    pub async fn load_conversations(&self) -> ClientResult<LoadOutcome> {
        load_into(
            &self.conversations_slot,
            &self.notices,
            self.lang.pick("خطأ في تحميل المحادثات", "Error loading conversations"),
            self.api.conversations(),
            || self.inner.lock(),
            |inner: &mut Inner, conversations: Vec<Conversation>| {
                let count = conversations.len();
                inner.conversations = conversations;
                Some(count)
            },
        )
        .await
    }

    /// Reload the open conversation. The response is dropped if another
    /// conversation was opened meanwhile.
    pub async fn load_messages(&self) -> ClientResult<LoadOutcome> {
        let Some(conversation_id) = self.open_conversation_id().await else {
            return Ok(LoadOutcome::Superseded);
        };
        load_into(
            &self.messages_slot,
            &self.notices,
            self.lang.pick("خطأ في تحميل الرسائل", "Error loading messages"),
            self.api.messages(conversation_id),
            || self.inner.lock(),
            |inner: &mut Inner, messages: Vec<ChatMessage>| {
                if inner.mode.conversation_id() != Some(conversation_id) {
                    tracing::debug!(conversation_id, "Conversation switched, dropping messages");
                    return None;
                }
                let count = messages.len();
                inner.messages = messages;
                Some(count)
            },
        )
        .await
    }

    /// Select a conversation. An active recording is discarded.
    pub async fn open_conversation(&self, conversation_id: i64) -> ClientResult<LoadOutcome> {
        {
            let mut inner = self.inner.lock().await;
            let previous = std::mem::replace(&mut inner.mode, Mode::Open { conversation_id });
            if let Mode::Recording { capture, .. } = previous {
                tracing::info!(conversation_id, "Discarding recording on conversation switch");
                capture.discard();
            }
            inner.messages.clear();
        }
        tracing::debug!(conversation_id, "Conversation opened");
        self.load_messages().await
    }

    /// Back to idle; an active recording is discarded
    pub async fn close_conversation(&self) {
        let mut inner = self.inner.lock().await;
        if let Mode::Recording { capture, .. } = std::mem::replace(&mut inner.mode, Mode::Idle) {
            capture.discard();
        }
        inner.messages.clear();
        self.messages_slot.cancel();
    }

    pub async fn set_draft(&self, text: &str) {
        self.inner.lock().await.draft = text.to_string();
    }

    pub async fn draft(&self) -> String {
        self.inner.lock().await.draft.clone()
    }

    /// Send the text (trimmed). Returns false without sending when the text
    /// is blank or no conversation is open.
    pub async fn send_message(&self, text: &str) -> ClientResult<bool> {
        let text = text.trim();
        let Some(conversation_id) = self.open_conversation_id().await else {
            return Ok(false);
        };
        if text.is_empty() {
            return Ok(false);
        }

        match self.api.send_text(conversation_id, text).await {
            Ok(_) => {
                tracing::info!(conversation_id, "Message sent");
                self.inner.lock().await.draft.clear();
                self.reload_after_send().await;
                Ok(true)
            }
            Err(err) => {
                tracing::warn!(conversation_id, error = %err, "Send failed");
                self.notices.error(err.user_message(
                    self.lang.pick("فشل إرسال الرسالة", "Failed to send the message"),
                ));
                Err(err)
            }
        }
    }

    /// Ask for the microphone and start buffering. On denial the panel
    /// stays on the open conversation.
    pub async fn start_recording(&self) -> ClientResult<()> {
        let lang = self.lang;
        let conversation_id = {
            let inner = self.inner.lock().await;
            match inner.mode {
                Mode::Open { conversation_id } => conversation_id,
                Mode::Recording { .. } => return Ok(()),
                Mode::Idle => {
                    let message = lang
                        .pick("يرجى اختيار محادثة أولاً", "Open a conversation first")
                        .to_string();
                    self.notices.error(message.clone());
                    return Err(ClientError::Validation(message));
                }
            }
        };

        let capture = match self.microphone.open().await {
            Ok(capture) => capture,
            Err(err) => {
                tracing::warn!(conversation_id, error = %err, "Microphone unavailable");
                let text = match err {
                    MediaError::PermissionDenied => lang.pick(
                        "لا يمكن الوصول إلى الميكروفون",
                        "Microphone access was denied",
                    ),
                    MediaError::Unavailable(_) => lang.pick(
                        "الميكروفون غير متاح",
                        "No microphone available",
                    ),
                };
                self.notices.error(text);
                return Err(err.into());
            }
        };

        let mut inner = self.inner.lock().await;
        match inner.mode {
            Mode::Open {
                conversation_id: current,
            } if current == conversation_id => {
                inner.mode = Mode::Recording {
                    conversation_id,
                    started: Instant::now(),
                    capture,
                };
                tracing::info!(conversation_id, "Recording started");
                Ok(())
            }
            _ => {
                // Conversation changed while waiting for the device
                capture.discard();
                Err(ClientError::Superseded)
            }
        }
    }

    /// Elapsed recording time as `m:ss`
    pub async fn recording_clock(&self) -> Option<String> {
        match &self.inner.lock().await.mode {
            Mode::Recording { started, .. } => Some(elapsed_clock(started.elapsed())),
            _ => None,
        }
    }

    /// Stop recording and upload the buffered audio. Returns false when
    /// nothing was recorded (nothing is uploaded then).
    pub async fn stop_recording(&self) -> ClientResult<bool> {
        let (conversation_id, capture) = {
            let mut inner = self.inner.lock().await;
            match std::mem::replace(&mut inner.mode, Mode::Idle) {
                Mode::Recording {
                    conversation_id,
                    capture,
                    ..
                } => {
                    inner.mode = Mode::Open { conversation_id };
                    (conversation_id, capture)
                }
                other => {
                    inner.mode = other;
                    return Ok(false);
                }
            }
        };

        let bytes = capture.finish().concat();
        if bytes.is_empty() {
            tracing::warn!(conversation_id, "Empty recording, nothing to upload");
            self.notices
                .warning(self.lang.pick("لم يتم تسجيل أي صوت", "Nothing was recorded"));
            return Ok(false);
        }

        let clip = AudioClip {
            file_name: RECORDING_NAME.to_string(),
            mime: RECORDING_MIME.to_string(),
            bytes,
        };
        self.upload_audio(conversation_id, clip).await.map(|_| true)
    }

    /// Stop recording and drop the audio. Returns whether a recording was active.
    pub async fn cancel_recording(&self) -> bool {
        let mut inner = self.inner.lock().await;
        match std::mem::replace(&mut inner.mode, Mode::Idle) {
            Mode::Recording {
                conversation_id,
                capture,
                ..
            } => {
                capture.discard();
                inner.mode = Mode::Open { conversation_id };
                tracing::info!(conversation_id, "Recording cancelled");
                true
            }
            other => {
                inner.mode = other;
                false
            }
        }
    }

    /// Upload an existing audio file; the MIME type is sniffed from the bytes
    pub async fn send_audio_file(&self, file_name: &str, bytes: Vec<u8>) -> ClientResult<()> {
        let Some(conversation_id) = self.open_conversation_id().await else {
            let message = self
                .lang
                .pick("يرجى اختيار محادثة أولاً", "Open a conversation first")
                .to_string();
            self.notices.error(message.clone());
            return Err(ClientError::Validation(message));
        };
        let clip = AudioClip {
            file_name: file_name.to_string(),
            mime: sniff_audio_mime(&bytes).to_string(),
            bytes,
        };
        self.upload_audio(conversation_id, clip).await
    }

    async fn upload_audio(&self, conversation_id: i64, clip: AudioClip) -> ClientResult<()> {
        let size = clip.bytes.len();
        match self.api.send_audio(conversation_id, clip).await {
            Ok(_) => {
                tracing::info!(conversation_id, size, "Audio sent");
                self.notices
                    .success(self.lang.pick("تم إرسال الرسالة الصوتية", "Voice message sent"));
                self.reload_after_send().await;
                Ok(())
            }
            Err(err) => {
                tracing::warn!(conversation_id, error = %err, "Audio upload failed");
                self.notices.error(err.user_message(
                    self.lang.pick("فشل إرسال الرسالة الصوتية", "Failed to send the voice message"),
                ));
                Err(err)
            }
        }
    }

    async fn reload_after_send(&self) {
        let (messages, conversations) = tokio::join!(self.load_messages(), self.load_conversations());
        if let Err(e) = messages.and(conversations) {
            tracing::debug!(error = %e, "Reload after send failed");
        }
    }

    pub async fn load_templates(&self) -> ClientResult<usize> {
        match self.api.reply_templates().await {
            Ok(templates) => {
                let count = templates.len();
                self.inner.lock().await.templates = templates;
                Ok(count)
            }
            Err(err) => {
                self.notices.error(err.user_message(&generic_failure_text(self.lang)));
                Err(err)
            }
        }
    }

    pub async fn templates(&self) -> Vec<ReplyTemplate> {
        self.inner.lock().await.templates.clone()
    }

    /// Put a template's text into the draft
    pub async fn use_template(&self, template_id: i64) -> Option<String> {
        let mut inner = self.inner.lock().await;
        let content = inner
            .templates
            .iter()
            .find(|t| t.id == template_id)
            .map(|t| t.content.clone())?;
        inner.draft = content.clone();
        Some(content)
    }

    /// Filter the conversation list (name, phone, last message)
    pub async fn search(&self, term: &str, now: NaiveDateTime) -> Html {
        self.inner.lock().await.search = term.to_string();
        self.render_conversations(now).await
    }

    pub async fn conversations(&self) -> Vec<Conversation> {
        self.inner.lock().await.conversations.clone()
    }

    pub async fn visible_conversations(&self) -> Vec<Conversation> {
        let inner = self.inner.lock().await;
        inner
            .conversations
            .iter()
            .filter(|c| {
                text_matches(
                    &inner.search,
                    [
                        c.customer_name.as_deref().unwrap_or_default(),
                        c.customer_phone.as_str(),
                        c.last_message.as_deref().unwrap_or_default(),
                    ],
                )
            })
            .cloned()
            .collect()
    }

    pub async fn messages(&self) -> Vec<ChatMessage> {
        self.inner.lock().await.messages.clone()
    }

    pub async fn render_conversations(&self, now: NaiveDateTime) -> Html {
        let open = self.open_conversation_id().await;
        let conversations = self.visible_conversations().await;
        render_conversation_list(&conversations, open, now, self.lang)
    }

    pub async fn render_messages(&self) -> Html {
        render_message_list(&self.messages().await, self.lang)
    }

    /// Customer name and phone of the open conversation
    pub async fn header(&self) -> Html {
        let inner = self.inner.lock().await;
        let Some(id) = inner.mode.conversation_id() else {
            return Html::default();
        };
        let mut builder = HtmlBuilder::new();
        builder.open("div", &[("class", "chat-header")]);
        match inner.conversations.iter().find(|c| c.id == id) {
            Some(c) => {
                builder
                    .element("h6", &[("class", "mb-0")], c.title())
                    .element("small", &[("class", "text-muted")], &c.customer_phone);
            }
            None => {
                builder.element("h6", &[("class", "mb-0")], &format!("#{id}"));
            }
        }
        if let Mode::Recording { started, .. } = &inner.mode {
            builder.element(
                "span",
                &[("class", "recording-indicator text-danger")],
                &elapsed_clock(started.elapsed()),
            );
        }
        builder.build()
    }

    /// Stop everything (page teardown)
    pub async fn shutdown(&self) {
        self.close_conversation().await;
        self.conversations_slot.cancel();
    }
}

#[async_trait]
impl<C: HttpClient + 'static> Refresh for ChatPanel<C> {
    async fn refresh(&self) {
        let (conversations, messages) = tokio::join!(self.load_conversations(), self.load_messages());
        if let Err(e) = conversations.and(messages) {
            tracing::debug!(error = %e, "Chat refresh failed");
        }
    }
}

/// MIME type of an audio upload, from its content; `audio/mpeg` when unknown
pub fn sniff_audio_mime(bytes: &[u8]) -> &'static str {
    match infer::get(bytes) {
        Some(kind) if kind.mime_type().starts_with("audio/") => kind.mime_type(),
        Some(kind) if kind.mime_type() == "video/webm" => "audio/webm",
        _ => RECORDING_MIME,
    }
}

fn preview(conversation: &Conversation, lang: Lang) -> String {
    match conversation.last_message_type.as_ref() {
        Some(MessageType::Audio) => lang.pick("🎤 رسالة صوتية", "🎤 Voice message").to_string(),
        Some(MessageType::Image) => lang.pick("📷 صورة", "📷 Image").to_string(),
        Some(MessageType::Document) => lang.pick("📄 مستند", "📄 Document").to_string(),
        Some(MessageType::Video) => lang.pick("🎥 فيديو", "🎥 Video").to_string(),
        _ => truncate(conversation.last_message.as_deref().unwrap_or_default(), PREVIEW_LEN),
    }
}

pub fn render_conversation_list(
    conversations: &[Conversation],
    open: Option<i64>,
    now: NaiveDateTime,
    lang: Lang,
) -> Html {
    let mut builder = HtmlBuilder::new();
    if conversations.is_empty() {
        builder.element(
            "div",
            &[("class", "text-center text-muted p-3")],
            lang.pick("لا توجد محادثات", "No conversations"),
        );
        return builder.build();
    }
    for conversation in conversations {
        let id = conversation.id.to_string();
        let class = if open == Some(conversation.id) {
            "conversation-item active"
        } else {
            "conversation-item"
        };
        builder
            .open(
                "div",
                &[("class", class), ("data-action", "open-conversation"), ("data-id", id.as_str())],
            )
            .element("strong", &[], conversation.title())
            .element(
                "small",
                &[("class", "text-muted")],
                &time_ago(conversation.updated_at.as_deref(), now, lang),
            )
            .element("p", &[("class", "preview")], &preview(conversation, lang));
        if conversation.unread_count > 0 {
            builder.element(
                "span",
                &[("class", "badge bg-success rounded-pill")],
                &conversation.unread_count.to_string(),
            );
        }
        builder.close();
    }
    builder.build()
}

fn media(builder: &mut HtmlBuilder, tag: &'static str, url: &str, mime: &str) {
    builder
        .open(tag, &[("controls", "controls")])
        .void("source", &[("src", url), ("type", mime)])
        .close();
}

pub fn render_message_list(messages: &[ChatMessage], lang: Lang) -> Html {
    let mut builder = HtmlBuilder::new();
    for message in messages {
        let side = match message.direction {
            Direction::Outbound => "message outbound",
            _ => "message inbound",
        };
        let id = message.id.to_string();
        builder.open("div", &[("class", side), ("data-id", id.as_str())]);

        let content = message.message_content.as_deref().unwrap_or_default();
        match &message.message_type {
            MessageType::Audio => match message.audio_url.as_deref().and_then(safe_url) {
                Some(url) => media(&mut builder, "audio", url, RECORDING_MIME),
                None => {
                    builder.element("p", &[], lang.pick("🎤 رسالة صوتية", "🎤 Voice message"));
                }
            },
            MessageType::Image => {
                if let Some(url) = message.image_url.as_deref().and_then(safe_url) {
                    builder.void("img", &[("src", url), ("class", "img-fluid rounded"), ("alt", "")]);
                }
            }
            MessageType::Video => {
                if let Some(url) = message.video_url.as_deref().and_then(safe_url) {
                    media(&mut builder, "video", url, "video/mp4");
                }
            }
            MessageType::Document => {
                let url = message.document_url.as_deref().and_then(safe_url).unwrap_or("#");
                let label = if content.is_empty() {
                    lang.pick("📄 مستند", "📄 Document")
                } else {
                    content
                };
                builder.element("a", &[("href", url), ("target", "_blank"), ("rel", "noopener")], label);
            }
            MessageType::Text | MessageType::Other(_) => {
                builder.element("p", &[("class", "mb-1")], content);
            }
        }
        if let Some(caption) = message.caption.as_deref().filter(|c| !c.is_empty()) {
            builder.element("p", &[("class", "caption")], caption);
        }
        builder
            .element("small", &[("class", "time")], &clock(message.timestamp.as_deref()))
            .close();
    }
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sniff_audio_mime() {
        let ogg = b"OggS\x00\x02\x00\x00\x00\x00\x00\x00\x00\x00";
        assert_eq!(sniff_audio_mime(ogg), "audio/ogg");
        assert_eq!(sniff_audio_mime(b"not audio"), "audio/mpeg");
        let png = b"\x89PNG\r\n\x1a\n\x00\x00\x00\x0dIHDR";
        assert_eq!(sniff_audio_mime(png), "audio/mpeg");
    }

    #[test]
    fn test_messages_escape_every_type() {
        let messages = vec![
            ChatMessage {
                id: 1,
                message_content: Some("<b>hi</b>".into()),
                direction: Direction::Inbound,
                ..Default::default()
            },
            ChatMessage {
                id: 2,
                message_type: MessageType::Video,
                video_url: Some("/m/v.mp4\" onerror=\"x".into()),
                caption: Some("<cap>".into()),
                direction: Direction::Outbound,
                ..Default::default()
            },
        ];
        let html = render_message_list(&messages, Lang::En).into_string();
        assert!(html.contains("&lt;b&gt;hi&lt;/b&gt;"));
        assert!(html.contains(r#"<video controls="controls"><source src="/m/v.mp4&quot; onerror=&quot;x" type="video/mp4"></video>"#));
        assert!(html.contains("&lt;cap&gt;"));
        assert!(html.contains(r#"class="message outbound""#));
    }

    #[test]
    fn test_script_urls_are_not_linked() {
        let messages = vec![
            ChatMessage {
                id: 1,
                message_type: MessageType::Document,
                document_url: Some("javascript:alert(1)".into()),
                message_content: Some("invoice.pdf".into()),
                ..Default::default()
            },
            ChatMessage {
                id: 2,
                message_type: MessageType::Image,
                image_url: Some("data:image/svg+xml,<svg onload=x>".into()),
                ..Default::default()
            },
            ChatMessage {
                id: 3,
                message_type: MessageType::Document,
                document_url: Some("/uploads/contract.pdf".into()),
                ..Default::default()
            },
        ];
        let html = render_message_list(&messages, Lang::En).into_string();
        assert!(!html.contains("javascript:"));
        assert!(!html.contains("<img"));
        assert!(html.contains(r##"<a href="#" target="_blank" rel="noopener">invoice.pdf</a>"##));
        assert!(html.contains(r#"href="/uploads/contract.pdf""#));
    }

    #[test]
    fn test_conversation_list_marks_open_and_unread() {
        let now = crate::render::format::parse_timestamp("2025-01-02T12:00:00").unwrap();
        let conversations = vec![
            Conversation {
                id: 1,
                customer_phone: "0501".into(),
                unread_count: 3,
                last_message: Some("x".repeat(40)),
                ..Default::default()
            },
            Conversation {
                id: 2,
                customer_phone: "0502".into(),
                last_message_type: Some(MessageType::Audio),
                ..Default::default()
            },
        ];
        let html = render_conversation_list(&conversations, Some(2), now, Lang::En).into_string();
        assert!(html.contains(r#"<div class="conversation-item active" data-action="open-conversation" data-id="2">"#));
        assert!(html.contains(r#"<span class="badge bg-success rounded-pill">3</span>"#));
        assert!(html.contains(&format!("{}...", "x".repeat(30))));
        assert!(html.contains("Voice message"));
    }
}
