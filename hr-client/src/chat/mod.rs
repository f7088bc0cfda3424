//! WhatsApp chat panel and voice notes

mod capture;
mod panel;

pub use capture::{AudioCapture, BufferedCapture, ChunkSink, MediaError, Microphone};
pub use panel::{
    ChatPanel, PanelState, RECORDING_MIME, RECORDING_NAME, render_conversation_list,
    render_message_list, sniff_audio_mime,
};
