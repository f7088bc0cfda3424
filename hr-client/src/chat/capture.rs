//! Audio capture seam
//!
//! The panel never talks to a device directly. A [`Microphone`] grants a
//! capture, the device side pushes encoded chunks through a [`ChunkSink`],
//! and the panel collects them with [`AudioCapture::finish`].

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("Microphone access denied")]
    PermissionDenied,

    #[error("Audio device unavailable: {0}")]
    Unavailable(String),
}

/// Source of audio captures
#[async_trait]
pub trait Microphone: Send + Sync {
    /// Ask for access and start capturing
    async fn open(&self) -> Result<Box<dyn AudioCapture>, MediaError>;
}

/// A running capture
pub trait AudioCapture: Send {
    /// Stop and return every chunk captured so far, in order
    fn finish(self: Box<Self>) -> Vec<Vec<u8>>;

    /// Stop and drop the audio
    fn discard(self: Box<Self>) {
        let _ = self.finish();
    }
}

/// Producer half handed to the device side
#[derive(Debug, Clone)]
pub struct ChunkSink {
    tx: mpsc::UnboundedSender<Vec<u8>>,
    stop: CancellationToken,
}

impl ChunkSink {
    /// Queue a chunk; false once the capture has stopped
    pub fn push(&self, chunk: Vec<u8>) -> bool {
        if self.stop.is_cancelled() || chunk.is_empty() {
            return !self.stop.is_cancelled();
        }
        self.tx.send(chunk).is_ok()
    }

    pub fn is_stopped(&self) -> bool {
        self.stop.is_cancelled()
    }

    /// Resolves when the capture is finished or discarded
    pub async fn stopped(&self) {
        self.stop.cancelled().await
    }
}

/// Capture that buffers chunks in memory
#[derive(Debug)]
pub struct BufferedCapture {
    rx: mpsc::UnboundedReceiver<Vec<u8>>,
    stop: CancellationToken,
}

impl BufferedCapture {
    pub fn channel() -> (ChunkSink, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        let stop = CancellationToken::new();
        (
            ChunkSink {
                tx,
                stop: stop.clone(),
            },
            Self { rx, stop },
        )
    }
}

impl AudioCapture for BufferedCapture {
    fn finish(mut self: Box<Self>) -> Vec<Vec<u8>> {
        self.stop.cancel();
        self.rx.close();
        let mut chunks = Vec::new();
        while let Ok(chunk) = self.rx.try_recv() {
            chunks.push(chunk);
        }
        tracing::debug!(chunks = chunks.len(), "Capture finished");
        chunks
    }
}

impl Drop for BufferedCapture {
    fn drop(&mut self) {
        self.stop.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finish_returns_chunks_in_order() {
        let (sink, capture) = BufferedCapture::channel();
        assert!(sink.push(vec![1, 2]));
        assert!(sink.push(vec![]));
        assert!(sink.push(vec![3]));
        let chunks = Box::new(capture).finish();
        assert_eq!(chunks, vec![vec![1, 2], vec![3]]);
        assert!(sink.is_stopped());
        assert!(!sink.push(vec![4]));
    }

    #[tokio::test]
    async fn test_discard_stops_producer() {
        let (sink, capture) = BufferedCapture::channel();
        let producer = tokio::spawn(async move {
            sink.stopped().await;
            sink.push(vec![9])
        });
        Box::new(capture).discard();
        assert!(!producer.await.unwrap());
    }
}
