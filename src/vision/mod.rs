//! Vision/OCR Layer
//!
//! Turns an image file into text. The workflow only sees the
//! [`TextRecognizer`] trait; progress flows back over a single-subscriber
//! push stream ([`ProgressSink`] on the producer side).

pub mod tesseract;

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;
use tokio::sync::mpsc;

pub use tesseract::TesseractRecognizer;

/// Recognition language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    English,
}

impl Language {
    /// Tesseract language code
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "eng",
        }
    }
}

/// Extra engine variables, passed to the engine as `key=value`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineOptions {
    pub variables: BTreeMap<String, String>,
}

/// Progress report from the recognizer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressEvent {
    /// Percent complete (0 - 100)
    pub percent: f32,
}

impl ProgressEvent {
    pub fn new(percent: f32) -> Self {
        Self { percent }
    }

    /// Progress normalised to [0, 1]
    pub fn fraction(&self) -> f32 {
        if self.percent.is_nan() {
            return 0.0;
        }
        (self.percent / 100.0).clamp(0.0, 1.0)
    }
}

/// Producer half of the progress stream
#[derive(Debug, Clone)]
pub struct ProgressSink {
    tx: mpsc::UnboundedSender<ProgressEvent>,
}

impl ProgressSink {
    /// Create a sink and the receiver observing it
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ProgressEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Report progress. Events sent after the observer went away are dropped.
    pub fn report(&self, percent: f32) {
        let _ = self.tx.send(ProgressEvent::new(percent));
    }
}

/// Recognition failure
#[derive(Debug, Error)]
pub enum RecognizeError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("OCR engine unavailable: {0}")]
    EngineUnavailable(String),
    #[error("OCR engine failed: {0}")]
    EngineFailed(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Text recognition engine
#[async_trait]
pub trait TextRecognizer: Send + Sync {
    /// Recognize the text in the image at `path`
    async fn recognize(
        &self,
        path: &Path,
        language: Language,
        options: &EngineOptions,
        progress: ProgressSink,
    ) -> Result<String, RecognizeError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fraction_is_normalised() {
        assert_eq!(ProgressEvent::new(0.0).fraction(), 0.0);
        assert_eq!(ProgressEvent::new(45.0).fraction(), 0.45);
        assert_eq!(ProgressEvent::new(100.0).fraction(), 1.0);
    }

    #[test]
    fn test_fraction_is_clamped() {
        assert_eq!(ProgressEvent::new(140.0).fraction(), 1.0);
        assert_eq!(ProgressEvent::new(-5.0).fraction(), 0.0);
        assert_eq!(ProgressEvent::new(f32::NAN).fraction(), 0.0);
    }

    #[tokio::test]
    async fn test_sink_delivers_in_order() {
        let (sink, mut rx) = ProgressSink::channel();
        sink.report(10.0);
        sink.report(60.0);
        drop(sink);

        assert_eq!(rx.recv().await, Some(ProgressEvent::new(10.0)));
        assert_eq!(rx.recv().await, Some(ProgressEvent::new(60.0)));
        assert_eq!(rx.recv().await, None);
    }

    #[test]
    fn test_report_after_receiver_dropped() {
        let (sink, rx) = ProgressSink::channel();
        drop(rx);
        sink.report(50.0);
    }

    #[test]
    fn test_language_code() {
        assert_eq!(Language::default().code(), "eng");
    }
}
