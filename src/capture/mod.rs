//! Image Source Layer
//!
//! Produces an image file path from the camera or from a gallery selection,
//! optionally cropped to a fixed size. The workflow only consumes the
//! [`ImageSource`] trait; [`CommandImageSource`] is the desktop adapter.

pub mod command;
pub mod crop;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use command::CommandImageSource;

/// Message the image picker reports when the user backs out
pub const CANCELLED_MESSAGE: &str = "User cancelled image selection";

/// Acquisition options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureOptions {
    /// Crop to `width` x `height` after acquisition
    pub cropping: bool,
    /// Target height in pixels
    pub height: u32,
    /// Target width in pixels
    pub width: u32,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            cropping: true,
            height: 500,
            width: 600,
        }
    }
}

/// Where an image comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureMode {
    Camera,
    Gallery,
}

impl CaptureMode {
    pub fn name(&self) -> &'static str {
        match self {
            CaptureMode::Camera => "camera",
            CaptureMode::Gallery => "gallery",
        }
    }
}

/// Output of a successful acquisition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureResult {
    /// Filesystem path of the acquired image
    pub path: String,
}

/// Acquisition failure
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("User cancelled image selection")]
    Cancelled,
    #[error("{0}")]
    Failed(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

impl CaptureError {
    /// Classify a bare error message, as reported by pickers that only
    /// surface strings. Only the exact cancellation message is a cancellation.
    pub fn from_message(message: impl Into<String>) -> Self {
        let message = message.into();
        if message == CANCELLED_MESSAGE {
            CaptureError::Cancelled
        } else {
            CaptureError::Failed(message)
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, CaptureError::Cancelled)
    }
}

/// Camera / gallery provider
#[async_trait]
pub trait ImageSource: Send + Sync {
    /// Take a picture with the camera
    async fn open_camera(&self, options: &CaptureOptions) -> Result<CaptureResult, CaptureError>;

    /// Let the user pick an existing image
    async fn open_picker(&self, options: &CaptureOptions) -> Result<CaptureResult, CaptureError>;

    /// Dispatch on [`CaptureMode`]
    async fn acquire(
        &self,
        mode: CaptureMode,
        options: &CaptureOptions,
    ) -> Result<CaptureResult, CaptureError> {
        match mode {
            CaptureMode::Camera => self.open_camera(options).await,
            CaptureMode::Gallery => self.open_picker(options).await,
        }
    }
}
