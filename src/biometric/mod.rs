//! Biometric Gate
//!
//! Answers two questions for the workflow: which biometric method the device
//! offers, and whether the user passed the prompt. The error codes mirror the
//! ones mobile biometric providers report so the workflow can tell a user
//! cancellation apart from a real failure.

pub mod fprintd;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub use fprintd::FprintdGate;

/// Biometric method offered by the device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BiometryType {
    TouchId,
    FaceId,
    Fingerprint,
}

impl BiometryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BiometryType::TouchId => "TouchID",
            BiometryType::FaceId => "FaceID",
            BiometryType::Fingerprint => "Fingerprint",
        }
    }

    /// Face-based methods are not accepted by the workflow
    pub fn is_face_based(&self) -> bool {
        matches!(self, BiometryType::FaceId)
    }
}

impl fmt::Display for BiometryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Provider error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorCode {
    AuthenticationFailed,
    AuthenticationCanceled,
    UserCanceled,
    SystemCanceled,
    NotSupported,
    NotAvailable,
    NotEnrolled,
    Timeout,
    Unknown,
}

impl AuthErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthErrorCode::AuthenticationFailed => "AUTHENTICATION_FAILED",
            AuthErrorCode::AuthenticationCanceled => "AUTHENTICATION_CANCELED",
            AuthErrorCode::UserCanceled => "USER_CANCELED",
            AuthErrorCode::SystemCanceled => "SYSTEM_CANCELED",
            AuthErrorCode::NotSupported => "NOT_SUPPORTED",
            AuthErrorCode::NotAvailable => "NOT_AVAILABLE",
            AuthErrorCode::NotEnrolled => "NOT_ENROLLED",
            AuthErrorCode::Timeout => "TIMEOUT",
            AuthErrorCode::Unknown => "UNKNOWN_ERROR",
        }
    }
}

impl fmt::Display for AuthErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error reported by the biometric provider
#[derive(Debug, Clone, Error)]
#[error("{code}: {message}")]
pub struct BiometricError {
    pub code: AuthErrorCode,
    pub message: String,
}

impl BiometricError {
    pub fn new(code: AuthErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Whether the prompt was dismissed on purpose by the user
    pub fn is_user_cancellation(&self) -> bool {
        self.code == AuthErrorCode::AuthenticationCanceled
    }
}

/// Options for the capability query
#[derive(Debug, Clone, Copy)]
pub struct SupportOptions {
    pub unified_errors: bool,
    pub passcode_fallback: bool,
}

impl Default for SupportOptions {
    fn default() -> Self {
        Self {
            unified_errors: false,
            passcode_fallback: true,
        }
    }
}

/// Presentation strings for the authentication prompt, passed through as is
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthConfig {
    pub title: String,
    pub image_color: String,
    pub sensor_description: String,
    pub sensor_error_description: String,
    pub cancel_text: String,
}

/// Biometric capability and authentication provider
#[async_trait]
pub trait BiometricGate: Send + Sync {
    /// Which biometric method is available, or why none is
    async fn is_supported(&self, options: &SupportOptions) -> Result<BiometryType, BiometricError>;

    /// Show the prompt and wait for the user
    async fn authenticate(&self, prompt: &str, config: &AuthConfig) -> Result<(), BiometricError>;

    /// Dismiss a running prompt. The pending `authenticate` call resolves with
    /// `AUTHENTICATION_CANCELED`.
    fn cancel(&self) {}
}
