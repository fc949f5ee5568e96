//! Session state of the capture-recognize workflow

use std::collections::VecDeque;

use crate::biometric::BiometryType;

/// Image currently on screen
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ImageSelection {
    #[default]
    NoImage,
    Selected { uri: String },
}

impl ImageSelection {
    pub fn uri(&self) -> Option<&str> {
        match self {
            ImageSelection::NoImage => None,
            ImageSelection::Selected { uri } => Some(uri),
        }
    }
}

/// Where the biometric gate stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BiometricStatus {
    /// Capability not resolved yet
    #[default]
    Pending,
    /// Prompt waiting on the sensor
    Prompting,
    /// User authenticated
    Authenticated,
    /// User entered through the manual bypass
    Bypassed,
    /// Authentication failed or was canceled
    Denied,
    /// No usable biometric hardware; the manual bypass is offered
    NotSupported,
    /// Hardware present but the method is not accepted
    UnsupportedMethod(BiometryType),
}

/// User-visible alert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub message: String,
}

/// Transient UI state, created on mount and never persisted
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    /// A recognition call is in flight
    pub is_recognizing: bool,
    /// Recognition progress in [0, 1]; only meaningful while recognizing
    pub progress: f32,
    /// Image being processed or displayed
    pub image: ImageSelection,
    /// Last recognized text; empty after a failure
    pub recognized_text: String,
    /// Biometric gate status
    pub biometric: BiometricStatus,
    /// Alerts waiting to be shown
    pub alerts: VecDeque<Alert>,
}

/// What the screen shows, derived from [`SessionState`]
#[derive(Debug, Clone, PartialEq)]
pub enum Presentation {
    /// Waiting on the biometric prompt
    AuthenticationGate { prompting: bool, can_retry: bool },
    /// No biometric hardware: manual bypass
    Fallback,
    /// Face-only device
    UnsupportedMethod(BiometryType),
    /// Camera / gallery triggers
    MainMenu,
    /// Selected image with progress or text
    Result {
        uri: String,
        loading: bool,
        progress: f32,
        text: String,
    },
}

impl SessionState {
    /// Workflow is unlocked
    pub fn biometric_available(&self) -> bool {
        matches!(
            self.biometric,
            BiometricStatus::Authenticated | BiometricStatus::Bypassed
        )
    }

    /// Capability check ran and found nothing usable
    pub fn biometric_attempted(&self) -> bool {
        self.biometric == BiometricStatus::NotSupported
    }

    /// Camera and gallery triggers accept input
    pub fn triggers_enabled(&self) -> bool {
        self.biometric_available() && !self.is_recognizing
    }

    pub(crate) fn begin_recognition(&mut self) {
        self.is_recognizing = true;
        self.progress = 0.0;
    }

    pub(crate) fn finish_recognition(&mut self, text: String) {
        self.recognized_text = text;
        self.is_recognizing = false;
        self.progress = 0.0;
    }

    /// Derive the view to render
    pub fn presentation(&self) -> Presentation {
        match self.biometric {
            BiometricStatus::Authenticated | BiometricStatus::Bypassed => match &self.image {
                ImageSelection::NoImage => Presentation::MainMenu,
                ImageSelection::Selected { uri } => Presentation::Result {
                    uri: uri.clone(),
                    loading: self.is_recognizing,
                    progress: self.progress,
                    text: self.recognized_text.clone(),
                },
            },
            BiometricStatus::NotSupported => Presentation::Fallback,
            BiometricStatus::UnsupportedMethod(method) => Presentation::UnsupportedMethod(method),
            BiometricStatus::Pending => Presentation::AuthenticationGate {
                prompting: false,
                can_retry: false,
            },
            BiometricStatus::Prompting => Presentation::AuthenticationGate {
                prompting: true,
                can_retry: false,
            },
            BiometricStatus::Denied => Presentation::AuthenticationGate {
                prompting: false,
                can_retry: true,
            },
        }
    }
}
