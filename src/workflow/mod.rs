//! Capture-Recognize Workflow
//!
//! Sequences the biometric gate, image acquisition and text recognition, and
//! owns the [`SessionState`] the UI renders from. Operations are async and
//! meant to be spawned on the application runtime; the state lives behind an
//! `Arc<RwLock<_>>` so the UI thread can read it at any time.
//!
//! Lock guards are never held across an `.await`.

pub mod state;

use parking_lot::RwLock;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

pub use state::{Alert, BiometricStatus, ImageSelection, Presentation, SessionState};

use crate::biometric::{AuthConfig, BiometricGate, SupportOptions};
use crate::capture::{CaptureMode, CaptureOptions, ImageSource};
use crate::config::AppConfig;
use crate::i18n::{Locale, Strings};
use crate::vision::{EngineOptions, Language, ProgressSink, TextRecognizer};

/// How a trigger invocation ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowOutcome {
    /// Text was recognized (possibly empty)
    Recognized,
    /// The user backed out of image selection
    Cancelled,
    /// Acquisition or recognition failed
    Failed,
    /// Not accepted: workflow locked or a recognition is in flight
    Refused,
}

/// Static settings of the workflow
#[derive(Debug, Clone)]
pub struct WorkflowSettings {
    /// Options used when a trigger gets none
    pub default_options: CaptureOptions,
    /// Language of alerts and prompt strings
    pub locale: Locale,
    /// Accent color handed to the prompt
    pub prompt_color: String,
    /// Gate the workflow behind the biometric prompt
    pub biometric_enabled: bool,
}

impl Default for WorkflowSettings {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

impl WorkflowSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            default_options: config.capture.default_options,
            locale: config.general.locale,
            prompt_color: config.biometric.prompt_color.clone(),
            biometric_enabled: config.biometric.enabled,
        }
    }
}

/// The capture-recognize workflow controller
pub struct WorkflowController<G, S, R> {
    gate: G,
    source: S,
    recognizer: R,
    state: Arc<RwLock<SessionState>>,
    settings: WorkflowSettings,
    initialized: AtomicBool,
}

impl<G, S, R> WorkflowController<G, S, R>
where
    G: BiometricGate,
    S: ImageSource,
    R: TextRecognizer,
{
    pub fn new(gate: G, source: S, recognizer: R, settings: WorkflowSettings) -> Self {
        Self {
            gate,
            source,
            recognizer,
            state: Arc::new(RwLock::new(SessionState::default())),
            settings,
            initialized: AtomicBool::new(false),
        }
    }

    /// Copy of the current session state
    pub fn snapshot(&self) -> SessionState {
        self.state.read().clone()
    }

    pub fn strings(&self) -> &'static Strings {
        self.settings.locale.strings()
    }

    /// Presentation strings of the authentication prompt
    pub fn auth_config(&self) -> AuthConfig {
        let strings = self.strings();
        AuthConfig {
            title: strings.prompt_title.to_string(),
            image_color: self.settings.prompt_color.clone(),
            sensor_description: strings.sensor_description.to_string(),
            sensor_error_description: strings.sensor_error_description.to_string(),
            cancel_text: strings.cancel_text.to_string(),
        }
    }

    /// Mount effect: verify biometrics exactly once.
    ///
    /// Returns `false` when a previous call already ran.
    pub async fn initialize(&self) -> bool {
        if self.initialized.swap(true, Ordering::SeqCst) {
            debug!("Workflow already initialized");
            return false;
        }
        self.verify_biometric().await;
        true
    }

    /// Check biometric capability and run the prompt
    pub async fn verify_biometric(&self) {
        if !self.settings.biometric_enabled {
            info!("Biometric gate disabled by configuration");
            self.state.write().biometric = BiometricStatus::Bypassed;
            return;
        }

        let method = match self.gate.is_supported(&SupportOptions::default()).await {
            Ok(method) => method,
            Err(e) => {
                info!("Biometry not available: {} ({})", e.code, e.message);
                self.state.write().biometric = BiometricStatus::NotSupported;
                return;
            }
        };

        if method.is_face_based() {
            // Face-only devices are neither prompted nor offered the bypass
            info!("{} is supported but not accepted", method);
            self.state.write().biometric = BiometricStatus::UnsupportedMethod(method);
            return;
        }

        info!("{} is supported", method);
        self.state.write().biometric = BiometricStatus::Prompting;

        let prompt = self.strings().prompt_message;
        let config = self.auth_config();
        match self.gate.authenticate(prompt, &config).await {
            Ok(()) => {
                info!("Authentication succeeded");
                self.state.write().biometric = BiometricStatus::Authenticated;
            }
            Err(e) => {
                info!("Authentication error: {}", e.code);
                let mut state = self.state.write();
                state.biometric = BiometricStatus::Denied;
                if !e.is_user_cancellation() {
                    let strings = self.strings();
                    state.alerts.push_back(Alert {
                        title: strings.alert_title.to_string(),
                        message: strings.alert_message.to_string(),
                    });
                }
            }
        }
    }

    /// Run the prompt again after a denied authentication
    pub async fn retry_authentication(&self) -> bool {
        if self.state.read().biometric != BiometricStatus::Denied {
            return false;
        }
        self.verify_biometric().await;
        true
    }

    /// Dismiss the prompt currently waiting on the sensor
    pub fn cancel_authentication(&self) {
        if self.state.read().biometric == BiometricStatus::Prompting {
            self.gate.cancel();
        }
    }

    /// Manual bypass offered when no biometric hardware exists
    pub fn enter_anyway(&self) -> bool {
        let mut state = self.state.write();
        if state.biometric != BiometricStatus::NotSupported {
            return false;
        }
        info!("Entering without biometric authentication");
        state.biometric = BiometricStatus::Bypassed;
        true
    }

    /// Take a picture and recognize its text
    pub async fn recognize_from_camera(&self, options: Option<CaptureOptions>) -> WorkflowOutcome {
        self.recognize_from(CaptureMode::Camera, options).await
    }

    /// Pick an image from the gallery and recognize its text
    pub async fn recognize_from_picker(&self, options: Option<CaptureOptions>) -> WorkflowOutcome {
        self.recognize_from(CaptureMode::Gallery, options).await
    }

    async fn recognize_from(&self, mode: CaptureMode, options: Option<CaptureOptions>) -> WorkflowOutcome {
        {
            let state = self.state.read();
            if !state.triggers_enabled() {
                warn!(
                    "Ignoring {} trigger (unlocked={}, recognizing={})",
                    mode.name(),
                    state.biometric_available(),
                    state.is_recognizing
                );
                return WorkflowOutcome::Refused;
            }
        }

        let options = options.unwrap_or(self.settings.default_options);
        let image = match self.source.acquire(mode, &options).await {
            Ok(image) => image,
            Err(e) if e.is_cancelled() => {
                debug!("{} selection cancelled", mode.name());
                return WorkflowOutcome::Cancelled;
            }
            Err(e) => {
                error!("{} acquisition failed: {}", mode.name(), e);
                return WorkflowOutcome::Failed;
            }
        };

        self.recognize_selected(image.path).await
    }

    /// Show `uri` and start recognizing it in one step, so no frame ever sees
    /// the new image next to the previous text.
    async fn recognize_selected(&self, uri: String) -> WorkflowOutcome {
        {
            let mut state = self.state.write();
            state.begin_recognition();
            state.image = ImageSelection::Selected { uri: uri.clone() };
        }
        self.run_recognition(&uri).await
    }

    /// Recognize the text of an already acquired image
    pub async fn recognize_text_from_image(&self, path: &str) -> WorkflowOutcome {
        self.state.write().begin_recognition();
        self.run_recognition(path).await
    }

    async fn run_recognition(&self, path: &str) -> WorkflowOutcome {
        if path.is_empty() {
            error!("Recognition requested without an image path");
            self.state.write().finish_recognition(String::new());
            return WorkflowOutcome::Failed;
        }

        let (sink, mut events) = ProgressSink::channel();
        let options = EngineOptions::default();
        let recognize = self
            .recognizer
            .recognize(Path::new(path), Language::English, &options, sink);
        tokio::pin!(recognize);

        let result = loop {
            tokio::select! {
                result = &mut recognize => break result,
                Some(event) = events.recv() => {
                    self.state.write().progress = event.fraction();
                }
            }
        };

        match result {
            Ok(text) => {
                self.state.write().finish_recognition(text);
                WorkflowOutcome::Recognized
            }
            Err(e) => {
                error!("Text recognition failed for {}: {}", path, e);
                self.state.write().finish_recognition(String::new());
                WorkflowOutcome::Failed
            }
        }
    }

    /// Return to the main menu. Ignored while a recognition is running.
    pub fn clear_selection(&self) -> bool {
        let mut state = self.state.write();
        if state.is_recognizing {
            return false;
        }
        state.image = ImageSelection::NoImage;
        true
    }

    /// Next alert to show, if any
    pub fn take_alert(&self) -> Option<Alert> {
        self.state.write().alerts.pop_front()
    }
}
