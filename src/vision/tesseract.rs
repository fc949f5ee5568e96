//! Tesseract backend
//!
//! Runs the `tesseract` CLI against an image file and returns its stdout.
//! The CLI has no progress callback, so progress is reported per stage.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, info};

use super::{EngineOptions, Language, ProgressSink, RecognizeError, TextRecognizer};
use crate::config::RecognitionSettings;

/// Stage progress reported by [`TesseractRecognizer`]
const PROGRESS_VALIDATED: f32 = 10.0;
const PROGRESS_ENGINE_STARTED: f32 = 30.0;
const PROGRESS_DONE: f32 = 100.0;

/// OCR through the tesseract command line tool
pub struct TesseractRecognizer {
    binary: String,
    tessdata_dir: Option<PathBuf>,
}

impl TesseractRecognizer {
    pub fn new(binary: impl Into<String>, tessdata_dir: Option<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            tessdata_dir,
        }
    }

    pub fn from_settings(settings: &RecognitionSettings) -> Self {
        Self::new(settings.tesseract.clone(), settings.tessdata_dir.clone())
    }

    /// Build the argument list for one recognition
    pub fn build_args(&self, path: &Path, language: Language, options: &EngineOptions) -> Vec<String> {
        let mut args = vec![
            path.to_string_lossy().into_owned(),
            "stdout".to_string(),
            "-l".to_string(),
            language.code().to_string(),
        ];
        if let Some(dir) = &self.tessdata_dir {
            args.push("--tessdata-dir".to_string());
            args.push(dir.to_string_lossy().into_owned());
        }
        for (key, value) in &options.variables {
            args.push("-c".to_string());
            args.push(format!("{}={}", key, value));
        }
        args
    }

    /// Engine version string, or `None` when the binary cannot be run
    pub async fn version(&self) -> Option<String> {
        let output = Command::new(&self.binary)
            .arg("--version")
            .kill_on_drop(true)
            .output()
            .await
            .ok()?;
        // Older releases print the version on stderr
        let text = if output.stdout.is_empty() {
            output.stderr
        } else {
            output.stdout
        };
        String::from_utf8_lossy(&text).lines().next().map(|l| l.trim().to_string())
    }
}

/// Reject input the engine cannot read before spawning it
fn validate_image(path: &Path) -> Result<(u32, u32), RecognizeError> {
    let reader = image::ImageReader::open(path)
        .map_err(|e| RecognizeError::InvalidInput(format!("{}: {}", path.display(), e)))?
        .with_guessed_format()?;
    reader
        .into_dimensions()
        .map_err(|e| RecognizeError::InvalidInput(format!("{}: {}", path.display(), e)))
}

#[async_trait]
impl TextRecognizer for TesseractRecognizer {
    async fn recognize(
        &self,
        path: &Path,
        language: Language,
        options: &EngineOptions,
        progress: ProgressSink,
    ) -> Result<String, RecognizeError> {
        if path.as_os_str().is_empty() {
            return Err(RecognizeError::InvalidInput("empty image path".to_string()));
        }

        progress.report(0.0);
        let owned = path.to_path_buf();
        let (width, height) = tokio::task::spawn_blocking(move || validate_image(&owned))
            .await
            .map_err(|e| RecognizeError::EngineFailed(format!("validation task failed: {}", e)))??;
        debug!("Recognizing {}x{} image {:?}", width, height, path);
        progress.report(PROGRESS_VALIDATED);

        let args = self.build_args(path, language, options);
        let child = Command::new(&self.binary)
            .args(&args)
            .kill_on_drop(true)
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::piped())
            .spawn()
            .map_err(|e| RecognizeError::EngineUnavailable(format!("{}: {}", self.binary, e)))?;
        progress.report(PROGRESS_ENGINE_STARTED);

        let output = child.wait_with_output().await?;
        if !output.status.success() {
            return Err(RecognizeError::EngineFailed(format!(
                "{} exited with {}: {}",
                self.binary,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
        progress.report(PROGRESS_DONE);
        info!("Recognized {} characters from {:?}", text.chars().count(), path);

        Ok(text)
    }
}
