//! Application Configuration
//!
//! User settings stored in TOML format. Every section falls back to its
//! defaults when missing, so a partial file is valid.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::capture::CaptureOptions;
use crate::i18n::Locale;

/// Application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// General settings
    pub general: GeneralConfig,
    /// Biometric gate settings
    pub biometric: BiometricSettings,
    /// Image acquisition settings
    pub capture: CaptureSettings,
    /// Text recognition settings
    pub recognition: RecognitionSettings,
}

/// General application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// UI language
    pub locale: Locale,
}

/// Biometric gate settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BiometricSettings {
    /// Require the fingerprint prompt; when off the workflow starts unlocked
    pub enabled: bool,
    /// Accent color of the authentication prompt
    pub prompt_color: String,
    /// `fprintd-list` executable
    pub fprintd_list: String,
    /// `fprintd-verify` executable
    pub fprintd_verify: String,
    /// Face authentication executable used only for detection
    pub howdy: String,
}

impl Default for BiometricSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            prompt_color: "#13B9A7".to_string(),
            fprintd_list: "fprintd-list".to_string(),
            fprintd_verify: "fprintd-verify".to_string(),
            howdy: "howdy".to_string(),
        }
    }
}

/// Image acquisition settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureSettings {
    /// Options used when a trigger is invoked without explicit options
    pub default_options: CaptureOptions,
    /// Camera command; `{output}` is replaced with the file to write
    pub camera_command: Vec<String>,
    /// Picker command; prints the chosen file on stdout
    pub picker_command: Vec<String>,
    /// Override for the directory captured and cropped images go to
    pub cache_dir: Option<PathBuf>,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            default_options: CaptureOptions::default(),
            camera_command: vec![
                "fswebcam".to_string(),
                "--no-banner".to_string(),
                "-r".to_string(),
                "1280x720".to_string(),
                "{output}".to_string(),
            ],
            picker_command: vec![
                "zenity".to_string(),
                "--file-selection".to_string(),
                "--file-filter=Images | *.png *.jpg *.jpeg *.bmp *.tif *.tiff".to_string(),
            ],
            cache_dir: None,
        }
    }
}

/// Text recognition settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognitionSettings {
    /// `tesseract` executable
    pub tesseract: String,
    /// Custom tessdata directory (uses the system one when unset)
    pub tessdata_dir: Option<PathBuf>,
}

impl Default for RecognitionSettings {
    fn default() -> Self {
        Self {
            tesseract: "tesseract".to_string(),
            tessdata_dir: None,
        }
    }
}

/// Load configuration from file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {:?}", path))?;
    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file {:?}", path))?;
    Ok(config)
}

/// Save configuration to file
pub fn save_config(config: &AppConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_app_config() {
        let config = AppConfig::default();

        assert_eq!(config.general.locale, Locale::English);

        assert_eq!(config.biometric.prompt_color, "#13B9A7");
        assert_eq!(config.biometric.fprintd_verify, "fprintd-verify");

        assert!(config.capture.default_options.cropping);
        assert_eq!(config.capture.default_options.height, 500);
        assert_eq!(config.capture.default_options.width, 600);
        assert!(config.capture.camera_command.iter().any(|a| a == "{output}"));
        assert!(config.capture.cache_dir.is_none());

        assert_eq!(config.recognition.tesseract, "tesseract");
        assert!(config.recognition.tessdata_dir.is_none());
    }

    #[test]
    fn test_config_with_custom_values() {
        let mut config = AppConfig::default();
        config.general.locale = Locale::Spanish;
        config.capture.default_options.cropping = false;
        config.recognition.tessdata_dir = Some(PathBuf::from("/opt/tessdata"));

        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();

        assert_eq!(parsed.general.locale, Locale::Spanish);
        assert!(!parsed.capture.default_options.cropping);
        assert_eq!(parsed.recognition.tessdata_dir, Some(PathBuf::from("/opt/tessdata")));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let parsed: AppConfig = toml::from_str(
            r#"
            [general]
            locale = "spanish"

            [capture.default_options]
            width = 800
            "#,
        )
        .unwrap();

        assert_eq!(parsed.general.locale, Locale::Spanish);
        assert!(parsed.biometric.enabled);
        assert_eq!(parsed.capture.default_options.width, 800);
        assert_eq!(parsed.capture.default_options.height, 500);
        assert!(parsed.capture.default_options.cropping);
        assert_eq!(parsed.recognition.tesseract, "tesseract");
    }

    #[test]
    fn test_gate_can_be_disabled() {
        let parsed: AppConfig = toml::from_str("[biometric]\nenabled = false\n").unwrap();
        assert!(!parsed.biometric.enabled);
        assert_eq!(parsed.biometric.fprintd_verify, "fprintd-verify");
    }

    #[test]
    fn test_save_and_load_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = AppConfig::default();
        config.capture.picker_command = vec!["my-picker".to_string()];

        save_config(&config, &path).unwrap();
        let loaded = load_config(&path).unwrap();

        assert_eq!(loaded.capture.picker_command, vec!["my-picker".to_string()]);
        assert_eq!(loaded.biometric.howdy, config.biometric.howdy);
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/path/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "this is not valid toml {{{{").unwrap();

        let result = load_config(temp_file.path());
        assert!(result.is_err());
    }
}
