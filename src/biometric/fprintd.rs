//! fprintd backend
//!
//! Uses the `fprintd-list` / `fprintd-verify` command line tools. The prompt
//! itself is drawn by the UI; this backend only talks to the sensor.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::process::Output;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::{AuthConfig, AuthErrorCode, BiometricError, BiometricGate, BiometryType, SupportOptions};
use crate::config::BiometricSettings;

/// Biometric gate on top of the fprintd command line tools
pub struct FprintdGate {
    list_bin: String,
    verify_bin: String,
    face_bin: String,
    user: String,
    /// Token of the verification currently running
    active: Mutex<Option<CancellationToken>>,
}

impl FprintdGate {
    pub fn new(settings: &BiometricSettings) -> Self {
        Self {
            list_bin: settings.fprintd_list.clone(),
            verify_bin: settings.fprintd_verify.clone(),
            face_bin: settings.howdy.clone(),
            user: current_user(),
            active: Mutex::new(None),
        }
    }

    async fn face_available(&self) -> bool {
        Command::new(&self.face_bin)
            .arg("--help")
            .kill_on_drop(true)
            .output()
            .await
            .is_ok()
    }
}

fn current_user() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_default()
}

/// Outcome of parsing `fprintd-list` output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Enrollment {
    /// At least one finger is enrolled
    Enrolled(Vec<String>),
    /// A reader exists but nothing is enrolled
    NoFingers,
    /// No reader attached
    NoDevice,
}

/// Parse the output of `fprintd-list <user>`
pub fn parse_list_output(stdout: &str) -> Enrollment {
    let lower = stdout.to_lowercase();
    if lower.contains("no devices available") || lower.contains("no devices found") {
        return Enrollment::NoDevice;
    }

    let fingers: Vec<String> = stdout
        .lines()
        .filter_map(|line| {
            let line = line.trim();
            let rest = line.strip_prefix("- #")?;
            let (_, finger) = rest.split_once(':')?;
            Some(finger.trim().to_string())
        })
        .collect();

    if fingers.is_empty() {
        Enrollment::NoFingers
    } else {
        Enrollment::Enrolled(fingers)
    }
}

/// Kind of reader named in the `fprintd-list` header.
///
/// Press sensors are touch sensors; swipe sensors report plain `Fingerprint`.
pub fn sensor_type(stdout: &str) -> BiometryType {
    let swipe = stdout
        .lines()
        .any(|line| line.starts_with("Fingerprints for user") && line.contains("(swipe)"));
    if swipe {
        BiometryType::Fingerprint
    } else {
        BiometryType::TouchId
    }
}

/// Map the result of `fprintd-verify` to the provider outcome
pub fn parse_verify_output(output: &Output) -> Result<(), BiometricError> {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    let result = stdout
        .lines()
        .rev()
        .find_map(|line| line.trim().strip_prefix("Verify result:"))
        .map(str::trim);

    match result {
        Some(r) if r.starts_with("verify-match") => Ok(()),
        Some(r) if r.starts_with("verify-no-match") => Err(BiometricError::new(
            AuthErrorCode::AuthenticationFailed,
            "Fingerprint did not match",
        )),
        Some(r) if r.starts_with("verify-disconnected") => Err(BiometricError::new(
            AuthErrorCode::NotAvailable,
            "Fingerprint reader disconnected",
        )),
        Some(r) => Err(BiometricError::new(AuthErrorCode::Unknown, r.to_string())),
        None if output.status.success() => Ok(()),
        None if stderr.to_lowercase().contains("no fingers enrolled") => Err(BiometricError::new(
            AuthErrorCode::NotEnrolled,
            stderr.trim().to_string(),
        )),
        None if output.status.code().is_none() => Err(BiometricError::new(
            AuthErrorCode::SystemCanceled,
            format!("fprintd-verify was stopped: {}", output.status),
        )),
        None => Err(BiometricError::new(
            AuthErrorCode::Unknown,
            format!("fprintd-verify exited with {}: {}", output.status, stderr.trim()),
        )),
    }
}

#[async_trait]
impl BiometricGate for FprintdGate {
    async fn is_supported(&self, options: &SupportOptions) -> Result<BiometryType, BiometricError> {
        debug!(
            "Checking biometric support (unified_errors={}, passcode_fallback={})",
            options.unified_errors, options.passcode_fallback
        );

        let listed = Command::new(&self.list_bin)
            .arg(&self.user)
            .kill_on_drop(true)
            .output()
            .await;

        let listing = match listed {
            Ok(output) => Some(String::from_utf8_lossy(&output.stdout).into_owned()),
            Err(e) => {
                debug!("{} unavailable: {}", self.list_bin, e);
                None
            }
        };
        let enrollment = listing
            .as_deref()
            .map(parse_list_output)
            .unwrap_or(Enrollment::NoDevice);

        let missing = match enrollment {
            Enrollment::Enrolled(fingers) => {
                let method = sensor_type(listing.as_deref().unwrap_or_default());
                info!("{} reader ready, enrolled: {:?}", method, fingers);
                return Ok(method);
            }
            Enrollment::NoFingers => BiometricError::new(
                AuthErrorCode::NotEnrolled,
                format!("No fingers enrolled for {}", self.user),
            ),
            Enrollment::NoDevice => BiometricError::new(
                AuthErrorCode::NotSupported,
                "No fingerprint reader found",
            ),
        };

        if self.face_available().await {
            return Ok(BiometryType::FaceId);
        }
        Err(missing)
    }

    async fn authenticate(&self, prompt: &str, config: &AuthConfig) -> Result<(), BiometricError> {
        info!("{}: {}", config.title, prompt);

        let token = CancellationToken::new();
        if let Some(previous) = self.active.lock().replace(token.clone()) {
            previous.cancel();
        }

        let child = Command::new(&self.verify_bin)
            .arg(&self.user)
            .kill_on_drop(true)
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::piped())
            .spawn()
            .map_err(|e| {
                BiometricError::new(
                    AuthErrorCode::NotAvailable,
                    format!("Failed to run {}: {}", self.verify_bin, e),
                )
            });

        let result = match child {
            Ok(child) => {
                tokio::select! {
                    output = child.wait_with_output() => match output {
                        Ok(output) => parse_verify_output(&output),
                        Err(e) => Err(BiometricError::new(AuthErrorCode::Unknown, e.to_string())),
                    },
                    _ = token.cancelled() => Err(BiometricError::new(
                        AuthErrorCode::AuthenticationCanceled,
                        "Authentication was canceled by the user",
                    )),
                }
            }
            Err(e) => Err(e),
        };

        self.active.lock().take();
        if let Err(ref e) = result {
            if !e.is_user_cancellation() {
                warn!("{}: {}", config.sensor_error_description, e);
            }
        }
        result
    }

    fn cancel(&self) {
        if let Some(token) = self.active.lock().take() {
            token.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTED: &str = "found 1 devices
Device at /net/reactivated/Fprint/Device/0
Using device /net/reactivated/Fprint/Device/0
Fingerprints for user alice on Synaptics Sensors (press):
 - #0: right-index-finger
 - #1: left-index-finger
";

    #[test]
    fn test_parse_enrolled() {
        assert_eq!(
            parse_list_output(LISTED),
            Enrollment::Enrolled(vec![
                "right-index-finger".to_string(),
                "left-index-finger".to_string()
            ])
        );
    }

    #[test]
    fn test_parse_no_fingers() {
        let out = "found 1 devices\nUser alice has no fingers enrolled for Synaptics Sensors.\n";
        assert_eq!(parse_list_output(out), Enrollment::NoFingers);
    }

    #[test]
    fn test_parse_no_device() {
        assert_eq!(parse_list_output("No devices available\n"), Enrollment::NoDevice);
    }

    #[test]
    fn test_sensor_type() {
        assert_eq!(sensor_type(LISTED), BiometryType::TouchId);
        let swipe = LISTED.replace("(press)", "(swipe)");
        assert_eq!(sensor_type(&swipe), BiometryType::Fingerprint);
    }

    #[cfg(unix)]
    mod unix {
        use super::*;
        use std::os::unix::fs::PermissionsExt;
        use std::os::unix::process::ExitStatusExt;
        use std::path::Path;
        use std::process::ExitStatus;
        use std::sync::Arc;
        use std::time::Duration;

        fn output(code: i32, stdout: &str, stderr: &str) -> Output {
            Output {
                status: ExitStatus::from_raw(code << 8),
                stdout: stdout.as_bytes().to_vec(),
                stderr: stderr.as_bytes().to_vec(),
            }
        }

        #[test]
        fn test_verify_match() {
            let out = output(0, "Verify started!\nVerifying: right-index-finger\nVerify result: verify-match (done)\n", "");
            assert!(parse_verify_output(&out).is_ok());
        }

        #[test]
        fn test_verify_no_match() {
            let out = output(1, "Verify result: verify-no-match (done)\n", "");
            let err = parse_verify_output(&out).unwrap_err();
            assert_eq!(err.code, AuthErrorCode::AuthenticationFailed);
        }

        #[test]
        fn test_verify_not_enrolled() {
            let out = output(1, "", "No fingers enrolled for this device.\n");
            assert_eq!(parse_verify_output(&out).unwrap_err().code, AuthErrorCode::NotEnrolled);
        }

        #[test]
        fn test_verify_unknown_result() {
            let out = output(1, "Verify result: verify-unknown-error (done)\n", "");
            assert_eq!(parse_verify_output(&out).unwrap_err().code, AuthErrorCode::Unknown);
        }

        #[test]
        fn test_verify_killed_by_signal() {
            let out = Output {
                status: ExitStatus::from_raw(15),
                stdout: Vec::new(),
                stderr: Vec::new(),
            };
            assert_eq!(parse_verify_output(&out).unwrap_err().code, AuthErrorCode::SystemCanceled);
        }

        fn auth_config() -> AuthConfig {
            AuthConfig {
                title: "t".to_string(),
                image_color: "#13B9A7".to_string(),
                sensor_description: "s".to_string(),
                sensor_error_description: "e".to_string(),
                cancel_text: "c".to_string(),
            }
        }

        fn script(dir: &Path, body: &str) -> String {
            let path = dir.join("verify.sh");
            std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
            path.to_string_lossy().into_owned()
        }

        fn gate_with(verify: &str) -> FprintdGate {
            FprintdGate::new(&BiometricSettings {
                fprintd_list: "scanpass-missing-fprintd-list".to_string(),
                fprintd_verify: verify.to_string(),
                howdy: "scanpass-missing-howdy".to_string(),
                ..Default::default()
            })
        }

        #[tokio::test]
        async fn test_missing_tools_are_not_supported() {
            let gate = gate_with("scanpass-missing-fprintd-verify");
            let err = gate.is_supported(&SupportOptions::default()).await.unwrap_err();
            assert_eq!(err.code, AuthErrorCode::NotSupported);
        }

        #[tokio::test]
        async fn test_missing_verify_is_not_available() {
            let gate = gate_with("scanpass-missing-fprintd-verify");
            let err = gate.authenticate("prompt", &auth_config()).await.unwrap_err();
            assert_eq!(err.code, AuthErrorCode::NotAvailable);
        }

        #[tokio::test]
        async fn test_verify_script_match() {
            let dir = tempfile::tempdir().unwrap();
            let gate = gate_with(&script(dir.path(), "echo 'Verify result: verify-match (done)'"));
            assert!(gate.authenticate("prompt", &auth_config()).await.is_ok());
            assert!(gate.active.lock().is_none());
        }

        #[tokio::test]
        async fn test_cancel_stops_running_verification() {
            let dir = tempfile::tempdir().unwrap();
            let gate = Arc::new(gate_with(&script(dir.path(), "sleep 5")));

            let running = Arc::clone(&gate);
            let task = tokio::spawn(async move { running.authenticate("prompt", &auth_config()).await });

            for _ in 0..200 {
                if gate.active.lock().is_some() {
                    break;
                }
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
            gate.cancel();

            let result = tokio::time::timeout(Duration::from_secs(3), task)
                .await
                .expect("verification kept running after cancel")
                .unwrap();
            let err = result.unwrap_err();
            assert_eq!(err.code, AuthErrorCode::AuthenticationCanceled);
            assert!(err.is_user_cancellation());
            assert!(gate.active.lock().is_none());
        }
    }
}
