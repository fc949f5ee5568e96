//! Image source backed by external commands
//!
//! The camera command writes a picture to the `{output}` placeholder path; the
//! picker command prints the selected file on stdout. Both are plain argv
//! vectors taken from the configuration.
//!
//! Files this source writes live in the cache directory and are discarded as
//! soon as the next image replaces them; at most one survives at a time.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::process::Output;
use tokio::process::Command;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::crop::apply_options;
use super::{CaptureError, CaptureMode, CaptureOptions, CaptureResult, ImageSource};
use crate::config::CaptureSettings;

/// Placeholder substituted with the camera output path
pub const OUTPUT_PLACEHOLDER: &str = "{output}";

/// Prefixes of the files this source owns in the cache directory
const OWNED_PREFIXES: [&str; 2] = ["camera-", "crop-"];

/// Image source that shells out to a capture tool and a file picker
pub struct CommandImageSource {
    camera_command: Vec<String>,
    picker_command: Vec<String>,
    cache_dir: PathBuf,
    /// Cache file behind the image handed out last
    current: Mutex<Option<PathBuf>>,
}

impl CommandImageSource {
    pub fn new(camera_command: Vec<String>, picker_command: Vec<String>, cache_dir: PathBuf) -> Self {
        Self {
            camera_command,
            picker_command,
            cache_dir,
            current: Mutex::new(None),
        }
    }

    /// Build from configuration
    pub fn from_settings(settings: &CaptureSettings, cache_dir: PathBuf) -> Self {
        Self::new(
            settings.camera_command.clone(),
            settings.picker_command.clone(),
            settings.cache_dir.clone().unwrap_or(cache_dir),
        )
    }

    async fn run(&self, mode: CaptureMode, argv: &[String]) -> Result<Output, CaptureError> {
        let (program, args) = argv.split_first().ok_or_else(|| {
            CaptureError::Failed(format!("No {} command configured", mode.name()))
        })?;

        debug!("Running {} command: {:?}", mode.name(), argv);
        Command::new(program)
            .args(args)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| CaptureError::Failed(format!("Failed to run {}: {}", program, e)))
    }

    /// Remove leftovers of earlier runs from the cache directory.
    ///
    /// Only files named like the ones this source writes are touched, so a
    /// shared directory keeps everything else.
    pub async fn clear_cache(&self) -> Result<usize, CaptureError> {
        let mut entries = match tokio::fs::read_dir(&self.cache_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };

        let mut removed = 0;
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if OWNED_PREFIXES.iter().any(|prefix| name.starts_with(prefix)) {
                tokio::fs::remove_file(entry.path()).await?;
                removed += 1;
            }
        }
        if removed > 0 {
            info!("Removed {} cached images from {:?}", removed, self.cache_dir);
        }
        Ok(removed)
    }

    /// Crop off the async executor and wrap the result.
    ///
    /// `raw` marks a source written by this adapter; it is deleted once a crop
    /// replaced it.
    async fn finish(&self, source: PathBuf, raw: bool, options: &CaptureOptions) -> Result<CaptureResult, CaptureError> {
        let options = *options;
        let cache_dir = self.cache_dir.clone();
        let input = source.clone();
        let cropped = tokio::task::spawn_blocking(move || apply_options(&input, &options, &cache_dir))
            .await
            .map_err(|e| CaptureError::Failed(format!("Crop task failed: {}", e)))
            .and_then(|result| result);

        let path = match cropped {
            Ok(path) => path,
            Err(e) => {
                if raw {
                    discard(&source).await;
                }
                return Err(e);
            }
        };

        if raw && path != source {
            discard(&source).await;
        }

        let owned = raw || path != source;
        let previous = std::mem::replace(&mut *self.current.lock(), owned.then(|| path.clone()));
        if let Some(previous) = previous {
            if previous != path {
                discard(&previous).await;
            }
        }

        Ok(CaptureResult {
            path: path.to_string_lossy().into_owned(),
        })
    }
}

/// Delete a cache file, logging instead of failing
async fn discard(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => debug!("Discarded {:?}", path),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!("Failed to discard {:?}: {}", path, e),
    }
}

/// Substitute the output placeholder in every argument
pub fn expand_output(argv: &[String], output: &Path) -> Vec<String> {
    let output = output.to_string_lossy();
    argv.iter()
        .map(|arg| arg.replace(OUTPUT_PLACEHOLDER, &output))
        .collect()
}

/// Interpret the picker's output.
///
/// A failed exit with nothing on stdout means the dialog was dismissed.
pub fn parse_picker_output(output: &Output) -> Result<PathBuf, CaptureError> {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let selected = stdout.lines().map(str::trim).find(|line| !line.is_empty());

    match (output.status.success(), selected) {
        (true, Some(path)) => Ok(PathBuf::from(path)),
        (true, None) | (false, None) => Err(CaptureError::Cancelled),
        (false, Some(_)) => Err(CaptureError::Failed(format!(
            "Picker exited with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        ))),
    }
}

#[async_trait]
impl ImageSource for CommandImageSource {
    async fn open_camera(&self, options: &CaptureOptions) -> Result<CaptureResult, CaptureError> {
        tokio::fs::create_dir_all(&self.cache_dir).await?;
        let target = self.cache_dir.join(format!("camera-{}.jpg", Uuid::new_v4()));
        let argv = expand_output(&self.camera_command, &target);

        let output = self.run(CaptureMode::Camera, &argv).await?;
        if !output.status.success() {
            discard(&target).await;
            return Err(CaptureError::Failed(format!(
                "Camera exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        if tokio::fs::metadata(&target).await.is_err() {
            return Err(CaptureError::Failed(format!(
                "Camera did not produce {:?}",
                target
            )));
        }

        info!("Captured image {:?}", target);
        self.finish(target, true, options).await
    }

    async fn open_picker(&self, options: &CaptureOptions) -> Result<CaptureResult, CaptureError> {
        let output = self.run(CaptureMode::Gallery, &self.picker_command).await?;
        let selected = parse_picker_output(&output)?;

        let is_file = tokio::fs::metadata(&selected)
            .await
            .map(|meta| meta.is_file())
            .unwrap_or(false);
        if !is_file {
            return Err(CaptureError::Failed(format!(
                "Selected path {:?} is not a file",
                selected
            )));
        }

        info!("Selected image {:?}", selected);
        self.finish(selected, false, options).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_output() {
        let argv = vec![
            "fswebcam".to_string(),
            "--save={output}".to_string(),
            "{output}".to_string(),
        ];
        let expanded = expand_output(&argv, Path::new("/tmp/a.jpg"));
        assert_eq!(expanded, vec!["fswebcam", "--save=/tmp/a.jpg", "/tmp/a.jpg"]);
    }

    #[cfg(unix)]
    mod unix {
        use super::*;
        use image::RgbImage;
        use std::os::unix::process::ExitStatusExt;
        use std::process::ExitStatus;

        fn output(code: i32, stdout: &str) -> Output {
            Output {
                status: ExitStatus::from_raw(code << 8),
                stdout: stdout.as_bytes().to_vec(),
                stderr: Vec::new(),
            }
        }

        fn sh(script: String) -> Vec<String> {
            vec!["sh".to_string(), "-c".to_string(), script]
        }

        #[test]
        fn test_parse_picker_selection() {
            let path = parse_picker_output(&output(0, "/home/me/scan.png\n")).unwrap();
            assert_eq!(path, PathBuf::from("/home/me/scan.png"));
        }

        #[test]
        fn test_parse_picker_dismissed() {
            assert!(parse_picker_output(&output(1, "")).unwrap_err().is_cancelled());
            assert!(parse_picker_output(&output(0, "  \n")).unwrap_err().is_cancelled());
        }

        #[test]
        fn test_parse_picker_failure() {
            let err = parse_picker_output(&output(2, "garbage")).unwrap_err();
            assert!(matches!(err, CaptureError::Failed(_)));
        }

        #[tokio::test]
        async fn test_picker_without_cropping_returns_selection() {
            let dir = tempfile::tempdir().unwrap();
            let image = dir.path().join("pick.png");
            RgbImage::new(20, 10).save(&image).unwrap();

            let source = CommandImageSource::new(
                Vec::new(),
                sh(format!("echo {}", image.display())),
                dir.path().join("cache"),
            );
            let options = CaptureOptions {
                cropping: false,
                ..Default::default()
            };

            let result = source.open_picker(&options).await.unwrap();
            assert_eq!(result.path, image.to_string_lossy());
        }

        #[tokio::test]
        async fn test_picker_cancel() {
            let dir = tempfile::tempdir().unwrap();
            let source = CommandImageSource::new(Vec::new(), sh("exit 1".to_string()), dir.path().to_path_buf());

            let err = source.open_picker(&CaptureOptions::default()).await.unwrap_err();
            assert!(err.is_cancelled());
        }

        #[tokio::test]
        async fn test_camera_crops_output() {
            let dir = tempfile::tempdir().unwrap();
            let still = dir.path().join("still.png");
            RgbImage::new(1280, 720).save(&still).unwrap();

            // PNG bytes under a .jpg name
            let source = CommandImageSource::new(
                sh(format!("cp {} {{output}}", still.display())),
                Vec::new(),
                dir.path().join("cache"),
            );

            let result = source.open_camera(&CaptureOptions::default()).await.unwrap();
            let cropped = image::open(&result.path).unwrap();
            assert_eq!((cropped.width(), cropped.height()), (600, 500));
        }

        fn cache_files(dir: &Path) -> Vec<String> {
            let mut names: Vec<String> = std::fs::read_dir(dir)
                .unwrap()
                .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
                .collect();
            names.sort();
            names
        }

        #[tokio::test]
        async fn test_repeated_captures_keep_one_cached_image() {
            let dir = tempfile::tempdir().unwrap();
            let still = dir.path().join("still.png");
            RgbImage::new(640, 480).save(&still).unwrap();
            let cache = dir.path().join("cache");

            let source = CommandImageSource::new(
                sh(format!("cp {} {{output}}", still.display())),
                Vec::new(),
                cache.clone(),
            );

            let mut last = String::new();
            for _ in 0..3 {
                last = source.open_camera(&CaptureOptions::default()).await.unwrap().path;
            }

            let files = cache_files(&cache);
            assert_eq!(files.len(), 1, "cache holds {:?}", files);
            assert!(files[0].starts_with("crop-"));
            assert!(Path::new(&last).is_file());
        }

        #[tokio::test]
        async fn test_uncropped_capture_is_discarded_by_next_pick() {
            let dir = tempfile::tempdir().unwrap();
            let still = dir.path().join("still.png");
            RgbImage::new(64, 48).save(&still).unwrap();
            let cache = dir.path().join("cache");

            let source = CommandImageSource::new(
                sh(format!("cp {} {{output}}", still.display())),
                sh(format!("echo {}", still.display())),
                cache.clone(),
            );
            let uncropped = CaptureOptions {
                cropping: false,
                ..Default::default()
            };

            let captured = source.open_camera(&uncropped).await.unwrap();
            assert!(captured.path.contains("camera-"));
            assert_eq!(cache_files(&cache).len(), 1);

            let picked = source.open_picker(&uncropped).await.unwrap();
            assert_eq!(picked.path, still.to_string_lossy());
            assert!(cache_files(&cache).is_empty());
            // The user's own file is never touched
            assert!(still.is_file());
        }

        #[tokio::test]
        async fn test_failed_camera_leaves_no_file() {
            let dir = tempfile::tempdir().unwrap();
            let cache = dir.path().join("cache");
            let source = CommandImageSource::new(
                sh("echo partial > {output}; exit 1".to_string()),
                Vec::new(),
                cache.clone(),
            );

            assert!(source.open_camera(&CaptureOptions::default()).await.is_err());
            assert!(cache_files(&cache).is_empty());
        }

        #[tokio::test]
        async fn test_clear_cache_removes_only_owned_files() {
            let dir = tempfile::tempdir().unwrap();
            std::fs::write(dir.path().join("crop-old.png"), b"x").unwrap();
            std::fs::write(dir.path().join("camera-old.jpg"), b"x").unwrap();
            std::fs::write(dir.path().join("notes.txt"), b"x").unwrap();

            let source = CommandImageSource::new(Vec::new(), Vec::new(), dir.path().to_path_buf());
            assert_eq!(source.clear_cache().await.unwrap(), 2);
            assert_eq!(cache_files(dir.path()), vec!["notes.txt"]);

            let missing = CommandImageSource::new(Vec::new(), Vec::new(), dir.path().join("absent"));
            assert_eq!(missing.clear_cache().await.unwrap(), 0);
        }

        #[tokio::test]
        async fn test_camera_failure_is_not_cancellation() {
            let dir = tempfile::tempdir().unwrap();
            let source = CommandImageSource::new(sh("exit 3".to_string()), Vec::new(), dir.path().to_path_buf());

            let err = source.open_camera(&CaptureOptions::default()).await.unwrap_err();
            assert!(matches!(err, CaptureError::Failed(_)));
        }

        #[tokio::test]
        async fn test_missing_command() {
            let dir = tempfile::tempdir().unwrap();
            let source = CommandImageSource::new(Vec::new(), Vec::new(), dir.path().to_path_buf());

            let err = source.open_camera(&CaptureOptions::default()).await.unwrap_err();
            assert!(matches!(err, CaptureError::Failed(_)));
        }
    }
}
