//! Fixed-size cropping of acquired images

use image::imageops::FilterType;
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

use super::{CaptureError, CaptureOptions};

/// Apply `options` to the image at `source`.
///
/// With cropping on, the image is centre-cropped to the requested aspect ratio
/// and scaled to exactly `width` x `height`, then written as PNG into
/// `cache_dir`. With cropping off the source path is returned untouched.
pub fn apply_options(
    source: &Path,
    options: &CaptureOptions,
    cache_dir: &Path,
) -> Result<PathBuf, CaptureError> {
    if !options.cropping {
        return Ok(source.to_path_buf());
    }
    if options.width == 0 || options.height == 0 {
        return Err(CaptureError::Failed(format!(
            "Invalid crop size {}x{}",
            options.width, options.height
        )));
    }

    // Camera tools do not always honour the extension they are given.
    let img = image::ImageReader::open(source)?
        .with_guessed_format()?
        .decode()?;
    debug!(
        "Cropping {:?} from {}x{} to {}x{}",
        source,
        img.width(),
        img.height(),
        options.width,
        options.height
    );

    let cropped = img.resize_to_fill(options.width, options.height, FilterType::Lanczos3);

    std::fs::create_dir_all(cache_dir)?;
    let target = cache_dir.join(format!("crop-{}.png", Uuid::new_v4()));
    cropped.save(&target)?;

    Ok(target)
}
