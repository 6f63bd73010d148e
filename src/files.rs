//! File naming and discovery helpers.

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{error::StillframeError, format::ImageFormat, format::VIDEO_EXTENSIONS};

/// Characters that are not allowed in file names on at least one platform.
const ILLEGAL_FILE_NAME_CHARACTERS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Returns `true` if `path` has one of the [`VIDEO_EXTENSIONS`], ignoring
/// ASCII case.
pub fn is_video_file<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref()
        .extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| {
            VIDEO_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(extension))
        })
}

/// List the video files directly inside `directory`, sorted by path.
///
/// Subdirectories are not descended into. A path that is not a directory
/// yields an empty list.
///
/// # Errors
///
/// Returns [`StillframeError::IoError`] if the directory cannot be read.
pub fn video_files_in_directory<P: AsRef<Path>>(
    directory: P,
) -> Result<Vec<PathBuf>, StillframeError> {
    let directory = directory.as_ref();
    if !directory.is_dir() {
        return Ok(Vec::new());
    }

    let mut videos = Vec::new();
    for entry in fs::read_dir(directory)? {
        let path = entry?.path();
        if path.is_file() && is_video_file(&path) {
            videos.push(path);
        }
    }
    videos.sort();

    log::debug!(
        "Found {} video file(s) in {}",
        videos.len(),
        directory.display()
    );
    Ok(videos)
}

/// Default file name for an exported frame:
/// `{video_base_name}_frame_{frame_number:06}.{extension}`.
///
/// ```
/// use stillframe::{ImageFormat, files::output_file_name};
///
/// assert_eq!(
///     output_file_name("videos/clip.mp4", 42, ImageFormat::Jpeg),
///     "clip_frame_000042.jpg",
/// );
/// ```
pub fn output_file_name<P: AsRef<Path>>(
    video_path: P,
    frame_number: u64,
    format: ImageFormat,
) -> String {
    let base_name = video_path
        .as_ref()
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "video".to_string());
    format!(
        "{base_name}_frame_{frame_number:06}.{}",
        format.primary_extension()
    )
}

/// Replace characters that are illegal in file names with `_`.
pub fn safe_file_name(file_name: &str) -> String {
    file_name
        .chars()
        .map(|character| {
            if ILLEGAL_FILE_NAME_CHARACTERS.contains(&character) {
                '_'
            } else {
                character
            }
        })
        .collect()
}

/// Create the parent directory of `path` (and its ancestors) if missing.
pub(crate) fn ensure_parent_directory(path: &Path) -> Result<(), StillframeError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            log::debug!("Creating output directory {}", parent.display());
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
