//! Local artifact output: generated media files and JSON metadata sidecars.
//!
//! Filenames follow a fixed scheme so artifacts from one invocation sort
//! together: `{prefix}_{tag}_{timestamp}_{index}.{ext}` for media and
//! `{prefix}_metadata_{timestamp}.json` for sidecars, with the timestamp at
//! second resolution (`YYYYMMDD_HHMMSS`).
//!
//! Writes are best-effort: a failed write is logged and the file is omitted
//! from the saved-files list, but the overall tool call still succeeds.
//! Partial output is normal, not an error condition.

use serde_json::Value;
use std::path::PathBuf;
use tracing::{info, warn};

/// Timestamp format used in artifact filenames.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Current local time formatted for artifact filenames.
pub fn current_timestamp() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Filename for an indexed media payload, e.g.
/// `gemini_generated_photorealistic_20250101_120000_0.png`.
///
/// The tag segment (style, edit type, blend mode) is omitted when absent.
pub fn indexed_filename(
    prefix: &str,
    tag: Option<&str>,
    timestamp: &str,
    index: usize,
    ext: &str,
) -> String {
    match tag {
        Some(tag) => format!("{}_{}_{}_{}.{}", prefix, tag, timestamp, index, ext),
        None => format!("{}_{}_{}.{}", prefix, timestamp, index, ext),
    }
}

/// Filename for a single (unindexed) media payload, e.g.
/// `veo_video_20250101_120000.mp4`.
pub fn single_filename(prefix: &str, timestamp: &str, ext: &str) -> String {
    format!("{}_{}.{}", prefix, timestamp, ext)
}

/// Filename for a JSON metadata sidecar, e.g.
/// `gemini_metadata_20250101_120000.json`.
pub fn metadata_filename(prefix: &str, timestamp: &str) -> String {
    format!("{}_metadata_{}.json", prefix, timestamp)
}

/// Best-effort writer for one invocation's artifacts.
///
/// Bound to the effective output directory: the request-supplied directory
/// when given, otherwise the configured default.
#[derive(Debug, Clone)]
pub struct ArtifactWriter {
    dir: PathBuf,
}

impl ArtifactWriter {
    /// Create a writer for the given directory.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Resolve the effective output directory for a request.
    pub fn resolve(request_dir: Option<&str>, default_dir: &str) -> Self {
        Self::new(request_dir.unwrap_or(default_dir))
    }

    /// The directory this writer targets.
    pub fn dir(&self) -> &std::path::Path {
        &self.dir
    }

    /// Write a binary media payload under the given filename.
    ///
    /// Returns the written path on success. On failure the error is logged
    /// and `None` is returned; callers collect successes into the
    /// saved-files list and move on.
    pub async fn write_media(&self, filename: &str, data: &[u8]) -> Option<String> {
        let path = self.dir.join(filename);
        if let Err(e) = tokio::fs::create_dir_all(&self.dir).await {
            warn!(dir = %self.dir.display(), error = %e, "failed to create output directory");
            return None;
        }
        match tokio::fs::write(&path, data).await {
            Ok(()) => {
                let path = path.to_string_lossy().into_owned();
                info!(path = %path, bytes = data.len(), "saved media file");
                Some(path)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to save media file");
                None
            }
        }
    }

    /// Write a JSON metadata sidecar (indented) under the given filename.
    ///
    /// Best-effort, same contract as [`write_media`](Self::write_media).
    pub async fn write_metadata(&self, filename: &str, metadata: &Value) -> Option<String> {
        let json = match serde_json::to_vec_pretty(metadata) {
            Ok(json) => json,
            Err(e) => {
                warn!(filename, error = %e, "failed to serialize metadata");
                return None;
            }
        };
        self.write_media(filename, &json).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_indexed_filename_with_tag() {
        let name = indexed_filename("gemini_generated", Some("photorealistic"), "20250101_120000", 0, "png");
        assert_eq!(name, "gemini_generated_photorealistic_20250101_120000_0.png");
    }

    #[test]
    fn test_indexed_filename_without_tag() {
        let name = indexed_filename("imagen", None, "20250101_120000", 2, "png");
        assert_eq!(name, "imagen_20250101_120000_2.png");
    }

    #[test]
    fn test_same_call_payloads_differ_only_in_index() {
        let a = indexed_filename("gemini_generated", Some("sketch"), "20250101_120000", 0, "png");
        let b = indexed_filename("gemini_generated", Some("sketch"), "20250101_120000", 1, "png");
        assert_ne!(a, b);
        assert_eq!(a.replace("_0.png", ""), b.replace("_1.png", ""));
    }

    #[test]
    fn test_single_filename() {
        let name = single_filename("veo_video", "20250101_120000", "mp4");
        assert_eq!(name, "veo_video_20250101_120000.mp4");
    }

    #[test]
    fn test_metadata_filename() {
        let name = metadata_filename("veo_text_to_video", "20250101_120000");
        assert_eq!(name, "veo_text_to_video_metadata_20250101_120000.json");
    }

    #[test]
    fn test_timestamp_shape() {
        let ts = current_timestamp();
        assert_eq!(ts.len(), 15);
        assert_eq!(ts.as_bytes()[8], b'_');
        assert!(ts.chars().filter(|c| *c != '_').all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_resolve_prefers_request_dir() {
        let writer = ArtifactWriter::resolve(Some("/tmp/custom"), "./output");
        assert_eq!(writer.dir(), std::path::Path::new("/tmp/custom"));

        let writer = ArtifactWriter::resolve(None, "./output");
        assert_eq!(writer.dir(), std::path::Path::new("./output"));
    }

    #[tokio::test]
    async fn test_write_media_creates_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join("a/b");
        let writer = ArtifactWriter::new(&nested);

        let saved = writer.write_media("test_20250101_120000_0.png", b"payload").await;
        let path = saved.expect("write should succeed");
        assert!(std::path::Path::new(&path).exists());
        assert_eq!(std::fs::read(&path).unwrap(), b"payload");
    }

    #[tokio::test]
    async fn test_write_media_failure_is_swallowed() {
        // A directory path that cannot be created on any reasonable system.
        let writer = ArtifactWriter::new("/dev/null/not-a-directory");
        let saved = writer.write_media("x.png", b"payload").await;
        assert!(saved.is_none());
    }

    #[tokio::test]
    async fn test_write_metadata_round_trips() {
        let tmp = tempfile::tempdir().unwrap();
        let writer = ArtifactWriter::new(tmp.path());

        let metadata = json!({
            "prompt": "a red fox in snow",
            "model": "gemini-2.5-flash-image-preview",
            "quality": "high",
            "images_created": 1,
        });

        let path = writer
            .write_metadata(&metadata_filename("gemini", "20250101_120000"), &metadata)
            .await
            .expect("write should succeed");

        let raw = std::fs::read_to_string(&path).unwrap();
        // Indented JSON, and parses back to the exact value.
        assert!(raw.contains('\n'));
        let parsed: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed, metadata);
    }
}
