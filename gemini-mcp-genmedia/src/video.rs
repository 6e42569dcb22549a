//! Video tool handlers.
//!
//! The three video tools (`veo_text_to_video`, `veo_image_to_video`, and the
//! legacy `veo_generate_video`) share one submit-poll-download pipeline:
//! start a long-running Veo operation, poll it to a terminal state via
//! [`crate::poller`], then download the generated video and write it with a
//! metadata sidecar.
//!
//! Unlike the image tools, a timed-out or failed generation is not an error:
//! the caller receives a result record whose `status` field says what
//! happened (`completed`, `failed`, `timeout`, or `poll_error`).

use crate::client::{GeminiClient, GeneratedSample, VeoImage, VeoInstance, VeoParameters, VeoRequest, VideoOperation};
use crate::poller::{self, OperationStatus, PollOutcome};
use gemini_mcp_common::artifacts::{self, ArtifactWriter};
use gemini_mcp_common::config::Config;
use gemini_mcp_common::error::{Error, ValidationError};
use gemini_mcp_common::models::{ModelRegistry, VEO_MODELS};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use tracing::{info, instrument, warn};

/// Default model for video generation.
pub const DEFAULT_VEO_MODEL: &str = "veo-3.0-generate-001";

/// Default aspect ratio.
pub const DEFAULT_ASPECT_RATIO: &str = "16:9";

/// Default resolution.
pub const DEFAULT_RESOLUTION: &str = "720p";

/// Generated videos are always eight seconds long.
pub const ESTIMATED_LENGTH: &str = "8 seconds";

fn default_veo_model() -> String {
    DEFAULT_VEO_MODEL.to_string()
}

fn default_aspect_ratio() -> String {
    DEFAULT_ASPECT_RATIO.to_string()
}

fn default_resolution() -> String {
    DEFAULT_RESOLUTION.to_string()
}

// =============================================================================
// Tool Parameters
// =============================================================================

/// Parameters for the `veo_text_to_video` tool.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct VideoT2vParams {
    /// Detailed text prompt describing the video content (max 1024 tokens).
    /// Be specific about scenes, actions, camera movements, and visual style.
    pub prompt: String,

    /// Description of what should NOT appear in the video.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negative_prompt: Option<String>,

    /// Video width-to-height ratio: "16:9" or "9:16".
    #[serde(default = "default_aspect_ratio")]
    pub aspect_ratio: String,

    /// Video resolution: "720p" or "1080p" (1080p only for 16:9).
    #[serde(default = "default_resolution")]
    pub resolution: String,

    /// Veo model version to use.
    #[serde(default = "default_veo_model")]
    pub model: String,

    /// Optional seed value for slight reproducibility.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,

    /// Local directory where the MP4 video and metadata are saved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_directory: Option<String>,
}

/// Parameters for the `veo_image_to_video` tool.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct VideoI2vParams {
    /// Path to the image file to animate as the starting frame.
    pub image_path: String,

    /// Text prompt describing how the image should be animated.
    pub prompt: String,

    /// Description of what should NOT happen in the animation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negative_prompt: Option<String>,

    /// Video width-to-height ratio: "16:9" or "9:16".
    #[serde(default = "default_aspect_ratio")]
    pub aspect_ratio: String,

    /// Video resolution: "720p" or "1080p" (1080p only for 16:9).
    #[serde(default = "default_resolution")]
    pub resolution: String,

    /// Veo model version to use.
    #[serde(default = "default_veo_model")]
    pub model: String,

    /// Optional seed value for slight reproducibility.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,

    /// Local directory where the MP4 video and metadata are saved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_directory: Option<String>,
}

/// Parameters for the legacy `veo_generate_video` tool, which covers both
/// text-to-video and image-to-video depending on whether `image_path` is
/// present.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct VideoGenerateParams {
    /// Detailed text prompt describing the video content (max 1024 tokens).
    pub prompt: String,

    /// Optional path to an image file to animate as the starting frame.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,

    /// Description of what should NOT appear in the video.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negative_prompt: Option<String>,

    /// Video width-to-height ratio: "16:9" or "9:16".
    #[serde(default = "default_aspect_ratio")]
    pub aspect_ratio: String,

    /// Video resolution: "720p" or "1080p" (1080p only for 16:9).
    #[serde(default = "default_resolution")]
    pub resolution: String,

    /// Veo model version to use.
    #[serde(default = "default_veo_model")]
    pub model: String,

    /// Optional seed value for slight reproducibility.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,

    /// Local directory where the MP4 video and metadata are saved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_directory: Option<String>,
}

/// Validate the model/aspect-ratio/resolution combination shared by every
/// video tool.
fn validate_video_settings(
    model: &str,
    aspect_ratio: &str,
    resolution: &str,
    errors: &mut Vec<ValidationError>,
) {
    match ModelRegistry::resolve_veo(model) {
        None => {
            errors.push(ValidationError::new(
                "model",
                format!(
                    "Unknown model '{}'. Valid models: {}",
                    model,
                    VEO_MODELS.iter().map(|m| m.id).collect::<Vec<_>>().join(", ")
                ),
            ));
        }
        Some(model) => {
            if !model.supported_aspect_ratios.contains(&aspect_ratio) {
                errors.push(ValidationError::new(
                    "aspect_ratio",
                    format!(
                        "Invalid aspect ratio '{}'. Valid options for {}: {}",
                        aspect_ratio,
                        model.id,
                        model.supported_aspect_ratios.join(", ")
                    ),
                ));
            }
            if !model.supported_resolutions.contains(&resolution) {
                errors.push(ValidationError::new(
                    "resolution",
                    format!(
                        "Invalid resolution '{}'. Valid options for {}: {}",
                        resolution,
                        model.id,
                        model.supported_resolutions.join(", ")
                    ),
                ));
            } else if resolution == "1080p" && aspect_ratio != "16:9" {
                errors.push(ValidationError::new(
                    "resolution",
                    "1080p is only supported for the 16:9 aspect ratio",
                ));
            }
        }
    }
}

impl VideoT2vParams {
    /// Validate the parameters against the model constraints.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        if self.prompt.trim().is_empty() {
            errors.push(ValidationError::new("prompt", "Prompt cannot be empty"));
        }
        validate_video_settings(&self.model, &self.aspect_ratio, &self.resolution, &mut errors);
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

impl VideoI2vParams {
    /// Validate the parameters against the model constraints.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        if self.image_path.trim().is_empty() {
            errors.push(ValidationError::new("image_path", "Image path is required"));
        }
        if self.prompt.trim().is_empty() {
            errors.push(ValidationError::new("prompt", "Prompt cannot be empty"));
        }
        validate_video_settings(&self.model, &self.aspect_ratio, &self.resolution, &mut errors);
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

impl VideoGenerateParams {
    /// Validate the parameters against the model constraints.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        if self.prompt.trim().is_empty() {
            errors.push(ValidationError::new("prompt", "Prompt cannot be empty"));
        }
        if let Some(image_path) = &self.image_path {
            if image_path.trim().is_empty() {
                errors.push(ValidationError::new("image_path", "Image path cannot be blank when given"));
            }
        }
        validate_video_settings(&self.model, &self.aspect_ratio, &self.resolution, &mut errors);
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Compose the video prompt, folding in the negative prompt when present.
pub fn compose_video_prompt(prompt: &str, negative_prompt: Option<&str>) -> String {
    match negative_prompt {
        Some(negative) if !negative.trim().is_empty() => {
            format!("{}. Avoid: {}", prompt, negative)
        }
        _ => prompt.to_string(),
    }
}

// =============================================================================
// Output Record
// =============================================================================

/// Result of a video generation tool call.
///
/// `status` is one of `completed`, `failed`, `timeout`, or `poll_error`;
/// everything after submission is reported through it rather than through
/// errors.
#[derive(Debug, Serialize)]
pub struct VideoGenerationOutput {
    pub operation_id: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    pub saved_files: Vec<String>,
    pub model: String,
    pub aspect_ratio: String,
    pub resolution: String,
    pub metadata: BTreeMap<String, String>,
    pub generated_at: String,
    pub estimated_length: String,
}

// =============================================================================
// Handler
// =============================================================================

/// One video generation request after validation and defaulting.
struct VideoJob {
    generation_type: &'static str,
    file_prefix: &'static str,
    prompt: String,
    negative_prompt: Option<String>,
    image: Option<VeoImage>,
    input_image_path: Option<String>,
    model: String,
    aspect_ratio: String,
    resolution: String,
    seed: Option<i64>,
    output_directory: Option<String>,
}

/// Handler for the three video tools.
#[derive(Debug, Clone)]
pub struct VideoHandler {
    config: Config,
    client: GeminiClient,
}

impl VideoHandler {
    /// Create a new handler from the application configuration.
    pub fn new(config: Config) -> Self {
        let client = GeminiClient::new(config.api_key.clone());
        Self { config, client }
    }

    /// Create a handler with an explicit client (tests, alternative endpoints).
    pub fn with_client(config: Config, client: GeminiClient) -> Self {
        Self { config, client }
    }

    /// Generate a video from a text prompt.
    #[instrument(level = "info", name = "veo_text_to_video", skip(self, params), fields(model = %params.model, aspect_ratio = %params.aspect_ratio))]
    pub async fn generate_t2v(&self, params: VideoT2vParams) -> Result<VideoGenerationOutput, Error> {
        params.validate().map_err(Error::from_validation_errors)?;

        self.run(VideoJob {
            generation_type: "text-to-video",
            file_prefix: "veo_text_to_video",
            prompt: params.prompt,
            negative_prompt: params.negative_prompt,
            image: None,
            input_image_path: None,
            model: params.model,
            aspect_ratio: params.aspect_ratio,
            resolution: params.resolution,
            seed: params.seed,
            output_directory: params.output_directory,
        })
        .await
    }

    /// Animate a local image into a video.
    #[instrument(level = "info", name = "veo_image_to_video", skip(self, params), fields(model = %params.model, aspect_ratio = %params.aspect_ratio))]
    pub async fn generate_i2v(&self, params: VideoI2vParams) -> Result<VideoGenerationOutput, Error> {
        params.validate().map_err(Error::from_validation_errors)?;

        let image_data = read_seed_image(&params.image_path).await?;

        self.run(VideoJob {
            generation_type: "image-to-video",
            file_prefix: "veo_image_to_video",
            prompt: params.prompt,
            negative_prompt: params.negative_prompt,
            image: Some(VeoImage::png(&image_data)),
            input_image_path: Some(params.image_path),
            model: params.model,
            aspect_ratio: params.aspect_ratio,
            resolution: params.resolution,
            seed: params.seed,
            output_directory: params.output_directory,
        })
        .await
    }

    /// Legacy combined entry point: image-seeded when `image_path` is given,
    /// text-only otherwise.
    #[instrument(level = "info", name = "veo_generate_video", skip(self, params), fields(model = %params.model, aspect_ratio = %params.aspect_ratio))]
    pub async fn generate_legacy(&self, params: VideoGenerateParams) -> Result<VideoGenerationOutput, Error> {
        params.validate().map_err(Error::from_validation_errors)?;

        let (image, input_image_path, generation_type) = match params.image_path {
            Some(image_path) => {
                let image_data = read_seed_image(&image_path).await?;
                (Some(VeoImage::png(&image_data)), Some(image_path), "image-to-video")
            }
            None => (None, None, "text-to-video"),
        };

        self.run(VideoJob {
            generation_type,
            file_prefix: "veo_video",
            prompt: params.prompt,
            negative_prompt: params.negative_prompt,
            image,
            input_image_path,
            model: params.model,
            aspect_ratio: params.aspect_ratio,
            resolution: params.resolution,
            seed: params.seed,
            output_directory: params.output_directory,
        })
        .await
    }

    /// Submit, poll, download, report.
    async fn run(&self, job: VideoJob) -> Result<VideoGenerationOutput, Error> {
        let prompt_text = compose_video_prompt(&job.prompt, job.negative_prompt.as_deref());

        let request = VeoRequest {
            instances: vec![VeoInstance {
                prompt: prompt_text,
                image: job.image,
            }],
            parameters: VeoParameters {
                aspect_ratio: Some(job.aspect_ratio.clone()),
                resolution: Some(job.resolution.clone()),
                seed: job.seed,
            },
        };

        let operation = self.client.start_video_generation(&job.model, &request).await?;
        let operation_name = operation.name.clone();
        info!(operation = %operation_name, generation_type = job.generation_type, "video generation started");

        // The submit response can already be terminal; skip polling then.
        let outcome = match operation_snapshot(operation).into_terminal_outcome() {
            Some(outcome) => outcome,
            None => {
                let client = &self.client;
                let name = operation_name.as_str();
                poller::poll_until_done(name, move || async move {
                    client.fetch_operation(name).await.map(operation_snapshot)
                })
                .await
            }
        };

        let timestamp = artifacts::current_timestamp();
        let writer = ArtifactWriter::resolve(job.output_directory.as_deref(), &self.config.output_dir);
        let status = outcome.status_label().to_string();

        let mut saved_files = Vec::new();
        let mut video_url = None;

        match &outcome {
            PollOutcome::Completed(samples) => {
                info!(operation = %operation_name, "video generation completed");
                if let Some(uri) = first_video_uri(samples) {
                    match self.client.download(uri).await {
                        Ok(bytes) => {
                            let filename = artifacts::single_filename(job.file_prefix, &timestamp, "mp4");
                            if let Some(path) = writer.write_media(&filename, &bytes).await {
                                video_url = Some(path.clone());
                                saved_files.push(path);
                            }
                        }
                        Err(e) => {
                            warn!(operation = %operation_name, error = %e, "failed to download generated video");
                        }
                    }
                } else {
                    warn!(operation = %operation_name, "completed operation carries no video URI");
                }
            }
            PollOutcome::Failed(message) => {
                warn!(operation = %operation_name, error = %message, "video generation failed");
            }
            PollOutcome::TimedOut => {
                warn!(operation = %operation_name, "video generation timed out");
            }
            PollOutcome::PollError(message) => {
                warn!(operation = %operation_name, error = %message, "lost track of video generation");
            }
        }

        let sidecar = json!({
            "generation_type": job.generation_type,
            "model": &job.model,
            "prompt": &job.prompt,
            "negative_prompt": &job.negative_prompt,
            "input_image": &job.input_image_path,
            "aspect_ratio": &job.aspect_ratio,
            "resolution": &job.resolution,
            "seed": job.seed,
            "operation_id": &operation_name,
            "video_url": &video_url,
            "status": &status,
            "generated_at": &timestamp,
            "estimated_length": ESTIMATED_LENGTH,
        });
        if let Some(path) = writer
            .write_metadata(&artifacts::metadata_filename(job.file_prefix, &timestamp), &sidecar)
            .await
        {
            saved_files.push(path);
        }

        let mut metadata = BTreeMap::from([
            ("generation_type".to_string(), job.generation_type.to_string()),
            ("original_prompt".to_string(), job.prompt),
            ("operation_id".to_string(), operation_name.clone()),
        ]);
        if let Some(negative_prompt) = job.negative_prompt {
            metadata.insert("negative_prompt".to_string(), negative_prompt);
        }
        if let Some(input_image) = job.input_image_path {
            metadata.insert("input_image".to_string(), input_image);
        }
        if let Some(seed) = job.seed {
            metadata.insert("seed".to_string(), seed.to_string());
        }

        Ok(VideoGenerationOutput {
            operation_id: operation_name,
            status,
            video_url,
            saved_files,
            model: job.model,
            aspect_ratio: job.aspect_ratio,
            resolution: job.resolution,
            metadata,
            generated_at: timestamp,
            estimated_length: ESTIMATED_LENGTH.to_string(),
        })
    }
}

/// Read the seed image for an image-to-video request, mapping failures to a
/// validation error naming the path.
async fn read_seed_image(path: &str) -> Result<Vec<u8>, Error> {
    tokio::fs::read(path)
        .await
        .map_err(|e| Error::validation(format!("image file not found: {} ({})", path, e)))
}

/// Project an API operation into the poller's view of it.
///
/// A done operation with zero samples is reported as having no result, which
/// the poller maps to the failed outcome.
fn operation_snapshot(operation: VideoOperation) -> OperationStatus<Vec<GeneratedSample>> {
    let result = operation
        .response
        .and_then(|r| r.generate_video_response)
        .map(|r| r.generated_samples)
        .filter(|samples| !samples.is_empty());
    OperationStatus {
        done: operation.done,
        error: operation.error.map(|e| e.describe()),
        result,
    }
}

/// First downloadable video URI in the samples, if any.
fn first_video_uri(samples: &[GeneratedSample]) -> Option<&str> {
    samples
        .iter()
        .filter_map(|s| s.video.as_ref()?.uri.as_deref())
        .next()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{GenerateVideoResponse, OperationError, VideoOperationResponse, VideoRef};

    fn operation(
        done: bool,
        error: Option<OperationError>,
        uris: Option<Vec<&str>>,
    ) -> VideoOperation {
        VideoOperation {
            name: "models/veo-3.0-generate-001/operations/abc123".to_string(),
            done,
            error,
            response: uris.map(|uris| VideoOperationResponse {
                generate_video_response: Some(GenerateVideoResponse {
                    generated_samples: uris
                        .into_iter()
                        .map(|uri| GeneratedSample {
                            video: Some(VideoRef {
                                uri: Some(uri.to_string()),
                            }),
                        })
                        .collect(),
                }),
            }),
        }
    }

    #[test]
    fn test_t2v_defaults() {
        let params: VideoT2vParams =
            serde_json::from_str(r#"{"prompt": "a cat walking"}"#).unwrap();
        assert_eq!(params.model, DEFAULT_VEO_MODEL);
        assert_eq!(params.aspect_ratio, "16:9");
        assert_eq!(params.resolution, "720p");
        assert!(params.negative_prompt.is_none());
        assert!(params.seed.is_none());
    }

    #[test]
    fn test_t2v_empty_prompt() {
        let params: VideoT2vParams = serde_json::from_str(r#"{"prompt": "  "}"#).unwrap();
        let errors = params.validate().unwrap_err();
        assert!(errors.iter().any(|e| e.field == "prompt"));
    }

    #[test]
    fn test_t2v_unknown_model() {
        let params: VideoT2vParams =
            serde_json::from_str(r#"{"prompt": "a cat", "model": "sora"}"#).unwrap();
        let errors = params.validate().unwrap_err();
        assert!(errors.iter().any(|e| e.field == "model"));
    }

    #[test]
    fn test_t2v_invalid_aspect_ratio() {
        let params: VideoT2vParams =
            serde_json::from_str(r#"{"prompt": "a cat", "aspect_ratio": "4:3"}"#).unwrap();
        let errors = params.validate().unwrap_err();
        assert!(errors.iter().any(|e| e.field == "aspect_ratio"));
    }

    #[test]
    fn test_1080p_requires_16_9() {
        let params: VideoT2vParams = serde_json::from_str(
            r#"{"prompt": "a cat", "aspect_ratio": "9:16", "resolution": "1080p"}"#,
        )
        .unwrap();
        let errors = params.validate().unwrap_err();
        assert!(errors.iter().any(|e| e.field == "resolution"));

        let params: VideoT2vParams = serde_json::from_str(
            r#"{"prompt": "a cat", "aspect_ratio": "16:9", "resolution": "1080p"}"#,
        )
        .unwrap();
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_veo2_has_no_1080p() {
        let params: VideoT2vParams = serde_json::from_str(
            r#"{"prompt": "a cat", "model": "veo-2.0-generate-001", "resolution": "1080p"}"#,
        )
        .unwrap();
        let errors = params.validate().unwrap_err();
        assert!(errors.iter().any(|e| e.field == "resolution"));
    }

    #[test]
    fn test_i2v_requires_image_path() {
        let params: VideoI2vParams =
            serde_json::from_str(r#"{"image_path": "", "prompt": "animate"}"#).unwrap();
        let errors = params.validate().unwrap_err();
        assert!(errors.iter().any(|e| e.field == "image_path"));
    }

    #[test]
    fn test_legacy_params_image_path_optional() {
        let params: VideoGenerateParams =
            serde_json::from_str(r#"{"prompt": "a storm over the sea"}"#).unwrap();
        assert!(params.image_path.is_none());
        assert!(params.validate().is_ok());

        let params: VideoGenerateParams = serde_json::from_str(
            r#"{"prompt": "a storm over the sea", "image_path": "/tmp/frame.png"}"#,
        )
        .unwrap();
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_compose_video_prompt() {
        assert_eq!(compose_video_prompt("a cat", None), "a cat");
        assert_eq!(
            compose_video_prompt("a cat", Some("dogs, rain")),
            "a cat. Avoid: dogs, rain"
        );
        assert_eq!(compose_video_prompt("a cat", Some("  ")), "a cat");
    }

    #[test]
    fn test_snapshot_running() {
        let snapshot = operation_snapshot(operation(false, None, None));
        assert!(!snapshot.done);
        assert!(snapshot.into_terminal_outcome().is_none());
    }

    #[test]
    fn test_snapshot_completed_with_video() {
        let snapshot = operation_snapshot(operation(
            true,
            None,
            Some(vec!["https://example.com/video.mp4"]),
        ));
        match snapshot.into_terminal_outcome() {
            Some(PollOutcome::Completed(samples)) => {
                assert_eq!(first_video_uri(&samples), Some("https://example.com/video.mp4"));
            }
            other => panic!("expected Completed, got {:?}", other),
        }
    }

    #[test]
    fn test_snapshot_done_with_error_is_failed() {
        let snapshot = operation_snapshot(operation(
            true,
            Some(OperationError {
                code: Some(3),
                message: Some("policy violation".to_string()),
            }),
            None,
        ));
        match snapshot.into_terminal_outcome() {
            Some(PollOutcome::Failed(message)) => assert!(message.contains("policy violation")),
            other => panic!("expected Failed, got {:?}", other),
        }
    }

    #[test]
    fn test_snapshot_done_with_zero_samples_is_failed() {
        let snapshot = operation_snapshot(operation(true, None, Some(vec![])));
        assert!(matches!(
            snapshot.into_terminal_outcome(),
            Some(PollOutcome::Failed(_))
        ));
    }

    #[test]
    fn test_first_video_uri_skips_empty_samples() {
        let samples = vec![
            GeneratedSample { video: None },
            GeneratedSample {
                video: Some(VideoRef { uri: None }),
            },
            GeneratedSample {
                video: Some(VideoRef {
                    uri: Some("https://example.com/a.mp4".to_string()),
                }),
            },
        ];
        assert_eq!(first_video_uri(&samples), Some("https://example.com/a.mp4"));
        assert_eq!(first_video_uri(&[]), None);
    }
}
