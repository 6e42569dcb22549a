//! Image tool handlers.
//!
//! Four synchronous tools share the same pipeline: validate input, apply
//! defaults, assemble an instruction prompt from ordered clauses, call the
//! Gemini API once, then split the response into a text description and
//! binary payloads written as local files.
//!
//! - `gemini_image_generation`: text-to-image via `generateContent`
//! - `gemini_image_edit`: edit a local image via `generateContent`
//! - `gemini_multi_image`: combine 2-3 local images via `generateContent`
//! - `imagen_t2i`: text-to-image via the Imagen `predict` API

use crate::client::{Content, GeminiClient, ImagenInstance, ImagenParameters, ImagenRequest, Part};
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use gemini_mcp_common::artifacts::{self, ArtifactWriter};
use gemini_mcp_common::config::Config;
use gemini_mcp_common::error::{Error, ValidationError};
use gemini_mcp_common::models::{GEMINI_IMAGE_MODELS, IMAGEN_MODELS, ModelRegistry};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use tracing::{info, instrument, warn};

/// Default model for the Gemini image tools.
pub const DEFAULT_GEMINI_IMAGE_MODEL: &str = "gemini-2.5-flash-image-preview";

/// Default style applied to image generation.
pub const DEFAULT_STYLE: &str = "photorealistic";

/// Default quality preference.
pub const DEFAULT_QUALITY: &str = "high";

/// Default content safety level.
pub const DEFAULT_SAFETY_LEVEL: &str = "moderate";

/// Default prompt language.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Valid edit types for `gemini_image_edit`.
pub const VALID_EDIT_TYPES: &[&str] = &["modify", "add", "remove", "style"];

/// Default edit type.
pub const DEFAULT_EDIT_TYPE: &str = "modify";

/// Valid blend modes for `gemini_multi_image`.
pub const VALID_BLEND_MODES: &[&str] = &["merge", "collage", "overlay", "sequence"];

/// Default blend mode.
pub const DEFAULT_BLEND_MODE: &str = "merge";

/// Minimum number of images for multi-image combine.
pub const MIN_COMBINE_IMAGES: usize = 2;

/// Maximum number of images for multi-image combine.
pub const MAX_COMBINE_IMAGES: usize = 3;

/// Default model for `imagen_t2i`.
pub const DEFAULT_IMAGEN_MODEL: &str = "imagen-4.0-generate-001";

/// Minimum number of images per Imagen request.
pub const MIN_IMAGEN_IMAGES: u8 = 1;

/// Maximum number of images per Imagen request.
pub const MAX_IMAGEN_IMAGES: u8 = 4;

/// Default aspect ratio for Imagen generation.
pub const DEFAULT_IMAGEN_ASPECT_RATIO: &str = "1:1";

fn default_gemini_image_model() -> String {
    DEFAULT_GEMINI_IMAGE_MODEL.to_string()
}

fn default_style() -> String {
    DEFAULT_STYLE.to_string()
}

fn default_quality() -> String {
    DEFAULT_QUALITY.to_string()
}

fn default_safety_level() -> String {
    DEFAULT_SAFETY_LEVEL.to_string()
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

fn default_edit_type() -> String {
    DEFAULT_EDIT_TYPE.to_string()
}

fn default_blend_mode() -> String {
    DEFAULT_BLEND_MODE.to_string()
}

fn default_imagen_model() -> String {
    DEFAULT_IMAGEN_MODEL.to_string()
}

fn default_num_images() -> u8 {
    1
}

fn default_imagen_aspect_ratio() -> String {
    DEFAULT_IMAGEN_ASPECT_RATIO.to_string()
}

fn default_true() -> bool {
    true
}

// =============================================================================
// Tool Parameters
// =============================================================================

/// Parameters for the `gemini_image_generation` tool.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct ImageGenerateParams {
    /// Detailed text prompt describing what to visualize. Be specific about
    /// style, composition, colors, mood, and any particular elements.
    pub prompt: String,

    /// Gemini model to use for generation.
    #[serde(default = "default_gemini_image_model")]
    pub model: String,

    /// Image style preference such as "photorealistic", "artistic",
    /// "cartoon", "sketch", "oil painting", "watercolor".
    #[serde(default = "default_style")]
    pub style: String,

    /// Preferred aspect ratio, e.g. "1:1", "16:9", "9:16", "4:3", "3:4".
    /// Passed through to the prompt when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<String>,

    /// Image quality preference: "high", "medium", "draft".
    #[serde(default = "default_quality")]
    pub quality: String,

    /// Content safety level: "strict", "moderate", "permissive".
    #[serde(default = "default_safety_level")]
    pub safety_level: String,

    /// Language for prompt processing, e.g. "en", "es-MX", "ja", "zh", "hi".
    #[serde(default = "default_language")]
    pub language: String,

    /// Whether to ask for high-fidelity text rendering in the image.
    #[serde(default)]
    pub include_text: bool,

    /// Optional tags to categorize the generated image.
    #[serde(default)]
    pub tags: Vec<String>,

    /// Local directory where the image and metadata are saved.
    /// Falls back to the configured output directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_directory: Option<String>,
}

impl ImageGenerateParams {
    /// Validate the parameters.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.prompt.trim().is_empty() {
            errors.push(ValidationError::new("prompt", "Prompt cannot be empty"));
        }

        if ModelRegistry::resolve_gemini_image(&self.model).is_none() {
            errors.push(ValidationError::new(
                "model",
                format!(
                    "Unknown model '{}'. Valid models: {}",
                    self.model,
                    GEMINI_IMAGE_MODELS.iter().map(|m| m.id).collect::<Vec<_>>().join(", ")
                ),
            ));
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Assemble the instruction prompt from ordered clauses.
    pub fn enhanced_prompt(&self) -> String {
        let mut clauses = vec![format!("Create a picture of {}", self.prompt)];
        clauses.push(format!("Style: {}", self.style));
        if let Some(aspect_ratio) = &self.aspect_ratio {
            clauses.push(format!("Aspect ratio: {}", aspect_ratio));
        }
        if self.include_text {
            clauses.push("Include high-fidelity text rendering".to_string());
        }
        if self.quality == "high" {
            clauses.push("High quality, detailed rendering".to_string());
        }
        clauses.join(". ")
    }
}

/// Parameters for the `gemini_image_edit` tool.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct ImageEditParams {
    /// Path to the input image file to edit (PNG, JPEG, WebP).
    pub input_image_path: String,

    /// Detailed description of how to edit the image.
    pub edit_prompt: String,

    /// Gemini model to use for editing.
    #[serde(default = "default_gemini_image_model")]
    pub model: String,

    /// Whether to preserve the original image style during editing.
    #[serde(default = "default_true")]
    pub preserve_style: bool,

    /// Type of edit: "modify", "add", "remove", or "style".
    #[serde(default = "default_edit_type")]
    pub edit_type: String,

    /// Specific area to focus edits on, e.g. "background", "center".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mask_area: Option<String>,

    /// Local directory where the edited image is saved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_directory: Option<String>,
}

impl ImageEditParams {
    /// Validate the parameters.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.input_image_path.trim().is_empty() {
            errors.push(ValidationError::new("input_image_path", "Input image path is required"));
        }

        if self.edit_prompt.trim().is_empty() {
            errors.push(ValidationError::new("edit_prompt", "Edit prompt cannot be empty"));
        }

        if !VALID_EDIT_TYPES.contains(&self.edit_type.as_str()) {
            errors.push(ValidationError::new(
                "edit_type",
                format!(
                    "Invalid edit type '{}'. Valid options: {}",
                    self.edit_type,
                    VALID_EDIT_TYPES.join(", ")
                ),
            ));
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Assemble the edit instruction prompt from ordered clauses.
    pub fn enhanced_prompt(&self) -> String {
        let mut clauses = vec![self.edit_prompt.clone()];
        if self.preserve_style {
            clauses.push("Preserve the original image style and characteristics".to_string());
        }
        if let Some(mask_area) = &self.mask_area {
            clauses.push(format!("Focus changes on the {} area", mask_area));
        }
        clauses.push(
            match self.edit_type.as_str() {
                "add" => "Add the requested elements to the image",
                "remove" => "Remove the specified elements from the image",
                "style" => "Change the style while keeping the subject matter",
                _ => "Modify the image as requested",
            }
            .to_string(),
        );
        clauses.join(". ")
    }
}

/// Parameters for the `gemini_multi_image` tool.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct MultiImageParams {
    /// Paths to the input image files to combine (2-3 images).
    pub input_image_paths: Vec<String>,

    /// Description of how to combine or blend the images.
    pub combine_prompt: String,

    /// Gemini model to use for multi-image processing.
    #[serde(default = "default_gemini_image_model")]
    pub model: String,

    /// How to blend images: "merge", "collage", "overlay", or "sequence".
    #[serde(default = "default_blend_mode")]
    pub blend_mode: String,

    /// Style for the combined image, e.g. "photorealistic", "seamless".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_style: Option<String>,

    /// Local directory where the combined image is saved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_directory: Option<String>,
}

impl MultiImageParams {
    /// Validate the parameters.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.input_image_paths.len() < MIN_COMBINE_IMAGES {
            errors.push(ValidationError::new(
                "input_image_paths",
                format!("At least {} input images are required", MIN_COMBINE_IMAGES),
            ));
        } else if self.input_image_paths.len() > MAX_COMBINE_IMAGES {
            errors.push(ValidationError::new(
                "input_image_paths",
                format!("Maximum {} input images supported", MAX_COMBINE_IMAGES),
            ));
        }

        if self.combine_prompt.trim().is_empty() {
            errors.push(ValidationError::new("combine_prompt", "Combine prompt cannot be empty"));
        }

        if !VALID_BLEND_MODES.contains(&self.blend_mode.as_str()) {
            errors.push(ValidationError::new(
                "blend_mode",
                format!(
                    "Invalid blend mode '{}'. Valid options: {}",
                    self.blend_mode,
                    VALID_BLEND_MODES.join(", ")
                ),
            ));
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Assemble the combine instruction prompt from ordered clauses.
    pub fn enhanced_prompt(&self) -> String {
        let mut clauses = vec![self.combine_prompt.clone()];
        clauses.push(
            match self.blend_mode.as_str() {
                "collage" => "Create a collage arrangement of the images",
                "overlay" => "Overlay the images with artistic blending",
                "sequence" => "Arrange the images in a sequence or timeline",
                _ => "Seamlessly merge the images into a cohesive composition",
            }
            .to_string(),
        );
        if let Some(output_style) = &self.output_style {
            clauses.push(format!("Output style: {}", output_style));
        }
        clauses.join(". ")
    }
}

/// Parameters for the `imagen_t2i` tool.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct ImagenGenerateParams {
    /// Detailed text prompt for image generation.
    pub prompt: String,

    /// Imagen model variant to use.
    #[serde(default = "default_imagen_model")]
    pub model: String,

    /// Number of images to generate in a single request (1-4).
    #[serde(default = "default_num_images")]
    pub num_images: u8,

    /// Aspect ratio for generated images: "1:1", "16:9", "9:16", "4:3", "3:4".
    #[serde(default = "default_imagen_aspect_ratio")]
    pub aspect_ratio: String,

    /// Local directory where generated images are saved as PNG files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_directory: Option<String>,
}

impl ImagenGenerateParams {
    /// Validate the parameters against the model constraints.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.prompt.trim().is_empty() {
            errors.push(ValidationError::new("prompt", "Prompt cannot be empty"));
        }

        let model = ModelRegistry::resolve_imagen(&self.model);
        match model {
            None => {
                errors.push(ValidationError::new(
                    "model",
                    format!(
                        "Unknown model '{}'. Valid models: {}",
                        self.model,
                        IMAGEN_MODELS.iter().map(|m| m.id).collect::<Vec<_>>().join(", ")
                    ),
                ));
            }
            Some(model) => {
                if !model.supported_aspect_ratios.contains(&self.aspect_ratio.as_str()) {
                    errors.push(ValidationError::new(
                        "aspect_ratio",
                        format!(
                            "Invalid aspect ratio '{}'. Valid options for {}: {}",
                            self.aspect_ratio,
                            model.id,
                            model.supported_aspect_ratios.join(", ")
                        ),
                    ));
                }
            }
        }

        if self.num_images < MIN_IMAGEN_IMAGES || self.num_images > MAX_IMAGEN_IMAGES {
            errors.push(ValidationError::new(
                "num_images",
                format!(
                    "num_images must be between {} and {}, got {}",
                    MIN_IMAGEN_IMAGES, MAX_IMAGEN_IMAGES, self.num_images
                ),
            ));
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

// =============================================================================
// Output Records
// =============================================================================

/// Result of `gemini_image_generation`.
#[derive(Debug, Serialize)]
pub struct ImageGenerationOutput {
    pub description: String,
    pub model: String,
    pub style: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<String>,
    pub quality: String,
    pub language: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    pub saved_files: Vec<String>,
    pub metadata: BTreeMap<String, String>,
    pub generated_at: String,
    pub images_created: usize,
}

/// Result of `gemini_image_edit`.
#[derive(Debug, Serialize)]
pub struct ImageEditOutput {
    pub original_image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edited_image: Option<String>,
    pub edit_type: String,
    pub model: String,
    pub saved_files: Vec<String>,
    pub metadata: BTreeMap<String, String>,
    pub generated_at: String,
}

/// Result of `gemini_multi_image`.
#[derive(Debug, Serialize)]
pub struct MultiImageOutput {
    pub input_images: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub combined_image: Option<String>,
    pub blend_mode: String,
    pub model: String,
    pub saved_files: Vec<String>,
    pub metadata: BTreeMap<String, String>,
    pub generated_at: String,
    pub images_processed: usize,
}

/// Result of `imagen_t2i`.
#[derive(Debug, Serialize)]
pub struct ImagenGenerationOutput {
    pub images_generated: usize,
    pub model: String,
    pub aspect_ratio: String,
    pub saved_files: Vec<String>,
    pub generated_at: String,
}

// =============================================================================
// Handler
// =============================================================================

/// Handler for the four image tools.
#[derive(Debug, Clone)]
pub struct ImageHandler {
    config: Config,
    client: GeminiClient,
}

impl ImageHandler {
    /// Create a new handler from the application configuration.
    pub fn new(config: Config) -> Self {
        let client = GeminiClient::new(config.api_key.clone());
        Self { config, client }
    }

    /// Create a handler with an explicit client (tests, alternative endpoints).
    pub fn with_client(config: Config, client: GeminiClient) -> Self {
        Self { config, client }
    }

    /// Generate an image from a text prompt.
    #[instrument(level = "info", name = "gemini_image_generation", skip(self, params), fields(model = %params.model, style = %params.style))]
    pub async fn generate(&self, params: ImageGenerateParams) -> Result<ImageGenerationOutput, Error> {
        params.validate().map_err(Error::from_validation_errors)?;

        let prompt_text = params.enhanced_prompt();
        info!(quality = %params.quality, "generating image");

        let response = self
            .client
            .generate_content(&params.model, vec![Content::user(vec![Part::text(prompt_text.as_str())])])
            .await?;

        if response.candidates.is_empty() {
            return Err(Error::empty_response("no content was generated"));
        }

        let timestamp = artifacts::current_timestamp();
        let writer = ArtifactWriter::resolve(params.output_directory.as_deref(), &self.config.output_dir);

        let mut description = String::new();
        let mut saved_files = Vec::new();
        let mut images_created = 0usize;

        for candidate in &response.candidates {
            let Some(content) = &candidate.content else { continue };
            for part in &content.parts {
                match part {
                    Part::Text { text } => description = text.clone(),
                    Part::InlineData { inline_data } => {
                        let Some(data) = decode_payload(&inline_data.data) else { continue };
                        let filename = artifacts::indexed_filename(
                            "gemini_generated",
                            Some(&params.style),
                            &timestamp,
                            images_created,
                            "png",
                        );
                        images_created += 1;
                        if let Some(path) = writer.write_media(&filename, &data).await {
                            saved_files.push(path);
                        }
                    }
                }
            }
        }

        if description.is_empty() {
            description = "Image generated successfully".to_string();
        }

        let sidecar = json!({
            "model": &params.model,
            "prompt": &params.prompt,
            "enhanced_prompt": &prompt_text,
            "style": &params.style,
            "aspect_ratio": &params.aspect_ratio,
            "quality": &params.quality,
            "safety_level": &params.safety_level,
            "language": &params.language,
            "include_text": params.include_text,
            "tags": &params.tags,
            "generated_at": &timestamp,
            "images_created": images_created,
        });
        if let Some(path) = writer
            .write_metadata(&artifacts::metadata_filename("gemini", &timestamp), &sidecar)
            .await
        {
            saved_files.push(path);
        }

        let metadata = BTreeMap::from([
            ("original_prompt".to_string(), params.prompt.clone()),
            ("enhanced_prompt".to_string(), prompt_text),
            ("quality".to_string(), params.quality.clone()),
            ("safety_level".to_string(), params.safety_level.clone()),
        ]);

        Ok(ImageGenerationOutput {
            description,
            model: params.model,
            style: params.style,
            aspect_ratio: params.aspect_ratio,
            quality: params.quality,
            language: params.language,
            tags: params.tags,
            saved_files,
            metadata,
            generated_at: timestamp,
            images_created,
        })
    }

    /// Edit an existing local image.
    #[instrument(level = "info", name = "gemini_image_edit", skip(self, params), fields(model = %params.model, edit_type = %params.edit_type))]
    pub async fn edit(&self, params: ImageEditParams) -> Result<ImageEditOutput, Error> {
        params.validate().map_err(Error::from_validation_errors)?;

        let image_data = read_input_image(&params.input_image_path).await?;
        let prompt_text = params.enhanced_prompt();
        info!(input = %params.input_image_path, "editing image");

        let response = self
            .client
            .generate_content(
                &params.model,
                vec![Content::user(vec![
                    Part::text(prompt_text.as_str()),
                    Part::inline_png(&image_data),
                ])],
            )
            .await?;

        if response.candidates.is_empty() {
            return Err(Error::empty_response("no edited content was generated"));
        }

        let timestamp = artifacts::current_timestamp();
        let writer = ArtifactWriter::resolve(params.output_directory.as_deref(), &self.config.output_dir);

        let mut saved_files = Vec::new();
        let mut edited_image = None;
        let mut index = 0usize;

        for candidate in &response.candidates {
            let Some(content) = &candidate.content else { continue };
            for part in &content.parts {
                if let Part::InlineData { inline_data } = part {
                    let Some(data) = decode_payload(&inline_data.data) else { continue };
                    let filename = artifacts::indexed_filename(
                        "gemini_edited",
                        Some(&params.edit_type),
                        &timestamp,
                        index,
                        "png",
                    );
                    index += 1;
                    if let Some(path) = writer.write_media(&filename, &data).await {
                        edited_image = Some(path.clone());
                        saved_files.push(path);
                    }
                }
            }
        }

        let sidecar = json!({
            "model": &params.model,
            "original_image": &params.input_image_path,
            "edit_prompt": &params.edit_prompt,
            "enhanced_prompt": &prompt_text,
            "edit_type": &params.edit_type,
            "preserve_style": params.preserve_style,
            "mask_area": &params.mask_area,
            "generated_at": &timestamp,
        });
        if let Some(path) = writer
            .write_metadata(&artifacts::metadata_filename("gemini_edited", &timestamp), &sidecar)
            .await
        {
            saved_files.push(path);
        }

        let mut metadata = BTreeMap::from([
            ("original_image".to_string(), params.input_image_path.clone()),
            ("edit_prompt".to_string(), params.edit_prompt.clone()),
            ("edit_type".to_string(), params.edit_type.clone()),
            ("preserve_style".to_string(), params.preserve_style.to_string()),
        ]);
        if let Some(mask_area) = &params.mask_area {
            metadata.insert("mask_area".to_string(), mask_area.clone());
        }

        Ok(ImageEditOutput {
            original_image: params.input_image_path,
            edited_image,
            edit_type: params.edit_type,
            model: params.model,
            saved_files,
            metadata,
            generated_at: timestamp,
        })
    }

    /// Combine 2-3 local images into one composition.
    #[instrument(level = "info", name = "gemini_multi_image", skip(self, params), fields(model = %params.model, blend_mode = %params.blend_mode))]
    pub async fn combine(&self, params: MultiImageParams) -> Result<MultiImageOutput, Error> {
        params.validate().map_err(Error::from_validation_errors)?;

        let prompt_text = params.enhanced_prompt();
        info!(count = params.input_image_paths.len(), "combining images");

        let mut parts = vec![Part::text(prompt_text.as_str())];
        for (i, path) in params.input_image_paths.iter().enumerate() {
            let data = tokio::fs::read(path).await.map_err(|e| {
                Error::validation(format!("failed to read image {} ({}): {}", i + 1, path, e))
            })?;
            parts.push(Part::inline_png(&data));
        }

        let response = self
            .client
            .generate_content(&params.model, vec![Content::user(parts)])
            .await?;

        if response.candidates.is_empty() {
            return Err(Error::empty_response("no combined content was generated"));
        }

        let timestamp = artifacts::current_timestamp();
        let writer = ArtifactWriter::resolve(params.output_directory.as_deref(), &self.config.output_dir);

        let mut saved_files = Vec::new();
        let mut combined_image = None;
        let mut index = 0usize;

        for candidate in &response.candidates {
            let Some(content) = &candidate.content else { continue };
            for part in &content.parts {
                if let Part::InlineData { inline_data } = part {
                    let Some(data) = decode_payload(&inline_data.data) else { continue };
                    let filename = artifacts::indexed_filename(
                        "gemini_combined",
                        Some(&params.blend_mode),
                        &timestamp,
                        index,
                        "png",
                    );
                    index += 1;
                    if let Some(path) = writer.write_media(&filename, &data).await {
                        combined_image = Some(path.clone());
                        saved_files.push(path);
                    }
                }
            }
        }

        let sidecar = json!({
            "model": &params.model,
            "input_images": &params.input_image_paths,
            "combine_prompt": &params.combine_prompt,
            "enhanced_prompt": &prompt_text,
            "blend_mode": &params.blend_mode,
            "output_style": &params.output_style,
            "generated_at": &timestamp,
        });
        if let Some(path) = writer
            .write_metadata(&artifacts::metadata_filename("gemini_combined", &timestamp), &sidecar)
            .await
        {
            saved_files.push(path);
        }

        let mut metadata = BTreeMap::from([
            ("combine_prompt".to_string(), params.combine_prompt.clone()),
            ("blend_mode".to_string(), params.blend_mode.clone()),
            ("images_count".to_string(), params.input_image_paths.len().to_string()),
        ]);
        if let Some(output_style) = &params.output_style {
            metadata.insert("output_style".to_string(), output_style.clone());
        }

        let images_processed = params.input_image_paths.len();
        Ok(MultiImageOutput {
            input_images: params.input_image_paths,
            combined_image,
            blend_mode: params.blend_mode,
            model: params.model,
            saved_files,
            metadata,
            generated_at: timestamp,
            images_processed,
        })
    }

    /// Generate images with an Imagen model.
    #[instrument(level = "info", name = "imagen_t2i", skip(self, params), fields(model = %params.model, num_images = params.num_images))]
    pub async fn generate_imagen(&self, params: ImagenGenerateParams) -> Result<ImagenGenerationOutput, Error> {
        params.validate().map_err(Error::from_validation_errors)?;

        // validate() guarantees the model resolves.
        let model = ModelRegistry::resolve_imagen(&params.model)
            .ok_or_else(|| Error::validation(format!("Unknown model: {}", params.model)))?;

        info!(model_id = model.id, "generating images with Imagen");

        let request = ImagenRequest {
            instances: vec![ImagenInstance {
                prompt: params.prompt.clone(),
            }],
            parameters: ImagenParameters {
                sample_count: params.num_images,
                aspect_ratio: params.aspect_ratio.clone(),
            },
        };

        let response = self.client.generate_images(model.id, &request).await?;

        if response.predictions.is_empty() {
            return Err(Error::empty_response("no images were generated"));
        }

        let timestamp = artifacts::current_timestamp();
        let writer = ArtifactWriter::resolve(params.output_directory.as_deref(), &self.config.output_dir);

        let mut saved_files = Vec::new();
        for (i, prediction) in response.predictions.iter().enumerate() {
            let Some(encoded) = &prediction.bytes_base64_encoded else { continue };
            let Some(data) = decode_payload(encoded) else { continue };
            let filename = artifacts::indexed_filename("imagen", None, &timestamp, i, "png");
            if let Some(path) = writer.write_media(&filename, &data).await {
                saved_files.push(path);
            }
        }

        let sidecar = json!({
            "model": model.id,
            "prompt": &params.prompt,
            "num_images": params.num_images,
            "aspect_ratio": &params.aspect_ratio,
            "generated_at": &timestamp,
            "images_generated": response.predictions.len(),
        });
        if let Some(path) = writer
            .write_metadata(&artifacts::metadata_filename("imagen", &timestamp), &sidecar)
            .await
        {
            saved_files.push(path);
        }

        Ok(ImagenGenerationOutput {
            images_generated: response.predictions.len(),
            model: model.id.to_string(),
            aspect_ratio: params.aspect_ratio,
            saved_files,
            generated_at: timestamp,
        })
    }
}

/// Read a caller-referenced input image, mapping failures to a validation
/// error naming the path.
async fn read_input_image(path: &str) -> Result<Vec<u8>, Error> {
    tokio::fs::read(path)
        .await
        .map_err(|e| Error::validation(format!("failed to read input image {}: {}", path, e)))
}

/// Decode one base64 payload from the API, skipping (with a log) anything
/// undecodable rather than failing the whole call.
fn decode_payload(encoded: &str) -> Option<Vec<u8>> {
    match BASE64.decode(encoded) {
        Ok(data) if !data.is_empty() => Some(data),
        Ok(_) => None,
        Err(e) => {
            warn!(error = %e, "skipping undecodable media payload");
            None
        }
    }
}
