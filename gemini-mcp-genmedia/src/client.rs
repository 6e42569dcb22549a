//! Gemini API client adapter.
//!
//! Thin wrapper over `reqwest` for the Gemini API surface the tools need:
//! synchronous content generation (`generateContent`), Imagen prediction
//! (`predict`), Veo long-running video generation (`predictLongRunning` plus
//! operation polling), and media download. Authentication is the API key in
//! the `x-goog-api-key` header on every request.

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use gemini_mcp_common::error::Error;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::debug;

/// Production Gemini API base URL.
pub const GEMINI_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini API client.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    /// Create a new client against the production API.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, GEMINI_API_BASE_URL)
    }

    /// Create a client against an alternative base URL (tests, proxies).
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Endpoint URL for a model verb, e.g.
    /// `{base}/models/gemini-2.5-flash-image-preview:generateContent`.
    pub fn model_endpoint(&self, model: &str, verb: &str) -> String {
        format!("{}/models/{}:{}", self.base_url, model, verb)
    }

    /// Endpoint URL for a long-running operation name as returned by the
    /// API (e.g. `models/veo-3.0-generate-001/operations/abc123`).
    pub fn operation_endpoint(&self, operation_name: &str) -> String {
        format!("{}/{}", self.base_url, operation_name)
    }

    async fn post_json<B: Serialize, R: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<R, Error> {
        debug!(endpoint = %endpoint, "POST");
        let response = self
            .http
            .post(endpoint)
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| Error::api(endpoint, 0, format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::api(endpoint, status.as_u16(), body));
        }

        response.json().await.map_err(|e| {
            Error::api(endpoint, status.as_u16(), format!("Failed to parse response: {}", e))
        })
    }

    async fn get_json<R: DeserializeOwned>(&self, endpoint: &str) -> Result<R, Error> {
        debug!(endpoint = %endpoint, "GET");
        let response = self
            .http
            .get(endpoint)
            .header("x-goog-api-key", &self.api_key)
            .send()
            .await
            .map_err(|e| Error::api(endpoint, 0, format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::api(endpoint, status.as_u16(), body));
        }

        response.json().await.map_err(|e| {
            Error::api(endpoint, status.as_u16(), format!("Failed to parse response: {}", e))
        })
    }

    /// Generate mixed text/image content from prompt parts.
    pub async fn generate_content(
        &self,
        model: &str,
        contents: Vec<Content>,
    ) -> Result<GenerateContentResponse, Error> {
        let endpoint = self.model_endpoint(model, "generateContent");
        self.post_json(&endpoint, &GenerateContentRequest { contents }).await
    }

    /// Generate images with an Imagen model.
    pub async fn generate_images(
        &self,
        model: &str,
        request: &ImagenRequest,
    ) -> Result<ImagenResponse, Error> {
        let endpoint = self.model_endpoint(model, "predict");
        self.post_json(&endpoint, request).await
    }

    /// Start a long-running Veo video generation, returning the operation
    /// handle to poll.
    pub async fn start_video_generation(
        &self,
        model: &str,
        request: &VeoRequest,
    ) -> Result<VideoOperation, Error> {
        let endpoint = self.model_endpoint(model, "predictLongRunning");
        self.post_json(&endpoint, request).await
    }

    /// Fetch the current state of a video generation operation.
    pub async fn fetch_operation(&self, operation_name: &str) -> Result<VideoOperation, Error> {
        let endpoint = self.operation_endpoint(operation_name);
        self.get_json(&endpoint).await
    }

    /// Download a generated media file by its URI.
    pub async fn download(&self, uri: &str) -> Result<Vec<u8>, Error> {
        debug!(uri = %uri, "downloading media");
        let response = self
            .http
            .get(uri)
            .header("x-goog-api-key", &self.api_key)
            .send()
            .await
            .map_err(|e| Error::api(uri, 0, format!("Download failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::api(uri, status.as_u16(), body));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::api(uri, status.as_u16(), format!("Failed to read body: {}", e)))?;
        Ok(bytes.to_vec())
    }
}

// =============================================================================
// generateContent Request/Response Types
// =============================================================================

/// Gemini `generateContent` request.
#[derive(Debug, Serialize)]
pub struct GenerateContentRequest {
    /// Conversation contents (a single user turn for these tools)
    pub contents: Vec<Content>,
}

/// Gemini content turn.
#[derive(Debug, Serialize, Deserialize)]
pub struct Content {
    /// Role (user or model)
    pub role: String,
    /// Content parts
    pub parts: Vec<Part>,
}

impl Content {
    /// A user turn with the given parts.
    pub fn user(parts: Vec<Part>) -> Self {
        Self {
            role: "user".to_string(),
            parts,
        }
    }
}

/// Gemini content part; text or inline binary data.
#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Part {
    /// Inline data (image bytes, base64-encoded)
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
    /// Text content
    Text { text: String },
}

impl Part {
    /// A text part.
    pub fn text(text: impl Into<String>) -> Self {
        Part::Text { text: text.into() }
    }

    /// An inline PNG image part from raw bytes.
    pub fn inline_png(data: &[u8]) -> Self {
        Part::InlineData {
            inline_data: InlineData {
                mime_type: "image/png".to_string(),
                data: BASE64.encode(data),
            },
        }
    }
}

/// Inline binary payload (base64-encoded).
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    /// MIME type
    pub mime_type: String,
    /// Base64-encoded data
    pub data: String,
}

/// Gemini `generateContent` response.
#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    /// Response candidates
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

/// Response candidate.
#[derive(Debug, Deserialize)]
pub struct Candidate {
    /// Candidate content
    pub content: Option<CandidateContent>,
}

/// Candidate content.
#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    /// Content parts
    #[serde(default)]
    pub parts: Vec<Part>,
}

// =============================================================================
// Imagen Request/Response Types
// =============================================================================

/// Imagen `predict` request.
#[derive(Debug, Serialize)]
pub struct ImagenRequest {
    /// Input instances (prompts)
    pub instances: Vec<ImagenInstance>,
    /// Generation parameters
    pub parameters: ImagenParameters,
}

/// Imagen instance (prompt).
#[derive(Debug, Serialize)]
pub struct ImagenInstance {
    /// Text prompt describing the image
    pub prompt: String,
}

/// Imagen generation parameters.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagenParameters {
    /// Number of images to generate
    pub sample_count: u8,
    /// Aspect ratio
    pub aspect_ratio: String,
}

/// Imagen `predict` response.
#[derive(Debug, Deserialize)]
pub struct ImagenResponse {
    /// Generated image predictions
    #[serde(default)]
    pub predictions: Vec<ImagenPrediction>,
}

/// Imagen prediction (generated image).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagenPrediction {
    /// Base64-encoded image data
    pub bytes_base64_encoded: Option<String>,
    /// MIME type of the image
    pub mime_type: Option<String>,
}

// =============================================================================
// Veo Request/Operation Types
// =============================================================================

/// Veo `predictLongRunning` request.
#[derive(Debug, Serialize)]
pub struct VeoRequest {
    /// Input instances (prompt, optional seed image)
    pub instances: Vec<VeoInstance>,
    /// Generation parameters
    pub parameters: VeoParameters,
}

/// Veo instance.
#[derive(Debug, Serialize)]
pub struct VeoInstance {
    /// Text prompt describing the video
    pub prompt: String,
    /// Seed image (first frame) for image-to-video
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<VeoImage>,
}

/// Veo seed image input.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VeoImage {
    /// Base64-encoded image data
    pub bytes_base64_encoded: String,
    /// MIME type of the image
    pub mime_type: String,
}

impl VeoImage {
    /// A PNG seed image from raw bytes.
    pub fn png(data: &[u8]) -> Self {
        Self {
            bytes_base64_encoded: BASE64.encode(data),
            mime_type: "image/png".to_string(),
        }
    }
}

/// Veo generation parameters.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VeoParameters {
    /// Aspect ratio
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<String>,
    /// Output resolution
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    /// Random seed for slight reproducibility
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,
}

/// Long-running video generation operation.
#[derive(Debug, Deserialize)]
pub struct VideoOperation {
    /// Operation name used for polling
    pub name: String,
    /// Whether the operation has reached a terminal state
    #[serde(default)]
    pub done: bool,
    /// Error attached when the operation failed
    pub error: Option<OperationError>,
    /// Result payload when the operation succeeded
    pub response: Option<VideoOperationResponse>,
}

/// Operation error details.
#[derive(Debug, Deserialize)]
pub struct OperationError {
    /// Error code
    pub code: Option<i32>,
    /// Error message
    pub message: Option<String>,
}

impl OperationError {
    /// Human-readable message for logs and result records.
    pub fn describe(&self) -> String {
        match (&self.message, self.code) {
            (Some(message), Some(code)) => format!("{} (code {})", message, code),
            (Some(message), None) => message.clone(),
            (None, Some(code)) => format!("operation failed with code {}", code),
            (None, None) => "operation failed".to_string(),
        }
    }
}

/// Operation result payload.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoOperationResponse {
    /// Video generation result
    pub generate_video_response: Option<GenerateVideoResponse>,
}

/// Video generation result.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateVideoResponse {
    /// Generated video samples
    #[serde(default)]
    pub generated_samples: Vec<GeneratedSample>,
}

/// One generated video sample.
#[derive(Debug, Deserialize)]
pub struct GeneratedSample {
    /// Reference to the generated video file
    pub video: Option<VideoRef>,
}

/// Reference to a downloadable video.
#[derive(Debug, Deserialize)]
pub struct VideoRef {
    /// Download URI for the video bytes
    pub uri: Option<String>,
}
