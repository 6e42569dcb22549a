//! MCP server implementation.
//!
//! Advertises the seven generative-media tools and dispatches calls to the
//! image and video handlers. Per-call failures are returned to the caller as
//! structured MCP errors and never take the service down: validation
//! failures map to invalid-params, everything else to internal errors.

use crate::image::{
    ImageEditParams, ImageGenerateParams, ImageHandler, ImagenGenerateParams, MultiImageParams,
};
use crate::video::{VideoGenerateParams, VideoHandler, VideoI2vParams, VideoT2vParams};
use gemini_mcp_common::config::Config;
use gemini_mcp_common::error::Error;
use rmcp::{
    ErrorData as McpError, ServerHandler,
    model::{CallToolResult, Content, ServerCapabilities, ServerInfo},
};
use serde::Serialize;
use serde_json::Value;
use std::borrow::Cow;
use std::sync::Arc;

/// MCP server for Gemini generative media tools.
#[derive(Clone)]
pub struct GenmediaServer {
    image: ImageHandler,
    video: VideoHandler,
}

impl GenmediaServer {
    /// Create a new server with handlers built from the configuration.
    pub fn new(config: Config) -> Self {
        Self {
            image: ImageHandler::new(config.clone()),
            video: VideoHandler::new(config),
        }
    }

    /// Create a server with explicit handlers (tests, alternative endpoints).
    pub fn with_handlers(image: ImageHandler, video: VideoHandler) -> Self {
        Self { image, video }
    }
}

/// Serialize a handler output record into a successful tool result.
fn success<T: Serialize>(output: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(output)
        .map_err(|e| McpError::internal_error(format!("Failed to serialize result: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

/// Map a handler error onto the MCP error surface.
fn map_error(error: Error) -> McpError {
    match error {
        Error::Validation(message) => McpError::invalid_params(message, None),
        other => McpError::internal_error(other.to_string(), None),
    }
}

/// Deserialize tool arguments, rejecting missing or malformed parameters.
fn parse_params<T: serde::de::DeserializeOwned>(
    arguments: Option<serde_json::Map<String, Value>>,
) -> Result<T, McpError> {
    arguments
        .map(|args| serde_json::from_value(Value::Object(args)))
        .transpose()
        .map_err(|e| McpError::invalid_params(format!("Invalid parameters: {}", e), None))?
        .ok_or_else(|| McpError::invalid_params("Missing parameters", None))
}

/// Build one tool listing entry from a schemars-derived input schema.
fn tool_entry(
    name: &'static str,
    description: &'static str,
    schema: schemars::schema::RootSchema,
) -> rmcp::model::Tool {
    let schema_value = serde_json::to_value(&schema).unwrap_or_default();
    let input_schema = match schema_value {
        Value::Object(map) => Arc::new(map),
        _ => Arc::new(serde_json::Map::new()),
    };
    rmcp::model::Tool {
        name: Cow::Borrowed(name),
        description: Some(Cow::Borrowed(description)),
        input_schema,
        annotations: None,
        icons: None,
        meta: None,
        output_schema: None,
        title: None,
    }
}

impl ServerHandler for GenmediaServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Generative media server backed by Google's Gemini API. \
                 Use gemini_image_generation, gemini_image_edit, gemini_multi_image, and \
                 imagen_t2i for images; veo_text_to_video, veo_image_to_video, and \
                 veo_generate_video for 8-second videos. Generated media and JSON metadata \
                 sidecars are written to the configured output directory."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    fn list_tools(
        &self,
        _params: Option<rmcp::model::PaginatedRequestParam>,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<rmcp::model::ListToolsResult, McpError>> + Send + '_
    {
        async move {
            use schemars::schema_for;

            Ok(rmcp::model::ListToolsResult {
                tools: vec![
                    tool_entry(
                        "gemini_image_generation",
                        "Generate images from a text prompt using Gemini image models. \
                         Supports style, quality, aspect-ratio, and multi-language prompt \
                         controls. Saves PNG files and a JSON metadata sidecar locally.",
                        schema_for!(ImageGenerateParams),
                    ),
                    tool_entry(
                        "gemini_image_edit",
                        "Edit an existing local image with Gemini. Supports targeted \
                         modifications, element addition/removal, and style changes, with \
                         optional focus area and style preservation.",
                        schema_for!(ImageEditParams),
                    ),
                    tool_entry(
                        "gemini_multi_image",
                        "Combine and blend 2-3 local images into one composition using \
                         Gemini. Supports merge, collage, overlay, and sequence blend modes.",
                        schema_for!(MultiImageParams),
                    ),
                    tool_entry(
                        "imagen_t2i",
                        "Generate 1-4 high-quality images from a text prompt using Google's \
                         Imagen diffusion models. Supports multiple aspect ratios.",
                        schema_for!(ImagenGenerateParams),
                    ),
                    tool_entry(
                        "veo_text_to_video",
                        "Generate an 8-second video from a text prompt using Google's Veo \
                         models. Supports 16:9/9:16 aspect ratios, 720p/1080p resolution, \
                         and negative prompts. Polls the generation to completion and saves \
                         the MP4 locally.",
                        schema_for!(VideoT2vParams),
                    ),
                    tool_entry(
                        "veo_image_to_video",
                        "Animate a local image into an 8-second video using Google's Veo \
                         models; the image becomes the starting frame.",
                        schema_for!(VideoI2vParams),
                    ),
                    tool_entry(
                        "veo_generate_video",
                        "Generate an 8-second video from a text prompt, optionally seeded \
                         with a starting-frame image. Combined legacy form of the dedicated \
                         text-to-video and image-to-video tools.",
                        schema_for!(VideoGenerateParams),
                    ),
                ],
                next_cursor: None,
                meta: None,
            })
        }
    }

    fn call_tool(
        &self,
        params: rmcp::model::CallToolRequestParam,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<CallToolResult, McpError>> + Send + '_ {
        async move {
            match params.name.as_ref() {
                "gemini_image_generation" => {
                    let tool_params: ImageGenerateParams = parse_params(params.arguments)?;
                    let output = self.image.generate(tool_params).await.map_err(map_error)?;
                    success(&output)
                }
                "gemini_image_edit" => {
                    let tool_params: ImageEditParams = parse_params(params.arguments)?;
                    let output = self.image.edit(tool_params).await.map_err(map_error)?;
                    success(&output)
                }
                "gemini_multi_image" => {
                    let tool_params: MultiImageParams = parse_params(params.arguments)?;
                    let output = self.image.combine(tool_params).await.map_err(map_error)?;
                    success(&output)
                }
                "imagen_t2i" => {
                    let tool_params: ImagenGenerateParams = parse_params(params.arguments)?;
                    let output = self.image.generate_imagen(tool_params).await.map_err(map_error)?;
                    success(&output)
                }
                "veo_text_to_video" => {
                    let tool_params: VideoT2vParams = parse_params(params.arguments)?;
                    let output = self.video.generate_t2v(tool_params).await.map_err(map_error)?;
                    success(&output)
                }
                "veo_image_to_video" => {
                    let tool_params: VideoI2vParams = parse_params(params.arguments)?;
                    let output = self.video.generate_i2v(tool_params).await.map_err(map_error)?;
                    success(&output)
                }
                "veo_generate_video" => {
                    let tool_params: VideoGenerateParams = parse_params(params.arguments)?;
                    let output = self.video.generate_legacy(tool_params).await.map_err(map_error)?;
                    success(&output)
                }
                _ => Err(McpError::invalid_params(
                    format!("Unknown tool: {}", params.name),
                    None,
                )),
            }
        }
    }
}
