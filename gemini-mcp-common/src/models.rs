//! Model definitions and registry for Gemini, Imagen, and Veo models.
//!
//! Static model definitions plus a registry that resolves model names and
//! aliases to their full definitions.

use serde::Serialize;

/// Gemini multimodal image model definition.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct GeminiImageModel {
    /// Full model identifier
    pub id: &'static str,
    /// Model aliases for convenience
    #[serde(skip)]
    pub aliases: &'static [&'static str],
}

/// Imagen model definition.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ImagenModel {
    /// Full model identifier
    pub id: &'static str,
    /// Model aliases for convenience
    #[serde(skip)]
    pub aliases: &'static [&'static str],
    /// Supported aspect ratios
    pub supported_aspect_ratios: &'static [&'static str],
    /// Maximum number of images per request
    pub max_images: u8,
}

/// Veo model definition.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct VeoModel {
    /// Full model identifier
    pub id: &'static str,
    /// Model aliases for convenience
    #[serde(skip)]
    pub aliases: &'static [&'static str],
    /// Supported aspect ratios
    pub supported_aspect_ratios: &'static [&'static str],
    /// Supported output resolutions
    pub supported_resolutions: &'static [&'static str],
}

// =============================================================================
// Static Model Definitions
// =============================================================================

/// Gemini 2.5 Flash image preview model (default for image tools)
pub const GEMINI_2_5_FLASH_IMAGE_PREVIEW: GeminiImageModel = GeminiImageModel {
    id: "gemini-2.5-flash-image-preview",
    aliases: &["gemini-image", "gemini-2.5-image"],
};

/// Gemini 2.0 Flash preview model (experimental features)
pub const GEMINI_2_0_FLASH_PREVIEW: GeminiImageModel = GeminiImageModel {
    id: "gemini-2.0-flash-preview",
    aliases: &["gemini-2.0-image"],
};

/// All available Gemini image models
pub const GEMINI_IMAGE_MODELS: &[GeminiImageModel] =
    &[GEMINI_2_5_FLASH_IMAGE_PREVIEW, GEMINI_2_0_FLASH_PREVIEW];

/// Imagen 4.0 Generate model (default for imagen_t2i)
pub const IMAGEN_4_0_GENERATE_001: ImagenModel = ImagenModel {
    id: "imagen-4.0-generate-001",
    aliases: &["imagen-4", "imagen-4.0", "imagen4"],
    supported_aspect_ratios: &["1:1", "3:4", "4:3", "9:16", "16:9"],
    max_images: 4,
};

/// Imagen 3.0 Generate model (stable)
pub const IMAGEN_3_0_GENERATE_002: ImagenModel = ImagenModel {
    id: "imagen-3.0-generate-002",
    aliases: &["imagen-3", "imagen-3.0", "imagen3"],
    supported_aspect_ratios: &["1:1", "3:4", "4:3", "9:16", "16:9"],
    max_images: 4,
};

/// All available Imagen models
pub const IMAGEN_MODELS: &[ImagenModel] = &[IMAGEN_4_0_GENERATE_001, IMAGEN_3_0_GENERATE_002];

/// Veo 3.0 Generate model (default for video tools)
pub const VEO_3_0_GENERATE_001: VeoModel = VeoModel {
    id: "veo-3.0-generate-001",
    aliases: &["veo-3", "veo-3.0", "veo3"],
    supported_aspect_ratios: &["16:9", "9:16"],
    supported_resolutions: &["720p", "1080p"],
};

/// Veo 3.0 Fast Generate model
pub const VEO_3_0_FAST_GENERATE_001: VeoModel = VeoModel {
    id: "veo-3.0-fast-generate-001",
    aliases: &["veo-3-fast", "veo-3.0-fast"],
    supported_aspect_ratios: &["16:9", "9:16"],
    supported_resolutions: &["720p", "1080p"],
};

/// Veo 2.0 Generate model (stable)
pub const VEO_2_0_GENERATE_001: VeoModel = VeoModel {
    id: "veo-2.0-generate-001",
    aliases: &["veo-2", "veo-2.0", "veo2"],
    supported_aspect_ratios: &["16:9", "9:16"],
    supported_resolutions: &["720p"],
};

/// All available Veo models
pub const VEO_MODELS: &[VeoModel] = &[
    VEO_3_0_GENERATE_001,
    VEO_3_0_FAST_GENERATE_001,
    VEO_2_0_GENERATE_001,
];

// =============================================================================
// Model Registry
// =============================================================================

/// Registry for resolving model names and aliases.
pub struct ModelRegistry;

impl ModelRegistry {
    /// Resolve a Gemini image model by ID or alias.
    pub fn resolve_gemini_image(name: &str) -> Option<&'static GeminiImageModel> {
        GEMINI_IMAGE_MODELS
            .iter()
            .find(|m| m.id == name || m.aliases.contains(&name))
    }

    /// Resolve an Imagen model by ID or alias.
    pub fn resolve_imagen(name: &str) -> Option<&'static ImagenModel> {
        IMAGEN_MODELS
            .iter()
            .find(|m| m.id == name || m.aliases.contains(&name))
    }

    /// Resolve a Veo model by ID or alias.
    pub fn resolve_veo(name: &str) -> Option<&'static VeoModel> {
        VEO_MODELS
            .iter()
            .find(|m| m.id == name || m.aliases.contains(&name))
    }
}
