//! Cross-tool input validation tests.
//!
//! Every tool rejects a request missing its required fields with field-level
//! validation errors, before any remote call would be made.

#[cfg(test)]
mod tests {
    use gemini_mcp_genmedia::image::{
        ImageEditParams, ImageGenerateParams, ImagenGenerateParams, MultiImageParams,
    };
    use gemini_mcp_genmedia::video::{VideoGenerateParams, VideoI2vParams, VideoT2vParams};

    #[test]
    fn test_blank_prompt_rejected_everywhere() {
        let params: ImageGenerateParams = serde_json::from_str(r#"{"prompt": " "}"#).unwrap();
        assert!(params.validate().is_err());

        let params: ImagenGenerateParams = serde_json::from_str(r#"{"prompt": " "}"#).unwrap();
        assert!(params.validate().is_err());

        let params: VideoT2vParams = serde_json::from_str(r#"{"prompt": " "}"#).unwrap();
        assert!(params.validate().is_err());

        let params: VideoI2vParams =
            serde_json::from_str(r#"{"image_path": "/tmp/a.png", "prompt": " "}"#).unwrap();
        assert!(params.validate().is_err());

        let params: VideoGenerateParams = serde_json::from_str(r#"{"prompt": " "}"#).unwrap();
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_edit_requires_both_path_and_prompt() {
        let params: ImageEditParams =
            serde_json::from_str(r#"{"input_image_path": "", "edit_prompt": "add a hat"}"#).unwrap();
        let errors = params.validate().unwrap_err();
        assert!(errors.iter().any(|e| e.field == "input_image_path"));

        let params: ImageEditParams =
            serde_json::from_str(r#"{"input_image_path": "/tmp/a.png", "edit_prompt": ""}"#).unwrap();
        let errors = params.validate().unwrap_err();
        assert!(errors.iter().any(|e| e.field == "edit_prompt"));
    }

    #[test]
    fn test_combine_count_window() {
        for (count, ok) in [(0usize, false), (1, false), (2, true), (3, true), (4, false), (6, false)] {
            let paths: Vec<String> = (0..count).map(|i| format!("/tmp/{}.png", i)).collect();
            let params = MultiImageParams {
                input_image_paths: paths,
                combine_prompt: "blend the subjects".to_string(),
                model: "gemini-2.5-flash-image-preview".to_string(),
                blend_mode: "merge".to_string(),
                output_style: None,
                output_directory: None,
            };
            assert_eq!(params.validate().is_ok(), ok, "count={}", count);
        }
    }

    #[test]
    fn test_validation_collects_all_failing_fields() {
        let params: VideoT2vParams = serde_json::from_str(
            r#"{"prompt": " ", "model": "sora", "aspect_ratio": "4:3"}"#,
        )
        .unwrap();
        let errors = params.validate().unwrap_err();
        assert!(errors.len() >= 2, "expected several errors, got {:?}", errors);
        assert!(errors.iter().any(|e| e.field == "prompt"));
        assert!(errors.iter().any(|e| e.field == "model"));
    }

    #[test]
    fn test_documented_defaults() {
        let params: ImageGenerateParams =
            serde_json::from_str(r#"{"prompt": "a red fox in snow"}"#).unwrap();
        assert_eq!(params.model, "gemini-2.5-flash-image-preview");
        assert_eq!(params.style, "photorealistic");
        assert_eq!(params.quality, "high");
        assert_eq!(params.language, "en");
        assert!(params.aspect_ratio.is_none(), "image aspect ratio is pass-through");

        let params: ImagenGenerateParams = serde_json::from_str(r#"{"prompt": "a sunset"}"#).unwrap();
        assert_eq!(params.model, "imagen-4.0-generate-001");
        assert_eq!(params.num_images, 1);
        assert_eq!(params.aspect_ratio, "1:1");

        let params: VideoT2vParams = serde_json::from_str(r#"{"prompt": "a cat"}"#).unwrap();
        assert_eq!(params.model, "veo-3.0-generate-001");
        assert_eq!(params.aspect_ratio, "16:9");
        assert_eq!(params.resolution, "720p");

        let params: ImageEditParams = serde_json::from_str(
            r#"{"input_image_path": "/tmp/a.png", "edit_prompt": "add a hat"}"#,
        )
        .unwrap();
        assert_eq!(params.edit_type, "modify");
        assert!(params.preserve_style);

        let params: MultiImageParams = serde_json::from_str(
            r#"{"input_image_paths": ["/a.png", "/b.png"], "combine_prompt": "blend"}"#,
        )
        .unwrap();
        assert_eq!(params.blend_mode, "merge");
    }
}
