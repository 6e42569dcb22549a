//! Output record format tests.
//!
//! Tool results are serialized output records; callers rely on stable field
//! names and on optional fields being omitted rather than null.

#[cfg(test)]
mod tests {
    use gemini_mcp_genmedia::image::{ImageGenerationOutput, ImagenGenerationOutput};
    use gemini_mcp_genmedia::video::VideoGenerationOutput;
    use serde_json::Value;
    use std::collections::BTreeMap;

    #[test]
    fn test_image_generation_output_fields() {
        let output = ImageGenerationOutput {
            description: "A fox".to_string(),
            model: "gemini-2.5-flash-image-preview".to_string(),
            style: "photorealistic".to_string(),
            aspect_ratio: None,
            quality: "high".to_string(),
            language: "en".to_string(),
            tags: Vec::new(),
            saved_files: vec!["./output/gemini_generated_photorealistic_20250101_120000_0.png".to_string()],
            metadata: BTreeMap::new(),
            generated_at: "20250101_120000".to_string(),
            images_created: 1,
        };

        let json: Value = serde_json::to_value(&output).unwrap();
        assert_eq!(json["images_created"], 1);
        assert_eq!(json["quality"], "high");
        assert_eq!(json["language"], "en");
        // Unset optionals and empty tag lists are omitted entirely.
        assert!(json.get("aspect_ratio").is_none());
        assert!(json.get("tags").is_none());
        assert!(json["saved_files"].is_array());
    }

    #[test]
    fn test_video_generation_output_fields() {
        let output = VideoGenerationOutput {
            operation_id: "models/veo-3.0-generate-001/operations/abc".to_string(),
            status: "timeout".to_string(),
            video_url: None,
            saved_files: Vec::new(),
            model: "veo-3.0-generate-001".to_string(),
            aspect_ratio: "16:9".to_string(),
            resolution: "720p".to_string(),
            metadata: BTreeMap::from([("generation_type".to_string(), "text-to-video".to_string())]),
            generated_at: "20250101_120000".to_string(),
            estimated_length: "8 seconds".to_string(),
        };

        let json: Value = serde_json::to_value(&output).unwrap();
        assert_eq!(json["status"], "timeout");
        assert_eq!(json["estimated_length"], "8 seconds");
        assert!(json.get("video_url").is_none());
        assert_eq!(json["metadata"]["generation_type"], "text-to-video");
    }

    #[test]
    fn test_imagen_output_fields() {
        let output = ImagenGenerationOutput {
            images_generated: 2,
            model: "imagen-4.0-generate-001".to_string(),
            aspect_ratio: "16:9".to_string(),
            saved_files: vec![
                "./output/imagen_20250101_120000_0.png".to_string(),
                "./output/imagen_20250101_120000_1.png".to_string(),
            ],
            generated_at: "20250101_120000".to_string(),
        };

        let json: Value = serde_json::to_value(&output).unwrap();
        assert_eq!(json["images_generated"], 2);
        assert_eq!(json["saved_files"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_status_values_are_the_documented_set() {
        use gemini_mcp_genmedia::poller::PollOutcome;

        let labels = [
            PollOutcome::Completed(()).status_label(),
            PollOutcome::<()>::Failed(String::new()).status_label(),
            PollOutcome::<()>::TimedOut.status_label(),
            PollOutcome::<()>::PollError(String::new()).status_label(),
        ];
        assert_eq!(labels, ["completed", "failed", "timeout", "poll_error"]);
    }
}
