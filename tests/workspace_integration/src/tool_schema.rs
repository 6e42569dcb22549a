//! Tool schema validity tests.
//!
//! Every advertised tool schema must be a well-formed object schema whose
//! required list names exactly the parameters a caller cannot omit.

use serde_json::Value;

/// Check the basic shape of a tool input schema.
pub fn validate_object_schema(schema: &Value) -> Result<(), String> {
    let obj = schema
        .as_object()
        .ok_or_else(|| "Schema must be an object".to_string())?;

    if let Some(type_val) = obj.get("type") {
        if type_val != "object" {
            return Err(format!("Expected type 'object', got {:?}", type_val));
        }
    }

    let properties = obj
        .get("properties")
        .ok_or_else(|| "Schema must have properties".to_string())?;
    if !properties.is_object() {
        return Err("Properties must be an object".to_string());
    }

    Ok(())
}

/// Names listed as required in a schema.
pub fn required_fields(schema: &Value) -> Vec<String> {
    schema["required"]
        .as_array()
        .map(|values| {
            values
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use gemini_mcp_genmedia::image::{
        ImageEditParams, ImageGenerateParams, ImagenGenerateParams, MultiImageParams,
    };
    use gemini_mcp_genmedia::video::{VideoGenerateParams, VideoI2vParams, VideoT2vParams};
    use schemars::schema_for;

    fn schema_value<T: schemars::JsonSchema>() -> Value {
        serde_json::to_value(schema_for!(T)).expect("schema serializes")
    }

    #[test]
    fn test_all_tool_schemas_are_object_schemas() {
        let schemas = [
            ("gemini_image_generation", schema_value::<ImageGenerateParams>()),
            ("gemini_image_edit", schema_value::<ImageEditParams>()),
            ("gemini_multi_image", schema_value::<MultiImageParams>()),
            ("imagen_t2i", schema_value::<ImagenGenerateParams>()),
            ("veo_text_to_video", schema_value::<VideoT2vParams>()),
            ("veo_image_to_video", schema_value::<VideoI2vParams>()),
            ("veo_generate_video", schema_value::<VideoGenerateParams>()),
        ];

        for (name, schema) in &schemas {
            validate_object_schema(schema)
                .unwrap_or_else(|e| panic!("schema for {} invalid: {}", name, e));
        }
    }

    #[test]
    fn test_required_fields_per_tool() {
        assert_eq!(required_fields(&schema_value::<ImageGenerateParams>()), vec!["prompt"]);
        assert_eq!(
            required_fields(&schema_value::<ImageEditParams>()),
            vec!["edit_prompt", "input_image_path"]
        );
        assert_eq!(
            required_fields(&schema_value::<MultiImageParams>()),
            vec!["combine_prompt", "input_image_paths"]
        );
        assert_eq!(required_fields(&schema_value::<ImagenGenerateParams>()), vec!["prompt"]);
        assert_eq!(required_fields(&schema_value::<VideoT2vParams>()), vec!["prompt"]);
        assert_eq!(
            required_fields(&schema_value::<VideoI2vParams>()),
            vec!["image_path", "prompt"]
        );
        // The legacy tool takes image_path as an optional switch.
        assert_eq!(required_fields(&schema_value::<VideoGenerateParams>()), vec!["prompt"]);
    }

    #[test]
    fn test_optional_fields_are_not_required() {
        let schema = schema_value::<ImageGenerateParams>();
        let required = required_fields(&schema);
        for optional in [
            "model",
            "style",
            "quality",
            "language",
            "safety_level",
            "aspect_ratio",
            "include_text",
            "tags",
            "output_directory",
        ] {
            assert!(
                !required.contains(&optional.to_string()),
                "{} must be optional",
                optional
            );
            assert!(
                schema["properties"].get(optional).is_some(),
                "{} must still appear in properties",
                optional
            );
        }
    }

    #[test]
    fn test_every_tool_accepts_output_directory() {
        for schema in [
            schema_value::<ImageGenerateParams>(),
            schema_value::<ImageEditParams>(),
            schema_value::<MultiImageParams>(),
            schema_value::<ImagenGenerateParams>(),
            schema_value::<VideoT2vParams>(),
            schema_value::<VideoI2vParams>(),
            schema_value::<VideoGenerateParams>(),
        ] {
            assert!(schema["properties"].get("output_directory").is_some());
        }
    }
}
