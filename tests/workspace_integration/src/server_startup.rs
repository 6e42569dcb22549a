//! Server construction tests.
//!
//! The server must construct from a plain configuration and advertise tool
//! capability; transport selection must honor overrides.

#[cfg(test)]
mod tests {
    use gemini_mcp_common::config::Config;
    use gemini_mcp_common::transport::{Transport, TransportArgs, TransportMode};
    use gemini_mcp_genmedia::GenmediaServer;
    use rmcp::ServerHandler;

    fn test_config() -> Config {
        Config {
            api_key: "test-key".to_string(),
            project_id: None,
            location: "us-central1".to_string(),
            output_dir: "./output".to_string(),
            transport: TransportMode::Stdio,
            port: 8080,
        }
    }

    #[test]
    fn test_server_constructs_and_reports_tools_capability() {
        let server = GenmediaServer::new(test_config());
        let info = server.get_info();
        assert!(info.capabilities.tools.is_some());
        assert!(info.instructions.is_some());
        let instructions = info.instructions.unwrap();
        for tool in [
            "gemini_image_generation",
            "gemini_image_edit",
            "gemini_multi_image",
            "imagen_t2i",
            "veo_text_to_video",
            "veo_image_to_video",
            "veo_generate_video",
        ] {
            assert!(instructions.contains(tool), "instructions should mention {}", tool);
        }
    }

    #[test]
    fn test_transport_resolution_prefers_cli_flags() {
        let config = Config {
            transport: TransportMode::Http,
            port: 9000,
            ..test_config()
        };

        let args = TransportArgs::default();
        assert_eq!(args.resolve(&config), Transport::Http { port: 9000 });

        let args = TransportArgs {
            transport: Some(TransportMode::Stdio),
            port: None,
        };
        assert_eq!(args.resolve(&config), Transport::Stdio);
    }

    #[test]
    fn test_server_is_cloneable_for_concurrent_dispatch() {
        let server = GenmediaServer::new(test_config());
        let _clone = server.clone();
    }
}
