//! Gemini GenMedia MCP Server
//!
//! MCP server exposing Google's generative-media APIs as tools: Gemini
//! image generation and editing, Imagen text-to-image, and Veo video
//! generation with long-running operation polling.

pub mod client;
pub mod image;
pub mod poller;
pub mod server;
pub mod video;

pub use server::GenmediaServer;
