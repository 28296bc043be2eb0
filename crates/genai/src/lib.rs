//! Client for the upstream generative-image HTTP API.
//!
//! Translates compiled prompts into `generateContent` requests, enforces a
//! wall-clock timeout, and validates/extracts images from the candidate
//! list, dropping safety-rejected or payload-less candidates.

pub mod client;
pub mod wire;

pub use client::{GenAiClient, GenAiConfig, GeneratedImage};
