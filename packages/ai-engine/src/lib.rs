//! MindMesh AI Engine - Inference Collaborator Boundary
//!
//! This crate defines the seam between MindMesh core services and whatever
//! language-model provider a deployment wires in. Core orchestrators depend
//! only on the [`InferenceClient`] trait; providers (hosted APIs, local
//! models, test doubles) implement it.
//!
//! # Features
//!
//! - **Provider-agnostic**: a single `infer(framing, payload, params)` call
//! - **Per-call-site sampling**: analysis and suggestion presets in config
//! - **Bounded calls**: [`bounded_infer`] enforces the configured timeout
//! - **Offline default**: [`EchoClient`] lets the full stack run without
//!   credentials or network access
//!
//! # Example
//!
//! ```
//! use mindmesh_ai_engine::{bounded_infer, EchoClient, InferenceConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = InferenceConfig::default();
//!     let client = EchoClient::default();
//!
//!     let text = bounded_infer(
//!         &client,
//!         config.timeout,
//!         "You are an expert in mind mapping and brainstorming.",
//!         "topic: Rust",
//!         &config.suggestion,
//!     )
//!     .await?;
//!
//!     assert!(!text.is_empty());
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;

// Re-export main types
pub use client::{bounded_infer, EchoClient, InferenceClient};
pub use config::{InferenceConfig, SamplingParams};
pub use error::{InferenceError, Result};
