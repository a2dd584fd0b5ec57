//! Inference client trait and timeout discipline
//!
//! MindMesh treats language-model inference as a black box: one call that
//! takes a system framing plus a payload and returns text or an error.
//! Providers implement [`InferenceClient`]; orchestrators in core are
//! generic over it, which is also what makes them testable with scripted
//! doubles.

use crate::config::SamplingParams;
use crate::error::{InferenceError, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// Black-box inference call: `infer(framing, payload) -> text | error`.
///
/// Implementations must be `Send + Sync`; clients are shared across
/// concurrent request handlers behind an `Arc`.
#[async_trait]
pub trait InferenceClient: Send + Sync {
    /// Run one completion.
    ///
    /// # Arguments
    ///
    /// * `framing` - System-level instruction framing for the call site
    /// * `payload` - Serialized request context (node summaries, etc.)
    /// * `params` - Per-call-site sampling parameters
    async fn infer(&self, framing: &str, payload: &str, params: &SamplingParams)
        -> Result<String>;
}

/// Run an inference call under a hard deadline.
///
/// An elapsed deadline maps to [`InferenceError::Timeout`]; provider errors
/// pass through unchanged. Callers decide how to degrade - the suggestion
/// path returns an empty list, the analysis path an explicit error payload.
pub async fn bounded_infer<C: InferenceClient + ?Sized>(
    client: &C,
    timeout: Duration,
    framing: &str,
    payload: &str,
    params: &SamplingParams,
) -> Result<String> {
    debug!(
        timeout_ms = timeout.as_millis() as u64,
        temperature = params.temperature,
        max_tokens = params.max_tokens,
        "dispatching inference call"
    );

    match tokio::time::timeout(timeout, client.infer(framing, payload, params)).await {
        Ok(result) => result,
        Err(_) => Err(InferenceError::Timeout(timeout.as_millis() as u64)),
    }
}

/// Deterministic placeholder provider.
///
/// Echoes a short canned completion derived from the payload so the whole
/// stack (API, hub, orchestrators) runs end-to-end without credentials or
/// network access. Deployments substitute a real provider.
#[derive(Debug, Default, Clone)]
pub struct EchoClient;

#[async_trait]
impl InferenceClient for EchoClient {
    async fn infer(
        &self,
        _framing: &str,
        payload: &str,
        params: &SamplingParams,
    ) -> Result<String> {
        let preview: String = payload.chars().take(80).collect();
        Ok(format!(
            "- Placeholder completion (temperature {:.1}) for: {}",
            params.temperature, preview
        ))
    }
}
