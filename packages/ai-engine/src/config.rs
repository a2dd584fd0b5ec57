//! Configuration for the inference collaborator

use crate::error::InferenceError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Upper bound on a single completion. Anything above this is almost
/// certainly a misconfigured call site, not a real analysis request.
const MAX_SUPPORTED_OUTPUT_TOKENS: u32 = 4096;

/// Sampling parameters for one inference call site.
///
/// Call sites differ deliberately: structure analysis wants conservative,
/// longer output; suggestion generation wants more exploratory, shorter
/// output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplingParams {
    /// Sampling temperature in [0.0, 2.0]
    pub temperature: f32,

    /// Maximum completion length in tokens
    pub max_tokens: u32,
}

impl SamplingParams {
    pub fn new(temperature: f32, max_tokens: u32) -> Self {
        Self {
            temperature,
            max_tokens,
        }
    }
}

/// Configuration for inference calls made by MindMesh orchestrators
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceConfig {
    /// Model name or identifier passed through to the provider
    pub model: String,

    /// Hard deadline for a single inference call
    #[serde(with = "duration_millis")]
    pub timeout: Duration,

    /// Sampling preset for full-map structure analysis
    pub analysis: SamplingParams,

    /// Sampling preset for per-node suggestion generation
    pub suggestion: SamplingParams,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4".to_string(),
            timeout: Duration::from_secs(15),
            analysis: SamplingParams::new(0.7, 500),
            suggestion: SamplingParams::new(0.8, 300),
        }
    }
}

impl InferenceConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), InferenceError> {
        if self.model.is_empty() {
            return Err(InferenceError::ConfigError(
                "model cannot be empty".to_string(),
            ));
        }

        if self.timeout.is_zero() {
            return Err(InferenceError::ConfigError(
                "timeout must be greater than 0".to_string(),
            ));
        }

        for (name, params) in [("analysis", &self.analysis), ("suggestion", &self.suggestion)] {
            if !(0.0..=2.0).contains(&params.temperature) {
                return Err(InferenceError::ConfigError(format!(
                    "{} temperature must be within [0.0, 2.0], got {}",
                    name, params.temperature
                )));
            }
            if params.max_tokens == 0 {
                return Err(InferenceError::ConfigError(format!(
                    "{} max_tokens must be greater than 0",
                    name
                )));
            }
            if params.max_tokens > MAX_SUPPORTED_OUTPUT_TOKENS {
                return Err(InferenceError::ConfigError(format!(
                    "{} max_tokens cannot exceed {}",
                    name, MAX_SUPPORTED_OUTPUT_TOKENS
                )));
            }
        }

        Ok(())
    }
}

/// Serialize `Duration` as integer milliseconds so configs stay editable as
/// plain JSON numbers.
mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
