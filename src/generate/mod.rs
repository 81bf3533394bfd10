//! Text generation.
//!
//! The pipeline talks to the model through the narrow [`Generator`] trait so
//! the retry loop and its tests run against stubs. The real implementation is
//! [`ollama::OllamaClient`].
//!
//! Decoding is pinned: determinism is a system property of the summarizer,
//! not a per-call convenience, so [`DecodingParams`] carries fixed values and
//! nothing on the CLI can change them.

pub mod ollama;

use crate::Result;
use crate::prompt::Prompt;

/// Fixed decoding parameters for every generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodingParams {
    /// Sampling temperature, near-greedy
    pub temperature: f64,
    /// Nucleus sampling cutoff
    pub top_p: f64,
    /// Top-k sampling cutoff
    pub top_k: u32,
    /// Mild anti-repetition penalty
    pub repeat_penalty: f64,
    /// Output token cap, sized for six complete sections
    pub max_tokens: u32,
}

impl Default for DecodingParams {
    fn default() -> Self {
        Self {
            temperature: 0.1,
            top_p: 0.8,
            top_k: 10,
            repeat_penalty: 1.1,
            max_tokens: 1200,
        }
    }
}

/// Generate-from-prompt capability over a local model.
pub trait Generator {
    /// Generate text for `prompt` under the given decoding parameters.
    ///
    /// Fails with [`crate::Error::GeneratorUnavailable`] on connection or
    /// timeout problems; structurally bad text is not an error at this layer.
    fn generate(&self, prompt: &Prompt, params: &DecodingParams) -> Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params_are_the_fixed_contract() {
        let params = DecodingParams::default();
        assert_eq!(params.temperature, 0.1);
        assert_eq!(params.top_p, 0.8);
        assert_eq!(params.top_k, 10);
        assert_eq!(params.repeat_penalty, 1.1);
        assert_eq!(params.max_tokens, 1200);
    }
}
