//! The text-generation seam.

use std::future::Future;

/// Sampling knobs passed through to the generator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
  pub max_tokens:  u32,
  pub temperature: f32,
}

impl Default for GenerationParams {
  fn default() -> Self { Self { max_tokens: 2000, temperature: 0.7 } }
}

/// Anything that turns a prompt into a completion.
///
/// One request, one response: no retries and no streaming.
pub trait TextGenerator: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn generate<'a>(
    &'a self,
    prompt: &'a str,
    params: GenerationParams,
  ) -> impl Future<Output = Result<String, Self::Error>> + Send + 'a;
}
