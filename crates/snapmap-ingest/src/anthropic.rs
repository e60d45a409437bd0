//! [`TextGenerator`] backed by the Anthropic Messages API.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{Error, GenerationParams, Result, TextGenerator};

const API_VERSION: &str = "2023-06-01";

/// Value shipped in sample configs in place of a real key.
const PLACEHOLDER_KEY: &str = "YOUR_API_KEY_HERE";

fn key_is_missing(key: &str) -> bool {
  let key = key.trim();
  key.is_empty() || key == PLACEHOLDER_KEY
}

/// Connection settings for the Messages API.
#[derive(Debug, Clone)]
pub struct AnthropicConfig {
  pub base_url: String,
  pub api_key:  String,
  pub model:    String,
}

/// Async HTTP client for `POST /v1/messages`.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based. No request
/// timeout is set.
#[derive(Clone)]
pub struct AnthropicClient {
  client: Client,
  config: AnthropicConfig,
}

impl AnthropicClient {
  pub fn new(config: AnthropicConfig) -> Result<Self> {
    if key_is_missing(&config.api_key) {
      warn!("no Anthropic API key configured; set ANTHROPIC_API_KEY");
    }
    let client = Client::builder().build()?;
    Ok(Self { client, config })
  }

  fn url(&self) -> String {
    format!("{}/v1/messages", self.config.base_url.trim_end_matches('/'))
  }
}

// ─── Wire types ──────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
  model:       &'a str,
  max_tokens:  u32,
  temperature: f32,
  messages:    [Message<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Message<'a> {
  role:    &'static str,
  content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
  #[serde(default)]
  content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
  #[serde(rename = "type")]
  kind: String,
  #[serde(default)]
  text: Option<String>,
}

impl MessagesResponse {
  /// Text of the first text block.
  fn first_text(self) -> Option<String> {
    self
      .content
      .into_iter()
      .find(|b| b.kind == "text")
      .and_then(|b| b.text)
  }
}

// ─── TextGenerator impl ──────────────────────────────────────────────────────

impl TextGenerator for AnthropicClient {
  type Error = Error;

  async fn generate(&self, prompt: &str, params: GenerationParams) -> Result<String> {
    let body = MessagesRequest {
      model:       &self.config.model,
      max_tokens:  params.max_tokens,
      temperature: params.temperature,
      messages:    [Message { role: "user", content: prompt }],
    };

    debug!(model = %self.config.model, "POST /v1/messages");
    let resp = self
      .client
      .post(self.url())
      .header("x-api-key", &self.config.api_key)
      .header("anthropic-version", API_VERSION)
      .json(&body)
      .send()
      .await?;

    let status = resp.status();
    if !status.is_success() {
      let body = resp.text().await.unwrap_or_default();
      return Err(Error::Api { status: status.as_u16(), body });
    }

    let parsed: MessagesResponse = resp.json().await?;
    parsed.first_text().ok_or(Error::NoTextContent)
  }
}
