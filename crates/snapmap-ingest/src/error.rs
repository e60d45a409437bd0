//! Error types for `snapmap-ingest`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The text generator failed; nothing was saved.
  #[error("generation failed: {0}")]
  Generation(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("generator returned an empty response")]
  EmptyResponse,

  #[error("no opportunities could be parsed from the response")]
  NoCandidates,

  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  #[error("api returned {status}: {body}")]
  Api { status: u16, body: String },

  #[error("response carried no text content")]
  NoTextContent,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
