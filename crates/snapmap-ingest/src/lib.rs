//! Opportunity ingestion: ask a text generator for places in a city, pull
//! candidate records out of whatever it answers, and store them.
//!
//! Pipeline:
//!   place + count
//!     └─ build_prompt()          → prompt text
//!          └─ TextGenerator      → raw completion
//!               └─ parse_candidates() → Vec<Candidate>
//!                    └─ RecordStore::add, one candidate at a time

pub mod anthropic;
pub mod error;
mod generator;
mod parse;
mod pipeline;
mod prompt;

pub use anthropic::{AnthropicClient, AnthropicConfig};
pub use error::{Error, Result};
pub use generator::{GenerationParams, TextGenerator};
pub use parse::{Candidate, parse_candidates};
pub use pipeline::{IngestReport, ingest};
pub use prompt::{DEFAULT_COUNT, MAX_COUNT, MIN_COUNT, build_prompt, clamp_count, parse_count};
