//! prompt → generate → parse → insert.

use snapmap_core::RecordStore;
use tracing::{info, warn};

use crate::{
  Error, GenerationParams, Result, TextGenerator,
  parse::{PLACEHOLDER_NAME, parse_candidates},
  prompt::build_prompt,
};

/// Outcome of one [`ingest`] run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestReport {
  pub extracted: usize,
  /// Ids of the records this run inserted, in insertion order.
  pub saved_ids: Vec<i64>,
  /// Candidates the store refused; each was logged and skipped.
  pub failed:    usize,
}

impl IngestReport {
  pub fn saved(&self) -> usize { self.saved_ids.len() }
}

/// Ask `generator` for `count` opportunities in `place` and save what comes
/// back.
///
/// A generator failure or an empty completion aborts before anything is
/// saved. So does a completion with no extractable candidates. Once
/// insertion starts, each candidate stands alone: a rejected one is logged
/// and the rest are still saved.
pub async fn ingest<S, G>(
  store: &S,
  generator: &G,
  place: &str,
  count: u32,
  params: GenerationParams,
) -> Result<IngestReport>
where
  S: RecordStore,
  G: TextGenerator,
{
  info!(place, count, "searching for food opportunities");
  let prompt = build_prompt(place, count);

  let response = generator
    .generate(&prompt, params)
    .await
    .map_err(|e| Error::Generation(Box::new(e)))?;
  if response.trim().is_empty() {
    return Err(Error::EmptyResponse);
  }
  info!(bytes = response.len(), "received response");

  let candidates = parse_candidates(&response);
  if candidates.is_empty() {
    return Err(Error::NoCandidates);
  }
  info!(count = candidates.len(), "parsed food opportunities");

  let mut report = IngestReport { extracted: candidates.len(), ..IngestReport::default() };
  for candidate in candidates {
    let record = candidate.into_new_record(place);
    let name = record.name.clone();
    match store.add(record).await {
      Ok(id) => {
        info!(id, name = %name, "added");
        report.saved_ids.push(id);
      }
      Err(e) => {
        let shown = if name.is_empty() { PLACEHOLDER_NAME } else { name.as_str() };
        warn!(name = %shown, "error saving opportunity: {e}");
        report.failed += 1;
      }
    }
  }

  info!(saved = report.saved(), failed = report.failed, "saved food opportunities");
  Ok(report)
}
