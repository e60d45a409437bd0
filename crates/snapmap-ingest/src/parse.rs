//! Candidate extraction from a free-form completion.
//!
//! Tiers, first success wins:
//!   1. the widest `{ … "opportunities" … }` span, parsed as JSON
//!   2. the whole response, parsed as JSON
//!   3. if either parse fails: a line scanner picking quoted
//!      `"name"`/`"link"`/`"location"`/`"description"` values

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use snapmap_core::NewRecord;
use tracing::{debug, warn};

pub const PLACEHOLDER_NAME: &str = "Unknown Food Opportunity";
pub const PLACEHOLDER_DESCRIPTION: &str = "No description available";

// ─── Candidate ───────────────────────────────────────────────────────────────

/// A record pulled out of a completion, not yet persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Candidate {
  pub name:        Option<String>,
  pub link:        Option<String>,
  pub location:    Option<String>,
  pub description: Option<String>,
}

impl Candidate {
  /// Fill the gaps with defaults; an absent location becomes `place`.
  pub fn into_new_record(self, place: &str) -> NewRecord {
    NewRecord {
      name:        self.name.unwrap_or_else(|| PLACEHOLDER_NAME.to_owned()),
      link:        self.link.unwrap_or_default(),
      location:    self.location.unwrap_or_else(|| place.to_owned()),
      description: self
        .description
        .unwrap_or_else(|| PLACEHOLDER_DESCRIPTION.to_owned()),
    }
  }

  fn from_json(value: &Value) -> Option<Self> {
    let obj = value.as_object()?;
    let text = |key: &str| match obj.get(key)? {
      Value::Null => None,
      Value::String(s) => Some(s.clone()),
      other => Some(other.to_string()),
    };
    Some(Self {
      name:        text("name"),
      link:        text("link"),
      location:    text("location"),
      description: text("description"),
    })
  }
}

// ─── Entry point ─────────────────────────────────────────────────────────────

static JSON_SPAN: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r#"(?s)\{.*"opportunities".*\}"#).expect("valid regex"));

/// Extract every candidate the response yields. Never fails; a response with
/// nothing recognisable gives an empty list.
pub fn parse_candidates(response: &str) -> Vec<Candidate> {
  if response.trim().is_empty() {
    return Vec::new();
  }

  let structured = match JSON_SPAN.find(response) {
    Some(m) => serde_json::from_str::<Value>(m.as_str()),
    None => serde_json::from_str::<Value>(response),
  };

  match structured {
    Ok(doc) => from_document(&doc),
    Err(e) => {
      warn!("error parsing JSON response: {e}; attempting manual extraction");
      scan_lines(response)
    }
  }
}

fn from_document(doc: &Value) -> Vec<Candidate> {
  let Some(items) = doc.get("opportunities").and_then(Value::as_array) else {
    debug!("parsed JSON has no opportunities array");
    return Vec::new();
  };
  items.iter().filter_map(Candidate::from_json).collect()
}

// ─── Line-scan fallback ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
enum Field {
  Name,
  Link,
  Location,
  Description,
}

impl Field {
  const ALL: [Field; 4] = [Field::Name, Field::Link, Field::Location, Field::Description];

  fn key(self) -> &'static str {
    match self {
      Field::Name => "\"name\"",
      Field::Link => "\"link\"",
      Field::Location => "\"location\"",
      Field::Description => "\"description\"",
    }
  }

  fn pattern(self) -> &'static Regex {
    static NAME: LazyLock<Regex> =
      LazyLock::new(|| Regex::new(r#""name":\s*"([^"]+)""#).expect("valid regex"));
    // A link may legitimately be empty.
    static LINK: LazyLock<Regex> =
      LazyLock::new(|| Regex::new(r#""link":\s*"([^"]*)""#).expect("valid regex"));
    static LOCATION: LazyLock<Regex> =
      LazyLock::new(|| Regex::new(r#""location":\s*"([^"]+)""#).expect("valid regex"));
    static DESCRIPTION: LazyLock<Regex> =
      LazyLock::new(|| Regex::new(r#""description":\s*"([^"]+)""#).expect("valid regex"));

    match self {
      Field::Name => &NAME,
      Field::Link => &LINK,
      Field::Location => &LOCATION,
      Field::Description => &DESCRIPTION,
    }
  }
}

/// Fields seen so far for the candidate being assembled.
#[derive(Default)]
struct Accumulator(Candidate);

impl Accumulator {
  fn slot(&mut self, field: Field) -> &mut Option<String> {
    match field {
      Field::Name => &mut self.0.name,
      Field::Link => &mut self.0.link,
      Field::Location => &mut self.0.location,
      Field::Description => &mut self.0.description,
    }
  }

  fn is_complete(&self) -> bool {
    self.0.name.is_some() && self.0.location.is_some() && self.0.description.is_some()
  }

  fn is_empty(&self) -> bool { self.0 == Candidate::default() }
}

/// Order-independent scanner state.
///
/// A field arriving when the accumulator already holds it starts the next
/// candidate. On that boundary, and at end of input, the accumulator is
/// emitted if it has name, location and description; otherwise dropped.
#[derive(Default)]
struct LineScanner {
  current: Accumulator,
  out:     Vec<Candidate>,
}

impl LineScanner {
  fn feed(&mut self, field: Field, value: String) {
    if self.current.slot(field).is_some() {
      self.flush();
    }
    *self.current.slot(field) = Some(value);
  }

  fn flush(&mut self) {
    let acc = std::mem::take(&mut self.current);
    if acc.is_complete() {
      let mut candidate = acc.0;
      candidate.link.get_or_insert_with(String::new);
      self.out.push(candidate);
    } else if !acc.is_empty() {
      debug!(partial = ?acc.0, "dropping incomplete candidate");
    }
  }

  fn finish(mut self) -> Vec<Candidate> {
    self.flush();
    self.out
  }
}

fn scan_lines(response: &str) -> Vec<Candidate> {
  let mut scanner = LineScanner::default();
  for line in response.lines() {
    for field in Field::ALL {
      if !line.contains(field.key()) {
        continue;
      }
      if let Some(caps) = field.pattern().captures(line) {
        scanner.feed(field, caps[1].to_owned());
      }
    }
  }
  scanner.finish()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn candidate(name: &str, link: &str, location: &str, description: &str) -> Candidate {
    Candidate {
      name:        Some(name.into()),
      link:        Some(link.into()),
      location:    Some(location.into()),
      description: Some(description.into()),
    }
  }

  #[test]
  fn plain_json_document() {
    let response = r#"{"opportunities":[{"name":"Soup Kitchen","link":"","location":"Main St","description":"Hot meals daily"}]}"#;
    assert_eq!(
      parse_candidates(response),
      vec![candidate("Soup Kitchen", "", "Main St", "Hot meals daily")]
    );
  }

  #[test]
  fn json_wrapped_in_prose() {
    let response = "Here are some places I found:\n\n\
      {\n  \"opportunities\": [\n    {\"name\": \"A\", \"link\": \"https://a\", \"location\": \"X\", \"description\": \"D\"},\n    {\"name\": \"B\", \"location\": \"Y\"}\n  ]\n}\n\nLet me know if you need more.";
    let got = parse_candidates(response);
    assert_eq!(got.len(), 2);
    assert_eq!(got[0], candidate("A", "https://a", "X", "D"));
    assert_eq!(got[1].name.as_deref(), Some("B"));
    assert_eq!(got[1].link, None);
    assert_eq!(got[1].description, None);
  }

  #[test]
  fn json_without_opportunities_key_is_empty() {
    assert!(parse_candidates(r#"{"places": []}"#).is_empty());
  }

  #[test]
  fn non_object_entries_are_skipped() {
    let got = parse_candidates(r#"{"opportunities": ["oops", {"name": "Ok"}, null]}"#);
    assert_eq!(got.len(), 1);
    assert_eq!(got[0].name.as_deref(), Some("Ok"));
  }

  #[test]
  fn fallback_scans_quoted_lines() {
    let response = "I couldn't format this properly, sorry.\n\
      \"name\": \"X\",\n\
      \"location\": \"Y\",\n\
      \"description\": \"Z\"\n";
    assert_eq!(parse_candidates(response), vec![candidate("X", "", "Y", "Z")]);
  }

  #[test]
  fn fallback_after_broken_json() {
    // Trailing comma and a missing bracket: not valid JSON.
    let response = r#"{
  "opportunities": [
    {
      "name": "Food Bank",
      "link": "https://fb.example",
      "location": "1 Oak Ave",
      "description": "Groceries on Tuesdays",
    },
    {
      "name": "Church Pantry",
      "location": "2 Elm St",
      "description": "Canned goods"
    }
}"#;
    assert_eq!(
      parse_candidates(response),
      vec![
        candidate("Food Bank", "https://fb.example", "1 Oak Ave", "Groceries on Tuesdays"),
        candidate("Church Pantry", "", "2 Elm St", "Canned goods"),
      ]
    );
  }

  #[test]
  fn fallback_keeps_trailing_link_with_its_own_candidate() {
    let response = "not json\n\
      \"description\": \"D1\"\n\"location\": \"L1\"\n\"name\": \"N1\"\n\"link\": \"https://one\"\n\
      \"name\": \"N2\"\n\"location\": \"L2\"\n\"description\": \"D2\"\n";
    assert_eq!(
      parse_candidates(response),
      vec![candidate("N1", "https://one", "L1", "D1"), candidate("N2", "", "L2", "D2")]
    );
  }

  #[test]
  fn fallback_drops_incomplete_candidates() {
    let response = "oops\n\"name\": \"Only a name\"\n\"name\": \"Full\"\n\"location\": \"L\"\n\"description\": \"D\"\n";
    assert_eq!(parse_candidates(response), vec![candidate("Full", "", "L", "D")]);
  }

  #[test]
  fn nothing_recognisable_yields_nothing() {
    assert!(parse_candidates("").is_empty());
    assert!(parse_candidates("   \n").is_empty());
    assert!(parse_candidates("I don't know any places there.").is_empty());
  }

  #[test]
  fn defaults_fill_missing_fields() {
    let record = Candidate::default().into_new_record("Pittsburgh");
    assert_eq!(record.name, PLACEHOLDER_NAME);
    assert_eq!(record.link, "");
    assert_eq!(record.location, "Pittsburgh");
    assert_eq!(record.description, PLACEHOLDER_DESCRIPTION);
  }
}
