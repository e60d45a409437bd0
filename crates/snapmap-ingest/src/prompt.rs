//! Prompt template and request-size clamping.

use tracing::warn;

pub const DEFAULT_COUNT: u32 = 10;
pub const MIN_COUNT: u32 = 1;
pub const MAX_COUNT: u32 = 50;

/// Resolve the requested number of opportunities.
///
/// Absent means [`DEFAULT_COUNT`]. Anything outside
/// [`MIN_COUNT`]..=[`MAX_COUNT`] is replaced by the default, not pinned to
/// the nearest bound.
pub fn clamp_count(requested: Option<i64>) -> u32 {
  match requested {
    None => DEFAULT_COUNT,
    Some(n) if (i64::from(MIN_COUNT)..=i64::from(MAX_COUNT)).contains(&n) => n as u32,
    Some(n) => {
      warn!(
        requested = n,
        "number should be between {MIN_COUNT} and {MAX_COUNT}; using {DEFAULT_COUNT}"
      );
      DEFAULT_COUNT
    }
  }
}

/// [`clamp_count`] for raw user input. Blank input means the default; input
/// that is not a whole number is warned about and also falls back to it.
pub fn parse_count(raw: Option<&str>) -> u32 {
  let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
    return DEFAULT_COUNT;
  };
  match raw.parse::<i64>() {
    Ok(n) => clamp_count(Some(n)),
    Err(_) => {
      warn!(input = raw, "Invalid number. Using default of {DEFAULT_COUNT}.");
      DEFAULT_COUNT
    }
  }
}

/// The request sent to the generator for `count` opportunities in `place`.
pub fn build_prompt(place: &str, count: u32) -> String {
  format!(
    r#"Please find {count} opportunities in {place} for people who rely on SNAP benefits.
These should be food kitchens, food banks, food drives, and anywhere someone who can't afford food can go to get a meal or groceries.
The goal is to help people in need find food resources in {place}.

For each opportunity, please provide the information in this exact JSON format:
{{
    "opportunities": [
        {{
            "name": "Name of the place or event",
            "link": "Website URL if available, otherwise empty string",
            "location": "Specific address or area in {place}",
            "description": "Brief description of what is offered, when, and who can use it"
        }}
    ]
}}

Please ensure your response is valid JSON that can be parsed directly.
Focus on real, actual places and events in {place}."#
  )
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn count_defaults_and_soft_clamps() {
    assert_eq!(clamp_count(None), 10);
    assert_eq!(clamp_count(Some(1)), 1);
    assert_eq!(clamp_count(Some(50)), 50);
    assert_eq!(clamp_count(Some(0)), 10);
    assert_eq!(clamp_count(Some(51)), 10);
    assert_eq!(clamp_count(Some(-3)), 10);
  }

  #[test]
  fn unparseable_count_falls_back_to_default() {
    assert_eq!(parse_count(None), 10);
    assert_eq!(parse_count(Some("")), 10);
    assert_eq!(parse_count(Some(" 25 ")), 25);
    assert_eq!(parse_count(Some("abc")), 10);
    assert_eq!(parse_count(Some("-5")), 10);
    assert_eq!(parse_count(Some("7.5")), 10);
    assert_eq!(parse_count(Some("99999999999999999999")), 10);
  }

  #[test]
  fn prompt_names_place_count_and_schema() {
    let p = build_prompt("Pittsburgh", 7);
    assert!(p.contains("find 7 opportunities in Pittsburgh"));
    assert!(p.contains(r#""opportunities": ["#));
    for key in ["\"name\"", "\"link\"", "\"location\"", "\"description\""] {
      assert!(p.contains(key), "missing {key}");
    }
    assert!(p.contains("Specific address or area in Pittsburgh"));
  }
}
