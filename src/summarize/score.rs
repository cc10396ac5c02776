//! Relevance score extraction.
//!
//! Summaries carry their score inline as `[Relevance score: 7]`. Parsing
//! never fails: a missing or unreadable marker yields [`DEFAULT_RELEVANCE`].

use std::sync::OnceLock;

use regex::Regex;

/// Score used when a summary carries no usable marker.
pub const DEFAULT_RELEVANCE: f64 = 5.0;

/// Literal keyword that introduces the score.
const MARKER: &str = "Relevance score:";

fn score_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"Relevance score:\s*(\d+)").expect("score pattern is valid"))
}

/// Extracts the first embedded relevance score from `summary`.
#[must_use]
pub fn extract_relevance(summary: &str) -> f64 {
    score_pattern()
        .captures(summary)
        .and_then(|caps| caps[1].parse::<u32>().ok())
        .map_or(DEFAULT_RELEVANCE, f64::from)
}

fn marker_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\[?\s*Relevance score:[^\]\n]*\]?").expect("marker pattern is valid")
    })
}

/// `5. The relevance score`, `### Relevance Score:` and the like.
fn is_score_heading(line: &str) -> bool {
    let trimmed = line.trim();
    let text = trimmed.trim_start_matches(['#', '*', ' ']);
    let numbered = text.starts_with(|c: char| c.is_ascii_digit());
    let text = text.trim_end_matches([':', '*', ' ']).to_lowercase();
    (numbered || trimmed.starts_with('#')) && text.ends_with("relevance score")
}

/// Removes every score marker, keeping the prose around it.
///
/// Lines the removal leaves blank or bare emphasis are dropped, and so is a trailing score
/// heading with nothing left under it.
#[must_use]
pub fn strip_relevance_markers(summary: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    for line in summary.lines() {
        if !line.contains(MARKER) {
            lines.push(line.to_string());
            continue;
        }
        let stripped = marker_pattern().replace_all(line, "");
        if !stripped.trim_matches(|c: char| c.is_whitespace() || "*_-()".contains(c)).is_empty() {
            lines.push(stripped.trim_end().to_string());
        }
    }
    while lines.last().is_some_and(|line| line.trim().is_empty() || is_score_heading(line)) {
        lines.pop();
    }
    lines.join("\n")
}
