//! Types for the mdpdf-commonmark public API.
use serde::{Deserialize, Serialize};

/// Represents a heading in a rendered Markdown document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Header {
  /// Heading text (inline content, no markup).
  pub text:  String,
  /// Heading level (1-6).
  pub level: u8,
  /// Generated or explicit anchor id of the heading.
  pub id:    String,
}

/// Result of Markdown processing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MarkdownResult {
  /// Rendered HTML fragment.
  pub html: String,

  /// Headings in document order, with the ids they were given.
  pub headers: Vec<Header>,
}
