//! Small helpers shared by the processor and by downstream crates that
//! rewrite rendered HTML.
pub mod dom;

use std::collections::HashMap;

/// Slugify heading text the way GitHub does for anchor ids.
///
/// Lowercases, drops punctuation and symbols, and turns each space into a
/// hyphen. Hyphens and underscores survive; nothing is prefixed.
///
/// ```
/// use mdpdf_commonmark::utils::slugify;
///
/// assert_eq!(slugify("Hello, World!"), "hello-world");
/// assert_eq!(slugify("2. Install `mdpdf`"), "2-install-mdpdf");
/// ```
#[must_use]
pub fn slugify(text: &str) -> String {
  text
    .trim()
    .to_lowercase()
    .chars()
    .filter_map(|c| {
      if c.is_alphanumeric() || c == '-' || c == '_' {
        Some(c)
      } else if c == ' ' {
        Some('-')
      } else {
        None
      }
    })
    .collect()
}

/// Hands out unique anchor ids, suffixing repeats with `-1`, `-2`, ...
#[derive(Debug, Default)]
pub struct SlugRegistry {
  seen: HashMap<String, usize>,
}

impl SlugRegistry {
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  /// Reserve an id that already exists in the document.
  pub fn reserve(&mut self, id: &str) {
    self.seen.entry(id.to_string()).or_insert(0);
  }

  /// Slugify `text` and make the result unique within this registry.
  pub fn unique(&mut self, text: &str) -> String {
    let base = slugify(text);
    let mut candidate = base.clone();
    while let Some(count) = self.seen.get_mut(&candidate) {
      *count += 1;
      candidate = format!("{base}-{count}");
    }
    self.seen.insert(candidate.clone(), 0);
    candidate
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_slugify_github_rules() {
    assert_eq!(slugify("Heading"), "heading");
    assert_eq!(slugify("Multiple   Spaces"), "multiple---spaces");
    assert_eq!(slugify("snake_case and-kebab"), "snake_case-and-kebab");
    assert_eq!(slugify("Ünïcödé Tïtle"), "ünïcödé-tïtle");
    assert_eq!(slugify("What's new? (v2.0)"), "whats-new-v20");
  }

  #[test]
  fn test_registry_suffixes_duplicates() {
    let mut registry = SlugRegistry::new();
    assert_eq!(registry.unique("Usage"), "usage");
    assert_eq!(registry.unique("Usage"), "usage-1");
    assert_eq!(registry.unique("Usage"), "usage-2");
    assert_eq!(registry.unique("Other"), "other");
  }

  #[test]
  fn test_registry_respects_reserved_ids() {
    let mut registry = SlugRegistry::new();
    registry.reserve("intro");
    assert_eq!(registry.unique("Intro"), "intro-1");
  }
}
