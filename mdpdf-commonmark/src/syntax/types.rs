//! Highlighter trait and the manager the renderer talks to.
use std::collections::HashMap;

use super::error::{SyntaxError, SyntaxResult};

/// Prefix of every token class emitted by a highlighter, e.g.
/// `<span class="hl-source hl-rust">`.
pub const CLASS_PREFIX: &str = "hl-";

/// Fence info strings that name a language indirectly.
const ALIASES: &[(&str, &str)] = &[
  ("console", "bash"),
  ("js", "javascript"),
  ("md", "markdown"),
  ("py", "python"),
  ("rb", "ruby"),
  ("sh", "bash"),
  ("shell", "bash"),
  ("ts", "typescript"),
  ("yml", "yaml"),
];

/// A highlighting backend.
///
/// Output is class-based: tokens are spans with [`CLASS_PREFIX`]ed scope
/// classes and the colors come from [`SyntaxHighlighter::theme_css`], so the
/// theme is an ordinary stylesheet in the document.
pub trait SyntaxHighlighter: Send + Sync {
  fn name(&self) -> &'static str;

  /// Lowercased names and extensions the backend recognizes.
  fn supported_languages(&self) -> Vec<String>;

  fn available_themes(&self) -> Vec<String>;

  fn supports_language(&self, language: &str) -> bool {
    self
      .supported_languages()
      .iter()
      .any(|known| known.eq_ignore_ascii_case(language))
  }

  /// Token markup for `code`, without the enclosing `<pre>`/`<code>`.
  ///
  /// # Errors
  ///
  /// Returns an error if the language is unknown or highlighting fails.
  fn highlight(&self, code: &str, language: &str) -> SyntaxResult<String>;

  /// Stylesheet coloring the token classes for `theme`, or for the
  /// backend's default theme.
  ///
  /// # Errors
  ///
  /// Returns [`SyntaxError::ThemeNotFound`] for an unknown theme.
  fn theme_css(&self, theme: Option<&str>) -> SyntaxResult<String>;
}

#[derive(Debug, Clone)]
pub struct SyntaxConfig {
  /// Theme used when the caller does not name one.
  pub default_theme: Option<String>,
  /// Lowercased alias to language name.
  pub language_aliases: HashMap<String, String>,
}

impl Default for SyntaxConfig {
  fn default() -> Self {
    Self {
      default_theme:    None,
      language_aliases: ALIASES
        .iter()
        .map(|&(alias, language)| (alias.to_owned(), language.to_owned()))
        .collect(),
    }
  }
}

/// A backend plus the alias and theme defaults applied in front of it.
pub struct SyntaxManager {
  highlighter: Box<dyn SyntaxHighlighter>,
  config:      SyntaxConfig,
}

impl SyntaxManager {
  #[must_use]
  pub fn new(
    highlighter: Box<dyn SyntaxHighlighter>,
    config: SyntaxConfig,
  ) -> Self {
    Self {
      highlighter,
      config,
    }
  }

  #[must_use]
  pub fn highlighter(&self) -> &dyn SyntaxHighlighter {
    self.highlighter.as_ref()
  }

  /// Lowercase `language` and map it through the alias table.
  #[must_use]
  pub fn resolve_language(&self, language: &str) -> String {
    let lowered = language.to_lowercase();
    match self.config.language_aliases.get(&lowered) {
      Some(target) => target.clone(),
      None => lowered,
    }
  }

  /// Highlight `code` after alias resolution.
  ///
  /// # Errors
  ///
  /// Returns [`SyntaxError::UnsupportedLanguage`] when the backend does not
  /// know the language, so the caller can leave the block as plain code.
  pub fn highlight_code(
    &self,
    code: &str,
    language: &str,
  ) -> SyntaxResult<String> {
    let language = self.resolve_language(language);
    if !self.highlighter.supports_language(&language) {
      return Err(SyntaxError::UnsupportedLanguage(language));
    }
    self.highlighter.highlight(code, &language)
  }

  /// # Errors
  ///
  /// Returns an error if the theme is unknown or cannot be converted.
  pub fn theme_css(&self, theme: Option<&str>) -> SyntaxResult<String> {
    self
      .highlighter
      .theme_css(theme.or(self.config.default_theme.as_deref()))
  }
}
