//! Renderer configuration.
//!
//! Every processor carries its own options; there is no shared flavor
//! state, so differently configured processors can coexist.
//!
//! ```
//! use mdpdf_commonmark::{MarkdownOptions, MarkdownProcessor};
//!
//! let options = MarkdownOptions {
//!   gfm: true,
//!   highlight_code: true,
//!   ..Default::default()
//! };
//!
//! let processor = MarkdownProcessor::new(options);
//! ```

use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(
  clippy::struct_excessive_bools,
  reason = "Independent renderer toggles"
)]
pub struct MarkdownOptions {
  /// Enable GitHub Flavored Markdown (GFM) extensions: tables, task lists,
  /// strikethrough, autolinks and footnotes.
  pub gfm: bool,

  /// Enable syntax highlighting for fenced code blocks.
  pub highlight_code: bool,

  /// Theme for [`MarkdownProcessor::theme_css`]; the backend default when
  /// `None`.
  pub highlight_theme: Option<String>,

  /// Replace `:shortcode:` sequences with emoji glyphs.
  pub emoji: bool,

  /// Treat a single newline inside a paragraph as a hard line break. When
  /// `false`, soft breaks behave like GitHub's renderer.
  pub simple_line_breaks: bool,
}

impl MarkdownOptions {
  /// GFM options with the three user-facing toggles set.
  #[must_use]
  pub const fn with_features(
    highlight_code: bool,
    emoji: bool,
    simple_line_breaks: bool,
  ) -> Self {
    Self {
      gfm: true,
      highlight_code,
      highlight_theme: None,
      emoji,
      simple_line_breaks,
    }
  }
}

impl Default for MarkdownOptions {
  fn default() -> Self {
    Self {
      gfm:                true,
      highlight_code:     cfg!(feature = "syntect"),
      highlight_theme:    None,
      emoji:              true,
      simple_line_breaks: false,
    }
  }
}

/// Renders Markdown with a fixed set of [`MarkdownOptions`].
#[derive(Clone)]
pub struct MarkdownProcessor {
  pub(crate) options:        MarkdownOptions,
  pub(crate) syntax_manager: Option<Arc<crate::syntax::SyntaxManager>>,
}

/// Fluent construction of [`MarkdownOptions`], starting from the defaults.
#[derive(Debug, Clone)]
pub struct MarkdownOptionsBuilder {
  options: MarkdownOptions,
}

impl MarkdownOptionsBuilder {
  #[must_use]
  pub fn new() -> Self {
    Self {
      options: MarkdownOptions::default(),
    }
  }

  #[must_use]
  pub const fn gfm(mut self, enabled: bool) -> Self {
    self.options.gfm = enabled;
    self
  }

  #[must_use]
  pub const fn highlight_code(mut self, enabled: bool) -> Self {
    self.options.highlight_code = enabled;
    self
  }

  #[must_use]
  pub fn highlight_theme<S: Into<String>>(mut self, theme: Option<S>) -> Self {
    self.options.highlight_theme = theme.map(Into::into);
    self
  }

  #[must_use]
  pub const fn emoji(mut self, enabled: bool) -> Self {
    self.options.emoji = enabled;
    self
  }

  #[must_use]
  pub const fn simple_line_breaks(mut self, enabled: bool) -> Self {
    self.options.simple_line_breaks = enabled;
    self
  }

  #[must_use]
  pub fn build(self) -> MarkdownOptions {
    self.options
  }
}

impl Default for MarkdownOptionsBuilder {
  fn default() -> Self {
    Self::new()
  }
}
