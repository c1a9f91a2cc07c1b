//! Stylesheet assembly.
//!
//! Order matters: later sources win in the cascade, so callers push the
//! built-in sheets first and user stylesheets last.
use std::{
  fs,
  io,
  path::{Path, PathBuf},
};

use log::debug;

/// Concatenate stylesheets as-is, preserving order.
#[must_use]
pub fn get_styles<S: AsRef<str>>(stylesheets: &[S]) -> String {
  stylesheets.iter().map(AsRef::as_ref).collect()
}

/// Wrap every stylesheet in its own `<style>` element, preserving order.
///
/// Header and footer bands cannot load `<link>`ed sheets, so the block form
/// is used everywhere CSS is injected into markup.
#[must_use]
pub fn get_style_block<S: AsRef<str>>(stylesheets: &[S]) -> String {
  stylesheets
    .iter()
    .map(|style| format!("<style>{}</style>", style.as_ref()))
    .collect()
}

/// Swap double quotes for single quotes so CSS can sit inside a
/// double-quoted attribute of the browser's band templates.
#[must_use]
pub fn to_attribute_safe(css: &str) -> String {
  css.replace('"', "'")
}

/// A single stylesheet, either embedded or read from disk on load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StyleSource {
  Builtin(&'static str),
  Inline(String),
  File(PathBuf),
}

/// A user stylesheet could not be read.
#[derive(Debug, thiserror::Error)]
#[error("Failed to read stylesheet {}: {source}", path.display())]
pub struct StyleLoadError {
  pub path:   PathBuf,
  #[source]
  pub source: io::Error,
}

/// The loaded contents of a [`StyleSet`] in both output forms.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadedStyles {
  /// Plain concatenation.
  pub styles:      String,
  /// One `<style>` element per source.
  pub style_block: String,
}

/// Ordered stylesheet sources, lowest precedence first.
#[derive(Debug, Clone, Default)]
pub struct StyleSet {
  sources: Vec<StyleSource>,
}

impl StyleSet {
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  pub fn push(&mut self, source: StyleSource) -> &mut Self {
    self.sources.push(source);
    self
  }

  pub fn push_file(&mut self, path: impl AsRef<Path>) -> &mut Self {
    self.push(StyleSource::File(path.as_ref().to_path_buf()))
  }

  #[must_use]
  pub fn sources(&self) -> &[StyleSource] {
    &self.sources
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.sources.is_empty()
  }

  /// Read every source and assemble both output forms.
  ///
  /// # Errors
  ///
  /// Returns the first file source that cannot be read.
  pub fn load(&self) -> Result<LoadedStyles, StyleLoadError> {
    let mut contents = Vec::with_capacity(self.sources.len());
    for source in &self.sources {
      let css = match source {
        StyleSource::Builtin(css) => (*css).to_string(),
        StyleSource::Inline(css) => css.clone(),
        StyleSource::File(path) => {
          debug!("Loading stylesheet {}", path.display());
          fs::read_to_string(path).map_err(|source| {
            StyleLoadError {
              path: path.clone(),
              source,
            }
          })?
        },
      };
      contents.push(css);
    }

    Ok(LoadedStyles {
      styles:      get_styles(&contents),
      style_block: get_style_block(&contents),
    })
  }
}
