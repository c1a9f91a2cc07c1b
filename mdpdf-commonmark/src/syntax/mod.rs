//! Class-based syntax highlighting for fenced code blocks.
//!
//! The only backend is syntect (feature `syntect`), using the extended syntax
//! and theme collections from two-face.

pub mod error;
pub mod types;

pub use error::{SyntaxError, SyntaxResult};
pub use types::{CLASS_PREFIX, SyntaxConfig, SyntaxHighlighter, SyntaxManager};

#[cfg(feature = "syntect")] mod syntect;
#[cfg(feature = "syntect")] pub use syntect::*;

/// Create the default syntax manager based on available features.
///
/// # Errors
///
/// Returns [`SyntaxError::NoBackendAvailable`] when the crate was built
/// without a highlighting backend.
pub fn create_default_manager() -> SyntaxResult<SyntaxManager> {
  #[cfg(feature = "syntect")]
  {
    Ok(create_syntect_manager())
  }

  #[cfg(not(feature = "syntect"))]
  {
    Err(SyntaxError::NoBackendAvailable)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_syntax_config_default() {
    let config = SyntaxConfig::default();
    assert!(config.default_theme.is_none());
    assert_eq!(config.language_aliases["js"], "javascript");
  }

  #[cfg(feature = "syntect")]
  #[test]
  fn test_syntect_highlight_simple() {
    let highlighter = SyntectHighlighter;
    assert_eq!(highlighter.name(), "Syntect");
    let html = highlighter
      .highlight("fn main() {}", "rust")
      .expect("Failed to highlight code");
    assert!(html.contains("main"));
    assert!(html.contains(r#"class="hl-"#));
  }

  #[cfg(feature = "syntect")]
  #[test]
  fn test_language_resolution() {
    let manager =
      create_default_manager().expect("Failed to create default manager");
    assert_eq!(manager.resolve_language("js"), "javascript");
    assert_eq!(manager.resolve_language("Py"), "python");
    assert_eq!(manager.resolve_language("rust"), "rust");
  }

  #[cfg(feature = "syntect")]
  #[test]
  fn test_unknown_language_is_rejected() {
    let manager =
      create_default_manager().expect("Failed to create default manager");
    let result = manager.highlight_code("graph TD; A-->B", "mermaid");
    assert!(matches!(result, Err(SyntaxError::UnsupportedLanguage(_))));
  }

  #[cfg(feature = "syntect")]
  #[test]
  fn test_theme_css_uses_class_prefix() {
    let manager =
      create_default_manager().expect("Failed to create default manager");
    let css = manager.theme_css(None).expect("default theme must exist");
    assert!(css.contains(".hl-"));

    let nord = manager.theme_css(Some("Nord")).expect("Nord from two-face");
    assert_ne!(css, nord);

    assert!(matches!(
      manager.theme_css(Some("NoSuchTheme")),
      Err(SyntaxError::ThemeNotFound(_))
    ));
  }
}
