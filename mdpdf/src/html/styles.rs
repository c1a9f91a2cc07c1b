use mdpdf_templates::{DEFAULT_CSS, GITHUB_MARKDOWN_CSS};
use mdpdf_utils::{StyleSet, StyleSource};

use crate::config::ConversionRequest;

/// Stylesheets for `request`, lowest precedence first: base styles, GitHub
/// styles, the highlight theme, then user stylesheets.
#[must_use]
pub fn style_set(
  request: &ConversionRequest,
  theme_css: Option<String>,
) -> StyleSet {
  let mut set = StyleSet::new();
  if request.default_style {
    set.push(StyleSource::Builtin(DEFAULT_CSS));
  }
  if request.gh_style {
    set.push(StyleSource::Builtin(GITHUB_MARKDOWN_CSS));
  }
  if let Some(css) = theme_css {
    set.push(StyleSource::Inline(css));
  }
  for path in &request.styles {
    set.push_file(path);
  }
  set
}

#[cfg(test)]
mod tests {
  use std::{ffi::OsString, path::PathBuf};

  use super::*;
  use crate::config::ConversionOptions;

  fn request(options: ConversionOptions) -> ConversionRequest {
    ConversionRequest::resolve_with_env(
      ConversionOptions {
        source: Some(PathBuf::from("/doc.md")),
        destination: Some(PathBuf::from("/doc.pdf")),
        ..options
      },
      |_| None::<OsString>,
    )
    .expect("valid request")
  }

  #[test]
  fn test_default_order() {
    let set = style_set(
      &request(ConversionOptions::default()),
      Some(".hl-code {}".to_string()),
    );
    assert_eq!(set.sources(), [
      StyleSource::Builtin(DEFAULT_CSS),
      StyleSource::Builtin(GITHUB_MARKDOWN_CSS),
      StyleSource::Inline(".hl-code {}".to_string()),
    ]);
  }

  #[test]
  fn test_user_styles_come_last_and_replace_github() {
    let set = style_set(
      &request(ConversionOptions {
        styles: vec![PathBuf::from("/custom.css")],
        ..Default::default()
      }),
      None,
    );
    assert_eq!(set.sources(), [
      StyleSource::Builtin(DEFAULT_CSS),
      StyleSource::File(PathBuf::from("/custom.css")),
    ]);
  }

  #[test]
  fn test_everything_can_be_turned_off() {
    let set = style_set(
      &request(ConversionOptions {
        default_style: Some(false),
        gh_style: Some(false),
        ..Default::default()
      }),
      None,
    );
    assert!(set.is_empty());
  }
}
