//! Integration tests for syntax highlighting.
#![cfg(feature = "syntect")]

use mdpdf_commonmark::{
  MarkdownOptions,
  MarkdownOptionsBuilder,
  MarkdownProcessor,
  create_default_manager,
};

const RUST_BLOCK: &str = r#"
Here's some Rust code:

```rust
fn main() {
    let x = 42;
    println!("{x}");
}
```
"#;

#[test]
fn test_highlighting_changes_code_markup() {
  let plain =
    MarkdownProcessor::new(MarkdownOptions::with_features(false, false, false));
  let highlighted =
    MarkdownProcessor::new(MarkdownOptions::with_features(true, false, false));

  let plain = plain.render(RUST_BLOCK).html;
  let highlighted = highlighted.render(RUST_BLOCK).html;

  assert_ne!(plain, highlighted);
  assert!(highlighted.contains(r#"class="hl-"#));
  assert!(highlighted.contains("language-rust"));
  assert!(highlighted.contains(r#"<pre class="highlight">"#));
  assert!(!plain.contains("hl-"));
}

#[test]
fn test_unknown_language_is_left_alone() {
  let processor =
    MarkdownProcessor::new(MarkdownOptions::with_features(true, false, false));
  let html = processor
    .render("```mermaid\ngraph TD; A-->B\n```\n")
    .html;
  assert!(html.contains(r#"<code class="language-mermaid">"#));
  assert!(!html.contains("hl-"));
}

#[test]
fn test_fence_without_language_is_left_alone() {
  let processor =
    MarkdownProcessor::new(MarkdownOptions::with_features(true, false, false));
  let html = processor.render("```\nplain text\n```\n").html;
  assert!(html.contains("<pre><code>plain text\n</code></pre>"));
}

#[test]
fn test_theme_css_follows_option() {
  let default = MarkdownProcessor::new(MarkdownOptions::default());
  let nord = MarkdownProcessor::new(
    MarkdownOptionsBuilder::new()
      .highlight_theme(Some("Nord"))
      .build(),
  );

  let default_css = default
    .theme_css()
    .expect("highlighting is on")
    .expect("default theme exists");
  let nord_css = nord
    .theme_css()
    .expect("highlighting is on")
    .expect("Nord exists");
  assert_ne!(default_css, nord_css);
}

#[test]
fn test_no_theme_css_without_highlighting() {
  let processor =
    MarkdownProcessor::new(MarkdownOptions::with_features(false, true, false));
  assert!(processor.theme_css().is_none());
}

#[test]
fn test_manager_reports_backend() {
  let manager = create_default_manager().expect("syntect backend");
  assert_eq!(manager.highlighter().name(), "Syntect");
  assert!(manager.highlighter().supports_language("rust"));
  assert!(!manager.highlighter().available_themes().is_empty());
}
