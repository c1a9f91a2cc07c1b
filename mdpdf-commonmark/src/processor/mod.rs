//! Markdown processing module.
//!
//! - [`core`]: Main processor implementation and rendering pipeline
//! - [`process`]: Processing helpers with error recovery
//! - [`extensions`]: Text-level extensions such as emoji shortcodes
//! - [`types`]: Configuration structures
pub mod core;
pub mod extensions;
pub mod process;
pub mod types;

pub use extensions::replace_emoji_shortcodes;
pub use process::{process_safe, process_with_recovery};
pub use types::{MarkdownOptions, MarkdownOptionsBuilder, MarkdownProcessor};

#[cfg(test)]
mod tests {
  use super::{MarkdownOptions, MarkdownProcessor};

  fn plain() -> MarkdownProcessor {
    MarkdownProcessor::new(MarkdownOptions::with_features(false, false, false))
  }

  #[test]
  fn test_raw_html_passes_through() {
    let result = plain().render(
      "<div style=\"page-break-after: always;\"></div>\n\nNext page\n",
    );
    assert!(
      result
        .html
        .contains(r#"<div style="page-break-after: always;"></div>"#)
    );
    assert!(result.html.contains("<p>Next page</p>"));
  }

  #[test]
  fn test_code_text_is_escaped() {
    let result = plain().render("`<script>alert('x')</script>`");
    assert!(result.html.contains("&lt;script&gt;"));
    assert!(!result.html.contains("<script>alert"));
  }

  #[test]
  fn test_hard_tabs_preserved_in_code_blocks() {
    let markdown = "```rust\nfn main() {\n\tprintln!(\"Hello\");\n}\n```\n";
    let result = plain().render(markdown);
    assert!(result.html.contains("\tprintln"));
  }

  #[test]
  fn test_hard_breaks_follow_simple_line_breaks() {
    let soft = plain().render("one\ntwo\n");
    assert!(!soft.html.contains("<br"));

    let processor =
      MarkdownProcessor::new(MarkdownOptions::with_features(false, false, true));
    let hard = processor.render("one\ntwo\n");
    assert!(hard.html.contains("<br"));
  }
}
