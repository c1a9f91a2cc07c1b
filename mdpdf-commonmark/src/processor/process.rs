//! Processing functions with error recovery.
use log::error;

use super::types::MarkdownProcessor;
use crate::types::MarkdownResult;

/// Process markdown content with error recovery.
///
/// Markdown rendering never fails outright: if the processor panics on some
/// pathological input, the content is returned HTML-escaped inside a
/// `<pre>` block so the conversion still produces a document.
#[must_use]
pub fn process_with_recovery(
  processor: &MarkdownProcessor,
  content: &str,
) -> MarkdownResult {
  match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
    processor.render(content)
  })) {
    Ok(result) => result,
    Err(panic_err) => {
      error!("Panic during markdown processing: {panic_err:?}");
      MarkdownResult {
        html:    format!(
          "<pre>{}</pre>",
          html_escape::encode_text(content)
        ),
        headers: Vec::new(),
      }
    },
  }
}

/// Safely process markup content with error recovery.
///
/// Wraps an HTML transformation that may panic on malformed input. On panic
/// the error is logged and `fallback` is returned, or the original content
/// when `fallback` is empty.
pub fn process_safe<F>(content: &str, processor_fn: F, fallback: &str) -> String
where
  F: FnOnce(&str) -> String,
{
  if content.is_empty() {
    return String::new();
  }

  let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
    processor_fn(content)
  }));

  match result {
    Ok(processed_text) => processed_text,
    Err(e) => {
      if let Some(error_msg) = e.downcast_ref::<String>() {
        error!("Error processing markup: {error_msg}");
      } else if let Some(error_msg) = e.downcast_ref::<&str>() {
        error!("Error processing markup: {error_msg}");
      } else {
        error!("Unknown error occurred while processing markup");
      }

      if fallback.is_empty() {
        content.to_string()
      } else {
        fallback.to_string()
      }
    },
  }
}
