//! # mdpdf-commonmark
//!
//! GitHub-flavored Markdown renderer used by mdpdf. Produces an HTML
//! *fragment* (not a full document) that is later wrapped in a page template
//! and printed by a headless browser.
//!
//! ## Quick Start
//!
//! ```rust
//! use mdpdf_commonmark::{MarkdownOptions, MarkdownProcessor};
//!
//! let processor = MarkdownProcessor::new(MarkdownOptions::default());
//! let result = processor.render("# Hello World\n\nThis is **bold** text.");
//!
//! assert!(result.html.contains(r#"<h1 id="hello-world">Hello World</h1>"#));
//! ```
//!
//! ## Features
//!
//! - **AST-based parsing** using `comrak` with the GFM extension set
//! - **GitHub-compatible heading ids** (`# Hello World` → `hello-world`)
//! - **Emoji shortcodes** (`:smile:` → 😄) that leave time-like text such as
//!   `12:00:00` alone
//! - **Class-based syntax highlighting** with a matching theme stylesheet
//! - **Error recovery** with graceful degradation for malformed input
//!
//! ## Configuration
//!
//! Every processor carries its own configuration; nothing is global, so two
//! processors with different flavors can render side by side.
//!
//! ```rust
//! use mdpdf_commonmark::{MarkdownOptions, MarkdownProcessor};
//!
//! let options = MarkdownOptions {
//!   emoji: false,
//!   simple_line_breaks: true,
//!   ..Default::default()
//! };
//!
//! let processor = MarkdownProcessor::new(options);
//! let html = processor.render("one\ntwo").html;
//! assert!(html.contains("<br>"));
//! ```

pub mod processor;
pub mod syntax;
mod types;
pub mod utils;

pub use crate::{
  processor::{
    MarkdownOptions,
    MarkdownOptionsBuilder,
    MarkdownProcessor,
    process_safe,
    process_with_recovery,
  },
  syntax::{SyntaxError, SyntaxManager, create_default_manager},
  types::{Header, MarkdownResult},
};
