//! Core implementation of the Markdown processor.
//!
//! Rendering is a two-stage pipeline: comrak turns Markdown into HTML, then a
//! single kuchikikiki pass over the result highlights code blocks, assigns
//! GitHub-style heading ids and substitutes emoji shortcodes.
use std::sync::Arc;

use comrak::{Arena, options::Options, parse_document};
use kuchikikiki::NodeRef;
use log::{debug, trace};

use super::{
  extensions::replace_emoji_shortcodes,
  process::process_safe,
  types::{MarkdownOptions, MarkdownProcessor},
};
use crate::{
  syntax::{SyntaxResult, create_default_manager},
  types::{Header, MarkdownResult},
  utils::{
    SlugRegistry,
    dom::{fragment_nodes, parse_fragment, serialize_fragment},
  },
};

/// Elements whose text must never be touched by emoji substitution.
const VERBATIM_ELEMENTS: &[&str] =
  &["code", "pre", "kbd", "samp", "script", "style"];

impl MarkdownProcessor {
  /// Create a new `MarkdownProcessor` with the given options.
  #[must_use]
  pub fn new(options: MarkdownOptions) -> Self {
    let syntax_manager = if options.highlight_code {
      match create_default_manager() {
        Ok(manager) => Some(Arc::new(manager)),
        Err(e) => {
          log::warn!("Syntax highlighting disabled: {e}");
          None
        },
      }
    } else {
      None
    };

    Self {
      options,
      syntax_manager,
    }
  }

  /// Access processor options.
  #[must_use]
  pub const fn options(&self) -> &MarkdownOptions {
    &self.options
  }

  /// Stylesheet for the token classes produced by the highlighter, using
  /// the configured theme. `None` when highlighting is off.
  ///
  /// # Errors
  ///
  /// Returns an error if the theme cannot be turned into CSS.
  pub fn theme_css(&self) -> Option<SyntaxResult<String>> {
    let manager = self.syntax_manager.as_ref()?;
    Some(manager.theme_css(self.options.highlight_theme.as_deref()))
  }

  /// Render Markdown to an HTML fragment.
  ///
  /// Never fails: constructs comrak does not recognize come out as literal
  /// text, and a failing post-processing step falls back to comrak's own
  /// output.
  #[must_use]
  pub fn render(&self, markdown: &str) -> MarkdownResult {
    let html = self.convert_to_html(markdown);
    let mut headers = Vec::new();

    let html = process_safe(
      &html,
      |html| {
        let document = parse_fragment(html);
        self.apply_dom_transformations(&document, &mut headers);
        serialize_fragment(&document)
      },
      &html,
    );

    MarkdownResult { html, headers }
  }

  /// Convert markdown to HTML using comrak and configured options.
  fn convert_to_html(&self, content: &str) -> String {
    let arena = Arena::new();
    let options = self.comrak_options();
    let root = parse_document(&arena, content, &options);

    let mut html_output = String::new();
    comrak::format_html(root, &options, &mut html_output).unwrap_or_default();
    trace!("comrak produced {} bytes of HTML", html_output.len());
    html_output
  }

  /// Build comrak options from `MarkdownOptions`.
  fn comrak_options(&self) -> Options<'_> {
    let mut options = Options::default();
    if self.options.gfm {
      options.extension.table = true;
      options.extension.footnotes = true;
      options.extension.strikethrough = true;
      options.extension.tasklist = true;
      options.extension.autolink = true;
    }
    options.render.hardbreaks = self.options.simple_line_breaks;
    // Documents routinely embed raw HTML (page breaks, centered images), and
    // the output only ever reaches the local headless browser.
    options.render.r#unsafe = true;
    // Heading ids are assigned in the DOM pass, GitHub style.
    options.extension.header_ids = None;
    options
  }

  /// Apply all DOM transformations to the parsed HTML document.
  fn apply_dom_transformations(
    &self,
    document: &NodeRef,
    headers: &mut Vec<Header>,
  ) {
    if self.syntax_manager.is_some() {
      self.highlight_code_blocks(document);
    }
    assign_heading_ids(document, headers);
    if self.options.emoji {
      replace_emoji_in_text(document);
    }
  }

  /// Replace the contents of `pre > code` blocks that declare a language
  /// with class-based token markup.
  fn highlight_code_blocks(&self, document: &NodeRef) {
    let Some(manager) = self.syntax_manager.as_ref() else {
      return;
    };
    let Ok(blocks) = document.select("pre > code") else {
      return;
    };

    // Collect first to avoid DOM modification during iteration
    let mut code_blocks = Vec::new();
    for code in blocks {
      let language = code
        .attributes
        .borrow()
        .get("class")
        .and_then(|class| {
          class
            .split_whitespace()
            .find_map(|c| c.strip_prefix("language-"))
            .map(str::to_string)
        });
      if let Some(language) = language {
        code_blocks.push((code.as_node().clone(), language));
      }
    }

    for (code_node, language) in code_blocks {
      let source = code_node.text_contents();
      let highlighted = match manager.highlight_code(&source, &language) {
        Ok(highlighted) => highlighted,
        Err(e) => {
          debug!("Leaving `{language}` code block unhighlighted: {e}");
          continue;
        },
      };

      if let Some(pre) = code_node.parent() {
        if let Some(element) = pre.as_element() {
          element
            .attributes
            .borrow_mut()
            .insert("class", "highlight".to_string());
        }
      }

      let old_children: Vec<NodeRef> = code_node.children().collect();
      for child in old_children {
        child.detach();
      }
      for node in fragment_nodes(&highlighted) {
        code_node.append(node);
      }
    }
  }
}

/// Give every heading a GitHub-compatible `id`, keeping explicit ids, and
/// record the headings in document order.
fn assign_heading_ids(document: &NodeRef, headers: &mut Vec<Header>) {
  let mut registry = SlugRegistry::new();
  if let Ok(with_ids) = document.select("[id]") {
    for element in with_ids {
      if let Some(id) = element.attributes.borrow().get("id") {
        registry.reserve(id);
      }
    }
  }

  let Ok(headings) = document.select("h1, h2, h3, h4, h5, h6") else {
    return;
  };

  for heading in headings {
    let text = heading.as_node().text_contents().trim().to_string();
    let level = heading.name.local.as_ref()[1..].parse::<u8>().unwrap_or(1);

    let mut attributes = heading.attributes.borrow_mut();
    let id = match attributes.get("id") {
      Some(existing) if !existing.is_empty() => existing.to_string(),
      _ => {
        let id = registry.unique(&text);
        attributes.insert("id", id.clone());
        id
      },
    };

    headers.push(Header { text, level, id });
  }
}

/// Substitute emoji shortcodes in text nodes outside of code.
fn replace_emoji_in_text(document: &NodeRef) {
  let text_nodes: Vec<NodeRef> = document
    .inclusive_descendants()
    .filter(|node| node.as_text().is_some())
    .filter(|node| {
      !node.ancestors().any(|ancestor| {
        ancestor.as_element().is_some_and(|element| {
          VERBATIM_ELEMENTS.contains(&element.name.local.as_ref())
        })
      })
    })
    .collect();

  for node in text_nodes {
    if let Some(text) = node.as_text() {
      let replaced = replace_emoji_shortcodes(&text.borrow());
      *text.borrow_mut() = replaced;
    }
  }
}
