//! Document assembly.
//!
//! Templates are registered under `.html` names, so Tera escapes every value
//! by default. Markup that is already rendered goes in as [`TrustedHtml`] and
//! is the only thing the templates mark `| safe`.
use std::{fmt, fs, path::Path};

use log::debug;
use mdpdf_templates::{DOCUMENT_TEMPLATE, FOOTER_TEMPLATE, HEADER_TEMPLATE};
use mdpdf_utils::{qualify_img_sources, to_attribute_safe};
use serde::Serialize;
use tera::{Context, Tera};

use crate::error::{MdpdfError, Result};

const DOCUMENT: &str = "document.html";
const HEADER: &str = "header.html";
const FOOTER: &str = "footer.html";

/// HTML that is inserted into a template verbatim.
///
/// Only rendered Markdown, qualified band content and assembled style blocks
/// are wrapped in this type. Anything else stays a plain string and is
/// escaped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TrustedHtml(String);

impl TrustedHtml {
  pub fn new(html: impl Into<String>) -> Self {
    Self(html.into())
  }
}

/// Which page band a template fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BandKind {
  Header,
  Footer,
}

impl BandKind {
  const fn template(self) -> &'static str {
    match self {
      Self::Header => HEADER,
      Self::Footer => FOOTER,
    }
  }
}

impl fmt::Display for BandKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::Header => "header",
      Self::Footer => "footer",
    })
  }
}

/// Everything the render driver needs to print one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedDocument {
  /// Full HTML document.
  pub html:   String,
  /// Header band markup; empty when there is no header.
  pub header: String,
  /// Footer band markup; empty when there is no footer.
  pub footer: String,
  pub title:  String,
}

/// The compiled page templates.
pub struct Templates {
  tera: Tera,
}

impl Templates {
  /// Compile the embedded templates.
  ///
  /// # Errors
  ///
  /// Returns `Template` if a template fails to compile.
  pub fn new() -> Result<Self> {
    let mut tera = Tera::default();
    tera.add_raw_templates([
      (DOCUMENT, DOCUMENT_TEMPLATE),
      (HEADER, HEADER_TEMPLATE),
      (FOOTER, FOOTER_TEMPLATE),
    ])?;
    Ok(Self { tera })
  }

  /// Render the full document: the style block in the head and the body
  /// fragment, both verbatim. `title` is escaped.
  ///
  /// # Errors
  ///
  /// Returns `Template` if rendering fails.
  pub fn render_document(
    &self,
    css: &TrustedHtml,
    body: &TrustedHtml,
    title: &str,
  ) -> Result<String> {
    let mut context = Context::new();
    context.insert("css", css);
    context.insert("body", body);
    context.insert("title", title);
    Ok(self.tera.render(DOCUMENT, &context)?)
  }

  /// Prepare a header or footer band.
  ///
  /// Returns an empty string when `path` is `None`, which tells the driver
  /// not to display that band. Otherwise the file is read, its images are
  /// qualified against `asset_dir`, and it is wrapped in the band template
  /// together with `css_block` (double quotes turned into single quotes, as
  /// the browser embeds band templates in an attribute).
  ///
  /// # Errors
  ///
  /// Returns `FileAccess` if the file cannot be read, or `Template` if
  /// rendering fails.
  pub fn prepare_band(
    &self,
    path: Option<&Path>,
    css_block: &str,
    asset_dir: &Path,
    kind: BandKind,
  ) -> Result<String> {
    let Some(path) = path else {
      return Ok(String::new());
    };
    debug!("Preparing {kind} band from {}", path.display());

    let content =
      fs::read_to_string(path).map_err(|e| MdpdfError::file_access(path, e))?;
    let content = TrustedHtml::new(qualify_img_sources(&content, asset_dir));
    let css = TrustedHtml::new(to_attribute_safe(css_block));

    let mut context = Context::new();
    context.insert("css", &css);
    context.insert("content", &content);
    Ok(self.tera.render(kind.template(), &context)?)
  }
}
