//! Convert Markdown documents to PDF.
//!
//! The source is rendered to HTML, wrapped in the document template together
//! with the configured stylesheets, and printed by a headless browser:
//!
//! ```no_run
//! use mdpdf::config::ConversionOptions;
//!
//! let options = ConversionOptions {
//!   source: Some("README.md".into()),
//!   destination: Some("README.pdf".into()),
//!   ..Default::default()
//! };
//! let written = mdpdf::convert(options)?;
//! println!("{}", written.display());
//! # Ok::<(), mdpdf::error::MdpdfError>(())
//! ```
pub mod cli;
pub mod config;
pub mod error;
pub mod html;
pub mod render;

use std::path::PathBuf;

use log::debug;

use crate::{
  config::{ConversionOptions, ConversionRequest},
  error::Result,
  render::{BrowserLauncher, ChromeLauncher},
};

/// Convert with headless Chrome and return the path of the written PDF.
///
/// # Errors
///
/// See [`convert_with`].
pub fn convert(options: ConversionOptions) -> Result<PathBuf> {
  convert_with(&ChromeLauncher, options)
}

/// Convert with browsers started by `launcher`.
///
/// # Errors
///
/// Returns `Validation` for incomplete or malformed options before touching
/// the filesystem, `FileAccess` when an input cannot be read, `Template` when
/// the document cannot be assembled, and the render driver's errors
/// (`RenderTimeout`, `BrowserProcess`, `Io`) while printing.
pub fn convert_with<L: BrowserLauncher>(
  launcher: &L,
  options: ConversionOptions,
) -> Result<PathBuf> {
  let request = ConversionRequest::resolve(options)?;
  debug!("Resolved request: {request:?}");

  let document = html::build_document(&request)?;
  render::render_pdf(launcher, &document, &request)?;
  Ok(request.destination)
}
