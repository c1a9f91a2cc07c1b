//! Turning a resolved request into a printable document.
pub mod styles;
pub mod template;

use std::fs;

use log::{debug, info};
use mdpdf_commonmark::{MarkdownProcessor, SyntaxError, process_with_recovery};
use mdpdf_utils::qualify_img_sources;
pub use template::{BandKind, RenderedDocument, Templates, TrustedHtml};

use crate::{
  config::ConversionRequest,
  error::{MdpdfError, Result},
};

/// Build the final document for `request`.
///
/// Styles are loaded first; the source file, header band and footer band are
/// then prepared concurrently and joined before the body is rendered.
///
/// # Errors
///
/// Returns `FileAccess` if the source, a band or a stylesheet cannot be
/// read, `Validation` for an unknown highlight theme, and `Template` if a
/// template fails to render.
pub fn build_document(request: &ConversionRequest) -> Result<RenderedDocument> {
  let processor = MarkdownProcessor::new(request.markdown_options());

  let theme_css = match processor.theme_css() {
    None => None,
    Some(Ok(css)) => Some(css),
    Some(Err(SyntaxError::ThemeNotFound(theme))) => {
      return Err(MdpdfError::Validation(format!(
        "unknown highlight theme `{theme}`"
      )));
    },
    Some(Err(e)) => {
      log::warn!("Highlight theme stylesheet unavailable: {e}");
      None
    },
  };

  let styles = styles::style_set(request, theme_css).load()?;
  let templates = Templates::new()?;

  let (markdown, (header, footer)) = rayon::join(
    || {
      fs::read_to_string(&request.source)
        .map_err(|e| MdpdfError::file_access(&request.source, e))
    },
    || {
      rayon::join(
        || {
          templates.prepare_band(
            request.header.as_deref(),
            &styles.style_block,
            &request.asset_dir,
            BandKind::Header,
          )
        },
        || {
          templates.prepare_band(
            request.footer.as_deref(),
            &styles.style_block,
            &request.asset_dir,
            BandKind::Footer,
          )
        },
      )
    },
  );
  let markdown = markdown?;
  let header = header?;
  let footer = footer?;

  info!("Rendering {}", request.source.display());
  let rendered = process_with_recovery(&processor, &markdown);
  debug!(
    "Rendered {} bytes of HTML with {} headings",
    rendered.html.len(),
    rendered.headers.len()
  );
  let body = qualify_img_sources(&rendered.html, &request.asset_dir);

  let title = request.title();
  let html = templates.render_document(
    &TrustedHtml::new(styles.style_block),
    &TrustedHtml::new(body),
    &title,
  )?;

  Ok(RenderedDocument {
    html,
    header,
    footer,
    title,
  })
}
