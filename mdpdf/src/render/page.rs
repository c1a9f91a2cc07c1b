use crate::config::{Length, Orientation, PageSpec};

/// Empty band template. An empty string makes Chrome fall back to its own
/// date/title band, so a missing band is drawn as an empty element instead.
const BLANK_BAND: &str = "<span></span>";

/// Backend-neutral print parameters. Lengths are in inches.
#[derive(Debug, Clone, PartialEq)]
pub struct PrintSettings {
  pub landscape:             bool,
  pub paper_width:           f64,
  pub paper_height:          f64,
  pub margin_top:            f64,
  pub margin_bottom:         f64,
  pub margin_left:           f64,
  pub margin_right:          f64,
  pub display_header_footer: bool,
  pub header_template:       String,
  pub footer_template:       String,
  pub print_background:      bool,
}

impl PrintSettings {
  /// Translate page geometry and prepared bands into print parameters.
  ///
  /// Bands are displayed when either one has content. A band's height is
  /// added to the margin on its side so it does not overlap the body.
  #[must_use]
  pub fn new(page: &PageSpec, header: &str, footer: &str) -> Self {
    let (paper_width, paper_height) = page.format.dimensions();
    let display_header_footer = !header.is_empty() || !footer.is_empty();

    let band_height = |content: &str, height: Option<Length>| {
      if content.is_empty() {
        0.0
      } else {
        height.map_or(0.0, |h| h.to_inches())
      }
    };
    let band_template = |content: &str| {
      if content.is_empty() {
        BLANK_BAND.to_string()
      } else {
        content.to_string()
      }
    };

    Self {
      landscape: page.orientation == Orientation::Landscape,
      paper_width,
      paper_height,
      margin_top: page.margins.top.to_inches()
        + band_height(header, page.header_height),
      margin_bottom: page.margins.bottom.to_inches()
        + band_height(footer, page.footer_height),
      margin_left: page.margins.left.to_inches(),
      margin_right: page.margins.right.to_inches(),
      display_header_footer,
      header_template: band_template(header),
      footer_template: band_template(footer),
      print_background: true,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::PageFormat;

  fn assert_close(a: f64, b: f64) {
    assert!((a - b).abs() < 1e-9, "{a} != {b}");
  }

  #[test]
  fn test_defaults_without_bands() {
    let settings = PrintSettings::new(&PageSpec::default(), "", "");
    assert!(!settings.landscape);
    assert!(!settings.display_header_footer);
    assert!(settings.print_background);
    assert_close(settings.paper_width, 8.27);
    assert_close(settings.paper_height, 11.7);
    assert_close(settings.margin_top, 20.0 / 25.4);
    assert_close(settings.margin_right, 20.0 / 25.4);
  }

  #[test]
  fn test_bands_extend_margins() {
    let page = PageSpec {
      format: PageFormat::Letter,
      orientation: Orientation::Landscape,
      header_height: Some(Length::mm(10.0)),
      footer_height: Some(Length::mm(5.0)),
      ..PageSpec::default()
    };

    let settings = PrintSettings::new(&page, "<b>head</b>", "");
    assert!(settings.landscape);
    assert!(settings.display_header_footer);
    assert_eq!(settings.header_template, "<b>head</b>");
    assert_eq!(settings.footer_template, BLANK_BAND);
    assert_close(settings.margin_top, 30.0 / 25.4);
    // No footer content, so its height is not reserved.
    assert_close(settings.margin_bottom, 20.0 / 25.4);
    assert_close(settings.paper_width, 8.5);
  }
}
