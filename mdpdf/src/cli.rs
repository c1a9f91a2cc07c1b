use std::path::PathBuf;

use clap::Parser;

use crate::{
  config::{
    ConversionOptions,
    Orientation,
    PageFormat,
    SandboxMode,
    WaitUntil,
  },
  error::{MdpdfError, Result},
};

/// Command line interface for mdpdf
#[derive(Parser, Debug)]
#[command(
  author,
  version,
  about = "Convert Markdown to PDF with a headless browser"
)]
pub struct Cli {
  /// Markdown file to convert (.md or .markdown)
  pub source: PathBuf,

  /// Output PDF path. Defaults to the configured destination, then to the
  /// source path with a .pdf extension
  pub destination: Option<PathBuf>,

  /// Extra stylesheet(s), comma separated or repeated. Later sheets win
  #[arg(long = "style", value_delimiter = ',', action = clap::ArgAction::Append)]
  pub styles: Vec<PathBuf>,

  /// HTML file rendered as the header band
  #[arg(long)]
  pub header: Option<PathBuf>,

  /// Height of the header band, e.g. 15mm
  #[arg(long = "h-height")]
  pub header_height: Option<String>,

  /// HTML file rendered as the footer band
  #[arg(long)]
  pub footer: Option<PathBuf>,

  /// Height of the footer band, e.g. 10mm
  #[arg(long = "f-height")]
  pub footer_height: Option<String>,

  /// Margin for all sides (mm, cm, in or px)
  #[arg(long)]
  pub border: Option<String>,

  /// Top margin, overrides --border
  #[arg(long)]
  pub border_top: Option<String>,

  /// Left margin, overrides --border
  #[arg(long)]
  pub border_left: Option<String>,

  /// Bottom margin, overrides --border
  #[arg(long)]
  pub border_bottom: Option<String>,

  /// Right margin, overrides --border
  #[arg(long)]
  pub border_right: Option<String>,

  /// Include the GitHub stylesheet even when --style is given
  #[arg(long)]
  pub gh_style: bool,

  /// Leave :shortcode: emoji untouched
  #[arg(long)]
  pub no_emoji: bool,

  /// Disable syntax highlighting of code blocks
  #[arg(long)]
  pub no_highlight: bool,

  /// Syntax highlighting theme, e.g. InspiredGitHub or Nord
  #[arg(long)]
  pub highlight_theme: Option<String>,

  /// Treat single newlines as line breaks
  #[arg(long)]
  pub simple_line_breaks: bool,

  /// Keep the intermediate HTML next to the source file
  #[arg(long)]
  pub debug: bool,

  /// Paper format: A3, A4, A5, Legal, Letter or Tabloid
  #[arg(long)]
  pub format: Option<PageFormat>,

  /// Page orientation: portrait or landscape
  #[arg(long)]
  pub orientation: Option<Orientation>,

  /// Document title. Defaults to the source file name
  #[arg(long)]
  pub title: Option<String>,

  /// Print timeout in milliseconds
  #[arg(long)]
  pub timeout: Option<u64>,

  /// When the page counts as loaded: load, domcontentloaded, networkidle0
  /// or networkidle2
  #[arg(long)]
  pub wait_until: Option<WaitUntil>,

  /// Browser sandbox: auto, enabled or disabled
  #[arg(long)]
  pub sandbox: Option<SandboxMode>,

  /// Path to configuration file(s) (TOML or JSON, can be specified multiple
  /// times). Multiple files are merged in order, with later files overriding
  /// earlier ones
  #[arg(short = 'c', long = "config", action = clap::ArgAction::Append)]
  pub config_files: Vec<PathBuf>,

  /// Enable verbose debug logging
  #[arg(short, long)]
  pub verbose: bool,
}

impl Cli {
  /// Parse command line arguments into a [`Cli`] struct.
  #[must_use]
  pub fn parse_args() -> Self {
    Self::parse()
  }

  /// Options expressed by the command line. Flags that were not given stay
  /// `None` so configuration files can supply them.
  ///
  /// # Errors
  ///
  /// Returns `Validation` if the source is not a Markdown file.
  pub fn to_options(&self) -> Result<ConversionOptions> {
    let is_markdown = self
      .source
      .extension()
      .and_then(|ext| ext.to_str())
      .is_some_and(|ext| {
        ext.eq_ignore_ascii_case("md") || ext.eq_ignore_ascii_case("markdown")
      });
    if !is_markdown {
      return Err(MdpdfError::Validation(format!(
        "source must be a Markdown file (.md or .markdown): {}",
        self.source.display()
      )));
    }

    let debug = self.debug.then(|| self.source.with_extension("html"));

    let mut options = ConversionOptions {
      source: Some(self.source.clone()),
      destination: self.destination.clone(),
      header: self.header.clone(),
      footer: self.footer.clone(),
      gh_style: self.gh_style.then_some(true),
      styles: self.styles.clone(),
      emoji: self.no_emoji.then_some(false),
      highlight: self.no_highlight.then_some(false),
      highlight_theme: self.highlight_theme.clone(),
      simple_line_breaks: self.simple_line_breaks.then_some(true),
      debug,
      wait_until: self.wait_until,
      sandbox: self.sandbox,
      ..Default::default()
    };

    let pdf = &mut options.pdf;
    pdf.format = self.format;
    pdf.orientation = self.orientation;
    pdf.header_height.clone_from(&self.header_height);
    pdf.footer_height.clone_from(&self.footer_height);
    pdf.title.clone_from(&self.title);
    pdf.timeout = self.timeout;

    let side = |specific: &Option<String>| {
      specific.clone().or_else(|| self.border.clone())
    };
    pdf.border.top = side(&self.border_top);
    pdf.border.left = side(&self.border_left);
    pdf.border.bottom = side(&self.border_bottom);
    pdf.border.right = side(&self.border_right);

    Ok(options)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("mdpdf").chain(args.iter().copied()))
      .expect("valid arguments")
  }

  #[test]
  fn test_unset_flags_stay_unset() {
    let options = parse(&["notes/README.md"]).to_options().expect("valid");
    assert!(options.destination.is_none());
    assert!(options.debug.is_none());
    assert!(options.emoji.is_none());
    assert!(options.gh_style.is_none());
  }

  #[test]
  fn test_source_must_be_markdown() {
    let err = parse(&["notes.txt"]).to_options().expect_err("not markdown");
    assert!(matches!(err, MdpdfError::Validation(_)));
    assert!(parse(&["notes.MARKDOWN"]).to_options().is_ok());
  }

  #[test]
  fn test_flags_map_to_options() {
    let options = parse(&[
      "doc.md",
      "out/doc.pdf",
      "--style",
      "a.css,b.css",
      "--style=c.css",
      "--gh-style",
      "--no-emoji",
      "--no-highlight",
      "--debug",
      "--format",
      "letter",
      "--orientation",
      "landscape",
      "--wait-until",
      "load",
      "--sandbox",
      "disabled",
      "--h-height",
      "15mm",
    ])
    .to_options()
    .expect("valid");

    assert_eq!(options.destination, Some(PathBuf::from("out/doc.pdf")));
    assert_eq!(options.styles, [
      PathBuf::from("a.css"),
      PathBuf::from("b.css"),
      PathBuf::from("c.css")
    ]);
    assert_eq!(options.gh_style, Some(true));
    assert_eq!(options.emoji, Some(false));
    assert_eq!(options.highlight, Some(false));
    assert_eq!(options.debug, Some(PathBuf::from("doc.html")));
    assert_eq!(options.pdf.format, Some(PageFormat::Letter));
    assert_eq!(options.pdf.orientation, Some(Orientation::Landscape));
    assert_eq!(options.wait_until, Some(WaitUntil::Load));
    assert_eq!(options.sandbox, Some(SandboxMode::Disabled));
    assert_eq!(options.pdf.header_height.as_deref(), Some("15mm"));
  }

  #[test]
  fn test_specific_border_overrides_all() {
    let options = parse(&["doc.md", "--border", "1cm", "--border-top", "2in"])
      .to_options()
      .expect("valid");
    assert_eq!(options.pdf.border.top.as_deref(), Some("2in"));
    assert_eq!(options.pdf.border.left.as_deref(), Some("1cm"));
    assert_eq!(options.pdf.border.bottom.as_deref(), Some("1cm"));
    assert_eq!(options.pdf.border.right.as_deref(), Some("1cm"));
  }

  #[test]
  fn test_invalid_format_is_a_parse_error() {
    let result = Cli::try_parse_from(["mdpdf", "doc.md", "--format", "B5"]);
    assert!(result.is_err());
  }
}
