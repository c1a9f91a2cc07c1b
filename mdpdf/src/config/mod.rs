pub mod browser;
pub mod page;
pub mod request;

use std::{
  fs,
  path::{Path, PathBuf},
};

pub use browser::{SandboxMode, WaitUntil};
pub use page::{Length, Margins, Orientation, PageFormat, PageSpec};
pub use request::ConversionRequest;
use serde::Deserialize;

use crate::{
  cli::Cli,
  error::{MdpdfError, Result},
};

/// Page margins as written by the user. Parsed into [`Length`]s when the
/// request is resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BorderOptions {
  pub top:    Option<String>,
  pub left:   Option<String>,
  pub bottom: Option<String>,
  pub right:  Option<String>,
}

/// Page options, nested under `[pdf]` in configuration files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PdfOptions {
  pub format:             Option<PageFormat>,
  pub orientation:        Option<Orientation>,
  pub border:             BorderOptions,
  pub header_height:      Option<String>,
  pub footer_height:      Option<String>,
  pub title:              Option<String>,
  /// Print timeout in milliseconds.
  pub timeout:            Option<u64>,
  /// Navigation timeout in milliseconds.
  pub navigation_timeout: Option<u64>,
}

/// Options for one conversion, as supplied by configuration files, the CLI
/// or a library caller. Every field is optional; defaults are applied by
/// [`ConversionRequest::resolve`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConversionOptions {
  /// Markdown file to convert
  pub source:             Option<PathBuf>,
  /// Where to write the PDF
  pub destination:        Option<PathBuf>,
  /// Directory relative image paths are resolved against. Defaults to the
  /// directory of the source file.
  pub asset_dir:          Option<PathBuf>,
  /// HTML file rendered as the header band
  pub header:             Option<PathBuf>,
  /// HTML file rendered as the footer band
  pub footer:             Option<PathBuf>,
  /// Include the built-in base stylesheet
  pub default_style:      Option<bool>,
  /// Include the GitHub Markdown stylesheet. Defaults to `true` only when no
  /// user stylesheet is given.
  pub gh_style:           Option<bool>,
  /// User stylesheets, applied last in the given order
  pub styles:             Vec<PathBuf>,
  pub emoji:              Option<bool>,
  pub highlight:          Option<bool>,
  pub highlight_theme:    Option<String>,
  pub simple_line_breaks: Option<bool>,
  /// Keep a copy of the intermediate HTML document at this path
  pub debug:              Option<PathBuf>,
  pub wait_until:         Option<WaitUntil>,
  pub sandbox:            Option<SandboxMode>,
  /// Browser executable to use instead of the auto-detected one
  pub browser_path:       Option<PathBuf>,
  pub pdf:                PdfOptions,
}

fn overlay<T>(slot: &mut Option<T>, value: Option<T>) {
  if value.is_some() {
    *slot = value;
  }
}

impl ConversionOptions {
  /// Create options from a file.
  /// Only TOML and JSON are supported for the time being.
  ///
  /// # Errors
  ///
  /// Returns `FileAccess` if the file cannot be read and `Config` if it
  /// cannot be parsed.
  pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
      .map_err(|e| MdpdfError::file_access(path, e))?;

    let extension = path
      .extension()
      .and_then(|ext| ext.to_str())
      .map(str::to_lowercase);

    match extension.as_deref() {
      Some("json") => {
        serde_json::from_str(&content).map_err(|e| {
          MdpdfError::Config(format!(
            "Failed to parse JSON config from {}: {e}",
            path.display()
          ))
        })
      },
      Some("toml") => {
        toml::from_str(&content).map_err(|e| {
          MdpdfError::Config(format!(
            "Failed to parse TOML config from {}: {e}",
            path.display()
          ))
        })
      },
      Some(_) => {
        Err(MdpdfError::Config(format!(
          "Unsupported config file format: {}",
          path.display()
        )))
      },
      None => {
        Err(MdpdfError::Config(format!(
          "Config file has no extension: {}",
          path.display()
        )))
      },
    }
  }

  /// Load options from configuration files and CLI arguments.
  ///
  /// Files are merged in the order given, later ones overriding earlier
  /// ones; command line flags override every file. Without a destination
  /// from either, the PDF goes next to the source.
  ///
  /// # Errors
  ///
  /// Returns an error if a configuration file cannot be read or parsed, or
  /// if the command line is invalid.
  pub fn load(cli: &Cli) -> Result<Self> {
    let mut options = Self::default();
    for path in &cli.config_files {
      log::debug!("Loading configuration from {}", path.display());
      options.merge(Self::from_file(path)?);
    }
    options.merge(cli.to_options()?);
    if options.destination.is_none() {
      options.destination =
        options.source.as_ref().map(|source| source.with_extension("pdf"));
    }
    Ok(options)
  }

  /// Merge `other` into `self`. Values present in `other` win; stylesheets
  /// are appended.
  pub fn merge(&mut self, other: Self) {
    let Self {
      source,
      destination,
      asset_dir,
      header,
      footer,
      default_style,
      gh_style,
      styles,
      emoji,
      highlight,
      highlight_theme,
      simple_line_breaks,
      debug,
      wait_until,
      sandbox,
      browser_path,
      pdf,
    } = other;

    overlay(&mut self.source, source);
    overlay(&mut self.destination, destination);
    overlay(&mut self.asset_dir, asset_dir);
    overlay(&mut self.header, header);
    overlay(&mut self.footer, footer);
    overlay(&mut self.default_style, default_style);
    overlay(&mut self.gh_style, gh_style);
    self.styles.extend(styles);
    overlay(&mut self.emoji, emoji);
    overlay(&mut self.highlight, highlight);
    overlay(&mut self.highlight_theme, highlight_theme);
    overlay(&mut self.simple_line_breaks, simple_line_breaks);
    overlay(&mut self.debug, debug);
    overlay(&mut self.wait_until, wait_until);
    overlay(&mut self.sandbox, sandbox);
    overlay(&mut self.browser_path, browser_path);
    self.pdf.merge(pdf);
  }
}

impl PdfOptions {
  pub fn merge(&mut self, other: Self) {
    overlay(&mut self.format, other.format);
    overlay(&mut self.orientation, other.orientation);
    overlay(&mut self.border.top, other.border.top);
    overlay(&mut self.border.left, other.border.left);
    overlay(&mut self.border.bottom, other.border.bottom);
    overlay(&mut self.border.right, other.border.right);
    overlay(&mut self.header_height, other.header_height);
    overlay(&mut self.footer_height, other.footer_height);
    overlay(&mut self.title, other.title);
    overlay(&mut self.timeout, other.timeout);
    overlay(&mut self.navigation_timeout, other.navigation_timeout);
  }
}

#[cfg(test)]
mod tests {
  use clap::Parser;

  use super::*;

  #[test]
  fn test_toml_config() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("mdpdf.toml");
    fs::write(
      &path,
      r#"
source = "README.md"
styles = ["print.css"]
emoji = false
wait_until = "networkidle2"

[pdf]
format = "Letter"
orientation = "landscape"
timeout = 5000

[pdf.border]
top = "1in"
"#,
    )
    .expect("Failed to write config");

    let options = ConversionOptions::from_file(&path).expect("valid config");
    assert_eq!(options.source, Some(PathBuf::from("README.md")));
    assert_eq!(options.styles, [PathBuf::from("print.css")]);
    assert_eq!(options.emoji, Some(false));
    assert_eq!(options.wait_until, Some(WaitUntil::NetworkIdle2));
    assert_eq!(options.pdf.format, Some(PageFormat::Letter));
    assert_eq!(options.pdf.orientation, Some(Orientation::Landscape));
    assert_eq!(options.pdf.timeout, Some(5000));
    assert_eq!(options.pdf.border.top.as_deref(), Some("1in"));
    assert!(options.pdf.border.left.is_none());
  }

  #[test]
  fn test_json_config() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("mdpdf.json");
    fs::write(&path, r#"{ "gh_style": true, "pdf": { "format": "a5" } }"#)
      .expect("Failed to write config");

    let options = ConversionOptions::from_file(&path).expect("valid config");
    assert_eq!(options.gh_style, Some(true));
    assert_eq!(options.pdf.format, Some(PageFormat::A5));
  }

  #[test]
  fn test_invalid_config_values() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("bad.toml");
    fs::write(&path, "[pdf]\nformat = \"B7\"\n").expect("write");
    assert!(matches!(
      ConversionOptions::from_file(&path),
      Err(MdpdfError::Config(_))
    ));

    let yaml = dir.path().join("config.yaml");
    fs::write(&yaml, "emoji: false\n").expect("write");
    assert!(matches!(
      ConversionOptions::from_file(&yaml),
      Err(MdpdfError::Config(_))
    ));

    assert!(matches!(
      ConversionOptions::from_file(dir.path().join("missing.toml")),
      Err(MdpdfError::FileAccess { .. })
    ));
  }

  #[test]
  fn test_merge_prefers_later_values() {
    let mut base = ConversionOptions {
      source: Some(PathBuf::from("a.md")),
      emoji: Some(false),
      styles: vec![PathBuf::from("one.css")],
      ..Default::default()
    };
    base.pdf.title = Some("Base".to_string());

    let mut overrides = ConversionOptions {
      emoji: Some(true),
      styles: vec![PathBuf::from("two.css")],
      ..Default::default()
    };
    overrides.pdf.format = Some(PageFormat::Legal);

    base.merge(overrides);
    assert_eq!(base.source, Some(PathBuf::from("a.md")));
    assert_eq!(base.emoji, Some(true));
    assert_eq!(base.styles, [
      PathBuf::from("one.css"),
      PathBuf::from("two.css")
    ]);
    assert_eq!(base.pdf.title.as_deref(), Some("Base"));
    assert_eq!(base.pdf.format, Some(PageFormat::Legal));
  }

  fn cli(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("mdpdf").chain(args.iter().copied()))
      .expect("valid arguments")
  }

  #[test]
  fn test_load_keeps_config_destination() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("mdpdf.toml");
    fs::write(&path, "destination = \"out/custom.pdf\"\n")
      .expect("Failed to write config");
    let config = path.to_str().expect("utf-8 path");

    let options =
      ConversionOptions::load(&cli(&["doc.md", "-c", config])).expect("loads");
    assert_eq!(options.destination, Some(PathBuf::from("out/custom.pdf")));

    let options =
      ConversionOptions::load(&cli(&["doc.md", "given.pdf", "-c", config]))
        .expect("loads");
    assert_eq!(options.destination, Some(PathBuf::from("given.pdf")));
  }

  #[test]
  fn test_load_defaults_destination_to_source() {
    let options =
      ConversionOptions::load(&cli(&["notes/README.md"])).expect("loads");
    assert_eq!(options.source, Some(PathBuf::from("notes/README.md")));
    assert_eq!(options.destination, Some(PathBuf::from("notes/README.pdf")));
  }
}
