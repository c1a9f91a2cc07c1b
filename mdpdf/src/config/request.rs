use std::{
  env,
  ffi::OsString,
  path::{Path, PathBuf},
  time::Duration,
};

use log::{debug, warn};
use mdpdf_commonmark::MarkdownOptions;

use super::{
  ConversionOptions,
  Length,
  Margins,
  PageSpec,
  SandboxMode,
  WaitUntil,
  page::{default_margin, default_timeout},
};
use crate::error::{MdpdfError, Result};

/// Default stylesheet used when no `styles` are given.
pub const STYLES_ENV: &str = "MDPDF_STYLES";
/// Browser executable override.
pub const BROWSER_PATH_ENV: &str = "MDPDF_BROWSER_PATH";

/// The complete, resolved configuration for one conversion.
///
/// All paths are absolute. Nothing here changes once the request has been
/// resolved.
#[derive(Debug, Clone, PartialEq)]
#[allow(
  clippy::struct_excessive_bools,
  reason = "Independent feature toggles"
)]
pub struct ConversionRequest {
  pub source:             PathBuf,
  pub destination:        PathBuf,
  pub asset_dir:          PathBuf,
  pub header:             Option<PathBuf>,
  pub footer:             Option<PathBuf>,
  pub default_style:      bool,
  pub gh_style:           bool,
  pub styles:             Vec<PathBuf>,
  pub emoji:              bool,
  pub highlight:          bool,
  pub highlight_theme:    Option<String>,
  pub simple_line_breaks: bool,
  pub debug:              Option<PathBuf>,
  pub wait_until:         WaitUntil,
  pub sandbox:            SandboxMode,
  pub browser_path:       Option<PathBuf>,
  pub page:               PageSpec,
}

impl ConversionRequest {
  /// Validate `options` and apply defaults, reading the `MDPDF_*`
  /// environment variables.
  ///
  /// # Errors
  ///
  /// Returns `Validation` if the source or destination is missing or a
  /// length or timeout is malformed. No files are touched.
  pub fn resolve(options: ConversionOptions) -> Result<Self> {
    Self::resolve_with_env(options, |key| env::var_os(key))
  }

  /// Like [`Self::resolve`], with an explicit environment lookup.
  ///
  /// # Errors
  ///
  /// See [`Self::resolve`].
  pub fn resolve_with_env<F>(options: ConversionOptions, env: F) -> Result<Self>
  where
    F: Fn(&str) -> Option<OsString>,
  {
    let source = required(options.source, "source")?;
    let destination = required(options.destination, "destination")?;

    let asset_dir = match options.asset_dir {
      Some(dir) => absolute(&dir)?,
      None => {
        source
          .parent()
          .map_or_else(|| PathBuf::from("/"), Path::to_path_buf)
      },
    };

    let mut styles = options
      .styles
      .iter()
      .map(|path| absolute(path))
      .collect::<Result<Vec<_>>>()?;
    if styles.is_empty() {
      if let Some(path) = env(STYLES_ENV).filter(|value| !value.is_empty()) {
        let path = PathBuf::from(path);
        if path.is_file() {
          debug!("Using stylesheet from {STYLES_ENV}: {}", path.display());
          styles.push(absolute(&path)?);
        } else {
          debug!(
            "Ignoring {STYLES_ENV}, {} is not a file",
            path.display()
          );
        }
      }
    }
    let gh_style = options.gh_style.unwrap_or(styles.is_empty());

    let browser_path = options
      .browser_path
      .or_else(|| env(BROWSER_PATH_ENV).map(PathBuf::from))
      .filter(|path| !path.as_os_str().is_empty())
      .and_then(|path| {
        if path.is_file() {
          Some(path)
        } else {
          warn!(
            "Browser executable {} does not exist, falling back to \
             auto-detection",
            path.display()
          );
          None
        }
      });

    Ok(Self {
      source,
      destination,
      asset_dir,
      header: options.header.as_deref().map(absolute).transpose()?,
      footer: options.footer.as_deref().map(absolute).transpose()?,
      default_style: options.default_style.unwrap_or(true),
      gh_style,
      styles,
      emoji: options.emoji.unwrap_or(true),
      highlight: options.highlight.unwrap_or(true),
      highlight_theme: options.highlight_theme,
      simple_line_breaks: options.simple_line_breaks.unwrap_or(false),
      debug: options.debug.as_deref().map(absolute).transpose()?,
      wait_until: options.wait_until.unwrap_or_default(),
      sandbox: options.sandbox.unwrap_or_default(),
      browser_path,
      page: resolve_page(options.pdf)?,
    })
  }

  /// Title of the rendered document: the configured title, or the source
  /// file name without its extension.
  #[must_use]
  pub fn title(&self) -> String {
    self.page.title.clone().unwrap_or_else(|| {
      self
        .source
        .file_stem()
        .map_or_else(String::new, |stem| stem.to_string_lossy().into_owned())
    })
  }

  /// Renderer configuration for this request.
  #[must_use]
  pub fn markdown_options(&self) -> MarkdownOptions {
    MarkdownOptions {
      highlight_code: self.highlight,
      highlight_theme: self.highlight_theme.clone(),
      emoji: self.emoji,
      simple_line_breaks: self.simple_line_breaks,
      ..MarkdownOptions::default()
    }
  }
}

fn required(path: Option<PathBuf>, name: &str) -> Result<PathBuf> {
  let path = path
    .filter(|path| !path.as_os_str().is_empty())
    .ok_or_else(|| MdpdfError::Validation(format!("{name} must be provided")))?;
  absolute(&path)
}

fn absolute(path: &Path) -> Result<PathBuf> {
  std::path::absolute(path).map_err(|e| {
    MdpdfError::Validation(format!(
      "cannot resolve path {}: {e}",
      path.display()
    ))
  })
}

fn length(value: Option<&str>, name: &str) -> Result<Option<Length>> {
  value
    .map(|value| {
      value
        .parse::<Length>()
        .map_err(|e| MdpdfError::Validation(format!("{name}: {e}")))
    })
    .transpose()
}

fn timeout(value: Option<u64>, name: &str) -> Result<Duration> {
  match value {
    None => Ok(default_timeout()),
    Some(0) => {
      Err(MdpdfError::Validation(format!(
        "{name} must be greater than zero"
      )))
    },
    Some(ms) => Ok(Duration::from_millis(ms)),
  }
}

fn resolve_page(pdf: super::PdfOptions) -> Result<PageSpec> {
  let border = &pdf.border;
  let margins = Margins {
    top:    length(border.top.as_deref(), "top border")?
      .unwrap_or_else(default_margin),
    left:   length(border.left.as_deref(), "left border")?
      .unwrap_or_else(default_margin),
    bottom: length(border.bottom.as_deref(), "bottom border")?
      .unwrap_or_else(default_margin),
    right:  length(border.right.as_deref(), "right border")?
      .unwrap_or_else(default_margin),
  };

  Ok(PageSpec {
    format: pdf.format.unwrap_or_default(),
    orientation: pdf.orientation.unwrap_or_default(),
    margins,
    header_height: length(pdf.header_height.as_deref(), "header height")?,
    footer_height: length(pdf.footer_height.as_deref(), "footer height")?,
    title: pdf.title,
    timeout: timeout(pdf.timeout, "timeout")?,
    navigation_timeout: timeout(pdf.navigation_timeout, "navigation timeout")?,
  })
}

#[cfg(test)]
mod tests {
  use std::fs;

  use super::*;
  use crate::config::{Orientation, PageFormat};

  fn no_env(_: &str) -> Option<OsString> {
    None
  }

  fn options(source: &str, destination: &str) -> ConversionOptions {
    ConversionOptions {
      source: Some(PathBuf::from(source)),
      destination: Some(PathBuf::from(destination)),
      ..Default::default()
    }
  }

  #[test]
  fn test_missing_source_is_rejected() {
    let opts = ConversionOptions {
      destination: Some(PathBuf::from("out.pdf")),
      ..Default::default()
    };
    let err = ConversionRequest::resolve_with_env(opts, no_env)
      .expect_err("source is required");
    assert!(matches!(err, MdpdfError::Validation(ref msg) if msg.contains("source")));
  }

  #[test]
  fn test_missing_destination_is_rejected() {
    let opts = ConversionOptions {
      source: Some(PathBuf::from("in.md")),
      destination: Some(PathBuf::new()),
      ..Default::default()
    };
    let err = ConversionRequest::resolve_with_env(opts, no_env)
      .expect_err("destination is required");
    assert!(
      matches!(err, MdpdfError::Validation(ref msg) if msg.contains("destination"))
    );
  }

  #[test]
  fn test_defaults() {
    let request = ConversionRequest::resolve_with_env(
      options("/docs/guide.md", "/out/guide.pdf"),
      no_env,
    )
    .expect("valid request");

    assert_eq!(request.asset_dir, PathBuf::from("/docs"));
    assert!(request.default_style);
    assert!(request.gh_style);
    assert!(request.emoji);
    assert!(request.highlight);
    assert!(!request.simple_line_breaks);
    assert_eq!(request.wait_until, WaitUntil::NetworkIdle0);
    assert_eq!(request.sandbox, SandboxMode::Auto);
    assert_eq!(request.page.format, PageFormat::A4);
    assert_eq!(request.page.orientation, Orientation::Portrait);
    assert_eq!(request.page.margins, Margins::default());
    assert_eq!(request.title(), "guide");
  }

  #[test]
  fn test_relative_paths_become_absolute() {
    let request =
      ConversionRequest::resolve_with_env(options("in.md", "out.pdf"), no_env)
        .expect("valid request");
    assert!(request.source.is_absolute());
    assert!(request.destination.is_absolute());
    assert!(request.asset_dir.is_absolute());
  }

  #[test]
  fn test_user_styles_disable_github_style() {
    let mut opts = options("/a.md", "/a.pdf");
    opts.styles = vec![PathBuf::from("/custom.css")];
    let request = ConversionRequest::resolve_with_env(opts.clone(), no_env)
      .expect("valid request");
    assert!(!request.gh_style);

    opts.gh_style = Some(true);
    let request = ConversionRequest::resolve_with_env(opts, no_env)
      .expect("valid request");
    assert!(request.gh_style);
  }

  #[test]
  fn test_styles_env_only_when_file_exists() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let css = dir.path().join("env.css");

    let lookup = |key: &str| {
      (key == STYLES_ENV).then(|| css.clone().into_os_string())
    };

    let request =
      ConversionRequest::resolve_with_env(options("/a.md", "/a.pdf"), lookup)
        .expect("valid request");
    assert!(request.styles.is_empty());
    assert!(request.gh_style);

    fs::write(&css, "body {}").expect("Failed to write css");
    let request =
      ConversionRequest::resolve_with_env(options("/a.md", "/a.pdf"), lookup)
        .expect("valid request");
    assert_eq!(request.styles, [css.clone()]);
    assert!(!request.gh_style);
  }

  #[test]
  fn test_missing_browser_override_is_ignored() {
    let lookup = |key: &str| {
      (key == BROWSER_PATH_ENV).then(|| OsString::from("/nonexistent/chrome"))
    };
    let request =
      ConversionRequest::resolve_with_env(options("/a.md", "/a.pdf"), lookup)
        .expect("valid request");
    assert!(request.browser_path.is_none());
  }

  #[test]
  fn test_lengths_need_units() {
    let mut opts = options("/a.md", "/a.pdf");
    opts.pdf.border.top = Some("20".to_string());
    let err = ConversionRequest::resolve_with_env(opts, no_env)
      .expect_err("unitless length");
    assert!(matches!(err, MdpdfError::Validation(ref msg) if msg.contains("top")));

    let mut opts = options("/a.md", "/a.pdf");
    opts.pdf.header_height = Some("15mm".to_string());
    opts.pdf.border.left = Some("1in".to_string());
    let request = ConversionRequest::resolve_with_env(opts, no_env)
      .expect("valid lengths");
    assert_eq!(request.page.header_height, Some(Length::mm(15.0)));
    assert_eq!(request.page.margins.left.to_string(), "1in");
    assert_eq!(request.page.margins.right, Length::mm(20.0));
  }

  #[test]
  fn test_zero_timeout_is_rejected() {
    let mut opts = options("/a.md", "/a.pdf");
    opts.pdf.timeout = Some(0);
    assert!(matches!(
      ConversionRequest::resolve_with_env(opts, no_env),
      Err(MdpdfError::Validation(_))
    ));
  }
}
