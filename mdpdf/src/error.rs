use std::{error::Error as _, io, path::PathBuf, time::Duration};

use mdpdf_utils::StyleLoadError;
use thiserror::Error;

use crate::render::RenderStage;

pub type Result<T> = std::result::Result<T, MdpdfError>;

/// Top-level error type for the mdpdf crate.
#[derive(Debug, Error)]
pub enum MdpdfError {
  /// The request is incomplete or malformed. Raised before any I/O.
  #[error("Invalid request: {0}")]
  Validation(String),

  /// An input file could not be read. The OS error is kept so callers can
  /// tell `NotFound` from `PermissionDenied`.
  #[error("Cannot read {}: {source}", path.display())]
  FileAccess {
    path:   PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("Timed out after {}ms while {stage}", timeout.as_millis())]
  RenderTimeout {
    stage:   RenderStage,
    timeout: Duration,
  },

  #[error("Browser failed while {stage}: {message}")]
  BrowserProcess {
    stage:   RenderStage,
    message: String,
  },

  #[error("Template error: {0}")]
  Template(String),

  #[error("I/O error while {stage}: {source}")]
  Io {
    stage:  RenderStage,
    #[source]
    source: io::Error,
  },

  #[error("Configuration error: {0}")]
  Config(String),
}

impl MdpdfError {
  pub fn file_access(path: impl Into<PathBuf>, source: io::Error) -> Self {
    Self::FileAccess {
      path: path.into(),
      source,
    }
  }

  pub const fn io(stage: RenderStage, source: io::Error) -> Self {
    Self::Io { stage, source }
  }

  /// The render stage the error occurred in, if it came from the driver.
  #[must_use]
  pub const fn stage(&self) -> Option<RenderStage> {
    match self {
      Self::RenderTimeout { stage, .. }
      | Self::BrowserProcess { stage, .. }
      | Self::Io { stage, .. } => Some(*stage),
      _ => None,
    }
  }
}

impl From<tera::Error> for MdpdfError {
  fn from(e: tera::Error) -> Self {
    // Tera keeps the useful part (which variable, which line) in the chain.
    let mut message = e.to_string();
    let mut source = e.source();
    while let Some(cause) = source {
      message.push_str(": ");
      message.push_str(&cause.to_string());
      source = cause.source();
    }
    Self::Template(message)
  }
}

impl From<StyleLoadError> for MdpdfError {
  fn from(e: StyleLoadError) -> Self {
    Self::FileAccess {
      path:   e.path,
      source: e.source,
    }
  }
}

impl From<serde_json::Error> for MdpdfError {
  fn from(e: serde_json::Error) -> Self {
    Self::Config(e.to_string())
  }
}

impl From<toml::de::Error> for MdpdfError {
  fn from(e: toml::de::Error) -> Self {
    Self::Config(e.to_string())
  }
}
