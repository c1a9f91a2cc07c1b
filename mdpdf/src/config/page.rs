//! Page geometry: paper formats, orientation and CSS-style lengths.
use std::{fmt, str::FromStr, sync::LazyLock, time::Duration};

use regex::Regex;
use serde::Deserialize;

static LENGTH_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^\s*(\d+(?:\.\d+)?|\.\d+)\s*(mm|cm|in|px)\s*$").unwrap_or_else(
    |e| {
      log::error!(
        "Failed to compile LENGTH_RE regex: {e}\n Falling back to never \
         matching regex."
      );
      #[allow(
        clippy::expect_used,
        reason = "This pattern is guaranteed to be valid"
      )]
      Regex::new(r"[^\s\S]")
        .expect("regex pattern [^\\s\\S] should always compile")
    },
  )
});

/// Unit of a [`Length`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthUnit {
  Millimeters,
  Centimeters,
  Inches,
  Pixels,
}

impl LengthUnit {
  const fn suffix(self) -> &'static str {
    match self {
      Self::Millimeters => "mm",
      Self::Centimeters => "cm",
      Self::Inches => "in",
      Self::Pixels => "px",
    }
  }
}

/// A length such as `20mm` or `0.5in`. The unit is mandatory.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(try_from = "String")]
pub struct Length {
  value: f64,
  unit:  LengthUnit,
}

impl Length {
  #[must_use]
  pub const fn new(value: f64, unit: LengthUnit) -> Self {
    Self { value, unit }
  }

  #[must_use]
  pub const fn mm(value: f64) -> Self {
    Self::new(value, LengthUnit::Millimeters)
  }

  /// Convert to inches, the unit the browser's print API expects.
  /// Pixels are CSS pixels (96 per inch).
  #[must_use]
  pub fn to_inches(self) -> f64 {
    match self.unit {
      LengthUnit::Millimeters => self.value / 25.4,
      LengthUnit::Centimeters => self.value / 2.54,
      LengthUnit::Inches => self.value,
      LengthUnit::Pixels => self.value / 96.0,
    }
  }
}

impl FromStr for Length {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let invalid = || {
      format!(
        "invalid length `{s}`: expected a number followed by mm, cm, in or px"
      )
    };
    let caps = LENGTH_RE.captures(s).ok_or_else(invalid)?;

    let value = caps[1].parse::<f64>().map_err(|_| invalid())?;
    let unit = match &caps[2] {
      "mm" => LengthUnit::Millimeters,
      "cm" => LengthUnit::Centimeters,
      "in" => LengthUnit::Inches,
      _ => LengthUnit::Pixels,
    };
    Ok(Self { value, unit })
  }
}

impl TryFrom<String> for Length {
  type Error = String;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    value.parse()
  }
}

impl fmt::Display for Length {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}{}", self.value, self.unit.suffix())
  }
}

/// Paper format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum PageFormat {
  A3,
  #[default]
  A4,
  A5,
  Legal,
  Letter,
  Tabloid,
}

impl PageFormat {
  /// Portrait paper size in inches, `(width, height)`.
  #[must_use]
  pub const fn dimensions(self) -> (f64, f64) {
    match self {
      Self::A3 => (11.7, 16.54),
      Self::A4 => (8.27, 11.7),
      Self::A5 => (5.83, 8.27),
      Self::Legal => (8.5, 14.0),
      Self::Letter => (8.5, 11.0),
      Self::Tabloid => (11.0, 17.0),
    }
  }
}

impl FromStr for PageFormat {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_ascii_lowercase().as_str() {
      "a3" => Ok(Self::A3),
      "a4" => Ok(Self::A4),
      "a5" => Ok(Self::A5),
      "legal" => Ok(Self::Legal),
      "letter" => Ok(Self::Letter),
      "tabloid" => Ok(Self::Tabloid),
      _ => {
        Err(format!(
          "unknown page format `{s}` (expected A3, A4, A5, Legal, Letter or \
           Tabloid)"
        ))
      },
    }
  }
}

impl TryFrom<String> for PageFormat {
  type Error = String;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    value.parse()
  }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum Orientation {
  #[default]
  Portrait,
  Landscape,
}

impl FromStr for Orientation {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_ascii_lowercase().as_str() {
      "portrait" => Ok(Self::Portrait),
      "landscape" => Ok(Self::Landscape),
      _ => {
        Err(format!(
          "unknown orientation `{s}` (expected portrait or landscape)"
        ))
      },
    }
  }
}

impl TryFrom<String> for Orientation {
  type Error = String;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    value.parse()
  }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
  pub top:    Length,
  pub left:   Length,
  pub bottom: Length,
  pub right:  Length,
}

impl Margins {
  #[must_use]
  pub const fn uniform(length: Length) -> Self {
    Self {
      top:    length,
      left:   length,
      bottom: length,
      right:  length,
    }
  }
}

impl Default for Margins {
  fn default() -> Self {
    Self::uniform(default_margin())
  }
}

#[must_use]
pub const fn default_margin() -> Length {
  Length::mm(20.0)
}

#[must_use]
pub const fn default_timeout() -> Duration {
  Duration::from_millis(30_000)
}

/// Resolved page geometry for one conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct PageSpec {
  pub format:             PageFormat,
  pub orientation:        Orientation,
  pub margins:            Margins,
  pub header_height:      Option<Length>,
  pub footer_height:      Option<Length>,
  /// Document title; the source file stem is used when absent.
  pub title:              Option<String>,
  /// Upper bound for printing.
  pub timeout:            Duration,
  /// Upper bound for loading the document.
  pub navigation_timeout: Duration,
}

impl Default for PageSpec {
  fn default() -> Self {
    Self {
      format:             PageFormat::default(),
      orientation:        Orientation::default(),
      margins:            Margins::default(),
      header_height:      None,
      footer_height:      None,
      title:              None,
      timeout:            default_timeout(),
      navigation_timeout: default_timeout(),
    }
  }
}
