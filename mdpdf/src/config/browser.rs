//! Browser-facing settings.
use std::{path::Path, str::FromStr};

use serde::Deserialize;

/// When navigation counts as finished.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum WaitUntil {
  /// The `load` event fired.
  Load,
  /// The `DOMContentLoaded` event fired.
  DomContentLoaded,
  /// No resource activity for 500ms.
  #[default]
  NetworkIdle0,
  /// At most two resources still loading, quiet for 500ms.
  NetworkIdle2,
}

impl WaitUntil {
  /// Resources allowed in flight for the network-idle policies.
  #[must_use]
  pub const fn max_inflight(self) -> Option<usize> {
    match self {
      Self::Load | Self::DomContentLoaded => None,
      Self::NetworkIdle0 => Some(0),
      Self::NetworkIdle2 => Some(2),
    }
  }
}

impl FromStr for WaitUntil {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_ascii_lowercase().as_str() {
      "load" => Ok(Self::Load),
      "domcontentloaded" => Ok(Self::DomContentLoaded),
      "networkidle0" => Ok(Self::NetworkIdle0),
      "networkidle2" => Ok(Self::NetworkIdle2),
      _ => {
        Err(format!(
          "unknown wait policy `{s}` (expected load, domcontentloaded, \
           networkidle0 or networkidle2)"
        ))
      },
    }
  }
}

impl TryFrom<String> for WaitUntil {
  type Error = String;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    value.parse()
  }
}

/// Whether Chrome runs with its process sandbox.
///
/// Chrome refuses to start sandboxed as root, and most container runtimes
/// lack the kernel features the sandbox needs. `Auto` turns the sandbox off
/// in those two cases only; the rendered content is then not isolated from
/// the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum SandboxMode {
  #[default]
  Auto,
  Enabled,
  Disabled,
}

impl SandboxMode {
  /// Decide for the current host.
  #[must_use]
  pub fn is_enabled(self) -> bool {
    match self {
      Self::Enabled => true,
      Self::Disabled => false,
      Self::Auto => !(running_as_root() || in_container()),
    }
  }
}

impl FromStr for SandboxMode {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_ascii_lowercase().as_str() {
      "auto" => Ok(Self::Auto),
      "enabled" | "on" => Ok(Self::Enabled),
      "disabled" | "off" => Ok(Self::Disabled),
      _ => {
        Err(format!(
          "unknown sandbox mode `{s}` (expected auto, enabled or disabled)"
        ))
      },
    }
  }
}

impl TryFrom<String> for SandboxMode {
  type Error = String;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    value.parse()
  }
}

#[cfg(unix)]
fn running_as_root() -> bool {
  use std::os::unix::fs::MetadataExt;

  // /proc/self is owned by the effective uid of the current process.
  std::fs::metadata("/proc/self").is_ok_and(|meta| meta.uid() == 0)
}

#[cfg(not(unix))]
const fn running_as_root() -> bool {
  false
}

fn in_container() -> bool {
  ["/.dockerenv", "/run/.containerenv"]
    .iter()
    .any(|marker| Path::new(marker).exists())
}
