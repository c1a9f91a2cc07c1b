//! Image source qualification.
//!
//! The rendered document is loaded from a temporary file, so relative image
//! paths would resolve against the temp directory. Every local `src` is
//! rewritten to an absolute `file://` URL rooted at the asset directory.
use std::{
  borrow::Cow,
  path::{Component, Path, PathBuf},
};

use log::{trace, warn};
use mdpdf_commonmark::{
  process_safe,
  utils::dom::{parse_fragment, serialize_fragment},
};
use url::Url;

/// Whether `src` is a remote URL the browser can fetch directly.
///
/// Only absolute `http` and `https` URLs qualify; relative and absolute
/// filesystem paths, `file:` and every other scheme do not.
#[must_use]
pub fn has_acceptable_protocol(src: &str) -> bool {
  Url::parse(src).is_ok_and(|url| matches!(url.scheme(), "http" | "https"))
}

/// Qualify a single image source against `asset_dir`.
///
/// Remote URLs are returned unchanged. Anything else is percent-decoded,
/// resolved against `asset_dir` (absolute paths stay as they are),
/// lexically normalized and turned into a `file://` URL.
#[must_use]
pub fn process_src(src: &str, asset_dir: &Path) -> String {
  if has_acceptable_protocol(src) {
    return src.to_string();
  }

  let decoded = urlencoding::decode(src).unwrap_or(Cow::Borrowed(src));
  let joined = asset_dir.join(decoded.as_ref());
  let absolute = std::path::absolute(&joined).unwrap_or(joined);
  let resolved = normalize(&absolute);

  Url::from_file_path(&resolved).map_or_else(
    |()| {
      warn!("Cannot express {} as a file URL", resolved.display());
      format!("file://{}", resolved.display())
    },
    String::from,
  )
}

/// Rewrite the `src` of every `<img>` in an HTML fragment.
///
/// `<img>` elements without a `src` are left alone. If the fragment cannot
/// be processed the input is returned unchanged.
#[must_use]
pub fn qualify_img_sources(html: &str, asset_dir: &Path) -> String {
  process_safe(
    html,
    |html| {
      let document = parse_fragment(html);
      if let Ok(images) = document.select("img[src]") {
        for image in images {
          let mut attributes = image.attributes.borrow_mut();
          let Some(src) = attributes.get("src").map(str::to_string) else {
            continue;
          };
          let qualified = process_src(&src, asset_dir);
          trace!("Qualified image source {src} -> {qualified}");
          attributes.insert("src", qualified);
        }
      }
      serialize_fragment(&document)
    },
    html,
  )
}

/// Resolve `.` and `..` components without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
  let mut normalized = PathBuf::new();
  for component in path.components() {
    match component {
      Component::CurDir => {},
      Component::ParentDir => {
        if !normalized.pop() {
          normalized.push(component);
        }
      },
      other => normalized.push(other),
    }
  }
  normalized
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_acceptable_protocols() {
    assert!(has_acceptable_protocol("http://example.com/a.png"));
    assert!(has_acceptable_protocol("https://example.com/a.png"));
    assert!(!has_acceptable_protocol("file:///path/to/file"));
    assert!(!has_acceptable_protocol("ftp://example.com"));
    assert!(!has_acceptable_protocol("relative/path"));
    assert!(!has_acceptable_protocol("/absolute/path"));
    assert!(!has_acceptable_protocol("data:image/png;base64,AAAA"));
  }

  #[test]
  fn test_process_src_keeps_remote() {
    let dir = Path::new("/test/assets");
    assert_eq!(
      process_src("https://example.com/image.png", dir),
      "https://example.com/image.png"
    );
  }

  #[test]
  fn test_process_src_relative() {
    let result = process_src("img/test.png", Path::new("/test/assets"));
    assert_eq!(result, "file:///test/assets/img/test.png");
  }

  #[test]
  fn test_process_src_normalizes_and_decodes() {
    let dir = Path::new("/test/assets");
    assert_eq!(
      process_src("../shared/./logo.png", dir),
      "file:///test/shared/logo.png"
    );
    assert_eq!(
      process_src("my%20image.png", dir),
      "file:///test/assets/my%20image.png"
    );
    assert_eq!(process_src("/abs/pic.png", dir), "file:///abs/pic.png");
  }

  #[test]
  fn test_qualify_img_sources() {
    let html = r#"<div><img src="image.png"><img src="https://example.com/remote.jpg"><img alt="none"></div>"#;
    let result = qualify_img_sources(html, Path::new("/test/assets"));

    assert!(result.contains(r#"src="file:///test/assets/image.png""#));
    assert!(result.contains(r#"src="https://example.com/remote.jpg""#));
    assert!(result.contains(r#"<img alt="none">"#));
  }

  #[test]
  fn test_qualify_without_images_is_unchanged() {
    let html = "<p>No pictures here</p>";
    assert_eq!(qualify_img_sources(html, Path::new("/tmp")), html);
  }
}
