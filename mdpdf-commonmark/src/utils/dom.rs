//! Parsing and serializing HTML *fragments* with kuchikikiki.
//!
//! html5ever always builds a full document; leading `<style>`, `<link>` and
//! `<meta>` elements of a fragment land in `<head>` and the rest in
//! `<body>`. [`serialize_fragment`] writes both back out in that order, so a
//! fragment survives a parse/serialize cycle without gaining an `<html>`
//! wrapper.
use kuchikikiki::NodeRef;
use tendril::TendrilSink;

/// Parse an HTML fragment into a kuchikikiki document.
#[must_use]
pub fn parse_fragment(html: &str) -> NodeRef {
  kuchikikiki::parse_html().one(html)
}

/// Serialize the contents of `<head>` and `<body>` of a parsed fragment.
#[must_use]
pub fn serialize_fragment(document: &NodeRef) -> String {
  let mut out = Vec::new();
  for container in ["head", "body"] {
    let Ok(element) = document.select_first(container) else {
      continue;
    };
    for child in element.as_node().children() {
      if let Err(e) = child.serialize(&mut out) {
        log::warn!("Failed to serialize HTML node: {e}");
      }
    }
  }
  String::from_utf8(out).unwrap_or_default()
}

/// Parse `html` and return its top-level nodes, detached and ready to be
/// inserted into another tree.
#[must_use]
pub fn fragment_nodes(html: &str) -> Vec<NodeRef> {
  let document = parse_fragment(html);
  let mut nodes = Vec::new();
  for container in ["head", "body"] {
    if let Ok(element) = document.select_first(container) {
      nodes.extend(element.as_node().children());
    }
  }
  for node in &nodes {
    node.detach();
  }
  nodes
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_fragment_roundtrip_has_no_wrapper() {
    let html = r#"<p>Hello <em>there</em></p><img src="a.png">"#;
    let out = serialize_fragment(&parse_fragment(html));
    assert_eq!(out, r#"<p>Hello <em>there</em></p><img src="a.png">"#);
    assert!(!out.contains("<html>"));
    assert!(!out.contains("<body>"));
  }

  #[test]
  fn test_leading_style_is_kept_in_order() {
    let html = "<style>p { color: red; }</style><p>text</p>";
    let out = serialize_fragment(&parse_fragment(html));
    assert_eq!(out, html);
  }

  #[test]
  fn test_fragment_nodes_are_detached() {
    let nodes = fragment_nodes("<span>a</span><span>b</span>");
    assert_eq!(nodes.len(), 2);
    assert!(nodes.iter().all(|n| n.parent().is_none()));
  }
}
