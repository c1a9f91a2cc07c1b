pub const DOCUMENT_TEMPLATE: &str = include_str!("../templates/document.html");
pub const HEADER_TEMPLATE: &str = include_str!("../templates/header.html");
pub const FOOTER_TEMPLATE: &str = include_str!("../templates/footer.html");

pub const DEFAULT_CSS: &str = include_str!("../templates/default.css");
pub const GITHUB_MARKDOWN_CSS: &str =
  include_str!("../templates/github-markdown.css");
