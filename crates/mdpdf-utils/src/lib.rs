pub mod html;
pub mod styles;

// Re-export commonly used utilities
pub use html::{has_acceptable_protocol, process_src, qualify_img_sources};
pub use styles::{
  LoadedStyles,
  StyleLoadError,
  StyleSet,
  StyleSource,
  get_style_block,
  get_styles,
  to_attribute_safe,
};
