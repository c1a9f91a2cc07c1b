pub type SyntaxResult<T> = Result<T, SyntaxError>;

#[derive(Debug, thiserror::Error)]
pub enum SyntaxError {
  #[error("no syntax definition for `{0}`")]
  UnsupportedLanguage(String),

  #[error("unknown highlight theme `{0}`")]
  ThemeNotFound(String),

  #[error("highlighting failed: {0}")]
  HighlightingFailed(String),

  /// Built without a highlighting backend feature.
  #[error("syntax highlighting is unavailable in this build")]
  NoBackendAvailable,
}
