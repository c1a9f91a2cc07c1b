//! PDF render driver.
//!
//! Writes the document to a temporary file next to the destination, loads
//! it in a headless browser and prints it. The temporary file and the
//! browser session are held by guards, so both are released on every exit
//! path; release failures are logged and never replace the original error.
pub mod chrome;
pub mod page;

use std::{
  fmt,
  fs,
  io::Write,
  path::{Path, PathBuf},
  time::Duration,
};

pub use chrome::ChromeLauncher;
use log::{debug, info, warn};
pub use page::PrintSettings;
use url::Url;

use crate::{
  config::{ConversionRequest, WaitUntil},
  error::{MdpdfError, Result},
  html::RenderedDocument,
};

/// Steps of the driver, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStage {
  WritingTempFile,
  Launching,
  Navigating,
  Titling,
  Printing,
  Closing,
  DebugCopy,
  Cleanup,
}

impl fmt::Display for RenderStage {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::WritingTempFile => "writing the temporary document",
      Self::Launching => "launching the browser",
      Self::Navigating => "loading the document",
      Self::Titling => "setting the document title",
      Self::Printing => "printing the PDF",
      Self::Closing => "closing the browser",
      Self::DebugCopy => "copying the debug document",
      Self::Cleanup => "removing the temporary document",
    })
  }
}

/// How to start the browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchSettings {
  pub sandbox:      bool,
  /// Executable to run; auto-detected when `None`.
  pub browser_path: Option<PathBuf>,
  /// How long the browser may sit without traffic before the connection is
  /// dropped.
  pub idle_timeout: Duration,
}

impl LaunchSettings {
  #[must_use]
  pub fn for_request(request: &ConversionRequest) -> Self {
    let longest = request.page.timeout.max(request.page.navigation_timeout);
    Self {
      sandbox:      request.sandbox.is_enabled(),
      browser_path: request.browser_path.clone(),
      idle_timeout: longest + Duration::from_secs(10),
    }
  }
}

/// Starts browser sessions.
pub trait BrowserLauncher {
  type Session: BrowserSession;

  /// # Errors
  ///
  /// Returns `BrowserProcess` if the browser cannot be started.
  fn launch(&self, settings: &LaunchSettings) -> Result<Self::Session>;
}

/// One running browser with a single page.
pub trait BrowserSession {
  /// Load `url` and wait according to `wait_until`.
  ///
  /// # Errors
  ///
  /// Returns `RenderTimeout` if loading exceeds `timeout`, or
  /// `BrowserProcess` on any other failure.
  fn navigate(
    &mut self,
    url: &Url,
    wait_until: WaitUntil,
    timeout: Duration,
  ) -> Result<()>;

  /// Set `document.title` of the loaded page.
  ///
  /// # Errors
  ///
  /// Returns `BrowserProcess` if the script cannot run.
  fn set_title(&mut self, title: &str) -> Result<()>;

  /// Print the loaded page and return the PDF bytes.
  ///
  /// # Errors
  ///
  /// Returns `RenderTimeout` if printing exceeds `timeout`, or
  /// `BrowserProcess` on any other failure.
  fn print_to_pdf(
    &mut self,
    settings: &PrintSettings,
    timeout: Duration,
  ) -> Result<Vec<u8>>;

  /// Terminate the browser.
  ///
  /// # Errors
  ///
  /// Returns `BrowserProcess` if the browser does not shut down cleanly.
  fn close(self) -> Result<()>;
}

/// Closes the session when dropped unless it was closed explicitly.
struct SessionGuard<S: BrowserSession> {
  session: Option<S>,
}

impl<S: BrowserSession> SessionGuard<S> {
  const fn new(session: S) -> Self {
    Self {
      session: Some(session),
    }
  }

  fn get(&mut self, stage: RenderStage) -> Result<&mut S> {
    enter(stage);
    self.session.as_mut().ok_or_else(|| {
      MdpdfError::BrowserProcess {
        stage,
        message: "browser session already closed".to_string(),
      }
    })
  }

  fn close(mut self) {
    enter(RenderStage::Closing);
    if let Some(session) = self.session.take() {
      if let Err(e) = session.close() {
        warn!("{e}");
      }
    }
  }
}

impl<S: BrowserSession> Drop for SessionGuard<S> {
  fn drop(&mut self) {
    if let Some(session) = self.session.take() {
      debug!("Closing browser after failure");
      if let Err(e) = session.close() {
        warn!("{e}");
      }
    }
  }
}

/// A uniquely named `_temp*.html` file that is removed when dropped.
struct TempHtml {
  path: PathBuf,
}

impl TempHtml {
  fn create(dir: &Path, html: &str) -> Result<Self> {
    let to_error = |e| MdpdfError::io(RenderStage::WritingTempFile, e);

    let (mut file, path) = tempfile::Builder::new()
      .prefix("_temp")
      .suffix(".html")
      .tempfile_in(dir)
      .map_err(to_error)?
      .keep()
      .map_err(|e| to_error(e.error))?;
    let guard = Self { path };

    file
      .write_all(html.as_bytes())
      .and_then(|()| file.flush())
      .map_err(to_error)?;
    debug!("Wrote temporary document {}", guard.path.display());
    Ok(guard)
  }

  fn path(&self) -> &Path {
    &self.path
  }
}

impl Drop for TempHtml {
  fn drop(&mut self) {
    enter(RenderStage::Cleanup);
    if let Err(e) = fs::remove_file(&self.path) {
      warn!(
        "Failed to remove temporary document {}: {e}",
        self.path.display()
      );
    }
  }
}

fn enter(stage: RenderStage) {
  debug!("Render stage: {stage}");
}

/// Print `document` to `request.destination` with a browser from
/// `launcher`.
///
/// # Errors
///
/// Returns the first failure of any stage. The temporary document is
/// removed and the browser closed in every case.
pub fn render_pdf<L: BrowserLauncher>(
  launcher: &L,
  document: &RenderedDocument,
  request: &ConversionRequest,
) -> Result<()> {
  enter(RenderStage::WritingTempFile);
  let dest_dir = request
    .destination
    .parent()
    .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
  fs::create_dir_all(&dest_dir)
    .map_err(|e| MdpdfError::io(RenderStage::WritingTempFile, e))?;
  let temp = TempHtml::create(&dest_dir, &document.html)?;

  let url = Url::from_file_path(temp.path()).map_err(|()| {
    MdpdfError::BrowserProcess {
      stage:   RenderStage::Navigating,
      message: format!(
        "cannot express {} as a file URL",
        temp.path().display()
      ),
    }
  })?;

  enter(RenderStage::Launching);
  let settings = LaunchSettings::for_request(request);
  let mut session = SessionGuard::new(launcher.launch(&settings)?);

  session.get(RenderStage::Navigating)?.navigate(
    &url,
    request.wait_until,
    request.page.navigation_timeout,
  )?;
  session
    .get(RenderStage::Titling)?
    .set_title(&document.title)?;

  let print =
    PrintSettings::new(&request.page, &document.header, &document.footer);
  let pdf = session
    .get(RenderStage::Printing)?
    .print_to_pdf(&print, request.page.timeout)?;
  fs::write(&request.destination, pdf)
    .map_err(|e| MdpdfError::io(RenderStage::Printing, e))?;
  info!("Wrote {}", request.destination.display());

  session.close();

  if let Some(debug_path) = &request.debug {
    enter(RenderStage::DebugCopy);
    match fs::copy(temp.path(), debug_path) {
      Ok(_) => info!("Debug document written to {}", debug_path.display()),
      Err(e) => {
        warn!(
          "Failed to copy debug document to {}: {e}",
          debug_path.display()
        );
      },
    }
  }

  Ok(())
}
