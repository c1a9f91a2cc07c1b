//! Headless Chrome backend.
use std::{
  path::PathBuf,
  sync::{Arc, mpsc},
  thread,
  time::Duration,
};

use headless_chrome::{
  Browser,
  LaunchOptions,
  Tab,
  types::PrintToPdfOptions,
  util::Timeout,
};
use log::{debug, warn};
use url::Url;

use super::{
  BrowserLauncher,
  BrowserSession,
  LaunchSettings,
  PrintSettings,
  RenderStage,
};
use crate::{
  config::WaitUntil,
  error::{MdpdfError, Result},
};

/// Resolves once no more than `__MAX_INFLIGHT__` images or font loads have
/// been pending for 500ms. Every finished resource restarts the quiet period.
const NETWORK_IDLE_JS: &str = r"new Promise((resolve) => {
  const maxInflight = __MAX_INFLIGHT__;
  const quietMs = 500;
  let timer = null;
  const pending = () =>
    Array.from(document.images).filter((img) => !img.complete).length +
    (document.fonts && document.fonts.status === 'loading' ? 1 : 0);
  const check = () => {
    clearTimeout(timer);
    if (pending() <= maxInflight) {
      timer = setTimeout(() => (pending() <= maxInflight ? resolve(true) : check()), quietMs);
    } else {
      timer = setTimeout(check, 50);
    }
  };
  if (typeof PerformanceObserver !== 'undefined') {
    new PerformanceObserver(check).observe({ type: 'resource', buffered: true });
  }
  check();
})";

/// Find a browser to run: `preferred` when it exists, otherwise whatever
/// Chrome or Chromium installation can be detected.
#[must_use]
pub fn detect_executable(preferred: Option<PathBuf>) -> Option<PathBuf> {
  preferred
    .filter(|path| path.is_file())
    .or_else(|| headless_chrome::browser::default_executable().ok())
}

/// Launches headless Chrome or Chromium.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChromeLauncher;

impl BrowserLauncher for ChromeLauncher {
  type Session = ChromeSession;

  fn launch(&self, settings: &LaunchSettings) -> Result<ChromeSession> {
    let stage = RenderStage::Launching;
    let process_error = |message: String| {
      MdpdfError::BrowserProcess { stage, message }
    };

    if !settings.sandbox {
      debug!("Launching browser without sandbox");
    }
    let options = LaunchOptions::default_builder()
      .headless(true)
      .sandbox(settings.sandbox)
      .path(settings.browser_path.clone())
      .idle_browser_timeout(settings.idle_timeout)
      .build()
      .map_err(|e| process_error(e.to_string()))?;

    let browser =
      Browser::new(options).map_err(|e| process_error(format!("{e:#}")))?;
    let tab = browser
      .new_tab()
      .map_err(|e| process_error(format!("{e:#}")))?;

    Ok(ChromeSession { browser, tab })
  }
}

/// A running browser and the tab the document is printed from.
pub struct ChromeSession {
  browser: Browser,
  tab:     Arc<Tab>,
}

impl ChromeSession {
  /// Run `job` against the tab on a worker thread and give up after
  /// `timeout`. An abandoned job ends when the browser is closed.
  fn with_deadline<T, F>(
    &self,
    stage: RenderStage,
    timeout: Duration,
    job: F,
  ) -> Result<T>
  where
    T: Send + 'static,
    F: FnOnce(&Tab) -> anyhow::Result<T> + Send + 'static,
  {
    let tab = Arc::clone(&self.tab);
    let (tx, rx) = mpsc::channel();
    thread::Builder::new()
      .name(format!("mdpdf-{stage:?}").to_lowercase())
      .spawn(move || {
        // The receiver is gone after a timeout; nothing left to report to.
        let _ = tx.send(job(&tab));
      })
      .map_err(|e| MdpdfError::io(stage, e))?;

    match rx.recv_timeout(timeout) {
      Ok(result) => result.map_err(|e| classify(stage, timeout, &e)),
      Err(mpsc::RecvTimeoutError::Timeout) => {
        Err(MdpdfError::RenderTimeout { stage, timeout })
      },
      Err(mpsc::RecvTimeoutError::Disconnected) => {
        Err(MdpdfError::BrowserProcess {
          stage,
          message: "browser worker stopped unexpectedly".to_string(),
        })
      },
    }
  }
}

impl BrowserSession for ChromeSession {
  fn navigate(
    &mut self,
    url: &Url,
    wait_until: WaitUntil,
    timeout: Duration,
  ) -> Result<()> {
    let url = url.to_string();
    debug!("Navigating to {url} (wait until {wait_until:?})");
    self.tab.set_default_timeout(timeout);

    let idle_script = wait_until.max_inflight().map(|inflight| {
      NETWORK_IDLE_JS.replace("__MAX_INFLIGHT__", &inflight.to_string())
    });

    self.with_deadline(RenderStage::Navigating, timeout, move |tab| {
      tab.navigate_to(&url)?;
      tab.wait_until_navigated()?;
      if let Some(script) = idle_script {
        tab.evaluate(&script, true)?;
      }
      Ok(())
    })
  }

  fn set_title(&mut self, title: &str) -> Result<()> {
    let stage = RenderStage::Titling;
    let literal = serde_json::to_string(title)?;
    self
      .tab
      .evaluate(&format!("document.title = {literal};"), false)
      .map(|_| ())
      .map_err(|e| {
        MdpdfError::BrowserProcess {
          stage,
          message: format!("{e:#}"),
        }
      })
  }

  fn print_to_pdf(
    &mut self,
    settings: &PrintSettings,
    timeout: Duration,
  ) -> Result<Vec<u8>> {
    self.tab.set_default_timeout(timeout);
    let options = PrintToPdfOptions {
      landscape: Some(settings.landscape),
      display_header_footer: Some(settings.display_header_footer),
      print_background: Some(settings.print_background),
      paper_width: Some(settings.paper_width),
      paper_height: Some(settings.paper_height),
      margin_top: Some(settings.margin_top),
      margin_bottom: Some(settings.margin_bottom),
      margin_left: Some(settings.margin_left),
      margin_right: Some(settings.margin_right),
      header_template: Some(settings.header_template.clone()),
      footer_template: Some(settings.footer_template.clone()),
      prefer_css_page_size: Some(false),
      ..Default::default()
    };

    self.with_deadline(RenderStage::Printing, timeout, move |tab| {
      tab.print_to_pdf(Some(options))
    })
  }

  fn close(self) -> Result<()> {
    let Self { browser, tab } = self;
    let closed = tab.close(false);
    // Dropping the browser terminates the process.
    drop(browser);
    match closed {
      Ok(_) => Ok(()),
      Err(e) => {
        warn!("Tab did not close cleanly");
        Err(MdpdfError::BrowserProcess {
          stage:   RenderStage::Closing,
          message: format!("{e:#}"),
        })
      },
    }
  }
}

fn classify(
  stage: RenderStage,
  timeout: Duration,
  err: &anyhow::Error,
) -> MdpdfError {
  let message = format!("{err:#}");
  if err.is::<Timeout>() || message.contains("timed out") {
    MdpdfError::RenderTimeout { stage, timeout }
  } else {
    MdpdfError::BrowserProcess { stage, message }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_network_idle_script_substitution() {
    let script = NETWORK_IDLE_JS.replace("__MAX_INFLIGHT__", "2");
    assert!(script.contains("const maxInflight = 2;"));
    assert!(!script.contains("__MAX_INFLIGHT__"));
  }

  #[test]
  fn test_classify_timeout_messages() {
    let timeout = Duration::from_secs(1);
    let err = anyhow::Error::new(Timeout);
    assert!(matches!(
      classify(RenderStage::Printing, timeout, &err),
      MdpdfError::RenderTimeout {
        stage: RenderStage::Printing,
        ..
      }
    ));

    let err = anyhow::anyhow!("connection refused");
    assert!(matches!(
      classify(RenderStage::Navigating, timeout, &err),
      MdpdfError::BrowserProcess {
        stage: RenderStage::Navigating,
        ref message,
      } if message == "connection refused"
    ));
  }

  #[test]
  fn test_detect_prefers_existing_path() {
    let file = tempfile::NamedTempFile::new().expect("temp file");
    let path = file.path().to_path_buf();
    assert_eq!(detect_executable(Some(path.clone())), Some(path));
  }
}
