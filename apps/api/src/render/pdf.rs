//! HTML → PDF through a shared headless Chromium session.
//!
//! One browser per process, one page per request. Pages are closed on every path.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::page::PrintToPdfParams;
use chromiumoxide::cdp::js_protocol::runtime::EvaluateParams;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures_util::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::render::RenderError;

/// A4 in inches, the unit Chromium's print API expects.
const A4_WIDTH_IN: f64 = 8.27;
const A4_HEIGHT_IN: f64 = 11.69;

/// Resolves once the document has loaded and its web fonts are ready.
const QUIESCENCE_SCRIPT: &str = r#"new Promise((resolve) => {
    const settle = () => document.fonts.ready.then(() => resolve(true));
    if (document.readyState === "complete") { settle(); }
    else { window.addEventListener("load", settle, { once: true }); }
})"#;

/// Converts an HTML document to a PDF file at `output`.
///
/// Carried in `AppState` as `Arc<dyn PdfRenderer>`. Implementations must not share
/// rendering state between calls.
#[async_trait]
pub trait PdfRenderer: Send + Sync {
    async fn render_pdf(&self, html: &str, output: &Path) -> Result<(), RenderError>;
}

/// Chromium-backed renderer. Launched once at startup.
pub struct BrowserRenderer {
    browser: Browser,
    handler: JoinHandle<()>,
    idle_timeout: Duration,
}

impl BrowserRenderer {
    pub async fn launch(
        executable: Option<&Path>,
        idle_timeout: Duration,
    ) -> Result<Self, RenderError> {
        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .arg("--disable-setuid-sandbox");
        if let Some(path) = executable {
            builder = builder.chrome_executable(path);
        }
        let config = builder.build().map_err(RenderError::Browser)?;

        let (browser, mut handler) = Browser::launch(config).await?;

        // The CDP connection only makes progress while this stream is polled.
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("Browser handler event error: {e}");
                }
            }
        });

        info!("Headless browser launched");
        Ok(Self {
            browser,
            handler,
            idle_timeout,
        })
    }

    /// Closes the browser process and stops the CDP handler.
    pub async fn shutdown(mut self) {
        info!("Closing browser...");
        if let Err(e) = self.browser.close().await {
            warn!("Browser close failed: {e}");
        }
        if let Err(e) = self.browser.wait().await {
            warn!("Waiting for browser exit failed: {e}");
        }
        self.handler.abort();
    }

    async fn print(&self, page: &Page, html: &str, output: &Path) -> Result<(), RenderError> {
        page.set_content(html).await?;
        self.wait_for_quiescence(page).await;

        let params = PrintToPdfParams {
            paper_width: Some(A4_WIDTH_IN),
            paper_height: Some(A4_HEIGHT_IN),
            print_background: Some(true),
            ..Default::default()
        };
        page.save_pdf(params, output)
            .await
            .map_err(|e| RenderError::Pdf(e.to_string()))?;
        Ok(())
    }

    /// Waits for load and fonts, bounded by `idle_timeout`. Never fails the render.
    async fn wait_for_quiescence(&self, page: &Page) {
        let params = match EvaluateParams::builder()
            .expression(QUIESCENCE_SCRIPT)
            .await_promise(true)
            .build()
        {
            Ok(params) => params,
            Err(e) => {
                warn!("Skipping quiescence wait: {e}");
                return;
            }
        };

        match tokio::time::timeout(self.idle_timeout, page.evaluate_expression(params)).await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => warn!("Quiescence check failed, rendering anyway: {e}"),
            Err(_) => warn!(
                "Page did not settle within {}ms, rendering anyway",
                self.idle_timeout.as_millis()
            ),
        }
    }
}

#[async_trait]
impl PdfRenderer for BrowserRenderer {
    async fn render_pdf(&self, html: &str, output: &Path) -> Result<(), RenderError> {
        let page = self.browser.new_page("about:blank").await?;

        let result = self.print(&page, html, output).await;

        if let Err(e) = page.close().await {
            warn!("Failed to close browser page: {e}");
        }
        result
    }
}
