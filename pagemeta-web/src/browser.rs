use anyhow::{Result, anyhow};
use pagemeta_config::RenderConfig;
use pagemeta_drivers::headless::driver::WebDriverLauncher;
use pagemeta_drivers::headless::session::{BrowserLauncher, BrowserSession};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use url::Url;

/// Produces post-JavaScript HTML for a URL.
#[async_trait::async_trait]
pub trait PageRenderer: Send + Sync {
    async fn render(&self, url: &Url) -> Result<String>;
}

/// Renders through a fresh browser session per call.
///
/// Launch, navigation, the content read and close are each bounded by the
/// navigation timeout. The session is closed on every exit path after launch,
/// including navigation failures and timeouts.
pub struct HeadlessRenderer {
    launcher: Arc<dyn BrowserLauncher>,
    navigation_timeout: Duration,
    settle_delay: Duration,
}

impl HeadlessRenderer {
    pub fn new(launcher: Arc<dyn BrowserLauncher>, config: &RenderConfig) -> Self {
        Self {
            launcher,
            navigation_timeout: config.navigation_timeout(),
            settle_delay: config.settle_delay(),
        }
    }

    /// Renderer backed by a WebDriver endpoint.
    pub fn webdriver(config: &RenderConfig, user_agent: &str) -> Self {
        let launcher = Arc::new(WebDriverLauncher::new(config.clone(), user_agent));
        Self::new(launcher, config)
    }

    async fn bounded<T, F>(&self, step: &str, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        tokio::time::timeout(self.navigation_timeout, fut)
            .await
            .map_err(|_| {
                anyhow!(
                    "{step} timed out after {}s",
                    self.navigation_timeout.as_secs()
                )
            })?
    }

    async fn capture(&self, session: &mut dyn BrowserSession, url: &Url) -> Result<String> {
        self.bounded(&format!("navigation to {url}"), session.navigate(url.as_str()))
            .await?;

        tokio::time::sleep(self.settle_delay).await;
        self.bounded(&format!("reading rendered page {url}"), session.content())
            .await
    }
}

#[async_trait::async_trait]
impl PageRenderer for HeadlessRenderer {
    async fn render(&self, url: &Url) -> Result<String> {
        let mut session = self
            .bounded("browser launch", self.launcher.launch())
            .await?;

        let result = self.capture(session.as_mut(), url).await;

        // Always close before returning, whatever `capture` produced.
        if let Err(e) = self.bounded("browser session close", session.close()).await {
            warn!(target: "render", url = %url, error = %e, "render.session.close_failed");
        }

        match &result {
            Ok(html) => info!(target: "render", url = %url, html_len = html.len(), "render.completed"),
            Err(e) => warn!(target: "render", url = %url, error = %e, "render.failed"),
        }
        result
    }
}
