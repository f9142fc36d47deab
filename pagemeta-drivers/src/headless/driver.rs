use crate::headless::{
    options::chrome_capabilities,
    page::RenderPage,
    session::{BrowserLauncher, BrowserSession},
};
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use fantoccini::{Client, ClientBuilder};
use pagemeta_config::RenderConfig;
use tracing::{debug, info, warn};

/// Launches Chrome sessions through a running WebDriver service.
///
/// Each [`BrowserLauncher::launch`] opens a fresh session, which chromedriver
/// backs with its own Chrome process and throwaway profile.
pub struct WebDriverLauncher {
    config: RenderConfig,
    user_agent: String,
}

impl WebDriverLauncher {
    pub fn new(config: RenderConfig, user_agent: impl Into<String>) -> Self {
        Self {
            config,
            user_agent: user_agent.into(),
        }
    }
}

#[async_trait]
impl BrowserLauncher for WebDriverLauncher {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>> {
        let driver = RenderDriver::connect(&self.config, &self.user_agent).await?;
        Ok(Box::new(driver))
    }
}

/// Thin wrapper around a `fantoccini` client owning one browser session.
pub struct RenderDriver {
    client: Option<Client>,
    page: Option<RenderPage>,
    config: RenderConfig,
}

impl RenderDriver {
    /// Open a new session on `config.webdriver_url` (default: local chromedriver).
    pub async fn connect(config: &RenderConfig, user_agent: &str) -> Result<Self> {
        let client = ClientBuilder::native()
            .capabilities(chrome_capabilities(config, user_agent))
            .connect(&config.webdriver_url)
            .await
            .with_context(|| format!("failed to open WebDriver session at {}", config.webdriver_url))?;

        info!(
            target: "render",
            webdriver = %config.webdriver_url,
            headless = config.headless,
            sandbox = config.sandbox,
            "render.session.opened"
        );

        Ok(Self {
            client: Some(client),
            page: None,
            config: config.clone(),
        })
    }

    fn client(&self) -> Result<&Client> {
        self.client
            .as_ref()
            .ok_or_else(|| anyhow!("browser session already closed"))
    }

    /// Navigate to `url` and return the page once it has loaded.
    pub async fn goto(&mut self, url: &str) -> Result<&RenderPage> {
        let page = RenderPage::new(
            self.client()?.clone(),
            self.config.network_idle(),
            self.config.idle_poll(),
        );
        page.goto(url).await?;
        Ok(self.page.insert(page))
    }

    /// End the WebDriver session, which terminates the browser process.
    pub async fn close(&mut self) -> Result<()> {
        self.page = None;
        match self.client.take() {
            Some(client) => {
                client.close().await.context("failed to close WebDriver session")?;
                info!(target: "render", "render.session.closed");
                Ok(())
            }
            None => Ok(()),
        }
    }
}

#[async_trait]
impl BrowserSession for RenderDriver {
    async fn navigate(&mut self, url: &str) -> Result<()> {
        let page = self.goto(url).await?;
        page.wait_for_network_idle().await?;
        match page.get_url().await {
            Ok(final_url) => debug!(target: "render", requested = %url, %final_url, "render.navigated"),
            Err(e) => warn!(target: "render", requested = %url, error = %e, "render.current_url_failed"),
        }
        Ok(())
    }

    async fn content(&self) -> Result<String> {
        let page = self
            .page
            .as_ref()
            .ok_or_else(|| anyhow!("no page loaded in browser session"))?;
        page.get_content().await
    }

    async fn close(&mut self) -> Result<()> {
        RenderDriver::close(self).await
    }
}
