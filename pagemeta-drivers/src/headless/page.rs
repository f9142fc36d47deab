use crate::headless::idle::{IdleProbe, IdleTracker, NETWORK_PROBE};
use anyhow::{Context, Result};
use fantoccini::Client;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::debug;

/// One browser page driven over WebDriver.
pub struct RenderPage {
    pub(crate) client: Client,
    network_idle: Duration,
    idle_poll: Duration,
}

impl RenderPage {
    pub fn new(client: Client, network_idle: Duration, idle_poll: Duration) -> Self {
        Self {
            client,
            network_idle,
            idle_poll,
        }
    }

    /// Navigate to `url`; returns once the document has loaded.
    pub async fn goto(&self, url: &str) -> Result<()> {
        self.client
            .goto(url)
            .await
            .with_context(|| format!("navigation to {url} failed"))
    }

    /// Poll until the page has been quiet for the network-idle window.
    ///
    /// Unbounded on its own; callers wrap it in their navigation timeout.
    pub async fn wait_for_network_idle(&self) -> Result<()> {
        let started = Instant::now();
        let mut tracker = IdleTracker::new(self.network_idle);
        let mut samples = 0u32;

        loop {
            let raw = self
                .client
                .execute(NETWORK_PROBE, vec![])
                .await
                .context("network idle probe failed")?;
            let probe: IdleProbe =
                serde_json::from_value(raw).context("unexpected network idle probe result")?;
            samples += 1;

            if tracker.observe(&probe, Instant::now()) {
                debug!(
                    target: "render",
                    samples,
                    resources = probe.resources,
                    waited_ms = started.elapsed().as_millis() as u64,
                    "render.network_idle"
                );
                return Ok(());
            }
            sleep(self.idle_poll).await;
        }
    }

    /// Return the full serialized DOM.
    pub async fn get_content(&self) -> Result<String> {
        self.client.source().await.map_err(anyhow::Error::from)
    }

    pub async fn get_url(&self) -> Result<String> {
        self.client
            .current_url()
            .await
            .map(|url| url.to_string())
            .map_err(anyhow::Error::from)
    }
}
