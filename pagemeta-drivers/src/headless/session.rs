use anyhow::Result;
use async_trait::async_trait;

/// Starts one isolated browser session per call.
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>>;
}

/// A live browser session with a single page.
///
/// Callers own the session and must call [`BrowserSession::close`] on every
/// exit path; `close` is idempotent.
#[async_trait]
pub trait BrowserSession: Send {
    /// Load `url` and wait until the page's network activity settles.
    async fn navigate(&mut self, url: &str) -> Result<()>;

    /// Serialized DOM of the current page.
    async fn content(&self) -> Result<String>;

    async fn close(&mut self) -> Result<()>;
}
