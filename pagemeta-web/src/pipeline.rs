//! The two-stage pipeline: static fetch, JS check, optional headless render,
//! then metadata extraction.

use crate::browser::{HeadlessRenderer, PageRenderer};
use crate::detect::JsDetector;
use crate::error::{ExtractError, Result};
use crate::extract::MetadataExtractor;
use crate::record::{ArticleMetadata, ExtractRequest, Extraction, PageSource};
use pagemeta_config::PagemetaConfig;
use pagemeta_http::HttpClient;
use std::sync::Arc;
use tracing::{info, warn};
use url::Url;

/// Stateless extractor; build once and share between requests.
pub struct ArticleExtractor {
    http: HttpClient,
    detector: JsDetector,
    renderer: Arc<dyn PageRenderer>,
    extractor: MetadataExtractor,
}

impl ArticleExtractor {
    /// Build with the WebDriver-backed renderer described by `config.render`.
    pub fn from_config(config: &PagemetaConfig) -> Result<Self> {
        let renderer = HeadlessRenderer::webdriver(&config.render, &config.fetch.user_agent);
        Self::with_renderer(config, Arc::new(renderer))
    }

    /// Build with a caller-supplied renderer.
    pub fn with_renderer(config: &PagemetaConfig, renderer: Arc<dyn PageRenderer>) -> Result<Self> {
        let http = HttpClient::new(&config.fetch.user_agent, config.fetch.timeout())
            .map_err(|e| ExtractError::Config(e.to_string()))?;
        Ok(Self {
            http,
            detector: JsDetector::new(&config.detection),
            renderer,
            extractor: MetadataExtractor::new(&config.extraction)?,
        })
    }

    /// Handle form-style input where the URL field may be missing.
    pub async fn extract_request(&self, request: &ExtractRequest) -> Result<ArticleMetadata> {
        self.extract(request.url.as_deref().unwrap_or_default()).await
    }

    /// Extract metadata for `url`. A blank URL is [`ExtractError::MissingUrl`];
    /// anything but an `http`/`https` URL is [`ExtractError::Failed`].
    pub async fn extract(&self, url: &str) -> Result<ArticleMetadata> {
        self.extract_detailed(url).await.map(|e| e.metadata)
    }

    /// Like [`ArticleExtractor::extract`], also reporting which stage
    /// produced the HTML.
    pub async fn extract_detailed(&self, url: &str) -> Result<Extraction> {
        if url.trim().is_empty() {
            return Err(ExtractError::MissingUrl);
        }
        let parsed = Url::parse(url.trim())
            .map_err(|e| ExtractError::Failed(format!("invalid URL `{url}`: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ExtractError::Failed(format!(
                "unsupported URL scheme `{}`: only http and https pages can be extracted",
                parsed.scheme()
            )));
        }

        let (html, source) = self.acquire(&parsed).await?;
        let metadata = self.extractor.extract(url, &html);

        info!(
            target: "pipeline",
            url = %parsed,
            source = ?source,
            title = %metadata.title,
            excerpt_len = metadata.excerpt.len(),
            "pipeline.extracted"
        );
        Ok(Extraction { metadata, source })
    }

    async fn acquire(&self, url: &Url) -> Result<(String, PageSource)> {
        match self.http.get_text(url.as_str()).await {
            Ok(page) if self.detector.is_js_host(url) => {
                info!(target: "pipeline", %url, status = %page.status, "pipeline.fallback.js_host");
            }
            Ok(page) => match self.detector.find_marker(&page.body) {
                Some(marker) => {
                    info!(target: "pipeline", %url, marker, "pipeline.fallback.framework_marker");
                }
                None => return Ok((page.body, PageSource::Static)),
            },
            Err(e) => {
                warn!(target: "pipeline", %url, error = %e, "pipeline.fallback.fetch_failed");
            }
        }

        let html = self.render_detached(url).await?;
        Ok((html, PageSource::Rendered))
    }

    /// Render on its own task so a caller dropping this future does not cut
    /// the browser session short.
    async fn render_detached(&self, url: &Url) -> Result<String> {
        let renderer = Arc::clone(&self.renderer);
        let url = url.clone();
        tokio::spawn(async move { renderer.render(&url).await })
            .await
            .map_err(ExtractError::failed)?
            .map_err(|e| ExtractError::Failed(format!("{e:#}")))
    }
}
