//! Decides whether a statically fetched page is a client-rendered shell.

use pagemeta_config::DetectionConfig;
use url::Url;

#[derive(Debug, Clone)]
pub struct JsDetector {
    hosts: Vec<String>,
    markers: Vec<String>,
}

impl JsDetector {
    pub fn new(config: &DetectionConfig) -> Self {
        let normalize = |items: &[String]| -> Vec<String> {
            items
                .iter()
                .map(|s| s.trim().to_ascii_lowercase())
                .filter(|s| !s.is_empty())
                .collect()
        };
        Self {
            hosts: normalize(&config.js_hosts),
            markers: normalize(&config.framework_markers),
        }
    }

    /// True if the host is a known JS-heavy domain (or a subdomain of one).
    pub fn is_js_host(&self, url: &Url) -> bool {
        let Some(host) = url.host_str() else {
            return false;
        };
        let host = host.trim_end_matches('.').to_ascii_lowercase();
        self.hosts.iter().any(|known| {
            host == *known
                || host
                    .strip_suffix(known.as_str())
                    .is_some_and(|prefix| prefix.ends_with('.'))
        })
    }

    /// First framework mount marker found in `html`, if any.
    pub fn find_marker(&self, html: &str) -> Option<&str> {
        let lower = html.to_ascii_lowercase();
        self.markers
            .iter()
            .find(|marker| lower.contains(marker.as_str()))
            .map(String::as_str)
    }

    /// Whether the page needs a headless render to be useful.
    pub fn requires_js(&self, html: &str, url: &Url) -> bool {
        self.is_js_host(url) || self.find_marker(html).is_some()
    }
}
