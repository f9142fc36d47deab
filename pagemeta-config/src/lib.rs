//! Typed configuration for the extractor, loaded from YAML plus environment.
//!
//! Every knob has a built-in default, so an empty document (or no document at
//! all) yields a working configuration. The heuristic tables, i.e. the
//! JS-heavy host allow-list, framework markers and per-field selector
//! fallbacks, live here as data rather than in the extraction code.
//!
//! Precedence, lowest first: defaults, files/inline YAML in the order they were
//! added, `PAGEMETA__SECTION__KEY` environment variables. String values may
//! reference `${VAR}` which is expanded after merging.
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use std::time::Duration;

mod defaults;

pub use defaults::DEFAULT_USER_AGENT;

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;
const ENV_PREFIX: &str = "PAGEMETA";

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct PagemetaConfig {
    pub fetch: FetchConfig,
    pub render: RenderConfig,
    pub detection: DetectionConfig,
    pub extraction: ExtractionConfig,
}

/// Static fetch stage.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct FetchConfig {
    /// Browser user agent sent by both the fetcher and the headless renderer.
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 10,
        }
    }
}

/// Headless render stage (WebDriver session).
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    /// WebDriver endpoint, e.g. a local chromedriver.
    pub webdriver_url: String,
    pub headless: bool,
    /// Keep Chrome's process sandbox on. Containers without user namespaces
    /// may need to turn this off.
    pub sandbox: bool,
    /// Upper bound for navigation plus the network-idle wait.
    pub navigation_timeout_secs: u64,
    /// Pause after network idle so deferred scripts can run.
    pub settle_delay_ms: u64,
    /// Quiet window with no new network activity that counts as idle.
    pub network_idle_ms: u64,
    pub idle_poll_ms: u64,
    pub window_size: (u32, u32),
}

impl RenderConfig {
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.navigation_timeout_secs)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn network_idle(&self) -> Duration {
        Duration::from_millis(self.network_idle_ms)
    }

    pub fn idle_poll(&self) -> Duration {
        Duration::from_millis(self.idle_poll_ms.max(10))
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            webdriver_url: "http://localhost:9515".into(),
            headless: true,
            sandbox: true,
            navigation_timeout_secs: 30,
            settle_delay_ms: 2_000,
            network_idle_ms: 500,
            idle_poll_ms: 100,
            window_size: (1366, 768),
        }
    }
}

/// Signals that a page needs client-side rendering.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct DetectionConfig {
    /// Hosts (and their subdomains) that always go through the renderer.
    pub js_hosts: Vec<String>,
    /// Case-insensitive substrings that betray a client-side mount point.
    pub framework_markers: Vec<String>,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            js_hosts: defaults::js_hosts(),
            framework_markers: defaults::framework_markers(),
        }
    }
}

/// One step of a fallback table: a CSS selector plus where to read the value.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct SelectorRule {
    pub selector: String,
    /// Attribute holding the value; `None` reads the element's text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attr: Option<String>,
}

impl SelectorRule {
    /// Read the `content` attribute, as on `<meta>` tags.
    pub fn content(selector: &str) -> Self {
        Self::attr(selector, "content")
    }

    pub fn attr(selector: &str, attr: &str) -> Self {
        Self {
            selector: selector.to_string(),
            attr: Some(attr.to_string()),
        }
    }

    pub fn text(selector: &str) -> Self {
        Self {
            selector: selector.to_string(),
            attr: None,
        }
    }
}

/// Field tables and limits for the metadata extractor.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ExtractionConfig {
    pub title: Vec<SelectorRule>,
    pub description: Vec<SelectorRule>,
    pub site_name: Vec<SelectorRule>,
    pub thumbnail: Vec<SelectorRule>,
    pub published_at: Vec<SelectorRule>,
    /// Containers tried in order for the body excerpt.
    pub content_selectors: Vec<String>,
    /// Subtrees dropped before reading excerpt text.
    pub noise_selectors: Vec<String>,
    pub title_placeholder: String,
    /// Character cap for display fields.
    pub display_limit: usize,
    pub excerpt_limit: usize,
    /// Cap when the excerpt falls back to the whole `<body>`.
    pub body_fallback_limit: usize,
    /// Use the URL host when no site name tag is present.
    pub site_name_from_host: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            title: defaults::title_rules(),
            description: defaults::description_rules(),
            site_name: defaults::site_name_rules(),
            thumbnail: defaults::thumbnail_rules(),
            published_at: defaults::published_at_rules(),
            content_selectors: defaults::content_selectors(),
            noise_selectors: defaults::noise_selectors(),
            title_placeholder: "Untitled".into(),
            display_limit: 255,
            excerpt_limit: 300,
            body_fallback_limit: 1_000,
            site_name_from_host: true,
        }
    }
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder over the `config` crate (files + inline YAML + env overrides).
pub struct PagemetaConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for PagemetaConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl PagemetaConfigLoader {
    /// Start from built-in defaults.
    ///
    /// ```
    /// use pagemeta_config::PagemetaConfigLoader;
    ///
    /// let config = PagemetaConfigLoader::new()
    ///     .with_yaml_str("fetch:\n  timeout_secs: 4")
    ///     .load()
    ///     .expect("valid config");
    ///
    /// assert_eq!(config.fetch.timeout_secs, 4);
    /// assert_eq!(config.render.navigation_timeout_secs, 30);
    /// ```
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
        }
    }

    /// Attach a required YAML/TOML/JSON file; format is inferred from the suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Attach a file that may be absent, for env-only deployments.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Merge an inline YAML snippet.
    ///
    /// ```
    /// use pagemeta_config::PagemetaConfigLoader;
    ///
    /// let cfg = PagemetaConfigLoader::new()
    ///     .with_yaml_str(
    ///         r#"
    /// detection:
    ///   js_hosts: ["spa.example"]
    /// extraction:
    ///   title_placeholder: "(no title)"
    /// "#,
    ///     )
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(cfg.detection.js_hosts, vec!["spa.example".to_string()]);
    /// assert_eq!(cfg.extraction.title_placeholder, "(no title)");
    /// assert_eq!(cfg.extraction.display_limit, 255);
    /// ```
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Merge all sources, layer `PAGEMETA__` environment overrides on top,
    /// expand `${VAR}` placeholders, then deserialize.
    pub fn load(self) -> Result<PagemetaConfig, ConfigError> {
        let cfg = self
            .builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))
    }
}
