//! Ordered-fallback metadata extraction over a parsed DOM.
//!
//! Each field walks its [`SelectorRule`] table and takes the first non-empty
//! value; tables and limits come from [`ExtractionConfig`].

use crate::error::{ExtractError, Result};
use crate::record::ArticleMetadata;
use crate::text::{clip_chars, display_field, normalize_whitespace};
use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use pagemeta_config::{ExtractionConfig, SelectorRule};
use scraper::{ElementRef, Html, Selector};
use url::Url;

struct CompiledRule {
    selector: Selector,
    attr: Option<String>,
}

impl CompiledRule {
    fn compile(rule: &SelectorRule) -> Result<Self> {
        Ok(Self {
            selector: parse_selector(&rule.selector)?,
            attr: rule.attr.clone(),
        })
    }

    fn value(&self, el: ElementRef<'_>) -> Option<String> {
        match &self.attr {
            Some(attr) => el.value().attr(attr).map(str::to_string),
            None => Some(el.text().collect()),
        }
    }
}

fn parse_selector(raw: &str) -> Result<Selector> {
    Selector::parse(raw).map_err(|e| ExtractError::Config(format!("selector `{raw}`: {e}")))
}

fn compile_rules(rules: &[SelectorRule]) -> Result<Vec<CompiledRule>> {
    rules.iter().map(CompiledRule::compile).collect()
}

fn compile_selectors(raw: &[String]) -> Result<Vec<Selector>> {
    raw.iter().map(|s| parse_selector(s)).collect()
}

/// Compiled selector tables plus the output length policy.
pub struct MetadataExtractor {
    title: Vec<CompiledRule>,
    description: Vec<CompiledRule>,
    site_name: Vec<CompiledRule>,
    thumbnail: Vec<CompiledRule>,
    published_at: Vec<CompiledRule>,
    content: Vec<Selector>,
    noise: Vec<Selector>,
    body: Selector,
    title_placeholder: String,
    display_limit: usize,
    excerpt_limit: usize,
    body_fallback_limit: usize,
    site_name_from_host: bool,
}

impl MetadataExtractor {
    /// Compile every selector up front; a bad selector is a config error.
    pub fn new(config: &ExtractionConfig) -> Result<Self> {
        Ok(Self {
            title: compile_rules(&config.title)?,
            description: compile_rules(&config.description)?,
            site_name: compile_rules(&config.site_name)?,
            thumbnail: compile_rules(&config.thumbnail)?,
            published_at: compile_rules(&config.published_at)?,
            content: compile_selectors(&config.content_selectors)?,
            noise: compile_selectors(&config.noise_selectors)?,
            body: parse_selector("body")?,
            title_placeholder: config.title_placeholder.clone(),
            display_limit: config.display_limit,
            excerpt_limit: config.excerpt_limit,
            body_fallback_limit: config.body_fallback_limit,
            site_name_from_host: config.site_name_from_host,
        })
    }

    /// Extract metadata from `html` fetched for `url`.
    pub fn extract(&self, url: &str, html: &str) -> ArticleMetadata {
        self.extract_at(url, html, Utc::now())
    }

    /// Like [`MetadataExtractor::extract`], with `now` used as the
    /// publication date when the page carries none.
    pub fn extract_at(&self, url: &str, html: &str, now: DateTime<Utc>) -> ArticleMetadata {
        let document = Html::parse_document(html);
        let base = Url::parse(url).ok();
        let limit = self.display_limit;

        let title = first_match(&document, &self.title)
            .unwrap_or_else(|| self.title_placeholder.clone());

        let description = first_match(&document, &self.description).unwrap_or_default();

        let site_name = first_match(&document, &self.site_name)
            .or_else(|| {
                self.site_name_from_host
                    .then(|| base.as_ref().and_then(host_label))
                    .flatten()
            })
            .unwrap_or_default();

        let thumbnail_url = first_match(&document, &self.thumbnail)
            .map(|raw| resolve(base.as_ref(), &raw))
            .unwrap_or_default();

        let published_at = self
            .published_at
            .iter()
            .flat_map(|rule| document.select(&rule.selector).filter_map(|el| rule.value(el)))
            .find_map(|raw| parse_published(&raw))
            .unwrap_or(now);

        ArticleMetadata {
            url: url.to_string(),
            site_name: display_field(&site_name, limit),
            title: display_field(&title, limit),
            description: display_field(&description, limit),
            published_at: published_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            thumbnail_url: display_field(&thumbnail_url, limit),
            excerpt: self.excerpt(&document),
        }
    }

    /// Leading text of the main content container, or of `<body>` when no
    /// container yields any text.
    fn excerpt(&self, document: &Html) -> String {
        for selector in &self.content {
            for el in document.select(selector) {
                let text = normalize_whitespace(&self.visible_text(el));
                if !text.is_empty() {
                    return clip_chars(&text, self.excerpt_limit);
                }
            }
        }

        document
            .select(&self.body)
            .next()
            .map(|body| {
                let text = normalize_whitespace(&self.visible_text(body));
                clip_chars(&text, self.body_fallback_limit)
            })
            .unwrap_or_default()
    }

    fn visible_text(&self, el: ElementRef<'_>) -> String {
        let mut out = String::new();
        self.push_visible_text(el, &mut out);
        out
    }

    /// Element boundaries become spaces so adjacent blocks do not run
    /// together; callers collapse the extra whitespace.
    fn push_visible_text(&self, el: ElementRef<'_>, out: &mut String) {
        for child in el.children() {
            if let Some(text) = child.value().as_text() {
                out.push_str(text);
            } else if let Some(child_el) = ElementRef::wrap(child) {
                if !self.is_noise(&child_el) {
                    out.push(' ');
                    self.push_visible_text(child_el, out);
                    out.push(' ');
                }
            }
        }
    }

    fn is_noise(&self, el: &ElementRef<'_>) -> bool {
        self.noise.iter().any(|sel| sel.matches(el))
    }
}

/// First non-blank value produced by the rule table, in rule order.
fn first_match(document: &Html, rules: &[CompiledRule]) -> Option<String> {
    rules.iter().find_map(|rule| {
        document
            .select(&rule.selector)
            .filter_map(|el| rule.value(el))
            .map(|v| normalize_whitespace(&v))
            .find(|v| !v.is_empty())
    })
}

fn host_label(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    let host = host.strip_prefix("www.").unwrap_or(host);
    (!host.is_empty()).then(|| host.to_string())
}

fn resolve(base: Option<&Url>, raw: &str) -> String {
    base.and_then(|b| b.join(raw).ok())
        .map(|u| u.to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// Parse a publication date in the formats publishers commonly emit.
fn parse_published(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }

    // Offset-less timestamps are taken as UTC.
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(ndt.and_utc());
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|ndt| ndt.and_utc())
}
