use serde::{Deserialize, Serialize};

/// Metadata for one article URL. Every field is always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleMetadata {
    /// The requested URL, verbatim.
    pub url: String,
    pub site_name: String,
    pub title: String,
    pub description: String,
    /// RFC 3339 timestamp.
    pub published_at: String,
    pub thumbnail_url: String,
    /// Leading body text, whitespace-normalized.
    pub excerpt: String,
}

/// Which stage produced the HTML that was parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageSource {
    Static,
    Rendered,
}

/// Metadata plus how it was obtained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extraction {
    pub metadata: ArticleMetadata,
    pub source: PageSource,
}

/// Form-style input: the URL field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractRequest {
    #[serde(default)]
    pub url: Option<String>,
}
