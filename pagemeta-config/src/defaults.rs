//! Built-in heuristic tables.
//!
//! Selector order per field: canonical `property`, `name` attribute, Open Graph,
//! Twitter card, then structural fallbacks.

use crate::SelectorRule;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

pub(crate) fn js_hosts() -> Vec<String> {
    [
        "twitter.com",
        "x.com",
        "instagram.com",
        "facebook.com",
        "threads.net",
        "tiktok.com",
        "linkedin.com",
        "medium.com",
        "substack.com",
        "reddit.com",
        "notion.site",
        "bloomberg.com",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// Empty mount points only. Hydration attributes (`data-reactroot`,
/// `data-server-rendered`, `__NEXT_DATA__`, `ng-version`) also appear on fully
/// server-rendered pages and are left out.
pub(crate) fn framework_markers() -> Vec<String> {
    [
        r#"<div id="root"></div>"#,
        r#"<div id="app"></div>"#,
        r#"<div id="__next"></div>"#,
        r#"<div id="__nuxt"></div>"#,
        "<app-root></app-root>",
        "you need to enable javascript to run this app",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

pub(crate) fn title_rules() -> Vec<SelectorRule> {
    vec![
        SelectorRule::content(r#"meta[property="title"]"#),
        SelectorRule::content(r#"meta[name="title"]"#),
        SelectorRule::content(r#"meta[property="og:title"]"#),
        SelectorRule::content(r#"meta[name="twitter:title"]"#),
        SelectorRule::content(r#"meta[property="twitter:title"]"#),
        SelectorRule::text("h1"),
        SelectorRule::text("title"),
    ]
}

pub(crate) fn description_rules() -> Vec<SelectorRule> {
    vec![
        SelectorRule::content(r#"meta[property="description"]"#),
        SelectorRule::content(r#"meta[name="description"]"#),
        SelectorRule::content(r#"meta[property="og:description"]"#),
        SelectorRule::content(r#"meta[name="twitter:description"]"#),
        SelectorRule::content(r#"meta[property="twitter:description"]"#),
    ]
}

pub(crate) fn site_name_rules() -> Vec<SelectorRule> {
    vec![
        SelectorRule::content(r#"meta[property="site_name"]"#),
        SelectorRule::content(r#"meta[name="application-name"]"#),
        SelectorRule::content(r#"meta[property="og:site_name"]"#),
        SelectorRule::content(r#"meta[name="twitter:site"]"#),
    ]
}

pub(crate) fn thumbnail_rules() -> Vec<SelectorRule> {
    vec![
        SelectorRule::content(r#"meta[property="image"]"#),
        SelectorRule::content(r#"meta[name="thumbnail"]"#),
        SelectorRule::content(r#"meta[property="og:image"]"#),
        SelectorRule::content(r#"meta[property="og:image:url"]"#),
        SelectorRule::content(r#"meta[name="twitter:image"]"#),
        SelectorRule::content(r#"meta[property="twitter:image"]"#),
        SelectorRule::content(r#"meta[name="twitter:image:src"]"#),
        SelectorRule::attr(r#"link[rel="image_src"]"#, "href"),
    ]
}

pub(crate) fn published_at_rules() -> Vec<SelectorRule> {
    vec![
        SelectorRule::content(r#"meta[property="article:published_time"]"#),
        SelectorRule::content(r#"meta[name="article:published_time"]"#),
        SelectorRule::content(r#"meta[property="og:published_time"]"#),
        SelectorRule::content(r#"meta[name="pubdate"]"#),
        SelectorRule::content(r#"meta[name="publishdate"]"#),
        SelectorRule::content(r#"meta[name="date"]"#),
        SelectorRule::content(r#"meta[itemprop="datePublished"]"#),
        SelectorRule::attr("time[datetime]", "datetime"),
    ]
}

pub(crate) fn content_selectors() -> Vec<String> {
    [
        "article",
        r#"[itemprop="articleBody"]"#,
        r#"[role="main"]"#,
        "main",
        ".post-content",
        ".entry-content",
        ".article-content",
        ".article-body",
        "#content",
        ".content",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

pub(crate) fn noise_selectors() -> Vec<String> {
    ["script", "style", "nav", "header", "footer", "aside"]
        .into_iter()
        .map(String::from)
        .collect()
}
