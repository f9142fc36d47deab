//! Article metadata extraction for arbitrary URLs.
//!
//! - Static fetch first (`pagemeta-http`), headless render when the page is a
//!   client-side shell or the fetch fails (`browser`)
//! - JS-requirement heuristic (`detect`)
//! - Ordered selector fallbacks over the parsed DOM (`extract`)
//! - Output length/whitespace policy (`text`)
//!
//! ```no_run
//! # async fn demo() -> Result<(), pagemeta_web::ExtractError> {
//! use pagemeta_config::PagemetaConfig;
//! use pagemeta_web::ArticleExtractor;
//!
//! let extractor = ArticleExtractor::from_config(&PagemetaConfig::default())?;
//! let meta = extractor.extract("https://example.com/news/story").await?;
//! println!("{} ({})", meta.title, meta.published_at);
//! # Ok(()) }
//! ```

pub mod browser;
pub mod detect;
pub mod error;
pub mod extract;
pub mod pipeline;
pub mod record;
pub mod text;

pub use error::ExtractError;
pub use pipeline::ArticleExtractor;
pub use record::{ArticleMetadata, ExtractRequest, Extraction, PageSource};
