//! Shared plumbing for the pagemeta crates.
//!
//! Currently this is the tracing setup used by host applications and by the
//! extractor's integration tests.
//!
//! ```no_run
//! use pagemeta_common::observability::{init_logging, LogConfig};
//!
//! let path = init_logging(LogConfig::default()).expect("logging initialised");
//! println!("logs go to {}", path.display());
//! ```

pub mod observability;
