//! # sitegen-core
//!
//! Library for generating sitemap files (and sitemap index files) that
//! conform to the sitemaps.org protocol and its vendor extensions, such as
//! the Google News dialect.
//!
//! Callers enumerate the URLs of a website; sitegen-core batches them into
//! protocol-sized groups, renders each group into an XML document, writes
//! the documents to disk under sequential names, and, when more than one
//! file is needed, produces a `<sitemapindex>` document referencing them.
//!
//! ## Architecture
//!
//! - **Records**: [`UrlEntry`] for plain web sitemaps, [`NewsEntry`] for
//!   the news variant. Immutable once built; required fields are enforced
//!   at construction.
//! - **Renderers**: one [`EntryRenderer`] per variant turns a record into
//!   a `<url>` fragment and declares the extra XML namespaces it needs.
//! - **Batching engine**: [`SitemapGenerator`] accumulates rendered
//!   records and flushes a file whenever the per-file URL count or byte
//!   size limit would be exceeded.
//! - **Index builder**: runs at finalization when the session produced
//!   more than one file.
//!
//! ## Quick Start
//!
//! ```no_run
//! use sitegen_core::{Result, UrlEntry, WebSitemapGenerator};
//!
//! fn main() -> Result<()> {
//!     let mut generator = WebSitemapGenerator::new("https://example.com", "/var/www/out")?;
//!     generator.add(UrlEntry::parse("https://example.com/")?)?;
//!     generator.add(UrlEntry::parse("https://example.com/about")?)?;
//!
//!     let output = generator.finalize()?;
//!     for file in &output.files {
//!         println!("wrote {}", file.path.display());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, Error>`](Result) and fail at the call
//! that caused the problem: bad settings at generator construction, bad
//! records at submission, sink failures at flush time. See [`Error`].

/// The base web URL record and fields shared by all variants
pub mod entry;
/// Error types and result alias
pub mod error;
/// The batching engine and session lifecycle
pub mod generator;
/// Sitemap index document assembly
mod index;
/// The Google News URL record variant
pub mod news;
/// Generator-wide configuration
pub mod options;
/// Variant renderers producing XML fragments
pub mod render;
/// W3C datetime profile formatting
pub mod w3c;
/// Batch serialization and the file sink
pub mod writer;

pub use entry::{ChangeFrequency, SitemapUrl, UrlEntry, UrlEntryBuilder};
pub use error::{Error, Result};
pub use generator::{NewsSitemapGenerator, SessionOutput, SitemapGenerator, WebSitemapGenerator};
pub use news::{NewsAccess, NewsEntry, NewsEntryBuilder};
pub use options::{
    DEFAULT_INDEX_NAME, DEFAULT_PREFIX, GeneratorOptions, GeneratorOptionsBuilder,
    MAX_BYTES_PER_FILE,
};
pub use render::{EntryRenderer, NEWS_NS, NewsRenderer, SITEMAP_NS, WebRenderer};
pub use w3c::W3cPrecision;
pub use writer::WrittenFile;
