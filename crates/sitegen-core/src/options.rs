//! Generator-wide configuration.
//!
//! Options are plain data: a [`GeneratorOptions`] is built once through the
//! by-value [`GeneratorOptionsBuilder`], validated in `build()`, and then
//! never mutated for the lifetime of a session. Limits that depend on the
//! URL variant (the per-file URL ceiling) are checked again when the
//! generator is constructed, since only the renderer knows its ceiling.

use std::path::PathBuf;

use url::Url;

use crate::error::{Error, Result};
use crate::w3c::W3cPrecision;

/// Default output file name prefix: `sitemap.xml`, `sitemap1.xml`, ...
pub const DEFAULT_PREFIX: &str = "sitemap";

/// Default name of the sitemap index file.
pub const DEFAULT_INDEX_NAME: &str = "sitemap_index.xml";

/// Protocol ceiling on the uncompressed size of one sitemap file: 10 MB.
pub const MAX_BYTES_PER_FILE: usize = 10 * 1024 * 1024;

/// Configuration for one generator session.
///
/// All URLs in the generated sitemap(s) should appear under `base_url`;
/// files are written into `out_dir`, which must already exist.
///
/// ```
/// use sitegen_core::GeneratorOptions;
/// use url::Url;
///
/// let base = Url::parse("https://example.com")?;
/// let options = GeneratorOptions::builder(base, "/tmp")
///     .max_urls(10_000)
///     .prefix("map")
///     .build()?;
/// assert_eq!(options.prefix, "map");
/// # Ok::<(), sitegen_core::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct GeneratorOptions {
    /// Base URL every submitted entry must fall under (unless
    /// `validate_urls` is off). Also the base for derived public file URLs.
    pub base_url: Url,
    /// Directory the sitemap files are written into. Must exist.
    pub out_dir: PathBuf,
    /// Per-file URL limit. `None` means the variant's protocol ceiling;
    /// a value above that ceiling fails generator construction.
    pub max_urls: Option<usize>,
    /// Per-file byte limit for the serialized document.
    pub max_bytes: usize,
    /// Output file name prefix.
    pub prefix: String,
    /// Precision for every timestamp written during the session.
    pub precision: W3cPrecision,
    /// Whether a full batch is flushed automatically. When off, submitting
    /// past a limit is a capacity error instead.
    pub auto_flush: bool,
    /// Whether submitted URLs are checked to fall under `base_url`.
    pub validate_urls: bool,
    /// Name of the sitemap index file.
    pub index_name: String,
    /// Public URL of the index file itself; derived from `base_url` and
    /// `index_name` when absent.
    pub index_url: Option<Url>,
}

impl GeneratorOptions {
    /// Start building options from the two mandatory settings.
    pub fn builder(base_url: Url, out_dir: impl Into<PathBuf>) -> GeneratorOptionsBuilder {
        GeneratorOptionsBuilder {
            base_url,
            out_dir: out_dir.into(),
            max_urls: None,
            max_bytes: None,
            prefix: None,
            precision: None,
            auto_flush: None,
            validate_urls: None,
            index_name: None,
            index_url: None,
        }
    }
}

/// Builder for [`GeneratorOptions`].
#[derive(Debug, Clone)]
pub struct GeneratorOptionsBuilder {
    base_url: Url,
    out_dir: PathBuf,
    max_urls: Option<usize>,
    max_bytes: Option<usize>,
    prefix: Option<String>,
    precision: Option<W3cPrecision>,
    auto_flush: Option<bool>,
    validate_urls: Option<bool>,
    index_name: Option<String>,
    index_url: Option<Url>,
}

impl GeneratorOptionsBuilder {
    /// Sets the per-file URL limit (defaults to the variant ceiling).
    #[must_use]
    pub const fn max_urls(mut self, max_urls: usize) -> Self {
        self.max_urls = Some(max_urls);
        self
    }

    /// Sets the per-file byte limit (defaults to
    /// [`MAX_BYTES_PER_FILE`]).
    #[must_use]
    pub const fn max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = Some(max_bytes);
        self
    }

    /// Sets the output file name prefix (defaults to
    /// [`DEFAULT_PREFIX`]).
    #[must_use]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Sets the timestamp precision (defaults to seconds).
    #[must_use]
    pub const fn precision(mut self, precision: W3cPrecision) -> Self {
        self.precision = Some(precision);
        self
    }

    /// Enables or disables automatic flushing of full batches (default on).
    #[must_use]
    pub const fn auto_flush(mut self, auto_flush: bool) -> Self {
        self.auto_flush = Some(auto_flush);
        self
    }

    /// Enables or disables base-URL validation of submissions (default on).
    #[must_use]
    pub const fn validate_urls(mut self, validate_urls: bool) -> Self {
        self.validate_urls = Some(validate_urls);
        self
    }

    /// Sets the sitemap index file name (defaults to
    /// [`DEFAULT_INDEX_NAME`]).
    #[must_use]
    pub fn index_name(mut self, index_name: impl Into<String>) -> Self {
        self.index_name = Some(index_name.into());
        self
    }

    /// Sets the public URL of the index file itself.
    #[must_use]
    pub fn index_url(mut self, index_url: Url) -> Self {
        self.index_url = Some(index_url);
        self
    }

    /// Builds the options, validating every setting.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for a base URL that cannot have files
    /// joined onto it, a zero limit, an empty or path-unsafe prefix, or an
    /// empty index file name.
    pub fn build(self) -> Result<GeneratorOptions> {
        if self.base_url.cannot_be_a_base() {
            return Err(Error::Config(format!(
                "base URL {} cannot have file names joined onto it",
                self.base_url
            )));
        }
        if self.max_urls == Some(0) {
            return Err(Error::Config("max_urls must be at least 1".to_string()));
        }
        let max_bytes = self.max_bytes.unwrap_or(MAX_BYTES_PER_FILE);
        if max_bytes == 0 {
            return Err(Error::Config("max_bytes must be at least 1".to_string()));
        }
        let prefix = self.prefix.unwrap_or_else(|| DEFAULT_PREFIX.to_string());
        if prefix.is_empty() || !is_safe_file_stem(&prefix) {
            return Err(Error::Config(format!(
                "prefix {prefix:?} must be a plain file name stem"
            )));
        }
        let index_name = self
            .index_name
            .unwrap_or_else(|| DEFAULT_INDEX_NAME.to_string());
        if index_name.is_empty() || !is_safe_file_stem(index_name.trim_end_matches(".xml")) {
            return Err(Error::Config(format!(
                "index file name {index_name:?} must be a plain file name"
            )));
        }

        Ok(GeneratorOptions {
            base_url: self.base_url,
            out_dir: self.out_dir,
            max_urls: self.max_urls,
            max_bytes,
            prefix,
            precision: self.precision.unwrap_or_default(),
            auto_flush: self.auto_flush.unwrap_or(true),
            validate_urls: self.validate_urls.unwrap_or(true),
            index_name,
            index_url: self.index_url,
        })
    }
}

/// Only a conservative set of file name characters is accepted, so the
/// resulting paths stay rooted in the output directory on every platform.
fn is_safe_file_stem(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        && !name.contains("..")
}
