//! The batching engine driving a sitemap generation session.
//!
//! A [`SitemapGenerator`] accepts a stream of URL records, renders each one
//! eagerly, and groups the rendered fragments into batches bounded by two
//! independent limits: the per-file URL count and the per-file serialized
//! byte size. Whenever the next record would push the open batch past a
//! limit, the batch is flushed into a sequentially named file. At
//! finalization a lone output file is renamed to `{prefix}.xml`, while
//! multiple files get a `<sitemapindex>` document referencing them.
//!
//! The engine is single-threaded and synchronous: it owns all of its state
//! exclusively, and `add`/`finalize` run to completion before returning.
//! Callers that feed one generator from several threads must serialize the
//! calls themselves.

use std::fs;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};
use url::Url;

use crate::entry::SitemapUrl;
use crate::error::{Error, Result};
use crate::index;
use crate::options::GeneratorOptions;
use crate::render::{EntryRenderer, NewsRenderer, WebRenderer};
use crate::writer::{self, WrittenFile};

/// Generator for plain web sitemaps.
pub type WebSitemapGenerator = SitemapGenerator<WebRenderer>;

/// Generator for Google News sitemaps.
pub type NewsSitemapGenerator = SitemapGenerator<NewsRenderer>;

/// Everything a finished session produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionOutput {
    /// The sitemap files, in sequence order.
    pub files: Vec<WrittenFile>,
    /// The sitemap index file, present only when more than one sitemap
    /// file was written.
    pub index: Option<WrittenFile>,
}

/// Batches URL records of one variant into sitemap files.
///
/// Generic over an [`EntryRenderer`] and its record type; the engine never
/// inspects variant-specific fields itself. See the crate docs for a full
/// example.
#[derive(Debug)]
pub struct SitemapGenerator<R: EntryRenderer> {
    options: GeneratorOptions,
    renderer: R,
    /// Effective per-file URL limit, at most the variant ceiling.
    max_urls: usize,
    /// Serialized size of a document with zero entries.
    overhead: usize,
    /// Rendered fragments of the open batch, in insertion order.
    fragments: Vec<String>,
    /// Bytes the open batch contributes to its document.
    batch_bytes: usize,
    files: Vec<WrittenFile>,
    finished: bool,
}

impl SitemapGenerator<WebRenderer> {
    /// Create a web sitemap generator with default options.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`] for an unparseable base URL and
    /// [`Error::Config`] for an unusable output directory.
    pub fn new(base_url: &str, out_dir: impl Into<std::path::PathBuf>) -> Result<Self> {
        let options = GeneratorOptions::builder(Url::parse(base_url)?, out_dir).build()?;
        Self::with_options(options, WebRenderer)
    }
}

impl SitemapGenerator<NewsRenderer> {
    /// Create a news sitemap generator with default options.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`] for an unparseable base URL and
    /// [`Error::Config`] for an unusable output directory.
    pub fn new(base_url: &str, out_dir: impl Into<std::path::PathBuf>) -> Result<Self> {
        let options = GeneratorOptions::builder(Url::parse(base_url)?, out_dir).build()?;
        Self::with_options(options, NewsRenderer)
    }
}

impl<R: EntryRenderer> SitemapGenerator<R> {
    /// Create a generator from prepared options and a renderer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the configured `max_urls` exceeds the
    /// variant's protocol ceiling or the output directory does not exist.
    /// Limits are enforced here, at construction, never at write time.
    pub fn with_options(options: GeneratorOptions, renderer: R) -> Result<Self> {
        let max_urls = options.max_urls.unwrap_or(R::MAX_URLS);
        if max_urls > R::MAX_URLS {
            return Err(Error::Config(format!(
                "max_urls {max_urls} exceeds this variant's ceiling of {} URLs per sitemap",
                R::MAX_URLS
            )));
        }
        if !options.out_dir.is_dir() {
            return Err(Error::Config(format!(
                "output directory {} does not exist",
                options.out_dir.display()
            )));
        }
        let overhead = writer::document_overhead(renderer.namespaces())?;

        Ok(Self {
            options,
            renderer,
            max_urls,
            overhead,
            fragments: Vec::new(),
            batch_bytes: 0,
            files: Vec::new(),
            finished: false,
        })
    }

    /// The options this session runs with.
    #[must_use]
    pub const fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    /// Number of records waiting in the open batch.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.fragments.len()
    }

    /// Submit one URL record.
    ///
    /// The record is validated, rendered, and appended to the open batch;
    /// if it would push the batch past the URL-count or byte limit, the
    /// batch is flushed to a file first (with `auto_flush` disabled this
    /// is a capacity error instead and the batch is left untouched).
    ///
    /// A single record whose rendered form alone exceeds the byte limit is
    /// still accepted into an otherwise empty batch (one entry cannot be
    /// split across files) and the resulting file will be oversized.
    ///
    /// # Errors
    ///
    /// [`Error::Finished`] after `finalize`, [`Error::Validation`] for a
    /// URL outside the configured base, [`Error::Capacity`] when a limit
    /// is hit with `auto_flush` off, [`Error::Io`] if flushing fails.
    #[instrument(skip_all, fields(url = %entry.url()))]
    pub fn add(&mut self, entry: R::Entry) -> Result<()> {
        if self.finished {
            return Err(Error::Finished);
        }
        if self.options.validate_urls
            && !entry
                .url()
                .as_str()
                .starts_with(self.options.base_url.as_str())
        {
            return Err(Error::Validation(format!(
                "URL {} is not under the base URL {}",
                entry.url(),
                self.options.base_url
            )));
        }

        let fragment = self.renderer.render(&entry, self.options.precision)?;
        let cost = fragment.len() + 1;

        let over_count = self.fragments.len() + 1 > self.max_urls;
        let over_bytes = !self.fragments.is_empty()
            && self.overhead + self.batch_bytes + cost > self.options.max_bytes;
        if over_count || over_bytes {
            if !self.options.auto_flush {
                return Err(Error::Capacity(format!(
                    "adding this URL would exceed {} URLs or {} bytes per file and auto_flush is disabled",
                    self.max_urls, self.options.max_bytes
                )));
            }
            self.flush_batch()?;
        }

        if self.overhead + cost > self.options.max_bytes {
            warn!(
                url = %entry.url(),
                bytes = cost,
                max_bytes = self.options.max_bytes,
                "Entry alone exceeds the byte limit; writing an oversized file"
            );
        }

        self.fragments.push(fragment);
        self.batch_bytes += cost;
        Ok(())
    }

    /// Submit several URL records in order.
    ///
    /// # Errors
    ///
    /// Stops at the first record that fails; see [`Self::add`].
    pub fn add_all(&mut self, entries: impl IntoIterator<Item = R::Entry>) -> Result<()> {
        for entry in entries {
            self.add(entry)?;
        }
        Ok(())
    }

    /// Finish the session: flush the open batch, settle file names, and
    /// write the sitemap index if more than one file was produced.
    ///
    /// An empty open batch is discarded silently; an empty `<urlset>`
    /// file is never written. When exactly one file was produced it is
    /// renamed from `{prefix}1.xml` to `{prefix}.xml`. After this call the
    /// generator rejects further submissions.
    ///
    /// # Errors
    ///
    /// [`Error::Finished`] on a second call, [`Error::Io`] if a write or
    /// rename fails.
    #[instrument(skip(self))]
    pub fn finalize(&mut self) -> Result<SessionOutput> {
        if self.finished {
            return Err(Error::Finished);
        }
        self.flush_batch()?;
        self.finished = true;

        if self.files.len() == 1 {
            let final_name = format!("{}.xml", self.options.prefix);
            let final_path = self.options.out_dir.join(&final_name);
            fs::rename(&self.files[0].path, &final_path)?;
            let public_url = self.options.base_url.join(&final_name)?;
            debug!(path = %final_path.display(), "Renamed sole sitemap file");

            let file = &mut self.files[0];
            file.path = final_path;
            file.public_url = public_url;
        }

        let index = if self.files.len() > 1 {
            Some(self.write_index()?)
        } else {
            None
        };

        debug!(
            files = self.files.len(),
            index = index.is_some(),
            "Finalized sitemap session"
        );
        Ok(SessionOutput {
            files: std::mem::take(&mut self.files),
            index,
        })
    }

    /// Write the open batch as the next file in the sequence.
    ///
    /// The batch is consumed up front: if the write fails, its records are
    /// lost rather than silently retried, and no file is registered.
    fn flush_batch(&mut self) -> Result<()> {
        if self.fragments.is_empty() {
            return Ok(());
        }
        let fragments = std::mem::take(&mut self.fragments);
        self.batch_bytes = 0;

        let sequence = self.files.len() + 1;
        let name = format!("{}{}.xml", self.options.prefix, sequence);
        let path = self.options.out_dir.join(&name);

        let doc = writer::build_urlset(&fragments, self.renderer.namespaces())?;
        writer::write_atomic(&path, &doc)?;

        let public_url = self.options.base_url.join(&name)?;
        debug!(
            sequence,
            urls = fragments.len(),
            bytes = doc.len(),
            "Flushed sitemap batch"
        );
        self.files.push(WrittenFile {
            sequence,
            path,
            public_url,
            lastmod: Utc::now(),
        });
        Ok(())
    }

    fn write_index(&self) -> Result<WrittenFile> {
        let doc = index::build_index(&self.files, self.options.precision)?;
        let path = self.options.out_dir.join(&self.options.index_name);
        writer::write_atomic(&path, &doc)?;

        let public_url = match &self.options.index_url {
            Some(url) => url.clone(),
            None => self.options.base_url.join(&self.options.index_name)?,
        };
        Ok(WrittenFile {
            sequence: 0,
            path,
            public_url,
            lastmod: Utc::now(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::entry::UrlEntry;
    use crate::news::NewsEntry;
    use chrono::DateTime;
    use tempfile::TempDir;

    fn entry(path: &str) -> UrlEntry {
        UrlEntry::parse(&format!("https://example.com/{path}")).unwrap()
    }

    fn url_elements(doc: &str) -> usize {
        doc.matches("<url>").count()
    }

    #[test]
    fn test_single_file_is_renamed_to_bare_prefix() {
        let dir = TempDir::new().unwrap();
        let mut generator = WebSitemapGenerator::new("https://example.com", dir.path()).unwrap();

        generator.add(entry("a")).unwrap();
        generator.add(entry("b")).unwrap();
        let output = generator.finalize().unwrap();

        assert_eq!(output.files.len(), 1);
        assert!(output.index.is_none());
        let file = &output.files[0];
        assert_eq!(file.sequence, 1);
        assert_eq!(file.path, dir.path().join("sitemap.xml"));
        assert_eq!(file.public_url.as_str(), "https://example.com/sitemap.xml");

        let doc = fs::read_to_string(&file.path).unwrap();
        assert_eq!(url_elements(&doc), 2);
        assert!(!dir.path().join("sitemap1.xml").exists());
    }

    #[test]
    fn test_splitting_preserves_order_and_writes_index() {
        let dir = TempDir::new().unwrap();
        let options =
            GeneratorOptions::builder(Url::parse("https://example.com").unwrap(), dir.path())
                .max_urls(2)
                .build()
                .unwrap();
        let mut generator = SitemapGenerator::with_options(options, WebRenderer).unwrap();

        for i in 0..5 {
            generator.add(entry(&format!("page{i}"))).unwrap();
        }
        let output = generator.finalize().unwrap();

        // ceil(5 / 2) files; non-final files full, final file the rest
        assert_eq!(output.files.len(), 3);
        for (i, file) in output.files.iter().enumerate() {
            assert_eq!(file.sequence, i + 1);
            let doc = fs::read_to_string(&file.path).unwrap();
            let expected = if i < 2 { 2 } else { 1 };
            assert_eq!(url_elements(&doc), expected);
        }

        // Insertion order across files
        let first = fs::read_to_string(&output.files[0].path).unwrap();
        assert!(
            first.find("https://example.com/page0").unwrap()
                < first.find("https://example.com/page1").unwrap()
        );

        let index = output.index.unwrap();
        assert_eq!(index.path, dir.path().join("sitemap_index.xml"));
        let index_doc = fs::read_to_string(&index.path).unwrap();
        let positions: Vec<usize> = (1..=3)
            .map(|i| {
                index_doc
                    .find(&format!("https://example.com/sitemap{i}.xml"))
                    .unwrap()
            })
            .collect();
        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn test_add_all_preserves_submission_order() {
        let dir = TempDir::new().unwrap();
        let mut generator = WebSitemapGenerator::new("https://example.com", dir.path()).unwrap();
        assert_eq!(generator.options().prefix, "sitemap");

        generator
            .add_all([entry("a"), entry("b"), entry("c")])
            .unwrap();
        let output = generator.finalize().unwrap();

        let doc = fs::read_to_string(&output.files[0].path).unwrap();
        let positions: Vec<usize> = ["/a<", "/b<", "/c<"]
            .iter()
            .map(|needle| doc.find(*needle).unwrap())
            .collect();
        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn test_news_ceiling_is_enforced_at_construction() {
        let dir = TempDir::new().unwrap();
        let options =
            GeneratorOptions::builder(Url::parse("https://example.com").unwrap(), dir.path())
                .max_urls(2_000)
                .build()
                .unwrap();

        let err = SitemapGenerator::with_options(options, NewsRenderer).unwrap_err();
        assert_eq!(err.category(), "config");
    }

    #[test]
    fn test_missing_output_directory_is_a_config_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");

        let err = WebSitemapGenerator::new("https://example.com", missing).unwrap_err();
        assert_eq!(err.category(), "config");
    }

    #[test]
    fn test_url_outside_base_is_rejected_before_batching() {
        let dir = TempDir::new().unwrap();
        let mut generator = WebSitemapGenerator::new("https://example.com", dir.path()).unwrap();

        let err = generator
            .add(UrlEntry::parse("https://other.com/a").unwrap())
            .unwrap_err();
        assert_eq!(err.category(), "validation");
        assert_eq!(generator.pending(), 0);
    }

    #[test]
    fn test_validation_can_be_disabled() {
        let dir = TempDir::new().unwrap();
        let options =
            GeneratorOptions::builder(Url::parse("https://example.com").unwrap(), dir.path())
                .validate_urls(false)
                .build()
                .unwrap();
        let mut generator = SitemapGenerator::with_options(options, WebRenderer).unwrap();

        generator
            .add(UrlEntry::parse("https://other.com/a").unwrap())
            .unwrap();
        assert_eq!(generator.pending(), 1);
    }

    #[test]
    fn test_disabled_auto_flush_turns_overflow_into_capacity_error() {
        let dir = TempDir::new().unwrap();
        let options =
            GeneratorOptions::builder(Url::parse("https://example.com").unwrap(), dir.path())
                .max_urls(1)
                .auto_flush(false)
                .build()
                .unwrap();
        let mut generator = SitemapGenerator::with_options(options, WebRenderer).unwrap();

        generator.add(entry("a")).unwrap();
        let err = generator.add(entry("b")).unwrap_err();
        assert_eq!(err.category(), "capacity");

        // The session is still usable and keeps the earlier record
        let output = generator.finalize().unwrap();
        assert_eq!(output.files.len(), 1);
        let doc = fs::read_to_string(&output.files[0].path).unwrap();
        assert!(doc.contains("https://example.com/a"));
        assert!(!doc.contains("https://example.com/b"));
    }

    #[test]
    fn test_oversized_record_is_written_alone_rather_than_dropped() {
        let dir = TempDir::new().unwrap();
        let options =
            GeneratorOptions::builder(Url::parse("https://example.com").unwrap(), dir.path())
                .max_bytes(64)
                .build()
                .unwrap();
        let mut generator = SitemapGenerator::with_options(options, WebRenderer).unwrap();

        // Each fragment alone busts the 64-byte document limit
        generator.add(entry("first-very-long-path-component")).unwrap();
        generator.add(entry("second-very-long-path-component")).unwrap();
        let output = generator.finalize().unwrap();

        assert_eq!(output.files.len(), 2);
        for file in &output.files {
            let doc = fs::read_to_string(&file.path).unwrap();
            assert_eq!(url_elements(&doc), 1);
        }
    }

    #[test]
    fn test_empty_session_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let mut generator = WebSitemapGenerator::new("https://example.com", dir.path()).unwrap();

        let output = generator.finalize().unwrap();

        assert!(output.files.is_empty());
        assert!(output.index.is_none());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_submitting_after_finalize_is_an_error() {
        let dir = TempDir::new().unwrap();
        let mut generator = WebSitemapGenerator::new("https://example.com", dir.path()).unwrap();

        generator.add(entry("a")).unwrap();
        generator.finalize().unwrap();

        assert_eq!(generator.add(entry("b")).unwrap_err().category(), "finished");
        assert_eq!(generator.finalize().unwrap_err().category(), "finished");
    }

    #[test]
    fn test_news_generator_end_to_end() {
        let dir = TempDir::new().unwrap();
        let mut generator =
            NewsSitemapGenerator::new("http://www.example.com", dir.path()).unwrap();

        let entry = NewsEntry::builder(
            Url::parse("http://www.example.com/index.html").unwrap(),
            "Beispieltitel",
            DateTime::UNIX_EPOCH,
            "Beispiel",
            "de",
        )
        .build()
        .unwrap();
        generator.add(entry).unwrap();
        let output = generator.finalize().unwrap();

        assert_eq!(output.files.len(), 1);
        let doc = fs::read_to_string(&output.files[0].path).unwrap();
        assert!(doc.contains("xmlns:news=\"http://www.google.com/schemas/sitemap-news/0.9\""));
        assert!(doc.contains("<news:title>Beispieltitel</news:title>"));
    }

    #[test]
    fn test_configured_index_url_is_reported() {
        let dir = TempDir::new().unwrap();
        let index_url = Url::parse("https://cdn.example.com/sitemap_index.xml").unwrap();
        let options =
            GeneratorOptions::builder(Url::parse("https://example.com").unwrap(), dir.path())
                .max_urls(1)
                .index_url(index_url.clone())
                .build()
                .unwrap();
        let mut generator = SitemapGenerator::with_options(options, WebRenderer).unwrap();

        generator.add(entry("a")).unwrap();
        generator.add(entry("b")).unwrap();
        let output = generator.finalize().unwrap();

        assert_eq!(output.index.unwrap().public_url, index_url);
    }
}
