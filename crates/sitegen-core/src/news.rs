//! The Google News sitemap URL variant.
//!
//! News sitemaps extend the plain web record with a `<news:news>` block
//! carrying publication metadata. Four of those fields are mandatory and
//! enforced when the record is built, so a half-described article can never
//! reach a batch. News sitemaps are also capped at 1 000 URLs per file
//! instead of the usual 50 000; the ceiling lives on
//! [`crate::render::NewsRenderer`] and is enforced when a generator is
//! constructed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::entry::{ChangeFrequency, SitemapUrl, UrlEntry};
use crate::error::{Error, Result};

/// Access restriction for a news article.
///
/// Rendered capitalized into `<news:access>`, matching the news schema
/// examples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NewsAccess {
    /// The article is available after free registration.
    Registration,
    /// The article is behind a paywall.
    Subscription,
}

impl NewsAccess {
    /// The schema token for this value, as written into `<news:access>`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Registration => "Registration",
            Self::Subscription => "Subscription",
        }
    }
}

impl std::fmt::Display for NewsAccess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One URL record for a Google News sitemap.
///
/// The publication name, publication language, title, and publication date
/// are required and taken by [`NewsEntry::builder`]; the builder's
/// `build()` rejects empty strings so a record with a blank required field
/// fails before any batching occurs.
///
/// ```
/// use chrono::DateTime;
/// use sitegen_core::NewsEntry;
/// use url::Url;
///
/// let url = Url::parse("https://example.com/breaking")?;
/// let entry = NewsEntry::builder(url, "Title", DateTime::UNIX_EPOCH, "The Example", "en")
///     .keywords(["business", "merger"])
///     .build()?;
/// assert_eq!(entry.keywords(), Some("business, merger"));
/// # Ok::<(), sitegen_core::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct NewsEntry {
    web: UrlEntry,
    publication_name: String,
    publication_language: String,
    title: String,
    publication_date: DateTime<Utc>,
    access: Option<NewsAccess>,
    genres: Vec<String>,
    keywords: Option<String>,
    stock_tickers: Vec<String>,
}

impl NewsEntry {
    /// Start building a news entry from its required fields.
    pub fn builder(
        url: Url,
        title: impl Into<String>,
        publication_date: DateTime<Utc>,
        publication_name: impl Into<String>,
        publication_language: impl Into<String>,
    ) -> NewsEntryBuilder {
        NewsEntryBuilder {
            web: UrlEntry::builder(url),
            publication_name: publication_name.into(),
            publication_language: publication_language.into(),
            title: title.into(),
            publication_date,
            access: None,
            genres: Vec::new(),
            keywords: None,
            stock_tickers: Vec::new(),
        }
    }

    /// The publication name.
    #[must_use]
    pub fn publication_name(&self) -> &str {
        &self.publication_name
    }

    /// The publication language, e.g. `en` or `de`.
    #[must_use]
    pub fn publication_language(&self) -> &str {
        &self.publication_language
    }

    /// The article title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// When the article was published.
    #[must_use]
    pub const fn publication_date(&self) -> DateTime<Utc> {
        self.publication_date
    }

    /// The access restriction, if any.
    #[must_use]
    pub const fn access(&self) -> Option<NewsAccess> {
        self.access
    }

    /// Genres describing the article, in the order they were given.
    #[must_use]
    pub fn genres(&self) -> &[String] {
        &self.genres
    }

    /// Comma-delimited keywords, if any.
    #[must_use]
    pub fn keywords(&self) -> Option<&str> {
        self.keywords.as_deref()
    }

    /// Stock tickers mentioned by the article, in the order they were given.
    #[must_use]
    pub fn stock_tickers(&self) -> &[String] {
        &self.stock_tickers
    }
}

impl SitemapUrl for NewsEntry {
    fn url(&self) -> &Url {
        self.web.url()
    }

    fn lastmod(&self) -> Option<DateTime<Utc>> {
        self.web.lastmod()
    }

    fn changefreq(&self) -> Option<ChangeFrequency> {
        self.web.changefreq()
    }

    fn priority(&self) -> Option<f32> {
        self.web.priority()
    }
}

/// Builder for [`NewsEntry`].
#[derive(Debug, Clone)]
pub struct NewsEntryBuilder {
    web: crate::entry::UrlEntryBuilder,
    publication_name: String,
    publication_language: String,
    title: String,
    publication_date: DateTime<Utc>,
    access: Option<NewsAccess>,
    genres: Vec<String>,
    keywords: Option<String>,
    stock_tickers: Vec<String>,
}

impl NewsEntryBuilder {
    /// Sets the last-modified timestamp of the page itself.
    #[must_use]
    pub fn lastmod(mut self, lastmod: DateTime<Utc>) -> Self {
        self.web = self.web.lastmod(lastmod);
        self
    }

    /// Sets the change frequency hint.
    #[must_use]
    pub fn changefreq(mut self, changefreq: ChangeFrequency) -> Self {
        self.web = self.web.changefreq(changefreq);
        self
    }

    /// Sets the priority hint. Must be within `[0.0, 1.0]`.
    #[must_use]
    pub fn priority(mut self, priority: f32) -> Self {
        self.web = self.web.priority(priority);
        self
    }

    /// Sets the access restriction.
    #[must_use]
    pub const fn access(mut self, access: NewsAccess) -> Self {
        self.access = Some(access);
        self
    }

    /// Adds one genre.
    #[must_use]
    pub fn genre(mut self, genre: impl Into<String>) -> Self {
        self.genres.push(genre.into());
        self
    }

    /// Replaces the genre list. Order is preserved in the output.
    #[must_use]
    pub fn genres<I, S>(mut self, genres: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.genres = genres.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the comma-delimited keyword string verbatim.
    #[must_use]
    pub fn keywords_raw(mut self, keywords: impl Into<String>) -> Self {
        self.keywords = Some(keywords.into());
        self
    }

    /// Joins the given keywords with `", "` and sets the keyword string.
    #[must_use]
    pub fn keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = keywords
            .into_iter()
            .map(|k| k.as_ref().to_owned())
            .collect::<Vec<_>>()
            .join(", ");
        self.keywords = Some(joined);
        self
    }

    /// Replaces the stock ticker list. Order is preserved in the output.
    #[must_use]
    pub fn stock_tickers<I, S>(mut self, tickers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stock_tickers = tickers.into_iter().map(Into::into).collect();
        self
    }

    /// Builds the entry, validating every field.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if a required field is empty or the
    /// priority lies outside `[0.0, 1.0]`.
    pub fn build(self) -> Result<NewsEntry> {
        for (field, value) in [
            ("publication name", &self.publication_name),
            ("publication language", &self.publication_language),
            ("title", &self.title),
        ] {
            if value.is_empty() {
                return Err(Error::Validation(format!(
                    "news entry {field} must not be empty"
                )));
            }
        }
        Ok(NewsEntry {
            web: self.web.build()?,
            publication_name: self.publication_name,
            publication_language: self.publication_language,
            title: self.title,
            publication_date: self.publication_date,
            access: self.access,
            genres: self.genres,
            keywords: self.keywords,
            stock_tickers: self.stock_tickers,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    fn builder() -> NewsEntryBuilder {
        NewsEntry::builder(
            Url::parse("https://example.com/story").unwrap(),
            "Beispieltitel",
            DateTime::UNIX_EPOCH,
            "Beispiel",
            "de",
        )
    }

    #[test]
    fn test_required_fields_survive_build() {
        let entry = builder().build().unwrap();

        assert_eq!(entry.title(), "Beispieltitel");
        assert_eq!(entry.publication_name(), "Beispiel");
        assert_eq!(entry.publication_language(), "de");
        assert_eq!(entry.publication_date(), DateTime::UNIX_EPOCH);
    }

    #[test]
    fn test_empty_required_field_fails_before_batching() {
        let cases: Vec<NewsEntryBuilder> = vec![
            NewsEntry::builder(
                Url::parse("https://example.com/a").unwrap(),
                "",
                DateTime::UNIX_EPOCH,
                "P",
                "en",
            ),
            NewsEntry::builder(
                Url::parse("https://example.com/a").unwrap(),
                "T",
                DateTime::UNIX_EPOCH,
                "",
                "en",
            ),
            NewsEntry::builder(
                Url::parse("https://example.com/a").unwrap(),
                "T",
                DateTime::UNIX_EPOCH,
                "P",
                "",
            ),
        ];

        for case in cases {
            let err = case.build().unwrap_err();
            assert_eq!(err.category(), "validation");
        }
    }

    #[test]
    fn test_keyword_list_is_joined_with_comma_space() {
        let entry = builder()
            .keywords(["Klaatu", "Barrata", "Nicto"])
            .build()
            .unwrap();

        assert_eq!(entry.keywords(), Some("Klaatu, Barrata, Nicto"));
    }

    #[test]
    fn test_collections_are_owned_by_the_entry() {
        // Given: A caller-owned genre list
        let mut genres = vec!["PressRelease".to_string()];

        // When: Building an entry from it, then mutating the original
        let entry = builder().genres(genres.clone()).build().unwrap();
        genres.push("Satire".to_string());

        // Then: The entry is unaffected
        assert_eq!(entry.genres(), ["PressRelease".to_string()]);
    }

    #[test]
    fn test_optional_fields_default_to_absent() {
        let entry = builder().build().unwrap();

        assert!(entry.access().is_none());
        assert!(entry.genres().is_empty());
        assert!(entry.keywords().is_none());
        assert!(entry.stock_tickers().is_empty());
        assert!(entry.lastmod().is_none());
    }

    #[test]
    fn test_web_hint_fields_pass_through() {
        let entry = builder()
            .changefreq(ChangeFrequency::Hourly)
            .priority(0.9)
            .build()
            .unwrap();

        assert_eq!(entry.changefreq(), Some(ChangeFrequency::Hourly));
        assert_eq!(entry.priority(), Some(0.9));
    }

    #[test]
    fn test_access_tokens_are_capitalized() {
        assert_eq!(NewsAccess::Registration.to_string(), "Registration");
        assert_eq!(NewsAccess::Subscription.to_string(), "Subscription");
    }
}
