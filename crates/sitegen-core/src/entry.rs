//! The base "web" URL record and the fields shared by every variant.
//!
//! A [`UrlEntry`] is one `<url>` element in a plain sitemaps.org sitemap:
//! a location plus the three optional hint fields the protocol defines.
//! Richer variants (see [`crate::news`]) carry these same fields and expose
//! them through the [`SitemapUrl`] trait so the batching pipeline and the
//! common part of rendering never need to know which variant they are
//! handling.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, Result};

/// How frequently a page is likely to change.
///
/// These values are hints to consumers; search engines may not follow them
/// strictly. Rendered lowercase, matching the protocol schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFrequency {
    /// The page changes every time it is accessed.
    Always,
    /// The page changes hourly.
    Hourly,
    /// The page changes daily.
    Daily,
    /// The page changes weekly.
    Weekly,
    /// The page changes monthly.
    Monthly,
    /// The page changes yearly.
    Yearly,
    /// The page is archived and will not change.
    Never,
}

impl ChangeFrequency {
    /// The protocol token for this value, as written into `<changefreq>`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Always => "always",
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
            Self::Never => "never",
        }
    }
}

impl std::fmt::Display for ChangeFrequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ChangeFrequency {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "always" => Ok(Self::Always),
            "hourly" => Ok(Self::Hourly),
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "yearly" => Ok(Self::Yearly),
            "never" => Ok(Self::Never),
            _ => Err(Error::Validation(format!("invalid changefreq value: {s}"))),
        }
    }
}

/// Accessors for the fields every sitemap URL variant carries.
///
/// The batching engine validates locations and the renderers emit the
/// common child elements through this trait, so one pipeline serves all
/// variants without runtime type inspection.
pub trait SitemapUrl {
    /// The absolute location of the page.
    fn url(&self) -> &Url;
    /// When the page was last modified, if known.
    fn lastmod(&self) -> Option<DateTime<Utc>>;
    /// How frequently the page changes, if hinted.
    fn changefreq(&self) -> Option<ChangeFrequency>;
    /// Relative priority in `[0.0, 1.0]`, if hinted.
    fn priority(&self) -> Option<f32>;
}

/// One URL record for a plain web sitemap.
///
/// Immutable once built. Construct directly with [`UrlEntry::new`] when only
/// the location is known, or through [`UrlEntry::builder`] to attach the
/// optional hint fields:
///
/// ```
/// use sitegen_core::{ChangeFrequency, SitemapUrl, UrlEntry};
/// use url::Url;
///
/// let url = Url::parse("https://example.com/about")?;
/// let entry = UrlEntry::builder(url)
///     .changefreq(ChangeFrequency::Monthly)
///     .priority(0.3)
///     .build()?;
/// assert_eq!(entry.priority(), Some(0.3));
/// # Ok::<(), sitegen_core::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct UrlEntry {
    url: Url,
    lastmod: Option<DateTime<Utc>>,
    changefreq: Option<ChangeFrequency>,
    priority: Option<f32>,
}

impl UrlEntry {
    /// Create an entry with no optional hint fields.
    #[must_use]
    pub const fn new(url: Url) -> Self {
        Self {
            url,
            lastmod: None,
            changefreq: None,
            priority: None,
        }
    }

    /// Parse the location from a string and create a bare entry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`] if the string is not an absolute URL.
    pub fn parse(url: &str) -> Result<Self> {
        Ok(Self::new(Url::parse(url)?))
    }

    /// Start building an entry with optional hint fields.
    #[must_use]
    pub const fn builder(url: Url) -> UrlEntryBuilder {
        UrlEntryBuilder {
            url,
            lastmod: None,
            changefreq: None,
            priority: None,
        }
    }
}

impl SitemapUrl for UrlEntry {
    fn url(&self) -> &Url {
        &self.url
    }

    fn lastmod(&self) -> Option<DateTime<Utc>> {
        self.lastmod
    }

    fn changefreq(&self) -> Option<ChangeFrequency> {
        self.changefreq
    }

    fn priority(&self) -> Option<f32> {
        self.priority
    }
}

/// Builder for [`UrlEntry`].
#[derive(Debug, Clone)]
pub struct UrlEntryBuilder {
    url: Url,
    lastmod: Option<DateTime<Utc>>,
    changefreq: Option<ChangeFrequency>,
    priority: Option<f32>,
}

impl UrlEntryBuilder {
    /// Sets the last-modified timestamp.
    #[must_use]
    pub const fn lastmod(mut self, lastmod: DateTime<Utc>) -> Self {
        self.lastmod = Some(lastmod);
        self
    }

    /// Sets the change frequency hint.
    #[must_use]
    pub const fn changefreq(mut self, changefreq: ChangeFrequency) -> Self {
        self.changefreq = Some(changefreq);
        self
    }

    /// Sets the priority hint. Must be within `[0.0, 1.0]`.
    #[must_use]
    pub const fn priority(mut self, priority: f32) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Builds the entry, validating every field.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the priority lies outside
    /// `[0.0, 1.0]`.
    pub fn build(self) -> Result<UrlEntry> {
        if let Some(priority) = self.priority {
            if !(0.0..=1.0).contains(&priority) {
                return Err(Error::Validation(format!(
                    "priority {priority} is outside [0.0, 1.0]"
                )));
            }
        }
        Ok(UrlEntry {
            url: self.url,
            lastmod: self.lastmod,
            changefreq: self.changefreq,
            priority: self.priority,
        })
    }
}
