//! W3C datetime profile formatting for `<lastmod>` and related elements.
//!
//! The sitemaps.org protocol requires timestamps in the W3C profile of
//! ISO 8601, which permits truncating the representation at several
//! precisions. All output uses the Zulu (UTC) designator so that generated
//! documents are stable regardless of the host timezone.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Precision at which timestamps are rendered into sitemap documents.
///
/// One precision applies to a whole generator session; every `<lastmod>`
/// and `<news:publication_date>` in that session's output uses it.
///
/// # Examples
///
/// ```
/// use chrono::DateTime;
/// use sitegen_core::W3cPrecision;
///
/// let epoch = DateTime::UNIX_EPOCH;
/// assert_eq!(W3cPrecision::Second.format(epoch), "1970-01-01T00:00:00Z");
/// assert_eq!(W3cPrecision::Day.format(epoch), "1970-01-01");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum W3cPrecision {
    /// Year only, e.g. `1997`.
    Year,
    /// Year and month, e.g. `1997-07`.
    Month,
    /// Complete date, e.g. `1997-07-16`.
    Day,
    /// Date plus hours and minutes, e.g. `1997-07-16T19:20Z`.
    Minute,
    /// Date plus hours, minutes and seconds, e.g. `1997-07-16T19:20:30Z`.
    #[default]
    Second,
    /// Date plus hours, minutes, seconds and milliseconds,
    /// e.g. `1997-07-16T19:20:30.450Z`.
    Millisecond,
}

impl W3cPrecision {
    /// Format an instant at this precision, always in UTC.
    #[must_use]
    pub fn format(self, instant: DateTime<Utc>) -> String {
        let pattern = match self {
            Self::Year => "%Y",
            Self::Month => "%Y-%m",
            Self::Day => "%Y-%m-%d",
            Self::Minute => "%Y-%m-%dT%H:%MZ",
            Self::Second => "%Y-%m-%dT%H:%M:%SZ",
            Self::Millisecond => "%Y-%m-%dT%H:%M:%S%.3fZ",
        };
        instant.format(pattern).to_string()
    }
}
