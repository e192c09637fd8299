//! Variant-specific rendering of URL records into XML fragments.
//!
//! Each sitemap variant implements exactly one [`EntryRenderer`]. The
//! batching and writing pipeline is generic over a renderer and its record
//! type and never special-cases a variant by name: the renderer supplies
//! the `<url>` fragment for one record, the extra namespace declarations
//! its markup needs, and the protocol ceiling on URLs per file.
//!
//! Fragments are produced through quick-xml writer events, so all text
//! content (locations, titles, keywords) is entity-escaped on the way out.
//! Markup is compact (one `<url>` element per line, no inner indentation),
//! which keeps rendering deterministic and makes a fragment's byte length
//! the exact cost it adds to a file.

use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};

use crate::entry::{SitemapUrl, UrlEntry};
use crate::error::{Error, Result};
use crate::news::NewsEntry;
use crate::w3c::W3cPrecision;

/// The standard sitemaps.org namespace carried by every `<urlset>` and
/// `<sitemapindex>` root element.
pub const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// The Google News extension namespace.
pub const NEWS_NS: &str = "http://www.google.com/schemas/sitemap-news/0.9";

/// Separator for the comma-joined `<news:genres>` and
/// `<news:stock_tickers>` lists.
const LIST_SEPARATOR: &str = ",";

/// Renders one URL record of a specific variant into sitemap markup.
///
/// Implementations are stateless unit structs; the generator picks one by
/// static type. Rendering the same record twice must produce byte-identical
/// output.
pub trait EntryRenderer {
    /// The record type this renderer understands.
    type Entry: SitemapUrl;

    /// Protocol ceiling on URLs per file for this variant.
    const MAX_URLS: usize;

    /// Render one record into a complete `<url>` fragment.
    ///
    /// Optional fields produce no element at all when absent; an entry
    /// with no hints renders only its `<loc>`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Xml`] if markup generation fails.
    fn render(&self, entry: &Self::Entry, precision: W3cPrecision) -> Result<String>;

    /// Extra `xmlns` attributes the fragments need on the `<urlset>` root,
    /// as `(attribute name, namespace URI)` pairs. Empty for the plain web
    /// variant.
    fn namespaces(&self) -> &'static [(&'static str, &'static str)];
}

pub(crate) fn xml_err<E: std::fmt::Display>(err: E) -> Error {
    Error::Xml(err.to_string())
}

/// Write `<name>value</name>` with escaped text content.
pub(crate) fn text_element(
    writer: &mut Writer<Vec<u8>>,
    name: &str,
    value: &str,
) -> Result<()> {
    writer
        .write_event(Event::Start(BytesStart::new(name)))
        .map_err(xml_err)?;
    writer
        .write_event(Event::Text(BytesText::new(value)))
        .map_err(xml_err)?;
    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .map_err(xml_err)?;
    Ok(())
}

/// Render the `<url>` element shared by every variant: `loc` plus the
/// optional hint elements, then whatever variant-specific markup `extra`
/// contributes before the closing tag.
fn render_url_element<U: SitemapUrl>(
    entry: &U,
    precision: W3cPrecision,
    extra: impl FnOnce(&mut Writer<Vec<u8>>) -> Result<()>,
) -> Result<String> {
    let mut writer = Writer::new(Vec::new());

    writer
        .write_event(Event::Start(BytesStart::new("url")))
        .map_err(xml_err)?;
    text_element(&mut writer, "loc", entry.url().as_str())?;
    if let Some(lastmod) = entry.lastmod() {
        text_element(&mut writer, "lastmod", &precision.format(lastmod))?;
    }
    if let Some(changefreq) = entry.changefreq() {
        text_element(&mut writer, "changefreq", changefreq.as_str())?;
    }
    if let Some(priority) = entry.priority() {
        text_element(&mut writer, "priority", &priority.to_string())?;
    }
    extra(&mut writer)?;
    writer
        .write_event(Event::End(BytesEnd::new("url")))
        .map_err(xml_err)?;

    String::from_utf8(writer.into_inner()).map_err(xml_err)
}

/// Renderer for plain web sitemap entries.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebRenderer;

impl EntryRenderer for WebRenderer {
    type Entry = UrlEntry;

    /// 50 000 URLs max in a standard sitemap.
    const MAX_URLS: usize = 50_000;

    fn render(&self, entry: &Self::Entry, precision: W3cPrecision) -> Result<String> {
        render_url_element(entry, precision, |_| Ok(()))
    }

    fn namespaces(&self) -> &'static [(&'static str, &'static str)] {
        &[]
    }
}

/// Renderer for Google News sitemap entries.
#[derive(Debug, Clone, Copy, Default)]
pub struct NewsRenderer;

impl EntryRenderer for NewsRenderer {
    type Entry = NewsEntry;

    /// 1 000 URLs max in a Google News sitemap.
    const MAX_URLS: usize = 1_000;

    fn render(&self, entry: &Self::Entry, precision: W3cPrecision) -> Result<String> {
        render_url_element(entry, precision, |writer| {
            writer
                .write_event(Event::Start(BytesStart::new("news:news")))
                .map_err(xml_err)?;

            writer
                .write_event(Event::Start(BytesStart::new("news:publication")))
                .map_err(xml_err)?;
            text_element(writer, "news:name", entry.publication_name())?;
            text_element(writer, "news:language", entry.publication_language())?;
            writer
                .write_event(Event::End(BytesEnd::new("news:publication")))
                .map_err(xml_err)?;

            if let Some(access) = entry.access() {
                text_element(writer, "news:access", access.as_str())?;
            }
            if !entry.genres().is_empty() {
                text_element(writer, "news:genres", &entry.genres().join(LIST_SEPARATOR))?;
            }
            text_element(
                writer,
                "news:publication_date",
                &precision.format(entry.publication_date()),
            )?;
            text_element(writer, "news:title", entry.title())?;
            if let Some(keywords) = entry.keywords() {
                text_element(writer, "news:keywords", keywords)?;
            }
            if !entry.stock_tickers().is_empty() {
                text_element(
                    writer,
                    "news:stock_tickers",
                    &entry.stock_tickers().join(LIST_SEPARATOR),
                )?;
            }

            writer
                .write_event(Event::End(BytesEnd::new("news:news")))
                .map_err(xml_err)?;
            Ok(())
        })
    }

    fn namespaces(&self) -> &'static [(&'static str, &'static str)] {
        &[("xmlns:news", NEWS_NS)]
    }
}
