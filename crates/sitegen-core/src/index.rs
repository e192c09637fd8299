//! Building the `<sitemapindex>` document.
//!
//! A sitemap index lists the public locations of the session's sitemap
//! files so consumers can discover all of them from one URL. It is only
//! produced when a session wrote more than one file; a lone sitemap keeps
//! the bare `{prefix}.xml` name and needs no index.

use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, Event};

use crate::error::Result;
use crate::render::{text_element, xml_err};
use crate::w3c::W3cPrecision;
use crate::writer::{WrittenFile, XML_DECL};

use crate::render::SITEMAP_NS;

/// Assemble a complete `<sitemapindex>` document listing `files` in
/// sequence order, with each file's finalization time as its `<lastmod>`.
pub(crate) fn build_index(files: &[WrittenFile], precision: W3cPrecision) -> Result<String> {
    let mut doc = String::new();
    doc.push_str(XML_DECL);
    doc.push('\n');
    doc.push_str(&sitemapindex_open()?);
    doc.push('\n');
    for file in files {
        doc.push_str(&sitemap_element(file, precision)?);
        doc.push('\n');
    }
    doc.push_str("</sitemapindex>\n");
    Ok(doc)
}

fn sitemapindex_open() -> Result<String> {
    let mut open = BytesStart::new("sitemapindex");
    open.push_attribute(("xmlns", SITEMAP_NS));

    let mut writer = Writer::new(Vec::new());
    writer.write_event(Event::Start(open)).map_err(xml_err)?;
    String::from_utf8(writer.into_inner()).map_err(xml_err)
}

/// One `<sitemap>` entry: the file's public URL and its last-modified time.
fn sitemap_element(file: &WrittenFile, precision: W3cPrecision) -> Result<String> {
    let mut writer = Writer::new(Vec::new());

    writer
        .write_event(Event::Start(BytesStart::new("sitemap")))
        .map_err(xml_err)?;
    text_element(&mut writer, "loc", file.public_url.as_str())?;
    text_element(&mut writer, "lastmod", &precision.format(file.lastmod))?;
    writer
        .write_event(Event::End(BytesEnd::new("sitemap")))
        .map_err(xml_err)?;

    String::from_utf8(writer.into_inner()).map_err(xml_err)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use std::path::PathBuf;
    use url::Url;

    fn file(sequence: usize, name: &str) -> WrittenFile {
        WrittenFile {
            sequence,
            path: PathBuf::from(format!("/tmp/{name}")),
            public_url: Url::parse(&format!("https://example.com/{name}")).unwrap(),
            lastmod: DateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn test_index_lists_files_in_sequence_order() {
        let files = vec![file(1, "sitemap1.xml"), file(2, "sitemap2.xml")];

        let doc = build_index(&files, W3cPrecision::Second).unwrap();

        assert_eq!(
            doc,
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <sitemapindex xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n\
             <sitemap><loc>https://example.com/sitemap1.xml</loc>\
             <lastmod>1970-01-01T00:00:00Z</lastmod></sitemap>\n\
             <sitemap><loc>https://example.com/sitemap2.xml</loc>\
             <lastmod>1970-01-01T00:00:00Z</lastmod></sitemap>\n\
             </sitemapindex>\n"
        );
    }

    #[test]
    fn test_index_lastmod_honors_precision() {
        let files = vec![file(1, "sitemap1.xml")];

        let doc = build_index(&files, W3cPrecision::Day).unwrap();

        assert!(doc.contains("<lastmod>1970-01-01</lastmod>"));
    }
}
