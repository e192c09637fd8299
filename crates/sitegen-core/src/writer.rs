//! Serializing one batch into a complete `<urlset>` document and writing
//! it to disk.
//!
//! Files are written to a temporary sibling first and renamed into place on
//! success, so a failed write never leaves a partially written file under
//! the final name. The handle is flushed and closed on every exit path.
//!
//! A document is laid out as:
//!
//! ```text
//! <?xml version="1.0" encoding="UTF-8"?>
//! <urlset xmlns="..." [extra namespaces]>
//! <url>...</url>          (one line per entry, insertion order)
//! </urlset>
//! ```
//!
//! The layout is fixed so the exact serialized size of a document is the
//! zero-entry overhead plus `fragment.len() + 1` per entry, which is what
//! the batching engine uses to enforce the byte ceiling.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use quick_xml::Writer;
use quick_xml::events::{BytesStart, Event};
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::error::Result;
use crate::render::{SITEMAP_NS, xml_err};

/// The declaration opening every generated document.
pub(crate) const XML_DECL: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>";

const URLSET_CLOSE: &str = "</urlset>\n";

/// One sitemap file finalized on disk.
///
/// Accumulated in sequence order over a session and listed by the sitemap
/// index when more than one file was produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WrittenFile {
    /// 1-based position in the session's file sequence. `0` for the index
    /// file, which is not part of the sequence.
    pub sequence: usize,
    /// Where the file was written.
    pub path: PathBuf,
    /// The file's public URL, derived from the base URL and the file name.
    pub public_url: Url,
    /// When the file was finalized.
    pub lastmod: DateTime<Utc>,
}

/// Render the `<urlset>` open tag with the standard namespace plus the
/// extra declarations the variant needs.
pub(crate) fn urlset_open(namespaces: &[(&str, &str)]) -> Result<String> {
    let mut open = BytesStart::new("urlset");
    open.push_attribute(("xmlns", SITEMAP_NS));
    for (name, value) in namespaces {
        open.push_attribute((*name, *value));
    }

    let mut writer = Writer::new(Vec::new());
    writer.write_event(Event::Start(open)).map_err(xml_err)?;
    String::from_utf8(writer.into_inner()).map_err(xml_err)
}

/// Serialized size of a document containing zero entries; each entry then
/// adds its fragment length plus one newline.
pub(crate) fn document_overhead(namespaces: &[(&str, &str)]) -> Result<usize> {
    // decl + newline + open tag + newline + close tag (incl. newline)
    Ok(XML_DECL.len() + 1 + urlset_open(namespaces)?.len() + 1 + URLSET_CLOSE.len())
}

/// Assemble a complete `<urlset>` document from rendered fragments, in
/// insertion order.
pub(crate) fn build_urlset(fragments: &[String], namespaces: &[(&str, &str)]) -> Result<String> {
    let body: usize = fragments.iter().map(|f| f.len() + 1).sum();
    let mut doc = String::with_capacity(document_overhead(namespaces)? + body);

    doc.push_str(XML_DECL);
    doc.push('\n');
    doc.push_str(&urlset_open(namespaces)?);
    doc.push('\n');
    for fragment in fragments {
        doc.push_str(fragment);
        doc.push('\n');
    }
    doc.push_str(URLSET_CLOSE);
    Ok(doc)
}

/// Write `content` to `path` through a temporary sibling file.
///
/// The temporary file is renamed over the final name only after the write
/// completed, so an I/O failure leaves no partial file at `path`.
pub(crate) fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let tmp_path = path.with_extension("xml.tmp");
    fs::write(&tmp_path, content)?;

    #[cfg(target_os = "windows")]
    if path.exists() {
        fs::remove_file(path)?;
    }

    fs::rename(&tmp_path, path)?;
    debug!(path = %path.display(), bytes = content.len(), "Wrote sitemap file");
    Ok(())
}
