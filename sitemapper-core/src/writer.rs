use crate::compress::{Compressor, GzipCompressor, compress_file};
use crate::document::SitemapDocument;
use crate::error::{Result, SitemapError};
use crate::model::{
    DEFAULT_CHANGEFREQ, DEFAULT_PRIORITY, UrlEntry, WrittenSitemap, format_priority, w3c_datetime,
};
use crate::sink::{DocumentSink, FileSink};
use chrono::Utc;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const MAX_ENTRIES: usize = 50_000;
/// 10MB uncompressed
pub const MAX_SIZE_BYTES: usize = 10_485_760;
/// Size of a urlset document with no entries (written with an explicit closing tag)
pub const EMPTY_SITEMAP_SIZE_BYTES: usize = 110;
/// Size of one `<url>` block with empty `loc` and `changefreq`
pub const EMPTY_ENTRY_SIZE_BYTES: usize = 141;

pub const DEFAULT_FILENAME_TEMPLATE: &str = "robot-sitemap-%d.xml";
pub const INDEX_FILENAME: &str = "robot-sitemap-index.xml";

const FILENAME_PLACEHOLDER: &str = "%d";

/// Accumulates URL entries into sitemap files under `directory`, rolling over
/// to a new file whenever the current one is full, and writes an index that
/// references every saved file.
///
/// Not meant to be shared between threads; every operation runs to completion
/// before returning.
pub struct SitemapWriter {
    directory: PathBuf,
    domain: String,
    document: Option<SitemapDocument>,
    entry_count: usize,
    size_in_bytes: usize,
    sitemap_count: usize,
    sitemaps_written: Vec<WrittenSitemap>,
    filename_template: String,
    compressor: Option<Box<dyn Compressor>>,
    sink: Box<dyn DocumentSink>,
}

impl SitemapWriter {
    pub fn new(directory: impl Into<PathBuf>, domain: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            domain: domain.into(),
            document: None,
            entry_count: 0,
            size_in_bytes: 0,
            sitemap_count: 0,
            sitemaps_written: Vec::new(),
            filename_template: DEFAULT_FILENAME_TEMPLATE.to_string(),
            compressor: Some(Box::new(GzipCompressor::new())),
            sink: Box::new(FileSink),
        }
    }

    pub fn with_compressor(mut self, compressor: impl Compressor + 'static) -> Self {
        self.compressor = Some(Box::new(compressor));
        self
    }

    pub fn without_compression(mut self) -> Self {
        self.compressor = None;
        self
    }

    pub fn with_sink(mut self, sink: impl DocumentSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    /// Template used by `save_default` and by the automatic save when a document fills up
    pub fn with_filename_template(mut self, template: impl Into<String>) -> Self {
        self.filename_template = template.into();
        self
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Number of documents opened since the last index was written
    pub fn sitemap_count(&self) -> usize {
        self.sitemap_count
    }

    /// Sitemaps saved since the last index was written, in write order
    pub fn sitemaps(&self) -> &[WrittenSitemap] {
        &self.sitemaps_written
    }

    pub fn entry_count(&self) -> usize {
        self.entry_count
    }

    /// Estimated serialized size of the open document
    pub fn size_in_bytes(&self) -> usize {
        self.size_in_bytes
    }

    pub fn is_open(&self) -> bool {
        self.document.is_some()
    }

    pub fn filename_template(&self) -> &str {
        &self.filename_template
    }

    pub fn append_url(&mut self, url: &str) -> Result<()> {
        self.append(url, DEFAULT_CHANGEFREQ, DEFAULT_PRIORITY)
    }

    pub fn append_entry(&mut self, entry: &UrlEntry) -> Result<()> {
        self.append(&entry.loc, &entry.changefreq, entry.priority)
    }

    /// Add a `<url>` entry stamped with the current time. The open document is
    /// saved first if the entry would push it past `MAX_SIZE_BYTES`, and saved
    /// straight after if it is now full.
    pub fn append(&mut self, url: &str, changefreq: &str, priority: f64) -> Result<()> {
        let entry_size = EMPTY_ENTRY_SIZE_BYTES + url.len() + changefreq.len();
        if self.document.is_some() && self.size_in_bytes + entry_size > MAX_SIZE_BYTES {
            debug!(
                "{} byte entry does not fit (~{} bytes open), saving first",
                entry_size, self.size_in_bytes
            );
            self.save_default()?;
        }

        let mut document = match self.document.take() {
            Some(document) => document,
            None => self.setup_document(),
        };

        document.push_element(
            "url",
            vec![
                ("loc", url.to_string()),
                ("lastmod", w3c_datetime(&Utc::now())),
                ("changefreq", changefreq.to_string()),
                ("priority", format_priority(priority)),
            ],
        );
        self.document = Some(document);

        self.entry_count += 1;
        self.size_in_bytes += entry_size;

        if self.is_full() {
            debug!(
                "Sitemap full at {} entries (~{} bytes), saving",
                self.entry_count, self.size_in_bytes
            );
            self.save_default()?;
        }

        Ok(())
    }

    pub fn save_default(&mut self) -> Result<usize> {
        let template = self.filename_template.clone();
        self.save(&template)
    }

    /// Write the open document to `<directory>/<template with ordinal>`.
    ///
    /// Returns the number of uncompressed bytes written, or 0 when nothing is pending.
    pub fn save(&mut self, template: &str) -> Result<usize> {
        if self.entry_count == 0 {
            return Ok(0);
        }
        let Some(document) = self.document.as_ref() else {
            return Ok(0);
        };

        let filename = format_filename(template, document.ordinal())?;
        let pathname = self.directory.join(&filename);

        let bytes = document.render()?;
        let written = self.sink.write_document(&pathname, &bytes)?;
        if written != self.size_in_bytes {
            warn!(
                "Size estimate drifted for {}: {} bytes written, expected {}",
                pathname.display(),
                written,
                self.size_in_bytes
            );
            return Err(SitemapError::Integrity {
                written,
                expected: self.size_in_bytes,
            });
        }

        let filename = match self.compressor.as_deref() {
            Some(compressor) => {
                let compressed = format!("{}{}", filename, compressor.suffix());
                compress_file(compressor, &pathname, &self.directory.join(&compressed))?;
                compressed
            }
            None => filename,
        };

        info!(
            "Saved sitemap {} ({} entries, {} bytes)",
            filename, self.entry_count, written
        );

        self.sitemaps_written
            .push(WrittenSitemap::new(filename, self.entry_count, written));
        self.document = None;
        self.entry_count = 0;
        self.size_in_bytes = 0;

        Ok(written)
    }

    /// Write `<directory>/robot-sitemap-index.xml` listing every saved sitemap,
    /// then start a fresh batch.
    pub fn write_index(&mut self) -> Result<PathBuf> {
        if self.document.is_some() {
            return Err(SitemapError::State("current sitemap not saved.".to_string()));
        }

        let mut index = SitemapDocument::index(self.sitemap_count);
        for sitemap in &self.sitemaps_written {
            index.push_element(
                "sitemap",
                vec![
                    ("loc", format!("{}/{}", self.domain, sitemap.filename)),
                    ("lastmod", sitemap.lastmod()),
                ],
            );
        }

        let pathname = self.directory.join(INDEX_FILENAME);
        let bytes = index.render()?;
        self.sink.write_document(&pathname, &bytes)?;

        info!(
            "Wrote sitemap index {} referencing {} sitemap(s)",
            pathname.display(),
            self.sitemaps_written.len()
        );

        self.sitemap_count = 0;
        self.sitemaps_written.clear();

        Ok(pathname)
    }

    fn setup_document(&mut self) -> SitemapDocument {
        let document = SitemapDocument::url_set(self.sitemap_count);
        debug!("Opening sitemap document #{}", document.ordinal());

        self.entry_count = 0;
        self.size_in_bytes = EMPTY_SITEMAP_SIZE_BYTES;
        self.sitemap_count += 1;

        document
    }

    fn is_full(&self) -> bool {
        if self.entry_count >= MAX_ENTRIES {
            return true;
        }

        self.size_in_bytes + (2 * EMPTY_ENTRY_SIZE_BYTES) > MAX_SIZE_BYTES
    }
}

/// Check that `template` has a `%d` for the sitemap ordinal
pub fn validate_template(template: &str) -> Result<()> {
    if !template.contains(FILENAME_PLACEHOLDER) {
        return Err(SitemapError::InvalidTemplate(template.to_string()));
    }
    Ok(())
}

/// Substitute `ordinal` into the first `%d` of `template`
pub fn format_filename(template: &str, ordinal: usize) -> Result<String> {
    validate_template(template)?;
    Ok(template.replacen(FILENAME_PLACEHOLDER, &ordinal.to_string(), 1))
}
