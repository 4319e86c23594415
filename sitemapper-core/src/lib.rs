pub mod compress;
pub mod document;
pub mod error;
pub mod model;
pub mod report;
pub mod sink;
pub mod writer;

pub use compress::{Compressor, GzipCompressor};
pub use document::SitemapDocument;
pub use error::{Result, SitemapError};
pub use model::{UrlEntry, WrittenSitemap};
pub use sink::{DocumentSink, FileSink};
pub use writer::SitemapWriter;
