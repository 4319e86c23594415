use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

/// Destination for serialized sitemap documents.
///
/// Implementations report how many bytes actually reached the destination;
/// the writer compares that against its running size estimate.
pub trait DocumentSink {
    fn write_document(&mut self, path: &Path, bytes: &[u8]) -> io::Result<usize>;
}

/// Writes documents straight to the filesystem, truncating existing files
#[derive(Debug, Default, Clone, Copy)]
pub struct FileSink;

impl DocumentSink for FileSink {
    fn write_document(&mut self, path: &Path, bytes: &[u8]) -> io::Result<usize> {
        let mut file = File::create(path)?;
        file.write_all(bytes)?;
        file.flush()?;
        Ok(bytes.len())
    }
}
