use flate2::Compression;
use flate2::write::GzEncoder;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Compression strategy applied to finished sitemap files
pub trait Compressor {
    /// Suffix appended to the compressed file name, including the dot
    fn suffix(&self) -> &str;

    fn compress(&self, input: &[u8], output: &mut dyn Write) -> io::Result<()>;
}

/// Gzip via flate2. Defaults to the highest compression level.
#[derive(Debug, Clone, Copy)]
pub struct GzipCompressor {
    level: Compression,
}

impl GzipCompressor {
    pub fn new() -> Self {
        Self {
            level: Compression::best(),
        }
    }

    /// Levels run from 0 (store) to 9 (best)
    pub fn with_level(level: u32) -> Self {
        Self {
            level: Compression::new(level.min(9)),
        }
    }

    pub fn level(&self) -> u32 {
        self.level.level()
    }
}

impl Default for GzipCompressor {
    fn default() -> Self {
        Self::new()
    }
}

impl Compressor for GzipCompressor {
    fn suffix(&self) -> &str {
        ".gz"
    }

    fn compress(&self, input: &[u8], output: &mut dyn Write) -> io::Result<()> {
        let mut encoder = GzEncoder::new(output, self.level);
        encoder.write_all(input)?;
        encoder.finish()?.flush()
    }
}

/// Compress `src` into `dst`, then remove `src`.
///
/// `src` is only removed once `dst` has been fully written.
pub fn compress_file(compressor: &dyn Compressor, src: &Path, dst: &Path) -> io::Result<()> {
    let input = fs::read(src)?;
    let mut output = BufWriter::new(File::create(dst)?);
    compressor.compress(&input, &mut output)?;
    output.flush()?;
    drop(output);
    fs::remove_file(src)
}
