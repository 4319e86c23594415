use thiserror::Error;

#[derive(Error, Debug)]
pub enum SitemapError {
    /// The serialized sitemap did not match the running size estimate.
    #[error("{written} bytes written. expected {expected}")]
    Integrity { written: usize, expected: usize },

    #[error("{0}")]
    State(String),

    #[error("Invalid filename template '{0}': expected one %d placeholder")]
    InvalidTemplate(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("XML error: {0}")]
    XmlError(#[from] quick_xml::Error),
}

pub type Result<T> = std::result::Result<T, SitemapError>;
