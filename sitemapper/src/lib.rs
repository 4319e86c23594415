// Include handlers module directly from handlers.rs
#[path = "handlers.rs"]
pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{
    EntryDefaults, GenerateOptions, GenerateProgressCallback, execute_generate,
    load_entries_from_file, load_entries_from_reader, load_entries_from_source, normalize_domain,
    parse_entry_line, parse_url_line,
};

// Re-export the writer from sitemapper-core
pub use sitemapper_core::{SitemapError, SitemapWriter, UrlEntry, WrittenSitemap};
