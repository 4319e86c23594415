use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CHANGEFREQ: &str = "weekly";
pub const DEFAULT_PRIORITY: f64 = 0.5;

/// A single `<url>` entry waiting to be appended to a sitemap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrlEntry {
    pub loc: String,
    pub changefreq: String,
    pub priority: f64,
}

impl UrlEntry {
    pub fn new(loc: impl Into<String>) -> Self {
        Self {
            loc: loc.into(),
            changefreq: DEFAULT_CHANGEFREQ.to_string(),
            priority: DEFAULT_PRIORITY,
        }
    }

    pub fn with_changefreq(mut self, changefreq: impl Into<String>) -> Self {
        self.changefreq = changefreq.into();
        self
    }

    pub fn with_priority(mut self, priority: f64) -> Self {
        self.priority = priority;
        self
    }
}

/// Record of a sitemap file that has been saved to disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WrittenSitemap {
    pub filename: String,
    pub datetime: DateTime<Utc>,
    pub entries: usize,
    pub bytes: usize,
}

impl WrittenSitemap {
    pub fn new(filename: String, entries: usize, bytes: usize) -> Self {
        Self {
            filename,
            datetime: Utc::now(),
            entries,
            bytes,
        }
    }

    pub fn lastmod(&self) -> String {
        w3c_datetime(&self.datetime)
    }
}

/// Format a timestamp the way sitemaps expect `<lastmod>`: `2024-01-31T08:15:00+00:00`
pub fn w3c_datetime(datetime: &DateTime<Utc>) -> String {
    datetime.to_rfc3339_opts(SecondsFormat::Secs, false)
}

/// Shortest decimal form of a priority: `0.5` stays `0.5`, `1.0` becomes `1`
pub fn format_priority(priority: f64) -> String {
    format!("{}", priority)
}
