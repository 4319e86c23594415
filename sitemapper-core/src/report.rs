// Batch summary for a run of the sitemap writer

use crate::model::WrittenSitemap;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ReportFormat {
    Text,
    Json,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub sitemaps: Vec<WrittenSitemap>,
    pub total_entries: usize,
    pub total_bytes: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_path: Option<PathBuf>,
}

impl BatchReport {
    pub fn new(sitemaps: Vec<WrittenSitemap>, index_path: Option<PathBuf>) -> Self {
        let total_entries = sitemaps.iter().map(|s| s.entries).sum();
        let total_bytes = sitemaps.iter().map(|s| s.bytes).sum();
        Self {
            sitemaps,
            total_entries,
            total_bytes,
            index_path,
        }
    }
}

pub fn generate_text_report(report: &BatchReport) -> String {
    let mut out = String::new();

    out.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
    out.push_str("                     SITEMAP BATCH\n");
    out.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");

    out.push_str(&format!("Sitemaps:     {}\n", report.sitemaps.len()));
    out.push_str(&format!("URLs:         {}\n", report.total_entries));
    out.push_str(&format!("Size:         {}\n", format_bytes(report.total_bytes)));
    match report.index_path {
        Some(ref path) => out.push_str(&format!("Index:        {}\n", path.display())),
        None => out.push_str("Index:        (not written)\n"),
    }
    out.push('\n');

    if report.sitemaps.is_empty() {
        out.push_str("  (no sitemaps written)\n");
        return out;
    }

    for (i, sitemap) in report.sitemaps.iter().enumerate() {
        let prefix = if i == report.sitemaps.len() - 1 {
            "└── "
        } else {
            "├── "
        };
        out.push_str(&format!(
            "{}{}  [{} urls, {}] {}\n",
            prefix,
            sitemap.filename,
            sitemap.entries,
            format_bytes(sitemap.bytes),
            sitemap.lastmod()
        ));
    }

    out
}

pub fn generate_json_report(report: &BatchReport) -> Result<String, serde_json::Error> {
    let json_report = serde_json::json!({
        "report": {
            "metadata": {
                "generator": "Sitemapper",
                "version": env!("CARGO_PKG_VERSION"),
                "generated_at": chrono::Utc::now().to_rfc3339(),
                "format": "json"
            },
            "summary": {
                "total_sitemaps": report.sitemaps.len(),
                "total_entries": report.total_entries,
                "total_bytes": report.total_bytes,
                "index": report.index_path
            },
            "sitemaps": report.sitemaps
        }
    });

    serde_json::to_string_pretty(&json_report)
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

fn format_bytes(bytes: usize) -> String {
    const KIB: f64 = 1024.0;
    const MIB: f64 = KIB * 1024.0;

    let value = bytes as f64;
    if value >= MIB {
        format!("{:.1} MiB", value / MIB)
    } else if value >= KIB {
        format!("{:.1} KiB", value / KIB)
    } else {
        format!("{} B", bytes)
    }
}
