use anyhow::{Context, bail};
use clap::ArgMatches;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use sitemapper_core::report::{
    BatchReport, ReportFormat, generate_json_report, generate_text_report, save_report,
};
use sitemapper_core::model::format_priority;
use sitemapper_core::writer::validate_template;
use sitemapper_core::{SitemapWriter, UrlEntry};
use std::fs;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use url::Url;

/// Change frequencies accepted by the sitemaps.org protocol
pub const CHANGEFREQ_VALUES: [&str; 7] = [
    "always", "hourly", "daily", "weekly", "monthly", "yearly", "never",
];

const PROGRESS_EVERY: usize = 1_000;

/// Characters the serializer escapes, which would break the sitemap size estimate
const ESCAPED_CHARS: [char; 3] = ['&', '<', '>'];

/// Values applied to input lines that only carry a URL
#[derive(Debug, Clone)]
pub struct EntryDefaults {
    pub changefreq: String,
    pub priority: f64,
}

impl Default for EntryDefaults {
    fn default() -> Self {
        Self {
            changefreq: sitemapper_core::model::DEFAULT_CHANGEFREQ.to_string(),
            priority: sitemapper_core::model::DEFAULT_PRIORITY,
        }
    }
}

/// Options for a single `generate` run
pub struct GenerateOptions {
    pub entries: Vec<UrlEntry>,
    pub output_dir: PathBuf,
    pub domain: String,
    pub template: String,
    pub gzip: bool,
    pub write_index: bool,
}

/// Callback for reporting generation progress as (appended, total)
pub type GenerateProgressCallback = Arc<dyn Fn(usize, usize) + Send + Sync>;

/// clap value parser for `--priority`
pub fn parse_priority(value: &str) -> Result<f64, String> {
    let priority: f64 = value
        .parse()
        .map_err(|_| format!("'{}' is not a number", value))?;
    if !(0.0..=1.0).contains(&priority) {
        return Err(format!("priority must be between 0.0 and 1.0, got {}", priority));
    }
    // The sitemap size estimate assumes a three character priority such as 0.5
    if format_priority(priority).len() != 3 {
        return Err(format!(
            "priority must have a single decimal between 0.1 and 0.9, got {}",
            value
        ));
    }
    Ok(priority)
}

/// Parse a single line as a URL, trying to add http:// if needed
pub fn parse_url_line(line: &str) -> Option<String> {
    // Try to parse as-is
    if Url::parse(line).is_ok() {
        return Some(line.to_string());
    }

    // Try adding http://
    let with_scheme = format!("http://{}", line);
    if Url::parse(&with_scheme).is_ok() {
        return Some(with_scheme);
    }

    eprintln!("⚠️  Skipping invalid URL '{}'", line);
    None
}

/// Parse `<url> [changefreq] [priority]`. Blank lines and `#` comments yield `None`.
pub fn parse_entry_line(line: &str, defaults: &EntryDefaults) -> Option<UrlEntry> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let mut fields = line.split_whitespace();
    let url = parse_url_line(fields.next()?)?;
    if url.contains(ESCAPED_CHARS) {
        eprintln!(
            "⚠️  Skipping '{}': URLs containing '&', '<' or '>' are not supported",
            url
        );
        return None;
    }
    let mut entry = UrlEntry::new(url)
        .with_changefreq(defaults.changefreq.clone())
        .with_priority(defaults.priority);

    if let Some(changefreq) = fields.next() {
        let changefreq = changefreq.to_lowercase();
        if !CHANGEFREQ_VALUES.contains(&changefreq.as_str()) {
            eprintln!("⚠️  Skipping '{}': unknown changefreq '{}'", line, changefreq);
            return None;
        }
        entry = entry.with_changefreq(changefreq);
    }

    if let Some(priority) = fields.next() {
        match parse_priority(priority) {
            Ok(priority) => entry = entry.with_priority(priority),
            Err(e) => {
                eprintln!("⚠️  Skipping '{}': {}", line, e);
                return None;
            }
        }
    }

    Some(entry)
}

/// Load and parse entries from any line-oriented reader
pub fn load_entries_from_reader<R: BufRead>(
    reader: R,
    defaults: &EntryDefaults,
) -> Result<Vec<UrlEntry>, String> {
    let mut entries = Vec::new();
    for line in reader.lines() {
        let line = line.map_err(|e| format!("Failed to read input: {}", e))?;
        if let Some(entry) = parse_entry_line(&line, defaults) {
            entries.push(entry);
        }
    }
    Ok(entries)
}

/// Load and parse entries from a file
pub fn load_entries_from_file(
    path: &PathBuf,
    defaults: &EntryDefaults,
) -> Result<Vec<UrlEntry>, String> {
    let file = fs::File::open(path)
        .map_err(|e| format!("Failed to read input file {}: {}", path.display(), e))?;

    let entries = load_entries_from_reader(BufReader::new(file), defaults)?;
    if entries.is_empty() {
        return Err(format!("No valid URLs found in {}", path.display()));
    }

    Ok(entries)
}

/// Load entries from the input file, or stdin when none (or `-`) is given
pub fn load_entries_from_source(
    input: Option<&PathBuf>,
    defaults: &EntryDefaults,
) -> Result<Vec<UrlEntry>, String> {
    match input {
        Some(path) if path.as_os_str() != "-" => load_entries_from_file(path, defaults),
        _ => {
            let entries = load_entries_from_reader(io::stdin().lock(), defaults)?;
            if entries.is_empty() {
                return Err("No valid URLs found on stdin".to_string());
            }
            Ok(entries)
        }
    }
}

/// Index entries are built as `<domain>/<filename>`, so drop any trailing slash
pub fn normalize_domain(domain: &Url) -> String {
    domain.as_str().trim_end_matches('/').to_string()
}

/// Expand `~` and create the output directory if needed
pub fn prepare_output_dir(raw: &str) -> anyhow::Result<PathBuf> {
    let expanded = shellexpand::tilde(raw);
    let dir = Path::new(expanded.as_ref()).to_path_buf();
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
    Ok(dir)
}

/// Feed every entry through a `SitemapWriter`, save the tail document and
/// optionally write the index
pub fn execute_generate(
    options: GenerateOptions,
    progress_callback: Option<GenerateProgressCallback>,
) -> anyhow::Result<BatchReport> {
    let GenerateOptions {
        entries,
        output_dir,
        domain,
        template,
        gzip,
        write_index,
    } = options;

    validate_template(&template)
        .with_context(|| format!("Invalid filename template '{}'", template))?;
    if entries.is_empty() {
        bail!("No URLs to write");
    }

    let mut writer = SitemapWriter::new(&output_dir, domain).with_filename_template(template);
    if !gzip {
        writer = writer.without_compression();
    }

    let total = entries.len();
    for (i, entry) in entries.iter().enumerate() {
        writer
            .append_entry(entry)
            .with_context(|| format!("Failed to append {}", entry.loc))?;

        if let Some(ref callback) = progress_callback {
            if (i + 1) % PROGRESS_EVERY == 0 || i + 1 == total {
                callback(i + 1, total);
            }
        }
    }

    writer
        .save_default()
        .context("Failed to save final sitemap")?;
    debug!("Saved {} sitemap(s)", writer.sitemaps().len());

    let sitemaps = writer.sitemaps().to_vec();
    let index_path = if write_index {
        Some(writer.write_index().context("Failed to write sitemap index")?)
    } else {
        None
    };

    Ok(BatchReport::new(sitemaps, index_path))
}

pub fn handle_generate(sub_matches: &ArgMatches, quiet: bool) {
    // Initialize tracing for logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    if let Err(e) = run_generate(sub_matches, quiet) {
        eprintln!("{} {:#}", "✗".red().bold(), e);
        std::process::exit(1);
    }
}

fn run_generate(sub_matches: &ArgMatches, quiet: bool) -> anyhow::Result<()> {
    let input = sub_matches.get_one::<PathBuf>("input");
    let domain = sub_matches
        .get_one::<Url>("domain")
        .context("--domain is required")?;
    let output_dir = sub_matches
        .get_one::<String>("output-dir")
        .map(String::as_str)
        .unwrap_or(".");
    let defaults = EntryDefaults {
        changefreq: sub_matches
            .get_one::<String>("changefreq")
            .cloned()
            .unwrap_or_else(|| EntryDefaults::default().changefreq),
        priority: sub_matches
            .get_one::<f64>("priority")
            .copied()
            .unwrap_or(EntryDefaults::default().priority),
    };
    let template = sub_matches
        .get_one::<String>("template")
        .cloned()
        .unwrap_or_else(|| sitemapper_core::writer::DEFAULT_FILENAME_TEMPLATE.to_string());
    let format = sub_matches
        .get_one::<String>("format")
        .and_then(|f| ReportFormat::from_str(f))
        .unwrap_or(ReportFormat::Text);
    let report_path = sub_matches.get_one::<PathBuf>("report");

    validate_template(&template)
        .with_context(|| format!("Invalid filename template '{}'", template))?;
    let entries = load_entries_from_source(input, &defaults).map_err(anyhow::Error::msg)?;
    let output_dir = prepare_output_dir(output_dir)?;

    if !quiet {
        println!(
            "\n{} Writing {} URL(s) to {}",
            "→".blue(),
            entries.len().to_string().cyan(),
            output_dir.display().to_string().bright_white()
        );
    }

    let options = GenerateOptions {
        entries,
        output_dir,
        domain: normalize_domain(domain),
        template,
        gzip: !sub_matches.get_flag("no-gzip"),
        write_index: !sub_matches.get_flag("no-index"),
    };

    let spinner = if quiet {
        None
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message("Writing sitemaps...");
        Some(Arc::new(pb))
    };

    let progress_callback: Option<GenerateProgressCallback> = spinner.clone().map(|pb| {
        Arc::new(move |done: usize, total: usize| {
            pb.set_message(format!("Appended {}/{} URLs", done, total));
        }) as GenerateProgressCallback
    });

    let result = execute_generate(options, progress_callback);
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }
    let report = result?;

    if !quiet {
        println!("{} Sitemaps written!\n", "✓".green().bold());
    }

    let content = match format {
        ReportFormat::Text => generate_text_report(&report),
        ReportFormat::Json => generate_json_report(&report)?,
    };

    match report_path {
        Some(path) => {
            save_report(&content, path)
                .with_context(|| format!("Failed to save report to {}", path.display()))?;
            if !quiet {
                println!(
                    "{} Report saved to {}",
                    "✓".green().bold(),
                    path.display().to_string().bright_white()
                );
            }
        }
        None => print!("{}", content),
    }

    Ok(())
}
