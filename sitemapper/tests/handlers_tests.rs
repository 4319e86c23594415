use sitemapper::handlers::*;
use std::io::{Cursor, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tempfile::{NamedTempFile, tempdir};
use url::Url;

#[test]
fn test_parse_url_line_with_scheme() {
    let result = parse_url_line("https://example.com");
    assert_eq!(result, Some("https://example.com".to_string()));
}

#[test]
fn test_parse_url_line_without_scheme() {
    let result = parse_url_line("example.com/about");
    assert_eq!(result, Some("http://example.com/about".to_string()));
}

#[test]
fn test_parse_url_line_invalid() {
    let result = parse_url_line("not a valid url!!!");
    assert_eq!(result, None);
}

#[test]
fn test_parse_entry_line_uses_defaults() {
    let entry = parse_entry_line("https://example.com/", &EntryDefaults::default()).unwrap();

    assert_eq!(entry.loc, "https://example.com/");
    assert_eq!(entry.changefreq, "weekly");
    assert_eq!(entry.priority, 0.5);
}

#[test]
fn test_parse_entry_line_with_overrides() {
    let entry = parse_entry_line(
        "  https://example.com/news   Daily 0.9 ",
        &EntryDefaults::default(),
    )
    .unwrap();

    assert_eq!(entry.changefreq, "daily");
    assert_eq!(entry.priority, 0.9);
}

#[test]
fn test_parse_entry_line_skips_comments_and_blanks() {
    let defaults = EntryDefaults::default();
    assert!(parse_entry_line("", &defaults).is_none());
    assert!(parse_entry_line("   ", &defaults).is_none());
    assert!(parse_entry_line("# https://example.com/", &defaults).is_none());
}

#[test]
fn test_parse_entry_line_rejects_bad_fields() {
    let defaults = EntryDefaults::default();
    assert!(parse_entry_line("https://example.com/ fortnightly", &defaults).is_none());
    assert!(parse_entry_line("https://example.com/ daily 2.0", &defaults).is_none());
    assert!(parse_entry_line("https://example.com/ daily high", &defaults).is_none());
}

#[test]
fn test_parse_priority_bounds() {
    assert_eq!(parse_priority("0.1"), Ok(0.1));
    assert_eq!(parse_priority("0.9"), Ok(0.9));
    assert!(parse_priority("-0.1").is_err());
    assert!(parse_priority("abc").is_err());
}

#[test]
fn test_parse_priority_rejects_widths_the_writer_cannot_hold() {
    for value in ["0", "1", "1.0", "0.25", "0.05"] {
        let err = parse_priority(value).unwrap_err();
        assert!(err.contains("single decimal"), "{}: {}", value, err);
    }
}

#[test]
fn test_parse_entry_line_rejects_unsupported_priority() {
    let defaults = EntryDefaults::default();
    assert!(parse_entry_line("https://example.com/a daily 1.0", &defaults).is_none());
    assert!(parse_entry_line("https://example.com/a daily 0.25", &defaults).is_none());
}

#[test]
fn test_parse_entry_line_rejects_escaped_characters() {
    let defaults = EntryDefaults::default();
    assert!(parse_entry_line("https://example.com/?a=1&b=2", &defaults).is_none());
    assert!(parse_entry_line("https://example.com/<tag>", &defaults).is_none());
    assert!(parse_entry_line("https://example.com/?a=1", &defaults).is_some());
}

#[test]
fn test_load_entries_skips_lines_that_would_fail_to_save()
-> Result<(), Box<dyn std::error::Error>> {
    let input = Cursor::new(
        "https://example.com/a daily 1.0\nhttps://example.com/?a=1&b=2\nhttps://example.com/b daily 0.9\n",
    );
    let entries = load_entries_from_reader(input, &EntryDefaults::default())?;
    assert_eq!(entries.len(), 1);

    let dir = tempdir()?;
    let options = GenerateOptions {
        entries,
        output_dir: dir.path().to_path_buf(),
        domain: "https://example.com".to_string(),
        template: "robot-sitemap-%d.xml".to_string(),
        gzip: false,
        write_index: false,
    };
    let report = execute_generate(options, None)?;
    assert_eq!(report.total_entries, 1);

    Ok(())
}

#[test]
fn test_load_entries_from_reader() {
    let input = Cursor::new("https://example.com/\n\n# skipped\nexample.com/blog monthly\n");
    let entries = load_entries_from_reader(input, &EntryDefaults::default()).unwrap();

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1].loc, "http://example.com/blog");
    assert_eq!(entries[1].changefreq, "monthly");
}

#[test]
fn test_load_entries_from_file() -> Result<(), Box<dyn std::error::Error>> {
    let mut temp_file = NamedTempFile::new()?;
    writeln!(temp_file, "https://example.com")?;
    writeln!(temp_file, "example.org")?;
    writeln!(temp_file)?; // Empty line
    writeln!(temp_file, "https://api.example.com hourly 0.7")?;

    let path = PathBuf::from(temp_file.path());
    let entries = load_entries_from_file(&path, &EntryDefaults::default())?;

    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].loc, "https://example.com");
    assert_eq!(entries[1].loc, "http://example.org");
    assert_eq!(entries[2].changefreq, "hourly");
    assert_eq!(entries[2].priority, 0.7);

    Ok(())
}

#[test]
fn test_load_entries_from_file_empty() {
    let mut temp_file = NamedTempFile::new().unwrap();
    writeln!(temp_file).unwrap();
    writeln!(temp_file, "   ").unwrap();

    let path = PathBuf::from(temp_file.path());
    let result = load_entries_from_file(&path, &EntryDefaults::default());

    assert!(result.is_err());
    assert!(result.unwrap_err().contains("No valid URLs"));
}

#[test]
fn test_load_entries_from_missing_file() {
    let path = PathBuf::from("/nonexistent/urls.txt");
    let result = load_entries_from_source(Some(&path), &EntryDefaults::default());

    assert!(result.unwrap_err().contains("Failed to read input file"));
}

#[test]
fn test_normalize_domain_trims_trailing_slash() {
    let domain = Url::parse("https://example.com").unwrap();
    assert_eq!(normalize_domain(&domain), "https://example.com");

    let domain = Url::parse("https://example.com/static/").unwrap();
    assert_eq!(normalize_domain(&domain), "https://example.com/static");
}

#[test]
fn test_prepare_output_dir_creates_nested() {
    let dir = tempdir().unwrap();
    let nested = dir.path().join("a").join("b");

    let prepared = prepare_output_dir(nested.to_str().unwrap()).unwrap();
    assert_eq!(prepared, nested);
    assert!(nested.is_dir());
}

#[test]
fn test_execute_generate_writes_sitemaps_and_index() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let entries = vec![
        sitemapper::UrlEntry::new("https://example.com/"),
        sitemapper::UrlEntry::new("https://example.com/about"),
        sitemapper::UrlEntry::new("https://example.com/contact"),
    ];

    let calls = Arc::new(Mutex::new(Vec::new()));
    let calls_clone = calls.clone();
    let callback: GenerateProgressCallback = Arc::new(move |done, total| {
        calls_clone.lock().unwrap().push((done, total));
    });

    let options = GenerateOptions {
        entries,
        output_dir: dir.path().to_path_buf(),
        domain: "https://example.com".to_string(),
        template: "pages-%d.xml".to_string(),
        gzip: false,
        write_index: true,
    };

    let report = execute_generate(options, Some(callback))?;

    assert_eq!(report.sitemaps.len(), 1);
    assert_eq!(report.sitemaps[0].filename, "pages-0.xml");
    assert_eq!(report.total_entries, 3);
    assert_eq!(
        report.index_path,
        Some(dir.path().join("robot-sitemap-index.xml"))
    );
    assert_eq!(*calls.lock().unwrap(), vec![(3, 3)]);

    let index = std::fs::read_to_string(dir.path().join("robot-sitemap-index.xml"))?;
    assert!(index.contains("<loc>https://example.com/pages-0.xml</loc>"));

    Ok(())
}

#[test]
fn test_execute_generate_without_index() {
    let dir = tempdir().unwrap();
    let options = GenerateOptions {
        entries: vec![sitemapper::UrlEntry::new("https://example.com/")],
        output_dir: dir.path().to_path_buf(),
        domain: "https://example.com".to_string(),
        template: "robot-sitemap-%d.xml".to_string(),
        gzip: true,
        write_index: false,
    };

    let report = execute_generate(options, None).unwrap();

    assert!(report.index_path.is_none());
    assert!(dir.path().join("robot-sitemap-0.xml.gz").exists());
    assert!(!dir.path().join("robot-sitemap-index.xml").exists());
}

#[test]
fn test_execute_generate_rejects_empty_input() {
    let dir = tempdir().unwrap();
    let options = GenerateOptions {
        entries: Vec::new(),
        output_dir: dir.path().to_path_buf(),
        domain: "https://example.com".to_string(),
        template: "robot-sitemap-%d.xml".to_string(),
        gzip: false,
        write_index: true,
    };

    assert!(execute_generate(options, None).is_err());
}

#[test]
fn test_execute_generate_surfaces_integrity_errors() {
    let dir = tempdir().unwrap();
    let options = GenerateOptions {
        entries: vec![sitemapper::UrlEntry::new("https://example.com/?a=1&b=2")],
        output_dir: dir.path().to_path_buf(),
        domain: "https://example.com".to_string(),
        template: "robot-sitemap-%d.xml".to_string(),
        gzip: false,
        write_index: true,
    };

    let err = execute_generate(options, None).unwrap_err();
    let root = err.downcast_ref::<sitemapper::SitemapError>();
    assert!(matches!(
        root,
        Some(sitemapper::SitemapError::Integrity { .. })
    ));
}

#[test]
fn test_execute_generate_rejects_template_without_placeholder() {
    let dir = tempdir().unwrap();
    let options = GenerateOptions {
        entries: vec![sitemapper::UrlEntry::new("https://example.com/")],
        output_dir: dir.path().to_path_buf(),
        domain: "https://example.com".to_string(),
        template: "sitemap.xml".to_string(),
        gzip: false,
        write_index: true,
    };

    let err = execute_generate(options, None).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<sitemapper::SitemapError>(),
        Some(sitemapper::SitemapError::InvalidTemplate(_))
    ));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}
