use crate::CLAP_STYLING;
use clap::{arg, command};
use sitemapper::handlers::{CHANGEFREQ_VALUES, parse_priority};
use sitemapper_core::writer::DEFAULT_FILENAME_TEMPLATE;
use url::Url;

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("sitemapper")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("sitemapper")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress progress and non-essential output").required(false))
        .subcommand_required(true)
        .subcommand(
            command!("generate")
                .about(
                    "Write sitemaps.org sitemaps for a list of URLs, splitting into multiple \
                files when limits are reached, plus a sitemap index.",
                )
                .arg(
                    arg!(-i --"input" <PATH>)
                        .required(false)
                        .help("Newline-delimited file of URLs ('-' or omitted reads stdin)")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .arg(
                    arg!(-o --"output-dir" <PATH>)
                        .required(false)
                        .help("Directory the sitemaps and index are written to")
                        .default_value("."),
                )
                .arg(
                    arg!(-d --"domain" <URL>)
                        .required(true)
                        .help("Base URL the sitemaps will be served from, used for index entries")
                        .value_parser(clap::value_parser!(Url)),
                )
                .arg(
                    arg!(--"changefreq" <FREQ>)
                        .required(false)
                        .help("Change frequency for lines that don't specify one")
                        .value_parser(CHANGEFREQ_VALUES)
                        .default_value("weekly"),
                )
                .arg(
                    arg!(--"priority" <PRIORITY>)
                        .required(false)
                        .help("Priority (0.1 - 0.9, one decimal) for lines that don't specify one")
                        .value_parser(parse_priority)
                        .default_value("0.5"),
                )
                .arg(
                    arg!(-t --"template" <TEMPLATE>)
                        .required(false)
                        .help("Sitemap filename template, '%d' is replaced by the file number")
                        .default_value(DEFAULT_FILENAME_TEMPLATE),
                )
                .arg(
                    arg!(--"no-gzip")
                        .required(false)
                        .help("Leave sitemaps uncompressed instead of writing .gz files")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    arg!(--"no-index")
                        .required(false)
                        .help("Skip writing the sitemap index")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Report format: text, json")
                        .value_parser(["text", "json"])
                        .default_value("text"),
                )
                .arg(
                    arg!(-r --"report" <PATH>)
                        .required(false)
                        .help("Save the report to a file (default: display to screen)")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                ),
        )
}
