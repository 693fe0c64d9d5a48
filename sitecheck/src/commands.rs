use crate::CLAP_STYLING;
use clap::{arg, command};
use url::Url;

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("sitecheck")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("sitecheck")
        .styles(CLAP_STYLING)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            command!("run")
                .about(
                    "Crawl the deployed site in a headless browser, cross-check the \
                container log, and write a JSON smoke-test report. Exits 1 when any \
                page fails or the log contains errors.",
                )
                .arg(
                    arg!(-u --"url" <URL>)
                        .required(false)
                        .help("Base URL to crawl (env: SITECHECK_BASE_URL)")
                        .value_parser(clap::value_parser!(Url)),
                )
                .arg(
                    arg!(-m --"max-pages" <COUNT>)
                        .required(false)
                        .help("Maximum number of pages to visit (env: SITECHECK_MAX_PAGES)")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    arg!(-c --"container" <NAME>)
                        .required(false)
                        .help("Container whose logs are cross-checked after the crawl (env: SITECHECK_CONTAINER)"),
                )
                .arg(
                    arg!(--"chrome" <PATH>)
                        .required(false)
                        .help("Headless-browser executable override (env: SITECHECK_CHROME)")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .arg(
                    arg!(-o --"report-dir" <PATH>)
                        .required(false)
                        .help("Directory the JSON report is written to")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .arg(
                    arg!(--"timeout" <SECONDS>)
                        .required(false)
                        .help("Per-page navigation timeout in seconds")
                        .value_parser(clap::value_parser!(u64)),
                ),
        )
}
