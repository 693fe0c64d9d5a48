use anyhow::Context;
use chrono::Utc;
use clap::ArgMatches;
use commands::command_argument_builder;
use indicatif::{ProgressBar, ProgressStyle};
use sitecheck_core::logs::{ContainerLogSource, LogSource, NullLogSource, RunWindow};
use sitecheck_core::report::RunReport;
use sitecheck_core::RunConfig;
use sitecheck_scanner::seeds::discover_seeds;
use sitecheck_scanner::{BrowserSession, Crawler, PageResult};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

mod commands;

#[tokio::main]
async fn main() {
    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();

    match chosen_command.subcommand() {
        Some(("run", sub_matches)) => {
            let code = handle_run(sub_matches).await;
            std::process::exit(code);
        }
        _ => unreachable!("clap should ensure we don't get here"),
    }
}

async fn handle_run(sub_matches: &ArgMatches) -> i32 {
    tracing_subscriber::fmt::init();

    let mut config = match RunConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("✗ Invalid configuration: {:#}", e);
            return 1;
        }
    };

    // CLI flags take precedence over the environment
    if let Some(url) = sub_matches.get_one::<Url>("url") {
        config.base_url = url.clone();
    }
    if let Some(max_pages) = sub_matches.get_one::<usize>("max-pages") {
        config.max_pages = *max_pages;
    }
    if let Some(container) = sub_matches.get_one::<String>("container") {
        config.container = Some(container.clone());
    }
    if let Some(chrome) = sub_matches.get_one::<PathBuf>("chrome") {
        config.chrome = Some(chrome.clone());
    }
    if let Some(report_dir) = sub_matches.get_one::<PathBuf>("report-dir") {
        config.report_dir = report_dir.clone();
    }
    if let Some(timeout) = sub_matches.get_one::<u64>("timeout") {
        config.nav_timeout = Duration::from_secs(*timeout);
    }

    println!("\n🕷  Smoke-testing {}", config.base_url);
    println!("Page cap: {}", config.max_pages);
    println!(
        "Log cross-check: {}\n",
        config.container.as_deref().unwrap_or("disabled")
    );

    let started_at = Utc::now();

    let crawl_outcome = run_crawl(&config).await;
    let window = RunWindow {
        started_at,
        finished_at: Utc::now(),
    };

    let (report, mut code) = match crawl_outcome {
        Ok(pages) => {
            let log_source: Box<dyn LogSource> = match &config.container {
                Some(container) => Box::new(ContainerLogSource::new(container.clone())),
                None => Box::new(NullLogSource),
            };
            let log_lines = log_source.error_lines(&window);
            let report = RunReport::new(&config.base_url, pages, log_lines, window);
            let code = report.exit_code();
            (report, code)
        }
        Err(e) => {
            // Best-effort report so a dead deployment still leaves evidence
            let report = RunReport::fatal(&config.base_url, format!("{:#}", e), window);
            (report, 1)
        }
    };

    match report.write(&config.report_dir) {
        Ok(path) => println!("Report written to {}", path.display()),
        Err(e) => {
            eprintln!("✗ Failed to write report: {}", e);
            code = 1;
        }
    }

    print!("{}", report.render_text());
    code
}

/// Preflight, launch, crawl, close. The browser session is closed before any
/// result leaves this function, on success and failure alike.
async fn run_crawl(config: &RunConfig) -> anyhow::Result<Vec<PageResult>> {
    // Fail fast with a fatal report (zero pages) when the site is down,
    // instead of timing out page by page inside the browser.
    reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()?
        .get(config.base_url.clone())
        .send()
        .await
        .with_context(|| format!("base URL unreachable: {}", config.base_url))?;

    let crawler = Crawler::new(&config.base_url).with_max_pages(config.max_pages);
    let seeds = discover_seeds(&config.base_url, crawler.filter()).await;

    let session = BrowserSession::launch(config.chrome.clone(), config.nav_timeout, config.settle)
        .await
        .context("browser launch failed")?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    spinner.set_message("Starting crawl...");

    let spinner_clone = spinner.clone();
    let max_pages = config.max_pages;
    let crawler = crawler.with_progress_callback(Arc::new(move |visited: usize, url: String| {
        let path = Url::parse(&url)
            .ok()
            .map(|u| u.path().to_string())
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| "/".to_string());
        spinner_clone.set_message(format!("Crawling {}/{}: {}", visited, max_pages, path));
        spinner_clone.tick();
    }));

    let results = crawler.crawl(&session, seeds).await;

    spinner.finish_with_message(format!("Crawl complete! {} pages visited", results.len()));

    // crawl() never errors, so the session always reaches close(). A messy
    // shutdown is not worth discarding the results over.
    if let Err(e) = session.close().await {
        tracing::warn!("Browser did not shut down cleanly: {}", e);
    }

    Ok(results)
}

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);
