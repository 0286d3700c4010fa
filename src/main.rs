//! ImgHarvest main entry point
//!
//! This is the command-line interface for the ImgHarvest image harvester.

use anyhow::{bail, Context};
use chrono::Local;
use clap::Parser;
use img_harvest::config::{load_config_or_default, CrawlPolicy, DEFAULT_BASE_DIR};
use img_harvest::crawler::{harvest, resolve_start_domain, SeedSource};
use img_harvest::output::print_summary;
use std::ffi::OsString;
use std::fmt::Write as _;
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::EnvFilter;

/// ImgHarvest: recursively download every image of a website
///
/// Images are saved under <DIR>/<page host>/<page path>/<file name>, so the
/// output tree mirrors the pages the images were found on.
#[derive(Parser, Debug)]
#[command(name = "img-harvest")]
#[command(version)]
#[command(about = "Recursively download every image of a website", long_about = None)]
struct Cli {
    /// The URL of the website to crawl
    #[arg(short = 'u', long = "url", value_name = "URL")]
    url: Option<String>,

    /// The directory to save images in
    #[arg(short = 'd', long = "dir", value_name = "DIR")]
    dir: Option<PathBuf>,

    /// A text file with one URL to crawl per line
    #[arg(short = 'f', long = "file", value_name = "PATH")]
    file: Option<PathBuf>,

    /// Enable crawling of external URLs
    #[arg(short = 'e', long = "external")]
    external: bool,

    /// Disable deduplication of downloaded images
    #[arg(long = "ndc", visible_alias = "no-dedup")]
    no_dedup: bool,

    /// Path to an optional TOML configuration file
    #[arg(short = 'c', long = "config", value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Never prompt; use defaults for anything not given on the command line
    #[arg(short = 'y', long = "no-prompt")]
    no_prompt: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

/// Rewrites the single-dash `-ndc` spelling, which clap would otherwise read
/// as bundled short flags
fn normalize_arg(arg: OsString) -> OsString {
    if arg == "-ndc" {
        OsString::from("--ndc")
    } else {
        arg
    }
}

/// Local wall-clock timestamps (HH:MM:SS) for log lines
struct LocalClock;

impl FormatTime for LocalClock {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", Local::now().format("%H:%M:%S"))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse_from(std::env::args_os().map(normalize_arg));

    setup_logging(cli.verbose, cli.quiet);
    print_banner();

    let config = load_config_or_default(cli.config.as_deref())
        .context("Failed to load configuration")?;

    let interactive = !cli.no_prompt && io::stdin().is_terminal();
    let mut input = io::stdin().lock();

    let base_dir = match cli.dir.clone().or_else(|| config.output.base_dir.clone()) {
        Some(dir) => dir,
        None if interactive => {
            let answer = prompt(
                &mut input,
                &format!(
                    "Enter the directory to save images (default: {}): ",
                    DEFAULT_BASE_DIR
                ),
            )?;
            if answer.is_empty() {
                PathBuf::from(DEFAULT_BASE_DIR)
            } else {
                PathBuf::from(answer)
            }
        }
        None => PathBuf::from(DEFAULT_BASE_DIR),
    };

    let mut seed_url = cli.url.clone();
    let source = match &cli.file {
        Some(path) => SeedSource::File(path.clone()),
        None => {
            if seed_url.is_none() && interactive {
                let answer = prompt(
                    &mut input,
                    "Enter the website URL (e.g., https://website.com): ",
                )?;
                if !answer.is_empty() {
                    seed_url = Some(answer);
                }
            }
            match &seed_url {
                Some(url) => SeedSource::Url(url.clone()),
                None => bail!("No seed URL given; use -u <URL> or -f <PATH>"),
            }
        }
    };

    let seeds = source.load().context("Failed to load seed URLs")?;
    let start_domain = resolve_start_domain(seed_url.as_deref(), &seeds)
        .context("Failed to determine the start domain")?;

    let crawl_external = cli.external
        || (interactive
            && prompt_yes_no(
                &mut input,
                "Do you want to crawl external URLs? (y/n, default: n): ",
                false,
            )?);

    let deduplicate = !cli.no_dedup
        && (!interactive
            || prompt_yes_no(
                &mut input,
                "Enable deduplication to avoid duplicate image downloads? (y/n, default: y): ",
                true,
            )?);

    let policy = CrawlPolicy::from_config(&config.crawler, base_dir, start_domain)
        .with_crawl_external(crawl_external)
        .with_deduplication(deduplicate);

    let summary = harvest(policy, &config.http, &seeds)
        .await
        .context("Failed to start harvest")?;

    print_summary(&summary);

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("img_harvest=info,warn"),
            1 => EnvFilter::new("img_harvest=debug,info"),
            2 => EnvFilter::new("img_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(LocalClock)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

fn print_banner() {
    println!("ImgHarvest {}", env!("CARGO_PKG_VERSION"));
    println!();
}

/// Asks a question on stdout and reads one trimmed line from `input`
fn prompt(input: &mut impl BufRead, question: &str) -> io::Result<String> {
    print!("{}", question);
    io::stdout().flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Asks a y/n question; anything other than an explicit answer takes `default`
fn prompt_yes_no(input: &mut impl BufRead, question: &str, default: bool) -> io::Result<bool> {
    let answer = prompt(input, question)?.to_lowercase();
    Ok(match answer.as_str() {
        "y" | "yes" => true,
        "n" | "no" => false,
        _ => default,
    })
}
