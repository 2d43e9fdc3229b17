use std::io::{self, ErrorKind};
use std::str::FromStr;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use termux_essentials::Document;
use termux_essentials::render::{self, Sections, TextRenderer};
use termux_essentials::scraper::WebScraper;
use termux_essentials_cli::{Logging, fail, parse_delimiter};

#[derive(Parser)]
#[command(name = "xtract")]
#[command(about = "Print the tables and links of a web page", long_about = None)]
struct Cli {
    #[command(flatten)]
    logging: Logging,

    #[arg(help = "URL of the page to scrape (https:// is assumed when omitted)")]
    url: String,

    #[arg(
        long,
        value_name = "SECTION",
        value_parser = parse_sections,
        default_value = "all",
        help = "Which sections to print: all, tables or links"
    )]
    only: Sections,

    #[arg(
        short = 'd',
        long,
        value_parser = parse_delimiter,
        default_value = "\\t",
        help = "Delimiter between cells, and between a link's href and text"
    )]
    delimiter: String,

    #[arg(
        short = 'o',
        long = "output",
        value_enum,
        default_value = "text",
        help = "Output format"
    )]
    format: OutputFormat,

    #[arg(long, help = "Resolve relative link targets against the page URL")]
    absolute: bool,

    #[arg(
        long,
        value_name = "SECS",
        default_value_t = 30,
        value_parser = clap::value_parser!(u64).range(1..),
        help = "Request timeout in seconds"
    )]
    timeout: u64,
}

#[derive(Debug, Clone, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn parse_sections(s: &str) -> Result<Sections, String> {
    Sections::from_str(s).map_err(|e| e.to_string())
}

fn main() {
    let cli = Cli::parse();
    cli.logging.init();

    let scraper = WebScraper::with_timeout(Duration::from_secs(cli.timeout))
        .unwrap_or_else(|e| fail("creating scraper", e));

    let page = scraper
        .fetch(&cli.url)
        .unwrap_or_else(|e| fail(format_args!("fetching {}", cli.url), e));

    let document = Document::from_page(&page);
    log::debug!("Parsed {} with {} repaired error(s)", page.url(), document.errors());

    let base = if cli.absolute { page.base_url() } else { None };

    let mut out = io::stdout().lock();
    let written = match cli.format {
        OutputFormat::Text => TextRenderer::new(&cli.delimiter).write_document(
            &mut out,
            &document,
            cli.only,
            base.as_ref(),
        ),
        OutputFormat::Json => {
            let extraction = render::extraction(page.url(), &document, cli.only, base.as_ref());
            render::write_json(&mut out, &extraction)
        }
    };

    // Output is best-effort: a closed pipe (e.g. `| head`) is not a failure.
    if let Err(e) = written
        && e.kind() != ErrorKind::BrokenPipe
    {
        log::warn!("Failed to write output: {}", e);
    }
}
