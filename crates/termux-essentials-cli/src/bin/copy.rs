use std::io::{self, Read};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use clap::Parser;
use termux_essentials::clipboard::{Backend, Clipboard, DEFAULT_HOLD};
use termux_essentials::files;
use termux_essentials_cli::{Logging, fail};

#[derive(Parser)]
#[command(name = "copy")]
#[command(about = "Copy text, file content or stdin to the clipboard")]
#[command(long_about = "Copy text, file content or stdin to the clipboard.\n\n\
On Linux desktops the copied text is served by this process. Without a \
clipboard manager it only stays available while `copy` runs, so `copy` \
waits up to --hold seconds, returning as soon as another owner takes the \
clipboard.")]
struct Cli {
    #[command(flatten)]
    logging: Logging,

    #[arg(
        short = 't',
        long,
        conflicts_with = "files",
        help = "Copy this text instead of reading files or stdin"
    )]
    text: Option<String>,

    #[arg(
        long,
        value_parser = parse_backend,
        default_value = "auto",
        help = "Clipboard backend: auto, termux or system"
    )]
    backend: Backend,

    #[arg(
        long,
        value_name = "SECS",
        default_value_t = DEFAULT_HOLD.as_secs(),
        help = "Linux system clipboard: seconds to keep serving the text (0 = exit at once)"
    )]
    hold: u64,

    #[arg(help = "Files to copy, concatenated in order; stdin when none are given")]
    files: Vec<PathBuf>,
}

fn parse_backend(s: &str) -> Result<Backend, String> {
    Backend::from_str(s).map_err(|e| e.to_string())
}

fn read_content(cli: &Cli) -> String {
    if let Some(text) = &cli.text {
        return text.clone();
    }

    if cli.files.is_empty() {
        log::debug!("Reading clipboard content from stdin");
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .unwrap_or_else(|e| fail("reading stdin", e));
        return buf;
    }

    cli.files
        .iter()
        .map(|path| files::read_to_string(path).unwrap_or_else(|e| fail("copy", e)))
        .collect()
}

fn main() {
    let cli = Cli::parse();
    cli.logging.init();

    let content = read_content(&cli);

    let mut clipboard = Clipboard::open(cli.backend)
        .unwrap_or_else(|e| fail("opening clipboard", e))
        .with_hold(Duration::from_secs(cli.hold));
    clipboard
        .set_text(&content)
        .unwrap_or_else(|e| fail("copying to clipboard", e));
}
