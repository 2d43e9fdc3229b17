use std::io::{self, Read};
use std::path::PathBuf;

use clap::Parser;
use termux_essentials::files;
use termux_essentials_cli::{Logging, fail};

#[derive(Parser)]
#[command(name = "overwrite")]
#[command(about = "Replace the content of a file", long_about = None)]
struct Cli {
    #[command(flatten)]
    logging: Logging,

    #[arg(long, help = "Create the file when it does not exist")]
    create: bool,

    #[arg(short = 'n', long, help = "Append a trailing newline")]
    newline: bool,

    #[arg(help = "File to overwrite")]
    path: PathBuf,

    #[arg(
        required = true,
        trailing_var_arg = true,
        allow_hyphen_values = true,
        help = "New content; words are joined by spaces, a lone '-' reads stdin"
    )]
    content: Vec<String>,
}

fn main() {
    let cli = Cli::parse();
    cli.logging.init();

    let mut content = if cli.content == ["-"] {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .unwrap_or_else(|e| fail("reading stdin", e));
        buf
    } else {
        cli.content.join(" ")
    };

    if cli.newline {
        content.push('\n');
    }

    files::overwrite(&cli.path, &content, cli.create).unwrap_or_else(|e| fail("overwrite", e));
}
