use std::path::PathBuf;
use std::process;

use clap::Parser;
use termux_essentials::files;
use termux_essentials_cli::Logging;

#[derive(Parser)]
#[command(name = "erase")]
#[command(about = "Erase the content of files, leaving them empty", long_about = None)]
struct Cli {
    #[command(flatten)]
    logging: Logging,

    #[arg(required = true, help = "Files to erase")]
    paths: Vec<PathBuf>,
}

fn main() {
    let cli = Cli::parse();
    cli.logging.init();

    let mut failed = 0;
    for path in &cli.paths {
        if let Err(e) = files::erase(path) {
            eprintln!("Error: {}", e);
            failed += 1;
        }
    }

    if failed > 0 {
        log::debug!("{} of {} file(s) could not be erased", failed, cli.paths.len());
        process::exit(1);
    }
}
