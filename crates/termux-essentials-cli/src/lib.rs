//! Pieces shared by the `copy`, `erase`, `overwrite` and `xtract` binaries.

use std::fmt::Display;
use std::process;

use clap::{Args, ValueEnum};
use log::LevelFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Args)]
pub struct Logging {
    #[arg(
        short = 'l',
        long = "log-level",
        value_enum,
        default_value = "warn",
        global = true,
        help = "Set the logging level"
    )]
    pub log_level: LogLevel,
}

impl Logging {
    pub fn init(&self) {
        env_logger::Builder::new()
            .filter_level(self.log_level.into())
            .format_timestamp(None)
            .init();
    }
}

/// Prints `Error: <context>: <err>` to stderr and exits with status 1.
pub fn fail(context: impl Display, err: impl Display) -> ! {
    eprintln!("Error: {}: {}", context, err);
    process::exit(1);
}

/// Accepts `\t` and `tab` for a tab, `\\` for a backslash, anything else
/// verbatim. Escapes are read left to right, so `\\t` is a backslash then
/// `t`. Empty delimiters are rejected.
pub fn parse_delimiter(s: &str) -> Result<String, String> {
    match s {
        "" => return Err("Delimiter cannot be empty".to_string()),
        "tab" => return Ok("\t".to_string()),
        _ => {}
    }

    let mut delimiter = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            delimiter.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => delimiter.push('\t'),
            Some('\\') => delimiter.push('\\'),
            Some(other) => {
                delimiter.push('\\');
                delimiter.push(other);
            }
            None => delimiter.push('\\'),
        }
    }
    Ok(delimiter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_delimiter() {
        assert_eq!(parse_delimiter("\\t").unwrap(), "\t");
        assert_eq!(parse_delimiter("tab").unwrap(), "\t");
        assert_eq!(parse_delimiter(",").unwrap(), ",");
        assert_eq!(parse_delimiter(" | ").unwrap(), " | ");
        assert!(parse_delimiter("").is_err());
    }

    #[test]
    fn test_parse_delimiter_escapes_left_to_right() {
        assert_eq!(parse_delimiter("\\\\t").unwrap(), "\\t");
        assert_eq!(parse_delimiter("\\\\\\t").unwrap(), "\\\t");
        assert_eq!(parse_delimiter("a\\tb").unwrap(), "a\tb");
        assert_eq!(parse_delimiter("\\n").unwrap(), "\\n");
        assert_eq!(parse_delimiter("\\").unwrap(), "\\");
    }

    #[test]
    fn test_log_level_into_filter() {
        assert_eq!(LevelFilter::from(LogLevel::Off), LevelFilter::Off);
        assert_eq!(LevelFilter::from(LogLevel::Debug), LevelFilter::Debug);
    }
}
