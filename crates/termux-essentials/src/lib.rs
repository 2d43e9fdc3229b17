pub mod clipboard;
pub mod files;
pub mod parser;
pub mod render;
pub mod scraper;
pub mod types;

pub use clipboard::{Backend, Clipboard, ClipboardError};
pub use files::FileError;
pub use parser::{Document, ParseError};
pub use self::scraper::{ScraperError, WebScraper};
