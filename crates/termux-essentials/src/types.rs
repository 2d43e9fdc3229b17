use std::fmt::Display;

use reqwest::Url;
use serde::{Deserialize, Serialize};

/// A fetched page: the final URL after redirects plus its decoded HTML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    url: String,
    html: String,
}

impl Page {
    pub fn new(url: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            html: html.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    /// The page URL parsed for joining relative links against.
    pub fn base_url(&self) -> Option<Url> {
        Url::parse(&self.url).ok()
    }
}

/// One `<table>`, as rows of cell text. Rows may differ in length.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRecord {
    pub rows: Vec<Vec<String>>,
}

impl TableRecord {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Width of the widest row.
    pub fn max_columns(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }
}

impl Display for TableRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "table: {} row(s), up to {} column(s)",
            self.rows.len(),
            self.max_columns()
        )
    }
}

/// One anchor: its `href` exactly as written and its visible text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    pub href: String,
    pub text: String,
}

impl LinkRecord {
    pub fn new(href: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            text: text.into(),
        }
    }

    /// Joins `href` against `base`. Hrefs that cannot be joined
    /// (e.g. `javascript:` oddities with bad syntax) are kept as written.
    pub fn resolve(&self, base: &Url) -> LinkRecord {
        let href = match base.join(&self.href) {
            Ok(url) => url.to_string(),
            Err(e) => {
                log::debug!("Keeping unresolvable href '{}': {}", self.href, e);
                self.href.clone()
            }
        };

        LinkRecord {
            href,
            text: self.text.clone(),
        }
    }
}

impl Display for LinkRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.text.is_empty() {
            write!(f, "<{}>", self.href)
        } else {
            write!(f, "{} <{}>", self.text, self.href)
        }
    }
}

/// Everything `xtract` pulls out of a single page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extraction {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tables: Option<Vec<TableRecord>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<LinkRecord>>,
}
