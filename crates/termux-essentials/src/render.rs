//! Console renderings of extracted tables and links.
//!
//! Text output is line oriented:
//!
//! ```text
//! # table 1
//! Name<TAB>Score
//! Ann<TAB>10
//! # links
//! /home<TAB>Home
//! ```
//!
//! One line per row with cells joined by the delimiter, one line per link
//! as `href<delimiter>text`. Delimiters and line breaks inside a value are
//! replaced by a space so a row never spans lines.

use std::io::{self, Write};
use std::str::FromStr;

use reqwest::Url;

use crate::parser::Document;
use crate::types::{Extraction, LinkRecord, TableRecord};

pub const DEFAULT_DELIMITER: &str = "\t";

#[derive(Debug, thiserror::Error)]
#[error("Invalid section '{0}'. Accepted values: 'all', 'tables', 'links'")]
pub struct SectionsParseError(String);

/// Which parts of a page to print.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Sections {
    #[default]
    All,
    Tables,
    Links,
}

impl Sections {
    pub fn tables(self) -> bool {
        matches!(self, Sections::All | Sections::Tables)
    }

    pub fn links(self) -> bool {
        matches!(self, Sections::All | Sections::Links)
    }
}

impl FromStr for Sections {
    type Err = SectionsParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Sections::All),
            "tables" => Ok(Sections::Tables),
            "links" => Ok(Sections::Links),
            _ => Err(SectionsParseError(s.to_string())),
        }
    }
}

pub struct TextRenderer<'d> {
    delimiter: &'d str,
}

impl Default for TextRenderer<'static> {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
        }
    }
}

impl<'d> TextRenderer<'d> {
    pub fn new(delimiter: &'d str) -> Self {
        Self { delimiter }
    }

    /// Writes every table under a `# table N` header. Returns how many
    /// tables were written.
    pub fn write_tables<W, I>(&self, out: &mut W, tables: I) -> io::Result<usize>
    where
        W: Write,
        I: IntoIterator<Item = TableRecord>,
    {
        let mut count = 0;
        for table in tables {
            count += 1;
            writeln!(out, "# table {}", count)?;
            for row in &table.rows {
                let line = row
                    .iter()
                    .map(|cell| self.clean(cell))
                    .collect::<Vec<_>>()
                    .join(self.delimiter);
                writeln!(out, "{}", line)?;
            }
        }
        Ok(count)
    }

    /// Writes the `# links` header and one line per link. Returns how many
    /// links were written.
    pub fn write_links<W, I>(&self, out: &mut W, links: I) -> io::Result<usize>
    where
        W: Write,
        I: IntoIterator<Item = LinkRecord>,
    {
        writeln!(out, "# links")?;
        let mut count = 0;
        for link in links {
            count += 1;
            writeln!(
                out,
                "{}{}{}",
                self.clean(&link.href),
                self.delimiter,
                self.clean(&link.text)
            )?;
        }
        Ok(count)
    }

    /// Streams the requested sections of `document` straight from the
    /// parser, without collecting them first.
    pub fn write_document<W: Write>(
        &self,
        out: &mut W,
        document: &Document,
        sections: Sections,
        base: Option<&Url>,
    ) -> io::Result<()> {
        if sections.tables() {
            let count = self.write_tables(out, document.tables())?;
            log::info!("Printed {} table(s)", count);
        }
        if sections.links() {
            let links = document
                .links()
                .map(|link| match base {
                    Some(base) => link.resolve(base),
                    None => link,
                });
            let count = self.write_links(out, links)?;
            log::info!("Printed {} link(s)", count);
        }
        out.flush()
    }

    fn clean(&self, value: &str) -> String {
        let value = value.replace(['\n', '\r'], " ");
        if self.delimiter.is_empty() {
            value
        } else {
            value.replace(self.delimiter, " ")
        }
    }
}

/// Collects the requested sections into a serializable [`Extraction`].
pub fn extraction(
    url: &str,
    document: &Document,
    sections: Sections,
    base: Option<&Url>,
) -> Extraction {
    let tables = sections.tables().then(|| document.tables().collect());
    let links = sections.links().then(|| {
        document
            .links()
            .map(|link| match base {
                Some(base) => link.resolve(base),
                None => link,
            })
            .collect()
    });

    Extraction {
        url: url.to_string(),
        tables,
        links,
    }
}

pub fn write_json<W: Write>(out: &mut W, extraction: &Extraction) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, extraction)?;
    writeln!(out)?;
    out.flush()
}
