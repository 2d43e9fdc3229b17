use std::sync::LazyLock;

use scraper::html::Select;
use scraper::{ElementRef, Html, Node, Selector};

use crate::types::{LinkRecord, Page, TableRecord};

/// How many leading bytes are inspected when deciding whether a body is text.
pub const BINARY_SNIFF_LEN: usize = 8 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Content is not text (NUL byte at offset {0})")]
    Binary(usize),
}

static TABLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table").expect("invalid selector: table"));

static LINK_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("invalid selector: link"));

/// Subtrees whose text never counts as visible cell or link text.
const SKIPPED_TEXT: &[&str] = &["table", "script", "style", "template"];

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Turns a response body into HTML text.
///
/// Anything with a NUL byte near the start is rejected as binary. Bodies
/// announced as UTF-16 by a byte order mark are decoded as such, and get
/// the same check on their code units. Invalid UTF-8 is decoded lossily
/// rather than rejected.
pub fn decode_html(bytes: &[u8]) -> Result<String, ParseError> {
    if let Some(decoded) = decode_utf16_with_bom(bytes) {
        return decoded;
    }

    let head = &bytes[..bytes.len().min(BINARY_SNIFF_LEN)];
    if let Some(offset) = head.iter().position(|&b| b == 0) {
        return Err(ParseError::Binary(offset));
    }

    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(text) => Ok(text.to_string()),
        Err(e) => {
            log::warn!("Body is not valid UTF-8 ({e}), decoding lossily");
            Ok(String::from_utf8_lossy(bytes).into_owned())
        }
    }
}

const UTF16_BOM_LEN: usize = 2;

fn decode_utf16_with_bom(bytes: &[u8]) -> Option<Result<String, ParseError>> {
    let (body, from_pair): (&[u8], fn([u8; 2]) -> u16) = match bytes {
        [0xFF, 0xFE, rest @ ..] => (rest, u16::from_le_bytes),
        [0xFE, 0xFF, rest @ ..] => (rest, u16::from_be_bytes),
        _ => return None,
    };

    let pairs = body.chunks_exact(2);
    if !pairs.remainder().is_empty() {
        return Some(Err(ParseError::Binary(bytes.len() - 1)));
    }

    let units: Vec<u16> = pairs.map(|pair| from_pair([pair[0], pair[1]])).collect();

    let head = &units[..units.len().min(BINARY_SNIFF_LEN / 2)];
    if let Some(index) = head.iter().position(|&unit| unit == 0) {
        return Some(Err(ParseError::Binary(UTF16_BOM_LEN + index * 2)));
    }

    Some(Ok(char::decode_utf16(units)
        .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()))
}

/// A parsed HTML document. Parsing never fails: the HTML5 tree builder
/// repairs what it can and drops what it cannot.
pub struct Document {
    html: Html,
}

impl Document {
    pub fn parse(html: &str) -> Self {
        Self {
            html: Html::parse_document(html),
        }
    }

    pub fn from_page(page: &Page) -> Self {
        Self::parse(page.html())
    }

    /// Tables in document order. Each call starts a fresh traversal.
    pub fn tables(&self) -> Tables<'_> {
        Tables {
            inner: self.html.select(&TABLE_SELECTOR),
        }
    }

    /// Anchors with an `href`, in document order.
    pub fn links(&self) -> Links<'_> {
        Links {
            inner: self.html.select(&LINK_SELECTOR),
        }
    }

    pub fn errors(&self) -> usize {
        self.html.errors.len()
    }
}

pub struct Tables<'a> {
    inner: Select<'a, 'static>,
}

impl Iterator for Tables<'_> {
    type Item = TableRecord;

    fn next(&mut self) -> Option<TableRecord> {
        self.inner.next().map(read_table)
    }
}

pub struct Links<'a> {
    inner: Select<'a, 'static>,
}

impl Iterator for Links<'_> {
    type Item = LinkRecord;

    fn next(&mut self) -> Option<LinkRecord> {
        let anchor = self.inner.next()?;
        let href = anchor.value().attr("href").unwrap_or_default();
        let link = LinkRecord::new(href, visible_text(anchor));
        log::trace!("Parsed link {}", link);
        Some(link)
    }
}

pub fn parse_tables(html: &str) -> Vec<TableRecord> {
    Document::parse(html).tables().collect()
}

pub fn parse_links(html: &str) -> Vec<LinkRecord> {
    Document::parse(html).links().collect()
}

fn read_table(table: ElementRef<'_>) -> TableRecord {
    let mut visitor = RowVisitor::default();
    visitor.visit_children(table);
    let record = TableRecord::new(visitor.rows);
    log::debug!("Parsed {}", record);
    record
}

/// Walks a table's subtree collecting `<tr>` rows. Wrapper elements
/// (`thead`, `tbody`, `tfoot`, or anything a sloppy page put there) are
/// descended into; nested tables are not, their rows belong to them.
#[derive(Default)]
struct RowVisitor {
    rows: Vec<Vec<String>>,
}

impl RowVisitor {
    fn visit_children(&mut self, parent: ElementRef<'_>) {
        for child in parent.children().filter_map(ElementRef::wrap) {
            self.visit(child);
        }
    }

    fn visit(&mut self, element: ElementRef<'_>) {
        match element.value().name() {
            "tr" => self.rows.push(read_row(element)),
            "table" => {}
            _ => self.visit_children(element),
        }
    }
}

fn read_row(row: ElementRef<'_>) -> Vec<String> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|cell| matches!(cell.value().name(), "td" | "th"))
        .map(visible_text)
        .collect()
}

fn visible_text(element: ElementRef<'_>) -> String {
    let mut raw = String::new();
    push_text(element, &mut raw);
    normalize_whitespace(&raw)
}

fn push_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) if el.name() == "br" => out.push(' '),
            Node::Element(el) if SKIPPED_TEXT.contains(&el.name()) => {}
            Node::Element(_) => {
                if let Some(child) = ElementRef::wrap(child) {
                    push_text(child, out);
                }
            }
            _ => {}
        }
    }
}
