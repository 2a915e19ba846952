//! CSV tables: one context table per keyword plus a document overview.
//!
//! Tables are opened through a caller-supplied opener, so the sink itself
//! decides nothing about files or paths.

use std::borrow::Cow;
use std::io::{self, Write};

use crate::error::{Result, ScanError};
use crate::lexicon::{Keyword, Lexicon};

use super::{ContextRecord, OverviewRow, ReportSink};

/// Identifies the table a writer is opened for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table<'a> {
    /// The `(Document, keyword1, keyword2, ...)` overview table.
    Overview,
    /// The `(Document, Page, Context)` table of one keyword.
    Keyword(&'a Keyword),
}

/// Writes report rows as CSV tables.
pub struct CsvTableSink<W, F>
where
    W: Write,
    F: FnMut(Table<'_>) -> io::Result<W>,
{
    open: F,
    overview: Option<W>,
    keywords: Vec<(Keyword, W)>,
}

impl<W, F> CsvTableSink<W, F>
where
    W: Write,
    F: FnMut(Table<'_>) -> io::Result<W>,
{
    pub fn new(open: F) -> Self {
        Self {
            open,
            overview: None,
            keywords: Vec::new(),
        }
    }

    /// Consume the sink, returning the overview writer and the keyword writers
    /// in lexicon order.
    pub fn into_writers(self) -> (Option<W>, Vec<(Keyword, W)>) {
        (self.overview, self.keywords)
    }

    fn keyword_writer(&mut self, keyword: &Keyword) -> Result<&mut W> {
        self.keywords
            .iter_mut()
            .find(|(k, _)| k == keyword)
            .map(|(_, writer)| writer)
            .ok_or_else(|| {
                ScanError::OutputWrite(format!("No context table open for keyword '{}'", keyword))
            })
    }
}

impl<W, F> ReportSink for CsvTableSink<W, F>
where
    W: Write,
    F: FnMut(Table<'_>) -> io::Result<W>,
{
    fn begin(&mut self, lexicon: &Lexicon) -> Result<()> {
        let mut overview = (self.open)(Table::Overview)
            .map_err(|e| ScanError::OutputWrite(format!("Failed to open overview table: {}", e)))?;
        let mut header = vec![Cow::Borrowed("Document")];
        header.extend(lexicon.iter().map(|k| Cow::Borrowed(k.as_str())));
        write_row(&mut overview, &header)?;
        self.overview = Some(overview);

        for keyword in lexicon {
            let mut writer = (self.open)(Table::Keyword(keyword)).map_err(|e| {
                ScanError::OutputWrite(format!(
                    "Failed to open context table for '{}': {}",
                    keyword, e
                ))
            })?;
            let context_header = format!("Context: {}", keyword);
            write_row(
                &mut writer,
                &[
                    Cow::Borrowed("Document"),
                    Cow::Borrowed("Page"),
                    Cow::Owned(context_header),
                ],
            )?;
            self.keywords.push((keyword.clone(), writer));
        }
        Ok(())
    }

    fn write_context(&mut self, keyword: &Keyword, record: &ContextRecord) -> Result<()> {
        let writer = self.keyword_writer(keyword)?;
        write_row(
            writer,
            &[
                Cow::Borrowed(record.document.as_str()),
                Cow::Owned(record.page.to_string()),
                Cow::Borrowed(record.snippet.as_str()),
            ],
        )
    }

    fn write_overview(&mut self, row: &OverviewRow) -> Result<()> {
        let writer = self
            .overview
            .as_mut()
            .ok_or_else(|| ScanError::OutputWrite("Overview table is not open".to_string()))?;
        let mut fields = vec![Cow::Borrowed(row.document.as_str())];
        fields.extend(row.counts.iter().map(|c| Cow::Owned(c.to_string())));
        write_row(writer, &fields)
    }

    fn finish(&mut self) -> Result<()> {
        let overview = self.overview.iter_mut();
        let tables = self.keywords.iter_mut().map(|(_, w)| w);
        for writer in overview.chain(tables) {
            writer
                .flush()
                .map_err(|e| ScanError::OutputWrite(format!("Failed to flush CSV table: {}", e)))?;
        }
        Ok(())
    }
}

fn write_row<W: Write>(writer: &mut W, fields: &[Cow<'_, str>]) -> Result<()> {
    let line = fields
        .iter()
        .map(|f| escape_field(f))
        .collect::<Vec<_>>()
        .join(",");
    writeln!(writer, "{}", line)
        .map_err(|e| ScanError::OutputWrite(format!("Failed to write CSV row: {}", e)))
}

/// Quote a field when it holds a comma, quote or line break.
fn escape_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}
