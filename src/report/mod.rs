//! Report and distribution sinks.
//!
//! The scan engine never writes files or renders charts itself. It emits
//! rows through [`ReportSink`] and ranked count distributions through
//! [`ChartSink`]; callers decide where they end up.
//!
//! # Implementations
//!
//! - **memory**: `MemorySink`, collects everything in memory
//! - **jsonl**: `JsonlSink`, tagged JSON lines into any `io::Write`
//! - **csv**: `CsvTableSink`, one CSV table per keyword plus an overview
//!   table, each opened through a caller-supplied opener
//! - `TracingChartSink`: logs distributions through `tracing`

pub mod csv;
pub mod jsonl;
pub mod memory;

pub use self::csv::{CsvTableSink, Table};
pub use jsonl::JsonlSink;
pub use memory::MemorySink;

use serde::Serialize;
use tracing::info;

use crate::aggregate::RankedCount;
use crate::error::Result;
use crate::lexicon::{Keyword, Lexicon};

/// One context row: the first match of a keyword on a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContextRecord {
    /// Document name.
    pub document: String,
    /// 1-based page number.
    pub page: usize,
    /// Context snippet around the match. Empty when no token aligned.
    pub snippet: String,
}

/// Per-document counts in lexicon order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverviewRow {
    pub document: String,
    pub pages: usize,
    pub counts: Vec<u64>,
}

/// Receives the tabular output of a scan run.
pub trait ReportSink {
    /// Called once before any document, with the lexicon that fixes column order.
    fn begin(&mut self, lexicon: &Lexicon) -> Result<()>;

    /// Append a row to the context table of `keyword`.
    fn write_context(&mut self, keyword: &Keyword, record: &ContextRecord) -> Result<()>;

    /// Append a row to the overview table.
    fn write_overview(&mut self, row: &OverviewRow) -> Result<()>;

    /// Called once after the last document.
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Receives ranked, zero-filtered count distributions for visualization.
pub trait ChartSink {
    fn document_distribution(
        &mut self,
        document: &str,
        page_count: usize,
        ranked: &[RankedCount],
    ) -> Result<()>;

    fn corpus_distribution(&mut self, ranked: &[RankedCount]) -> Result<()>;
}

/// Chart sink that only logs the distributions.
#[derive(Debug, Default)]
pub struct TracingChartSink;

impl ChartSink for TracingChartSink {
    fn document_distribution(
        &mut self,
        document: &str,
        page_count: usize,
        ranked: &[RankedCount],
    ) -> Result<()> {
        info!(
            document,
            pages = page_count,
            distribution = %format_distribution(ranked),
            "Document keyword counts"
        );
        Ok(())
    }

    fn corpus_distribution(&mut self, ranked: &[RankedCount]) -> Result<()> {
        info!(distribution = %format_distribution(ranked), "Corpus keyword counts");
        Ok(())
    }
}

/// `keyword=count` pairs joined by commas, in ranked order.
pub fn format_distribution(ranked: &[RankedCount]) -> String {
    ranked
        .iter()
        .map(|r| format!("{}={}", r.keyword, r.count))
        .collect::<Vec<_>>()
        .join(", ")
}
