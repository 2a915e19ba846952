//! lexiscan - keyword frequency and context scanning over extracted documents
//!
//! A run reads a lexicon of keywords, normalizes each page of each document,
//! counts whitespace-bounded keyword occurrences, builds one context snippet
//! per keyword and page with hits, and hands the resulting tables and
//! ranked distributions to report and chart sinks.
//!
//! ```no_run
//! use lexiscan::{load_directory, MemorySink, ScanConfig, ScanEngine};
//!
//! # fn main() -> lexiscan::Result<()> {
//! let config = ScanConfig {
//!     manual_keywords: "virus\nclimate change".to_string(),
//!     ..Default::default()
//! };
//! let engine = ScanEngine::from_config(&config)?;
//! let documents = load_directory(std::path::Path::new("extracted"))?;
//! let mut report = MemorySink::new();
//! let mut charts = MemorySink::new();
//! let summary = engine.run(&documents, &mut report, &mut charts)?;
//! println!("{} hits", summary.corpus.total());
//! # Ok(())
//! # }
//! ```

pub mod aggregate;
pub mod config;
pub mod corpus;
pub mod engine;
pub mod error;
pub mod lexicon;
pub mod matcher;
pub mod report;
pub mod text;

pub use aggregate::{KeywordTally, RankedCount};
pub use config::{ReportFormat, ScanConfig};
pub use corpus::{load_directory, Document};
pub use engine::{CancelFlag, PageScan, ScanEngine, ScanOptions, ScanSummary};
pub use error::{Result, ScanError};
pub use lexicon::{Keyword, KeywordSource, Lexicon};
pub use matcher::PhraseMatching;
pub use report::{
    ChartSink, ContextRecord, CsvTableSink, JsonlSink, MemorySink, OverviewRow, ReportSink,
    TracingChartSink,
};
pub use text::{FilterPolicy, FilterSource};
