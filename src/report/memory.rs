//! In-memory sink collecting every row and distribution of a run.

use crate::aggregate::RankedCount;
use crate::error::Result;
use crate::lexicon::{Keyword, Lexicon};

use super::{ChartSink, ContextRecord, OverviewRow, ReportSink};

/// A ranked distribution handed over for one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentDistribution {
    pub document: String,
    pub page_count: usize,
    pub ranked: Vec<RankedCount>,
}

/// Collects report rows and distributions. Implements both sink traits.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub keywords: Vec<Keyword>,
    pub contexts: Vec<(Keyword, ContextRecord)>,
    pub overview: Vec<OverviewRow>,
    pub document_distributions: Vec<DocumentDistribution>,
    pub corpus_distribution: Option<Vec<RankedCount>>,
    pub finished: bool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Context rows written for `keyword`, in emission order.
    pub fn contexts_for(&self, keyword: &str) -> Vec<&ContextRecord> {
        self.contexts
            .iter()
            .filter(|(k, _)| k.as_str() == keyword)
            .map(|(_, record)| record)
            .collect()
    }
}

impl ReportSink for MemorySink {
    fn begin(&mut self, lexicon: &Lexicon) -> Result<()> {
        self.keywords = lexicon.iter().cloned().collect();
        Ok(())
    }

    fn write_context(&mut self, keyword: &Keyword, record: &ContextRecord) -> Result<()> {
        self.contexts.push((keyword.clone(), record.clone()));
        Ok(())
    }

    fn write_overview(&mut self, row: &OverviewRow) -> Result<()> {
        self.overview.push(row.clone());
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.finished = true;
        Ok(())
    }
}

impl ChartSink for MemorySink {
    fn document_distribution(
        &mut self,
        document: &str,
        page_count: usize,
        ranked: &[RankedCount],
    ) -> Result<()> {
        self.document_distributions.push(DocumentDistribution {
            document: document.to_string(),
            page_count,
            ranked: ranked.to_vec(),
        });
        Ok(())
    }

    fn corpus_distribution(&mut self, ranked: &[RankedCount]) -> Result<()> {
        self.corpus_distribution = Some(ranked.to_vec());
        Ok(())
    }
}
