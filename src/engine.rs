//! Scan orchestration.
//!
//! A run walks documents in order, pages in order, and keywords in lexicon
//! order:
//!
//! ```text
//! Init -> ScanningDocument -> ScanningPage* -> EmittingDocumentSummary
//!      -> ScanningDocument ... -> Finalizing -> Done
//! ```
//!
//! Each page is scanned completely before its counts touch the document and
//! corpus tallies, so a cancelled or failed run never holds half a page.
//! The first error aborts the run; rows already handed to the sinks stay
//! where they are.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::aggregate::{accumulate, KeywordTally};
use crate::config::{ScanConfig, DEFAULT_CONTEXT_LENGTH};
use crate::corpus::Document;
use crate::error::{Result, ScanError};
use crate::lexicon::{Keyword, Lexicon};
use crate::matcher::{count_occurrences, first_snippet, PhraseMatching};
use crate::report::{ChartSink, ContextRecord, OverviewRow, ReportSink};
use crate::text::{normalize, FilterPolicy};

/// Tunables of the per-page scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOptions {
    /// Context window size in words.
    pub context_length: usize,
    pub phrase_matching: PhraseMatching,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            context_length: DEFAULT_CONTEXT_LENGTH,
            phrase_matching: PhraseMatching::default(),
        }
    }
}

/// Shared flag used to stop a run between documents or pages.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Where a run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanPhase {
    Init,
    ScanningDocument,
    ScanningPage,
    EmittingDocumentSummary,
    Finalizing,
    Done,
}

/// A keyword found on a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordHit {
    pub keyword: Keyword,
    pub count: u64,
    /// Snippet around the first aligned token, `None` when no token aligned.
    pub snippet: Option<String>,
}

/// Result of scanning one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageScan {
    pub page: usize,
    pub counts: KeywordTally,
    /// Keywords with at least one hit, in lexicon order.
    pub hits: Vec<KeywordHit>,
}

/// Totals of a finished run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanSummary {
    pub documents: usize,
    pub pages: usize,
    pub context_rows: usize,
    pub corpus: KeywordTally,
}

/// Mutable state of one run.
struct RunState {
    phase: ScanPhase,
    document: KeywordTally,
    corpus: KeywordTally,
    documents: usize,
    pages: usize,
    context_rows: usize,
}

impl RunState {
    fn new(lexicon: &Lexicon) -> Self {
        Self {
            phase: ScanPhase::Init,
            document: KeywordTally::zeroed(lexicon),
            corpus: KeywordTally::zeroed(lexicon),
            documents: 0,
            pages: 0,
            context_rows: 0,
        }
    }

    fn enter(&mut self, phase: ScanPhase) {
        debug!(from = ?self.phase, to = ?phase, "Scan phase");
        self.phase = phase;
    }
}

/// Drives a scan run over a corpus.
#[derive(Debug, Clone)]
pub struct ScanEngine {
    lexicon: Lexicon,
    policy: FilterPolicy,
    options: ScanOptions,
    cancel: CancelFlag,
}

impl ScanEngine {
    pub fn new(lexicon: Lexicon, policy: FilterPolicy, options: ScanOptions) -> Result<Self> {
        if options.context_length == 0 {
            return Err(ScanError::Config(
                "context_length must be a positive number of words".to_string(),
            ));
        }
        if lexicon.is_empty() {
            return Err(ScanError::Lexicon("Lexicon contains no keywords".to_string()));
        }
        Ok(Self {
            lexicon,
            policy,
            options,
            cancel: CancelFlag::new(),
        })
    }

    /// Build the lexicon and filter policy described by `config`.
    pub fn from_config(config: &ScanConfig) -> Result<Self> {
        config.validate()?;
        let lexicon = Lexicon::load(&config.keyword_source())?;
        let policy = FilterPolicy::load(&config.filter_source())?;
        let options = ScanOptions {
            context_length: config.context_length,
            phrase_matching: config.phrase_matching,
        };
        Self::new(lexicon, policy, options)
    }

    pub fn with_cancel_flag(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    pub fn policy(&self) -> &FilterPolicy {
        &self.policy
    }

    pub fn options(&self) -> ScanOptions {
        self.options
    }

    /// Count every keyword on one page and build a snippet for each keyword
    /// with hits. Nothing is accumulated.
    pub fn scan_page(&self, document: &str, page: usize, raw: &str) -> Result<PageScan> {
        let text = normalize(raw, &self.policy);
        let mut counts = KeywordTally::zeroed(&self.lexicon);
        let mut hits = Vec::new();

        for (index, keyword) in self.lexicon.iter().enumerate() {
            let found = count_occurrences(&text, keyword.as_str())
                .map_err(|e| e.with_context(location(document, page, keyword)))?
                as u64;
            if found == 0 {
                continue;
            }
            counts.add(index, found);

            let snippet = first_snippet(
                &text,
                keyword,
                self.options.context_length,
                self.options.phrase_matching,
            );
            if snippet.is_none() {
                warn!(
                    document,
                    page,
                    keyword = %keyword,
                    "Keyword counted but no token aligned; context left empty"
                );
            }
            debug!(document, page, keyword = %keyword, count = found, "Keyword hit");
            hits.push(KeywordHit {
                keyword: keyword.clone(),
                count: found,
                snippet,
            });
        }

        Ok(PageScan { page, counts, hits })
    }

    /// Scan `documents` in order, emitting context and overview rows to
    /// `report` and ranked distributions to `charts`.
    pub fn run<'a, I>(
        &self,
        documents: I,
        report: &mut dyn ReportSink,
        charts: &mut dyn ChartSink,
    ) -> Result<ScanSummary>
    where
        I: IntoIterator<Item = &'a Document>,
    {
        let mut state = RunState::new(&self.lexicon);
        info!(
            keywords = self.lexicon.len(),
            context_length = self.options.context_length,
            "Starting scan"
        );
        report.begin(&self.lexicon)?;

        for document in documents {
            self.check_cancelled(|| format!("document {}", document.name()))?;
            state.enter(ScanPhase::ScanningDocument);
            state.document.reset();

            for (page_number, text) in document.pages() {
                self.check_cancelled(|| {
                    format!("page {} of document {}", page_number, document.name())
                })?;
                state.enter(ScanPhase::ScanningPage);

                let page = self.scan_page(document.name(), page_number, text)?;
                accumulate(&page.counts, &mut state.document, &mut state.corpus);
                state.pages += 1;

                for hit in &page.hits {
                    let record = ContextRecord {
                        document: document.name().to_string(),
                        page: page_number,
                        snippet: hit.snippet.clone().unwrap_or_default(),
                    };
                    report
                        .write_context(&hit.keyword, &record)
                        .map_err(|e| {
                            e.with_context(location(document.name(), page_number, &hit.keyword))
                        })?;
                    state.context_rows += 1;
                }
            }

            state.enter(ScanPhase::EmittingDocumentSummary);
            self.emit_document_summary(document, &state.document, report, charts)?;
            state.documents += 1;
            info!(
                document = document.name(),
                pages = document.page_count(),
                hits = state.document.total(),
                "Document scanned"
            );
        }

        state.enter(ScanPhase::Finalizing);
        charts
            .corpus_distribution(&state.corpus.ranked(&self.lexicon))
            .map_err(|e| chart_error(e, "corpus totals"))?;
        report.finish()?;
        state.enter(ScanPhase::Done);

        info!(
            documents = state.documents,
            pages = state.pages,
            hits = state.corpus.total(),
            "Scan complete"
        );
        Ok(ScanSummary {
            documents: state.documents,
            pages: state.pages,
            context_rows: state.context_rows,
            corpus: state.corpus,
        })
    }

    fn emit_document_summary(
        &self,
        document: &Document,
        tally: &KeywordTally,
        report: &mut dyn ReportSink,
        charts: &mut dyn ChartSink,
    ) -> Result<()> {
        let context = format!("document: {}", document.name());
        let row = OverviewRow {
            document: document.name().to_string(),
            pages: document.page_count(),
            counts: tally.as_slice().to_vec(),
        };
        report
            .write_overview(&row)
            .map_err(|e| e.with_context(&context))?;
        charts
            .document_distribution(
                document.name(),
                document.page_count(),
                &tally.ranked(&self.lexicon),
            )
            .map_err(|e| chart_error(e, &context))
    }

    fn check_cancelled(&self, next: impl FnOnce() -> String) -> Result<()> {
        if self.cancel.is_cancelled() {
            let next = next();
            warn!(next = %next, "Scan cancelled");
            return Err(ScanError::Cancelled(next));
        }
        Ok(())
    }
}

fn location(document: &str, page: usize, keyword: &Keyword) -> String {
    format!("document: {}, page: {}, keyword: '{}'", document, page, keyword)
}

fn chart_error(err: ScanError, context: &str) -> ScanError {
    match err {
        ScanError::ChartRender(_) => err.with_context(context),
        other => ScanError::ChartRender(format!("{} ({})", other, context)),
    }
}
