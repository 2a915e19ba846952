//! `scan` and `config` command handlers.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use tracing::{info, warn};

use lexiscan::report::Table;
use lexiscan::{
    load_directory, CsvTableSink, Document, JsonlSink, PhraseMatching, ReportFormat, ScanConfig,
    ScanEngine, ScanError, ScanSummary, TracingChartSink,
};

/// Command-line overrides for a scan run.
#[derive(Args, Debug, Default)]
pub(crate) struct ScanArgs {
    /// Configuration file to read instead of the default
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory of extracted `.txt` documents
    #[arg(short, long)]
    pub input_dir: Option<PathBuf>,

    /// Directory for CSV report tables
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// File with one keyword per line
    #[arg(short = 'k', long)]
    pub keywords_file: Option<PathBuf>,

    /// Keyword to scan for (repeatable)
    #[arg(long = "keyword")]
    pub keywords: Vec<String>,

    /// Keep punctuation and non-ASCII characters
    #[arg(long, conflicts_with = "basic_filter")]
    pub no_basic_filter: bool,

    /// Strip everything but ASCII letters, digits and spaces
    #[arg(long)]
    pub basic_filter: bool,

    /// File listing characters to delete (disables the basic filter)
    #[arg(long)]
    pub filter_file: Option<PathBuf>,

    /// Characters to delete (disables the basic filter)
    #[arg(long)]
    pub filters: Option<String>,

    /// Context window size in words
    #[arg(short = 'n', long)]
    pub context_length: Option<usize>,

    /// Report format: csv or jsonl
    #[arg(long, value_parser = parse_format)]
    pub format: Option<ReportFormat>,

    /// Phrase matching: strict or last-token
    #[arg(long, value_parser = parse_phrase_matching)]
    pub phrase_matching: Option<PhraseMatching>,
}

impl ScanArgs {
    /// Override `config` with every flag that was given.
    fn apply(&self, config: &mut ScanConfig) {
        if let Some(dir) = &self.input_dir {
            config.input_directory = Some(dir.clone());
        }
        if let Some(dir) = &self.output_dir {
            config.output_directory = Some(dir.clone());
        }
        if let Some(path) = &self.keywords_file {
            config.keyword_file = Some(path.clone());
        }
        if !self.keywords.is_empty() {
            config.keyword_file = None;
            config.manual_keywords = self.keywords.join("\n");
        }
        if let Some(path) = &self.filter_file {
            config.basic_filter = false;
            config.filter_file = Some(path.clone());
        }
        if let Some(chars) = &self.filters {
            config.basic_filter = false;
            config.filter_file = None;
            config.manual_filters = chars.clone();
        }
        if self.no_basic_filter {
            config.basic_filter = false;
        }
        if self.basic_filter {
            config.basic_filter = true;
        }
        if let Some(n) = self.context_length {
            config.context_length = n;
        }
        if let Some(format) = self.format {
            config.report_format = format;
        }
        if let Some(matching) = self.phrase_matching {
            config.phrase_matching = matching;
        }
    }
}

fn parse_format(value: &str) -> std::result::Result<ReportFormat, String> {
    match value.to_ascii_lowercase().as_str() {
        "csv" => Ok(ReportFormat::Csv),
        "jsonl" | "json" => Ok(ReportFormat::Jsonl),
        other => Err(format!("unknown format '{}', expected csv or jsonl", other)),
    }
}

fn parse_phrase_matching(value: &str) -> std::result::Result<PhraseMatching, String> {
    match value.to_ascii_lowercase().replace('_', "-").as_str() {
        "strict" => Ok(PhraseMatching::Strict),
        "last-token" => Ok(PhraseMatching::LastToken),
        other => Err(format!(
            "unknown phrase matching '{}', expected strict or last-token",
            other
        )),
    }
}

fn load_config(path: Option<&Path>) -> Result<ScanConfig> {
    let config = match path {
        Some(path) => ScanConfig::load(path),
        None => ScanConfig::load_or_default(),
    };
    config.map_err(scan_failure)
}

/// Wrap a library error with the operation that failed.
fn scan_failure(err: ScanError) -> anyhow::Error {
    let operation = err.operation();
    anyhow::Error::new(err).context(format!("Failed while {}", operation))
}

/// Scan the configured input directory and write the report.
pub(crate) async fn cmd_scan(args: ScanArgs) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    args.apply(&mut config);

    let summary = run_scan(config, io::stdout).await?;

    eprintln!(
        "Scanned {} document(s), {} page(s): {} keyword hit(s), {} context row(s)",
        summary.documents,
        summary.pages,
        summary.corpus.total(),
        summary.context_rows
    );
    Ok(())
}

/// Load the documents and run the scan on a blocking worker. JSONL output
/// goes to writers produced by `stdout`.
async fn run_scan<W, F>(config: ScanConfig, stdout: F) -> Result<ScanSummary>
where
    W: Write,
    F: FnMut() -> W + Send + 'static,
{
    let input_dir = config
        .input_directory
        .clone()
        .with_context(|| "No input directory; pass --input-dir or set input_directory")?;

    let engine = ScanEngine::from_config(&config).map_err(scan_failure)?;
    let documents = load_directory(&input_dir).map_err(scan_failure)?;
    if documents.is_empty() {
        warn!(dir = %input_dir.display(), "No .txt documents found");
    }

    // Ctrl-C stops the run at the next page boundary
    let cancel = engine.cancel_flag();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, cancelling scan");
            cancel.cancel();
        }
    });

    let result = tokio::task::spawn_blocking(move || {
        write_report(&engine, &documents, &config, stdout)
    })
    .await;
    interrupt.abort();
    result.with_context(|| "Scan worker terminated unexpectedly")?
}

fn write_report<W, F>(
    engine: &ScanEngine,
    documents: &[Document],
    config: &ScanConfig,
    mut stdout: F,
) -> Result<ScanSummary>
where
    W: Write,
    F: FnMut() -> W,
{
    match config.report_format {
        ReportFormat::Csv => {
            let dir = config
                .output_directory
                .clone()
                .with_context(|| "No output directory; pass --output-dir or set output_directory")?;
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
            info!(dir = %dir.display(), "Writing CSV tables");

            let mut next_table = 0usize;
            let mut report = CsvTableSink::new(|table: Table<'_>| {
                let name = match table {
                    Table::Overview => "overview.csv".to_string(),
                    Table::Keyword(keyword) => {
                        next_table += 1;
                        keyword_table_name(next_table, keyword.as_str())
                    }
                };
                File::create(dir.join(name)).map(BufWriter::new)
            });
            engine
                .run(documents, &mut report, &mut TracingChartSink)
                .map_err(scan_failure)
        }
        ReportFormat::Jsonl => {
            let mut report = JsonlSink::new(stdout());
            let mut charts = JsonlSink::new(stdout());
            engine
                .run(documents, &mut report, &mut charts)
                .map_err(scan_failure)
        }
    }
}

/// File name of a keyword's context table. The position prefix keeps names
/// unique when two keywords sanitize to the same text.
fn keyword_table_name(position: usize, keyword: &str) -> String {
    let stem: String = keyword
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect();
    format!("{:02}_{}.csv", position, stem)
}

/// Print the configuration file location and the effective configuration.
pub(crate) fn cmd_config(path: Option<PathBuf>) -> Result<()> {
    let config = load_config(path.as_deref())?;
    let shown = path.unwrap_or_else(ScanConfig::path);
    println!("Config file: {}", shown.display());
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_keyword_table_name() {
        assert_eq!(keyword_table_name(1, "cat"), "01_cat.csv");
        assert_eq!(keyword_table_name(2, "climate change"), "02_climate_change.csv");
        assert_eq!(keyword_table_name(12, "co-2"), "12_co_2.csv");
    }

    #[test]
    fn test_apply_overrides() {
        let mut config = ScanConfig {
            keyword_file: Some(PathBuf::from("k.txt")),
            ..Default::default()
        };
        let args = ScanArgs {
            keywords: vec!["virus".to_string(), "climate change".to_string()],
            filters: Some(".,".to_string()),
            context_length: Some(8),
            format: Some(ReportFormat::Jsonl),
            ..Default::default()
        };
        args.apply(&mut config);

        assert!(config.keyword_file.is_none());
        assert_eq!(config.manual_keywords, "virus\nclimate change");
        assert!(!config.basic_filter);
        assert_eq!(config.manual_filters, ".,");
        assert_eq!(config.context_length, 8);
        assert_eq!(config.report_format, ReportFormat::Jsonl);
    }

    #[test]
    fn test_no_flags_keeps_config() {
        let mut config = ScanConfig::default();
        ScanArgs::default().apply(&mut config);
        assert_eq!(config, ScanConfig::default());
    }

    #[test]
    fn test_value_parsers() {
        assert_eq!(parse_format("JSONL"), Ok(ReportFormat::Jsonl));
        assert!(parse_format("xml").is_err());
        assert_eq!(
            parse_phrase_matching("last_token"),
            Ok(PhraseMatching::LastToken)
        );
        assert_eq!(parse_phrase_matching("strict"), Ok(PhraseMatching::Strict));
    }

    #[test]
    fn test_write_report_csv() {
        let dir = tempfile::tempdir().unwrap();
        let config = ScanConfig {
            manual_keywords: "cat\nclimate change".to_string(),
            output_directory: Some(dir.path().join("out")),
            ..Default::default()
        };
        let engine = ScanEngine::from_config(&config).unwrap();
        let documents = vec![Document::new(
            "d1",
            vec!["The cat sat. Climate change is real. A cat ran.".to_string()],
        )];

        let summary = write_report(&engine, &documents, &config, io::sink).unwrap();
        assert_eq!(summary.corpus.as_slice(), &[2, 1]);

        let out = dir.path().join("out");
        let overview = std::fs::read_to_string(out.join("overview.csv")).unwrap();
        assert_eq!(overview, "Document,cat,climate change\nd1,2,1\n");
        let phrase = std::fs::read_to_string(out.join("02_climate_change.csv")).unwrap();
        assert!(phrase.starts_with("Document,Page,Context: climate change\nd1,1,"));
    }

    /// Writer appending into a buffer shared by every clone.
    #[derive(Clone, Default)]
    struct SharedOutput(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedOutput {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl SharedOutput {
        fn lines(&self) -> Vec<serde_json::Value> {
            let bytes = self.0.lock().unwrap().clone();
            String::from_utf8(bytes)
                .unwrap()
                .lines()
                .map(|l| serde_json::from_str(l).unwrap())
                .collect()
        }
    }

    #[test]
    fn test_write_report_jsonl() {
        let config = ScanConfig {
            manual_keywords: "virus".to_string(),
            report_format: ReportFormat::Jsonl,
            ..Default::default()
        };
        let engine = ScanEngine::from_config(&config).unwrap();
        let documents = vec![
            Document::new("a", vec!["a virus spreads".to_string()]),
            Document::new("b", vec!["the virus mutates".to_string()]),
        ];
        let out = SharedOutput::default();
        let opener = out.clone();

        let summary = write_report(&engine, &documents, &config, move || opener.clone()).unwrap();
        assert_eq!(summary.corpus.get(0), 2);

        let lines = out.lines();
        let types: Vec<&str> = lines.iter().map(|l| l["type"].as_str().unwrap()).collect();
        assert_eq!(
            types,
            vec![
                "lexicon",
                "context",
                "overview",
                "document_distribution",
                "context",
                "overview",
                "document_distribution",
                "corpus_distribution",
            ]
        );
        assert_eq!(lines[1]["context"], "a virus spreads");
        assert_eq!(lines[7]["ranked"][0]["count"], 2);
    }

    #[tokio::test]
    async fn test_run_scan_reads_directory_on_worker() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in");
        std::fs::create_dir_all(&input).unwrap();
        std::fs::write(input.join("d1.txt"), "a cat here\x0cno match\x0c").unwrap();
        std::fs::write(input.join("notes.md"), "a cat here").unwrap();

        let config = ScanConfig {
            manual_keywords: "cat".to_string(),
            input_directory: Some(input),
            report_format: ReportFormat::Jsonl,
            ..Default::default()
        };
        let out = SharedOutput::default();
        let opener = out.clone();

        let summary = run_scan(config, move || opener.clone()).await.unwrap();
        assert_eq!(summary.documents, 1);
        assert_eq!(summary.pages, 2);
        assert_eq!(summary.context_rows, 1);

        let lines = out.lines();
        assert_eq!(lines[2]["type"], "overview");
        assert_eq!(lines[2]["document"], "d1.txt");
        assert_eq!(lines[2]["pages"], 2);
    }

    #[tokio::test]
    async fn test_run_scan_requires_input_directory() {
        let config = ScanConfig {
            manual_keywords: "cat".to_string(),
            ..Default::default()
        };
        let err = run_scan(config, io::sink).await.unwrap_err();
        assert!(err.to_string().contains("input directory"));
    }
}
