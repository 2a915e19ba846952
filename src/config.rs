//! Scan configuration.
//!
//! Loaded from a JSON file (by default `<config dir>/lexiscan/config.json`)
//! and overridden by command-line flags. Missing fields take their defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScanError};
use crate::lexicon::KeywordSource;
use crate::matcher::PhraseMatching;
use crate::text::FilterSource;

/// Default context window, in words.
pub const DEFAULT_CONTEXT_LENGTH: usize = 30;

/// Output format of the report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// One CSV table per keyword plus an overview table.
    #[default]
    Csv,
    /// Tagged JSON objects, one per line.
    Jsonl,
}

/// Configuration of a scan run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Context window size in words.
    pub context_length: usize,
    /// Strip everything but ASCII letters, digits and spaces. Takes
    /// precedence over `filter_file` and `manual_filters`.
    pub basic_filter: bool,
    /// File listing characters to delete.
    pub filter_file: Option<PathBuf>,
    /// Characters to delete when no filter file is given.
    pub manual_filters: String,
    /// File with one keyword per line.
    pub keyword_file: Option<PathBuf>,
    /// Newline-delimited keywords used when no keyword file is given.
    pub manual_keywords: String,
    /// Directory of extracted `.txt` documents.
    pub input_directory: Option<PathBuf>,
    /// Directory the host writes report tables into.
    pub output_directory: Option<PathBuf>,
    /// Phrase collapsing mode.
    pub phrase_matching: PhraseMatching,
    /// Report output format.
    pub report_format: ReportFormat,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            context_length: DEFAULT_CONTEXT_LENGTH,
            basic_filter: true,
            filter_file: None,
            manual_filters: String::new(),
            keyword_file: None,
            manual_keywords: String::new(),
            input_directory: None,
            output_directory: None,
            phrase_matching: PhraseMatching::default(),
            report_format: ReportFormat::default(),
        }
    }
}

impl ScanConfig {
    /// Directory holding lexiscan configuration.
    pub fn dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("lexiscan")
    }

    /// Default configuration file path.
    pub fn path() -> PathBuf {
        Self::dir().join("config.json")
    }

    /// Read a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ScanError::Config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        serde_json::from_str(&content).map_err(|e| {
            ScanError::Config(format!("Invalid config file {}: {}", path.display(), e))
        })
    }

    /// Read the default configuration file, falling back to defaults when it
    /// does not exist.
    pub fn load_or_default() -> Result<Self> {
        let path = Self::path();
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.context_length == 0 {
            return Err(ScanError::Config(
                "context_length must be a positive number of words".to_string(),
            ));
        }
        if self.keyword_file.is_none() && self.manual_keywords.trim().is_empty() {
            return Err(ScanError::Config(
                "Either keyword_file or manual_keywords must be set".to_string(),
            ));
        }
        Ok(())
    }

    /// The keyword file when set, otherwise the manual list.
    pub fn keyword_source(&self) -> KeywordSource {
        match &self.keyword_file {
            Some(path) => KeywordSource::File(path.clone()),
            None => KeywordSource::Manual(self.manual_keywords.clone()),
        }
    }

    /// Basic filtering, then the filter file, then the manual characters.
    pub fn filter_source(&self) -> FilterSource {
        if self.basic_filter {
            FilterSource::Basic
        } else if let Some(path) = &self.filter_file {
            FilterSource::File(path.clone())
        } else {
            FilterSource::Manual(self.manual_filters.clone())
        }
    }
}
