//! JSON-lines sink: one tagged JSON object per row or distribution.

use std::io::Write;

use serde::Serialize;

use crate::aggregate::RankedCount;
use crate::error::{Result, ScanError};
use crate::lexicon::{Keyword, Lexicon};

use super::{ChartSink, ContextRecord, OverviewRow, ReportSink};

#[derive(Serialize)]
struct KeywordCount<'a> {
    keyword: &'a str,
    count: u64,
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Entry<'a> {
    Lexicon {
        keywords: Vec<&'a str>,
    },
    Context {
        keyword: &'a str,
        document: &'a str,
        page: usize,
        context: &'a str,
    },
    Overview {
        document: &'a str,
        pages: usize,
        counts: Vec<KeywordCount<'a>>,
    },
    DocumentDistribution {
        document: &'a str,
        pages: usize,
        ranked: &'a [RankedCount],
    },
    CorpusDistribution {
        ranked: &'a [RankedCount],
    },
}

/// Writes every record as a JSON object on its own line.
pub struct JsonlSink<W: Write> {
    writer: W,
    keywords: Vec<Keyword>,
}

impl<W: Write> JsonlSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            keywords: Vec::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn emit(&mut self, entry: &Entry<'_>) -> Result<()> {
        write_entry(&mut self.writer, entry)
    }
}

fn write_entry<W: Write>(writer: &mut W, entry: &Entry<'_>) -> Result<()> {
    let line = serde_json::to_string(entry)?;
    writeln!(writer, "{}", line)
        .map_err(|e| ScanError::OutputWrite(format!("Failed to write JSONL record: {}", e)))
}

impl<W: Write> ReportSink for JsonlSink<W> {
    fn begin(&mut self, lexicon: &Lexicon) -> Result<()> {
        self.keywords = lexicon.iter().cloned().collect();
        let keywords = lexicon.iter().map(Keyword::as_str).collect();
        self.emit(&Entry::Lexicon { keywords })
    }

    fn write_context(&mut self, keyword: &Keyword, record: &ContextRecord) -> Result<()> {
        self.emit(&Entry::Context {
            keyword: keyword.as_str(),
            document: &record.document,
            page: record.page,
            context: &record.snippet,
        })
    }

    fn write_overview(&mut self, row: &OverviewRow) -> Result<()> {
        let counts = self
            .keywords
            .iter()
            .zip(&row.counts)
            .map(|(keyword, &count)| KeywordCount {
                keyword: keyword.as_str(),
                count,
            })
            .collect();
        write_entry(
            &mut self.writer,
            &Entry::Overview {
                document: &row.document,
                pages: row.pages,
                counts,
            },
        )
    }

    fn finish(&mut self) -> Result<()> {
        self.writer
            .flush()
            .map_err(|e| ScanError::OutputWrite(format!("Failed to flush JSONL output: {}", e)))
    }
}

impl<W: Write> ChartSink for JsonlSink<W> {
    fn document_distribution(
        &mut self,
        document: &str,
        page_count: usize,
        ranked: &[RankedCount],
    ) -> Result<()> {
        self.emit(&Entry::DocumentDistribution {
            document,
            pages: page_count,
            ranked,
        })
        .map_err(|e| ScanError::ChartRender(e.to_string()))
    }

    fn corpus_distribution(&mut self, ranked: &[RankedCount]) -> Result<()> {
        self.emit(&Entry::CorpusDistribution { ranked })
            .map_err(|e| ScanError::ChartRender(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(buf: &[u8]) -> Vec<serde_json::Value> {
        String::from_utf8(buf.to_vec())
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn test_writes_tagged_lines() {
        let lexicon = Lexicon::from_lines("cat\nclimate change").unwrap();
        let mut sink = JsonlSink::new(Vec::new());
        sink.begin(&lexicon).unwrap();
        sink.write_context(
            lexicon.get(0).unwrap(),
            &ContextRecord {
                document: "d1".to_string(),
                page: 1,
                snippet: "the cat sat".to_string(),
            },
        )
        .unwrap();
        sink.write_overview(&OverviewRow {
            document: "d1".to_string(),
            pages: 1,
            counts: vec![2, 1],
        })
        .unwrap();
        sink.finish().unwrap();

        let out = lines(&sink.into_inner());
        assert_eq!(out.len(), 3);
        assert_eq!(out[0]["type"], "lexicon");
        assert_eq!(out[0]["keywords"][1], "climate change");
        assert_eq!(out[1]["type"], "context");
        assert_eq!(out[1]["context"], "the cat sat");
        assert_eq!(out[2]["type"], "overview");
        assert_eq!(out[2]["counts"][0]["keyword"], "cat");
        assert_eq!(out[2]["counts"][0]["count"], 2);
        assert_eq!(out[2]["counts"][1]["count"], 1);
    }

    #[test]
    fn test_distributions() {
        let mut sink = JsonlSink::new(Vec::new());
        let ranked = vec![RankedCount {
            keyword: Keyword::new("virus").unwrap(),
            count: 2,
        }];
        sink.document_distribution("d1", 4, &ranked).unwrap();
        sink.corpus_distribution(&ranked).unwrap();

        let out = lines(&sink.into_inner());
        assert_eq!(out[0]["type"], "document_distribution");
        assert_eq!(out[0]["pages"], 4);
        assert_eq!(out[0]["ranked"][0]["keyword"], "virus");
        assert_eq!(out[1]["type"], "corpus_distribution");
        assert_eq!(out[1]["ranked"][0]["count"], 2);
    }

    struct BrokenWriter;

    impl Write for BrokenWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_failures_are_reported() {
        let lexicon = Lexicon::from_lines("cat").unwrap();
        let mut sink = JsonlSink::new(BrokenWriter);
        let err = sink.begin(&lexicon).unwrap_err();
        assert!(matches!(err, ScanError::OutputWrite(_)));
        assert!(err.to_string().contains("disk full"));

        let err = sink.corpus_distribution(&[]).unwrap_err();
        assert!(matches!(err, ScanError::ChartRender(_)));
    }
}
