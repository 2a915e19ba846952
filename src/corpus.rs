//! Documents handed to the scan engine.
//!
//! Text extraction happens upstream. The loader here reads plain text files
//! in which pages are separated by a form feed (`\x0c`), the layout written
//! by `pdftotext`.

use std::path::Path;

use tracing::debug;

use crate::error::{Result, ScanError};

/// Page separator used by text extractors.
pub const PAGE_SEPARATOR: char = '\x0c';

/// A named, ordered sequence of page texts. Page numbers start at 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    name: String,
    pages: Vec<String>,
}

impl Document {
    pub fn new(name: impl Into<String>, pages: Vec<String>) -> Self {
        Self {
            name: name.into(),
            pages,
        }
    }

    /// Split extracted text into pages on form feeds. A trailing form feed
    /// does not open an extra empty page.
    pub fn from_extracted_text(name: impl Into<String>, text: &str) -> Self {
        let body = text.strip_suffix(PAGE_SEPARATOR).unwrap_or(text);
        let pages = body.split(PAGE_SEPARATOR).map(str::to_string).collect();
        Self::new(name, pages)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Pages paired with their 1-based page number.
    pub fn pages(&self) -> impl Iterator<Item = (usize, &str)> {
        self.pages
            .iter()
            .enumerate()
            .map(|(i, page)| (i + 1, page.as_str()))
    }
}

/// Load every `.txt` file in `dir` as a document, sorted by file name.
pub fn load_directory(dir: &Path) -> Result<Vec<Document>> {
    let entries = std::fs::read_dir(dir).map_err(|e| {
        ScanError::InputAccess(format!(
            "Failed to read document directory {}: {}",
            dir.display(),
            e
        ))
    })?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| {
            ScanError::InputAccess(format!("Failed to list {}: {}", dir.display(), e))
        })?;
        let path = entry.path();
        let is_text = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("txt"))
            .unwrap_or(false);
        if path.is_file() && is_text {
            paths.push(path);
        }
    }
    paths.sort();

    let mut documents = Vec::with_capacity(paths.len());
    for path in paths {
        let text = std::fs::read_to_string(&path).map_err(|e| {
            ScanError::InputAccess(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let document = Document::from_extracted_text(name, &text);
        debug!(document = document.name(), pages = document.page_count(), "Loaded document");
        documents.push(document);
    }

    Ok(documents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_extracted_text_splits_pages() {
        let doc = Document::from_extracted_text("a.txt", "one\x0ctwo\x0cthree\x0c");
        let pages: Vec<(usize, &str)> = doc.pages().collect();
        assert_eq!(pages, vec![(1, "one"), (2, "two"), (3, "three")]);
        assert_eq!(doc.page_count(), 3);
    }

    #[test]
    fn test_text_without_separator_is_one_page() {
        let doc = Document::from_extracted_text("b.txt", "just one page");
        assert_eq!(doc.page_count(), 1);
        assert_eq!(doc.name(), "b.txt");
    }

    #[test]
    fn test_interior_empty_page_is_kept() {
        let doc = Document::from_extracted_text("c.txt", "one\x0c\x0cthree");
        assert_eq!(doc.page_count(), 3);
    }

    #[test]
    fn test_load_directory_reads_sorted_text_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.txt"), "beta\x0cpage two").unwrap();
        std::fs::write(dir.path().join("a.TXT"), "alpha").unwrap();
        std::fs::write(dir.path().join("notes.md"), "ignored").unwrap();
        std::fs::create_dir(dir.path().join("sub.txt")).unwrap();

        let docs = load_directory(dir.path()).unwrap();
        let names: Vec<&str> = docs.iter().map(Document::name).collect();
        assert_eq!(names, vec!["a.TXT", "b.txt"]);
        assert_eq!(docs[1].page_count(), 2);
    }

    #[test]
    fn test_load_missing_directory_is_input_error() {
        let err = load_directory(Path::new("/nonexistent/lexiscan_docs")).unwrap_err();
        assert!(matches!(err, ScanError::InputAccess(_)));
        assert!(err.to_string().contains("lexiscan_docs"));
    }
}
