//! Page, document and corpus keyword tallies.
//!
//! Counts are stored by lexicon position so every view keeps lexicon order
//! without a lookup. A page tally is built completely before it is applied,
//! which keeps document and corpus totals free of half-scanned pages.

use serde::Serialize;

use crate::lexicon::{Keyword, Lexicon};

/// One entry of a ranked distribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedCount {
    pub keyword: Keyword,
    pub count: u64,
}

/// Keyword counts in lexicon order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct KeywordTally {
    counts: Vec<u64>,
}

impl KeywordTally {
    /// An all-zero tally sized for `lexicon`.
    pub fn zeroed(lexicon: &Lexicon) -> Self {
        Self {
            counts: vec![0; lexicon.len()],
        }
    }

    pub fn get(&self, index: usize) -> u64 {
        self.counts.get(index).copied().unwrap_or(0)
    }

    pub fn add(&mut self, index: usize, amount: u64) {
        if let Some(slot) = self.counts.get_mut(index) {
            *slot += amount;
        }
    }

    /// Add every count of `other` into this tally.
    pub fn merge(&mut self, other: &KeywordTally) {
        for (slot, amount) in self.counts.iter_mut().zip(&other.counts) {
            *slot += amount;
        }
    }

    pub fn reset(&mut self) {
        self.counts.iter_mut().for_each(|c| *c = 0);
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Counts in lexicon order, zeros included.
    pub fn as_slice(&self) -> &[u64] {
        &self.counts
    }

    /// Non-zero counts sorted ascending by count, ties by keyword.
    pub fn ranked(&self, lexicon: &Lexicon) -> Vec<RankedCount> {
        let mut ranked: Vec<RankedCount> = lexicon
            .iter()
            .zip(&self.counts)
            .filter(|(_, count)| **count > 0)
            .map(|(keyword, &count)| RankedCount {
                keyword: keyword.clone(),
                count,
            })
            .collect();
        ranked.sort_by(|a, b| a.count.cmp(&b.count).then_with(|| a.keyword.cmp(&b.keyword)));
        ranked
    }
}

/// Apply a finished page tally to the running document and corpus totals.
pub fn accumulate(page: &KeywordTally, document: &mut KeywordTally, corpus: &mut KeywordTally) {
    for (index, &count) in page.counts.iter().enumerate() {
        if count > 0 {
            document.add(index, count);
            corpus.add(index, count);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lexicon(words: &str) -> Lexicon {
        Lexicon::from_lines(words).unwrap()
    }

    #[test]
    fn test_accumulate_updates_document_and_corpus() {
        let lex = lexicon("cat\ndog\nvirus");
        let mut page = KeywordTally::zeroed(&lex);
        page.add(0, 2);
        page.add(2, 1);

        let mut document = KeywordTally::zeroed(&lex);
        let mut corpus = KeywordTally::zeroed(&lex);
        accumulate(&page, &mut document, &mut corpus);
        accumulate(&page, &mut document, &mut corpus);

        assert_eq!(document.as_slice(), &[4, 0, 2]);
        assert_eq!(corpus.as_slice(), &[4, 0, 2]);
    }

    #[test]
    fn test_reset_only_touches_one_tally() {
        let lex = lexicon("virus");
        let mut page = KeywordTally::zeroed(&lex);
        page.add(0, 1);
        let mut document = KeywordTally::zeroed(&lex);
        let mut corpus = KeywordTally::zeroed(&lex);

        accumulate(&page, &mut document, &mut corpus);
        document.reset();
        accumulate(&page, &mut document, &mut corpus);

        assert_eq!(document.get(0), 1);
        assert_eq!(corpus.get(0), 2);
    }

    #[test]
    fn test_ranked_sorts_ascending_and_drops_zeros() {
        let lex = lexicon("zebra\napple\nmango\nkiwi");
        let mut tally = KeywordTally::zeroed(&lex);
        tally.add(0, 3);
        tally.add(1, 3);
        tally.add(3, 1);

        let ranked = tally.ranked(&lex);
        let pairs: Vec<(&str, u64)> = ranked
            .iter()
            .map(|r| (r.keyword.as_str(), r.count))
            .collect();
        assert_eq!(pairs, vec![("kiwi", 1), ("apple", 3), ("zebra", 3)]);
    }

    #[test]
    fn test_merge_and_total() {
        let lex = lexicon("a\nb");
        let mut left = KeywordTally::zeroed(&lex);
        left.add(0, 1);
        let mut right = KeywordTally::zeroed(&lex);
        right.add(0, 2);
        right.add(1, 5);

        left.merge(&right);
        assert_eq!(left.as_slice(), &[3, 5]);
        assert_eq!(left.total(), 8);
    }

    #[test]
    fn test_out_of_range_index_is_ignored() {
        let lex = lexicon("a");
        let mut tally = KeywordTally::zeroed(&lex);
        tally.add(7, 1);
        assert_eq!(tally.get(7), 0);
        assert_eq!(tally.total(), 0);
    }
}
