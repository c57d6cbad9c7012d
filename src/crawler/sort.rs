//! Candidate ordering
//!
//! Sorting happens once, after discovery and before any download, so the
//! chosen order is also the merge order. All sorts are stable: candidates
//! with equal keys keep their discovery order.

use crate::config::SortBy;
use crate::state::PdfCandidate;
use std::cmp::Ordering;

/// Reorders candidates in place
pub fn sort_candidates(candidates: &mut [PdfCandidate], sort_by: SortBy) {
    match sort_by {
        SortBy::None => {}
        SortBy::Numeric => candidates.sort_by_cached_key(|c| numeric_key(&c.filename())),
        SortBy::Alpha => candidates.sort_by_cached_key(|c| c.filename().to_lowercase()),
        SortBy::AlphaDesc => {
            candidates.sort_by_cached_key(|c| std::cmp::Reverse(c.filename().to_lowercase()))
        }
    }
}

/// Sort key made of the digit runs in a name
///
/// `chapter2_part10.pdf` yields `[2, 10]`. Names without digits sort after
/// every name that has some.
#[derive(Debug, Clone, PartialEq, Eq)]
struct NumericKey(Vec<u64>);

impl Ord for NumericKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.0.is_empty(), other.0.is_empty()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for NumericKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn numeric_key(name: &str) -> NumericKey {
    let numbers = name
        .split(|c: char| !c.is_ascii_digit())
        .filter(|run| !run.is_empty())
        .map(|run| run.parse::<u64>().unwrap_or(u64::MAX))
        .collect();
    NumericKey(numbers)
}
