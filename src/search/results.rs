use std::cmp::Ordering;
use std::collections::BinaryHeap;
use crate::core::types::LocationId;

/// Search results container
#[derive(Debug, Clone)]
pub struct SearchResults {
    pub hits: Vec<ScoredLocation>,
    pub total_hits: usize,
    pub max_score: f64,
    pub took_ms: u64,
}

/// Location with relevance score
#[derive(Debug, Clone, Copy)]
pub struct ScoredLocation {
    pub location: LocationId,
    pub score: f64,
}

// Implement ordering for heap
impl PartialEq for ScoredLocation {
    fn eq(&self, other: &Self) -> bool {
        self.score == other.score && self.location == other.location
    }
}

impl Eq for ScoredLocation {}

impl PartialOrd for ScoredLocation {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScoredLocation {
    // Reverse order so the heap top is the weakest hit; ties keep lower locations
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .partial_cmp(&self.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| self.location.cmp(&other.location))
    }
}

/// Top-K collector for result collection
pub struct TopKCollector {
    pub heap: BinaryHeap<ScoredLocation>,
    pub k: usize,
    pub total_collected: usize,
}

impl TopKCollector {
    pub fn new(k: usize) -> Self {
        TopKCollector {
            heap: BinaryHeap::with_capacity(k.saturating_add(1)),
            k,
            total_collected: 0,
        }
    }

    pub fn collect(&mut self, hit: ScoredLocation) {
        self.total_collected += 1;
        if self.k == 0 {
            return;
        }

        self.heap.push(hit);
        if self.heap.len() > self.k {
            self.heap.pop();
        }
    }

    /// Hits by descending score, then ascending location
    pub fn into_results(self) -> Vec<ScoredLocation> {
        self.heap.into_sorted_vec()
    }
}
