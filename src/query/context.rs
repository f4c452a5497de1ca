use crate::index::trie::TrieIndex;

/// Estimated size of a predicate's result set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    Bounded(usize),
    Unbounded,    // Only a full scan can tell
}

/// Outcome of index-accessibility analysis for one predicate node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Access {
    pub is: Cardinality,  // Estimated result size
    pub io: bool,         // Every descendant could report a cardinality
    pub seq: bool,        // Needs sequential (full scan) evaluation
    pub ftnot: bool,      // Node is negated at this point of the traversal
}

impl Access {
    pub fn bounded(is: usize, ftnot: bool) -> Self {
        Access {
            is: Cardinality::Bounded(is),
            io: true,
            seq: false,
            ftnot,
        }
    }

    /// Analysable, but only a full scan can answer it
    pub fn full_scan(ftnot: bool) -> Self {
        Access {
            is: Cardinality::Unbounded,
            io: true,
            seq: true,
            ftnot,
        }
    }

    /// Some descendant cannot be estimated by the index at all
    pub fn not_operable(ftnot: bool) -> Self {
        Access {
            is: Cardinality::Unbounded,
            io: false,
            seq: true,
            ftnot,
        }
    }

    /// Whether the index can answer this node
    pub fn uses_index(&self) -> bool {
        self.io && !self.seq
    }
}

/// Read-only view of the index used while analysing a predicate tree
///
/// Holds no mutable state, so independent query trees can be analysed
/// against the same index concurrently.
#[derive(Clone, Copy)]
pub struct IndexContext<'a> {
    pub trie: &'a TrieIndex,
    pub cap: usize,   // Upper bound for union estimates
}

impl<'a> IndexContext<'a> {
    /// Cap defaults to the configured result cap, else the location universe
    pub fn new(trie: &'a TrieIndex) -> Self {
        let cap = trie.config().result_cap.unwrap_or_else(|| {
            let universe = trie.universe().len() as usize;
            if universe == 0 { usize::MAX } else { universe }
        });
        IndexContext { trie, cap }
    }

    pub fn with_cap(mut self, cap: usize) -> Self {
        self.cap = cap;
        self
    }
}

/// How a combinator operand contributes, derived from its analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    Positive(usize),     // Not negated, non-empty
    Empty,               // Not negated, matches nothing
    Negative(usize),     // Negated, the negated operand is bounded and non-empty
    UnboundedNegative,   // Negated, complement of nothing or of an unbounded set
}

impl Access {
    pub fn polarity(&self) -> Polarity {
        match (self.ftnot, self.is) {
            (false, Cardinality::Bounded(0)) => Polarity::Empty,
            (false, Cardinality::Bounded(n)) => Polarity::Positive(n),
            (false, Cardinality::Unbounded) => Polarity::Positive(usize::MAX),
            (true, Cardinality::Bounded(n)) if n > 0 => Polarity::Negative(n),
            (true, _) => Polarity::UnboundedNegative,
        }
    }
}
