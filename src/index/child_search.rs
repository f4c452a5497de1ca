use std::cmp::Ordering;

/// Outcome of locating a byte among a node's children
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult {
    pub position: usize,  // Matching child, or where a new child belongs
    pub found: bool,
}

impl SearchResult {
    pub fn found(position: usize) -> Self {
        SearchResult { position, found: true }
    }

    pub fn insert_at(position: usize) -> Self {
        SearchResult { position, found: false }
    }
}

/// Byte comparison rules shared by every search strategy
///
/// Siblings are ordered by ASCII-folded byte; a lowercase letter sorts right
/// before its uppercase form. Case-sensitive indexes match children on the
/// exact byte, case-insensitive ones on the folded byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteOrder {
    pub case_sensitive: bool,
}

impl ByteOrder {
    pub fn new(case_sensitive: bool) -> Self {
        ByteOrder { case_sensitive }
    }

    #[inline]
    pub fn fold(b: u8) -> u8 {
        b.to_ascii_lowercase()
    }

    /// Order by folded byte only
    #[inline]
    pub fn cmp_folded(a: u8, b: u8) -> Ordering {
        Self::fold(a).cmp(&Self::fold(b))
    }

    /// Total sibling order under this mode
    #[inline]
    pub fn cmp(&self, a: u8, b: u8) -> Ordering {
        let folded = Self::cmp_folded(a, b);
        if !self.case_sensitive || folded != Ordering::Equal {
            return folded;
        }
        a.is_ascii_uppercase().cmp(&b.is_ascii_uppercase())
    }

    /// Whether a child starting with `a` is the child for `b`
    #[inline]
    pub fn matches(&self, a: u8, b: u8) -> bool {
        if self.case_sensitive {
            a == b
        } else {
            Self::fold(a) == Self::fold(b)
        }
    }

    /// Length of the longest common prefix under this mode
    pub fn common_prefix(&self, a: &[u8], b: &[u8]) -> usize {
        a.iter()
            .zip(b)
            .take_while(|&(&x, &y)| self.matches(x, y))
            .count()
    }

    pub fn starts_with(&self, token: &[u8], prefix: &[u8]) -> bool {
        token.len() >= prefix.len() && self.common_prefix(token, prefix) == prefix.len()
    }
}

/// Child lookup algorithms; all three agree on the resulting order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStrategy {
    LinearBackward,  // Bulk load: new children usually belong at the end
    LinearForward,
    Binary,
}

impl SearchStrategy {
    /// Locate `target` among `len` children whose first bytes are given by `key`
    pub fn search<K>(self, order: ByteOrder, len: usize, key: K, target: u8) -> SearchResult
    where
        K: Fn(usize) -> u8,
    {
        let result = match self {
            SearchStrategy::LinearBackward => linear_backward(order, len, &key, target),
            SearchStrategy::LinearForward => linear_forward(order, len, &key, target),
            SearchStrategy::Binary => binary(order, len, &key, target),
        };
        log::trace!(
            "{:?} search for {:#04x} among {} children: {:?}",
            self, target, len, result
        );
        result
    }
}

fn linear_backward<K: Fn(usize) -> u8>(order: ByteOrder, len: usize, key: &K, target: u8) -> SearchResult {
    let mut i = len;
    while i > 0 && order.cmp(key(i - 1), target) == Ordering::Greater {
        i -= 1;
    }
    if i > 0 && order.matches(key(i - 1), target) {
        SearchResult::found(i - 1)
    } else {
        SearchResult::insert_at(i)
    }
}

fn linear_forward<K: Fn(usize) -> u8>(order: ByteOrder, len: usize, key: &K, target: u8) -> SearchResult {
    let mut i = 0;
    while i < len && ByteOrder::cmp_folded(key(i), target) == Ordering::Less {
        i += 1;
    }
    if i == len || ByteOrder::cmp_folded(key(i), target) != Ordering::Equal {
        return SearchResult::insert_at(i);
    }
    exact_case_tie_break(order, len, key, target, i)
}

fn binary<K: Fn(usize) -> u8>(order: ByteOrder, len: usize, key: &K, target: u8) -> SearchResult {
    let (mut lo, mut hi) = (0, len);
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        match ByteOrder::cmp_folded(key(mid), target) {
            Ordering::Less => lo = mid + 1,
            Ordering::Greater => hi = mid,
            Ordering::Equal => {
                // The folded twin, if any, is adjacent; start from the first of the pair
                let first = if mid > 0 && ByteOrder::cmp_folded(key(mid - 1), target) == Ordering::Equal {
                    mid - 1
                } else {
                    mid
                };
                return exact_case_tie_break(order, len, key, target, first);
            }
        }
    }
    SearchResult::insert_at(lo)
}

/// `first` is the first child whose folded byte equals the target's.
/// At most two such children exist (lowercase then uppercase); pick the
/// exact match, or the slot next to the folded twin.
fn exact_case_tie_break<K: Fn(usize) -> u8>(
    order: ByteOrder,
    len: usize,
    key: &K,
    target: u8,
    first: usize,
) -> SearchResult {
    if !order.case_sensitive {
        return SearchResult::found(first);
    }
    let mut i = first;
    while i < len && ByteOrder::cmp_folded(key(i), target) == Ordering::Equal {
        match order.cmp(key(i), target) {
            Ordering::Equal => return SearchResult::found(i),
            Ordering::Greater => return SearchResult::insert_at(i),
            Ordering::Less => i += 1,
        }
    }
    SearchResult::insert_at(i)
}

#[cfg(test)]
mod tests {
    use super::*;

    const STRATEGIES: [SearchStrategy; 3] = [
        SearchStrategy::LinearBackward,
        SearchStrategy::LinearForward,
        SearchStrategy::Binary,
    ];

    fn search(strategy: SearchStrategy, case_sensitive: bool, keys: &[u8], target: u8) -> SearchResult {
        strategy.search(ByteOrder::new(case_sensitive), keys.len(), |i| keys[i], target)
    }

    #[test]
    fn empty_children_insert_at_zero() {
        for strategy in STRATEGIES {
            assert_eq!(search(strategy, true, &[], b'x'), SearchResult::insert_at(0));
        }
    }

    #[test]
    fn lowercase_sorts_before_uppercase() {
        let keys = b"aAbBrsTyY";
        for strategy in STRATEGIES {
            assert_eq!(search(strategy, true, keys, b'B'), SearchResult::found(3));
            assert_eq!(search(strategy, true, keys, b'b'), SearchResult::found(2));
            assert_eq!(search(strategy, true, keys, b't'), SearchResult::insert_at(6));
            assert_eq!(search(strategy, true, keys, b'R'), SearchResult::insert_at(5));
            assert_eq!(search(strategy, true, keys, b'S'), SearchResult::insert_at(6));
            assert_eq!(search(strategy, true, keys, b'z'), SearchResult::insert_at(9));
        }
    }

    #[test]
    fn case_insensitive_matches_folded_twin() {
        let keys = b"bdT";
        for strategy in STRATEGIES {
            assert_eq!(search(strategy, false, keys, b't'), SearchResult::found(2));
            assert_eq!(search(strategy, false, keys, b'D'), SearchResult::found(1));
            assert_eq!(search(strategy, false, keys, b'C'), SearchResult::insert_at(1));
        }
    }

    #[test]
    fn common_prefix_respects_case_mode() {
        assert_eq!(ByteOrder::new(true).common_prefix(b"Cart", b"carp"), 0);
        assert_eq!(ByteOrder::new(false).common_prefix(b"Cart", b"carp"), 3);
    }
}
