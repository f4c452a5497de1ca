/// Combine the scores of two matching disjuncts
///
/// Probabilistic sum: stays in [0, 1] for inputs in [0, 1], grows with each
/// matching operand and never exceeds 1.
pub fn or(a: f64, b: f64) -> f64 {
    a + b - a * b
}

/// Combine the scores of two matching conjuncts
pub fn and(a: f64, b: f64) -> f64 {
    a * b
}

/// Per-token scoring used when ranking index results
pub trait Scorer: Send + Sync {
    /// Score in [0, 1] of a location matching a token with `postings`
    /// occurrences among `universe` locations
    fn score(&self, postings: usize, universe: usize) -> f64;

    fn name(&self) -> &str;
}

/// Inverse document frequency normalized into [0, 1]
#[derive(Debug, Clone, Copy, Default)]
pub struct IdfScorer;

impl Scorer for IdfScorer {
    fn score(&self, postings: usize, universe: usize) -> f64 {
        if postings == 0 || universe == 0 {
            return 0.0;
        }
        // Occurrences may exceed locations for repeated tokens
        let ratio = (universe as f64 / postings as f64).max(1.0);
        (1.0 + ratio).ln() / (1.0 + universe as f64).ln().max(f64::MIN_POSITIVE)
    }

    fn name(&self) -> &str {
        "idf"
    }
}

/// Every match scores 1
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstantScorer;

impl Scorer for ConstantScorer {
    fn score(&self, postings: usize, _universe: usize) -> f64 {
        if postings == 0 { 0.0 } else { 1.0 }
    }

    fn name(&self) -> &str {
        "constant"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn or_is_bounded_and_monotone() {
        assert_eq!(or(0.0, 0.0), 0.0);
        assert_eq!(or(1.0, 0.3), 1.0);
        assert!((or(0.5, 0.5) - 0.75).abs() < 1e-12);
        assert!(or(0.2, 0.4) >= 0.4);
    }

    #[test]
    fn idf_prefers_rare_tokens() {
        let scorer = IdfScorer;
        let rare = scorer.score(1, 100);
        let common = scorer.score(90, 100);
        assert!(rare > common);
        assert!(rare <= 1.0 && common > 0.0);
        assert_eq!(scorer.score(0, 100), 0.0);
        assert_eq!(scorer.name(), "idf");
    }

    #[test]
    fn constant_scores_any_match_as_one() {
        let scorer = ConstantScorer;
        assert_eq!(scorer.score(3, 10), 1.0);
        assert_eq!(scorer.score(0, 10), 0.0);
        assert_eq!(scorer.name(), "constant");
    }
}
