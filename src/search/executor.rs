use std::collections::HashMap;
use std::time::Instant;
use roaring::RoaringBitmap;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::LocationId;
use crate::index::trie::{PostingsView, TrieIndex};
use crate::query::ast::{FtExpr, FtIntersection};
use crate::query::planner::AccessPlan;
use crate::scoring::scorer::{self, IdfScorer, Scorer};
use crate::search::results::{ScoredLocation, SearchResults, TopKCollector};

/// Reader for postings that were bulk-loaded with an external offset
pub trait ExternalPostings: Send + Sync {
    /// Locations of the postings list of `size` entries stored at `offset`
    fn locations(&self, size: u32, offset: u64) -> Result<Vec<u32>>;
}

/// Evaluates rewritten predicate trees against the trie
pub struct IndexExecutor<'a> {
    pub trie: &'a TrieIndex,
    pub universe: RoaringBitmap,
    pub scorer: Box<dyn Scorer>,
    external: Option<&'a dyn ExternalPostings>,
}

impl<'a> IndexExecutor<'a> {
    pub fn new(trie: &'a TrieIndex) -> Self {
        IndexExecutor {
            trie,
            universe: trie.universe().clone(),
            scorer: Box::new(IdfScorer),
            external: None,
        }
    }

    /// Locations complements are taken against; needed for bulk-loaded tries
    pub fn with_universe(mut self, universe: RoaringBitmap) -> Self {
        self.universe = universe;
        self
    }

    pub fn with_scorer(mut self, scorer: Box<dyn Scorer>) -> Self {
        self.scorer = scorer;
        self
    }

    pub fn with_external(mut self, external: &'a dyn ExternalPostings) -> Self {
        self.external = Some(external);
        self
    }

    /// Locations matching a rewritten predicate
    pub fn execute(&self, expr: &FtExpr) -> Result<RoaringBitmap> {
        let mut words = HashMap::new();
        self.eval(expr, &mut words)
    }

    /// Ranked locations for an index plan
    pub fn search(&self, plan: &AccessPlan, limit: usize) -> Result<SearchResults> {
        let start = Instant::now();
        let expr = match plan {
            AccessPlan::Index { expr, .. } => expr,
            AccessPlan::FullScan { expr, .. } => {
                return Err(Error::new(
                    ErrorKind::UnsupportedQuery,
                    format!("{} needs a full scan, not an index lookup", expr),
                ));
            }
        };

        let mut words = HashMap::new();
        let matched = self.eval(expr, &mut words)?;

        let mut collector = TopKCollector::new(limit);
        for location in matched.iter() {
            let score = self.score_at(expr, location, &mut words)?.unwrap_or(0.0);
            collector.collect(ScoredLocation {
                location: LocationId::new(location),
                score,
            });
        }

        let total_hits = collector.total_collected;
        let hits = collector.into_results();
        let max_score = hits.first().map(|hit| hit.score).unwrap_or(0.0);
        let took_ms = start.elapsed().as_millis() as u64;
        log::debug!(
            "Search {} matched {} locations in {}ms ({} scoring)",
            expr, total_hits, took_ms, self.scorer.name()
        );

        Ok(SearchResults {
            hits,
            total_hits,
            max_score,
            took_ms,
        })
    }

    fn eval(&self, expr: &FtExpr, words: &mut HashMap<String, Matches>) -> Result<RoaringBitmap> {
        match expr {
            FtExpr::Words(w) => Ok(self.word(&w.token, words)?.locations.clone()),
            FtExpr::Not(not) => Ok(&self.universe - &self.eval(&not.expr, words)?),
            FtExpr::Union(union) => {
                let mut out = RoaringBitmap::new();
                for &r in &union.refs {
                    out |= self.eval(operand(&union.exprs, r)?, words)?;
                }
                Ok(out)
            }
            FtExpr::Intersection(inter) => self.intersect(inter, words),
            FtExpr::NotIndex(not) => Ok(&self.universe - &self.intersect(&not.expr, words)?),
            FtExpr::And(_) | FtExpr::Or(_) => Err(Error::new(
                ErrorKind::UnsupportedQuery,
                format!("Logical operator in {} must be rewritten first", expr),
            )),
        }
    }

    fn intersect(&self, inter: &FtIntersection, words: &mut HashMap<String, Matches>) -> Result<RoaringBitmap> {
        let mut out: Option<RoaringBitmap> = None;
        for &r in &inter.positive {
            let bits = self.eval(operand(&inter.exprs, r)?, words)?;
            out = Some(match out {
                Some(acc) => acc & bits,
                None => bits,
            });
            if out.as_ref().is_some_and(RoaringBitmap::is_empty) {
                return Ok(RoaringBitmap::new());
            }
        }

        let mut out = out.unwrap_or_else(|| self.universe.clone());
        for &r in &inter.negative {
            out -= self.eval(operand(&inter.exprs, r)?, words)?;
        }
        Ok(out)
    }

    /// Score of `location` under `expr`, `None` when it does not match
    fn score_at(&self, expr: &FtExpr, location: u32, words: &mut HashMap<String, Matches>) -> Result<Option<f64>> {
        match expr {
            FtExpr::Words(w) => {
                let matches = self.word(&w.token, words)?;
                Ok(matches.locations.contains(location).then_some(matches.score))
            }
            FtExpr::Not(not) => Ok(match self.score_at(&not.expr, location, words)? {
                Some(_) => None,
                None => Some(1.0),
            }),
            FtExpr::Union(union) => {
                let mut score = None;
                for &r in &union.refs {
                    if let Some(s) = self.score_at(operand(&union.exprs, r)?, location, words)? {
                        score = Some(scorer::or(score.unwrap_or(0.0), s));
                    }
                }
                Ok(score)
            }
            FtExpr::Intersection(inter) => self.score_intersection(inter, location, words),
            FtExpr::NotIndex(not) => Ok(match self.score_intersection(&not.expr, location, words)? {
                Some(_) => None,
                None => Some(1.0),
            }),
            FtExpr::And(_) | FtExpr::Or(_) => Err(Error::new(
                ErrorKind::UnsupportedQuery,
                format!("Logical operator in {} must be rewritten first", expr),
            )),
        }
    }

    fn score_intersection(
        &self,
        inter: &FtIntersection,
        location: u32,
        words: &mut HashMap<String, Matches>,
    ) -> Result<Option<f64>> {
        let mut score = 1.0;
        for &r in &inter.positive {
            match self.score_at(operand(&inter.exprs, r)?, location, words)? {
                Some(s) => score = scorer::and(score, s),
                None => return Ok(None),
            }
        }
        for &r in &inter.negative {
            if self.score_at(operand(&inter.exprs, r)?, location, words)?.is_some() {
                return Ok(None);
            }
        }
        if inter.positive.is_empty() && !self.universe.contains(location) {
            return Ok(None);
        }
        Ok(Some(score))
    }

    fn word<'w>(&self, token: &str, words: &'w mut HashMap<String, Matches>) -> Result<&'w Matches> {
        if !words.contains_key(token) {
            let matches = self.load_word(token)?;
            words.insert(token.to_string(), matches);
        }
        words
            .get(token)
            .ok_or_else(|| Error::new(ErrorKind::Internal, format!("Lost matches for {:?}", token)))
    }

    fn load_word(&self, token: &str) -> Result<Matches> {
        let Some(node) = self.trie.lookup(token.as_bytes())? else {
            return Ok(Matches::default());
        };

        let view = self.trie.postings(node)?;
        let locations = match view {
            PostingsView::Empty => RoaringBitmap::new(),
            PostingsView::Local { locations, .. } => locations.iter().copied().collect(),
            PostingsView::External { size, offset } => match self.external {
                Some(reader) => reader.locations(size, offset)?.into_iter().collect(),
                None => {
                    return Err(Error::new(
                        ErrorKind::UnsupportedQuery,
                        format!("Postings of {:?} are stored externally and no reader is set", token),
                    ));
                }
            },
        };

        let score = self
            .scorer
            .score(view.len(), self.universe.len() as usize);
        Ok(Matches { locations, score })
    }
}

#[derive(Debug, Default)]
struct Matches {
    locations: RoaringBitmap,
    score: f64,
}

fn operand(exprs: &[FtExpr], r: usize) -> Result<&FtExpr> {
    exprs
        .get(r)
        .ok_or_else(|| Error::invalid_state(format!("Operand reference {} out of range", r)))
}
