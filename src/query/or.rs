use crate::core::error::{Error, Result};
use crate::query::ast::{rewrite_operands, FtExpr, FtIntersection, FtNotIndex, FtOr, FtUnion, OperandSplit};
use crate::query::context::{Access, IndexContext, Polarity};
use crate::scoring::scorer;

impl FtOr {
    /// Analyse operands in order and decide whether a postings union can
    /// answer the disjunction
    ///
    /// Positive operands add up to the estimate, capped by the context.
    /// Any negated operand leaves the disjunction to a full scan: a plain
    /// union cannot express it. Zero-sized positive operands contribute
    /// nothing and are dropped.
    pub fn index_accessible(&mut self, ctx: &IndexContext, ftnot: bool) -> Result<Access> {
        self.split = None;
        let mut split = OperandSplit::default();
        let mut sum = 0usize;

        for (i, expr) in self.exprs.iter_mut().enumerate() {
            let access = expr.index_accessible(ctx, false)?;
            if !access.io {
                return Ok(Access::not_operable(ftnot));
            }
            if access.seq {
                return Ok(Access::full_scan(ftnot));
            }

            match access.polarity() {
                Polarity::Positive(is) => {
                    split.positive.push(i);
                    sum = sum.saturating_add(is);
                }
                Polarity::Empty => {}
                Polarity::Negative(_) => split.negative.push(i),
                Polarity::UnboundedNegative => {
                    log::debug!("ftor operand {} negates an unbounded set, full scan", i);
                    return Ok(Access::full_scan(ftnot));
                }
            }
        }

        let negated = !split.negative.is_empty();
        self.split = Some(split);

        if negated {
            Ok(Access::full_scan(ftnot))
        } else {
            Ok(Access::bounded(sum.min(ctx.cap), ftnot))
        }
    }

    /// Rewrite into index operators using the split found by analysis
    pub fn index_equivalent(self) -> Result<FtExpr> {
        let split = self
            .split
            .ok_or_else(|| Error::invalid_state("ftor must be analysed before it is rewritten"))?;
        let exprs = rewrite_operands(self.exprs)?;

        match (split.positive.len(), split.negative.len()) {
            (0, 0) => Ok(FtExpr::Union(FtUnion { refs: Vec::new(), exprs })),
            // !A ftor !B = !(A ftand B)
            (0, _) => {
                let exprs = exprs
                    .into_iter()
                    .enumerate()
                    .map(|(i, expr)| {
                        if split.negative.contains(&i) {
                            expr.into_denegated()
                        } else {
                            Ok(expr)
                        }
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(FtExpr::NotIndex(FtNotIndex {
                    expr: Box::new(FtIntersection {
                        positive: split.negative,
                        negative: Vec::new(),
                        exprs,
                    }),
                }))
            }
            (1, 0) => {
                let only = split.positive[0];
                exprs.into_iter().nth(only).ok_or_else(|| {
                    Error::invalid_state(format!("ftor operand {} vanished during rewrite", only))
                })
            }
            (_, 0) => Ok(FtExpr::Union(FtUnion {
                refs: split.positive,
                exprs,
            })),
            _ => {
                // Analysis sends mixed disjunctions to a full scan
                log::warn!("Rewriting mixed positive/negative ftor into a union of all operands");
                Ok(FtExpr::Union(FtUnion {
                    refs: (0..exprs.len()).collect(),
                    exprs,
                }))
            }
        }
    }

    /// Score of the disjunction from its operands' scores; `None` marks an
    /// operand that did not match
    pub fn score(&self, operand_scores: &[Option<f64>]) -> f64 {
        operand_scores
            .iter()
            .flatten()
            .fold(0.0, |acc, &score| scorer::or(acc, score))
    }
}
