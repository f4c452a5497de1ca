use crate::core::error::{Error, Result};
use crate::query::ast::{rewrite_operands, FtAnd, FtExpr, FtIntersection, OperandSplit};
use crate::query::context::{Access, IndexContext, Polarity};

impl FtAnd {
    /// The smallest positive operand bounds the conjunction; negated
    /// operands are subtracted from it. Without a positive operand there is
    /// nothing to subtract from but the universe, which needs a full scan.
    pub fn index_accessible(&mut self, ctx: &IndexContext, ftnot: bool) -> Result<Access> {
        self.split = None;
        let mut split = OperandSplit::default();
        let mut min = usize::MAX;

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
                    min = min.min(is);
                }
                Polarity::Empty => {
                    split.positive.push(i);
                    min = 0;
                }
                Polarity::Negative(_) => split.negative.push(i),
                Polarity::UnboundedNegative => return Ok(Access::full_scan(ftnot)),
            }
        }

        let bounded = !split.positive.is_empty();
        self.split = Some(split);

        if bounded {
            Ok(Access::bounded(min.min(ctx.cap), ftnot))
        } else {
            Ok(Access::full_scan(ftnot))
        }
    }

    pub fn index_equivalent(self) -> Result<FtExpr> {
        let split = self
            .split
            .ok_or_else(|| Error::invalid_state("ftand must be analysed before it is rewritten"))?;
        let exprs = rewrite_operands(self.exprs)?;

        if split.positive.len() == 1 && split.negative.is_empty() {
            let only = split.positive[0];
            return exprs.into_iter().nth(only).ok_or_else(|| {
                Error::invalid_state(format!("ftand operand {} vanished during rewrite", only))
            });
        }

        // A ftand !B = intersect(A) except(B)
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

        Ok(FtExpr::Intersection(FtIntersection {
            positive: split.positive,
            negative: split.negative,
            exprs,
        }))
    }
}
