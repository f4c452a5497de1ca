use std::fmt;
use crate::core::error::{Error, ErrorKind, Result};
use crate::query::context::{Access, IndexContext};

/// Full-text predicate tree
///
/// The first four variants are logical predicates built from a query. The
/// last three are physical index operators produced by `index_equivalent`;
/// they refer to their operands by position.
#[derive(Debug, Clone, PartialEq)]
pub enum FtExpr {
    Words(FtWords),                // Single token match
    And(FtAnd),
    Or(FtOr),
    Not(FtNot),
    Union(FtUnion),
    Intersection(FtIntersection),
    NotIndex(FtNotIndex),          // Negated intersection
}

#[derive(Debug, Clone, PartialEq)]
pub struct FtWords {
    pub token: String,
    pub estimate: Option<usize>,   // Postings size seen by the last analysis
}

#[derive(Debug, Clone, PartialEq)]
pub struct FtNot {
    pub expr: Box<FtExpr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FtAnd {
    pub exprs: Vec<FtExpr>,
    pub split: Option<OperandSplit>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FtOr {
    pub exprs: Vec<FtExpr>,
    pub split: Option<OperandSplit>,
}

/// Operand positions sorted by polarity during analysis
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperandSplit {
    pub positive: Vec<usize>,
    pub negative: Vec<usize>,
}

/// Union of the results of `exprs[refs]`
#[derive(Debug, Clone, PartialEq)]
pub struct FtUnion {
    pub refs: Vec<usize>,
    pub exprs: Vec<FtExpr>,
}

/// Intersection of `exprs[positive]` minus the union of `exprs[negative]`;
/// with no positive operands the intersection starts from the universe
#[derive(Debug, Clone, PartialEq)]
pub struct FtIntersection {
    pub positive: Vec<usize>,
    pub negative: Vec<usize>,
    pub exprs: Vec<FtExpr>,
}

/// Complement of an intersection against the location universe
#[derive(Debug, Clone, PartialEq)]
pub struct FtNotIndex {
    pub expr: Box<FtIntersection>,
}

impl FtExpr {
    pub fn words(token: impl Into<String>) -> Self {
        FtExpr::Words(FtWords {
            token: token.into(),
            estimate: None,
        })
    }

    pub fn not(expr: FtExpr) -> Self {
        FtExpr::Not(FtNot { expr: Box::new(expr) })
    }

    pub fn and(exprs: Vec<FtExpr>) -> Self {
        FtExpr::And(FtAnd { exprs, split: None })
    }

    pub fn or(exprs: Vec<FtExpr>) -> Self {
        FtExpr::Or(FtOr { exprs, split: None })
    }

    /// Analyse whether the index can answer this predicate
    ///
    /// `ftnot` tells whether the node is reached under a negation. Each
    /// node returns the flag for itself: leaves echo it, `Not` flips it for
    /// its child, combinators restart it at `false` for their operands.
    pub fn index_accessible(&mut self, ctx: &IndexContext, ftnot: bool) -> Result<Access> {
        match self {
            FtExpr::Words(words) => words.index_accessible(ctx, ftnot),
            FtExpr::And(and) => and.index_accessible(ctx, ftnot),
            FtExpr::Or(or) => or.index_accessible(ctx, ftnot),
            FtExpr::Not(not) => {
                let access = not.expr.index_accessible(ctx, !ftnot)?;
                log::trace!("ftnot analysed: {:?}", access);
                Ok(access)
            }
            // Physical operators are the output of a rewrite, not its input
            physical => Err(Error::invalid_state(format!(
                "Cannot analyse rewritten operator {}",
                physical
            ))),
        }
    }

    /// Rewrite into index operators; call after a successful analysis
    pub fn index_equivalent(self) -> Result<FtExpr> {
        match self {
            FtExpr::Words(words) => Ok(FtExpr::Words(words)),
            FtExpr::And(and) => and.index_equivalent(),
            FtExpr::Or(or) => or.index_equivalent(),
            FtExpr::Not(not) => Ok(FtExpr::not(not.expr.index_equivalent()?)),
            physical => Ok(physical),
        }
    }

    /// Strip the negation of a negative operand
    pub fn into_denegated(self) -> Result<FtExpr> {
        match self {
            FtExpr::Not(not) => Ok(*not.expr),
            other => Err(Error::new(
                ErrorKind::Internal,
                format!("Expected a negated operand, found {}", other),
            )),
        }
    }

    pub fn is_physical(&self) -> bool {
        matches!(
            self,
            FtExpr::Union(_) | FtExpr::Intersection(_) | FtExpr::NotIndex(_)
        )
    }
}

/// Rewrite every operand in place, keeping positions
pub(crate) fn rewrite_operands(exprs: Vec<FtExpr>) -> Result<Vec<FtExpr>> {
    exprs.into_iter().map(FtExpr::index_equivalent).collect()
}

fn write_joined(f: &mut fmt::Formatter, exprs: &[FtExpr], sep: &str) -> fmt::Result {
    for (i, expr) in exprs.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        match expr {
            FtExpr::And(_) | FtExpr::Or(_) => write!(f, "({})", expr)?,
            _ => write!(f, "{}", expr)?,
        }
    }
    Ok(())
}

fn write_refs(f: &mut fmt::Formatter, name: &str, refs: &[usize], exprs: &[FtExpr]) -> fmt::Result {
    write!(f, "{}(", name)?;
    for (i, &r) in refs.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        match exprs.get(r) {
            Some(expr) => write!(f, "{}", expr)?,
            None => write!(f, "#{}", r)?,
        }
    }
    f.write_str(")")
}

fn write_intersection(f: &mut fmt::Formatter, inter: &FtIntersection) -> fmt::Result {
    write_refs(f, "intersect", &inter.positive, &inter.exprs)?;
    if !inter.negative.is_empty() {
        write_refs(f, " except", &inter.negative, &inter.exprs)?;
    }
    Ok(())
}

impl fmt::Display for FtExpr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FtExpr::Words(words) => write!(f, "\"{}\"", words.token),
            FtExpr::And(and) => write_joined(f, &and.exprs, " ftand "),
            FtExpr::Or(or) => write_joined(f, &or.exprs, " ftor "),
            FtExpr::Not(not) => match not.expr.as_ref() {
                FtExpr::And(_) | FtExpr::Or(_) => write!(f, "ftnot ({})", not.expr),
                expr => write!(f, "ftnot {}", expr),
            },
            FtExpr::Union(union) => write_refs(f, "union", &union.refs, &union.exprs),
            FtExpr::Intersection(inter) => write_intersection(f, inter),
            FtExpr::NotIndex(not) => {
                f.write_str("ftnot ")?;
                write_intersection(f, &not.expr)
            }
        }
    }
}
