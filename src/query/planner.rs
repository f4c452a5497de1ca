use crate::core::error::Result;
use crate::index::trie::TrieIndex;
use crate::query::ast::FtExpr;
use crate::query::context::{Access, IndexContext};

/// Query planner decides between index evaluation and a full scan
pub struct QueryPlanner<'a> {
    pub context: IndexContext<'a>,
}

impl<'a> QueryPlanner<'a> {
    pub fn new(trie: &'a TrieIndex) -> Self {
        QueryPlanner {
            context: IndexContext::new(trie),
        }
    }

    pub fn with_context(context: IndexContext<'a>) -> Self {
        QueryPlanner { context }
    }

    /// Analyse the predicate and rewrite it when the index can answer it
    pub fn plan(&self, mut expr: FtExpr) -> Result<AccessPlan> {
        let access = expr.index_accessible(&self.context, false)?;
        log::debug!("Planning {}: {:?}", expr, access);

        if !access.uses_index() {
            return Ok(AccessPlan::FullScan { expr, access });
        }

        let rewritten = expr.index_equivalent()?;
        log::debug!("Index plan: {}", rewritten);
        Ok(AccessPlan::Index { expr: rewritten, access })
    }
}

/// Execution plan for a full-text predicate
#[derive(Debug, Clone, PartialEq)]
pub enum AccessPlan {
    Index { expr: FtExpr, access: Access },      // Physical operators over postings
    FullScan { expr: FtExpr, access: Access },   // Original predicate, evaluated per location
}

impl AccessPlan {
    pub fn expr(&self) -> &FtExpr {
        match self {
            AccessPlan::Index { expr, .. } | AccessPlan::FullScan { expr, .. } => expr,
        }
    }

    pub fn access(&self) -> Access {
        match self {
            AccessPlan::Index { access, .. } | AccessPlan::FullScan { access, .. } => *access,
        }
    }

    pub fn uses_index(&self) -> bool {
        matches!(self, AccessPlan::Index { .. })
    }
}
