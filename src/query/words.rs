use crate::core::error::Result;
use crate::query::ast::FtWords;
use crate::query::context::{Access, IndexContext};

impl FtWords {
    /// A token the index holds reports its postings size; tokens the index
    /// never stores (empty or overlong) make the leaf non-operable
    pub fn index_accessible(&mut self, ctx: &IndexContext, ftnot: bool) -> Result<Access> {
        let bytes = self.token.as_bytes();
        if bytes.is_empty() || bytes.len() > ctx.trie.config().max_token_length {
            self.estimate = None;
            return Ok(Access::not_operable(ftnot));
        }

        let estimate = ctx.trie.estimate(bytes)?;
        self.estimate = Some(estimate);
        Ok(Access::bounded(estimate, ftnot))
    }
}
