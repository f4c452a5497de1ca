/// ftrie API demo
///
/// Builds a trie index from a few documents, inspects it, then plans and
/// runs full-text predicates against it.

use ftrie::core::config::Config;
use ftrie::core::types::Document;
use ftrie::index::builder::IndexBuilder;
use ftrie::query::ast::FtExpr;
use ftrie::query::planner::{AccessPlan, QueryPlanner};
use ftrie::search::executor::IndexExecutor;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("\n=== ftrie demo ===\n");

    // Step 1: build the index
    let documents = vec![
        Document::new(1u32, "Rust programming with a compressed trie"),
        Document::new(2u32, "Database systems store postings per token"),
        Document::new(3u32, "A trie shares prefixes between tokens"),
        Document::new(4u32, "Rust database engines"),
    ];

    let mut builder = IndexBuilder::new(Config::default());
    builder.add_documents(&documents)?;
    let trie = builder.finish();

    let stats = trie.stats()?;
    println!("Indexed {} tokens in {} nodes", stats.indexed_tokens, stats.nodes);
    println!("Stats: {}\n", stats.to_json()?);

    // Step 2: inspect
    for token in trie.prefix(b"tr")? {
        println!("  prefix 'tr': {} ({} postings)", String::from_utf8_lossy(&token.token), token.postings_size);
    }
    println!("  occurrences of 'rust': {:?}\n", trie.occurrences(b"rust")?);

    // Step 3: plan and run queries
    let planner = QueryPlanner::new(&trie);
    let executor = IndexExecutor::new(&trie);

    let queries = vec![
        FtExpr::or(vec![FtExpr::words("rust"), FtExpr::words("trie")]),
        FtExpr::and(vec![FtExpr::words("database"), FtExpr::not(FtExpr::words("rust"))]),
        FtExpr::or(vec![FtExpr::not(FtExpr::words("rust")), FtExpr::not(FtExpr::words("trie"))]),
    ];

    for query in queries {
        let text = query.to_string();
        match planner.plan(query)? {
            plan @ AccessPlan::Index { .. } => {
                let results = executor.search(&plan, 10)?;
                let hits: Vec<u32> = results.hits.iter().map(|h| h.location.value()).collect();
                println!("{}\n  plan: {}\n  hits: {:?}", text, plan.expr(), hits);
            }
            AccessPlan::FullScan { access, .. } => {
                println!("{}\n  needs a full scan: {:?}", text, access);
            }
        }
    }

    Ok(())
}
