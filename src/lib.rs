pub mod core;
pub mod analysis;
pub mod compression;
pub mod index;
pub mod query;
pub mod search;
pub mod scoring;

/*
┌──────────────────────────────────── FTRIE ARCHITECTURE ─────────────────────────────────────┐
│                                                                                              │
│  ┌────────────────────────────────── struct TrieIndex ─────────────────────────────────┐   │
│  │ config: Config               // Case mode, bulk load, limits                        │   │
│  │ order: ByteOrder             // Folded sibling order, lower before upper            │   │
│  │ strategy: SearchStrategy     // LinearBackward | LinearForward | Binary             │   │
│  │ tokens: TokenStore           // Edge labels, shrunk in place on split               │   │
│  │ nodes: NodeTable             // NodeRecord per node + first label byte              │   │
│  │ postings: PostingsStore      // Local (location, offset) lists                      │   │
│  │ universe: RoaringBitmap      // Every indexed location                              │   │
│  └─────────────────────────────────────────────────────────────────────────────────────┘   │
│                                                                                              │
│  NodeRecord ──compact──> [label | child_count | children.. | size | p0 (, p1)]              │
│       └──External──> EncodedOffset::Single(i32) | Split { high, low }                       │
│                                                                                              │
│  IndexBuilder ──tokenizes──> Document ──StandardTokenizer──> Token ──index()──> TrieIndex   │
│  SortedLoader ──insert_sorted()──> TrieIndex (bulk load, backward child search)             │
│                                                                                              │
│  FtExpr::{Words, And, Or, Not}                                                              │
│     └──index_accessible(ctx, ftnot)──> Access { is, io, seq, ftnot }                        │
│     └──index_equivalent()──> FtExpr::{Union, Intersection, NotIndex}                        │
│                                                                                              │
│  QueryPlanner ──plan()──> AccessPlan::{Index, FullScan}                                     │
│  IndexExecutor ──execute()──> RoaringBitmap ──search()──> SearchResults (Scorer, or rule)   │
│                                                                                              │
└──────────────────────────────────────────────────────────────────────────────────────────────┘
*/
