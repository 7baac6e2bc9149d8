//! Per-video enrichment stages: type classification, insight scoring,
//! and video summarization. Everything here is pure computation over one
//! video's insight record — no I/O, no shared state, safe to fan out.

pub mod classifier;
pub mod scorer;
pub mod summarizer;

pub use classifier::classify;
pub use scorer::Scorer;
pub use summarizer::summarize;
