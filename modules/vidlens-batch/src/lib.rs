//! Batch runner — orchestrates the whole enrichment pipeline over the corpus:
//! classify, score, summarize each video in parallel, then rebuild the
//! corpus-wide meta-intelligence report sequentially.

pub mod run_log;
pub mod runner;

pub use run_log::{EventKind, RunLog};
pub use runner::{RunOptions, RunReport, Runner};
