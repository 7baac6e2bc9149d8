//! Corpus-wide meta-intelligence. One full reduce over every current video
//! summary — never an incremental merge, because trend frequencies and
//! playbook clusters are corpus-wide aggregates that cannot be patched by
//! a local delta.

pub mod aggregator;
pub mod consensus;

pub use aggregator::{aggregate, VideoBundle};
