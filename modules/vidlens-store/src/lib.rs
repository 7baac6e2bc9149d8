//! Artifact store — keyed persistence for enrichment inputs and outputs.
//!
//! The pipeline only needs a key-value contract: insight records, scored
//! collections, and summaries keyed by video id, plus one corpus-wide key
//! for the meta report. `MemoryStore` backs tests; `PgStore` backs
//! production with a single JSONB table.

pub mod memory;
pub mod pg;
pub mod store;

pub use memory::MemoryStore;
pub use pg::PgStore;
pub use store::ArtifactStore;
