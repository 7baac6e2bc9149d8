use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use vidlens_common::types::{InsightRecord, MetaIntelligenceReport, ScoredVideo, VideoSummary};

/// Keyed persistence for every artifact kind the pipeline reads or writes.
///
/// Writes are last-writer-wins per key; per-video artifacts are independently
/// idempotent so no further isolation is required. Implemented by `PgStore`
/// (production) and `MemoryStore` (tests).
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Seed or replace a raw insight record. Normally the upstream
    /// extractor's job; exposed for ingestion tooling and tests.
    async fn put_record(&self, record: &InsightRecord) -> Result<()>;

    async fn record(&self, video_id: &str) -> Result<Option<InsightRecord>>;

    /// Every video id with an insight record, sorted for deterministic runs.
    async fn video_ids(&self) -> Result<Vec<String>>;

    async fn put_scored(&self, scored: &ScoredVideo) -> Result<()>;

    async fn scored(&self, video_id: &str) -> Result<Option<ScoredVideo>>;

    async fn put_summary(&self, summary: &VideoSummary) -> Result<()>;

    async fn summary(&self, video_id: &str) -> Result<Option<VideoSummary>>;

    /// Every current video summary, sorted by video id.
    async fn summaries(&self) -> Result<Vec<VideoSummary>>;

    async fn put_meta_report(&self, report: &MetaIntelligenceReport) -> Result<()>;

    async fn meta_report(&self) -> Result<Option<MetaIntelligenceReport>>;
}

// Arc blanket — lets the runner and tests share one store.
#[async_trait]
impl<S: ArtifactStore + ?Sized> ArtifactStore for Arc<S> {
    async fn put_record(&self, record: &InsightRecord) -> Result<()> {
        (**self).put_record(record).await
    }

    async fn record(&self, video_id: &str) -> Result<Option<InsightRecord>> {
        (**self).record(video_id).await
    }

    async fn video_ids(&self) -> Result<Vec<String>> {
        (**self).video_ids().await
    }

    async fn put_scored(&self, scored: &ScoredVideo) -> Result<()> {
        (**self).put_scored(scored).await
    }

    async fn scored(&self, video_id: &str) -> Result<Option<ScoredVideo>> {
        (**self).scored(video_id).await
    }

    async fn put_summary(&self, summary: &VideoSummary) -> Result<()> {
        (**self).put_summary(summary).await
    }

    async fn summary(&self, video_id: &str) -> Result<Option<VideoSummary>> {
        (**self).summary(video_id).await
    }

    async fn summaries(&self) -> Result<Vec<VideoSummary>> {
        (**self).summaries().await
    }

    async fn put_meta_report(&self, report: &MetaIntelligenceReport) -> Result<()> {
        (**self).put_meta_report(report).await
    }

    async fn meta_report(&self) -> Result<Option<MetaIntelligenceReport>> {
        (**self).meta_report().await
    }
}
