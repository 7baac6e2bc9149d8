//! In-memory store for tests. No database required.

use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;

use anyhow::{bail, Result};
use async_trait::async_trait;

use vidlens_common::types::{InsightRecord, MetaIntelligenceReport, ScoredVideo, VideoSummary};

use crate::store::ArtifactStore;

/// Thread-safe in-memory implementation of `ArtifactStore`.
///
/// BTreeMaps keep listing order deterministic. `poison_record` makes a
/// specific record unreadable so tests can exercise the
/// video-processing-failure path.
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<BTreeMap<String, InsightRecord>>,
    scored: Mutex<BTreeMap<String, ScoredVideo>>,
    summaries: Mutex<BTreeMap<String, VideoSummary>>,
    meta: Mutex<Option<MetaIntelligenceReport>>,
    poisoned: Mutex<HashSet<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `record(video_id)` fail as if the stored payload were corrupt.
    pub fn poison_record(&self, video_id: &str) {
        self.poisoned.lock().unwrap().insert(video_id.to_string());
    }
}

#[async_trait]
impl ArtifactStore for MemoryStore {
    async fn put_record(&self, record: &InsightRecord) -> Result<()> {
        self.records
            .lock()
            .unwrap()
            .insert(record.video_id.clone(), record.clone());
        Ok(())
    }

    async fn record(&self, video_id: &str) -> Result<Option<InsightRecord>> {
        if self.poisoned.lock().unwrap().contains(video_id) {
            bail!("corrupt insight record payload for {video_id}");
        }
        Ok(self.records.lock().unwrap().get(video_id).cloned())
    }

    async fn video_ids(&self) -> Result<Vec<String>> {
        Ok(self.records.lock().unwrap().keys().cloned().collect())
    }

    async fn put_scored(&self, scored: &ScoredVideo) -> Result<()> {
        self.scored
            .lock()
            .unwrap()
            .insert(scored.video_id.clone(), scored.clone());
        Ok(())
    }

    async fn scored(&self, video_id: &str) -> Result<Option<ScoredVideo>> {
        Ok(self.scored.lock().unwrap().get(video_id).cloned())
    }

    async fn put_summary(&self, summary: &VideoSummary) -> Result<()> {
        self.summaries
            .lock()
            .unwrap()
            .insert(summary.video_id.clone(), summary.clone());
        Ok(())
    }

    async fn summary(&self, video_id: &str) -> Result<Option<VideoSummary>> {
        Ok(self.summaries.lock().unwrap().get(video_id).cloned())
    }

    async fn summaries(&self) -> Result<Vec<VideoSummary>> {
        Ok(self.summaries.lock().unwrap().values().cloned().collect())
    }

    async fn put_meta_report(&self, report: &MetaIntelligenceReport) -> Result<()> {
        *self.meta.lock().unwrap() = Some(report.clone());
        Ok(())
    }

    async fn meta_report(&self) -> Result<Option<MetaIntelligenceReport>> {
        Ok(self.meta.lock().unwrap().clone())
    }
}
