//! Enrichment run log — persisted JSON timeline of every action taken
//! during a run.
//!
//! Each run produces a single `{DATA_DIR}/enrichment-runs/{run_id}.json`
//! file containing an ordered list of events with timestamps plus the
//! final run totals.

use std::path::PathBuf;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::runner::RunReport;

/// Root data directory, controlled by `DATA_DIR` env var (default: `"data"`).
pub fn data_dir() -> PathBuf {
    PathBuf::from(std::env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string()))
}

pub struct RunLog {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    events: Vec<RunEvent>,
    seq: u32,
}

#[derive(Serialize)]
struct RunEvent {
    seq: u32,
    ts: DateTime<Utc>,
    #[serde(flatten)]
    kind: EventKind,
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    VideoProcessed {
        video_id: String,
        video_type: String,
        confidence: f32,
        insights_scored: u32,
        skipped_malformed: u32,
    },
    VideoCacheHit {
        video_id: String,
    },
    VideoFailed {
        video_id: String,
        reason: String,
    },
    MetaReportRebuilt {
        videos: u32,
        trends: u32,
        products: u32,
        playbooks: u32,
    },
    MetaReportReused,
}

impl RunLog {
    pub fn new(run_id: String) -> Self {
        Self {
            run_id,
            started_at: Utc::now(),
            events: Vec::new(),
            seq: 0,
        }
    }

    pub fn log(&mut self, kind: EventKind) {
        self.events.push(RunEvent {
            seq: self.seq,
            ts: Utc::now(),
            kind,
        });
        self.seq += 1;
    }

    /// Serialize the run log to JSON and write to disk.
    /// Returns the file path on success.
    pub fn save(&self, report: &RunReport) -> Result<PathBuf> {
        let dir = data_dir().join("enrichment-runs");
        std::fs::create_dir_all(&dir)?;

        let path = dir.join(format!("{}.json", self.run_id));

        let output = SerializedRunLog {
            run_id: &self.run_id,
            started_at: self.started_at,
            finished_at: Utc::now(),
            totals: SerializedTotals::from(report),
            events: &self.events,
        };

        std::fs::write(&path, serde_json::to_string_pretty(&output)?)?;
        info!(path = %path.display(), events = self.events.len(), "Enrichment run log saved");

        Ok(path)
    }
}

#[derive(Serialize)]
struct SerializedRunLog<'a> {
    run_id: &'a str,
    started_at: DateTime<Utc>,
    finished_at: DateTime<Utc>,
    totals: SerializedTotals,
    events: &'a [RunEvent],
}

#[derive(Serialize)]
struct SerializedTotals {
    videos_total: u32,
    videos_processed: u32,
    videos_skipped_cache_hit: u32,
    videos_failed: u32,
    insights_scored: u32,
    insights_skipped_malformed: u32,
    meta_report_rebuilt: bool,
}

impl From<&RunReport> for SerializedTotals {
    fn from(r: &RunReport) -> Self {
        Self {
            videos_total: r.videos_total,
            videos_processed: r.videos_processed,
            videos_skipped_cache_hit: r.videos_skipped_cache_hit,
            videos_failed: r.videos_failed,
            insights_scored: r.insights_scored,
            insights_skipped_malformed: r.insights_skipped_malformed,
            meta_report_rebuilt: r.meta_report_rebuilt,
        }
    }
}
