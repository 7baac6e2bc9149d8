//! Per-video enrichment fan-out plus the sequential meta-intelligence stage.
//!
//! Each video's pipeline (classify, score, summarize, persist) is independent
//! and idempotent, so videos run concurrently with a bounded worker pool.
//! The meta report is a corpus-wide reduce and runs once, after the fan-out.

use anyhow::{anyhow, Context, Result};
use futures::stream::{self, StreamExt};
use tracing::{info, warn};

use vidlens_common::types::Classification;
use vidlens_common::version::VersionStamp;
use vidlens_common::EnrichPolicy;
use vidlens_enrich::{classify, summarize, Scorer};
use vidlens_meta::{aggregate, VideoBundle};
use vidlens_store::ArtifactStore;

use crate::run_log::{EventKind, RunLog};

/// Flags controlling one run.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Recompute every video and the meta report even when artifacts are
    /// current. Artifact consumers must tolerate this at any time.
    pub force: bool,
    /// Restrict the per-video stage to these ids. The meta stage still
    /// aggregates the whole corpus — it is never partial.
    pub video_ids: Option<Vec<String>>,
}

#[derive(Debug, Default)]
pub struct RunReport {
    pub videos_total: u32,
    pub videos_processed: u32,
    pub videos_skipped_cache_hit: u32,
    pub videos_failed: u32,
    pub insights_scored: u32,
    pub insights_skipped_malformed: u32,
    pub meta_report_rebuilt: bool,
    /// Videos contributing to the meta report, when it was rebuilt.
    pub meta_video_count: u32,
}

impl std::fmt::Display for RunReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "\n=== Enrichment Run Complete ===")?;
        writeln!(f, "Videos total:       {}", self.videos_total)?;
        writeln!(f, "Processed:          {}", self.videos_processed)?;
        writeln!(f, "Cache hits:         {}", self.videos_skipped_cache_hit)?;
        writeln!(f, "Failed:             {}", self.videos_failed)?;
        writeln!(f, "Insights scored:    {}", self.insights_scored)?;
        writeln!(f, "Malformed skipped:  {}", self.insights_skipped_malformed)?;
        if self.meta_report_rebuilt {
            writeln!(
                f,
                "Meta report:        rebuilt from {} videos",
                self.meta_video_count
            )?;
        } else {
            writeln!(f, "Meta report:        current, reused")?;
        }
        Ok(())
    }
}

/// Result of one video's trip through the pipeline. Failures are isolated —
/// one bad video never stops the run.
enum VideoOutcome {
    Processed {
        classification: Classification,
        insights_scored: u32,
        skipped_malformed: u32,
    },
    CacheHit,
    Failed {
        reason: String,
    },
}

pub struct Runner<S> {
    store: S,
    scorer: Scorer,
    policy: EnrichPolicy,
    workers: usize,
}

impl<S: ArtifactStore> Runner<S> {
    pub fn new(store: S, scorer: Scorer, policy: EnrichPolicy, workers: usize) -> Self {
        Self {
            store,
            scorer,
            policy,
            workers: workers.max(1),
        }
    }

    /// Execute the full pipeline. Per-video failures are counted and the run
    /// continues; a meta-aggregation failure fails the run, because a stale
    /// report silently served as current is worse than a visible error.
    pub async fn run(&self, options: &RunOptions, log: &mut RunLog) -> Result<RunReport> {
        let mut ids = self
            .store
            .video_ids()
            .await
            .context("listing video ids")?;
        if let Some(filter) = &options.video_ids {
            ids.retain(|id| filter.contains(id));
        }
        info!(videos = ids.len(), force = options.force, "Enrichment run starting");

        let mut report = RunReport {
            videos_total: ids.len() as u32,
            ..RunReport::default()
        };

        // Fan out per video; collect outcomes, then tally and log
        // sequentially in id order so the run log is deterministic.
        let mut outcomes: Vec<(String, VideoOutcome)> =
            stream::iter(ids.into_iter().map(|video_id| async move {
                let outcome = self.enrich_video(&video_id, options.force).await;
                (video_id, outcome)
            }))
            .buffer_unordered(self.workers)
            .collect()
            .await;
        outcomes.sort_by(|a, b| a.0.cmp(&b.0));

        for (video_id, outcome) in outcomes {
            match outcome {
                VideoOutcome::Processed {
                    classification,
                    insights_scored,
                    skipped_malformed,
                } => {
                    report.videos_processed += 1;
                    report.insights_scored += insights_scored;
                    report.insights_skipped_malformed += skipped_malformed;
                    log.log(EventKind::VideoProcessed {
                        video_id,
                        video_type: classification.video_type.to_string(),
                        confidence: classification.confidence,
                        insights_scored,
                        skipped_malformed,
                    });
                }
                VideoOutcome::CacheHit => {
                    report.videos_skipped_cache_hit += 1;
                    log.log(EventKind::VideoCacheHit { video_id });
                }
                VideoOutcome::Failed { reason } => {
                    report.videos_failed += 1;
                    log.log(EventKind::VideoFailed { video_id, reason });
                }
            }
        }

        self.rebuild_meta(options.force, &mut report, log).await?;

        info!(
            processed = report.videos_processed,
            cache_hits = report.videos_skipped_cache_hit,
            failed = report.videos_failed,
            meta_rebuilt = report.meta_report_rebuilt,
            "Enrichment run finished"
        );
        Ok(report)
    }

    async fn enrich_video(&self, video_id: &str, force: bool) -> VideoOutcome {
        match self.enrich_video_inner(video_id, force).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(video_id, error = %e, "Video enrichment failed");
                VideoOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }

    async fn enrich_video_inner(&self, video_id: &str, force: bool) -> Result<VideoOutcome> {
        let registry_version = self.scorer.registry().version;

        if !force {
            let scored = self.store.scored(video_id).await?;
            let summary = self.store.summary(video_id).await?;
            if let (Some(scored), Some(summary)) = (scored, summary) {
                if scored.stamp.is_current(registry_version)
                    && summary.stamp.is_current(registry_version)
                {
                    return Ok(VideoOutcome::CacheHit);
                }
            }
        }

        let record = self
            .store
            .record(video_id)
            .await?
            .ok_or_else(|| anyhow!("insight record missing"))?;

        let classification = classify(&record);
        let scored = self.scorer.score_video(&record, classification);
        let summary = summarize(
            video_id,
            classification,
            &scored.insights,
            &self.policy,
            VersionStamp::now(registry_version),
        );

        // Scored collection first: a summary must never outlive the scored
        // insights it was derived from.
        self.store.put_scored(&scored).await?;
        self.store.put_summary(&summary).await?;

        Ok(VideoOutcome::Processed {
            classification,
            insights_scored: scored.insights.len() as u32,
            skipped_malformed: scored.skipped_malformed,
        })
    }

    /// Rebuild the meta report when any video was processed this run, when
    /// no current report exists, or when forced. Always a full recompute
    /// over every summarized video.
    async fn rebuild_meta(
        &self,
        force: bool,
        report: &mut RunReport,
        log: &mut RunLog,
    ) -> Result<()> {
        let registry_version = self.scorer.registry().version;
        let existing_current = self
            .store
            .meta_report()
            .await?
            .map(|r| r.stamp.is_current(registry_version))
            .unwrap_or(false);

        if report.videos_processed == 0 && existing_current && !force {
            log.log(EventKind::MetaReportReused);
            return Ok(());
        }

        let summaries = self.store.summaries().await?;
        let mut bundles = Vec::with_capacity(summaries.len());
        for summary in summaries {
            match self.store.scored(&summary.video_id).await? {
                Some(scored) => bundles.push(VideoBundle {
                    summary,
                    insights: scored.insights,
                }),
                None => {
                    // Summary without its scored collection is an input gap,
                    // not a fatal error; the video is excluded this run.
                    warn!(
                        video_id = summary.video_id.as_str(),
                        "Scored insights missing for summarized video, excluding from aggregation"
                    );
                }
            }
        }

        let meta = aggregate(&bundles, VersionStamp::now(registry_version))
            .context("meta-intelligence aggregation")?;
        self.store
            .put_meta_report(&meta)
            .await
            .context("persisting meta report")?;

        report.meta_report_rebuilt = true;
        report.meta_video_count = meta.video_count;
        log.log(EventKind::MetaReportRebuilt {
            videos: meta.video_count,
            trends: meta.trends.len() as u32,
            products: meta.product_ecosystem.len() as u32,
            playbooks: meta.strategy_playbooks.len() as u32,
        });
        Ok(())
    }
}
