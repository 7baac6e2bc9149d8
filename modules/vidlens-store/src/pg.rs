//! Postgres-backed artifact store. One JSONB table keyed by
//! `(video_id, kind)`; the meta report lives under a fixed corpus key.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::PgPool;
use tracing::info;

use vidlens_common::types::{InsightRecord, MetaIntelligenceReport, ScoredVideo, VideoSummary};

use crate::store::ArtifactStore;

const KIND_RECORD: &str = "record";
const KIND_SCORED: &str = "scored";
const KIND_SUMMARY: &str = "summary";
const KIND_META: &str = "meta_report";

/// Fixed singleton key for the corpus-wide report.
const CORPUS_KEY: &str = "_corpus";

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPool::connect(database_url)
            .await
            .context("Failed to connect to Postgres")?;
        Ok(Self::new(pool))
    }

    /// Create the artifacts table if it does not exist. Idempotent.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS artifacts (
                video_id   TEXT NOT NULL,
                kind       TEXT NOT NULL,
                payload    JSONB NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                PRIMARY KEY (video_id, kind)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;
        info!("Artifact store schema ready");
        Ok(())
    }

    async fn put<T: Serialize>(&self, video_id: &str, kind: &str, value: &T) -> Result<()> {
        let payload = serde_json::to_value(value)?;
        sqlx::query(
            r#"
            INSERT INTO artifacts (video_id, kind, payload, updated_at)
            VALUES ($1, $2, $3, now())
            ON CONFLICT (video_id, kind)
            DO UPDATE SET payload = EXCLUDED.payload, updated_at = now()
            "#,
        )
        .bind(video_id)
        .bind(kind)
        .bind(payload)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get<T: DeserializeOwned>(&self, video_id: &str, kind: &str) -> Result<Option<T>> {
        let row = sqlx::query_as::<_, (serde_json::Value,)>(
            "SELECT payload FROM artifacts WHERE video_id = $1 AND kind = $2",
        )
        .bind(video_id)
        .bind(kind)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some((payload,)) => {
                let value = serde_json::from_value(payload)
                    .with_context(|| format!("corrupt {kind} payload for {video_id}"))?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }
}

#[async_trait]
impl ArtifactStore for PgStore {
    async fn put_record(&self, record: &InsightRecord) -> Result<()> {
        self.put(&record.video_id, KIND_RECORD, record).await
    }

    async fn record(&self, video_id: &str) -> Result<Option<InsightRecord>> {
        self.get(video_id, KIND_RECORD).await
    }

    async fn video_ids(&self) -> Result<Vec<String>> {
        let rows = sqlx::query_as::<_, (String,)>(
            "SELECT video_id FROM artifacts WHERE kind = $1 ORDER BY video_id",
        )
        .bind(KIND_RECORD)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    async fn put_scored(&self, scored: &ScoredVideo) -> Result<()> {
        self.put(&scored.video_id, KIND_SCORED, scored).await
    }

    async fn scored(&self, video_id: &str) -> Result<Option<ScoredVideo>> {
        self.get(video_id, KIND_SCORED).await
    }

    async fn put_summary(&self, summary: &VideoSummary) -> Result<()> {
        self.put(&summary.video_id, KIND_SUMMARY, summary).await
    }

    async fn summary(&self, video_id: &str) -> Result<Option<VideoSummary>> {
        self.get(video_id, KIND_SUMMARY).await
    }

    async fn summaries(&self) -> Result<Vec<VideoSummary>> {
        let rows = sqlx::query_as::<_, (serde_json::Value,)>(
            "SELECT payload FROM artifacts WHERE kind = $1 ORDER BY video_id",
        )
        .bind(KIND_SUMMARY)
        .fetch_all(&self.pool)
        .await?;

        let mut summaries = Vec::with_capacity(rows.len());
        for (payload,) in rows {
            summaries.push(serde_json::from_value(payload).context("corrupt summary payload")?);
        }
        Ok(summaries)
    }

    async fn put_meta_report(&self, report: &MetaIntelligenceReport) -> Result<()> {
        self.put(CORPUS_KEY, KIND_META, report).await
    }

    async fn meta_report(&self) -> Result<Option<MetaIntelligenceReport>> {
        self.get(CORPUS_KEY, KIND_META).await
    }
}
