//! The meta-intelligence aggregator: reduces every current video summary
//! (joined with its scored-insight collection) into one corpus-wide report.
//!
//! Entity identity is case-insensitive normalized-string equality — an
//! explicit scope limitation. Semantic clustering would change aggregate
//! frequencies and is a versioned algorithm change, not a silent upgrade.

use std::collections::BTreeMap;

use anyhow::Result;
use chrono::{DateTime, Utc};
use tracing::info;

use vidlens_common::normalize::{normalize_name, snippet};
use vidlens_common::types::{
    InsightCategory, MetaIntelligenceReport, OpportunityCounts, Playbook, ProductEntry,
    ScoredInsight, SentimentDistribution, TrendEntry, VideoSummary,
};
use vidlens_common::version::VersionStamp;

use crate::consensus;

/// One video's summary joined with its current scored insights. The summary
/// alone does not carry mention-level trend/product/quote data, so the
/// aggregator consumes the pair.
#[derive(Debug, Clone)]
pub struct VideoBundle {
    pub summary: VideoSummary,
    pub insights: Vec<ScoredInsight>,
}

/// A pattern must recur in at least this many distinct videos before it is
/// promoted to a playbook. Guards against one creator's idiosyncratic advice.
const MIN_PLAYBOOK_VIDEOS: usize = 3;

const EXAMPLE_VIDEO_LIMIT: usize = 5;
const USE_CASE_LIMIT: usize = 5;
const PATTERN_SNIPPET_CHARS: usize = 180;

/// Full corpus reduce. Zero bundles is a valid corpus and produces an empty
/// report, not an error.
pub fn aggregate(bundles: &[VideoBundle], stamp: VersionStamp) -> Result<MetaIntelligenceReport> {
    // Deterministic processing order regardless of how the store returned them.
    let mut ordered: Vec<&VideoBundle> = bundles.iter().collect();
    ordered.sort_by(|a, b| a.summary.video_id.cmp(&b.summary.video_id));

    let mut opportunity_matrix = OpportunityCounts::default();
    for bundle in &ordered {
        opportunity_matrix.accumulate(&bundle.summary.opportunity_map);
    }

    let texts: Vec<&str> = ordered
        .iter()
        .flat_map(|b| b.insights.iter())
        .filter_map(|i| i.item.scoring_text())
        .collect();

    let report = MetaIntelligenceReport {
        trends: trends(&ordered),
        product_ecosystem: products(&ordered),
        strategy_playbooks: playbooks(&ordered),
        expert_consensus: consensus::compute(&texts),
        opportunity_matrix,
        video_count: ordered.len() as u32,
        stamp,
    };

    info!(
        videos = report.video_count,
        trends = report.trends.len(),
        products = report.product_ecosystem.len(),
        playbooks = report.strategy_playbooks.len(),
        "Meta-intelligence report computed"
    );
    Ok(report)
}

// --- Trends ---

#[derive(Default)]
struct TrendAccum {
    display_name: String,
    video_ids: Vec<String>,
    /// (summary computed_at, stage) per mention carrying a stage.
    stages: Vec<(DateTime<Utc>, String)>,
    topics: Vec<String>,
}

fn trends(bundles: &[&VideoBundle]) -> Vec<TrendEntry> {
    let mut accums: BTreeMap<String, TrendAccum> = BTreeMap::new();

    for bundle in bundles {
        for insight in &bundle.insights {
            if insight.category != InsightCategory::TrendsSignals {
                continue;
            }
            let Some(name) = insight.item.name.as_deref() else {
                continue;
            };
            let key = normalize_name(name);
            if key.is_empty() {
                continue;
            }
            let accum = accums.entry(key).or_default();
            if accum.display_name.is_empty() {
                accum.display_name = name.to_string();
            }
            if !accum.video_ids.contains(&bundle.summary.video_id) {
                accum.video_ids.push(bundle.summary.video_id.clone());
            }
            if let Some(stage) = &insight.item.stage {
                accum
                    .stages
                    .push((bundle.summary.stamp.computed_at, stage.clone()));
            }
            if let Some(topic) = &insight.item.topic {
                accum.topics.push(topic.clone());
            }
        }
    }

    let mut entries: Vec<TrendEntry> = accums
        .into_values()
        .map(|accum| {
            let mut example_video_ids = accum.video_ids.clone();
            example_video_ids.sort();
            example_video_ids.truncate(EXAMPLE_VIDEO_LIMIT);
            TrendEntry {
                name: accum.display_name,
                frequency: accum.video_ids.len() as u32,
                stage: resolve_stage(&accum.stages),
                category: majority(&accum.topics),
                example_video_ids,
            }
        })
        .collect();

    entries.sort_by(|a, b| b.frequency.cmp(&a.frequency).then(a.name.cmp(&b.name)));
    entries
}

/// Stage from the most recent mention; when several mentions share that
/// timestamp, majority vote across all mentions decides.
fn resolve_stage(stages: &[(DateTime<Utc>, String)]) -> Option<String> {
    let newest = stages.iter().map(|(ts, _)| *ts).max()?;
    let at_newest: Vec<&String> = stages
        .iter()
        .filter(|(ts, _)| *ts == newest)
        .map(|(_, s)| s)
        .collect();
    match at_newest.as_slice() {
        [only] => Some((*only).clone()),
        _ => majority(&stages.iter().map(|(_, s)| s.clone()).collect::<Vec<_>>()),
    }
}

/// Most frequent value; ties resolve lexicographically for determinism.
fn majority(values: &[String]) -> Option<String> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for v in values {
        *counts.entry(v.as_str()).or_default() += 1;
    }
    counts
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then(b.0.cmp(a.0)))
        .map(|(v, _)| v.to_string())
}

// --- Product ecosystem ---

#[derive(Default)]
struct ProductAccum {
    display_name: String,
    mention_count: u32,
    sentiment: SentimentDistribution,
    use_cases: Vec<String>,
}

fn products(bundles: &[&VideoBundle]) -> Vec<ProductEntry> {
    let mut accums: BTreeMap<String, ProductAccum> = BTreeMap::new();

    for bundle in bundles {
        for insight in &bundle.insights {
            if insight.category != InsightCategory::ProductsTools {
                continue;
            }
            let Some(name) = insight.item.name.as_deref() else {
                continue;
            };
            let key = normalize_name(name);
            if key.is_empty() {
                continue;
            }
            let accum = accums.entry(key).or_default();
            if accum.display_name.is_empty() {
                accum.display_name = name.to_string();
            }
            accum.mention_count += insight.item.mentions.unwrap_or(1);
            // Sentiment stays a distribution — it is categorical in the
            // source data and averaging it would destroy the signal.
            accum.sentiment.record(insight.item.sentiment);
            if let Some(text) = insight.item.text.as_deref() {
                let case = snippet(text, PATTERN_SNIPPET_CHARS);
                if accum.use_cases.len() < USE_CASE_LIMIT && !accum.use_cases.contains(&case) {
                    accum.use_cases.push(case);
                }
            }
        }
    }

    let mut entries: Vec<ProductEntry> = accums
        .into_values()
        .map(|accum| ProductEntry {
            name: accum.display_name,
            mention_count: accum.mention_count,
            sentiment_distribution: accum.sentiment,
            use_cases: accum.use_cases,
        })
        .collect();

    entries.sort_by(|a, b| {
        b.mention_count
            .cmp(&a.mention_count)
            .then(a.name.cmp(&b.name))
    });
    entries
}

// --- Strategy playbooks ---

#[derive(Default)]
struct PlaybookAccum {
    display_name: String,
    video_ids: Vec<String>,
    texts: Vec<String>,
}

fn playbooks(bundles: &[&VideoBundle]) -> Vec<Playbook> {
    let mut accums: BTreeMap<String, PlaybookAccum> = BTreeMap::new();

    for bundle in bundles {
        for insight in &bundle.insights {
            if insight.category != InsightCategory::BusinessStrategies {
                continue;
            }
            let Some(key_source) = insight.item.name.as_deref().or(insight.item.text.as_deref())
            else {
                continue;
            };
            let key = key_phrase(key_source);
            if key.is_empty() {
                continue;
            }
            let accum = accums.entry(key).or_default();
            if accum.display_name.is_empty() {
                accum.display_name = insight
                    .item
                    .name
                    .clone()
                    .unwrap_or_else(|| snippet(key_source, 60));
            }
            if !accum.video_ids.contains(&bundle.summary.video_id) {
                accum.video_ids.push(bundle.summary.video_id.clone());
            }
            if let Some(text) = insight.item.text.as_deref() {
                accum.texts.push(text.to_string());
            }
        }
    }

    let mut entries: Vec<Playbook> = accums
        .into_values()
        .filter(|accum| accum.video_ids.len() >= MIN_PLAYBOOK_VIDEOS)
        .map(|accum| {
            let mut supporting_video_ids = accum.video_ids.clone();
            supporting_video_ids.sort();
            // Representative detail: the fullest description seen.
            let detail = accum
                .texts
                .iter()
                .max_by_key(|t| t.chars().count())
                .map(|t| snippet(t, PATTERN_SNIPPET_CHARS));
            let pattern_description = match detail {
                Some(d) => format!(
                    "Recurring strategy across {} videos: {}. {}",
                    accum.video_ids.len(),
                    accum.display_name,
                    d
                ),
                None => format!(
                    "Recurring strategy across {} videos: {}",
                    accum.video_ids.len(),
                    accum.display_name
                ),
            };
            Playbook {
                name: accum.display_name,
                pattern_description,
                recurrence_count: accum.video_ids.len() as u32,
                supporting_video_ids,
            }
        })
        .collect();

    entries.sort_by(|a, b| {
        b.recurrence_count
            .cmp(&a.recurrence_count)
            .then(a.name.cmp(&b.name))
    });
    entries
}

/// Normalized key phrase for strategy clustering: the leading significant
/// tokens of the name (or text fallback), stopwords removed.
fn key_phrase(source: &str) -> String {
    const STOPWORDS: &[&str] = &[
        "a", "an", "the", "to", "of", "for", "and", "your", "you", "with", "on", "in", "by",
    ];
    normalize_name(source)
        .split(' ')
        .filter(|w| !STOPWORDS.contains(w))
        .take(4)
        .collect::<Vec<_>>()
        .join(" ")
}
