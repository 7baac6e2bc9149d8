//! Video summarizer — folds one video's scored insights into a single
//! summary document. Deterministic by construction: stable sorts, exact
//! counts, and ordered collections, so re-running on unchanged scored
//! insights produces byte-identical output aside from `computed_at`.

use std::collections::{BTreeMap, BTreeSet};

use vidlens_common::normalize::{normalize_name, snippet};
use vidlens_common::registry;
use vidlens_common::types::{
    Classification, InsightCategory, MetricsSummary, OpportunityCounts, ScoredInsight,
    VideoSummary,
};
use vidlens_common::version::VersionStamp;
use vidlens_common::EnrichPolicy;

const KEY_TAKEAWAY_COUNT: usize = 5;
const NEXT_STEP_COUNT: usize = 5;
const NEXT_STEP_MAX_CHARS: usize = 140;

/// Build the summary for one video from its scored insights.
pub fn summarize(
    video_id: &str,
    classification: Classification,
    insights: &[ScoredInsight],
    policy: &EnrichPolicy,
    stamp: VersionStamp,
) -> VideoSummary {
    // Top 5 by composite. Stable sort keeps insertion order on ties, which
    // keeps output identical across runs.
    let mut ranked: Vec<&ScoredInsight> = insights.iter().collect();
    ranked.sort_by(|a, b| {
        b.composite()
            .partial_cmp(&a.composite())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    let key_takeaways: Vec<ScoredInsight> = ranked
        .iter()
        .take(KEY_TAKEAWAY_COUNT)
        .map(|i| (*i).clone())
        .collect();

    // Unbounded, unlike key_takeaways: everything over the threshold.
    let standout_insights: Vec<ScoredInsight> = insights
        .iter()
        .filter(|i| i.composite() > policy.standout_threshold)
        .cloned()
        .collect();

    VideoSummary {
        video_id: video_id.to_string(),
        video_type: classification.video_type,
        type_confidence: classification.confidence,
        content_profile: content_profile(classification, insights),
        key_takeaways,
        standout_insights,
        opportunity_map: opportunity_map(insights),
        metrics_summary: metrics_summary(insights, policy),
        practical_next_steps: next_steps(&ranked),
        related_keywords: related_keywords(insights),
        stamp,
    }
}

fn content_profile(classification: Classification, insights: &[ScoredInsight]) -> String {
    let categories: BTreeSet<InsightCategory> = insights.iter().map(|i| i.category).collect();
    format!(
        "{} (confidence {:.2}): {} insights across {} categories",
        classification.video_type,
        classification.confidence,
        insights.len(),
        categories.len()
    )
}

/// Startup ideas, market gaps (problems explicitly lacking a validated
/// solution), and trends flagged as actionable opportunities.
fn opportunity_map(insights: &[ScoredInsight]) -> OpportunityCounts {
    let mut startup_ideas = 0u32;
    let mut market_gaps = 0u32;
    let mut trend_opportunities = 0u32;

    for insight in insights {
        match insight.category {
            InsightCategory::StartupIdeas => startup_ideas += 1,
            InsightCategory::ProblemsSolutions => {
                if insight.item.has_validated_solution == Some(false) {
                    market_gaps += 1;
                }
            }
            InsightCategory::TrendsSignals => {
                if insight.item.actionable_opportunity {
                    trend_opportunities += 1;
                }
            }
            _ => {}
        }
    }

    OpportunityCounts::new(startup_ideas, market_gaps, trend_opportunities)
}

fn metrics_summary(insights: &[ScoredInsight], policy: &EnrichPolicy) -> MetricsSummary {
    let total = insights.len() as u32;
    if total == 0 {
        return MetricsSummary::default();
    }

    let avg_universal = |metric: &str| -> f64 {
        let sum: u32 = insights
            .iter()
            .filter_map(|i| i.universal(metric))
            .map(u32::from)
            .sum();
        sum as f64 / total as f64
    };

    // Type metrics may be absent on some insights (missing key means "not
    // computed", never zero) — average only over insights that carry the key.
    let mut type_sums: BTreeMap<String, (u32, u32)> = BTreeMap::new();
    for insight in insights {
        for (metric, score) in &insight.type_scores {
            let entry = type_sums.entry(metric.clone()).or_default();
            entry.0 += u32::from(*score);
            entry.1 += 1;
        }
    }
    let type_averages: BTreeMap<String, f64> = type_sums
        .into_iter()
        .map(|(metric, (sum, count))| (metric, sum as f64 / count as f64))
        .collect();

    MetricsSummary {
        avg_actionability: avg_universal(registry::ACTIONABILITY),
        avg_specificity: avg_universal(registry::SPECIFICITY),
        avg_evidence: avg_universal(registry::EVIDENCE),
        avg_recency: avg_universal(registry::RECENCY),
        type_averages,
        high_value_count: insights
            .iter()
            .filter(|i| i.composite() > policy.high_value_threshold)
            .count() as u32,
        total_insights: total,
    }
}

/// Concrete follow-ups: the most actionable insights, as short snippets.
fn next_steps(ranked: &[&ScoredInsight]) -> Vec<String> {
    let mut by_actionability: Vec<&ScoredInsight> = ranked.to_vec();
    by_actionability.sort_by_key(|i| std::cmp::Reverse(i.universal(registry::ACTIONABILITY)));
    by_actionability
        .iter()
        .filter(|i| i.universal(registry::ACTIONABILITY).unwrap_or(0) >= 60)
        .take(NEXT_STEP_COUNT)
        .filter_map(|i| i.item.scoring_text())
        .map(|t| snippet(t, NEXT_STEP_MAX_CHARS))
        .collect()
}

/// Normalized product and trend names, deduplicated and sorted.
fn related_keywords(insights: &[ScoredInsight]) -> Vec<String> {
    let keywords: BTreeSet<String> = insights
        .iter()
        .filter(|i| {
            matches!(
                i.category,
                InsightCategory::ProductsTools | InsightCategory::TrendsSignals
            )
        })
        .filter_map(|i| i.item.name.as_deref())
        .map(normalize_name)
        .filter(|k| !k.is_empty())
        .collect();
    keywords.into_iter().collect()
}
