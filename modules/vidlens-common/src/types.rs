use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::version::VersionStamp;

// --- Enums ---

/// Primary classification of a video, assigned per video with a confidence.
/// `Unknown` means "not confidently known" — only universal metrics apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum VideoType {
    Entrepreneurship,
    MarketResearch,
    Tutorial,
    Interview,
    Unknown,
}

impl std::fmt::Display for VideoType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VideoType::Entrepreneurship => write!(f, "entrepreneurship"),
            VideoType::MarketResearch => write!(f, "market_research"),
            VideoType::Tutorial => write!(f, "tutorial"),
            VideoType::Interview => write!(f, "interview"),
            VideoType::Unknown => write!(f, "unknown"),
        }
    }
}

/// The category an insight item was extracted under. Closed set — the
/// upstream extractor owns the taxonomy, we own the scoring rules per entry.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum InsightCategory {
    ProductsTools,
    StartupIdeas,
    TrendsSignals,
    GrowthTactics,
    AiWorkflows,
    BusinessStrategies,
    ActionableQuotes,
    KeyStatistics,
    ProblemsSolutions,
    TargetMarkets,
}

impl InsightCategory {
    pub const ALL: [InsightCategory; 10] = [
        InsightCategory::ProductsTools,
        InsightCategory::StartupIdeas,
        InsightCategory::TrendsSignals,
        InsightCategory::GrowthTactics,
        InsightCategory::AiWorkflows,
        InsightCategory::BusinessStrategies,
        InsightCategory::ActionableQuotes,
        InsightCategory::KeyStatistics,
        InsightCategory::ProblemsSolutions,
        InsightCategory::TargetMarkets,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InsightCategory::ProductsTools => "products_tools",
            InsightCategory::StartupIdeas => "startup_ideas",
            InsightCategory::TrendsSignals => "trends_signals",
            InsightCategory::GrowthTactics => "growth_tactics",
            InsightCategory::AiWorkflows => "ai_workflows",
            InsightCategory::BusinessStrategies => "business_strategies",
            InsightCategory::ActionableQuotes => "actionable_quotes",
            InsightCategory::KeyStatistics => "key_statistics",
            InsightCategory::ProblemsSolutions => "problems_solutions",
            InsightCategory::TargetMarkets => "target_markets",
        }
    }
}

impl std::fmt::Display for InsightCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Sentiment is categorical in the source data. Aggregates keep it as a
/// distribution rather than averaging it into a meaningless scalar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

// --- Insight Record (input, owned by the upstream extractor) ---

/// One extracted insight item. All fields are optional free-form extractor
/// output; which ones are required depends on the category (the scorer's
/// strategy table decides).
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct InsightItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<Sentiment>,
    /// Lifecycle stage for trend items (e.g. "emerging", "mainstream").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,
    /// Free-form topical label the extractor attaches (e.g. "ai", "marketing").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    /// How many times the entity was mentioned in the transcript.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mentions: Option<u32>,
    /// Named source the item cites, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Trend items the extractor flagged as an actionable opportunity.
    #[serde(default)]
    pub actionable_opportunity: bool,
    /// For problems_solutions: whether a validated solution was presented.
    /// None means the extractor did not assess it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_validated_solution: Option<bool>,
}

impl InsightItem {
    /// The best available text for heuristic scoring: description/quote body,
    /// falling back to the name.
    pub fn scoring_text(&self) -> Option<&str> {
        self.text.as_deref().or(self.name.as_deref())
    }
}

/// The raw, category-structured extraction output for one video. Immutable
/// once produced upstream; this system never modifies it.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct InsightRecord {
    pub video_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub categories: BTreeMap<InsightCategory, Vec<InsightItem>>,
}

impl InsightRecord {
    pub fn items(&self, category: InsightCategory) -> &[InsightItem] {
        self.categories.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn total_items(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }
}

// --- Classification ---

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Classification {
    pub video_type: VideoType,
    pub confidence: f32,
}

impl Classification {
    pub fn unknown() -> Self {
        Self {
            video_type: VideoType::Unknown,
            confidence: 0.0,
        }
    }
}

// --- Scored Insight ---

/// One input insight item annotated with computed metric values.
/// A missing metric key means "not yet computed", never zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredInsight {
    pub id: Uuid,
    pub category: InsightCategory,
    pub item: InsightItem,
    /// Universal metrics, present for every scored insight.
    pub universal_scores: BTreeMap<String, u8>,
    /// Type-specific metrics. Empty unless the owning video's type is
    /// confidently known and the metric applies to it.
    pub type_scores: BTreeMap<String, u8>,
}

impl ScoredInsight {
    pub fn universal(&self, metric: &str) -> Option<u8> {
        self.universal_scores.get(metric).copied()
    }

    /// Ranking composite: equal-weight mean of actionability and evidence.
    pub fn composite(&self) -> f64 {
        let a = self.universal(crate::registry::ACTIONABILITY).unwrap_or(0) as f64;
        let e = self.universal(crate::registry::EVIDENCE).unwrap_or(0) as f64;
        (a + e) / 2.0
    }
}

/// The persisted per-video scoring artifact: every scored insight for one
/// video plus version metadata. Superseded whole on re-run, never merged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredVideo {
    pub video_id: String,
    pub classification: Classification,
    pub insights: Vec<ScoredInsight>,
    /// Items skipped as malformed (missing required fields). Kept as a count
    /// so downstream consumers can see the gap without the bad data.
    pub skipped_malformed: u32,
    pub stamp: VersionStamp,
}

// --- Opportunity counts ---

/// Counts of opportunity-bearing insights. `total` is derived and must never
/// drift from the sum — construct through `new` only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct OpportunityCounts {
    pub startup_ideas: u32,
    pub market_gaps: u32,
    pub trend_opportunities: u32,
    pub total: u32,
}

impl OpportunityCounts {
    pub fn new(startup_ideas: u32, market_gaps: u32, trend_opportunities: u32) -> Self {
        Self {
            startup_ideas,
            market_gaps,
            trend_opportunities,
            total: startup_ideas + market_gaps + trend_opportunities,
        }
    }

    pub fn accumulate(&mut self, other: &OpportunityCounts) {
        self.startup_ideas += other.startup_ideas;
        self.market_gaps += other.market_gaps;
        self.trend_opportunities += other.trend_opportunities;
        self.total = self.startup_ideas + self.market_gaps + self.trend_opportunities;
    }
}

// --- Video Summary ---

/// Arithmetic means of universal metrics across one video's scored insights,
/// plus exact counts. Type-metric averages are empty for videos scored
/// universal-only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub avg_actionability: f64,
    pub avg_specificity: f64,
    pub avg_evidence: f64,
    pub avg_recency: f64,
    pub type_averages: BTreeMap<String, f64>,
    pub high_value_count: u32,
    pub total_insights: u32,
}

/// The single aggregated document describing one video's enrichment results.
/// Derived entirely from that video's scored insights; regenerated whenever
/// they change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoSummary {
    pub video_id: String,
    pub video_type: VideoType,
    pub type_confidence: f32,
    pub content_profile: String,
    /// Top 5 by composite score, stable order.
    pub key_takeaways: Vec<ScoredInsight>,
    /// Every insight whose composite exceeds the standout threshold. Unbounded.
    pub standout_insights: Vec<ScoredInsight>,
    pub opportunity_map: OpportunityCounts,
    pub metrics_summary: MetricsSummary,
    pub practical_next_steps: Vec<String>,
    pub related_keywords: Vec<String>,
    pub stamp: VersionStamp,
}

// --- Meta-Intelligence Report ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendEntry {
    pub name: String,
    /// Number of distinct videos mentioning this trend.
    pub frequency: u32,
    pub stage: Option<String>,
    pub category: Option<String>,
    pub example_video_ids: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SentimentDistribution {
    pub positive: u32,
    pub neutral: u32,
    pub negative: u32,
}

impl SentimentDistribution {
    pub fn record(&mut self, sentiment: Option<Sentiment>) {
        match sentiment {
            Some(Sentiment::Positive) => self.positive += 1,
            Some(Sentiment::Negative) => self.negative += 1,
            Some(Sentiment::Neutral) | None => self.neutral += 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductEntry {
    pub name: String,
    pub mention_count: u32,
    pub sentiment_distribution: SentimentDistribution,
    pub use_cases: Vec<String>,
}

/// A recurring strategic pattern observed across at least three distinct
/// videos. The threshold resists over-fitting to one creator's advice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Playbook {
    pub name: String,
    pub pattern_description: String,
    pub supporting_video_ids: Vec<String>,
    pub recurrence_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsensusEntry {
    pub topic: String,
    /// Fraction of matching quotes expressing the majority stance.
    pub agreement_score: f64,
    pub supporting_quotes: Vec<String>,
    pub dissenting_quotes: Vec<String>,
}

/// The corpus-wide singleton. Always a full recompute from current video
/// summaries, never a partial patch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetaIntelligenceReport {
    pub trends: Vec<TrendEntry>,
    pub product_ecosystem: Vec<ProductEntry>,
    pub strategy_playbooks: Vec<Playbook>,
    pub expert_consensus: Vec<ConsensusEntry>,
    pub opportunity_matrix: OpportunityCounts,
    pub video_count: u32,
    pub stamp: VersionStamp,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opportunity_total_never_drifts() {
        let counts = OpportunityCounts::new(3, 2, 4);
        assert_eq!(counts.total, 9);

        let mut acc = OpportunityCounts::default();
        acc.accumulate(&counts);
        acc.accumulate(&OpportunityCounts::new(1, 0, 2));
        assert_eq!(acc.total, acc.startup_ideas + acc.market_gaps + acc.trend_opportunities);
        assert_eq!(acc.total, 12);
    }

    #[test]
    fn category_serializes_snake_case() {
        let json = serde_json::to_string(&InsightCategory::ProductsTools).unwrap();
        assert_eq!(json, "\"products_tools\"");
        let json = serde_json::to_string(&InsightCategory::ProblemsSolutions).unwrap();
        assert_eq!(json, "\"problems_solutions\"");
    }

    #[test]
    fn record_items_empty_for_absent_category() {
        let record = InsightRecord {
            video_id: "v1".to_string(),
            title: None,
            description: None,
            categories: BTreeMap::new(),
        };
        assert!(record.items(InsightCategory::StartupIdeas).is_empty());
        assert_eq!(record.total_items(), 0);
    }

    #[test]
    fn scoring_text_falls_back_to_name() {
        let item = InsightItem {
            name: Some("Notion".to_string()),
            ..Default::default()
        };
        assert_eq!(item.scoring_text(), Some("Notion"));

        let item = InsightItem::default();
        assert_eq!(item.scoring_text(), None);
    }

    #[test]
    fn sentiment_distribution_counts_none_as_neutral() {
        let mut dist = SentimentDistribution::default();
        dist.record(Some(Sentiment::Positive));
        dist.record(None);
        dist.record(Some(Sentiment::Negative));
        assert_eq!(dist.positive, 1);
        assert_eq!(dist.neutral, 1);
        assert_eq!(dist.negative, 1);
    }
}
