//! Insight scorer. Computes universal metrics for every item and
//! type-specific metrics only when the owning video's type is confidently
//! known and the metric applies to it.
//!
//! Scoring rules are resolved per category through a fixed strategy table
//! (`category_rule`), not runtime reflection. A malformed item is skipped
//! with a warning and excluded from every downstream aggregate — it must
//! never silently score as zero, which would corrupt averages.

use chrono::{Datelike, Utc};
use regex::Regex;
use tracing::warn;
use uuid::Uuid;

use vidlens_common::registry::{self, MetricRegistry, MetricScope};
use vidlens_common::types::{
    Classification, InsightCategory, InsightItem, InsightRecord, ScoredInsight, ScoredVideo,
    VideoType,
};
use vidlens_common::version::VersionStamp;
use vidlens_common::{EnrichPolicy, VidlensError};

// --- Category strategy table ---

/// Which field a category requires before an item is scorable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RequiredField {
    /// Entity-like categories: the name identifies the insight.
    Name,
    /// Prose categories: the text carries the insight.
    Text,
    /// Either is acceptable.
    Any,
}

fn category_rule(category: InsightCategory) -> RequiredField {
    match category {
        InsightCategory::ProductsTools | InsightCategory::TargetMarkets => RequiredField::Name,
        InsightCategory::ActionableQuotes | InsightCategory::KeyStatistics => RequiredField::Text,
        InsightCategory::StartupIdeas
        | InsightCategory::TrendsSignals
        | InsightCategory::GrowthTactics
        | InsightCategory::AiWorkflows
        | InsightCategory::BusinessStrategies
        | InsightCategory::ProblemsSolutions => RequiredField::Any,
    }
}

// --- Scorer ---

/// Stateless except for the injected registry, policy, and the regexes
/// compiled once at construction.
pub struct Scorer {
    registry: MetricRegistry,
    policy: EnrichPolicy,
    year_re: Regex,
    number_re: Regex,
    money_re: Regex,
    reference_year: i32,
}

const ACTION_VERBS: &[&str] = &[
    "use ", "build ", "create ", "start ", "launch ", "write ", "test ", "automate", "set up",
    "focus on", "offer ", "charge ", "run ", "publish ", "track ", "validate",
];

const EVIDENCE_MARKERS: &[&str] = &[
    "according to",
    "study",
    "report",
    "survey",
    "research",
    "data from",
    "case study",
];

const GENERIC_FILLER: &[&str] = &[
    "amazing", "incredible", "game changer", "a lot of", "really good", "huge", "crazy",
];

impl Scorer {
    pub fn new(registry: MetricRegistry, policy: EnrichPolicy) -> Self {
        Self {
            registry,
            policy,
            year_re: Regex::new(r"\b(19[89]\d|20\d{2})\b").expect("valid year regex"),
            number_re: Regex::new(r"\d").expect("valid digit regex"),
            money_re: Regex::new(r"[$€£]\s?\d|\d+(\.\d+)?\s?%|\b\d+[kKmM]\b").expect("valid money regex"),
            reference_year: Utc::now().year(),
        }
    }

    /// Pin the year used for recency decay (tests).
    pub fn with_reference_year(mut self, year: i32) -> Self {
        self.reference_year = year;
        self
    }

    pub fn registry(&self) -> &MetricRegistry {
        &self.registry
    }

    /// Score every item of a record. Malformed items are skipped with a
    /// warning and counted, never scored as zero.
    pub fn score_video(&self, record: &InsightRecord, classification: Classification) -> ScoredVideo {
        let mut insights = Vec::with_capacity(record.total_items());
        let mut skipped = 0u32;

        if classification.video_type != VideoType::Unknown
            && classification.confidence < self.policy.confidence_threshold
        {
            warn!(
                video_id = record.video_id.as_str(),
                video_type = %classification.video_type,
                confidence = classification.confidence,
                threshold = self.policy.confidence_threshold,
                "Classification confidence below threshold, scoring universal metrics only"
            );
        }

        for (&category, items) in &record.categories {
            for item in items {
                match self.score_item(item, category, classification) {
                    Ok(scored) => insights.push(scored),
                    Err(e) => {
                        skipped += 1;
                        warn!(
                            video_id = record.video_id.as_str(),
                            category = %category,
                            error = %e,
                            "Skipping malformed insight item"
                        );
                    }
                }
            }
        }

        ScoredVideo {
            video_id: record.video_id.clone(),
            classification,
            insights,
            skipped_malformed: skipped,
            stamp: VersionStamp::now(self.registry.version),
        }
    }

    /// Score one insight item. Type-specific metrics are present iff the
    /// classification is confident and the metric's `applies_to` matches.
    pub fn score_item(
        &self,
        item: &InsightItem,
        category: InsightCategory,
        classification: Classification,
    ) -> Result<ScoredInsight, VidlensError> {
        let text = self.required_text(item, category)?;

        let mut universal_scores = std::collections::BTreeMap::new();
        universal_scores.insert(
            registry::ACTIONABILITY.to_string(),
            self.actionability(text),
        );
        universal_scores.insert(registry::SPECIFICITY.to_string(), self.specificity(text));
        universal_scores.insert(registry::EVIDENCE.to_string(), self.evidence(item, text));
        universal_scores.insert(registry::RECENCY.to_string(), self.recency(text));

        let mut type_scores = std::collections::BTreeMap::new();
        let effective_type = self.effective_type(classification);
        if effective_type != VideoType::Unknown {
            for metric in self.registry.list_metrics(Some(effective_type)) {
                if metric.scope == MetricScope::TypeSpecific {
                    type_scores.insert(
                        metric.name.to_string(),
                        self.type_metric(metric.name, item, text),
                    );
                }
            }
        }

        Ok(ScoredInsight {
            id: Uuid::new_v4(),
            category,
            item: item.clone(),
            universal_scores,
            type_scores,
        })
    }

    /// The type used for metric gating: the classified type only when its
    /// confidence clears the policy threshold, otherwise Unknown.
    fn effective_type(&self, classification: Classification) -> VideoType {
        if classification.confidence >= self.policy.confidence_threshold {
            classification.video_type
        } else {
            VideoType::Unknown
        }
    }

    fn required_text<'a>(
        &self,
        item: &'a InsightItem,
        category: InsightCategory,
    ) -> Result<&'a str, VidlensError> {
        let missing = |field: &str| {
            VidlensError::MalformedInsight(format!("{category} item missing required {field}"))
        };
        match category_rule(category) {
            RequiredField::Name => {
                // Name is identity; text is still preferred for scoring.
                if item.name.as_deref().map_or(true, str::is_empty) {
                    return Err(missing("name"));
                }
                Ok(item.scoring_text().unwrap_or_default())
            }
            RequiredField::Text => item
                .text
                .as_deref()
                .filter(|t| !t.is_empty())
                .ok_or_else(|| missing("text")),
            RequiredField::Any => item
                .scoring_text()
                .filter(|t| !t.is_empty())
                .ok_or_else(|| missing("name or text")),
        }
    }

    // --- Universal heuristics ---

    /// Concrete verbs, numeric targets, named tools — what to *do*.
    fn actionability(&self, text: &str) -> u8 {
        let lower = text.to_lowercase();
        let verb_hits = ACTION_VERBS.iter().filter(|v| lower.contains(**v)).count();
        let mut score = 15u32 + 15 * verb_hits.min(3) as u32;
        if self.number_re.is_match(text) {
            score += 20;
        }
        if has_named_entity(text) {
            score += 15;
        }
        clamp(score)
    }

    /// Density of named entities, numbers, and dates versus generic filler.
    fn specificity(&self, text: &str) -> u8 {
        let lower = text.to_lowercase();
        let mut score = 20u32;
        score += 15 * count_named_entities(text).min(3) as u32;
        if self.number_re.is_match(text) {
            score += 15;
        }
        if self.year_re.is_match(text) {
            score += 10;
        }
        let filler = GENERIC_FILLER.iter().filter(|g| lower.contains(**g)).count() as u32;
        score = score.saturating_sub(10 * filler);
        clamp(score)
    }

    /// Named sources, quoted metrics, corroborating detail.
    fn evidence(&self, item: &InsightItem, text: &str) -> u8 {
        let lower = text.to_lowercase();
        let mut score = 10u32;
        if item.source.as_deref().is_some_and(|s| !s.is_empty()) {
            score += 30;
        }
        let markers = EVIDENCE_MARKERS.iter().filter(|m| lower.contains(**m)).count();
        score += 20 * markers.min(2) as u32;
        if self.money_re.is_match(text) {
            score += 20;
        }
        if item.mentions.unwrap_or(0) >= 3 {
            score += 10;
        }
        clamp(score)
    }

    /// Decays with the age of the newest embedded year reference. No date
    /// reference scores a neutral 50 — absence of a date is not evidence
    /// of staleness.
    fn recency(&self, text: &str) -> u8 {
        let newest = self
            .year_re
            .find_iter(text)
            .filter_map(|m| m.as_str().parse::<i32>().ok())
            .max();
        match newest {
            Some(year) => {
                let age = (self.reference_year - year).max(0) as u32;
                clamp(100u32.saturating_sub(15 * age).max(10))
            }
            None => 50,
        }
    }

    // --- Type-specific heuristics ---

    fn type_metric(&self, name: &str, item: &InsightItem, text: &str) -> u8 {
        let lower = text.to_lowercase();
        match name {
            registry::BUSINESS_VIABILITY => keyword_scale(
                &lower,
                &["revenue", "customers", "demand", "profitable", "business model", "pricing"],
                20,
                20,
            ),
            registry::MARKET_VALIDATION => keyword_scale(
                &lower,
                &["validated", "waitlist", "paying", "traction", "sold", "pre-order", "users"],
                15,
                22,
            ),
            registry::PROFITABILITY => {
                let mut score = keyword_scale(
                    &lower,
                    &["margin", "profit", "mrr", "arr", "recurring", "pricing"],
                    15,
                    20,
                ) as u32;
                if self.money_re.is_match(text) {
                    score += 20;
                }
                clamp(score)
            }
            registry::IMPLEMENTATION_CLARITY => {
                let mut score = keyword_scale(
                    &lower,
                    &["step", "first", "then", "template", "checklist", "tool"],
                    15,
                    18,
                ) as u32;
                if self.number_re.is_match(text) {
                    score += 15;
                }
                clamp(score)
            }
            registry::COMPETITIVE_ANALYSIS => keyword_scale(
                &lower,
                &["competitor", "alternative", "differentiat", "moat", "incumbent", " vs "],
                15,
                22,
            ),
            // Silence about risk is a gap, not neutral — base is low.
            registry::RISK_ASSESSMENT => keyword_scale(
                &lower,
                &["risk", "mitigat", "downside", "churn", "caveat", "fail", "regulat"],
                10,
                25,
            ),
            registry::TREND_STRENGTH => keyword_scale(
                &lower,
                &["growing", "surge", "adoption", "momentum", "accelerat", "exploding"],
                20,
                20,
            ),
            registry::MARKET_EVIDENCE => {
                let mut score = keyword_scale(
                    &lower,
                    &["market size", "billion", "million", "tam", "cagr", "forecast"],
                    15,
                    20,
                ) as u32;
                if self.money_re.is_match(text) {
                    score += 15;
                }
                clamp(score)
            }
            // Unlike universal recency, undated market data reads as stale.
            registry::DATA_RECENCY => match self
                .year_re
                .find_iter(text)
                .filter_map(|m| m.as_str().parse::<i32>().ok())
                .max()
            {
                Some(year) => {
                    let age = (self.reference_year - year).max(0) as u32;
                    clamp(100u32.saturating_sub(20 * age).max(10))
                }
                None => 35,
            },
            registry::REPRODUCIBILITY => {
                let mut score = keyword_scale(
                    &lower,
                    &["step", "install", "click", "copy", "prompt", "settings", "exact"],
                    15,
                    18,
                ) as u32;
                if self.number_re.is_match(text) {
                    score += 10;
                }
                clamp(score)
            }
            registry::PREREQUISITE_CLARITY => keyword_scale(
                &lower,
                &["need", "require", "prerequisite", "account", "api key", "install", "before you"],
                20,
                18,
            ),
            registry::INSIGHT_DEPTH => keyword_scale(
                &lower,
                &["learned", "mistake", "realized", "counterintuitive", "lesson", "wish i"],
                20,
                20,
            ),
            registry::SPEAKER_AUTHORITY => keyword_scale(
                &lower,
                &["founder", "ceo", "built", "sold", "exited", "author", "invested", "years of"],
                15,
                20,
            ),
            _ => 0,
        }
    }
}

/// Base score plus `step` per distinct keyword hit, clamped to 0–100.
fn keyword_scale(lower: &str, keywords: &[&str], base: u32, step: u32) -> u8 {
    let hits = keywords.iter().filter(|k| lower.contains(**k)).count() as u32;
    clamp(base + step * hits)
}

fn clamp(score: u32) -> u8 {
    score.min(100) as u8
}

/// A capitalized token past the first word approximates a named entity.
fn has_named_entity(text: &str) -> bool {
    count_named_entities(text) > 0
}

fn count_named_entities(text: &str) -> usize {
    text.split_whitespace()
        .skip(1)
        .filter(|word| {
            word.chars().next().is_some_and(char::is_uppercase)
                && word.chars().any(char::is_lowercase)
        })
        .count()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn scorer() -> Scorer {
        Scorer::new(MetricRegistry::standard(), EnrichPolicy::default()).with_reference_year(2026)
    }

    fn item(text: &str) -> InsightItem {
        InsightItem {
            name: Some("test".to_string()),
            text: Some(text.to_string()),
            ..Default::default()
        }
    }

    fn confident(video_type: VideoType) -> Classification {
        Classification {
            video_type,
            confidence: 0.8,
        }
    }

    #[test]
    fn concrete_instruction_outscores_vague_claim() {
        let s = scorer();
        let concrete = s.actionability("Use Notion to track 3 outreach emails per day");
        let vague = s.actionability("things are changing fast in this space");
        assert!(concrete > vague, "{concrete} vs {vague}");
    }

    #[test]
    fn no_date_reference_is_neutral_not_zero() {
        let s = scorer();
        assert_eq!(s.recency("a timeless principle of marketing"), 50);
        assert!(s.recency("back in 2019 this was different") < 50);
        assert!(s.recency("as of 2026 this is growing") > 90);
    }

    #[test]
    fn cited_claim_has_stronger_evidence() {
        let s = scorer();
        let cited = s.evidence(
            &item("According to a Gartner report, 40% of teams adopted AI"),
            "According to a Gartner report, 40% of teams adopted AI",
        );
        let bare = s.evidence(&item("everyone is adopting AI"), "everyone is adopting AI");
        assert!(cited > bare);
    }

    #[test]
    fn type_metrics_absent_below_confidence_threshold() {
        let s = scorer();
        let classification = Classification {
            video_type: VideoType::Entrepreneurship,
            confidence: 0.3,
        };
        let scored = s
            .score_item(&item("start a niche SaaS"), InsightCategory::StartupIdeas, classification)
            .unwrap();
        assert!(scored.type_scores.is_empty());
        assert_eq!(scored.universal_scores.len(), 4);
    }

    #[test]
    fn confident_entrepreneurship_gets_all_six_type_metrics() {
        let s = scorer();
        let scored = s
            .score_item(
                &item("start a niche SaaS with recurring pricing"),
                InsightCategory::StartupIdeas,
                confident(VideoType::Entrepreneurship),
            )
            .unwrap();
        assert_eq!(scored.type_scores.len(), 6);
        assert!(scored.type_scores.contains_key(vidlens_common::registry::RISK_ASSESSMENT));
    }

    #[test]
    fn missing_risk_discussion_scores_low_not_neutral() {
        let s = scorer();
        let no_risk = s.type_metric(
            vidlens_common::registry::RISK_ASSESSMENT,
            &item("build it and charge money"),
            "build it and charge money",
        );
        let with_risk = s.type_metric(
            vidlens_common::registry::RISK_ASSESSMENT,
            &item("main risk is churn; mitigate with annual plans"),
            "main risk is churn; mitigate with annual plans",
        );
        assert!(no_risk <= 10);
        assert!(with_risk > no_risk);
    }

    #[test]
    fn product_without_name_is_malformed() {
        let s = scorer();
        let nameless = InsightItem {
            text: Some("a great tool".to_string()),
            ..Default::default()
        };
        let err = s
            .score_item(&nameless, InsightCategory::ProductsTools, confident(VideoType::Tutorial))
            .unwrap_err();
        assert!(matches!(err, VidlensError::MalformedInsight(_)));
    }

    #[test]
    fn malformed_items_are_counted_not_scored() {
        let s = scorer();
        let mut categories = BTreeMap::new();
        categories.insert(
            InsightCategory::ProductsTools,
            vec![
                InsightItem {
                    name: Some("Zapier".to_string()),
                    text: Some("automate handoffs between tools".to_string()),
                    ..Default::default()
                },
                InsightItem::default(), // no name — malformed
            ],
        );
        let record = InsightRecord {
            video_id: "v1".to_string(),
            title: None,
            description: None,
            categories,
        };
        let scored = s.score_video(&record, Classification::unknown());
        assert_eq!(scored.insights.len(), 1);
        assert_eq!(scored.skipped_malformed, 1);
    }

    #[test]
    fn low_confidence_video_scores_universal_only() {
        let s = scorer();
        let mut categories = BTreeMap::new();
        categories.insert(
            InsightCategory::StartupIdeas,
            vec![item("start a niche SaaS with recurring pricing")],
        );
        let record = InsightRecord {
            video_id: "v1".to_string(),
            title: None,
            description: None,
            categories,
        };
        let classification = Classification {
            video_type: VideoType::Entrepreneurship,
            confidence: 0.2,
        };

        // The video is still scored in full; only type metrics are withheld.
        let scored = s.score_video(&record, classification);
        assert_eq!(scored.insights.len(), 1);
        assert_eq!(scored.skipped_malformed, 0);
        assert!(scored.insights[0].type_scores.is_empty());
        assert_eq!(scored.insights[0].universal_scores.len(), 4);
        assert_eq!(scored.classification.confidence, 0.2);
    }

    #[test]
    fn quote_requires_text_even_with_name() {
        let s = scorer();
        let named_only = InsightItem {
            name: Some("a quote".to_string()),
            ..Default::default()
        };
        assert!(s
            .score_item(&named_only, InsightCategory::ActionableQuotes, Classification::unknown())
            .is_err());
    }
}
