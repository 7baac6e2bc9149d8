//! Metric registry — the static catalog of every metric the scorer can
//! compute. Immutable and versioned; injected into the scorer rather than
//! imported as a global. Adding a metric bumps the registry version; old
//! scored artifacts simply lack the new key until their next enrichment run.

use serde::Serialize;

use crate::types::VideoType;

// Universal metric names (every category, every video).
pub const ACTIONABILITY: &str = "actionability_score";
pub const SPECIFICITY: &str = "specificity_score";
pub const EVIDENCE: &str = "evidence_strength";
pub const RECENCY: &str = "recency_score";

// Entrepreneurship metrics.
pub const BUSINESS_VIABILITY: &str = "business_viability_score";
pub const MARKET_VALIDATION: &str = "market_validation_depth";
pub const PROFITABILITY: &str = "profitability_indicators";
pub const IMPLEMENTATION_CLARITY: &str = "implementation_clarity";
pub const COMPETITIVE_ANALYSIS: &str = "competitive_analysis_depth";
pub const RISK_ASSESSMENT: &str = "risk_assessment_score";

// Market research metrics.
pub const TREND_STRENGTH: &str = "trend_strength_score";
pub const MARKET_EVIDENCE: &str = "market_evidence_depth";
pub const DATA_RECENCY: &str = "data_recency_weight";

// Tutorial metrics.
pub const REPRODUCIBILITY: &str = "reproducibility_score";
pub const PREREQUISITE_CLARITY: &str = "prerequisite_clarity";

// Interview metrics.
pub const INSIGHT_DEPTH: &str = "insight_depth_score";
pub const SPEAKER_AUTHORITY: &str = "speaker_authority_score";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricScope {
    Universal,
    TypeSpecific,
}

/// A metric definition. Range is fixed 0–100 for every metric.
#[derive(Debug, Clone, Serialize)]
pub struct MetricDef {
    pub name: &'static str,
    pub display_name: &'static str,
    pub description: &'static str,
    pub scope: MetricScope,
    /// Video types this metric applies to. Empty for universal metrics.
    pub applies_to: &'static [VideoType],
}

impl MetricDef {
    pub fn applies_to_type(&self, video_type: VideoType) -> bool {
        match self.scope {
            MetricScope::Universal => true,
            MetricScope::TypeSpecific => self.applies_to.contains(&video_type),
        }
    }
}

/// The versioned metric catalog. Never mutated at runtime.
#[derive(Debug, Clone)]
pub struct MetricRegistry {
    pub version: u32,
    metrics: Vec<MetricDef>,
}

const ENTREPRENEURSHIP: &[VideoType] = &[VideoType::Entrepreneurship];
const MARKET_RESEARCH: &[VideoType] = &[VideoType::MarketResearch];
const TUTORIAL: &[VideoType] = &[VideoType::Tutorial];
const INTERVIEW: &[VideoType] = &[VideoType::Interview];

fn universal(name: &'static str, display_name: &'static str, description: &'static str) -> MetricDef {
    MetricDef {
        name,
        display_name,
        description,
        scope: MetricScope::Universal,
        applies_to: &[],
    }
}

fn typed(
    name: &'static str,
    display_name: &'static str,
    description: &'static str,
    applies_to: &'static [VideoType],
) -> MetricDef {
    MetricDef {
        name,
        display_name,
        description,
        scope: MetricScope::TypeSpecific,
        applies_to,
    }
}

impl MetricRegistry {
    /// The installed catalog. Bump `version` whenever an entry is added.
    pub fn standard() -> Self {
        Self {
            version: 1,
            metrics: vec![
                universal(
                    ACTIONABILITY,
                    "Actionability",
                    "Concrete verbs, steps, numeric targets, or named tools — what to do, not just what is true",
                ),
                universal(
                    SPECIFICITY,
                    "Specificity",
                    "Density of named entities, numbers, and dates versus generic language",
                ),
                universal(
                    EVIDENCE,
                    "Evidence strength",
                    "Named sources, quoted metrics, or corroborating detail versus unsupported assertion",
                ),
                universal(
                    RECENCY,
                    "Recency",
                    "Decays with the age of embedded date references; no date is neutral, not stale",
                ),
                typed(
                    BUSINESS_VIABILITY,
                    "Business viability",
                    "Revenue model, demand signals, and feasibility discussion",
                    ENTREPRENEURSHIP,
                ),
                typed(
                    MARKET_VALIDATION,
                    "Market validation depth",
                    "Customer evidence, traction numbers, or validation experiments",
                    ENTREPRENEURSHIP,
                ),
                typed(
                    PROFITABILITY,
                    "Profitability indicators",
                    "Margins, pricing, and unit-economics mentions",
                    ENTREPRENEURSHIP,
                ),
                typed(
                    IMPLEMENTATION_CLARITY,
                    "Implementation clarity",
                    "How concretely the path from idea to execution is laid out",
                    ENTREPRENEURSHIP,
                ),
                typed(
                    COMPETITIVE_ANALYSIS,
                    "Competitive analysis depth",
                    "Named competitors and differentiation discussion",
                    ENTREPRENEURSHIP,
                ),
                typed(
                    RISK_ASSESSMENT,
                    "Risk assessment",
                    "Explicit risks and mitigations; silence here is a gap, not neutral",
                    ENTREPRENEURSHIP,
                ),
                typed(
                    TREND_STRENGTH,
                    "Trend strength",
                    "Growth language and momentum evidence behind a trend claim",
                    MARKET_RESEARCH,
                ),
                typed(
                    MARKET_EVIDENCE,
                    "Market evidence depth",
                    "Market size figures, surveys, and cited research",
                    MARKET_RESEARCH,
                ),
                typed(
                    DATA_RECENCY,
                    "Data recency",
                    "How current the quoted market data is",
                    MARKET_RESEARCH,
                ),
                typed(
                    REPRODUCIBILITY,
                    "Reproducibility",
                    "Whether a viewer could follow the steps and reproduce the result",
                    TUTORIAL,
                ),
                typed(
                    PREREQUISITE_CLARITY,
                    "Prerequisite clarity",
                    "Whether required tools, accounts, and skills are stated up front",
                    TUTORIAL,
                ),
                typed(
                    INSIGHT_DEPTH,
                    "Insight depth",
                    "First-hand experience and non-obvious takeaways versus platitudes",
                    INTERVIEW,
                ),
                typed(
                    SPEAKER_AUTHORITY,
                    "Speaker authority",
                    "Credentials, track record, or named ventures backing the speaker",
                    INTERVIEW,
                ),
            ],
        }
    }

    /// Universal metrics unconditionally; type-specific metrics only when a
    /// video type is supplied and the metric applies to it.
    pub fn list_metrics(&self, video_type: Option<VideoType>) -> Vec<&MetricDef> {
        self.metrics
            .iter()
            .filter(|m| match m.scope {
                MetricScope::Universal => true,
                MetricScope::TypeSpecific => {
                    video_type.is_some_and(|vt| m.applies_to.contains(&vt))
                }
            })
            .collect()
    }

    pub fn universal_metrics(&self) -> impl Iterator<Item = &MetricDef> {
        self.metrics
            .iter()
            .filter(|m| m.scope == MetricScope::Universal)
    }

    pub fn get(&self, name: &str) -> Option<&MetricDef> {
        self.metrics.iter().find(|m| m.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_type_returns_exactly_the_universal_set() {
        let registry = MetricRegistry::standard();
        let metrics = registry.list_metrics(None);
        let names: Vec<&str> = metrics.iter().map(|m| m.name).collect();
        assert_eq!(names, vec![ACTIONABILITY, SPECIFICITY, EVIDENCE, RECENCY]);
    }

    #[test]
    fn entrepreneurship_gets_universal_plus_six() {
        let registry = MetricRegistry::standard();
        let metrics = registry.list_metrics(Some(VideoType::Entrepreneurship));
        assert_eq!(metrics.len(), 10);
        assert!(metrics.iter().any(|m| m.name == RISK_ASSESSMENT));
        assert!(metrics.iter().all(|m| m.name != TREND_STRENGTH));
    }

    #[test]
    fn unknown_type_gets_universal_only() {
        let registry = MetricRegistry::standard();
        let metrics = registry.list_metrics(Some(VideoType::Unknown));
        assert_eq!(metrics.len(), 4);
    }

    #[test]
    fn metric_names_are_unique() {
        let registry = MetricRegistry::standard();
        let mut names: Vec<&str> = registry.metrics.iter().map(|m| m.name).collect();
        let total = names.len();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), total);
    }
}
