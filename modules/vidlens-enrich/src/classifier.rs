//! Video type classifier. Scores each candidate type by weighted presence
//! of category signals plus title/description keywords, then normalizes to
//! confidences that sum to less than one — the residual mass is `unknown`.
//!
//! The tie-break is deliberately conservative: false type-specific scoring
//! is worse than no type-specific scoring, so an unresolvable tie classifies
//! as `Unknown` with confidence 0 rather than guessing.

use vidlens_common::types::{Classification, InsightCategory, InsightRecord, VideoType};

/// Candidate types in a fixed evaluation order (determinism).
const CANDIDATES: [VideoType; 4] = [
    VideoType::Entrepreneurship,
    VideoType::MarketResearch,
    VideoType::Tutorial,
    VideoType::Interview,
];

/// Category signal weights per candidate type.
fn category_weights(video_type: VideoType) -> &'static [(InsightCategory, f32)] {
    match video_type {
        VideoType::Entrepreneurship => &[
            (InsightCategory::StartupIdeas, 3.0),
            (InsightCategory::BusinessStrategies, 2.0),
            (InsightCategory::GrowthTactics, 2.0),
            (InsightCategory::ProblemsSolutions, 1.0),
        ],
        VideoType::MarketResearch => &[
            (InsightCategory::TrendsSignals, 3.0),
            (InsightCategory::TargetMarkets, 3.0),
            (InsightCategory::KeyStatistics, 2.0),
        ],
        VideoType::Tutorial => &[
            (InsightCategory::AiWorkflows, 3.0),
            (InsightCategory::ProductsTools, 2.0),
            (InsightCategory::GrowthTactics, 1.0),
        ],
        VideoType::Interview => &[
            (InsightCategory::ActionableQuotes, 3.0),
            (InsightCategory::BusinessStrategies, 1.0),
        ],
        VideoType::Unknown => &[],
    }
}

/// Title/description keywords that boost a candidate type.
fn keyword_signals(video_type: VideoType) -> &'static [&'static str] {
    match video_type {
        VideoType::Entrepreneurship => &["startup", "founder", "business idea", "side hustle"],
        VideoType::MarketResearch => &["market", "trend", "forecast", "industry report"],
        VideoType::Tutorial => &["how to", "tutorial", "step by step", "walkthrough"],
        VideoType::Interview => &["interview", "podcast", "q&a", "conversation with"],
        VideoType::Unknown => &[],
    }
}

/// Weight added per keyword hit in the title/description text.
const KEYWORD_WEIGHT: f32 = 2.0;

/// Smoothing mass in the confidence denominator. Keeps confidences summing
/// below 1.0 so there is always residual probability for `unknown`.
const UNKNOWN_MASS: f32 = 4.0;

/// Assign a primary type and confidence from a video's insight mix and
/// metadata text.
pub fn classify(record: &InsightRecord) -> Classification {
    let text = metadata_text(record);

    let mut scores: Vec<(VideoType, f32)> = Vec::with_capacity(CANDIDATES.len());
    for candidate in CANDIDATES {
        let mut score = 0.0_f32;
        for (category, weight) in category_weights(candidate) {
            score += record.items(*category).len() as f32 * weight;
        }
        for keyword in keyword_signals(candidate) {
            if text.contains(keyword) {
                score += KEYWORD_WEIGHT;
            }
        }
        scores.push((candidate, score));
    }

    let total: f32 = scores.iter().map(|(_, s)| s).sum();
    if total <= 0.0 {
        return Classification::unknown();
    }

    let top = scores
        .iter()
        .map(|(_, s)| *s)
        .fold(0.0_f32, f32::max);
    let tied: Vec<VideoType> = scores
        .iter()
        .filter(|(_, s)| *s == top)
        .map(|(t, _)| *t)
        .collect();

    let winner = match tied.as_slice() {
        [only] => *only,
        _ => match break_tie(record, &tied) {
            Some(t) => t,
            // Unresolvable tie — refuse to guess.
            None => return Classification::unknown(),
        },
    };

    Classification {
        video_type: winner,
        confidence: (top / (total + UNKNOWN_MASS)).clamp(0.0, 1.0),
    }
}

/// Prefer the tied type with the larger absolute insight count in its signal
/// categories. Returns None when that count is also tied.
fn break_tie(record: &InsightRecord, tied: &[VideoType]) -> Option<VideoType> {
    let counts: Vec<(VideoType, usize)> = tied
        .iter()
        .map(|&t| {
            let count = category_weights(t)
                .iter()
                .map(|(c, _)| record.items(*c).len())
                .sum();
            (t, count)
        })
        .collect();

    let best = counts.iter().map(|(_, c)| *c).max()?;
    let winners: Vec<VideoType> = counts
        .iter()
        .filter(|(_, c)| *c == best)
        .map(|(t, _)| *t)
        .collect();
    match winners.as_slice() {
        [only] => Some(*only),
        _ => None,
    }
}

fn metadata_text(record: &InsightRecord) -> String {
    let mut text = String::new();
    if let Some(title) = &record.title {
        text.push_str(&title.to_lowercase());
        text.push(' ');
    }
    if let Some(desc) = &record.description {
        text.push_str(&desc.to_lowercase());
    }
    text
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use vidlens_common::types::InsightItem;

    use super::*;

    fn record_with(categories: &[(InsightCategory, usize)]) -> InsightRecord {
        let mut map = BTreeMap::new();
        for (category, count) in categories {
            let items = (0..*count)
                .map(|i| InsightItem {
                    name: Some(format!("item {i}")),
                    text: Some("some insight text".to_string()),
                    ..Default::default()
                })
                .collect();
            map.insert(*category, items);
        }
        InsightRecord {
            video_id: "v1".to_string(),
            title: None,
            description: None,
            categories: map,
        }
    }

    #[test]
    fn startup_heavy_record_classifies_entrepreneurship() {
        let record = record_with(&[
            (InsightCategory::StartupIdeas, 4),
            (InsightCategory::BusinessStrategies, 3),
            (InsightCategory::GrowthTactics, 2),
            (InsightCategory::ProductsTools, 1),
        ]);
        let c = classify(&record);
        assert_eq!(c.video_type, VideoType::Entrepreneurship);
        assert!(c.confidence > 0.5, "confidence {}", c.confidence);
    }

    #[test]
    fn trends_dominance_classifies_market_research() {
        let record = record_with(&[
            (InsightCategory::TrendsSignals, 5),
            (InsightCategory::TargetMarkets, 3),
            (InsightCategory::KeyStatistics, 2),
        ]);
        let c = classify(&record);
        assert_eq!(c.video_type, VideoType::MarketResearch);
    }

    #[test]
    fn empty_record_is_unknown_with_zero_confidence() {
        let record = record_with(&[]);
        let c = classify(&record);
        assert_eq!(c.video_type, VideoType::Unknown);
        assert_eq!(c.confidence, 0.0);
    }

    #[test]
    fn title_keywords_boost_tutorial() {
        let mut record = record_with(&[(InsightCategory::ProductsTools, 1)]);
        record.title = Some("How to automate research — step by step".to_string());
        let c = classify(&record);
        assert_eq!(c.video_type, VideoType::Tutorial);
    }

    #[test]
    fn unresolvable_tie_refuses_to_guess() {
        // Quotes and trends weigh 3.0 each; one item apiece gives a score
        // AND count tie between Interview and MarketResearch.
        let record = record_with(&[
            (InsightCategory::ActionableQuotes, 1),
            (InsightCategory::TrendsSignals, 1),
        ]);
        let c = classify(&record);
        assert_eq!(c.video_type, VideoType::Unknown);
        assert_eq!(c.confidence, 0.0);
    }

    #[test]
    fn confidences_leave_residual_unknown_mass() {
        let record = record_with(&[(InsightCategory::StartupIdeas, 20)]);
        let c = classify(&record);
        assert!(c.confidence < 1.0);
    }
}
