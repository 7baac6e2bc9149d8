//! Expert consensus over fixed topic buckets. Stance detection is a simple
//! polarity heuristic, not NLP-grade — both supporting and dissenting
//! examples are retained so the score can be audited.

use vidlens_common::normalize::snippet;
use vidlens_common::types::ConsensusEntry;

/// Tracked topics and the keywords that route an insight into each bucket.
pub const TOPICS: &[(&str, &[&str])] = &[
    (
        "ai_tools",
        &["ai", "llm", "gpt", "chatgpt", "automation", "agent", "copilot"],
    ),
    (
        "content_marketing",
        &["content", "audience", "newsletter", "youtube", "seo", "social media"],
    ),
    (
        "saas_business",
        &["saas", "subscription", "mrr", "churn", "b2b", "recurring revenue"],
    ),
];

const POSITIVE_MARKERS: &[&str] = &[
    "should", "works", "effective", "best", "recommend", "underrated", "worth", "growing",
];

const NEGATIVE_MARKERS: &[&str] = &[
    "avoid", "dead", "waste", "overrated", "stop", "declining", "doesn't work", "too late",
];

const QUOTE_MAX_CHARS: usize = 160;
const QUOTES_PER_SIDE: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stance {
    Concur,
    Dissent,
}

fn stance_of(lower: &str) -> Option<Stance> {
    let pos = POSITIVE_MARKERS.iter().filter(|m| lower.contains(**m)).count();
    let neg = NEGATIVE_MARKERS.iter().filter(|m| lower.contains(**m)).count();
    match pos.cmp(&neg) {
        std::cmp::Ordering::Greater => Some(Stance::Concur),
        std::cmp::Ordering::Less => Some(Stance::Dissent),
        std::cmp::Ordering::Equal => None,
    }
}

/// Compute consensus entries from all insight texts in the corpus. Texts
/// must arrive in deterministic order. Topics with no stance-bearing
/// matches are omitted rather than reported as zero agreement.
pub fn compute(texts: &[&str]) -> Vec<ConsensusEntry> {
    let mut entries = Vec::new();

    for (topic, keywords) in TOPICS {
        let mut positive: Vec<&str> = Vec::new();
        let mut negative: Vec<&str> = Vec::new();

        for text in texts {
            let lower = text.to_lowercase();
            if !keywords.iter().any(|k| lower.contains(*k)) {
                continue;
            }
            match stance_of(&lower) {
                Some(Stance::Concur) => positive.push(text),
                Some(Stance::Dissent) => negative.push(text),
                None => {}
            }
        }

        let stanced = positive.len() + negative.len();
        if stanced == 0 {
            continue;
        }

        // Majority stance wins; a perfect split reads as positive consensus
        // at 0.5 agreement.
        let (majority, minority) = if positive.len() >= negative.len() {
            (positive, negative)
        } else {
            (negative, positive)
        };

        entries.push(ConsensusEntry {
            topic: topic.to_string(),
            agreement_score: majority.len() as f64 / stanced as f64,
            supporting_quotes: majority
                .iter()
                .take(QUOTES_PER_SIDE)
                .map(|t| snippet(t, QUOTE_MAX_CHARS))
                .collect(),
            dissenting_quotes: minority
                .iter()
                .take(QUOTES_PER_SIDE)
                .map(|t| snippet(t, QUOTE_MAX_CHARS))
                .collect(),
        });
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concordant_quotes_score_full_agreement() {
        let texts = vec![
            "You should use AI agents for research",
            "AI automation works and is worth the setup cost",
        ];
        let entries = compute(&texts);
        let ai = entries.iter().find(|e| e.topic == "ai_tools").unwrap();
        assert_eq!(ai.agreement_score, 1.0);
        assert_eq!(ai.supporting_quotes.len(), 2);
        assert!(ai.dissenting_quotes.is_empty());
    }

    #[test]
    fn dissent_lowers_agreement_and_is_retained() {
        let texts = vec![
            "You should use AI for drafts",
            "AI works well for summaries",
            "Honestly, avoid AI for final copy",
        ];
        let entries = compute(&texts);
        let ai = entries.iter().find(|e| e.topic == "ai_tools").unwrap();
        assert!((ai.agreement_score - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(ai.dissenting_quotes.len(), 1);
    }

    #[test]
    fn topics_without_stanced_matches_are_omitted() {
        let texts = vec!["the weather is nice today"];
        let entries = compute(&texts);
        assert!(entries.is_empty());
    }
}
