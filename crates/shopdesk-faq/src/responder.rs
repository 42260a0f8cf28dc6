//! FAQ responder: turns a raw query into a stored answer or a fallback.

use serde::Serialize;
use shopdesk_core::config::FaqProfileConfig;
use shopdesk_core::error::{Result, ShopDeskError};
use shopdesk_core::types::{Answer, FaqEntry, FaqRecord};

use crate::normalize::normalize;
use crate::selector::best_match;
use crate::similarity::Scorer;

/// Acceptance rules for one call site.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchPolicy {
    /// Minimum score (0–100) a match needs to be returned.
    pub threshold: f64,
    pub scorer: Scorer,
    /// Text returned when nothing clears the threshold.
    pub fallback: String,
}

impl MatchPolicy {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            scorer: Scorer::TokenSet,
            fallback: "I'm sorry, I don't have information about that.".to_string(),
        }
    }

    pub fn with_scorer(mut self, scorer: Scorer) -> Self {
        self.scorer = scorer;
        self
    }

    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = fallback.into();
        self
    }

    /// Build from an endpoint profile in the config file.
    pub fn from_profile(profile: &FaqProfileConfig) -> Result<Self> {
        let scorer = profile
            .scorer
            .parse::<Scorer>()
            .map_err(ShopDeskError::Config)?;
        Ok(Self {
            threshold: profile.threshold,
            scorer,
            fallback: profile.fallback.clone(),
        })
    }
}

/// Outcome of answering one query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    pub answer: Answer,
    pub matched: bool,
    /// Best score seen, 0 when there were no candidates.
    pub score: f64,
    /// Stored question that produced the answer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
}

impl MatchResult {
    fn fallback(policy: &MatchPolicy, score: f64) -> Self {
        Self {
            answer: Answer::Text(policy.fallback.clone()),
            matched: false,
            score,
            question: None,
        }
    }
}

/// Index position and score of the accepted candidate, if any.
fn select(
    normalized_query: &str,
    normalized_questions: &[String],
    threshold: f64,
    scorer: Scorer,
) -> (Option<usize>, f64) {
    if normalized_query.is_empty() {
        return (None, 0.0);
    }
    match best_match(normalized_query, normalized_questions, scorer) {
        Some(best) if best.score >= threshold => (Some(best.index), best.score),
        Some(best) => (None, best.score),
        None => (None, 0.0),
    }
}

/// Entries paired with their normalized questions.
///
/// Normalizing happens once at construction, so one index can answer many
/// queries over the same FAQ set.
#[derive(Debug, Clone, Default)]
pub struct FaqIndex {
    entries: Vec<FaqEntry>,
    normalized: Vec<String>,
}

impl FaqIndex {
    pub fn new(entries: Vec<FaqEntry>) -> Self {
        let normalized = entries.iter().map(|e| normalize(&e.question)).collect();
        Self {
            entries,
            normalized,
        }
    }

    /// Build from raw store records, skipping records without a question or answer.
    pub fn from_records(records: impl IntoIterator<Item = FaqRecord>) -> Self {
        let mut skipped = 0usize;
        let entries: Vec<FaqEntry> = records
            .into_iter()
            .filter_map(|r| {
                let entry = r.into_entry();
                if entry.is_none() {
                    skipped += 1;
                }
                entry
            })
            .collect();
        if skipped > 0 {
            tracing::warn!("Skipped {skipped} malformed FAQ record(s)");
        }
        Self::new(entries)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[FaqEntry] {
        &self.entries
    }

    /// Best entry scoring at least `threshold`, with its score.
    pub fn find(&self, query: &str, threshold: f64, scorer: Scorer) -> Option<(&FaqEntry, f64)> {
        match select(&normalize(query), &self.normalized, threshold, scorer) {
            (Some(index), score) => Some((&self.entries[index], score)),
            (None, _) => None,
        }
    }

    /// Answer `query`, falling back to `policy.fallback` below the threshold.
    pub fn respond(&self, query: &str, policy: &MatchPolicy) -> MatchResult {
        let normalized_query = normalize(query);
        let (hit, score) = select(
            &normalized_query,
            &self.normalized,
            policy.threshold,
            policy.scorer,
        );
        match hit {
            Some(index) => {
                let entry = &self.entries[index];
                tracing::debug!(
                    "FAQ hit: {normalized_query:?} → {:?} (score={score:.1})",
                    entry.question
                );
                MatchResult {
                    answer: entry.answer.clone(),
                    matched: true,
                    score,
                    question: Some(entry.question.clone()),
                }
            }
            None => {
                tracing::debug!(
                    "FAQ miss: {normalized_query:?} (best={score:.1}, threshold={})",
                    policy.threshold
                );
                MatchResult::fallback(policy, score)
            }
        }
    }
}

/// Token-set match of `query` against `entries`.
///
/// Returns the best entry scoring at least `threshold`, or `None` when the
/// entry list is empty, the query normalizes to nothing, or no entry clears
/// the threshold.
pub fn match_faq<'a>(query: &str, entries: &'a [FaqEntry], threshold: f64) -> Option<&'a FaqEntry> {
    let normalized: Vec<String> = entries.iter().map(|e| normalize(&e.question)).collect();
    select(&normalize(query), &normalized, threshold, Scorer::TokenSet)
        .0
        .map(|index| &entries[index])
}

/// One-shot [`FaqIndex::respond`] without keeping the index.
pub fn respond(query: &str, entries: &[FaqEntry], policy: &MatchPolicy) -> MatchResult {
    FaqIndex::new(entries.to_vec()).respond(query, policy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::sample_faq;
    use crate::similarity::token_set_ratio;

    fn entry(q: &str, a: &str) -> FaqEntry {
        FaqEntry::new(q, a)
    }

    #[test]
    fn test_exact_match() {
        let entries = vec![entry("refund policy", "A")];
        let hit = match_faq("refund policy", &entries, 50.0).unwrap();
        assert_eq!(hit.answer, Answer::from("A"));
    }

    #[test]
    fn test_token_order_invariance() {
        let entries = vec![entry("refund policy", "A")];
        let hit = match_faq("policy refund", &entries, 50.0).unwrap();
        assert_eq!(hit.answer, Answer::from("A"));
    }

    #[test]
    fn test_formatting_noise_is_ignored() {
        let entries = vec![entry("Refund policy?", "A")];
        let hit = match_faq("  REFUND,   policy!! ", &entries, 100.0).unwrap();
        assert_eq!(hit.answer, Answer::from("A"));
    }

    #[test]
    fn test_empty_candidates_never_match() {
        let entries: Vec<FaqEntry> = Vec::new();
        for q in ["refund policy", "", "anything at all"] {
            assert!(match_faq(q, &entries, 0.0).is_none());
            let result = respond(q, &entries, &MatchPolicy::new(0.0));
            assert!(!result.matched);
            assert_eq!(result.score, 0.0);
        }
    }

    #[test]
    fn test_below_threshold_is_no_match() {
        let entries = vec![entry("how do I pay", "A")];
        assert!(match_faq("unrelated gibberish xyz", &entries, 80.0).is_none());
    }

    #[test]
    fn test_empty_query_is_no_match() {
        let entries = vec![entry("refund policy", "A")];
        assert!(match_faq("?!", &entries, 0.0).is_none());
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let entries = vec![entry("a b", "A")];
        let score = token_set_ratio("b c", "a b");
        assert!((score - 66.666667).abs() < 1e-4, "got {score}");
        assert!(match_faq("b c", &entries, score).is_some());
        assert!(match_faq("b c", &entries, score + 1e-6).is_none());
    }

    #[test]
    fn test_near_paraphrase_clears_ask_threshold() {
        // token set score 82.05: the shared "como pedido" counts toward the total
        let entries = vec![entry("¿Como pagar el pedido?", "En línea o en sede")];
        let hit = match_faq("como pago mi pedido", &entries, 80.0).unwrap();
        assert_eq!(hit.answer, Answer::from("En línea o en sede"));
        let (_, score) = FaqIndex::new(entries)
            .find("como pago mi pedido", 80.0, Scorer::TokenSet)
            .unwrap();
        assert!((score - 82.051282).abs() < 1e-4, "got {score}");
    }

    #[test]
    fn test_tie_break_is_stable() {
        let entries = vec![
            entry("refund policy", "first"),
            entry("policy refund", "second"),
        ];
        for _ in 0..20 {
            let hit = match_faq("refund policy", &entries, 50.0).unwrap();
            assert_eq!(hit.answer, Answer::from("first"));
        }
    }

    #[test]
    fn test_respond_fallback_message() {
        let entries = vec![entry("how do I pay", "A")];
        let policy = MatchPolicy::new(80.0).with_fallback("Lo siento, no tengo información sobre eso.");
        let result = respond("unrelated gibberish xyz", &entries, &policy);
        assert!(!result.matched);
        assert!(result.question.is_none());
        assert_eq!(
            result.answer,
            Answer::from("Lo siento, no tengo información sobre eso.")
        );
        assert!(result.score < 80.0);
    }

    #[test]
    fn test_respond_hit_reports_question_and_score() {
        let entries = vec![entry("Refund policy", "30 days")];
        let result = respond("refund policy", &entries, &MatchPolicy::new(70.0));
        assert!(result.matched);
        assert_eq!(result.question.as_deref(), Some("Refund policy"));
        assert!((result.score - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_list_answers_are_returned_whole() {
        let index = FaqIndex::new(sample_faq());
        let result = index.respond("medios de pago", &MatchPolicy::new(80.0));
        assert!(result.matched);
        match result.answer {
            Answer::List(items) => assert!(items.len() > 1),
            other => panic!("expected list answer, got {other:?}"),
        }
    }

    #[test]
    fn test_index_from_records_skips_malformed() {
        let records = vec![
            FaqRecord {
                question: Some("refund policy".into()),
                answer: Some(Answer::from("A")),
            },
            FaqRecord {
                question: None,
                answer: Some(Answer::from("orphan")),
            },
            FaqRecord {
                question: Some("shipping".into()),
                answer: None,
            },
        ];
        let index = FaqIndex::from_records(records);
        assert_eq!(index.len(), 1);
        let (hit, score) = index.find("refund policy", 90.0, Scorer::TokenSet).unwrap();
        assert_eq!(hit.answer, Answer::from("A"));
        assert!(score >= 90.0);
    }

    #[test]
    fn test_policy_from_profile() {
        let profile = FaqProfileConfig {
            threshold: 70.0,
            scorer: "token_sort".into(),
            fallback: "nope".into(),
        };
        let policy = MatchPolicy::from_profile(&profile).unwrap();
        assert_eq!(policy.scorer, Scorer::TokenSort);
        assert_eq!(policy.fallback, "nope");

        let bad = FaqProfileConfig {
            scorer: "soundex".into(),
            ..profile
        };
        assert!(MatchPolicy::from_profile(&bad).is_err());
    }

    #[test]
    fn test_result_serialization() {
        let result = respond("x", &[], &MatchPolicy::new(80.0).with_fallback("none"));
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["answer"], "none");
        assert_eq!(json["matched"], false);
        assert!(json.get("question").is_none());
    }
}
