//! Best-match selection over an ordered candidate list.

use crate::similarity::Scorer;

/// The winning candidate and its score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BestMatch<'a> {
    /// Position in the candidate list.
    pub index: usize,
    pub candidate: &'a str,
    pub score: f64,
}

/// Pick the highest-scoring candidate for `query`.
///
/// Inputs are compared as given; normalize both sides first. Returns `None`
/// for an empty candidate list. When several candidates share the top score
/// the earliest one wins.
pub fn best_match<'a, S: AsRef<str>>(
    query: &str,
    candidates: &'a [S],
    scorer: Scorer,
) -> Option<BestMatch<'a>> {
    let mut best: Option<BestMatch<'a>> = None;

    for (index, candidate) in candidates.iter().enumerate() {
        let candidate = candidate.as_ref();
        let score = scorer.score(query, candidate);
        let better = match &best {
            Some(current) => score > current.score,
            None => true,
        };
        if better {
            best = Some(BestMatch {
                index,
                candidate,
                score,
            });
            if score >= 100.0 {
                break;
            }
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_candidates() {
        let empty: Vec<String> = Vec::new();
        assert!(best_match("anything", &empty, Scorer::TokenSet).is_none());
        assert!(best_match("", &empty, Scorer::TokenSet).is_none());
    }

    #[test]
    fn test_selects_highest_score() {
        let candidates = ["how do i pay", "refund policy", "shipping times"];
        let best = best_match("what is the refund policy", &candidates, Scorer::TokenSet).unwrap();
        assert_eq!(best.index, 1);
        assert_eq!(best.candidate, "refund policy");
        assert!((best.score - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_tie_break_prefers_first_occurrence() {
        let candidates = ["refund policy", "policy refund", "refund policy"];
        for _ in 0..10 {
            let best = best_match("refund policy", &candidates, Scorer::TokenSet).unwrap();
            assert_eq!(best.index, 0);
        }

        // equal but imperfect scores
        let candidates = ["store hours", "store hours", "opening hours"];
        let best = best_match("store location", &candidates, Scorer::Ratio).unwrap();
        assert_eq!(best.index, 0);
    }

    #[test]
    fn test_low_scores_still_return_a_candidate() {
        let candidates = vec!["how do i pay".to_string()];
        let best = best_match("zzz", &candidates, Scorer::TokenSet).unwrap();
        assert_eq!(best.index, 0);
        assert!(best.score < 50.0);
    }
}
