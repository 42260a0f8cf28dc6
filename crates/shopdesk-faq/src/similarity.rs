//! String similarity scorers on a 0–100 scale.
//!
//! All scorers are built on the Indel distance (insertions and deletions
//! only), normalized by the combined length of both strings:
//!
//! ```text
//! ratio(a, b) = 100 * (1 - indel(a, b) / (len(a) + len(b)))
//! indel(a, b) = len(a) + len(b) - 2 * lcs(a, b)
//! ```
//!
//! Lengths are counted in `char`s, not bytes. Scores follow the `fuzz`
//! module of rapidfuzz.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Scoring function used to compare a query with a candidate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scorer {
    /// Order-insensitive, tolerant of subset/superset token sets.
    #[default]
    TokenSet,
    /// Order-insensitive, duplicates count.
    TokenSort,
    /// Plain character-level ratio.
    Ratio,
    /// Weighted mix of plain, token and partial scores.
    #[serde(rename = "wratio")]
    WRatio,
}

impl Scorer {
    pub fn score(self, a: &str, b: &str) -> f64 {
        match self {
            Scorer::TokenSet => token_set_ratio(a, b),
            Scorer::TokenSort => token_sort_ratio(a, b),
            Scorer::Ratio => ratio(a, b),
            Scorer::WRatio => wratio(a, b),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Scorer::TokenSet => "token_set",
            Scorer::TokenSort => "token_sort",
            Scorer::Ratio => "ratio",
            Scorer::WRatio => "wratio",
        }
    }
}

impl fmt::Display for Scorer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scorer {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "token_set" | "token-set" => Ok(Scorer::TokenSet),
            "token_sort" | "token-sort" => Ok(Scorer::TokenSort),
            "ratio" => Ok(Scorer::Ratio),
            "wratio" | "w_ratio" => Ok(Scorer::WRatio),
            other => Err(format!(
                "unknown scorer '{other}' (expected token_set, token_sort, ratio or wratio)"
            )),
        }
    }
}

/// Length of the longest common subsequence, single-row DP.
fn lcs_len(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let mut row = vec![0usize; b.len() + 1];
    for ca in a {
        let mut diag = 0;
        for (j, cb) in b.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if ca == cb {
                diag + 1
            } else {
                above.max(row[j])
            };
            diag = above;
        }
    }
    row[b.len()]
}

fn indel_distance(a: &[char], b: &[char]) -> usize {
    a.len() + b.len() - 2 * lcs_len(a, b)
}

/// Turn a distance into a 0–100 similarity. Two empty strings are identical.
fn normalized_similarity(distance: usize, total_len: usize) -> f64 {
    if total_len == 0 {
        return 100.0;
    }
    100.0 * (1.0 - distance as f64 / total_len as f64)
}

fn char_ratio(a: &[char], b: &[char]) -> f64 {
    normalized_similarity(indel_distance(a, b), a.len() + b.len())
}

/// Character-level Indel similarity.
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    char_ratio(&a, &b)
}

/// Sort whitespace tokens, rejoin and compare with [`ratio`].
pub fn token_sort_ratio(a: &str, b: &str) -> f64 {
    ratio(&sorted_tokens(a), &sorted_tokens(b))
}

fn sorted_tokens(s: &str) -> String {
    let mut tokens: Vec<&str> = s.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

/// Compare the token *sets* of two strings.
///
/// Returns 0 when either side has no tokens and 100 when the sets share at
/// least one token and one is contained in the other. Otherwise the result is
/// the best of three comparisons built from the sorted intersection (`sect`)
/// and the sorted leftovers of each side:
///
/// - `sect + diff_ab` vs `sect + diff_ba`
/// - `sect` vs `sect + diff_ab`
/// - `sect` vs `sect + diff_ba`
pub fn token_set_ratio(a: &str, b: &str) -> f64 {
    let tokens_a: BTreeSet<&str> = a.split_whitespace().collect();
    let tokens_b: BTreeSet<&str> = b.split_whitespace().collect();
    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }

    let sect: Vec<&str> = tokens_a.intersection(&tokens_b).copied().collect();
    let diff_ab: Vec<&str> = tokens_a.difference(&tokens_b).copied().collect();
    let diff_ba: Vec<&str> = tokens_b.difference(&tokens_a).copied().collect();

    if !sect.is_empty() && (diff_ab.is_empty() || diff_ba.is_empty()) {
        return 100.0;
    }

    let diff_ab_chars: Vec<char> = diff_ab.join(" ").chars().collect();
    let diff_ba_chars: Vec<char> = diff_ba.join(" ").chars().collect();
    let ab_len = diff_ab_chars.len();
    let ba_len = diff_ba_chars.len();

    let sect_len = char_len_joined(&sect);
    let sep = usize::from(sect_len != 0);
    let sect_ab_len = sect_len + sep + ab_len;
    let sect_ba_len = sect_len + sep + ba_len;

    // The shared prefix `sect + " "` matches itself, so the distance between
    // the two full strings is the distance between the leftovers alone.
    let best = normalized_similarity(
        indel_distance(&diff_ab_chars, &diff_ba_chars),
        sect_ab_len + sect_ba_len,
    );
    if sect_len == 0 {
        return best;
    }

    // `sect` vs `sect + " " + diff`: only the separator and the leftover
    // tokens are inserted.
    let sect_ab = normalized_similarity(sep + ab_len, sect_len + sect_ab_len);
    let sect_ba = normalized_similarity(sep + ba_len, sect_len + sect_ba_len);

    best.max(sect_ab).max(sect_ba)
}

fn char_len_joined(tokens: &[&str]) -> usize {
    if tokens.is_empty() {
        return 0;
    }
    tokens.iter().map(|t| t.chars().count()).sum::<usize>() + tokens.len() - 1
}

// ── Partial and weighted scorers ──────────────────────────────

/// Best [`ratio`] of the shorter string against every alignment with the
/// longer one, including windows hanging off either end.
///
/// Two empty strings score 100; one empty side scores 0.
pub fn partial_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.len() == b.len() && !a.is_empty() {
        return partial_windows(&a, &b).max(partial_windows(&b, &a));
    }
    if a.len() < b.len() {
        partial_windows(&a, &b)
    } else {
        partial_windows(&b, &a)
    }
}

fn partial_windows(short: &[char], long: &[char]) -> f64 {
    let (m, n) = (short.len(), long.len());
    if m == 0 {
        return if n == 0 { 100.0 } else { 0.0 };
    }

    let windows = (1..m)
        .map(|k| &long[..k])
        .chain((0..=n - m).map(|i| &long[i..i + m]))
        .chain((n - m + 1..n).map(|i| &long[i..]));

    let mut best = 0.0f64;
    for window in windows {
        best = best.max(char_ratio(short, window));
        if best >= 100.0 {
            break;
        }
    }
    best
}

/// [`partial_ratio`] over sorted tokens. Any shared token scores 100.
fn partial_token_ratio(a: &str, b: &str) -> f64 {
    let tokens_a: BTreeSet<&str> = a.split_whitespace().collect();
    let tokens_b: BTreeSet<&str> = b.split_whitespace().collect();
    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }
    if !tokens_a.is_disjoint(&tokens_b) {
        return 100.0;
    }

    let result = partial_ratio(&sorted_tokens(a), &sorted_tokens(b));
    if a.split_whitespace().count() == tokens_a.len()
        && b.split_whitespace().count() == tokens_b.len()
    {
        return result;
    }
    let set_a: Vec<&str> = tokens_a.into_iter().collect();
    let set_b: Vec<&str> = tokens_b.into_iter().collect();
    result.max(partial_ratio(&set_a.join(" "), &set_b.join(" ")))
}

/// Weighted blend of the other scorers, picked by how different the two
/// lengths are.
///
/// - length ratio below 1.5: best of [`ratio`] and 0.95 × the better token score
/// - otherwise partial scorers count, scaled by 0.9 (0.6 from a length ratio of 8)
pub fn wratio(a: &str, b: &str) -> f64 {
    const UNBASE_SCALE: f64 = 0.95;

    let len_a = a.chars().count();
    let len_b = b.chars().count();
    if len_a == 0 || len_b == 0 {
        return 0.0;
    }

    let len_ratio = len_a.max(len_b) as f64 / len_a.min(len_b) as f64;
    let end_ratio = ratio(a, b);

    if len_ratio < 1.5 {
        let token = token_set_ratio(a, b).max(token_sort_ratio(a, b));
        return end_ratio.max(token * UNBASE_SCALE);
    }

    let partial_scale = if len_ratio < 8.0 { 0.9 } else { 0.6 };
    let end_ratio = end_ratio.max(partial_ratio(a, b) * partial_scale);
    end_ratio.max(partial_token_ratio(a, b) * UNBASE_SCALE * partial_scale)
}
