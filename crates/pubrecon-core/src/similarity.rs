//! Token-sort title similarity.

/// Similarity between two titles on a 0–100 scale, insensitive to case,
/// punctuation, and word order. An empty side scores 0 so callers can
/// treat it as "no match" rather than a trivial perfect match.
pub fn token_sort_ratio(a: &str, b: &str) -> u32 {
    let left = sorted_tokens(a);
    let right = sorted_tokens(b);
    if left.is_empty() || right.is_empty() {
        return 0;
    }
    if left == right {
        return 100;
    }
    (strsim::normalized_levenshtein(&left, &right) * 100.0).round() as u32
}

fn sorted_tokens(value: &str) -> String {
    let lowered = value.to_lowercase();
    let cleaned: String = lowered
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    let mut tokens: Vec<&str> = cleaned.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_titles_score_100() {
        assert_eq!(token_sort_ratio("Deep Learning for X", "Deep Learning for X"), 100);
    }

    #[test]
    fn case_and_punctuation_invariant() {
        assert_eq!(
            token_sort_ratio("Deep Learning for X", "deep learning, for x!"),
            100
        );
    }

    #[test]
    fn word_order_invariant() {
        assert_eq!(
            token_sort_ratio("attention is all you need", "all you need is attention"),
            100
        );
    }

    #[test]
    fn near_match_scores_high() {
        let score = token_sort_ratio(
            "Neural networks in practice",
            "Neural network in practice",
        );
        assert!(score >= 90, "score was {score}");
    }

    #[test]
    fn unrelated_titles_score_low() {
        let score = token_sort_ratio(
            "Deep learning for genomics",
            "Medieval trade routes of the Baltic",
        );
        assert!(score < 50, "score was {score}");
    }

    #[test]
    fn empty_sides_score_zero() {
        assert_eq!(token_sort_ratio("", ""), 0);
        assert_eq!(token_sort_ratio("something", ""), 0);
        assert_eq!(token_sort_ratio("", "something"), 0);
        assert_eq!(token_sort_ratio("!!!", "???"), 0);
    }
}
