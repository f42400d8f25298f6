//! Flag decision for replies.

use super::lexicon::{Lexicon, contains_any};

/// Replies scoring strictly below this are held for review even without a toxic term.
pub const FLAG_THRESHOLD: f64 = -0.7;

/// Whether a reply should be held for moderator review.
///
/// Matching is plain case-insensitive substring containment, so "die" also matches
/// "diesel".
pub fn should_flag(lexicon: &Lexicon, text: &str, score: f64) -> bool {
    contains_any(&text.to_lowercase(), &lexicon.toxicity) || score < FLAG_THRESHOLD
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toxic_term_flags_regardless_of_score() {
        let l = Lexicon::default();
        assert!(should_flag(&l, "kys", 0.2));
        assert!(should_flag(&l, "You are a LOSER", 1.0));
        assert!(should_flag(&l, "i hate you so much", 0.0));
    }

    #[test]
    fn very_negative_score_flags() {
        let l = Lexicon::default();
        let text = "This is a neutral statement about the weather";
        assert!(!should_flag(&l, text, 0.0));
        assert!(!should_flag(&l, text, -0.7));
        assert!(should_flag(&l, text, -0.71));
    }

    #[test]
    fn sad_but_not_toxic_is_not_flagged() {
        let l = Lexicon::default();
        assert!(!should_flag(&l, "I feel hopeless and empty", -0.5));
    }

    #[test]
    fn empty_toxicity_list_only_uses_score() {
        let l = Lexicon {
            toxicity: vec![],
            ..Lexicon::default()
        };
        assert!(!should_flag(&l, "kys", 0.0));
        assert!(should_flag(&l, "kys", -0.9));
    }
}
