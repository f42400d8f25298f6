//! Keyword lists used for substring classification.

use serde::{Deserialize, Serialize};

/// Terms that mark a post as written under stress.
pub const STRESS_TERMS: &[&str] = &[
    "stress",
    "stressed",
    "overwhelmed",
    "pressure",
    "deadline",
    "work",
    "busy",
];

/// Terms that mark a post as anxious.
pub const ANXIETY_TERMS: &[&str] = &[
    "anxious", "anxiety", "worry", "worried", "nervous", "panic", "fear", "scared",
];

/// Terms that mark a post as sad.
pub const SADNESS_TERMS: &[&str] = &[
    "sad", "depressed", "down", "lonely", "empty", "hopeless", "cry", "crying",
];

/// Terms that hold a reply for moderator review.
pub const TOXICITY_TERMS: &[&str] = &[
    "kill yourself",
    "kys",
    "suicide",
    "die",
    "harm yourself",
    "hurt yourself",
    "worthless",
    "loser",
    "pathetic",
    "stupid",
    "idiot",
    "hate you",
    "disgusting",
];

/// Category to keyword mapping consulted by the classifier and the toxicity gate.
///
/// Every list can be replaced independently from the `[lexicon]` configuration table;
/// lists that are not given fall back to the built-in terms above.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Lexicon {
    pub stress: Vec<String>,
    pub anxiety: Vec<String>,
    pub sadness: Vec<String>,
    pub toxicity: Vec<String>,
}

impl Default for Lexicon {
    fn default() -> Self {
        Self {
            stress: owned(STRESS_TERMS),
            anxiety: owned(ANXIETY_TERMS),
            sadness: owned(SADNESS_TERMS),
            toxicity: owned(TOXICITY_TERMS),
        }
    }
}

impl Lexicon {
    /// Lowercase every term and drop blank ones.
    ///
    /// Matching lowercases the text, so terms must be lowercase too. A blank term would
    /// match every input.
    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            stress: normalize(self.stress),
            anxiety: normalize(self.anxiety),
            sadness: normalize(self.sadness),
            toxicity: normalize(self.toxicity),
        }
    }
}

/// Returns whether the already-lowercased `text` contains any of `terms`.
pub(crate) fn contains_any(text: &str, terms: &[String]) -> bool {
    terms.iter().any(|term| text.contains(term.as_str()))
}

fn owned(terms: &[&str]) -> Vec<String> {
    terms.iter().map(|&t| t.to_owned()).collect()
}

fn normalize(terms: Vec<String>) -> Vec<String> {
    terms
        .into_iter()
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_lowercases_and_drops_blank_terms() {
        let lexicon = Lexicon {
            stress: vec!["  DeadLine ".to_owned(), "   ".to_owned()],
            anxiety: vec![],
            sadness: vec!["Sad".to_owned()],
            toxicity: vec![String::new()],
        }
        .normalized();

        assert_eq!(lexicon.stress, vec!["deadline"]);
        assert_eq!(lexicon.sadness, vec!["sad"]);
        assert!(lexicon.toxicity.is_empty());
    }

    #[test]
    fn substring_match_is_accepted() {
        let lexicon = Lexicon::default();
        // Known false positive: "die" inside "diesel".
        assert!(contains_any("my diesel car broke", &lexicon.toxicity));
        assert!(!contains_any("my car broke", &lexicon.toxicity));
    }

    #[test]
    fn partial_config_keeps_builtin_lists() {
        let lexicon: Lexicon = serde_json::from_str(r#"{ "toxicity": ["jerk"] }"#).unwrap();
        assert_eq!(lexicon.toxicity, vec!["jerk"]);
        assert_eq!(lexicon.stress, Lexicon::default().stress);
    }
}
