//! Self-help suggestions shown alongside posts with a negative tone.

use crate::moderation::EmotionCategory;

const STRESSED: &[&str] = &[
    "Try deep breathing: Inhale for 4 counts, hold for 4, exhale for 4.",
    "Take a short walk or do some light stretching.",
    "Listen to calming music or nature sounds.",
];

const ANXIOUS: &[&str] = &[
    "Ground yourself: Name 5 things you can see, 4 you can touch, 3 you can hear.",
    "Practice progressive muscle relaxation.",
    "Try meditation or mindfulness exercises.",
];

const SAD: &[&str] = &[
    "Reach out to a trusted friend or family member.",
    "Engage in activities you enjoy or find meaningful.",
    "Consider journaling about your feelings.",
];

/// Suggestions for a post's emotion. Empty for positive and neutral posts.
pub fn calming_resources(emotion: EmotionCategory) -> &'static [&'static str] {
    match emotion {
        EmotionCategory::Stressed => STRESSED,
        EmotionCategory::Anxious => ANXIOUS,
        EmotionCategory::Sad => SAD,
        EmotionCategory::Positive | EmotionCategory::Neutral => &[],
    }
}
