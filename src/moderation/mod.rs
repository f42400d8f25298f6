//! Moderation pipeline.
//!
//! Every post and reply is annotated exactly once, when it is submitted: the text is
//! scored for polarity, then posts are given an [`EmotionCategory`] and replies a flag
//! decision. The score and its companion field are always produced together. If scoring
//! fails, no annotation is produced and the submission must not be stored.
pub mod emotion;
pub mod lexicon;
pub mod polarity;
pub mod toxicity;

use std::sync::Arc;

use serde::Serialize;

pub use emotion::EmotionCategory;
pub use lexicon::Lexicon;
pub use polarity::{LexiconScorer, PolarityScorer, ScorerError};

/// Annotation persisted with a post.
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct PostAnnotation {
    pub sentiment_score: f64,
    pub emotion_category: EmotionCategory,
}

/// Annotation persisted with a reply.
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct ReplyAnnotation {
    pub sentiment_score: f64,
    pub flagged: bool,
}

/// Scorer plus lexicon. Cheap to clone and safe to share between requests.
#[derive(Clone)]
pub struct ModerationPipeline {
    lexicon: Arc<Lexicon>,
    scorer: Arc<dyn PolarityScorer>,
}

impl std::fmt::Debug for ModerationPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModerationPipeline")
            .field("lexicon", &self.lexicon)
            .finish_non_exhaustive()
    }
}

impl ModerationPipeline {
    pub fn new(lexicon: Lexicon, scorer: Arc<dyn PolarityScorer>) -> Self {
        Self {
            lexicon: Arc::new(lexicon.normalized()),
            scorer,
        }
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    pub fn annotate_post(&self, text: &str) -> Result<PostAnnotation, ScorerError> {
        let score = self.score(text)?;
        Ok(PostAnnotation {
            sentiment_score: score,
            emotion_category: emotion::classify(&self.lexicon, text, score),
        })
    }

    pub fn annotate_reply(&self, text: &str) -> Result<ReplyAnnotation, ScorerError> {
        let score = self.score(text)?;
        Ok(ReplyAnnotation {
            sentiment_score: score,
            flagged: toxicity::should_flag(&self.lexicon, text, score),
        })
    }

    /// Score `text`, clamping into `[-1.0, 1.0]`. NaN and infinities are scorer failures.
    fn score(&self, text: &str) -> Result<f64, ScorerError> {
        let score = self.scorer.score(text)?;
        if !score.is_finite() {
            return Err(ScorerError::NonFinite(score));
        }
        Ok(score.clamp(polarity::MIN_SCORE, polarity::MAX_SCORE))
    }
}

impl Default for ModerationPipeline {
    fn default() -> Self {
        Self::new(Lexicon::default(), Arc::new(LexiconScorer::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Returns the same score for every input.
    struct FixedScorer(f64);

    impl PolarityScorer for FixedScorer {
        fn score(&self, _text: &str) -> Result<f64, ScorerError> {
            Ok(self.0)
        }
    }

    struct BrokenScorer;

    impl PolarityScorer for BrokenScorer {
        fn score(&self, _text: &str) -> Result<f64, ScorerError> {
            Err(ScorerError::Unavailable("no language data".to_owned()))
        }
    }

    fn fixed(score: f64) -> ModerationPipeline {
        ModerationPipeline::new(Lexicon::default(), Arc::new(FixedScorer(score)))
    }

    #[test]
    fn post_scenarios() {
        let a = fixed(-0.9)
            .annotate_post("I'm so stressed about my deadline at work")
            .unwrap();
        assert_eq!(a.emotion_category, EmotionCategory::Stressed);
        assert_eq!(a.sentiment_score, -0.9);

        let a = fixed(0.0)
            .annotate_post("This is a neutral statement about the weather")
            .unwrap();
        assert_eq!(a.emotion_category, EmotionCategory::Neutral);

        let a = fixed(-0.5).annotate_post("I feel hopeless and empty").unwrap();
        assert_eq!(a.emotion_category, EmotionCategory::Sad);
    }

    #[test]
    fn reply_scenarios() {
        assert!(fixed(0.2).annotate_reply("kys").unwrap().flagged);
        assert!(
            !fixed(0.0)
                .annotate_reply("This is a neutral statement about the weather")
                .unwrap()
                .flagged
        );
        assert!(
            !fixed(-0.5)
                .annotate_reply("I feel hopeless and empty")
                .unwrap()
                .flagged
        );
    }

    #[test]
    fn out_of_range_scores_are_clamped() {
        let a = fixed(-3.0).annotate_reply("plain words here").unwrap();
        assert_eq!(a.sentiment_score, -1.0);
        assert!(a.flagged);
        assert_eq!(fixed(7.5).annotate_post("plain words").unwrap().sentiment_score, 1.0);
    }

    #[test]
    fn scorer_failure_yields_no_annotation() {
        let p = ModerationPipeline::new(Lexicon::default(), Arc::new(BrokenScorer));
        assert!(matches!(
            p.annotate_post("anything at all"),
            Err(ScorerError::Unavailable(_))
        ));
        assert!(p.annotate_reply("anything").is_err());
        assert!(matches!(
            fixed(f64::NAN).annotate_post("anything"),
            Err(ScorerError::NonFinite(_))
        ));
    }

    #[test]
    fn lexicon_is_normalized_on_construction() {
        let lexicon = Lexicon {
            toxicity: vec!["  JERK ".to_owned()],
            ..Lexicon::default()
        };
        let p = ModerationPipeline::new(lexicon, Arc::new(FixedScorer(0.0)));
        assert!(p.annotate_reply("what a jerk").unwrap().flagged);
    }

    #[test]
    fn default_pipeline_end_to_end() {
        let p = ModerationPipeline::default();
        let a = p.annotate_post("I'm feeling really happy today!").unwrap();
        assert_eq!(a.emotion_category, EmotionCategory::Positive);
        assert!((-1.0..=1.0).contains(&a.sentiment_score));
        assert_eq!(p.annotate_post("I'm feeling really happy today!").unwrap(), a);
    }
}
