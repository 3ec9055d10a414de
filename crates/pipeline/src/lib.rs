//! Review ranking pipeline.
//!
//! - [`classifier`] -- the sentiment classifier contract and its
//!   OpenAI-compatible HTTP implementation.
//! - [`prompt`] -- candidate label selection, prompt rendering, label resolution.
//! - [`ranking`] -- [`RankingPipeline`], which ties the vocabulary, the
//!   classifier, and the movie store together.

pub mod classifier;
pub mod prompt;
pub mod ranking;

pub use classifier::{Classifier, ClassifierConfig, ClassifierError, OpenAiClassifier};
pub use ranking::{RankedReview, RankingError, RankingPipeline};
