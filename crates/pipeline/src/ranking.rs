//! [`RankingPipeline`]: classify an admin review and persist it with its rank.
//!
//! Steps run strictly in order and stop at the first failure. The only durable
//! write is the final single-statement update, so a failure anywhere earlier
//! leaves the movie untouched.

use std::sync::Arc;

use magicstream_core::ranking::{UnrankedPolicy, RANKINGS_PLACEHOLDER};
use magicstream_db::models::ranking::Ranking;
use magicstream_db::repositories::{MovieRepository, SentimentRepository};
use magicstream_db::RepoError;
use serde::Serialize;

use crate::classifier::{Classifier, ClassifierError};
use crate::prompt::{candidate_labels, join_candidates, render_prompt, resolve_label, unmatched};

/// Errors from [`RankingPipeline::rank_review`].
#[derive(Debug, thiserror::Error)]
pub enum RankingError {
    /// The sentiment vocabulary could not be read.
    #[error("Sentiment vocabulary unavailable: {0}")]
    VocabularyUnavailable(#[source] RepoError),

    /// The prompt template or classifier credential is absent or unusable.
    #[error("Configuration missing: {0}")]
    ConfigurationMissing(String),

    /// The classification call failed. Not retried.
    #[error("Classification failed: {0}")]
    ClassificationFailure(#[source] ClassifierError),

    /// The classifier answered outside the vocabulary and the policy is `reject`.
    #[error("Classifier returned unrecognized label '{0}'")]
    UnrecognizedLabel(String),

    /// No movie has the given `imdb_id`.
    #[error("Movie {0} not found")]
    NotFound(String),

    /// The review/ranking update failed.
    #[error("Failed to persist ranking: {0}")]
    Persistence(#[source] RepoError),
}

/// Outcome of a successful ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedReview {
    pub label_name: String,
    pub rank: i32,
}

/// Orchestrates vocabulary lookup, classification, and persistence.
pub struct RankingPipeline {
    labels: Arc<dyn SentimentRepository>,
    movies: Arc<dyn MovieRepository>,
    classifier: Arc<dyn Classifier>,
    prompt_template: Option<String>,
    policy: UnrankedPolicy,
}

impl RankingPipeline {
    pub fn new(
        labels: Arc<dyn SentimentRepository>,
        movies: Arc<dyn MovieRepository>,
        classifier: Arc<dyn Classifier>,
        prompt_template: Option<String>,
        policy: UnrankedPolicy,
    ) -> Self {
        Self {
            labels,
            movies,
            classifier,
            prompt_template,
            policy,
        }
    }

    /// Classify `review` and store it, with the resolved ranking, on the movie
    /// identified by `imdb_id`.
    pub async fn rank_review(
        &self,
        imdb_id: &str,
        review: &str,
    ) -> Result<RankedReview, RankingError> {
        // 1. Vocabulary.
        let labels = self
            .labels
            .list_labels()
            .await
            .map_err(RankingError::VocabularyUnavailable)?;

        // 2. Candidates.
        let candidates = candidate_labels(&labels);
        let candidate_list = join_candidates(&candidates);

        // 3. Prompt. Configuration is checked before any network call.
        let template = self.template()?;
        if !self.classifier.is_configured() {
            return Err(RankingError::ConfigurationMissing(
                "classification service credential is not set".into(),
            ));
        }
        let prompt = render_prompt(template, &candidate_list);

        // 4. Classify.
        let answer = self
            .classifier
            .classify(&format!("{prompt}{review}"))
            .await
            .map_err(RankingError::ClassificationFailure)?;

        // 5. Resolve.
        let ranking = match resolve_label(&answer, &candidates) {
            Some(ranking) => ranking,
            None => self.resolve_unmatched(&answer, &labels, &candidate_list)?,
        };

        // 6. Persist.
        let matched = self
            .movies
            .update_review_and_ranking(imdb_id, review, &ranking)
            .await
            .map_err(RankingError::Persistence)?;
        if matched == 0 {
            return Err(RankingError::NotFound(imdb_id.to_string()));
        }

        tracing::info!(
            imdb_id,
            label = %ranking.ranking_name,
            rank = ranking.ranking_value,
            "Admin review ranked"
        );

        Ok(RankedReview {
            label_name: ranking.ranking_name,
            rank: ranking.ranking_value,
        })
    }

    fn template(&self) -> Result<&str, RankingError> {
        let template = self
            .prompt_template
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| {
                RankingError::ConfigurationMissing("prompt template is not set".into())
            })?;
        if !template.contains(RANKINGS_PLACEHOLDER) {
            return Err(RankingError::ConfigurationMissing(format!(
                "prompt template has no {RANKINGS_PLACEHOLDER} placeholder"
            )));
        }
        Ok(template)
    }

    fn resolve_unmatched(
        &self,
        answer: &str,
        labels: &[Ranking],
        candidate_list: &str,
    ) -> Result<Ranking, RankingError> {
        tracing::warn!(
            answer,
            candidates = candidate_list,
            policy = %self.policy,
            "Classifier answered outside the sentiment vocabulary"
        );
        match self.policy {
            UnrankedPolicy::PassThrough => Ok(unmatched(answer)),
            UnrankedPolicy::Reject => Err(RankingError::UnrecognizedLabel(answer.to_string())),
            UnrankedPolicy::Sentinel => labels
                .iter()
                .find(|l| l.is_sentinel())
                .cloned()
                .ok_or_else(|| {
                    RankingError::ConfigurationMissing(
                        "sentiment vocabulary has no sentinel entry".into(),
                    )
                }),
        }
    }
}
