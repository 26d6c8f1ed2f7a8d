pub mod intake;

use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use dottie_core::{
    chat_seed, classify_with_trace, verify_catalog, AssessmentError, AssessmentResult,
    Classification, RawAnswers,
};
use dottie_observability::AppMetrics;
use dottie_storage::{AssessmentRepository, StoredAssessment};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

pub use intake::answers_from_session;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Invalid(#[from] AssessmentError),
    #[error("assessment `{0}` not found")]
    NotFound(String),
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// A classified assessment together with the rules that produced it.
#[derive(Debug, Clone, Serialize)]
pub struct Assessment {
    pub result: AssessmentResult,
    pub classification: Classification,
}

pub struct AssessmentService<S>
where
    S: AssessmentRepository,
{
    store: Arc<S>,
    metrics: Arc<AppMetrics>,
}

impl<S> Clone for AssessmentService<S>
where
    S: AssessmentRepository,
{
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            metrics: self.metrics.clone(),
        }
    }
}

impl<S> AssessmentService<S>
where
    S: AssessmentRepository,
{
    /// Refuses to start when the recommendation catalog is unusable.
    pub fn new(store: Arc<S>, metrics: Arc<AppMetrics>) -> anyhow::Result<Self> {
        verify_catalog().context("recommendation catalog is incomplete")?;
        Ok(Self { store, metrics })
    }

    pub fn metrics(&self) -> &Arc<AppMetrics> {
        &self.metrics
    }

    #[instrument(skip_all)]
    pub fn assess(&self, answers: &RawAnswers) -> Assessment {
        let started = Instant::now();
        self.metrics.inc_request();

        if answers.is_empty() {
            self.metrics.inc_empty_default();
            warn!("assessment has no answers; falling back to the default pattern");
        }

        let classification = classify_with_trace(answers);
        debug!(path = ?classification.path, "decision path");
        self.metrics
            .record_classification(classification.pattern.as_str());

        let result = AssessmentResult::from_classification(answers, &classification);

        self.metrics.observe_latency(started.elapsed());
        info!(
            pattern = %classification.pattern,
            decided_by = ?classification.decided_by,
            "assessment classified"
        );

        Assessment {
            result,
            classification,
        }
    }

    #[instrument(skip(self, answers))]
    pub async fn save(
        &self,
        user_id: &str,
        answers: &RawAnswers,
    ) -> ServiceResult<StoredAssessment> {
        let assessment = self.assess(answers);
        assessment.result.ensure_persistable()?;

        let stored = self.store.insert(user_id, assessment.result).await?;
        self.metrics.inc_persisted();
        info!(id = %stored.id, pattern = %stored.result.pattern, "assessment saved");

        Ok(stored)
    }

    pub async fn get(&self, id: &str) -> ServiceResult<StoredAssessment> {
        self.metrics.inc_request();
        self.store
            .get(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(id.to_string()))
    }

    pub async fn history(&self, user_id: &str) -> ServiceResult<Vec<StoredAssessment>> {
        self.metrics.inc_request();
        Ok(self.store.list_for_user(user_id).await?)
    }

    /// Re-derives the whole result from new answers and swaps it in.
    #[instrument(skip(self, answers))]
    pub async fn replace(
        &self,
        id: &str,
        answers: &RawAnswers,
    ) -> ServiceResult<StoredAssessment> {
        let assessment = self.assess(answers);
        assessment.result.ensure_persistable()?;

        let stored = self
            .store
            .replace(id, assessment.result)
            .await?
            .ok_or_else(|| ServiceError::NotFound(id.to_string()))?;
        info!(id = %stored.id, pattern = %stored.result.pattern, "assessment replaced");

        Ok(stored)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> ServiceResult<()> {
        self.metrics.inc_request();
        if self.store.delete(id).await? {
            info!(id = %id, "assessment deleted");
            Ok(())
        } else {
            Err(ServiceError::NotFound(id.to_string()))
        }
    }

    pub async fn chat_seed(&self, id: &str) -> ServiceResult<String> {
        let stored = self.get(id).await?;
        Ok(chat_seed(stored.result.pattern))
    }
}
