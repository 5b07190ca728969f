use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tracing::{info, warn};

use super::domain::{IntakeForm, IntakeFormId, UserId, ValidationReport};
use super::evaluation::{ComplianceEvaluator, ComplianceSnapshot, EvaluationConfig, RuleSet};
use super::repository::IntakeFormRepository;
use super::submission::{DraftMode, IntakeSubmission, IntakeValidationError};
use crate::store::RepositoryError;
use crate::workflows::assistant::{AssistantError, CompletionClient, IntakeAssistant};

const ENTITY: &str = "Intake form";

/// Service composing the form repository, the compliance evaluator and the AI assistant.
pub struct IntakeFormService<R, C> {
    repository: Arc<R>,
    assistant: Arc<IntakeAssistant<C>>,
    evaluator: ComplianceEvaluator,
}

impl<R, C> IntakeFormService<R, C>
where
    R: IntakeFormRepository + 'static,
    C: CompletionClient + 'static,
{
    pub fn new(repository: Arc<R>, client: Arc<C>, config: EvaluationConfig) -> Self {
        let evaluator = ComplianceEvaluator::new(config);
        let assistant = Arc::new(IntakeAssistant::new(client, evaluator.clone()));
        Self {
            repository,
            assistant,
            evaluator,
        }
    }

    /// Store a new draft with baseline processing results.
    pub fn create(&self, submission: IntakeSubmission) -> Result<IntakeForm, IntakeServiceError> {
        let now = Utc::now();
        let draft = submission.into_draft(DraftMode::Create, now)?;
        let form = IntakeForm::from_draft(IntakeFormId::generate(), draft, now)?;

        let stored = self.repository.insert(form)?;
        info!(
            form_id = %stored.id.0,
            user = %stored.user.0,
            total = stored.cost_breakdown.total,
            "intake form created"
        );
        Ok(stored)
    }

    pub fn list_for_user(&self, user: &UserId) -> Result<Vec<IntakeForm>, IntakeServiceError> {
        Ok(self.repository.by_user(user)?)
    }

    pub fn get(&self, id: &IntakeFormId) -> Result<IntakeForm, IntakeServiceError> {
        let form = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::not_found(ENTITY))?;
        Ok(form)
    }

    /// Merge a payload into a stored form and re-score it with the update rules.
    pub fn update(
        &self,
        id: &IntakeFormId,
        submission: IntakeSubmission,
    ) -> Result<IntakeForm, IntakeServiceError> {
        let mut form = self.get(id)?;
        let now = Utc::now();

        let draft = submission.overlay(&form).into_draft(DraftMode::Update, now)?;
        form.apply_draft(draft, now);

        let assessment = self
            .evaluator
            .assess(&ComplianceSnapshot::of_form(&form), RuleSet::Update);
        form.ai_processing_results = assessment.processing_results();

        let stored = self.repository.update(form)?;
        info!(
            form_id = %stored.id.0,
            warnings = stored.ai_processing_results.validation_warnings.len(),
            probability = stored.ai_processing_results.approval_probability,
            "intake form updated"
        );
        Ok(stored)
    }

    /// Attach the FEMA form stubs and mark the form submitted.
    pub fn generate(&self, id: &IntakeFormId) -> Result<IntakeForm, IntakeServiceError> {
        let mut form = self.get(id)?;
        form.submit(Utc::now());

        let stored = self.repository.update(form)?;
        info!(
            form_id = %stored.id.0,
            generated = stored.generated_forms.len(),
            "FEMA forms generated"
        );
        Ok(stored)
    }

    /// PAPPG review of a stored form; the outcome is persisted on the record.
    pub async fn validate(&self, id: &IntakeFormId) -> Result<ValidationReport, IntakeServiceError> {
        let mut form = self.get(id)?;

        let snapshot = ComplianceSnapshot::of_form(&form);
        let report = match serde_json::to_value(&form) {
            Ok(payload) => self.assistant.review_or_fallback(&payload, &snapshot).await,
            Err(error) => {
                warn!(%error, form_id = %form.id.0, "form not serializable for AI review; scoring with local review rules");
                self.evaluator
                    .assess(&snapshot, RuleSet::Review)
                    .validation_report()
            }
        };

        form.ai_processing_results.pappg_compliance = report.pappg_compliance();
        form.updated_at = Utc::now();
        self.repository.update(form)?;

        Ok(report)
    }

    /// PAPPG review of an unsaved payload. Nothing is persisted.
    pub async fn validate_submission(&self, payload: &Value) -> ValidationReport {
        let submission: IntakeSubmission =
            serde_json::from_value(payload.clone()).unwrap_or_default();
        self.assistant
            .review_or_fallback(payload, &ComplianceSnapshot::of_submission(&submission))
            .await
    }

    pub async fn suggestions(&self, payload: &Value) -> Result<Value, IntakeServiceError> {
        Ok(self.assistant.suggestions(payload).await?)
    }

    pub async fn validate_costs(&self, payload: &Value) -> Result<Value, IntakeServiceError> {
        Ok(self.assistant.review_costs(payload).await?)
    }

    pub async fn extract_pda(
        &self,
        contents: &[u8],
        file_type: &str,
    ) -> Result<Value, IntakeServiceError> {
        let extracted = self.assistant.extract_document(contents, file_type).await?;
        info!(file_type, bytes = contents.len(), "PDA document processed");
        Ok(extracted)
    }
}

/// Error raised by the intake form service.
#[derive(Debug, thiserror::Error)]
pub enum IntakeServiceError {
    #[error(transparent)]
    Validation(#[from] IntakeValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Assistant(#[from] AssistantError),
}
