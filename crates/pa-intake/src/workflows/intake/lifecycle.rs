//! Draft creation, update application and submission of intake forms.

use chrono::{DateTime, Utc};

use super::domain::{
    AiProcessingResults, FormStatus, GeneratedForm, IntakeForm, IntakeFormId, PappgCompliance,
};
use super::submission::{IntakeDraft, IntakeValidationError};

/// Placeholder probability given to every new draft.
pub const INITIAL_APPROVAL_PROBABILITY: f64 = 0.68;
/// Probability recorded once the FEMA forms have been generated.
pub const SUBMITTED_APPROVAL_PROBABILITY: f64 = 0.85;

const INITIAL_RECOMMENDATIONS: [&str; 3] = [
    "Complete all required fields",
    "Upload supporting documentation",
    "Ensure cost estimates are detailed and accurate",
];

/// Form type and file name prefix of every generated FEMA form, in output order.
pub const GENERATED_FORM_TYPES: [(&str, &str); 5] = [
    ("FEMA Form 009-0-91", "PW"),
    ("FEMA Form 009-0-91B", "PW_CostEstimate"),
    ("FEMA Form 009-0-123", "LaborSummary"),
    ("FEMA Form 009-0-127", "EquipmentSummary"),
    ("FEMA Form 009-0-124", "MaterialsSummary"),
];

pub fn initial_processing_results() -> AiProcessingResults {
    AiProcessingResults {
        approval_probability: INITIAL_APPROVAL_PROBABILITY,
        validation_warnings: Vec::new(),
        recommendations: INITIAL_RECOMMENDATIONS
            .iter()
            .map(|recommendation| recommendation.to_string())
            .collect(),
        pappg_compliance: PappgCompliance {
            is_compliant: true,
            compliance_issues: Vec::new(),
            compliance_score: None,
        },
    }
}

pub fn generated_form_stubs(id: &IntakeFormId, now: DateTime<Utc>) -> Vec<GeneratedForm> {
    GENERATED_FORM_TYPES
        .iter()
        .map(|(form_type, prefix)| {
            let file_name = format!("{prefix}_{}.pdf", id.0);
            GeneratedForm {
                form_type: form_type.to_string(),
                file_path: format!("/generated/{file_name}"),
                file_name,
                generated_date: now,
            }
        })
        .collect()
}

impl IntakeForm {
    /// New draft record. The draft's own status is ignored; forms always start as drafts.
    pub fn from_draft(
        id: IntakeFormId,
        draft: IntakeDraft,
        now: DateTime<Utc>,
    ) -> Result<Self, IntakeValidationError> {
        let user = draft.user.ok_or_else(|| IntakeValidationError {
            problems: vec!["userId is required".to_string()],
        })?;

        Ok(Self {
            id,
            user,
            pda_upload: draft.pda_upload.unwrap_or_default(),
            applicant: draft.applicant,
            disaster: draft.disaster,
            project: draft.project,
            cost_breakdown: draft.cost_breakdown,
            insurance_info: draft.insurance_info,
            previous_funding: draft.previous_funding,
            documents: draft.documents.unwrap_or_default(),
            compliance: draft.compliance,
            generated_forms: Vec::new(),
            status: FormStatus::Draft,
            ai_processing_results: initial_processing_results(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Replace the form's sections with a merged draft. Ownership never changes.
    pub fn apply_draft(&mut self, draft: IntakeDraft, now: DateTime<Utc>) {
        if let Some(pda_upload) = draft.pda_upload {
            self.pda_upload = pda_upload;
        }
        self.applicant = draft.applicant;
        self.disaster = draft.disaster;
        self.project = draft.project;
        self.cost_breakdown = draft.cost_breakdown;
        self.insurance_info = draft.insurance_info;
        self.previous_funding = draft.previous_funding;
        if let Some(documents) = draft.documents {
            self.documents = documents;
        }
        self.compliance = draft.compliance;
        if let Some(status) = draft.status {
            self.status = status;
        }
        self.updated_at = now;
    }

    /// Attach the generated FEMA form stubs and move to `Submitted`.
    ///
    /// Certification and completeness are not checked here.
    pub fn submit(&mut self, now: DateTime<Utc>) {
        self.generated_forms = generated_form_stubs(&self.id, now);
        self.status = FormStatus::Submitted;
        self.ai_processing_results.approval_probability = SUBMITTED_APPROVAL_PROBABILITY;
        self.updated_at = now;
    }
}
