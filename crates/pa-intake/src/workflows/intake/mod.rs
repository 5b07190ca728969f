//! FEMA Public Assistance intake forms: submission boundary, cost aggregation,
//! compliance scoring and the Draft to Submitted lifecycle.

pub mod costs;
pub mod domain;
pub mod evaluation;
pub mod lifecycle;
pub mod repository;
pub mod router;
pub mod service;
pub mod submission;

#[cfg(test)]
mod tests;

pub use costs::{parse_amount, CostBreakdown, CostInputs};
pub use domain::{
    AiProcessingResults, ApplicantSection, ApplicantType, AttachedDocument,
    ComplianceCertification, ContactInfo, DisasterSection, DocType, FormStatus, GeneratedForm,
    InsuranceInfo, InsuranceType, IntakeForm, IntakeFormId, OrganizationType, PappgCompliance,
    PdaFileType, PdaUpload, PreviousFunding, ProjectSection, ProjectType, UserId,
    ValidationIssue, ValidationReport,
};
pub use evaluation::{
    ComplianceAssessment, ComplianceEvaluator, ComplianceScore, ComplianceSnapshot,
    EvaluationConfig, RuleSet,
};
pub use repository::IntakeFormRepository;
pub use router::intake_router;
pub use service::{IntakeFormService, IntakeServiceError};
pub use submission::{DraftMode, IntakeDraft, IntakeSubmission, IntakeValidationError};
