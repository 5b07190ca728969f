use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::costs::CostBreakdown;

/// Identifier wrapper for intake forms.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IntakeFormId(pub String);

impl IntakeFormId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }
}

/// Reference to the user that owns a form or project.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicantType {
    State,
    Local,
    Tribal,
    Nonprofit,
    #[default]
    Other,
}

impl ApplicantType {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "state" => Some(Self::State),
            "local" => Some(Self::Local),
            "tribal" => Some(Self::Tribal),
            "nonprofit" => Some(Self::Nonprofit),
            "other" => Some(Self::Other),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::State => "state",
            Self::Local => "local",
            Self::Tribal => "tribal",
            Self::Nonprofit => "nonprofit",
            Self::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrganizationType {
    Government,
    Nonprofit,
    #[default]
    Other,
}

impl OrganizationType {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "government" => Some(Self::Government),
            "nonprofit" => Some(Self::Nonprofit),
            "other" => Some(Self::Other),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Government => "government",
            Self::Nonprofit => "nonprofit",
            Self::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectType {
    PublicInfrastructure,
    EmergencyResponse,
    TemporaryHousing,
    CommunityServices,
    #[default]
    Other,
}

impl ProjectType {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "public-infrastructure" => Some(Self::PublicInfrastructure),
            "emergency-response" => Some(Self::EmergencyResponse),
            "temporary-housing" => Some(Self::TemporaryHousing),
            "community-services" => Some(Self::CommunityServices),
            "other" => Some(Self::Other),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::PublicInfrastructure => "public-infrastructure",
            Self::EmergencyResponse => "emergency-response",
            Self::TemporaryHousing => "temporary-housing",
            Self::CommunityServices => "community-services",
            Self::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsuranceType {
    Property,
    Liability,
    Other,
}

impl InsuranceType {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "property" => Some(Self::Property),
            "liability" => Some(Self::Liability),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

/// Survey formats accepted for pre-filling a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PdaFileType {
    Pda,
    Survey123,
    Other,
}

impl PdaFileType {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "pda" => Some(Self::Pda),
            "survey123" => Some(Self::Survey123),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

/// Supporting document categories FEMA reviewers expect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DocType {
    ProjectWorksheets,
    CostEstimates,
    MapsPlans,
    InsuranceDocs,
    DamagePhotos,
    OtherDocs,
}

impl DocType {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "projectWorksheets" => Some(Self::ProjectWorksheets),
            "costEstimates" => Some(Self::CostEstimates),
            "mapsPlans" => Some(Self::MapsPlans),
            "insuranceDocs" => Some(Self::InsuranceDocs),
            "damagePhotos" => Some(Self::DamagePhotos),
            "otherDocs" => Some(Self::OtherDocs),
            _ => None,
        }
    }
}

/// Lifecycle of an intake form. Only `Draft` and `Submitted` are driven here;
/// review outcomes are set by whoever processes submitted applications.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormStatus {
    #[default]
    Draft,
    Submitted,
    #[serde(rename = "Under Review")]
    UnderReview,
    Approved,
    Denied,
}

impl FormStatus {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "Draft" => Some(Self::Draft),
            "Submitted" => Some(Self::Submitted),
            "Under Review" => Some(Self::UnderReview),
            "Approved" => Some(Self::Approved),
            "Denied" => Some(Self::Denied),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Submitted => "Submitted",
            Self::UnderReview => "Under Review",
            Self::Approved => "Approved",
            Self::Denied => "Denied",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PdaUpload {
    pub has_uploaded_file: bool,
    pub file_type: Option<PdaFileType>,
    pub file_name: Option<String>,
    pub file_path: Option<String>,
    #[serde(default)]
    pub extracted_data: Map<String, Value>,
    pub upload_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfo {
    pub name: String,
    pub title: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantSection {
    pub name: String,
    pub applicant_type: ApplicantType,
    pub contact: ContactInfo,
    pub organization_type: OrganizationType,
    #[serde(rename = "federalEIN")]
    pub federal_ein: String,
    pub duns_number: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisasterSection {
    pub disaster_number: String,
    pub disaster_type: String,
    pub incident_date: DateTime<Utc>,
    pub incident_start_date: DateTime<Utc>,
    pub incident_end_date: DateTime<Utc>,
    pub county_names: String,
    pub city_names: String,
    pub tribal_land_names: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSection {
    pub name: String,
    pub description: String,
    pub estimated_total_cost: f64,
    pub project_type: ProjectType,
    pub address: String,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub area_location: String,
    pub scope_of_work: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsuranceInfo {
    pub has_insurance: bool,
    pub insurance_type: Option<InsuranceType>,
    pub other_insurance_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviousFunding {
    pub has_previous_funding: bool,
    #[serde(rename = "previousFundingDetails")]
    pub details: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachedDocument {
    pub doc_type: DocType,
    pub file_name: String,
    pub file_path: String,
    pub upload_date: DateTime<Utc>,
}

/// Certification block; `certificate_agree` must be set before the client
/// allows final generation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceCertification {
    pub complies_with_guidelines: bool,
    pub non_compliance_areas: Option<String>,
    pub certificate_agree: bool,
    pub signature_name: String,
    pub signature_date: DateTime<Utc>,
}

/// Placeholder record for an output form; no document is rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedForm {
    pub form_type: String,
    pub file_name: String,
    pub file_path: String,
    pub generated_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PappgCompliance {
    pub is_compliant: bool,
    pub compliance_issues: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compliance_score: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiProcessingResults {
    pub approval_probability: f64,
    pub validation_warnings: Vec<String>,
    pub recommendations: Vec<String>,
    pub pappg_compliance: PappgCompliance,
}

/// A single grant application's full structured submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntakeForm {
    #[serde(rename = "_id")]
    pub id: IntakeFormId,
    pub user: UserId,
    #[serde(rename = "ppdaUpload")]
    pub pda_upload: PdaUpload,
    pub applicant: ApplicantSection,
    pub disaster: DisasterSection,
    pub project: ProjectSection,
    pub cost_breakdown: CostBreakdown,
    pub insurance_info: InsuranceInfo,
    pub previous_funding: PreviousFunding,
    pub documents: Vec<AttachedDocument>,
    pub compliance: ComplianceCertification,
    pub generated_forms: Vec<GeneratedForm>,
    pub status: FormStatus,
    pub ai_processing_results: AiProcessingResults,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A single PAPPG review finding, as produced by the AI reviewer or the local rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationIssue {
    pub field: String,
    pub severity: String,
    pub message: String,
    pub suggestion: String,
}

impl Default for ValidationIssue {
    fn default() -> Self {
        Self {
            field: "unknown".to_string(),
            severity: "warning".to_string(),
            message: String::new(),
            suggestion: String::new(),
        }
    }
}

/// Result of a PAPPG review on the 0-100 compliance scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub is_valid: bool,
    pub validation_score: f64,
    #[serde(default)]
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn pappg_compliance(&self) -> PappgCompliance {
        PappgCompliance {
            is_compliant: self.is_valid,
            compliance_issues: self
                .issues
                .iter()
                .map(|issue| issue.message.clone())
                .collect(),
            compliance_score: Some(self.validation_score),
        }
    }
}
