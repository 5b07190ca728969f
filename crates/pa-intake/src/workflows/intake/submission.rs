//! Boundary between the flat payload the intake wizard posts and the sectioned
//! [`IntakeForm`] record.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::costs::{parse_amount, CostBreakdown, CostInputs};
use super::domain::{
    ApplicantSection, ApplicantType, AttachedDocument, ComplianceCertification, ContactInfo,
    DisasterSection, DocType, FormStatus, InsuranceInfo, InsuranceType, IntakeForm,
    OrganizationType, PdaFileType, PdaUpload, PreviousFunding, ProjectSection, ProjectType,
    UserId,
};

/// Flat wizard payload. Every field is optional at this layer; required-ness is
/// checked when the payload is turned into an [`IntakeDraft`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IntakeSubmission {
    #[serde(deserialize_with = "loose_text")]
    pub user_id: Option<String>,
    pub ppda_upload: Option<PdaUploadInput>,

    #[serde(deserialize_with = "loose_text")]
    pub applicant_name: Option<String>,
    #[serde(deserialize_with = "loose_text")]
    pub applicant_type: Option<String>,
    #[serde(deserialize_with = "loose_text")]
    pub contact_name: Option<String>,
    #[serde(deserialize_with = "loose_text")]
    pub contact_title: Option<String>,
    #[serde(deserialize_with = "loose_text")]
    pub contact_email: Option<String>,
    #[serde(deserialize_with = "loose_text")]
    pub contact_phone: Option<String>,
    #[serde(deserialize_with = "loose_text")]
    pub organization_type: Option<String>,
    #[serde(rename = "federalEIN", deserialize_with = "loose_text")]
    pub federal_ein: Option<String>,
    #[serde(deserialize_with = "loose_text")]
    pub duns_number: Option<String>,

    #[serde(deserialize_with = "loose_text")]
    pub disaster_number: Option<String>,
    #[serde(deserialize_with = "loose_text")]
    pub disaster_type: Option<String>,
    #[serde(deserialize_with = "loose_text")]
    pub incident_date: Option<String>,
    #[serde(deserialize_with = "loose_text")]
    pub incident_start_date: Option<String>,
    #[serde(deserialize_with = "loose_text")]
    pub incident_end_date: Option<String>,
    #[serde(deserialize_with = "loose_text")]
    pub county_names: Option<String>,
    #[serde(deserialize_with = "loose_text")]
    pub city_names: Option<String>,
    #[serde(deserialize_with = "loose_text")]
    pub tribal_land_names: Option<String>,

    #[serde(deserialize_with = "loose_text")]
    pub project_name: Option<String>,
    #[serde(deserialize_with = "loose_text")]
    pub project_description: Option<String>,
    pub estimated_total_cost: Option<Value>,
    #[serde(deserialize_with = "loose_text")]
    pub project_type: Option<String>,
    #[serde(deserialize_with = "loose_text")]
    pub project_address: Option<String>,
    #[serde(deserialize_with = "loose_text")]
    pub project_latitude: Option<String>,
    #[serde(deserialize_with = "loose_text")]
    pub project_longitude: Option<String>,
    #[serde(deserialize_with = "loose_text")]
    pub project_area_location: Option<String>,
    #[serde(deserialize_with = "loose_text")]
    pub scope_of_work: Option<String>,

    pub labor_costs: Option<Value>,
    pub materials_supplies: Option<Value>,
    pub equipment_costs: Option<Value>,
    pub contracted_services: Option<Value>,
    pub other_costs: Option<Value>,

    pub has_insurance: Option<Value>,
    #[serde(deserialize_with = "loose_text")]
    pub insurance_type: Option<String>,
    #[serde(deserialize_with = "loose_text")]
    pub other_insurance_type: Option<String>,
    pub has_previous_funding: Option<Value>,
    #[serde(deserialize_with = "loose_text")]
    pub previous_funding_details: Option<String>,

    pub documents: Option<Vec<AttachedDocumentInput>>,

    pub complies_with_guidelines: Option<Value>,
    #[serde(deserialize_with = "loose_text")]
    pub non_compliance_areas: Option<String>,
    pub certificate_agree: Option<Value>,
    #[serde(deserialize_with = "loose_text")]
    pub signature_name: Option<String>,
    #[serde(deserialize_with = "loose_text")]
    pub signature_date: Option<String>,

    #[serde(deserialize_with = "loose_text")]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PdaUploadInput {
    pub has_uploaded_file: bool,
    #[serde(deserialize_with = "loose_text")]
    pub file_type: Option<String>,
    #[serde(deserialize_with = "loose_text")]
    pub file_name: Option<String>,
    #[serde(deserialize_with = "loose_text")]
    pub file_path: Option<String>,
    pub extracted_data: Option<Map<String, Value>>,
    #[serde(deserialize_with = "loose_text")]
    pub upload_date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AttachedDocumentInput {
    #[serde(deserialize_with = "loose_text")]
    pub doc_type: Option<String>,
    #[serde(deserialize_with = "loose_text")]
    pub file_name: Option<String>,
    #[serde(deserialize_with = "loose_text")]
    pub file_path: Option<String>,
    #[serde(deserialize_with = "loose_text")]
    pub upload_date: Option<String>,
}

/// Whether the payload starts a new record or amends an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftMode {
    Create,
    Update,
}

/// Validated, sectioned form content ready to be placed on a record.
#[derive(Debug, Clone, PartialEq)]
pub struct IntakeDraft {
    pub user: Option<UserId>,
    pub pda_upload: Option<PdaUpload>,
    pub applicant: ApplicantSection,
    pub disaster: DisasterSection,
    pub project: ProjectSection,
    pub cost_breakdown: CostBreakdown,
    pub insurance_info: InsuranceInfo,
    pub previous_funding: PreviousFunding,
    pub documents: Option<Vec<AttachedDocument>>,
    pub compliance: ComplianceCertification,
    pub status: Option<FormStatus>,
}

/// Every field problem found while validating a submission.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Intake form validation failed: {}", .problems.join("; "))]
pub struct IntakeValidationError {
    pub problems: Vec<String>,
}

impl IntakeSubmission {
    pub fn cost_inputs(&self) -> CostInputs {
        CostInputs {
            labor_costs: self.labor_costs.clone(),
            materials_supplies: self.materials_supplies.clone(),
            equipment_costs: self.equipment_costs.clone(),
            contracted_services: self.contracted_services.clone(),
            other_costs: self.other_costs.clone(),
        }
    }

    /// Fill blank identity, applicant, disaster and project fields from an
    /// existing record. Cost, insurance, funding and certification sections are
    /// deliberately not overlaid: an update replaces them outright.
    pub fn overlay(mut self, existing: &IntakeForm) -> Self {
        let applicant = &existing.applicant;
        keep(&mut self.applicant_name, &applicant.name);
        keep(&mut self.applicant_type, applicant.applicant_type.label());
        keep(&mut self.contact_name, &applicant.contact.name);
        keep(&mut self.contact_title, &applicant.contact.title);
        keep(&mut self.contact_email, &applicant.contact.email);
        keep(&mut self.contact_phone, &applicant.contact.phone);
        keep(&mut self.organization_type, applicant.organization_type.label());
        keep(&mut self.federal_ein, &applicant.federal_ein);
        keep_optional(&mut self.duns_number, applicant.duns_number.as_deref());

        let disaster = &existing.disaster;
        keep(&mut self.disaster_number, &disaster.disaster_number);
        keep(&mut self.disaster_type, &disaster.disaster_type);
        keep(&mut self.incident_date, &disaster.incident_date.to_rfc3339());
        keep(
            &mut self.incident_start_date,
            &disaster.incident_start_date.to_rfc3339(),
        );
        keep(
            &mut self.incident_end_date,
            &disaster.incident_end_date.to_rfc3339(),
        );
        keep(&mut self.county_names, &disaster.county_names);
        keep(&mut self.city_names, &disaster.city_names);
        keep_optional(
            &mut self.tribal_land_names,
            disaster.tribal_land_names.as_deref(),
        );

        let project = &existing.project;
        keep(&mut self.project_name, &project.name);
        keep(&mut self.project_description, &project.description);
        if parse_amount(self.estimated_total_cost.as_ref()) == 0.0 {
            self.estimated_total_cost = serde_json::Number::from_f64(project.estimated_total_cost)
                .map(Value::Number);
        }
        keep(&mut self.project_type, project.project_type.label());
        keep(&mut self.project_address, &project.address);
        keep_optional(&mut self.project_latitude, project.latitude.as_deref());
        keep_optional(&mut self.project_longitude, project.longitude.as_deref());
        keep(&mut self.project_area_location, &project.area_location);
        keep(&mut self.scope_of_work, &project.scope_of_work);

        self
    }

    pub fn into_draft(
        self,
        mode: DraftMode,
        now: DateTime<Utc>,
    ) -> Result<IntakeDraft, IntakeValidationError> {
        let mut check = FieldCheck::default();
        let cost_breakdown = self.cost_inputs().aggregate();

        let user = match (mode, present(self.user_id)) {
            (_, Some(user)) => Some(UserId(user.trim().to_string())),
            (DraftMode::Create, None) => {
                check.missing("userId");
                None
            }
            (DraftMode::Update, None) => None,
        };

        let pda_upload = self
            .ppda_upload
            .map(|input| input.into_upload(&mut check, now));

        let applicant = ApplicantSection {
            name: check.required("applicantName", self.applicant_name),
            applicant_type: check.required_choice(
                "applicantType",
                self.applicant_type,
                ApplicantType::parse,
            ),
            contact: ContactInfo {
                name: check.required("contactName", self.contact_name),
                title: check.required("contactTitle", self.contact_title),
                email: check.required("contactEmail", self.contact_email),
                phone: check.required("contactPhone", self.contact_phone),
            },
            organization_type: check.required_choice(
                "organizationType",
                self.organization_type,
                OrganizationType::parse,
            ),
            federal_ein: check.required("federalEIN", self.federal_ein),
            duns_number: present(self.duns_number),
        };

        let disaster = DisasterSection {
            disaster_number: check.required("disasterNumber", self.disaster_number),
            disaster_type: check.required("disasterType", self.disaster_type),
            incident_date: check.required_date("incidentDate", self.incident_date),
            incident_start_date: check.required_date("incidentStartDate", self.incident_start_date),
            incident_end_date: check.required_date("incidentEndDate", self.incident_end_date),
            county_names: check.required("countyNames", self.county_names),
            city_names: check.required("cityNames", self.city_names),
            tribal_land_names: present(self.tribal_land_names),
        };

        let project = ProjectSection {
            name: check.required("projectName", self.project_name),
            description: check.required("projectDescription", self.project_description),
            estimated_total_cost: parse_amount(self.estimated_total_cost.as_ref()),
            project_type: check.required_choice("projectType", self.project_type, ProjectType::parse),
            address: check.required("projectAddress", self.project_address),
            latitude: present(self.project_latitude),
            longitude: present(self.project_longitude),
            area_location: check.required("projectAreaLocation", self.project_area_location),
            scope_of_work: check.required("scopeOfWork", self.scope_of_work),
        };

        let insurance_info = InsuranceInfo {
            has_insurance: yes_flag(self.has_insurance.as_ref()),
            insurance_type: check.optional_choice(
                "insuranceType",
                self.insurance_type,
                InsuranceType::parse,
            ),
            other_insurance_type: present(self.other_insurance_type),
        };

        let previous_funding = PreviousFunding {
            has_previous_funding: yes_flag(self.has_previous_funding.as_ref()),
            details: present(self.previous_funding_details),
        };

        let documents = self.documents.map(|inputs| {
            inputs
                .into_iter()
                .enumerate()
                .filter_map(|(index, input)| input.into_document(index, &mut check, now))
                .collect()
        });

        let compliance = ComplianceCertification {
            complies_with_guidelines: yes_flag(self.complies_with_guidelines.as_ref()),
            non_compliance_areas: present(self.non_compliance_areas),
            certificate_agree: agreed(self.certificate_agree.as_ref()),
            signature_name: check.required("signatureName", self.signature_name),
            signature_date: check.required_date("signatureDate", self.signature_date),
        };

        let status = check.optional_choice("status", self.status, FormStatus::parse);

        check.finish()?;

        Ok(IntakeDraft {
            user,
            pda_upload,
            applicant,
            disaster,
            project,
            cost_breakdown,
            insurance_info,
            previous_funding,
            documents,
            compliance,
            status,
        })
    }
}

impl PdaUploadInput {
    fn into_upload(self, check: &mut FieldCheck, now: DateTime<Utc>) -> PdaUpload {
        let upload_date = match present(self.upload_date) {
            Some(raw) => check.date("ppdaUpload.uploadDate", &raw),
            None => Some(now),
        };
        PdaUpload {
            has_uploaded_file: self.has_uploaded_file,
            file_type: check.optional_choice("ppdaUpload.fileType", self.file_type, PdaFileType::parse),
            file_name: present(self.file_name),
            file_path: present(self.file_path),
            extracted_data: self.extracted_data.unwrap_or_default(),
            upload_date,
        }
    }
}

impl AttachedDocumentInput {
    fn into_document(
        self,
        index: usize,
        check: &mut FieldCheck,
        now: DateTime<Utc>,
    ) -> Option<AttachedDocument> {
        let prefix = format!("documents[{index}]");
        let doc_type = check.required_choice_opt(&format!("{prefix}.docType"), self.doc_type, DocType::parse);
        let file_name = check.required(&format!("{prefix}.fileName"), self.file_name);
        let file_path = present(self.file_path).unwrap_or_default();
        let upload_date = match present(self.upload_date) {
            Some(raw) => check.date(&format!("{prefix}.uploadDate"), &raw)?,
            None => now,
        };
        Some(AttachedDocument {
            doc_type: doc_type?,
            file_name,
            file_path,
            upload_date,
        })
    }
}

/// Collects field problems so one response can report all of them.
#[derive(Debug, Default)]
struct FieldCheck {
    problems: Vec<String>,
}

impl FieldCheck {
    fn missing(&mut self, field: &str) {
        self.problems.push(format!("{field} is required"));
    }

    fn invalid(&mut self, field: &str, raw: &str) {
        self.problems
            .push(format!("{field} `{raw}` is not a valid value"));
    }

    fn required(&mut self, field: &str, value: Option<String>) -> String {
        match present(value) {
            Some(value) => value,
            None => {
                self.missing(field);
                String::new()
            }
        }
    }

    fn required_choice<T: Default>(
        &mut self,
        field: &str,
        value: Option<String>,
        parse: fn(&str) -> Option<T>,
    ) -> T {
        self.required_choice_opt(field, value, parse)
            .unwrap_or_default()
    }

    fn required_choice_opt<T>(
        &mut self,
        field: &str,
        value: Option<String>,
        parse: fn(&str) -> Option<T>,
    ) -> Option<T> {
        match present(value) {
            Some(raw) => {
                let parsed = parse(raw.trim());
                if parsed.is_none() {
                    self.invalid(field, &raw);
                }
                parsed
            }
            None => {
                self.missing(field);
                None
            }
        }
    }

    fn optional_choice<T>(
        &mut self,
        field: &str,
        value: Option<String>,
        parse: fn(&str) -> Option<T>,
    ) -> Option<T> {
        let raw = present(value)?;
        let parsed = parse(raw.trim());
        if parsed.is_none() {
            self.invalid(field, &raw);
        }
        parsed
    }

    fn date(&mut self, field: &str, raw: &str) -> Option<DateTime<Utc>> {
        let parsed = parse_date(raw);
        if parsed.is_none() {
            self.problems
                .push(format!("{field} `{raw}` is not a valid date"));
        }
        parsed
    }

    fn required_date(&mut self, field: &str, value: Option<String>) -> DateTime<Utc> {
        match present(value) {
            Some(raw) => self.date(field, &raw).unwrap_or_default(),
            None => {
                self.missing(field);
                DateTime::<Utc>::default()
            }
        }
    }

    fn finish(self) -> Result<(), IntakeValidationError> {
        if self.problems.is_empty() {
            Ok(())
        } else {
            Err(IntakeValidationError {
                problems: self.problems,
            })
        }
    }
}

/// Accepts RFC 3339 timestamps, naive `YYYY-MM-DDTHH:MM:SS` and plain dates.
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(parsed.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|datetime| datetime.and_utc())
}

/// Blank input counts as absent; anything else is kept exactly as submitted.
pub(crate) fn present(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

fn keep(slot: &mut Option<String>, existing: &str) {
    if present(slot.clone()).is_none() {
        *slot = Some(existing.to_string());
    }
}

fn keep_optional(slot: &mut Option<String>, existing: Option<&str>) {
    if let Some(existing) = existing {
        keep(slot, existing);
    }
}

/// Radio answers arrive as `"yes"`/`"no"`; a JSON `true` is accepted as well.
pub(crate) fn yes_flag(value: Option<&Value>) -> bool {
    match value {
        Some(Value::String(raw)) => raw == "yes",
        Some(Value::Bool(flag)) => *flag,
        _ => false,
    }
}

pub(crate) fn agreed(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(flag)) => *flag,
        Some(Value::Number(number)) => number.as_f64() == Some(1.0),
        Some(Value::String(raw)) => matches!(raw.trim(), "true" | "yes" | "on" | "1"),
        _ => false,
    }
}

fn loose_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(text)) => Some(text),
        Some(Value::Number(number)) => Some(number.to_string()),
        Some(Value::Bool(flag)) => Some(flag.to_string()),
        _ => None,
    })
}
