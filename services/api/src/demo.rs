use crate::infra::{InMemoryDocuments, InMemoryIntakeForms, InMemoryProjects};
use chrono::Utc;
use clap::Args;
use pa_intake::config::AppConfig;
use pa_intake::error::AppError;
use pa_intake::workflows::assistant::AnthropicClient;
use pa_intake::workflows::intake::{
    EvaluationConfig, IntakeFormService, IntakeServiceError, IntakeSubmission,
};
use pa_intake::workflows::projects::{
    DocumentService, DocumentServiceError, LocalUploadStore, ProjectInput, ProjectService,
    ProjectServiceError,
};
use serde::Serialize;
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Directory for the sample upload. Defaults to a folder under the system temp dir.
    #[arg(long)]
    pub(crate) uploads_dir: Option<PathBuf>,
    /// Print full JSON records instead of one-line summaries.
    #[arg(long)]
    pub(crate) verbose: bool,
}

#[derive(Debug)]
enum DemoError {
    Project(ProjectServiceError),
    Document(DocumentServiceError),
    Intake(IntakeServiceError),
}

impl std::fmt::Display for DemoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DemoError::Project(err) => write!(f, "project step failed: {err}"),
            DemoError::Document(err) => write!(f, "document step failed: {err}"),
            DemoError::Intake(err) => write!(f, "intake step failed: {err}"),
        }
    }
}

impl From<ProjectServiceError> for DemoError {
    fn from(value: ProjectServiceError) -> Self {
        Self::Project(value)
    }
}

impl From<DocumentServiceError> for DemoError {
    fn from(value: DocumentServiceError) -> Self {
        Self::Document(value)
    }
}

impl From<IntakeServiceError> for DemoError {
    fn from(value: IntakeServiceError) -> Self {
        Self::Intake(value)
    }
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let uploads_dir = args
        .uploads_dir
        .clone()
        .unwrap_or_else(|| std::env::temp_dir().join("pa-intake-demo"));

    println!("FEMA Public Assistance intake walkthrough ({})", Utc::now().to_rfc3339());
    if config.ai.api_key.is_none() {
        println!("LLM_API_KEY is not set; validation will use the local PAPPG rules.");
    }

    let completion = Arc::new(AnthropicClient::new(&config.ai)?);
    if let Err(err) = walkthrough(completion, uploads_dir, args.verbose).await {
        eprintln!("{err}");
    }
    Ok(())
}

async fn walkthrough(
    completion: Arc<AnthropicClient>,
    uploads_dir: PathBuf,
    verbose: bool,
) -> Result<(), DemoError> {
    let projects = Arc::new(InMemoryProjects::default());
    let project_service = ProjectService::new(projects.clone());
    let document_service = DocumentService::new(
        projects,
        Arc::new(InMemoryDocuments::default()),
        Arc::new(LocalUploadStore::new(uploads_dir)),
    );
    let intake_service = IntakeFormService::new(
        Arc::new(InMemoryIntakeForms::default()),
        completion,
        EvaluationConfig::default(),
    );

    let project = project_service.create(ProjectInput {
        title: Some("Story County flood recovery".to_string()),
        disaster_id: Some("DR-4796".to_string()),
        description: Some("Road and culvert repairs after the June floods".to_string()),
        user: Some(pa_intake::workflows::intake::UserId("demo-user".to_string())),
        ..ProjectInput::default()
    })?;
    println!("\n1. Project created: {} [{}]", project.title, project.status);
    show(verbose, &project);

    let document = document_service
        .upload(&project.id, "culvert-damage.jpg", b"demo image bytes")
        .await?;
    let project = project_service.get(&project.id)?;
    println!(
        "2. Uploaded {} as {:?}; project now tracks {} document(s)",
        document.file_name, document.document_type, project.metrics.total_documents
    );
    show(verbose, &document);

    let form = intake_service.create(sample_submission(&scope_of_work()))?;
    println!(
        "3. Intake form {} created as {:?} with total cost ${:.2} and approval probability {:.2}",
        form.id.0, form.status, form.cost_breakdown.total, form.ai_processing_results.approval_probability
    );

    let form = intake_service.update(&form.id, sample_submission("Replace culvert."))?;
    println!(
        "4. Updated with a terse scope: probability {:.2}, warnings {:?}",
        form.ai_processing_results.approval_probability,
        form.ai_processing_results.validation_warnings
    );

    let report = intake_service.validate(&form.id).await?;
    println!(
        "5. PAPPG review: valid={} score={:.0} issues={}",
        report.is_valid,
        report.validation_score,
        report.issues.len()
    );
    for issue in &report.issues {
        println!("   - [{}] {}", issue.severity, issue.message);
    }

    let form = intake_service.generate(&form.id)?;
    println!("6. Status {:?}; generated forms:", form.status);
    for generated in &form.generated_forms {
        println!("   - {} -> {}", generated.form_type, generated.file_path);
    }
    show(verbose, &form);

    document_service.delete(&document.id).await?;
    let project = project_service.get(&project.id)?;
    println!(
        "7. Removed {}; project tracks {} document(s)",
        document.file_name, project.metrics.total_documents
    );

    Ok(())
}

fn scope_of_work() -> String {
    "Remove the collapsed 48-inch corrugated metal culvert, regrade the channel, install a \
     reinforced concrete box culvert and restore the gravel road surface to pre-disaster width."
        .to_string()
}

fn sample_submission(scope: &str) -> IntakeSubmission {
    let payload = json!({
        "userId": "demo-user",
        "applicantName": "Story County",
        "applicantType": "local",
        "contactName": "Jordan Ames",
        "contactTitle": "County Engineer",
        "contactEmail": "james@storycounty.example",
        "contactPhone": "515-555-0142",
        "organizationType": "government",
        "federalEIN": "42-6004123",
        "disasterNumber": "DR-4796",
        "disasterType": "Flood",
        "incidentDate": "2024-06-21",
        "incidentStartDate": "2024-06-20",
        "incidentEndDate": "2024-06-30",
        "countyNames": "Story",
        "cityNames": "Nevada",
        "projectName": "580th Ave culvert replacement",
        "projectDescription": "Replace a washed-out culvert on a county road",
        "estimatedTotalCost": "184000",
        "projectType": "public-infrastructure",
        "projectAddress": "580th Ave",
        "projectAreaLocation": "Skunk River tributary crossing",
        "scopeOfWork": scope,
        "laborCosts": "64000",
        "materialsSupplies": "72000",
        "equipmentCosts": "30000",
        "contractedServices": "15000",
        "otherCosts": "3000",
        "hasInsurance": "no",
        "hasPreviousFunding": "no",
        "documents": [{
            "docType": "damagePhotos",
            "fileName": "culvert-damage.jpg",
            "filePath": "uploads/culvert-damage.jpg"
        }],
        "compliesWithGuidelines": "yes",
        "certificateAgree": true,
        "signatureName": "Jordan Ames",
        "signatureDate": "2024-07-15"
    });
    serde_json::from_value(payload).unwrap_or_default()
}

fn show<T: Serialize>(verbose: bool, record: &T) {
    if !verbose {
        return;
    }
    match serde_json::to_string_pretty(record) {
        Ok(text) => println!("{text}"),
        Err(err) => eprintln!("unable to render record: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pa_intake::workflows::intake::DraftMode;

    #[test]
    fn sample_submission_is_complete() {
        let draft = sample_submission(&scope_of_work())
            .into_draft(DraftMode::Create, Utc::now())
            .expect("sample passes validation");
        assert_eq!(draft.cost_breakdown.total, 184_000.0);
    }
}
