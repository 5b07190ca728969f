use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use serde_json::{json, Value};

use crate::store::RepositoryError;
use crate::workflows::assistant::{AiClientError, CompletionClient, CompletionRequest};
use crate::workflows::intake::{
    intake_router, EvaluationConfig, IntakeForm, IntakeFormId, IntakeFormRepository,
    IntakeFormService, IntakeSubmission, UserId,
};

pub(super) const DETAILED_SCOPE: &str = "Remove debris from the east abutment, replace scoured riprap, and pour reinforced concrete footings to restore the pre-disaster design.";

/// A complete wizard payload as the client posts it.
pub(super) fn submission_payload() -> Value {
    json!({
        "userId": "user-42",
        "applicantName": "Polk County",
        "applicantType": "local",
        "contactName": "Dana Reyes",
        "contactTitle": "Emergency Manager",
        "contactEmail": "dreyes@polkcounty.gov",
        "contactPhone": "515-555-0100",
        "organizationType": "government",
        "federalEIN": "42-6004781",
        "disasterNumber": "DR-4796",
        "disasterType": "Flood",
        "incidentDate": "2024-06-21",
        "incidentStartDate": "2024-06-20",
        "incidentEndDate": "2024-06-30",
        "countyNames": "Polk",
        "cityNames": "Des Moines",
        "projectName": "SE 14th St bridge abutment repair",
        "projectDescription": "Repair flood damage to the SE 14th St bridge",
        "estimatedTotalCost": "250000",
        "projectType": "public-infrastructure",
        "projectAddress": "SE 14th St",
        "projectAreaLocation": "Des Moines River crossing",
        "scopeOfWork": DETAILED_SCOPE,
        "laborCosts": "120000",
        "materialsSupplies": 80000,
        "equipmentCosts": "30000",
        "contractedServices": "15000",
        "otherCosts": "5000",
        "hasInsurance": "yes",
        "insuranceType": "property",
        "hasPreviousFunding": "no",
        "documents": [{
            "docType": "damagePhotos",
            "fileName": "abutment.jpg",
            "filePath": "uploads/1718900000000_abutment.jpg"
        }],
        "compliesWithGuidelines": "yes",
        "certificateAgree": true,
        "signatureName": "Dana Reyes",
        "signatureDate": "2024-07-15"
    })
}

pub(super) fn submission() -> IntakeSubmission {
    serde_json::from_value(submission_payload()).expect("submission deserializes")
}

pub(super) fn submission_with(overrides: Value) -> IntakeSubmission {
    let mut payload = submission_payload();
    if let (Some(target), Value::Object(changes)) = (payload.as_object_mut(), overrides) {
        for (key, value) in changes {
            target.insert(key, value);
        }
    }
    serde_json::from_value(payload).expect("submission deserializes")
}

pub(super) fn build_service(
    client: StubCompletion,
) -> (
    IntakeFormService<MemoryRepository, StubCompletion>,
    Arc<MemoryRepository>,
    Arc<StubCompletion>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let client = Arc::new(client);
    let service = IntakeFormService::new(
        repository.clone(),
        client.clone(),
        EvaluationConfig::default(),
    );
    (service, repository, client)
}

pub(super) fn router_with(client: StubCompletion) -> axum::Router {
    let (service, _, _) = build_service(client);
    intake_router(Arc::new(service))
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) forms: Arc<Mutex<Vec<IntakeForm>>>,
}

impl IntakeFormRepository for MemoryRepository {
    fn insert(&self, form: IntakeForm) -> Result<IntakeForm, RepositoryError> {
        let mut guard = self.forms.lock().expect("repository mutex poisoned");
        if guard.iter().any(|stored| stored.id == form.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(form.clone());
        Ok(form)
    }

    fn update(&self, form: IntakeForm) -> Result<IntakeForm, RepositoryError> {
        let mut guard = self.forms.lock().expect("repository mutex poisoned");
        match guard.iter_mut().find(|stored| stored.id == form.id) {
            Some(slot) => {
                *slot = form.clone();
                Ok(form)
            }
            None => Err(RepositoryError::not_found("Intake form")),
        }
    }

    fn fetch(&self, id: &IntakeFormId) -> Result<Option<IntakeForm>, RepositoryError> {
        let guard = self.forms.lock().expect("repository mutex poisoned");
        Ok(guard.iter().find(|stored| &stored.id == id).cloned())
    }

    fn by_user(&self, user: &UserId) -> Result<Vec<IntakeForm>, RepositoryError> {
        let guard = self.forms.lock().expect("repository mutex poisoned");
        Ok(guard
            .iter()
            .filter(|stored| &stored.user == user)
            .cloned()
            .collect())
    }
}

pub(super) struct UnavailableRepository;

impl IntakeFormRepository for UnavailableRepository {
    fn insert(&self, _form: IntakeForm) -> Result<IntakeForm, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _form: IntakeForm) -> Result<IntakeForm, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &IntakeFormId) -> Result<Option<IntakeForm>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn by_user(&self, _user: &UserId) -> Result<Vec<IntakeForm>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) enum StubReply {
    Text(String),
    Empty,
    Fail,
}

/// Completion client with a canned reply that records every prompt it sees.
pub(super) struct StubCompletion {
    reply: StubReply,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl StubCompletion {
    pub(super) fn replying(text: impl Into<String>) -> Self {
        Self::with(StubReply::Text(text.into()))
    }

    pub(super) fn empty() -> Self {
        Self::with(StubReply::Empty)
    }

    pub(super) fn failing() -> Self {
        Self::with(StubReply::Fail)
    }

    fn with(reply: StubReply) -> Self {
        Self {
            reply,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().expect("stub mutex poisoned").clone()
    }
}

#[async_trait]
impl CompletionClient for StubCompletion {
    async fn complete(&self, request: CompletionRequest) -> Result<Option<String>, AiClientError> {
        self.requests
            .lock()
            .expect("stub mutex poisoned")
            .push(request);
        match &self.reply {
            StubReply::Text(text) => Ok(Some(text.clone())),
            StubReply::Empty => Ok(None),
            StubReply::Fail => Err(AiClientError::Status {
                status: 529,
                body: "overloaded".to_string(),
            }),
        }
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn json_request(method: &str, uri: &str, body: &Value) -> axum::http::Request<axum::body::Body> {
    axum::http::Request::builder()
        .method(method)
        .uri(uri)
        .header(axum::http::header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(
            serde_json::to_vec(body).expect("serialize body"),
        ))
        .expect("request builds")
}

pub(super) const BOUNDARY: &str = "pa-intake-test-boundary";

/// Hand-built multipart body; each part is `(name, optional file name, contents)`.
pub(super) fn multipart_request(
    uri: &str,
    parts: &[(&str, Option<&str>, &str)],
) -> axum::http::Request<axum::body::Body> {
    let mut body = String::new();
    for (name, file_name, contents) in parts {
        body.push_str(&format!("--{BOUNDARY}\r\n"));
        match file_name {
            Some(file_name) => {
                body.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n"
                ));
                body.push_str("Content-Type: application/octet-stream\r\n\r\n");
            }
            None => {
                body.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{name}\"\r\n\r\n"
                ));
            }
        }
        body.push_str(contents);
        body.push_str("\r\n");
    }
    body.push_str(&format!("--{BOUNDARY}--\r\n"));

    axum::http::Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            axum::http::header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(axum::body::Body::from(body))
        .expect("request builds")
}
