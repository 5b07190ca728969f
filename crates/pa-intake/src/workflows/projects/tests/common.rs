use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use serde_json::{json, Value};

use crate::store::RepositoryError;
use crate::workflows::intake::UserId;
use crate::workflows::projects::storage::{StorageError, UploadStore};
use crate::workflows::projects::{
    document_router, project_router, Document, DocumentId, DocumentRepository, DocumentService,
    Project, ProjectId, ProjectInput, ProjectRepository, ProjectService,
};

pub(super) fn project_payload() -> Value {
    json!({
        "title": "Polk County flood recovery",
        "disasterId": "DR-4796",
        "description": "Bridge and road repairs after the June floods",
        "user": "user-42"
    })
}

pub(super) fn project_input() -> ProjectInput {
    serde_json::from_value(project_payload()).expect("project input deserializes")
}

#[derive(Default, Clone)]
pub(super) struct MemoryProjects {
    pub(super) projects: Arc<Mutex<Vec<Project>>>,
}

impl ProjectRepository for MemoryProjects {
    fn insert(&self, project: Project) -> Result<Project, RepositoryError> {
        let mut guard = self.projects.lock().expect("project mutex poisoned");
        if guard.iter().any(|stored| stored.id == project.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(project.clone());
        Ok(project)
    }

    fn update(&self, project: Project) -> Result<Project, RepositoryError> {
        let mut guard = self.projects.lock().expect("project mutex poisoned");
        match guard.iter_mut().find(|stored| stored.id == project.id) {
            Some(slot) => {
                *slot = project.clone();
                Ok(project)
            }
            None => Err(RepositoryError::not_found("Project")),
        }
    }

    fn fetch(&self, id: &ProjectId) -> Result<Option<Project>, RepositoryError> {
        let guard = self.projects.lock().expect("project mutex poisoned");
        Ok(guard.iter().find(|stored| &stored.id == id).cloned())
    }

    fn delete(&self, id: &ProjectId) -> Result<(), RepositoryError> {
        let mut guard = self.projects.lock().expect("project mutex poisoned");
        guard.retain(|stored| &stored.id != id);
        Ok(())
    }

    fn all(&self) -> Result<Vec<Project>, RepositoryError> {
        Ok(self.projects.lock().expect("project mutex poisoned").clone())
    }

    fn by_user(&self, user: &UserId) -> Result<Vec<Project>, RepositoryError> {
        let guard = self.projects.lock().expect("project mutex poisoned");
        Ok(guard
            .iter()
            .filter(|stored| &stored.user == user)
            .cloned()
            .collect())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryDocuments {
    pub(super) documents: Arc<Mutex<Vec<Document>>>,
}

impl MemoryDocuments {
    pub(super) fn set_status(&self, id: &DocumentId, status: &str) {
        let mut guard = self.documents.lock().expect("document mutex poisoned");
        if let Some(document) = guard.iter_mut().find(|stored| &stored.id == id) {
            document.status = status.to_string();
        }
    }
}

impl DocumentRepository for MemoryDocuments {
    fn insert(&self, document: Document) -> Result<Document, RepositoryError> {
        self.documents
            .lock()
            .expect("document mutex poisoned")
            .push(document.clone());
        Ok(document)
    }

    fn fetch(&self, id: &DocumentId) -> Result<Option<Document>, RepositoryError> {
        let guard = self.documents.lock().expect("document mutex poisoned");
        Ok(guard.iter().find(|stored| &stored.id == id).cloned())
    }

    fn delete(&self, id: &DocumentId) -> Result<(), RepositoryError> {
        let mut guard = self.documents.lock().expect("document mutex poisoned");
        guard.retain(|stored| &stored.id != id);
        Ok(())
    }

    fn by_project(&self, project: &ProjectId) -> Result<Vec<Document>, RepositoryError> {
        let guard = self.documents.lock().expect("document mutex poisoned");
        Ok(guard
            .iter()
            .filter(|stored| &stored.project == project)
            .cloned()
            .collect())
    }
}

/// Upload store that keeps file bytes in a map keyed by stored path.
#[derive(Default)]
pub(super) struct MemoryUploads {
    pub(super) files: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryUploads {
    pub(super) fn contains(&self, path: &str) -> bool {
        self.files
            .lock()
            .expect("upload mutex poisoned")
            .contains_key(path)
    }
}

#[async_trait]
impl UploadStore for MemoryUploads {
    async fn store(&self, original_name: &str, contents: &[u8]) -> Result<String, StorageError> {
        let mut files = self.files.lock().expect("upload mutex poisoned");
        let path = format!("uploads/{}_{original_name}", files.len() + 1);
        files.insert(path.clone(), contents.to_vec());
        Ok(path)
    }

    async fn remove(&self, file_path: &str) -> Result<bool, StorageError> {
        Ok(self
            .files
            .lock()
            .expect("upload mutex poisoned")
            .remove(file_path)
            .is_some())
    }
}

pub(super) struct Fixture {
    pub(super) projects: Arc<MemoryProjects>,
    pub(super) documents: Arc<MemoryDocuments>,
    pub(super) uploads: Arc<MemoryUploads>,
    pub(super) project_service: Arc<ProjectService<MemoryProjects>>,
    pub(super) document_service: Arc<DocumentService<MemoryProjects, MemoryDocuments, MemoryUploads>>,
}

impl Fixture {
    pub(super) fn new() -> Self {
        let projects = Arc::new(MemoryProjects::default());
        let documents = Arc::new(MemoryDocuments::default());
        let uploads = Arc::new(MemoryUploads::default());
        Self {
            project_service: Arc::new(ProjectService::new(projects.clone())),
            document_service: Arc::new(DocumentService::new(
                projects.clone(),
                documents.clone(),
                uploads.clone(),
            )),
            projects,
            documents,
            uploads,
        }
    }

    pub(super) fn router(&self) -> axum::Router {
        project_router(self.project_service.clone())
            .merge(document_router(self.document_service.clone()))
    }

    pub(super) fn seeded_project(&self) -> Project {
        self.project_service
            .create(project_input())
            .expect("project created")
    }

    pub(super) fn stored_project(&self, id: &ProjectId) -> Project {
        self.projects
            .fetch(id)
            .expect("fetch succeeds")
            .expect("project stored")
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

pub(super) fn empty_request(method: &str, uri: &str) -> axum::http::Request<axum::body::Body> {
    axum::http::Request::builder()
        .method(method)
        .uri(uri)
        .body(axum::body::Body::empty())
        .expect("request builds")
}

const BOUNDARY: &str = "pa-documents-boundary";

/// Multipart upload with an optional `file` part and an optional `projectId` part.
pub(super) fn upload_request(
    file: Option<(&str, &str)>,
    project_id: Option<&str>,
) -> axum::http::Request<axum::body::Body> {
    let mut body = String::new();
    if let Some(project_id) = project_id {
        body.push_str(&format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"projectId\"\r\n\r\n{project_id}\r\n"
        ));
    }
    if let Some((file_name, contents)) = file {
        body.push_str(&format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n{contents}\r\n"
        ));
    }
    body.push_str(&format!("--{BOUNDARY}--\r\n"));

    axum::http::Request::builder()
        .method("POST")
        .uri("/api/documents/upload")
        .header(
            axum::http::header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(axum::body::Body::from(body))
        .expect("request builds")
}
