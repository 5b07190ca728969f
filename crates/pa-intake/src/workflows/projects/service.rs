use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::info;

use super::domain::{
    Document, DocumentId, DocumentType, Project, ProjectId, ProjectMetrics,
    DEFAULT_PROJECT_STATUS, UPLOADED,
};
use super::repository::{DocumentRepository, ProjectRepository};
use super::storage::{is_allowed_upload, StorageError, UploadStore, ALLOWED_EXTENSIONS};
use crate::store::RepositoryError;
use crate::workflows::intake::UserId;

const PROJECT: &str = "Project";
const DOCUMENT: &str = "Document";

/// Client payload for creating or editing a project. Absent fields are left alone.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInput {
    pub title: Option<String>,
    pub disaster_id: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    #[serde(alias = "userId")]
    pub user: Option<UserId>,
    pub metrics: Option<ProjectMetrics>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Project validation failed: {}", problems.join("; "))]
pub struct ProjectValidationError {
    pub problems: Vec<String>,
}

impl Project {
    fn from_input(
        id: ProjectId,
        input: ProjectInput,
        now: DateTime<Utc>,
    ) -> Result<Self, ProjectValidationError> {
        let mut project = Self {
            id,
            title: String::new(),
            disaster_id: String::new(),
            description: String::new(),
            status: DEFAULT_PROJECT_STATUS.to_string(),
            user: UserId(String::new()),
            metrics: ProjectMetrics::default(),
            created_at: now,
            updated_at: now,
        };
        project.merge(input, now)?;
        Ok(project)
    }

    /// Overwrite every supplied field, then re-check the required ones.
    fn merge(&mut self, input: ProjectInput, now: DateTime<Utc>) -> Result<(), ProjectValidationError> {
        if let Some(title) = input.title {
            self.title = title;
        }
        if let Some(disaster_id) = input.disaster_id {
            self.disaster_id = disaster_id;
        }
        if let Some(description) = input.description {
            self.description = description;
        }
        if let Some(status) = input.status {
            self.status = if status.trim().is_empty() {
                DEFAULT_PROJECT_STATUS.to_string()
            } else {
                status
            };
        }
        if let Some(user) = input.user {
            self.user = user;
        }
        if let Some(metrics) = input.metrics {
            self.metrics = metrics;
        }
        self.updated_at = now;

        let problems: Vec<String> = [
            ("title", self.title.as_str()),
            ("disasterId", self.disaster_id.as_str()),
            ("description", self.description.as_str()),
            ("user", self.user.0.as_str()),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| format!("{field} is required"))
        .collect();

        if problems.is_empty() {
            Ok(())
        } else {
            Err(ProjectValidationError { problems })
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ProjectServiceError {
    #[error(transparent)]
    Validation(#[from] ProjectValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// CRUD over projects.
pub struct ProjectService<P> {
    projects: Arc<P>,
}

impl<P> ProjectService<P>
where
    P: ProjectRepository + 'static,
{
    pub fn new(projects: Arc<P>) -> Self {
        Self { projects }
    }

    pub fn list(&self) -> Result<Vec<Project>, ProjectServiceError> {
        Ok(self.projects.all()?)
    }

    pub fn list_for_user(&self, user: &UserId) -> Result<Vec<Project>, ProjectServiceError> {
        Ok(self.projects.by_user(user)?)
    }

    pub fn get(&self, id: &ProjectId) -> Result<Project, ProjectServiceError> {
        let project = self
            .projects
            .fetch(id)?
            .ok_or(RepositoryError::not_found(PROJECT))?;
        Ok(project)
    }

    pub fn create(&self, input: ProjectInput) -> Result<Project, ProjectServiceError> {
        let project = Project::from_input(ProjectId::generate(), input, Utc::now())?;
        let stored = self.projects.insert(project)?;
        info!(project_id = %stored.id.0, user = %stored.user.0, "project created");
        Ok(stored)
    }

    pub fn update(&self, id: &ProjectId, input: ProjectInput) -> Result<Project, ProjectServiceError> {
        let mut project = self.get(id)?;
        project.merge(input, Utc::now())?;
        Ok(self.projects.update(project)?)
    }

    pub fn delete(&self, id: &ProjectId) -> Result<(), ProjectServiceError> {
        let project = self.get(id)?;
        self.projects.delete(&project.id)?;
        info!(project_id = %project.id.0, "project removed");
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DocumentServiceError {
    #[error("Invalid file type `{file_name}`; accepted extensions: {}", ALLOWED_EXTENSIONS.join(", "))]
    InvalidFileType { file_name: String },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Uploads and removals of project documents, keeping project metrics in step.
///
/// The document write and the project counter write are separate store calls;
/// concurrent uploads against one project can miscount.
pub struct DocumentService<P, D, S> {
    projects: Arc<P>,
    documents: Arc<D>,
    uploads: Arc<S>,
}

impl<P, D, S> DocumentService<P, D, S>
where
    P: ProjectRepository + 'static,
    D: DocumentRepository + 'static,
    S: UploadStore + 'static,
{
    pub fn new(projects: Arc<P>, documents: Arc<D>, uploads: Arc<S>) -> Self {
        Self {
            projects,
            documents,
            uploads,
        }
    }

    pub fn list_for_project(&self, project: &ProjectId) -> Result<Vec<Document>, DocumentServiceError> {
        Ok(self.documents.by_project(project)?)
    }

    pub async fn upload(
        &self,
        project_id: &ProjectId,
        file_name: &str,
        contents: &[u8],
    ) -> Result<Document, DocumentServiceError> {
        if !is_allowed_upload(file_name) {
            return Err(DocumentServiceError::InvalidFileType {
                file_name: file_name.to_string(),
            });
        }

        let mut project = self
            .projects
            .fetch(project_id)?
            .ok_or(RepositoryError::not_found(PROJECT))?;

        let file_path = self.uploads.store(file_name, contents).await?;
        let now = Utc::now();
        let document = self.documents.insert(Document {
            id: DocumentId::generate(),
            project: project.id.clone(),
            document_type: DocumentType::from_file_name(file_name),
            file_name: file_name.to_string(),
            file_path,
            status: UPLOADED.to_string(),
            extracted_data: BTreeMap::new(),
            created_at: now,
            updated_at: now,
        })?;

        project.metrics.record_upload();
        project.updated_at = now;
        let project = self.projects.update(project)?;

        info!(
            document_id = %document.id.0,
            project_id = %project.id.0,
            total_documents = project.metrics.total_documents,
            "document uploaded"
        );
        Ok(document)
    }

    pub async fn delete(&self, id: &DocumentId) -> Result<(), DocumentServiceError> {
        let document = self
            .documents
            .fetch(id)?
            .ok_or(RepositoryError::not_found(DOCUMENT))?;

        let removed_file = self.uploads.remove(&document.file_path).await?;

        if let Some(mut project) = self.projects.fetch(&document.project)? {
            project.metrics.record_removal(&document);
            project.updated_at = Utc::now();
            self.projects.update(project)?;
        }

        self.documents.delete(&document.id)?;
        info!(
            document_id = %document.id.0,
            project_id = %document.project.0,
            removed_file,
            "document removed"
        );
        Ok(())
    }
}
