use super::domain::{Document, DocumentId, Project, ProjectId};
use crate::store::RepositoryError;
use crate::workflows::intake::UserId;

pub trait ProjectRepository: Send + Sync {
    fn insert(&self, project: Project) -> Result<Project, RepositoryError>;
    fn update(&self, project: Project) -> Result<Project, RepositoryError>;
    fn fetch(&self, id: &ProjectId) -> Result<Option<Project>, RepositoryError>;
    fn delete(&self, id: &ProjectId) -> Result<(), RepositoryError>;
    fn all(&self) -> Result<Vec<Project>, RepositoryError>;
    fn by_user(&self, user: &UserId) -> Result<Vec<Project>, RepositoryError>;
}

/// Document records only; file bytes live behind [`super::storage::UploadStore`].
pub trait DocumentRepository: Send + Sync {
    fn insert(&self, document: Document) -> Result<Document, RepositoryError>;
    fn fetch(&self, id: &DocumentId) -> Result<Option<Document>, RepositoryError>;
    fn delete(&self, id: &DocumentId) -> Result<(), RepositoryError>;
    fn by_project(&self, project: &ProjectId) -> Result<Vec<Document>, RepositoryError>;
}
