//! Disaster-recovery projects and their uploaded supporting documents.

pub mod domain;
mod metrics;
pub mod repository;
pub mod router;
pub mod service;
pub mod storage;

#[cfg(test)]
mod tests;

pub use domain::{
    Document, DocumentId, DocumentType, Project, ProjectId, ProjectMetrics, QuestionAnswer,
    QuestionResponse,
};
pub use repository::{DocumentRepository, ProjectRepository};
pub use router::{document_router, project_router};
pub use service::{
    DocumentService, DocumentServiceError, ProjectInput, ProjectService, ProjectServiceError,
    ProjectValidationError,
};
pub use storage::{LocalUploadStore, StorageError, UploadStore};
