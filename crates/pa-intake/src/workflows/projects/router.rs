use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use tracing::error;

use super::domain::{DocumentId, ProjectId};
use super::repository::{DocumentRepository, ProjectRepository};
use super::service::{
    DocumentService, DocumentServiceError, ProjectInput, ProjectService, ProjectServiceError,
};
use super::storage::UploadStore;
use crate::store::RepositoryError;
use crate::workflows::http::{message_response, repository_failure};
use crate::workflows::intake::UserId;

pub fn project_router<P>(service: Arc<ProjectService<P>>) -> Router
where
    P: ProjectRepository + 'static,
{
    Router::new()
        .route(
            "/api/projects",
            get(list_handler::<P>).post(create_handler::<P>),
        )
        .route("/api/projects/user/:user_id", get(user_projects_handler::<P>))
        .route(
            "/api/projects/:id",
            get(get_handler::<P>)
                .put(update_handler::<P>)
                .delete(delete_handler::<P>),
        )
        .with_state(service)
}

pub fn document_router<P, D, S>(service: Arc<DocumentService<P, D, S>>) -> Router
where
    P: ProjectRepository + 'static,
    D: DocumentRepository + 'static,
    S: UploadStore + 'static,
{
    Router::new()
        .route(
            "/api/documents/project/:project_id",
            get(project_documents_handler::<P, D, S>),
        )
        .route("/api/documents/upload", post(upload_handler::<P, D, S>))
        .route("/api/documents/:id", delete(delete_document_handler::<P, D, S>))
        .with_state(service)
}

pub(crate) async fn list_handler<P>(State(service): State<Arc<ProjectService<P>>>) -> Response
where
    P: ProjectRepository + 'static,
{
    match service.list() {
        Ok(projects) => (StatusCode::OK, Json(projects)).into_response(),
        Err(error) => project_failure(&error),
    }
}

pub(crate) async fn user_projects_handler<P>(
    State(service): State<Arc<ProjectService<P>>>,
    Path(user_id): Path<String>,
) -> Response
where
    P: ProjectRepository + 'static,
{
    match service.list_for_user(&UserId(user_id)) {
        Ok(projects) => (StatusCode::OK, Json(projects)).into_response(),
        Err(error) => project_failure(&error),
    }
}

pub(crate) async fn get_handler<P>(
    State(service): State<Arc<ProjectService<P>>>,
    Path(id): Path<String>,
) -> Response
where
    P: ProjectRepository + 'static,
{
    match service.get(&ProjectId(id)) {
        Ok(project) => (StatusCode::OK, Json(project)).into_response(),
        Err(error) => project_failure(&error),
    }
}

pub(crate) async fn create_handler<P>(
    State(service): State<Arc<ProjectService<P>>>,
    Json(input): Json<ProjectInput>,
) -> Response
where
    P: ProjectRepository + 'static,
{
    match service.create(input) {
        Ok(project) => (StatusCode::CREATED, Json(project)).into_response(),
        Err(error) => project_failure(&error),
    }
}

pub(crate) async fn update_handler<P>(
    State(service): State<Arc<ProjectService<P>>>,
    Path(id): Path<String>,
    Json(input): Json<ProjectInput>,
) -> Response
where
    P: ProjectRepository + 'static,
{
    match service.update(&ProjectId(id), input) {
        Ok(project) => (StatusCode::OK, Json(project)).into_response(),
        Err(error) => project_failure(&error),
    }
}

pub(crate) async fn delete_handler<P>(
    State(service): State<Arc<ProjectService<P>>>,
    Path(id): Path<String>,
) -> Response
where
    P: ProjectRepository + 'static,
{
    match service.delete(&ProjectId(id)) {
        Ok(()) => message_response(StatusCode::OK, "Project removed"),
        Err(error) => project_failure(&error),
    }
}

pub(crate) async fn project_documents_handler<P, D, S>(
    State(service): State<Arc<DocumentService<P, D, S>>>,
    Path(project_id): Path<String>,
) -> Response
where
    P: ProjectRepository + 'static,
    D: DocumentRepository + 'static,
    S: UploadStore + 'static,
{
    match service.list_for_project(&ProjectId(project_id)) {
        Ok(documents) => (StatusCode::OK, Json(documents)).into_response(),
        Err(error) => document_failure(&error),
    }
}

pub(crate) async fn upload_handler<P, D, S>(
    State(service): State<Arc<DocumentService<P, D, S>>>,
    mut multipart: Multipart,
) -> Response
where
    P: ProjectRepository + 'static,
    D: DocumentRepository + 'static,
    S: UploadStore + 'static,
{
    let mut file: Option<(String, Bytes)> = None;
    let mut project_id = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(rejection) => {
                return message_response(StatusCode::BAD_REQUEST, rejection.body_text())
            }
        };

        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("file") => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                match field.bytes().await {
                    Ok(bytes) => file = Some((file_name, bytes)),
                    Err(rejection) => {
                        return message_response(StatusCode::BAD_REQUEST, rejection.body_text())
                    }
                }
            }
            Some("projectId") => match field.text().await {
                Ok(text) if !text.trim().is_empty() => project_id = Some(text.trim().to_string()),
                Ok(_) => {}
                Err(rejection) => {
                    return message_response(StatusCode::BAD_REQUEST, rejection.body_text())
                }
            },
            _ => {}
        }
    }

    let Some((file_name, contents)) = file else {
        return message_response(StatusCode::BAD_REQUEST, "No file uploaded");
    };
    // An absent reference can never resolve, so it reads as a missing project.
    let Some(project_id) = project_id else {
        return repository_failure(&RepositoryError::not_found("Project"));
    };

    match service
        .upload(&ProjectId(project_id), &file_name, &contents)
        .await
    {
        Ok(document) => (StatusCode::CREATED, Json(document)).into_response(),
        Err(error) => document_failure(&error),
    }
}

pub(crate) async fn delete_document_handler<P, D, S>(
    State(service): State<Arc<DocumentService<P, D, S>>>,
    Path(id): Path<String>,
) -> Response
where
    P: ProjectRepository + 'static,
    D: DocumentRepository + 'static,
    S: UploadStore + 'static,
{
    match service.delete(&DocumentId(id)).await {
        Ok(()) => message_response(StatusCode::OK, "Document removed"),
        Err(error) => document_failure(&error),
    }
}

fn project_failure(error: &ProjectServiceError) -> Response {
    match error {
        ProjectServiceError::Validation(problem) => {
            message_response(StatusCode::BAD_REQUEST, problem.to_string())
        }
        ProjectServiceError::Repository(failure) => repository_failure(failure),
    }
}

fn document_failure(error: &DocumentServiceError) -> Response {
    match error {
        DocumentServiceError::InvalidFileType { .. } => {
            message_response(StatusCode::BAD_REQUEST, error.to_string())
        }
        DocumentServiceError::Repository(failure) => repository_failure(failure),
        DocumentServiceError::Storage(failure) => {
            error!(%failure, "document storage failed");
            message_response(StatusCode::INTERNAL_SERVER_ERROR, failure.to_string())
        }
    }
}
