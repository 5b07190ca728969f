use metrics_exporter_prometheus::PrometheusHandle;
use pa_intake::store::RepositoryError;
use pa_intake::workflows::intake::{IntakeForm, IntakeFormId, IntakeFormRepository, UserId};
use pa_intake::workflows::projects::{
    Document, DocumentId, DocumentRepository, Project, ProjectId, ProjectRepository,
};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) uploads_dir: PathBuf,
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, RepositoryError> {
    mutex
        .lock()
        .map_err(|_| RepositoryError::Unavailable("in-memory store lock poisoned".to_string()))
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryIntakeForms {
    records: Arc<Mutex<HashMap<IntakeFormId, IntakeForm>>>,
}

impl IntakeFormRepository for InMemoryIntakeForms {
    fn insert(&self, form: IntakeForm) -> Result<IntakeForm, RepositoryError> {
        let mut guard = lock(&self.records)?;
        if guard.contains_key(&form.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(form.id.clone(), form.clone());
        Ok(form)
    }

    fn update(&self, form: IntakeForm) -> Result<IntakeForm, RepositoryError> {
        let mut guard = lock(&self.records)?;
        match guard.get_mut(&form.id) {
            Some(slot) => {
                *slot = form.clone();
                Ok(form)
            }
            None => Err(RepositoryError::not_found("Intake form")),
        }
    }

    fn fetch(&self, id: &IntakeFormId) -> Result<Option<IntakeForm>, RepositoryError> {
        Ok(lock(&self.records)?.get(id).cloned())
    }

    fn by_user(&self, user: &UserId) -> Result<Vec<IntakeForm>, RepositoryError> {
        let mut forms: Vec<IntakeForm> = lock(&self.records)?
            .values()
            .filter(|form| &form.user == user)
            .cloned()
            .collect();
        forms.sort_by_key(|form| form.created_at);
        Ok(forms)
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryProjects {
    records: Arc<Mutex<HashMap<ProjectId, Project>>>,
}

impl InMemoryProjects {
    fn sorted(&self, keep: impl Fn(&Project) -> bool) -> Result<Vec<Project>, RepositoryError> {
        let mut projects: Vec<Project> = lock(&self.records)?
            .values()
            .filter(|project| keep(project))
            .cloned()
            .collect();
        projects.sort_by_key(|project| project.created_at);
        Ok(projects)
    }
}

impl ProjectRepository for InMemoryProjects {
    fn insert(&self, project: Project) -> Result<Project, RepositoryError> {
        let mut guard = lock(&self.records)?;
        if guard.contains_key(&project.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(project.id.clone(), project.clone());
        Ok(project)
    }

    fn update(&self, project: Project) -> Result<Project, RepositoryError> {
        let mut guard = lock(&self.records)?;
        match guard.get_mut(&project.id) {
            Some(slot) => {
                *slot = project.clone();
                Ok(project)
            }
            None => Err(RepositoryError::not_found("Project")),
        }
    }

    fn fetch(&self, id: &ProjectId) -> Result<Option<Project>, RepositoryError> {
        Ok(lock(&self.records)?.get(id).cloned())
    }

    fn delete(&self, id: &ProjectId) -> Result<(), RepositoryError> {
        lock(&self.records)?
            .remove(id)
            .map(|_| ())
            .ok_or(RepositoryError::not_found("Project"))
    }

    fn all(&self) -> Result<Vec<Project>, RepositoryError> {
        self.sorted(|_| true)
    }

    fn by_user(&self, user: &UserId) -> Result<Vec<Project>, RepositoryError> {
        self.sorted(|project| &project.user == user)
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryDocuments {
    records: Arc<Mutex<HashMap<DocumentId, Document>>>,
}

impl DocumentRepository for InMemoryDocuments {
    fn insert(&self, document: Document) -> Result<Document, RepositoryError> {
        let mut guard = lock(&self.records)?;
        if guard.contains_key(&document.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(document.id.clone(), document.clone());
        Ok(document)
    }

    fn fetch(&self, id: &DocumentId) -> Result<Option<Document>, RepositoryError> {
        Ok(lock(&self.records)?.get(id).cloned())
    }

    fn delete(&self, id: &DocumentId) -> Result<(), RepositoryError> {
        lock(&self.records)?
            .remove(id)
            .map(|_| ())
            .ok_or(RepositoryError::not_found("Document"))
    }

    fn by_project(&self, project: &ProjectId) -> Result<Vec<Document>, RepositoryError> {
        let mut documents: Vec<Document> = lock(&self.records)?
            .values()
            .filter(|document| &document.project == project)
            .cloned()
            .collect();
        documents.sort_by_key(|document| document.created_at);
        Ok(documents)
    }
}
