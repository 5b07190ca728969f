use super::domain::{IntakeForm, IntakeFormId, UserId};
use crate::store::RepositoryError;

/// Storage abstraction so the intake service can be exercised in isolation.
pub trait IntakeFormRepository: Send + Sync {
    fn insert(&self, form: IntakeForm) -> Result<IntakeForm, RepositoryError>;
    /// Full-document replace of an existing form.
    fn update(&self, form: IntakeForm) -> Result<IntakeForm, RepositoryError>;
    fn fetch(&self, id: &IntakeFormId) -> Result<Option<IntakeForm>, RepositoryError>;
    fn by_user(&self, user: &UserId) -> Result<Vec<IntakeForm>, RepositoryError>;
}
