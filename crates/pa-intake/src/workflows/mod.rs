pub mod assistant;
pub(crate) mod http;
pub mod intake;
pub mod projects;
