// Registration domain: the transactional ingestion pipeline.

pub mod models;
pub mod writer;

pub use models::{Category, CategoryLink, NewRegistration, Registration};
pub use writer::{RegistrationWriter, WriteError};
