// Sponsor domain: simple create/list with a post-commit broadcast.

pub mod models;

pub use models::{NewSponsor, Sponsor};
