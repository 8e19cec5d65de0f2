pub mod category;
pub mod registration;

pub use category::{Category, CategoryLink};
pub use registration::{NewRegistration, Registration};
