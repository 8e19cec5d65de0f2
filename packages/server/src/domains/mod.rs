pub mod registration;
pub mod sponsor;
pub mod verification;
