// Student verification domain: token issuance and verification emails.

pub mod issuer;
pub mod models;

pub use issuer::VerificationIssuer;
pub use models::VerificationRequest;
