// Hult Prize UTP - Registration API
//
// Backend for competition team registrations. Registrations are written
// transactionally together with their category links; real-time dashboard
// events and welcome emails are dispatched after commit, off the request path.

pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
