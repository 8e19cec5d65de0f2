// Infrastructure shared across domains: realtime event hub, outbound mail,
// and the detached notification dispatcher.

pub mod event_hub;
pub mod mailer;
pub mod notifier;

pub use event_hub::{BroadcastEvent, EventHub};
pub use mailer::{HttpMailer, Mailer, OutboundEmail};
pub use notifier::{Notification, Notifier, WelcomeSettings};
