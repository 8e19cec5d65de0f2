// HTTP routes
pub mod health;
pub mod registration;
pub mod sponsor;
pub mod stream;
pub mod verification;

pub use health::*;
pub use registration::*;
pub use sponsor::*;
pub use stream::*;
pub use verification::*;
