mod admin;
mod health_check;
mod integrations;

pub use admin::*;
pub use health_check::*;
pub use integrations::*;
