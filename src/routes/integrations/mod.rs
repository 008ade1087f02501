mod checkout;
mod events;
mod hooks;
mod routes;

pub use checkout::*;
pub use events::*;
pub use hooks::*;
pub use routes::integration_routes;
