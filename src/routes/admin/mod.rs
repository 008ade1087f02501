mod options;
mod products;
mod routes;

pub use options::*;
pub use products::*;
pub use routes::admin_routes;
