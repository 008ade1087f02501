mod host_user;
mod middleware;

pub use host_user::AuthenticatedHostUser;
pub use middleware::{HostToken, reject_unknown_hosts};
