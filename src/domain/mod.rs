mod customer;
mod host_user;
mod mailing_list;
mod payment;
mod provider_identity;
mod settings;

pub use customer::*;
pub use host_user::*;
pub use mailing_list::*;
pub use payment::*;
pub use provider_identity::*;
pub use settings::*;
