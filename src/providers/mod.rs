mod aweber;
mod static_lists;

pub use aweber::AweberClient;
pub use static_lists::StaticListProvider;

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::{CustomerInfo, ListCatalog, ListId, ProviderIdentity};

pub const DEFAULT_CHECKOUT_LABEL: &str = "Signup for the newsletter";

/// What a provider sets up when its integration is constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderDefaults {
    pub checkout_label: String,
}

impl Default for ProviderDefaults {
    fn default() -> Self {
        Self {
            checkout_label: DEFAULT_CHECKOUT_LABEL.to_string(),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ProviderError {
    #[error("No list was given and the provider has no default list configured.")]
    NoDefaultList,

    #[error("The provider rejected the request with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error(transparent)]
    Request(#[from] reqwest::Error),

    #[error(transparent)]
    Url(#[from] url::ParseError),

    #[error("`{0}` cannot be used as a provider API base url.")]
    UnusableBaseUrl(String),
}

/// The capability set every marketing provider fulfils.
///
/// Only `identity` is mandatory; every other operation has the behavior of a
/// provider that has nothing to say: a generic checkout label, no lists, the signup
/// box shown, subscriptions accepted without doing anything, settings untouched.
#[async_trait]
pub trait NewsletterProvider: Send + Sync + std::fmt::Debug {
    fn identity(&self) -> &ProviderIdentity;

    fn initialize(&self) -> ProviderDefaults {
        ProviderDefaults::default()
    }

    /// Fetches the provider's current lists. Nothing is cached.
    async fn list_available_lists(&self) -> Result<ListCatalog, ProviderError> {
        Ok(ListCatalog::default())
    }

    fn should_show_checkout_signup(&self) -> bool {
        true
    }

    /// Enrolls the customer in `list_id`, or in the provider's default list when
    /// `list_id` is `None`.
    ///
    /// Repeated calls for the same customer and list must be harmless; the caller
    /// does not de-duplicate.
    async fn subscribe(
        &self,
        _customer: &CustomerInfo,
        _list_id: Option<&ListId>,
    ) -> Result<(), ProviderError> {
        Ok(())
    }

    async fn register_settings(&self, settings: Vec<Value>) -> Vec<Value> {
        settings
    }
}
