//! The provider-agnostic half of a newsletter integration.
//!
//! A `NewsletterIntegration` owns no data. It decides when to call its provider and
//! reads and writes the host's metadata store on the provider's behalf, keyed by the
//! provider's id.

mod checkout;
mod metabox;
mod registry;
mod subscription;

pub use metabox::Metabox;
pub use registry::{FanOut, IntegrationFailure, IntegrationRegistry};
pub use subscription::{CompletionReport, SubscriptionAttempt};

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use crate::domain::{PaymentId, ProviderIdentity};
use crate::providers::NewsletterProvider;
use crate::repository::MetadataStore;
use crate::utils::error_chain_fmt;

/// Per-provider options recognised by the integration.
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct IntegrationOptions {
    #[serde(default)]
    pub default_checkbox_checked: bool,
    #[serde(default)]
    pub checkout_label: Option<String>,
    #[serde(default)]
    pub default_list_id: Option<String>,
}

#[derive(thiserror::Error)]
pub enum IntegrationError {
    #[error("Payment {0} is not known to the host store.")]
    UnknownPayment(PaymentId),

    #[error("Failed to render markup.")]
    Render(#[from] askama::Error),

    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl std::fmt::Debug for IntegrationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

#[derive(Debug)]
pub struct NewsletterIntegration {
    provider: Arc<dyn NewsletterProvider>,
    store: Arc<dyn MetadataStore>,
    options: IntegrationOptions,
    checkout_label: String,
}

impl NewsletterIntegration {
    /// Builds a passive integration. Nothing is bound to the host until the
    /// application wires the routes listed in `hooks::bindings`.
    pub fn new(
        provider: Arc<dyn NewsletterProvider>,
        store: Arc<dyn MetadataStore>,
        options: IntegrationOptions,
    ) -> Self {
        let defaults = provider.initialize();
        let checkout_label = options
            .checkout_label
            .clone()
            .filter(|label| !label.trim().is_empty())
            .unwrap_or(defaults.checkout_label);

        Self {
            provider,
            store,
            options,
            checkout_label,
        }
    }

    pub fn identity(&self) -> &ProviderIdentity {
        self.provider.identity()
    }

    pub fn checkout_label(&self) -> &str {
        &self.checkout_label
    }

    pub fn options(&self) -> &IntegrationOptions {
        &self.options
    }

    /// Host settings filter: lets the provider append its configuration fields.
    #[tracing::instrument(
        name = "Register provider settings",
        skip_all,
        fields(provider = %self.identity().id())
    )]
    pub async fn settings(&self, settings: Vec<Value>) -> Vec<Value> {
        self.provider.register_settings(settings).await
    }
}
