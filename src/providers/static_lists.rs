use async_trait::async_trait;

use super::{NewsletterProvider, ProviderError};
use crate::domain::{CustomerInfo, ListCatalog, ListId, ProviderIdentity};

/// A provider whose lists are fixed in configuration and whose subscriptions only
/// get logged. Useful while wiring up a store before real credentials exist.
#[derive(Debug)]
pub struct StaticListProvider {
    identity: ProviderIdentity,
    lists: ListCatalog,
}

impl StaticListProvider {
    pub fn new(identity: ProviderIdentity, lists: ListCatalog) -> Self {
        Self { identity, lists }
    }
}

#[async_trait]
impl NewsletterProvider for StaticListProvider {
    fn identity(&self) -> &ProviderIdentity {
        &self.identity
    }

    async fn list_available_lists(&self) -> Result<ListCatalog, ProviderError> {
        Ok(self.lists.clone())
    }

    async fn subscribe(
        &self,
        customer: &CustomerInfo,
        list_id: Option<&ListId>,
    ) -> Result<(), ProviderError> {
        tracing::info!(
            provider = %self.identity.id(),
            customer_email = %customer.email,
            list_id = list_id.map_or("default", |id| id.as_ref()),
            "Accepted subscription without contacting a provider"
        );
        Ok(())
    }
}
