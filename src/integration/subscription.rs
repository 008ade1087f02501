use serde::Serialize;
use serde_json::Value;
use tracing::{Span, field};

use super::{IntegrationError, NewsletterIntegration};
use crate::domain::{
    CustomerInfo, ListId, PaymentData, PaymentId, ProductId, ProductListSelection, ProviderId,
};
use crate::repository::is_truthy;

/// One subscribe call made while completing a payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubscriptionAttempt {
    /// `None` when the provider's configured default list was used.
    pub list_id: Option<ListId>,
    /// The cart line that asked for this list; `None` for the checkout signup.
    pub product_id: Option<ProductId>,
    pub subscribed: bool,
}

/// Every subscribe call one integration made for a payment, in call order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletionReport {
    pub provider: ProviderId,
    pub attempts: Vec<SubscriptionAttempt>,
}

impl CompletionReport {
    fn new(provider: ProviderId) -> Self {
        Self {
            provider,
            attempts: Vec::new(),
        }
    }

    pub fn default_list_attempts(&self) -> usize {
        self.attempts
            .iter()
            .filter(|attempt| attempt.product_id.is_none())
            .count()
    }
}

impl NewsletterIntegration {
    /// Remembers the buyer's checkout choice against the new payment.
    ///
    /// Returns whether an intent was stored.
    #[tracing::instrument(
        name = "Record checkout signup intent",
        skip(self, payment),
        fields(provider = %self.identity().id())
    )]
    pub async fn on_payment_created(
        &self,
        payment_id: PaymentId,
        payment: &PaymentData,
    ) -> Result<bool, IntegrationError> {
        if !payment.submission.opted_in(self.identity().id()) {
            return Ok(false);
        }

        self.store
            .add_payment_meta(
                payment_id,
                &self.identity().signup_intent_key(),
                Value::Bool(true),
            )
            .await?;
        Ok(true)
    }

    /// Subscribes the buyer of a completed payment.
    ///
    /// A stored checkout intent yields one call for the default list and is then
    /// removed whatever the outcome. Each cart line then yields one call per list in
    /// its product's selection. Failed calls are logged and skipped; nothing is
    /// retried and nothing is rolled back.
    #[tracing::instrument(
        name = "Complete newsletter subscriptions",
        skip(self),
        fields(provider = %self.identity().id(), customer_email = field::Empty)
    )]
    pub async fn on_payment_completed(
        &self,
        payment_id: PaymentId,
    ) -> Result<CompletionReport, IntegrationError> {
        let customer = self
            .store
            .customer_info(payment_id)
            .await?
            .ok_or(IntegrationError::UnknownPayment(payment_id))?;
        Span::current().record("customer_email", field::display(&customer.email));

        let mut report = CompletionReport::new(self.identity().id().clone());

        let intent_key = self.identity().signup_intent_key();
        let intent = self.store.get_payment_meta(payment_id, &intent_key).await?;
        if is_truthy(intent.as_ref()) {
            let default_list = self.default_list().await?;
            let subscribed = self.try_subscribe(&customer, default_list.as_ref()).await;
            report.attempts.push(SubscriptionAttempt {
                list_id: default_list,
                product_id: None,
                subscribed,
            });

            self.store
                .delete_payment_meta(payment_id, &intent_key)
                .await?;
        }

        for item in self.store.cart_items(payment_id).await? {
            let selection = self.product_list_selection(item.product_id).await?;
            for list_id in selection.iter() {
                let subscribed = self.try_subscribe(&customer, Some(list_id)).await;
                report.attempts.push(SubscriptionAttempt {
                    list_id: Some(list_id.clone()),
                    product_id: Some(item.product_id),
                    subscribed,
                });
            }
        }

        Ok(report)
    }

    /// The list chosen on the host settings screen (`edd_{id}_list`), if any.
    ///
    /// `None` leaves the choice to the provider's configured default list.
    pub async fn default_list(&self) -> Result<Option<ListId>, IntegrationError> {
        let stored = self
            .store
            .get_option(&self.identity().option_key("list"))
            .await?;

        let raw = match stored {
            Some(Value::String(s)) if !s.trim().is_empty() => s,
            Some(Value::Number(n)) => n.to_string(),
            _ => return Ok(None),
        };

        match ListId::parse(raw) {
            Ok(list_id) => Ok(Some(list_id)),
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring an unusable default list option");
                Ok(None)
            }
        }
    }

    /// The lists stored for a product. Unreadable data counts as no selection.
    pub async fn product_list_selection(
        &self,
        product_id: ProductId,
    ) -> Result<ProductListSelection, IntegrationError> {
        let stored = self
            .store
            .get_product_meta(product_id, &self.identity().product_lists_key())
            .await?;

        let Some(stored) = stored else {
            return Ok(ProductListSelection::default());
        };

        match ProductListSelection::from_value(stored) {
            Ok(selection) => Ok(selection),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    product_id = %product_id,
                    "Ignoring an unreadable product list selection"
                );
                Ok(ProductListSelection::default())
            }
        }
    }

    async fn try_subscribe(&self, customer: &CustomerInfo, list_id: Option<&ListId>) -> bool {
        match self.provider.subscribe(customer, list_id).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(
                    error.cause_chain = ?e,
                    error.message = %e,
                    list_id = list_id.map_or("default", |id| id.as_ref()),
                    "Failed to subscribe a customer, moving on"
                );
                false
            }
        }
    }
}
