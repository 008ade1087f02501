use anyhow::bail;
use serde::Serialize;

use super::{CompletionReport, IntegrationError, NewsletterIntegration};
use crate::domain::{PaymentData, PaymentId, ProviderId};

/// The configured integrations, in configuration order, one per provider id.
#[derive(Debug, Default)]
pub struct IntegrationRegistry {
    integrations: Vec<NewsletterIntegration>,
}

/// An integration that could not handle an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntegrationFailure {
    pub provider: ProviderId,
    pub message: String,
}

/// The outcome of handing one event to every integration.
#[derive(Debug)]
pub struct FanOut<T> {
    pub outcomes: Vec<T>,
    pub failures: Vec<IntegrationFailure>,
}

impl<T> Default for FanOut<T> {
    fn default() -> Self {
        Self {
            outcomes: Vec::new(),
            failures: Vec::new(),
        }
    }
}

impl<T> FanOut<T> {
    fn fail(&mut self, provider: &ProviderId, e: IntegrationError) {
        tracing::error!(
            provider = %provider,
            error.cause_chain = ?e,
            error.message = %e,
            "Integration failed to handle the event, moving on"
        );
        self.failures.push(IntegrationFailure {
            provider: provider.clone(),
            message: e.to_string(),
        });
    }
}

impl IntegrationRegistry {
    pub fn new(integrations: Vec<NewsletterIntegration>) -> Result<Self, anyhow::Error> {
        for (position, integration) in integrations.iter().enumerate() {
            let id = integration.identity().id();
            if integrations[..position]
                .iter()
                .any(|earlier| earlier.identity().id() == id)
            {
                bail!("Provider id `{id}` is configured more than once.");
            }
        }

        Ok(Self { integrations })
    }

    pub fn get(&self, provider_id: &str) -> Option<&NewsletterIntegration> {
        self.integrations
            .iter()
            .find(|integration| integration.identity().id().as_ref() == provider_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &NewsletterIntegration> {
        self.integrations.iter()
    }

    pub fn len(&self) -> usize {
        self.integrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.integrations.is_empty()
    }

    /// Records the signup intent of every integration whose box was ticked.
    /// Outcomes are the ids of those providers.
    pub async fn payment_created(
        &self,
        payment_id: PaymentId,
        payment: &PaymentData,
    ) -> FanOut<ProviderId> {
        let mut fan_out = FanOut::default();
        for integration in &self.integrations {
            let provider = integration.identity().id();
            match integration.on_payment_created(payment_id, payment).await {
                Ok(true) => fan_out.outcomes.push(provider.clone()),
                Ok(false) => {}
                Err(e) => fan_out.fail(provider, e),
            }
        }
        fan_out
    }

    /// Completes the payment through every integration, whatever the others do.
    pub async fn payment_completed(&self, payment_id: PaymentId) -> FanOut<CompletionReport> {
        let mut fan_out = FanOut::default();
        for integration in &self.integrations {
            match integration.on_payment_completed(payment_id).await {
                Ok(report) => fan_out.outcomes.push(report),
                Err(e) => fan_out.fail(integration.identity().id(), e),
            }
        }
        fan_out
    }
}
