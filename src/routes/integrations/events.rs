use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError, web};
use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::domain::{PaymentData, PaymentDataPayload, PaymentId, ProviderId};
use crate::integration::{
    CompletionReport, IntegrationError, IntegrationFailure, IntegrationRegistry,
};
use crate::repository::MetadataStore;
use crate::utils::{build_error_response, error_chain_fmt};

#[derive(thiserror::Error)]
pub enum EventError {
    #[error("{0}")]
    ValidationError(String),

    #[error(transparent)]
    IntegrationError(#[from] IntegrationError),

    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for EventError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for EventError {
    fn error_response(&self) -> HttpResponse {
        let status_code = match self {
            EventError::ValidationError(_) => StatusCode::BAD_REQUEST,
            EventError::IntegrationError(IntegrationError::UnknownPayment(_)) => {
                StatusCode::NOT_FOUND
            }
            EventError::IntegrationError(_) | EventError::UnexpectedError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        build_error_response(status_code, self.to_string())
    }
}

#[derive(Deserialize)]
pub struct PaymentCreatedBody {
    payment_id: PaymentId,
    #[serde(flatten)]
    payment: PaymentDataPayload,
}

#[derive(Serialize)]
struct PaymentCreatedResponse {
    payment_id: PaymentId,
    signup_intents: Vec<ProviderId>,
    failures: Vec<IntegrationFailure>,
}

/// `edd_insert_payment`: stores the payment and every ticked signup box.
#[tracing::instrument(
    name = "Payment created",
    skip_all,
    fields(payment_id = %body.payment_id)
)]
pub async fn payment_created(
    body: web::Json<PaymentCreatedBody>,
    registry: web::Data<IntegrationRegistry>,
    store: web::Data<dyn MetadataStore>,
) -> Result<HttpResponse, EventError> {
    let PaymentCreatedBody {
        payment_id,
        payment,
    } = body.into_inner();
    let payment: PaymentData = payment.try_into().map_err(EventError::ValidationError)?;

    store
        .record_payment(payment_id, &payment)
        .await
        .context("Failed to record the payment")?;

    let fan_out = registry.payment_created(payment_id, &payment).await;

    Ok(HttpResponse::Ok().json(PaymentCreatedResponse {
        payment_id,
        signup_intents: fan_out.outcomes,
        failures: fan_out.failures,
    }))
}

#[derive(Deserialize)]
pub struct PaymentCompletedBody {
    payment_id: PaymentId,
}

#[derive(Serialize)]
struct PaymentCompletedResponse {
    payment_id: PaymentId,
    reports: Vec<CompletionReport>,
    failures: Vec<IntegrationFailure>,
}

/// `edd_complete_purchase`: subscribes the buyer through every integration.
///
/// An integration that fails is reported under `failures`; the others still run.
#[tracing::instrument(
    name = "Payment completed",
    skip_all,
    fields(payment_id = %body.payment_id)
)]
pub async fn payment_completed(
    body: web::Json<PaymentCompletedBody>,
    registry: web::Data<IntegrationRegistry>,
    store: web::Data<dyn MetadataStore>,
) -> Result<HttpResponse, EventError> {
    let payment_id = body.payment_id;

    store
        .customer_info(payment_id)
        .await
        .context("Failed to look up the payment")?
        .ok_or(IntegrationError::UnknownPayment(payment_id))?;

    let fan_out = registry.payment_completed(payment_id).await;

    Ok(HttpResponse::Ok().json(PaymentCompletedResponse {
        payment_id,
        reports: fan_out.outcomes,
        failures: fan_out.failures,
    }))
}
