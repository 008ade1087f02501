use actix_web::http::StatusCode;
use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, ResponseError, web};

use crate::integration::{IntegrationError, IntegrationRegistry};
use crate::utils::{build_error_response, error_chain_fmt};

#[derive(thiserror::Error)]
pub enum CheckoutError {
    #[error(transparent)]
    IntegrationError(#[from] IntegrationError),
}

impl std::fmt::Debug for CheckoutError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for CheckoutError {
    fn error_response(&self) -> HttpResponse {
        build_error_response(StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
    }
}

/// `edd_purchase_form_before_submit`: the signup boxes of every integration,
/// concatenated in configuration order.
#[tracing::instrument(name = "Render checkout fields", skip_all)]
pub async fn checkout_fields(
    registry: web::Data<IntegrationRegistry>,
) -> Result<HttpResponse, CheckoutError> {
    let mut markup = String::new();
    for integration in registry.iter() {
        markup.push_str(&integration.render_checkout_checkbox().await?);
    }

    Ok(HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(markup))
}
