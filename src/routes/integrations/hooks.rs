use actix_web::{HttpResponse, web};
use serde_json::Value;

use crate::hooks;
use crate::integration::IntegrationRegistry;

pub async fn list_hooks(registry: web::Data<IntegrationRegistry>) -> HttpResponse {
    HttpResponse::Ok().json(hooks::bindings(&registry))
}

/// `edd_metabox_fields_save`: every integration adds the product field it owns.
#[tracing::instrument(skip_all, fields(fields = body.len()))]
pub async fn filter_metabox_fields(
    body: web::Json<Vec<String>>,
    registry: web::Data<IntegrationRegistry>,
) -> HttpResponse {
    let fields = registry
        .iter()
        .fold(body.into_inner(), |fields, integration| {
            integration.metabox_fields(fields)
        });

    HttpResponse::Ok().json(fields)
}

/// `edd_settings_extensions`: every integration appends its settings, in
/// configuration order.
#[tracing::instrument(skip_all, fields(settings = body.len()))]
pub async fn filter_settings(
    body: web::Json<Vec<Value>>,
    registry: web::Data<IntegrationRegistry>,
) -> HttpResponse {
    let mut settings = body.into_inner();
    for integration in registry.iter() {
        settings = integration.settings(settings).await;
    }

    HttpResponse::Ok().json(settings)
}
