use actix_web::{HttpResponse, web};
use anyhow::Context;
use serde_json::{Map, Value};

use super::AdminError;
use crate::authentication::AuthenticatedHostUser;
use crate::domain::MANAGE_SHOP_SETTINGS;
use crate::repository::MetadataStore;

/// Mirrors saved extension settings into the option store, one key per entry.
#[tracing::instrument(skip_all, fields(options = body.len()))]
pub async fn update_options(
    body: web::Json<Map<String, Value>>,
    user: AuthenticatedHostUser,
    store: web::Data<dyn MetadataStore>,
) -> Result<HttpResponse, AdminError> {
    if !user.0.can(MANAGE_SHOP_SETTINGS) {
        return Err(AdminError::Forbidden(format!(
            "Host user {} may not change shop settings.",
            user.0.id()
        )));
    }

    if body.keys().any(|key| key.trim().is_empty()) {
        return Err(AdminError::ValidationError(
            "Option keys cannot be empty.".to_string(),
        ));
    }

    for (key, value) in body.into_inner() {
        store
            .update_option(&key, value)
            .await
            .with_context(|| format!("Failed to store option `{key}`"))?;
    }

    Ok(HttpResponse::Ok().finish())
}
