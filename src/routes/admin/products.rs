use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError, web};
use serde::{Deserialize, Serialize};

use crate::authentication::AuthenticatedHostUser;
use crate::domain::{ListId, ProductId, ProductListSelection, ProviderId};
use crate::integration::{IntegrationError, IntegrationRegistry, NewsletterIntegration};
use crate::utils::{build_error_response, error_chain_fmt};

#[derive(thiserror::Error)]
pub enum AdminError {
    #[error("{0}")]
    ValidationError(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("No provider is configured with id `{0}`.")]
    UnknownProvider(String),

    #[error(transparent)]
    IntegrationError(#[from] IntegrationError),

    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for AdminError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for AdminError {
    fn error_response(&self) -> HttpResponse {
        let status_code = match self {
            AdminError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AdminError::Forbidden(_) => StatusCode::FORBIDDEN,
            AdminError::UnknownProvider(_) => StatusCode::NOT_FOUND,
            AdminError::IntegrationError(_) | AdminError::UnexpectedError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        build_error_response(status_code, self.to_string())
    }
}

#[derive(Deserialize)]
pub struct ProductPathParams {
    provider_id: String,
    product_id: i64,
}

impl ProductPathParams {
    fn product_id(&self) -> ProductId {
        ProductId::new(self.product_id)
    }

    fn integration<'a>(
        &self,
        registry: &'a IntegrationRegistry,
    ) -> Result<&'a NewsletterIntegration, AdminError> {
        registry
            .get(&self.provider_id)
            .ok_or_else(|| AdminError::UnknownProvider(self.provider_id.clone()))
    }
}

#[derive(Deserialize)]
pub struct SaveListsBody {
    lists: Vec<String>,
}

#[derive(Serialize)]
struct ProductListsResponse {
    provider: ProviderId,
    product_id: ProductId,
    lists: ProductListSelection,
}

/// `add_meta_boxes` for one provider. Answers 204 when the user may not edit the
/// product, so the host registers nothing.
#[tracing::instrument(
    name = "Product list metabox",
    skip_all,
    fields(provider = %path.provider_id, product_id = %path.product_id)
)]
pub async fn product_metabox(
    path: web::Path<ProductPathParams>,
    user: AuthenticatedHostUser,
    registry: web::Data<IntegrationRegistry>,
) -> Result<HttpResponse, AdminError> {
    let integration = path.integration(&registry)?;

    let metabox = integration
        .register_admin_metabox(&user.into_inner(), path.product_id())
        .await?;

    Ok(match metabox {
        Some(metabox) => HttpResponse::Ok().json(metabox),
        None => HttpResponse::NoContent().finish(),
    })
}

#[tracing::instrument(
    skip_all,
    fields(provider = %path.provider_id, product_id = %path.product_id)
)]
pub async fn get_product_lists(
    path: web::Path<ProductPathParams>,
    registry: web::Data<IntegrationRegistry>,
) -> Result<HttpResponse, AdminError> {
    let integration = path.integration(&registry)?;
    let lists = integration
        .product_list_selection(path.product_id())
        .await?;

    Ok(HttpResponse::Ok().json(ProductListsResponse {
        provider: integration.identity().id().clone(),
        product_id: path.product_id(),
        lists,
    }))
}

/// Saves the product edit form's checklist, replacing whatever was selected.
#[tracing::instrument(
    skip_all,
    fields(provider = %path.provider_id, product_id = %path.product_id)
)]
pub async fn save_product_lists(
    path: web::Path<ProductPathParams>,
    body: web::Json<SaveListsBody>,
    user: AuthenticatedHostUser,
    registry: web::Data<IntegrationRegistry>,
) -> Result<HttpResponse, AdminError> {
    let integration = path.integration(&registry)?;
    let product_id = path.product_id();

    if !user.0.can_edit_product(product_id) {
        return Err(AdminError::Forbidden(format!(
            "Host user {} may not edit product {product_id}.",
            user.0.id()
        )));
    }

    let list_ids = body
        .into_inner()
        .lists
        .into_iter()
        .map(ListId::parse)
        .collect::<Result<Vec<_>, _>>()
        .map_err(AdminError::ValidationError)?;
    let selection = ProductListSelection::new(list_ids);

    integration
        .save_admin_metabox(product_id, selection.clone())
        .await?;

    Ok(HttpResponse::Ok().json(ProductListsResponse {
        provider: integration.identity().id().clone(),
        product_id,
        lists: selection,
    }))
}
