use askama::Template;
use serde::Serialize;

use super::{IntegrationError, NewsletterIntegration};
use crate::domain::{HostUser, ListCatalog, ListId, ProductId, ProductListSelection};

const METABOX_SCREEN: &str = "download";
const METABOX_CONTEXT: &str = "side";

/// A product edit screen panel, ready for the host to place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Metabox {
    pub id: String,
    pub title: String,
    pub screen: &'static str,
    pub context: &'static str,
    pub html: String,
}

struct ChecklistEntry<'a> {
    list_id: &'a ListId,
    list_name: &'a str,
    checked: bool,
}

#[derive(Template)]
#[template(
    source = r#"<p>Select the lists you wish buyers to be subscribed to when purchasing.</p>
{% for entry in entries %}<label><input type="checkbox" name="{{ field_name }}" value="{{ entry.list_id }}"{% if entry.checked %} checked="checked"{% endif %}>&nbsp;{{ entry.list_name }}</label><br/>
{% endfor %}"#,
    ext = "html"
)]
struct ProductListsTemplate<'a> {
    field_name: String,
    entries: Vec<ChecklistEntry<'a>>,
}

impl NewsletterIntegration {
    /// The product list panel, or `None` when `user` may not edit the product.
    #[tracing::instrument(
        name = "Register product list metabox",
        skip(self, user),
        fields(provider = %self.identity().id(), host_user = user.id())
    )]
    pub async fn register_admin_metabox(
        &self,
        user: &HostUser,
        product_id: ProductId,
    ) -> Result<Option<Metabox>, IntegrationError> {
        if !user.can_edit_product(product_id) {
            return Ok(None);
        }

        let html = self.render_admin_metabox(product_id).await?;
        Ok(Some(Metabox {
            id: self.identity().element_id(),
            title: self.identity().label().to_string(),
            screen: METABOX_SCREEN,
            context: METABOX_CONTEXT,
            html,
        }))
    }

    /// One checkbox per available list, ticked for the lists already selected.
    pub async fn render_admin_metabox(
        &self,
        product_id: ProductId,
    ) -> Result<String, IntegrationError> {
        let catalog = match self.provider.list_available_lists().await {
            Ok(catalog) => catalog,
            Err(e) => {
                tracing::warn!(
                    error.cause_chain = ?e,
                    error.message = %e,
                    "Failed to fetch the provider's lists, rendering an empty checklist"
                );
                ListCatalog::default()
            }
        };
        let selection = self.product_list_selection(product_id).await?;

        let entries = catalog
            .iter()
            .map(|list| ChecklistEntry {
                list_id: &list.list_id,
                list_name: &list.list_name,
                checked: selection.contains(&list.list_id),
            })
            .collect();

        let html = ProductListsTemplate {
            field_name: format!("{}[]", self.identity().product_lists_key()),
            entries,
        }
        .render()?;

        Ok(html)
    }

    /// Replaces the product's selection. An empty selection removes the key.
    #[tracing::instrument(
        name = "Save product list selection",
        skip(self, selection),
        fields(provider = %self.identity().id(), selected = selection.len())
    )]
    pub async fn save_admin_metabox(
        &self,
        product_id: ProductId,
        selection: ProductListSelection,
    ) -> Result<(), IntegrationError> {
        let key = self.identity().product_lists_key();
        if selection.is_empty() {
            self.store.delete_product_meta(product_id, &key).await?;
        } else {
            self.store
                .update_product_meta(product_id, &key, selection.to_value())
                .await?;
        }
        Ok(())
    }

    /// Host filter listing the product fields saved with the edit form.
    pub fn metabox_fields(&self, mut fields: Vec<String>) -> Vec<String> {
        let key = self.identity().product_lists_key();
        if !fields.contains(&key) {
            fields.push(key);
        }
        fields
    }
}
