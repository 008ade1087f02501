use std::collections::BTreeSet;

use super::ProductId;

pub const EDIT_PRODUCT: &str = "edit_product";
pub const MANAGE_SHOP_SETTINGS: &str = "manage_shop_settings";

/// The host account on whose behalf an admin request is made, with the
/// capabilities the host granted it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostUser {
    id: i64,
    capabilities: BTreeSet<String>,
}

impl HostUser {
    pub fn new<I, S>(id: i64, capabilities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id,
            capabilities: capabilities
                .into_iter()
                .map(Into::into)
                .map(|c: String| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .collect(),
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn can(&self, capability: &str) -> bool {
        self.capabilities.contains(capability)
    }

    /// Either the blanket `edit_product` capability or `edit_product:{id}`.
    pub fn can_edit_product(&self, product_id: ProductId) -> bool {
        self.can(EDIT_PRODUCT) || self.can(&format!("{EDIT_PRODUCT}:{product_id}"))
    }
}
