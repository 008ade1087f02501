mod memory;
mod postgres;

pub use memory::InMemoryStore;
pub use postgres::PostgresStore;

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::{CartItem, CustomerInfo, PaymentData, PaymentId, ProductId};

/// The host platform's key-value storage, as seen by the integrations.
///
/// Payment and product metadata are keyed by `(record id, meta key)`. Options form a
/// single global map. Deleting a key that is not there is not an error.
#[async_trait]
pub trait MetadataStore: Send + Sync + std::fmt::Debug {
    async fn record_payment(
        &self,
        payment_id: PaymentId,
        payment: &PaymentData,
    ) -> Result<(), anyhow::Error>;

    async fn customer_info(
        &self,
        payment_id: PaymentId,
    ) -> Result<Option<CustomerInfo>, anyhow::Error>;

    async fn cart_items(&self, payment_id: PaymentId) -> Result<Vec<CartItem>, anyhow::Error>;

    async fn get_payment_meta(
        &self,
        payment_id: PaymentId,
        key: &str,
    ) -> Result<Option<Value>, anyhow::Error>;

    async fn add_payment_meta(
        &self,
        payment_id: PaymentId,
        key: &str,
        value: Value,
    ) -> Result<(), anyhow::Error>;

    async fn delete_payment_meta(&self, payment_id: PaymentId, key: &str)
    -> Result<(), anyhow::Error>;

    async fn get_product_meta(
        &self,
        product_id: ProductId,
        key: &str,
    ) -> Result<Option<Value>, anyhow::Error>;

    async fn update_product_meta(
        &self,
        product_id: ProductId,
        key: &str,
        value: Value,
    ) -> Result<(), anyhow::Error>;

    async fn delete_product_meta(&self, product_id: ProductId, key: &str)
    -> Result<(), anyhow::Error>;

    async fn get_option(&self, key: &str) -> Result<Option<Value>, anyhow::Error>;

    async fn update_option(&self, key: &str, value: Value) -> Result<(), anyhow::Error>;
}

/// Interprets a stored flag the way the host writes them: `true`, `1`, `"1"`, `"on"`,
/// `"yes"` or `"true"`.
pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_i64().is_some_and(|n| n != 0),
        Some(Value::String(s)) => matches!(s.trim(), "1" | "on" | "yes" | "true"),
        _ => false,
    }
}
