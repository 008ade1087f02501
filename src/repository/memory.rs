use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use super::MetadataStore;
use crate::domain::{CartItem, CustomerInfo, PaymentData, PaymentId, ProductId};

#[derive(Debug, Clone)]
struct PaymentRecord {
    customer: CustomerInfo,
    cart_items: Vec<CartItem>,
}

/// Process-local host storage. Everything is lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    payments: RwLock<HashMap<PaymentId, PaymentRecord>>,
    payment_meta: RwLock<HashMap<(PaymentId, String), Value>>,
    product_meta: RwLock<HashMap<(ProductId, String), Value>>,
    options: RwLock<HashMap<String, Value>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MetadataStore for InMemoryStore {
    async fn record_payment(
        &self,
        payment_id: PaymentId,
        payment: &PaymentData,
    ) -> Result<(), anyhow::Error> {
        self.payments.write().await.insert(
            payment_id,
            PaymentRecord {
                customer: payment.customer.clone(),
                cart_items: payment.cart_items.clone(),
            },
        );
        Ok(())
    }

    async fn customer_info(
        &self,
        payment_id: PaymentId,
    ) -> Result<Option<CustomerInfo>, anyhow::Error> {
        Ok(self
            .payments
            .read()
            .await
            .get(&payment_id)
            .map(|record| record.customer.clone()))
    }

    async fn cart_items(&self, payment_id: PaymentId) -> Result<Vec<CartItem>, anyhow::Error> {
        Ok(self
            .payments
            .read()
            .await
            .get(&payment_id)
            .map(|record| record.cart_items.clone())
            .unwrap_or_default())
    }

    async fn get_payment_meta(
        &self,
        payment_id: PaymentId,
        key: &str,
    ) -> Result<Option<Value>, anyhow::Error> {
        Ok(self
            .payment_meta
            .read()
            .await
            .get(&(payment_id, key.to_string()))
            .cloned())
    }

    async fn add_payment_meta(
        &self,
        payment_id: PaymentId,
        key: &str,
        value: Value,
    ) -> Result<(), anyhow::Error> {
        self.payment_meta
            .write()
            .await
            .insert((payment_id, key.to_string()), value);
        Ok(())
    }

    async fn delete_payment_meta(
        &self,
        payment_id: PaymentId,
        key: &str,
    ) -> Result<(), anyhow::Error> {
        self.payment_meta
            .write()
            .await
            .remove(&(payment_id, key.to_string()));
        Ok(())
    }

    async fn get_product_meta(
        &self,
        product_id: ProductId,
        key: &str,
    ) -> Result<Option<Value>, anyhow::Error> {
        Ok(self
            .product_meta
            .read()
            .await
            .get(&(product_id, key.to_string()))
            .cloned())
    }

    async fn update_product_meta(
        &self,
        product_id: ProductId,
        key: &str,
        value: Value,
    ) -> Result<(), anyhow::Error> {
        self.product_meta
            .write()
            .await
            .insert((product_id, key.to_string()), value);
        Ok(())
    }

    async fn delete_product_meta(
        &self,
        product_id: ProductId,
        key: &str,
    ) -> Result<(), anyhow::Error> {
        self.product_meta
            .write()
            .await
            .remove(&(product_id, key.to_string()));
        Ok(())
    }

    async fn get_option(&self, key: &str) -> Result<Option<Value>, anyhow::Error> {
        Ok(self.options.read().await.get(key).cloned())
    }

    async fn update_option(&self, key: &str, value: Value) -> Result<(), anyhow::Error> {
        self.options.write().await.insert(key.to_string(), value);
        Ok(())
    }
}
