use anyhow::Context;
use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;

use super::MetadataStore;
use crate::domain::{
    CartItem, CustomerEmail, CustomerInfo, PaymentData, PaymentId, ProductId,
};

/// Host storage backed by the tables in `migrations/`.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn migrate(&self) -> Result<(), anyhow::Error> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run host store migrations")
    }
}

#[async_trait]
impl MetadataStore for PostgresStore {
    #[tracing::instrument(skip(self, payment))]
    async fn record_payment(
        &self,
        payment_id: PaymentId,
        payment: &PaymentData,
    ) -> Result<(), anyhow::Error> {
        let mut transaction = self
            .pool
            .begin()
            .await
            .context("Failed to start a transaction to record a payment")?;

        let customer = &payment.customer;
        sqlx::query(
            r#"
            INSERT INTO payments (id, user_id, email, first_name, last_name)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO UPDATE
            SET user_id = EXCLUDED.user_id,
                email = EXCLUDED.email,
                first_name = EXCLUDED.first_name,
                last_name = EXCLUDED.last_name
            "#,
        )
        .bind(payment_id.get())
        .bind(customer.user_id)
        .bind(customer.email.as_ref())
        .bind(&customer.first_name)
        .bind(&customer.last_name)
        .execute(&mut *transaction)
        .await
        .context("Failed to store payment details")?;

        sqlx::query(r#"DELETE FROM payment_items WHERE payment_id = $1"#)
            .bind(payment_id.get())
            .execute(&mut *transaction)
            .await
            .context("Failed to clear previous cart items")?;

        for (position, item) in payment.cart_items.iter().enumerate() {
            let position = i32::try_from(position).context("Cart has too many items")?;
            sqlx::query(
                r#"
                INSERT INTO payment_items (payment_id, position, product_id, name, quantity)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(payment_id.get())
            .bind(position)
            .bind(item.product_id.get())
            .bind(&item.name)
            .bind(i64::from(item.quantity))
            .execute(&mut *transaction)
            .await
            .context("Failed to store a cart item")?;
        }

        transaction
            .commit()
            .await
            .context("Failed to commit the payment record")
    }

    #[tracing::instrument(skip(self))]
    async fn customer_info(
        &self,
        payment_id: PaymentId,
    ) -> Result<Option<CustomerInfo>, anyhow::Error> {
        let row = sqlx::query_as::<_, (Option<i64>, String, String, String)>(
            r#"
            SELECT user_id, email, first_name, last_name
            FROM payments
            WHERE id = $1
            "#,
        )
        .bind(payment_id.get())
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch the customer of a payment")?;

        row.map(
            |(user_id, email, first_name, last_name)| -> Result<CustomerInfo, anyhow::Error> {
                let email = CustomerEmail::parse(email)
                    .map_err(anyhow::Error::msg)
                    .context("Stored customer email is invalid")?;
                Ok(CustomerInfo {
                    user_id,
                    email,
                    first_name,
                    last_name,
                })
            },
        )
        .transpose()
    }

    #[tracing::instrument(skip(self))]
    async fn cart_items(&self, payment_id: PaymentId) -> Result<Vec<CartItem>, anyhow::Error> {
        let rows = sqlx::query_as::<_, (i64, String, i64)>(
            r#"
            SELECT product_id, name, quantity
            FROM payment_items
            WHERE payment_id = $1
            ORDER BY position
            "#,
        )
        .bind(payment_id.get())
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch the cart of a payment")?;

        rows.into_iter()
            .map(|(product_id, name, quantity)| -> Result<CartItem, anyhow::Error> {
                Ok(CartItem {
                    product_id: ProductId::new(product_id),
                    name,
                    quantity: u32::try_from(quantity).context("Stored quantity is out of range")?,
                })
            })
            .collect()
    }

    #[tracing::instrument(skip(self))]
    async fn get_payment_meta(
        &self,
        payment_id: PaymentId,
        key: &str,
    ) -> Result<Option<Value>, anyhow::Error> {
        sqlx::query_scalar::<_, Value>(
            r#"SELECT meta_value FROM payment_meta WHERE payment_id = $1 AND meta_key = $2"#,
        )
        .bind(payment_id.get())
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to read payment meta")
    }

    #[tracing::instrument(skip(self, value))]
    async fn add_payment_meta(
        &self,
        payment_id: PaymentId,
        key: &str,
        value: Value,
    ) -> Result<(), anyhow::Error> {
        sqlx::query(
            r#"
            INSERT INTO payment_meta (payment_id, meta_key, meta_value)
            VALUES ($1, $2, $3)
            ON CONFLICT (payment_id, meta_key) DO UPDATE SET meta_value = EXCLUDED.meta_value
            "#,
        )
        .bind(payment_id.get())
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await
        .context("Failed to write payment meta")?;
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn delete_payment_meta(
        &self,
        payment_id: PaymentId,
        key: &str,
    ) -> Result<(), anyhow::Error> {
        sqlx::query(r#"DELETE FROM payment_meta WHERE payment_id = $1 AND meta_key = $2"#)
            .bind(payment_id.get())
            .bind(key)
            .execute(&self.pool)
            .await
            .context("Failed to delete payment meta")?;
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn get_product_meta(
        &self,
        product_id: ProductId,
        key: &str,
    ) -> Result<Option<Value>, anyhow::Error> {
        sqlx::query_scalar::<_, Value>(
            r#"SELECT meta_value FROM product_meta WHERE product_id = $1 AND meta_key = $2"#,
        )
        .bind(product_id.get())
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to read product meta")
    }

    #[tracing::instrument(skip(self, value))]
    async fn update_product_meta(
        &self,
        product_id: ProductId,
        key: &str,
        value: Value,
    ) -> Result<(), anyhow::Error> {
        sqlx::query(
            r#"
            INSERT INTO product_meta (product_id, meta_key, meta_value)
            VALUES ($1, $2, $3)
            ON CONFLICT (product_id, meta_key) DO UPDATE SET meta_value = EXCLUDED.meta_value
            "#,
        )
        .bind(product_id.get())
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await
        .context("Failed to write product meta")?;
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn delete_product_meta(
        &self,
        product_id: ProductId,
        key: &str,
    ) -> Result<(), anyhow::Error> {
        sqlx::query(r#"DELETE FROM product_meta WHERE product_id = $1 AND meta_key = $2"#)
            .bind(product_id.get())
            .bind(key)
            .execute(&self.pool)
            .await
            .context("Failed to delete product meta")?;
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn get_option(&self, key: &str) -> Result<Option<Value>, anyhow::Error> {
        sqlx::query_scalar::<_, Value>(
            r#"SELECT option_value FROM host_options WHERE option_key = $1"#,
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to read an option")
    }

    #[tracing::instrument(skip(self, value))]
    async fn update_option(&self, key: &str, value: Value) -> Result<(), anyhow::Error> {
        sqlx::query(
            r#"
            INSERT INTO host_options (option_key, option_value)
            VALUES ($1, $2)
            ON CONFLICT (option_key) DO UPDATE SET option_value = EXCLUDED.option_value
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await
        .context("Failed to write an option")?;
        Ok(())
    }
}
