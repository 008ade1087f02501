use reqwest::{Method, RequestBuilder, Response};
use serde_json::{Value, json};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockGuard, ResponseTemplate};

use super::{AWEBER_ACCOUNT, HOST_TOKEN, TestApp};

/// The capabilities a host editor carries in these tests.
pub const EDITOR_CAPABILITIES: &str = "edit_product,manage_shop_settings";

impl TestApp {
    /// A request to the service carrying the host token.
    pub fn request(&self, method: Method, route: &str) -> RequestBuilder {
        self.api_client
            .request(method, format!("{}{route}", self.address))
            .bearer_auth(HOST_TOKEN)
    }

    /// A host token request on behalf of host user 1 with `capabilities`.
    pub fn request_as(&self, method: Method, route: &str, capabilities: &str) -> RequestBuilder {
        self.request(method, route)
            .header("X-Host-User-Id", "1")
            .header("X-Host-User-Capabilities", capabilities)
    }

    pub async fn health_check(&self) -> Response {
        self.api_client
            .get(format!("{}/health_check", self.address))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get_hooks(&self) -> Response {
        self.request(Method::GET, "/v1/hooks")
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get_checkout_fields(&self) -> Response {
        self.request(Method::GET, "/v1/checkout/fields")
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_payment_created(&self, payload: &Value) -> Response {
        self.request(Method::POST, "/v1/events/payment-created")
            .json(payload)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_payment_completed(&self, payment_id: i64) -> Response {
        self.request(Method::POST, "/v1/events/payment-completed")
            .json(&json!({ "payment_id": payment_id }))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_metabox_fields(&self, fields: &Value) -> Response {
        self.request(Method::POST, "/v1/hooks/metabox-fields")
            .json(fields)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_settings(&self, settings: &Value) -> Response {
        self.request(Method::POST, "/v1/hooks/settings")
            .json(settings)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get_metabox(&self, provider: &str, product: i64, capabilities: &str) -> Response {
        self.request_as(
            Method::GET,
            &format!("/v1/providers/{provider}/products/{product}/metabox"),
            capabilities,
        )
        .send()
        .await
        .expect("Failed to execute request.")
    }

    pub async fn get_product_lists(&self, provider: &str, product: i64) -> Response {
        self.request(
            Method::GET,
            &format!("/v1/providers/{provider}/products/{product}/lists"),
        )
        .send()
        .await
        .expect("Failed to execute request.")
    }

    pub async fn put_product_lists(
        &self,
        provider: &str,
        product: i64,
        lists: &[&str],
        capabilities: &str,
    ) -> Response {
        self.request_as(
            Method::PUT,
            &format!("/v1/providers/{provider}/products/{product}/lists"),
            capabilities,
        )
        .json(&json!({ "lists": lists }))
        .send()
        .await
        .expect("Failed to execute request.")
    }

    pub async fn put_options(&self, options: &Value, capabilities: &str) -> Response {
        self.request_as(Method::PUT, "/v1/options", capabilities)
            .json(options)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    /// Records a payment by `buyer@example.com` for `products`, ticking the signup
    /// box of every provider in `signups`.
    pub async fn create_payment(&self, payment_id: i64, products: &[i64], signups: &[&str]) {
        let cart_items: Vec<Value> = products
            .iter()
            .map(|id| json!({ "product_id": id, "name": format!("Product {id}") }))
            .collect();

        self.post_payment_created(&json!({
            "payment_id": payment_id,
            "customer": {
                "user_id": 5,
                "email": "buyer@example.com",
                "first_name": "Grace",
                "last_name": "Hopper"
            },
            "cart_items": cart_items,
            "submission": { "signups": signups }
        }))
        .await
        .error_for_status()
        .unwrap();
    }

    /// Expects exactly `times` AWeber subscribe calls for `list_id`.
    pub async fn expect_aweber_subscribe(&self, list_id: &str, times: u64) -> MockGuard {
        Mock::given(path(format!(
            "/1.0/accounts/{AWEBER_ACCOUNT}/lists/{list_id}/subscribers"
        )))
        .and(method("POST"))
        .and(header("Authorization", "Bearer aweber-token"))
        .respond_with(ResponseTemplate::new(201))
        .named(format!("AWeber subscribe to {list_id}"))
        .expect(times)
        .mount_as_scoped(&self.aweber_server)
        .await
    }

    pub async fn mount_aweber_lists(&self, lists: &[(&str, &str)]) -> MockGuard {
        let entries: Vec<Value> = lists
            .iter()
            .map(|(id, name)| json!({ "id": id, "name": name }))
            .collect();

        Mock::given(path(format!("/1.0/accounts/{AWEBER_ACCOUNT}/lists")))
            .and(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "entries": entries })))
            .named("AWeber lists")
            .mount_as_scoped(&self.aweber_server)
            .await
    }
}
