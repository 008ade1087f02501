use crate::helpers::{AWEBER_DEFAULT_LIST, spawn_app};
use serde_json::json;

#[tokio::test]
async fn options_need_the_manage_shop_settings_capability() {
    let app = spawn_app().await;

    let response = app
        .put_options(&json!({ "edd_house_label": "Hi" }), "edit_product")
        .await;

    assert_eq!(response.status().as_u16(), 403);
    let html = app.get_checkout_fields().await.text().await.unwrap();
    assert!(!html.contains(">Hi<"));
}

#[tokio::test]
async fn empty_option_keys_are_rejected() {
    let app = spawn_app().await;

    let response = app
        .put_options(&json!({ " ": true }), "manage_shop_settings")
        .await;

    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn list_chosen_in_the_settings_receives_checkout_signups() {
    let app = spawn_app().await;
    let _chosen = app.expect_aweber_subscribe("2002", 1).await;
    let _configured = app.expect_aweber_subscribe(AWEBER_DEFAULT_LIST, 0).await;
    app.put_options(&json!({ "edd_aweber_list": "2002" }), "manage_shop_settings")
        .await
        .error_for_status()
        .unwrap();

    app.create_payment(300, &[], &["aweber"]).await;
    let response = app.post_payment_completed(300).await;

    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(
        body["reports"][0]["attempts"],
        json!([{ "list_id": "2002", "product_id": null, "subscribed": true }])
    );
}
