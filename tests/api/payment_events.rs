use crate::helpers::{AWEBER_DEFAULT_LIST, EDITOR_CAPABILITIES, spawn_app};
use serde_json::{Value, json};

#[tokio::test]
async fn ticked_box_subscribes_the_buyer_to_the_default_list() {
    let app = spawn_app().await;
    let _guard = app.expect_aweber_subscribe(AWEBER_DEFAULT_LIST, 1).await;

    app.create_payment(100, &[], &["aweber"]).await;
    let response = app.post_payment_completed(100).await;

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["reports"][0]["provider"], "aweber");
    assert_eq!(body["failures"], json!([]));
    assert_eq!(
        body["reports"][0]["attempts"],
        json!([{ "list_id": null, "product_id": null, "subscribed": true }])
    );
}

#[tokio::test]
async fn payment_created_reports_the_recorded_signup_intents() {
    let app = spawn_app().await;

    let response = app
        .post_payment_created(&json!({
            "payment_id": 101,
            "customer": { "email": "buyer@example.com" },
            "submission": { "signups": ["house", "unknown"] }
        }))
        .await;

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["signup_intents"], json!(["house"]));
    assert_eq!(body["failures"], json!([]));
}

#[tokio::test]
async fn completing_a_payment_twice_subscribes_to_the_default_list_once() {
    let app = spawn_app().await;
    let _guard = app.expect_aweber_subscribe(AWEBER_DEFAULT_LIST, 1).await;

    app.create_payment(102, &[], &["aweber"]).await;
    app.post_payment_completed(102)
        .await
        .error_for_status()
        .unwrap();
    let second: Value = app.post_payment_completed(102).await.json().await.unwrap();

    assert_eq!(second["reports"][0]["attempts"], json!([]));
}

#[tokio::test]
async fn unticked_box_with_unconfigured_products_calls_nothing() {
    let app = spawn_app().await;
    let _guard = app.expect_aweber_subscribe(AWEBER_DEFAULT_LIST, 0).await;

    app.create_payment(103, &[7], &[]).await;
    let body: Value = app.post_payment_completed(103).await.json().await.unwrap();

    for report in body["reports"].as_array().unwrap() {
        assert_eq!(report["attempts"], json!([]));
    }
}

#[tokio::test]
async fn product_lists_are_subscribed_for_every_cart_line() {
    let app = spawn_app().await;
    let _lists = app.mount_aweber_lists(&[("11", "Fans"), ("12", "Buyers")]).await;
    let _fans = app.expect_aweber_subscribe("11", 1).await;
    let _buyers = app.expect_aweber_subscribe("12", 1).await;
    app.put_product_lists("aweber", 1, &["12", "11"], EDITOR_CAPABILITIES)
        .await
        .error_for_status()
        .unwrap();

    app.create_payment(104, &[1, 2], &[]).await;
    let body: Value = app.post_payment_completed(104).await.json().await.unwrap();

    let lists: Vec<&str> = body["reports"][0]["attempts"]
        .as_array()
        .unwrap()
        .iter()
        .map(|attempt| attempt["list_id"].as_str().unwrap())
        .collect();
    assert_eq!(lists, vec!["12", "11"]);
}

#[tokio::test]
async fn provider_failure_does_not_fail_the_event() {
    let app = spawn_app().await;
    let _guard = app.expect_aweber_subscribe("12", 1).await;
    app.put_product_lists("aweber", 1, &["broken", "12"], EDITOR_CAPABILITIES)
        .await
        .error_for_status()
        .unwrap();

    app.create_payment(105, &[1], &[]).await;
    let response = app.post_payment_completed(105).await;

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    let outcomes: Vec<bool> = body["reports"][0]["attempts"]
        .as_array()
        .unwrap()
        .iter()
        .map(|attempt| attempt["subscribed"].as_bool().unwrap())
        .collect();
    assert_eq!(outcomes, vec![false, true]);
}

#[tokio::test]
async fn completing_an_unknown_payment_returns_404() {
    let app = spawn_app().await;

    let response = app.post_payment_completed(999).await;

    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn payment_with_an_invalid_email_is_rejected() {
    let app = spawn_app().await;

    let response = app
        .post_payment_created(&json!({
            "payment_id": 106,
            "customer": { "email": "not-an-email" }
        }))
        .await;

    assert_eq!(response.status().as_u16(), 400);
}
