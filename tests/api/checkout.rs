use crate::helpers::spawn_app;

#[tokio::test]
async fn checkout_fields_hold_one_signup_box_per_provider() {
    let app = spawn_app().await;

    let response = app.get_checkout_fields().await;

    assert_eq!(response.status().as_u16(), 200);
    assert!(
        response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with("text/html"))
    );

    let html = response.text().await.unwrap();
    let aweber = html.find(r#"name="edd_aweber_signup""#).unwrap();
    let house = html.find(r#"name="edd_house_signup""#).unwrap();
    assert!(aweber < house, "signup boxes are not in configuration order");
    assert!(html.contains("Signup for the newsletter"));
    assert!(html.contains("Join the house list"));
}

#[tokio::test]
async fn stored_options_change_the_rendered_box() {
    let app = spawn_app().await;

    app.put_options(
        &serde_json::json!({
            "edd_aweber_label": "Send me AWeber mail",
            "edd_aweber_checkout_signup_checked": "1"
        }),
        "manage_shop_settings",
    )
    .await
    .error_for_status()
    .unwrap();

    let html = app.get_checkout_fields().await.text().await.unwrap();

    assert!(html.contains("Send me AWeber mail"));
    assert!(!html.contains("Signup for the newsletter"));
    assert_eq!(html.matches(r#"checked="checked""#).count(), 2);
}
