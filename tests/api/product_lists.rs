use crate::helpers::{EDITOR_CAPABILITIES, spawn_app};
use serde_json::{Value, json};

#[tokio::test]
async fn saved_selection_replaces_the_previous_one() {
    let app = spawn_app().await;

    app.put_product_lists("house", 3, &["weekly", "launches"], EDITOR_CAPABILITIES)
        .await
        .error_for_status()
        .unwrap();
    app.put_product_lists("house", 3, &["weekly"], EDITOR_CAPABILITIES)
        .await
        .error_for_status()
        .unwrap();

    let body: Value = app.get_product_lists("house", 3).await.json().await.unwrap();
    assert_eq!(body["lists"], json!(["weekly"]));
    assert_eq!(body["product_id"], 3);
}

#[tokio::test]
async fn saving_lists_needs_the_edit_product_capability() {
    let app = spawn_app().await;

    let response = app
        .put_product_lists("house", 3, &["weekly"], "manage_shop_settings")
        .await;

    assert_eq!(response.status().as_u16(), 403);
    let body: Value = app.get_product_lists("house", 3).await.json().await.unwrap();
    assert_eq!(body["lists"], json!([]));
}

#[tokio::test]
async fn capability_for_one_product_allows_saving_only_that_product() {
    let app = spawn_app().await;

    let allowed = app.put_product_lists("house", 3, &["weekly"], "edit_product:3").await;
    let denied = app.put_product_lists("house", 4, &["weekly"], "edit_product:3").await;

    assert_eq!(allowed.status().as_u16(), 200);
    assert_eq!(denied.status().as_u16(), 403);
}

#[tokio::test]
async fn unknown_provider_returns_404() {
    let app = spawn_app().await;

    let response = app.get_product_lists("mailchimp", 3).await;

    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn metabox_lists_the_provider_lists_with_the_selection_ticked() {
    let app = spawn_app().await;
    app.put_product_lists("house", 3, &["launches"], EDITOR_CAPABILITIES)
        .await
        .error_for_status()
        .unwrap();

    let response = app.get_metabox("house", 3, EDITOR_CAPABILITIES).await;

    assert_eq!(response.status().as_u16(), 200);
    let metabox: Value = response.json().await.unwrap();
    assert_eq!(metabox["id"], "edd_house");
    assert_eq!(metabox["title"], "House list");
    assert_eq!(metabox["screen"], "download");
    assert_eq!(metabox["context"], "side");

    let html = metabox["html"].as_str().unwrap();
    assert_eq!(html.matches(r#"name="_edd_house[]""#).count(), 2);
    assert!(html.contains(r#"value="launches" checked="checked""#));
    assert!(!html.contains(r#"value="weekly" checked"#));
}

#[tokio::test]
async fn metabox_is_not_registered_for_users_who_cannot_edit_the_product() {
    let app = spawn_app().await;

    let response = app.get_metabox("house", 3, "manage_shop_settings").await;

    assert_eq!(response.status().as_u16(), 204);
}

#[tokio::test]
async fn metabox_renders_an_empty_checklist_when_the_provider_is_down() {
    let app = spawn_app().await;

    // no AWeber mock mounted, so the list request gets a 404
    let response = app.get_metabox("aweber", 3, EDITOR_CAPABILITIES).await;

    assert_eq!(response.status().as_u16(), 200);
    let metabox: Value = response.json().await.unwrap();
    assert!(!metabox["html"].as_str().unwrap().contains("<input"));
}

#[tokio::test]
async fn list_ids_that_would_change_the_provider_url_are_rejected() {
    let app = spawn_app().await;

    for list_id in ["../x/..", "1001/subscribers?x=", ".."] {
        let response = app
            .put_product_lists("aweber", 3, &[list_id], EDITOR_CAPABILITIES)
            .await;

        assert_eq!(
            response.status().as_u16(),
            400,
            "{list_id:?} was not rejected"
        );
    }
    let body: Value = app.get_product_lists("aweber", 3).await.json().await.unwrap();
    assert_eq!(body["lists"], json!([]));
}
