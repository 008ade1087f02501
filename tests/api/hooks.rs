use crate::helpers::spawn_app;
use serde_json::{Value, json};

#[tokio::test]
async fn hook_table_binds_every_host_hook() {
    let app = spawn_app().await;

    let response = app.get_hooks().await;

    assert_eq!(response.status().as_u16(), 200);
    let hooks: Vec<Value> = response.json().await.unwrap();
    let names: Vec<&str> = hooks
        .iter()
        .map(|hook| hook["host_name"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        vec![
            "add_meta_boxes",
            "add_meta_boxes",
            "edd_metabox_fields_save",
            "edd_settings_extensions",
            "edd_purchase_form_before_submit",
            "edd_insert_payment",
            "edd_complete_purchase"
        ]
    );

    let checkout = &hooks[4];
    assert_eq!(checkout["priority"], 100);
    assert_eq!(checkout["kind"], "action");
    assert_eq!(checkout["path"], "/v1/checkout/fields");
}

#[tokio::test]
async fn metabox_fields_filter_adds_every_provider_key() {
    let app = spawn_app().await;

    let response = app.post_metabox_fields(&json!(["_edd_price"])).await;

    let fields: Value = response.json().await.unwrap();
    assert_eq!(fields, json!(["_edd_price", "_edd_aweber", "_edd_house"]));
}

#[tokio::test]
async fn settings_filter_keeps_host_settings_and_appends_aweber_settings() {
    let app = spawn_app().await;
    let _lists = app.mount_aweber_lists(&[("11", "Fans")]).await;
    let host_setting = json!({ "id": "edd_host_setting", "name": "Host", "type": "text" });

    let response = app.post_settings(&json!([host_setting.clone()])).await;

    let settings: Vec<Value> = response.json().await.unwrap();
    assert_eq!(settings[0], host_setting);
    let ids: Vec<&str> = settings[1..]
        .iter()
        .map(|s| s["id"].as_str().unwrap())
        .collect();
    assert_eq!(
        ids,
        vec![
            "edd_aweber_settings",
            "edd_aweber_list",
            "edd_aweber_label",
            "edd_aweber_checkout_signup_checked"
        ]
    );
    assert_eq!(settings[2]["options"], json!({ "11": "Fans" }));
}
