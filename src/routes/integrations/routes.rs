use actix_web::web;

use crate::routes;

pub fn integration_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/hooks", web::get().to(routes::list_hooks))
        .route(
            "/hooks/metabox-fields",
            web::post().to(routes::filter_metabox_fields),
        )
        .route("/hooks/settings", web::post().to(routes::filter_settings))
        .route("/checkout/fields", web::get().to(routes::checkout_fields))
        .route(
            "/events/payment-created",
            web::post().to(routes::payment_created),
        )
        .route(
            "/events/payment-completed",
            web::post().to(routes::payment_completed),
        );
}
