use actix_web::web;

use crate::routes;

pub fn admin_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/options", web::put().to(routes::update_options))
        .service(
            web::scope("/providers/{provider_id}/products/{product_id}")
                .route("/metabox", web::get().to(routes::product_metabox))
                .route("/lists", web::get().to(routes::get_product_lists))
                .route("/lists", web::put().to(routes::save_product_lists)),
        );
}
