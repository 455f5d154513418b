use actix_web::web;

use crate::handlers::{home::home, system::health_check};

mod products;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(home);

    cfg.service(
        web::scope("/api/v1")
            .service(health_check)
            .configure(products::config_routes)
    );
}
