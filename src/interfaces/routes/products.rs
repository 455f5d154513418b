use actix_web::web;

use crate::handlers::product_images;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/products")
            .service(
                web::resource("/upload-image")
                    .route(web::post().to(product_images::upload_product_image))
            )
            .service(
                web::resource("/{id}/image")
                    .route(web::post().to(product_images::update_product_image))
            )
    );

    cfg.service(
        web::scope("/s3/products")
            .service(
                web::resource("/upload-image")
                    .route(web::post().to(product_images::upload_product_image_s3))
            )
            .service(
                web::resource("/{id}/image")
                    .route(web::post().to(product_images::update_product_image_s3))
            )
    );
}
