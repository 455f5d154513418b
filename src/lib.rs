use std::sync::Arc;

mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod constants;
pub mod graceful_shutdown;

pub use domain::{entities, image, use_cases};
pub use interfaces::{body_limit, handlers, repositories, routes};
pub use infrastructure::{db, storage, utils};

use repositories::product::ProductRepository;
use storage::{local::LocalStorage, s3::S3Storage};
use use_cases::{
    extractors::{MatchInfoParams, RouteParamExtractor},
    product_image::ProductImageHandler,
};

pub type SharedProductRepo = Arc<dyn ProductRepository>;
pub type LocalImageHandler = ProductImageHandler<SharedProductRepo, LocalStorage>;
pub type S3ImageHandler = ProductImageHandler<SharedProductRepo, S3Storage>;

pub struct AppState {
    pub product_repo: SharedProductRepo,
    pub local_images: LocalImageHandler,
    pub s3_images: Option<S3ImageHandler>,
    pub route_params: Arc<dyn RouteParamExtractor>,
    pub trust_x_forwarded_for: bool,
}

impl AppState {
    pub fn new(
        product_repo: SharedProductRepo,
        local_storage: LocalStorage,
        s3_storage: Option<S3Storage>,
        trust_x_forwarded_for: bool,
    ) -> Self {
        let local_images = ProductImageHandler::new(product_repo.clone(), local_storage);
        let s3_images = s3_storage.map(|s3| ProductImageHandler::new(product_repo.clone(), s3));

        AppState {
            product_repo,
            local_images,
            s3_images,
            route_params: Arc::new(MatchInfoParams),
            trust_x_forwarded_for,
        }
    }

    /// Swaps the path-parameter reader used by the update handlers.
    pub fn with_route_params(mut self, route_params: Arc<dyn RouteParamExtractor>) -> Self {
        self.route_params = route_params;
        self
    }
}
