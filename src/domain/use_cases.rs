pub mod extractors;
pub mod product_image;
