pub mod home;
pub mod product_images;
pub mod system;
