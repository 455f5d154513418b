pub mod entities;
pub mod image;
pub mod use_cases;
