pub mod product;
pub mod sqlx_repo;
pub mod storage;
