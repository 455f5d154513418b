use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    entities::product::{Product, ProductRow, UpdateProductImageUrlParams},
    errors::AppError,
    repositories::sqlx_repo::SqlxProductRepo,
    utils::valid_uuid::valid_uuid,
};

#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn check_connection(&self) -> Result<(), AppError>;

    /// Fetches the product's id and current image URL
    async fn get_product_by_id(&self, id: &str) -> Result<Product, AppError>;

    /// Points the product at a new image and bumps `updated_at`
    async fn update_product_image_url(&self, params: &UpdateProductImageUrlParams) -> Result<(), AppError>;
}

#[async_trait]
impl<T> ProductRepository for Arc<T>
where
    T: ProductRepository + ?Sized,
{
    async fn check_connection(&self) -> Result<(), AppError> {
        (**self).check_connection().await
    }

    async fn get_product_by_id(&self, id: &str) -> Result<Product, AppError> {
        (**self).get_product_by_id(id).await
    }

    async fn update_product_image_url(&self, params: &UpdateProductImageUrlParams) -> Result<(), AppError> {
        (**self).update_product_image_url(params).await
    }
}

impl SqlxProductRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxProductRepo { pool }
    }
}

#[async_trait]
impl ProductRepository for SqlxProductRepo {
    async fn check_connection(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(AppError::from)
    }

    async fn get_product_by_id(&self, id: &str) -> Result<Product, AppError> {
        let product_id = valid_uuid(id)?;

        let row = sqlx::query_as::<_, ProductRow>(
            r#"SELECT id, image_url, updated_at FROM products WHERE id = $1"#
        )
        .bind(product_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn update_product_image_url(&self, params: &UpdateProductImageUrlParams) -> Result<(), AppError> {
        let product_id = valid_uuid(&params.id)?;

        let result = sqlx::query(
            r#"
            UPDATE products
            SET
                image_url = $1,
                updated_at = $2
            WHERE id = $3
            "#
        )
        .bind(Some(params.image_url.as_str()))
        .bind(params.updated_at)
        .bind(product_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Product not found".into()));
        }

        Ok(())
    }
}
