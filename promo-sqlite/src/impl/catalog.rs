use crate::Db;
use crate::types::ProductRow;
use promo_core::{
    models::{ProductData, ProductRecord},
    ports::CatalogRepository,
};

impl CatalogRepository for Db {
    async fn create_product(
        &self,
        product_id: Self::ProductId,
        data: ProductData,
        as_of: Self::DateTime,
    ) -> Result<ProductRecord<Self::ProductId>, Self::Error> {
        sqlx::query(
            r#"
            insert into
                product (id, as_of, name, base_price, category, image)
            values
                ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(product_id)
        .bind(as_of)
        .bind(&data.name)
        .bind(data.base_price)
        .bind(&data.category)
        .bind(&data.image)
        .execute(&self.writer)
        .await?;

        Ok(ProductRecord {
            id: product_id,
            data,
        })
    }

    async fn get_product(
        &self,
        product_id: Self::ProductId,
    ) -> Result<Option<ProductRecord<Self::ProductId>>, Self::Error> {
        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            select
                id, name, base_price, category, image
            from
                product
            where
                id = $1
            "#,
        )
        .bind(product_id)
        .fetch_optional(&self.reader)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn list_products(&self) -> Result<Vec<ProductRecord<Self::ProductId>>, Self::Error> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r#"
            select
                id, name, base_price, category, image
            from
                product
            order by
                name
            "#,
        )
        .fetch_all(&self.reader)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
