use crate::Db;
use crate::types::{BundleId, BundleRow, DateTime, HydratedItemRow, ProductId, TimelineItemRow};
use promo_core::{
    models::{
        BundleData, BundleItem, BundleRecord, HydratedBundle, HydratedItem, ProductData,
        ProductRecord, TimelineEntry, find_conflicting_entry,
    },
    ports::{BundleFailure, BundleRepository, validate_candidate},
};

/// Load the timeline slice relevant to a candidate: every bundle promoting
/// any of `products`, with its window and resolved product names.
///
/// This is the SQL equivalent of the original catalog query's `$in` filter;
/// the interval intersection itself is decided by the core rule, not here,
/// so the rule has exactly one implementation.
async fn fetch_timeline(
    conn: &mut sqlx::SqliteConnection,
    products: &[ProductId],
) -> Result<Vec<TimelineEntry<BundleId, ProductId, DateTime>>, sqlx::Error> {
    if products.is_empty() {
        return Ok(Vec::new());
    }

    let mut query_builder = sqlx::QueryBuilder::new(
        r#"
        select distinct
            b.id, b.name, b.description, b.start_time, b.end_time, b.created_at, b.updated_at
        from
            bundle b
        join
            bundle_item i on i.bundle_id = b.id
        where
            i.product_id in ("#,
    );
    let mut separated = query_builder.separated(", ");
    for product_id in products {
        separated.push_bind(*product_id);
    }
    query_builder.push(")");

    let heads: Vec<BundleRow> = query_builder.build_query_as().fetch_all(&mut *conn).await?;

    let mut timeline = Vec::with_capacity(heads.len());
    for head in heads {
        let items = sqlx::query_as::<_, TimelineItemRow>(
            r#"
            select
                i.product_id, p.name
            from
                bundle_item i
            join
                product p on p.id = i.product_id
            where
                i.bundle_id = $1
            order by
                i.position
            "#,
        )
        .bind(head.id)
        .fetch_all(&mut *conn)
        .await?;

        timeline.push(TimelineEntry {
            bundle_id: head.id,
            bundle_name: head.name,
            start: head.start_time,
            end: head.end_time,
            products: items
                .into_iter()
                .map(|item| (item.product_id, item.name))
                .collect(),
        });
    }

    Ok(timeline)
}

/// Insert a bundle's items, preserving the submitted order.
async fn insert_items(
    conn: &mut sqlx::SqliteConnection,
    bundle_id: BundleId,
    items: &[BundleItem<ProductId>],
) -> Result<(), sqlx::Error> {
    for (position, item) in items.iter().enumerate() {
        sqlx::query(
            r#"
            insert into
                bundle_item (bundle_id, product_id, position, rule)
            values
                ($1, $2, $3, $4)
            "#,
        )
        .bind(bundle_id)
        .bind(item.product_id)
        .bind(position as i64)
        .bind(sqlx::types::Json(&item.rule))
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

/// Load a bundle's items with their products fully resolved.
async fn hydrate_items(
    conn: &mut sqlx::SqliteConnection,
    bundle_id: BundleId,
) -> Result<Vec<HydratedItem<ProductId>>, sqlx::Error> {
    let rows = sqlx::query_as::<_, HydratedItemRow>(
        r#"
        select
            i.product_id, p.name, p.base_price, p.category, p.image, i.rule
        from
            bundle_item i
        join
            product p on p.id = i.product_id
        where
            i.bundle_id = $1
        order by
            i.position
        "#,
    )
    .bind(bundle_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| HydratedItem {
            product: ProductRecord {
                id: row.product_id,
                data: ProductData {
                    name: row.name,
                    base_price: row.base_price,
                    category: row.category,
                    image: row.image,
                },
            },
            rule: row.rule.0,
        })
        .collect())
}

fn hydrate(row: BundleRow, items: Vec<HydratedItem<ProductId>>) -> HydratedBundle<BundleId, ProductId, DateTime> {
    HydratedBundle {
        id: row.id,
        name: row.name,
        description: row.description,
        items,
        start: row.start_time,
        end: row.end_time,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

impl BundleRepository for Db {
    async fn create_bundle(
        &self,
        bundle_id: Self::BundleId,
        data: BundleData<Self::ProductId, Self::DateTime>,
        as_of: Self::DateTime,
    ) -> Result<
        Result<BundleRecord<Self::BundleId, Self::ProductId, Self::DateTime>, BundleFailure>,
        Self::Error,
    > {
        // Validation and insert share one transaction on the single-writer
        // pool: a racing candidate for the same products cannot commit
        // between our timeline read and our insert.
        let mut tx = self.writer.begin().await?;

        let products: Vec<ProductId> = data.product_ids().cloned().collect();
        let timeline = fetch_timeline(&mut *tx, &products).await?;
        if let Err(failure) = validate_candidate(&data, None, &timeline) {
            // Dropping the transaction rolls it back; nothing was persisted.
            return Ok(Err(failure));
        }

        sqlx::query(
            r#"
            insert into
                bundle (id, name, description, start_time, end_time, created_at, updated_at)
            values
                ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(bundle_id)
        .bind(&data.name)
        .bind(&data.description)
        .bind(data.start)
        .bind(data.end)
        .bind(as_of)
        .bind(as_of)
        .execute(&mut *tx)
        .await?;

        insert_items(&mut *tx, bundle_id, &data.items).await?;
        tx.commit().await?;

        Ok(Ok(BundleRecord {
            id: bundle_id,
            data,
            created_at: as_of,
            updated_at: as_of,
        }))
    }

    async fn update_bundle(
        &self,
        bundle_id: Self::BundleId,
        data: BundleData<Self::ProductId, Self::DateTime>,
        as_of: Self::DateTime,
    ) -> Result<
        Result<
            Option<BundleRecord<Self::BundleId, Self::ProductId, Self::DateTime>>,
            BundleFailure,
        >,
        Self::Error,
    > {
        let mut tx = self.writer.begin().await?;

        let existing: Option<BundleRow> = sqlx::query_as(
            r#"
            select
                id, name, description, start_time, end_time, created_at, updated_at
            from
                bundle
            where
                id = $1
            "#,
        )
        .bind(bundle_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(existing) = existing else {
            return Ok(Ok(None));
        };

        // Same validation path as create, with the targeted bundle excluded
        // so it never conflicts with itself.
        let products: Vec<ProductId> = data.product_ids().cloned().collect();
        let timeline = fetch_timeline(&mut *tx, &products).await?;
        if let Err(failure) = validate_candidate(&data, Some(&bundle_id), &timeline) {
            return Ok(Err(failure));
        }

        sqlx::query(
            r#"
            update
                bundle
            set
                name = $2, description = $3, start_time = $4, end_time = $5, updated_at = $6
            where
                id = $1
            "#,
        )
        .bind(bundle_id)
        .bind(&data.name)
        .bind(&data.description)
        .bind(data.start)
        .bind(data.end)
        .bind(as_of)
        .execute(&mut *tx)
        .await?;

        sqlx::query("delete from bundle_item where bundle_id = $1")
            .bind(bundle_id)
            .execute(&mut *tx)
            .await?;
        insert_items(&mut *tx, bundle_id, &data.items).await?;
        tx.commit().await?;

        Ok(Ok(Some(BundleRecord {
            id: bundle_id,
            data,
            created_at: existing.created_at,
            updated_at: as_of,
        })))
    }

    async fn find_overlapping(
        &self,
        product_ids: &[Self::ProductId],
        start: &Self::DateTime,
        end: &Self::DateTime,
        exclude: Option<&Self::BundleId>,
    ) -> Result<Option<TimelineEntry<Self::BundleId, Self::ProductId, Self::DateTime>>, Self::Error>
    {
        let mut conn = self.reader.acquire().await?;
        let timeline = fetch_timeline(&mut *conn, product_ids).await?;
        Ok(find_conflicting_entry(product_ids, start, end, exclude, &timeline).cloned())
    }

    async fn get_bundle(
        &self,
        bundle_id: Self::BundleId,
    ) -> Result<Option<HydratedBundle<Self::BundleId, Self::ProductId, Self::DateTime>>, Self::Error>
    {
        let mut conn = self.reader.acquire().await?;

        let row: Option<BundleRow> = sqlx::query_as(
            r#"
            select
                id, name, description, start_time, end_time, created_at, updated_at
            from
                bundle
            where
                id = $1
            "#,
        )
        .bind(bundle_id)
        .fetch_optional(&mut *conn)
        .await?;

        match row {
            Some(row) => {
                let items = hydrate_items(&mut *conn, row.id).await?;
                Ok(Some(hydrate(row, items)))
            }
            None => Ok(None),
        }
    }

    async fn list_bundles(
        &self,
    ) -> Result<Vec<HydratedBundle<Self::BundleId, Self::ProductId, Self::DateTime>>, Self::Error>
    {
        let mut conn = self.reader.acquire().await?;

        let rows: Vec<BundleRow> = sqlx::query_as(
            r#"
            select
                id, name, description, start_time, end_time, created_at, updated_at
            from
                bundle
            order by
                start_time
            "#,
        )
        .fetch_all(&mut *conn)
        .await?;

        let mut bundles = Vec::with_capacity(rows.len());
        for row in rows {
            let items = hydrate_items(&mut *conn, row.id).await?;
            bundles.push(hydrate(row, items));
        }
        Ok(bundles)
    }
}
