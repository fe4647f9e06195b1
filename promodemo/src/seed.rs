//! Demo-catalog seeding for local development.
//!
//! Populates an empty database with a handful of products and two sample
//! bundles (one currently active, one already finished) so the API has
//! something to show right after startup. Seeding goes through the same
//! repository ports as the API, so the overlap validation applies to the
//! samples too.

use crate::impls::AdminApp;
use promo_core::{
    models::{BundleData, BundleItem, ProductData, PromotionRule},
    ports::{Application, BundleRepository as _, CatalogRepository as _},
};
use promo_sqlite::types::ProductId;
use time::{Duration, OffsetDateTime};

/// Populate an empty database with the demo catalog and sample bundles.
///
/// Skips silently when the catalog already has products, so it is safe to
/// pass `--seed` on every start.
pub async fn seed_demo_data(app: &AdminApp) -> anyhow::Result<()> {
    let db = app.database();

    if !db.list_products().await?.is_empty() {
        tracing::info!("catalog already populated, skipping demo seed");
        return Ok(());
    }

    let products = [
        (
            "Laptop Dell Inspiron 15",
            749.99,
            "https://images.unsplash.com/photo-1588872657578-7efd1f1555ed?w=400&q=80",
        ),
        (
            "Monitor LG 27\" 4K",
            399.99,
            "https://images.unsplash.com/photo-1527443224154-c4a3942d3acf?w=400&q=80",
        ),
        (
            "Tablet iPad Air",
            599.99,
            "https://images.unsplash.com/photo-1544244015-0df4b3ffc6b0?w=400&q=80",
        ),
        (
            "Auriculares Sony WH-1000XM5",
            349.99,
            "https://images.unsplash.com/photo-1505740420928-5e560c06d30e?w=400&q=80",
        ),
    ];

    let now = OffsetDateTime::now_utc();
    let mut product_ids: Vec<ProductId> = Vec::with_capacity(products.len());
    for (name, base_price, image) in products {
        let data = ProductData {
            name: name.to_owned(),
            base_price,
            category: None,
            image: Some(image.to_owned()),
        };
        let product_id = app.generate_product_id(&data);
        db.create_product(product_id, data, now.into()).await?;
        product_ids.push(product_id);
    }
    tracing::info!(count = product_ids.len(), "seeded demo catalog");

    let bundles = [
        BundleData {
            name: "Black Friday".to_owned(),
            description: Some("Descuentos especiales para Black Friday".to_owned()),
            items: product_ids[..3]
                .iter()
                .map(|product_id| BundleItem {
                    product_id: *product_id,
                    rule: PromotionRule::Percentage { percent: 15.0 },
                })
                .collect(),
            start: now.into(),
            end: (now + Duration::days(7)).into(),
        },
        BundleData {
            name: "Semana de Audio".to_owned(),
            description: Some("Promoción pasada de auriculares".to_owned()),
            items: vec![BundleItem {
                product_id: product_ids[3],
                rule: PromotionRule::Fixed { amount: 50.0 },
            }],
            start: (now - Duration::days(10)).into(),
            end: (now - Duration::days(3)).into(),
        },
    ];

    for data in bundles {
        let name = data.name.clone();
        let bundle_id = app.generate_bundle_id(&data);
        match db.create_bundle(bundle_id, data, now.into()).await? {
            Ok(_) => tracing::info!(bundle = %name, "seeded demo bundle"),
            Err(failure) => tracing::warn!(bundle = %name, %failure, "demo bundle rejected"),
        }
    }

    Ok(())
}
