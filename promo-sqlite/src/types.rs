//! Type definitions for the SQLite implementation.
//!
//! This module contains both public types used throughout the crate and internal
//! types used for database row mapping. The public types include strongly-typed
//! IDs and datetime representations that ensure type safety across the system.

use promo_core::models::{ProductData, ProductRecord, PromotionRule};

mod datetime;
pub use datetime::DateTime;

mod ids;
pub use ids::{BundleId, ProductId};

#[derive(sqlx::FromRow)]
pub(crate) struct ProductRow {
    pub id: ProductId,
    pub name: String,
    pub base_price: f64,
    pub category: Option<String>,
    pub image: Option<String>,
}

impl From<ProductRow> for ProductRecord<ProductId> {
    fn from(row: ProductRow) -> Self {
        ProductRecord {
            id: row.id,
            data: ProductData {
                name: row.name,
                base_price: row.base_price,
                category: row.category,
                image: row.image,
            },
        }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct BundleRow {
    pub id: BundleId,
    pub name: String,
    pub description: Option<String>,
    pub start_time: DateTime,
    pub end_time: DateTime,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

/// One bundle_item row joined with its product's display name, as the
/// timeline scan reads it.
#[derive(sqlx::FromRow)]
pub(crate) struct TimelineItemRow {
    pub product_id: ProductId,
    pub name: String,
}

/// One bundle_item row joined with the full product, as hydrated reads use.
#[derive(sqlx::FromRow)]
pub(crate) struct HydratedItemRow {
    pub product_id: ProductId,
    pub name: String,
    pub base_price: f64,
    pub category: Option<String>,
    pub image: Option<String>,
    pub rule: sqlx::types::Json<PromotionRule>,
}
