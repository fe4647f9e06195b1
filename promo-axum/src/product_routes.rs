//! REST API endpoints for catalog operations.
//!
//! This module provides the read surface of the product catalog plus the
//! administrative insertion of new products. Products are immutable once
//! created; the promotional machinery only resolves and lists them.

use crate::ApiApplication;
use aide::axum::{
    ApiRouter,
    routing::{get, post},
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use axum_extra::TypedHeader;
use headers::{Authorization, authorization::Bearer};
use promo_core::{
    models::{ProductData, ProductRecord},
    ports::{CatalogRepository as _, Repository},
};
use tracing::{Level, event};

/// Path parameter for product-specific endpoints.
#[derive(serde::Deserialize, schemars::JsonSchema)]
#[schemars(inline)]
struct Id<T> {
    /// The unique identifier of the product
    product_id: T,
}

/// Creates a router with catalog-related endpoints.
pub fn router<T: ApiApplication>() -> ApiRouter<T> {
    ApiRouter::new()
        .api_route_with(
            "/",
            post(create_product::<T>).get(list_products::<T>),
            |route| route.security_requirement("jwt").tag("catalog"),
        )
        .api_route_with("/{product_id}", get(get_product::<T>), |route| {
            route.security_requirement("jwt").tag("catalog")
        })
}

/// Add a product to the catalog.
///
/// # Authorization
///
/// Requires catalog management permission.
///
/// # Returns
///
/// - `201 Created`: Product created successfully, returns the stored record
/// - `400 Bad Request`: The product data is invalid (negative base price)
/// - `401 Unauthorized`: Missing management permissions
/// - `500 Internal Server Error`: Database operation failed
async fn create_product<T: ApiApplication>(
    State(app): State<T>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Json(data): Json<ProductData>,
) -> Result<
    (
        StatusCode,
        Json<ProductRecord<<T::Repository as Repository>::ProductId>>,
    ),
    (StatusCode, String),
> {
    if !app.can_manage_catalog(&auth).await {
        return Err((StatusCode::UNAUTHORIZED, "not authorized".to_string()));
    }

    if let Err(invalid) = data.validate() {
        return Err((StatusCode::BAD_REQUEST, invalid.to_string()));
    }

    let as_of = app.now();
    let product_id = app.generate_product_id(&data);

    app.database()
        .create_product(product_id, data, as_of)
        .await
        .map(|record| (StatusCode::CREATED, Json(record)))
        .map_err(|err| {
            event!(Level::ERROR, err = err.to_string());
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "failed to create product".to_string(),
            )
        })
}

/// List the whole catalog.
///
/// # Authorization
///
/// Requires catalog view permission.
///
/// # Returns
///
/// - `200 OK`: Product records
/// - `401 Unauthorized`: Missing view permissions
/// - `500 Internal Server Error`: Database query failed
async fn list_products<T: ApiApplication>(
    State(app): State<T>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Vec<ProductRecord<<T::Repository as Repository>::ProductId>>>, (StatusCode, String)>
{
    if !app.can_view_catalog(&auth).await {
        return Err((StatusCode::UNAUTHORIZED, "not authorized".to_string()));
    }

    app.database()
        .list_products()
        .await
        .map(Json)
        .map_err(|err| {
            event!(Level::ERROR, err = err.to_string());
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "failed to list products".to_string(),
            )
        })
}

/// Retrieve a single product.
///
/// # Authorization
///
/// Requires catalog view permission.
///
/// # Returns
///
/// - `200 OK`: The product record
/// - `401 Unauthorized`: Missing view permissions
/// - `404 Not Found`: Product does not exist
/// - `500 Internal Server Error`: Database query failed
async fn get_product<T: ApiApplication>(
    State(app): State<T>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(Id { product_id }): Path<Id<<T::Repository as Repository>::ProductId>>,
) -> Result<Json<ProductRecord<<T::Repository as Repository>::ProductId>>, (StatusCode, String)> {
    if !app.can_view_catalog(&auth).await {
        return Err((StatusCode::UNAUTHORIZED, "not authorized".to_string()));
    }

    let record = app
        .database()
        .get_product(product_id.clone())
        .await
        .map_err(|err| {
            event!(Level::ERROR, err = err.to_string());
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("failed to get product {}", product_id),
            )
        })?
        .ok_or((
            StatusCode::NOT_FOUND,
            format!("unknown product {}", product_id),
        ))?;
    Ok(Json(record))
}
