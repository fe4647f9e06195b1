//! REST API endpoints for promotional bundle operations.
//!
//! This module provides CRUD operations for bundles plus a read-only overlap
//! probe. Every write runs the overlap validation: a product may not be
//! promoted by two bundles whose time windows intersect, and the error
//! payload names the conflicting bundle and products when it happens.

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
    models::{BundleData, BundleDisplay, BundleRecord, find_conflict},
    ports::{BundleFailure, BundleRepository as _, Repository},
};
use tracing::{Level, event};

/// Path parameter for bundle-specific endpoints.
#[derive(serde::Deserialize, schemars::JsonSchema)]
#[schemars(inline)]
struct Id<T> {
    /// The unique identifier of the bundle
    bundle_id: T,
}

/// Creates a router with bundle-related endpoints.
pub fn router<T: ApiApplication>() -> ApiRouter<T> {
    ApiRouter::new()
        .api_route_with(
            "/",
            post(create_bundle::<T>).get(list_bundles::<T>),
            |route| route.security_requirement("jwt").tag("bundle"),
        )
        .api_route_with(
            "/{bundle_id}",
            get(get_bundle::<T>).put(update_bundle::<T>),
            |route| route.security_requirement("jwt").tag("bundle"),
        )
        .api_route_with("/check", post(check_bundle::<T>), |route| {
            route.security_requirement("jwt").tag("timeline")
        })
}

/// Map a domain failure to its response: structural problems are the
/// caller's input (400), timeline collisions are a conflict (409). The body
/// is the failure's display message in both cases.
fn failure_response(failure: BundleFailure) -> (StatusCode, String) {
    let status = match &failure {
        BundleFailure::Invalid(_) => StatusCode::BAD_REQUEST,
        BundleFailure::Conflict(_) => StatusCode::CONFLICT,
    };
    (status, failure.to_string())
}

/// Create a new promotional bundle.
///
/// The bundle is validated before anything is persisted: it must promote at
/// least one product, end after it starts, not repeat a product, and not
/// promote any product already promoted by another bundle in an
/// intersecting window.
///
/// # Authorization
///
/// Requires bundle management permission.
///
/// # Returns
///
/// - `201 Created`: The persisted record, with system-assigned timestamps
/// - `400 Bad Request`: The definition violated a structural invariant
/// - `401 Unauthorized`: Missing management permissions
/// - `409 Conflict`: An existing bundle already promotes one of the products
///   in an intersecting window; the message names both
/// - `500 Internal Server Error`: Database operation failed
async fn create_bundle<T: ApiApplication>(
    State(app): State<T>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Json(data): Json<
        BundleData<
            <T::Repository as Repository>::ProductId,
            <T::Repository as Repository>::DateTime,
        >,
    >,
) -> Result<
    (
        StatusCode,
        Json<
            BundleRecord<
                <T::Repository as Repository>::BundleId,
                <T::Repository as Repository>::ProductId,
                <T::Repository as Repository>::DateTime,
            >,
        >,
    ),
    (StatusCode, String),
> {
    if !app.can_manage_bundles(&auth).await {
        return Err((StatusCode::UNAUTHORIZED, "not authorized".to_string()));
    }

    let as_of = app.now();
    let bundle_id = app.generate_bundle_id(&data);

    match app.database().create_bundle(bundle_id, data, as_of).await {
        Ok(Ok(record)) => Ok((StatusCode::CREATED, Json(record))),
        Ok(Err(failure)) => Err(failure_response(failure)),
        Err(err) => {
            event!(Level::ERROR, err = err.to_string());
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                "failed to create bundle".to_string(),
            ))
        }
    }
}

/// Replace an existing bundle's definition.
///
/// Runs exactly the same validation as creation, except the targeted bundle
/// is excluded from the overlap check so it never conflicts with itself.
///
/// # Authorization
///
/// Requires bundle management permission.
///
/// # Returns
///
/// - `200 OK`: The updated record; `created_at` is preserved
/// - `400 Bad Request`: The definition violated a structural invariant
/// - `401 Unauthorized`: Missing management permissions
/// - `404 Not Found`: No bundle with that id exists
/// - `409 Conflict`: Another bundle already promotes one of the products in
///   an intersecting window
/// - `500 Internal Server Error`: Database operation failed
async fn update_bundle<T: ApiApplication>(
    State(app): State<T>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(Id { bundle_id }): Path<Id<<T::Repository as Repository>::BundleId>>,
    Json(data): Json<
        BundleData<
            <T::Repository as Repository>::ProductId,
            <T::Repository as Repository>::DateTime,
        >,
    >,
) -> Result<
    Json<
        BundleRecord<
            <T::Repository as Repository>::BundleId,
            <T::Repository as Repository>::ProductId,
            <T::Repository as Repository>::DateTime,
        >,
    >,
    (StatusCode, String),
> {
    if !app.can_manage_bundles(&auth).await {
        return Err((StatusCode::UNAUTHORIZED, "not authorized".to_string()));
    }

    let as_of = app.now();

    match app
        .database()
        .update_bundle(bundle_id.clone(), data, as_of)
        .await
    {
        Ok(Ok(Some(record))) => Ok(Json(record)),
        Ok(Ok(None)) => Err((
            StatusCode::NOT_FOUND,
            format!("unknown bundle {}", bundle_id),
        )),
        Ok(Err(failure)) => Err(failure_response(failure)),
        Err(err) => {
            event!(Level::ERROR, err = err.to_string());
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("failed to update bundle {}", bundle_id),
            ))
        }
    }
}

/// List every bundle, enriched for display.
///
/// Each bundle comes back with its products resolved, per-item promotional
/// prices, the pricing summary, and the status derived from the current
/// clock (`scheduled`, `active` or `finished`; computed, never stored).
///
/// # Authorization
///
/// Requires bundle view permission.
///
/// # Returns
///
/// - `200 OK`: The enriched bundles, ordered by window start
/// - `401 Unauthorized`: Missing view permissions
/// - `500 Internal Server Error`: Database query failed
async fn list_bundles<T: ApiApplication>(
    State(app): State<T>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<
    Json<
        Vec<
            BundleDisplay<
                <T::Repository as Repository>::BundleId,
                <T::Repository as Repository>::ProductId,
                <T::Repository as Repository>::DateTime,
            >,
        >,
    >,
    (StatusCode, String),
> {
    if !app.can_view_bundles(&auth).await {
        return Err((StatusCode::UNAUTHORIZED, "not authorized".to_string()));
    }

    let now = app.now();
    let bundles = app.database().list_bundles().await.map_err(|err| {
        event!(Level::ERROR, err = err.to_string());
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "failed to list bundles".to_string(),
        )
    })?;

    Ok(Json(
        bundles
            .into_iter()
            .map(|bundle| bundle.into_display(&now))
            .collect(),
    ))
}

/// Retrieve a single bundle, enriched for display.
///
/// # Authorization
///
/// Requires bundle view permission.
///
/// # Returns
///
/// - `200 OK`: The enriched bundle
/// - `401 Unauthorized`: Missing view permissions
/// - `404 Not Found`: No bundle with that id exists
/// - `500 Internal Server Error`: Database query failed
async fn get_bundle<T: ApiApplication>(
    State(app): State<T>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(Id { bundle_id }): Path<Id<<T::Repository as Repository>::BundleId>>,
) -> Result<
    Json<
        BundleDisplay<
            <T::Repository as Repository>::BundleId,
            <T::Repository as Repository>::ProductId,
            <T::Repository as Repository>::DateTime,
        >,
    >,
    (StatusCode, String),
> {
    if !app.can_view_bundles(&auth).await {
        return Err((StatusCode::UNAUTHORIZED, "not authorized".to_string()));
    }

    let now = app.now();
    let bundle = app
        .database()
        .get_bundle(bundle_id.clone())
        .await
        .map_err(|err| {
            event!(Level::ERROR, err = err.to_string());
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("failed to get bundle {}", bundle_id),
            )
        })?
        .ok_or((
            StatusCode::NOT_FOUND,
            format!("unknown bundle {}", bundle_id),
        ))?;

    Ok(Json(bundle.into_display(&now)))
}

/// Request body for the overlap pre-check.
#[derive(serde::Deserialize, schemars::JsonSchema)]
#[schemars(inline)]
struct CheckRequest<P, D, B> {
    /// The candidate definition to test against the timeline
    bundle: BundleData<P, D>,
    /// A bundle to exclude from the check (the one being edited, if any)
    exclude: Option<B>,
}

/// Response body for the overlap pre-check.
#[derive(serde::Serialize, schemars::JsonSchema)]
#[schemars(inline)]
struct CheckResponse {
    /// The conflict message a submission would fail with, if any
    conflict: Option<String>,
}

/// Probe the timeline for a candidate bundle without persisting anything.
///
/// Intended for UI-side validation before submitting: returns the same
/// conflict message a create or update would fail with, or nothing if the
/// candidate is clear.
///
/// # Authorization
///
/// Requires bundle view permission.
///
/// # Returns
///
/// - `200 OK`: The probe result
/// - `400 Bad Request`: The candidate violated a structural invariant
/// - `401 Unauthorized`: Missing view permissions
/// - `500 Internal Server Error`: Database query failed
async fn check_bundle<T: ApiApplication>(
    State(app): State<T>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Json(request): Json<
        CheckRequest<
            <T::Repository as Repository>::ProductId,
            <T::Repository as Repository>::DateTime,
            <T::Repository as Repository>::BundleId,
        >,
    >,
) -> Result<Json<CheckResponse>, (StatusCode, String)> {
    if !app.can_view_bundles(&auth).await {
        return Err((StatusCode::UNAUTHORIZED, "not authorized".to_string()));
    }

    let candidate = request.bundle;
    if let Err(invalid) = candidate.validate() {
        return Err((StatusCode::BAD_REQUEST, invalid.to_string()));
    }

    let products: Vec<_> = candidate.product_ids().cloned().collect();
    let timeline = app
        .database()
        .find_overlapping(
            &products,
            &candidate.start,
            &candidate.end,
            request.exclude.as_ref(),
        )
        .await
        .map_err(|err| {
            event!(Level::ERROR, err = err.to_string());
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "failed to probe the timeline".to_string(),
            )
        })?
        .into_iter()
        .collect::<Vec<_>>();

    let conflict = find_conflict(&candidate, request.exclude.as_ref(), &timeline);
    Ok(Json(CheckResponse {
        conflict: conflict.map(|c| c.to_string()),
    }))
}
