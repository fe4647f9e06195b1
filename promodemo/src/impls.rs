//! Application implementation with JWT-based authorization.
//!
//! This module provides the concrete implementation of the Application trait,
//! integrating the SQLite repository with JWT-based authorization: any valid
//! token may read the catalog and the bundles, while writing requires an
//! `admin: true` custom claim.

use headers::{Authorization, authorization::Bearer};
use jwt_simple::{
    claims::JWTClaims,
    prelude::{HS256Key, MACLike},
};
use promo_core::{
    models::{BundleData, ProductData},
    ports::Application,
};
use promo_sqlite::{
    Db,
    types::{BundleId, DateTime, ProductId},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The custom claims carried by admin-panel tokens.
#[derive(Serialize, Deserialize)]
pub struct AdminClaims {
    /// Whether the token holder may manage the catalog and the bundles
    #[serde(default)]
    pub admin: bool,
}

/// Main application implementation combining all system components.
///
/// This struct implements the Application trait and provides the integration
/// point for the database, authorization, and business logic. It uses JWT
/// tokens for authorization decisions.
#[derive(Clone)]
pub struct AdminApp {
    /// Database connection for persistent storage
    pub db: Db,
    /// HMAC key for JWT token verification
    pub key: HS256Key,
}

impl AdminApp {
    /// Extract and verify JWT claims from the authorization header.
    fn claims(&self, context: &Authorization<Bearer>) -> Option<JWTClaims<AdminClaims>> {
        let token = context.0.token();
        self.key.verify_token::<AdminClaims>(token, None).ok()
    }
}

impl Application for AdminApp {
    type Context = Authorization<Bearer>;
    type Repository = Db;

    fn database(&self) -> &Self::Repository {
        &self.db
    }

    fn now(&self) -> DateTime {
        time::OffsetDateTime::now_utc().into()
    }

    fn generate_product_id(&self, _data: &ProductData) -> ProductId {
        Uuid::new_v4().into()
    }

    fn generate_bundle_id(&self, _data: &BundleData<ProductId, DateTime>) -> BundleId {
        Uuid::new_v4().into()
    }

    async fn can_view_catalog(&self, context: &Self::Context) -> bool {
        self.claims(context).is_some()
    }

    async fn can_manage_catalog(&self, context: &Self::Context) -> bool {
        self.claims(context).is_some_and(|claims| claims.custom.admin)
    }

    async fn can_view_bundles(&self, context: &Self::Context) -> bool {
        self.claims(context).is_some()
    }

    async fn can_manage_bundles(&self, context: &Self::Context) -> bool {
        self.claims(context).is_some_and(|claims| claims.custom.admin)
    }
}
