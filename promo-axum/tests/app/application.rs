use super::Permissions;
use headers::{Authorization, authorization::Bearer};
use promo_core::{
    models::{BundleData, ProductData},
    ports::Application,
};
use promo_sqlite::{
    Db,
    types::{BundleId, DateTime, ProductId},
};

#[derive(Clone)]
pub struct TestApp(pub Db);

impl TestApp {
    /// Parse the plain-text permission declaration from the bearer token.
    fn permissions(&self, context: &Authorization<Bearer>) -> Option<Permissions> {
        context.0.token().parse().ok()
    }
}

impl Application for TestApp {
    // We stuff plain-text declarations of the permissions in the token
    type Context = Authorization<Bearer>;

    type Repository = Db;

    fn database(&self) -> &Self::Repository {
        &self.0
    }

    fn now(&self) -> DateTime {
        time::OffsetDateTime::now_utc().into()
    }

    fn generate_product_id(&self, _data: &ProductData) -> ProductId {
        uuid::Uuid::new_v4().into()
    }

    fn generate_bundle_id(&self, _data: &BundleData<ProductId, DateTime>) -> BundleId {
        uuid::Uuid::new_v4().into()
    }

    async fn can_view_catalog(&self, context: &Self::Context) -> bool {
        self.permissions(context).is_some_and(|p| p.view)
    }

    async fn can_manage_catalog(&self, context: &Self::Context) -> bool {
        self.permissions(context).is_some_and(|p| p.manage)
    }

    async fn can_view_bundles(&self, context: &Self::Context) -> bool {
        self.permissions(context).is_some_and(|p| p.view)
    }

    async fn can_manage_bundles(&self, context: &Self::Context) -> bool {
        self.permissions(context).is_some_and(|p| p.manage)
    }
}
