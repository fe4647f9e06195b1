//! Repository trait implementations for the SQLite database.
//!
//! This module contains the implementations of the repository traits defined in
//! `promo-core` for the SQLite database backend.

use crate::{
    Db,
    types::{BundleId, DateTime, ProductId},
};
use promo_core::ports::Repository;

mod bundle;
mod catalog;

impl Repository for Db {
    type Error = sqlx::Error;
    type DateTime = DateTime;
    type ProductId = ProductId;
    type BundleId = BundleId;
}
