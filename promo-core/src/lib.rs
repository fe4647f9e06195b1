#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

/// Core domain models for the promotional bundle service.
///
/// This module contains the fundamental data structures that represent the domain entities.
///
/// The models in this module are primarily data structures with minimal business logic,
/// following the principles of the hexagonal architecture to separate domain entities
/// from their persistence and processing implementations. The two exceptions are the
/// timeline module (the overlap-validation engine) and the pricing module (promotional
/// price computation), which hold the only non-trivial logic in the system and are kept
/// here, storage-independent, so they can be tested without an adapter.
pub mod models;

/// Interface traits for the promotional bundle service.
///
/// This module contains the "ports" in the hexagonal architecture pattern.
///
/// These traits define the contract between the domain logic and external adapters
/// (such as databases, APIs, or other services) without specifying implementation details.
/// This separation allows for easier testing and the ability to swap out infrastructure
/// components without affecting the core business logic.
pub mod ports;
