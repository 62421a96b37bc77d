//! Foundation crate for ODI market segmentation.
//!
//! Identifiers and the wide response table, the schema/key registry, fitted
//! models, configuration records and the rules loader, one error enum per
//! subsystem, cooperative cancellation, and tracing setup.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod schema;
pub mod traits;
pub mod tracing;
pub mod types;
