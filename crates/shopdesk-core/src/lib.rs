//! # ShopDesk Core
//!
//! Shared building blocks for the ShopDesk workspace: configuration,
//! the error type, catalog/FAQ domain types and the document store trait
//! every backend implements.

pub mod config;
pub mod error;
pub mod traits;
pub mod types;

pub use config::ShopDeskConfig;
pub use error::{Result, ShopDeskError};
pub use traits::store::{Document, DocumentStore};
pub use types::{Answer, FaqEntry, FaqRecord, Product};
