//! # ShopDesk Gateway
//!
//! Axum HTTP API over the document store: product CRUD, price statistics
//! and the two FAQ endpoints (`ask`, `chat`), each with its own matching policy.

pub mod error;
pub mod extract;
pub mod routes;
pub mod server;
pub mod stats;

pub use error::ApiError;
pub use extract::ApiJson;
pub use server::{AppState, build_router, start};
