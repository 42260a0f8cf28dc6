//! Trait seams between the gateway and its backends.

pub mod store;
