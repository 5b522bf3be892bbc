//! REST client for the grocery items API.
//!
//! - `transport`: JSON request/response contract over a pluggable backend
//! - `error`: failure taxonomy and error body classification
//! - `items`: one typed call per endpoint
//! - `types`: wire types

pub mod error;
pub mod items;
pub mod transport;
pub mod types;

pub use error::{ApiError, FieldErrors};
pub use items::ItemsApi;
pub use transport::{HttpBackend, ReqwestBackend, Transport};
pub use types::{Category, Item, ItemId, ItemPatch, NewItem};

#[cfg(test)]
pub use transport::testing;
