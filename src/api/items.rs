//! Typed wrappers for the grocery items endpoints.

use reqwest::Method;

use super::transport::{HttpBackend, RequestOptions, Transport};
use super::types::{Deleted, Item, ItemId, ItemPatch, NewItem, PurchasedBody, Updated};
use super::ApiError;

/// Client for the grocery items resource.
/// One attempt per call, no retries.
#[derive(Clone)]
pub struct ItemsApi<B> {
  transport: Transport<B>,
  base_path: String,
}

impl<B: HttpBackend> ItemsApi<B> {
  /// `base_path` is the collection path, e.g. `/api/grocery-items`
  pub fn new(transport: Transport<B>, base_path: &str) -> Self {
    Self {
      transport,
      base_path: base_path.trim_end_matches('/').to_string(),
    }
  }

  fn collection(&self) -> String {
    format!("{}/", self.base_path)
  }

  fn member(&self, id: ItemId) -> String {
    format!("{}/{}/", self.base_path, id)
  }

  /// GET base/
  pub async fn list(&self) -> Result<Vec<Item>, ApiError> {
    self
      .transport
      .request(&self.collection(), RequestOptions::default())
      .await
  }

  /// POST base/
  pub async fn create(&self, item: &NewItem) -> Result<Item, ApiError> {
    let options = RequestOptions::method(Method::POST).json(item)?;
    self.transport.request(&self.collection(), options).await
  }

  /// PATCH base/{id}/
  pub async fn update(&self, id: ItemId, patch: &ItemPatch) -> Result<Item, ApiError> {
    let options = RequestOptions::method(Method::PATCH).json(patch)?;
    self.transport.request(&self.member(id), options).await
  }

  /// DELETE base/{id}/
  pub async fn delete(&self, id: ItemId) -> Result<(), ApiError> {
    self
      .transport
      .request(&self.member(id), RequestOptions::method(Method::DELETE))
      .await
  }

  /// DELETE base/
  pub async fn delete_all(&self) -> Result<Deleted, ApiError> {
    self
      .transport
      .request(&self.collection(), RequestOptions::method(Method::DELETE))
      .await
  }

  /// PATCH base/update-purchased/
  pub async fn bulk_set_purchased(&self, purchased: bool) -> Result<Updated, ApiError> {
    let options = RequestOptions::method(Method::PATCH).json(&PurchasedBody { purchased })?;
    self
      .transport
      .request(&format!("{}/update-purchased/", self.base_path), options)
      .await
  }
}
