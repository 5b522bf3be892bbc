//! Async query abstraction for the item collection.
//!
//! Inspired by TanStack Query, `Query<T>` owns the fetch lifecycle
//! (`Idle -> Loading -> Success | Error`) and the last fetched data.
//! Data survives a refetch and a failed refetch, and can be rewritten in
//! place with `set_data` after a mutation instead of fetching again.
//!
//! # Example
//!
//! ```ignore
//! let api = items_api.clone();
//! let mut query = Query::new(move || {
//!     let api = api.clone();
//!     async move { api.list().await }
//! });
//!
//! query.fetch();
//!
//! // In event loop tick
//! if query.poll() {
//!     // State changed, trigger re-render
//! }
//! ```

use chrono::{DateTime, Duration, Utc};
use futures::future::BoxFuture;
use std::future::Future;
use tokio::sync::mpsc;

use crate::api::ApiError;

/// Where a query is in its fetch lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
  /// Query has not been started
  Idle,
  /// A fetch is in flight
  Loading,
  /// The last fetch succeeded, or data was set directly
  Success,
  /// The last fetch failed
  Error,
}

/// A factory function that creates futures for fetching data
type FetcherFn<T> = Box<dyn Fn() -> BoxFuture<'static, Result<T, ApiError>> + Send + Sync>;

pub struct Query<T> {
  status: QueryStatus,
  data: Option<T>,
  error: Option<ApiError>,
  fetcher: FetcherFn<T>,
  receiver: Option<mpsc::UnboundedReceiver<Result<T, ApiError>>>,
  fetched_at: Option<DateTime<Utc>>,
  stale_time: Duration,
}

impl<T: Send + 'static> Query<T> {
  /// Create a new query with the given fetcher function.
  ///
  /// The fetcher is called each time `fetch()` or `refetch()` starts a request.
  pub fn new<F, Fut>(fetcher: F) -> Self
  where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
  {
    Self {
      status: QueryStatus::Idle,
      data: None,
      error: None,
      fetcher: Box::new(move || Box::pin(fetcher())),
      receiver: None,
      fetched_at: None,
      stale_time: Duration::minutes(1),
    }
  }

  /// After this duration successful data reports `is_stale()`.
  pub fn with_stale_time(mut self, stale_time: Duration) -> Self {
    self.stale_time = stale_time;
    self
  }

  pub fn status(&self) -> QueryStatus {
    self.status
  }

  /// Last known data. Kept while refetching and after a failed refetch.
  pub fn data(&self) -> Option<&T> {
    self.data.as_ref()
  }

  /// The error from the last fetch, if it failed
  pub fn error(&self) -> Option<&ApiError> {
    self.error.as_ref()
  }

  pub fn is_loading(&self) -> bool {
    self.status == QueryStatus::Loading
  }

  /// When data was last written, by a fetch or by `set_data`
  pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
    self.fetched_at
  }

  /// Check if the data is older than the stale time.
  pub fn is_stale(&self) -> bool {
    match self.status {
      QueryStatus::Success => self
        .fetched_at
        .map(|t| Utc::now() - t > self.stale_time)
        .unwrap_or(true),
      _ => false,
    }
  }

  /// Start fetching unless a fetch is already in flight.
  pub fn fetch(&mut self) {
    if self.is_loading() {
      return;
    }
    self.start_fetch();
  }

  /// Force a new fetch. The result of any pending fetch is dropped.
  pub fn refetch(&mut self) {
    self.receiver = None;
    self.start_fetch();
  }

  /// Poll for results from a pending fetch.
  ///
  /// Returns `true` if the state changed. Call this from the event loop tick.
  pub fn poll(&mut self) -> bool {
    let Some(receiver) = &mut self.receiver else {
      return false;
    };

    match receiver.try_recv() {
      Ok(result) => {
        self.settle(result);
        true
      }
      Err(mpsc::error::TryRecvError::Empty) => false,
      Err(mpsc::error::TryRecvError::Disconnected) => {
        self.settle(Err(ApiError::Network("Query was cancelled".to_string())));
        true
      }
    }
  }

  /// Wait for the pending fetch to finish. Returns `false` if nothing was pending.
  pub async fn wait(&mut self) -> bool {
    let Some(receiver) = &mut self.receiver else {
      return false;
    };

    let result = receiver
      .recv()
      .await
      .unwrap_or_else(|| Err(ApiError::Network("Query was cancelled".to_string())));
    self.settle(result);
    true
  }

  /// Rewrite the data in place. A query without data starts from `T::default()`.
  ///
  /// Marks the query successful and clears its error. A fetch in flight is
  /// left running and will overwrite the data when it lands.
  pub fn set_data(&mut self, update: impl FnOnce(T) -> T)
  where
    T: Default,
  {
    let old = self.data.take().unwrap_or_default();
    self.data = Some(update(old));
    self.error = None;
    self.fetched_at = Some(Utc::now());
    if !self.is_loading() {
      self.status = QueryStatus::Success;
    }
  }

  fn settle(&mut self, result: Result<T, ApiError>) {
    self.receiver = None;
    match result {
      Ok(data) => {
        self.data = Some(data);
        self.error = None;
        self.status = QueryStatus::Success;
        self.fetched_at = Some(Utc::now());
      }
      Err(error) => {
        self.error = Some(error);
        self.status = QueryStatus::Error;
      }
    }
  }

  fn start_fetch(&mut self) {
    let (tx, rx) = mpsc::unbounded_channel();
    self.receiver = Some(rx);
    self.status = QueryStatus::Loading;

    let future = (self.fetcher)();
    tokio::spawn(async move {
      // Receiver may have been dropped by a refetch
      let _ = tx.send(future.await);
    });
  }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Query<T> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Query")
      .field("status", &self.status)
      .field("data", &self.data)
      .field("error", &self.error)
      .field("fetched_at", &self.fetched_at)
      .finish_non_exhaustive()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::sync::atomic::{AtomicU32, Ordering};
  use std::sync::Arc;

  #[tokio::test]
  async fn test_query_success() {
    let mut query = Query::new(|| async { Ok(vec![1, 2, 3]) });

    assert_eq!(query.status(), QueryStatus::Idle);

    query.fetch();
    assert!(query.is_loading());

    assert!(query.wait().await);
    assert_eq!(query.status(), QueryStatus::Success);
    assert_eq!(query.data(), Some(&vec![1, 2, 3]));
  }

  #[tokio::test]
  async fn test_query_error_keeps_previous_data() {
    let calls = Arc::new(AtomicU32::new(0));
    let calls_clone = calls.clone();
    let mut query = Query::new(move || {
      let calls = calls_clone.clone();
      async move {
        if calls.fetch_add(1, Ordering::SeqCst) == 0 {
          Ok(7)
        } else {
          Err(ApiError::Network("down".to_string()))
        }
      }
    });

    query.fetch();
    query.wait().await;
    query.refetch();
    query.wait().await;

    assert_eq!(query.status(), QueryStatus::Error);
    assert_eq!(query.error(), Some(&ApiError::Network("down".to_string())));
    assert_eq!(query.data(), Some(&7));
  }

  #[tokio::test]
  async fn test_poll_picks_up_result() {
    let mut query = Query::new(|| async { Ok(42) });

    query.fetch();
    tokio::time::sleep(std::time::Duration::from_millis(10)).await;

    assert!(query.poll());
    assert_eq!(query.data(), Some(&42));
    assert!(!query.poll());
  }

  #[tokio::test]
  async fn test_query_stale() {
    let mut query = Query::new(|| async { Ok(42) }).with_stale_time(Duration::zero());

    query.fetch();
    query.wait().await;
    tokio::time::sleep(std::time::Duration::from_millis(2)).await;

    assert!(query.is_stale());
  }

  #[tokio::test]
  async fn test_fetch_while_loading_is_noop() {
    let calls = Arc::new(AtomicU32::new(0));
    let calls_clone = calls.clone();
    let mut query = Query::new(move || {
      let calls = calls_clone.clone();
      async move {
        calls.fetch_add(1, Ordering::SeqCst);
        Ok(1)
      }
    });

    query.fetch();
    query.fetch();
    query.wait().await;

    assert_eq!(calls.load(Ordering::SeqCst), 1);
  }

  #[tokio::test]
  async fn test_refetch_drops_pending_result() {
    let counter = Arc::new(AtomicU32::new(0));
    let counter_clone = counter.clone();

    let mut query = Query::new(move || {
      let counter = counter_clone.clone();
      async move {
        let n = counter.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        Ok(n)
      }
    });

    query.fetch();
    query.refetch();
    query.wait().await;

    assert_eq!(query.data(), Some(&1));
  }

  #[tokio::test]
  async fn test_set_data_on_empty_query() {
    let mut query: Query<Vec<u32>> = Query::new(|| async { Ok(Vec::new()) });

    query.set_data(|mut v| {
      v.push(5);
      v
    });

    assert_eq!(query.status(), QueryStatus::Success);
    assert_eq!(query.data(), Some(&vec![5]));
  }

  #[tokio::test]
  async fn test_set_data_while_loading_stays_loading() {
    let mut query: Query<Vec<u32>> = Query::new(|| async {
      tokio::time::sleep(std::time::Duration::from_millis(20)).await;
      Ok(vec![1, 2])
    });

    query.fetch();
    query.set_data(|_| vec![9]);
    assert!(query.is_loading());
    assert_eq!(query.data(), Some(&vec![9]));

    query.wait().await;
    assert_eq!(query.data(), Some(&vec![1, 2]));
  }
}
