//! Client-side copy of the grocery list.
//!
//! `ItemStore` is the single handle to the cached collection. It owns the
//! list query and applies mutation patches, so readers never see a
//! half-applied write. Mutations can run two ways:
//! - awaited through `mutate`, which performs the call and patches the
//!   cache before returning;
//! - dispatched (`dispatch`, `dispatch_toggle`), which runs the call on a
//!   spawned task and patches the cache when `poll()` sees the completion.
//!
//! Completions apply in arrival order. Two in-flight mutations on the same
//! item may land out of issue order; the later arrival wins.

mod mutation;
pub mod patch;

pub use mutation::{Mutation, MutationKind, MutationOutcome};

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::api::{ApiError, HttpBackend, Item, ItemId, ItemsApi};
use crate::query::{Query, QueryStatus};

/// Something that happened to the store since the last `poll()`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
  /// The list fetch succeeded
  Loaded,
  /// The list fetch failed
  LoadFailed(ApiError),
  /// A dispatched mutation finished. On success its patch is already applied.
  Mutated {
    kind: MutationKind,
    result: Result<MutationOutcome, ApiError>,
  },
}

/// Synced data older than this is flagged in the header
const STALE_AFTER_MINUTES: i64 = 5;

#[derive(Debug)]
struct Completion {
  kind: MutationKind,
  result: Result<MutationOutcome, ApiError>,
}

pub struct ItemStore<B> {
  api: ItemsApi<B>,
  query: Query<Vec<Item>>,
  completions_tx: mpsc::UnboundedSender<Completion>,
  completions_rx: mpsc::UnboundedReceiver<Completion>,
  in_flight: usize,
}

impl<B: HttpBackend + Clone> ItemStore<B> {
  pub fn new(api: ItemsApi<B>) -> Self {
    let api_for_query = api.clone();
    let query = Query::new(move || {
      let api = api_for_query.clone();
      async move { api.list().await }
    })
    .with_stale_time(chrono::Duration::minutes(STALE_AFTER_MINUTES));
    let (completions_tx, completions_rx) = mpsc::unbounded_channel();

    Self {
      api,
      query,
      completions_tx,
      completions_rx,
      in_flight: 0,
    }
  }

  // Reads

  /// Cached items in display order. Derived on every call.
  pub fn items(&self) -> Vec<&Item> {
    patch::display_order(self.raw())
  }

  /// Cached items in stored order (newest creations first)
  pub fn raw(&self) -> &[Item] {
    self.query.data().map(|v| v.as_slice()).unwrap_or(&[])
  }

  pub fn get(&self, id: ItemId) -> Option<&Item> {
    self.raw().iter().find(|i| i.id == id)
  }

  pub fn is_loading(&self) -> bool {
    self.query.is_loading()
  }

  /// True until the first fetch settles
  pub fn is_initial_load(&self) -> bool {
    self.query.is_loading() && self.query.data().is_none()
  }

  pub fn load_error(&self) -> Option<&ApiError> {
    self.query.error()
  }

  pub fn synced_at(&self) -> Option<DateTime<Utc>> {
    self.query.fetched_at()
  }

  /// The cache has not been synced for a while
  pub fn is_stale(&self) -> bool {
    self.query.is_stale()
  }

  /// Number of dispatched mutations still waiting on the network
  pub fn in_flight(&self) -> usize {
    self.in_flight
  }

  // Fetching

  pub fn fetch(&mut self) {
    self.query.fetch();
  }

  pub fn refetch(&mut self) {
    self.query.refetch();
  }

  /// Wait for the pending list fetch, if any
  pub async fn load(&mut self) -> Result<(), ApiError> {
    if self.query.status() == QueryStatus::Idle {
      self.query.fetch();
    }
    self.query.wait().await;
    match self.query.error() {
      Some(err) => Err(err.clone()),
      None => Ok(()),
    }
  }

  // Patching

  /// Apply a confirmed outcome to the cache
  pub fn apply(&mut self, outcome: &MutationOutcome) {
    debug!(?outcome, "patching item cache");
    self.query.set_data(|items| outcome.apply(items));
  }

  /// Build the toggle for an item from its cached flag.
  /// Fails without touching the network if the item is not cached.
  pub fn toggle_mutation(&self, id: ItemId) -> Result<Mutation, ApiError> {
    let item = self.get(id).ok_or(ApiError::ItemNotFound(id))?;
    Ok(Mutation::Toggle {
      id,
      purchased: !item.purchased,
    })
  }

  // Awaited mutations

  /// Perform a mutation and patch the cache before returning.
  /// A failure leaves the cache untouched.
  pub async fn mutate(&mut self, mutation: Mutation) -> Result<MutationOutcome, ApiError> {
    let kind = mutation.kind();
    match mutation.perform(&self.api).await {
      Ok(outcome) => {
        self.apply(&outcome);
        Ok(outcome)
      }
      Err(err) => {
        warn!(?kind, error = %err, "mutation failed");
        Err(err)
      }
    }
  }

  // Dispatched mutations

  /// Start a mutation in the background. Its patch lands on a later `poll()`.
  pub fn dispatch(&mut self, mutation: Mutation) {
    let api = self.api.clone();
    let tx = self.completions_tx.clone();
    let kind = mutation.kind();
    self.in_flight += 1;

    debug!(?kind, "dispatching mutation");
    tokio::spawn(async move {
      let result = mutation.perform(&api).await;
      // Store may have been dropped
      let _ = tx.send(Completion { kind, result });
    });
  }

  /// Toggle in the background, reading the current flag from the cache now.
  pub fn dispatch_toggle(&mut self, id: ItemId) -> Result<(), ApiError> {
    let mutation = self.toggle_mutation(id)?;
    self.dispatch(mutation);
    Ok(())
  }

  /// Drain finished fetches and mutations, applying patches in arrival order.
  pub fn poll(&mut self) -> Vec<StoreEvent> {
    let mut events = Vec::new();

    if self.query.poll() {
      match self.query.error() {
        Some(err) => {
          warn!(error = %err, "item list fetch failed");
          events.push(StoreEvent::LoadFailed(err.clone()));
        }
        None => {
          debug!(count = self.raw().len(), "item list loaded");
          events.push(StoreEvent::Loaded);
        }
      }
    }

    while let Ok(Completion { kind, result }) = self.completions_rx.try_recv() {
      self.in_flight = self.in_flight.saturating_sub(1);
      match &result {
        Ok(outcome) => self.apply(outcome),
        Err(err) => warn!(?kind, error = %err, "mutation failed"),
      }
      events.push(StoreEvent::Mutated { kind, result });
    }

    events
  }
}
