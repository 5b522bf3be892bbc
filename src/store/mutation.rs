//! Mutations as values: perform the network call, then patch the cache.

use crate::api::{ApiError, HttpBackend, Item, ItemId, ItemPatch, ItemsApi, NewItem};

use super::patch;

/// A write against the items resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
  Create(NewItem),
  Update { id: ItemId, patch: ItemPatch },
  Delete(ItemId),
  DeleteAll,
  /// `purchased` is the new flag, already negated from the cached one
  Toggle { id: ItemId, purchased: bool },
  SetAllPurchased(bool),
}

/// Which mutation a completion belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
  Create,
  Update,
  Delete,
  DeleteAll,
  Toggle,
  SetAllPurchased(bool),
}

/// The server-confirmed result of a mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome {
  Created(Item),
  Updated(Item),
  Deleted(ItemId),
  Cleared { deleted: u64 },
  Toggled { id: ItemId, purchased: bool },
  AllPurchased { purchased: bool, updated: u64 },
}

impl Mutation {
  pub fn kind(&self) -> MutationKind {
    match self {
      Mutation::Create(_) => MutationKind::Create,
      Mutation::Update { .. } => MutationKind::Update,
      Mutation::Delete(_) => MutationKind::Delete,
      Mutation::DeleteAll => MutationKind::DeleteAll,
      Mutation::Toggle { .. } => MutationKind::Toggle,
      Mutation::SetAllPurchased(purchased) => MutationKind::SetAllPurchased(*purchased),
    }
  }

  /// Run the network call. Touches no local state.
  pub async fn perform<B: HttpBackend>(
    self,
    api: &ItemsApi<B>,
  ) -> Result<MutationOutcome, ApiError> {
    let outcome = match self {
      Mutation::Create(item) => MutationOutcome::Created(api.create(&item).await?),
      Mutation::Update { id, patch } => MutationOutcome::Updated(api.update(id, &patch).await?),
      Mutation::Delete(id) => {
        api.delete(id).await?;
        MutationOutcome::Deleted(id)
      }
      Mutation::DeleteAll => MutationOutcome::Cleared {
        deleted: api.delete_all().await?.deleted,
      },
      Mutation::Toggle { id, purchased } => {
        api.update(id, &ItemPatch::purchased(purchased)).await?;
        MutationOutcome::Toggled { id, purchased }
      }
      Mutation::SetAllPurchased(purchased) => MutationOutcome::AllPurchased {
        purchased,
        updated: api.bulk_set_purchased(purchased).await?.updated,
      },
    };
    Ok(outcome)
  }
}

impl MutationOutcome {
  /// The cache patch for this outcome
  pub fn apply(&self, items: Vec<Item>) -> Vec<Item> {
    match self {
      MutationOutcome::Created(item) => patch::prepend(items, item.clone()),
      MutationOutcome::Updated(item) => patch::replace(items, item.clone()),
      MutationOutcome::Deleted(id) => patch::remove(items, *id),
      MutationOutcome::Cleared { .. } => patch::clear(items),
      MutationOutcome::Toggled { id, purchased } => patch::set_purchased(items, *id, *purchased),
      MutationOutcome::AllPurchased { purchased, .. } => {
        patch::set_all_purchased(items, *purchased)
      }
    }
  }
}
