//! View composition for the grocery list.
//!
//! Everything here is derived from the store or is transient UI state:
//! the category filter, the edit target, the error banner and the notice
//! line. Nothing is persisted.

use crate::api::{Category, Item};
use crate::store::MutationOutcome;

/// Restrict items to one category. `None` shows everything.
pub fn filter_items<'a>(items: &[&'a Item], filter: Option<Category>) -> Vec<&'a Item> {
  match filter {
    None => items.to_vec(),
    Some(category) => items
      .iter()
      .copied()
      .filter(|i| i.category == category)
      .collect(),
  }
}

/// Purchased and total counts over the whole list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counts {
  pub purchased: usize,
  pub total: usize,
}

impl Counts {
  /// Always computed from the unfiltered cache
  pub fn of(items: &[Item]) -> Self {
    Self {
      purchased: items.iter().filter(|i| i.purchased).count(),
      total: items.len(),
    }
  }
}

/// The item open in the edit modal
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditTarget {
  item: Option<Item>,
  open: bool,
}

impl EditTarget {
  /// Open the modal on an item. Purchased items are not editable.
  pub fn open(&mut self, item: &Item) -> bool {
    if item.purchased {
      return false;
    }
    self.item = Some(item.clone());
    self.open = true;
    true
  }

  /// Closing clears the target too
  pub fn close(&mut self) {
    self.item = None;
    self.open = false;
  }

  pub fn is_open(&self) -> bool {
    self.open
  }

  pub fn item(&self) -> Option<&Item> {
    self.item.as_ref()
  }
}

/// Dismissible error line.
///
/// Every raised error is a new occurrence. Dismissing hides the current
/// occurrence only; the next one shows again.
#[derive(Debug, Clone, Default)]
pub struct ErrorBanner {
  occurrence: u64,
  message: Option<String>,
  dismissed: Option<u64>,
}

impl ErrorBanner {
  pub fn raise(&mut self, message: impl Into<String>) {
    self.occurrence += 1;
    self.message = Some(message.into());
  }

  /// The underlying error went away
  pub fn resolve(&mut self) {
    if self.message.take().is_some() {
      self.occurrence += 1;
    }
  }

  pub fn dismiss(&mut self) {
    self.dismissed = Some(self.occurrence);
  }

  /// Message to show, if any
  pub fn visible(&self) -> Option<&str> {
    if self.dismissed == Some(self.occurrence) {
      None
    } else {
      self.message.as_deref()
    }
  }
}

/// "1 item", "3 items"
pub fn pluralize(count: u64, noun: &str) -> String {
  if count == 1 {
    format!("{} {}", count, noun)
  } else {
    format!("{} {}s", count, noun)
  }
}

pub fn purchased_label(purchased: bool) -> &'static str {
  if purchased {
    "purchased"
  } else {
    "not purchased"
  }
}

/// Confirmation line for bulk outcomes, from the server's count
pub fn bulk_notice(outcome: &MutationOutcome) -> Option<String> {
  match outcome {
    MutationOutcome::Cleared { deleted } => {
      Some(format!("Deleted {}", pluralize(*deleted, "item")))
    }
    MutationOutcome::AllPurchased { purchased, updated } => Some(format!(
      "Marked {} as {}",
      pluralize(*updated, "item"),
      purchased_label(*purchased)
    )),
    _ => None,
  }
}
