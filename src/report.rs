//! Plain-text output for the one-shot subcommands.

use color_eyre::Result;

use crate::api::{ApiError, HttpBackend, Item};
use crate::listing::{bulk_notice, purchased_label, Counts};
use crate::store::{ItemStore, MutationOutcome};

/// One line per item in display order, then the counts line
pub fn format_list(items: &[&Item], counts: Counts) -> String {
  let name_width = items
    .iter()
    .map(|i| i.name.chars().count())
    .max()
    .unwrap_or(0)
    .max(4);

  let mut out = String::new();
  for item in items {
    let check = if item.purchased { "[x]" } else { "[ ]" };
    out.push_str(&format!(
      "{} {:<width$}  {:>4}  {}\n",
      check,
      item.name,
      item.quantity,
      item.category,
      width = name_width
    ));
  }
  if items.is_empty() {
    out.push_str("No items yet\n");
  }
  out.push_str(&format!("{} of {} purchased\n", counts.purchased, counts.total));
  out
}

/// Fetch the list once and print it
pub async fn print_list<B: HttpBackend + Clone>(mut store: ItemStore<B>) -> Result<()> {
  store.load().await?;
  let counts = Counts::of(store.raw());
  print!("{}", format_list(&store.items(), counts));
  Ok(())
}

fn summary(item: &Item) -> String {
  format!("#{} {} ({} x {})", item.id, item.name, item.quantity, item.category)
}

/// One line confirming a finished mutation
pub fn describe(outcome: &MutationOutcome) -> String {
  match outcome {
    MutationOutcome::Created(item) => format!("Added {}", summary(item)),
    MutationOutcome::Updated(item) => format!("Updated {}", summary(item)),
    MutationOutcome::Deleted(id) => format!("Deleted item #{}", id),
    MutationOutcome::Toggled { id, purchased } => {
      format!("Marked item #{} as {}", id, purchased_label(*purchased))
    }
    MutationOutcome::Cleared { .. } | MutationOutcome::AllPurchased { .. } => {
      bulk_notice(outcome).unwrap_or_default()
    }
  }
}

/// The error message, followed by one line per rejected field
pub fn format_failure(error: &ApiError) -> String {
  let mut out = error.to_string();
  for (field, message) in error.field_errors() {
    out.push_str(&format!("\n  {}: {}", field, message));
  }
  out
}
