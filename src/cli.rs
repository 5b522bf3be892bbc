//! One-shot subcommands that run without the terminal UI.
//!
//! Each write goes through `ItemStore::mutate`, so the request and the
//! cache patch are the same ones the list view dispatches.

use clap::Subcommand;
use color_eyre::{eyre::eyre, Result};
use tracing::info;

use crate::api::{Category, HttpBackend, ItemId, ItemPatch, NewItem};
use crate::report;
use crate::store::{ItemStore, Mutation};

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
  /// Print the list and exit
  List,

  /// Add an item
  Add {
    name: String,

    #[arg(short, long)]
    quantity: Option<u32>,

    /// Produce, Dairy, Meat, Pantry, Bakery or Other
    #[arg(short, long)]
    category: Option<Category>,
  },

  /// Change an item's name, quantity or category
  Edit {
    id: ItemId,

    #[arg(short, long)]
    name: Option<String>,

    #[arg(short, long)]
    quantity: Option<u32>,

    #[arg(short, long)]
    category: Option<Category>,
  },

  /// Flip an item's purchased flag
  Toggle { id: ItemId },

  /// Delete one item
  Delete { id: ItemId },

  /// Delete every item
  Clear {
    /// Required, there is no undo
    #[arg(short, long)]
    yes: bool,
  },

  /// Mark every item as purchased
  MarkAll {
    /// Mark every item as not purchased instead
    #[arg(long)]
    not: bool,
  },
}

fn required_name(name: &str) -> Result<String> {
  let name = name.trim();
  if name.is_empty() {
    return Err(eyre!("name: This field is required."));
  }
  Ok(name.to_string())
}

/// Build the mutation for a write command. Toggle loads the list first
/// to read the current flag.
async fn mutation_for<B: HttpBackend + Clone>(
  command: Command,
  store: &mut ItemStore<B>,
) -> Result<Mutation> {
  let mutation = match command {
    Command::List => return Err(eyre!("list does not change anything")),
    Command::Add {
      name,
      quantity,
      category,
    } => Mutation::Create(NewItem {
      name: required_name(&name)?,
      category,
      quantity,
    }),
    Command::Edit {
      id,
      name,
      quantity,
      category,
    } => {
      if name.is_none() && quantity.is_none() && category.is_none() {
        return Err(eyre!("Nothing to change, pass --name, --quantity or --category"));
      }
      let name = name.as_deref().map(required_name).transpose()?;
      Mutation::Update {
        id,
        patch: ItemPatch {
          name,
          category,
          quantity,
          purchased: None,
        },
      }
    }
    Command::Toggle { id } => {
      store.load().await?;
      store.toggle_mutation(id)?
    }
    Command::Delete { id } => Mutation::Delete(id),
    Command::Clear { yes } => {
      if !yes {
        return Err(eyre!("Refusing to delete every item without --yes"));
      }
      Mutation::DeleteAll
    }
    Command::MarkAll { not } => Mutation::SetAllPurchased(!not),
  };
  Ok(mutation)
}

/// Run a subcommand to completion
pub async fn run<B: HttpBackend + Clone>(command: Command, mut store: ItemStore<B>) -> Result<()> {
  if command == Command::List {
    return report::print_list(store).await;
  }

  let mutation = mutation_for(command, &mut store).await?;
  let outcome = store
    .mutate(mutation)
    .await
    .map_err(|err| eyre!(report::format_failure(&err)))?;

  info!(?outcome, "mutation finished");
  println!("{}", report::describe(&outcome));
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::api::testing::MockBackend;
  use crate::store::tests::{item_json, store_with};
  use clap::Parser;
  use reqwest::Method;
  use serde_json::json;

  #[derive(Parser, Debug)]
  struct Cli {
    #[command(subcommand)]
    command: Command,
  }

  fn parse(args: &[&str]) -> Command {
    Cli::parse_from(std::iter::once("grocer").chain(args.iter().copied())).command
  }

  #[test]
  fn test_parse_add_with_category() {
    assert_eq!(
      parse(&["add", "Eggs", "-q", "12", "--category", "dairy"]),
      Command::Add {
        name: "Eggs".to_string(),
        quantity: Some(12),
        category: Some(Category::Dairy),
      }
    );
  }

  #[test]
  fn test_parse_rejects_unknown_category() {
    let parsed = Cli::try_parse_from(["grocer", "add", "Peas", "-c", "Frozen"]);
    assert!(parsed.is_err());
  }

  #[test]
  fn test_parse_mark_all_not() {
    assert_eq!(parse(&["mark-all", "--not"]), Command::MarkAll { not: true });
  }

  #[tokio::test]
  async fn test_add_sends_trimmed_name() {
    let backend = MockBackend::new();
    backend.respond(201, item_json(4, "Eggs", "Other", 1, false));

    let command = parse(&["add", "  Eggs  "]);
    run(command, store_with(&backend)).await.unwrap();

    assert_eq!(backend.body_of(0), Some(json!({ "name": "Eggs" })));
  }

  #[tokio::test]
  async fn test_blank_name_makes_no_request() {
    let backend = MockBackend::new();

    let err = run(parse(&["add", "   "]), store_with(&backend))
      .await
      .unwrap_err();

    assert_eq!(err.to_string(), "name: This field is required.");
    assert_eq!(backend.request_count(), 0);
  }

  #[tokio::test]
  async fn test_edit_needs_a_field() {
    let backend = MockBackend::new();
    assert!(run(parse(&["edit", "3"]), store_with(&backend)).await.is_err());
    assert_eq!(backend.request_count(), 0);
  }

  #[tokio::test]
  async fn test_edit_sends_only_given_fields() {
    let backend = MockBackend::new();
    backend.respond(200, item_json(3, "Bread", "Bakery", 2, false));

    run(parse(&["edit", "3", "-q", "2"]), store_with(&backend))
      .await
      .unwrap();

    let request = &backend.requests()[0];
    assert_eq!(request.method, Method::PATCH);
    assert_eq!(backend.body_of(0), Some(json!({ "quantity": 2 })));
  }

  #[tokio::test]
  async fn test_toggle_reads_flag_from_loaded_list() {
    let backend = MockBackend::new();
    backend.respond(200, json!([item_json(1, "Milk", "Dairy", 1, true)]));
    backend.respond(200, item_json(1, "Milk", "Dairy", 1, false));

    run(parse(&["toggle", "1"]), store_with(&backend))
      .await
      .unwrap();

    assert_eq!(backend.request_count(), 2);
    assert_eq!(backend.body_of(1), Some(json!({ "purchased": false })));
  }

  #[tokio::test]
  async fn test_toggle_unknown_id_stops_after_load() {
    let backend = MockBackend::new();
    backend.respond(200, json!([item_json(1, "Milk", "Dairy", 1, true)]));

    let err = run(parse(&["toggle", "9"]), store_with(&backend))
      .await
      .unwrap_err();

    assert_eq!(err.to_string(), "Item not found");
    assert_eq!(backend.request_count(), 1);
  }

  #[tokio::test]
  async fn test_clear_requires_yes() {
    let backend = MockBackend::new();
    assert!(run(parse(&["clear"]), store_with(&backend)).await.is_err());
    assert_eq!(backend.request_count(), 0);

    backend.respond(200, json!({ "deleted": 2 }));
    run(parse(&["clear", "--yes"]), store_with(&backend))
      .await
      .unwrap();
    assert_eq!(backend.requests()[0].method, Method::DELETE);
  }

  #[tokio::test]
  async fn test_validation_failure_lists_fields() {
    let backend = MockBackend::new();
    backend.respond(
      400,
      json!({ "quantity": ["Ensure this value is greater than or equal to 1."] }),
    );

    let err = run(parse(&["add", "Tea", "-q", "0"]), store_with(&backend))
      .await
      .unwrap_err();

    assert_eq!(
      err.to_string(),
      concat!(
        "Please fix the highlighted fields.\n",
        "  quantity: Ensure this value is greater than or equal to 1."
      )
    );
  }
}
