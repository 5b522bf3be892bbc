//! Wire types for the grocery items REST API.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Server-assigned item identifier
pub type ItemId = i64;

/// Grocery category. Serialized as its display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Category {
  Produce,
  Dairy,
  Meat,
  Pantry,
  Bakery,
  #[default]
  Other,
}

impl Category {
  /// Every category, in the order the input controls offer them
  pub const ALL: [Category; 6] = [
    Category::Produce,
    Category::Dairy,
    Category::Meat,
    Category::Pantry,
    Category::Bakery,
    Category::Other,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      Category::Produce => "Produce",
      Category::Dairy => "Dairy",
      Category::Meat => "Meat",
      Category::Pantry => "Pantry",
      Category::Bakery => "Bakery",
      Category::Other => "Other",
    }
  }

  /// Position in `ALL`
  pub fn index(&self) -> usize {
    Self::ALL.iter().position(|c| c == self).unwrap_or(0)
  }

  /// Next category in `ALL`, wrapping
  pub fn cycle(&self, delta: i32) -> Category {
    let len = Self::ALL.len() as i32;
    let idx = (self.index() as i32 + delta).rem_euclid(len) as usize;
    Self::ALL[idx]
  }
}

impl fmt::Display for Category {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Category {
  type Err = String;

  /// Case-insensitive display name
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::ALL
      .iter()
      .copied()
      .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
      .ok_or_else(|| {
        let names: Vec<&str> = Self::ALL.iter().map(|c| c.as_str()).collect();
        format!("unknown category '{}', expected one of: {}", s, names.join(", "))
      })
  }
}

/// A grocery item as returned by the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
  pub id: ItemId,
  pub name: String,
  pub category: Category,
  pub quantity: u32,
  pub purchased: bool,
}

/// Payload for creating an item. Only the name is required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NewItem {
  pub name: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub category: Option<Category>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub quantity: Option<u32>,
}

/// Partial update. Absent fields are left untouched by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ItemPatch {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub category: Option<Category>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub quantity: Option<u32>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub purchased: Option<bool>,
}

impl ItemPatch {
  pub fn purchased(purchased: bool) -> Self {
    Self {
      purchased: Some(purchased),
      ..Self::default()
    }
  }
}

/// Response of the delete-all endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Deleted {
  pub deleted: u64,
}

/// Response of the bulk purchased endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Updated {
  pub updated: u64,
}

#[derive(Debug, Serialize)]
pub(crate) struct PurchasedBody {
  pub purchased: bool,
}
