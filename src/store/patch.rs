//! Pure cache patches and the derived display order.
//!
//! Each successful mutation rewrites the cached sequence with one of these
//! functions instead of fetching the list again.

use crate::api::{Item, ItemId};

/// Put a newly created item at the head of the sequence.
/// Any stale entry with the same id is dropped so ids stay unique.
pub fn prepend(items: Vec<Item>, item: Item) -> Vec<Item> {
  let mut patched = Vec::with_capacity(items.len() + 1);
  let id = item.id;
  patched.push(item);
  patched.extend(items.into_iter().filter(|i| i.id != id));
  patched
}

/// Swap in the server's copy of an item. No-op if the id is not cached.
pub fn replace(items: Vec<Item>, item: Item) -> Vec<Item> {
  items
    .into_iter()
    .map(|i| if i.id == item.id { item.clone() } else { i })
    .collect()
}

pub fn remove(items: Vec<Item>, id: ItemId) -> Vec<Item> {
  items.into_iter().filter(|i| i.id != id).collect()
}

pub fn clear(_items: Vec<Item>) -> Vec<Item> {
  Vec::new()
}

pub fn set_purchased(items: Vec<Item>, id: ItemId, purchased: bool) -> Vec<Item> {
  items
    .into_iter()
    .map(|mut i| {
      if i.id == id {
        i.purchased = purchased;
      }
      i
    })
    .collect()
}

pub fn set_all_purchased(items: Vec<Item>, purchased: bool) -> Vec<Item> {
  items
    .into_iter()
    .map(|mut i| {
      i.purchased = purchased;
      i
    })
    .collect()
}

/// Unpurchased before purchased, then by category name. Stable.
pub fn display_order(items: &[Item]) -> Vec<&Item> {
  let mut ordered: Vec<&Item> = items.iter().collect();
  ordered.sort_by(|a, b| {
    a.purchased
      .cmp(&b.purchased)
      .then_with(|| a.category.as_str().cmp(b.category.as_str()))
  });
  ordered
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::api::Category;

  fn item(id: ItemId, name: &str, category: Category, purchased: bool) -> Item {
    Item {
      id,
      name: name.to_string(),
      category,
      quantity: 1,
      purchased,
    }
  }

  fn sample() -> Vec<Item> {
    vec![
      item(1, "Milk", Category::Dairy, false),
      item(2, "Apples", Category::Produce, true),
      item(3, "Bread", Category::Bakery, false),
      item(4, "Steak", Category::Meat, true),
    ]
  }

  fn ids(items: &[Item]) -> Vec<ItemId> {
    items.iter().map(|i| i.id).collect()
  }

  #[test]
  fn test_prepend_puts_item_first() {
    let patched = prepend(sample(), item(9, "Eggs", Category::Dairy, false));
    assert_eq!(ids(&patched), vec![9, 1, 2, 3, 4]);
  }

  #[test]
  fn test_prepend_keeps_ids_unique() {
    let patched = prepend(sample(), item(3, "Rye bread", Category::Bakery, false));
    assert_eq!(ids(&patched), vec![3, 1, 2, 4]);
    assert_eq!(patched[0].name, "Rye bread");
  }

  #[test]
  fn test_replace_matching_entry_only() {
    let mut updated = item(3, "Bagels", Category::Bakery, false);
    updated.quantity = 6;
    let before = sample();
    let patched = replace(before.clone(), updated.clone());

    assert_eq!(patched[2], updated);
    assert_eq!(patched[0], before[0]);
    assert_eq!(patched[1], before[1]);
    assert_eq!(patched[3], before[3]);
  }

  #[test]
  fn test_replace_unknown_id_is_noop() {
    let before = sample();
    let patched = replace(before.clone(), item(42, "Ghost", Category::Other, false));
    assert_eq!(patched, before);
  }

  #[test]
  fn test_remove_preserves_order_of_others() {
    let before = sample();
    let patched = remove(before.clone(), 2);
    assert_eq!(patched, vec![before[0].clone(), before[2].clone(), before[3].clone()]);
  }

  #[test]
  fn test_clear_empties() {
    assert!(clear(sample()).is_empty());
  }

  #[test]
  fn test_set_purchased_targets_one_item() {
    let patched = set_purchased(sample(), 1, true);
    assert!(patched[0].purchased);
    assert!(!patched[2].purchased);
  }

  #[test]
  fn test_set_all_purchased_is_unconditional() {
    let patched = set_all_purchased(sample(), false);
    assert!(patched.iter().all(|i| !i.purchased));
  }

  #[test]
  fn test_display_order_groups_then_sorts_by_category() {
    let items = sample();
    let ordered: Vec<ItemId> = display_order(&items).iter().map(|i| i.id).collect();
    // Bakery, Dairy unpurchased; then Meat, Produce purchased
    assert_eq!(ordered, vec![3, 1, 4, 2]);
  }

  #[test]
  fn test_display_order_is_stable_within_category() {
    let items = vec![
      item(1, "Oats", Category::Pantry, false),
      item(2, "Rice", Category::Pantry, false),
      item(3, "Flour", Category::Pantry, false),
    ];
    let ordered: Vec<ItemId> = display_order(&items).iter().map(|i| i.id).collect();
    assert_eq!(ordered, vec![1, 2, 3]);
  }

  #[test]
  fn test_display_order_property() {
    let items = vec![
      item(1, "a", Category::Produce, true),
      item(2, "b", Category::Other, false),
      item(3, "c", Category::Bakery, true),
      item(4, "d", Category::Pantry, false),
      item(5, "e", Category::Dairy, false),
      item(6, "f", Category::Meat, true),
    ];
    let ordered = display_order(&items);

    for pair in ordered.windows(2) {
      let (a, b) = (pair[0], pair[1]);
      assert!(!a.purchased || b.purchased);
      if a.purchased == b.purchased {
        assert!(a.category.as_str() <= b.category.as_str());
      }
    }
  }
}
