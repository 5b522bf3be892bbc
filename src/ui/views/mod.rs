mod grocery_list;

pub use grocery_list::GroceryListView;
