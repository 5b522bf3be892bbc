mod category_bar;
mod confirm_dialog;
mod input;
mod item_form;
mod key_result;

pub use category_bar::{CategoryBar, CategoryBarEvent};
pub use confirm_dialog::{ConfirmDialog, ConfirmEvent};
pub use input::TextInput;
pub use item_form::{ItemForm, ItemFormEvent};
pub use key_result::KeyResult;
