//! Add/edit form overlay.
//!
//! The form only builds mutations; the owning view dispatches them and
//! reports back through `succeeded` / `failed`. Field errors from the
//! server render under the matching control.

use super::{KeyResult, TextInput};
use crate::api::{ApiError, Category, FieldErrors, Item, ItemId, ItemPatch, NewItem};
use crate::store::Mutation;
use crate::ui::renderfns::{category_color, centered_rect};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

const LABEL_WIDTH: u16 = 10;
const REQUIRED_MESSAGE: &str = "This field is required.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
  Add,
  Edit(ItemId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
  #[default]
  Name,
  Quantity,
  Category,
}

impl FormField {
  fn next(self) -> Self {
    match self {
      FormField::Name => FormField::Quantity,
      FormField::Quantity => FormField::Category,
      FormField::Category => FormField::Name,
    }
  }

  fn prev(self) -> Self {
    match self {
      FormField::Name => FormField::Category,
      FormField::Quantity => FormField::Name,
      FormField::Category => FormField::Quantity,
    }
  }

  /// Key used by the server for field errors
  fn wire_name(self) -> &'static str {
    match self {
      FormField::Name => "name",
      FormField::Quantity => "quantity",
      FormField::Category => "category",
    }
  }
}

/// Events emitted by the form that the parent needs to handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemFormEvent {
  Submit(Mutation),
  Cancelled,
}

#[derive(Debug, Clone)]
pub struct ItemForm {
  mode: Option<FormMode>,
  name: TextInput,
  quantity: TextInput,
  category: Category,
  focus: FormField,
  errors: FieldErrors,
  submitting: bool,
}

impl Default for ItemForm {
  fn default() -> Self {
    Self::new()
  }
}

impl ItemForm {
  pub fn new() -> Self {
    let mut quantity = TextInput::numeric();
    quantity.set_value("1");
    Self {
      mode: None,
      name: TextInput::new(),
      quantity,
      category: Category::default(),
      focus: FormField::Name,
      errors: FieldErrors::new(),
      submitting: false,
    }
  }

  pub fn is_active(&self) -> bool {
    self.mode.is_some()
  }

  pub fn is_submitting(&self) -> bool {
    self.submitting
  }

  pub fn field_error(&self, field: &str) -> Option<&str> {
    self.errors.get(field).map(String::as_str)
  }

  /// Whether every field error has a control to render under
  pub fn shows_all(errors: &FieldErrors) -> bool {
    errors.keys().all(|k| {
      [FormField::Name, FormField::Quantity, FormField::Category]
        .iter()
        .any(|f| f.wire_name() == k)
    })
  }

  /// Open an empty add form. The last used category is kept.
  pub fn open_add(&mut self) {
    self.mode = Some(FormMode::Add);
    self.reset_entry();
  }

  /// Open the edit form pre-filled from an item
  pub fn open_edit(&mut self, item: &Item) {
    self.mode = Some(FormMode::Edit(item.id));
    self.name.set_value(&item.name);
    self.quantity.set_value(&item.quantity.to_string());
    self.category = item.category;
    self.focus = FormField::Name;
    self.errors.clear();
    self.submitting = false;
  }

  /// Hide the form and drop any previous mutation error
  pub fn close(&mut self) {
    if matches!(self.mode, Some(FormMode::Edit(_))) {
      self.category = Category::default();
    }
    self.mode = None;
    self.reset_entry();
  }

  /// The submitted mutation succeeded. Add stays open for the next item.
  pub fn succeeded(&mut self) {
    match self.mode {
      Some(FormMode::Add) => self.reset_entry(),
      _ => self.close(),
    }
  }

  /// The submitted mutation failed
  pub fn failed(&mut self, error: &ApiError) {
    self.submitting = false;
    self.errors = error.field_errors().clone();
  }

  fn reset_entry(&mut self) {
    self.name.clear();
    self.quantity.set_value("1");
    self.focus = FormField::Name;
    self.errors.clear();
    self.submitting = false;
  }

  /// Quantity falls back to 1 when empty or zero
  fn quantity_value(&self) -> u32 {
    self
      .quantity
      .value()
      .parse::<u32>()
      .ok()
      .filter(|q| *q > 0)
      .unwrap_or(1)
  }

  fn build_mutation(&self) -> Option<Mutation> {
    let name = self.name.value().trim().to_string();
    let quantity = self.quantity_value();
    match self.mode? {
      FormMode::Add => Some(Mutation::Create(NewItem {
        name,
        category: Some(self.category),
        quantity: Some(quantity),
      })),
      FormMode::Edit(id) => Some(Mutation::Update {
        id,
        patch: ItemPatch {
          name: Some(name),
          category: Some(self.category),
          quantity: Some(quantity),
          purchased: None,
        },
      }),
    }
  }

  fn submit(&mut self) -> KeyResult<ItemFormEvent> {
    if self.name.value().trim().is_empty() {
      self.errors.clear();
      self
        .errors
        .insert("name".to_string(), REQUIRED_MESSAGE.to_string());
      self.focus = FormField::Name;
      return KeyResult::Handled;
    }

    match self.build_mutation() {
      Some(mutation) => {
        self.errors.clear();
        self.submitting = true;
        KeyResult::Event(ItemFormEvent::Submit(mutation))
      }
      None => KeyResult::Handled,
    }
  }

  /// While active the form swallows every key
  pub fn handle_key(&mut self, key: KeyEvent) -> KeyResult<ItemFormEvent> {
    if !self.is_active() {
      return KeyResult::NotHandled;
    }
    // Inputs are locked until the pending request settles
    if self.submitting {
      return KeyResult::Handled;
    }

    match key.code {
      KeyCode::Esc => {
        self.close();
        return KeyResult::Event(ItemFormEvent::Cancelled);
      }
      KeyCode::Enter => return self.submit(),
      KeyCode::Tab | KeyCode::Down => {
        self.focus = self.focus.next();
        return KeyResult::Handled;
      }
      KeyCode::BackTab | KeyCode::Up => {
        self.focus = self.focus.prev();
        return KeyResult::Handled;
      }
      _ => {}
    }

    match self.focus {
      FormField::Name => {
        self.name.handle_key(key);
      }
      FormField::Quantity => {
        self.quantity.handle_key(key);
      }
      FormField::Category => match key.code {
        KeyCode::Left | KeyCode::Char('h') => self.category = self.category.cycle(-1),
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char(' ') => {
          self.category = self.category.cycle(1)
        }
        _ => {}
      },
    }
    KeyResult::Handled
  }

  fn field_lines(&self, field: FormField) -> Vec<Line<'_>> {
    let focused = self.focus == field;
    let label_style = if focused {
      Style::default().fg(Color::Cyan).bold()
    } else {
      Style::default().fg(Color::Gray)
    };
    let label = match field {
      FormField::Name => "Name",
      FormField::Quantity => "Quantity",
      FormField::Category => "Category",
    };

    let value = match field {
      FormField::Name => Span::styled(self.name.value(), Style::default().fg(Color::White)),
      FormField::Quantity => Span::styled(self.quantity.value(), Style::default().fg(Color::White)),
      FormField::Category => Span::styled(
        format!("< {} >", self.category),
        Style::default().fg(category_color(self.category)),
      ),
    };

    let mut lines = vec![Line::from(vec![
      Span::styled(
        format!("{:<width$}", label, width = LABEL_WIDTH as usize),
        label_style,
      ),
      value,
    ])];
    if let Some(err) = self.field_error(field.wire_name()) {
      lines.push(Line::from(Span::styled(
        format!("{:<width$}{}", "", err, width = LABEL_WIDTH as usize),
        Style::default().fg(Color::Red),
      )));
    }
    lines
  }

  pub fn render_overlay(&self, frame: &mut Frame, area: Rect) {
    let Some(mode) = self.mode else {
      return;
    };

    let width = 56u16.min(area.width.saturating_sub(4)).max(24);
    let height = 11u16.min(area.height.saturating_sub(2)).max(5);
    let overlay_area = centered_rect(area, width, height);

    frame.render_widget(Clear, overlay_area);

    let title = match mode {
      FormMode::Add => " Add Item ",
      FormMode::Edit(_) => " Edit Item ",
    };
    let block = Block::default()
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Yellow))
      .title(title);
    let inner = block.inner(overlay_area);
    frame.render_widget(block, overlay_area);

    let mut lines = Vec::new();
    let mut cursor_row = 0u16;
    for field in [FormField::Name, FormField::Quantity, FormField::Category] {
      if field == self.focus {
        cursor_row = lines.len() as u16;
      }
      lines.extend(self.field_lines(field));
    }
    lines.push(Line::from(""));

    let hint = if self.submitting {
      Line::from(Span::styled("Saving...", Style::default().fg(Color::Yellow)))
    } else {
      let save = match mode {
        FormMode::Add => " add   ",
        FormMode::Edit(_) => " save   ",
      };
      Line::from(vec![
        Span::styled("<enter>", Style::default().fg(Color::Cyan)),
        Span::styled(save, Style::default().fg(Color::DarkGray)),
        Span::styled("<tab>", Style::default().fg(Color::Cyan)),
        Span::styled(" next   ", Style::default().fg(Color::DarkGray)),
        Span::styled("<esc>", Style::default().fg(Color::Cyan)),
        Span::styled(" cancel", Style::default().fg(Color::DarkGray)),
      ])
    };
    lines.push(hint);

    frame.render_widget(Paragraph::new(lines), inner);

    let cursor_col = match self.focus {
      FormField::Name => Some(self.name.cursor_position()),
      FormField::Quantity => Some(self.quantity.cursor_position()),
      FormField::Category => None,
    };
    if let (Some(col), false) = (cursor_col, self.submitting) {
      let cx = inner.x + LABEL_WIDTH + col as u16;
      let cy = inner.y + cursor_row;
      if cx < inner.right() && cy < inner.bottom() {
        frame.set_cursor_position((cx, cy));
      }
    }
  }
}
