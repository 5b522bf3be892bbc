use crate::api::{ApiError, HttpBackend, Item};
use crate::listing::{bulk_notice, filter_items, Counts, EditTarget, ErrorBanner};
use crate::store::{ItemStore, Mutation, MutationKind, StoreEvent};
use crate::ui::components::{
  CategoryBar, CategoryBarEvent, ConfirmDialog, ConfirmEvent, ItemForm, ItemFormEvent, KeyResult,
};
use crate::ui::ensure_valid_selection;
use crate::ui::renderfns::{category_color, truncate, HeaderStatus};
use crate::ui::view::{ShortcutInfo, View, ViewAction};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use tracing::info;

const CLEAR_TITLE: &str = "Clear List";
const CLEAR_MESSAGE: &str =
  "Are you sure you want to delete all items? This action cannot be undone.";
const NOT_EDITABLE: &str = "Purchased items cannot be edited";

/// The grocery list: filter tabs, the item list, and the add/edit form
pub struct GroceryListView<B> {
  store: ItemStore<B>,

  // UI state
  list_state: ListState,
  edit: EditTarget,
  banner: ErrorBanner,
  /// The banner currently shows a list fetch failure
  banner_from_load: bool,
  notice: Option<String>,
  /// A bulk action is waiting on the server
  bulk_pending: bool,

  // Components
  categories: CategoryBar,
  form: ItemForm,
  confirm: ConfirmDialog,
}

impl<B: HttpBackend + Clone> GroceryListView<B> {
  pub fn new(mut store: ItemStore<B>) -> Self {
    // Start fetching immediately
    store.fetch();

    Self {
      store,
      list_state: ListState::default(),
      edit: EditTarget::default(),
      banner: ErrorBanner::default(),
      banner_from_load: false,
      notice: None,
      bulk_pending: false,
      categories: CategoryBar::new(),
      form: ItemForm::new(),
      confirm: ConfirmDialog::new(),
    }
  }

  /// Items under the current filter, in display order
  fn visible(&self) -> Vec<&Item> {
    filter_items(&self.store.items(), self.categories.selected())
  }

  fn selected_item(&self) -> Option<&Item> {
    let idx = self.list_state.selected()?;
    self.visible().get(idx).copied()
  }

  fn raise(&mut self, error: &ApiError) {
    self.banner.raise(error.to_string());
    self.banner_from_load = false;
  }

  fn dispatch(&mut self, mutation: Mutation) {
    if matches!(
      mutation,
      Mutation::DeleteAll | Mutation::SetAllPurchased(_)
    ) {
      self.bulk_pending = true;
    }
    self.store.dispatch(mutation);
  }

  fn toggle_selected(&mut self) {
    let Some(id) = self.selected_item().map(|i| i.id) else {
      return;
    };
    if let Err(err) = self.store.dispatch_toggle(id) {
      self.raise(&err);
    }
  }

  fn edit_selected(&mut self) {
    let Some(item) = self.selected_item().cloned() else {
      return;
    };
    if !self.edit.open(&item) {
      self.notice = Some(NOT_EDITABLE.to_string());
      return;
    }
    if let Some(target) = self.edit.item() {
      self.form.open_edit(target);
    }
  }

  fn delete_selected(&mut self) {
    if let Some(id) = self.selected_item().map(|i| i.id) {
      self.dispatch(Mutation::Delete(id));
    }
  }

  fn on_store_event(&mut self, event: StoreEvent) {
    match event {
      StoreEvent::Loaded => {
        if self.banner_from_load {
          self.banner.resolve();
          self.banner_from_load = false;
        }
      }
      StoreEvent::LoadFailed(err) => {
        self.banner.raise(err.to_string());
        self.banner_from_load = true;
      }
      StoreEvent::Mutated { kind, result } => {
        if matches!(kind, MutationKind::DeleteAll | MutationKind::SetAllPurchased(_)) {
          self.bulk_pending = false;
        }
        let from_form =
          matches!(kind, MutationKind::Create | MutationKind::Update) && self.form.is_submitting();

        match result {
          Ok(outcome) => {
            if from_form {
              self.form.succeeded();
              if !self.form.is_active() {
                self.edit.close();
              }
            }
            if let Some(notice) = bulk_notice(&outcome) {
              info!(%notice, "bulk action finished");
              self.notice = Some(notice);
            }
          }
          Err(err) => {
            if from_form {
              self.form.failed(&err);
              if err.is_validation() && ItemForm::shows_all(err.field_errors()) {
                return;
              }
            }
            self.raise(&err);
          }
        }
      }
    }
  }

  fn render_list(&mut self, frame: &mut Frame, area: Rect) {
    let filter = self.categories.selected();
    let len = self.visible().len();
    ensure_valid_selection(&mut self.list_state, len);

    let title = match filter {
      Some(category) => format!(" Items [{}] ({}) ", category, len),
      None => format!(" Items ({}) ", len),
    };
    let block = Block::default()
      .title(title)
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    if self.store.is_initial_load() {
      let paragraph = Paragraph::new("Loading...")
        .alignment(Alignment::Center)
        .block(block)
        .style(Style::default().fg(Color::DarkGray));
      frame.render_widget(paragraph, area);
      return;
    }

    if len == 0 {
      let content = if self.store.raw().is_empty() && self.store.load_error().is_some() {
        vec![Line::from("Failed to load items. Press 'r' to retry.")]
      } else if let Some(category) = filter {
        vec![Line::from(format!("No {} items.", category))]
      } else {
        vec![
          Line::from(Span::styled("No items yet", Style::default().bold())),
          Line::from("Add your first grocery item to get started (press 'a')"),
        ]
      };
      let paragraph = Paragraph::new(content)
        .alignment(Alignment::Center)
        .block(block)
        .style(Style::default().fg(Color::DarkGray));
      frame.render_widget(paragraph, area);
      return;
    }

    let name_width = (area.width as usize).saturating_sub(30).clamp(10, 60);
    let items: Vec<ListItem> = self
      .visible()
      .iter()
      .map(|item| {
        let (check, name_style) = if item.purchased {
          (
            "[x]",
            Style::default()
              .fg(Color::DarkGray)
              .add_modifier(Modifier::CROSSED_OUT),
          )
        } else {
          ("[ ]", Style::default().fg(Color::White))
        };

        let line = Line::from(vec![
          Span::styled(check, Style::default().fg(Color::Green)),
          Span::raw(" "),
          Span::styled(
            format!(
              "{:<width$}",
              truncate(&item.name, name_width),
              width = name_width
            ),
            name_style,
          ),
          Span::styled(
            format!("{:>4}", item.quantity),
            Style::default().fg(Color::Cyan),
          ),
          Span::raw("  "),
          Span::styled(
            item.category.as_str(),
            Style::default().fg(category_color(item.category)),
          ),
        ]);
        ListItem::new(line)
      })
      .collect();

    let list = List::new(items)
      .block(block)
      .highlight_style(
        Style::default()
          .bg(Color::DarkGray)
          .add_modifier(Modifier::BOLD),
      )
      .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut self.list_state);
  }
}

impl<B: HttpBackend + Clone> View for GroceryListView<B> {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    // Overlays first: the confirm dialog, then the form
    match self.confirm.handle_key(key) {
      KeyResult::Event(ConfirmEvent::Confirmed) => {
        self.dispatch(Mutation::DeleteAll);
        return ViewAction::None;
      }
      KeyResult::Event(ConfirmEvent::Cancelled) | KeyResult::Handled => return ViewAction::None,
      KeyResult::NotHandled => {}
    }

    match self.form.handle_key(key) {
      KeyResult::Event(ItemFormEvent::Submit(mutation)) => {
        self.dispatch(mutation);
        return ViewAction::None;
      }
      KeyResult::Event(ItemFormEvent::Cancelled) => {
        self.edit.close();
        return ViewAction::None;
      }
      KeyResult::Handled => return ViewAction::None,
      KeyResult::NotHandled => {}
    }

    if let KeyResult::Event(CategoryBarEvent::SelectionChanged(_)) = self.categories.handle_key(key)
    {
      self.list_state.select(Some(0));
      return ViewAction::None;
    }

    // Normal mode key handling
    match key.code {
      KeyCode::Char('j') | KeyCode::Down => self.list_state.select_next(),
      KeyCode::Char('k') | KeyCode::Up => self.list_state.select_previous(),
      KeyCode::Char('g') | KeyCode::Home => self.list_state.select_first(),
      KeyCode::Char('G') | KeyCode::End => {
        let len = self.visible().len();
        if len > 0 {
          self.list_state.select(Some(len - 1));
        }
      }
      KeyCode::Char(' ') | KeyCode::Enter => self.toggle_selected(),
      KeyCode::Char('a') => self.form.open_add(),
      KeyCode::Char('e') => self.edit_selected(),
      KeyCode::Char('d') | KeyCode::Delete => self.delete_selected(),
      KeyCode::Char('D') => {
        if !self.bulk_pending {
          self.confirm.show(CLEAR_TITLE, CLEAR_MESSAGE, "Delete All");
        }
      }
      KeyCode::Char('p') => {
        if !self.bulk_pending {
          self.dispatch(Mutation::SetAllPurchased(true));
        }
      }
      KeyCode::Char('u') => {
        if !self.bulk_pending {
          self.dispatch(Mutation::SetAllPurchased(false));
        }
      }
      KeyCode::Char('r') => self.store.refetch(),
      KeyCode::Char('x') => self.banner.dismiss(),
      KeyCode::Char('q') | KeyCode::Esc => return ViewAction::Quit,
      _ => {}
    }
    ViewAction::None
  }

  fn render(&mut self, frame: &mut Frame, area: Rect) {
    let chunks = Layout::default()
      .direction(Direction::Vertical)
      .constraints([
        Constraint::Length(1), // Category tabs
        Constraint::Min(1),    // Items
      ])
      .split(area);

    self.categories.render(frame, chunks[0]);
    self.render_list(frame, chunks[1]);

    self.form.render_overlay(frame, area);
    self.confirm.render_overlay(frame, area);
  }

  fn tick(&mut self) {
    for event in self.store.poll() {
      self.on_store_event(event);
    }
    let len = self.visible().len();
    ensure_valid_selection(&mut self.list_state, len);
  }

  fn header_status(&self) -> HeaderStatus {
    HeaderStatus {
      counts: Counts::of(self.store.raw()),
      loading: self.store.is_loading(),
      synced_at: self.store.synced_at(),
      stale: self.store.is_stale(),
      pending: self.store.in_flight(),
    }
  }

  fn error(&self) -> Option<&str> {
    self.banner.visible()
  }

  fn notice(&self) -> Option<&str> {
    self.notice.as_deref()
  }

  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    if self.confirm.is_active() {
      return vec![
        ShortcutInfo::new("y", "confirm").with_priority(10),
        ShortcutInfo::new("n/esc", "cancel").with_priority(20),
      ];
    }
    if self.form.is_active() {
      let save = if self.edit.is_open() { "save" } else { "add" };
      return vec![
        ShortcutInfo::new("enter", save).with_priority(10),
        ShortcutInfo::new("tab", "next field").with_priority(20),
        ShortcutInfo::new("esc", "cancel").with_priority(30),
      ];
    }
    vec![
      ShortcutInfo::new("a", "add").with_priority(10),
      ShortcutInfo::new("e", "edit").with_priority(20),
      ShortcutInfo::new("space", "toggle").with_priority(30),
      ShortcutInfo::new("d", "delete").with_priority(40),
      ShortcutInfo::new("p/u", "all purchased/not").with_priority(50),
      ShortcutInfo::new("D", "clear").with_priority(60),
      ShortcutInfo::new("pgup/pgdn", "category").with_priority(70),
      ShortcutInfo::new("r", "refresh").with_priority(80),
      ShortcutInfo::new("q", "quit").with_priority(90),
    ]
  }
}
