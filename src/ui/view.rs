use crate::ui::renderfns::HeaderStatus;
use crossterm::event::KeyEvent;
use ratatui::prelude::*;

/// A keyboard shortcut hint for display in the header
#[derive(Debug, Clone)]
pub struct ShortcutInfo {
  pub key: &'static str,
  pub label: &'static str,
  pub priority: u8, // Lower = shown first
}

impl ShortcutInfo {
  pub const fn new(key: &'static str, label: &'static str) -> Self {
    Self {
      key,
      label,
      priority: 100,
    }
  }

  pub const fn with_priority(mut self, priority: u8) -> Self {
    self.priority = priority;
    self
  }
}

/// Actions that a view can request in response to user input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewAction {
  /// No action needed
  None,
  /// Leave the application
  Quit,
}

/// Trait for view behavior
///
/// Views handle their own input modes (forms, dialogs) and return actions
/// for the App to execute: App → View → Components.
///
/// Views that load data asynchronously poll their store in `tick()`.
pub trait View {
  /// Handle a key event, returning an action for App to execute
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction;

  /// Render the view body
  fn render(&mut self, frame: &mut Frame, area: Rect);

  /// Called on each tick to pick up finished requests
  fn tick(&mut self) {}

  /// Counts and sync state for the header
  fn header_status(&self) -> HeaderStatus {
    HeaderStatus::default()
  }

  /// Error to show in the footer, if any
  fn error(&self) -> Option<&str> {
    None
  }

  /// Last confirmation message, if any
  fn notice(&self) -> Option<&str> {
    None
  }

  /// Keyboard shortcuts to display in the header
  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    vec![ShortcutInfo::new("q", "quit").with_priority(90)]
  }
}
