use super::KeyResult;
use crate::api::Category;
use crate::ui::renderfns::category_color;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Events emitted by the category bar that the parent needs to handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryBarEvent {
  /// User moved to a different tab
  SelectionChanged(Option<Category>),
}

/// Tab strip for filtering by category.
/// Tab 0 is "All", tabs 1.. follow `Category::ALL`.
#[derive(Debug, Clone, Default)]
pub struct CategoryBar {
  selected: usize,
}

impl CategoryBar {
  pub fn new() -> Self {
    Self::default()
  }

  /// The active filter. `None` when "All" is selected.
  pub fn selected(&self) -> Option<Category> {
    if self.selected == 0 {
      None
    } else {
      Category::ALL.get(self.selected - 1).copied()
    }
  }

  /// Handle a key event
  pub fn handle_key(&mut self, key: KeyEvent) -> KeyResult<CategoryBarEvent> {
    match key.code {
      KeyCode::PageUp => {
        self.navigate(-1);
        KeyResult::Event(CategoryBarEvent::SelectionChanged(self.selected()))
      }
      KeyCode::PageDown => {
        self.navigate(1);
        KeyResult::Event(CategoryBarEvent::SelectionChanged(self.selected()))
      }
      _ => KeyResult::NotHandled,
    }
  }

  /// Navigate tabs with wrapping
  fn navigate(&mut self, direction: i32) {
    let total_tabs = Category::ALL.len() + 1;

    self.selected = if direction > 0 {
      (self.selected + 1) % total_tabs
    } else if self.selected == 0 {
      total_tabs - 1
    } else {
      self.selected - 1
    };
  }

  pub fn render(&self, frame: &mut Frame, area: Rect) {
    let mut spans = vec![Span::styled("[Category] ", Style::default().fg(Color::Yellow))];

    let all_style = if self.selected == 0 {
      Style::default().fg(Color::Black).bg(Color::Cyan)
    } else {
      Style::default().fg(Color::Gray)
    };
    spans.push(Span::styled(" All ", all_style));

    for (idx, category) in Category::ALL.iter().enumerate() {
      spans.push(Span::styled("│", Style::default().fg(Color::DarkGray)));
      let style = if self.selected == idx + 1 {
        Style::default().fg(Color::Black).bg(Color::Cyan)
      } else {
        Style::default().fg(category_color(*category))
      };
      spans.push(Span::styled(format!(" {} ", category), style));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
  }
}
