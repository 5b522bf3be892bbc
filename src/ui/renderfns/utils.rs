use crate::api::Category;
use ratatui::prelude::{Color, Rect};

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max_len: usize) -> String {
  if s.chars().count() <= max_len {
    s.to_string()
  } else {
    let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", kept)
  }
}

/// Get the display color for a category
pub fn category_color(category: Category) -> Color {
  match category {
    Category::Produce => Color::Green,
    Category::Dairy => Color::LightBlue,
    Category::Meat => Color::Red,
    Category::Pantry => Color::Yellow,
    Category::Bakery => Color::LightMagenta,
    Category::Other => Color::Gray,
  }
}

/// Center a `width` x `height` box in `area`, shrinking it to fit
pub fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
  let width = width.min(area.width);
  let height = height.min(area.height);
  Rect::new(
    area.x + (area.width - width) / 2,
    area.y + (area.height - height) / 2,
    width,
    height,
  )
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_truncate_short_string() {
    assert_eq!(truncate("hello", 10), "hello");
  }

  #[test]
  fn test_truncate_exact_length() {
    assert_eq!(truncate("hello", 5), "hello");
  }

  #[test]
  fn test_truncate_long_string() {
    assert_eq!(truncate("hello world", 8), "hello...");
  }

  #[test]
  fn test_truncate_multibyte() {
    assert_eq!(truncate("crème fraîche", 8), "crème...");
  }

  #[test]
  fn test_category_colors_are_distinct() {
    let colors: std::collections::HashSet<String> = Category::ALL
      .iter()
      .map(|c| format!("{:?}", category_color(*c)))
      .collect();
    assert_eq!(colors.len(), Category::ALL.len());
  }

  #[test]
  fn test_centered_rect_fits_inside_area() {
    let area = Rect::new(2, 1, 40, 20);
    assert_eq!(centered_rect(area, 20, 10), Rect::new(12, 6, 20, 10));
  }

  #[test]
  fn test_centered_rect_shrinks_to_small_area() {
    let area = Rect::new(0, 0, 16, 4);
    let rect = centered_rect(area, 24, 5);
    assert_eq!(rect, area);
    assert_eq!(rect.intersection(area), rect);
  }
}
