use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Draw the footer bar. An error outranks a notice.
pub fn draw_footer(frame: &mut Frame, area: Rect, error: Option<&str>, notice: Option<&str>) {
  let line = match (error, notice) {
    (Some(error), _) => Line::from(vec![
      Span::styled(" ✗ ", Style::default().fg(Color::Red).bold()),
      Span::styled(error.to_string(), Style::default().fg(Color::Red)),
      Span::styled("  <x>", Style::default().fg(Color::Cyan)),
      Span::styled(" dismiss", Style::default().fg(Color::DarkGray)),
    ]),
    (None, Some(notice)) => Line::from(vec![
      Span::styled(" ✓ ", Style::default().fg(Color::Green).bold()),
      Span::styled(notice.to_string(), Style::default().fg(Color::Green)),
    ]),
    (None, None) => Line::from(""),
  };

  let paragraph = Paragraph::new(line).style(Style::default().bg(Color::Black));

  frame.render_widget(paragraph, area);
}
