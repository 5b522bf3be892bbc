use crate::listing::Counts;
use crate::ui::view::ShortcutInfo;
use chrono::{DateTime, Local, Utc};
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// What the header shows about the list
#[derive(Debug, Clone, Default)]
pub struct HeaderStatus {
  pub counts: Counts,
  pub loading: bool,
  pub synced_at: Option<DateTime<Utc>>,
  /// Last sync is older than the stale time
  pub stale: bool,
  /// Mutations still waiting on the server
  pub pending: usize,
}

/// Draw the header bar with logo, context, progress, and shortcuts
pub fn draw_header(
  frame: &mut Frame,
  area: Rect,
  title: &str,
  status: &HeaderStatus,
  shortcuts: &[ShortcutInfo],
) {
  let mut spans = vec![
    Span::styled(" grocer ", Style::default().fg(Color::Cyan).bold()),
    Span::styled("│", Style::default().fg(Color::DarkGray)),
    Span::styled(format!(" {} ", title), Style::default().fg(Color::White)),
    Span::styled("│", Style::default().fg(Color::DarkGray)),
    Span::styled(
      format!(
        " {} of {} purchased ",
        status.counts.purchased, status.counts.total
      ),
      Style::default().fg(Color::Yellow).bold(),
    ),
  ];

  if status.loading {
    spans.push(Span::styled(" loading... ", Style::default().fg(Color::DarkGray)));
  } else if let Some(synced_at) = status.synced_at {
    let local: DateTime<Local> = synced_at.into();
    let color = if status.stale {
      Color::LightRed
    } else {
      Color::DarkGray
    };
    spans.push(Span::styled(
      format!(" synced {} ", local.format("%H:%M:%S")),
      Style::default().fg(color),
    ));
  }
  if status.pending > 0 {
    spans.push(Span::styled(
      format!(" saving {} ", status.pending),
      Style::default().fg(Color::Magenta),
    ));
  }

  spans.push(Span::raw(" "));

  // Shortcuts - keys highlighted, descriptions dimmed
  let mut shortcuts: Vec<&ShortcutInfo> = shortcuts.iter().collect();
  shortcuts.sort_by_key(|s| s.priority);
  for shortcut in shortcuts {
    spans.push(Span::styled(
      format!("<{}>", shortcut.key),
      Style::default().fg(Color::Cyan),
    ));
    spans.push(Span::styled(
      format!(" {}  ", shortcut.label),
      Style::default().fg(Color::DarkGray),
    ));
  }

  let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));

  frame.render_widget(paragraph, area);
}

/// Extract the host from the API URL
pub fn extract_domain(url: &str) -> &str {
  url
    .strip_prefix("https://")
    .or_else(|| url.strip_prefix("http://"))
    .unwrap_or(url)
    .split('/')
    .next()
    .unwrap_or(url)
}
