//! Status bar view
//!
//! Shows the signed-in account, any status message and key hints

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::tui::app::App;

/// Render the status bar
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![];

    let email = app.ctx.user().map(|u| u.email).unwrap_or_default();
    spans.push(Span::styled(format!(" {} ", email), Style::default().fg(Color::Cyan)));

    spans.push(Span::raw("│ "));
    spans.push(Span::styled(
        format!("{} expenses", app.dashboard.expenses().len()),
        Style::default().fg(Color::White),
    ));

    if let Some(ref message) = app.status_message {
        spans.push(Span::raw(" │ "));
        spans.push(Span::styled(
            message.as_str(),
            Style::default().fg(Color::Yellow),
        ));
    }

    let hints = " q:Quit  a:Add  e:Goal  v:Receipts  ?:Help ";

    let left_len: usize = spans.iter().map(|s| s.content.chars().count()).sum();
    let padding_len = (area.width as usize).saturating_sub(left_len + hints.len());
    spans.push(Span::raw(" ".repeat(padding_len.max(1))));
    spans.push(Span::styled(hints, Style::default().fg(Color::White)));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
