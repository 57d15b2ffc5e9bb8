//! Receipt image viewer
//!
//! A terminal cannot draw the image itself, so the viewer shows the public
//! URL of the current receipt together with the position, zoom and a
//! thumbnail strip of the other receipts.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::tui::app::App;
use crate::tui::layout::centered_rect;

/// Render the viewer
pub fn render(frame: &mut Frame, app: &App) {
    let viewer = &app.viewer;
    let area = if viewer.is_fullscreen() {
        frame.area()
    } else {
        centered_rect(70, 50, frame.area())
    };
    frame.render_widget(Clear, area);

    let title = format!(
        " Receipt {}  {}%{} ",
        viewer.position_label(),
        viewer.zoom_percent(),
        if viewer.is_fullscreen() { "  [full]" } else { "" }
    );
    let block = Block::default()
        .title(title)
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Image
            Constraint::Length(1), // Thumbnails
            Constraint::Length(1), // Hints
        ])
        .split(inner);

    let body = if viewer.is_loading() {
        vec![Line::from(Span::styled(
            "Loading...",
            Style::default().fg(Color::Yellow),
        ))]
    } else {
        match viewer.current_url(app.ctx) {
            Some(url) => vec![
                Line::from(Span::styled(
                    viewer.current_path().unwrap_or_default().to_string(),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from(Span::styled(url, Style::default().fg(Color::Blue))),
            ],
            None => vec![Line::from("No image")],
        }
    };
    frame.render_widget(
        Paragraph::new(body)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: false }),
        chunks[0],
    );

    let thumbs: Vec<Span> = (0..viewer.len())
        .map(|i| {
            let style = if i == viewer.index() {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            Span::styled(format!(" {} ", i + 1), style)
        })
        .collect();
    frame.render_widget(
        Paragraph::new(Line::from(thumbs)).alignment(Alignment::Center),
        chunks[1],
    );

    let hints = Line::from(vec![
        Span::styled("←/→", Style::default().fg(Color::White)),
        Span::raw(" move  "),
        Span::styled("+/-", Style::default().fg(Color::White)),
        Span::raw(" zoom  "),
        Span::styled("f", Style::default().fg(Color::White)),
        Span::raw(" fullscreen  "),
        Span::styled("Esc", Style::default().fg(Color::White)),
        Span::raw(" close"),
    ]);
    frame.render_widget(
        Paragraph::new(hints).alignment(Alignment::Center),
        chunks[2],
    );
}
