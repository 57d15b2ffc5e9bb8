//! Edit savings goal dialog

use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::tui::app::App;
use crate::tui::layout::centered_rect_fixed;

/// Render the goal editor
pub fn render(frame: &mut Frame, app: &App) {
    let area = centered_rect_fixed(44, 8, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Monthly Goal ")
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
            Constraint::Length(1),
            Constraint::Length(1), // Input
            Constraint::Length(1),
            Constraint::Length(1), // Status
            Constraint::Length(1), // Hints
        ])
        .split(inner);

    let editor = &app.goal_editor;
    let input = Line::from(vec![
        Span::styled(
            format!(" {} ", app.settings.currency_symbol),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            editor.input(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled("█", Style::default().fg(Color::Cyan)),
    ]);
    frame.render_widget(Paragraph::new(input), chunks[1]);

    if editor.is_updating() {
        frame.render_widget(
            Paragraph::new(Span::styled(" Saving...", Style::default().fg(Color::Yellow))),
            chunks[3],
        );
    } else if let Some(ref message) = app.status_message {
        frame.render_widget(
            Paragraph::new(Span::styled(
                format!(" {}", message),
                Style::default().fg(Color::Yellow),
            )),
            chunks[3],
        );
    }

    let hints = Line::from(vec![
        Span::styled(" Enter", Style::default().fg(Color::White)),
        Span::raw(" save  "),
        Span::styled("Esc", Style::default().fg(Color::White)),
        Span::raw(" cancel"),
    ]);
    frame.render_widget(Paragraph::new(hints), chunks[4]);
}
