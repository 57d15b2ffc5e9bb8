//! Help dialog
//!
//! Shows keyboard shortcuts

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::tui::layout::centered_rect;

/// Render the help dialog
pub fn render(frame: &mut Frame) {
    let area = centered_rect(60, 70, frame.area());

    // Clear the background
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Help ")
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let paragraph = Paragraph::new(help_lines())
        .block(block)
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, area);
}

fn help_lines() -> Vec<Line<'static>> {
    vec![
        section("Dashboard"),
        Line::from(""),
        key_line("q", "Quit"),
        key_line("?", "Show/hide help"),
        key_line("j/k", "Move selection down/up"),
        key_line("g/G", "Go to top/bottom"),
        key_line("r", "Reload expenses"),
        key_line("e", "Edit monthly goal"),
        key_line("a", "Add expense"),
        key_line("v/Enter", "View receipts"),
        Line::from(""),
        section("Add Expense"),
        Line::from(""),
        key_line("Tab", "Next field"),
        key_line("←/→", "Change category"),
        key_line("Enter", "Attach typed image path, or save"),
        key_line("Ctrl+S", "Save"),
        Line::from(""),
        section("Receipt Viewer"),
        Line::from(""),
        key_line("h/l", "Previous/next receipt"),
        key_line("1-5", "Jump to receipt"),
        key_line("+/-", "Zoom in/out"),
        key_line("f", "Toggle fullscreen"),
        Line::from(""),
        Line::from(Span::styled(
            "Press Esc or ? to close",
            Style::default().fg(Color::White),
        )),
    ]
}

fn section(title: &'static str) -> Line<'static> {
    Line::from(vec![Span::styled(
        title,
        Style::default()
            .add_modifier(Modifier::BOLD)
            .fg(Color::Yellow),
    )])
}

fn key_line(key: &'static str, description: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("{:>10}", key),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::raw(description),
    ])
}
