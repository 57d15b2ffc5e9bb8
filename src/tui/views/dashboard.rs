//! Dashboard view
//!
//! Greeting, the goal / spent / remaining cards, goal progress and the
//! list of expenses, newest first.

use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Gauge, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::services::BudgetSummary;
use crate::tui::app::App;
use crate::tui::layout::AppLayout;

/// Render the header with the greeting
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let name = app
        .dashboard
        .profile()
        .map(|p| p.username.clone())
        .filter(|name| !name.is_empty())
        .or_else(|| app.ctx.user().map(|u| u.display_name().to_string()))
        .unwrap_or_default();

    let block = Block::default()
        .title(" FinWise ")
        .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let greeting = Line::from(vec![
        Span::raw("Hi, "),
        Span::styled(name, Style::default().add_modifier(Modifier::BOLD)),
    ]);

    frame.render_widget(Paragraph::new(greeting).block(block), area);
}

/// Render the three summary cards
pub fn render_cards(frame: &mut Frame, app: &App, layout: &AppLayout) {
    let summary = app.dashboard.summary();
    let [goal_area, spent_area, remaining_area] = layout.card_slots();

    let goal = summary
        .goal
        .map(|g| app.settings.format_money(g))
        .unwrap_or_else(|| "-".to_string());
    render_card(frame, goal_area, "Monthly Goal", goal, Color::Cyan, "e:Edit");

    render_card(
        frame,
        spent_area,
        "Total Spent",
        app.settings.format_money(summary.total),
        Color::Yellow,
        "",
    );

    let remaining_color = if summary.remaining.is_negative() {
        Color::Red
    } else {
        Color::Green
    };
    render_card(
        frame,
        remaining_area,
        "Remaining",
        app.settings.format_money(summary.remaining),
        remaining_color,
        "",
    );
}

fn render_card(frame: &mut Frame, area: Rect, title: &str, value: String, color: Color, hint: &str) {
    let block = Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let lines = vec![
        Line::from(Span::styled(
            value,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(hint.to_string(), Style::default().fg(Color::DarkGray))),
    ];

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Render the goal progress gauge
pub fn render_progress(frame: &mut Frame, summary: &BudgetSummary, area: Rect) {
    let color = if summary.is_exceeded() {
        Color::Red
    } else {
        Color::Green
    };

    let label = match summary.goal {
        None => "No goal set".to_string(),
        Some(_) if !summary.progress_percent.is_finite() => {
            format!("Goal is zero  {}", summary.status().label())
        }
        Some(_) => format!(
            "{:.1}% of goal  {}",
            summary.progress_percent,
            summary.status().label()
        ),
    };

    let gauge = Gauge::default()
        .block(
            Block::default()
                .title(" Progress ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .gauge_style(Style::default().fg(color))
        .ratio((summary.bar_percent() / 100.0).clamp(0.0, 1.0))
        .label(label);

    frame.render_widget(gauge, area);
}

/// Render the expense list
pub fn render_expenses(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Expenses ")
        .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let expenses = app.dashboard.expenses();
    if expenses.is_empty() {
        let text = Paragraph::new("No expenses yet. Press 'a' to add one.")
            .block(block)
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(text, area);
        return;
    }

    let widths = [
        Constraint::Length(3),  // Icon
        Constraint::Length(12), // Date
        Constraint::Min(16),    // Title
        Constraint::Length(14), // Category
        Constraint::Length(12), // Amount
        Constraint::Length(4),  // Receipts
    ];

    let header = Row::new(vec![
        Cell::from(""),
        Cell::from("Date").style(Style::default().add_modifier(Modifier::BOLD)),
        Cell::from("Expense").style(Style::default().add_modifier(Modifier::BOLD)),
        Cell::from("Category").style(Style::default().add_modifier(Modifier::BOLD)),
        Cell::from("Amount").style(Style::default().add_modifier(Modifier::BOLD)),
        Cell::from("📎").style(Style::default().add_modifier(Modifier::BOLD)),
    ])
    .style(Style::default().fg(Color::Yellow))
    .height(1);

    let rows: Vec<Row> = expenses
        .iter()
        .map(|expense| {
            let receipts = if expense.has_images() {
                expense.bill_images.len().to_string()
            } else {
                String::new()
            };

            Row::new(vec![
                Cell::from(expense.category.icon()),
                Cell::from(expense.created_at.format(&app.settings.date_format).to_string()),
                Cell::from(expense.title().to_string()),
                Cell::from(expense.category.label()),
                Cell::from(app.settings.format_money(expense.amount))
                    .style(Style::default().fg(Color::Red)),
                Cell::from(receipts).style(Style::default().fg(Color::Blue)),
            ])
        })
        .collect();

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ");

    let mut state = TableState::default();
    state.select(Some(app.selected_index));

    frame.render_stateful_widget(table, area, &mut state);
}
