//! Add expense dialog
//!
//! Amount, category, description and receipt images. Images are added by
//! typing a file path and pressing Enter on the image field.

use std::path::Path;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::models::{Category, MAX_BILL_IMAGES};
use crate::services::{BillImage, ExpenseDraft};
use crate::tui::app::App;
use crate::tui::layout::centered_rect_fixed;

/// Which field is focused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExpenseField {
    #[default]
    Amount,
    Category,
    Description,
    Image,
}

impl ExpenseField {
    pub fn next(self) -> Self {
        match self {
            Self::Amount => Self::Category,
            Self::Category => Self::Description,
            Self::Description => Self::Image,
            Self::Image => Self::Amount,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Amount => Self::Image,
            Self::Category => Self::Amount,
            Self::Description => Self::Category,
            Self::Image => Self::Description,
        }
    }
}

/// State for the add expense dialog
#[derive(Debug, Clone, Default)]
pub struct ExpenseFormState {
    pub draft: ExpenseDraft,
    pub focused_field: ExpenseField,
    /// Path being typed on the image field
    pub image_path: String,
    pub error_message: Option<String>,
}

impl ExpenseFormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_field(&mut self) {
        self.focused_field = self.focused_field.next();
    }

    pub fn prev_field(&mut self) {
        self.focused_field = self.focused_field.prev();
    }

    /// Insert a typed character into the focused text field
    pub fn insert_char(&mut self, c: char) {
        match self.focused_field {
            ExpenseField::Amount => {
                if c.is_ascii_digit() || c == '.' || c == ',' {
                    self.draft.amount.push(c);
                }
            }
            ExpenseField::Description => self.draft.description.push(c),
            ExpenseField::Image => self.image_path.push(c),
            ExpenseField::Category => {}
        }
        self.error_message = None;
    }

    /// Delete the last character of the focused field; on the image field
    /// with nothing typed, unstage the last image
    pub fn backspace(&mut self) {
        match self.focused_field {
            ExpenseField::Amount => {
                self.draft.amount.pop();
            }
            ExpenseField::Description => {
                self.draft.description.pop();
            }
            ExpenseField::Image => {
                if self.image_path.pop().is_none() {
                    let count = self.draft.images().len();
                    if count > 0 {
                        self.draft.remove_image(count - 1);
                    }
                }
            }
            ExpenseField::Category => self.draft.category = None,
        }
        self.error_message = None;
    }

    /// Step through categories
    pub fn cycle_category(&mut self, forward: bool) {
        let all = Category::ALL;
        let next = match self.draft.category.and_then(|c| all.iter().position(|x| *x == c)) {
            None if forward => 0,
            None => all.len() - 1,
            Some(i) if forward => (i + 1) % all.len(),
            Some(i) => (i + all.len() - 1) % all.len(),
        };
        self.draft.category = Some(all[next]);
    }

    /// Read the typed path and stage it
    pub fn stage_typed_image(&mut self) {
        let typed = self.image_path.trim();
        if typed.is_empty() {
            return;
        }

        let result = BillImage::from_path(Path::new(typed))
            .and_then(|image| self.draft.stage_images(vec![image]));
        match result {
            Ok(()) => {
                self.image_path.clear();
                self.error_message = None;
            }
            Err(err) => self.error_message = Some(err.to_string()),
        }
    }

    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.error_message = Some(msg.into());
    }
}

/// Render the add expense dialog
pub fn render(frame: &mut Frame, app: &App) {
    let area = centered_rect_fixed(64, 17, frame.area());
    frame.render_widget(Clear, area);

    let state = &app.expense_form;

    let block = Block::default()
        .title(" Add Expense ")
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
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Amount
            Constraint::Length(1), // Category
            Constraint::Length(1), // Description
            Constraint::Length(1), // Image path
            Constraint::Length(1), // Spacer
            Constraint::Min(5),    // Staged images
            Constraint::Length(1), // Error
            Constraint::Length(1), // Hints
        ])
        .split(inner);

    let category = state
        .draft
        .category
        .map(|c| format!("{} {}", c.icon(), c.label()))
        .unwrap_or_else(|| "(choose with ←/→)".to_string());

    frame.render_widget(
        field_line("Amount", &state.draft.amount, state.focused_field == ExpenseField::Amount),
        chunks[1],
    );
    frame.render_widget(
        field_line("Category", &category, state.focused_field == ExpenseField::Category),
        chunks[2],
    );
    frame.render_widget(
        field_line(
            "Description",
            &state.draft.description,
            state.focused_field == ExpenseField::Description,
        ),
        chunks[3],
    );
    frame.render_widget(
        field_line("Image path", &state.image_path, state.focused_field == ExpenseField::Image),
        chunks[4],
    );

    let mut image_lines = vec![Line::from(Span::styled(
        format!("Receipts ({}/{})", state.draft.images().len(), MAX_BILL_IMAGES),
        Style::default().fg(Color::Yellow),
    ))];
    for image in state.draft.images() {
        image_lines.push(Line::from(format!(
            "  {} ({} bytes)",
            image.file_name,
            image.bytes.len()
        )));
    }
    frame.render_widget(Paragraph::new(image_lines), chunks[6]);

    if let Some(ref error) = state.error_message {
        frame.render_widget(
            Paragraph::new(Span::styled(error.as_str(), Style::default().fg(Color::Red))),
            chunks[7],
        );
    }

    let hints = Line::from(vec![
        Span::styled("Tab", Style::default().fg(Color::White)),
        Span::raw(" next  "),
        Span::styled("Enter", Style::default().fg(Color::White)),
        Span::raw(" add image / save  "),
        Span::styled("Ctrl+S", Style::default().fg(Color::White)),
        Span::raw(" save  "),
        Span::styled("Esc", Style::default().fg(Color::White)),
        Span::raw(" cancel"),
    ]);
    frame.render_widget(Paragraph::new(hints), chunks[8]);
}

fn field_line<'a>(label: &'a str, value: &'a str, focused: bool) -> Paragraph<'a> {
    let label_style = if focused {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };
    let cursor = if focused { "█" } else { "" };

    Paragraph::new(Line::from(vec![
        Span::styled(format!("{:>12}: ", label), label_style),
        Span::raw(value),
        Span::styled(cursor, Style::default().fg(Color::Cyan)),
    ]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_field_cycle() {
        let mut state = ExpenseFormState::new();
        for _ in 0..4 {
            state.next_field();
        }
        assert_eq!(state.focused_field, ExpenseField::Amount);
        state.prev_field();
        assert_eq!(state.focused_field, ExpenseField::Image);
    }

    #[test]
    fn test_amount_filters_input() {
        let mut state = ExpenseFormState::new();
        for c in "1a2.5".chars() {
            state.insert_char(c);
        }
        assert_eq!(state.draft.amount, "12.5");
    }

    #[test]
    fn test_cycle_category_wraps() {
        let mut state = ExpenseFormState::new();
        state.cycle_category(false);
        assert_eq!(state.draft.category, Some(Category::Others));
        state.cycle_category(true);
        assert_eq!(state.draft.category, Some(Category::Food));
    }

    #[test]
    fn test_stage_typed_image_limit() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bill.png");
        fs::write(&path, b"png").unwrap();

        let mut state = ExpenseFormState::new();
        state.focused_field = ExpenseField::Image;
        for _ in 0..MAX_BILL_IMAGES {
            state.image_path = path.display().to_string();
            state.stage_typed_image();
        }
        assert_eq!(state.draft.images().len(), MAX_BILL_IMAGES);
        assert!(state.error_message.is_none());

        state.image_path = path.display().to_string();
        state.stage_typed_image();
        assert_eq!(state.draft.images().len(), MAX_BILL_IMAGES);
        assert!(state
            .error_message
            .as_deref()
            .unwrap()
            .contains("You can only upload up to 5 images"));

        state.image_path.clear();
        state.backspace();
        assert_eq!(state.draft.images().len(), MAX_BILL_IMAGES - 1);
    }

    #[test]
    fn test_missing_file_reports_error() {
        let mut state = ExpenseFormState::new();
        state.image_path = "/definitely/not/here.png".into();
        state.stage_typed_image();
        assert!(state.error_message.is_some());
        assert!(state.draft.images().is_empty());
    }
}
