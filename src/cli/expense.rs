//! Expense CLI commands

use std::path::PathBuf;

use clap::Subcommand;

use crate::config::Settings;
use crate::display::{format_expense_details, format_expense_list};
use crate::error::{FinwiseError, FinwiseResult};
use crate::models::Category;
use crate::services::{BillImage, ExpenseDraft, ExpenseService, ImageViewer};
use crate::session::AppContext;

/// Expense subcommands
#[derive(Subcommand)]
pub enum ExpenseCommands {
    /// Record a new expense
    Add {
        /// Amount (e.g., "250" or "1,250.50")
        amount: String,
        /// Category (food, transport, utilities, entertainment, shopping, others)
        #[arg(short, long)]
        category: String,
        /// Description
        #[arg(short, long)]
        description: Option<String>,
        /// Receipt image to attach (repeat for more, up to 5)
        #[arg(short, long = "image")]
        images: Vec<PathBuf>,
    },
    /// List expenses, newest first
    List {
        /// Number of expenses to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
    /// Show expense details
    Show {
        /// Expense ID (full, short "exp-…" form, or prefix)
        id: String,
    },
    /// List receipt image URLs for an expense
    Images {
        /// Expense ID
        id: String,
        /// Show only this image (1-based)
        #[arg(short, long)]
        number: Option<usize>,
    },
}

/// Handle an expense command
pub fn handle_expense_command(
    ctx: &AppContext,
    settings: &Settings,
    cmd: ExpenseCommands,
) -> FinwiseResult<()> {
    let service = ExpenseService::new(ctx);

    match cmd {
        ExpenseCommands::Add {
            amount,
            category,
            description,
            images,
        } => {
            let category: Category = category.parse().map_err(FinwiseError::Validation)?;

            let mut draft = ExpenseDraft::new();
            draft.amount = amount;
            draft.category = Some(category);
            draft.description = description.unwrap_or_default();

            let files = images
                .iter()
                .map(|path| BillImage::from_path(path))
                .collect::<FinwiseResult<Vec<_>>>()?;
            draft.stage_images(files)?;

            let expense = service.create(draft)?;
            println!("Added expense: {}", expense.title());
            println!("  Amount:   {}", settings.format_money(expense.amount));
            println!("  Category: {}", expense.category.label());
            if expense.has_images() {
                println!("  Receipts: {}", expense.bill_images.len());
            }
            println!("  ID: {}", expense.id.short());
        }

        ExpenseCommands::List { limit } => {
            let expenses = service.list()?;
            let shown = &expenses[..expenses.len().min(limit)];
            print!("{}", format_expense_list(shown, settings));
            if expenses.len() > shown.len() {
                println!("({} more; use --limit to see them)", expenses.len() - shown.len());
            }
        }

        ExpenseCommands::Show { id } => {
            let expense = service.find(&id)?;
            let urls = service.image_urls(&expense);
            print!("{}", format_expense_details(&expense, &urls, settings));
        }

        ExpenseCommands::Images { id, number } => {
            let expense = service.find(&id)?;
            if !expense.has_images() {
                println!("No receipts attached to {}.", expense.id.short());
                return Ok(());
            }

            let mut viewer = ImageViewer::new(expense.bill_images.clone());
            match number {
                Some(n) => {
                    if n == 0 || !viewer.select(n - 1) {
                        return Err(FinwiseError::Validation(format!(
                            "Image {} does not exist; this expense has {}",
                            n,
                            viewer.len()
                        )));
                    }
                    if let Some(url) = viewer.current_url(ctx) {
                        println!("{} {}", viewer.position_label(), url);
                    }
                }
                None => {
                    for _ in 0..viewer.len() {
                        if let Some(url) = viewer.current_url(ctx) {
                            println!("{} {}", viewer.position_label(), url);
                        }
                        viewer.next();
                    }
                }
            }
        }
    }

    Ok(())
}
