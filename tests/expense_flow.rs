//! Expense creation, receipts and the savings goal end to end

use std::sync::Arc;

use finwise::backend::MemoryBackend;
use finwise::models::{Category, Money};
use finwise::services::{BillImage, Dashboard, ExpenseDraft, ExpenseService, GoalEditor, GoalSubmit};
use finwise::session::AppContext;
use finwise::FinwiseError;

fn signed_in() -> (Arc<MemoryBackend>, AppContext) {
    let backend = Arc::new(MemoryBackend::new());
    let ctx = AppContext::new(backend.clone());
    ctx.sign_up("asha@example.com", "secret123", "asha").unwrap();
    (backend, ctx)
}

fn images(names: &[&str]) -> Vec<BillImage> {
    names
        .iter()
        .map(|name| BillImage::new(*name, name.as_bytes().to_vec()))
        .collect()
}

#[test]
fn expense_with_two_receipts() {
    let (backend, ctx) = signed_in();
    let user = ctx.require_user().unwrap();

    let mut draft = ExpenseDraft::new();
    draft.amount = "450".into();
    draft.category = Some(Category::Food);
    draft.description = "Groceries".into();
    draft.stage_images(images(&["front.jpg", "back.png"])).unwrap();

    let expense = ExpenseService::new(&ctx).create(draft).unwrap();

    assert_eq!(backend.object_keys().len(), 2);
    assert_eq!(backend.expenses().len(), 1);
    assert_eq!(expense.amount, Money::from_units(450));
    assert_eq!(expense.bill_images.len(), 2);
    assert!(expense.bill_images[0].starts_with(&format!("{}/", user.id)));
    assert!(expense.bill_images[0].ends_with(".jpg"));
    assert!(expense.bill_images[1].ends_with(".png"));

    let stored = backend.object("bills", &expense.bill_images[1]).unwrap();
    assert_eq!(stored.bytes, b"back.png".to_vec());
}

#[test]
fn more_than_five_receipts_are_refused() {
    let mut draft = ExpenseDraft::new();
    draft
        .stage_images(images(&["1.jpg", "2.jpg", "3.jpg"]))
        .unwrap();

    let err = draft
        .stage_images(images(&["4.jpg", "5.jpg", "6.jpg", "7.jpg"]))
        .unwrap_err();
    assert!(err.to_string().contains("You can only upload up to 5 images"));
    assert_eq!(draft.images().len(), 3);
}

#[test]
fn failed_insert_reports_orphaned_uploads() {
    let (backend, ctx) = signed_in();
    backend.fail_expense_insert(true);

    let mut draft = ExpenseDraft::new();
    draft.amount = "99".into();
    draft.category = Some(Category::Shopping);
    draft.stage_images(images(&["bill.jpg"])).unwrap();

    let err = ExpenseService::new(&ctx).create(draft).unwrap_err();
    match err {
        FinwiseError::ExpenseCreationFailed {
            orphaned_uploads, ..
        } => {
            assert_eq!(orphaned_uploads.len(), 1);
            assert!(backend.object("bills", &orphaned_uploads[0]).is_some());
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(backend.expenses().is_empty());
}

#[test]
fn dashboard_tracks_goal_progress() {
    let (_, ctx) = signed_in();
    let service = ExpenseService::new(&ctx);

    for (amount, category) in [("3000", Category::Utilities), ("2500", Category::Transport)] {
        let mut draft = ExpenseDraft::new();
        draft.amount = amount.into();
        draft.category = Some(category);
        service.create(draft).unwrap();
    }

    let mut dashboard = Dashboard::new();
    dashboard.load(&ctx);
    let summary = dashboard.summary();
    assert_eq!(summary.total, Money::from_units(5500));
    assert_eq!(summary.remaining, Money::from_units(-500));
    assert!((summary.progress_percent - 110.0).abs() < 1e-9);
    assert!(summary.is_exceeded());
}

#[test]
fn goal_update_from_5000_to_8000() {
    let (backend, ctx) = signed_in();
    let user = ctx.require_user().unwrap();

    let mut dashboard = Dashboard::new();
    dashboard.load(&ctx);

    let mut editor = GoalEditor::new();
    editor.open(dashboard.profile());
    assert_eq!(editor.input(), "5000");

    editor.set_input("8000");
    let outcome = editor.submit(&ctx, &mut dashboard);

    assert_eq!(outcome, GoalSubmit::Updated(Money::from_units(8000)));
    assert!(!editor.is_editing());
    assert_eq!(
        dashboard.profile().unwrap().savings_goal,
        Money::from_units(8000)
    );
    assert_eq!(
        backend.profile(user.id).unwrap().savings_goal,
        Money::from_units(8000)
    );
}
