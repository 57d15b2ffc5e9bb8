//! Expense creation
//!
//! [`ExpenseDraft`] collects what the user typed and the receipt images they
//! picked. [`ExpenseCreation`] turns a draft into a stored expense: upload the
//! images one at a time, then insert the record referencing them.
//!
//! Uploads are not rolled back when a later step fails. The paths of such
//! orphaned objects are logged and returned in the error.

use std::fmt;
use std::fs;
use std::path::Path;

use chrono::Utc;

use crate::error::{FinwiseError, FinwiseResult};
use crate::models::{Category, Expense, Money, NewExpense, UserId, MAX_BILL_IMAGES};
use crate::session::AppContext;

/// A receipt image picked for upload
#[derive(Clone, PartialEq, Eq)]
pub struct BillImage {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl BillImage {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// Read an image from disk
    pub fn from_path(path: &Path) -> FinwiseResult<Self> {
        let bytes = fs::read(path).map_err(|e| {
            FinwiseError::Io(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        Ok(Self::new(file_name, bytes))
    }

    /// Extension of the original file name, without the dot
    pub fn extension(&self) -> Option<&str> {
        Path::new(&self.file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .filter(|ext| !ext.is_empty())
    }

    pub fn content_type(&self) -> &'static str {
        match self
            .extension()
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("png") => "image/png",
            Some("jpg") | Some("jpeg") => "image/jpeg",
            Some("gif") => "image/gif",
            Some("webp") => "image/webp",
            Some("heic") => "image/heic",
            Some("bmp") => "image/bmp",
            Some("pdf") => "application/pdf",
            _ => "application/octet-stream",
        }
    }
}

impl fmt::Debug for BillImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BillImage")
            .field("file_name", &self.file_name)
            .field("size", &self.bytes.len())
            .finish()
    }
}

/// Random object path under the user's folder, keeping the extension
pub fn object_path(user_id: UserId, image: &BillImage) -> String {
    let name = format!("{:016x}", rand::random::<u64>());
    match image.extension() {
        Some(ext) => format!("{}/{}.{}", user_id, name, ext),
        None => format!("{}/{}", user_id, name),
    }
}

/// Form state for a new expense
#[derive(Debug, Clone, Default)]
pub struct ExpenseDraft {
    pub amount: String,
    pub category: Option<Category>,
    pub description: String,
    images: Vec<BillImage>,
}

impl ExpenseDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn images(&self) -> &[BillImage] {
        &self.images
    }

    /// Add picked images to the staged set
    ///
    /// A selection that would take the total past the limit is rejected as a
    /// whole and the staged set is left as it was.
    pub fn stage_images(&mut self, files: Vec<BillImage>) -> FinwiseResult<()> {
        if self.images.len() + files.len() > MAX_BILL_IMAGES {
            return Err(FinwiseError::Validation(format!(
                "You can only upload up to {} images",
                MAX_BILL_IMAGES
            )));
        }
        self.images.extend(files);
        Ok(())
    }

    pub fn remove_image(&mut self, index: usize) -> Option<BillImage> {
        if index < self.images.len() {
            Some(self.images.remove(index))
        } else {
            None
        }
    }

    /// Check the typed fields
    pub fn validate(&self) -> FinwiseResult<(Money, Category)> {
        let amount = Money::parse(&self.amount)
            .ok()
            .filter(Money::is_positive)
            .ok_or_else(|| FinwiseError::Validation("Please enter a valid amount".into()))?;
        let category = self
            .category
            .ok_or_else(|| FinwiseError::Validation("Please select a category".into()))?;
        Ok((amount, category))
    }
}

/// Where an [`ExpenseCreation`] is
#[derive(Debug, Clone, PartialEq)]
pub enum CreationState {
    Idle,
    UploadingImages { uploaded: usize, total: usize },
    InsertingRecord,
    Done(Expense),
    Failed { reason: String },
}

impl CreationState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done(_) | Self::Failed { .. })
    }
}

impl fmt::Display for CreationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "ready"),
            Self::UploadingImages { uploaded, total } => {
                write!(f, "uploading image {} of {}", uploaded + 1, total)
            }
            Self::InsertingRecord => write!(f, "saving expense"),
            Self::Done(_) => write!(f, "done"),
            Self::Failed { reason } => write!(f, "failed: {}", reason),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Validated {
    user_id: UserId,
    amount: Money,
    category: Category,
}

/// Upload-then-insert state machine for one submission
pub struct ExpenseCreation<'a> {
    ctx: &'a AppContext,
    draft: ExpenseDraft,
    state: CreationState,
    validated: Option<Validated>,
    uploaded: Vec<String>,
    error: Option<FinwiseError>,
}

impl<'a> ExpenseCreation<'a> {
    pub fn new(ctx: &'a AppContext, draft: ExpenseDraft) -> Self {
        Self {
            ctx,
            draft,
            state: CreationState::Idle,
            validated: None,
            uploaded: Vec::new(),
            error: None,
        }
    }

    pub fn state(&self) -> &CreationState {
        &self.state
    }

    /// Object paths uploaded so far, in upload order
    pub fn uploaded_paths(&self) -> &[String] {
        &self.uploaded
    }

    /// Uploaded objects no expense refers to (only after a failure)
    pub fn orphaned_uploads(&self) -> &[String] {
        match self.state {
            CreationState::Failed { .. } => &self.uploaded,
            _ => &[],
        }
    }

    /// Perform one transition; returns `false` once terminal
    pub fn advance(&mut self) -> bool {
        let next = match self.state {
            CreationState::Done(_) | CreationState::Failed { .. } => return false,
            CreationState::Idle => self.start(),
            CreationState::UploadingImages { uploaded, total } => self.upload_next(uploaded, total),
            CreationState::InsertingRecord => self.insert(),
        };

        self.state = match next {
            Ok(state) => state,
            Err(err) => self.fail(err),
        };
        true
    }

    /// Drive to a terminal state
    pub fn run(mut self) -> FinwiseResult<Expense> {
        while self.advance() {
            tracing::debug!(state = %self.state, "expense creation step");
        }
        self.into_result()
    }

    /// Final outcome
    ///
    /// Validation problems come back unchanged; anything after that becomes
    /// [`FinwiseError::ExpenseCreationFailed`] carrying the orphaned uploads.
    pub fn into_result(self) -> FinwiseResult<Expense> {
        match (self.state, self.error) {
            (CreationState::Done(expense), _) => Ok(expense),
            (_, Some(err @ (FinwiseError::Validation(_) | FinwiseError::NotAuthenticated))) => {
                Err(err)
            }
            (CreationState::Failed { reason }, _) => Err(FinwiseError::ExpenseCreationFailed {
                reason,
                orphaned_uploads: self.uploaded,
            }),
            (state, _) => Err(FinwiseError::ExpenseCreationFailed {
                reason: format!("stopped while {}", state),
                orphaned_uploads: self.uploaded,
            }),
        }
    }

    fn start(&mut self) -> FinwiseResult<CreationState> {
        let user = self.ctx.require_user()?;
        let (amount, category) = self.draft.validate()?;
        if self.draft.images.len() > MAX_BILL_IMAGES {
            return Err(FinwiseError::Validation(format!(
                "You can only upload up to {} images",
                MAX_BILL_IMAGES
            )));
        }

        self.validated = Some(Validated {
            user_id: user.id,
            amount,
            category,
        });

        let total = self.draft.images.len();
        Ok(if total == 0 {
            CreationState::InsertingRecord
        } else {
            CreationState::UploadingImages { uploaded: 0, total }
        })
    }

    fn upload_next(&mut self, uploaded: usize, total: usize) -> FinwiseResult<CreationState> {
        let validated = self.validated()?;
        let image = self
            .draft
            .images
            .get(uploaded)
            .ok_or_else(|| FinwiseError::Validation("staged image missing".into()))?;

        let path = object_path(validated.user_id, image);
        let stored = self.ctx.backend().upload_object(
            self.ctx.bills_bucket(),
            &path,
            &image.bytes,
            image.content_type(),
        )?;
        tracing::debug!(path = %stored, file = %image.file_name, "receipt uploaded");
        self.uploaded.push(stored);

        let uploaded = uploaded + 1;
        Ok(if uploaded == total {
            CreationState::InsertingRecord
        } else {
            CreationState::UploadingImages { uploaded, total }
        })
    }

    fn insert(&mut self) -> FinwiseResult<CreationState> {
        let validated = self.validated()?;
        let expense = NewExpense {
            user_id: validated.user_id,
            amount: validated.amount,
            category: validated.category,
            description: self.draft.description.trim().to_string(),
            bill_images: self.uploaded.clone(),
            created_at: Utc::now(),
        };
        expense
            .validate()
            .map_err(|e| FinwiseError::Validation(e.to_string()))?;

        let stored = self.ctx.backend().insert_expense(&expense)?;
        tracing::info!(expense_id = %stored.id, amount = %stored.amount, "expense added");
        Ok(CreationState::Done(stored))
    }

    fn validated(&self) -> FinwiseResult<Validated> {
        self.validated
            .ok_or_else(|| FinwiseError::Validation("expense was not validated".into()))
    }

    fn fail(&mut self, err: FinwiseError) -> CreationState {
        if !self.uploaded.is_empty() {
            tracing::warn!(orphaned = ?self.uploaded, "receipt uploads left without an expense");
        }
        tracing::error!(error = %err, "Error adding expense");

        let reason = err.to_string();
        self.error = Some(err);
        CreationState::Failed { reason }
    }
}
