use crate::models::{Document, DocumentId, Folder};

use super::analysis::AnalysisPanel;
use super::dashboard::StatusBadge;
use super::format::{format_currency, format_date};
use super::qna::QnaHistory;

pub const NO_DOCUMENTS_MESSAGE: &str =
    "No documents uploaded yet. Upload bills, prescriptions, and medical reports.";
pub const FOLDER_COMPLETE_MESSAGE: &str = "Folder is 100% complete! Upload disabled.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderHeader {
    pub title: String,
    pub company: String,
    pub policy: String,
    pub completion: String,
    pub status: StatusBadge,
    /// Hidden once the folder reaches 100%.
    pub upload_enabled: bool,
}

impl From<&Folder> for FolderHeader {
    fn from(folder: &Folder) -> Self {
        Self {
            title: folder.folder_name.clone(),
            company: folder.company_name.clone().unwrap_or_default(),
            policy: format!(
                "Policy: {}",
                folder.policy_number.as_deref().unwrap_or("N/A")
            ),
            completion: format!("{}%", folder.completion_percentage),
            status: folder.status.into(),
            upload_enabled: !folder.is_complete(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyPanel {
    pub summary: String,
    pub coverage: String,
    pub expiry: String,
    pub exclusions: Vec<String>,
}

impl From<&Folder> for PolicyPanel {
    fn from(folder: &Folder) -> Self {
        Self {
            summary: folder.policy_summary.clone().unwrap_or_default(),
            coverage: folder.coverage_amount.clone().unwrap_or_default(),
            expiry: folder.expiry_date.clone().unwrap_or_default(),
            exclusions: folder.exclusions.clone(),
        }
    }
}

/// Colour band of a completeness score; boundaries belong to the higher band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletenessBucket {
    High,
    Medium,
    Low,
}

impl CompletenessBucket {
    pub fn from_score(score: i64) -> Self {
        if score >= 70 {
            CompletenessBucket::High
        } else if score >= 40 {
            CompletenessBucket::Medium
        } else {
            CompletenessBucket::Low
        }
    }

    pub fn style_class(&self) -> &'static str {
        match self {
            CompletenessBucket::High => "high",
            CompletenessBucket::Medium => "medium",
            CompletenessBucket::Low => "low",
        }
    }

    pub fn tone(&self) -> Tone {
        match self {
            CompletenessBucket::High => Tone::Success,
            CompletenessBucket::Medium => Tone::Warning,
            CompletenessBucket::Low => Tone::Danger,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Warning,
    Danger,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentItem {
    pub document_id: DocumentId,
    pub filename: String,
    pub document_type: String,
    /// Omitted when the extracted amount is zero.
    pub amount: Option<String>,
    pub uploaded_on: String,
    pub duplicate: bool,
    pub summary: Option<String>,
    /// Clamped to 0..=100 for the progress bar width.
    pub completeness: u8,
    pub completeness_label: String,
    pub bucket: CompletenessBucket,
}

impl From<&Document> for DocumentItem {
    fn from(doc: &Document) -> Self {
        let completeness = doc.completeness.clamp(0, 100) as u8;
        Self {
            document_id: doc.id,
            filename: doc.filename.clone(),
            document_type: doc
                .document_type
                .clone()
                .unwrap_or_else(|| "unknown".to_string()),
            amount: (doc.amount > 0.0).then(|| format_currency(doc.amount)),
            uploaded_on: format_date(&doc.uploaded_at),
            duplicate: doc.is_duplicate,
            summary: doc.summary.clone().filter(|s| !s.trim().is_empty()),
            completeness,
            completeness_label: format!("{}% Complete", doc.completeness),
            bucket: CompletenessBucket::from_score(doc.completeness),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentList {
    Empty { message: &'static str },
    Items(Vec<DocumentItem>),
}

impl DocumentList {
    pub fn from_documents(documents: &[Document]) -> Self {
        if documents.is_empty() {
            return DocumentList::Empty {
                message: NO_DOCUMENTS_MESSAGE,
            };
        }
        DocumentList::Items(documents.iter().map(DocumentItem::from).collect())
    }

    pub fn items(&self) -> &[DocumentItem] {
        match self {
            DocumentList::Empty { .. } => &[],
            DocumentList::Items(items) => items,
        }
    }
}

/// Everything shown for the open folder
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FolderScreen {
    pub header: Option<FolderHeader>,
    pub policy: Option<PolicyPanel>,
    pub documents: Option<DocumentList>,
    pub analysis: AnalysisPanel,
    pub qna: Option<QnaHistory>,
}
