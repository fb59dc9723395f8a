use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FolderId(pub i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(pub i64);

impl fmt::Display for FolderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Backend fields filled from model output may arrive as `null`; treat that like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Whole-number percentage; fractional scores are rounded and `null` reads as zero.
fn rounded_percent<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<f64>::deserialize(deserializer)?;
    Ok(value.map(|v| v.round() as i64).unwrap_or_default())
}

/// Claim progress as assigned by the backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FolderStatus {
    Valid,
    #[default]
    Ongoing,
    Completed,
    #[serde(alias = "fraud-suspected")]
    Fraud,
    #[serde(other)]
    Unknown,
}

impl FolderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FolderStatus::Valid => "valid",
            FolderStatus::Ongoing => "ongoing",
            FolderStatus::Completed => "completed",
            FolderStatus::Fraud => "fraud",
            FolderStatus::Unknown => "unknown",
        }
    }
}

/// A claim case: one policy document plus its supporting documents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Folder {
    pub id: FolderId,
    pub folder_name: String,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub policy_number: Option<String>,
    #[serde(default)]
    pub coverage_amount: Option<String>,
    #[serde(default)]
    pub policy_type: Option<String>,
    #[serde(default)]
    pub expiry_date: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub exclusions: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub required_documents: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: FolderStatus,
    #[serde(default, deserialize_with = "rounded_percent")]
    pub completion_percentage: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub document_count: u64,
    #[serde(default)]
    pub policy_summary: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub policy_validated: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Folder {
    /// Uploads are closed once every required document is in.
    pub fn is_complete(&self) -> bool {
        self.completion_percentage >= 100
    }
}

/// Supporting document (bill, prescription, report) inside a folder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    #[serde(default)]
    pub folder_id: Option<FolderId>,
    pub filename: String,
    #[serde(default)]
    pub document_type: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub amount: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub uploaded_at: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_duplicate: bool,
    #[serde(default, deserialize_with = "rounded_percent")]
    pub completeness: i64,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub extracted_data: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub item: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub completed: bool,
}

/// Coverage estimate and claim guidance generated for a folder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_bill_amount: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub covered_amount: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub user_pays: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub fraud_warnings: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub missing_documents: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub exclusions_found: Vec<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub checklist: Vec<ChecklistItem>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub claim_guide: Vec<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QnaEntry {
    #[serde(default)]
    pub id: Option<i64>,
    pub question: String,
    pub answer: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub created_at: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total: u64,
    pub valid: u64,
    pub ongoing: u64,
    pub completed: u64,
    pub fraud: u64,
}

/// Body of `POST /upload-policy`; only the new folder's id is relied upon.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedFolder {
    pub id: FolderId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailedUpload {
    #[serde(default, deserialize_with = "null_as_default")]
    pub filename: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub reason: String,
}

/// Entry of the `uploaded` list; only counted, so nothing beyond the name is required.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UploadedDocument {
    #[serde(default)]
    pub id: Option<DocumentId>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub filename: String,
}

/// Body of `POST /folders/{id}/upload`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UploadOutcome {
    #[serde(default, deserialize_with = "null_as_default")]
    pub uploaded: Vec<UploadedDocument>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub failed: Vec<FailedUpload>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AskRequest<'a> {
    pub question: &'a str,
}

/// `{ "error": ... }` body returned with non-2xx statuses
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}
