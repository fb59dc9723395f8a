//! Client-side upload rules and the policy upload form.
//!
//! Every file is checked against the same limits before any request is built:
//! at most [`MAX_UPLOAD_BYTES`] and one of [`ACCEPTED_MIME_TYPES`]. The policy form is a
//! small state machine (`Idle` → `Validated` → `Submitting`) that the controller drives.

use std::path::Path;
use thiserror::Error;

use crate::views::format::format_megabytes;

pub const MAX_UPLOAD_BYTES: u64 = 16 * 1024 * 1024;
pub const ACCEPTED_MIME_TYPES: [&str; 4] =
    ["application/pdf", "image/jpeg", "image/jpg", "image/png"];

pub const DROP_ZONE_TITLE: &str = "Click to upload or drag and drop";
pub const DROP_ZONE_HINT: &str = "PDF, JPG, PNG (Max 16MB)";
pub const SUBMIT_LABEL: &str = "Upload & Validate Policy";
pub const SUBMITTING_LABEL: &str = "Validating & Extracting...";

/// A file picked by the user but not yet sent
#[derive(Debug, Clone, PartialEq)]
pub struct PendingFile {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl PendingFile {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            bytes,
        }
    }

    /// Read a local file, deriving its MIME type from the extension.
    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::new(name, mime_for_path(path), bytes))
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

pub fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "pdf" => "application/pdf",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        _ => "application/octet-stream",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FileRejection {
    #[error("file is {size} bytes, limit is 16 MiB")]
    TooLarge { size: u64 },
    #[error("unsupported type {mime}")]
    UnsupportedType { mime: String },
}

impl FileRejection {
    /// Wording used when a single policy file is picked.
    pub fn policy_message(&self) -> &'static str {
        match self {
            FileRejection::TooLarge { .. } => "File too large. Maximum size is 16MB",
            FileRejection::UnsupportedType { .. } => {
                "Invalid file type. Please upload PDF, JPG, or PNG"
            }
        }
    }

    /// Wording used per file in the aggregated document-upload notice.
    pub fn batch_reason(&self) -> &'static str {
        match self {
            FileRejection::TooLarge { .. } => "Too large (Max 16MB)",
            FileRejection::UnsupportedType { .. } => "Invalid type",
        }
    }
}

/// Size is checked before type.
pub fn validate_file(file: &PendingFile) -> Result<(), FileRejection> {
    if file.size() > MAX_UPLOAD_BYTES {
        return Err(FileRejection::TooLarge { size: file.size() });
    }
    if !ACCEPTED_MIME_TYPES.contains(&file.mime.as_str()) {
        return Err(FileRejection::UnsupportedType {
            mime: file.mime.clone(),
        });
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq)]
pub struct RejectedFile {
    pub name: String,
    pub rejection: FileRejection,
}

/// Result of screening a multi-file selection
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DocumentBatch {
    pub accepted: Vec<PendingFile>,
    pub rejected: Vec<RejectedFile>,
}

impl DocumentBatch {
    pub fn screen(files: Vec<PendingFile>) -> Self {
        let mut batch = Self::default();
        for file in files {
            match validate_file(&file) {
                Ok(()) => batch.accepted.push(file),
                Err(rejection) => batch.rejected.push(RejectedFile {
                    name: file.name,
                    rejection,
                }),
            }
        }
        batch
    }

    pub fn total_size(&self) -> u64 {
        self.accepted.iter().map(PendingFile::size).sum()
    }

    /// One notice listing every rejected file, or `None` when all passed.
    pub fn rejection_notice(&self) -> Option<String> {
        if self.rejected.is_empty() {
            return None;
        }
        let lines = self
            .rejected
            .iter()
            .map(|r| format!("{}: {}", r.name, r.rejection.batch_reason()))
            .collect::<Vec<_>>()
            .join("\n");
        Some(format!("Some files rejected:\n{lines}"))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum UploadPhase {
    Idle,
    Validated(PendingFile),
    Submitting(PendingFile),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultKind {
    Success,
    Error,
}

/// Inline validation result shown under the policy form
#[derive(Debug, Clone, PartialEq)]
pub struct ResultBox {
    pub kind: ResultKind,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitRefusal {
    MissingFolderName,
    MissingFile,
    AlreadySubmitting,
}

impl SubmitRefusal {
    pub fn message(&self) -> &'static str {
        match self {
            SubmitRefusal::MissingFolderName => "Please enter a folder name",
            SubmitRefusal::MissingFile => "Please select a policy document",
            SubmitRefusal::AlreadySubmitting => "Upload already in progress",
        }
    }
}

/// State of the "new policy" form for one upload session
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyUploadForm {
    pub folder_name: String,
    phase: UploadPhase,
    result: Option<ResultBox>,
}

impl Default for PolicyUploadForm {
    fn default() -> Self {
        Self {
            folder_name: String::new(),
            phase: UploadPhase::Idle,
            result: None,
        }
    }
}

impl PolicyUploadForm {
    pub fn phase(&self) -> &UploadPhase {
        &self.phase
    }

    pub fn result(&self) -> Option<&ResultBox> {
        self.result.as_ref()
    }

    pub fn selected_file(&self) -> Option<&PendingFile> {
        match &self.phase {
            UploadPhase::Idle => None,
            UploadPhase::Validated(file) | UploadPhase::Submitting(file) => Some(file),
        }
    }

    pub fn submit_enabled(&self) -> bool {
        matches!(self.phase, UploadPhase::Validated(_))
    }

    pub fn submit_label(&self) -> &'static str {
        match self.phase {
            UploadPhase::Submitting(_) => SUBMITTING_LABEL,
            _ => SUBMIT_LABEL,
        }
    }

    /// Drop-zone title and hint: defaults when empty, file name and size once picked.
    pub fn drop_zone_label(&self) -> (String, String) {
        match self.selected_file() {
            Some(file) => (file.name.clone(), format_megabytes(file.size())),
            None => (DROP_ZONE_TITLE.to_string(), DROP_ZONE_HINT.to_string()),
        }
    }

    /// A rejected file leaves the current phase untouched.
    pub fn select_file(&mut self, file: PendingFile) -> Result<(), FileRejection> {
        validate_file(&file)?;
        if !matches!(self.phase, UploadPhase::Submitting(_)) {
            self.phase = UploadPhase::Validated(file);
        }
        Ok(())
    }

    /// Check the guard conditions and move to `Submitting`, handing back what to send.
    pub fn begin_submit(&mut self) -> Result<(String, PendingFile), SubmitRefusal> {
        let name = self.folder_name.trim().to_string();
        if name.is_empty() {
            return Err(SubmitRefusal::MissingFolderName);
        }
        let file = match &self.phase {
            UploadPhase::Idle => return Err(SubmitRefusal::MissingFile),
            UploadPhase::Submitting(_) => return Err(SubmitRefusal::AlreadySubmitting),
            UploadPhase::Validated(file) => file.clone(),
        };
        self.phase = UploadPhase::Submitting(file.clone());
        Ok((name, file))
    }

    /// Back to `Validated` with the error shown inline.
    pub fn fail(&mut self, message: impl Into<String>) {
        if let UploadPhase::Submitting(file) = &self.phase {
            self.phase = UploadPhase::Validated(file.clone());
        }
        self.result = Some(ResultBox {
            kind: ResultKind::Error,
            message: format!("✗ {}", message.into()),
        });
    }

    pub fn succeed(&mut self, message: impl Into<String>) {
        self.result = Some(ResultBox {
            kind: ResultKind::Success,
            message: format!("✓ {}", message.into()),
        });
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
