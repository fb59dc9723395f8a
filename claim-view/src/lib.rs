pub mod api;
pub mod config;
pub mod controller;
pub mod error;
pub mod models;
pub mod notify;
pub mod session;
pub mod upload;
pub mod views;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use api::{ClaimApi, HttpClaimApi};
pub use config::ClientConfig;
pub use controller::ViewController;
pub use error::{ClientError, Result};
pub use models::{
    Analysis, DashboardStats, Document, DocumentId, Folder, FolderId, FolderStatus, QnaEntry,
    UploadOutcome,
};
pub use notify::{BusyGuard, Control, Frontend, Notification, NotificationKind};
pub use session::{FolderTab, View, ViewState};
pub use upload::{DocumentBatch, FileRejection, PendingFile, PolicyUploadForm};
