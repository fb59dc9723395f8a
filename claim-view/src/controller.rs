use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::api::ClaimApi;
use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::models::{DashboardStats, DocumentId, Folder, FolderId, UploadOutcome};
use crate::notify::{BusyGuard, Control, Frontend, Notification};
use crate::session::{FolderTab, View, ViewState};
use crate::upload::{DocumentBatch, PendingFile, PolicyUploadForm, SUBMITTING_LABEL};
use crate::views::folder::FOLDER_COMPLETE_MESSAGE;
use crate::views::format::format_megabytes;
use crate::views::{
    AnalysisPanel, AnalysisReport, DashboardScreen, DocumentList, FolderList, FolderScreen,
    QnaHistory,
};

pub const DELETE_FOLDER_PROMPT: &str =
    "Delete this folder and all its documents? This action cannot be undone.";
pub const DELETE_DOCUMENT_PROMPT: &str = "Delete this document?";

/// Drives the three screens: owns the view state, issues backend requests and keeps the
/// rendered view models current.
///
/// Every public operation handles its own failures: it logs, notifies the front end and
/// leaves the previous (possibly stale) view models in place. Nothing is returned upward.
pub struct ViewController {
    api: Arc<dyn ClaimApi>,
    frontend: Arc<dyn Frontend>,
    redirect_delay: Duration,
    state: ViewState,
    dashboard: DashboardScreen,
    folder: FolderScreen,
}

impl ViewController {
    pub fn new(api: Arc<dyn ClaimApi>, frontend: Arc<dyn Frontend>, config: &ClientConfig) -> Self {
        Self {
            api,
            frontend,
            redirect_delay: config.redirect_delay,
            state: ViewState::new(),
            dashboard: DashboardScreen::default(),
            folder: FolderScreen::default(),
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn dashboard(&self) -> &DashboardScreen {
        &self.dashboard
    }

    pub fn folder_screen(&self) -> &FolderScreen {
        &self.folder
    }

    pub fn policy_form(&self) -> &PolicyUploadForm {
        &self.state.policy_form
    }

    /// Also used by front ends for failures that happen before an operation runs.
    pub fn notify(&self, notification: Notification) {
        self.frontend.notify(notification);
    }

    fn current_folder(&self) -> Result<FolderId> {
        self.state
            .current_folder_id
            .ok_or(ClientError::NoFolderSelected)
    }

    /// Folder-scoped operations call this first; it reports the missing selection itself.
    fn require_folder(&self) -> Option<FolderId> {
        match self.current_folder() {
            Ok(id) => Some(id),
            Err(e) => {
                error!("No folder ID set");
                self.notify(Notification::error(e.to_string()));
                None
            }
        }
    }

    // ==================== VIEWS ====================

    /// Activate exactly one view and run its load.
    pub async fn show_view(&mut self, view: View) {
        info!(view = %view, "Switching view");
        self.state.active = view;
        match view {
            View::Dashboard => self.load_dashboard().await,
            View::UploadPolicy => self.state.policy_form.reset(),
            View::Folder => self.load_folder_details().await,
        }
    }

    pub fn select_tab(&mut self, tab: FolderTab) {
        self.state.tab = tab;
    }

    // ==================== DASHBOARD ====================

    /// Stats and folder list are fetched concurrently.
    pub async fn load_dashboard(&mut self) {
        let (stats, folders) = tokio::join!(self.api.dashboard_stats(), self.api.list_folders());
        self.apply_stats(stats);
        self.apply_folders(folders);
    }

    pub async fn load_dashboard_stats(&mut self) {
        let stats = self.api.dashboard_stats().await;
        self.apply_stats(stats);
    }

    pub async fn load_folders(&mut self) {
        let folders = self.api.list_folders().await;
        self.apply_folders(folders);
    }

    fn apply_stats(&mut self, stats: Result<DashboardStats>) {
        match stats {
            Ok(stats) => {
                debug!(?stats, "Dashboard stats");
                self.dashboard.stats = Some(stats);
            }
            Err(e) => {
                error!(error = %e, "Error loading stats");
                self.notify(Notification::error("Failed to load dashboard statistics"));
            }
        }
    }

    fn apply_folders(&mut self, folders: Result<Vec<Folder>>) {
        match folders {
            Ok(folders) => {
                info!(count = folders.len(), "Loaded folders");
                self.dashboard.folders = Some(FolderList::from_folders(&folders));
            }
            Err(e) => {
                error!(error = %e, "Error loading folders");
                self.notify(Notification::error("Failed to load folders"));
            }
        }
    }

    pub async fn open_folder(&mut self, id: FolderId) {
        info!(folder_id = %id, "Opening folder");
        if self.state.current_folder_id != Some(id) {
            self.folder = FolderScreen::default();
            self.state.folder = None;
            self.state.tab = FolderTab::default();
        }
        self.state.current_folder_id = Some(id);
        self.show_view(View::Folder).await;
    }

    /// Asks for confirmation, deletes, then refreshes the folder list and the stats.
    pub async fn delete_folder(&mut self, id: FolderId) {
        if !self.frontend.confirm(DELETE_FOLDER_PROMPT) {
            return;
        }

        info!(folder_id = %id, "Deleting folder");
        match self.api.delete_folder(id).await {
            Ok(()) => {
                self.notify(Notification::success("Folder deleted successfully"));
                self.load_dashboard().await;
            }
            Err(e) => {
                error!(folder_id = %id, error = %e, "Error deleting folder");
                self.notify(Notification::error("Failed to delete folder"));
            }
        }
    }

    // ==================== UPLOAD POLICY ====================

    pub fn set_folder_name(&mut self, name: impl Into<String>) {
        self.state.policy_form.folder_name = name.into();
    }

    /// Returns whether the file was accepted into the form.
    pub fn select_policy_file(&mut self, file: PendingFile) -> bool {
        info!(name = %file.name, size = file.size(), "Policy file selected");
        match self.state.policy_form.select_file(file) {
            Ok(()) => true,
            Err(rejection) => {
                warn!(reason = %rejection, "Policy file rejected");
                self.notify(Notification::error(rejection.policy_message()));
                false
            }
        }
    }

    pub async fn upload_policy(&mut self) {
        let (folder_name, file) = match self.state.policy_form.begin_submit() {
            Ok(submission) => submission,
            Err(refusal) => {
                warn!(?refusal, "Policy submission refused");
                self.notify(Notification::error(refusal.message()));
                return;
            }
        };

        info!(folder_name = %folder_name, file = %file.name, "Uploading policy");
        let uploaded = {
            let _busy = BusyGuard::new(self.frontend.clone(), Control::UploadPolicy, SUBMITTING_LABEL);
            self.api.upload_policy(&folder_name, &file).await
        };

        match uploaded {
            Ok(folder_id) => {
                info!(folder_id = %folder_id, "Policy uploaded successfully");
                self.state
                    .policy_form
                    .succeed("Policy validated successfully! Redirecting to folder...");
                self.notify(Notification::success("Policy uploaded and validated!"));

                tokio::time::sleep(self.redirect_delay).await;
                self.open_folder(folder_id).await;
            }
            Err(e) => {
                error!(error = %e, "Policy upload failed");
                let message = match &e {
                    ClientError::Transport(_) => {
                        "Upload failed. Please check your connection and try again."
                    }
                    other => other.server_message().unwrap_or("Invalid policy document"),
                }
                .to_string();
                self.state.policy_form.fail(message.clone());
                self.notify(Notification::error(message));
            }
        }
    }

    // ==================== FOLDER VIEW ====================

    /// Folder metadata, then documents, analysis and Q&A. Only a metadata failure aborts.
    pub async fn load_folder_details(&mut self) {
        let Some(id) = self.require_folder() else {
            return;
        };

        info!(folder_id = %id, "Loading folder details");
        let folder = match self.api.get_folder(id).await {
            Ok(folder) => folder,
            Err(e) => {
                error!(folder_id = %id, error = %e, "Error loading folder");
                self.notify(Notification::error("Failed to load folder details"));
                return;
            }
        };

        self.folder.header = Some((&folder).into());
        self.folder.policy = Some((&folder).into());
        if folder.is_complete() {
            self.notify(Notification::info(FOLDER_COMPLETE_MESSAGE));
        }
        self.state.folder = Some(folder);

        self.load_documents().await;
        self.load_analysis().await;
        self.load_qna().await;
    }

    pub async fn load_documents(&mut self) {
        let Some(id) = self.require_folder() else {
            return;
        };
        match self.api.list_documents(id).await {
            Ok(documents) => {
                info!(folder_id = %id, count = documents.len(), "Loaded documents");
                self.folder.documents = Some(DocumentList::from_documents(&documents));
            }
            Err(e) => {
                error!(folder_id = %id, error = %e, "Error loading documents");
                self.notify(Notification::error("Failed to load documents"));
            }
        }
    }

    /// Accepts a multi-file selection, drops invalid files and sends the rest in one request.
    pub async fn upload_documents(&mut self, files: Vec<PendingFile>) {
        if files.is_empty() {
            return;
        }
        let Some(id) = self.require_folder() else {
            return;
        };
        if self.state.uploads_closed() {
            warn!(folder_id = %id, "Upload attempted on a complete folder");
            self.notify(Notification::info(FOLDER_COMPLETE_MESSAGE));
            return;
        }

        let batch = DocumentBatch::screen(files);
        if batch.accepted.is_empty() {
            warn!(rejected = batch.rejected.len(), "No valid files to upload");
            self.notify(Notification::error("No valid files to upload"));
            return;
        }
        if let Some(notice) = batch.rejection_notice() {
            warn!(rejected = batch.rejected.len(), "Some files rejected");
            self.notify(Notification::warning(notice));
        }

        info!(
            folder_id = %id,
            count = batch.accepted.len(),
            total = %format_megabytes(batch.total_size()),
            "Uploading documents"
        );
        let label = format!("Uploading {} file(s)...", batch.accepted.len());
        let uploaded = {
            let _busy = BusyGuard::new(self.frontend.clone(), Control::UploadDocuments, &label);
            self.api.upload_documents(id, &batch.accepted).await
        };

        match uploaded {
            Ok(outcome) => {
                for failed in &outcome.failed {
                    warn!(filename = %failed.filename, reason = %failed.reason, "Document failed on server");
                }
                self.notify(upload_summary(&outcome));
                self.load_folder_details().await;
                self.load_dashboard_stats().await;
            }
            Err(e) => {
                error!(folder_id = %id, error = %e, "Document upload failed");
                let message = match &e {
                    ClientError::Transport(_) => "Upload failed. Please try again.",
                    other => other.server_message().unwrap_or("Upload failed"),
                };
                self.notify(Notification::error(message));
            }
        }
    }

    pub async fn delete_document(&mut self, id: DocumentId) {
        if !self.frontend.confirm(DELETE_DOCUMENT_PROMPT) {
            return;
        }

        info!(document_id = %id, "Deleting document");
        match self.api.delete_document(id).await {
            Ok(()) => {
                self.notify(Notification::success("Document deleted"));
                self.load_folder_details().await;
            }
            Err(e) => {
                error!(document_id = %id, error = %e, "Error deleting document");
                self.notify(Notification::error("Failed to delete document"));
            }
        }
    }

    // ==================== ANALYSIS ====================

    pub async fn generate_analysis(&mut self) {
        let Some(id) = self.require_folder() else {
            return;
        };

        info!(folder_id = %id, "Generating analysis");
        let generated = {
            let _busy = BusyGuard::new(self.frontend.clone(), Control::Analyze, "Analyzing...");
            self.folder.analysis = AnalysisPanel::InProgress;
            self.state.tab = FolderTab::Analysis;
            self.api.generate_analysis(id).await
        };

        match generated {
            Ok(analysis) => {
                self.folder.analysis = AnalysisPanel::Report(AnalysisReport::from(&analysis));
                self.notify(Notification::success("Analysis completed!"));
            }
            Err(e) => {
                error!(folder_id = %id, error = %e, "Error generating analysis");
                self.folder.analysis = AnalysisPanel::Failed;
                self.notify(Notification::error("Analysis failed"));
            }
        }
    }

    /// A folder without a stored analysis is normal; nothing is reported.
    pub async fn load_analysis(&mut self) {
        let Some(id) = self.require_folder() else {
            return;
        };
        match self.api.latest_analysis(id).await {
            Ok(Some(analysis)) => {
                debug!(folder_id = %id, "Loaded existing analysis");
                self.folder.analysis = AnalysisPanel::Report(AnalysisReport::from(&analysis));
            }
            Ok(None) => {
                self.folder.analysis = AnalysisPanel::NotGenerated;
            }
            Err(e) => {
                debug!(folder_id = %id, error = %e, "Could not load existing analysis");
            }
        }
    }

    // ==================== Q&A ====================

    pub async fn load_qna(&mut self) {
        let Some(id) = self.require_folder() else {
            return;
        };
        match self.api.qna_history(id).await {
            Ok(entries) => {
                self.folder.qna = Some(QnaHistory::from_entries(&entries));
            }
            Err(e) => {
                error!(folder_id = %id, error = %e, "Error loading Q&A");
                self.notify(Notification::error("Failed to load questions"));
            }
        }
    }

    pub fn set_question(&mut self, question: impl Into<String>) {
        self.state.question_draft = question.into();
    }

    /// Posts the draft question; on success the whole history is reloaded and the draft cleared.
    pub async fn ask_question(&mut self) {
        let question = self.state.question_draft.trim().to_string();
        if question.is_empty() {
            warn!("Empty question refused");
            self.notify(Notification::error("Please enter a question"));
            return;
        }
        let Some(id) = self.require_folder() else {
            return;
        };

        info!(folder_id = %id, "Asking question");
        let asked = {
            let _busy = BusyGuard::new(self.frontend.clone(), Control::Ask, "Asking...");
            self.api.ask_question(id, &question).await
        };

        match asked {
            Ok(()) => {
                debug!(folder_id = %id, "Answer received");
                self.load_qna().await;
                self.state.question_draft.clear();
                self.notify(Notification::success("Answer generated!"));
            }
            Err(e) => {
                error!(folder_id = %id, error = %e, "Q&A error");
                let message = match e {
                    ClientError::Transport(_) => "Failed to get answer. Please try again.",
                    _ => "Failed to get answer",
                };
                self.notify(Notification::error(message));
            }
        }
    }
}

/// Combined count notice for a document upload response.
pub fn upload_summary(outcome: &UploadOutcome) -> Notification {
    let uploaded = outcome.uploaded.len();
    let failed = outcome.failed.len();

    let mut message = format!("{uploaded} document(s) uploaded successfully!");
    if failed > 0 {
        message.push_str(&format!(" ({failed} failed)"));
    }

    if uploaded > 0 {
        Notification::success(message)
    } else {
        Notification::warning(message)
    }
}
