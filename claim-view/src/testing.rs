//! In-memory backend and front end used by the controller tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::json;

use crate::api::ClaimApi;
use crate::error::{ClientError, Result};
use crate::models::{
    Analysis, DashboardStats, Document, DocumentId, Folder, FolderId, QnaEntry, UploadOutcome,
    UploadedDocument,
};
use crate::notify::{Control, Frontend, Notification};
use crate::upload::PendingFile;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    DashboardStats,
    ListFolders,
    GetFolder(FolderId),
    DeleteFolder(FolderId),
    UploadPolicy { folder_name: String, file: String },
    ListDocuments(FolderId),
    UploadDocuments { folder: FolderId, files: Vec<String> },
    DeleteDocument(DocumentId),
    GenerateAnalysis(FolderId),
    LatestAnalysis(FolderId),
    QnaHistory(FolderId),
    AskQuestion { folder: FolderId, question: String },
}

pub struct FakeBackend {
    pub stats: DashboardStats,
    pub folders: Vec<Folder>,
    pub documents: Vec<Document>,
    pub stored_analysis: Option<Analysis>,
    /// Returned by the next analysis run; defaults to an empty report.
    pub generated: Option<Analysis>,
    /// Newest first, the order the backend returns history in.
    pub qna: Vec<QnaEntry>,
    pub next_folder_id: i64,
    next_document_id: i64,
}

impl Default for FakeBackend {
    fn default() -> Self {
        Self {
            stats: DashboardStats::default(),
            folders: Vec::new(),
            documents: Vec::new(),
            stored_analysis: None,
            generated: None,
            qna: Vec::new(),
            next_folder_id: 1,
            next_document_id: 1,
        }
    }
}

#[derive(Default)]
pub struct FakeApi {
    calls: Mutex<Vec<Call>>,
    backend: Mutex<FakeBackend>,
    failures: Mutex<HashMap<&'static str, (u16, Option<String>)>>,
}

impl FakeApi {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn with_backend(&self, f: impl FnOnce(&mut FakeBackend)) {
        f(&mut self.backend.lock().unwrap());
    }

    /// Every later call to `operation` answers with this status.
    pub fn fail(&self, operation: &'static str, status: u16, message: Option<&str>) {
        self.failures
            .lock()
            .unwrap()
            .insert(operation, (status, message.map(str::to_string)));
    }

    fn record(&self, operation: &'static str, call: Call) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        match self.failures.lock().unwrap().get(operation) {
            Some((status, message)) => Err(ClientError::Server {
                status: *status,
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ClaimApi for FakeApi {
    async fn dashboard_stats(&self) -> Result<DashboardStats> {
        self.record("dashboard_stats", Call::DashboardStats)?;
        Ok(self.backend.lock().unwrap().stats)
    }

    async fn list_folders(&self) -> Result<Vec<Folder>> {
        self.record("list_folders", Call::ListFolders)?;
        Ok(self.backend.lock().unwrap().folders.clone())
    }

    async fn get_folder(&self, id: FolderId) -> Result<Folder> {
        self.record("get_folder", Call::GetFolder(id))?;
        self.backend
            .lock()
            .unwrap()
            .folders
            .iter()
            .find(|f| f.id == id)
            .cloned()
            .ok_or_else(|| ClientError::Server {
                status: 404,
                message: Some("Folder not found".to_string()),
            })
    }

    async fn delete_folder(&self, id: FolderId) -> Result<()> {
        self.record("delete_folder", Call::DeleteFolder(id))?;
        self.backend.lock().unwrap().folders.retain(|f| f.id != id);
        Ok(())
    }

    async fn upload_policy(&self, folder_name: &str, file: &PendingFile) -> Result<FolderId> {
        self.record(
            "upload_policy",
            Call::UploadPolicy {
                folder_name: folder_name.to_string(),
                file: file.name.clone(),
            },
        )?;
        let mut backend = self.backend.lock().unwrap();
        let id = backend.next_folder_id;
        backend.next_folder_id += 1;
        backend.folders.push(folder(id, folder_name, 0));
        Ok(FolderId(id))
    }

    async fn list_documents(&self, folder: FolderId) -> Result<Vec<Document>> {
        self.record("list_documents", Call::ListDocuments(folder))?;
        Ok(self.backend.lock().unwrap().documents.clone())
    }

    async fn upload_documents(&self, folder: FolderId, files: &[PendingFile]) -> Result<UploadOutcome> {
        self.record(
            "upload_documents",
            Call::UploadDocuments {
                folder,
                files: files.iter().map(|f| f.name.clone()).collect(),
            },
        )?;
        let mut backend = self.backend.lock().unwrap();
        let mut outcome = UploadOutcome::default();
        for file in files {
            let id = backend.next_document_id;
            backend.next_document_id += 1;
            let document: Document = serde_json::from_value(json!({
                "id": id,
                "folder_id": folder.0,
                "filename": file.name,
                "document_type": "bill",
                "completeness": 80
            }))
            .unwrap();
            backend.documents.push(document);
            outcome.uploaded.push(UploadedDocument {
                id: Some(DocumentId(id)),
                filename: file.name.clone(),
            });
        }
        Ok(outcome)
    }

    async fn delete_document(&self, id: DocumentId) -> Result<()> {
        self.record("delete_document", Call::DeleteDocument(id))?;
        self.backend.lock().unwrap().documents.retain(|d| d.id != id);
        Ok(())
    }

    async fn generate_analysis(&self, folder: FolderId) -> Result<Analysis> {
        self.record("generate_analysis", Call::GenerateAnalysis(folder))?;
        let mut backend = self.backend.lock().unwrap();
        let analysis = match backend.generated.clone() {
            Some(analysis) => analysis,
            None => serde_json::from_value(json!({})).unwrap(),
        };
        backend.stored_analysis = Some(analysis.clone());
        Ok(analysis)
    }

    async fn latest_analysis(&self, folder: FolderId) -> Result<Option<Analysis>> {
        self.record("latest_analysis", Call::LatestAnalysis(folder))?;
        Ok(self.backend.lock().unwrap().stored_analysis.clone())
    }

    async fn qna_history(&self, folder: FolderId) -> Result<Vec<QnaEntry>> {
        self.record("qna_history", Call::QnaHistory(folder))?;
        Ok(self.backend.lock().unwrap().qna.clone())
    }

    async fn ask_question(&self, folder: FolderId, question: &str) -> Result<()> {
        self.record(
            "ask_question",
            Call::AskQuestion {
                folder,
                question: question.to_string(),
            },
        )?;
        let mut backend = self.backend.lock().unwrap();
        let n = backend.qna.len() as i64 + 1;
        let entry = QnaEntry {
            id: Some(n),
            question: question.to_string(),
            answer: format!("Answer {n}"),
            created_at: format!("2024-03-01T10:00:{n:02}"),
        };
        backend.qna.insert(0, entry);
        Ok(())
    }
}

/// Records everything the controller shows; `confirm` answers with a fixed choice.
pub struct RecordingFrontend {
    answer: bool,
    notifications: Mutex<Vec<Notification>>,
    prompts: Mutex<Vec<String>>,
    busy: Mutex<Vec<(Control, Option<String>)>>,
}

impl RecordingFrontend {
    pub fn confirming(answer: bool) -> Self {
        Self {
            answer,
            notifications: Mutex::default(),
            prompts: Mutex::default(),
            busy: Mutex::default(),
        }
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.lock().unwrap().clone()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn busy_log(&self) -> Vec<(Control, Option<String>)> {
        self.busy.lock().unwrap().clone()
    }
}

impl Frontend for RecordingFrontend {
    fn notify(&self, notification: Notification) {
        self.notifications.lock().unwrap().push(notification);
    }

    fn confirm(&self, prompt: &str) -> bool {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.answer
    }

    fn set_busy(&self, control: Control, label: Option<&str>) {
        self.busy
            .lock()
            .unwrap()
            .push((control, label.map(str::to_string)));
    }
}

pub fn folder(id: i64, name: &str, completion: i64) -> Folder {
    serde_json::from_value(json!({
        "id": id,
        "folder_name": name,
        "company_name": "Star Health",
        "policy_number": "P-1001",
        "status": "ongoing",
        "completion_percentage": completion,
        "document_count": 0
    }))
    .unwrap()
}

pub fn pdf(name: &str, size: usize) -> PendingFile {
    PendingFile::new(name, "application/pdf", vec![0u8; size])
}
