use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{Instrument, debug, info_span};
use uuid::Uuid;

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::models::{
    Analysis, AskRequest, CreatedFolder, DashboardStats, Document, DocumentId, ErrorBody, Folder,
    FolderId, QnaEntry, UploadOutcome,
};
use crate::upload::PendingFile;

const CORRELATION_HEADER: &str = "x-correlation-id";

/// REST backend the controller talks to
#[async_trait]
pub trait ClaimApi: Send + Sync {
    async fn dashboard_stats(&self) -> Result<DashboardStats>;
    async fn list_folders(&self) -> Result<Vec<Folder>>;
    async fn get_folder(&self, id: FolderId) -> Result<Folder>;
    async fn delete_folder(&self, id: FolderId) -> Result<()>;
    /// Sends `file` and `folder_name` as multipart; returns the new folder's id.
    async fn upload_policy(&self, folder_name: &str, file: &PendingFile) -> Result<FolderId>;
    async fn list_documents(&self, folder: FolderId) -> Result<Vec<Document>>;
    /// One multipart request with every file under the `files` field.
    async fn upload_documents(&self, folder: FolderId, files: &[PendingFile]) -> Result<UploadOutcome>;
    async fn delete_document(&self, id: DocumentId) -> Result<()>;
    async fn generate_analysis(&self, folder: FolderId) -> Result<Analysis>;
    /// `Ok(None)` when the backend has no analysis for the folder yet.
    async fn latest_analysis(&self, folder: FolderId) -> Result<Option<Analysis>>;
    async fn qna_history(&self, folder: FolderId) -> Result<Vec<QnaEntry>>;
    async fn ask_question(&self, folder: FolderId, question: &str) -> Result<()>;
}

/// reqwest implementation of [`ClaimApi`]
#[derive(Clone)]
pub struct HttpClaimApi {
    client: Client,
    config: ClientConfig,
}

impl HttpClaimApi {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            config,
        })
    }

    fn request(&self, method: Method, path: &str) -> (RequestBuilder, tracing::Span) {
        let correlation_id = Uuid::new_v4().to_string();
        let span = info_span!(
            "api_request",
            method = %method,
            path = %path,
            correlation_id = %correlation_id
        );
        let builder = self
            .client
            .request(method, self.config.endpoint(path))
            .header(CORRELATION_HEADER, correlation_id);
        (builder, span)
    }

    async fn send(builder: RequestBuilder) -> Result<Response> {
        let response = builder.send().await?;
        let status = response.status();
        debug!(status = status.as_u16(), "Response received");
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.error);
        Err(ClientError::Server {
            status: status.as_u16(),
            message,
        })
    }

    async fn fetch_json<T: DeserializeOwned>(&self, method: Method, path: &str) -> Result<T> {
        let (builder, span) = self.request(method, path);
        async move {
            let response = Self::send(builder).await?;
            decode(response).await
        }
        .instrument(span)
        .await
    }

    async fn fetch_empty(&self, method: Method, path: &str) -> Result<()> {
        let (builder, span) = self.request(method, path);
        async move {
            Self::send(builder).await?;
            Ok(())
        }
        .instrument(span)
        .await
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

fn file_part(file: &PendingFile) -> Result<Part> {
    Ok(Part::bytes(file.bytes.clone())
        .file_name(file.name.clone())
        .mime_str(&file.mime)?)
}

#[async_trait]
impl ClaimApi for HttpClaimApi {
    async fn dashboard_stats(&self) -> Result<DashboardStats> {
        self.fetch_json(Method::GET, "/dashboard").await
    }

    async fn list_folders(&self) -> Result<Vec<Folder>> {
        self.fetch_json(Method::GET, "/folders").await
    }

    async fn get_folder(&self, id: FolderId) -> Result<Folder> {
        self.fetch_json(Method::GET, &format!("/folders/{id}")).await
    }

    async fn delete_folder(&self, id: FolderId) -> Result<()> {
        self.fetch_empty(Method::DELETE, &format!("/folders/{id}")).await
    }

    async fn upload_policy(&self, folder_name: &str, file: &PendingFile) -> Result<FolderId> {
        let form = Form::new()
            .part("file", file_part(file)?)
            .text("folder_name", folder_name.to_string());
        let (builder, span) = self.request(Method::POST, "/upload-policy");
        async move {
            let response = Self::send(builder.multipart(form)).await?;
            let created: CreatedFolder = decode(response).await?;
            Ok(created.id)
        }
        .instrument(span)
        .await
    }

    async fn list_documents(&self, folder: FolderId) -> Result<Vec<Document>> {
        self.fetch_json(Method::GET, &format!("/folders/{folder}/documents"))
            .await
    }

    async fn upload_documents(
        &self,
        folder: FolderId,
        files: &[PendingFile],
    ) -> Result<UploadOutcome> {
        let mut form = Form::new();
        for file in files {
            form = form.part("files", file_part(file)?);
        }
        let (builder, span) = self.request(Method::POST, &format!("/folders/{folder}/upload"));
        async move {
            let response = Self::send(builder.multipart(form)).await?;
            decode(response).await
        }
        .instrument(span)
        .await
    }

    async fn delete_document(&self, id: DocumentId) -> Result<()> {
        self.fetch_empty(Method::DELETE, &format!("/documents/{id}")).await
    }

    async fn generate_analysis(&self, folder: FolderId) -> Result<Analysis> {
        self.fetch_json(Method::POST, &format!("/folders/{folder}/analyze"))
            .await
    }

    async fn latest_analysis(&self, folder: FolderId) -> Result<Option<Analysis>> {
        match self
            .fetch_json(Method::GET, &format!("/folders/{folder}/analysis"))
            .await
        {
            Ok(analysis) => Ok(Some(analysis)),
            Err(e) if e.is_not_found() => {
                debug!(folder_id = %folder, "No stored analysis");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn qna_history(&self, folder: FolderId) -> Result<Vec<QnaEntry>> {
        self.fetch_json(Method::GET, &format!("/folders/{folder}/qna"))
            .await
    }

    async fn ask_question(&self, folder: FolderId, question: &str) -> Result<()> {
        let (builder, span) = self.request(Method::POST, &format!("/folders/{folder}/qna"));
        async move {
            Self::send(builder.json(&AskRequest { question })).await?;
            Ok(())
        }
        .instrument(span)
        .await
    }
}
