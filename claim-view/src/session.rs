use std::fmt;
use std::str::FromStr;

use crate::models::{Folder, FolderId};
use crate::upload::PolicyUploadForm;

/// Top-level screens; exactly one is active at a time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Dashboard,
    UploadPolicy,
    Folder,
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            View::Dashboard => "dashboard",
            View::UploadPolicy => "uploadPolicy",
            View::Folder => "folder",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FolderTab {
    #[default]
    Documents,
    Analysis,
    Qna,
}

impl FromStr for FolderTab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "documents" | "docs" => Ok(FolderTab::Documents),
            "analysis" => Ok(FolderTab::Analysis),
            "qna" | "q&a" => Ok(FolderTab::Qna),
            other => Err(format!("unknown tab '{other}'")),
        }
    }
}

impl fmt::Display for FolderTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FolderTab::Documents => "documents",
            FolderTab::Analysis => "analysis",
            FolderTab::Qna => "qna",
        };
        f.write_str(s)
    }
}

/// Session-wide view state owned by the controller.
///
/// Created when the app starts. `current_folder_id` is only written when a folder is
/// opened (or created through the policy form) and is checked before any folder-scoped
/// request. The policy form is reset every time the upload view is shown.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub active: View,
    pub tab: FolderTab,
    pub current_folder_id: Option<FolderId>,
    /// Last folder metadata loaded for `current_folder_id`.
    pub folder: Option<Folder>,
    pub policy_form: PolicyUploadForm,
    pub question_draft: String,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upload is refused client-side once the loaded folder is complete.
    pub fn uploads_closed(&self) -> bool {
        self.folder.as_ref().is_some_and(Folder::is_complete)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn starts_on_dashboard_without_folder() {
        let state = ViewState::new();
        assert_eq!(state.active, View::Dashboard);
        assert_eq!(state.current_folder_id, None);
        assert!(!state.uploads_closed());
    }

    #[test]
    fn tab_names_parse() {
        assert_eq!("analysis".parse::<FolderTab>(), Ok(FolderTab::Analysis));
        assert_eq!("Q&A".parse::<FolderTab>(), Ok(FolderTab::Qna));
        assert!("billing".parse::<FolderTab>().is_err());
        assert_eq!(FolderTab::Qna.to_string(), "qna");
    }
}
