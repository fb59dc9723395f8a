use crate::models::{DashboardStats, Folder, FolderId, FolderStatus};

use super::format::pluralize;

pub const NO_POLICIES_MESSAGE: &str =
    "No policies yet. Click \"Create New Policy\" to get started.";

/// Coloured status pill used on cards and in the folder header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusBadge {
    pub label: String,
    pub style_class: String,
}

impl From<FolderStatus> for StatusBadge {
    fn from(status: FolderStatus) -> Self {
        Self {
            label: status.as_str().to_uppercase(),
            style_class: format!("status-{}", status.as_str()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderCard {
    /// Activating the card opens this folder; the nested delete control targets it too.
    pub folder_id: FolderId,
    pub title: String,
    pub company: String,
    pub document_count: String,
    pub status: StatusBadge,
    pub policy: String,
    pub coverage: String,
    pub completion: String,
}

impl From<&Folder> for FolderCard {
    fn from(folder: &Folder) -> Self {
        Self {
            folder_id: folder.id,
            title: folder.folder_name.clone(),
            company: folder
                .company_name
                .clone()
                .unwrap_or_else(|| "Unknown Company".to_string()),
            document_count: pluralize(folder.document_count, "document"),
            status: folder.status.into(),
            policy: format!(
                "Policy: {}",
                folder.policy_number.as_deref().unwrap_or("N/A")
            ),
            coverage: format!(
                "Coverage: {}",
                folder.coverage_amount.as_deref().unwrap_or("N/A")
            ),
            completion: format!("{}% Complete", folder.completion_percentage),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FolderList {
    Empty { message: &'static str },
    Cards(Vec<FolderCard>),
}

impl FolderList {
    pub fn from_folders(folders: &[Folder]) -> Self {
        if folders.is_empty() {
            return FolderList::Empty {
                message: NO_POLICIES_MESSAGE,
            };
        }
        FolderList::Cards(folders.iter().map(FolderCard::from).collect())
    }

    pub fn cards(&self) -> &[FolderCard] {
        match self {
            FolderList::Empty { .. } => &[],
            FolderList::Cards(cards) => cards,
        }
    }
}

/// Dashboard contents; `None` means not loaded yet. A failed reload keeps the previous value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardScreen {
    pub stats: Option<DashboardStats>,
    pub folders: Option<FolderList>,
}
