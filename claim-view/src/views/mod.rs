//! Pure mappings from backend data to render-ready view models.
//!
//! Nothing in here knows about a rendering target; the terminal front end and the tests
//! consume the same structures.

pub mod analysis;
pub mod dashboard;
pub mod folder;
pub mod format;
pub mod qna;

pub use analysis::{AlertBlock, AlertKind, AnalysisPanel, AnalysisReport, AnalysisStat, ChecklistRow, StatTone};
pub use dashboard::{DashboardScreen, FolderCard, FolderList, StatusBadge};
pub use folder::{
    CompletenessBucket, DocumentItem, DocumentList, FolderHeader, FolderScreen, PolicyPanel, Tone,
};
pub use qna::{QnaHistory, QnaRow};
