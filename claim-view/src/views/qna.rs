use crate::models::QnaEntry;

use super::format::{format_datetime, parse_timestamp};

pub const NO_QUESTIONS_MESSAGE: &str = "No questions asked yet. Ask a question about your policy!";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QnaRow {
    pub question: String,
    pub answer: String,
    pub asked_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QnaHistory {
    Empty { message: &'static str },
    Entries(Vec<QnaRow>),
}

impl QnaHistory {
    /// Rows come out oldest first whatever order the backend used.
    pub fn from_entries(entries: &[QnaEntry]) -> Self {
        if entries.is_empty() {
            return QnaHistory::Empty {
                message: NO_QUESTIONS_MESSAGE,
            };
        }
        QnaHistory::Entries(
            chronological(entries)
                .into_iter()
                .map(|e| QnaRow {
                    question: e.question.clone(),
                    answer: e.answer.clone(),
                    asked_at: format_datetime(&e.created_at),
                })
                .collect(),
        )
    }

    pub fn rows(&self) -> &[QnaRow] {
        match self {
            QnaHistory::Empty { .. } => &[],
            QnaHistory::Entries(rows) => rows,
        }
    }
}

/// Stable sort by timestamp, then id.
pub fn chronological(entries: &[QnaEntry]) -> Vec<&QnaEntry> {
    let mut sorted: Vec<&QnaEntry> = entries.iter().collect();
    sorted.sort_by_key(|e| (parse_timestamp(&e.created_at), e.id));
    sorted
}
