use std::io::{self, BufRead, Write};
use std::sync::atomic::{AtomicUsize, Ordering};

use claim_view::notify::{Control, Frontend, Notification, NotificationKind};
use claim_view::session::FolderTab;
use claim_view::upload::{PolicyUploadForm, ResultKind};
use claim_view::views::{
    AnalysisPanel, DashboardScreen, DocumentList, FolderList, FolderScreen, QnaHistory,
};
use tokio::runtime::{Handle, RuntimeFlavor};
use tracing::debug;

/// Prints notifications to stdout and asks confirmations on stdin.
pub struct TerminalFrontend {
    assume_yes: bool,
    errors: AtomicUsize,
}

impl TerminalFrontend {
    pub fn new(assume_yes: bool) -> Self {
        Self {
            assume_yes,
            errors: AtomicUsize::new(0),
        }
    }

    /// Error notifications shown so far; one-shot commands turn this into the exit status.
    pub fn error_count(&self) -> usize {
        self.errors.load(Ordering::Relaxed)
    }
}

impl Frontend for TerminalFrontend {
    fn notify(&self, notification: Notification) {
        debug!(kind = %notification.kind, "Notification shown");
        if notification.kind == NotificationKind::Error {
            self.errors.fetch_add(1, Ordering::Relaxed);
        }
        println!("{}", notification_line(&notification));
    }

    fn confirm(&self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        print!("{prompt} [y/N] ");
        let _ = io::stdout().flush();

        let answer = match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(read_answer)
            }
            _ => read_answer(),
        };
        answer.is_some_and(|a| matches!(a.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
    }

    fn set_busy(&self, control: Control, label: Option<&str>) {
        match label {
            Some(label) => println!("... {label}"),
            None => debug!(?control, "Control released"),
        }
    }
}

fn read_answer() -> Option<String> {
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer).ok()?;
    Some(answer)
}

pub fn notification_line(notification: &Notification) -> String {
    let marker = match notification.kind {
        NotificationKind::Success => "✓",
        NotificationKind::Error => "✗",
        NotificationKind::Warning => "!",
        NotificationKind::Info => "i",
    };
    format!("[{marker}] {}", notification.message)
}

pub fn render_dashboard(screen: &DashboardScreen) -> String {
    let mut lines = Vec::new();

    if let Some(stats) = &screen.stats {
        lines.push(format!(
            "Total: {}  Valid: {}  Ongoing: {}  Completed: {}  Fraud: {}",
            stats.total, stats.valid, stats.ongoing, stats.completed, stats.fraud
        ));
        lines.push(String::new());
    }

    match &screen.folders {
        None => lines.push("Loading...".to_string()),
        Some(FolderList::Empty { message }) => lines.push(message.to_string()),
        Some(FolderList::Cards(cards)) => {
            for card in cards {
                lines.push(format!(
                    "#{} {} [{}]",
                    card.folder_id, card.title, card.status.label
                ));
                lines.push(format!(
                    "    {} | {} | {} | {} | {}",
                    card.company, card.document_count, card.policy, card.coverage, card.completion
                ));
            }
        }
    }

    lines.join("\n")
}

pub fn render_folder(screen: &FolderScreen, tab: FolderTab) -> String {
    let mut lines = Vec::new();

    if let Some(header) = &screen.header {
        lines.push(format!("{} [{}]", header.title, header.status.label));
        lines.push(format!(
            "{} | {} | {}",
            header.company, header.policy, header.completion
        ));
        if !header.upload_enabled {
            lines.push("Upload disabled: folder is complete".to_string());
        }
    }
    if let Some(policy) = &screen.policy {
        if !policy.summary.is_empty() {
            lines.push(format!("Summary: {}", policy.summary));
        }
        lines.push(format!(
            "Coverage: {}  Expiry: {}",
            policy.coverage, policy.expiry
        ));
        if !policy.exclusions.is_empty() {
            lines.push(format!("Exclusions: {}", policy.exclusions.join(", ")));
        }
    }

    lines.push(String::new());
    lines.push(format!("== {} ==", tab_title(tab)));
    match tab {
        FolderTab::Documents => render_documents(screen.documents.as_ref(), &mut lines),
        FolderTab::Analysis => render_analysis(&screen.analysis, &mut lines),
        FolderTab::Qna => render_qna(screen.qna.as_ref(), &mut lines),
    }

    lines.join("\n")
}

fn tab_title(tab: FolderTab) -> &'static str {
    match tab {
        FolderTab::Documents => "Documents",
        FolderTab::Analysis => "Analysis",
        FolderTab::Qna => "Q&A",
    }
}

fn render_documents(documents: Option<&DocumentList>, lines: &mut Vec<String>) {
    match documents {
        None => lines.push("Loading...".to_string()),
        Some(DocumentList::Empty { message }) => lines.push(message.to_string()),
        Some(DocumentList::Items(items)) => {
            for item in items {
                let mut title = format!(
                    "#{} {} ({})",
                    item.document_id, item.filename, item.document_type
                );
                if item.duplicate {
                    title.push_str(" DUPLICATE");
                }
                lines.push(title);

                let mut detail = format!("    {} | {}", item.uploaded_on, item.completeness_label);
                if let Some(amount) = &item.amount {
                    detail.push_str(&format!(" | {amount}"));
                }
                lines.push(detail);
                if let Some(summary) = &item.summary {
                    lines.push(format!("    {summary}"));
                }
            }
        }
    }
}

fn render_analysis(panel: &AnalysisPanel, lines: &mut Vec<String>) {
    let AnalysisPanel::Report(report) = panel else {
        if let Some(placeholder) = panel.placeholder() {
            lines.push(placeholder.to_string());
        }
        return;
    };

    lines.push(report.heading.to_string());
    for stat in &report.stats {
        lines.push(format!("  {}: {}", stat.title, stat.value));
    }
    for alert in &report.alerts {
        lines.push(format!("{}:", alert.kind.title()));
        lines.extend(alert.items.iter().map(|item| format!("  - {item}")));
    }
    if !report.summary.is_empty() {
        lines.push(format!("Summary: {}", report.summary));
    }
    if !report.checklist.is_empty() {
        lines.push("Checklist:".to_string());
        for row in &report.checklist {
            let mark = if row.completed { "x" } else { " " };
            lines.push(format!("  [{mark}] {}", row.item));
        }
    }
    if !report.claim_guide.is_empty() {
        lines.push("How to claim:".to_string());
        for (n, step) in report.claim_guide.iter().enumerate() {
            lines.push(format!("  {}. {step}", n + 1));
        }
    }
}

fn render_qna(history: Option<&QnaHistory>, lines: &mut Vec<String>) {
    match history {
        None => lines.push("Loading...".to_string()),
        Some(QnaHistory::Empty { message }) => lines.push(message.to_string()),
        Some(QnaHistory::Entries(rows)) => {
            for row in rows {
                lines.push(format!("Q: {}", row.question));
                lines.push(format!("A: {}", row.answer));
                lines.push(format!("   {}", row.asked_at));
            }
        }
    }
}

pub fn render_policy_form(form: &PolicyUploadForm) -> String {
    let (title, hint) = form.drop_zone_label();
    let mut lines = vec![
        format!("Folder name: {}", form.folder_name),
        format!("File: {title} ({hint})"),
    ];

    let submit = if form.submit_enabled() {
        form.submit_label().to_string()
    } else {
        format!("{} (disabled)", form.submit_label())
    };
    lines.push(format!("[{submit}]"));

    if let Some(result) = form.result() {
        let prefix = match result.kind {
            ResultKind::Success => "OK",
            ResultKind::Error => "ERROR",
        };
        lines.push(format!("{prefix}: {}", result.message));
    }

    lines.join("\n")
}
