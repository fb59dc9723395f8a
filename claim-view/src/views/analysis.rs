use crate::models::Analysis;

use super::folder::Tone;
use super::format::format_currency;

pub const REPORT_HEADING: &str = "Comprehensive Claim Analysis";
pub const NO_ANALYSIS_MESSAGE: &str = "No analysis generated yet. Generate an analysis to review coverage, fraud warnings and missing documents.";
pub const ANALYZING_MESSAGE: &str =
    "AI is analyzing your documents and policy...\nThis may take up to a minute.";
pub const ANALYSIS_FAILED_MESSAGE: &str = "Analysis failed. Please try again.";

/// What the analysis tab shows
#[derive(Debug, Clone, Default, PartialEq)]
pub enum AnalysisPanel {
    #[default]
    NotGenerated,
    InProgress,
    Failed,
    Report(AnalysisReport),
}

impl AnalysisPanel {
    pub fn placeholder(&self) -> Option<&'static str> {
        match self {
            AnalysisPanel::NotGenerated => Some(NO_ANALYSIS_MESSAGE),
            AnalysisPanel::InProgress => Some(ANALYZING_MESSAGE),
            AnalysisPanel::Failed => Some(ANALYSIS_FAILED_MESSAGE),
            AnalysisPanel::Report(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisStat {
    pub title: &'static str,
    pub value: String,
    pub tone: StatTone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatTone {
    Blue,
    Green,
    Red,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    FraudWarnings,
    MissingDocuments,
    ExclusionsDetected,
}

impl AlertKind {
    pub fn title(&self) -> &'static str {
        match self {
            AlertKind::FraudWarnings => "Fraud Warnings",
            AlertKind::MissingDocuments => "Missing Documents",
            AlertKind::ExclusionsDetected => "Exclusions Detected",
        }
    }

    pub fn tone(&self) -> Tone {
        match self {
            AlertKind::FraudWarnings => Tone::Danger,
            AlertKind::MissingDocuments | AlertKind::ExclusionsDetected => Tone::Warning,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertBlock {
    pub kind: AlertKind,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecklistRow {
    pub item: String,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisReport {
    pub heading: &'static str,
    pub stats: [AnalysisStat; 3],
    /// Only non-empty sequences get a block, in fraud / missing / exclusions order.
    pub alerts: Vec<AlertBlock>,
    pub summary: String,
    pub checklist: Vec<ChecklistRow>,
    pub claim_guide: Vec<String>,
}

impl AnalysisReport {
    pub fn alert(&self, kind: AlertKind) -> Option<&AlertBlock> {
        self.alerts.iter().find(|a| a.kind == kind)
    }
}

impl From<&Analysis> for AnalysisReport {
    fn from(analysis: &Analysis) -> Self {
        let alerts = [
            (AlertKind::FraudWarnings, &analysis.fraud_warnings),
            (AlertKind::MissingDocuments, &analysis.missing_documents),
            (AlertKind::ExclusionsDetected, &analysis.exclusions_found),
        ]
        .into_iter()
        .filter(|(_, items)| !items.is_empty())
        .map(|(kind, items)| AlertBlock {
            kind,
            items: items.clone(),
        })
        .collect();

        Self {
            heading: REPORT_HEADING,
            stats: [
                AnalysisStat {
                    title: "Total Bill Amount",
                    value: format_currency(analysis.total_bill_amount),
                    tone: StatTone::Blue,
                },
                AnalysisStat {
                    title: "Covered Amount",
                    value: format_currency(analysis.covered_amount),
                    tone: StatTone::Green,
                },
                AnalysisStat {
                    title: "You Pay",
                    value: format_currency(analysis.user_pays),
                    tone: StatTone::Red,
                },
            ],
            alerts,
            summary: analysis.summary.clone().unwrap_or_default(),
            checklist: analysis
                .checklist
                .iter()
                .map(|c| ChecklistRow {
                    item: c.item.clone(),
                    completed: c.completed,
                })
                .collect(),
            claim_guide: analysis.claim_guide.clone(),
        }
    }
}
