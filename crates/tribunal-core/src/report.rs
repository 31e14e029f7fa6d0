use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::{
    error::CourtError,
    evidence::EvidenceSummary,
    trial::TrialOutcome,
    types::{CaseRecord, Complexity, Role, SimulationMode, TurnRecord, Verdict, VerdictLabel},
};

#[derive(Debug, Clone, Serialize)]
pub struct CaseInformation {
    pub case_id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub case_type: String,
    pub complexity: Complexity,
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SimulationDetails {
    pub mode: SimulationMode,
    pub start_time: DateTime<Utc>,
    pub duration_minutes: f64,
    pub total_rounds: u32,
    pub total_statements: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParticipantStats {
    pub name: String,
    pub statements: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParticipantStatistics {
    pub judge: ParticipantStats,
    pub prosecutor: ParticipantStats,
    pub defense: ParticipantStats,
}

#[derive(Debug, Clone, Serialize)]
pub struct CaseOutcome {
    pub verdict: VerdictLabel,
    pub reasoning_summary: String,
    pub sentence: Option<String>,
    pub applied_sections: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrialReport {
    pub case_information: CaseInformation,
    pub simulation_details: SimulationDetails,
    pub participant_statistics: ParticipantStatistics,
    pub evidence_analysis: EvidenceSummary,
    pub final_verdict: Verdict,
    pub transcript: Vec<TurnRecord>,
    pub legal_sections_cited: Vec<String>,
    pub evidence_presented: Vec<String>,
    pub case_outcome: CaseOutcome,
}

fn count(transcript: &[TurnRecord], role: Role) -> usize {
    transcript.iter().filter(|t| t.role == role).count()
}

fn reasoning_summary(reasoning: &str) -> String {
    let head: String = reasoning.chars().take(200).collect();
    format!("{head}...")
}

impl TrialReport {
    pub fn build(case: &CaseRecord, outcome: &TrialOutcome) -> Self {
        let session = &outcome.session;
        let transcript = &outcome.transcript;
        let elapsed = outcome.finished_at - session.started_at;
        let minutes = elapsed.num_milliseconds() as f64 / 60_000.0;

        let sections: BTreeSet<String> = transcript.iter().filter_map(|t| t.section.clone()).collect();
        let exhibits: BTreeSet<String> = transcript.iter().filter_map(|t| t.evidence.clone()).collect();

        let stats = |role: Role| ParticipantStats {
            name: session.participants.name_of(role).to_string(),
            statements: count(transcript, role),
        };

        Self {
            case_information: CaseInformation {
                case_id: case.id.clone(),
                title: case.title.clone(),
                case_type: case.case_type.clone(),
                complexity: case.complexity,
                description: case.description.clone(),
            },
            simulation_details: SimulationDetails {
                mode: session.mode,
                start_time: session.started_at,
                duration_minutes: (minutes * 100.0).round() / 100.0,
                total_rounds: outcome.rounds(),
                total_statements: transcript.len(),
            },
            participant_statistics: ParticipantStatistics {
                judge: stats(Role::Judge),
                prosecutor: stats(Role::Prosecutor),
                defense: stats(Role::Defense),
            },
            evidence_analysis: outcome.evidence.clone(),
            final_verdict: outcome.verdict.clone(),
            transcript: transcript.clone(),
            legal_sections_cited: sections.into_iter().collect(),
            evidence_presented: exhibits.into_iter().collect(),
            case_outcome: CaseOutcome {
                verdict: outcome.verdict.label,
                reasoning_summary: reasoning_summary(&outcome.verdict.reasoning),
                sentence: outcome.verdict.sentence.clone(),
                applied_sections: outcome.verdict.applied_sections.clone(),
            },
        }
    }
}

// ── Sinks ────────────────────────────────────────────────────────────────

pub trait ReportSink {
    /// Stores the report and returns where it went.
    fn persist(&self, report: &TrialReport) -> Result<PathBuf, CourtError>;
}

/// Writes `session_{case_id}_{YYYYmmdd_HHMMSS}.json` into a directory.
pub struct JsonReportSink {
    dir: PathBuf,
}

impl JsonReportSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn file_name(case_id: &str, at: DateTime<Utc>) -> String {
        format!("session_{}_{}.json", case_id, at.format("%Y%m%d_%H%M%S"))
    }
}

impl ReportSink for JsonReportSink {
    fn persist(&self, report: &TrialReport) -> Result<PathBuf, CourtError> {
        std::fs::create_dir_all(&self.dir)
            .map_err(|e| CourtError::Report(format!("create {}: {e}", self.dir.display())))?;
        let path = self
            .dir
            .join(Self::file_name(&report.case_information.case_id, Utc::now()));
        let body = serde_json::to_string_pretty(report)
            .map_err(|e| CourtError::Report(format!("serialize: {e}")))?;
        std::fs::write(&path, body)
            .map_err(|e| CourtError::Report(format!("write {}: {e}", path.display())))?;
        info!(path = %path.display(), "session report saved");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_truncates_on_char_boundary() {
        let s = reasoning_summary(&"₹".repeat(250));
        assert_eq!(s.chars().count(), 203);
        assert!(s.ends_with("..."));
        assert_eq!(reasoning_summary("short"), "short...");
    }

    #[test]
    fn file_name_format() {
        let at = DateTime::parse_from_rfc3339("2024-03-05T07:08:09Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(
            JsonReportSink::file_name("murder_case_1", at),
            "session_murder_case_1_20240305_070809.json"
        );
    }
}
