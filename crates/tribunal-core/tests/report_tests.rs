use std::sync::Arc;

use tribunal_core::{
    generation::ProviderSet,
    report::{JsonReportSink, ReportSink, TrialReport},
    trial::{Trial, TrialSettings},
    CaseRecord, Complexity, EvidenceItem, Participants, RelevanceTag, SimulationMode,
    StatuteSection,
};

fn theft_case() -> Arc<CaseRecord> {
    Arc::new(CaseRecord {
        id: "theft_case_1".into(),
        title: "The State vs. Rajesh Kumar".into(),
        case_type: "Theft Case".into(),
        description: "Theft of valuable jewelry from employer's residence".into(),
        summary: "The servant took the jewelry from the bedroom safe in breach of trust.".into(),
        complexity: Complexity::Medium,
        evidence: vec![
            EvidenceItem::new(
                "CCTV_Footage.mp4",
                "digital",
                "Footage shows the accused entering the bedroom at 14:32 on the day of the theft.",
                RelevanceTag::Critical,
            ),
            EvidenceItem::new(
                "Pawn_Shop_Receipt.pdf",
                "documentary",
                "Receipt for a diamond necklace pawned for ₹1,20,000 two days later.",
                RelevanceTag::High,
            ),
        ],
        statutes: vec![
            StatuteSection::new("379", "Theft", "Punishment for theft", &["theft", "possession"]),
            StatuteSection::new(
                "381",
                "Theft by clerk or servant",
                "Theft by clerk or servant of property in possession of master",
                &["servant", "trust"],
            ),
        ],
    })
}

async fn run(case: Arc<CaseRecord>) -> (Arc<CaseRecord>, tribunal_core::trial::TrialOutcome) {
    let outcome = Trial::new(
        case.clone(),
        SimulationMode::Quick,
        Participants::default(),
        ProviderSet::rule_based(),
        TrialSettings::default(),
    )
    .unwrap()
    .run()
    .await
    .unwrap();
    (case, outcome)
}

#[tokio::test]
async fn test_report_counts_match_transcript() {
    let (case, outcome) = run(theft_case()).await;
    let report = TrialReport::build(&case, &outcome);

    let stats = &report.participant_statistics;
    assert_eq!(stats.judge.name, "Justice Verma");
    assert_eq!(
        stats.judge.statements + stats.prosecutor.statements + stats.defense.statements,
        outcome.transcript.len()
    );
    assert_eq!(stats.prosecutor.statements as u32, outcome.rounds());
    assert_eq!(stats.defense.statements as u32, outcome.rounds());
    assert_eq!(report.simulation_details.total_statements, outcome.transcript.len());
    assert_eq!(report.simulation_details.total_rounds, outcome.rounds());
    assert_eq!(report.case_information.case_id, "theft_case_1");
    assert!(report.case_outcome.reasoning_summary.ends_with("..."));
    assert!(report.simulation_details.duration_minutes >= 0.0);
}

#[tokio::test]
async fn test_report_citations_are_sorted_and_unique() {
    let (case, outcome) = run(theft_case()).await;
    let report = TrialReport::build(&case, &outcome);

    let mut sorted = report.evidence_presented.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(report.evidence_presented, sorted);
    assert!(!report.evidence_presented.is_empty());
    for id in &report.evidence_presented {
        assert!(case.evidence_item(id).is_some(), "unknown exhibit {id}");
    }

    let mut sections = report.legal_sections_cited.clone();
    sections.sort();
    sections.dedup();
    assert_eq!(report.legal_sections_cited, sections);
}

#[tokio::test]
async fn test_json_sink_writes_named_file() {
    let dir = tempfile::tempdir().unwrap();
    let sink = JsonReportSink::new(dir.path().join("reports"));
    let (case, outcome) = run(theft_case()).await;
    let report = TrialReport::build(&case, &outcome);

    let path = sink.persist(&report).unwrap();
    assert!(path.starts_with(sink.dir()));
    let name = path.file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("session_theft_case_1_"));
    assert!(name.ends_with(".json"));

    let body = std::fs::read_to_string(&path).unwrap();
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["case_information"]["type"], "Theft Case");
    assert_eq!(json["case_information"]["complexity"], "medium");
    assert_eq!(json["simulation_details"]["mode"], "quick");
    assert_eq!(json["final_verdict"]["verdict"], report.case_outcome.verdict.as_str());
    assert_eq!(
        json["transcript"].as_array().unwrap().len(),
        outcome.transcript.len()
    );
}

#[test]
fn test_json_sink_reports_unwritable_dir() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not_a_dir");
    std::fs::write(&blocker, "x").unwrap();

    let case = theft_case();
    let rt = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
    let (_, outcome) = rt.block_on(run(case.clone()));
    let report = TrialReport::build(&case, &outcome);

    let err = JsonReportSink::new(&blocker).persist(&report).unwrap_err();
    assert!(matches!(err, tribunal_core::CourtError::Report(_)));
}
