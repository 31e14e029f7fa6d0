use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::error;
use tribunal_agent::build_providers;
use tribunal_core::{
    config::{AiProvider, Config},
    report::{JsonReportSink, ReportSink, TrialReport},
    trial::{Trial, TrialEvent},
    CaseRecord, Participants, SimulationMode,
};

use crate::output::{self, Color, Palette, TrialPrinter};

/// Runs one simulation end to end. `Ok(false)` means the run failed and the
/// reason has already been shown to the user.
pub async fn run_simulation(
    config: &Config,
    palette: Palette,
    catalog: &[CaseRecord],
    case_id: &str,
    mode: SimulationMode,
    forced: Option<AiProvider>,
) -> Result<bool> {
    let case = match tribunal_cases::find_case(catalog, case_id) {
        Ok(case) => case,
        Err(e) => {
            println!("{}", palette.paint(&format!("❌ {e}"), Color::Red));
            println!("\nAvailable cases:");
            for c in catalog {
                println!("  • {}", c.id);
            }
            return Ok(false);
        },
    };
    let case_id = case.id.as_str();

    let providers = build_providers(config, forced)?;
    if providers.is_empty() {
        println!("{}", palette.paint("🤖 Using rule-based AI", Color::Yellow));
    } else {
        let provider = forced.unwrap_or(config.ai_provider);
        println!("{}", palette.paint(&format!("🤖 Using AI provider: {provider}"), Color::Green));
    }
    println!(
        "{}",
        palette.paint(&format!("🚀 Starting {} simulation for: {case_id}", mode.as_str()), Color::Green)
    );

    let case = Arc::new(case.clone());
    let trial = match Trial::new(
        case.clone(),
        mode,
        Participants::default(),
        providers,
        config.trial_settings(),
    ) {
        Ok(t) => t,
        Err(e) => {
            error!(case = %case_id, "failed to open trial: {e}");
            println!("{}", palette.paint(&format!("❌ Simulation failed: {e}"), Color::Red));
            return Ok(false);
        },
    };

    let (tx, mut rx) = mpsc::unbounded_channel::<TrialEvent>();
    let mut printer = TrialPrinter::new(palette, config);
    let printing = async {
        while let Some(event) = rx.recv().await {
            printer.handle(&event);
        }
    };
    let (outcome, ()) = tokio::join!(trial.with_events(tx).run(), printing);

    let outcome = match outcome {
        Ok(o) => o,
        Err(e) => {
            error!(case = %case_id, "simulation failed: {e}");
            println!("{}", palette.paint(&format!("❌ Simulation failed: {e}"), Color::Red));
            return Ok(false);
        },
    };

    let report = TrialReport::build(&case, &outcome);
    output::final_summary(&palette, &report);

    if config.save_reports {
        let sink = JsonReportSink::new(&config.report_dir);
        match sink.persist(&report) {
            Ok(path) => {
                println!("{}", palette.paint(&format!("📁 Report saved: {}", path.display()), Color::Cyan));
            },
            Err(e) => {
                error!(case = %case_id, "{e}");
                println!("{}", palette.paint(&format!("❌ {e}"), Color::Red));
                return Ok(false);
            },
        }
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(report_dir: &std::path::Path) -> Config {
        let vars: HashMap<String, String> = [
            ("AI_PROVIDER", "rule_based"),
            ("COLORED_OUTPUT", "false"),
            ("REPORT_DIR", report_dir.to_str().unwrap()),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        Config::from_vars(&vars).unwrap()
    }

    #[tokio::test]
    async fn short_case_name_runs_the_full_case() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        let catalog = tribunal_cases::all_cases();

        let ok = run_simulation(&config, Palette::new(false), &catalog, "theft", SimulationMode::Quick, None)
            .await
            .unwrap();
        assert!(ok);

        let saved: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(saved.len(), 1);
        assert!(saved[0].starts_with("session_theft_case_1_"));
    }

    #[tokio::test]
    async fn unknown_case_fails_without_a_report() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        let catalog = tribunal_cases::all_cases();

        let ok = run_simulation(&config, Palette::new(false), &catalog, "arson_case_9", SimulationMode::Quick, None)
            .await
            .unwrap();
        assert!(!ok);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
