use tribunal_core::{
    config::{AiProvider, Config},
    evidence::{EvidenceAnalysis, EvidenceSummary},
    report::TrialReport,
    trial::TrialEvent,
    CaseRecord, Role, SessionState, TrialPhase, TurnRecord, Verdict,
};

#[derive(Debug, Clone, Copy)]
pub enum Color {
    Red,
    Green,
    Yellow,
    Blue,
    Purple,
    Cyan,
    Bold,
}

impl Color {
    fn code(self) -> &'static str {
        match self {
            Self::Red => "\x1b[91m",
            Self::Green => "\x1b[92m",
            Self::Yellow => "\x1b[93m",
            Self::Blue => "\x1b[94m",
            Self::Purple => "\x1b[95m",
            Self::Cyan => "\x1b[96m",
            Self::Bold => "\x1b[1m",
        }
    }
}

/// Terminal styling; a disabled palette passes text through untouched.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    enabled: bool,
}

impl Palette {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn paint(&self, text: &str, color: Color) -> String {
        if self.enabled {
            format!("{}{text}\x1b[0m", color.code())
        } else {
            text.to_string()
        }
    }
}

const RULE: &str = "================================================================================";

fn preview(text: &str, n: usize) -> String {
    let head: String = text.chars().take(n).collect();
    format!("{head}...")
}

pub fn banner(p: &Palette) {
    let banner = r"
    ╔══════════════════════════════════════════════════════════════╗
    ║                  LEGAL AI SIMULATION SYSTEM                  ║
    ║                   Advanced Courtroom AI                      ║
    ║              Indian Legal System Simulation                  ║
    ╚══════════════════════════════════════════════════════════════╝
    ";
    println!("{}", p.paint(banner, Color::Cyan));
}

pub fn case_list(p: &Palette, cases: &[CaseRecord]) {
    println!("{}", p.paint("\nAVAILABLE CASES:", Color::Bold));
    println!("{}", "-".repeat(50));
    for case in cases {
        let description: String = case.description.chars().take(100).collect();
        println!("{} {}", p.paint("•", Color::Green), p.paint(&case.id, Color::Yellow));
        println!("  Title: {}", case.title);
        println!("  Type: {}", p.paint(&case.case_type, Color::Blue));
        println!("  Complexity: {}", p.paint(case.complexity.as_str(), Color::Purple));
        println!("  Evidence Items: {}", p.paint(&case.evidence.len().to_string(), Color::Cyan));
        println!("  Description: {description}...");
        println!();
    }
}

pub fn status(p: &Palette, config: &Config) {
    println!("{}", p.paint("SYSTEM STATUS CHECK", Color::Bold));
    println!("{}", "-".repeat(30));

    let issues = config.validate();
    if issues.is_empty() {
        println!("{}", p.paint("✅ Configuration: OK", Color::Green));
    } else {
        println!("{}", p.paint("⚠️  Configuration Issues:", Color::Yellow));
        for issue in &issues {
            println!("   • {issue}");
        }
    }

    println!("{}", p.paint("🤖 AI Providers:", Color::Blue));
    let available = config.available_providers();
    for provider in [AiProvider::Gemini, AiProvider::OpenAi, AiProvider::Local, AiProvider::RuleBased] {
        if available.contains(&provider) {
            println!("   ✅ {provider}");
        } else {
            println!("   ❌ {provider} (not configured)");
        }
    }
}

fn secret(value: &str) -> &'static str {
    if value.is_empty() {
        "not set"
    } else {
        "set"
    }
}

pub fn config_summary(p: &Palette, config: &Config) {
    println!("{}", p.paint("CONFIGURATION", Color::Bold));
    println!("{}", "-".repeat(30));
    println!("Simulation:");
    println!("  Minimum rounds before early verdict: {}", config.min_rounds);
    println!("  Early verdict: {}", config.early_verdict);
    println!("  Evidence analysis: {}", config.evidence_analysis);
    println!("AI:");
    println!("  Preferred provider: {}", config.ai_provider);
    println!("  Gemini model: {} (key {})", config.gemini_model, secret(&config.gemini_api_key));
    println!("  OpenAI model: {} (key {})", config.openai_model, secret(&config.openai_api_key));
    if config.ollama_url.is_empty() {
        println!("  Local model: disabled");
    } else {
        println!("  Local model: {} at {}", config.local_model, config.ollama_url);
    }
    if !config.pretrained_model.is_empty() {
        println!("  Pretrained model: {}", config.pretrained_model);
    }
    println!(
        "  Max tokens: {}, temperature: {}, timeout: {}s",
        config.max_tokens, config.temperature, config.ai_timeout_s
    );
    println!("Output:");
    println!("  Show thinking: {}", config.show_thinking);
    println!("  Show evidence: {}", config.show_evidence);
    println!("  Colored output: {}", config.colored_output);
    if config.save_reports {
        println!("  Reports: {}/", config.report_dir);
    } else {
        println!("  Reports: disabled");
    }
    if !config.cases_file.is_empty() {
        println!("  Case file: {}", config.cases_file);
    }
}

// ── Live trial ───────────────────────────────────────────────────────────

/// Renders trial events as they arrive.
pub struct TrialPrinter {
    palette: Palette,
    show_thinking: bool,
    show_evidence: bool,
    session: Option<SessionState>,
}

impl TrialPrinter {
    pub fn new(palette: Palette, config: &Config) -> Self {
        Self {
            palette,
            show_thinking: config.show_thinking,
            show_evidence: config.show_evidence,
            session: None,
        }
    }

    pub fn handle(&mut self, event: &TrialEvent) {
        match event {
            TrialEvent::Opened {
                session,
                case_type,
                evidence,
            } => {
                self.opened(session, case_type, evidence);
                self.session = Some(session.clone());
            },
            TrialEvent::PhaseChanged(phase) => self.phase(*phase),
            TrialEvent::RoundStarted(round) => {
                println!("{}", self.palette.paint(&format!("\n--- Round {round} ---"), Color::Bold));
            },
            TrialEvent::Turn(turn) => self.turn(turn),
            TrialEvent::EvidenceAnalyzed(analysis) => {
                if self.show_evidence {
                    self.evidence(analysis);
                }
            },
            TrialEvent::ConcludedEarly { .. } => {
                println!("{}", self.palette.paint("\nCourt indicates readiness for final judgment...", Color::Yellow));
            },
            TrialEvent::Verdict(verdict) => self.verdict(verdict),
        }
    }

    fn opened(&self, session: &SessionState, case_type: &str, evidence: &EvidenceSummary) {
        let p = &self.palette;
        println!("\n{RULE}");
        println!("{}", p.paint(&format!("COURTROOM SIMULATION: {}", session.case_title), Color::Bold));
        println!("{RULE}");
        println!("Judge: {}", session.participants.judge);
        println!("Prosecutor: {}", session.participants.prosecutor);
        println!("Defense: {}", session.participants.defense);
        println!("Case Type: {case_type}");
        println!("Simulation Mode: {}", session.mode.as_str().to_uppercase());
        println!("{RULE}\n");

        println!("EVIDENCE SUMMARY:");
        println!("- Total Evidence: {}", evidence.total);
        println!("- Strong Evidence: {}", evidence.strong_count);
        println!("- Overall Case Strength: {:.2}/1.0", evidence.overall_strength);
        if evidence.gaps.is_empty() {
            println!("- Evidence Gaps: None identified");
        } else {
            println!("- Evidence Gaps: {}", evidence.gaps.join(", "));
        }
        println!("\n{RULE}\n");
    }

    fn phase(&self, phase: TrialPhase) {
        let p = &self.palette;
        match phase {
            TrialPhase::Opening => {
                println!("{}", p.paint("PHASE 1: OPENING STATEMENTS", Color::Bold));
                println!("{}", "-".repeat(50));
            },
            TrialPhase::Arguments => {
                println!("{}", p.paint("\nPHASE 2: ARGUMENTS AND EVIDENCE PRESENTATION", Color::Bold));
                println!("{}", "-".repeat(50));
            },
            TrialPhase::Verdict => {
                println!("\n{RULE}");
                println!("{}", p.paint("PHASE 3: FINAL JUDGMENT", Color::Bold));
                println!("{RULE}");
            },
        }
    }

    fn speaker(&self, role: Role) -> String {
        let name = self
            .session
            .as_ref()
            .map(|s| s.participants.name_of(role).to_string())
            .unwrap_or_default();
        let color = match role {
            Role::Prosecutor => Color::Red,
            Role::Defense => Color::Blue,
            Role::Judge => Color::Purple,
        };
        self.palette.paint(&format!("**{name} ({})**", role.title()), color)
    }

    fn turn(&self, turn: &TurnRecord) {
        println!("\n{}", self.speaker(turn.role));
        println!("{}", turn.statement);
        if self.show_thinking && turn.phase == TrialPhase::Arguments && !turn.reasoning.is_empty() {
            let label = match turn.role {
                Role::Judge => "Judicial Reasoning",
                _ => "Thinking Process",
            };
            println!(
                "\n{}",
                self.palette.paint(&format!("***{label}:*** *{}*", preview(&turn.reasoning, 200)), Color::Cyan)
            );
        }
    }

    fn evidence(&self, analysis: &EvidenceAnalysis) {
        let p = &self.palette;
        println!("{}", p.paint(&format!("\n    [EVIDENCE ANALYSIS: {}]", analysis.evidence_id), Color::Yellow));
        println!(
            "    Strength: {:.2} | Relevance: {:.2}",
            analysis.strength, analysis.relevance
        );
        if !analysis.challenges.is_empty() {
            let challenges: Vec<&str> = analysis.challenges.iter().take(2).map(String::as_str).collect();
            println!("    Potential Challenges: {}", challenges.join(", "));
        }
    }

    fn verdict(&self, verdict: &Verdict) {
        let color = if verdict.is_guilty() { Color::Red } else { Color::Green };
        println!("\n{}", self.palette.paint(&format!("VERDICT: {}", verdict.label), color));
    }
}

pub fn final_summary(p: &Palette, report: &TrialReport) {
    let cited = if report.legal_sections_cited.is_empty() {
        "None".to_string()
    } else {
        report.legal_sections_cited.join(", ")
    };
    println!("\n{RULE}");
    println!("{}", p.paint("SIMULATION COMPLETED - FINAL SUMMARY", Color::Bold));
    println!("{RULE}");
    println!("Case: {}", report.case_information.title);
    println!("Duration: {:.1} minutes", report.simulation_details.duration_minutes);
    println!("Total Rounds: {}", report.simulation_details.total_rounds);
    println!("Final Verdict: {}", report.final_verdict.label);
    println!("Evidence Strength: {:.2}/1.0", report.evidence_analysis.overall_strength);
    println!("Legal Sections Cited: {cited}");
    println!("{RULE}");
}
