use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info};

use crate::{
    agent::{Adjudicator, CourtAgent},
    counsel::Counsel,
    error::CourtError,
    evidence::{self, EvidenceAnalysis, EvidenceSummary},
    generation::ProviderSet,
    judge::Judge,
    types::{
        CaseRecord, Participants, Role, SessionState, SimulationMode, Statement, TrialPhase,
        TurnRecord, Verdict,
    },
};

/// Phrases in the judge's statement that end the arguments once the round floor is reached.
pub const CONCLUSION_PHRASES: &[&str] = &[
    "ready to pronounce",
    "sufficient evidence",
    "conclude the matter",
    "final judgment",
    "render verdict",
    "case is clear",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrialSettings {
    pub early_verdict: bool,
    /// Lowest round number (checked after the increment) at which early conclusion is allowed.
    pub early_verdict_floor: u32,
    /// Publish an evidence analysis whenever the prosecution cites an exhibit.
    pub evidence_analysis: bool,
}

impl Default for TrialSettings {
    fn default() -> Self {
        Self {
            early_verdict: true,
            early_verdict_floor: 6,
            evidence_analysis: true,
        }
    }
}

/// Progress notifications for live display. Sending never affects the trial.
#[derive(Debug, Clone)]
pub enum TrialEvent {
    Opened {
        session: SessionState,
        case_type: String,
        evidence: EvidenceSummary,
    },
    PhaseChanged(TrialPhase),
    RoundStarted(u32),
    Turn(TurnRecord),
    EvidenceAnalyzed(EvidenceAnalysis),
    ConcludedEarly { round: u32 },
    Verdict(Verdict),
}

#[derive(Debug, Clone)]
pub struct TrialOutcome {
    pub session: SessionState,
    pub transcript: Vec<TurnRecord>,
    pub verdict: Verdict,
    pub evidence: EvidenceSummary,
    pub finished_at: DateTime<Utc>,
}

impl TrialOutcome {
    /// Completed argument rounds.
    pub fn rounds(&self) -> u32 {
        self.session.round.saturating_sub(1)
    }
}

pub fn concludes_early(statement: &str, round: u32, settings: &TrialSettings) -> bool {
    if !settings.early_verdict || round < settings.early_verdict_floor {
        return false;
    }
    let lower = statement.to_lowercase();
    CONCLUSION_PHRASES.iter().any(|p| lower.contains(p))
}

/// One courtroom run: opening, argument rounds, verdict. `run` consumes the
/// trial so a finished session cannot be resumed.
pub struct Trial {
    case: Arc<CaseRecord>,
    session: SessionState,
    settings: TrialSettings,
    prosecutor: Box<dyn CourtAgent>,
    defense: Box<dyn CourtAgent>,
    judge: Box<dyn Adjudicator>,
    transcript: Vec<TurnRecord>,
    events: Option<UnboundedSender<TrialEvent>>,
}

impl Trial {
    /// Seats the standard heuristic/provider-backed participants.
    pub fn new(
        case: Arc<CaseRecord>,
        mode: SimulationMode,
        participants: Participants,
        providers: ProviderSet,
        settings: TrialSettings,
    ) -> Result<Self, CourtError> {
        let prosecutor = Counsel::prosecutor(&participants.prosecutor, case.clone(), providers.clone())?;
        let defense = Counsel::defense(&participants.defense, case.clone(), providers.clone())?;
        let judge = Judge::new(&participants.judge, case.clone(), providers)?;
        Self::with_agents(
            case,
            mode,
            participants,
            settings,
            Box::new(prosecutor),
            Box::new(defense),
            Box::new(judge),
        )
    }

    pub fn with_agents(
        case: Arc<CaseRecord>,
        mode: SimulationMode,
        participants: Participants,
        settings: TrialSettings,
        prosecutor: Box<dyn CourtAgent>,
        defense: Box<dyn CourtAgent>,
        judge: Box<dyn Adjudicator>,
    ) -> Result<Self, CourtError> {
        case.validate()?;
        for (agent, expected) in [
            (prosecutor.role(), Role::Prosecutor),
            (defense.role(), Role::Defense),
            (judge.role(), Role::Judge),
        ] {
            if agent != expected {
                return Err(CourtError::Config(format!(
                    "{expected} seat given to a {agent} agent"
                )));
            }
        }

        let session = SessionState {
            case_id: case.id.clone(),
            case_title: case.title.clone(),
            participants,
            phase: TrialPhase::Opening,
            round: 0,
            total_rounds: mode.max_rounds(),
            mode,
            started_at: Utc::now(),
        };
        Ok(Self {
            case,
            session,
            settings,
            prosecutor,
            defense,
            judge,
            transcript: Vec::new(),
            events: None,
        })
    }

    pub fn with_events(mut self, tx: UnboundedSender<TrialEvent>) -> Self {
        self.events = Some(tx);
        self
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    fn emit(&self, event: TrialEvent) {
        if let Some(tx) = &self.events {
            // receiver may be gone; the trial carries on regardless
            let _ = tx.send(event);
        }
    }

    fn set_phase(&mut self, phase: TrialPhase) {
        self.session.phase = phase;
        info!(case = %self.session.case_id, phase = phase.as_str(), round = self.session.round, "phase change");
        self.emit(TrialEvent::PhaseChanged(phase));
    }

    fn push_turn(&mut self, statement: Statement) -> TurnRecord {
        let turn = TurnRecord::from_statement(statement, self.session.round, self.session.phase);
        self.transcript.push(turn.clone());
        self.emit(TrialEvent::Turn(turn.clone()));
        turn
    }

    pub async fn run(mut self) -> Result<TrialOutcome, CourtError> {
        let summary = evidence::summarize(&self.case.evidence, &self.case);
        info!(
            case = %self.session.case_id,
            mode = self.session.mode.as_str(),
            total_rounds = self.session.total_rounds,
            evidence = summary.total,
            strength = summary.overall_strength,
            "trial opened"
        );
        self.emit(TrialEvent::Opened {
            session: self.session.clone(),
            case_type: self.case.case_type.clone(),
            evidence: summary.clone(),
        });

        self.opening();
        self.arguments().await;
        let verdict = self.verdict().await?;

        Ok(TrialOutcome {
            session: self.session,
            transcript: self.transcript,
            verdict,
            evidence: summary,
            finished_at: Utc::now(),
        })
    }

    fn opening(&mut self) {
        self.set_phase(TrialPhase::Opening);
        let statement = format!(
            "The Court is in session. We are here for the trial of {}. \
             The accused stands charged under the relevant provisions of the Indian Penal Code. \
             The prosecution may present their opening statement.",
            self.session.case_title
        );
        self.push_turn(Statement {
            role: Role::Judge,
            statement,
            reasoning: "Opening court session and establishing formal proceedings".into(),
            evidence: None,
            section: None,
        });
        self.session.round = 1;
    }

    async fn arguments(&mut self) {
        self.set_phase(TrialPhase::Arguments);
        let mut last_statement: Option<String> = None;

        while self.session.round <= self.session.total_rounds {
            let round = self.session.round;
            debug!(case = %self.session.case_id, round, "round started");
            self.emit(TrialEvent::RoundStarted(round));

            let thought = self.prosecutor.think(last_statement.as_deref()).await;
            let prosecution = self.prosecutor.speak(&thought);
            self.prosecutor.remember(&prosecution.statement, &thought.reasoning);
            let prosecution = self.push_turn(prosecution);
            if let Some(id) = prosecution.evidence.as_deref() {
                self.analyze_cited(id);
            }
            self.defense.observe(Role::Prosecutor, &prosecution.statement);
            self.judge
                .record(Role::Prosecutor, &prosecution.statement, &prosecution.reasoning);

            let thought = self.defense.think(Some(&prosecution.statement)).await;
            let defense = self.defense.speak(&thought);
            self.defense.remember(&defense.statement, &thought.reasoning);
            let defense = self.push_turn(defense);
            self.prosecutor.observe(Role::Defense, &defense.statement);
            self.judge
                .record(Role::Defense, &defense.statement, &defense.reasoning);

            let exchange = format!(
                "Prosecution: {} Defense: {}",
                prosecution.statement, defense.statement
            );
            let thought = self.judge.think(Some(&exchange)).await;
            let bench = self.judge.speak(&thought);
            self.judge.remember(&bench.statement, &thought.reasoning);
            let bench = self.push_turn(bench);
            self.prosecutor.observe(Role::Judge, &bench.statement);
            self.defense.observe(Role::Judge, &bench.statement);

            self.session.round += 1;
            if concludes_early(&bench.statement, self.session.round, &self.settings) {
                info!(case = %self.session.case_id, round, "court ready for judgment");
                self.emit(TrialEvent::ConcludedEarly { round });
                break;
            }
            last_statement = Some(bench.statement);
        }
    }

    fn analyze_cited(&self, id: &str) {
        if !self.settings.evidence_analysis {
            return;
        }
        if let Some(item) = self.case.evidence_item(id) {
            self.emit(TrialEvent::EvidenceAnalyzed(evidence::analyze(item, &self.case)));
        }
    }

    async fn verdict(&mut self) -> Result<Verdict, CourtError> {
        self.set_phase(TrialPhase::Verdict);
        let verdict = self.judge.render(&self.transcript).await?;

        let mut statement = format!(
            "After careful consideration of all evidence presented, the arguments of learned counsel, \
             and the applicable provisions of law, this Court finds the accused {}. \n\nREASONING: {}",
            verdict.label, verdict.reasoning
        );
        if verdict.is_guilty() {
            if let Some(sentence) = &verdict.sentence {
                statement.push_str(&format!("\n\nSENTENCE: {sentence}"));
            }
        }
        statement.push_str(&format!(
            "\n\nThis judgment is pronounced in open court on {}.",
            Utc::now().format("%B %d, %Y")
        ));

        self.push_turn(Statement {
            role: Role::Judge,
            statement,
            reasoning: "Final verdict and reasoning".into(),
            evidence: None,
            section: None,
        });
        self.emit(TrialEvent::Verdict(verdict.clone()));
        Ok(verdict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn early_conclusion_respects_floor() {
        let s = TrialSettings::default();
        assert!(!concludes_early("Ready to pronounce", 5, &s));
        assert!(concludes_early("The court is READY TO PRONOUNCE", 6, &s));
        assert!(!concludes_early("nothing to see", 9, &s));
    }

    #[test]
    fn early_conclusion_can_be_disabled() {
        let s = TrialSettings {
            early_verdict: false,
            ..Default::default()
        };
        assert!(!concludes_early("final judgment", 10, &s));
    }
}
