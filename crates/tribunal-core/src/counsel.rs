use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::info;

use crate::{
    agent::{Capability, CourtAgent, Memory},
    error::CourtError,
    evidence::{self, EvidenceAnalysis},
    generation::{Generator, ProviderSet},
    prompt, statute,
    types::{CaseRecord, EvidenceItem, Role, Statement, Thought},
};

// ── Opponent analysis ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    BurdenOfProofChallenge,
    AlibiDefense,
    Justification,
    CircumstantialEvidenceAttack,
}

const STRATEGY_CUES: &[(Strategy, &[&str])] = &[
    (
        Strategy::BurdenOfProofChallenge,
        &["reasonable doubt", "burden of proof", "insufficient evidence"],
    ),
    (Strategy::AlibiDefense, &["alibi", "elsewhere", "not present"]),
    (Strategy::Justification, &["self-defense", "justified", "protection"]),
    (
        Strategy::CircumstantialEvidenceAttack,
        &["circumstantial", "indirect", "speculation"],
    ),
];

const LEGAL_TERMS: &[&str] = &[
    "evidence",
    "witness",
    "alibi",
    "motive",
    "intent",
    "reasonable doubt",
    "burden of proof",
    "circumstantial",
    "direct",
    "testimony",
    "forensic",
    "guilty",
    "innocent",
    "verdict",
    "sentence",
    "conviction",
    "acquittal",
];

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StrategyProfile {
    pub strategies: Vec<Strategy>,
    pub statement_count: usize,
    pub average_length: f64,
    pub key_themes: Vec<String>,
}

/// Up to ten legal terms found in `text` (already lowercased), in list order.
pub fn key_themes(text: &str) -> Vec<String> {
    LEGAL_TERMS
        .iter()
        .filter(|t| text.contains(*t))
        .take(10)
        .map(|t| (*t).to_string())
        .collect()
}

pub fn analyze_opponent_strategy(statements: &[String]) -> StrategyProfile {
    if statements.is_empty() {
        return StrategyProfile::default();
    }
    let all = statements.join(" ").to_lowercase();
    let strategies = STRATEGY_CUES
        .iter()
        .filter(|(_, cues)| cues.iter().any(|c| all.contains(c)))
        .map(|(s, _)| *s)
        .collect();
    let total: usize = statements.iter().map(|s| s.chars().count()).sum();
    StrategyProfile {
        strategies,
        statement_count: statements.len(),
        average_length: total as f64 / statements.len() as f64,
        key_themes: key_themes(&all),
    }
}

fn strength_tier(score: f64) -> &'static str {
    if score > 0.8 {
        "high"
    } else if score > 0.6 {
        "considerable"
    } else if score > 0.4 {
        "moderate"
    } else {
        "limited"
    }
}

// ── Counsel ──────────────────────────────────────────────────────────────

/// Prosecution or defense advocate. The side decides which exhibits are
/// pressed and how the argument is framed; everything else is shared.
pub struct Counsel {
    role: Role,
    name: String,
    case: Arc<CaseRecord>,
    memory: Memory,
    generator: Generator,
    cited: Vec<String>,
    opponent_statements: Vec<String>,
}

impl Counsel {
    pub fn new(
        role: Role,
        name: impl Into<String>,
        case: Arc<CaseRecord>,
        providers: ProviderSet,
    ) -> Result<Self, CourtError> {
        if role == Role::Judge {
            return Err(CourtError::Config("counsel must argue for the prosecution or the defense".into()));
        }
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CourtError::Config(format!("{role} name must not be empty")));
        }
        case.validate()?;
        info!(role = %role, counsel = %name, case = %case.id, rule_based = providers.is_empty(), "counsel appointed");
        Ok(Self {
            generator: Generator::new(providers, role, name.clone()),
            role,
            name,
            case,
            memory: Memory::default(),
            cited: Vec::new(),
            opponent_statements: Vec::new(),
        })
    }

    pub fn prosecutor(
        name: impl Into<String>,
        case: Arc<CaseRecord>,
        providers: ProviderSet,
    ) -> Result<Self, CourtError> {
        Self::new(Role::Prosecutor, name, case, providers)
    }

    pub fn defense(
        name: impl Into<String>,
        case: Arc<CaseRecord>,
        providers: ProviderSet,
    ) -> Result<Self, CourtError> {
        Self::new(Role::Defense, name, case, providers)
    }

    /// Exhibits this counsel has cited so far, in order.
    pub fn cited(&self) -> &[String] {
        &self.cited
    }

    /// Strategies opposing counsel has used so far. Statements from the bench
    /// are not counted.
    pub fn opponent_profile(&self) -> StrategyProfile {
        analyze_opponent_strategy(&self.opponent_statements)
    }

    fn note_citation(&mut self, evidence: Option<&str>) {
        if let Some(id) = evidence {
            if !self.cited.iter().any(|c| c == id) {
                self.cited.push(id.to_string());
            }
        }
    }

    /// Prefers pressing exhibits that speak to the primary charge, strongest
    /// first; otherwise the overall ranking.
    fn prosecution_pick(&self) -> Option<&EvidenceItem> {
        let keywords = statute::primary_section(&self.case)
            .map(|s| s.keywords.clone())
            .unwrap_or_default();
        let mut candidates: Vec<&EvidenceItem> = evidence::relevant_evidence(&self.case, &keywords)
            .into_iter()
            .filter(|e| e.relevance.is_pressing())
            .collect();
        if candidates.is_empty() {
            candidates = evidence::rank(&self.case.evidence, &self.case)
                .into_iter()
                .map(|r| r.item)
                .collect();
        }
        self.first_uncited(&candidates)
    }

    /// Weakest exhibit first.
    fn defense_pick(&self) -> Option<&EvidenceItem> {
        let candidates: Vec<&EvidenceItem> = evidence::rank(&self.case.evidence, &self.case)
            .into_iter()
            .rev()
            .map(|r| r.item)
            .collect();
        self.first_uncited(&candidates)
    }

    fn first_uncited<'a>(&self, candidates: &[&'a EvidenceItem]) -> Option<&'a EvidenceItem> {
        candidates
            .iter()
            .find(|e| !self.cited.contains(&e.id))
            .or_else(|| candidates.first())
            .copied()
    }

    fn heuristic(&self) -> Thought {
        match self.role {
            Role::Defense => self.defense_heuristic(),
            _ => self.prosecution_heuristic(),
        }
    }

    fn prosecution_heuristic(&self) -> Thought {
        let primary = statute::primary_section(&self.case);
        let pick = self.prosecution_pick();
        let analysis = pick.map(|e| evidence::analyze(e, &self.case));
        let mut t = String::new();

        match (pick, &analysis) {
            (Some(item), Some(a)) => {
                t.push_str(&format!(
                    "The prosecution relies on {}, a {} exhibit of {} strength ({:.2}) and {} relevance ({:.2}) to the charge. ",
                    item.id,
                    item.category,
                    strength_tier(a.strength),
                    a.strength,
                    strength_tier(a.relevance),
                    a.relevance
                ));
                if !a.key_points.is_empty() {
                    let points: Vec<&str> = a.key_points.iter().take(2).map(String::as_str).collect();
                    t.push_str(&format!("It establishes: {}. ", points.join("; ")));
                }
            },
            _ => t.push_str("The prosecution relies on the facts of the case as set out in the charge. "),
        }

        let section = analysis
            .as_ref()
            .and_then(|a| a.supporting_sections.first().cloned())
            .or_else(|| primary.map(|s| s.id.clone()));
        if let Some(s) = section.as_deref().and_then(|id| self.case.statute(id)) {
            t.push_str(&format!(
                "This goes directly to the ingredients of Section {} ({}). ",
                s.id, s.title
            ));
        }

        for strategy in &self.opponent_profile().strategies {
            t.push_str(match strategy {
                Strategy::BurdenOfProofChallenge => {
                    "The appeal to reasonable doubt is misplaced; the chain of evidence is consistent and unbroken. "
                },
                Strategy::AlibiDefense => "No credible alibi places the accused elsewhere at the material time. ",
                Strategy::Justification => {
                    "Nothing on record suggests the accused acted under any lawful justification. "
                },
                Strategy::CircumstantialEvidenceAttack => {
                    "Circumstantial evidence, when complete, is as probative as direct evidence. "
                },
            });
        }

        t.push_str("The prosecution submits that guilt is established beyond reasonable doubt.");
        Thought {
            reasoning: t,
            evidence: pick.map(|e| e.id.clone()),
            section,
        }
    }

    fn defense_heuristic(&self) -> Thought {
        let primary = statute::primary_section(&self.case);
        let pick = self.defense_pick();
        let analysis: Option<EvidenceAnalysis> = pick.map(|e| evidence::analyze(e, &self.case));
        let mut t = String::new();

        match (pick, &analysis) {
            (Some(item), Some(a)) => {
                t.push_str(&format!(
                    "Exhibit {} is the weakest link in the prosecution's chain, with {} strength ({:.2}) and admissibility of {:.2}. ",
                    item.id,
                    strength_tier(a.strength),
                    a.strength,
                    a.admissibility
                ));
                if !a.challenges.is_empty() {
                    let challenges: Vec<&str> = a.challenges.iter().take(2).map(String::as_str).collect();
                    t.push_str(&format!("It is open to challenge: {}. ", challenges.join("; ")));
                }
            },
            _ => t.push_str("The prosecution has placed no reliable exhibit on record against the accused. "),
        }

        let gaps = evidence::evidence_gaps(&self.case.evidence, &self.case);
        if !gaps.is_empty() {
            let gaps: Vec<&str> = gaps.iter().take(2).map(String::as_str).collect();
            t.push_str(&format!("The record is silent on key matters: {}. ", gaps.join("; ")));
        }

        if let Some(last) = self.opponent_statements.last() {
            let themes = key_themes(&last.to_lowercase());
            if themes.iter().any(|th| th == "motive") {
                t.push_str("Motive alone has never been proof of guilt. ");
            }
            if themes.iter().any(|th| th == "forensic") {
                t.push_str("Forensic findings must be tied to the accused, not merely to the scene. ");
            }
            if themes.iter().any(|th| th == "witness" || th == "testimony") {
                t.push_str("Testimony is subject to the frailties of memory and perception. ");
            }
        }

        if let Some(s) = primary {
            t.push_str(&format!(
                "Every ingredient of Section {} ({}) must be proved and not presumed. ",
                s.id, s.title
            ));
        }
        t.push_str("The accused is presumed innocent until the prosecution proves otherwise beyond reasonable doubt.");

        Thought {
            reasoning: t,
            evidence: pick.map(|e| e.id.clone()),
            section: primary.map(|s| s.id.clone()),
        }
    }
}

#[async_trait]
impl CourtAgent for Counsel {
    fn role(&self) -> Role {
        self.role
    }

    fn name(&self) -> &str {
        &self.name
    }

    async fn think(&mut self, last_statement: Option<&str>) -> Thought {
        let base = prompt::base_prompt(&self.case, self.role, &self.name, last_statement, &self.memory);
        let prompt = prompt::role_prompt(self.role, &base);

        let thought = match self.generator.generate(&self.case, &prompt, Capability::Argument).await {
            Some(g) => Thought {
                reasoning: g.thought,
                evidence: g.evidence,
                section: g.section,
            },
            None => self.heuristic(),
        };
        self.note_citation(thought.evidence.as_deref());
        thought
    }

    fn speak(&self, thought: &Thought) -> Statement {
        let mut s = String::from("Your Honor, ");
        match self.role {
            Role::Defense => {
                if let Some(e) = &thought.evidence {
                    s.push_str(&format!("the defense must respectfully question {e}. "));
                }
                s.push_str(&thought.reasoning);
                if let Some(id) = &thought.section {
                    s.push_str(&format!(
                        " The accused is entitled to the benefit of every reasonable doubt under Section {id}."
                    ));
                }
            },
            _ => {
                if let Some(e) = &thought.evidence {
                    s.push_str(&format!("the prosecution draws the Court's attention to {e}. "));
                }
                s.push_str(&thought.reasoning);
                if let Some(id) = &thought.section {
                    s.push_str(&format!(" We submit that Section {id} is attracted on these facts."));
                }
            },
        }
        Statement {
            role: self.role,
            statement: s,
            reasoning: thought.reasoning.clone(),
            evidence: thought.evidence.clone(),
            section: thought.section.clone(),
        }
    }

    fn remember(&mut self, statement: &str, reasoning: &str) {
        self.memory.push(statement, reasoning);
    }

    fn observe(&mut self, speaker: Role, statement: &str) {
        if self.role.opponent() == Some(speaker) {
            self.opponent_statements.push(statement.to_string());
        }
    }
}
