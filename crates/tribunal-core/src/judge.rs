use std::{collections::HashSet, sync::Arc};

use async_trait::async_trait;
use tracing::info;

use crate::{
    agent::{Adjudicator, Capability, CourtAgent, Memory},
    error::CourtError,
    generation::{Generator, ProviderSet},
    prompt, statute,
    types::{ArgumentRecord, CaseRecord, RelevanceTag, Role, Statement, Thought, TurnRecord, Verdict},
    verdict::{self, VerdictInputs},
};

/// Recorded arguments (both sides together) after which the bench turns to judgment.
pub const JUDGMENT_THRESHOLD: usize = 6;

// ── Judicial heuristics ──────────────────────────────────────────────────

fn category_weight(category: &str) -> f64 {
    match category {
        "forensic" | "dna" | "fingerprint" | "video" | "audio" => 0.3,
        "medical" | "post-mortem" | "autopsy" => 0.25,
        "witness" | "testimony" | "statement" => 0.2,
        "document" | "record" | "report" => 0.15,
        "physical" | "material" => 0.2,
        "digital" | "electronic" => 0.1,
        _ => 0.0,
    }
}

/// Bench view of the evidence: exact category weights plus tag and length bonuses.
pub fn judicial_evidence_strength(case: &CaseRecord) -> f64 {
    if case.evidence.is_empty() {
        return 0.0;
    }
    let mut score = 0.0;
    for ev in &case.evidence {
        score += category_weight(&ev.category);
        score += match ev.relevance {
            RelevanceTag::Critical => 0.2,
            RelevanceTag::High => 0.15,
            RelevanceTag::Medium => 0.1,
            RelevanceTag::Low => 0.0,
        };
        let len = ev.description.chars().count();
        if len > 500 {
            score += 0.1;
        } else if len > 200 {
            score += 0.05;
        }
    }
    f64::min(score, 1.0)
}

pub fn legal_complexity(case: &CaseRecord) -> f64 {
    let summary = case.summary.to_lowercase();
    let sections = case
        .statutes
        .iter()
        .filter(|s| s.keyword_hits(&summary) > 0)
        .count();
    let categories: HashSet<&str> = case.evidence.iter().map(|e| e.category.as_str()).collect();
    let score = (sections as f64 * 0.2).min(0.6) + (categories.len() as f64 * 0.1).min(0.4);
    score.min(1.0)
}

/// The exhibit sharing the most summary words with its text. The summary is
/// taken word by word, duplicates included; the first item wins ties.
fn most_referenced_evidence(case: &CaseRecord) -> Option<String> {
    let summary = case.summary.to_lowercase();
    let words: Vec<&str> = summary.split_whitespace().collect();
    let mut best: Option<&str> = None;
    let mut best_score = 0;
    for ev in &case.evidence {
        let text = ev.description.to_lowercase();
        let score = words.iter().filter(|w| text.contains(*w)).count();
        if score > best_score {
            best_score = score;
            best = Some(ev.id.as_str());
        }
    }
    best.map(str::to_string)
}

// ── Judge ────────────────────────────────────────────────────────────────

pub struct Judge {
    name: String,
    case: Arc<CaseRecord>,
    memory: Memory,
    generator: Generator,
    prosecution_arguments: Vec<ArgumentRecord>,
    defense_arguments: Vec<ArgumentRecord>,
    verdict: Option<Verdict>,
}

impl Judge {
    pub fn new(
        name: impl Into<String>,
        case: Arc<CaseRecord>,
        providers: ProviderSet,
    ) -> Result<Self, CourtError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CourtError::Config("judge name must not be empty".into()));
        }
        case.validate()?;
        info!(judge = %name, case = %case.id, rule_based = providers.is_empty(), "judge seated");
        Ok(Self {
            generator: Generator::new(providers, Role::Judge, name.clone()),
            name,
            case,
            memory: Memory::default(),
            prosecution_arguments: Vec::new(),
            defense_arguments: Vec::new(),
            verdict: None,
        })
    }

    pub fn prosecution_arguments(&self) -> &[ArgumentRecord] {
        &self.prosecution_arguments
    }

    pub fn defense_arguments(&self) -> &[ArgumentRecord] {
        &self.defense_arguments
    }

    pub fn argument_count(&self) -> usize {
        self.prosecution_arguments.len() + self.defense_arguments.len()
    }

    pub fn verdict(&self) -> Option<&Verdict> {
        self.verdict.as_ref()
    }

    fn section_title(&self, id: &str) -> &str {
        self.case.statute(id).map(|s| s.title.as_str()).unwrap_or("")
    }

    fn heuristic(&self) -> Thought {
        let strength = judicial_evidence_strength(&self.case);
        let mut t = String::new();

        if self.argument_count() >= JUDGMENT_THRESHOLD {
            t.push_str("The Court has heard extensive arguments from both sides and examined all evidence presented. ");
            t.push_str("After careful deliberation, considering the burden of proof and the standard of evidence required, ");
            if strength > 0.6 {
                t.push_str("the Court finds that the prosecution has established its case beyond reasonable doubt. ");
                t.push_str("The evidence is credible, substantial, and forms a complete chain pointing to the guilt of the accused. ");
            } else {
                t.push_str("the Court finds that the prosecution has not met the required burden of proof. ");
                t.push_str("The evidence presented has reasonable gaps and does not establish guilt beyond reasonable doubt. ");
            }
            t.push_str("The Court will now render its final verdict based on law, evidence, and principles of justice. ");
        } else {
            t.push_str("The Court has carefully considered the arguments presented by both the prosecution and defense. ");
            if strength > 0.7 {
                t.push_str("The evidence presented appears to be substantial and credible. ");
            } else if strength > 0.4 {
                t.push_str("The evidence presented requires careful examination and may be circumstantial. ");
            } else {
                t.push_str("The evidence presented appears to be limited and may not meet the required standard. ");
            }
            if legal_complexity(&self.case) > 0.5 {
                t.push_str("The legal questions raised are intricate and each ingredient of the offence calls for close scrutiny. ");
            }
            t.push_str("The Court notes that the burden of proof lies with the prosecution to establish guilt beyond reasonable doubt. ");
            if !self.prosecution_arguments.is_empty() && !self.defense_arguments.is_empty() {
                t.push_str("Both sides have presented their arguments, and the Court must weigh them against the applicable law. ");
            }
        }

        let section = statute::primary_section(&self.case);
        if let Some(s) = section {
            t.push_str(&format!(
                "The Court finds that IPC Section {} ({}) is particularly relevant to this case. ",
                s.id, s.title
            ));
        }
        t.push_str("The Court ensures that all proceedings are conducted in accordance with the principles of natural justice.");

        Thought {
            reasoning: t,
            evidence: most_referenced_evidence(&self.case),
            section: section.map(|s| s.id.clone()),
        }
    }

    fn verdict_inputs(&self) -> VerdictInputs {
        VerdictInputs {
            prosecution_arguments: self.prosecution_arguments.len(),
            defense_arguments: self.defense_arguments.len(),
            evidence_strength: judicial_evidence_strength(&self.case),
            pressing_evidence: self.case.evidence.iter().filter(|e| e.relevance.is_pressing()).count(),
        }
    }
}

#[async_trait]
impl CourtAgent for Judge {
    fn role(&self) -> Role {
        Role::Judge
    }

    fn name(&self) -> &str {
        &self.name
    }

    async fn think(&mut self, last_statement: Option<&str>) -> Thought {
        let base = prompt::base_prompt(&self.case, Role::Judge, &self.name, last_statement, &self.memory);
        let prompt = prompt::role_prompt(Role::Judge, &base);
        if let Some(g) = self.generator.generate(&self.case, &prompt, Capability::Judgment).await {
            return Thought {
                reasoning: g.thought,
                evidence: g.evidence,
                section: g.section,
            };
        }
        self.heuristic()
    }

    fn speak(&self, thought: &Thought) -> Statement {
        let mut s = String::new();
        if self.argument_count() >= JUDGMENT_THRESHOLD && self.verdict.is_none() {
            s.push_str("The Court has given due consideration to all arguments and evidence presented by both parties. ");
            s.push_str(&thought.reasoning);
            s.push_str(" Having heard all parties and examined the evidence, the Court is now ready to pronounce its verdict.");
        } else {
            s.push_str("The Court acknowledges the arguments presented by both counsel. ");
            s.push_str(&thought.reasoning);
            if let Some(e) = &thought.evidence {
                s.push_str(&format!(
                    " The Court particularly notes the significance of evidence file {e} in this matter."
                ));
            }
            if let Some(id) = &thought.section {
                s.push_str(&format!(
                    " The Court finds that IPC Section {id} ({}) is central to the legal determination in this case.",
                    self.section_title(id)
                ));
            }
            s.push_str(" The Court ensures that all proceedings are conducted in accordance with the principles of natural justice and due process.");
        }
        Statement {
            role: Role::Judge,
            statement: s,
            reasoning: thought.reasoning.clone(),
            evidence: thought.evidence.clone(),
            section: thought.section.clone(),
        }
    }

    fn remember(&mut self, statement: &str, reasoning: &str) {
        self.memory.push(statement, reasoning);
    }
}

#[async_trait]
impl Adjudicator for Judge {
    fn record(&mut self, role: Role, statement: &str, reasoning: &str) {
        let record = ArgumentRecord {
            role,
            statement: statement.to_string(),
            reasoning: reasoning.to_string(),
            sequence: self.argument_count() + 1,
        };
        match role {
            Role::Prosecutor => self.prosecution_arguments.push(record),
            Role::Defense => self.defense_arguments.push(record),
            Role::Judge => {},
        }
    }

    async fn render(&mut self, transcript: &[TurnRecord]) -> Result<Verdict, CourtError> {
        if self.verdict.is_some() {
            return Err(CourtError::VerdictAlreadyRendered);
        }

        let base = prompt::base_prompt(&self.case, Role::Judge, &self.name, None, &self.memory);
        let prompt = prompt::verdict_prompt(
            &base,
            &self.prosecution_arguments,
            &self.defense_arguments,
            transcript,
        );
        let verdict = match self.generator.generate(&self.case, &prompt, Capability::Verdict).await {
            Some(g) => verdict::decode_verdict(&g.thought),
            None => verdict::fallback_verdict(&self.case, self.verdict_inputs()),
        };

        info!(judge = %self.name, verdict = %verdict.label, "verdict rendered");
        self.verdict = Some(verdict.clone());
        Ok(verdict)
    }
}
