use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::CourtError;

// ── Case Record ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Low,
    #[default]
    Medium,
    High,
}

impl Complexity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// Input annotation on an evidence item. Ordered so that `Critical` is the greatest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RelevanceTag {
    #[default]
    Low,
    Medium,
    High,
    Critical,
}

impl RelevanceTag {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }

    /// Unknown or empty tags collapse to `Low`.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "critical" => Self::Critical,
            "high" => Self::High,
            "medium" => Self::Medium,
            _ => Self::Low,
        }
    }

    pub fn is_pressing(self) -> bool {
        matches!(self, Self::Critical | Self::High)
    }
}

impl From<String> for RelevanceTag {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<RelevanceTag> for String {
    fn from(tag: RelevanceTag) -> Self {
        tag.as_str().to_string()
    }
}

/// Conventional evidence categories. Items store the category as a lowercase
/// string so that scoring can match on substrings ("forensic analysis" still
/// counts as forensic).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvidenceCategory {
    Physical,
    Digital,
    Testimonial,
    Documentary,
    Forensic,
    Medical,
}

impl EvidenceCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Physical => "physical",
            Self::Digital => "digital",
            Self::Testimonial => "testimonial",
            Self::Documentary => "documentary",
            Self::Forensic => "forensic",
            Self::Medical => "medical",
        }
    }
}

impl From<EvidenceCategory> for String {
    fn from(c: EvidenceCategory) -> Self {
        c.as_str().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceItem {
    /// Exhibit file name; unique within a case.
    #[serde(alias = "filename")]
    pub id: String,
    #[serde(alias = "type", deserialize_with = "lowercase")]
    pub category: String,
    #[serde(alias = "text")]
    pub description: String,
    #[serde(default)]
    pub relevance: RelevanceTag,
}

impl EvidenceItem {
    pub fn new(
        id: impl Into<String>,
        category: impl Into<String>,
        description: impl Into<String>,
        relevance: RelevanceTag,
    ) -> Self {
        Self {
            id: id.into(),
            category: category.into().to_lowercase(),
            description: description.into(),
            relevance,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatuteSection {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "lowercase_list")]
    pub keywords: Vec<String>,
}

impl StatuteSection {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        keywords: &[&str],
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
        }
    }

    /// Number of this section's keywords that occur in `text` (already lowercased).
    pub fn keyword_hits(&self, text: &str) -> usize {
        self.keywords.iter().filter(|k| text.contains(k.as_str())).count()
    }
}

/// Immutable input for one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseRecord {
    pub id: String,
    pub title: String,
    #[serde(alias = "type")]
    pub case_type: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub complexity: Complexity,
    #[serde(default)]
    pub evidence: Vec<EvidenceItem>,
    /// Kept in insertion order; section ids are unique.
    #[serde(default)]
    pub statutes: Vec<StatuteSection>,
}

impl CaseRecord {
    pub fn validate(&self) -> Result<(), CourtError> {
        if self.id.trim().is_empty() {
            return Err(CourtError::Config("case id must not be empty".into()));
        }
        if self.title.trim().is_empty() {
            return Err(CourtError::Config(format!("case {} has no title", self.id)));
        }
        let mut seen = std::collections::HashSet::new();
        for item in &self.evidence {
            if !seen.insert(item.id.as_str()) {
                return Err(CourtError::Config(format!(
                    "case {} lists evidence {} twice",
                    self.id, item.id
                )));
            }
        }
        let mut seen = std::collections::HashSet::new();
        for section in &self.statutes {
            if !seen.insert(section.id.as_str()) {
                return Err(CourtError::Config(format!(
                    "case {} lists section {} twice",
                    self.id, section.id
                )));
            }
        }
        Ok(())
    }

    pub fn evidence_item(&self, id: &str) -> Option<&EvidenceItem> {
        self.evidence.iter().find(|e| e.id == id)
    }

    pub fn statute(&self, id: &str) -> Option<&StatuteSection> {
        self.statutes.iter().find(|s| s.id == id)
    }
}

fn lowercase<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    String::deserialize(d).map(|s| s.to_lowercase())
}

fn lowercase_list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    Vec::<String>::deserialize(d).map(|v| v.into_iter().map(|s| s.to_lowercase()).collect())
}

// ── Participants ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Prosecutor,
    #[serde(alias = "defendant")]
    Defense,
    Judge,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Prosecutor => "prosecutor",
            Self::Defense => "defense",
            Self::Judge => "judge",
        }
    }

    /// Accepts "defendant" as an alias for the defense.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "prosecutor" | "prosecution" => Some(Self::Prosecutor),
            "defense" | "defence" | "defendant" => Some(Self::Defense),
            "judge" => Some(Self::Judge),
            _ => None,
        }
    }

    /// The opposing side; the bench has none.
    pub fn opponent(self) -> Option<Self> {
        match self {
            Self::Prosecutor => Some(Self::Defense),
            Self::Defense => Some(Self::Prosecutor),
            Self::Judge => None,
        }
    }

    /// Courtroom designation shown next to the speaker's name.
    pub fn title(self) -> &'static str {
        match self {
            Self::Prosecutor => "Public Prosecutor",
            Self::Defense => "Defense Advocate",
            Self::Judge => "Presiding Judge",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participants {
    pub judge: String,
    pub prosecutor: String,
    pub defense: String,
}

impl Default for Participants {
    fn default() -> Self {
        Self {
            judge: "Justice Verma".into(),
            prosecutor: "Advocate Ramesh Kumar".into(),
            defense: "Advocate Suresh Sharma".into(),
        }
    }
}

impl Participants {
    pub fn name_of(&self, role: Role) -> &str {
        match role {
            Role::Prosecutor => &self.prosecutor,
            Role::Defense => &self.defense,
            Role::Judge => &self.judge,
        }
    }
}

// ── Session ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrialPhase {
    Opening,
    Arguments,
    Verdict,
}

impl TrialPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Opening => "opening",
            Self::Arguments => "arguments",
            Self::Verdict => "verdict",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimulationMode {
    Quick,
    #[default]
    Standard,
    Comprehensive,
}

impl SimulationMode {
    /// Hard ceiling on argument rounds.
    pub fn max_rounds(self) -> u32 {
        match self {
            Self::Quick => 8,
            Self::Standard => 15,
            Self::Comprehensive => 25,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Quick => "quick",
            Self::Standard => "standard",
            Self::Comprehensive => "comprehensive",
        }
    }

    pub fn all() -> [Self; 3] {
        [Self::Quick, Self::Standard, Self::Comprehensive]
    }
}

impl std::str::FromStr for SimulationMode {
    type Err = CourtError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "quick" => Ok(Self::Quick),
            "standard" => Ok(Self::Standard),
            "comprehensive" => Ok(Self::Comprehensive),
            other => Err(CourtError::Config(format!("unknown simulation mode: {other}"))),
        }
    }
}

/// Mutable bookkeeping for one run, owned by the trial state machine.
#[derive(Debug, Clone, Serialize)]
pub struct SessionState {
    pub case_id: String,
    pub case_title: String,
    pub participants: Participants,
    pub phase: TrialPhase,
    /// 0 during the opening; 1-based once arguments start.
    pub round: u32,
    pub total_rounds: u32,
    pub mode: SimulationMode,
    pub started_at: DateTime<Utc>,
}

// ── Turns ────────────────────────────────────────────────────────────────

/// Output of an agent's `think` step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Thought {
    pub reasoning: String,
    pub evidence: Option<String>,
    pub section: Option<String>,
}

/// Output of an agent's `speak` step, before the state machine stamps it.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub role: Role,
    pub statement: String,
    pub reasoning: String,
    pub evidence: Option<String>,
    pub section: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnRecord {
    pub role: Role,
    pub statement: String,
    pub reasoning: String,
    pub evidence: Option<String>,
    pub section: Option<String>,
    pub round: u32,
    pub phase: TrialPhase,
}

impl TurnRecord {
    pub fn from_statement(s: Statement, round: u32, phase: TrialPhase) -> Self {
        Self {
            role: s.role,
            statement: s.statement,
            reasoning: s.reasoning,
            evidence: s.evidence,
            section: s.section,
            round,
            phase,
        }
    }
}

/// One argument as recorded by the judge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArgumentRecord {
    pub role: Role,
    pub statement: String,
    pub reasoning: String,
    /// 1-based position across both sides' arguments.
    pub sequence: usize,
}

// ── Verdict ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerdictLabel {
    Guilty,
    #[serde(rename = "Not Guilty")]
    NotGuilty,
}

impl VerdictLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Guilty => "Guilty",
            Self::NotGuilty => "Not Guilty",
        }
    }

    /// Lenient parse of provider output; anything not clearly guilty is not guilty.
    pub fn parse(s: &str) -> Self {
        let s = s.trim().to_lowercase();
        if s.starts_with("guilty") {
            Self::Guilty
        } else {
            Self::NotGuilty
        }
    }
}

impl fmt::Display for VerdictLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    #[serde(rename = "verdict")]
    pub label: VerdictLabel,
    pub reasoning: String,
    pub sentence: Option<String>,
    pub applied_sections: Vec<String>,
}

impl Verdict {
    pub fn is_guilty(&self) -> bool {
        self.label == VerdictLabel::Guilty
    }
}
