//! Rule-table scoring of evidence items against a case.
//!
//! Every function here is pure: the result depends only on the item and the
//! case record, so analyses are recomputed on demand rather than cached.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::types::{CaseRecord, EvidenceItem, RelevanceTag};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvidenceAnalysis {
    pub evidence_id: String,
    pub strength: f64,
    pub relevance: f64,
    pub admissibility: f64,
    pub key_points: Vec<String>,
    pub challenges: Vec<String>,
    pub supporting_sections: Vec<String>,
}

impl EvidenceAnalysis {
    /// Weighting used to order evidence.
    pub fn overall(&self) -> f64 {
        self.strength * 0.4 + self.relevance * 0.4 + self.admissibility * 0.2
    }

    /// Weighting used for the case-level strength aggregate.
    fn contribution(&self) -> f64 {
        self.strength * 0.5 + self.relevance * 0.3 + self.admissibility * 0.2
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RankedEvidence<'a> {
    pub item: &'a EvidenceItem,
    pub analysis: EvidenceAnalysis,
}

#[derive(Debug, Clone, Serialize)]
pub struct StrongestEvidence {
    pub item: EvidenceItem,
    pub analysis: EvidenceAnalysis,
}

#[derive(Debug, Clone, Serialize)]
pub struct EvidenceSummary {
    pub total: usize,
    pub strong_count: usize,
    pub admissible_count: usize,
    pub strongest: Option<StrongestEvidence>,
    pub gaps: Vec<String>,
    pub overall_strength: f64,
}

// ── Rule tables ──────────────────────────────────────────────────────────

const CATEGORY_CEILINGS: &[(&str, f64)] = &[
    ("forensic", 0.9),
    ("medical", 0.85),
    ("digital", 0.7),
    ("physical", 0.75),
    ("documentary", 0.65),
    ("testimonial", 0.6),
    ("witness", 0.55),
];

const QUALITY_BONUSES: &[(&str, f64)] = &[
    ("scientific", 0.1),
    ("laboratory", 0.1),
    ("certified", 0.1),
    ("expert", 0.08),
    ("professional", 0.08),
    ("official", 0.08),
    ("chain of custody", 0.12),
    ("authenticated", 0.1),
    ("corroborated", 0.09),
    ("independent", 0.07),
];

const RELIABILITY_PENALTIES: &[(&str, f64)] = &[
    ("hearsay", -0.15),
    ("speculation", -0.1),
    ("opinion", -0.05),
    ("biased", -0.1),
    ("interested party", -0.08),
    ("contaminated", -0.2),
];

const DOMAIN_TERMS: &[(&str, &[&str])] = &[
    ("murder", &["cause of death", "weapon", "motive", "opportunity", "intent"]),
    ("theft", &["stolen property", "possession", "value", "intent to steal"]),
    ("fraud", &["deception", "financial loss", "misrepresentation", "intent"]),
    ("assault", &["injury", "force", "intent to harm", "weapon"]),
];

const ADMISSIBILITY_ENHANCERS: &[(&str, f64)] = &[
    ("chain of custody", 0.1),
    ("authenticated", 0.1),
    ("certified", 0.08),
    ("expert testimony", 0.08),
    ("scientific", 0.08),
    ("official record", 0.1),
];

const ADMISSIBILITY_CONCERNS: &[(&str, f64)] = &[
    ("hearsay", -0.3),
    ("privileged", -0.5),
    ("illegally obtained", -0.8),
    ("contaminated", -0.4),
    ("unreliable", -0.3),
    ("prejudicial", -0.2),
];

const CHALLENGE_TRIGGERS: &[(&str, &str)] = &[
    ("chain of custody", "Chain of custody issues may affect admissibility"),
    ("contamination", "Potential contamination questions reliability"),
    ("hearsay", "May be challenged as hearsay evidence"),
    ("bias", "Witness bias may affect credibility"),
    ("speculation", "Contains speculative elements that may be objected to"),
    ("opinion", "Opinion testimony may require expert qualification"),
    ("prejudicial", "May be more prejudicial than probative"),
];

const MAX_KEY_POINTS: usize = 5;
const MAX_CHALLENGES: usize = 4;
const MAX_SUPPORTING_SECTIONS: usize = 3;

static FINDING_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    ["shows?", "indicates?", "confirms?", "establishes?", "proves?"]
        .iter()
        .map(|verb| {
            Regex::new(&format!(r"(?i){verb}\s+([^.]{{20,100}})")).expect("invalid finding regex")
        })
        .collect()
});

static MEASUREMENT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b\d+(?:\.\d+)?(?:\s*(?:mg|ml|cm|mm|hours?|minutes?|days?|%|percent))\b")
        .expect("invalid measurement regex")
});

static DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b\d{1,2}[/-]\d{1,2}[/-]\d{2,4}\b|\b(?:January|February|March|April|May|June|July|August|September|October|November|December)\s+\d{1,2},?\s+\d{4}\b",
    )
    .expect("invalid date regex")
});

// ── Scores ───────────────────────────────────────────────────────────────

pub fn strength_score(item: &EvidenceItem) -> f64 {
    let category = item.category.to_lowercase();
    let text = item.description.to_lowercase();

    let mut score: f64 = 0.5;
    if let Some((_, ceiling)) = CATEGORY_CEILINGS.iter().find(|(c, _)| category.contains(c)) {
        score = score.max(*ceiling);
    }
    for (indicator, bonus) in QUALITY_BONUSES {
        if text.contains(indicator) {
            score = (score + bonus).min(1.0);
        }
    }
    for (detractor, penalty) in RELIABILITY_PENALTIES {
        if text.contains(detractor) {
            score = (score + penalty).max(0.0);
        }
    }
    score.clamp(0.0, 1.0)
}

pub fn relevance_score(item: &EvidenceItem, case: &CaseRecord) -> f64 {
    let text = item.description.to_lowercase();
    let summary = case.summary.to_lowercase();
    let case_type = case.case_type.to_lowercase();

    let summary_words: HashSet<&str> = summary.split_whitespace().collect();
    let evidence_words: HashSet<&str> = text.split_whitespace().collect();
    let shared = summary_words.intersection(&evidence_words).count();
    let mut score = (shared as f64 * 0.02).min(0.4);

    for (domain, terms) in DOMAIN_TERMS {
        if !case_type.contains(domain) {
            continue;
        }
        for term in *terms {
            if text.contains(term) {
                score = (score + 0.15).min(1.0);
            }
        }
    }

    let tag_bonus = match item.relevance {
        RelevanceTag::Critical => 0.3,
        RelevanceTag::High => 0.2,
        RelevanceTag::Medium => 0.1,
        RelevanceTag::Low => 0.0,
    };
    score = (score + tag_bonus).min(1.0);
    score.clamp(0.0, 1.0)
}

pub fn admissibility_score(item: &EvidenceItem) -> f64 {
    let text = item.description.to_lowercase();

    let mut score: f64 = 0.8;
    for (enhancer, bonus) in ADMISSIBILITY_ENHANCERS {
        if text.contains(enhancer) {
            score = (score + bonus).min(1.0);
        }
    }
    for (concern, penalty) in ADMISSIBILITY_CONCERNS {
        if text.contains(concern) {
            score = (score + penalty).max(0.0);
        }
    }
    score.clamp(0.0, 1.0)
}

// ── Extraction ───────────────────────────────────────────────────────────

fn key_points(item: &EvidenceItem) -> Vec<String> {
    let text = item.description.as_str();
    let mut points = Vec::new();

    for pattern in FINDING_PATTERNS.iter() {
        points.extend(
            pattern
                .captures_iter(text)
                .filter_map(|c| c.get(1))
                .take(3)
                .map(|m| m.as_str().trim().to_string()),
        );
    }

    let measurements: Vec<&str> = MEASUREMENT_RE.find_iter(text).map(|m| m.as_str()).take(3).collect();
    if !measurements.is_empty() {
        points.push(format!("Numerical data: {}", measurements.join(", ")));
    }

    let dates: Vec<&str> = DATE_RE.find_iter(text).map(|m| m.as_str()).take(2).collect();
    if !dates.is_empty() {
        points.push(format!("Temporal information: {}", dates.join(", ")));
    }

    points.truncate(MAX_KEY_POINTS);
    points
}

fn challenges(item: &EvidenceItem) -> Vec<String> {
    let text = item.description.to_lowercase();
    let category = item.category.to_lowercase();

    let mut out: Vec<String> = CHALLENGE_TRIGGERS
        .iter()
        .filter(|(trigger, _)| text.contains(trigger))
        .map(|(_, msg)| (*msg).to_string())
        .collect();

    if category.contains("witness") || category.contains("testimony") {
        out.push("Witness credibility and memory accuracy".into());
    }
    if category.contains("digital") {
        out.push("Digital evidence authentication and integrity".into());
    }

    out.truncate(MAX_CHALLENGES);
    out
}

fn supporting_sections(item: &EvidenceItem, case: &CaseRecord) -> Vec<String> {
    let text = item.description.to_lowercase();
    let summary = case.summary.to_lowercase();
    case.statutes
        .iter()
        .filter(|s| s.keyword_hits(&text) >= 1 && s.keyword_hits(&summary) >= 1)
        .take(MAX_SUPPORTING_SECTIONS)
        .map(|s| s.id.clone())
        .collect()
}

// ── Public operations ────────────────────────────────────────────────────

/// Full analysis of one item. Never fails; empty text yields base scores.
pub fn analyze(item: &EvidenceItem, case: &CaseRecord) -> EvidenceAnalysis {
    EvidenceAnalysis {
        evidence_id: item.id.clone(),
        strength: strength_score(item),
        relevance: relevance_score(item, case),
        admissibility: admissibility_score(item),
        key_points: key_points(item),
        challenges: challenges(item),
        supporting_sections: supporting_sections(item, case),
    }
}

/// Orders items by overall score, highest first. Equal scores keep input order.
pub fn rank<'a>(items: &'a [EvidenceItem], case: &CaseRecord) -> Vec<RankedEvidence<'a>> {
    let mut ranked: Vec<RankedEvidence<'a>> = items
        .iter()
        .map(|item| RankedEvidence {
            item,
            analysis: analyze(item, case),
        })
        .collect();
    // sort_by is stable
    ranked.sort_by(|a, b| b.analysis.overall().total_cmp(&a.analysis.overall()));
    ranked
}

pub fn summarize(items: &[EvidenceItem], case: &CaseRecord) -> EvidenceSummary {
    let ranked = rank(items, case);

    let strong_count = ranked.iter().filter(|r| r.analysis.strength > 0.7).count();
    let admissible_count = ranked.iter().filter(|r| r.analysis.admissibility > 0.6).count();

    EvidenceSummary {
        total: items.len(),
        strong_count,
        admissible_count,
        strongest: ranked.first().map(|r| StrongestEvidence {
            item: r.item.clone(),
            analysis: r.analysis.clone(),
        }),
        gaps: evidence_gaps(items, case),
        overall_strength: overall_strength(&ranked),
    }
}

fn overall_strength(ranked: &[RankedEvidence<'_>]) -> f64 {
    if ranked.is_empty() {
        return 0.0;
    }
    let mut total = 0.0;
    let mut weights = 0.0;
    for (i, r) in ranked.iter().enumerate() {
        let w = 1.0 / (i as f64 + 1.0);
        total += r.analysis.contribution() * w;
        weights += w;
    }
    (total / weights).min(1.0)
}

pub fn evidence_gaps(items: &[EvidenceItem], case: &CaseRecord) -> Vec<String> {
    let case_type = case.case_type.to_lowercase();
    let categories: Vec<String> = items.iter().map(|e| e.category.to_lowercase()).collect();
    let combined = items
        .iter()
        .map(|e| e.description.as_str())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    let any_category = |needle: &str| categories.iter().any(|c| c.contains(needle));

    let mut gaps = Vec::new();
    if case_type.contains("murder") {
        if !any_category("medical") && !any_category("forensic") {
            gaps.push("Missing medical/forensic evidence for cause of death".to_string());
        }
        if !combined.contains("motive") {
            gaps.push("Motive not clearly established".to_string());
        }
        if !combined.contains("weapon") {
            gaps.push("Murder weapon not identified".to_string());
        }
    }
    if case_type.contains("theft") {
        if !combined.contains("value") {
            gaps.push("Value of stolen property not established".to_string());
        }
        if !any_category("possession") {
            gaps.push("Possession of stolen goods not proven".to_string());
        }
    }
    if !any_category("witness") {
        gaps.push("No witness testimony available".to_string());
    }
    gaps
}

/// Items whose text or id mentions any keyword, most pressing tag first.
pub fn relevant_evidence<'a>(case: &'a CaseRecord, keywords: &[String]) -> Vec<&'a EvidenceItem> {
    if keywords.is_empty() {
        return Vec::new();
    }
    let needles: Vec<String> = keywords.iter().map(|k| k.to_lowercase()).collect();
    let mut found: Vec<&EvidenceItem> = case
        .evidence
        .iter()
        .filter(|e| {
            let text = e.description.to_lowercase();
            let id = e.id.to_lowercase();
            needles.iter().any(|k| text.contains(k.as_str()) || id.contains(k.as_str()))
        })
        .collect();
    found.sort_by(|a, b| b.relevance.cmp(&a.relevance));
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Complexity, EvidenceCategory, StatuteSection};

    fn case(case_type: &str, summary: &str) -> CaseRecord {
        CaseRecord {
            id: "t".into(),
            title: "The State vs. Test".into(),
            case_type: case_type.into(),
            description: String::new(),
            summary: summary.into(),
            complexity: Complexity::Medium,
            evidence: vec![],
            statutes: vec![StatuteSection::new(
                "302",
                "Murder",
                "",
                &["murder", "death", "poison"],
            )],
        }
    }

    #[test]
    fn key_points_capture_findings_and_measurements() {
        let item = EvidenceItem::new(
            "lab.pdf",
            EvidenceCategory::Forensic,
            "Toxicology shows presence of cyanide in the stomach contents. Dose was 200 mg taken over 2 hours on 9/9/2023.",
            RelevanceTag::High,
        );
        let points = key_points(&item);
        assert_eq!(points[0], "presence of cyanide in the stomach contents");
        assert_eq!(points[1], "Numerical data: 200 mg, 2 hours");
        assert_eq!(points[2], "Temporal information: 9/9/2023");
    }

    #[test]
    fn short_findings_are_ignored() {
        let item = EvidenceItem::new("a", "physical", "It shows nothing. Done.", RelevanceTag::Low);
        assert!(key_points(&item).is_empty());
    }

    #[test]
    fn challenges_capped_at_four() {
        let item = EvidenceItem::new(
            "w.pdf",
            "witness testimony",
            "hearsay with bias, speculation and opinion; chain of custody unclear",
            RelevanceTag::Low,
        );
        let c = challenges(&item);
        assert_eq!(c.len(), 4);
        assert_eq!(c[0], "Chain of custody issues may affect admissibility");
    }

    #[test]
    fn supporting_sections_need_both_sides() {
        let c = case("Murder Case", "victim died of poison");
        let item = EvidenceItem::new("a", "medical", "cause: poison", RelevanceTag::Low);
        assert_eq!(supporting_sections(&item, &c), vec!["302".to_string()]);

        let c = case("Murder Case", "a dispute over music");
        assert!(supporting_sections(&item, &c).is_empty());
    }

    #[test]
    fn overall_strength_is_weighted_by_rank() {
        let c = case("Theft Case", "");
        let items = vec![EvidenceItem::new("only", "physical", "", RelevanceTag::Low)];
        let ranked = rank(&items, &c);
        // 0.5*0.75 + 0.3*0 + 0.2*0.8
        assert!((overall_strength(&ranked) - 0.535).abs() < 1e-9);
    }
}
