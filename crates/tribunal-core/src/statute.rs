use crate::types::{CaseRecord, StatuteSection};

/// Sections with at least one keyword in the case summary, most keyword hits
/// first. Ties keep the order the sections were listed in.
pub fn applicable_sections(case: &CaseRecord) -> Vec<&StatuteSection> {
    let summary = case.summary.to_lowercase();
    let mut hits: Vec<(usize, &StatuteSection)> = case
        .statutes
        .iter()
        .map(|s| (s.keyword_hits(&summary), s))
        .filter(|(n, _)| *n > 0)
        .collect();
    hits.sort_by(|a, b| b.0.cmp(&a.0));
    hits.into_iter().map(|(_, s)| s).collect()
}

pub fn primary_section(case: &CaseRecord) -> Option<&StatuteSection> {
    applicable_sections(case).into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Complexity;

    #[test]
    fn ordered_by_overlap_then_listing() {
        let case = CaseRecord {
            id: "m".into(),
            title: "m".into(),
            case_type: "Murder Case".into(),
            description: String::new(),
            summary: "a death by poison with clear intention".into(),
            complexity: Complexity::High,
            evidence: vec![],
            statutes: vec![
                StatuteSection::new("201", "Evidence", "", &["concealment"]),
                StatuteSection::new("304", "Homicide", "", &["death"]),
                StatuteSection::new("302", "Murder", "", &["death", "intention"]),
                StatuteSection::new("305", "Other", "", &["poison"]),
            ],
        };
        let ids: Vec<&str> = applicable_sections(&case).iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["302", "304", "305"]);
        assert_eq!(primary_section(&case).map(|s| s.id.as_str()), Some("302"));
    }
}
