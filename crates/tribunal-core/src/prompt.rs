use std::fmt::Write;

use crate::{
    agent::Memory,
    types::{ArgumentRecord, CaseRecord, Role, TurnRecord},
};

/// Case facts, exhibits, statutes and the speaker's recent context.
pub fn base_prompt(
    case: &CaseRecord,
    role: Role,
    name: &str,
    last_statement: Option<&str>,
    memory: &Memory,
) -> String {
    let mut s = String::new();
    let _ = writeln!(s, "CASE INFORMATION:");
    let _ = writeln!(s, "Title: {}", case.title);
    let _ = writeln!(s, "Type: {}", case.case_type);
    let _ = writeln!(s, "Description: {}", case.description);
    let _ = writeln!(s, "Summary: {}", case.summary);

    let _ = writeln!(s, "\nAVAILABLE EVIDENCE:");
    for (i, ev) in case.evidence.iter().enumerate() {
        let _ = writeln!(
            s,
            "{}. {} ({} - {} relevance)",
            i + 1,
            ev.id,
            ev.category,
            ev.relevance.as_str()
        );
        let _ = writeln!(s, "   Content: {}", ev.description);
    }

    let _ = writeln!(s, "\nAPPLICABLE LAWS:");
    for section in &case.statutes {
        let _ = writeln!(
            s,
            "Section {}: {} - {}",
            section.id, section.title, section.description
        );
    }

    if let Some(last) = last_statement {
        let _ = writeln!(s, "\nLAST STATEMENT FROM OTHER PARTY: {last}");
    }

    if !memory.is_empty() {
        let _ = writeln!(s, "\nPREVIOUS STATEMENTS IN THIS CASE:");
        for entry in memory.recent(3) {
            let head: String = entry.statement.chars().take(100).collect();
            let _ = writeln!(s, "- {head}...");
        }
    }

    let _ = writeln!(s, "\nYOUR ROLE: {}", role.as_str().to_uppercase());
    let _ = write!(s, "YOUR NAME: {name}");
    s
}

/// Appends the role's brief to a base prompt.
pub fn role_prompt(role: Role, base: &str) -> String {
    let brief = match role {
        Role::Prosecutor => {
            "Role: You are the public prosecutor representing the State.\n\
             Task: Build the case for conviction. Present the most probative evidence, \
             tie it to the ingredients of the applicable IPC section, and answer the \
             defense's objections. The burden of proof beyond reasonable doubt is yours."
        },
        Role::Defense => {
            "Role: You are defense counsel for the accused.\n\
             Task: Test the prosecution's case. Expose weaknesses in the evidence, \
             gaps in the chain of circumstances and any admissibility concerns. \
             Remind the Court of the presumption of innocence."
        },
        Role::Judge => {
            "Role: You are an experienced and impartial judge presiding over this case.\n\
             Task: Evaluate the strength of both sides' arguments, the admissibility and \
             weight of the evidence, and the applicable legal sections, keeping the \
             burden of proof and the presumption of innocence in view."
        },
    };
    format!("{base}\n\n{brief}")
}

/// Wraps a prompt with the JSON reply contract used for the primary provider.
pub fn enhanced_prompt(role: Role, prompt: &str) -> String {
    let role = role.as_str();
    format!(
        "You are a {role} in an Indian legal proceeding.\n\n\
         {prompt}\n\n\
         Please respond in JSON format with:\n\
         {{\n  \
           \"thought\": \"Your detailed reasoning process as a {role}\",\n  \
           \"evidence\": \"Filename of most relevant evidence (if applicable)\",\n  \
           \"section\": \"Most applicable IPC section number (if applicable)\"\n\
         }}\n\n\
         Ensure your response is professional, legally sound, and appropriate for Indian legal context."
    )
}

fn render_arguments(s: &mut String, heading: &str, args: &[ArgumentRecord]) {
    let _ = writeln!(s, "\n{heading}:");
    if args.is_empty() {
        let _ = writeln!(s, "(none)");
    }
    for a in args {
        let _ = writeln!(s, "{}. {}", a.sequence, a.statement);
    }
}

pub fn verdict_prompt(
    base: &str,
    prosecution: &[ArgumentRecord],
    defense: &[ArgumentRecord],
    transcript: &[TurnRecord],
) -> String {
    let mut s = String::from(base);
    let _ = writeln!(s, "\n\nRole: You are rendering the final verdict in this case.");
    render_arguments(&mut s, "ALL PROSECUTION ARGUMENTS", prosecution);
    render_arguments(&mut s, "ALL DEFENSE ARGUMENTS", defense);

    let _ = writeln!(s, "\nTRANSCRIPT:");
    for turn in transcript {
        let _ = writeln!(s, "[{} r{}] {}", turn.role, turn.round, turn.statement);
    }

    let _ = write!(
        s,
        "\nRender a fair and impartial verdict applying the standard of proof beyond \
         reasonable doubt. Respond in JSON format with:\n\
         {{\"verdict\": \"Guilty\" or \"Not Guilty\", \"reasoning\": \"...\", \
         \"sentence\": \"... or null\", \"sections\": [\"...\"]}}"
    );
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Complexity, EvidenceItem, RelevanceTag, StatuteSection};

    fn case() -> CaseRecord {
        CaseRecord {
            id: "c1".into(),
            title: "The State vs. A".into(),
            case_type: "Theft Case".into(),
            description: "Jewelry theft".into(),
            summary: "Jewelry went missing".into(),
            complexity: Complexity::Low,
            evidence: vec![EvidenceItem::new("cctv.mp4", "digital", "Footage", RelevanceTag::Critical)],
            statutes: vec![StatuteSection::new("379", "Theft", "Dishonest taking", &["theft"])],
        }
    }

    #[test]
    fn base_prompt_lists_case_material() {
        let mut memory = Memory::default();
        for i in 0..5 {
            memory.push(&format!("statement {i}"), "r");
        }
        let p = base_prompt(&case(), Role::Defense, "Adv. B", Some("objection"), &memory);
        assert!(p.contains("1. cctv.mp4 (digital - critical relevance)"));
        assert!(p.contains("Section 379: Theft - Dishonest taking"));
        assert!(p.contains("LAST STATEMENT FROM OTHER PARTY: objection"));
        assert!(!p.contains("statement 1"));
        assert!(p.contains("statement 4"));
        assert!(p.ends_with("YOUR NAME: Adv. B"));
        assert!(p.contains("YOUR ROLE: DEFENSE"));
    }

    #[test]
    fn enhanced_prompt_requests_json() {
        let p = enhanced_prompt(Role::Judge, "facts");
        assert!(p.starts_with("You are a judge in an Indian legal proceeding."));
        assert!(p.contains("\"section\": \"Most applicable IPC section number (if applicable)\""));
    }
}
