//! Deterministic verdict scoring and decoding of provider verdicts.

use serde_json::Value;

use crate::{
    generation::{json_field, strip_fence},
    statute,
    types::{CaseRecord, Verdict, VerdictLabel},
};

const STRONG_CONVICTION: f64 = 0.8;
const CONVICTION: f64 = 0.6;

const STRONG_REASONING: &str = "The Court finds that the prosecution has proven its case beyond reasonable doubt. \
The evidence presented is credible, substantial, and forms a complete chain of circumstances \
that points unerringly to the guilt of the accused. The defense has not been able to create \
reasonable doubt in the prosecution's case.";

const MITIGATED_REASONING: &str = "The Court finds that while there are some gaps in the evidence, the prosecution has \
established its case on the preponderance of probabilities. However, given the seriousness \
of the charges, the Court will consider mitigating circumstances in sentencing.";

const ACQUITTAL_REASONING: &str = "The Court finds that the prosecution has not proven its case beyond reasonable doubt. \
While there may be suspicions and circumstantial evidence, the chain of evidence is not \
complete and unbroken as required by law. The defense has successfully created reasonable \
doubt regarding the accused's guilt. The presumption of innocence in favor of the accused \
has not been rebutted by the prosecution.";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerdictInputs {
    pub prosecution_arguments: usize,
    pub defense_arguments: usize,
    /// Judicial evidence strength in [0, 1].
    pub evidence_strength: f64,
    /// Items tagged critical or high.
    pub pressing_evidence: usize,
}

impl VerdictInputs {
    pub fn score(&self) -> f64 {
        let prosecution = self.prosecution_arguments as f64 * 0.2;
        let defense = self.defense_arguments as f64 * 0.15;
        let evidence = self.evidence_strength * 0.6;
        let quality = (self.pressing_evidence as f64 * 0.1).min(0.3);
        prosecution + evidence + quality - defense * 0.5
    }
}

/// Rule-based verdict. With no probative evidence at all the burden cannot be
/// discharged, whatever the argument counts.
pub fn fallback_verdict(case: &CaseRecord, inputs: VerdictInputs) -> Verdict {
    let score = inputs.score();
    let applicable = statute::applicable_sections(case);
    let applied: Vec<String> = applicable.iter().map(|s| s.id.clone()).collect();

    if inputs.evidence_strength <= 0.0 || score <= CONVICTION {
        return Verdict {
            label: VerdictLabel::NotGuilty,
            reasoning: ACQUITTAL_REASONING.to_string(),
            sentence: None,
            applied_sections: Vec::new(),
        };
    }

    if score > STRONG_CONVICTION {
        let sentence = match applicable.first() {
            Some(s) if s.id == "302" => {
                "The accused is sentenced to imprisonment for life under Section 302 of the Indian Penal Code."
                    .to_string()
            },
            Some(s) => format!("The accused is sentenced according to IPC Section {}: {}.", s.id, s.title),
            None => "The Court will determine appropriate sentencing based on the gravity of the offense."
                .to_string(),
        };
        return Verdict {
            label: VerdictLabel::Guilty,
            reasoning: STRONG_REASONING.to_string(),
            sentence: Some(sentence),
            applied_sections: applied,
        };
    }

    Verdict {
        label: VerdictLabel::Guilty,
        reasoning: MITIGATED_REASONING.to_string(),
        sentence: Some(
            "The accused is found guilty but sentenced to a reduced punishment considering the circumstances."
                .to_string(),
        ),
        applied_sections: applied,
    }
}

/// Decodes a provider's verdict reply. Non-JSON text becomes the reasoning of a
/// not-guilty verdict. A reply in the argument shape (`thought`, `section`)
/// is read as reasoning and applied section, with the finding taken from a
/// leading "Verdict:" label.
pub fn decode_verdict(text: &str) -> Verdict {
    let body = strip_fence(text);
    let parsed = if body.starts_with('{') {
        serde_json::from_str::<Value>(body).ok().filter(Value::is_object)
    } else {
        None
    };

    let Some(v) = parsed else {
        return Verdict {
            label: VerdictLabel::NotGuilty,
            reasoning: text.trim().to_string(),
            sentence: None,
            applied_sections: Vec::new(),
        };
    };

    let reasoning = json_field(&v, "reasoning")
        .or_else(|| json_field(&v, "thought"))
        .unwrap_or_default();
    let label = json_field(&v, "verdict")
        .or_else(|| labelled_finding(&reasoning))
        .map(|s| VerdictLabel::parse(&s))
        .unwrap_or(VerdictLabel::NotGuilty);
    let mut sections: Vec<String> = v
        .get("sections")
        .or_else(|| v.get("applied_sections"))
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .filter_map(|s| match s {
                    Value::String(s) => Some(s.clone()),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default();
    if sections.is_empty() {
        sections.extend(json_field(&v, "section"));
    }

    Verdict {
        label,
        reasoning,
        sentence: json_field(&v, "sentence"),
        applied_sections: sections,
    }
}

/// The finding of a reasoning text that opens with "Verdict: ...".
fn labelled_finding(reasoning: &str) -> Option<String> {
    let head = reasoning.get(..8)?;
    if !head.eq_ignore_ascii_case("verdict:") {
        return None;
    }
    reasoning.get(8..).map(|rest| rest.trim_start().to_string())
}
