pub mod murder;
pub mod theft;

use std::{collections::BTreeMap, path::Path};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{info, warn};
use tribunal_core::{CaseRecord, CourtError};

/// Return every built-in case, in menu order.
pub fn all_cases() -> Vec<CaseRecord> {
    vec![murder::croft_poisoning(), theft::kumar_jewelry()]
}

/// Look up a built-in case by id (with short aliases).
pub fn get_case(id: &str) -> Result<CaseRecord, CourtError> {
    find_case(&all_cases(), id).cloned()
}

/// Short names accepted wherever a case id is.
const CASE_ALIASES: &[(&str, &str)] = &[("murder", "murder_case_1"), ("theft", "theft_case_1")];

/// Look up a case by id in an arbitrary case list. An exact id wins over an alias.
pub fn find_case<'a>(cases: &'a [CaseRecord], id: &str) -> Result<&'a CaseRecord, CourtError> {
    let by_id = |wanted: &str| cases.iter().find(|c| c.id == wanted);
    by_id(id)
        .or_else(|| {
            CASE_ALIASES
                .iter()
                .find(|(alias, _)| *alias == id)
                .and_then(|(_, target)| by_id(*target))
        })
        .ok_or_else(|| CourtError::UnknownCase(id.to_string()))
}

// ── Case files ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(untagged)]
enum CaseFile {
    /// `[{"id": ..., ...}, ...]`
    List(Vec<CaseRecord>),
    /// `{"murder_case_2": {...}, ...}`; the key fills in a missing `id`.
    Keyed(BTreeMap<String, KeyedCase>),
}

#[derive(Deserialize)]
struct KeyedCase {
    #[serde(default)]
    id: Option<String>,
    #[serde(flatten)]
    rest: serde_json::Map<String, serde_json::Value>,
}

fn parse_case_file(body: &str) -> Result<Vec<CaseRecord>> {
    let file: CaseFile = serde_json::from_str(body).context("case file is not a list or map of cases")?;
    let cases = match file {
        CaseFile::List(cases) => cases,
        CaseFile::Keyed(map) => map
            .into_iter()
            .map(|(key, entry)| {
                let id = entry.id.unwrap_or_else(|| key.clone());
                let mut obj = entry.rest;
                obj.insert("id".into(), serde_json::Value::String(id));
                serde_json::from_value::<CaseRecord>(serde_json::Value::Object(obj))
                    .with_context(|| format!("invalid case {key}"))
            })
            .collect::<Result<Vec<_>>>()?,
    };
    for case in &cases {
        case.validate().with_context(|| format!("invalid case {}", case.id))?;
    }
    Ok(cases)
}

/// Read a JSON case database: either a list of cases or an object keyed by case id.
pub fn load_cases(path: &Path) -> Result<Vec<CaseRecord>> {
    let body = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read case file {}", path.display()))?;
    let cases = parse_case_file(&body).with_context(|| format!("in {}", path.display()))?;
    info!(path = %path.display(), count = cases.len(), "loaded case file");
    Ok(cases)
}

/// Built-in cases overlaid with file cases. A file case replaces the built-in
/// case with the same id in place; new ids are appended in file order.
pub fn merge(builtin: Vec<CaseRecord>, extra: Vec<CaseRecord>) -> Vec<CaseRecord> {
    let mut out = builtin;
    for case in extra {
        match out.iter_mut().find(|c| c.id == case.id) {
            Some(slot) => {
                warn!(case = %case.id, "case file overrides built-in case");
                *slot = case;
            },
            None => out.push(case),
        }
    }
    out
}

/// Built-in cases plus, when `path` is set, the cases in that file.
pub fn case_catalog(path: Option<&Path>) -> Result<Vec<CaseRecord>> {
    match path {
        Some(p) => Ok(merge(all_cases(), load_cases(p)?)),
        None => Ok(all_cases()),
    }
}
