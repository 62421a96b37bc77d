//! Deterministic synthetic surveys for integration tests.

#![allow(dead_code)]

use odi_core::types::{OutcomeId, RespondentId, ResponseTable};

pub const OUTCOMES: u32 = 6;

/// Two needs-based groups of respondents.
///
/// Even rows care about outcomes 1-3 and are unhappy with them; odd rows
/// care about outcomes 4-6 and are unhappy with those. Ratings of the
/// outcomes a row does not care about carry a small deterministic jitter.
pub fn two_group_survey(n: usize) -> ResponseTable {
    let ids = (0..n as i64).map(|i| RespondentId::new(100 + i)).collect();
    let mut table = ResponseTable::new(ids).unwrap();
    for outcome in 1..=OUTCOMES {
        let mut importance = Vec::with_capacity(n);
        let mut satisfaction = Vec::with_capacity(n);
        for row in 0..n {
            let cares = (row % 2 == 0) == (outcome <= 3);
            if cares {
                importance.push(5);
                satisfaction.push(1);
            } else {
                let jitter = jitter(row, outcome);
                importance.push(clamp(1 + jitter));
                satisfaction.push(clamp(4 + jitter));
            }
        }
        table
            .insert_outcome(OutcomeId::new(outcome), importance, satisfaction)
            .unwrap();
    }
    table
}

/// The same survey as JSON Lines records.
pub fn two_group_jsonl(n: usize) -> String {
    let table = two_group_survey(n);
    let mut out = String::new();
    for (row, id) in table.respondent_ids().iter().enumerate() {
        for outcome in 1..=OUTCOMES {
            let o = OutcomeId::new(outcome);
            out.push_str(&format!(
                "{{\"respondentId\": {}, \"outcomeId\": {}, \"importance\": {}, \"satisfaction\": {}}}\n",
                id.get(),
                outcome,
                table.importance(o).unwrap()[row],
                table.satisfaction(o).unwrap()[row],
            ));
        }
    }
    out
}

fn jitter(row: usize, outcome: u32) -> i32 {
    ((row * 7 + outcome as usize * 3) % 3) as i32 - 1
}

fn clamp(v: i32) -> u8 {
    v.clamp(1, 5) as u8
}

/// Outcome statements for every outcome but the last.
pub fn outcomes_json() -> String {
    let entries: Vec<String> = (1..OUTCOMES)
        .map(|o| format!("{{\"id\": {o}, \"text\": \"Outcome statement {o}\"}}"))
        .collect();
    format!("[{}]", entries.join(", "))
}

pub const CODEBOOK_JSON: &str = r#"[
    {"id": "D1", "name": "Group", "type": "categorical",
     "options": {"1": "Even", "2": "Odd", "9": "No Response"},
     "missing_codes": ["9"]},
    {"id": "D2", "name": "Notes", "type": "text"}
]"#;

/// Respondents of [`two_group_survey`] with a `D1` answer matching their
/// group; every tenth respondent declined to answer.
pub fn respondents_jsonl(n: usize) -> String {
    let mut out = String::new();
    for row in 0..n {
        let code = if row % 10 == 0 { 9 } else { 1 + row % 2 };
        out.push_str(&format!(
            "{{\"respondentId\": {}, \"D1\": {code}, \"D2\": \"note\"}}\n",
            100 + row
        ));
    }
    out
}
