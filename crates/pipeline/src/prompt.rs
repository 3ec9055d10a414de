//! Pure helpers for building the classification prompt and reading its answer.

use magicstream_core::ranking::{RANKINGS_PLACEHOLDER, UNMATCHED_RANK_VALUE};
use magicstream_db::models::ranking::Ranking;

/// Labels the classifier may choose from: every non-sentinel entry, first
/// occurrence of each name kept, stored order preserved.
pub fn candidate_labels(labels: &[Ranking]) -> Vec<&Ranking> {
    let mut seen: Vec<&str> = Vec::with_capacity(labels.len());
    let mut out = Vec::with_capacity(labels.len());
    for label in labels.iter().filter(|l| !l.is_sentinel()) {
        if seen.contains(&label.ranking_name.as_str()) {
            continue;
        }
        seen.push(&label.ranking_name);
        out.push(label);
    }
    out
}

/// Comma-join the candidate names (`"Excellent,Good,Okay"`).
pub fn join_candidates(candidates: &[&Ranking]) -> String {
    candidates
        .iter()
        .map(|c| c.ranking_name.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

/// Substitute `candidate_list` for the first [`RANKINGS_PLACEHOLDER`] in `template`.
pub fn render_prompt(template: &str, candidate_list: &str) -> String {
    template.replacen(RANKINGS_PLACEHOLDER, candidate_list, 1)
}

/// Look the classifier's answer up among the candidates by exact name.
///
/// Returns `None` when the answer is outside the vocabulary.
pub fn resolve_label(answer: &str, candidates: &[&Ranking]) -> Option<Ranking> {
    candidates
        .iter()
        .find(|c| c.ranking_name == answer)
        .map(|c| (*c).clone())
}

/// The ranking persisted for an unrecognized answer under the pass-through policy.
pub fn unmatched(answer: &str) -> Ranking {
    Ranking::new(answer, UNMATCHED_RANK_VALUE)
}
