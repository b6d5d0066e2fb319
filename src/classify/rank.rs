use std::cmp::Ordering;

use serde::Serialize;

use crate::classify::labels::LabelSet;
use crate::LensError;

/// Number of ingredient names handed to the recipe search.
pub const TOP_K: usize = 3;

/// A label with the score the model gave it.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RankedLabel {
    pub label: String,
    pub score: f32,
}

/// Pair labels with scores and keep the `k` best, highest score first.
///
/// Ties keep label-file order (lower index first). NaN scores sort after every number.
pub fn top_k(labels: &LabelSet, scores: &[f32], k: usize) -> Result<Vec<RankedLabel>, LensError> {
    if scores.len() != labels.len() {
        return Err(LensError::Inference {
            message: format!(
                "model produced {} scores for {} labels",
                scores.len(),
                labels.len()
            ),
            source: None,
        });
    }

    let nan_count = scores.iter().filter(|s| s.is_nan()).count();
    if nan_count > 0 {
        log::warn!("{} of {} scores are NaN", nan_count, scores.len());
    }

    let mut order: Vec<usize> = (0..scores.len()).collect();
    // Stable sort over ascending indices: equal scores stay in label order.
    order.sort_by(|&a, &b| descending(scores[a], scores[b]));

    Ok(order
        .into_iter()
        .take(k)
        .filter_map(|idx| {
            labels.get(idx).map(|label| RankedLabel {
                label: label.to_string(),
                score: scores[idx],
            })
        })
        .collect())
}

fn descending(a: f32, b: f32) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}
