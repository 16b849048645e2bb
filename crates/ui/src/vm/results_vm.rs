use trivia_core::model::{CategoryId, FinalScore};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultsVm {
    pub category: CategoryId,
    pub score_label: String,
    pub detail_label: String,
}

/// Rebuild the results screen from route parameters.
///
/// Returns `None` if the counters do not describe a valid final score.
#[must_use]
pub fn map_results(category: u32, score: u32, answered: u32, total: u32) -> Option<ResultsVm> {
    let score = FinalScore::new(CategoryId::new(category), score, answered, total).ok()?;
    let detail_label = match score.unanswered() {
        0 => format!("{}% correct", score.percent()),
        skipped => format!("{}% correct, {skipped} ran out of time", score.percent()),
    };
    Some(ResultsVm {
        category: score.category(),
        score_label: format!("{} / {}", score.score(), score.total()),
        detail_label,
    })
}
