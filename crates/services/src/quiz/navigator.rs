use trivia_core::model::FinalScore;

/// Screen transitions requested by services.
///
/// Implemented by the UI router; calls must not block.
pub trait Navigator: Send + Sync {
    /// Show the final score. Called once per finished quiz.
    fn go_to_results(&self, score: FinalScore);

    /// Leave the quiz for the previous screen.
    fn go_back(&self);
}

