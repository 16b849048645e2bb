use services::QuizSnapshot;
use trivia_core::quiz::{AnswerState, QuizStatus};

const EMPTY_MESSAGE: &str = "Could not load questions for this category. Please try again.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptionTone {
    Neutral,
    Correct,
    Wrong,
}

impl OptionTone {
    #[must_use]
    pub fn class(self) -> &'static str {
        match self {
            Self::Neutral => "option",
            Self::Correct => "option option-correct",
            Self::Wrong => "option option-wrong",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionVm {
    pub index: usize,
    pub label: String,
    pub tone: OptionTone,
    pub disabled: bool,
}

/// Render model for the quiz screen.
#[derive(Clone, Debug, PartialEq)]
pub struct QuizVm {
    pub status: QuizStatus,
    /// Zero-based index of the current question, used to tag selections.
    pub index: usize,
    pub progress_label: String,
    pub score_label: String,
    pub question: Option<String>,
    pub options: Vec<OptionVm>,
    pub can_advance: bool,
    pub next_label: &'static str,
    pub timer_label: String,
    pub time_fraction: f32,
    pub message: Option<String>,
}

impl QuizVm {
    #[must_use]
    pub fn from_snapshot(snapshot: &QuizSnapshot) -> Self {
        let answer = snapshot.answer;
        let correct_index = snapshot.question.as_ref().map(|q| q.correct_index());
        let options = snapshot
            .question
            .as_ref()
            .map(|question| {
                question
                    .options()
                    .iter()
                    .enumerate()
                    .map(|(index, label)| OptionVm {
                        index,
                        label: label.clone(),
                        tone: tone_for(index, answer, correct_index),
                        disabled: matches!(answer, AnswerState::Answered { .. }),
                    })
                    .collect()
            })
            .unwrap_or_default();

        let message = match snapshot.status {
            QuizStatus::Empty => Some(EMPTY_MESSAGE.to_string()),
            QuizStatus::Failed => Some(
                snapshot
                    .failure
                    .clone()
                    .unwrap_or_else(|| EMPTY_MESSAGE.to_string()),
            ),
            _ => None,
        };

        Self {
            status: snapshot.status,
            index: snapshot.index,
            progress_label: format!(
                "Question {} / {}",
                (snapshot.index + 1).min(snapshot.total.max(1)),
                snapshot.total
            ),
            score_label: format!("🏆 {}", snapshot.score),
            question: snapshot.question.as_ref().map(|q| q.text().to_string()),
            options,
            can_advance: snapshot.status == QuizStatus::InProgress
                && matches!(answer, AnswerState::Answered { .. }),
            next_label: if snapshot.is_last_question() {
                "Check Score"
            } else {
                "Next"
            },
            timer_label: format!("{}s", snapshot.remaining_secs),
            time_fraction: snapshot.time_fraction(),
            message,
        }
    }

    /// Width of the timer bar as a CSS percentage.
    #[must_use]
    pub fn timer_width(&self) -> String {
        format!("{:.0}%", self.time_fraction * 100.0)
    }
}

/// The correct option lights up once anything is picked; only the picked
/// option can be marked wrong.
fn tone_for(index: usize, answer: AnswerState, correct_index: Option<usize>) -> OptionTone {
    match answer {
        AnswerState::Unanswered => OptionTone::Neutral,
        AnswerState::Answered { selected, .. } => {
            if Some(index) == correct_index {
                OptionTone::Correct
            } else if index == selected {
                OptionTone::Wrong
            } else {
                OptionTone::Neutral
            }
        }
    }
}
