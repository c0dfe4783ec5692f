//! Quiz session state machine: setup -> in progress -> complete.

use chrono::{DateTime, Utc};

use crate::core::error::QuizError;
use crate::core::history::QuizRecord;
use crate::core::quiz::{Difficulty, GenerationRequest, OPTION_COUNT, QuizQuestion, QuizResponse};

/// Shown when generation fails for any reason other than a blank topic.
pub const GENERATION_FAILED: &str = "Failed to generate quiz. Please try again.";

/// Scores at or above this percentage count as excellent.
pub const EXCELLENT_PERCENT: u32 = 90;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("no quiz is in progress")]
    NotInProgress,
    #[error("a quiz is already running")]
    AlreadyStarted,
    #[error("select an answer first")]
    NoSelection,
    #[error("answer already selected")]
    AlreadyAnswered,
    #[error("option {0} does not exist")]
    OptionOutOfRange(usize),
}

#[derive(Debug, Clone)]
pub enum QuizSession {
    Setup { last_error: Option<String> },
    InProgress(InProgress),
    Complete(QuizOutcome),
}

#[derive(Debug, Clone)]
pub struct InProgress {
    request: GenerationRequest,
    questions: Vec<QuizQuestion>,
    current: usize,
    selected: Option<usize>,
    score: usize,
}

/// Final result of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizOutcome {
    pub topic: String,
    pub difficulty: Difficulty,
    pub score: usize,
    pub total: usize,
}

/// What happened when an answer was submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerFeedback {
    pub selected: usize,
    pub correct: usize,
    pub is_correct: bool,
}

impl Default for QuizSession {
    fn default() -> Self {
        QuizSession::Setup { last_error: None }
    }
}

impl QuizSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a quiz. Only valid from setup; an empty quiz goes back to setup with an error.
    pub fn start(&mut self, request: GenerationRequest, quiz: QuizResponse) -> Result<(), SessionError> {
        if !matches!(self, QuizSession::Setup { .. }) {
            return Err(SessionError::AlreadyStarted);
        }
        if quiz.is_empty() {
            *self = QuizSession::Setup {
                last_error: Some(GENERATION_FAILED.to_string()),
            };
            return Ok(());
        }
        *self = QuizSession::InProgress(InProgress {
            request,
            questions: quiz.questions,
            current: 0,
            selected: None,
            score: 0,
        });
        Ok(())
    }

    /// Record a failed generation and return to setup with a user-facing message.
    pub fn fail(&mut self, err: &QuizError) {
        let message = match err {
            QuizError::InvalidRequest(msg) => msg.clone(),
            _ => GENERATION_FAILED.to_string(),
        };
        *self = QuizSession::Setup {
            last_error: Some(message),
        };
    }

    pub fn last_error(&self) -> Option<&str> {
        match self {
            QuizSession::Setup { last_error } => last_error.as_deref(),
            _ => None,
        }
    }

    /// Current question with its zero-based position and the total count.
    pub fn current_question(&self) -> Option<(usize, usize, &QuizQuestion)> {
        match self {
            QuizSession::InProgress(p) => p
                .questions
                .get(p.current)
                .map(|q| (p.current, p.questions.len(), q)),
            _ => None,
        }
    }

    /// Correct answers so far (or final score).
    pub fn score(&self) -> usize {
        match self {
            QuizSession::Setup { .. } => 0,
            QuizSession::InProgress(p) => p.score,
            QuizSession::Complete(o) => o.score,
        }
    }

    /// Choose an option. The first choice for a question is final.
    pub fn select(&mut self, option: usize) -> Result<(), SessionError> {
        let QuizSession::InProgress(p) = self else {
            return Err(SessionError::NotInProgress);
        };
        if option >= OPTION_COUNT {
            return Err(SessionError::OptionOutOfRange(option));
        }
        if p.selected.is_some() {
            return Err(SessionError::AlreadyAnswered);
        }
        p.selected = Some(option);
        Ok(())
    }

    /// Score the selected answer and move on. After the last question the session is complete.
    pub fn next(&mut self) -> Result<AnswerFeedback, SessionError> {
        let QuizSession::InProgress(p) = self else {
            return Err(SessionError::NotInProgress);
        };
        let selected = p.selected.ok_or(SessionError::NoSelection)?;
        let correct = p.questions[p.current].correct;
        let is_correct = selected == correct;
        if is_correct {
            p.score += 1;
        }
        p.selected = None;
        p.current += 1;

        if p.current == p.questions.len() {
            let outcome = QuizOutcome {
                topic: p.request.topic().to_string(),
                difficulty: p.request.difficulty(),
                score: p.score,
                total: p.questions.len(),
            };
            *self = QuizSession::Complete(outcome);
        }

        Ok(AnswerFeedback {
            selected,
            correct,
            is_correct,
        })
    }

    pub fn outcome(&self) -> Option<&QuizOutcome> {
        match self {
            QuizSession::Complete(o) => Some(o),
            _ => None,
        }
    }

    /// Back to setup for a new quiz.
    pub fn reset(&mut self) {
        *self = QuizSession::default();
    }
}

impl QuizOutcome {
    /// Score as a whole percentage, rounded; 0 when there were no questions.
    pub fn percentage(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        ((self.score as f64 / self.total as f64) * 100.0).round() as u32
    }

    pub fn is_excellent(&self) -> bool {
        self.percentage() >= EXCELLENT_PERCENT
    }

    pub fn to_record(&self, timestamp: DateTime<Utc>) -> QuizRecord {
        QuizRecord {
            topic: self.topic.clone(),
            score: self.score,
            total_questions: self.total,
            difficulty: self.difficulty,
            timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiz(n: usize) -> QuizResponse {
        QuizResponse {
            questions: (0..n)
                .map(|i| {
                    QuizQuestion::new(
                        format!("Q{}", i),
                        ["a", "b", "c", "d"].map(String::from),
                        i % OPTION_COUNT,
                    )
                    .unwrap()
                })
                .collect(),
        }
    }

    fn started(n: usize) -> QuizSession {
        let mut session = QuizSession::new();
        let request = GenerationRequest::new("Birds", Difficulty::Beginner).unwrap();
        session.start(request, quiz(n)).unwrap();
        session
    }

    #[test]
    fn walks_through_to_complete() {
        let mut session = started(3);
        // Q0 correct is 0, Q1 correct is 1, Q2 correct is 2.
        session.select(0).unwrap();
        assert!(session.next().unwrap().is_correct);
        session.select(3).unwrap();
        let feedback = session.next().unwrap();
        assert!(!feedback.is_correct);
        assert_eq!(feedback.correct, 1);
        session.select(2).unwrap();
        session.next().unwrap();

        let outcome = session.outcome().unwrap();
        assert_eq!(outcome.score, 2);
        assert_eq!(outcome.total, 3);
        assert_eq!(outcome.topic, "Birds");
        assert_eq!(outcome.percentage(), 67);
        assert!(!outcome.is_excellent());
    }

    #[test]
    fn next_requires_selection() {
        let mut session = started(2);
        assert_eq!(session.next(), Err(SessionError::NoSelection));
    }

    #[test]
    fn selection_is_locked() {
        let mut session = started(2);
        session.select(1).unwrap();
        assert_eq!(session.select(2), Err(SessionError::AlreadyAnswered));
        assert_eq!(session.select(9), Err(SessionError::OptionOutOfRange(9)));
    }

    #[test]
    fn cannot_answer_outside_a_quiz() {
        let mut session = QuizSession::new();
        assert_eq!(session.select(0), Err(SessionError::NotInProgress));
        assert_eq!(session.next(), Err(SessionError::NotInProgress));
        assert!(session.current_question().is_none());
    }

    #[test]
    fn cannot_start_twice() {
        let mut session = started(1);
        let request = GenerationRequest::new("Again", Difficulty::Beginner).unwrap();
        assert_eq!(
            session.start(request, quiz(1)),
            Err(SessionError::AlreadyStarted)
        );
    }

    #[test]
    fn failure_returns_to_setup_with_message() {
        let mut session = QuizSession::new();
        session.fail(&QuizError::MissingQuestionsField);
        assert_eq!(session.last_error(), Some(GENERATION_FAILED));

        session.fail(&QuizError::InvalidRequest("Please enter a topic".to_string()));
        assert_eq!(session.last_error(), Some("Please enter a topic"));

        session.reset();
        assert_eq!(session.last_error(), None);
    }

    #[test]
    fn percentage_and_excellence() {
        let outcome = |score, total| QuizOutcome {
            topic: "t".to_string(),
            difficulty: Difficulty::Advanced,
            score,
            total,
        };
        assert_eq!(outcome(0, 0).percentage(), 0);
        assert_eq!(outcome(9, 10).percentage(), 90);
        assert!(outcome(9, 10).is_excellent());
        assert!(!outcome(8, 10).is_excellent());
    }

    #[test]
    fn outcome_converts_to_record() {
        let mut session = started(1);
        session.select(0).unwrap();
        session.next().unwrap();
        let now = Utc::now();
        let record = session.outcome().unwrap().to_record(now);
        assert_eq!(record.score, 1);
        assert_eq!(record.total_questions, 1);
        assert_eq!(record.difficulty, Difficulty::Beginner);
        assert_eq!(record.timestamp, now);
    }
}
