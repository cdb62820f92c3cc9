//! Caller-facing snapshot of a competition.
//!
//! The projection is read-only and never exposes the opponent's answer for
//! a question that is still in play.

use serde::{Deserialize, Serialize};

use super::{Competition, Score, Winner};
use crate::domain::foundation::{CompetitionId, CompetitionStatus, QuestionId, Timestamp};

/// Public fields of the question currently in play.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicQuestion {
    pub question_id: QuestionId,
    pub prompt: String,
}

/// Final result, present only once the competition is completed.
///
/// `winner` and `score` stay `None` when evaluation failed or was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetitionSummary {
    pub winner: Option<Winner>,
    pub score: Option<Score>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    pub learner_answers: Vec<String>,
    pub opponent_answers: Vec<String>,
}

/// Snapshot of a competition as the learner sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetitionView {
    pub competition_id: CompetitionId,
    pub status: CompetitionStatus,
    pub total_questions: usize,
    /// 1-based; equals `total_questions` once completed.
    pub current_question_number: usize,
    /// Question in play, `None` before activation and after completion.
    pub current_question: Option<PublicQuestion>,
    /// Fixed time budget every question gets.
    pub question_duration_secs: u64,
    /// When the question in play was activated.
    pub question_started_at: Option<Timestamp>,
    /// Deadline of the question in play.
    pub question_expires_at: Option<Timestamp>,
    /// Seconds left on the question in play, floored at zero.
    pub seconds_remaining: Option<u64>,
    /// One entry per question, empty for unanswered ones.
    pub learner_answers: Vec<String>,
    pub is_completed: bool,
    /// Present only once the competition is completed.
    pub summary: Option<CompetitionSummary>,
}

impl CompetitionView {
    /// Projects the aggregate as seen at `now`.
    pub fn project(competition: &Competition, question_duration_secs: u64, now: Timestamp) -> Self {
        let total = competition.total_questions();
        let is_completed = competition.is_completed();
        let sheet = competition.answer_sheet();

        let current_question_number = if is_completed {
            total
        } else {
            (competition.current_question_index() + 1).min(total)
        };

        let active = if is_completed {
            None
        } else {
            competition.active_question().map(|(_, q)| q)
        };

        let summary = is_completed.then(|| CompetitionSummary {
            winner: competition.outcome().map(|o| o.winner),
            score: competition.outcome().map(|o| o.score),
            feedback: competition.outcome().and_then(|o| o.feedback.clone()),
            learner_answers: sheet.learner_answers.clone(),
            opponent_answers: sheet.opponent_answers.clone(),
        });

        let expires_at = active.and_then(|q| q.state.expires_at);

        Self {
            competition_id: *competition.id(),
            status: competition.status(),
            total_questions: total,
            current_question_number,
            current_question: active.map(|q| PublicQuestion {
                question_id: q.question_id.clone(),
                prompt: q.prompt.clone(),
            }),
            question_duration_secs,
            question_started_at: active.and_then(|q| q.state.started_at),
            question_expires_at: expires_at,
            seconds_remaining: expires_at.map(|deadline| now.secs_until(&deadline)),
            learner_answers: sheet.learner_answers,
            is_completed,
            summary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::competition::{Outcome, Question};
    use crate::domain::foundation::{CourseId, UserId};

    fn t0() -> Timestamp {
        Timestamp::from_unix_secs(1_700_000_000)
    }

    fn competition(n: usize) -> Competition {
        let questions = (1..=n)
            .map(|i| Question::new(QuestionId::new(format!("q{}", i)).unwrap(), format!("P{}", i)))
            .collect();
        Competition::new(
            CompetitionId::new(),
            UserId::new("learner").unwrap(),
            CourseId::new("course").unwrap(),
            "",
            questions,
            t0(),
        )
    }

    #[test]
    fn active_question_view_hides_opponent_answer() {
        let mut c = competition(2);
        c.activate_question(0, "SECRET".into(), t0(), 600).unwrap();

        let view = CompetitionView::project(&c, 600, t0().plus_secs(100));
        assert_eq!(view.current_question_number, 1);
        assert_eq!(
            view.current_question.as_ref().map(|q| q.prompt.as_str()),
            Some("P1")
        );
        assert_eq!(view.seconds_remaining, Some(500));
        assert_eq!(view.question_expires_at, Some(t0().plus_secs(600)));
        assert!(view.summary.is_none());

        let json = serde_json::to_string(&view).unwrap();
        assert!(!json.contains("SECRET"));
    }

    #[test]
    fn completed_view_reports_total_and_summary() {
        let mut c = competition(1);
        c.activate_question(0, "o1".into(), t0(), 600).unwrap();
        c.complete_question(0, Some("a1".into()), false, t0()).unwrap();
        c.finish(t0()).unwrap();
        c.record_outcome(Outcome::new(Winner::Opponent, Score::new(1, 4)), t0())
            .unwrap();

        let view = CompetitionView::project(&c, 600, t0());
        assert!(view.is_completed);
        assert_eq!(view.current_question_number, 1);
        assert!(view.current_question.is_none());

        let summary = view.summary.unwrap();
        assert_eq!(summary.winner, Some(Winner::Opponent));
        assert_eq!(summary.score, Some(Score::new(1, 4)));
        assert_eq!(summary.opponent_answers, vec!["o1"]);
    }

    #[test]
    fn unscored_completion_has_empty_winner() {
        let mut c = competition(0);
        c.finish(t0()).unwrap();
        let view = CompetitionView::project(&c, 600, t0());
        assert_eq!(view.total_questions, 0);
        assert_eq!(view.current_question_number, 0);
        let summary = view.summary.unwrap();
        assert!(summary.winner.is_none());
        assert!(summary.score.is_none());
    }
}
