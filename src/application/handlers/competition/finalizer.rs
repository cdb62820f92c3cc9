//! Finalizer - terminal transition and outcome evaluation.

use std::sync::Arc;

use tracing::{info, warn};

use super::persist;
use crate::domain::competition::{Competition, CompetitionError};
use crate::ports::{Clock, CompetitionRepository, EvaluationRequest, OutcomeEvaluator};

/// Moves a competition to its terminal state and asks for a verdict.
///
/// Completion is persisted before evaluation and is never rolled back.
#[derive(Clone)]
pub struct Finalizer {
    repository: Arc<dyn CompetitionRepository>,
    /// Failures here are logged and leave the competition unscored.
    evaluator: Arc<dyn OutcomeEvaluator>,
    clock: Arc<dyn Clock>,
}

impl Finalizer {
    pub fn new(
        repository: Arc<dyn CompetitionRepository>,
        evaluator: Arc<dyn OutcomeEvaluator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            evaluator,
            clock,
        }
    }

    /// Complete the competition, then try to score it.
    ///
    /// Completion is written first and is never undone. An evaluator failure
    /// is logged and the unscored competition returned.
    pub async fn finalize(&self, mut competition: Competition) -> Result<Competition, CompetitionError> {
        let competition_id = *competition.id();
        let now = self.clock.now();

        let update = competition.finish(now)?;
        let mut competition = persist(&self.repository, competition, update).await?;
        info!(%competition_id, total_questions = competition.total_questions(), "Competition completed");

        let sheet = competition.answer_sheet();
        if competition.questions().is_empty()
            || sheet.learner_answers.is_empty()
            || sheet.opponent_answers.is_empty()
        {
            return Ok(competition);
        }

        let request = EvaluationRequest {
            competition_id,
            questions: competition.questions().to_vec(),
            opponent_answers: sheet.opponent_answers,
            learner_answers: sheet.learner_answers,
        };
        let outcome = match self.evaluator.evaluate(request).await {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(%competition_id, error = %err, "Outcome evaluation failed, leaving competition unscored");
                return Ok(competition);
            }
        };

        let winner = outcome.winner;
        let update = competition.record_outcome(outcome, self.clock.now())?;
        competition = persist(&self.repository, competition, update).await?;
        info!(%competition_id, %winner, "Outcome recorded");

        Ok(competition)
    }
}
