//! AI-backed opponent: answers questions and judges the final match.
//!
//! Both roles go through the same `AIProvider`. The judge is asked for a
//! JSON verdict:
//!
//! ```json
//! {"winner": "learner", "learner_score": 3, "opponent_score": 2, "feedback": "..."}
//! ```

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

use crate::domain::competition::{Outcome, Score, Winner};
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::{
    AIError, AIProvider, CompletionPurpose, CompletionRequest, EvaluationRequest, MessageRole,
    OpponentAnswerGenerator, OpponentAnswerRequest, OutcomeEvaluator, RequestMetadata,
};

const OPPONENT_SYSTEM_PROMPT: &str = "You are a programming contestant in a timed coding \
competition against a student who just finished the course described below. Answer the \
question directly with working code and at most a short explanation. Write at the level \
of a strong student of this course.";

const JUDGE_SYSTEM_PROMPT: &str = "You judge a coding competition between a learner and an \
AI opponent. For each question, compare both answers for correctness first, then clarity. \
An empty answer scores nothing. Reply with only a JSON object: {\"winner\": \"learner\" | \
\"opponent\" | \"draw\", \"learner_score\": <int>, \"opponent_score\": <int>, \
\"feedback\": <string>}.";

pub struct AiOpponent {
    provider: Arc<dyn AIProvider>,
    answer_max_tokens: u32,
    verdict_max_tokens: u32,
}

impl AiOpponent {
    pub fn new(provider: Arc<dyn AIProvider>) -> Self {
        Self {
            provider,
            answer_max_tokens: 1024,
            verdict_max_tokens: 1024,
        }
    }

    fn answer_prompt(request: &OpponentAnswerRequest) -> String {
        let context = if request.course_context.trim().is_empty() {
            "(no course description)"
        } else {
            request.course_context.as_str()
        };
        format!(
            "Course:\n{}\n\nQuestion {}:\n{}",
            context, request.question.question_id, request.question.prompt
        )
    }

    fn judge_prompt(request: &EvaluationRequest) -> String {
        let mut prompt = String::new();
        for (i, question) in request.questions.iter().enumerate() {
            let learner = request.learner_answers.get(i).map(String::as_str).unwrap_or("");
            let opponent = request.opponent_answers.get(i).map(String::as_str).unwrap_or("");
            prompt.push_str(&format!(
                "## Question {} ({})\n{}\n\n### Learner answer\n{}\n\n### Opponent answer\n{}\n\n",
                i + 1,
                question.question_id,
                question.prompt,
                learner,
                opponent
            ));
        }
        prompt
    }
}

#[async_trait]
impl OpponentAnswerGenerator for AiOpponent {
    async fn generate(&self, request: OpponentAnswerRequest) -> Result<String, DomainError> {
        let metadata = RequestMetadata::new(CompletionPurpose::OpponentAnswer, request.question.question_id.as_str())
            .for_competition(request.competition_id);
        let completion = CompletionRequest::new(metadata)
            .with_system_prompt(OPPONENT_SYSTEM_PROMPT)
            .with_message(MessageRole::User, Self::answer_prompt(&request))
            .with_max_tokens(self.answer_max_tokens)
            .with_temperature(0.4);

        let response = self.provider.complete(completion).await.map_err(ai_error)?;
        let answer = response.content.trim().to_string();
        if answer.is_empty() {
            return Err(DomainError::new(
                ErrorCode::AIProviderError,
                "Provider returned an empty opponent answer",
            ));
        }
        Ok(answer)
    }
}

#[async_trait]
impl OutcomeEvaluator for AiOpponent {
    async fn evaluate(&self, request: EvaluationRequest) -> Result<Outcome, DomainError> {
        let metadata = RequestMetadata::new(CompletionPurpose::Evaluation, request.competition_id.to_string())
            .for_competition(request.competition_id);
        let completion = CompletionRequest::new(metadata)
            .with_system_prompt(JUDGE_SYSTEM_PROMPT)
            .with_message(MessageRole::User, Self::judge_prompt(&request))
            .with_max_tokens(self.verdict_max_tokens)
            .with_temperature(0.0);

        let response = self.provider.complete(completion).await.map_err(ai_error)?;
        debug!(competition_id = %request.competition_id, "Received verdict");
        parse_verdict(&response.content)
    }
}

#[derive(Debug, Deserialize)]
struct Verdict {
    winner: String,
    #[serde(default)]
    learner_score: u32,
    #[serde(default)]
    opponent_score: u32,
    feedback: Option<String>,
}

/// Extracts the first `{...}` span and reads it as a verdict.
fn parse_verdict(content: &str) -> Result<Outcome, DomainError> {
    let invalid = |reason: &str| {
        DomainError::new(ErrorCode::AIProviderError, format!("Unreadable verdict: {}", reason))
    };

    let start = content.find('{').ok_or_else(|| invalid("no JSON object"))?;
    let end = content.rfind('}').ok_or_else(|| invalid("no JSON object"))?;
    if end < start {
        return Err(invalid("no JSON object"));
    }

    let verdict: Verdict =
        serde_json::from_str(&content[start..=end]).map_err(|e| invalid(&e.to_string()))?;
    let winner = Winner::parse(&verdict.winner)
        .ok_or_else(|| invalid(&format!("unknown winner '{}'", verdict.winner)))?;

    let outcome = Outcome::new(winner, Score::new(verdict.learner_score, verdict.opponent_score));
    Ok(match verdict.feedback.filter(|f| !f.trim().is_empty()) {
        Some(feedback) => outcome.with_feedback(feedback),
        None => outcome,
    })
}

fn ai_error(err: AIError) -> DomainError {
    let code = match err {
        AIError::RateLimited { .. } => ErrorCode::RateLimited,
        _ => ErrorCode::AIProviderError,
    };
    DomainError::new(code, err.to_string())
}
