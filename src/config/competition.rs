//! Competition rules configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::application::CompetitionServiceConfig;

#[derive(Debug, Clone, Deserialize)]
pub struct CompetitionConfig {
    /// Time budget per question in seconds
    #[serde(default = "default_question_duration")]
    pub question_duration_secs: u64,

    /// Serialize operations on the same competition within this process
    #[serde(default = "default_serialize")]
    pub serialize_per_competition: bool,
}

impl CompetitionConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.question_duration_secs == 0 || self.question_duration_secs > 86_400 {
            return Err(ValidationError::InvalidQuestionDuration);
        }
        Ok(())
    }

    pub fn service_config(&self) -> CompetitionServiceConfig {
        CompetitionServiceConfig {
            question_duration_secs: self.question_duration_secs,
            serialize_per_competition: self.serialize_per_competition,
        }
    }
}

impl Default for CompetitionConfig {
    fn default() -> Self {
        Self {
            question_duration_secs: default_question_duration(),
            serialize_per_competition: default_serialize(),
        }
    }
}

fn default_question_duration() -> u64 {
    600
}

fn default_serialize() -> bool {
    true
}
