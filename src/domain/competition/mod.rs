//! Competition module - the learner-versus-opponent session aggregate.
//!
//! - `Competition` - aggregate root holding the fixed question list
//! - `Question` / `QuestionState` - per-question prompt and lifecycle state
//! - `CompetitionUpdate` - partial-field patch produced by every mutation
//! - `AnswerSheet` - answer lists derived from question state
//! - `CompetitionView` - caller-facing projection

mod aggregate;
mod answers;
mod errors;
mod outcome;
mod question;
mod update;
mod view;

pub use aggregate::Competition;
pub use answers::AnswerSheet;
pub use errors::CompetitionError;
pub use outcome::{Outcome, Score, Winner};
pub use question::{Question, QuestionState};
pub use update::CompetitionUpdate;
pub use view::{CompetitionSummary, CompetitionView, PublicQuestion};
