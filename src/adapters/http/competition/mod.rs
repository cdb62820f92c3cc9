//! Competition HTTP adapter.

mod dto;
mod handlers;
mod routes;

pub use dto::{ErrorResponse, SubmitAnswerRequest};
pub use handlers::CompetitionHandlers;
pub use routes::competition_routes;
