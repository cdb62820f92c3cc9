//! HTTP routes for competition endpoints.

use axum::{routing::post, Router};

use super::handlers::{force_complete, start_competition, submit_answer, CompetitionHandlers};

/// Creates the competition router, to be nested under `/competitions`.
pub fn competition_routes(handlers: CompetitionHandlers) -> Router {
    Router::new()
        .route("/:id/start", post(start_competition))
        .route("/:id/answers", post(submit_answer))
        .route("/:id/force-complete", post(force_complete))
        .with_state(handlers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::application::handlers::competition::test_support::Fixture;
    use crate::domain::foundation::CompetitionId;

    fn router(fixture: &Fixture) -> Router {
        Router::new().nest(
            "/competitions",
            competition_routes(CompetitionHandlers::new(Arc::new(fixture.service()))),
        )
    }

    async fn post_json(router: Router, uri: String, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(Method::POST).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn start_returns_view_with_first_question() {
        let fixture = Fixture::new();
        let competition = fixture.seed(2).await;

        let (status, body) = post_json(
            router(&fixture),
            format!("/competitions/{}/start", competition.id()),
            None,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["current_question_number"], 1);
        assert_eq!(body["current_question"]["question_id"], "q1");
        assert_eq!(body["total_questions"], 2);
    }

    #[tokio::test]
    async fn submit_advances_to_next_question() {
        let fixture = Fixture::new();
        let competition = fixture.seed(2).await;
        let app = router(&fixture);
        post_json(app.clone(), format!("/competitions/{}/start", competition.id()), None).await;

        let (status, body) = post_json(
            app,
            format!("/competitions/{}/answers", competition.id()),
            Some(serde_json::json!({"question_id": "q1", "answer": "my answer"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["current_question"]["question_id"], "q2");
        assert_eq!(body["learner_answers"][0], "my answer");
    }

    #[tokio::test]
    async fn submit_for_wrong_question_is_bad_request() {
        let fixture = Fixture::new();
        let competition = fixture.seed(2).await;

        let (status, body) = post_json(
            router(&fixture),
            format!("/competitions/{}/answers", competition.id()),
            Some(serde_json::json!({"question_id": "q2", "answer": "early"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "QUESTION_MISMATCH");
    }

    #[tokio::test]
    async fn force_complete_returns_summary() {
        let fixture = Fixture::new();
        let competition = fixture.seed(3).await;

        let (status, body) = post_json(
            router(&fixture),
            format!("/competitions/{}/force-complete", competition.id()),
            None,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["is_completed"], true);
        assert_eq!(body["summary"]["winner"], "learner");
    }

    #[tokio::test]
    async fn unknown_competition_is_not_found() {
        let fixture = Fixture::new();

        let (status, body) = post_json(
            router(&fixture),
            format!("/competitions/{}/start", CompetitionId::new()),
            None,
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "COMPETITION_NOT_FOUND");
    }

    #[tokio::test]
    async fn generator_outage_is_bad_gateway() {
        let fixture = Fixture::new();
        let competition = fixture.seed(1).await;
        fixture.generator.fail_next(1);

        let (status, _) = post_json(
            router(&fixture),
            format!("/competitions/{}/start", competition.id()),
            None,
        )
        .await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
    }
}
