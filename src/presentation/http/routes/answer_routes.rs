use axum::{Router, routing::post};
use std::sync::Arc;

use crate::presentation::http::handlers::AnswerHandler;

pub fn answer_routes(answer_handler: Arc<AnswerHandler>) -> Router {
    Router::new()
        .route("/answer", post(AnswerHandler::answer_question))
        .with_state(answer_handler)
}
