use axum::{body::Bytes, extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_option_number_from_string;
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::questions::{get_all_questions, get_questions_for_category},
        Question,
    },
    quiz::{pick_any, pick_unseen, resolve_draw, Draw, QuizRng},
    server::app::AppState,
    telemetry::QUIZ_QUESTIONS_SERVED,
};

use super::{ApiError, ApiResponse};

#[derive(Deserialize, Default)]
struct QuizCategory {
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    id: Option<i64>,
    #[serde(rename = "type", default)]
    kind: Option<String>,
}

#[derive(Deserialize)]
struct QuizRequest {
    #[serde(default)]
    quiz_category: Option<QuizCategory>,
    #[serde(default)]
    previous_questions: Option<Vec<i64>>,
}

#[derive(Serialize)]
struct NextQuestion {
    question: Question,
}

async fn play_quiz(
    State(pool): State<SqlitePool>,
    State(rng): State<QuizRng>,
    body: Bytes,
) -> ApiResponse<Json<NextQuestion>> {
    let request: QuizRequest = serde_json::from_slice(&body).map_err(|error| {
        tracing::debug!("Malformed quiz request: {error}");
        ApiError::Unprocessable
    })?;
    let category = request.quiz_category.unwrap_or_default();
    let client_id = category.id.ok_or(ApiError::Unprocessable)?;
    let draw = resolve_draw(client_id, category.kind.as_deref()).ok_or(ApiError::NotFound)?;

    let (mode, question) = match draw {
        Draw::Everything => {
            let questions = get_all_questions(&pool).await?;
            ("all", rng.with(|r| pick_any(&questions, r).cloned()))
        }
        Draw::Category(id) => {
            let questions = get_questions_for_category(&pool, &id)
                .await
                .map_err(|error| {
                    tracing::warn!("Cannot load quiz questions for category {id}: {error}");
                    ApiError::NotFound
                })?;
            let previous = request.previous_questions.unwrap_or_default();
            (
                "category",
                rng.with(|r| pick_unseen(&questions, &previous, r).cloned()),
            )
        }
    };

    let question = question.ok_or(ApiError::NotFound)?;
    tracing::debug!(mode, "Serving quiz question {}", question.id);
    QUIZ_QUESTIONS_SERVED.with_label_values(&[mode]).inc();
    Ok(Json(NextQuestion { question }))
}

pub fn quiz_router(state: AppState) -> Router {
    Router::new()
        .route("/quizzes", post(play_quiz))
        .with_state(state)
}
