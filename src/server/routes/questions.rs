use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::{deserialize_number_from_string, deserialize_string_from_number};
use serde_json::Value;
use sqlx::SqlitePool;

use crate::{
    category_id,
    db::{
        queries::{categories::get_all_categories, questions},
        Question,
    },
    server::{
        app::AppState,
        deserializers::{deserialize_page, first_page, truthy_json},
    },
    telemetry::{QUESTIONS_CREATED, QUESTIONS_DELETED},
};

use super::{categories::labels, ApiError, ApiResponse, Outcome};

pub const QUESTIONS_PER_PAGE: usize = 10;

#[derive(Deserialize)]
struct PageQuery {
    #[serde(default = "first_page", deserialize_with = "deserialize_page")]
    page: i64,
}

#[derive(Serialize)]
struct QuestionsPage {
    questions: Vec<Question>,
    total_questions: usize,
    categories: Vec<String>,
    current_category: Option<String>,
    page: i64,
}

#[derive(Serialize)]
struct QuestionList {
    questions: Vec<Question>,
}

// category is the client-side id, see `category_id`
#[derive(Deserialize)]
struct NewQuestion {
    question: String,
    answer: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    category: i64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    difficulty: i64,
}

#[derive(Deserialize)]
struct SearchRequest {
    #[serde(
        rename = "searchTerm",
        default,
        deserialize_with = "deserialize_string_from_number"
    )]
    search_term: String,
}

/// Slices one page out of the full list. Pages start at 1; anything outside
/// the list is an empty page.
fn page_of<T>(items: Vec<T>, page: i64) -> Vec<T> {
    let Some(skipped_pages) = page.checked_sub(1).and_then(|p| usize::try_from(p).ok()) else {
        return Vec::new();
    };
    items
        .into_iter()
        .skip(skipped_pages.saturating_mul(QUESTIONS_PER_PAGE))
        .take(QUESTIONS_PER_PAGE)
        .collect()
}

// TODO: page with LIMIT/OFFSET plus a COUNT(*) query instead of loading the whole table
async fn list_questions(
    State(pool): State<SqlitePool>,
    Query(PageQuery { page }): Query<PageQuery>,
) -> ApiResponse<Json<QuestionsPage>> {
    let all = questions::get_all_questions(&pool).await?;
    let total_questions = all.len();
    let categories = get_all_categories(&pool).await?;

    Ok(Json(QuestionsPage {
        questions: page_of(all, page),
        total_questions,
        categories: labels(categories),
        current_category: None,
        page,
    }))
}

async fn delete_question(
    State(pool): State<SqlitePool>,
    Path(id): Path<String>,
) -> ApiResponse<Outcome> {
    let id: i64 = id.parse().map_err(|_| ApiError::NotFound)?;
    let outcome = match questions::delete_question(&pool, id).await {
        Ok(()) => {
            tracing::info!("Deleted question {id}");
            QUESTIONS_DELETED.inc();
            Outcome::Succeeded(format!("Delete question {id} successfully."))
        }
        Err(error) => {
            tracing::warn!("Cannot delete question {id}: {error}");
            Outcome::Failed(format!("Not able to delete question {id}."))
        }
    };
    Ok(outcome)
}

async fn insert_question(pool: &SqlitePool, payload: Value) -> anyhow::Result<i64> {
    let new: NewQuestion = serde_json::from_value(payload)?;
    let category = category_id::to_store(new.category)
        .ok_or_else(|| anyhow::anyhow!("Category {} has no store id", new.category))?;
    let id = questions::create_question(
        pool,
        &new.question,
        &new.answer,
        &category,
        new.difficulty,
    )
    .await?;
    Ok(id)
}

async fn create_question(State(pool): State<SqlitePool>, body: Bytes) -> ApiResponse<Outcome> {
    let payload = truthy_json(&body).ok_or(ApiError::BadRequest)?;
    let outcome = match insert_question(&pool, payload).await {
        Ok(id) => {
            tracing::info!("Created question {id}");
            QUESTIONS_CREATED.inc();
            Outcome::Succeeded("Create the new question successfully.".to_owned())
        }
        Err(error) => {
            tracing::warn!("Cannot create question: {error}");
            Outcome::Failed("Not able to create the question.".to_owned())
        }
    };
    Ok(outcome)
}

async fn search_questions(
    State(pool): State<SqlitePool>,
    body: Bytes,
) -> ApiResponse<Json<QuestionList>> {
    let request: SearchRequest = serde_json::from_slice(&body).map_err(|_| ApiError::BadRequest)?;
    if request.search_term.is_empty() {
        return Err(ApiError::BadRequest);
    }

    let questions = questions::search_questions(&pool, &request.search_term).await?;
    Ok(Json(QuestionList { questions }))
}

pub fn questions_router(state: AppState) -> Router {
    Router::new()
        .route("/questions", get(list_questions).post(create_question))
        .route("/questions/search", post(search_questions))
        .route("/questions/{id}", delete(delete_question))
        .with_state(state)
}
