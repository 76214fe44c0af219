use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{
            categories::{get_all_categories, get_category},
            questions::get_questions_for_category,
        },
        Category, Question,
    },
    server::app::AppState,
};

use super::{ApiError, ApiResponse};

#[derive(Serialize)]
struct CategoryLabels {
    categories: Vec<String>,
}

#[derive(Serialize)]
struct CategoryQuestions {
    questions: Vec<Question>,
    current_category: String,
}

pub(super) fn labels(categories: Vec<Category>) -> Vec<String> {
    categories.into_iter().map(|c| c.kind).collect()
}

async fn get_categories(State(pool): State<SqlitePool>) -> ApiResponse<Json<CategoryLabels>> {
    let categories = get_all_categories(&pool).await?;
    Ok(Json(CategoryLabels {
        categories: labels(categories),
    }))
}

async fn questions_by_category(
    State(pool): State<SqlitePool>,
    Path(id): Path<String>,
) -> ApiResponse<Json<CategoryQuestions>> {
    let id: i64 = id.parse().map_err(|_| ApiError::NotFound)?;
    let category = get_category(&pool, id).await.map_err(|error| {
        tracing::info!("Category {id} not resolved: {error}");
        ApiError::NotFound
    })?;
    let questions = get_questions_for_category(&pool, &category.id.to_string())
        .await
        .map_err(|error| {
            tracing::warn!("Cannot load questions for category {id}: {error}");
            ApiError::NotFound
        })?;

    Ok(Json(CategoryQuestions {
        questions,
        current_category: category.kind,
    }))
}

pub fn category_router(state: AppState) -> Router {
    Router::new()
        .route("/categories", get(get_categories))
        .route("/categories/{id}/questions", get(questions_by_category))
        .with_state(state)
}
