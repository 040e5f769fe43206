use axum::{
    Extension,
    extract::Path,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use tracing::debug;

use crate::{
    backend::BackendClient,
    loaders::{self, DashboardData, LessonData, LessonNotFound},
    web::RequestToken,
};

impl IntoResponse for LessonNotFound {
    fn into_response(self) -> Response {
        (
            StatusCode::NOT_FOUND,
            Json(json!({"error": "Lesson not found"})),
        )
            .into_response()
    }
}

#[utoipa::path(
    get,
    path= "/dashboard",
    responses (
        (status = 200, description = "Subjects and lessons; empty lists with an error when the backend is unavailable", body = DashboardData),
    ),
    tag= "pages"
)]
// axum handler for the dashboard data
pub async fn dashboard(
    backend: Extension<BackendClient>,
    token: Extension<RequestToken>,
) -> Json<DashboardData> {
    Json(loaders::dashboard(&backend.0, token.as_deref()).await)
}

#[utoipa::path(
    get,
    path= "/learn/{subject_id}/lesson/{lesson_id}",
    params(
        ("subject_id" = String, Path, description = "Subject the lesson belongs to"),
        ("lesson_id" = String, Path, description = "Lesson identifier"),
    ),
    responses (
        (status = 200, description = "Lesson", body = LessonData),
        (status = 404, description = "Lesson not found"),
    ),
    tag= "pages"
)]
// axum handler for a single lesson
pub async fn lesson(
    Path((subject_id, lesson_id)): Path<(String, String)>,
    backend: Extension<BackendClient>,
    token: Extension<RequestToken>,
) -> Result<Json<LessonData>, LessonNotFound> {
    debug!(%subject_id, %lesson_id, "loading lesson");

    loaders::lesson(&backend.0, token.as_deref(), &lesson_id)
        .await
        .map(Json)
}
