use axum::response::Json;
use utoipa::OpenApi;

use super::handlers::{FormError, health, login, logout, pages, signup};
use crate::{
    backend::models::{Lesson, Subject},
    loaders::{DashboardData, LessonData},
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        signup::signup,
        login::login,
        logout::logout,
        pages::dashboard,
        pages::lesson,
    ),
    components(schemas(
        health::Health,
        signup::SignupForm,
        login::LoginForm,
        FormError,
        DashboardData,
        LessonData,
        Subject,
        Lesson,
    )),
    tags(
        (name = "health", description = "Service health"),
        (name = "auth", description = "Signup, login and logout form actions"),
        (name = "pages", description = "Dashboard and lesson page data"),
    )
)]
pub struct ApiDoc;

pub async fn openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
