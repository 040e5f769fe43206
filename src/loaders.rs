//! Page data for the dashboard and the lesson view.

use serde::Serialize;
use tracing::{error, instrument};
use utoipa::ToSchema;

use crate::backend::{
    BackendClient,
    models::{Lesson, Subject},
};

pub const DASHBOARD_LOAD_ERROR: &str = "Data could not be loaded.";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct DashboardData {
    pub subjects: Vec<Subject>,
    pub lessons: Vec<Lesson>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, ToSchema)]
pub struct LessonData {
    pub lesson: Lesson,
}

/// The requested lesson could not be loaded; rendered as `404 Not Found`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LessonNotFound {
    pub lesson_id: String,
}

impl std::fmt::Display for LessonNotFound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "lesson {} not found", self.lesson_id)
    }
}

impl std::error::Error for LessonNotFound {}

/// Subjects and lessons, fetched concurrently.
///
/// If either request fails both lists come back empty together with an error
/// message, so the page always renders.
#[instrument(skip(backend, token), fields(authenticated = token.is_some()))]
pub async fn dashboard(backend: &BackendClient, token: Option<&str>) -> DashboardData {
    match tokio::try_join!(backend.subjects(token), backend.lessons(token)) {
        Ok((subjects, lessons)) => DashboardData {
            subjects,
            lessons,
            error: None,
        },
        Err(e) => {
            error!("Error loading dashboard: {e:#}");
            DashboardData {
                error: Some(DASHBOARD_LOAD_ERROR.to_string()),
                ..DashboardData::default()
            }
        }
    }
}

/// # Errors
/// Returns [`LessonNotFound`] for any failure: unknown id, backend error or transport.
#[instrument(skip(backend, token), fields(authenticated = token.is_some()))]
pub async fn lesson(
    backend: &BackendClient,
    token: Option<&str>,
    lesson_id: &str,
) -> Result<LessonData, LessonNotFound> {
    backend
        .lesson(token, lesson_id)
        .await
        .map(|lesson| LessonData { lesson })
        .map_err(|e| {
            error!("Error loading lesson: {e:#}");
            LessonNotFound {
                lesson_id: lesson_id.to_string(),
            }
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::Config;
    use serde_json::json;
    use std::{net::TcpListener, sync::Arc};
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn can_bind_localhost() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    fn backend(server: &MockServer) -> BackendClient {
        let config = Config::new("auth.invalid", "client".to_string(), &server.uri()).unwrap();
        BackendClient::new(Arc::new(config)).unwrap()
    }

    async fn mount_subjects(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/api/subject"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": "s1", "title": "Mathematik", "description": "Zahlen und Formen"},
            ])))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn dashboard_returns_both_lists() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;
        mount_subjects(&server).await;
        Mock::given(method("GET"))
            .and(path("/api/lesson"))
            .and(header("Authorization", "Bearer jwt"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": "l1", "title": "Bruchrechnen", "content": "...", "subjectId": "s1"},
                {"id": "l2", "title": "Geometrie", "content": "...", "subjectId": "s1",
                 "videoUrl": "https://video.example/l2", "contentType": "VIDEO"},
            ])))
            .mount(&server)
            .await;

        let data = dashboard(&backend(&server), Some("jwt")).await;

        assert_eq!(data.subjects.len(), 1);
        assert_eq!(data.lessons.len(), 2);
        assert_eq!(data.error, None);
        assert_eq!(
            data.lessons[1].video_url.as_deref(),
            Some("https://video.example/l2")
        );
    }

    #[tokio::test]
    async fn dashboard_degrades_to_empty_lists() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;
        mount_subjects(&server).await;
        Mock::given(method("GET"))
            .and(path("/api/lesson"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let data = dashboard(&backend(&server), None).await;

        assert!(data.subjects.is_empty());
        assert!(data.lessons.is_empty());
        assert_eq!(data.error.as_deref(), Some(DASHBOARD_LOAD_ERROR));

        let value = serde_json::to_value(&data).unwrap();
        assert_eq!(
            value,
            json!({"subjects": [], "lessons": [], "error": "Data could not be loaded."})
        );
    }

    #[tokio::test]
    async fn unknown_lesson_is_not_found() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/lesson/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = lesson(&backend(&server), None, "missing").await.unwrap_err();
        assert_eq!(
            err,
            LessonNotFound {
                lesson_id: "missing".to_string()
            }
        );
    }

    #[tokio::test]
    async fn lesson_is_wrapped_for_rendering() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/lesson/l1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "l1", "title": "Bruchrechnen", "content": "...", "subjectId": "s1",
            })))
            .mount(&server)
            .await;

        let data = lesson(&backend(&server), None, "l1").await.unwrap();
        let value = serde_json::to_value(&data).unwrap();
        assert_eq!(value["lesson"]["id"], "l1");
        assert_eq!(value["lesson"]["subjectId"], "s1");
    }

    #[tokio::test]
    async fn backend_bodies_pass_through() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/subject"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": "s1", "title": "Math", "description": null},
            ])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/lesson"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/lesson/l2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "l2", "title": "T", "content": "c", "subjectId": null, "order": 3,
            })))
            .mount(&server)
            .await;

        let backend = backend(&server);

        let data = dashboard(&backend, None).await;
        assert_eq!(data.error, None);
        assert_eq!(data.subjects.len(), 1);

        let data = lesson(&backend, None, "l2").await.unwrap();
        let value = serde_json::to_value(&data).unwrap();
        assert_eq!(value["lesson"]["order"], 3);
        assert!(value["lesson"]["subjectId"].is_null());
    }
}
