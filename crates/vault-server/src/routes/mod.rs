//! HTTP route handlers

pub mod auth;
pub mod passwords;
pub mod profile;
pub mod shell;

use crate::state::AppState;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::StatusCode,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use vault_core::RouteTable;

/// Health check endpoint
pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// Build the full application router
pub fn router(state: Arc<AppState>) -> Router {
    let uploads = ServeDir::new(&state.config.storage.upload_directory);
    let assets = ServeDir::new(&state.config.frontend.dist_directory);
    let body_limit = state.config.server.max_upload_bytes;

    let mut app = Router::new()
        .route("/health", get(health))
        .route("/api/register", post(auth::register))
        .route("/api/login", post(auth::login))
        .route(
            "/api/passwords",
            get(passwords::list_passwords)
                .post(passwords::save_password)
                .put(passwords::update_password),
        )
        .route("/api/passwords/delete", post(passwords::delete_password))
        .route(
            "/api/profile",
            get(profile::get_profile).post(profile::update_profile),
        );

    // Every client-side route serves the application shell
    for path in RouteTable::default().paths() {
        app = app.route(path, get(shell::index));
    }

    app.nest_service("/uploads", uploads)
        .fallback_service(assets)
        .with_state(state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use axum::body::Body;
    use axum::http::{Request, header};
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    struct TestApp {
        _dir: tempfile::TempDir,
        router: Router,
    }

    async fn test_app() -> TestApp {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.storage.data_directory = dir.path().join("data");
        config.storage.upload_directory = dir.path().join("uploads");
        config.frontend.dist_directory = dir.path().join("dist");

        std::fs::create_dir_all(&config.frontend.dist_directory).unwrap();
        std::fs::write(
            config.frontend.dist_directory.join("index.html"),
            "<div id=\"app\"></div>",
        )
        .unwrap();

        let state = Arc::new(AppState::new(config).await.unwrap());
        TestApp {
            _dir: dir,
            router: router(state),
        }
    }

    async fn send(app: &TestApp, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = app.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, body.to_vec())
    }

    async fn send_json(app: &TestApp, method: &str, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let (status, bytes) = send(app, request).await;
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    async fn get_json(app: &TestApp, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let (status, bytes) = send(app, request).await;
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn test_register_and_login() {
        let app = test_app().await;
        let creds = json!({"username": "alice", "password": "s3cret"});

        let (status, body) = send_json(&app, "POST", "/api/register", creds.clone()).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], "Registration successful");

        let (status, body) = send_json(&app, "POST", "/api/register", creds.clone()).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["message"], "User already exists");

        let (status, body) = send_json(&app, "POST", "/api/login", creds).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["username"], "alice");

        let (status, body) = send_json(
            &app,
            "POST",
            "/api/login",
            json!({"username": "alice", "password": "wrong"}),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Invalid credentials");
    }

    #[tokio::test]
    async fn test_register_requires_fields() {
        let app = test_app().await;
        let (status, _) =
            send_json(&app, "POST", "/api/register", json!({"username": "bob"})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_password_lifecycle() {
        let app = test_app().await;

        let (status, _) = send_json(
            &app,
            "POST",
            "/api/passwords",
            json!({"username": "alice", "service": "github", "password": "p1"}),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = get_json(&app, "/api/passwords?username=alice").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([{"username": "alice", "service": "github", "password": "p1"}]));

        let (status, body) = send_json(
            &app,
            "PUT",
            "/api/passwords",
            json!({"username": "alice", "service": "github", "new_password": "p2"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Password updated");

        let (status, body) = send_json(
            &app,
            "PUT",
            "/api/passwords",
            json!({"username": "alice", "service": "gitlab", "new_password": "p2"}),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Password not found");

        let (status, _) = send_json(
            &app,
            "POST",
            "/api/passwords/delete",
            json!({"username": "alice", "service": "github"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = get_json(&app, "/api/passwords?username=alice").await;
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_missing_username_is_forbidden() {
        let app = test_app().await;

        let (status, body) = get_json(&app, "/api/passwords").await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["message"], "Unauthorized");

        let (status, _) = send_json(
            &app,
            "POST",
            "/api/passwords",
            json!({"service": "github", "password": "p1"}),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = get_json(&app, "/api/profile").await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_update_requires_all_fields() {
        let app = test_app().await;
        let (status, _) = send_json(
            &app,
            "PUT",
            "/api/passwords",
            json!({"username": "alice", "service": "github"}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_profile_upload() {
        let app = test_app().await;

        let (status, body) = get_json(&app, "/api/profile?username=alice").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Profile not found");

        let boundary = "XBOUNDARY";
        let multipart = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"username\"\r\n\r\nalice\r\n\
             --{b}\r\nContent-Disposition: form-data; name=\"email\"\r\n\r\nalice@example.com\r\n\
             --{b}\r\nContent-Disposition: form-data; name=\"avatar\"; filename=\"me.png\"\r\n\
             Content-Type: image/png\r\n\r\nPNGDATA\r\n--{b}--\r\n",
            b = boundary
        );
        let request = Request::builder()
            .method("POST")
            .uri("/api/profile")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", boundary),
            )
            .body(Body::from(multipart))
            .unwrap();
        let (status, bytes) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            body["avatar_url"],
            "http://127.0.0.1:8080/uploads/alice_me.png"
        );

        let (status, body) = get_json(&app, "/api/profile?username=alice").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["email"], "alice@example.com");

        let request = Request::builder()
            .uri("/uploads/alice_me.png")
            .body(Body::empty())
            .unwrap();
        let (status, bytes) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(bytes, b"PNGDATA");
    }

    #[tokio::test]
    async fn test_client_routes_serve_shell() {
        let app = test_app().await;

        for path in ["/", "/manager", "/generator", "/profile"] {
            let request = Request::builder().uri(path).body(Body::empty()).unwrap();
            let (status, bytes) = send(&app, request).await;
            assert_eq!(status, StatusCode::OK, "path {}", path);
            assert_eq!(bytes, b"<div id=\"app\"></div>");
        }

        let (status, _) = send(
            &app,
            Request::builder().uri("/health").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }
}
