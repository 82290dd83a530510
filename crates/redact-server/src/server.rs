use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use redact_config::ServerConfig;
use redact_core::{
    BlockRequest, CategorySelection, DocumentKind, LogLevel, LoginRequest, LoginResponse, Session,
};
use redact_security::TextRedactor;
use std::net::SocketAddr;
use time::OffsetDateTime;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::state::AppState;

/// Build the application router
pub fn router(state: AppState, max_upload_bytes: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handle_health))
        .route("/redact", post(handle_redact))
        .route("/api/admin/login", post(api_login))
        .route("/api/admin/users", get(api_list_users))
        .route("/api/admin/users/:id", delete(api_delete_user))
        .route("/api/admin/users/:id/block", post(api_block_user))
        .route("/api/admin/logs", get(api_list_logs))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Bind and serve until the process stops
pub async fn serve(config: &ServerConfig) -> anyhow::Result<()> {
    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Redaction service listening on {}", addr);

    let app = router(AppState::new(config), config.max_upload_bytes);
    axum::serve(listener, app).await?;
    Ok(())
}

/// Serve on an already-chosen address in the background; returns the bound address
pub async fn spawn(config: &ServerConfig) -> anyhow::Result<SocketAddr> {
    let listener = TcpListener::bind(config.bind_addr()).await?;
    let addr = listener.local_addr()?;
    let app = router(AppState::new(config), config.max_upload_bytes);

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            warn!("Redaction service stopped: {}", e);
        }
    });

    info!("Redaction service listening on {}", addr);
    Ok(addr)
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(serde_json::json!({ "error": message.into() })),
    )
        .into_response()
}

/// Resolve the bearer token to a username, or produce the 401 to return
async fn authorize(state: &AppState, headers: &HeaderMap) -> Result<String, Response> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());

    let Some(token) = token else {
        return Err(error_response(StatusCode::UNAUTHORIZED, "Missing bearer token"));
    };

    state
        .data
        .write()
        .await
        .authenticate(token, OffsetDateTime::now_utc())
        .ok_or_else(|| error_response(StatusCode::UNAUTHORIZED, "Session expired or unknown"))
}

/// GET /health
async fn handle_health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": "redact",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "ok"
    }))
}

/// POST /redact - multipart `file` + `categories`
async fn handle_redact(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    let mut file: Option<(String, Vec<u8>)> = None;
    let mut categories: Option<String> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return error_response(e.status(), e.body_text()),
        };

        let field_name = field.name().map(str::to_string);
        match field_name.as_deref() {
            Some("file") => {
                let name = field.file_name().unwrap_or("upload").to_string();
                match field.bytes().await {
                    Ok(bytes) => file = Some((name, bytes.to_vec())),
                    Err(e) => return error_response(e.status(), e.body_text()),
                }
            }
            Some("categories") => match field.text().await {
                Ok(text) => categories = Some(text),
                Err(e) => return error_response(e.status(), e.body_text()),
            },
            _ => {}
        }
    }

    let Some((name, bytes)) = file else {
        return error_response(StatusCode::BAD_REQUEST, "Missing file");
    };
    let selection = match categories.as_deref().map(CategorySelection::from_json) {
        Some(Ok(selection)) if !selection.is_empty() => selection,
        Some(Ok(_)) | None => {
            return error_response(StatusCode::BAD_REQUEST, "No categories selected");
        }
        Some(Err(e)) => return error_response(StatusCode::BAD_REQUEST, e.to_string()),
    };

    match DocumentKind::from_file_name(&name) {
        Some(DocumentKind::Txt) => {}
        Some(kind) => {
            warn!("No local back end for {:?} uploads ({})", kind, name);
            return error_response(
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                format!("{} documents are not supported by this service", kind.mime_type()),
            );
        }
        None => {
            return error_response(
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                format!("Unsupported file type: {}", name),
            );
        }
    }

    let text = String::from_utf8_lossy(&bytes);
    let (redacted, infos) = TextRedactor::new(selection.clone()).redact(&name, &text);
    let total: usize = infos.iter().map(|i| i.count).sum();

    info!("Redacted {} spans in {}", total, name);
    state.data.write().await.push_log(
        LogLevel::Info,
        None,
        format!("Redacted {} ({} categories, {} spans)", name, selection.len(), total),
    );

    let disposition = format!("attachment; filename=\"REDACTED_{}\"", name.replace('"', ""));
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        redacted,
    )
        .into_response()
}

/// POST /api/admin/login
async fn api_login(State(state): State<AppState>, Json(req): Json<LoginRequest>) -> Response {
    let verified = state.credentials.verify(&req.username, &req.password);
    let mut data = state.data.write().await;

    if !verified {
        warn!("Failed admin login for {}", req.username);
        data.push_log(LogLevel::Warn, Some(&req.username), "Failed admin login");
        return error_response(StatusCode::UNAUTHORIZED, "Invalid credentials");
    }

    let session = Session::issue(&req.username, state.session_ttl);
    let response = LoginResponse::from(&session);
    data.start_session(session, OffsetDateTime::now_utc());
    data.push_log(LogLevel::Info, Some(&req.username), "Admin login");
    info!("Admin {} logged in", req.username);

    Json(response).into_response()
}

/// GET /api/admin/users
async fn api_list_users(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Err(response) = authorize(&state, &headers).await {
        return response;
    }
    Json(state.data.read().await.users.clone()).into_response()
}

/// POST /api/admin/users/:id/block
async fn api_block_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
    Json(req): Json<BlockRequest>,
) -> Response {
    let actor = match authorize(&state, &headers).await {
        Ok(actor) => actor,
        Err(response) => return response,
    };

    let mut data = state.data.write().await;
    let Some(user) = data.users.iter_mut().find(|u| u.id == id) else {
        return error_response(StatusCode::NOT_FOUND, format!("User {} not found", id));
    };
    user.blocked = req.block;
    let user = user.clone();

    let verb = if req.block { "Blocked" } else { "Unblocked" };
    data.push_log(LogLevel::Info, Some(&actor), format!("{} {}", verb, user.name));

    Json(user).into_response()
}

/// DELETE /api/admin/users/:id
async fn api_delete_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Response {
    let actor = match authorize(&state, &headers).await {
        Ok(actor) => actor,
        Err(response) => return response,
    };

    let mut data = state.data.write().await;
    let Some(index) = data.users.iter().position(|u| u.id == id) else {
        return error_response(StatusCode::NOT_FOUND, format!("User {} not found", id));
    };
    let user = data.users.remove(index);
    data.push_log(LogLevel::Warn, Some(&actor), format!("Deleted {}", user.name));

    StatusCode::NO_CONTENT.into_response()
}

/// GET /api/admin/logs
async fn api_list_logs(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Err(response) = authorize(&state, &headers).await {
        return response;
    }
    Json(state.data.read().await.logs.clone()).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use tower::ServiceExt;

    const BOUNDARY: &str = "redact-test-boundary";

    fn app() -> (Router, AppState) {
        let config = ServerConfig::default();
        let state = AppState::new(&config);
        (router(state.clone(), config.max_upload_bytes), state)
    }

    fn multipart_body(file_name: &str, content: &str, categories: &str) -> String {
        format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{f}\"\r\n\
             Content-Type: text/plain\r\n\r\n{c}\r\n\
             --{b}\r\nContent-Disposition: form-data; name=\"categories\"\r\n\r\n{cat}\r\n\
             --{b}--\r\n",
            b = BOUNDARY,
            f = file_name,
            c = content,
            cat = categories
        )
    }

    fn redact_request(body: String) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/redact")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn body_string(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    async fn login(app: &Router) -> String {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/admin/login")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"username":"admin","password":"change-me"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        json["token"].as_str().unwrap().to_string()
    }

    fn authed(method: &str, uri: &str, token: &str, body: Body) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .header(header::CONTENT_TYPE, "application/json")
            .body(body)
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _) = app();
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_string(response).await.contains("\"status\":\"ok\""));
    }

    #[tokio::test]
    async fn test_redact_text_upload() {
        let (app, _) = app();
        let body = multipart_body("memo.txt", "Tel: 91234567\nNRIC S1234567D", r#"["PHONE"]"#);

        let response = app.oneshot(redact_request(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let disposition = response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert_eq!(disposition, "attachment; filename=\"REDACTED_memo.txt\"");
        assert_eq!(
            body_string(response).await,
            "Tel: <PHONE>\nNRIC S1234567D"
        );
    }

    #[tokio::test]
    async fn test_redact_rejects_pdf() {
        let (app, _) = app();
        let body = multipart_body("test.pdf", "%PDF", r#"["PHONE"]"#);
        let response = app.oneshot(redact_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[tokio::test]
    async fn test_redact_requires_categories() {
        let (app, _) = app();
        let body = multipart_body("memo.txt", "hello", "[]");
        let response = app.oneshot(redact_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_admin_requires_token() {
        let (app, _) = app();
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/admin/users")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_expired_token_rejected() {
        let (app, state) = app();
        let mut session = Session::issue("admin", time::Duration::hours(1));
        session.expires_at = session.issued_at - time::Duration::seconds(1);
        let token = session.token.clone();
        state.data.write().await.sessions.insert(token.clone(), session);

        let response = app
            .oneshot(authed("GET", "/api/admin/logs", &token, Body::empty()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_bad_login() {
        let (app, _) = app();
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/admin/login")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"username":"admin","password":"nope"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_block_and_delete() {
        let (app, state) = app();
        let token = login(&app).await;

        let response = app
            .clone()
            .oneshot(authed(
                "POST",
                "/api/admin/users/1/block",
                &token,
                Body::from(r#"{"block":true}"#),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_string(response).await.contains("\"blocked\":true"));

        let response = app
            .clone()
            .oneshot(authed("DELETE", "/api/admin/users/3", &token, Body::empty()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app
            .oneshot(authed("DELETE", "/api/admin/users/3", &token, Body::empty()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let data = state.data.read().await;
        assert_eq!(data.users.len(), 2);
        assert!(data.users[0].blocked);
        assert!(data.logs.iter().any(|e| e.message == "Deleted Ravi"));
    }
}
