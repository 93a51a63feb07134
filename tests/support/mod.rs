// In-process mock backend shared by the integration tests.
use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::{Value, json};
use std::{
    collections::HashSet,
    path::Path as FsPath,
    sync::{Arc, OnceLock},
    time::Duration,
};
use stay_client::ClientConfig;
use stay_client::interface_adapters::session_marker::CookieSessionMarker;
use stay_client::interface_adapters::state::AppState;
use tokio::sync::Mutex;

pub const SESSION_COOKIE: &str = "JSESSIONID";
pub const MEMBER_EMAIL: &str = "guest@stay.app";
pub const MEMBER_PASSWORD: &str = "correct-horse";
// Login attempts with this email get a bodiless 500.
pub const SILENT_EMAIL: &str = "silent@stay.app";

// Base URL (including the /api prefix) published by the backend thread.
static BACKEND_URL: OnceLock<String> = OnceLock::new();

#[derive(Clone, Default)]
struct Backend {
    // Live session ids handed out through Set-Cookie.
    sessions: Arc<Mutex<HashSet<String>>>,
}

fn envelope_ok(status: StatusCode, data: Value) -> Response {
    (
        status,
        Json(json!({"success": true, "data": data, "error": null})),
    )
        .into_response()
}

fn envelope_err(status: StatusCode, code: &str, message: &str) -> Response {
    (
        status,
        Json(json!({
            "success": false,
            "data": null,
            "error": {"message": message, "status": status.as_u16(), "code": code}
        })),
    )
        .into_response()
}

// Raw-shape endpoints send the error object without an envelope.
fn bare_err(status: StatusCode, code: &str, message: &str) -> Response {
    (
        status,
        Json(json!({"message": message, "status": status.as_u16(), "code": code})),
    )
        .into_response()
}

fn session_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.to_string())
}

async fn is_authenticated(backend: &Backend, headers: &HeaderMap) -> bool {
    match session_id(headers) {
        Some(id) => backend.sessions.lock().await.contains(&id),
        None => false,
    }
}

async fn me(State(backend): State<Backend>, headers: HeaderMap) -> Response {
    if is_authenticated(&backend, &headers).await {
        return envelope_ok(
            StatusCode::OK,
            json!({"memberId": 1, "nickname": "traveler", "email": MEMBER_EMAIL}),
        );
    }
    envelope_err(StatusCode::UNAUTHORIZED, "M004", "로그인이 필요합니다.")
}

async fn login(State(backend): State<Backend>, Json(body): Json<Value>) -> Response {
    let email = body["email"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();

    if email == SILENT_EMAIL {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    if !email.contains('@') {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "success": false,
                "data": null,
                "error": {
                    "message": "입력값이 올바르지 않습니다.",
                    "status": 400,
                    "code": "C001",
                    "errors": [{"field": "email", "value": email, "reason": "형식이 올바르지 않습니다"}]
                }
            })),
        )
            .into_response();
    }
    if email != MEMBER_EMAIL || password != MEMBER_PASSWORD {
        return envelope_err(StatusCode::BAD_REQUEST, "M003", "비밀번호가 일치하지 않습니다.");
    }

    let id = uuid::Uuid::new_v4().to_string();
    backend.sessions.lock().await.insert(id.clone());
    (
        [(
            header::SET_COOKIE,
            format!("{SESSION_COOKIE}={id}; Path=/; HttpOnly"),
        )],
        envelope_ok(StatusCode::OK, Value::Null),
    )
        .into_response()
}

async fn logout(State(backend): State<Backend>, headers: HeaderMap) -> Response {
    if let Some(id) = session_id(&headers) {
        backend.sessions.lock().await.remove(&id);
    }
    envelope_ok(StatusCode::OK, Value::Null)
}

// Drops the caller's session server-side, as if it had timed out.
async fn expire(State(backend): State<Backend>, headers: HeaderMap) -> StatusCode {
    if let Some(id) = session_id(&headers) {
        backend.sessions.lock().await.remove(&id);
    }
    StatusCode::NO_CONTENT
}

async fn signup(Json(body): Json<Value>) -> Response {
    if body["email"] == MEMBER_EMAIL {
        return envelope_err(StatusCode::CONFLICT, "M001", "이미 사용 중인 이메일입니다.");
    }
    envelope_ok(StatusCode::CREATED, json!({"memberId": 2}))
}

async fn accommodation(Path(id): Path<u64>) -> Response {
    match id {
        1 => envelope_ok(
            StatusCode::OK,
            json!({
                "id": 1,
                "name": "한옥 스테이",
                "address": "서울 종로구",
                "pricePerNight": 120000,
                "maxGuests": 4
            }),
        ),
        2 => (StatusCode::BAD_GATEWAY, "<html>Bad Gateway</html>").into_response(),
        // Failure reported inside a 2xx envelope.
        3 => envelope_err(StatusCode::OK, "A002", "해당 숙소에 대한 권한이 없습니다."),
        // Session expiry reported inside a 2xx envelope, without a status.
        4 => Json(json!({
            "success": false,
            "data": null,
            "error": {"message": "로그인이 필요합니다.", "code": "M004"}
        }))
        .into_response(),
        _ => envelope_err(StatusCode::NOT_FOUND, "A001", "숙소를 찾을 수 없습니다."),
    }
}

async fn list_wishlists(State(backend): State<Backend>, headers: HeaderMap) -> Response {
    if !is_authenticated(&backend, &headers).await {
        return bare_err(StatusCode::UNAUTHORIZED, "M004", "로그인이 필요합니다.");
    }
    Json(json!([{"id": 1, "name": "여름 휴가"}])).into_response()
}

async fn create_wishlist(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !is_authenticated(&backend, &headers).await {
        return bare_err(StatusCode::UNAUTHORIZED, "M004", "로그인이 필요합니다.");
    }
    (
        StatusCode::CREATED,
        Json(json!({"id": 2, "name": body["name"]})),
    )
        .into_response()
}

fn app() -> Router {
    Router::new()
        .route("/api/auth/me", get(me))
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .route("/api/test/expire", post(expire))
        .route("/api/members", post(signup))
        .route("/api/accommodations/{id}", get(accommodation))
        .route("/api/wishlists", get(list_wishlists).post(create_wishlist))
        .with_state(Backend::default())
}

// Ensure the mock backend is running and return its API base URL.
pub fn ensure_backend() -> &'static str {
    BACKEND_URL.get_or_init(|| {
        let published_url = Arc::new(OnceLock::<String>::new());
        let published_url_thread = Arc::clone(&published_url);
        // An OS thread keeps the backend alive across `#[tokio::test]` runtimes.
        std::thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("backend runtime");
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                    .await
                    .expect("bind ephemeral backend port");
                let addr = listener.local_addr().expect("get local addr");
                let _ = published_url_thread.set(format!("http://{addr}/api"));
                axum::serve(listener, app()).await.expect("backend failed");
            });
        });
        wait_for_backend(&published_url)
    })
}

fn wait_for_backend(published_url: &OnceLock<String>) -> String {
    let base_url = loop {
        if let Some(url) = published_url.get() {
            break url.clone();
        }
        std::thread::sleep(Duration::from_millis(10));
    };

    let addr = base_url
        .strip_prefix("http://")
        .and_then(|rest| rest.strip_suffix("/api"))
        .expect("base url should be http://host:port/api");
    for _ in 0..100 {
        if std::net::TcpStream::connect(addr).is_ok() {
            return base_url;
        }
        std::thread::sleep(Duration::from_millis(20));
    }
    panic!("backend did not become ready in time");
}

// A base URL nothing listens on.
pub async fn unreachable_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("get local addr");
    drop(listener);
    format!("http://{addr}/api")
}

// Production config pointed at `base_url`, built and mounted the way the
// binary does it.
pub async fn app_state(base_url: &str) -> AppState {
    try_app_state(base_url, None)
        .await
        .expect("client state should build")
}

// Same as `app_state`, with ERROR_CODES_PATH set when `error_codes` is given.
pub async fn try_app_state(
    base_url: &str,
    error_codes: Option<&FsPath>,
) -> std::io::Result<AppState> {
    let config = ClientConfig::from_lookup(|key| match key {
        "APP_ENV" => Some("production".to_string()),
        "API_BASE_URL" => Some(base_url.to_string()),
        "HTTP_TIMEOUT_MS" => Some("2000".to_string()),
        "ERROR_CODES_PATH" => error_codes.map(|path| path.display().to_string()),
        _ => None,
    })
    .expect("test config should load");
    stay_client::build_state(&config).await
}

// Second view of the session cookie in the state's jar.
pub fn session_marker(state: &AppState) -> CookieSessionMarker {
    CookieSessionMarker::new(
        state.transport.cookie_jar(),
        state.transport.base_url().clone(),
        SESSION_COOKIE,
    )
}
