use std::sync::Arc;

use axum::Json;
use axum::extract::{Multipart, Path};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get, post};
use axum::Router;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{Duration, Utc};
use serde_json::json;
use uuid::Uuid;

use welqo_client::api::owner::OwnerApi;
use welqo_client::api::resident::ResidentApi;
use welqo_client::config::Config;
use welqo_client::error::ClientError;
use welqo_client::models::grant::GrantStatus;
use welqo_client::notify::{ToastCenter, ToastLevel};
use welqo_client::services::access::AccessPass;
use welqo_client::services::auth::AuthService;
use welqo_client::storage::{ACCESS_TOKEN_KEY, LocalStorage, USER_NAME_KEY};

const EXPIRED_GRANT_ID: &str = "7f1f9c5e-0c8e-4b7a-9a4e-0d3f2a1b6c5d";
const KNOWN_REPORT_ID: &str = "0b9a6c1d-2e3f-4a5b-8c7d-9e0f1a2b3c4d";
const KNOWN_OWNER_ID: &str = "aa74ec3c-5ad4-4f72-9aa3-0374a533a616";
const KNOWN_REPORT_CREATED_AT: &str = "2026-08-01T10:00:00Z";

fn future_jwt() -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(
        json!({ "exp": Utc::now().timestamp() + 3600, "sub": "resident-1" })
            .to_string()
            .as_bytes(),
    );
    format!("{}.{}.signature", header, payload)
}

async fn login_handler(mut multipart: Multipart) -> impl IntoResponse {
    let mut username = String::new();
    let mut password = String::new();

    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        let value = field.text().await.unwrap();
        match name.as_str() {
            "username" => username = value,
            "password" => password = value,
            _ => {}
        }
    }

    if username == "+221771234567" && password == "secret123" {
        (
            StatusCode::OK,
            Json(json!({
                "access_token": future_jwt(),
                "token_type": "bearer",
                "user_name": "Awa"
            })),
        )
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "detail": "Invalid phone number or password" })),
        )
    }
}

async fn public_grant_handler(Path(id): Path<Uuid>) -> impl IntoResponse {
    if id.to_string() != EXPIRED_GRANT_ID {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "detail": "Form not found" })),
        );
    }

    (
        StatusCode::OK,
        Json(json!({
            "id": id,
            "name": "Moussa Diop",
            "phone_number": "+221770000001",
            "qr_code_data": "opaque",
            "created_at": (Utc::now() - Duration::hours(3)).to_rfc3339(),
            "expires_at": (Utc::now() - Duration::hours(1)).to_rfc3339(),
            "user": {
                "name": "Awa Ndiaye",
                "phone_number": "+221771234567",
                "appartement": "B-12"
            }
        })),
    )
}

async fn my_reports_handler() -> impl IntoResponse {
    Json(json!([{
        "id": KNOWN_REPORT_ID,
        "title": "Monthly activity",
        "file_path": "/srv/reports/monthly.pdf",
        "report_type": "activity_report",
        "owner_id": KNOWN_OWNER_ID,
        "created_at": KNOWN_REPORT_CREATED_AT
    }]))
}

async fn delete_report_handler(Path(_id): Path<Uuid>) -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "detail": "not found" })))
}

async fn delete_grant_handler(Path(_id): Path<Uuid>) -> impl IntoResponse {
    StatusCode::NO_CONTENT
}

async fn statistics_handler() -> impl IntoResponse {
    Json(json!({
        "total_users": 42,
        "total_qr_codes": 120,
        "active_qr_codes": 7,
        "total_scans": 356,
        "users_this_month": 5,
        "qr_codes_this_month": 18
    }))
}

fn init_tracing() {
    // Every test may race to install the subscriber; only the first wins.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

async fn spawn_backend() -> String {
    init_tracing();

    let app = Router::new()
        .route("/user/login", post(login_handler))
        .route("/forms/public/{id}", get(public_grant_handler))
        .route("/forms/{id}", delete(delete_grant_handler))
        .route("/owners/my-reports", get(my_reports_handler))
        .route("/reports/delete-report/{id}", delete(delete_report_handler))
        .route("/reports/statistics", get(statistics_handler));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

fn client_stack(base_url: &str) -> (Config, Arc<LocalStorage>) {
    let config = Config::with_base_url(base_url.to_string(), "unused.json");
    (config, Arc::new(LocalStorage::in_memory()))
}

#[tokio::test]
async fn login_persists_token_and_name_and_returns_destination() {
    let base_url = spawn_backend().await;
    let (config, storage) = client_stack(&base_url);
    let api = Arc::new(ResidentApi::new(&config, storage.clone()));
    let auth = AuthService::new(api, storage.clone());

    let destination = auth.login("+221771234567", "secret123").await.unwrap();

    assert_eq!(destination, "/residents/dashboard");
    assert!(storage.get(ACCESS_TOKEN_KEY).is_some());
    assert_eq!(storage.get(USER_NAME_KEY).as_deref(), Some("Awa"));
    assert_eq!(auth.current_user().unwrap().name, "Awa");
}

#[tokio::test]
async fn login_failure_surfaces_backend_detail() {
    let base_url = spawn_backend().await;
    let (config, storage) = client_stack(&base_url);
    let api = Arc::new(ResidentApi::new(&config, storage.clone()));
    let auth = AuthService::new(api, storage.clone());

    let err = auth.login("+221771234567", "wrong-pass").await.unwrap_err();

    assert_eq!(err.status(), 401);
    assert_eq!(err.detail(), "Invalid phone number or password");
    assert!(storage.get(ACCESS_TOKEN_KEY).is_none());
    assert!(!auth.is_authenticated());
}

#[tokio::test]
async fn expired_public_grant_blocks_download_and_share() {
    let base_url = spawn_backend().await;
    let (config, storage) = client_stack(&base_url);
    let api = ResidentApi::new(&config, storage);

    let id = Uuid::parse_str(EXPIRED_GRANT_ID).unwrap();
    let pass = AccessPass::fetch(&api, id).await.unwrap();

    assert_eq!(pass.status(), GrantStatus::Expired);

    let path = std::env::temp_dir().join(format!("welqo-e2e-{}.png", Uuid::new_v4()));
    assert!(matches!(
        pass.save_png(&path).unwrap_err(),
        ClientError::PassExpired
    ));
    assert!(!path.exists());
    assert!(matches!(
        pass.share(&base_url).unwrap_err(),
        ClientError::PassExpired
    ));
}

#[tokio::test]
async fn delete_report_rejection_keeps_list_and_surfaces_toast() {
    let base_url = spawn_backend().await;
    let (config, storage) = client_stack(&base_url);
    let api = OwnerApi::new(&config, storage);
    let toasts = ToastCenter::default();
    let mut rx = toasts.subscribe();

    let reports = api.my_reports().await.unwrap();
    assert_eq!(reports.len(), 1);

    let err = api.delete_report(reports[0].id).await.unwrap_err();
    assert_eq!(err.status(), 404);
    toasts.surface(&err);

    let toast = rx.recv().await.unwrap();
    assert_eq!(toast.level, ToastLevel::Error);
    assert_eq!(toast.message, "not found");

    // The backend rejected the delete; a refetch shows the same list.
    let after = api.my_reports().await.unwrap();
    assert_eq!(after, reports);
}

#[tokio::test]
async fn delete_grant_accepts_an_empty_204_response() {
    let base_url = spawn_backend().await;
    let (config, storage) = client_stack(&base_url);
    let api = ResidentApi::new(&config, storage);

    api.delete_grant(Uuid::new_v4()).await.unwrap();
}

#[tokio::test]
async fn statistics_deserialize_into_dashboard_counters() {
    let base_url = spawn_backend().await;
    let (config, storage) = client_stack(&base_url);
    let api = OwnerApi::new(&config, storage);

    let stats = api.statistics().await.unwrap();
    assert_eq!(stats.total_users, 42);
    assert_eq!(stats.active_qr_codes, 7);
    assert_eq!(stats.qr_codes_this_month, 18);
}

#[tokio::test]
async fn connection_failure_normalizes_to_500() {
    init_tracing();

    // Nothing listens here.
    let (config, storage) = client_stack("http://127.0.0.1:9");
    let api = ResidentApi::new(&config, storage);

    let err = api.user_grants().await.unwrap_err();
    assert!(matches!(err, ClientError::Connection(_)));
    assert_eq!(err.status(), 500);
}
