mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;

use agora::agora_auth::create_session_token_at;
use common::{
    create_test_user, denying_provider, generate_unique_email, session_token_for,
    setup_test_app, stub_provider, test_identity, test_jwt_config,
};

fn login_request(token: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/auth/google")
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::to_string(&json!({ "token": token })).unwrap(),
        ))
        .unwrap()
}

fn verify_request(token: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri("/auth/verify")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

#[sqlx::test(migrations = "./migrations")]
async fn test_first_login_creates_single_user_with_user_role(pool: PgPool) {
    let email = generate_unique_email();
    let identity = test_identity(&email);
    let app = setup_test_app(pool.clone(), stub_provider("good-token", identity.clone()));

    let response = app.oneshot(login_request("good-token")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert!(body.get("token").is_some());
    assert_eq!(body["user"]["email"], email);
    assert_eq!(body["user"]["role"], "user");
    assert_eq!(body["user"]["name"], "Test User");
    // The provider subject id never leaves the server
    assert!(body["user"].get("google_id").is_none());

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = $1")
        .bind(&email)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);

    let google_id: Option<String> =
        sqlx::query_scalar("SELECT google_id FROM users WHERE email = $1")
            .bind(&email)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(google_id, Some(identity.subject));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_repeat_login_is_idempotent(pool: PgPool) {
    let email = generate_unique_email();
    let identity = test_identity(&email);

    let app = setup_test_app(pool.clone(), stub_provider("good-token", identity.clone()));
    let first = json_body(app.oneshot(login_request("good-token")).await.unwrap()).await;

    let app = setup_test_app(pool.clone(), stub_provider("good-token", identity));
    let second = json_body(app.oneshot(login_request("good-token")).await.unwrap()).await;

    assert_eq!(first["user"]["id"], second["user"]["id"]);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = $1")
        .bind(&email)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_repeat_login_updates_profile_but_not_identity_or_role(pool: PgPool) {
    let email = generate_unique_email();
    let mut identity = test_identity(&email);

    let app = setup_test_app(pool.clone(), stub_provider("good-token", identity.clone()));
    let first = json_body(app.oneshot(login_request("good-token")).await.unwrap()).await;
    let user_id = first["user"]["id"].as_str().unwrap().to_string();

    // Out-of-band escalation between logins must survive the next upsert
    sqlx::query("UPDATE users SET role = 'admin' WHERE email = $1")
        .bind(&email)
        .execute(&pool)
        .await
        .unwrap();

    identity.name = "Renamed User".to_string();
    identity.avatar_url = Some("https://example.com/new-avatar.png".to_string());

    let app = setup_test_app(pool.clone(), stub_provider("good-token", identity));
    let second = json_body(app.oneshot(login_request("good-token")).await.unwrap()).await;

    assert_eq!(second["user"]["id"], user_id.as_str());
    assert_eq!(second["user"]["email"], email);
    assert_eq!(second["user"]["name"], "Renamed User");
    assert_eq!(
        second["user"]["avatar"],
        "https://example.com/new-avatar.png"
    );
    assert_eq!(second["user"]["role"], "admin");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_relinks_account_by_email(pool: PgPool) {
    let email = generate_unique_email();

    // An account that predates the provider link
    let existing = sqlx::query_scalar::<_, uuid::Uuid>(
        "INSERT INTO users (email, display_name) VALUES ($1, $2) RETURNING id",
    )
    .bind(&email)
    .bind("Early Adopter")
    .fetch_one(&pool)
    .await
    .unwrap();

    let identity = test_identity(&email);
    let app = setup_test_app(pool.clone(), stub_provider("good-token", identity.clone()));
    let body = json_body(app.oneshot(login_request("good-token")).await.unwrap()).await;

    assert_eq!(body["user"]["id"], existing.to_string());

    let google_id: Option<String> =
        sqlx::query_scalar("SELECT google_id FROM users WHERE id = $1")
            .bind(existing)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(google_id, Some(identity.subject));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_with_rejected_token(pool: PgPool) {
    let app = setup_test_app(pool.clone(), denying_provider());

    let response = app.oneshot(login_request("forged-token")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = json_body(response).await;
    assert_eq!(body["code"], "INVALID_CREDENTIAL");

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_with_empty_token_is_validation_error(pool: PgPool) {
    let app = setup_test_app(pool.clone(), denying_provider());

    let response = app.oneshot(login_request("")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_verify_returns_current_user(pool: PgPool) {
    let email = generate_unique_email();
    let user = create_test_user(&pool, &email, "user").await;
    let token = session_token_for(&user);

    let app = setup_test_app(pool.clone(), denying_provider());
    let response = app.oneshot(verify_request(&token)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["user"]["email"], email);
    assert_eq!(body["user"]["id"], user.id.to_string());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_verify_without_token(pool: PgPool) {
    let app = setup_test_app(pool.clone(), denying_provider());

    let request = Request::builder()
        .method("GET")
        .uri("/auth/verify")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = json_body(response).await;
    assert_eq!(body["code"], "UNAUTHENTICATED");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_verify_with_forged_token(pool: PgPool) {
    let app = setup_test_app(pool.clone(), denying_provider());

    let response = app
        .oneshot(verify_request("not.a.real.token"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = json_body(response).await;
    assert_eq!(body["code"], "UNAUTHENTICATED");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_verify_with_expired_token(pool: PgPool) {
    let user = create_test_user(&pool, &generate_unique_email(), "user").await;

    let issued = chrono::Utc::now() - chrono::Duration::days(8);
    let token =
        create_session_token_at(user.id, &user.email, issued, &test_jwt_config()).unwrap();

    let app = setup_test_app(pool.clone(), denying_provider());
    let response = app.oneshot(verify_request(&token)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = json_body(response).await;
    assert_eq!(body["code"], "SESSION_EXPIRED");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_verify_with_deleted_account(pool: PgPool) {
    let user = create_test_user(&pool, &generate_unique_email(), "user").await;
    let token = session_token_for(&user);

    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(user.id)
        .execute(&pool)
        .await
        .unwrap();

    let app = setup_test_app(pool.clone(), denying_provider());
    let response = app.oneshot(verify_request(&token)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = json_body(response).await;
    assert_eq!(body["code"], "USER_NOT_FOUND");
}
