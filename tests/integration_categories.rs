mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;

use common::{
    create_test_category, create_test_post, create_test_user, denying_provider,
    generate_unique_category_name, generate_unique_email, session_token_for, setup_test_app,
};

fn create_category_request(token: &str, name: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/categories")
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::from(
            serde_json::to_string(&json!({
                "name": name,
                "description": "A place to talk",
                "icon": "fa-comments"
            }))
            .unwrap(),
        ))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

#[sqlx::test(migrations = "./migrations")]
async fn test_admin_creates_category_then_listed_with_zero_posts(pool: PgPool) {
    let admin = create_test_user(&pool, &generate_unique_email(), "admin").await;
    let token = session_token_for(&admin);
    let name = generate_unique_category_name();

    let app = setup_test_app(pool.clone(), denying_provider());
    let response = app
        .oneshot(create_category_request(&token, &name))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let created = json_body(response).await;
    assert_eq!(created["name"], name.as_str());
    assert_eq!(created["created_by"], admin.id.to_string());

    let app = setup_test_app(pool.clone(), denying_provider());
    let request = Request::builder()
        .method("GET")
        .uri("/api/categories")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let listed = json_body(response).await;
    let entry = listed
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["name"] == name.as_str())
        .expect("created category should be listed");
    assert_eq!(entry["post_count"], 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_non_admin_cannot_create_category(pool: PgPool) {
    let user = create_test_user(&pool, &generate_unique_email(), "user").await;
    let token = session_token_for(&user);

    let app = setup_test_app(pool.clone(), denying_provider());
    let response = app
        .oneshot(create_category_request(&token, "Off Topic"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let body = json_body(response).await;
    assert_eq!(body["code"], "FORBIDDEN");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_category_without_token(pool: PgPool) {
    let app = setup_test_app(pool.clone(), denying_provider());

    let request = Request::builder()
        .method("POST")
        .uri("/api/categories")
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::to_string(&json!({ "name": "X", "description": "Y" })).unwrap(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_duplicate_category_name_rejected(pool: PgPool) {
    let admin = create_test_user(&pool, &generate_unique_email(), "admin").await;
    let token = session_token_for(&admin);
    let name = generate_unique_category_name();

    let app = setup_test_app(pool.clone(), denying_provider());
    let response = app
        .oneshot(create_category_request(&token, &name))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let app = setup_test_app(pool.clone(), denying_provider());
    let response = app
        .oneshot(create_category_request(&token, &name))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_admin_updates_category_partially(pool: PgPool) {
    let admin = create_test_user(&pool, &generate_unique_email(), "admin").await;
    let token = session_token_for(&admin);
    let category =
        create_test_category(&pool, admin.id, &generate_unique_category_name()).await;

    let app = setup_test_app(pool.clone(), denying_provider());
    let request = Request::builder()
        .method("PUT")
        .uri(format!("/api/categories/{}", category.id))
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::from(
            serde_json::to_string(&json!({ "description": "Updated description" })).unwrap(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["description"], "Updated description");
    assert_eq!(body["name"], category.name.as_str());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_category_with_posts_conflicts(pool: PgPool) {
    let admin = create_test_user(&pool, &generate_unique_email(), "admin").await;
    let token = session_token_for(&admin);
    let category =
        create_test_category(&pool, admin.id, &generate_unique_category_name()).await;
    create_test_post(&pool, admin.id, category.id).await;

    let app = setup_test_app(pool.clone(), denying_provider());
    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/api/categories/{}", category.id))
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body = json_body(response).await;
    assert_eq!(body["code"], "CONFLICT");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_empty_category(pool: PgPool) {
    let admin = create_test_user(&pool, &generate_unique_email(), "admin").await;
    let token = session_token_for(&admin);
    let category =
        create_test_category(&pool, admin.id, &generate_unique_category_name()).await;

    let app = setup_test_app(pool.clone(), denying_provider());
    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/api/categories/{}", category.id))
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}
