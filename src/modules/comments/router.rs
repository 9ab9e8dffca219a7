use axum::{
    Router,
    routing::{delete, get},
};

use crate::state::AppState;

use super::controller::{create_comment, delete_comment, get_post_comments};

/// Routes nested under `/api/posts/{post_id}/comments`.
pub fn init_post_comments_router() -> Router<AppState> {
    Router::new().route("/", get(get_post_comments).post(create_comment))
}

/// Routes mounted at `/api/comments`.
pub fn init_comments_router() -> Router<AppState> {
    Router::new().route("/{id}", delete(delete_comment))
}
