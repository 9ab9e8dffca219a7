use axum::{Router, routing::get};

use crate::state::AppState;

use crate::modules::comments::router::init_post_comments_router;

use super::controller::{create_post, delete_post, get_post, get_posts};

pub fn init_posts_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_posts).post(create_post))
        .route("/{id}", get(get_post).delete(delete_post))
        .nest("/{id}/comments", init_post_comments_router())
}
