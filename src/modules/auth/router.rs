use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{google_login, verify_session};

pub fn init_auth_router() -> Router<AppState> {
    Router::new()
        .route("/google", post(google_login))
        .route("/verify", get(verify_session))
}
