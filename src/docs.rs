use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::auth::controller::ErrorResponse;
use crate::modules::auth::model::{LoginRequest, LoginResponse, VerifyResponse};
use crate::modules::categories::model::{
    Category, CategoryWithPostCount, CreateCategoryDto, UpdateCategoryDto,
};
use crate::modules::comments::model::{Comment, CommentWithAuthor, CreateCommentDto};
use crate::modules::posts::model::{PaginatedPostsResponse, Post, PostWithMeta};
use crate::modules::users::model::{PaginatedUsersResponse, User, UserRole};

use agora_core::{PaginationMeta, PaginationParams};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::router::health,
        crate::modules::auth::controller::google_login,
        crate::modules::auth::controller::verify_session,
        crate::modules::categories::controller::get_categories,
        crate::modules::categories::controller::get_category,
        crate::modules::categories::controller::create_category,
        crate::modules::categories::controller::update_category,
        crate::modules::categories::controller::delete_category,
        crate::modules::posts::controller::get_posts,
        crate::modules::posts::controller::get_post,
        crate::modules::posts::controller::create_post,
        crate::modules::posts::controller::delete_post,
        crate::modules::comments::controller::get_post_comments,
        crate::modules::comments::controller::create_comment,
        crate::modules::comments::controller::delete_comment,
        crate::modules::users::controller::get_users,
    ),
    components(
        schemas(
            User,
            UserRole,
            LoginRequest,
            LoginResponse,
            VerifyResponse,
            ErrorResponse,
            Category,
            CategoryWithPostCount,
            CreateCategoryDto,
            UpdateCategoryDto,
            Post,
            PostWithMeta,
            PaginatedPostsResponse,
            Comment,
            CommentWithAuthor,
            CreateCommentDto,
            PaginatedUsersResponse,
            PaginationMeta,
            PaginationParams,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Federated login and session verification"),
        (name = "Categories", description = "Forum categories"),
        (name = "Posts", description = "Forum posts"),
        (name = "Comments", description = "Post comments"),
        (name = "Users", description = "User moderation endpoints"),
        (name = "Health", description = "Service health")
    ),
    info(
        title = "Agora API",
        version = "0.1.0",
        description = "A community forum backend built with Rust, Axum, and PostgreSQL featuring federated login and sanitized user content.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
