//! HTTP routing and OpenAPI documentation configuration.
//!
//! All endpoints are registered here with their OpenAPI specifications
//! (collected by utoipa from the `#[utoipa::path]` annotations on the
//! handlers), and Swagger UI serves interactive API documentation at
//! `/docs` with the raw document at `/docs/openapi.json`.
//!
//! Routes are split into two groups:
//! - public: signup, login/refresh/logout, public reads, health
//! - protected: everything acting as the authenticated user, guarded by
//!   the bearer-token middleware

use axum::{Router, middleware as axum_middleware};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::{Modify, OpenApi};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa_axum::{router::OpenApiRouter, routes};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    handlers::{comments, health, likes, posts, users},
    middleware::auth::auth_middleware,
    state::AppState,
};

/// Registers the JWT bearer scheme referenced by protected endpoints, so
/// Swagger UI shows an Authorize button.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// Build the application router with all routes, middleware, and Swagger UI.
pub fn build(state: AppState) -> Router {
    #[derive(OpenApi)]
    #[openapi(
        info(
            title = "Cloud Community",
            description = "REST API for the cloud community social service"
        ),
        modifiers(&SecurityAddon),
        tags(
            (name = users::USERS_TAG, description = "Accounts, login, and profiles"),
            (name = posts::POSTS_TAG, description = "Community posts"),
            (name = comments::COMMENTS_TAG, description = "Comments under posts"),
            (name = likes::LIKES_TAG, description = "Post likes"),
        )
    )]
    struct ApiDoc;

    // Routes acting as the authenticated user
    let protected = OpenApiRouter::new()
        .routes(routes!(
            users::get_my_profile,
            users::update_my_profile,
            users::delete_my_account
        ))
        .routes(routes!(posts::create_post))
        .routes(routes!(posts::list_my_posts))
        .routes(routes!(posts::update_post, posts::delete_post))
        .routes(routes!(likes::list_liked_posts))
        .routes(routes!(
            likes::create_like,
            likes::delete_like,
            likes::get_like_status
        ))
        .routes(routes!(comments::create_comment))
        .routes(routes!(comments::update_comment, comments::delete_comment))
        .routes(routes!(comments::list_my_comments))
        // Apply authentication middleware to all routes in this group
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Public routes (no authentication required)
    let public = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .routes(routes!(health::health_check))
        .routes(routes!(users::create_user))
        .routes(routes!(users::get_user))
        .routes(routes!(users::login, users::refresh_tokens, users::logout))
        .routes(routes!(posts::list_posts))
        .routes(routes!(posts::get_post))
        .routes(routes!(comments::list_comments));

    // Merge both groups and split the collected OpenAPI document back out
    let (router, api) = public.merge(protected).split_for_parts();

    router
        .merge(SwaggerUi::new("/docs").url("/docs/openapi.json", api))
        // Add distributed tracing middleware for observability
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        // Share pool and config with all handlers via State extraction
        .with_state(state)
}
