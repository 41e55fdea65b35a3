//! Academy Routers
//!
//! Each router takes the auth guard so protected routes share the session
//! middleware with the auth crate.

use std::sync::Arc;

use auth::domain::repository::AuthSessionRepository;
use auth::{AuthMiddlewareState, require_auth_session};
use axum::{
    Router, middleware,
    routing::{delete, get, patch, post},
};

use crate::domain::repository::AcademyStore;
use crate::presentation::handlers::{self, AcademyAppState, AccountAppState};

/// Mounted at `/course`
pub fn course_router<R, S>(state: AcademyAppState<R>, guard: AuthMiddlewareState<S>) -> Router
where
    R: AcademyStore,
    S: AuthSessionRepository + Send + Sync + 'static,
{
    let protected = Router::new()
        .route(
            "/",
            post(handlers::create_course::<R>).get(handlers::list_creator_courses::<R>),
        )
        .route(
            "/{course_id}",
            get(handlers::get_course::<R>)
                .put(handlers::edit_course::<R>)
                .patch(handlers::toggle_publish::<R>)
                .delete(handlers::delete_course::<R>),
        )
        .route(
            "/{course_id}/lecture",
            post(handlers::create_lecture::<R>).get(handlers::list_lectures::<R>),
        )
        .route(
            "/{course_id}/lecture/{lecture_id}",
            patch(handlers::edit_lecture::<R>),
        )
        .route(
            "/lecture/{lecture_id}",
            get(handlers::get_lecture::<R>).delete(handlers::remove_lecture::<R>),
        )
        .route_layer(middleware::from_fn_with_state(
            guard,
            require_auth_session::<S>,
        ));

    Router::new()
        .route("/search", get(handlers::search_courses::<R>))
        .route("/published-courses", get(handlers::published_courses::<R>))
        .route("/suggestion", get(handlers::suggested_courses::<R>))
        .merge(protected)
        .with_state(state)
}

/// Mounted at `/purchase`. The webhook is public and signature-checked.
pub fn purchase_router<R, S>(state: AcademyAppState<R>, guard: AuthMiddlewareState<S>) -> Router
where
    R: AcademyStore,
    S: AuthSessionRepository + Send + Sync + 'static,
{
    let protected = Router::new()
        .route("/", get(handlers::purchased_courses::<R>))
        .route("/checkout", post(handlers::checkout::<R>))
        .route("/status/{reference}", get(handlers::purchase_status::<R>))
        .route(
            "/course/{course_id}/detail-with-status",
            get(handlers::course_detail_with_status::<R>),
        )
        .route_layer(middleware::from_fn_with_state(
            guard,
            require_auth_session::<S>,
        ));

    Router::new()
        .route("/webhook", post(handlers::purchase_webhook::<R>))
        .merge(protected)
        .with_state(state)
}

/// Mounted at `/progress`
pub fn progress_router<R, S>(state: AcademyAppState<R>, guard: AuthMiddlewareState<S>) -> Router
where
    R: AcademyStore,
    S: AuthSessionRepository + Send + Sync + 'static,
{
    Router::new()
        .route("/{course_id}", get(handlers::get_progress::<R>))
        .route(
            "/{course_id}/lecture/{lecture_id}/view",
            post(handlers::view_lecture::<R>),
        )
        .route("/{course_id}/complete", post(handlers::mark_complete::<R>))
        .route(
            "/{course_id}/incomplete",
            post(handlers::mark_incomplete::<R>),
        )
        .route(
            "/{course_id}/certificate",
            get(handlers::download_certificate::<R>),
        )
        .route_layer(middleware::from_fn_with_state(
            guard,
            require_auth_session::<S>,
        ))
        .with_state(state)
}

/// Merged into `/user` next to the auth router
pub fn account_router<R, S>(store: Arc<R>, guard: AuthMiddlewareState<S>) -> Router
where
    R: AcademyStore,
    S: AuthSessionRepository + Send + Sync + 'static,
{
    let state = AccountAppState {
        store,
        cookie: Arc::new(guard.config.cookie()),
    };

    Router::new()
        .route("/profile/delete", delete(handlers::delete_account::<R>))
        .route_layer(middleware::from_fn_with_state(
            guard,
            require_auth_session::<S>,
        ))
        .with_state(state)
}
