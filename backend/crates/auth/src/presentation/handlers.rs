//! HTTP Handlers

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};

use crate::application::config::AuthConfig;
use crate::application::{
    ProfileUseCase, SignInInput, SignInUseCase, SignOutUseCase, SignUpInput, SignUpUseCase,
    UpdateProfileInput,
};
use crate::domain::repository::{AuthSessionRepository, UserRepository};
use crate::error::{AuthError, AuthResult};
use crate::presentation::client::Client;
use crate::presentation::dto::{
    LoginRequest, MessageResponse, RegisterRequest, UpdateProfileRequest, UserEnvelope,
};
use crate::presentation::middleware::CurrentUser;

/// Shared state for auth handlers
pub struct AuthAppState<R> {
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
}

impl<R> Clone for AuthAppState<R> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            config: self.config.clone(),
        }
    }
}

/// POST /register
pub async fn register<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<RegisterRequest>,
) -> AuthResult<(StatusCode, Json<MessageResponse>)>
where
    R: UserRepository + AuthSessionRepository + Send + Sync + 'static,
{
    SignUpUseCase::new(state.repo.clone(), state.config.clone())
        .execute(SignUpInput {
            name: req.name,
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::ok("Account created successfully.")),
    ))
}

/// POST /login
pub async fn login<R>(
    State(state): State<AuthAppState<R>>,
    Client(fingerprint): Client,
    Json(req): Json<LoginRequest>,
) -> AuthResult<Response>
where
    R: UserRepository + AuthSessionRepository + Send + Sync + 'static,
{
    let output = SignInUseCase::new(state.repo.clone(), state.repo.clone(), state.config.clone())
        .execute(
            SignInInput {
                email: req.email,
                password: req.password,
            },
            fingerprint,
        )
        .await?;

    let cookie = state
        .config
        .cookie()
        .set_cookie_header(&output.session_token)
        .ok_or_else(|| AuthError::Internal("Session cookie is not a valid header".into()))?;

    let message = format!("Welcome back {}", output.user.name);

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(UserEnvelope::new(output.user, Some(message))),
    )
        .into_response())
}

/// POST /logout
///
/// Always clears the cookie, even when the session is already gone.
pub async fn logout<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
) -> AuthResult<Response>
where
    R: UserRepository + AuthSessionRepository + Send + Sync + 'static,
{
    let cookie_config = state.config.cookie();

    if let Some(token) = platform::cookie::extract_cookie(&headers, &cookie_config.name) {
        let use_case = SignOutUseCase::new(state.repo.clone(), state.config.clone());
        if let Err(e) = use_case.execute(&token).await {
            tracing::debug!(error = %e, "Sign out with stale session token");
        }
    }

    let clear = cookie_config
        .delete_cookie_header()
        .ok_or_else(|| AuthError::Internal("Session cookie is not a valid header".into()))?;

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, clear)],
        Json(MessageResponse::ok("Logged out successfully.")),
    )
        .into_response())
}

/// GET /profile
pub async fn get_profile<R>(
    State(state): State<AuthAppState<R>>,
    current: CurrentUser,
) -> AuthResult<Json<UserEnvelope>>
where
    R: UserRepository + AuthSessionRepository + Send + Sync + 'static,
{
    let user = ProfileUseCase::new(state.repo.clone(), state.repo.clone())
        .get(&current.user_id)
        .await?;

    Ok(Json(UserEnvelope::new(user, None)))
}

/// PUT /profile/update
pub async fn update_profile<R>(
    State(state): State<AuthAppState<R>>,
    current: CurrentUser,
    Json(req): Json<UpdateProfileRequest>,
) -> AuthResult<Json<UserEnvelope>>
where
    R: UserRepository + AuthSessionRepository + Send + Sync + 'static,
{
    let user = ProfileUseCase::new(state.repo.clone(), state.repo.clone())
        .update(
            &current.user_id,
            UpdateProfileInput {
                name: req.name,
                photo_url: req.photo_url,
            },
        )
        .await?;

    Ok(Json(UserEnvelope::new(
        user,
        Some("Profile updated successfully.".into()),
    )))
}

/// PATCH /become-instructor
pub async fn become_instructor<R>(
    State(state): State<AuthAppState<R>>,
    current: CurrentUser,
) -> AuthResult<Json<UserEnvelope>>
where
    R: UserRepository + AuthSessionRepository + Send + Sync + 'static,
{
    let user = ProfileUseCase::new(state.repo.clone(), state.repo.clone())
        .become_instructor(&current.user_id)
        .await?;

    Ok(Json(UserEnvelope::new(
        user,
        Some("You are now an instructor.".into()),
    )))
}
