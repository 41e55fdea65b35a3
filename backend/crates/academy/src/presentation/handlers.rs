//! HTTP Handlers

use std::sync::Arc;

use auth::CurrentUser;
use auth::presentation::dto::MessageResponse;
use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use kernel::id::{CourseId, LectureId};
use platform::cookie::CookieConfig;

use crate::application::config::AcademyConfig;
use crate::application::{
    AccountCleanupUseCase, CertificateUseCase, CourseUseCase, LectureUseCase, ProgressUseCase,
    PurchaseUseCase,
};
use crate::domain::entity::purchase::PurchaseStatus;
use crate::domain::repository::AcademyStore;
use crate::domain::services::CertificateRenderer;
use crate::domain::value_object::search::CourseSearch;
use crate::error::{AcademyError, AcademyResult};
use crate::presentation::dto::{
    CheckoutRequest, CheckoutResponse, CourseDetailResponse, CourseEnvelope, CoursesEnvelope,
    CreateCourseRequest, CreateLectureRequest, EditCourseRequest, EditLectureRequest,
    LectureEnvelope, LecturesEnvelope, ProgressEnvelope, PublishQuery, PurchaseStatusResponse,
    PurchasedCoursesEnvelope, SearchQuery, WebhookRequest, WebhookResponse,
};

/// Header carrying `base64(HMAC-SHA256(secret, body))` on gateway callbacks
pub const WEBHOOK_SIGNATURE_HEADER: &str = "x-webhook-signature";

/// Shared state for academy handlers
pub struct AcademyAppState<R> {
    pub store: Arc<R>,
    pub config: Arc<AcademyConfig>,
    pub renderer: Arc<dyn CertificateRenderer>,
}

impl<R> AcademyAppState<R> {
    pub fn new(store: Arc<R>, config: AcademyConfig, renderer: impl CertificateRenderer) -> Self {
        Self {
            store,
            config: Arc::new(config),
            renderer: Arc::new(renderer),
        }
    }
}

impl<R> Clone for AcademyAppState<R> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            config: self.config.clone(),
            renderer: self.renderer.clone(),
        }
    }
}

/// State for account deletion, which also clears the session cookie
pub struct AccountAppState<R> {
    pub store: Arc<R>,
    pub cookie: Arc<CookieConfig>,
}

impl<R> Clone for AccountAppState<R> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            cookie: self.cookie.clone(),
        }
    }
}

fn courses<R: AcademyStore>(state: &AcademyAppState<R>) -> CourseUseCase<R> {
    CourseUseCase::new(state.store.clone(), state.config.clone())
}

fn purchases<R: AcademyStore>(state: &AcademyAppState<R>) -> PurchaseUseCase<R> {
    PurchaseUseCase::new(state.store.clone(), state.config.clone())
}

// ============================================================================
// Courses
// ============================================================================

/// POST /course
pub async fn create_course<R: AcademyStore>(
    State(state): State<AcademyAppState<R>>,
    current: CurrentUser,
    Json(req): Json<CreateCourseRequest>,
) -> AcademyResult<(StatusCode, Json<CourseEnvelope>)> {
    let course = courses(&state)
        .create(&current, &req.course_title, &req.category)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CourseEnvelope::new(course, Some("Course created."))),
    ))
}

/// GET /course
pub async fn list_creator_courses<R: AcademyStore>(
    State(state): State<AcademyAppState<R>>,
    current: CurrentUser,
) -> AcademyResult<Json<CoursesEnvelope>> {
    let list = courses(&state).list_for_creator(&current).await?;
    Ok(Json(CoursesEnvelope::new(list)))
}

/// GET /course/{course_id}
pub async fn get_course<R: AcademyStore>(
    State(state): State<AcademyAppState<R>>,
    _current: CurrentUser,
    Path(course_id): Path<CourseId>,
) -> AcademyResult<Json<CourseDetailResponse>> {
    let detail = courses(&state).get(&course_id).await?;
    Ok(Json(CourseDetailResponse::new(detail, None)))
}

/// PUT /course/{course_id}
pub async fn edit_course<R: AcademyStore>(
    State(state): State<AcademyAppState<R>>,
    current: CurrentUser,
    Path(course_id): Path<CourseId>,
    Json(req): Json<EditCourseRequest>,
) -> AcademyResult<Json<CourseEnvelope>> {
    let course = courses(&state)
        .edit(&current, &course_id, req.into())
        .await?;

    Ok(Json(CourseEnvelope::new(
        course,
        Some("Course updated successfully."),
    )))
}

/// PATCH /course/{course_id}?publish=true|false
pub async fn toggle_publish<R: AcademyStore>(
    State(state): State<AcademyAppState<R>>,
    current: CurrentUser,
    Path(course_id): Path<CourseId>,
    Query(query): Query<PublishQuery>,
) -> AcademyResult<Json<CourseEnvelope>> {
    let course = courses(&state)
        .set_published(&current, &course_id, query.publish)
        .await?;

    let message = if query.publish {
        "Course is published"
    } else {
        "Course is unpublished"
    };
    Ok(Json(CourseEnvelope::new(course, Some(message))))
}

/// DELETE /course/{course_id}
pub async fn delete_course<R: AcademyStore>(
    State(state): State<AcademyAppState<R>>,
    current: CurrentUser,
    Path(course_id): Path<CourseId>,
) -> AcademyResult<Json<MessageResponse>> {
    courses(&state).delete(&current, &course_id).await?;
    Ok(Json(MessageResponse::ok("Course deleted successfully.")))
}

/// GET /course/search
pub async fn search_courses<R: AcademyStore>(
    State(state): State<AcademyAppState<R>>,
    Query(query): Query<SearchQuery>,
) -> AcademyResult<Json<CoursesEnvelope>> {
    let search = CourseSearch::from(query);
    let cards = courses(&state).search(&search).await?;
    Ok(Json(CoursesEnvelope::new(cards)))
}

/// GET /course/published-courses
pub async fn published_courses<R: AcademyStore>(
    State(state): State<AcademyAppState<R>>,
) -> AcademyResult<Json<CoursesEnvelope>> {
    let cards = courses(&state).published().await?;
    Ok(Json(CoursesEnvelope::new(cards)))
}

/// GET /course/suggestion
pub async fn suggested_courses<R: AcademyStore>(
    State(state): State<AcademyAppState<R>>,
) -> AcademyResult<Json<CoursesEnvelope>> {
    let cards = courses(&state).suggestions().await?;
    Ok(Json(CoursesEnvelope::new(cards)))
}

// ============================================================================
// Lectures
// ============================================================================

/// POST /course/{course_id}/lecture
pub async fn create_lecture<R: AcademyStore>(
    State(state): State<AcademyAppState<R>>,
    current: CurrentUser,
    Path(course_id): Path<CourseId>,
    Json(req): Json<CreateLectureRequest>,
) -> AcademyResult<(StatusCode, Json<LectureEnvelope>)> {
    let lecture = LectureUseCase::new(state.store.clone())
        .create(&current, &course_id, &req.lecture_title)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(LectureEnvelope::new(lecture, Some("Lecture created successfully."))),
    ))
}

/// GET /course/{course_id}/lecture
pub async fn list_lectures<R: AcademyStore>(
    State(state): State<AcademyAppState<R>>,
    _current: CurrentUser,
    Path(course_id): Path<CourseId>,
) -> AcademyResult<Json<LecturesEnvelope>> {
    let lectures = LectureUseCase::new(state.store.clone())
        .list(&course_id)
        .await?;
    Ok(Json(LecturesEnvelope::new(lectures)))
}

/// PATCH /course/{course_id}/lecture/{lecture_id}
pub async fn edit_lecture<R: AcademyStore>(
    State(state): State<AcademyAppState<R>>,
    current: CurrentUser,
    Path((course_id, lecture_id)): Path<(CourseId, LectureId)>,
    Json(req): Json<EditLectureRequest>,
) -> AcademyResult<Json<LectureEnvelope>> {
    let lecture = LectureUseCase::new(state.store.clone())
        .edit(&current, &course_id, &lecture_id, req.into())
        .await?;

    Ok(Json(LectureEnvelope::new(
        lecture,
        Some("Lecture updated successfully."),
    )))
}

/// GET /course/lecture/{lecture_id}
pub async fn get_lecture<R: AcademyStore>(
    State(state): State<AcademyAppState<R>>,
    _current: CurrentUser,
    Path(lecture_id): Path<LectureId>,
) -> AcademyResult<Json<LectureEnvelope>> {
    let lecture = LectureUseCase::new(state.store.clone())
        .get(&lecture_id)
        .await?;
    Ok(Json(LectureEnvelope::new(lecture, None)))
}

/// DELETE /course/lecture/{lecture_id}
pub async fn remove_lecture<R: AcademyStore>(
    State(state): State<AcademyAppState<R>>,
    current: CurrentUser,
    Path(lecture_id): Path<LectureId>,
) -> AcademyResult<Json<MessageResponse>> {
    LectureUseCase::new(state.store.clone())
        .remove(&current, &lecture_id)
        .await?;
    Ok(Json(MessageResponse::ok("Lecture removed successfully.")))
}

// ============================================================================
// Purchases
// ============================================================================

/// POST /purchase/checkout
pub async fn checkout<R: AcademyStore>(
    State(state): State<AcademyAppState<R>>,
    current: CurrentUser,
    Json(req): Json<CheckoutRequest>,
) -> AcademyResult<Json<CheckoutResponse>> {
    let order = purchases(&state).checkout(&current, &req.course_id).await?;
    Ok(Json(order.into()))
}

/// POST /purchase/webhook
///
/// Called by the payment gateway, not the browser. The signature covers
/// the raw body, so it is checked before parsing.
pub async fn purchase_webhook<R: AcademyStore>(
    State(state): State<AcademyAppState<R>>,
    headers: HeaderMap,
    body: Bytes,
) -> AcademyResult<Json<WebhookResponse>> {
    let use_case = purchases(&state);

    let signature = headers
        .get(WEBHOOK_SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok());
    use_case.verify_webhook(&body, signature)?;

    let req: WebhookRequest = serde_json::from_slice(&body)
        .map_err(|e| AcademyError::Validation(format!("Invalid webhook payload: {e}")))?;

    let outcome = use_case
        .confirm(
            &req.transaction_id,
            req.status.unwrap_or(PurchaseStatus::Completed),
        )
        .await?;

    let message = if outcome.duplicate {
        "Course already purchased"
    } else if outcome.replayed {
        "Payment already verified"
    } else {
        "Payment verified"
    };
    Ok(Json(WebhookResponse {
        success: true,
        message: message.to_string(),
        status: outcome.purchase.status,
    }))
}

/// GET /purchase/status/{reference}
pub async fn purchase_status<R: AcademyStore>(
    State(state): State<AcademyAppState<R>>,
    _current: CurrentUser,
    Path(reference): Path<String>,
) -> AcademyResult<Json<PurchaseStatusResponse>> {
    let purchase = purchases(&state).status(&reference).await?;
    Ok(Json(purchase.into()))
}

/// GET /purchase/course/{course_id}/detail-with-status
pub async fn course_detail_with_status<R: AcademyStore>(
    State(state): State<AcademyAppState<R>>,
    current: CurrentUser,
    Path(course_id): Path<CourseId>,
) -> AcademyResult<Json<CourseDetailResponse>> {
    let (detail, purchased) = purchases(&state)
        .detail_with_status(&current.user_id, &course_id)
        .await?;
    Ok(Json(CourseDetailResponse::new(detail, Some(purchased))))
}

/// GET /purchase
pub async fn purchased_courses<R: AcademyStore>(
    State(state): State<AcademyAppState<R>>,
    current: CurrentUser,
) -> AcademyResult<Json<PurchasedCoursesEnvelope>> {
    let purchased = purchases(&state).list_purchased(&current.user_id).await?;
    Ok(Json(PurchasedCoursesEnvelope::new(purchased)))
}

// ============================================================================
// Progress
// ============================================================================

/// GET /progress/{course_id}
pub async fn get_progress<R: AcademyStore>(
    State(state): State<AcademyAppState<R>>,
    current: CurrentUser,
    Path(course_id): Path<CourseId>,
) -> AcademyResult<Json<ProgressEnvelope>> {
    let view = ProgressUseCase::new(state.store.clone())
        .fetch(&current.user_id, &course_id)
        .await?;
    Ok(Json(view.into()))
}

/// POST /progress/{course_id}/lecture/{lecture_id}/view
pub async fn view_lecture<R: AcademyStore>(
    State(state): State<AcademyAppState<R>>,
    current: CurrentUser,
    Path((course_id, lecture_id)): Path<(CourseId, LectureId)>,
) -> AcademyResult<Json<MessageResponse>> {
    ProgressUseCase::new(state.store.clone())
        .view_lecture(&current.user_id, &course_id, &lecture_id)
        .await?;
    Ok(Json(MessageResponse::ok("Lecture progress has been updated.")))
}

/// POST /progress/{course_id}/complete
pub async fn mark_complete<R: AcademyStore>(
    State(state): State<AcademyAppState<R>>,
    current: CurrentUser,
    Path(course_id): Path<CourseId>,
) -> AcademyResult<Json<MessageResponse>> {
    ProgressUseCase::new(state.store.clone())
        .set_completion(&current.user_id, &course_id, true)
        .await?;
    Ok(Json(MessageResponse::ok("Course marked as completed.")))
}

/// POST /progress/{course_id}/incomplete
pub async fn mark_incomplete<R: AcademyStore>(
    State(state): State<AcademyAppState<R>>,
    current: CurrentUser,
    Path(course_id): Path<CourseId>,
) -> AcademyResult<Json<MessageResponse>> {
    ProgressUseCase::new(state.store.clone())
        .set_completion(&current.user_id, &course_id, false)
        .await?;
    Ok(Json(MessageResponse::ok("Course marked as incomplete.")))
}

/// GET /progress/{course_id}/certificate
pub async fn download_certificate<R: AcademyStore>(
    State(state): State<AcademyAppState<R>>,
    current: CurrentUser,
    Path(course_id): Path<CourseId>,
) -> AcademyResult<Response> {
    let issued = CertificateUseCase::new(
        state.store.clone(),
        state.renderer.clone(),
        state.config.clone(),
    )
    .issue(&current.user_id, &course_id)
    .await?;

    let disposition = HeaderValue::from_str(&format!(
        "attachment; filename=\"{}\"",
        issued.file_name
    ))
    .map_err(|e| AcademyError::Internal(format!("Invalid certificate file name: {e}")))?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(issued.content_type)),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        issued.bytes,
    )
        .into_response())
}

// ============================================================================
// Account
// ============================================================================

/// DELETE /user/profile/delete
pub async fn delete_account<R: AcademyStore>(
    State(state): State<AccountAppState<R>>,
    current: CurrentUser,
) -> AcademyResult<Response> {
    AccountCleanupUseCase::new(state.store.clone())
        .delete_account(&current.user_id)
        .await?;

    let clear = state
        .cookie
        .delete_cookie_header()
        .ok_or_else(|| AcademyError::Internal("Session cookie is not a valid header".into()))?;

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, clear)],
        Json(MessageResponse::ok("Profile deleted successfully")),
    )
        .into_response())
}
