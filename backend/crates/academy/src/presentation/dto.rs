//! API DTOs (Data Transfer Objects)
//!
//! Field names follow the web client (`courseTitle`, `subTitle`,
//! `publicId`, `transactionId`).

use chrono::{DateTime, Utc};
use kernel::id::{CourseId, LectureId, UserId};
use serde::{Deserialize, Serialize};

use crate::application::{
    CheckoutOrder, CourseCard, CourseDetail, ProgressView, PurchasedCourse,
};
use crate::domain::entity::{
    course::{Course, CoursePatch},
    lecture::{Lecture, LecturePatch},
    member::Member,
    progress::LectureProgress,
    purchase::{CoursePurchase, PurchaseStatus},
};
use crate::domain::value_object::{
    course_level::CourseLevel,
    search::{CourseSearch, PriceSort},
};

// ============================================================================
// Requests
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCourseRequest {
    pub course_title: String,
    pub category: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditCourseRequest {
    pub course_title: Option<String>,
    #[serde(rename = "subTitle")]
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub course_level: Option<CourseLevel>,
    pub course_price: Option<i64>,
    /// URL already uploaded to the media store by the client
    pub course_thumbnail: Option<String>,
}

impl From<EditCourseRequest> for CoursePatch {
    fn from(req: EditCourseRequest) -> Self {
        Self {
            title: req.course_title,
            subtitle: req.subtitle,
            description: req.description,
            category: req.category,
            level: req.course_level,
            price: req.course_price,
            thumbnail_url: req.course_thumbnail,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PublishQuery {
    pub publish: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub query: Option<String>,
    /// Comma separated
    pub categories: Option<String>,
    pub sort_by_price: Option<String>,
}

impl From<SearchQuery> for CourseSearch {
    fn from(q: SearchQuery) -> Self {
        // Unknown sort values fall back to newest first
        let sort = match q.sort_by_price.as_deref() {
            Some("low") => Some(PriceSort::Low),
            Some("high") => Some(PriceSort::High),
            _ => None,
        };
        CourseSearch::new(q.query.as_deref(), q.categories.as_deref(), sort)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLectureRequest {
    pub lecture_title: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoInfo {
    pub video_url: String,
    pub public_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditLectureRequest {
    pub lecture_title: Option<String>,
    pub video_info: Option<VideoInfo>,
    pub is_preview_free: Option<bool>,
}

impl From<EditLectureRequest> for LecturePatch {
    fn from(req: EditLectureRequest) -> Self {
        let (video_url, video_media_id) = match req.video_info {
            Some(info) => (Some(info.video_url), info.public_id),
            None => (None, None),
        };
        Self {
            title: req.lecture_title,
            video_url,
            video_media_id,
            is_preview_free: req.is_preview_free,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub course_id: CourseId,
}

/// Payment gateway callback body
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookRequest {
    pub transaction_id: String,
    /// Defaults to `completed`
    pub status: Option<PurchaseStatus>,
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatorResponse {
    pub id: UserId,
    pub name: Option<String>,
    pub photo_url: Option<String>,
}

impl CreatorResponse {
    fn new(creator_id: UserId, member: Option<Member>) -> Self {
        match member {
            Some(m) => Self {
                id: m.user_id,
                name: Some(m.name),
                photo_url: m.photo_url,
            },
            None => Self {
                id: creator_id,
                name: None,
                photo_url: None,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseResponse {
    pub id: CourseId,
    pub course_title: String,
    #[serde(rename = "subTitle")]
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub category: String,
    pub course_level: Option<CourseLevel>,
    pub course_price: i64,
    pub course_thumbnail: Option<String>,
    pub creator: CreatorResponse,
    pub lectures: Vec<LectureId>,
    pub enrolled_students: Vec<UserId>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CourseResponse {
    pub fn new(course: Course, creator: Option<Member>) -> Self {
        Self {
            creator: CreatorResponse::new(course.creator_id, creator),
            id: course.course_id,
            course_title: course.title,
            subtitle: course.subtitle,
            description: course.description,
            category: course.category,
            course_level: course.level,
            course_price: course.price,
            course_thumbnail: course.thumbnail_url,
            lectures: course.lecture_ids,
            enrolled_students: course.enrolled_student_ids,
            is_published: course.is_published,
            created_at: course.created_at,
            updated_at: course.updated_at,
        }
    }
}

impl From<Course> for CourseResponse {
    fn from(course: Course) -> Self {
        Self::new(course, None)
    }
}

impl From<CourseCard> for CourseResponse {
    fn from(card: CourseCard) -> Self {
        Self::new(card.course, card.creator)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LectureResponse {
    pub id: LectureId,
    pub course_id: CourseId,
    pub lecture_title: String,
    pub video_url: Option<String>,
    pub public_id: Option<String>,
    pub is_preview_free: bool,
    pub position: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Lecture> for LectureResponse {
    fn from(lecture: Lecture) -> Self {
        Self {
            id: lecture.lecture_id,
            course_id: lecture.course_id,
            lecture_title: lecture.title,
            video_url: lecture.video_url,
            public_id: lecture.video_media_id,
            is_preview_free: lecture.is_preview_free,
            position: lecture.position,
            created_at: lecture.created_at,
            updated_at: lecture.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseEnvelope {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub course: CourseResponse,
}

impl CourseEnvelope {
    pub fn new(course: impl Into<CourseResponse>, message: Option<&str>) -> Self {
        Self {
            success: true,
            message: message.map(str::to_string),
            course: course.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CoursesEnvelope {
    pub success: bool,
    pub courses: Vec<CourseResponse>,
}

impl CoursesEnvelope {
    pub fn new<T: Into<CourseResponse>>(courses: Vec<T>) -> Self {
        Self {
            success: true,
            courses: courses.into_iter().map(Into::into).collect(),
        }
    }
}

/// Course with its lectures expanded
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseDetailResponse {
    pub success: bool,
    pub course: CourseResponse,
    pub lecture_details: Vec<LectureResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchased: Option<bool>,
}

impl CourseDetailResponse {
    pub fn new(detail: CourseDetail, purchased: Option<bool>) -> Self {
        Self {
            success: true,
            course: CourseResponse::new(detail.course, detail.creator),
            lecture_details: detail.lectures.into_iter().map(Into::into).collect(),
            purchased,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LectureEnvelope {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub lecture: LectureResponse,
}

impl LectureEnvelope {
    pub fn new(lecture: Lecture, message: Option<&str>) -> Self {
        Self {
            success: true,
            message: message.map(str::to_string),
            lecture: lecture.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LecturesEnvelope {
    pub success: bool,
    pub lectures: Vec<LectureResponse>,
}

impl LecturesEnvelope {
    pub fn new(lectures: Vec<Lecture>) -> Self {
        Self {
            success: true,
            lectures: lectures.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub transaction_id: String,
    pub amount: i64,
    pub currency: String,
    pub course_title: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckoutResponse {
    pub success: bool,
    pub message: String,
    pub order: OrderResponse,
}

impl From<CheckoutOrder> for CheckoutResponse {
    fn from(order: CheckoutOrder) -> Self {
        Self {
            success: true,
            message: "Checkout session created".to_string(),
            order: OrderResponse {
                transaction_id: order.reference.as_str().to_string(),
                amount: order.amount,
                currency: order.currency,
                course_title: order.course_title,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WebhookResponse {
    pub success: bool,
    pub message: String,
    pub status: PurchaseStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct PurchaseStatusResponse {
    pub success: bool,
    pub amount: i64,
    pub currency: String,
    pub status: PurchaseStatus,
}

impl From<CoursePurchase> for PurchaseStatusResponse {
    fn from(purchase: CoursePurchase) -> Self {
        Self {
            success: true,
            amount: purchase.amount,
            currency: purchase.currency,
            status: purchase.status,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchasedCourseResponse {
    pub transaction_id: String,
    pub amount: i64,
    pub currency: String,
    pub purchased_at: DateTime<Utc>,
    pub course: CourseResponse,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchasedCoursesEnvelope {
    pub success: bool,
    pub purchased_courses: Vec<PurchasedCourseResponse>,
}

impl PurchasedCoursesEnvelope {
    pub fn new(purchased: Vec<PurchasedCourse>) -> Self {
        Self {
            success: true,
            purchased_courses: purchased
                .into_iter()
                .map(|p| PurchasedCourseResponse {
                    transaction_id: p.purchase.reference.as_str().to_string(),
                    amount: p.purchase.amount,
                    currency: p.purchase.currency,
                    purchased_at: p.purchase.updated_at,
                    course: p.course.into(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressData {
    pub course_details: CourseResponse,
    pub lecture_details: Vec<LectureResponse>,
    pub progress: Vec<LectureProgress>,
    pub completed: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProgressEnvelope {
    pub data: ProgressData,
}

impl From<ProgressView> for ProgressEnvelope {
    fn from(view: ProgressView) -> Self {
        Self {
            data: ProgressData {
                course_details: CourseResponse::new(view.course.course, view.course.creator),
                lecture_details: view.course.lectures.into_iter().map(Into::into).collect(),
                progress: view.lectures,
                completed: view.completed,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_query_sort_fallback() {
        let search: CourseSearch = SearchQuery {
            query: Some("rust".into()),
            categories: Some("Web,Systems".into()),
            sort_by_price: Some("cheapest".into()),
        }
        .into();
        assert_eq!(search.sort_by_price, None);
        assert_eq!(search.categories, vec!["web", "systems"]);

        let search: CourseSearch = SearchQuery {
            sort_by_price: Some("high".into()),
            ..Default::default()
        }
        .into();
        assert_eq!(search.sort_by_price, Some(PriceSort::High));
    }

    #[test]
    fn test_edit_lecture_request_shape() {
        let req: EditLectureRequest = serde_json::from_str(
            r#"{"lectureTitle":"Ownership","videoInfo":{"videoUrl":"https://v.io/a.mp4","publicId":"a"},"isPreviewFree":true}"#,
        )
        .unwrap();
        let patch = LecturePatch::from(req);
        assert_eq!(patch.title.as_deref(), Some("Ownership"));
        assert_eq!(patch.video_media_id.as_deref(), Some("a"));
        assert_eq!(patch.is_preview_free, Some(true));
    }

    #[test]
    fn test_course_response_field_names() {
        let course = Course::new(UserId::new(), "Rust", "Programming").unwrap();
        let json = serde_json::to_value(CourseResponse::from(course)).unwrap();
        assert_eq!(json["courseTitle"], "Rust");
        assert!(json.get("subTitle").is_some());
        assert_eq!(json["coursePrice"], 0);
        assert_eq!(json["isPublished"], false);
        assert!(json["creator"]["name"].is_null());
    }
}
