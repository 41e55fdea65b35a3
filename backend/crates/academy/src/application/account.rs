//! Account Cleanup
//!
//! Deleting an account removes everything the user owns or touched. For an
//! instructor that includes every course they created, with the lectures,
//! purchases, progress and enrollments hanging off those courses.

use std::sync::Arc;

use kernel::id::UserId;

use crate::domain::repository::AcademyStore;
use crate::domain::value_object::media::ReleasedMedia;
use crate::error::AcademyResult;

pub struct AccountCleanupUseCase<R>
where
    R: AcademyStore,
{
    store: Arc<R>,
}

impl<R> AccountCleanupUseCase<R>
where
    R: AcademyStore,
{
    pub fn new(store: Arc<R>) -> Self {
        Self { store }
    }

    /// Idempotent: an already-deleted user releases nothing
    pub async fn delete_account(&self, user_id: &UserId) -> AcademyResult<ReleasedMedia> {
        let released = self.store.purge_account(user_id).await?;

        tracing::info!(
            user_id = %user_id,
            released_images = released.images.len(),
            released_videos = released.videos.len(),
            "Account deleted"
        );
        if !released.is_empty() {
            tracing::debug!(images = ?released.images, videos = ?released.videos, "Media to release");
        }
        Ok(released)
    }
}
