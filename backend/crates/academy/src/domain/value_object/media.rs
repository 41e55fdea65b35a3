//! References into the external media store.
//!
//! The store itself is out of scope; the backend only remembers URLs and
//! the identifiers needed to delete them later.

use serde::Serialize;

/// Identifier of an uploaded asset, derived from its URL: the last path
/// segment without extension.
pub fn media_id_from_url(url: &str) -> Option<String> {
    let path = url.split(['?', '#']).next()?;
    let file = path.rsplit('/').next()?;
    let id = file.split('.').next()?;
    (!id.is_empty()).then(|| id.to_string())
}

/// Media that no longer has an owner and should be deleted from the store
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReleasedMedia {
    pub images: Vec<String>,
    pub videos: Vec<String>,
}

impl ReleasedMedia {
    pub fn push_image_url(&mut self, url: Option<&str>) {
        if let Some(id) = url.and_then(media_id_from_url) {
            self.images.push(id);
        }
    }

    pub fn push_video_id(&mut self, id: Option<&str>) {
        if let Some(id) = id.filter(|id| !id.is_empty()) {
            self.videos.push(id.to_string());
        }
    }

    pub fn extend(&mut self, other: ReleasedMedia) {
        self.images.extend(other.images);
        self.videos.extend(other.videos);
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty() && self.videos.is_empty()
    }

    pub fn len(&self) -> usize {
        self.images.len() + self.videos.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_id_from_url() {
        assert_eq!(
            media_id_from_url("https://res.example.com/image/upload/v1/abc123.png").as_deref(),
            Some("abc123")
        );
        assert_eq!(
            media_id_from_url("https://cdn.example.com/thumb.jpg?w=200").as_deref(),
            Some("thumb")
        );
        assert_eq!(media_id_from_url("https://cdn.example.com/"), None);
        assert_eq!(media_id_from_url(""), None);
    }

    #[test]
    fn test_released_media_collects() {
        let mut media = ReleasedMedia::default();
        media.push_image_url(Some("https://x.io/a/photo.png"));
        media.push_image_url(None);
        media.push_video_id(Some("vid-1"));
        media.push_video_id(Some(""));
        assert_eq!(media.images, vec!["photo"]);
        assert_eq!(media.videos, vec!["vid-1"]);
        assert_eq!(media.len(), 2);
    }
}
