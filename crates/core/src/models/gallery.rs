//! Gallery posts showcasing finished installations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::GalleryPostId;
use crate::validation::{ValidationError, bounded, required};

const URL_MAX: usize = 2_048;
const CAPTION_MAX: usize = 200;
const DESCRIPTION_MAX: usize = 5_000;
const TAG_MAX: usize = 50;

/// A stored gallery post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryPost {
    pub id: GalleryPostId,
    pub image_url: String,
    pub caption: String,
    pub description: String,
    pub tags: Vec<String>,
    pub likes: i32,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl GalleryPost {
    /// Case-insensitive match against caption, description and tags.
    #[must_use]
    pub fn matches_search(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        query.is_empty()
            || self.caption.to_lowercase().contains(&query)
            || self.description.to_lowercase().contains(&query)
            || self.tags.iter().any(|t| t.to_lowercase().contains(&query))
    }

    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Tags joined for a comma-separated form field.
    #[must_use]
    pub fn tags_csv(&self) -> String {
        self.tags.join(", ")
    }
}

/// Create and full-replace payload. `likes` is not accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GalleryPostInput {
    pub image_url: String,
    pub caption: String,
    pub description: String,
    pub tags: Vec<String>,
    pub featured: bool,
}

impl GalleryPostInput {
    /// # Errors
    ///
    /// Returns the first failing field as a [`ValidationError`].
    pub fn validate(&self) -> Result<NewGalleryPost, ValidationError> {
        let tags = self
            .tags
            .iter()
            .filter(|tag| !tag.trim().is_empty())
            .map(|tag| bounded("tags", tag, TAG_MAX))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(NewGalleryPost {
            image_url: required("imageUrl", &self.image_url, URL_MAX)?,
            caption: required("caption", &self.caption, CAPTION_MAX)?,
            description: bounded("description", &self.description, DESCRIPTION_MAX)?,
            tags,
            featured: self.featured,
        })
    }
}

impl From<&GalleryPost> for GalleryPostInput {
    fn from(post: &GalleryPost) -> Self {
        Self {
            image_url: post.image_url.clone(),
            caption: post.caption.clone(),
            description: post.description.clone(),
            tags: post.tags.clone(),
            featured: post.featured,
        }
    }
}

/// A validated gallery post ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGalleryPost {
    pub image_url: String,
    pub caption: String,
    pub description: String,
    pub tags: Vec<String>,
    pub featured: bool,
}

/// Split a comma-separated tag field, trimming and dropping blanks.
#[must_use]
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn post(tags: &[&str]) -> GalleryPost {
        let now = Utc::now();
        GalleryPost {
            id: GalleryPostId::generate(),
            image_url: "https://img.example/kitchen.jpg".into(),
            caption: "Kitchen Island".into(),
            description: "Absolute black with waterfall edge".into(),
            tags: tags.iter().map(|t| (*t).to_owned()).collect(),
            likes: 0,
            featured: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_parse_tags() {
        assert_eq!(parse_tags(" kitchen, ,outdoor ,"), vec!["kitchen", "outdoor"]);
        assert!(parse_tags("").is_empty());
    }

    #[test]
    fn test_validate_trims_and_drops_blank_tags() {
        let input = GalleryPostInput {
            image_url: "/img/a.jpg".into(),
            caption: "Patio".into(),
            tags: vec![" outdoor ".into(), "   ".into(), "paving".into()],
            ..GalleryPostInput::default()
        };
        let new = input.validate().unwrap();
        assert_eq!(new.tags, vec!["outdoor", "paving"]);
        assert_eq!(new.description, "");
    }

    #[test]
    fn test_validate_requires_image_and_caption() {
        let input = GalleryPostInput {
            caption: "Patio".into(),
            ..GalleryPostInput::default()
        };
        assert_eq!(
            input.validate(),
            Err(ValidationError::Required { field: "imageUrl" })
        );
    }

    #[test]
    fn test_likes_is_ignored_on_input() {
        let input: GalleryPostInput =
            serde_json::from_str(r#"{"imageUrl":"a","caption":"b","likes":99}"#).unwrap();
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_matches_search_covers_tags() {
        let p = post(&["Outdoor", "bbq"]);
        assert!(p.matches_search("outdoor"));
        assert!(p.matches_search("waterfall"));
        assert!(p.matches_search("island"));
        assert!(!p.matches_search("bathroom"));
    }

    #[test]
    fn test_has_tag_is_exact() {
        let p = post(&["kitchen"]);
        assert!(p.has_tag("kitchen"));
        assert!(!p.has_tag("Kitchen"));
        assert_eq!(post(&["a", "b"]).tags_csv(), "a, b");
    }
}
