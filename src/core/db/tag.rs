use std::future::Future;

use time::OffsetDateTime;

use crate::{core::db::model::Color, error::ValidationError};

/// A colored label scoped to one project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub id: i64,
    pub project_id: i64,
    pub title: String,
    /// Display-only; `#rrggbb` for tags written through the workspace store.
    pub color: String,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTag {
    pub title: String,
    pub color: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagUpdate {
    pub title: Option<String>,
    pub color: Option<String>,
}

/// Tag persistence. Every future is `'static` so it can be handed to a spawned task.
pub trait TagRepository {
    fn get_tags(
        &self,
        project_id: i64,
    ) -> impl Future<Output = anyhow::Result<Vec<Tag>>> + Send + 'static;
    fn get_tag_by_id(
        &self,
        project_id: i64,
        tag_id: i64,
    ) -> impl Future<Output = anyhow::Result<Option<Tag>>> + Send + 'static;
    fn add_tag(
        &self,
        project_id: i64,
        tag: NewTag,
    ) -> impl Future<Output = anyhow::Result<Tag>> + Send + 'static;
    fn update_tag(
        &self,
        project_id: i64,
        tag_id: i64,
        update: TagUpdate,
    ) -> impl Future<Output = anyhow::Result<Tag>> + Send + 'static;
    fn delete_tag(
        &self,
        project_id: i64,
        tag_id: i64,
    ) -> impl Future<Output = anyhow::Result<()>> + Send + 'static;
    /// Deletes every tag of the project, returning how many were removed.
    fn delete_all_tags(
        &self,
        project_id: i64,
    ) -> impl Future<Output = anyhow::Result<u64>> + Send + 'static;
}

pub const MAX_TITLE_LEN: usize = 128;

pub(super) fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(ValidationError::TitleTooLong { max: MAX_TITLE_LEN });
    }
    if title.trim() != title {
        return Err(ValidationError::TitleWhitespace);
    }
    Ok(())
}

/// Parses the color and returns its canonical lowercase form.
pub(super) fn normalize_color(color: &str) -> Result<String, ValidationError> {
    Ok(color.parse::<Color>()?.to_string())
}
