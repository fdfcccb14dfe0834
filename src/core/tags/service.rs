use std::future::Future;

use crate::core::db::{NewTag, Tag, TagRepository, TagUpdate, WorkspaceDb};

/// The data-access operations the tag manager is driven against.
///
/// Futures are `'static` so the session can spawn them; implementations clone
/// whatever shared handle they need up front.
pub trait TagService {
    fn list_tags(
        &self,
        project_id: i64,
    ) -> impl Future<Output = anyhow::Result<Vec<Tag>>> + Send + 'static;
    fn create_tag(
        &self,
        project_id: i64,
        tag: NewTag,
    ) -> impl Future<Output = anyhow::Result<Tag>> + Send + 'static;
    fn edit_tag(
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
}

impl TagService for WorkspaceDb {
    fn list_tags(
        &self,
        project_id: i64,
    ) -> impl Future<Output = anyhow::Result<Vec<Tag>>> + Send + 'static {
        self.get_tags(project_id)
    }

    fn create_tag(
        &self,
        project_id: i64,
        tag: NewTag,
    ) -> impl Future<Output = anyhow::Result<Tag>> + Send + 'static {
        self.add_tag(project_id, tag)
    }

    fn edit_tag(
        &self,
        project_id: i64,
        tag_id: i64,
        update: TagUpdate,
    ) -> impl Future<Output = anyhow::Result<Tag>> + Send + 'static {
        self.update_tag(project_id, tag_id, update)
    }

    fn delete_tag(
        &self,
        project_id: i64,
        tag_id: i64,
    ) -> impl Future<Output = anyhow::Result<()>> + Send + 'static {
        TagRepository::delete_tag(self, project_id, tag_id)
    }
}

/// Toast sink. Fire-and-forget.
pub trait Notifier {
    fn notify(&self, message: &str);
    /// Error channel of the create/edit/delete operations.
    fn notify_error(&self, message: &str);
}
