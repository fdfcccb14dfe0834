mod model;
mod project;
mod state;
mod tag;

use std::{future::Future, path::Path, sync::Arc};

use state::WorkspaceState;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::error::ValidationError;

pub use model::Color;
pub use project::{NewProject, Project, ProjectRepository};
pub use tag::{MAX_TITLE_LEN, NewTag, Tag, TagRepository, TagUpdate};

/// Handle to an opened workspace archive. Cheap to clone; all clones share one pool.
#[derive(Debug, Clone)]
pub struct WorkspaceDb {
    state: Arc<WorkspaceState>,
}

impl WorkspaceDb {
    pub async fn new<P: AsRef<Path>>(workspace_file: P) -> anyhow::Result<Self> {
        Ok(Self {
            state: Arc::new(WorkspaceState::new(workspace_file).await?),
        })
    }

    /// Explicitly save the workspace to disk.
    /// This is required when dropping in an async context (e.g., tests with #[tokio::test]).
    pub async fn save_workspace(&self) -> anyhow::Result<()> {
        self.state.save_workspace().await
    }
}

#[derive(sqlx::FromRow)]
struct ProjectRecord {
    id: i64,
    name: String,
    created_at: String,
}

impl TryFrom<ProjectRecord> for Project {
    type Error = anyhow::Error;

    fn try_from(record: ProjectRecord) -> Result<Self, Self::Error> {
        Ok(Project {
            id: record.id,
            name: record.name,
            created_at: OffsetDateTime::parse(&record.created_at, &Rfc3339)?,
        })
    }
}

#[derive(sqlx::FromRow)]
struct TagRecord {
    id: i64,
    project_id: i64,
    title: String,
    color: String,
    created_at: String,
}

impl TryFrom<TagRecord> for Tag {
    type Error = anyhow::Error;

    fn try_from(record: TagRecord) -> Result<Self, Self::Error> {
        Ok(Tag {
            id: record.id,
            project_id: record.project_id,
            title: record.title,
            color: record.color,
            created_at: OffsetDateTime::parse(&record.created_at, &Rfc3339)?,
        })
    }
}

fn now_rfc3339() -> anyhow::Result<String> {
    Ok(OffsetDateTime::now_utc().format(&Rfc3339)?)
}

impl ProjectRepository for WorkspaceDb {
    async fn get_projects(&self) -> anyhow::Result<Vec<Project>> {
        let mut conn = self.state.conn().await?;
        sqlx::query_as::<_, ProjectRecord>(
            r#"SELECT id, name, created_at FROM project ORDER BY id ASC"#,
        )
        .fetch_all(&mut **conn)
        .await?
        .into_iter()
        .map(Project::try_from)
        .collect()
    }

    async fn get_project_by_id(&self, id: i64) -> anyhow::Result<Option<Project>> {
        let mut conn = self.state.conn().await?;
        sqlx::query_as::<_, ProjectRecord>(
            r#"SELECT id, name, created_at FROM project WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&mut **conn)
        .await?
        .map(Project::try_from)
        .transpose()
    }

    async fn add_project(&self, project: &NewProject) -> anyhow::Result<Project> {
        if project.name.trim().is_empty() {
            return Err(ValidationError::EmptyProjectName.into());
        }
        let mut conn = self.state.conn().await?;
        let created_at = now_rfc3339()?;
        let record = sqlx::query_as::<_, ProjectRecord>(
            r#"INSERT INTO project (name, created_at) VALUES ($1, $2)
            RETURNING id, name, created_at"#,
        )
        .bind(&project.name)
        .bind(created_at)
        .fetch_one(&mut **conn)
        .await?;
        tracing::info!(project_id = record.id, name = %record.name, "project created");
        Project::try_from(record)
    }

    async fn delete_project(&self, project: Project) -> anyhow::Result<()> {
        let mut conn = self.state.conn().await?;
        let result = sqlx::query(r#"DELETE FROM project WHERE id = $1"#)
            .bind(project.id)
            .execute(&mut **conn)
            .await?;
        if result.rows_affected() == 0 {
            return Err(ValidationError::ProjectNotFound {
                project_id: project.id,
            }
            .into());
        }
        tracing::info!(project_id = project.id, "project deleted");
        Ok(())
    }
}

impl TagRepository for WorkspaceDb {
    fn get_tags(
        &self,
        project_id: i64,
    ) -> impl Future<Output = anyhow::Result<Vec<Tag>>> + Send + 'static {
        let state = self.state.clone();
        async move {
            let mut conn = state.conn().await?;
            sqlx::query_as::<_, TagRecord>(
                r#"SELECT id, project_id, title, color, created_at
                FROM tag
                WHERE project_id = $1
                ORDER BY id ASC"#,
            )
            .bind(project_id)
            .fetch_all(&mut **conn)
            .await?
            .into_iter()
            .map(Tag::try_from)
            .collect()
        }
    }

    fn get_tag_by_id(
        &self,
        project_id: i64,
        tag_id: i64,
    ) -> impl Future<Output = anyhow::Result<Option<Tag>>> + Send + 'static {
        let state = self.state.clone();
        async move {
            let mut conn = state.conn().await?;
            sqlx::query_as::<_, TagRecord>(
                r#"SELECT id, project_id, title, color, created_at
                FROM tag
                WHERE project_id = $1 AND id = $2"#,
            )
            .bind(project_id)
            .bind(tag_id)
            .fetch_optional(&mut **conn)
            .await?
            .map(Tag::try_from)
            .transpose()
        }
    }

    fn add_tag(
        &self,
        project_id: i64,
        new_tag: NewTag,
    ) -> impl Future<Output = anyhow::Result<Tag>> + Send + 'static {
        let state = self.state.clone();
        async move {
            tag::validate_title(&new_tag.title)?;
            let color = tag::normalize_color(&new_tag.color)?;

            let mut conn = state.conn().await?;
            let project_exists =
                sqlx::query_scalar::<_, i64>(r#"SELECT id FROM project WHERE id = $1"#)
                    .bind(project_id)
                    .fetch_optional(&mut **conn)
                    .await?
                    .is_some();
            if !project_exists {
                return Err(ValidationError::ProjectNotFound { project_id }.into());
            }

            let record = sqlx::query_as::<_, TagRecord>(
                r#"INSERT INTO tag (project_id, title, color, created_at) VALUES ($1, $2, $3, $4)
                RETURNING id, project_id, title, color, created_at"#,
            )
            .bind(project_id)
            .bind(&new_tag.title)
            .bind(color)
            .bind(now_rfc3339()?)
            .fetch_one(&mut **conn)
            .await?;
            tracing::info!(project_id, tag_id = record.id, "tag created");
            Tag::try_from(record)
        }
    }

    fn update_tag(
        &self,
        project_id: i64,
        tag_id: i64,
        update: TagUpdate,
    ) -> impl Future<Output = anyhow::Result<Tag>> + Send + 'static {
        let state = self.state.clone();
        async move {
            if let Some(title) = &update.title {
                tag::validate_title(title)?;
            }
            let color = update
                .color
                .as_deref()
                .map(tag::normalize_color)
                .transpose()?;

            let mut conn = state.conn().await?;
            let record = sqlx::query_as::<_, TagRecord>(
                r#"UPDATE tag
                SET title = COALESCE($1, title), color = COALESCE($2, color)
                WHERE id = $3 AND project_id = $4
                RETURNING id, project_id, title, color, created_at"#,
            )
            .bind(update.title)
            .bind(color)
            .bind(tag_id)
            .bind(project_id)
            .fetch_optional(&mut **conn)
            .await?
            .ok_or(ValidationError::TagNotFound { project_id, tag_id })?;
            tracing::info!(project_id, tag_id, "tag edited");
            Tag::try_from(record)
        }
    }

    fn delete_tag(
        &self,
        project_id: i64,
        tag_id: i64,
    ) -> impl Future<Output = anyhow::Result<()>> + Send + 'static {
        let state = self.state.clone();
        async move {
            let mut conn = state.conn().await?;
            let result = sqlx::query(r#"DELETE FROM tag WHERE id = $1 AND project_id = $2"#)
                .bind(tag_id)
                .bind(project_id)
                .execute(&mut **conn)
                .await?;
            if result.rows_affected() == 0 {
                return Err(ValidationError::TagNotFound { project_id, tag_id }.into());
            }
            tracing::info!(project_id, tag_id, "tag deleted");
            Ok(())
        }
    }

    fn delete_all_tags(
        &self,
        project_id: i64,
    ) -> impl Future<Output = anyhow::Result<u64>> + Send + 'static {
        let state = self.state.clone();
        async move {
            let mut conn = state.conn().await?;
            let removed = sqlx::query(r#"DELETE FROM tag WHERE project_id = $1"#)
                .bind(project_id)
                .execute(&mut **conn)
                .await?
                .rows_affected();
            tracing::info!(project_id, removed, "tags purged");
            Ok(removed)
        }
    }
}
