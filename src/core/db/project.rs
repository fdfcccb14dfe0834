use std::future::Future;

use time::OffsetDateTime;

#[derive(Debug, Clone)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewProject {
    pub name: String,
}

pub trait ProjectRepository {
    fn get_projects(&self) -> impl Future<Output = anyhow::Result<Vec<Project>>>;
    fn get_project_by_id(&self, id: i64) -> impl Future<Output = anyhow::Result<Option<Project>>>;
    fn add_project(&self, project: &NewProject) -> impl Future<Output = anyhow::Result<Project>>;
    /// Removes the project together with all of its tags.
    fn delete_project(&self, project: Project) -> impl Future<Output = anyhow::Result<()>>;
}
