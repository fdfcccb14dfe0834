use tagkeeper::core::db::{ProjectRepository, WorkspaceDb};

#[tokio::test]
async fn test_simple() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let path = dir.path().join("test.tagkeeper");
    let workspace: WorkspaceDb = WorkspaceDb::new(&path).await?;

    let projects = workspace.get_projects().await?;
    assert_eq!(projects.len(), 0);

    Ok(())
}
