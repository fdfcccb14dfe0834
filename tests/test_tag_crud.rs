mod common;

use common::*;

#[tokio::test]
async fn test_add_and_list_tags() -> anyhow::Result<()> {
    let (workspace, project_id, _dir) = create_test_workspace_with_project().await;

    let bug = workspace
        .add_tag(project_id, make_new_tag("Bug", "#ff0000"))
        .await?;
    let feature = workspace
        .add_tag(project_id, make_new_tag("Feature", "#00ff00"))
        .await?;

    assert_eq!(bug.project_id, project_id);
    assert_eq!(bug.title, "Bug");
    assert_eq!(bug.color, "#ff0000");
    assert!(feature.id > bug.id);

    let tags = workspace.get_tags(project_id).await?;
    let titles: Vec<&str> = tags.iter().map(|tag| tag.title.as_str()).collect();
    assert_eq!(titles, ["Bug", "Feature"]);

    let fetched = workspace.get_tag_by_id(project_id, bug.id).await?;
    assert_eq!(fetched, Some(bug));

    Ok(())
}

#[tokio::test]
async fn test_tags_are_scoped_to_their_project() -> anyhow::Result<()> {
    let (workspace, first, _dir) = create_test_workspace_with_project().await;
    let second = workspace
        .add_project(&NewProject {
            name: "Second".to_string(),
        })
        .await?
        .id;

    let tag = workspace.add_tag(first, make_new_tag("Bug", "#ff0000")).await?;
    workspace
        .add_tag(second, make_new_tag("Docs", "#0000ff"))
        .await?;

    assert_eq!(workspace.get_tags(first).await?.len(), 1);
    assert_eq!(workspace.get_tags(second).await?.len(), 1);
    assert_eq!(workspace.get_tag_by_id(second, tag.id).await?, None);

    Ok(())
}

#[tokio::test]
async fn test_update_tag() -> anyhow::Result<()> {
    let (workspace, project_id, _dir) = create_test_workspace_with_project().await;
    let tag = workspace
        .add_tag(project_id, make_new_tag("Bug", "#ff0000"))
        .await?;

    let renamed = workspace
        .update_tag(
            project_id,
            tag.id,
            TagUpdate {
                title: Some("Defect".to_string()),
                color: None,
            },
        )
        .await?;
    assert_eq!(renamed.title, "Defect");
    assert_eq!(renamed.color, "#ff0000");

    let recolored = workspace
        .update_tag(
            project_id,
            tag.id,
            TagUpdate {
                title: None,
                color: Some("#00FF00".to_string()),
            },
        )
        .await?;
    assert_eq!(recolored.title, "Defect");
    assert_eq!(recolored.color, "#00ff00");
    assert_eq!(recolored.created_at, tag.created_at);

    Ok(())
}

#[tokio::test]
async fn test_delete_tag() -> anyhow::Result<()> {
    let (workspace, project_id, _dir) = create_test_workspace_with_project().await;
    let bug = workspace
        .add_tag(project_id, make_new_tag("Bug", "#ff0000"))
        .await?;
    let feature = workspace
        .add_tag(project_id, make_new_tag("Feature", "#00ff00"))
        .await?;

    workspace.delete_tag(project_id, bug.id).await?;

    let tags = workspace.get_tags(project_id).await?;
    assert_eq!(tags, vec![feature]);

    let err = workspace.delete_tag(project_id, bug.id).await.unwrap_err();
    assert_eq!(
        err.downcast_ref::<ValidationError>(),
        Some(&ValidationError::TagNotFound {
            project_id,
            tag_id: bug.id
        })
    );

    Ok(())
}

#[tokio::test]
async fn test_delete_all_tags() -> anyhow::Result<()> {
    let (workspace, project_id, _dir) = create_test_workspace_with_project().await;
    for title in ["Bug", "Feature", "Docs"] {
        workspace
            .add_tag(project_id, make_new_tag(title, "#123456"))
            .await?;
    }

    assert_eq!(workspace.delete_all_tags(project_id).await?, 3);
    assert!(workspace.get_tags(project_id).await?.is_empty());
    assert_eq!(workspace.delete_all_tags(project_id).await?, 0);

    Ok(())
}

#[tokio::test]
async fn test_delete_project_removes_its_tags() -> anyhow::Result<()> {
    let (workspace, project_id, _dir) = create_test_workspace_with_project().await;
    workspace
        .add_tag(project_id, make_new_tag("Bug", "#ff0000"))
        .await?;

    let project = workspace
        .get_project_by_id(project_id)
        .await?
        .expect("project exists");
    workspace.delete_project(project).await?;

    assert!(workspace.get_project_by_id(project_id).await?.is_none());
    assert!(workspace.get_tags(project_id).await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_tags_survive_save_and_reopen() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let path = dir.path().join("persist.tagkeeper");

    let project_id = {
        let workspace = WorkspaceDb::new(&path).await?;
        let project_id = workspace
            .add_project(&NewProject {
                name: "Persisted".to_string(),
            })
            .await?
            .id;
        workspace
            .add_tag(project_id, make_new_tag("Bug", "#ff0000"))
            .await?;
        workspace.save_workspace().await?;
        project_id
    };

    let reopened = WorkspaceDb::new(&path).await?;
    let tags = reopened.get_tags(project_id).await?;
    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0].title, "Bug");
    assert_eq!(tags[0].color, "#ff0000");

    Ok(())
}
