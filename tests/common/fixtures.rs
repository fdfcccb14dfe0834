use std::{
    collections::VecDeque,
    future::{Future, ready},
    sync::{Arc, Mutex},
    time::Duration,
};

use tagkeeper::core::db::{NewProject, NewTag, ProjectRepository, Tag, TagUpdate, WorkspaceDb};
use tagkeeper::core::tags::{Notifier, TagService};
use time::OffsetDateTime;

pub const PROJECT: i64 = 1;

/// Creates a WorkspaceDb backed by a temporary tar.zst file.
/// Returns both the workspace and the temp directory (which must be kept alive).
pub async fn create_test_workspace() -> (WorkspaceDb, tempfile::TempDir) {
    let dir = tempfile::TempDir::new().expect("Failed to create temp directory");
    let path = dir.path().join("test.tagkeeper");
    let workspace = WorkspaceDb::new(&path)
        .await
        .expect("Failed to create test workspace");
    (workspace, dir)
}

/// Creates a workspace holding one project and returns the project's id.
pub async fn create_test_workspace_with_project() -> (WorkspaceDb, i64, tempfile::TempDir) {
    let (workspace, dir) = create_test_workspace().await;
    let project = workspace
        .add_project(&NewProject {
            name: "Test Project".to_string(),
        })
        .await
        .expect("Failed to create test project");
    (workspace, project.id, dir)
}

pub fn make_new_tag(title: &str, color: &str) -> NewTag {
    NewTag {
        title: title.to_string(),
        color: color.to_string(),
    }
}

pub fn make_tag(id: i64, title: &str, color: &str) -> Tag {
    Tag {
        id,
        project_id: PROJECT,
        title: title.to_string(),
        color: color.to_string(),
        created_at: OffsetDateTime::UNIX_EPOCH,
    }
}

/// `[{1, "Bug", #ff0000}, {2, "Feature", #00ff00}]`
pub fn bug_and_feature() -> Vec<Tag> {
    vec![make_tag(1, "Bug", "#ff0000"), make_tag(2, "Feature", "#00ff00")]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List(i64),
    Create(i64, NewTag),
    Edit(i64, i64, TagUpdate),
    Delete(i64, i64),
}

#[derive(Debug, Default)]
struct FakeState {
    tags: Vec<Tag>,
    calls: Vec<Call>,
    fail_list: bool,
    fail_mutations: bool,
    /// Consumed one per list call; the list is read before the delay.
    list_delays: VecDeque<Duration>,
    /// Applied before the tag is actually removed.
    delete_delay: Option<Duration>,
}

/// In-memory TagService that records every call.
#[derive(Debug, Clone, Default)]
pub struct FakeTagService {
    inner: Arc<Mutex<FakeState>>,
}

impl FakeTagService {
    pub fn with_tags(tags: Vec<Tag>) -> Self {
        let service = Self::default();
        service.inner.lock().unwrap().tags = tags;
        service
    }

    pub fn calls(&self) -> Vec<Call> {
        self.inner.lock().unwrap().calls.clone()
    }

    pub fn delete_calls(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|call| matches!(call, Call::Delete(..)))
            .collect()
    }

    pub fn edit_calls(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|call| matches!(call, Call::Edit(..)))
            .collect()
    }

    pub fn tags(&self) -> Vec<Tag> {
        self.inner.lock().unwrap().tags.clone()
    }

    pub fn fail_list(&self, fail: bool) {
        self.inner.lock().unwrap().fail_list = fail;
    }

    pub fn fail_mutations(&self, fail: bool) {
        self.inner.lock().unwrap().fail_mutations = fail;
    }

    pub fn delay_next_lists(&self, delays: impl IntoIterator<Item = Duration>) {
        self.inner.lock().unwrap().list_delays.extend(delays);
    }

    pub fn delay_deletes(&self, delay: Duration) {
        self.inner.lock().unwrap().delete_delay = Some(delay);
    }
}

impl TagService for FakeTagService {
    fn list_tags(
        &self,
        project_id: i64,
    ) -> impl Future<Output = anyhow::Result<Vec<Tag>>> + Send + 'static {
        let mut state = self.inner.lock().unwrap();
        state.calls.push(Call::List(project_id));
        let result = if state.fail_list {
            Err(anyhow::anyhow!("connection refused"))
        } else {
            Ok(state
                .tags
                .iter()
                .filter(|tag| tag.project_id == project_id)
                .cloned()
                .collect())
        };
        let delay = state.list_delays.pop_front();
        async move {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            result
        }
    }

    fn create_tag(
        &self,
        project_id: i64,
        tag: NewTag,
    ) -> impl Future<Output = anyhow::Result<Tag>> + Send + 'static {
        let mut state = self.inner.lock().unwrap();
        state.calls.push(Call::Create(project_id, tag.clone()));
        let result = if state.fail_mutations {
            Err(anyhow::anyhow!("create rejected"))
        } else {
            let id = state.tags.iter().map(|tag| tag.id).max().unwrap_or(0) + 1;
            let created = Tag {
                id,
                project_id,
                title: tag.title,
                color: tag.color,
                created_at: OffsetDateTime::UNIX_EPOCH,
            };
            state.tags.push(created.clone());
            Ok(created)
        };
        ready(result)
    }

    fn edit_tag(
        &self,
        project_id: i64,
        tag_id: i64,
        update: TagUpdate,
    ) -> impl Future<Output = anyhow::Result<Tag>> + Send + 'static {
        let mut state = self.inner.lock().unwrap();
        state.calls.push(Call::Edit(project_id, tag_id, update.clone()));
        let fail = state.fail_mutations;
        let result = match state.tags.iter_mut().find(|tag| tag.id == tag_id) {
            Some(_) if fail => Err(anyhow::anyhow!("edit rejected")),
            Some(tag) => {
                if let Some(title) = update.title {
                    tag.title = title;
                }
                if let Some(color) = update.color {
                    tag.color = color;
                }
                Ok(tag.clone())
            }
            None => Err(anyhow::anyhow!("tag #{tag_id} not found")),
        };
        ready(result)
    }

    fn delete_tag(
        &self,
        project_id: i64,
        tag_id: i64,
    ) -> impl Future<Output = anyhow::Result<()>> + Send + 'static {
        let delay = {
            let mut state = self.inner.lock().unwrap();
            state.calls.push(Call::Delete(project_id, tag_id));
            state.delete_delay
        };
        let inner = self.inner.clone();
        async move {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            let mut state = inner.lock().unwrap();
            if state.fail_mutations {
                Err(anyhow::anyhow!("delete rejected"))
            } else {
                state.tags.retain(|tag| tag.id != tag_id);
                Ok(())
            }
        }
    }
}

/// Notifier that keeps every message. Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    messages: Arc<Mutex<Vec<String>>>,
    errors: Arc<Mutex<Vec<String>>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }

    fn notify_error(&self, message: &str) {
        self.errors.lock().unwrap().push(message.to_string());
    }
}
