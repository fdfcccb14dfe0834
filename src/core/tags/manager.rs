use crate::core::{
    db::{Color, NewTag, Tag, TagUpdate},
    tags::{Completion, Notifier, Request, TagFilter},
};

/// Draft of an inline edit. Seeded from the tag when editing starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditDraft {
    pub tag_id: i64,
    pub title: String,
    pub color: String,
    /// An edit request for this draft is in flight.
    pub submitting: bool,
}

/// Per-row interaction state. Editing and delete confirmation exclude each other.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RowState {
    #[default]
    Idle,
    Editing(EditDraft),
    ConfirmingDelete {
        tag_id: i64,
        /// The delete request is in flight.
        deleting: bool,
    },
}

impl RowState {
    pub fn editing(&self) -> Option<&EditDraft> {
        match self {
            RowState::Editing(draft) => Some(draft),
            _ => None,
        }
    }

    pub fn pending_delete(&self) -> Option<i64> {
        match self {
            RowState::ConfirmingDelete { tag_id, .. } => Some(*tag_id),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateForm {
    pub title: String,
    pub color: String,
    creating: usize,
}

impl CreateForm {
    pub fn is_creating(&self) -> bool {
        self.creating > 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagList {
    Loading,
    Loaded { tags: Vec<Tag>, refreshing: bool },
    Failed(String),
}

/// State behind the "Manage Tags" modal of one project.
///
/// Every user event is a synchronous method. Events that need the data layer
/// return a [`Request`]; its outcome comes back through [`TagManager::apply`].
#[derive(Debug, Clone)]
pub struct TagManager {
    project_id: i64,
    search: String,
    row: RowState,
    create: CreateForm,
    list: TagList,
    list_generation: u64,
}

impl TagManager {
    /// Returns the manager in `Loading` state together with the initial list request.
    pub fn new(project_id: i64) -> (Self, Request) {
        let manager = Self {
            project_id,
            search: String::new(),
            row: RowState::Idle,
            create: CreateForm::default(),
            list: TagList::Loading,
            list_generation: 1,
        };
        let initial = Request::List {
            project_id,
            generation: 1,
        };
        (manager, initial)
    }

    pub fn project_id(&self) -> i64 {
        self.project_id
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn row(&self) -> &RowState {
        &self.row
    }

    pub fn create_form(&self) -> &CreateForm {
        &self.create
    }

    pub fn list(&self) -> &TagList {
        &self.list
    }

    /// Tags matching the current search, or `None` until the list is loaded.
    pub fn visible_tags(&self) -> Option<TagFilter<'_>> {
        match &self.list {
            TagList::Loaded { tags, .. } => Some(TagFilter::new(tags, &self.search)),
            _ => None,
        }
    }

    fn find_tag(&self, tag_id: i64) -> Option<&Tag> {
        match &self.list {
            TagList::Loaded { tags, .. } => tags.iter().find(|tag| tag.id == tag_id),
            _ => None,
        }
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
    }

    /// Edit control of a row: starts editing `tag_id`, or submits the draft if
    /// that tag is already being edited.
    pub fn press_edit(&mut self, tag_id: i64) -> Option<Request> {
        if let RowState::Editing(draft) = &mut self.row {
            if draft.tag_id == tag_id {
                if draft.submitting {
                    return None;
                }
                draft.submitting = true;
                tracing::debug!(tag_id, "submitting tag edit");
                return Some(Request::Edit {
                    project_id: self.project_id,
                    tag_id,
                    update: TagUpdate {
                        title: Some(draft.title.clone()),
                        color: Some(draft.color.clone()),
                    },
                });
            }
        }

        if let RowState::ConfirmingDelete { .. } = self.row {
            self.row = RowState::Idle;
        }
        let Some(tag) = self.find_tag(tag_id) else {
            tracing::debug!(tag_id, "edit requested for unknown tag");
            return None;
        };
        let draft = EditDraft {
            tag_id,
            title: tag.title.clone(),
            color: tag.color.clone(),
            submitting: false,
        };
        self.row = RowState::Editing(draft);
        tracing::debug!(tag_id, "editing tag");
        None
    }

    pub fn set_edit_title(&mut self, title: impl Into<String>) {
        if let RowState::Editing(draft) = &mut self.row {
            draft.title = title.into();
        }
    }

    pub fn set_edit_color(&mut self, color: impl Into<String>) {
        if let RowState::Editing(draft) = &mut self.row {
            draft.color = color.into();
        }
    }

    /// Discards the edit draft. An edit already in flight still completes.
    pub fn cancel_edit(&mut self) {
        if let RowState::Editing(_) = self.row {
            self.row = RowState::Idle;
        }
    }

    /// Delete control of a row: the first press arms the confirmation, a second
    /// press on the same tag issues the delete.
    pub fn press_delete(&mut self, tag_id: i64) -> Option<Request> {
        if let RowState::ConfirmingDelete {
            tag_id: pending,
            deleting,
        } = &mut self.row
        {
            if *pending == tag_id {
                if *deleting {
                    return None;
                }
                *deleting = true;
                tracing::debug!(tag_id, "delete confirmed");
                return Some(Request::Delete {
                    project_id: self.project_id,
                    tag_id,
                });
            }
        }
        self.row = RowState::ConfirmingDelete {
            tag_id,
            deleting: false,
        };
        tracing::debug!(tag_id, "delete pending confirmation");
        None
    }

    pub fn set_create_title(&mut self, title: impl Into<String>) {
        self.create.title = title.into();
    }

    pub fn set_create_color(&mut self, color: impl Into<String>) {
        self.create.color = color.into();
    }

    /// Assigns a uniformly random `#rrggbb` color to the create draft.
    pub fn randomize_create_color(&mut self) -> &str {
        self.create.color = random_color();
        &self.create.color
    }

    /// Issues a create with the drafts as they are. The drafts are kept.
    pub fn submit_create(&mut self) -> Request {
        self.create.creating += 1;
        Request::Create {
            project_id: self.project_id,
            tag: NewTag {
                title: self.create.title.clone(),
                color: self.create.color.clone(),
            },
        }
    }

    /// Re-fetches the list, keeping loaded tags visible meanwhile.
    /// Lists from earlier requests that arrive after this one are dropped.
    pub fn refresh(&mut self) -> Request {
        match &mut self.list {
            TagList::Loaded { refreshing, .. } => *refreshing = true,
            list => *list = TagList::Loading,
        }
        self.list_generation += 1;
        Request::List {
            project_id: self.project_id,
            generation: self.list_generation,
        }
    }

    /// Clears search, row and create drafts, as when the modal is closed.
    pub fn reset_selection(&mut self) {
        self.search.clear();
        self.row = RowState::Idle;
        self.create = CreateForm::default();
    }

    /// Applies the outcome of a request. Successful mutations notify and return
    /// a re-fetch request. Failed mutations only release their loading flag;
    /// reporting them is the caller's job.
    pub fn apply<N: Notifier + ?Sized>(
        &mut self,
        completion: Completion,
        notifier: &N,
    ) -> Option<Request> {
        match completion {
            Completion::Listed { generation, .. } if generation < self.list_generation => {
                tracing::debug!(
                    generation,
                    latest = self.list_generation,
                    "dropping superseded tag list"
                );
                None
            }
            Completion::Listed {
                result: Ok(tags), ..
            } => {
                tracing::debug!(count = tags.len(), "tags loaded");
                self.list = TagList::Loaded {
                    tags,
                    refreshing: false,
                };
                None
            }
            Completion::Listed {
                result: Err(err), ..
            } => {
                tracing::warn!("failed to load tags: {err}");
                self.list = TagList::Failed(err.to_string());
                None
            }
            Completion::Created(result) => {
                self.create.creating = self.create.creating.saturating_sub(1);
                let tag = result.ok()?;
                notifier.notify(&format!("Tag #{} created", tag.id));
                Some(self.refresh())
            }
            Completion::Edited { tag_id, result } => {
                let succeeded = result.is_ok();
                if self.row.editing().map(|draft| draft.tag_id) == Some(tag_id) {
                    if succeeded {
                        self.row = RowState::Idle;
                    } else if let RowState::Editing(draft) = &mut self.row {
                        draft.submitting = false;
                    }
                }
                if !succeeded {
                    return None;
                }
                notifier.notify(&format!("Tag #{tag_id} edited"));
                Some(self.refresh())
            }
            Completion::Deleted { tag_id, result } => {
                let succeeded = result.is_ok();
                if self.row.pending_delete() == Some(tag_id) {
                    self.row = if succeeded {
                        RowState::Idle
                    } else {
                        RowState::ConfirmingDelete {
                            tag_id,
                            deleting: false,
                        }
                    };
                }
                if !succeeded {
                    return None;
                }
                notifier.notify(&format!(
                    "Tag #{tag_id} removed from Project #{}",
                    self.project_id
                ));
                Some(self.refresh())
            }
        }
    }
}

/// `#` followed by six lowercase hex digits, uniformly sampled.
pub fn random_color() -> String {
    Color::random(&mut rand::thread_rng()).to_string()
}
