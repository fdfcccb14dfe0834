use std::{future::Future, pin::Pin};

use crate::{
    core::{
        db::{NewTag, Tag, TagUpdate},
        tags::TagService,
    },
    error::{MutationKind, TagError},
};

/// An external operation the tag manager wants performed.
///
/// The manager never runs these itself; a driver executes them and feeds the
/// resulting [`Completion`] back through `TagManager::apply`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    List {
        project_id: i64,
        /// Issue order of list requests; newer lists supersede older ones.
        generation: u64,
    },
    Create {
        project_id: i64,
        tag: NewTag,
    },
    Edit {
        project_id: i64,
        tag_id: i64,
        update: TagUpdate,
    },
    Delete {
        project_id: i64,
        tag_id: i64,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    Listed {
        generation: u64,
        result: Result<Vec<Tag>, TagError>,
    },
    Created(Result<Tag, TagError>),
    Edited {
        tag_id: i64,
        result: Result<Tag, TagError>,
    },
    Deleted {
        tag_id: i64,
        result: Result<(), TagError>,
    },
}

pub type PendingCompletion = Pin<Box<dyn Future<Output = Completion> + Send + 'static>>;

impl Request {
    pub fn kind(&self) -> Option<MutationKind> {
        match self {
            Request::List { .. } => None,
            Request::Create { .. } => Some(MutationKind::Create),
            Request::Edit { .. } => Some(MutationKind::Edit),
            Request::Delete { .. } => Some(MutationKind::Delete),
        }
    }

    /// Starts the operation on `service`. The returned future owns everything it needs.
    pub fn execute<S: TagService>(self, service: &S) -> PendingCompletion {
        match self {
            Request::List {
                project_id,
                generation,
            } => {
                let fut = service.list_tags(project_id);
                Box::pin(async move {
                    Completion::Listed {
                        generation,
                        result: fut.await.map_err(|e| TagError::load(&e)),
                    }
                })
            }
            Request::Create { project_id, tag } => {
                let fut = service.create_tag(project_id, tag);
                Box::pin(async move {
                    Completion::Created(
                        fut.await
                            .map_err(|e| TagError::mutation(MutationKind::Create, None, &e)),
                    )
                })
            }
            Request::Edit {
                project_id,
                tag_id,
                update,
            } => {
                let fut = service.edit_tag(project_id, tag_id, update);
                Box::pin(async move {
                    Completion::Edited {
                        tag_id,
                        result: fut
                            .await
                            .map_err(|e| TagError::mutation(MutationKind::Edit, Some(tag_id), &e)),
                    }
                })
            }
            Request::Delete { project_id, tag_id } => {
                let fut = service.delete_tag(project_id, tag_id);
                Box::pin(async move {
                    Completion::Deleted {
                        tag_id,
                        result: fut.await.map_err(|e| {
                            TagError::mutation(MutationKind::Delete, Some(tag_id), &e)
                        }),
                    }
                })
            }
        }
    }
}

impl Completion {
    /// The failure of a create/edit/delete, if this is one.
    pub fn mutation_error(&self) -> Option<&TagError> {
        match self {
            Completion::Listed { .. } => None,
            Completion::Created(result) => result.as_ref().err(),
            Completion::Edited { result, .. } => result.as_ref().err(),
            Completion::Deleted { result, .. } => result.as_ref().err(),
        }
    }
}
