#![allow(dead_code)]

mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from tagkeeper for tests
pub use tagkeeper::core::db::{
    Color, NewProject, NewTag, Project, ProjectRepository, Tag, TagRepository, TagUpdate,
    WorkspaceDb,
};
pub use tagkeeper::core::tags::{
    Completion, Request, RowState, TagFilter, TagList, TagManager, TagSession,
};
pub use tagkeeper::error::{MutationKind, TagError, ValidationError};
