use std::fmt;

use thiserror::Error;

/// Rejections raised by the workspace store before anything is written.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("tag title must not be empty")]
    EmptyTitle,
    #[error("tag title must be at most {max} characters")]
    TitleTooLong { max: usize },
    #[error("tag title must not start or end with whitespace")]
    TitleWhitespace,
    #[error("invalid color {0:?}, expected #rrggbb")]
    InvalidColor(String),
    #[error("project name must not be empty")]
    EmptyProjectName,
    #[error("project #{project_id} not found")]
    ProjectNotFound { project_id: i64 },
    #[error("tag #{tag_id} not found in project #{project_id}")]
    TagNotFound { project_id: i64, tag_id: i64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Create,
    Edit,
    Delete,
}

impl fmt::Display for MutationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MutationKind::Create => "create",
            MutationKind::Edit => "edit",
            MutationKind::Delete => "delete",
        })
    }
}

/// Failures surfaced by the tag manager's external operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TagError {
    /// The tag collection could not be fetched. Rendered inline by the list view.
    #[error("{0}")]
    Load(String),
    /// A create/edit/delete failed. Reported through the notifier's error channel.
    #[error("failed to {kind} tag{}: {message}", tag_suffix(.tag_id))]
    Mutation {
        kind: MutationKind,
        tag_id: Option<i64>,
        message: String,
    },
}

fn tag_suffix(tag_id: &Option<i64>) -> String {
    tag_id.map(|id| format!(" #{id}")).unwrap_or_default()
}

impl TagError {
    pub fn load(err: &anyhow::Error) -> Self {
        TagError::Load(extract_message(err))
    }

    pub fn mutation(kind: MutationKind, tag_id: Option<i64>, err: &anyhow::Error) -> Self {
        TagError::Mutation {
            kind,
            tag_id,
            message: extract_message(err),
        }
    }
}

/// Human-readable message for an error, for display only.
///
/// Validation failures are shown as-is; anything else is shown with its context chain.
pub fn extract_message(err: &anyhow::Error) -> String {
    if let Some(validation) = err.downcast_ref::<ValidationError>() {
        return validation.to_string();
    }
    format!("{err:#}")
}
