pub mod config;
pub mod core;
pub mod error;
pub mod telemetry;

pub use crate::core::db::{NewTag, Tag, TagUpdate, WorkspaceDb};
pub use crate::core::tags::{Completion, Request, TagManager, TagService, TagSession};
pub use error::{TagError, ValidationError, extract_message};

#[cfg(feature = "gui")]
pub mod gui;
