//! Interaction state of the "Manage Tags" modal.
//!
//! [`TagManager`] is a synchronous state machine. It never performs I/O:
//! events that need the data layer hand back a [`Request`], a driver runs it
//! against a [`TagService`] and feeds the [`Completion`] back in.
//! [`session::TagSession`] is the tokio driver; the GUI drives it through
//! iced tasks instead.

mod filter;
mod manager;
mod request;
mod service;
pub mod session;

pub use filter::{Iter, TagFilter};
pub use manager::{CreateForm, EditDraft, RowState, TagList, TagManager, random_color};
pub use request::{Completion, PendingCompletion, Request};
pub use service::{Notifier, TagService};
pub use session::TagSession;
