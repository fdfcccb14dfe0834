use std::path::PathBuf;

use crate::{
    core::db::WorkspaceDb,
    gui::screens::{
        ScreenMessage, loading_page::LoadingPageScreen, manage_tags::ManageTagsScreen,
    },
};

#[derive(Debug, Clone)]
pub enum Message {
    /// Result of the file dialog shown when no workspace was given.
    WorkspacePicked(Option<PathBuf>),
    WorkspaceOpened(Result<WorkspaceDb, String>),
    LoadingPage(ScreenMessage<LoadingPageScreen>),
    ManageTags(ScreenMessage<ManageTagsScreen>),
    Saved(Result<(), String>),
    DismissToast(usize),
}
