use std::path::PathBuf;

use iced::{
    Element, Length, Task,
    widget::{button, column, container, row, text},
};
use rfd::AsyncFileDialog;

use crate::{
    core::db::WorkspaceDb,
    error::extract_message,
    gui::{
        AppState, Message, Toast,
        screens::{
            Screen, ScreenData, ScreenMessage,
            loading_page::{LoadingPageParentMessage, LoadingPageScreen},
            manage_tags::{ManageTagsParentMessage, ManageTagsScreen},
        },
    },
};

pub struct TagkeeperApp {
    state: AppState,
    screen: ScreenData,
    project_id: i64,
}

/// Opens the tag manager for `project_id` and blocks until the window closes.
/// Without a workspace the user is asked to pick or create one first.
pub fn run(workspace: Option<PathBuf>, project_id: i64) -> anyhow::Result<()> {
    iced::application(
        move || TagkeeperApp::new(workspace.clone(), project_id),
        TagkeeperApp::update,
        TagkeeperApp::view,
    )
    .title(TagkeeperApp::title)
    .run()?;
    Ok(())
}

impl TagkeeperApp {
    pub fn new(workspace: Option<PathBuf>, project_id: i64) -> (Self, Task<Message>) {
        let mut app = Self {
            state: AppState::default(),
            screen: ScreenData::LoadingPage(LoadingPageScreen::Waiting(
                "Choose a workspace...".to_string(),
            )),
            project_id,
        };
        let task = match workspace {
            Some(workspace) => app.open(workspace),
            None => Task::perform(
                AsyncFileDialog::new()
                    .set_title("Open Tagkeeper Workspace")
                    .add_filter("Tagkeeper Workspace", &["tagkeeper"])
                    .save_file(),
                |handle| Message::WorkspacePicked(handle.map(|h| h.path().to_path_buf())),
            ),
        };
        (app, task)
    }

    fn open(&mut self, workspace: PathBuf) -> Task<Message> {
        self.screen = ScreenData::LoadingPage(LoadingPageScreen::Waiting(format!(
            "Opening {}...",
            workspace.display()
        )));
        Task::perform(WorkspaceDb::new(workspace), |result| {
            Message::WorkspaceOpened(result.map_err(|e| extract_message(&e)))
        })
    }

    pub fn title(&self) -> String {
        format!("Tagkeeper - Project #{}", self.project_id)
    }

    fn save(&self) -> Task<Message> {
        match self.state.workspace.clone() {
            Some(workspace) => Task::perform(
                async move { workspace.save_workspace().await },
                |result| Message::Saved(result.map_err(|e| extract_message(&e))),
            ),
            None => Task::none(),
        }
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::WorkspacePicked(Some(workspace)) => self.open(workspace),
            Message::WorkspacePicked(None) => iced::exit(),
            Message::WorkspaceOpened(Ok(workspace)) => {
                self.state.workspace = Some(workspace);
                let (screen, load) = ManageTagsScreen::new(self.project_id, &self.state);
                self.screen = ScreenData::ManageTags(screen);
                load.map(Message::ManageTags)
            }
            Message::WorkspaceOpened(Err(message)) => {
                tracing::warn!("failed to open workspace: {message}");
                self.screen = ScreenData::LoadingPage(LoadingPageScreen::Failed(message));
                Task::none()
            }
            Message::LoadingPage(ScreenMessage::ScreenMessage(never)) => match never {},
            Message::LoadingPage(ScreenMessage::ParentMessage(LoadingPageParentMessage::Quit)) => {
                iced::exit()
            }
            Message::ManageTags(ScreenMessage::ScreenMessage(msg)) => match &mut self.screen {
                ScreenData::ManageTags(screen) => {
                    screen.update(msg, &mut self.state).map(Message::ManageTags)
                }
                ScreenData::LoadingPage(_) => Task::none(),
            },
            Message::ManageTags(ScreenMessage::ParentMessage(parent)) => match parent {
                ManageTagsParentMessage::Changed => self.save(),
                ManageTagsParentMessage::Closed => self.save().chain(iced::exit()),
            },
            Message::Saved(Ok(())) => Task::none(),
            Message::Saved(Err(message)) => {
                tracing::warn!("failed to save workspace: {message}");
                self.state
                    .push_toasts([Toast::Error(format!("Failed to save workspace: {message}"))]);
                Task::none()
            }
            Message::DismissToast(index) => {
                if index < self.state.toasts.len() {
                    self.state.toasts.remove(index);
                }
                Task::none()
            }
        }
    }

    fn toasts(&self) -> Element<'_, Message> {
        column(self.state.toasts.iter().enumerate().map(|(index, toast)| {
            let label = match toast {
                Toast::Success(message) => text(message).style(text::success),
                Toast::Error(message) => text(message).style(text::danger),
            };
            container(
                row![
                    container(label).width(Length::Fill),
                    button(text("Dismiss"))
                        .style(button::text)
                        .on_press(Message::DismissToast(index)),
                ]
                .spacing(8),
            )
            .padding(8)
            .style(container::bordered_box)
            .into()
        }))
        .spacing(4)
        .into()
    }

    pub fn view(&self) -> Element<'_, Message> {
        let screen = match &self.screen {
            ScreenData::LoadingPage(screen) => screen.view().map(Message::LoadingPage),
            ScreenData::ManageTags(screen) => screen.view().map(Message::ManageTags),
        };
        container(column![self.toasts(), screen].spacing(8))
            .padding(16)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }
}
