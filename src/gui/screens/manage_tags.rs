use iced::{
    Alignment::Center,
    Element, Length, Task,
    widget::{button, column, container, row, scrollable, text, text_input},
};

use crate::{
    core::{
        db::Tag,
        tags::{Completion, Notifier, Request, RowState, TagList, TagManager},
    },
    gui::{
        AppState, ToastCollector,
        screens::{Screen, ScreenMessage},
        widgets::{color_swatch, modal_frame, tag_chip},
    },
};

#[derive(Debug, Clone)]
pub struct ManageTagsScreen {
    manager: TagManager,
}

#[derive(Debug, Clone)]
pub enum ManageTagsMessage {
    SearchChanged(String),
    EditPressed(i64),
    EditTitleChanged(String),
    EditColorChanged(String),
    EditCancelled,
    DeletePressed(i64),
    CreateTitleChanged(String),
    CreateColorChanged(String),
    RandomColorPressed,
    CreatePressed,
    Completed(Completion),
    Close,
}

#[derive(Debug, Clone)]
pub enum ManageTagsParentMessage {
    /// A mutation went through; the workspace should be saved.
    Changed,
    Closed,
}

type Msg = ScreenMessage<ManageTagsScreen>;

fn msg(message: ManageTagsMessage) -> Msg {
    ScreenMessage::ScreenMessage(message)
}

impl ManageTagsScreen {
    /// Returns the screen and the task loading its tags.
    pub fn new(project_id: i64, state: &AppState) -> (Self, Task<Msg>) {
        let (manager, initial) = TagManager::new(project_id);
        (Self { manager }, perform(initial, state))
    }

    fn tag_row<'a>(&'a self, tag: &'a Tag) -> Element<'a, Msg> {
        match self.manager.row() {
            RowState::Editing(draft) if draft.tag_id == tag.id => row![
                text_input("My awesome Tag", &draft.title)
                    .on_input(|value| msg(ManageTagsMessage::EditTitleChanged(value)))
                    .width(Length::Fill),
                color_swatch(&draft.color),
                text_input("#ff0000", &draft.color)
                    .on_input(|value| msg(ManageTagsMessage::EditColorChanged(value)))
                    .width(Length::Fixed(96.0)),
                button(text("Cancel"))
                    .style(button::secondary)
                    .on_press(msg(ManageTagsMessage::EditCancelled)),
                button(text(if draft.submitting { "Saving..." } else { "Save" }))
                    .style(button::primary)
                    .on_press_maybe(
                        (!draft.submitting).then(|| msg(ManageTagsMessage::EditPressed(tag.id))),
                    ),
            ]
            .spacing(8)
            .align_y(Center)
            .into(),
            row_state => {
                let (confirming, deleting) = match row_state {
                    RowState::ConfirmingDelete { tag_id, deleting } if *tag_id == tag.id => {
                        (true, *deleting)
                    }
                    _ => (false, false),
                };
                let delete_label = match (confirming, deleting) {
                    (_, true) => "Deleting...",
                    (true, false) => "Confirm",
                    (false, false) => "Delete",
                };
                row![
                    container(tag_chip(&tag.title, &tag.color)).width(Length::Fill),
                    button(text(delete_label))
                        .style(if confirming { button::danger } else { button::secondary })
                        .on_press_maybe(
                            (!deleting).then(|| msg(ManageTagsMessage::DeletePressed(tag.id))),
                        ),
                    button(text("Edit"))
                        .style(button::secondary)
                        .on_press(msg(ManageTagsMessage::EditPressed(tag.id))),
                ]
                .spacing(8)
                .align_y(Center)
                .into()
            }
        }
    }

    fn tag_list(&self) -> Element<'_, Msg> {
        match self.manager.list() {
            TagList::Loading => text("Loading Tags...").into(),
            TagList::Failed(message) => {
                column![text("Error loading Tags:").size(16), text(message)]
                    .spacing(4)
                    .into()
            }
            TagList::Loaded { .. } => {
                let Some(filter) = self.manager.visible_tags() else {
                    return text("Loading Tags...").into();
                };
                let rows = column(filter.iter().map(|tag| self.tag_row(tag))).spacing(8);
                scrollable(rows).height(Length::Fixed(384.0)).into()
            }
        }
    }

    fn create_form(&self) -> Element<'_, Msg> {
        let form = self.manager.create_form();
        let creating = form.is_creating();
        row![
            text_input("My awesome Tag", &form.title)
                .on_input(|value| msg(ManageTagsMessage::CreateTitleChanged(value)))
                .width(Length::Fill),
            button(text("Random"))
                .style(button::secondary)
                .on_press(msg(ManageTagsMessage::RandomColorPressed)),
            color_swatch(&form.color),
            text_input("#ff0000", &form.color)
                .on_input(|value| msg(ManageTagsMessage::CreateColorChanged(value)))
                .width(Length::Fixed(96.0)),
            button(text(if creating { "Creating..." } else { "Create" }))
                .style(button::primary)
                .on_press_maybe((!creating).then(|| msg(ManageTagsMessage::CreatePressed))),
        ]
        .spacing(8)
        .align_y(Center)
        .into()
    }
}

/// Runs `request` against the open workspace and routes its completion back to the screen.
fn perform(request: Request, state: &AppState) -> Task<Msg> {
    let Some(workspace) = state.workspace.as_ref() else {
        tracing::warn!(?request, "no workspace open, dropping request");
        return Task::none();
    };
    match request.kind() {
        Some(kind) => tracing::info!(%kind, ?request, "dispatching tag mutation"),
        None => tracing::debug!(?request, "dispatching tag list"),
    }
    Task::perform(request.execute(workspace), |completion| {
        msg(ManageTagsMessage::Completed(completion))
    })
}

fn perform_maybe(request: Option<Request>, state: &AppState) -> Task<Msg> {
    match request {
        Some(request) => perform(request, state),
        None => Task::none(),
    }
}

impl Screen for ManageTagsScreen {
    type Message = ManageTagsMessage;
    type ParentMessage = ManageTagsParentMessage;

    fn view(&self) -> Element<'_, ScreenMessage<Self>> {
        let search = text_input("Search Tags", self.manager.search())
            .on_input(|value| msg(ManageTagsMessage::SearchChanged(value)));
        let content = column![search, self.tag_list(), self.create_form()].spacing(16);
        modal_frame("Manage Tags", content, msg(ManageTagsMessage::Close))
    }

    fn update(
        &mut self,
        message: Self::Message,
        state: &mut AppState,
    ) -> Task<ScreenMessage<Self>> {
        let manager = &mut self.manager;
        match message {
            ManageTagsMessage::SearchChanged(value) => {
                manager.set_search(value);
                Task::none()
            }
            ManageTagsMessage::EditPressed(tag_id) => {
                perform_maybe(manager.press_edit(tag_id), state)
            }
            ManageTagsMessage::EditTitleChanged(value) => {
                manager.set_edit_title(value);
                Task::none()
            }
            ManageTagsMessage::EditColorChanged(value) => {
                manager.set_edit_color(value);
                Task::none()
            }
            ManageTagsMessage::EditCancelled => {
                manager.cancel_edit();
                Task::none()
            }
            ManageTagsMessage::DeletePressed(tag_id) => {
                perform_maybe(manager.press_delete(tag_id), state)
            }
            ManageTagsMessage::CreateTitleChanged(value) => {
                manager.set_create_title(value);
                Task::none()
            }
            ManageTagsMessage::CreateColorChanged(value) => {
                manager.set_create_color(value);
                Task::none()
            }
            ManageTagsMessage::RandomColorPressed => {
                manager.randomize_create_color();
                Task::none()
            }
            ManageTagsMessage::CreatePressed => perform(manager.submit_create(), state),
            ManageTagsMessage::Completed(completion) => {
                let toasts = ToastCollector::default();
                if let Some(err) = completion.mutation_error() {
                    tracing::warn!("{err}");
                    toasts.notify_error(&err.to_string());
                }
                let follow_up = manager.apply(completion, &toasts);
                state.push_toasts(toasts.into_toasts());
                match follow_up {
                    // A follow-up re-fetch only comes after a successful mutation.
                    Some(request) => Task::batch([
                        perform(request, state),
                        Task::done(ScreenMessage::ParentMessage(ManageTagsParentMessage::Changed)),
                    ]),
                    None => Task::none(),
                }
            }
            ManageTagsMessage::Close => {
                manager.reset_selection();
                Task::done(ScreenMessage::ParentMessage(ManageTagsParentMessage::Closed))
            }
        }
    }
}
